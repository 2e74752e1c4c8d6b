// visibility-backend/src/repository/visibility_snapshot_repository.rs

use super::{
    area_permit_repository::AreaPermitRepository, current_date,
    delegation_repository::DelegationRepository,
    employee_permit_repository::EmployeePermitRepository, org_unit_repository::OrgUnitRepository,
};
use crate::domain::employee_model::{self, Entity as Employee};
use crate::domain::visibility_snapshot::{DelegationSnapshot, VisibilitySnapshot};
use crate::service::visibility_resolver::{expand_actors, VisibilityError};
use crate::service::visibility_service::SnapshotSource;
use async_trait::async_trait;
use sea_orm::{
    AccessMode, ColumnTrait, DatabaseTransaction, DbConn, DbErr, EntityTrait, IsolationLevel,
    QueryFilter, TransactionTrait,
};

/// 可視性計算用の読み取り専用スナップショットを PostgreSQL から組み立てる
#[derive(Debug, Clone)]
pub struct VisibilitySnapshotRepository {
    db: DbConn,
}

impl VisibilitySnapshotRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    // 途中で権限が変わっても読み取りがずれないよう、1トランザクションで読む
    async fn begin_read_only(&self) -> Result<DatabaseTransaction, DbErr> {
        self.db
            .begin_with_config(
                Some(IsolationLevel::RepeatableRead),
                Some(AccessMode::ReadOnly),
            )
            .await
    }

    async fn read_snapshot(&self, requester: &str) -> Result<VisibilitySnapshot, DbErr> {
        let txn = self.begin_read_only().await?;

        let today = current_date(&txn).await?;
        let delegations =
            DelegationRepository::in_force_for_delegate(&txn, requester, today).await?;
        let actors = expand_actors(requester, &delegations, today);

        let employees = Employee::find()
            .filter(employee_model::Column::IsActive.eq(true))
            .all(&txn)
            .await?;
        let org_units = OrgUnitRepository::all(&txn).await?;
        let area_permits = AreaPermitRepository::in_force_for_grantees(&txn, &actors, today).await?;
        let employee_permits =
            EmployeePermitRepository::in_force_for_grantees(&txn, &actors, today).await?;

        txn.commit().await?;

        Ok(VisibilitySnapshot {
            today,
            employees,
            org_units,
            delegations,
            area_permits,
            employee_permits,
        })
    }

    async fn read_delegations(&self, requester: &str) -> Result<DelegationSnapshot, DbErr> {
        let txn = self.begin_read_only().await?;
        let today = current_date(&txn).await?;
        let delegations =
            DelegationRepository::in_force_for_delegate(&txn, requester, today).await?;
        txn.commit().await?;

        Ok(DelegationSnapshot { today, delegations })
    }
}

#[async_trait]
impl SnapshotSource for VisibilitySnapshotRepository {
    async fn load_snapshot(&self, requester: &str) -> Result<VisibilitySnapshot, VisibilityError> {
        Ok(self.read_snapshot(requester).await?)
    }

    async fn load_delegations(
        &self,
        requester: &str,
    ) -> Result<DelegationSnapshot, VisibilityError> {
        Ok(self.read_delegations(requester).await?)
    }
}
