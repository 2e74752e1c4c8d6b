// visibility-backend/src/repository/delegation_repository.rs

use crate::domain::delegation_model::{self, Entity as Delegation};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbConn, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

/// active かつ end_date が今日以降（または未設定）
fn in_force(today: NaiveDate) -> Condition {
    Condition::all()
        .add(delegation_model::Column::IsActive.eq(true))
        .add(
            Condition::any()
                .add(delegation_model::Column::EndDate.is_null())
                .add(delegation_model::Column::EndDate.gte(today)),
        )
}

#[derive(Debug, Clone)]
pub struct DelegationRepository {
    db: DbConn,
}

impl DelegationRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// 指定 delegate に対する有効な代理（作成順）
    pub async fn in_force_for_delegate<C: ConnectionTrait>(
        conn: &C,
        delegate_id: &str,
        today: NaiveDate,
    ) -> Result<Vec<delegation_model::Model>, DbErr> {
        Delegation::find()
            .filter(delegation_model::Column::DelegateId.eq(delegate_id.trim()))
            .filter(in_force(today))
            .order_by_asc(delegation_model::Column::CreatedAt)
            .order_by_asc(delegation_model::Column::DelegatorId)
            .all(conn)
            .await
    }

    pub async fn create(
        &self,
        delegation: delegation_model::Model,
    ) -> Result<delegation_model::Model, DbErr> {
        let active_model = delegation_model::ActiveModel {
            id: Set(delegation.id),
            delegator_id: Set(delegation.delegator_id),
            delegate_id: Set(delegation.delegate_id),
            is_active: Set(delegation.is_active),
            start_date: Set(delegation.start_date),
            end_date: Set(delegation.end_date),
            reason: Set(delegation.reason),
            created_at: Set(delegation.created_at),
        };
        active_model.insert(&self.db).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<delegation_model::Model>, DbErr> {
        Delegation::find_by_id(id).one(&self.db).await
    }

    pub async fn find_in_force_by_delegate(
        &self,
        delegate_id: &str,
        today: NaiveDate,
    ) -> Result<Vec<delegation_model::Model>, DbErr> {
        Self::in_force_for_delegate(&self.db, delegate_id, today).await
    }

    pub async fn find_in_force_by_delegator(
        &self,
        delegator_id: &str,
        today: NaiveDate,
    ) -> Result<Vec<delegation_model::Model>, DbErr> {
        Delegation::find()
            .filter(delegation_model::Column::DelegatorId.eq(delegator_id.trim()))
            .filter(in_force(today))
            .order_by_asc(delegation_model::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    pub async fn find_all_active(&self) -> Result<Vec<delegation_model::Model>, DbErr> {
        Delegation::find()
            .filter(delegation_model::Column::IsActive.eq(true))
            .order_by_desc(delegation_model::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// 無効化。存在しなければ None。
    pub async fn deactivate(&self, id: Uuid) -> Result<Option<delegation_model::Model>, DbErr> {
        let Some(existing) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let mut active: delegation_model::ActiveModel = existing.into();
        active.is_active = Set(false);
        Ok(Some(active.update(&self.db).await?))
    }
}
