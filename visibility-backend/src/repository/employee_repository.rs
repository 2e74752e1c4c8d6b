// visibility-backend/src/repository/employee_repository.rs

use crate::api::dto::employee_dto::EmployeeRecord;
use crate::domain::employee_model::{self, Entity as Employee};
use crate::domain::org_unit_model;
use crate::service::visibility_resolver::VisibilityError;
use crate::service::visibility_service::{EmployeeDirectory, IdentityLookup};
use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    db: DbConn,
}

impl EmployeeRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        employee: employee_model::Model,
    ) -> Result<employee_model::Model, DbErr> {
        let active_model = employee_model::ActiveModel {
            employee_id: Set(employee.employee_id),
            account_id: Set(employee.account_id),
            display_name: Set(employee.display_name),
            email: Set(employee.email),
            job_title: Set(employee.job_title),
            org_unit_id: Set(employee.org_unit_id),
            manager_id: Set(employee.manager_id),
            global_role: Set(employee.global_role),
            is_active: Set(employee.is_active),
            created_at: Set(employee.created_at),
            updated_at: Set(employee.updated_at),
        };
        active_model.insert(&self.db).await
    }

    pub async fn find_by_id(&self, employee_id: &str) -> Result<Option<employee_model::Model>, DbErr> {
        Employee::find_by_id(employee_id.trim().to_string())
            .one(&self.db)
            .await
    }

    pub async fn find_by_account_id(
        &self,
        account_id: i64,
    ) -> Result<Option<employee_model::Model>, DbErr> {
        Employee::find()
            .filter(employee_model::Column::AccountId.eq(account_id))
            .one(&self.db)
            .await
    }

    pub async fn exists(&self, employee_id: &str) -> Result<bool, DbErr> {
        let count = Employee::find()
            .filter(employee_model::Column::EmployeeId.eq(employee_id.trim()))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    /// 組織名付きで取得（表示名順）
    pub async fn find_with_org_unit_by_ids(
        &self,
        ids: &[String],
    ) -> Result<Vec<EmployeeRecord>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = Employee::find()
            .filter(employee_model::Column::EmployeeId.is_in(ids.iter().map(|id| id.trim())))
            .find_also_related(org_unit_model::Entity)
            .order_by_asc(employee_model::Column::DisplayName)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(employee, unit)| EmployeeRecord::with_org_unit(employee, unit))
            .collect())
    }

    /// 組織ノード群に直接所属する在籍者数
    pub async fn count_active_in_org_units(&self, unit_ids: &[i64]) -> Result<u64, DbErr> {
        if unit_ids.is_empty() {
            return Ok(0);
        }
        Employee::find()
            .filter(employee_model::Column::IsActive.eq(true))
            .filter(employee_model::Column::OrgUnitId.is_in(unit_ids.iter().copied()))
            .count(&self.db)
            .await
    }

    /// 組織ノード群に直接所属する在籍者（表示名順、件数上限付き）
    pub async fn find_active_in_org_units(
        &self,
        unit_ids: &[i64],
        limit: u64,
    ) -> Result<Vec<EmployeeRecord>, DbErr> {
        if unit_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = Employee::find()
            .filter(employee_model::Column::IsActive.eq(true))
            .filter(employee_model::Column::OrgUnitId.is_in(unit_ids.iter().copied()))
            .find_also_related(org_unit_model::Entity)
            .order_by_asc(employee_model::Column::DisplayName)
            .order_by_asc(employee_model::Column::EmployeeId)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(employee, unit)| EmployeeRecord::with_org_unit(employee, unit))
            .collect())
    }

    /// 組織ノードごとの直接所属の在籍者数
    pub async fn count_active_by_org_unit(&self) -> Result<Vec<(i64, i64)>, DbErr> {
        let rows: Vec<(Option<i64>, i64)> = Employee::find()
            .select_only()
            .column(employee_model::Column::OrgUnitId)
            .column_as(Expr::col(employee_model::Column::EmployeeId).count(), "employee_count")
            .filter(employee_model::Column::IsActive.eq(true))
            .filter(employee_model::Column::OrgUnitId.is_not_null())
            .group_by(employee_model::Column::OrgUnitId)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(unit, count)| unit.map(|unit| (unit, count)))
            .collect())
    }
}

#[async_trait]
impl IdentityLookup for EmployeeRepository {
    async fn resolve_employee_id(
        &self,
        account_id: i64,
    ) -> Result<Option<String>, VisibilityError> {
        let employee = self.find_by_account_id(account_id).await?;
        Ok(employee.map(|e| e.id().to_string()))
    }
}

#[async_trait]
impl EmployeeDirectory for EmployeeRepository {
    async fn find_records(&self, ids: &[String]) -> Result<Vec<EmployeeRecord>, VisibilityError> {
        Ok(self.find_with_org_unit_by_ids(ids).await?)
    }
}
