// visibility-backend/src/repository/employee_permit_repository.rs

use crate::domain::employee_permit_model::{self, Entity as EmployeePermit};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbConn, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

fn in_force(today: NaiveDate) -> Condition {
    Condition::all()
        .add(employee_permit_model::Column::IsActive.eq(true))
        .add(
            Condition::any()
                .add(employee_permit_model::Column::EndDate.is_null())
                .add(employee_permit_model::Column::EndDate.gte(today)),
        )
}

#[derive(Debug, Clone)]
pub struct EmployeePermitRepository {
    db: DbConn,
}

impl EmployeePermitRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn in_force_for_grantees<C: ConnectionTrait>(
        conn: &C,
        grantee_ids: &[String],
        today: NaiveDate,
    ) -> Result<Vec<employee_permit_model::Model>, DbErr> {
        if grantee_ids.is_empty() {
            return Ok(Vec::new());
        }
        EmployeePermit::find()
            .filter(employee_permit_model::Column::GranteeId.is_in(grantee_ids.iter().cloned()))
            .filter(in_force(today))
            .order_by_asc(employee_permit_model::Column::CreatedAt)
            .all(conn)
            .await
    }

    pub async fn create(
        &self,
        permit: employee_permit_model::Model,
    ) -> Result<employee_permit_model::Model, DbErr> {
        let active_model = employee_permit_model::ActiveModel {
            id: Set(permit.id),
            grantor_id: Set(permit.grantor_id),
            grantee_id: Set(permit.grantee_id),
            target_id: Set(permit.target_id),
            access_type: Set(permit.access_type),
            is_active: Set(permit.is_active),
            start_date: Set(permit.start_date),
            end_date: Set(permit.end_date),
            reason: Set(permit.reason),
            created_at: Set(permit.created_at),
        };
        active_model.insert(&self.db).await
    }

    pub async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<employee_permit_model::Model>, DbErr> {
        EmployeePermit::find_by_id(id).one(&self.db).await
    }

    pub async fn find_in_force_by_grantee(
        &self,
        grantee_id: &str,
        today: NaiveDate,
    ) -> Result<Vec<employee_permit_model::Model>, DbErr> {
        Self::in_force_for_grantees(&self.db, &[grantee_id.trim().to_string()], today).await
    }

    pub async fn find_all_active(&self) -> Result<Vec<employee_permit_model::Model>, DbErr> {
        EmployeePermit::find()
            .filter(employee_permit_model::Column::IsActive.eq(true))
            .order_by_desc(employee_permit_model::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    pub async fn deactivate(
        &self,
        id: Uuid,
    ) -> Result<Option<employee_permit_model::Model>, DbErr> {
        let Some(existing) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let mut active: employee_permit_model::ActiveModel = existing.into();
        active.is_active = Set(false);
        Ok(Some(active.update(&self.db).await?))
    }
}
