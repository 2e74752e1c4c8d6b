// visibility-backend/src/repository/area_permit_repository.rs

use crate::domain::area_permit_model::{self, Entity as AreaPermit};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbConn, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

fn in_force(today: NaiveDate) -> Condition {
    Condition::all()
        .add(area_permit_model::Column::IsActive.eq(true))
        .add(
            Condition::any()
                .add(area_permit_model::Column::EndDate.is_null())
                .add(area_permit_model::Column::EndDate.gte(today)),
        )
}

#[derive(Debug, Clone)]
pub struct AreaPermitRepository {
    db: DbConn,
}

impl AreaPermitRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// grantee がいずれかのアクターである有効なエリア権限
    pub async fn in_force_for_grantees<C: ConnectionTrait>(
        conn: &C,
        grantee_ids: &[String],
        today: NaiveDate,
    ) -> Result<Vec<area_permit_model::Model>, DbErr> {
        if grantee_ids.is_empty() {
            return Ok(Vec::new());
        }
        AreaPermit::find()
            .filter(area_permit_model::Column::GranteeId.is_in(grantee_ids.iter().cloned()))
            .filter(in_force(today))
            .order_by_asc(area_permit_model::Column::CreatedAt)
            .all(conn)
            .await
    }

    pub async fn create(
        &self,
        permit: area_permit_model::Model,
    ) -> Result<area_permit_model::Model, DbErr> {
        let active_model = area_permit_model::ActiveModel {
            id: Set(permit.id),
            grantor_id: Set(permit.grantor_id),
            grantee_id: Set(permit.grantee_id),
            root_org_unit_id: Set(permit.root_org_unit_id),
            scope: Set(permit.scope),
            is_active: Set(permit.is_active),
            start_date: Set(permit.start_date),
            end_date: Set(permit.end_date),
            reason: Set(permit.reason),
            created_at: Set(permit.created_at),
        };
        active_model.insert(&self.db).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<area_permit_model::Model>, DbErr> {
        AreaPermit::find_by_id(id).one(&self.db).await
    }

    pub async fn find_in_force_by_grantee(
        &self,
        grantee_id: &str,
        today: NaiveDate,
    ) -> Result<Vec<area_permit_model::Model>, DbErr> {
        Self::in_force_for_grantees(&self.db, &[grantee_id.trim().to_string()], today).await
    }

    pub async fn find_all_active(&self) -> Result<Vec<area_permit_model::Model>, DbErr> {
        AreaPermit::find()
            .filter(area_permit_model::Column::IsActive.eq(true))
            .order_by_desc(area_permit_model::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    pub async fn deactivate(&self, id: Uuid) -> Result<Option<area_permit_model::Model>, DbErr> {
        let Some(existing) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let mut active: area_permit_model::ActiveModel = existing.into();
        active.is_active = Set(false);
        Ok(Some(active.update(&self.db).await?))
    }
}
