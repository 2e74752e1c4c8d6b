// visibility-backend/src/repository/org_unit_repository.rs

use crate::domain::org_unit_model::{self, Entity as OrgUnit};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DbConn, DbErr, EntityTrait, QueryOrder, Set,
};

#[derive(Debug, Clone)]
pub struct OrgUnitRepository {
    db: DbConn,
}

impl OrgUnitRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// 全ノード（並び順・名前順）
    pub async fn all<C: ConnectionTrait>(conn: &C) -> Result<Vec<org_unit_model::Model>, DbErr> {
        OrgUnit::find()
            .order_by_asc(org_unit_model::Column::SortOrder)
            .order_by_asc(org_unit_model::Column::Name)
            .all(conn)
            .await
    }

    pub async fn create(
        &self,
        unit: org_unit_model::Model,
    ) -> Result<org_unit_model::Model, DbErr> {
        let active_model = org_unit_model::ActiveModel {
            id: Set(unit.id),
            name: Set(unit.name),
            kind: Set(unit.kind),
            parent_id: Set(unit.parent_id),
            sort_order: Set(unit.sort_order),
            is_active: Set(unit.is_active),
            updated_at: Set(unit.updated_at),
        };
        active_model.insert(&self.db).await
    }

    pub async fn find_all(&self) -> Result<Vec<org_unit_model::Model>, DbErr> {
        Self::all(&self.db).await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<org_unit_model::Model>, DbErr> {
        OrgUnit::find_by_id(id).one(&self.db).await
    }
}
