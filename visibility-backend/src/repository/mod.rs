// visibility-backend/src/repository/mod.rs
pub mod area_permit_repository;
pub mod delegation_repository;
pub mod employee_permit_repository;
pub mod employee_repository;
pub mod org_unit_repository;
pub mod visibility_snapshot_repository;

use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, DbErr, Statement};

/// ストア側の今日の日付。有効期限の判定はアプリ側の時計ではなくこちらに揃える。
pub async fn current_date<C: ConnectionTrait>(conn: &C) -> Result<NaiveDate, DbErr> {
    let row = conn
        .query_one(Statement::from_string(
            conn.get_database_backend(),
            "SELECT CURRENT_DATE AS today",
        ))
        .await?
        .ok_or_else(|| DbErr::RecordNotFound("CURRENT_DATE".to_string()))?;

    row.try_get("", "today")
}
