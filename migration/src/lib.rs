// migration/src/lib.rs
pub use sea_orm_migration::prelude::*;

// 組織・従業員マスタ
mod m20261001_000001_create_org_units_table;
mod m20261001_000002_create_employees_table;

// 可視性ルール（代理・エリア権限・個別権限）
mod m20261001_000003_create_visibility_delegations_table;
mod m20261001_000004_create_area_permits_table;
mod m20261001_000005_create_employee_permits_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            // 1. 組織ノード（依存関係なし）
            Box::new(m20261001_000001_create_org_units_table::Migration),
            // 2. 従業員（org_unitsに依存）
            Box::new(m20261001_000002_create_employees_table::Migration),
            // 3. 可視性ルール（employeesに依存）
            Box::new(m20261001_000003_create_visibility_delegations_table::Migration),
            Box::new(m20261001_000004_create_area_permits_table::Migration),
            Box::new(m20261001_000005_create_employee_permits_table::Migration),
        ]
    }
}
