use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Employees::EmployeeId)
                            .string_len(100)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Employees::AccountId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Employees::DisplayName)
                            .string_len(200)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Employees::Email).string_len(255).null())
                    .col(ColumnDef::new(Employees::JobTitle).string_len(200).null())
                    .col(ColumnDef::new(Employees::OrgUnitId).big_integer().null())
                    .col(ColumnDef::new(Employees::ManagerId).string_len(100).null())
                    .col(ColumnDef::new(Employees::GlobalRole).string_len(50).null())
                    .col(
                        ColumnDef::new(Employees::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Employees::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Employees::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // 上司参照は循環し得るため外部キーは張らない（組織図の同期元が正）
        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_employees_org_unit_id")
                    .from(Employees::Table, Employees::OrgUnitId)
                    .to(OrgUnits::Table, OrgUnits::Id)
                    .on_delete(ForeignKeyAction::SetNull)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_employees_manager_id")
                    .table(Employees::Table)
                    .col(Employees::ManagerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_employees_org_unit_id")
                    .table(Employees::Table)
                    .col(Employees::OrgUnitId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_employees_is_active")
                    .table(Employees::Table)
                    .col(Employees::IsActive)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Employees::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Employees {
    Table,
    EmployeeId,
    AccountId,
    DisplayName,
    Email,
    JobTitle,
    OrgUnitId,
    ManagerId,
    GlobalRole,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum OrgUnits {
    Table,
    Id,
}
