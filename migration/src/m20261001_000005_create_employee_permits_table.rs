use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EmployeePermits::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EmployeePermits::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EmployeePermits::GrantorId)
                            .string_len(100)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(EmployeePermits::GranteeId)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmployeePermits::TargetId)
                            .string_len(100)
                            .not_null(),
                    )
                    // NULL は ALLOW として扱う
                    .col(
                        ColumnDef::new(EmployeePermits::AccessType)
                            .string_len(20)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(EmployeePermits::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(EmployeePermits::StartDate).date().null())
                    .col(ColumnDef::new(EmployeePermits::EndDate).date().null())
                    .col(
                        ColumnDef::new(EmployeePermits::Reason)
                            .string_len(300)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(EmployeePermits::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_employee_permits_grantee_id")
                    .from(EmployeePermits::Table, EmployeePermits::GranteeId)
                    .to(Employees::Table, Employees::EmployeeId)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_employee_permits_target_id")
                    .from(EmployeePermits::Table, EmployeePermits::TargetId)
                    .to(Employees::Table, Employees::EmployeeId)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_employee_permits_grantee_active")
                    .table(EmployeePermits::Table)
                    .col(EmployeePermits::GranteeId)
                    .col(EmployeePermits::IsActive)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EmployeePermits::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum EmployeePermits {
    Table,
    Id,
    GrantorId,
    GranteeId,
    TargetId,
    AccessType,
    IsActive,
    StartDate,
    EndDate,
    Reason,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Employees {
    Table,
    EmployeeId,
}
