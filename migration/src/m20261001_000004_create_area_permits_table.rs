use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AreaPermits::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AreaPermits::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AreaPermits::GrantorId).string_len(100).null())
                    .col(
                        ColumnDef::new(AreaPermits::GranteeId)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AreaPermits::RootOrgUnitId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AreaPermits::Scope)
                            .string_len(20)
                            .not_null()
                            .default("SUBTREE"),
                    )
                    .col(
                        ColumnDef::new(AreaPermits::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(AreaPermits::StartDate).date().null())
                    .col(ColumnDef::new(AreaPermits::EndDate).date().null())
                    .col(ColumnDef::new(AreaPermits::Reason).string_len(300).null())
                    .col(
                        ColumnDef::new(AreaPermits::CreatedAt)
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
                    .name("fk_area_permits_grantee_id")
                    .from(AreaPermits::Table, AreaPermits::GranteeId)
                    .to(Employees::Table, Employees::EmployeeId)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_area_permits_root_org_unit_id")
                    .from(AreaPermits::Table, AreaPermits::RootOrgUnitId)
                    .to(OrgUnits::Table, OrgUnits::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_area_permits_grantee_active")
                    .table(AreaPermits::Table)
                    .col(AreaPermits::GranteeId)
                    .col(AreaPermits::IsActive)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AreaPermits::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AreaPermits {
    Table,
    Id,
    GrantorId,
    GranteeId,
    RootOrgUnitId,
    Scope,
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

#[derive(DeriveIden)]
enum OrgUnits {
    Table,
    Id,
}
