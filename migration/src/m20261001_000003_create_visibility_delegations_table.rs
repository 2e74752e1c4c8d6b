use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VisibilityDelegations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VisibilityDelegations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(VisibilityDelegations::DelegatorId)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VisibilityDelegations::DelegateId)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VisibilityDelegations::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(VisibilityDelegations::StartDate).date().null())
                    .col(ColumnDef::new(VisibilityDelegations::EndDate).date().null())
                    .col(
                        ColumnDef::new(VisibilityDelegations::Reason)
                            .string_len(300)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(VisibilityDelegations::CreatedAt)
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
                    .name("fk_visibility_delegations_delegator_id")
                    .from(
                        VisibilityDelegations::Table,
                        VisibilityDelegations::DelegatorId,
                    )
                    .to(Employees::Table, Employees::EmployeeId)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_visibility_delegations_delegate_id")
                    .from(
                        VisibilityDelegations::Table,
                        VisibilityDelegations::DelegateId,
                    )
                    .to(Employees::Table, Employees::EmployeeId)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        // 代理受任者 + 有効フラグでの検索（アクター展開で毎リクエスト使用）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_visibility_delegations_delegate_active")
                    .table(VisibilityDelegations::Table)
                    .col(VisibilityDelegations::DelegateId)
                    .col(VisibilityDelegations::IsActive)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_visibility_delegations_delegator_id")
                    .table(VisibilityDelegations::Table)
                    .col(VisibilityDelegations::DelegatorId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VisibilityDelegations::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum VisibilityDelegations {
    Table,
    Id,
    DelegatorId,
    DelegateId,
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
