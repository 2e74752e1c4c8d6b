use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 人事システム由来の組織ノード（idは人事側の論理IDをそのまま使う）
        manager
            .create_table(
                Table::create()
                    .table(OrgUnits::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrgUnits::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OrgUnits::Name).string_len(200).not_null())
                    .col(ColumnDef::new(OrgUnits::Kind).string_len(50).null())
                    .col(ColumnDef::new(OrgUnits::ParentId).big_integer().null())
                    .col(
                        ColumnDef::new(OrgUnits::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(OrgUnits::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(OrgUnits::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // 親ノード検索用（サブツリー展開で使用）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_org_units_parent_id")
                    .table(OrgUnits::Table)
                    .col(OrgUnits::ParentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OrgUnits::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum OrgUnits {
    Table,
    Id,
    Name,
    Kind,
    ParentId,
    SortOrder,
    IsActive,
    UpdatedAt,
}
