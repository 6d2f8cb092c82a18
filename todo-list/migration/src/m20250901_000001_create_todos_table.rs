use sea_orm_migration::prelude::*;
use sea_orm_migration::schema::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const IDX_TODOS_CREATED_AT: &str = "idx_todos_created_at";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Todos::Table)
                    .if_not_exists()
                    .col(pk_auto(Todos::Id))
                    .col(string(Todos::Title))
                    .col(boolean(Todos::IsCompleted).default(false))
                    .col(big_integer(Todos::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_TODOS_CREATED_AT)
                    .table(Todos::Table)
                    .col(Todos::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_TODOS_CREATED_AT)
                    .table(Todos::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Todos::Table).to_owned())
            .await
    }
}

// Column names match the on-device layout: camelCase flags and timestamps.
#[derive(DeriveIden)]
enum Todos {
    Table,
    Id,
    Title,
    #[sea_orm(iden = "isCompleted")]
    IsCompleted,
    #[sea_orm(iden = "createdAt")]
    CreatedAt,
}
