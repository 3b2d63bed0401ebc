//! Migration: Create the managers table.
//!
//! Flat identity record: role tag plus optional officer and admin fields.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Managers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Managers::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Managers::Name).string().not_null())
                    .col(
                        ColumnDef::new(Managers::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Managers::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Managers::Phone).string().not_null())
                    .col(
                        ColumnDef::new(Managers::Role)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Managers::PositionTitle).string().null())
                    .col(ColumnDef::new(Managers::JoinDate).date().null())
                    .col(ColumnDef::new(Managers::AdminTitle).string().null())
                    .col(
                        ColumnDef::new(Managers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Managers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Managers::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Managers {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    Phone,
    Role,
    PositionTitle,
    JoinDate,
    AdminTitle,
    CreatedAt,
    UpdatedAt,
}
