//! Migration: Create the activities table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Activities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Activities::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Activities::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Activities::Description).text().not_null())
                    .col(
                        ColumnDef::new(Activities::Category)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Activities::Location)
                            .string_len(300)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Activities::MaxParticipants)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Activities::Cost)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Activities::Qualifications).text().null())
                    .col(ColumnDef::new(Activities::ImageUrl).string_len(500).null())
                    .col(
                        ColumnDef::new(Activities::StartTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Activities::EndTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Activities::Status)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Activities::RejectionReason).text().null())
                    .col(ColumnDef::new(Activities::CreatorId).uuid().not_null())
                    .col(
                        ColumnDef::new(Activities::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Activities::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_activities_creator")
                            .from(Activities::Table, Activities::CreatorId)
                            .to(Managers::Table, Managers::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // The sweep and the public listings both filter on status
        manager
            .create_index(
                Index::create()
                    .name("idx_activities_status")
                    .table(Activities::Table)
                    .col(Activities::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_activities_creator_id")
                    .table(Activities::Table)
                    .col(Activities::CreatorId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_activities_creator_id")
                    .table(Activities::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_activities_status")
                    .table(Activities::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Activities::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Activities {
    Table,
    Id,
    Title,
    Description,
    Category,
    Location,
    MaxParticipants,
    Cost,
    Qualifications,
    ImageUrl,
    StartTime,
    EndTime,
    Status,
    RejectionReason,
    CreatorId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Managers {
    Table,
    Id,
}
