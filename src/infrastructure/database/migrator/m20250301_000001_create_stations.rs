//! Create stations table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Stations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Stations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Stations::Name).string().not_null())
                    .col(
                        ColumnDef::new(Stations::StationType)
                            .string()
                            .not_null()
                            .default("PC"),
                    )
                    .col(
                        ColumnDef::new(Stations::Status)
                            .string()
                            .not_null()
                            .default("AVAILABLE"),
                    )
                    .col(ColumnDef::new(Stations::RatePerHour).double())
                    .col(ColumnDef::new(Stations::RatePerGame).double())
                    .col(ColumnDef::new(Stations::MaintenanceReason).string())
                    .col(ColumnDef::new(Stations::MaintenanceEta).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Stations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Stations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Stations::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Stations {
    Table,
    Id,
    Name,
    StationType,
    Status,
    RatePerHour,
    RatePerGame,
    MaintenanceReason,
    MaintenanceEta,
    CreatedAt,
    UpdatedAt,
}
