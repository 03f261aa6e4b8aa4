//! Create sessions table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Sessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sessions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sessions::StationId).integer().not_null())
                    .col(ColumnDef::new(Sessions::CustomerId).integer().not_null())
                    .col(ColumnDef::new(Sessions::GameId).integer())
                    .col(
                        ColumnDef::new(Sessions::SessionType)
                            .string()
                            .not_null()
                            .default("HOURLY"),
                    )
                    .col(ColumnDef::new(Sessions::Rate).double().not_null())
                    .col(
                        ColumnDef::new(Sessions::StartTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Sessions::EndTime).timestamp_with_time_zone())
                    .col(ColumnDef::new(Sessions::DurationMinutes).integer())
                    .col(
                        ColumnDef::new(Sessions::Status)
                            .string()
                            .not_null()
                            .default("ACTIVE"),
                    )
                    .col(ColumnDef::new(Sessions::TotalAmount).double())
                    .col(ColumnDef::new(Sessions::PlannedMinutes).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sessions_station")
                            .from(Sessions::Table, Sessions::StationId)
                            .to(Stations::Table, Stations::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sessions_customer")
                            .from(Sessions::Table, Sessions::CustomerId)
                            .to(Customers::Table, Customers::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sessions_game")
                            .from(Sessions::Table, Sessions::GameId)
                            .to(Games::Table, Games::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Ending and station-claim paths look sessions up by station + status
        manager
            .create_index(
                Index::create()
                    .name("idx_sessions_station_status")
                    .table(Sessions::Table)
                    .col(Sessions::StationId)
                    .col(Sessions::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Sessions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Sessions {
    Table,
    Id,
    StationId,
    CustomerId,
    GameId,
    SessionType,
    Rate,
    StartTime,
    EndTime,
    DurationMinutes,
    Status,
    TotalAmount,
    PlannedMinutes,
}

#[derive(DeriveIden)]
enum Stations {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Customers {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Games {
    Table,
    Id,
}
