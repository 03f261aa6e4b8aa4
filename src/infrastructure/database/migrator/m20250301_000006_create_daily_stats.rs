//! Create daily_stats table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DailyStats::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DailyStats::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DailyStats::Date).date().not_null())
                    .col(
                        ColumnDef::new(DailyStats::ActiveStations)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DailyStats::ActiveUsers)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DailyStats::TotalHours)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(DailyStats::TotalRevenue)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(DailyStats::StationUtilization).text())
                    .col(ColumnDef::new(DailyStats::PopularGames).text())
                    .to_owned(),
            )
            .await?;

        // One row per calendar date
        manager
            .create_index(
                Index::create()
                    .name("idx_daily_stats_date")
                    .table(DailyStats::Table)
                    .col(DailyStats::Date)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DailyStats::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum DailyStats {
    Table,
    Id,
    Date,
    ActiveStations,
    ActiveUsers,
    TotalHours,
    TotalRevenue,
    StationUtilization,
    PopularGames,
}
