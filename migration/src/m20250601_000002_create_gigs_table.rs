use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `gigs` table and its columns.
#[derive(DeriveIden)]
enum Gigs {
    Table,
    Id,
    Title,
    Description,
    Budget,
    Duration,
    Skills,
    Location,
    PostedBy,
    HiredFreelancer,
    Status,
    FinalAmount,
    PayoutProcessed,
    HasBeenReviewed,
    PostedAt,
}

// No foreign keys to `users`: user deletion does not cascade, and reads of
// gigs/proposals/reviews that reference a deleted user must keep working.

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Gigs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Gigs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Gigs::Title).string().not_null())
                    .col(ColumnDef::new(Gigs::Description).text().not_null())
                    .col(ColumnDef::new(Gigs::Budget).double().not_null())
                    .col(ColumnDef::new(Gigs::Duration).string().not_null())
                    .col(ColumnDef::new(Gigs::Skills).json_binary().not_null())
                    .col(ColumnDef::new(Gigs::Location).string().not_null())
                    .col(ColumnDef::new(Gigs::PostedBy).uuid().not_null())
                    .col(ColumnDef::new(Gigs::HiredFreelancer).uuid().null())
                    .col(ColumnDef::new(Gigs::Status).string().not_null())
                    .col(ColumnDef::new(Gigs::FinalAmount).double().null())
                    .col(
                        ColumnDef::new(Gigs::PayoutProcessed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Gigs::HasBeenReviewed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Gigs::PostedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Gigs::Table).to_owned())
            .await
    }
}
