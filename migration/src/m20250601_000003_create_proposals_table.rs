use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `proposals` table and its columns.
#[derive(DeriveIden)]
enum Proposals {
    Table,
    Id,
    GigId,
    FreelancerId,
    BidAmount,
    Message,
    Status,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Proposals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Proposals::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Proposals::GigId).uuid().not_null())
                    .col(ColumnDef::new(Proposals::FreelancerId).uuid().not_null())
                    .col(ColumnDef::new(Proposals::BidAmount).double().not_null())
                    .col(ColumnDef::new(Proposals::Message).text().not_null())
                    .col(ColumnDef::new(Proposals::Status).string().not_null())
                    .col(
                        ColumnDef::new(Proposals::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // One proposal per (gig, freelancer) pair.
        manager
            .create_index(
                Index::create()
                    .name("idx_proposals_gig_freelancer_unique")
                    .table(Proposals::Table)
                    .col(Proposals::GigId)
                    .col(Proposals::FreelancerId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Proposals::Table).to_owned())
            .await
    }
}
