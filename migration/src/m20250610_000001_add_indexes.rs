use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Gigs {
    Table,
    PostedBy,
    HiredFreelancer,
    Status,
}

#[derive(DeriveIden)]
enum Proposals {
    Table,
    GigId,
    FreelancerId,
}

#[derive(DeriveIden)]
enum Reviews {
    Table,
    FreelancerId,
}

#[derive(DeriveIden)]
enum Notifications {
    Table,
    UserId,
}

#[derive(DeriveIden)]
enum Messages {
    Table,
    GigId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Index on gigs.posted_by for a client's own gigs and stats
        manager
            .create_index(
                Index::create()
                    .name("idx_gigs_posted_by")
                    .table(Gigs::Table)
                    .col(Gigs::PostedBy)
                    .to_owned(),
            )
            .await?;

        // Index on gigs.hired_freelancer for freelancer dashboards
        manager
            .create_index(
                Index::create()
                    .name("idx_gigs_hired_freelancer")
                    .table(Gigs::Table)
                    .col(Gigs::HiredFreelancer)
                    .to_owned(),
            )
            .await?;

        // Index on gigs.status for the open-gigs browse filter and payout queue
        manager
            .create_index(
                Index::create()
                    .name("idx_gigs_status")
                    .table(Gigs::Table)
                    .col(Gigs::Status)
                    .to_owned(),
            )
            .await?;

        // Index on proposals.gig_id for listing a gig's proposals
        manager
            .create_index(
                Index::create()
                    .name("idx_proposals_gig_id")
                    .table(Proposals::Table)
                    .col(Proposals::GigId)
                    .to_owned(),
            )
            .await?;

        // Index on proposals.freelancer_id for a freelancer's applied gigs
        manager
            .create_index(
                Index::create()
                    .name("idx_proposals_freelancer_id")
                    .table(Proposals::Table)
                    .col(Proposals::FreelancerId)
                    .to_owned(),
            )
            .await?;

        // Index on reviews.freelancer_id for the public review listing
        manager
            .create_index(
                Index::create()
                    .name("idx_reviews_freelancer_id")
                    .table(Reviews::Table)
                    .col(Reviews::FreelancerId)
                    .to_owned(),
            )
            .await?;

        // Index on notifications.user_id for fetching a user's notifications
        manager
            .create_index(
                Index::create()
                    .name("idx_notifications_user_id")
                    .table(Notifications::Table)
                    .col(Notifications::UserId)
                    .to_owned(),
            )
            .await?;

        // Index on messages.gig_id for chat history
        manager
            .create_index(
                Index::create()
                    .name("idx_messages_gig_id")
                    .table(Messages::Table)
                    .col(Messages::GigId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_gigs_posted_by").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_gigs_hired_freelancer").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_gigs_status").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_proposals_gig_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_proposals_freelancer_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_reviews_freelancer_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_notifications_user_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_messages_gig_id").to_owned())
            .await?;

        Ok(())
    }
}
