pub use sea_orm_migration::prelude::*;

mod m20250601_000001_create_users_table;
mod m20250601_000002_create_gigs_table;
mod m20250601_000003_create_proposals_table;
mod m20250601_000004_create_reviews_table;
mod m20250601_000005_create_notifications_table;
mod m20250601_000006_create_messages_table;
mod m20250610_000001_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_users_table::Migration),
            Box::new(m20250601_000002_create_gigs_table::Migration),
            Box::new(m20250601_000003_create_proposals_table::Migration),
            Box::new(m20250601_000004_create_reviews_table::Migration),
            Box::new(m20250601_000005_create_notifications_table::Migration),
            Box::new(m20250601_000006_create_messages_table::Migration),
            Box::new(m20250610_000001_add_indexes::Migration),
        ]
    }
}
