pub mod gigs;
pub mod messages;
pub mod notifications;
pub mod proposals;
pub mod reviews;
pub mod users;
