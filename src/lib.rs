pub mod auth;
pub mod chat;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod notify;
pub mod payment;

pub use db::create_pool;
