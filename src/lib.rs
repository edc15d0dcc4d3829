pub mod auth;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod db;
pub mod handlers;
pub mod models;

pub use db::create_pool;
