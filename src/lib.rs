pub mod cache;
pub mod config;
pub mod edit;
pub mod error;
pub mod extract;
pub mod models;
pub mod search;
pub mod service;
pub mod store;
pub mod utils;
