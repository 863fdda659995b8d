pub mod documents;
pub mod search;
pub mod server;
pub mod upload;
