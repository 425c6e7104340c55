pub mod health;
pub mod logger;
pub mod server;
