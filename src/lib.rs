pub mod config;
pub mod data;
pub mod delivery;
pub mod engine;
pub mod monitoring;
pub mod scheduler;
