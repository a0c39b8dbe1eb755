pub mod chat;
pub mod config_store;
pub mod defaults;
pub mod health;
pub mod session;
