pub mod actions;
pub mod config;
pub mod drag;
pub mod filter;
pub mod logging;
pub mod models;
pub mod reducer;
pub mod seed;
pub mod services;
pub mod storage;
pub mod store;
