pub mod ai;
pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod questions;
pub mod sessions;
pub mod state;
pub mod storage;
pub mod uploads;
