pub mod auth;
pub mod config;
pub mod db;
pub mod password;
pub mod pipeline;
pub mod repositories;
pub mod state;
pub mod storage;
