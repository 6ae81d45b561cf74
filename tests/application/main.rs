#[path = "../common/mod.rs"]
#[macro_use]
pub mod common;

pub mod assets_test;
pub mod auth_test;
pub mod feed_test;
pub mod videos_test;
