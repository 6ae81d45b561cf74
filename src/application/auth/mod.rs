pub mod login;
pub mod logout;
pub mod refresh;
pub mod token_service;
pub mod token_utils;

pub use token_service::TokenService;
