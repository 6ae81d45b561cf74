pub mod change_password;
pub mod current;
pub mod media;
pub mod register;
pub mod update;
