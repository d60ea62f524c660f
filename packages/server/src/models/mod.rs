pub mod auth;
pub mod build;
pub mod component;
pub mod shared;
