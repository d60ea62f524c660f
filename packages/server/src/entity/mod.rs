pub mod build;
pub mod build_component;
pub mod build_event;
pub mod component;
pub mod user;
