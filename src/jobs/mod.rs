pub mod context;
pub mod handlers;
pub mod types;
