pub mod runtime;
pub mod scheduler;
