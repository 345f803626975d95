pub mod provider;

pub use provider::BybitProvider;
