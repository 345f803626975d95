pub mod flow;
pub mod stats;
pub mod vwap;
