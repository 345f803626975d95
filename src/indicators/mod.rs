pub mod pipeline;

pub mod momentum;
pub mod structure;
pub mod trend;
pub mod volatility;
pub mod volume;

pub use pipeline::compute_indicators;
