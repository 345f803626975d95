pub mod engine;
pub mod weights;

pub use engine::{EngineConfig, ScoringEngine};
pub use weights::ScoringWeights;
