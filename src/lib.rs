//! Signalis: composite signal scoring, risk evaluation and trade lifecycle
//! tracking for periodic candle data.
//!
//! A scoring pass turns each instrument's candle history into a directional
//! candidate with a 0-100 score, the risk evaluator sizes accepted
//! candidates, and the lifecycle tracker polls live prices until a target or
//! stop touch closes the recommendation with a realized PnL record.

pub mod classifier;
pub mod common;
pub mod config;
pub mod core;
pub mod error;
pub mod indicators;
pub mod jobs;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod risk;
pub mod services;
pub mod signals;
pub mod store;
pub mod tracker;
