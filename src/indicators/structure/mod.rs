pub mod retracement;
