pub mod bybit;
pub mod filters;
pub mod market_data;
pub mod sentiment;
