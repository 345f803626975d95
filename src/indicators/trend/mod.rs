pub mod adx;
pub mod ema;
