//! Point weights for the composite score.

/// Point contribution per scoring factor. The sum of all possible awarded
/// points never exceeds 100 before the separately-capped sentiment and
/// classifier bonuses.
#[derive(Debug, Clone)]
pub struct ScoringWeights {
    /// Flat award for the gating trend/momentum consensus.
    pub trend: f64,
    /// MACD histogram sign matches the candidate direction.
    pub macd: f64,
    /// ADX at or above the trend-strength threshold.
    pub adx: f64,
    /// RSI on the candidate's side of 50.
    pub rsi: f64,
    /// Close on the candidate's side of VWAP.
    pub vwap: f64,
    /// Volume surge: ratio or z-score above threshold.
    pub volume: f64,
    /// Volatility squeeze with a band break in the candidate direction.
    pub bollinger: f64,
    /// Fibonacci retracement congruence, scaled by the [0,1] score.
    pub retracement: f64,
    /// Higher-timeframe trend agreement.
    pub mtf: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            trend: 25.0,
            macd: 15.0,
            adx: 10.0,
            rsi: 10.0,
            vwap: 10.0,
            volume: 10.0,
            bollinger: 5.0,
            retracement: 10.0,
            mtf: 5.0,
        }
    }
}

impl ScoringWeights {
    pub fn total(&self) -> f64 {
        self.trend
            + self.macd
            + self.adx
            + self.rsi
            + self.vwap
            + self.volume
            + self.bollinger
            + self.retracement
            + self.mtf
    }
}
