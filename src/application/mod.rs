// Technical, trend and hybrid analysis over price history
pub mod market_data;

// Model-based price prediction
pub mod ml;
