pub mod hybrid_signal;
pub mod price_trend;
pub mod technical_analyzer;

pub use hybrid_signal::{HybridAnalyzer, HybridReport};
pub use price_trend::{PriceTrendReport, analyze_price_history};
pub use technical_analyzer::{TechnicalAnalysis, TechnicalSignal, analyze_technical};
