pub mod sentiment_analyzer;

pub use sentiment_analyzer::SentimentAnalyzer;
