pub mod model_store;
pub mod news;

pub use model_store::FileModelStore;
pub use news::SentimentAnalyzer;
