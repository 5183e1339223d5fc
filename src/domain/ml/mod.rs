pub mod feature_registry;
pub mod metadata;

pub use metadata::ModelMetadata;

/// Model input row. Position `i` holds the value of `ModelMetadata::features[i]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<f64>> for FeatureVector {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}
