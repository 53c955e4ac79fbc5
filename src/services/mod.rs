pub mod distribution_planner;
pub mod field_inference;
pub mod response_classifier;
pub mod schema_extractor;

pub use response_classifier::{MarkerClassifier, ResponseClassifier, Verdict};
pub use schema_extractor::SchemaExtractor;
