// Write side: forecast rows back to the database
pub mod prediction_store;

pub use prediction_store::{plan_batches, PersistSummary, PredictionRow, PredictionStore};
