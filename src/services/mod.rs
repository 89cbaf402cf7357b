//! Business logic services for training and serving recommendations.
//!
//! Services orchestrate the store and the model snapshot, and are
//! resolved from the application context with `#[derive(FromContext)]`.

mod recommendation;
mod training;

pub use recommendation::{Recommendations, RecommendationService, DEFAULT_RECOMMENDATIONS};
pub use training::{TrainingReport, TrainingService};
