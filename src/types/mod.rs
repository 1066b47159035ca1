//! Public types for the Pricecast API.

mod field;
mod model;
mod prediction;
mod record;
mod validation;

pub use field::Field;
pub use model::ModelInfo;
pub use prediction::{PredictionResult, PredictionStatus};
pub use record::InputRecord;
pub(crate) use record::json_type_name;
pub use validation::CatalogPolicy;
