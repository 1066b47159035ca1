//! Feature preparation.

mod assembler;

pub(crate) use assembler::coerce;
pub use assembler::{FeatureAssembler, FeatureLayout, FeatureVector, WidthPolicy};
