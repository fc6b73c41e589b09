//! Feature providers and the extractor that runs them over entity views.

mod context;
mod error;
mod extractor;
mod provider;
pub mod providers;
mod value;

pub use crate::views::{Capability, CapabilityError};
pub use context::FeaturesEntityContext;
pub use error::{ExtractorError, FeatureError};
pub use extractor::{
    FeaturesExtractor, api_features_extractor, data_model_features_extractor,
    method_features_extractor,
};
pub use provider::{ComputeFn, FeatureProvider, FeatureProviderInput};
pub use value::{FeatureData, FeatureValue};
