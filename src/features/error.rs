use crate::views::{Capability, CapabilityError};
use thiserror::Error;

/// Raised while computing features for one entity; fatal for that entity.
#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("feature `{feature}` cannot be computed for entity {entity}")]
    ContractViolation {
        feature: &'static str,
        entity: String,
        #[source]
        source: CapabilityError,
    },
}

/// Raised while composing an extractor from provider lists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractorError {
    #[error("feature `{0}` is declared by more than one provider")]
    DuplicateFeatureName(&'static str),
    #[error("provider `{feature}` requires `{required}` views but the extractor serves `{served}`")]
    IncompatibleProvider {
        feature: &'static str,
        required: Capability,
        served: Capability,
    },
}
