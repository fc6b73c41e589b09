use super::{FeatureData, FeatureValue, FeaturesEntityContext};
use crate::views::{Capability, CapabilityError, EntityView};
use tracing::Span;

/// Everything one provider invocation sees.
pub struct FeatureProviderInput<'a> {
    /// Name of the repository directory being extracted.
    pub dirname: &'a str,
    pub entity_view: &'a EntityView<'a>,
    pub entity_context: &'a FeaturesEntityContext,
    /// Span carrying the correlation id, path and entity key.
    pub logger: &'a Span,
}

/// Must not fail for well-formed input; the error is reserved for a view that
/// lacks the capability the provider assumed.
pub type ComputeFn = fn(&FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError>;

/// Registration record binding a feature name and a required capability to its
/// computation.
#[derive(Clone, Copy)]
pub struct FeatureProvider {
    pub name: &'static str,
    pub capability: Capability,
    pub compute: ComputeFn,
}

impl FeatureProvider {
    pub const fn new(name: &'static str, capability: Capability, compute: ComputeFn) -> Self {
        Self {
            name,
            capability,
            compute,
        }
    }

    pub fn value(&self, input: &FeatureProviderInput<'_>) -> Result<FeatureValue, CapabilityError> {
        let value = (self.compute)(input)?;
        Ok(FeatureValue {
            name: self.name.to_string(),
            value,
        })
    }
}

impl std::fmt::Debug for FeatureProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureProvider")
            .field("name", &self.name)
            .field("capability", &self.capability)
            .finish()
    }
}
