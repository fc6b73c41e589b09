use super::providers::{
    API_CALL_PROVIDERS, API_LABEL_PROVIDERS, CLASS_PROVIDERS, COMMON_PROVIDERS,
    DATA_MODEL_PROVIDERS, METHOD_PROVIDERS,
};
use super::{
    Capability, ExtractorError, FeatureError, FeatureProvider, FeatureProviderInput, FeatureValue,
    FeaturesEntityContext,
};
use crate::views::EntityView;
use std::collections::HashSet;
use tracing::{debug, debug_span};

/// An ordered, validated list of providers for one kind of entity view.
#[derive(Debug, Clone)]
pub struct FeaturesExtractor {
    dirname: String,
    correlation_id: String,
    capability: Capability,
    providers: Vec<FeatureProvider>,
    names: Vec<&'static str>,
}

impl FeaturesExtractor {
    /// Concatenate `lists` in order. Fails when a feature name repeats or a
    /// provider needs a capability that `capability` views do not offer.
    pub fn new(
        dirname: impl Into<String>,
        correlation_id: impl Into<String>,
        capability: Capability,
        lists: &[&[FeatureProvider]],
    ) -> Result<Self, ExtractorError> {
        let mut seen = HashSet::new();
        let mut providers = Vec::new();
        let mut names = Vec::new();
        for provider in lists.iter().flat_map(|list| list.iter()) {
            if !seen.insert(provider.name) {
                return Err(ExtractorError::DuplicateFeatureName(provider.name));
            }
            if !capability.satisfies(provider.capability) {
                return Err(ExtractorError::IncompatibleProvider {
                    feature: provider.name,
                    required: provider.capability,
                    served: capability,
                });
            }
            providers.push(*provider);
            names.push(provider.name);
        }
        let extractor = Self {
            dirname: dirname.into(),
            correlation_id: correlation_id.into(),
            capability,
            providers,
            names,
        };
        debug!(
            correlation_id = %extractor.correlation_id,
            capability = %capability,
            features = extractor.providers.len(),
            "features extractor ready"
        );
        Ok(extractor)
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    /// Provider names in order, fixed when the extractor is built.
    pub fn feature_names(&self) -> &[&'static str] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// One value per provider, in provider order.
    pub fn features_values(
        &self,
        entity_view: &EntityView<'_>,
        entity_context: &FeaturesEntityContext,
    ) -> Result<Vec<FeatureValue>, FeatureError> {
        let span = debug_span!(
            "features",
            correlation_id = %self.correlation_id,
            path = %entity_context.path,
            entity = %entity_view.key(),
        );
        let input = FeatureProviderInput {
            dirname: &self.dirname,
            entity_view,
            entity_context,
            logger: &span,
        };
        let mut values = Vec::with_capacity(self.providers.len());
        for provider in &self.providers {
            let value = provider
                .value(&input)
                .map_err(|source| FeatureError::ContractViolation {
                    feature: provider.name,
                    entity: entity_view.key().to_string(),
                    source,
                })?;
            values.push(value);
        }
        Ok(values)
    }
}

/// Extractor for API-call views: common, class, call and label features.
pub fn api_features_extractor(
    dirname: &str,
    correlation_id: &str,
) -> Result<FeaturesExtractor, ExtractorError> {
    FeaturesExtractor::new(
        dirname,
        correlation_id,
        Capability::ApiCall,
        &[
            COMMON_PROVIDERS,
            CLASS_PROVIDERS,
            API_CALL_PROVIDERS,
            API_LABEL_PROVIDERS,
        ],
    )
}

/// Extractor for method views: common, class and method features.
pub fn method_features_extractor(
    dirname: &str,
    correlation_id: &str,
) -> Result<FeaturesExtractor, ExtractorError> {
    FeaturesExtractor::new(
        dirname,
        correlation_id,
        Capability::Method,
        &[COMMON_PROVIDERS, CLASS_PROVIDERS, METHOD_PROVIDERS],
    )
}

/// Extractor for data model views: common, class and data model features.
pub fn data_model_features_extractor(
    dirname: &str,
    correlation_id: &str,
) -> Result<FeaturesExtractor, ExtractorError> {
    FeaturesExtractor::new(
        dirname,
        correlation_id,
        Capability::DataModel,
        &[COMMON_PROVIDERS, CLASS_PROVIDERS, DATA_MODEL_PROVIDERS],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_extractors_compose() {
        let api = api_features_extractor("repo", "run").unwrap();
        assert_eq!(api.capability(), Capability::ApiCall);
        assert_eq!(
            api.len(),
            COMMON_PROVIDERS.len()
                + CLASS_PROVIDERS.len()
                + API_CALL_PROVIDERS.len()
                + API_LABEL_PROVIDERS.len()
        );
        let method = method_features_extractor("repo", "run").unwrap();
        assert_eq!(method.feature_names()[0], "Path");
        let models = data_model_features_extractor("repo", "run").unwrap();
        assert_eq!(models.capability(), Capability::DataModel);
        assert_eq!(models.feature_names().last(), Some(&"IsConfirmedDataModel"));
    }

    #[test]
    fn feature_names_are_fixed_at_construction() {
        let extractor = api_features_extractor("repo", "run").unwrap();
        let first = extractor.feature_names();
        let second = extractor.feature_names();
        assert!(std::ptr::eq(first, second));
        assert_eq!(first.len(), extractor.len());
        let cloned = extractor.clone();
        assert_eq!(cloned.feature_names(), first);
    }

    #[test]
    fn duplicate_lists_are_rejected() {
        let err = FeaturesExtractor::new(
            "repo",
            "run",
            Capability::Method,
            &[COMMON_PROVIDERS, COMMON_PROVIDERS],
        )
        .unwrap_err();
        assert_eq!(err, ExtractorError::DuplicateFeatureName("Path"));
    }

    #[test]
    fn method_providers_do_not_fit_api_views() {
        let err = FeaturesExtractor::new("repo", "run", Capability::ApiCall, &[METHOD_PROVIDERS])
            .unwrap_err();
        assert!(matches!(
            err,
            ExtractorError::IncompatibleProvider {
                required: Capability::Method,
                served: Capability::ApiCall,
                ..
            }
        ));
    }
}
