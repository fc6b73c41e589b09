use super::{FeatureData, FeatureProviderInput, capped_list, capped_text};
use crate::features::{Capability, CapabilityError, FeatureProvider};

pub static DATA_MODEL_PROVIDERS: &[FeatureProvider] = &[
    FeatureProvider::new("DataModelName", Capability::DataModel, name),
    FeatureProvider::new("DataModelKind", Capability::DataModel, kind),
    FeatureProvider::new("DataModelPropertyNames", Capability::DataModel, property_names),
    FeatureProvider::new("DataModelPropertyTypes", Capability::DataModel, property_types),
    FeatureProvider::new("DataModelNumProperties", Capability::DataModel, num_properties),
    FeatureProvider::new("DataModelMethodsCount", Capability::DataModel, methods_count),
    FeatureProvider::new("IsConfirmedDataModel", Capability::DataModel, is_confirmed),
];

fn name(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    let model = input.entity_view.data_model()?;
    Ok(capped_text(input, &model.name()))
}

fn kind(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    Ok(FeatureData::text(input.entity_view.data_model()?.kind().as_str()))
}

fn property_names(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    let model = input.entity_view.data_model()?;
    Ok(capped_list(input, model.property_names()))
}

fn property_types(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    let model = input.entity_view.data_model()?;
    Ok(capped_list(input, model.property_types()))
}

fn num_properties(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    let model = input.entity_view.data_model()?;
    Ok(FeatureData::number(model.properties().len()))
}

fn methods_count(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    Ok(FeatureData::number(input.entity_view.data_model()?.methods_count()))
}

fn is_confirmed(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    Ok(FeatureData::Flag(input.entity_view.data_model()?.is_confirmed()))
}
