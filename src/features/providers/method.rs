use super::{FeatureData, FeatureProviderInput, capped_list, capped_text};
use crate::features::{Capability, CapabilityError, FeatureProvider};

pub static METHOD_PROVIDERS: &[FeatureProvider] = &[
    FeatureProvider::new("MethodName", Capability::Method, name),
    FeatureProvider::new("MethodKind", Capability::Method, kind),
    FeatureProvider::new("MethodParameterNames", Capability::Method, parameter_names),
    FeatureProvider::new("MethodParameterTypes", Capability::Method, parameter_types),
    FeatureProvider::new("MethodNumParameters", Capability::Method, num_parameters),
    FeatureProvider::new("MethodReturnType", Capability::Method, return_type),
    FeatureProvider::new("MethodIsAsync", Capability::Method, is_async),
    FeatureProvider::new("MethodIsStatic", Capability::Method, is_static),
    FeatureProvider::new("MethodIsPrivate", Capability::Method, is_private),
    FeatureProvider::new("MethodDecorators", Capability::Method, decorators),
    FeatureProvider::new("MethodBodyLength", Capability::Method, body_length),
    FeatureProvider::new("MethodContainsAuthentication", Capability::Method, contains_authentication),
    FeatureProvider::new("InternalMethodCalls", Capability::Method, internal_calls),
    FeatureProvider::new("ExternalMethodCalls", Capability::Method, external_calls),
    FeatureProvider::new("GraphQLOperationType", Capability::Method, graphql_operation_type),
    FeatureProvider::new("GraphQLOperationName", Capability::Method, graphql_operation_name),
];

fn name(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    let method = input.entity_view.method()?;
    Ok(capped_text(input, &method.name()))
}

fn kind(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    Ok(FeatureData::text(input.entity_view.method()?.kind()))
}

fn parameter_names(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    let method = input.entity_view.method()?;
    Ok(capped_list(input, method.parameter_names()))
}

fn parameter_types(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    let method = input.entity_view.method()?;
    Ok(capped_list(input, method.parameter_types()))
}

fn num_parameters(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    let method = input.entity_view.method()?;
    Ok(FeatureData::number(method.parameter_nodes().len()))
}

fn return_type(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    let method = input.entity_view.method()?;
    Ok(capped_text(input, &method.return_type()))
}

fn is_async(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    Ok(FeatureData::Flag(input.entity_view.method()?.is_async()))
}

fn is_static(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    Ok(FeatureData::Flag(input.entity_view.method()?.is_static()))
}

fn is_private(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    Ok(FeatureData::Flag(input.entity_view.method()?.is_private()))
}

fn decorators(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    let method = input.entity_view.method()?;
    Ok(capped_list(input, method.decorators()))
}

fn body_length(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    Ok(FeatureData::number(input.entity_view.method()?.body_length()))
}

fn contains_authentication(
    input: &FeatureProviderInput<'_>,
) -> Result<FeatureData, CapabilityError> {
    Ok(FeatureData::Flag(
        input.entity_view.method()?.contains_authentication(),
    ))
}

fn internal_calls(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    let (internal, _) = input.entity_view.method()?.method_calls();
    Ok(FeatureData::list(internal.iter().cloned()))
}

fn external_calls(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    let (_, external) = input.entity_view.method()?.method_calls();
    Ok(capped_list(input, external))
}

fn graphql_operation_type(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    let operation = input.entity_view.method()?.graphql_operation();
    Ok(FeatureData::text(operation.map(|(kind, _)| kind).unwrap_or("")))
}

fn graphql_operation_name(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    let operation = input.entity_view.method()?.graphql_operation();
    let name = operation.map(|(_, name)| name).unwrap_or_default();
    Ok(capped_text(input, &name))
}
