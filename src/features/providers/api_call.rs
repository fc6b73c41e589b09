use super::{FeatureData, FeatureProviderInput, capped_list, capped_text};
use crate::features::{Capability, CapabilityError, FeatureProvider};
use crate::routes::{self, HTTP_METHOD_NAMES};

pub static API_CALL_PROVIDERS: &[FeatureProvider] = &[
    FeatureProvider::new("CallExpressionFullName", Capability::ApiCall, full_name),
    FeatureProvider::new("CallExpressionFuncName", Capability::ApiCall, func_name),
    FeatureProvider::new("CallExpressionNumArgs", Capability::ApiCall, num_args),
    FeatureProvider::new("CallExpressionArgsKinds", Capability::ApiCall, args_kinds),
    FeatureProvider::new("CallExpressionArgsValues", Capability::ApiCall, args_values),
    FeatureProvider::new(
        "CallExpressionIsFirstArgStringLiteral",
        Capability::ApiCall,
        is_first_arg_string_literal,
    ),
    FeatureProvider::new(
        "CallExpressionIsFirstArgStringLiteralRoute",
        Capability::ApiCall,
        is_first_arg_route,
    ),
    FeatureProvider::new("CallExpressionIsParenthesized", Capability::ApiCall, is_parenthesized),
    FeatureProvider::new("CallExpressionIsDecorator", Capability::ApiCall, is_decorator),
    FeatureProvider::new(
        "CallExpressionIsMethodInvocation",
        Capability::ApiCall,
        is_method_invocation,
    ),
    FeatureProvider::new("CallExpressionMethodOwnerText", Capability::ApiCall, owner_text),
    FeatureProvider::new(
        "CallExpressionStartsWithHttpMethod",
        Capability::ApiCall,
        starts_with_http_method,
    ),
    FeatureProvider::new(
        "CallExpressionEndsWithHttpMethod",
        Capability::ApiCall,
        ends_with_http_method,
    ),
    FeatureProvider::new(
        "CallExpressionSiblingHttpMethodsCount",
        Capability::ApiCall,
        sibling_http_methods,
    ),
    FeatureProvider::new(
        "CallExpressionSiblingAppFxMethodsCount",
        Capability::ApiCall,
        sibling_app_framework_methods,
    ),
    FeatureProvider::new(
        "CallExpressionSiblingOtherMethodsCount",
        Capability::ApiCall,
        sibling_other_methods,
    ),
    FeatureProvider::new("CallExpressionReceiverOrigin", Capability::ApiCall, receiver_origin),
    FeatureProvider::new("SuspectedApiMethod", Capability::ApiCall, suspected_api_method),
    FeatureProvider::new("SuspectedApiRoute", Capability::ApiCall, suspected_api_route),
    FeatureProvider::new(
        "SuspectedApiRouteNormalized",
        Capability::ApiCall,
        suspected_api_route_normalized,
    ),
    FeatureProvider::new("RouteParameters", Capability::ApiCall, route_parameters),
    FeatureProvider::new("InternalReferencedMethods", Capability::ApiCall, internal_referenced),
    FeatureProvider::new("ExternalReferencedMethods", Capability::ApiCall, external_referenced),
];

fn full_name(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    let call = input.entity_view.api_call()?;
    Ok(capped_text(input, &call.full_name()))
}

fn func_name(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    let call = input.entity_view.api_call()?;
    Ok(capped_text(input, &call.func_name()))
}

fn num_args(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    Ok(FeatureData::number(input.entity_view.api_call()?.num_args()))
}

fn args_kinds(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    let call = input.entity_view.api_call()?;
    Ok(FeatureData::list(
        call.arguments().iter().map(|arg| arg.kind.clone()),
    ))
}

fn args_values(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    let call = input.entity_view.api_call()?;
    Ok(capped_list(input, call.arguments().iter().map(|arg| &arg.value)))
}

fn is_first_arg_string_literal(
    input: &FeatureProviderInput<'_>,
) -> Result<FeatureData, CapabilityError> {
    let call = input.entity_view.api_call()?;
    Ok(FeatureData::Flag(call.first_arg_string().is_some()))
}

fn is_first_arg_route(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    let call = input.entity_view.api_call()?;
    Ok(FeatureData::Flag(
        call.first_arg_string()
            .is_some_and(|value| routes::is_route_like(&value)),
    ))
}

fn is_parenthesized(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    Ok(FeatureData::Flag(input.entity_view.api_call()?.is_parenthesized()))
}

fn is_decorator(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    Ok(FeatureData::Flag(input.entity_view.api_call()?.is_decorator()))
}

fn is_method_invocation(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    Ok(FeatureData::Flag(
        input.entity_view.api_call()?.is_property_access(),
    ))
}

fn owner_text(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    let call = input.entity_view.api_call()?;
    Ok(capped_text(input, &call.owner_text()))
}

fn starts_with_http_method(
    input: &FeatureProviderInput<'_>,
) -> Result<FeatureData, CapabilityError> {
    let name = input.entity_view.api_call()?.func_name().to_ascii_lowercase();
    Ok(FeatureData::Flag(
        HTTP_METHOD_NAMES.iter().any(|verb| name.starts_with(verb)),
    ))
}

fn ends_with_http_method(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    let name = input.entity_view.api_call()?.func_name().to_ascii_lowercase();
    Ok(FeatureData::Flag(
        HTTP_METHOD_NAMES.iter().any(|verb| name.ends_with(verb)),
    ))
}

fn sibling_http_methods(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    let siblings = input.entity_view.api_call()?.siblings();
    Ok(FeatureData::number(siblings.http_methods))
}

fn sibling_app_framework_methods(
    input: &FeatureProviderInput<'_>,
) -> Result<FeatureData, CapabilityError> {
    let siblings = input.entity_view.api_call()?.siblings();
    Ok(FeatureData::number(siblings.app_framework_methods))
}

fn sibling_other_methods(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    let siblings = input.entity_view.api_call()?.siblings();
    Ok(FeatureData::number(siblings.other_methods))
}

fn receiver_origin(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    let call = input.entity_view.api_call()?;
    Ok(capped_text(input, call.receiver_origin()))
}

fn suspected_api_method(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    let call = input.entity_view.api_call()?;
    Ok(FeatureData::Text(call.suspected_api_method()))
}

fn suspected_api_route(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    let call = input.entity_view.api_call()?;
    Ok(capped_text(input, &call.suspected_api_route()))
}

fn suspected_api_route_normalized(
    input: &FeatureProviderInput<'_>,
) -> Result<FeatureData, CapabilityError> {
    let call = input.entity_view.api_call()?;
    Ok(capped_text(input, &call.normalized_route()))
}

fn route_parameters(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    let call = input.entity_view.api_call()?;
    Ok(capped_list(input, call.route_parameters()))
}

fn internal_referenced(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    let (internal, _) = input.entity_view.api_call()?.referenced_methods();
    Ok(FeatureData::list(internal.iter().cloned()))
}

fn external_referenced(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    let (_, external) = input.entity_view.api_call()?.referenced_methods();
    Ok(capped_list(input, external))
}
