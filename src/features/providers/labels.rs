//! Boolean labels marking calls that look like route registrations of a known
//! framework.

use super::{FeatureData, FeatureProviderInput};
use crate::features::{Capability, CapabilityError, FeatureProvider};
use crate::routes::HTTP_METHOD_NAMES;
use crate::views::ApiCallView;

pub const API_LABEL_PREFIX: &str = "!ApiLabel!";

pub static API_LABEL_PROVIDERS: &[FeatureProvider] = &[
    FeatureProvider::new("!ApiLabel!Express", Capability::ApiCall, express),
    FeatureProvider::new("!ApiLabel!Express.IO", Capability::ApiCall, express_io),
    FeatureProvider::new("!ApiLabel!Koa", Capability::ApiCall, koa),
    FeatureProvider::new(
        "!ApiLabel!ExpressStyleRouteDefinition",
        Capability::ApiCall,
        express_style_route_definition,
    ),
    FeatureProvider::new("!ApiLabel!RoutingController", Capability::ApiCall, routing_controller),
    FeatureProvider::new("!ApiLabel!NestJS", Capability::ApiCall, nest_js),
    FeatureProvider::new("!ApiLabel!ServerJS", Capability::ApiCall, server_js),
    FeatureProvider::new("!ApiLabel!SFRA", Capability::ApiCall, sfra),
];

/// Mock-server libraries register handlers with the same shape as real routers.
const FALSE_POSITIVE_IMPORTS: &[&str] = &["msw", "miragejs"];
const EXPRESS_KEYWORDS: &[&str] = &["all", "del"];
const KOA_MODULES: &[&str] = &["koa", "koa-router", "@koa/router"];
const SERVER_JS_MODULES: &[&str] = &["server", "server/router"];
const SERVER_JS_METHODS: &[&str] = &["get", "head", "post", "put", "del"];
const SFRA_METHODS: &[&str] = &["get", "post"];

fn express(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    express_label(input, "express")
}

fn express_io(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    express_label(input, "express.io")
}

fn express_label(
    input: &FeatureProviderInput<'_>,
    module: &str,
) -> Result<FeatureData, CapabilityError> {
    let call = input.entity_view.api_call()?;
    if imports_mock_server(input) || !input.entity_context.module.has_import(module) {
        return Ok(FeatureData::Flag(false));
    }
    let func_name = call.func_name();
    let num_args = call.num_args();
    let is_verb = HTTP_METHOD_NAMES.contains(&func_name.as_str());
    let registers = (is_verb && num_args >= 2)
        || (is_verb && !call.root_route().is_empty() && num_args >= 1)
        || (EXPRESS_KEYWORDS.contains(&func_name.as_str()) && num_args >= 2);
    Ok(FeatureData::Flag(registers && func_name != call.full_name()))
}

fn koa(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    let call = input.entity_view.api_call()?;
    let label = has_http_method_name(call)
        && input.entity_context.module.has_any_import(KOA_MODULES)
        && has_handler_like_args(call, 1, 2, true);
    Ok(FeatureData::Flag(label))
}

fn express_style_route_definition(
    input: &FeatureProviderInput<'_>,
) -> Result<FeatureData, CapabilityError> {
    let call = input.entity_view.api_call()?;
    if imports_mock_server(input) {
        return Ok(FeatureData::Flag(false));
    }
    let route_first = call.root_route().is_empty();
    let label = !call.suspected_api_method().is_empty()
        && !call.suspected_api_route().is_empty()
        && has_handler_like_args(call, 2, 3, route_first);
    Ok(FeatureData::Flag(label))
}

fn routing_controller(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    let call = input.entity_view.api_call()?;
    let label = input.entity_context.module.has_import("routing-controllers")
        && is_decorator_defined_api(call);
    Ok(FeatureData::Flag(label))
}

fn nest_js(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    let call = input.entity_view.api_call()?;
    let in_controller = input
        .entity_context
        .class
        .as_ref()
        .is_some_and(|class| class.has_decorator("Controller"));
    let label = input.entity_context.module.has_import_prefix("@nestjs")
        && in_controller
        && is_decorator_defined_api(call);
    Ok(FeatureData::Flag(label))
}

fn server_js(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    let call = input.entity_view.api_call()?;
    let label = input.entity_context.module.has_any_import(SERVER_JS_MODULES)
        && SERVER_JS_METHODS.contains(&call.full_name().as_str())
        && call.num_args() >= 2;
    Ok(FeatureData::Flag(label))
}

fn sfra(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    let call = input.entity_view.api_call()?;
    let label = input.entity_context.module.has_import("server")
        && call.is_property_access()
        && SFRA_METHODS.contains(&call.func_name().as_str())
        && call.num_args() >= 2;
    Ok(FeatureData::Flag(label))
}

fn imports_mock_server(input: &FeatureProviderInput<'_>) -> bool {
    input
        .entity_context
        .module
        .has_any_import(FALSE_POSITIVE_IMPORTS)
}

fn has_http_method_name(call: &ApiCallView<'_>) -> bool {
    let name = call.func_name().to_ascii_lowercase();
    HTTP_METHOD_NAMES.contains(&name.as_str())
}

/// `@Get()` / `@Post('/x')`: an HTTP verb decorator with no arguments or a
/// string path.
fn is_decorator_defined_api(call: &ApiCallView<'_>) -> bool {
    let args_fit = call
        .arguments()
        .first()
        .is_none_or(|first| first.kind == "string");
    has_http_method_name(call) && call.is_decorator() && args_fit
}

/// Every argument after the optional leading route is a function taking
/// between `min` and `max` parameters, and there is at least one.
fn has_handler_like_args(call: &ApiCallView<'_>, min: usize, max: usize, route_first: bool) -> bool {
    let skip = usize::from(route_first);
    let arities = call.argument_arities();
    let handlers = arities.get(skip..).unwrap_or(&[]);
    !handlers.is_empty()
        && handlers
            .iter()
            .all(|arity| arity.is_some_and(|arity| (min..=max).contains(&arity)))
}
