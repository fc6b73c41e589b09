//! Facts about the class enclosing the entity. Entities outside any class get
//! empty values.

use super::{FeatureData, FeatureProviderInput, capped_list, capped_text};
use crate::features::{Capability, CapabilityError, FeatureProvider};
use crate::syntax::outline::ClassInfo;

pub static CLASS_PROVIDERS: &[FeatureProvider] = &[
    FeatureProvider::new("ClassName", Capability::Any, class_name),
    FeatureProvider::new("HasClassName", Capability::Any, has_class_name),
    FeatureProvider::new("ClassDecorators", Capability::Any, class_decorators),
    FeatureProvider::new("HasClassDecorators", Capability::Any, has_class_decorators),
    FeatureProvider::new("IsAbstractClass", Capability::Any, is_abstract_class),
    FeatureProvider::new("ClassExtendedClassName", Capability::Any, extended_class_name),
    FeatureProvider::new("ClassImplementedInterfaces", Capability::Any, implemented_interfaces),
];

fn class<'a>(input: &'a FeatureProviderInput<'_>) -> Option<&'a ClassInfo> {
    input.entity_context.class.as_ref()
}

fn class_name(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    let name = class(input).map(|class| class.name.as_str()).unwrap_or("");
    Ok(capped_text(input, name))
}

fn has_class_name(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    Ok(FeatureData::Flag(
        class(input).is_some_and(|class| !class.name.is_empty()),
    ))
}

fn class_decorators(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    let decorators = class(input)
        .map(|class| class.decorators.as_slice())
        .unwrap_or(&[]);
    Ok(capped_list(input, decorators))
}

fn has_class_decorators(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    Ok(FeatureData::Flag(
        class(input).is_some_and(|class| !class.decorators.is_empty()),
    ))
}

fn is_abstract_class(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    Ok(FeatureData::Flag(class(input).is_some_and(|class| class.is_abstract)))
}

fn extended_class_name(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    let extends = class(input)
        .and_then(|class| class.extends.as_deref())
        .unwrap_or("");
    Ok(capped_text(input, extends))
}

fn implemented_interfaces(
    input: &FeatureProviderInput<'_>,
) -> Result<FeatureData, CapabilityError> {
    let implements = class(input)
        .map(|class| class.implements.as_slice())
        .unwrap_or(&[]);
    Ok(capped_list(input, implements))
}
