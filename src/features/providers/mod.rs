//! Stock provider lists. Each list is a static slice of registration records;
//! extractors are composed by concatenating lists.

mod api_call;
mod class;
mod common;
mod data_model;
mod labels;
mod method;

pub use api_call::API_CALL_PROVIDERS;
pub use class::CLASS_PROVIDERS;
pub use common::{COMMON_PROVIDERS, is_test_file};
pub use data_model::DATA_MODEL_PROVIDERS;
pub use labels::{API_LABEL_PREFIX, API_LABEL_PROVIDERS};
pub use method::METHOD_PROVIDERS;

use super::{FeatureData, FeatureProviderInput};
use crate::config::Config;
use crate::util;
use tracing::debug;

/// Text value capped to the configured byte length.
fn capped_text(input: &FeatureProviderInput<'_>, value: &str) -> FeatureData {
    FeatureData::Text(cap_string(input, value))
}

fn capped_list<I, S>(input: &FeatureProviderInput<'_>, values: I) -> FeatureData
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    FeatureData::List(
        values
            .into_iter()
            .map(|value| cap_string(input, value.as_ref()))
            .collect(),
    )
}

fn cap_string(input: &FeatureProviderInput<'_>, value: &str) -> String {
    let max = Config::get().max_string_len;
    if value.len() <= max {
        return value.to_string();
    }
    input.logger.in_scope(|| {
        debug!(len = value.len(), max, "string feature value truncated");
    });
    util::truncate_str_bytes(value, max)
}
