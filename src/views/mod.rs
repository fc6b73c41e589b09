//! Typed, read-only views over the syntactic constructs features are computed for.

mod api_call;
mod collect;
mod data_model;
mod method;

pub use api_call::{ArgumentInfo, ApiCallView, SiblingCounts};
pub use collect::{collect_api_calls, collect_data_models, collect_methods};
pub use data_model::{DataModelKind, DataModelView};
pub use method::MethodView;

use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tree_sitter::Node;

/// What a view can be asked for. Providers declare the capability they need;
/// `Any` is satisfied by every view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Capability {
    Any,
    Method,
    ApiCall,
    DataModel,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Any => "any",
            Capability::Method => "method",
            Capability::ApiCall => "api_call",
            Capability::DataModel => "data_model",
        }
    }

    /// Whether a view offering `self` can serve a provider requiring `required`.
    pub fn satisfies(self, required: Capability) -> bool {
        required == Capability::Any || self == required
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("entity view offers `{actual}` but `{required}` was required")]
pub struct CapabilityError {
    pub required: Capability,
    pub actual: Capability,
}

/// Source location identifying an entity; rows and columns are 0-based.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EntityKey {
    pub path: String,
    pub start_line: usize,
    pub start_col: usize,
    pub end_line: usize,
    pub end_col: usize,
}

impl EntityKey {
    pub fn of(path: &str, node: Node<'_>) -> Self {
        let start = node.start_position();
        let end = node.end_position();
        Self {
            path: path.to_string(),
            start_line: start.row,
            start_col: start.column,
            end_line: end.row,
            end_col: end.column,
        }
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}+{}+{}+{}+{}",
            self.path, self.start_line, self.start_col, self.end_line, self.end_col
        )
    }
}

pub enum EntityView<'a> {
    Method(MethodView<'a>),
    ApiCall(ApiCallView<'a>),
    DataModel(DataModelView<'a>),
}

impl<'a> EntityView<'a> {
    pub fn capability(&self) -> Capability {
        match self {
            EntityView::Method(_) => Capability::Method,
            EntityView::ApiCall(_) => Capability::ApiCall,
            EntityView::DataModel(_) => Capability::DataModel,
        }
    }

    pub fn key(&self) -> &EntityKey {
        match self {
            EntityView::Method(view) => view.key(),
            EntityView::ApiCall(view) => view.key(),
            EntityView::DataModel(view) => view.key(),
        }
    }

    pub fn display_string(&self) -> &str {
        match self {
            EntityView::Method(view) => view.display_string(),
            EntityView::ApiCall(view) => view.display_string(),
            EntityView::DataModel(view) => view.display_string(),
        }
    }

    pub fn node(&self) -> Node<'a> {
        match self {
            EntityView::Method(view) => view.node(),
            EntityView::ApiCall(view) => view.node(),
            EntityView::DataModel(view) => view.node(),
        }
    }

    pub fn method(&self) -> Result<&MethodView<'a>, CapabilityError> {
        match self {
            EntityView::Method(view) => Ok(view),
            other => Err(CapabilityError {
                required: Capability::Method,
                actual: other.capability(),
            }),
        }
    }

    pub fn api_call(&self) -> Result<&ApiCallView<'a>, CapabilityError> {
        match self {
            EntityView::ApiCall(view) => Ok(view),
            other => Err(CapabilityError {
                required: Capability::ApiCall,
                actual: other.capability(),
            }),
        }
    }

    pub fn data_model(&self) -> Result<&DataModelView<'a>, CapabilityError> {
        match self {
            EntityView::DataModel(view) => Ok(view),
            other => Err(CapabilityError {
                required: Capability::DataModel,
                actual: other.capability(),
            }),
        }
    }
}

impl<'a> From<MethodView<'a>> for EntityView<'a> {
    fn from(view: MethodView<'a>) -> Self {
        EntityView::Method(view)
    }
}

impl<'a> From<ApiCallView<'a>> for EntityView<'a> {
    fn from(view: ApiCallView<'a>) -> Self {
        EntityView::ApiCall(view)
    }
}

impl<'a> From<DataModelView<'a>> for EntityView<'a> {
    fn from(view: DataModelView<'a>) -> Self {
        EntityView::DataModel(view)
    }
}
