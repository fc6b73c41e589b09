use crate::syntax::outline::{ClassInfo, ModuleInfo};
use crate::views::{DataModelKind, EntityView};
use std::sync::Arc;

/// Ambient data for one entity's extraction, built once by the caller.
#[derive(Debug, Clone)]
pub struct FeaturesEntityContext {
    pub path: String,
    pub correlation_id: String,
    /// Imports of the entity's file, shared by every entity of that file.
    pub module: Arc<ModuleInfo>,
    /// The class the entity is declared in; a class data model is its own class.
    pub class: Option<ClassInfo>,
}

impl FeaturesEntityContext {
    pub fn new(
        path: impl Into<String>,
        correlation_id: impl Into<String>,
        module: Arc<ModuleInfo>,
    ) -> Self {
        Self {
            path: path.into(),
            correlation_id: correlation_id.into(),
            module,
            class: None,
        }
    }

    pub fn with_class(mut self, class: Option<ClassInfo>) -> Self {
        self.class = class;
        self
    }

    /// Context for `view`, with the enclosing class looked up from its node.
    pub fn for_entity(
        view: &EntityView<'_>,
        correlation_id: impl Into<String>,
        module: Arc<ModuleInfo>,
    ) -> Self {
        let (path, class) = match view {
            EntityView::Method(method) => (method.source_file().rel_path.clone(), method.class()),
            EntityView::ApiCall(call) => {
                let file = call.source_file();
                (file.rel_path.clone(), ClassInfo::enclosing(file, call.node()))
            }
            EntityView::DataModel(model) => {
                let file = model.source_file();
                let class = match model.kind() {
                    DataModelKind::Typeorm | DataModelKind::Class => {
                        Some(ClassInfo::from_node(model.node(), &file.source))
                    }
                    _ => ClassInfo::enclosing(file, model.node()),
                };
                (file.rel_path.clone(), class)
            }
        };
        Self::new(path, correlation_id, module).with_class(class)
    }
}
