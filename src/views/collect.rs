use super::{ApiCallView, DataModelView, MethodView};
use crate::routes;
use crate::syntax::ast;
use crate::syntax::outline::ModuleInfo;
use crate::syntax::{FileId, Project};
use tracing::trace;

/// Every call expression of the file in source order, minus logging calls and
/// argument-less calls that are not HTTP verbs.
pub fn collect_api_calls(project: &Project, file: FileId) -> Vec<ApiCallView<'_>> {
    let source_file = project.file(file);
    let nodes = ast::collect_nodes(source_file.root(), |node| node.kind() == "call_expression");
    let mut views = Vec::with_capacity(nodes.len());
    for node in nodes {
        let view = ApiCallView::new(project, file, node);
        if dismiss_api_call(&view) {
            trace!(entity = %view.key(), "dismissed call expression");
            continue;
        }
        views.push(view);
    }
    views
}

/// Every function-like declaration of the file in source order, minus those
/// without parameters.
pub fn collect_methods(project: &Project, file: FileId) -> Vec<MethodView<'_>> {
    let source_file = project.file(file);
    ast::collect_nodes(source_file.root(), |node| ast::is_function_like(node.kind()))
        .into_iter()
        .filter(|node| !ast::function_parameters(*node).is_empty())
        .map(|node| MethodView::new(project, file, node))
        .collect()
}

/// Data model declarations of the file in source order: model-defining calls,
/// classes and constructor functions.
pub fn collect_data_models<'a>(
    project: &'a Project,
    file: FileId,
    module: &ModuleInfo,
) -> Vec<DataModelView<'a>> {
    let source_file = project.file(file);
    ast::collect_nodes(source_file.root(), |node| {
        let kind = node.kind();
        kind == "call_expression"
            || ast::is_class_like(kind)
            || matches!(kind, "function_declaration" | "function_expression" | "function")
    })
    .into_iter()
    .filter_map(|node| DataModelView::detect(project, file, node, module))
    .inspect(|view| trace!(entity = %view.key(), kind = view.kind().as_str(), "data model"))
    .collect()
}

fn dismiss_api_call(view: &ApiCallView<'_>) -> bool {
    if view.full_name().starts_with("console.") {
        return true;
    }
    view.argument_nodes().is_empty() && !routes::is_http_method_name(&view.func_name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::SourceParser;

    fn project(source: &str) -> Project {
        let mut parser = SourceParser::new().unwrap();
        let mut project = Project::new("demo");
        project.add(parser.parse("app.js", source.to_string()).unwrap());
        project
    }

    #[test]
    fn dismisses_console_and_empty_calls() {
        let project = project(
            "console.log('x');\nconst app = express();\napp.get('/a', h);\nrouter.get();\nstart(app);",
        );
        let views = collect_api_calls(&project, FileId(0));
        let names: Vec<String> = views.iter().map(|v| v.full_name()).collect();
        assert_eq!(names, vec!["app.get", "router.get", "start"]);
    }

    #[test]
    fn data_models_come_in_source_order() {
        let project = project(
            "function Point(x, y) { this.x = x; this.y = y; }\nconst Tag = sequelize.define('Tag', { label: DataTypes.STRING });\nclass Box { constructor(w) { this.w = w; } }\nfunction helper(a) { return a; }",
        );
        let module = ModuleInfo::collect(project.file(FileId(0)));
        let views = collect_data_models(&project, FileId(0), &module);
        let names: Vec<String> = views.iter().map(|v| v.display_string().to_string()).collect();
        assert_eq!(
            names,
            vec!["constructor_function Point", "sequelize_define Tag", "class Box"]
        );
    }

    #[test]
    fn methods_without_parameters_are_dismissed() {
        let project = project("function a() {}\nfunction b(x) {}\nconst c = () => 1;\nconst d = y => y;");
        let views = collect_methods(&project, FileId(0));
        let names: Vec<String> = views.iter().map(|v| v.name()).collect();
        assert_eq!(names, vec!["b", "d"]);
    }
}
