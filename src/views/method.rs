use super::EntityKey;
use crate::graphql;
use crate::syntax::ast::{self, node_text};
use crate::syntax::outline::ClassInfo;
use crate::syntax::resolve::Resolver;
use crate::syntax::{FileId, Project, SourceFile};
use crate::util;
use std::cell::OnceCell;
use tree_sitter::Node;

const AUTHENTICATION_MARKERS: &[&str] = &["authenticate(", "auth("];

/// A function-like declaration: method, function, function expression or arrow.
pub struct MethodView<'a> {
    project: &'a Project,
    file: FileId,
    node: Node<'a>,
    key: EntityKey,
    display: OnceCell<String>,
    calls: OnceCell<(Vec<String>, Vec<String>)>,
}

impl<'a> MethodView<'a> {
    pub fn new(project: &'a Project, file: FileId, node: Node<'a>) -> Self {
        let key = EntityKey::of(&project.file(file).rel_path, node);
        Self {
            project,
            file,
            node,
            key,
            display: OnceCell::new(),
            calls: OnceCell::new(),
        }
    }

    pub fn key(&self) -> &EntityKey {
        &self.key
    }

    pub fn node(&self) -> Node<'a> {
        self.node
    }

    pub fn source_file(&self) -> &'a SourceFile {
        self.project.file(self.file)
    }

    fn source(&self) -> &'a str {
        &self.source_file().source
    }

    /// `<kind> <Class>.<name>`, or `<kind> <name>` outside classes. Anonymous
    /// functions with no assigned name have an empty label.
    pub fn display_string(&self) -> &str {
        self.display.get_or_init(|| {
            let name = self.name();
            if name.is_empty() {
                return String::new();
            }
            match self.class_name() {
                Some(class) if !class.is_empty() => format!("{} {class}.{name}", self.kind()),
                _ => format!("{} {name}", self.kind()),
            }
        })
    }

    /// Declared name, or the name the function is assigned to.
    pub fn name(&self) -> String {
        let source = self.source();
        if let Some(name) = self.node.child_by_field_name("name") {
            return ast::property_key_name(name, source)
                .unwrap_or_else(|| node_text(name, source).to_string());
        }
        let Some(parent) = self.node.parent() else {
            return String::new();
        };
        match parent.kind() {
            "variable_declarator" => parent
                .child_by_field_name("name")
                .map(|name| node_text(name, source).to_string())
                .unwrap_or_default(),
            "pair" => parent
                .child_by_field_name("key")
                .and_then(|key| ast::property_key_name(key, source))
                .unwrap_or_default(),
            "public_field_definition" | "field_definition" => parent
                .child_by_field_name("name")
                .or_else(|| parent.child_by_field_name("property"))
                .and_then(|key| ast::property_key_name(key, source))
                .unwrap_or_default(),
            "assignment_expression" => parent
                .child_by_field_name("left")
                .map(|left| ast::last_segment(node_text(left, source)).to_string())
                .unwrap_or_default(),
            _ => String::new(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self.node.kind() {
            "method_definition" => {
                if self.name() == "constructor" {
                    "constructor"
                } else if self.has_keyword("get") {
                    "getter"
                } else if self.has_keyword("set") {
                    "setter"
                } else {
                    "method"
                }
            }
            "function_declaration" => "function",
            "generator_function_declaration" | "generator_function" => "generator",
            "function_expression" | "function" => "function_expression",
            "arrow_function" => "arrow_function",
            _ => "",
        }
    }

    pub fn class_name(&self) -> Option<String> {
        self.class().map(|class| class.name)
    }

    pub fn class(&self) -> Option<ClassInfo> {
        if self.node.kind() != "method_definition" {
            return None;
        }
        ClassInfo::enclosing(self.source_file(), self.node)
    }

    pub fn parameter_nodes(&self) -> Vec<Node<'a>> {
        ast::function_parameters(self.node)
    }

    pub fn parameter_names(&self) -> Vec<String> {
        let source = self.source();
        self.parameter_nodes()
            .into_iter()
            .map(|param| {
                let pattern = ast::parameter_pattern(param);
                util::collapse_whitespace(node_text(pattern, source))
            })
            .collect()
    }

    /// Type annotation per parameter, empty where none is written.
    pub fn parameter_types(&self) -> Vec<String> {
        let source = self.source();
        self.parameter_nodes()
            .into_iter()
            .map(|param| {
                param
                    .child_by_field_name("type")
                    .map(|annotation| ast::annotation_text(annotation, source))
                    .unwrap_or_default()
            })
            .collect()
    }

    pub fn return_type(&self) -> String {
        self.node
            .child_by_field_name("return_type")
            .map(|annotation| ast::annotation_text(annotation, self.source()))
            .unwrap_or_default()
    }

    pub fn is_async(&self) -> bool {
        self.has_keyword("async")
    }

    pub fn is_static(&self) -> bool {
        self.has_keyword("static")
    }

    /// `private` accessibility or a `#name`.
    pub fn is_private(&self) -> bool {
        let source = self.source();
        let private_name = self
            .node
            .child_by_field_name("name")
            .is_some_and(|name| name.kind() == "private_property_identifier");
        private_name
            || ast::named_children(self.node).into_iter().any(|child| {
                child.kind() == "accessibility_modifier" && node_text(child, source) == "private"
            })
    }

    pub fn decorators(&self) -> Vec<String> {
        let source = self.source();
        ast::decorator_nodes(self.node)
            .into_iter()
            .filter_map(|decorator| ast::decorator_name(decorator, source))
            .collect()
    }

    pub fn body(&self) -> Option<Node<'a>> {
        self.node.child_by_field_name("body")
    }

    /// Lines spanned by the body.
    pub fn body_length(&self) -> usize {
        self.body()
            .map(|body| body.end_position().row - body.start_position().row + 1)
            .unwrap_or(0)
    }

    pub fn contains_authentication(&self) -> bool {
        let Some(body) = self.body() else {
            return false;
        };
        let text = node_text(body, self.source());
        AUTHENTICATION_MARKERS
            .iter()
            .any(|marker| text.contains(marker))
    }

    /// Calls made directly from the body (nested functions excluded): entity keys
    /// of project functions they resolve to, and callee text of the rest.
    pub fn method_calls(&self) -> (&[String], &[String]) {
        let (internal, external) = self.calls.get_or_init(|| self.compute_calls());
        (internal.as_slice(), external.as_slice())
    }

    fn compute_calls(&self) -> (Vec<String>, Vec<String>) {
        let mut internal = Vec::new();
        let mut external = Vec::new();
        let Some(body) = self.body() else {
            return (internal, external);
        };
        let source = self.source();
        let resolver = Resolver::new(self.project);
        let mut stack = vec![body];
        let mut calls = Vec::new();
        while let Some(node) = stack.pop() {
            if node.kind() == "call_expression" {
                calls.push(node);
            }
            let mut children = ast::named_children(node);
            children.retain(|child| !ast::is_function_like(child.kind()));
            children.reverse();
            stack.extend(children);
        }
        for call in calls {
            let Some(callee) = ast::call_target_node(call) else {
                continue;
            };
            let entry = match resolver.resolve(self.file, callee).function() {
                Some(function) => {
                    let path = &self.project.file(function.file).rel_path;
                    (true, EntityKey::of(path, function.node).to_string())
                }
                None => (false, util::collapse_whitespace(node_text(callee, source))),
            };
            let target = if entry.0 { &mut internal } else { &mut external };
            if !target.contains(&entry.1) {
                target.push(entry.1);
            }
        }
        (internal, external)
    }

    /// TypeGraphQL operation this method resolves: decorator kind and
    /// GraphQL name.
    pub fn graphql_operation(&self) -> Option<(&'static str, String)> {
        graphql::resolver_operation(self.project, self.file, self.node)
    }

    fn has_keyword(&self, keyword: &str) -> bool {
        let name_start = self
            .node
            .child_by_field_name("name")
            .map(|name| name.start_byte())
            .or_else(|| self.node.child_by_field_name("parameters").map(|p| p.start_byte()))
            .unwrap_or(self.node.end_byte());
        let mut cursor = self.node.walk();
        let found = self
            .node
            .children(&mut cursor)
            .take_while(|child| child.start_byte() < name_start)
            .any(|child| !child.is_named() && child.kind() == keyword);
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::SourceParser;

    fn project(path: &str, source: &str) -> Project {
        let mut parser = SourceParser::new().unwrap();
        let mut project = Project::new("demo");
        project.add(parser.parse(path, source.to_string()).unwrap());
        project
    }

    fn methods(project: &Project) -> Vec<MethodView<'_>> {
        let file = FileId(0);
        ast::collect_nodes(project.file(file).root(), |n| ast::is_function_like(n.kind()))
            .into_iter()
            .map(|node| MethodView::new(project, file, node))
            .collect()
    }

    #[test]
    fn typescript_method_accessors() {
        let project = project(
            "users.ts",
            r#"
class UsersController {
    @Get(':id')
    private static async find(id: string, opts?: Options): Promise<User> {
        await this.guard.authenticate(id);
        return this.repo.load(id);
    }
}
"#,
        );
        let views = methods(&project);
        let view = &views[0];
        assert_eq!(view.name(), "find");
        assert_eq!(view.kind(), "method");
        assert_eq!(view.display_string(), "method UsersController.find");
        assert_eq!(view.parameter_names(), vec!["id", "opts"]);
        assert_eq!(view.parameter_types(), vec!["string", "Options"]);
        assert_eq!(view.return_type(), "Promise<User>");
        assert!(view.is_async());
        assert!(view.is_static());
        assert!(view.is_private());
        assert_eq!(view.decorators(), vec!["Get"]);
        assert_eq!(view.body_length(), 4);
        assert!(view.contains_authentication());
        let (internal, external) = view.method_calls();
        assert!(internal.is_empty());
        assert_eq!(external, ["this.guard.authenticate", "this.repo.load"]);
    }

    #[test]
    fn javascript_function_kinds_and_internal_calls() {
        let project = project(
            "svc.js",
            r#"
function helper(x) { return x; }
const handler = async (req, res) => { helper(req); res.send(helper(1)); };
module.exports.other = function (a) { return [1].map((v) => v); };
class A { get value() { return 1; } set value(v) {} constructor(db) {} }
"#,
        );
        let views = methods(&project);
        let names: Vec<(String, &str)> = views.iter().map(|v| (v.name(), v.kind())).collect();
        assert_eq!(
            names,
            vec![
                ("helper".to_string(), "function"),
                ("handler".to_string(), "arrow_function"),
                ("other".to_string(), "function_expression"),
                ("".to_string(), "arrow_function"),
                ("value".to_string(), "getter"),
                ("value".to_string(), "setter"),
                ("constructor".to_string(), "constructor"),
            ]
        );
        let handler = &views[1];
        assert!(handler.is_async());
        let (internal, external) = handler.method_calls();
        assert_eq!(internal, [views[0].key().to_string()]);
        assert_eq!(external, ["res.send"]);
        assert_eq!(views[3].display_string(), "");
        assert_eq!(views[6].display_string(), "constructor A.constructor");
    }
}
