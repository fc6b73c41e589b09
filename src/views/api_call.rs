use super::EntityKey;
use crate::routes::{self, HTTP_METHOD_NAMES};
use crate::syntax::ast::{self, call_arguments, call_target_node, node_text};
use crate::syntax::resolve::Resolver;
use crate::syntax::{FileId, Project, SourceFile};
use crate::util;
use serde::Serialize;
use std::cell::OnceCell;
use tree_sitter::Node;

const APP_FRAMEWORK_METHODS: &[&str] = &["use", "listen", "route", "param", "set", "engine"];
const EXTRA_HTTP_NAMES: &[&str] = &["all", "del"];
/// Class decorators whose path prefixes every verb decorator in the class.
const CONTROLLER_DECORATORS: &[&str] = &["Controller", "JsonController"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArgumentInfo {
    /// Syntax node kind; folded `+` concatenations report `template_string`.
    pub kind: String,
    /// Literal value, or the string constant an identifier resolves to; empty
    /// otherwise.
    pub value: String,
}

/// Calls made on the same receiver text in the same file, this call excluded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SiblingCounts {
    pub http_methods: usize,
    pub app_framework_methods: usize,
    pub other_methods: usize,
}

/// A call expression suspected of declaring or invoking a network API.
pub struct ApiCallView<'a> {
    project: &'a Project,
    file: FileId,
    node: Node<'a>,
    key: EntityKey,
    display: OnceCell<String>,
    arguments: OnceCell<Vec<ArgumentInfo>>,
    route: OnceCell<String>,
    siblings: OnceCell<SiblingCounts>,
    referenced: OnceCell<(Vec<String>, Vec<String>)>,
    origin: OnceCell<String>,
}

impl<'a> ApiCallView<'a> {
    pub fn new(project: &'a Project, file: FileId, node: Node<'a>) -> Self {
        let key = EntityKey::of(&project.file(file).rel_path, node);
        Self {
            project,
            file,
            node,
            key,
            display: OnceCell::new(),
            arguments: OnceCell::new(),
            route: OnceCell::new(),
            siblings: OnceCell::new(),
            referenced: OnceCell::new(),
            origin: OnceCell::new(),
        }
    }

    pub fn key(&self) -> &EntityKey {
        &self.key
    }

    pub fn node(&self) -> Node<'a> {
        self.node
    }

    pub fn file_id(&self) -> FileId {
        self.file
    }

    pub fn source_file(&self) -> &'a SourceFile {
        self.project.file(self.file)
    }

    fn text(&self, node: Node<'_>) -> &'a str {
        node_text(node, &self.source_file().source)
    }

    fn callee(&self) -> Option<Node<'a>> {
        call_target_node(self.node)
    }

    /// Whole call text on one line.
    pub fn display_string(&self) -> &str {
        self.display
            .get_or_init(|| util::collapse_whitespace(self.text(self.node)))
    }

    /// Callee text, `app.get` for `app.get('/x', h)`.
    pub fn full_name(&self) -> String {
        self.callee()
            .map(|callee| util::collapse_whitespace(self.text(callee)))
            .unwrap_or_default()
    }

    /// Last segment of the callee, `get` for `app.get(..)`.
    pub fn func_name(&self) -> String {
        let Some(callee) = self.callee() else {
            return String::new();
        };
        match ast::member_object_and_property(callee, &self.source_file().source) {
            Some((_, property)) => property,
            None => ast::last_segment(self.text(callee)).to_string(),
        }
    }

    pub fn is_property_access(&self) -> bool {
        self.callee()
            .is_some_and(|callee| ast::is_member_access(callee.kind()))
    }

    pub fn owner_node(&self) -> Option<Node<'a>> {
        let callee = self.callee()?;
        ast::member_object_and_property(callee, &self.source_file().source)
            .map(|(object, _)| object)
    }

    /// Receiver text, `this.router` for `this.router.get(..)`.
    pub fn owner_text(&self) -> String {
        self.owner_node()
            .map(|owner| util::collapse_whitespace(self.text(owner)))
            .unwrap_or_default()
    }

    pub fn is_decorator(&self) -> bool {
        self.node
            .parent()
            .is_some_and(|parent| parent.kind() == "decorator")
    }

    pub fn is_parenthesized(&self) -> bool {
        self.node
            .parent()
            .is_some_and(|parent| parent.kind() == "parenthesized_expression")
    }

    pub fn argument_nodes(&self) -> Vec<Node<'a>> {
        call_arguments(self.node)
    }

    pub fn arguments(&self) -> &[ArgumentInfo] {
        self.arguments.get_or_init(|| {
            let resolver = Resolver::new(self.project);
            self.argument_nodes()
                .into_iter()
                .map(|arg| self.argument_info(&resolver, arg))
                .collect()
        })
    }

    fn argument_info(&self, resolver: &Resolver<'a>, arg: Node<'a>) -> ArgumentInfo {
        let stripped = ast::strip_wrappers(arg);
        let kind = stripped.kind();
        let value = match kind {
            "binary_expression" => match resolver.constant_string(self.file, stripped) {
                Some(value) => {
                    return ArgumentInfo {
                        kind: "template_string".to_string(),
                        value,
                    };
                }
                None => String::new(),
            },
            "string" | "template_string" | "identifier" | "member_expression" => resolver
                .constant_string(self.file, stripped)
                .unwrap_or_default(),
            "number" | "true" | "false" | "null" | "regex" => self.text(stripped).to_string(),
            _ => String::new(),
        };
        ArgumentInfo {
            kind: kind.to_string(),
            value,
        }
    }

    pub fn num_args(&self) -> usize {
        self.arguments().len()
    }

    /// First argument folded to a string constant, when it is one.
    pub fn first_arg_string(&self) -> Option<String> {
        let first = self.argument_nodes().into_iter().next()?;
        Resolver::new(self.project).constant_string(self.file, first)
    }

    /// Upper-cased verb when the callee name is a route-registration verb.
    pub fn suspected_api_method(&self) -> String {
        let name = self.func_name();
        let lower = name.to_ascii_lowercase();
        if !HTTP_METHOD_NAMES.contains(&lower.as_str()) && lower != "all" {
            return String::new();
        }
        routes::normalize_method(&name).unwrap_or_default()
    }

    /// Route the call points at, in order of preference:
    /// - a verb decorator inside a controller class: controller path joined with
    ///   the decorator path (`@Controller('cats')` + `@Get(':id')` → `/cats/:id`);
    /// - the first argument folded to a string;
    /// - the path of a chained `.route(path)` receiver.
    ///
    /// Anything that is not route-like gives `""`. The callee name is not
    /// checked; `suspected_api_method` carries that.
    pub fn suspected_api_route(&self) -> String {
        self.route
            .get_or_init(|| {
                let route = match self.controller_prefix() {
                    Some(prefix) => {
                        routes::join_route(&prefix, &self.first_arg_string().unwrap_or_default())
                    }
                    None => self
                        .first_arg_string()
                        .filter(|first| routes::is_route_like(first))
                        .unwrap_or_else(|| self.root_route()),
                };
                if routes::is_route_like(&route) {
                    route
                } else {
                    String::new()
                }
            })
            .clone()
    }

    pub fn normalized_route(&self) -> String {
        routes::normalize_route(&self.suspected_api_route()).unwrap_or_default()
    }

    pub fn route_parameters(&self) -> Vec<String> {
        routes::extract_route_parameters(&self.suspected_api_route())
    }

    /// Path of a chained `.route(path)` receiver, `/books` for
    /// `app.route('/books').get(h)` and for every verb chained after it
    /// (`app.route('/books').get(a).post(b)`).
    pub fn root_route(&self) -> String {
        let source = &self.source_file().source;
        let mut current = self.owner_node();
        while let Some(owner) = current.map(ast::strip_wrappers) {
            if owner.kind() != "call_expression" {
                break;
            }
            let Some((object, property)) = call_target_node(owner)
                .and_then(|callee| ast::member_object_and_property(callee, source))
            else {
                break;
            };
            if property == "route" {
                return call_arguments(owner)
                    .into_iter()
                    .next()
                    .and_then(|first| {
                        Resolver::new(self.project).constant_string(self.file, first)
                    })
                    .unwrap_or_default();
            }
            let method = property.to_ascii_lowercase();
            if !HTTP_METHOD_NAMES.contains(&method.as_str())
                && !EXTRA_HTTP_NAMES.contains(&method.as_str())
            {
                break;
            }
            current = Some(object);
        }
        String::new()
    }

    /// Path given to the enclosing class's `@Controller(..)` when this call is an
    /// HTTP verb decorator inside it; `""` for a controller without a path.
    pub fn controller_prefix(&self) -> Option<String> {
        if !self.is_decorator() || self.suspected_api_method().is_empty() {
            return None;
        }
        let source = &self.source_file().source;
        let class = ast::ancestors(self.node).find(|parent| ast::is_class_like(parent.kind()))?;
        let controller = ast::decorator_nodes(class).into_iter().find(|decorator| {
            ast::decorator_name(*decorator, source)
                .is_some_and(|name| CONTROLLER_DECORATORS.contains(&name.as_str()))
        })?;
        let first = controller
            .named_child(0)
            .filter(|call| call.kind() == "call_expression")
            .and_then(|call| call_arguments(call).into_iter().next());
        let Some(first) = first.map(ast::strip_wrappers) else {
            return Some(String::new());
        };
        let resolver = Resolver::new(self.project);
        // `@Controller({ path: 'cats' })`
        let path = if first.kind() == "object" {
            ast::named_children(first)
                .into_iter()
                .filter(|member| member.kind() == "pair")
                .find(|pair| {
                    pair.child_by_field_name("key")
                        .and_then(|key| ast::property_key_name(key, source))
                        .is_some_and(|key| key == "path")
                })
                .and_then(|pair| pair.child_by_field_name("value"))
                .and_then(|value| resolver.constant_string(self.file, value))
        } else {
            resolver.constant_string(self.file, first)
        };
        Some(path.unwrap_or_default())
    }

    pub fn siblings(&self) -> SiblingCounts {
        *self.siblings.get_or_init(|| self.compute_siblings())
    }

    fn compute_siblings(&self) -> SiblingCounts {
        let mut counts = SiblingCounts::default();
        let owner = self.owner_text();
        if owner.is_empty() {
            return counts;
        }
        let file = self.source_file();
        let calls = ast::collect_nodes(file.root(), |node| node.kind() == "call_expression");
        for call in calls {
            if call.id() == self.node.id() {
                continue;
            }
            let Some(callee) = call_target_node(call) else {
                continue;
            };
            let Some((object, method)) = ast::member_object_and_property(callee, &file.source)
            else {
                continue;
            };
            if util::collapse_whitespace(file.text(object)) != owner {
                continue;
            }
            let method = method.to_ascii_lowercase();
            if HTTP_METHOD_NAMES.contains(&method.as_str())
                || EXTRA_HTTP_NAMES.contains(&method.as_str())
            {
                counts.http_methods += 1;
            } else if APP_FRAMEWORK_METHODS.contains(&method.as_str()) {
                counts.app_framework_methods += 1;
            } else {
                counts.other_methods += 1;
            }
        }
        counts
    }

    /// Functions passed as arguments (arrays flattened): entity keys of those
    /// declared in the project, and names of those that are not.
    pub fn referenced_methods(&self) -> (&[String], &[String]) {
        let (internal, external) = self.referenced.get_or_init(|| self.compute_referenced());
        (internal.as_slice(), external.as_slice())
    }

    fn compute_referenced(&self) -> (Vec<String>, Vec<String>) {
        let resolver = Resolver::new(self.project);
        let file = self.source_file();
        let mut internal = Vec::new();
        let mut external = Vec::new();
        let mut pending = self.argument_nodes();
        pending.reverse();
        while let Some(arg) = pending.pop() {
            let arg = ast::strip_wrappers(arg);
            match arg.kind() {
                "array" => {
                    let mut elements = ast::named_children(arg);
                    elements.reverse();
                    pending.extend(elements);
                }
                kind if ast::is_function_like(kind) => {
                    internal.push(EntityKey::of(&file.rel_path, arg).to_string());
                }
                "identifier" | "member_expression" => {
                    match resolver.resolve(self.file, arg).function() {
                        Some(function) => {
                            let path = &self.project.file(function.file).rel_path;
                            internal.push(EntityKey::of(path, function.node).to_string());
                        }
                        None => external.push(util::collapse_whitespace(file.text(arg))),
                    }
                }
                _ => {}
            }
        }
        (internal, external)
    }

    /// External module the receiver (or, for plain calls, the callee) comes from.
    pub fn receiver_origin(&self) -> &str {
        self.origin.get_or_init(|| {
            let target = self.owner_node().or_else(|| self.callee());
            let Some(target) = target else {
                return String::new();
            };
            Resolver::new(self.project)
                .framework_origin(self.file, target)
                .unwrap_or_default()
        })
    }

    /// Parameter counts of function-valued arguments, `None` for the others.
    pub fn argument_arities(&self) -> Vec<Option<usize>> {
        let resolver = Resolver::new(self.project);
        self.argument_nodes()
            .into_iter()
            .map(|arg| resolver.function_arity(self.file, arg))
            .collect()
    }
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

    fn first_call(project: &Project) -> ApiCallView<'_> {
        let file = FileId(0);
        let call = ast::collect_nodes(project.file(file).root(), |n| n.kind() == "call_expression")
            [0];
        ApiCallView::new(project, file, call)
    }

    #[test]
    fn route_registration_accessors() {
        let project = project("app.get('/users/:id', auth, (req, res) => res.send(1));");
        let view = first_call(&project);
        assert_eq!(view.full_name(), "app.get");
        assert_eq!(view.func_name(), "get");
        assert_eq!(view.owner_text(), "app");
        assert_eq!(view.suspected_api_method(), "GET");
        assert_eq!(view.suspected_api_route(), "/users/:id");
        assert_eq!(view.normalized_route(), "/users/{}");
        assert_eq!(view.route_parameters(), vec!["id"]);
        assert_eq!(view.num_args(), 3);
        assert_eq!(view.arguments()[0].kind, "string");
        assert_eq!(view.arguments()[2].kind, "arrow_function");
        let (internal, external) = view.referenced_methods();
        assert_eq!(internal.len(), 1);
        assert_eq!(external, ["auth".to_string()]);
    }

    #[test]
    fn non_verb_calls_have_no_suspected_method() {
        let project = project("client.fetchAll('with some args');");
        let view = first_call(&project);
        assert_eq!(view.suspected_api_method(), "");
        assert_eq!(view.suspected_api_route(), "");
        assert_eq!(view.first_arg_string().as_deref(), Some("with some args"));
        assert!(view.route_parameters().is_empty());
        assert_eq!(view.normalized_route(), "");
    }

    #[test]
    fn display_string_is_stable() {
        let project = project("router.post(\n  '/foo/base',\n  create\n);");
        let view = first_call(&project);
        let first = view.display_string().to_string();
        assert_eq!(first, "router.post( '/foo/base', create )");
        assert_eq!(view.display_string(), first);
    }

    #[test]
    fn siblings_count_calls_on_same_receiver() {
        let project = project(
            "app.use(json());\napp.get('/a', a);\napp.post('/b', b);\napp.custom(1);\nother.get('/c', c);",
        );
        let view = first_call(&project);
        assert_eq!(view.full_name(), "app.use");
        assert_eq!(
            view.siblings(),
            SiblingCounts {
                http_methods: 2,
                app_framework_methods: 0,
                other_methods: 1,
            }
        );
    }

    #[test]
    fn chained_route_receiver() {
        let project = project("app.route('/books').get(list);");
        let call = ast::collect_nodes(project.file(FileId(0)).root(), |n| {
            n.kind() == "call_expression"
        })
        .into_iter()
        .map(|node| ApiCallView::new(&project, FileId(0), node))
        .find(|view| view.func_name() == "get")
        .unwrap();
        assert_eq!(call.root_route(), "/books");
        assert_eq!(call.owner_text(), "app.route('/books')");
        assert_eq!(call.suspected_api_method(), "GET");
        assert_eq!(call.suspected_api_route(), "/books");
        assert_eq!(call.normalized_route(), "/books");
    }

    #[test]
    fn routes_fold_constants() {
        let project = project(
            "const routePrefix = '/api/v1';\napp.route(routePrefix + '/stringConcat').post(h);\napp.route(`${routePrefix}/stringTemplate`).post(h);\napp.get(routePrefix + '/users/:id', h);",
        );
        let routes: Vec<String> = ast::collect_nodes(project.file(FileId(0)).root(), |n| {
            n.kind() == "call_expression"
        })
        .into_iter()
        .map(|node| ApiCallView::new(&project, FileId(0), node))
        .filter(|view| !view.suspected_api_method().is_empty())
        .map(|view| view.suspected_api_route())
        .collect();
        assert_eq!(
            routes,
            vec!["/api/v1/stringConcat", "/api/v1/stringTemplate", "/api/v1/users/:id"]
        );
    }

    #[test]
    fn non_route_strings_are_not_routes() {
        let project = project("const express = require('express');\nres.send('x');\nlog.info('/tmp is full');");
        let routes: Vec<String> = ast::collect_nodes(project.file(FileId(0)).root(), |n| {
            n.kind() == "call_expression"
        })
        .into_iter()
        .map(|node| ApiCallView::new(&project, FileId(0), node).suspected_api_route())
        .collect();
        assert_eq!(routes, vec!["", "", ""]);
    }

    #[test]
    fn concatenated_arguments_fold() {
        let project = project("api.get('/v1' + '/items', list, 3);");
        let view = first_call(&project);
        assert_eq!(view.arguments()[0].kind, "template_string");
        assert_eq!(view.arguments()[0].value, "/v1/items");
        assert_eq!(view.arguments()[2].value, "3");
        assert_eq!(view.argument_arities(), vec![None, None, None]);
    }
}
