//! TypeGraphQL schema declarations: `@ObjectType` classes with their `@Field`
//! members and `@Resolver` classes with their operation handlers.
//!
//! Types written as a project class reference the class by entity key until
//! [`link`] replaces them with the object type name declared for that class.

use crate::syntax::ast::{self, call_arguments, node_text, string_value};
use crate::syntax::resolve::Resolver;
use crate::syntax::{FileId, Project};
use crate::views::EntityKey;
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;
use tree_sitter::Node;

const OBJECT_TYPE_DECORATOR: &str = "ObjectType";
const FIELD_DECORATOR: &str = "Field";
const RESOLVER_DECORATOR: &str = "Resolver";
const FIELD_RESOLVER_DECORATOR: &str = "FieldResolver";
const NAME_OPTION: &str = "name";
const IMPLEMENTS_OPTION: &str = "implements";
const PRIMITIVE_TYPES: &[&str] = &["ID", "Int", "Float", "String", "Boolean"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GqlOperationType {
    Query,
    Mutation,
    Subscription,
}

impl GqlOperationType {
    pub const ALL: [GqlOperationType; 3] = [
        GqlOperationType::Query,
        GqlOperationType::Mutation,
        GqlOperationType::Subscription,
    ];

    /// Decorator marking a resolver method, also the name of the implicit
    /// top-level type.
    pub fn as_str(&self) -> &'static str {
        match self {
            GqlOperationType::Query => "Query",
            GqlOperationType::Mutation => "Mutation",
            GqlOperationType::Subscription => "Subscription",
        }
    }
}

/// A GraphQL type expression. Serialized in SDL-like form: `Int`, `[User]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GqlTypeRef {
    Named(String),
    List(Box<GqlTypeRef>),
    /// A project class; `name` is filled in by [`link`].
    Class {
        target: EntityKey,
        name: Option<String>,
    },
}

impl GqlTypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        GqlTypeRef::Named(name.into())
    }

    pub fn list(element: GqlTypeRef) -> Self {
        GqlTypeRef::List(Box::new(element))
    }

    /// Name of the innermost type, when known.
    pub fn essential_name(&self) -> Option<&str> {
        match self {
            GqlTypeRef::Named(name) => Some(name),
            GqlTypeRef::List(element) => element.essential_name(),
            GqlTypeRef::Class { name, .. } => name.as_deref(),
        }
    }

    fn resolve(&mut self, names: &HashMap<EntityKey, String>) {
        match self {
            GqlTypeRef::Named(_) => {}
            GqlTypeRef::List(element) => element.resolve(names),
            GqlTypeRef::Class { target, name } => {
                if let Some(found) = names.get(target) {
                    *name = Some(found.clone());
                }
            }
        }
    }
}

impl fmt::Display for GqlTypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GqlTypeRef::Named(name) => f.write_str(name),
            GqlTypeRef::List(element) => write!(f, "[{element}]"),
            GqlTypeRef::Class {
                name: Some(name), ..
            } => f.write_str(name),
            GqlTypeRef::Class { target, name: None } => write!(f, "<{target}>"),
        }
    }
}

impl Serialize for GqlTypeRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GqlField {
    pub code_reference: EntityKey,
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: GqlTypeRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolver_reference: Option<EntityKey>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GqlObjectType {
    pub code_reference: EntityKey,
    pub name: String,
    pub fields: Vec<GqlField>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<GqlTypeRef>,
}

impl GqlObjectType {
    pub fn field(&self, name: &str) -> Option<&GqlField> {
        self.fields.iter().find(|field| field.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GqlResolverSnippet {
    pub code_reference: EntityKey,
    /// `None` for field resolvers.
    pub operation_type: Option<GqlOperationType>,
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: GqlTypeRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GqlResolverClass {
    pub code_reference: EntityKey,
    pub target_type: Option<GqlTypeRef>,
    pub resolvers: Vec<GqlResolverSnippet>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "declaration", rename_all = "snake_case")]
pub enum GqlDeclaration {
    ObjectType(GqlObjectType),
    ResolverClass(GqlResolverClass),
}

impl GqlDeclaration {
    pub fn as_object_type(&self) -> Option<&GqlObjectType> {
        match self {
            GqlDeclaration::ObjectType(object) => Some(object),
            GqlDeclaration::ResolverClass(_) => None,
        }
    }

    pub fn as_resolver_class(&self) -> Option<&GqlResolverClass> {
        match self {
            GqlDeclaration::ResolverClass(resolver) => Some(resolver),
            GqlDeclaration::ObjectType(_) => None,
        }
    }
}

/// Declarations of every file, linked.
pub fn extract_project(project: &Project) -> Vec<GqlDeclaration> {
    let mut declarations: Vec<GqlDeclaration> = project
        .files()
        .flat_map(|(file, _)| extract_file(project, file))
        .collect();
    link(&mut declarations);
    declarations
}

/// Object types and resolver classes declared in `file`, followed by the
/// implicit `Query`, `Mutation` and `Subscription` types its resolvers add to.
/// Class references are left unlinked.
pub fn extract_file(project: &Project, file: FileId) -> Vec<GqlDeclaration> {
    let extractor = TypeExtractor {
        project,
        file,
        source: project.file(file).source.as_str(),
        resolver: Resolver::new(project),
    };
    let root = project.file(file).root();
    let mut declarations = Vec::new();
    for class in ast::collect_nodes(root, |node| ast::is_class_like(node.kind())) {
        if let Some(object) = extractor.object_type(class) {
            declarations.push(GqlDeclaration::ObjectType(object));
        }
        if let Some(resolver) = extractor.resolver_class(class) {
            declarations.push(GqlDeclaration::ResolverClass(resolver));
        }
    }
    let implicit = implicit_operation_types(&extractor.key(root), &declarations);
    declarations.extend(implicit.into_iter().map(GqlDeclaration::ObjectType));
    if !declarations.is_empty() {
        debug!(
            path = %project.file(file).rel_path,
            declarations = declarations.len(),
            "graphql declarations"
        );
    }
    declarations
}

/// Replace class references with object type names and point fields at the
/// field resolvers written for them.
pub fn link(declarations: &mut [GqlDeclaration]) {
    let names: HashMap<EntityKey, String> = declarations
        .iter()
        .filter_map(GqlDeclaration::as_object_type)
        .map(|object| (object.code_reference.clone(), object.name.clone()))
        .collect();
    for declaration in declarations.iter_mut() {
        match declaration {
            GqlDeclaration::ObjectType(object) => {
                for field in &mut object.fields {
                    field.type_ref.resolve(&names);
                }
                for interface in &mut object.interfaces {
                    interface.resolve(&names);
                }
            }
            GqlDeclaration::ResolverClass(resolver) => {
                if let Some(target) = &mut resolver.target_type {
                    target.resolve(&names);
                }
                for snippet in &mut resolver.resolvers {
                    snippet.type_ref.resolve(&names);
                }
            }
        }
    }

    let field_resolvers: Vec<(String, String, EntityKey)> = declarations
        .iter()
        .filter_map(GqlDeclaration::as_resolver_class)
        .filter_map(|resolver| {
            let target = resolver.target_type.as_ref()?.essential_name()?.to_string();
            Some(
                resolver
                    .resolvers
                    .iter()
                    .filter(|snippet| snippet.operation_type.is_none())
                    .map(move |snippet| {
                        (target.clone(), snippet.name.clone(), snippet.code_reference.clone())
                    }),
            )
        })
        .flatten()
        .collect();
    for declaration in declarations.iter_mut() {
        let GqlDeclaration::ObjectType(object) = declaration else {
            continue;
        };
        for field in &mut object.fields {
            let found = field_resolvers
                .iter()
                .find(|(target, name, _)| *target == object.name && *name == field.name);
            if let Some((_, _, reference)) = found {
                field.resolver_reference = Some(reference.clone());
            }
        }
    }
}

/// Operation kind and GraphQL name of a resolver method: `("Query", "users")`,
/// or `("FieldResolver", "posts")` for field resolvers.
pub fn resolver_operation(
    project: &Project,
    file: FileId,
    method: Node<'_>,
) -> Option<(&'static str, String)> {
    let source = project.file(file).source.as_str();
    if method.kind() != "method_definition" {
        return None;
    }
    let class = ast::ancestors(method).find(|parent| ast::is_class_like(parent.kind()))?;
    let class_args = decorator_arguments(class, RESOLVER_DECORATOR, source)?;
    let has_target = !class_args.is_empty();
    let kinds = GqlOperationType::ALL
        .iter()
        .map(GqlOperationType::as_str)
        .chain(has_target.then_some(FIELD_RESOLVER_DECORATOR));
    for kind in kinds {
        let Some(args) = decorator_arguments(method, kind, source) else {
            continue;
        };
        let name = options_name(&args, source).or_else(|| member_name(method, source))?;
        return Some((kind, name));
    }
    None
}

struct TypeExtractor<'a> {
    project: &'a Project,
    file: FileId,
    source: &'a str,
    resolver: Resolver<'a>,
}

impl<'a> TypeExtractor<'a> {
    fn key(&self, node: Node<'_>) -> EntityKey {
        EntityKey::of(&self.project.file(self.file).rel_path, node)
    }

    fn object_type(&self, class: Node<'a>) -> Option<GqlObjectType> {
        let args = decorator_arguments(class, OBJECT_TYPE_DECORATOR, self.source)?;
        let name = args
            .first()
            .and_then(|first| string_value(ast::strip_wrappers(*first), self.source))
            .or_else(|| {
                class
                    .child_by_field_name("name")
                    .map(|name| node_text(name, self.source).to_string())
            })?;
        let fields = class_members(class)
            .into_iter()
            .filter_map(|member| self.field(member))
            .collect();
        Some(GqlObjectType {
            code_reference: self.key(class),
            name,
            fields,
            interfaces: self.interfaces(&args),
        })
    }

    fn field(&self, member: Node<'a>) -> Option<GqlField> {
        let args = decorator_arguments(member, FIELD_DECORATOR, self.source)?;
        let type_func = args
            .first()
            .copied()
            .filter(|first| first.kind() == "arrow_function");
        let name = options_name(&args, self.source).or_else(|| member_name(member, self.source))?;
        let type_ref = match type_func {
            Some(type_func) => self.type_from_type_func(type_func),
            None => self.type_from_declaration(member),
        }?;
        Some(GqlField {
            code_reference: self.key(member),
            name,
            type_ref,
            resolver_reference: None,
        })
    }

    fn interfaces(&self, args: &[Node<'a>]) -> Vec<GqlTypeRef> {
        let Some(value) = args
            .iter()
            .find(|arg| arg.kind() == "object")
            .and_then(|options| option_value(*options, IMPLEMENTS_OPTION, self.source))
        else {
            return Vec::new();
        };
        let value = ast::strip_wrappers(value);
        let names = if value.kind() == "array" {
            ast::named_children(value)
        } else {
            vec![value]
        };
        names
            .into_iter()
            .filter_map(|name| self.type_from_expression(name))
            .collect()
    }

    fn resolver_class(&self, class: Node<'a>) -> Option<GqlResolverClass> {
        let args = decorator_arguments(class, RESOLVER_DECORATOR, self.source)?;
        let target_type = args.first().and_then(|first| {
            if first.kind() == "arrow_function" {
                self.type_from_type_func(*first)
            } else {
                self.type_from_expression(*first)
            }
        });
        let mut kinds: Vec<(&str, Option<GqlOperationType>)> = GqlOperationType::ALL
            .iter()
            .map(|operation| (operation.as_str(), Some(*operation)))
            .collect();
        if target_type.is_some() {
            kinds.push((FIELD_RESOLVER_DECORATOR, None));
        }

        let mut resolvers = Vec::new();
        for member in class_members(class) {
            if member.kind() != "method_definition" {
                continue;
            }
            for (decorator, operation_type) in &kinds {
                let Some(member_args) = decorator_arguments(member, decorator, self.source) else {
                    continue;
                };
                let type_func = member_args
                    .iter()
                    .copied()
                    .find(|arg| arg.kind() == "arrow_function");
                let name = options_name(&member_args, self.source)
                    .or_else(|| member_name(member, self.source));
                let type_ref = match type_func {
                    Some(type_func) => self.type_from_type_func(type_func),
                    None => self.type_from_declaration(member),
                };
                let (Some(name), Some(type_ref)) = (name, type_ref) else {
                    continue;
                };
                resolvers.push(GqlResolverSnippet {
                    code_reference: self.key(member),
                    operation_type: *operation_type,
                    name,
                    type_ref,
                });
            }
        }
        if resolvers.is_empty() {
            return None;
        }
        Some(GqlResolverClass {
            code_reference: self.key(class),
            target_type,
            resolvers,
        })
    }

    /// `() => User`; block bodies carry no type.
    fn type_from_type_func(&self, type_func: Node<'a>) -> Option<GqlTypeRef> {
        let body = type_func.child_by_field_name("body")?;
        if body.kind() == "statement_block" {
            return None;
        }
        self.type_from_expression(body)
    }

    /// `Int`, `[User]`, a project class, or the last name segment of anything
    /// else (`TypeGraphQL.ID` → `ID`).
    fn type_from_expression(&self, expr: Node<'a>) -> Option<GqlTypeRef> {
        let expr = ast::strip_wrappers(expr);
        let text = node_text(expr, self.source);
        match expr.kind() {
            "identifier" if PRIMITIVE_TYPES.contains(&text) => Some(GqlTypeRef::named(text)),
            "array" => {
                let element = expr.named_child(0)?;
                self.type_from_expression(element).map(GqlTypeRef::list)
            }
            "identifier" | "member_expression" => {
                if let Some(class) = self.class_reference(expr) {
                    return Some(class);
                }
                let name = ast::last_segment(text);
                (!name.is_empty()).then(|| GqlTypeRef::named(name))
            }
            _ => None,
        }
    }

    /// Declared property type, or the return type of a method or getter.
    /// `string`, `boolean` and `number` map to `String`, `Boolean` and `Float`.
    fn type_from_declaration(&self, member: Node<'a>) -> Option<GqlTypeRef> {
        let annotation = member
            .child_by_field_name("type")
            .or_else(|| member.child_by_field_name("return_type"))?;
        self.type_from_type_node(annotation.named_child(0)?)
    }

    fn type_from_type_node(&self, node: Node<'a>) -> Option<GqlTypeRef> {
        let text = node_text(node, self.source);
        match node.kind() {
            "predefined_type" => match text {
                "string" => Some(GqlTypeRef::named("String")),
                "boolean" => Some(GqlTypeRef::named("Boolean")),
                "number" => Some(GqlTypeRef::named("Float")),
                _ => None,
            },
            "array_type" => self
                .type_from_type_node(node.named_child(0)?)
                .map(GqlTypeRef::list),
            "parenthesized_type" => self.type_from_type_node(node.named_child(0)?),
            "type_identifier" | "nested_type_identifier" => {
                let name = ast::last_segment(text);
                if PRIMITIVE_TYPES.contains(&name) {
                    return Some(GqlTypeRef::named(name));
                }
                if node.kind() == "type_identifier" {
                    return self.class_reference(node);
                }
                None
            }
            _ => None,
        }
    }

    fn class_reference(&self, node: Node<'a>) -> Option<GqlTypeRef> {
        let resolved = self.resolver.resolve(self.file, node).value()?;
        if !ast::is_class_like(resolved.node.kind()) {
            return None;
        }
        Some(GqlTypeRef::Class {
            target: EntityKey::of(&self.project.file(resolved.file).rel_path, resolved.node),
            name: None,
        })
    }
}

/// The implicit top-level types of one file. Each field points at the
/// resolver method it came from.
fn implicit_operation_types(
    file_key: &EntityKey,
    declarations: &[GqlDeclaration],
) -> Vec<GqlObjectType> {
    let snippets: Vec<&GqlResolverSnippet> = declarations
        .iter()
        .filter_map(GqlDeclaration::as_resolver_class)
        .flat_map(|resolver| resolver.resolvers.iter())
        .collect();
    GqlOperationType::ALL
        .iter()
        .filter_map(|operation| {
            let fields: Vec<GqlField> = snippets
                .iter()
                .filter(|snippet| snippet.operation_type == Some(*operation))
                .map(|snippet| GqlField {
                    code_reference: snippet.code_reference.clone(),
                    name: snippet.name.clone(),
                    type_ref: snippet.type_ref.clone(),
                    resolver_reference: Some(snippet.code_reference.clone()),
                })
                .collect();
            (!fields.is_empty()).then(|| GqlObjectType {
                code_reference: file_key.clone(),
                name: operation.as_str().to_string(),
                fields,
                interfaces: Vec::new(),
            })
        })
        .collect()
}

fn class_members(class: Node<'_>) -> Vec<Node<'_>> {
    class
        .child_by_field_name("body")
        .map(ast::named_children)
        .unwrap_or_default()
        .into_iter()
        .filter(|member| matches!(member.kind(), "public_field_definition" | "method_definition"))
        .collect()
}

/// Arguments of the decorator called `name` on `node`, empty for a bare
/// `@Name`. `None` when no such decorator is present.
fn decorator_arguments<'a>(node: Node<'a>, name: &str, source: &str) -> Option<Vec<Node<'a>>> {
    let decorator = ast::decorator_nodes(node)
        .into_iter()
        .find(|decorator| ast::decorator_name(*decorator, source).as_deref() == Some(name))?;
    Some(
        ast::named_children(decorator)
            .into_iter()
            .find(|child| child.kind() == "call_expression")
            .map(call_arguments)
            .unwrap_or_default(),
    )
}

fn option_value<'a>(options: Node<'a>, key: &str, source: &str) -> Option<Node<'a>> {
    ast::named_children(options)
        .into_iter()
        .filter(|child| child.kind() == "pair")
        .find(|pair| {
            pair.child_by_field_name("key")
                .and_then(|name| ast::property_key_name(name, source))
                .is_some_and(|name| name == key)
        })
        .and_then(|pair| pair.child_by_field_name("value"))
}

/// `{ name: 'x' }` among decorator arguments.
fn options_name(args: &[Node<'_>], source: &str) -> Option<String> {
    args.iter()
        .filter(|arg| arg.kind() == "object")
        .find_map(|options| option_value(*options, NAME_OPTION, source))
        .and_then(|value| string_value(ast::strip_wrappers(value), source))
}

fn member_name(member: Node<'_>, source: &str) -> Option<String> {
    let name = member.child_by_field_name("name")?;
    match name.kind() {
        "property_identifier" | "identifier" | "string" => ast::property_key_name(name, source),
        _ => None,
    }
}
