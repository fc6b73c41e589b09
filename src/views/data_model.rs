use super::EntityKey;
use crate::syntax::ast::{self, call_arguments, call_target_node, node_text, string_value};
use crate::syntax::outline::{ClassInfo, ModuleInfo};
use crate::syntax::resolve::{ResolvedNode, Resolver};
use crate::syntax::{FileId, Project, SourceFile};
use serde::Serialize;
use std::cell::OnceCell;
use std::collections::HashSet;
use tree_sitter::Node;

const TYPEORM_MODULE: &str = "typeorm";
const TYPEORM_ENTITY_DECORATORS: &[&str] = &["Entity", "ViewEntity", "ChildEntity"];
const MIXED_TYPE: &str = "Mixed";
const UNTYPED: &str = "any";

/// How a data model is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataModelKind {
    /// `mongoose.model('User', new Schema({ .. }))`
    Mongoose,
    /// `sequelize.define('User', { .. })`
    SequelizeDefine,
    /// A class carrying a TypeORM `@Entity` decorator.
    Typeorm,
    /// A capitalised function assigning `this.<name>`.
    ConstructorFunction,
    /// A plain class whose properties outnumber its methods.
    Class,
}

impl DataModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataModelKind::Mongoose => "mongoose",
            DataModelKind::SequelizeDefine => "sequelize_define",
            DataModelKind::Typeorm => "typeorm",
            DataModelKind::ConstructorFunction => "constructor_function",
            DataModelKind::Class => "class",
        }
    }

    /// Declared through an ORM or ODM API rather than inferred from shape.
    pub fn is_confirmed(self) -> bool {
        matches!(
            self,
            DataModelKind::Mongoose | DataModelKind::SequelizeDefine | DataModelKind::Typeorm
        )
    }
}

/// Property name and type pairs in declaration order. Assigning a name twice
/// replaces its type in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Shape {
    properties: Vec<(String, String)>,
    methods_count: usize,
}

impl Shape {
    fn set_property(&mut self, name: impl Into<String>, kind: impl Into<String>) {
        let name = name.into();
        let kind = kind.into();
        match self.properties.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = kind,
            None => self.properties.push((name, kind)),
        }
    }
}

/// A data model declaration: ODM/ORM model definitions, entity classes and
/// classes or constructor functions shaped like records.
pub struct DataModelView<'a> {
    project: &'a Project,
    file: FileId,
    node: Node<'a>,
    kind: DataModelKind,
    key: EntityKey,
    display: OnceCell<String>,
    shape: OnceCell<Shape>,
}

impl<'a> DataModelView<'a> {
    pub fn new(project: &'a Project, file: FileId, node: Node<'a>, kind: DataModelKind) -> Self {
        let key = EntityKey::of(&project.file(file).rel_path, node);
        Self {
            project,
            file,
            node,
            kind,
            key,
            display: OnceCell::new(),
            shape: OnceCell::new(),
        }
    }

    /// Classify `node` as a data model declaration. Calls are checked for
    /// Mongoose and Sequelize definitions, classes for TypeORM entities and
    /// then for record shape, functions for the constructor-function pattern.
    pub fn detect(
        project: &'a Project,
        file: FileId,
        node: Node<'a>,
        module: &ModuleInfo,
    ) -> Option<Self> {
        let source = project.file(file).source.as_str();
        let kind = match node.kind() {
            "call_expression" => {
                if mongoose_paths(project, file, node).is_some() {
                    DataModelKind::Mongoose
                } else if sequelize_attributes(project, file, node).is_some() {
                    DataModelKind::SequelizeDefine
                } else {
                    return None;
                }
            }
            kind if ast::is_class_like(kind) => {
                if is_typeorm_entity(node, source, module) {
                    DataModelKind::Typeorm
                } else {
                    let shape = own_class_shape(node, source);
                    if shape.properties.is_empty() || shape.methods_count > shape.properties.len() {
                        return None;
                    }
                    let view = Self::new(project, file, node, DataModelKind::Class);
                    let _ = view.shape.set(shape);
                    return Some(view);
                }
            }
            "function_declaration" | "function_expression" | "function" => {
                if !is_constructor_function(node, source) {
                    return None;
                }
                DataModelKind::ConstructorFunction
            }
            _ => return None,
        };
        Some(Self::new(project, file, node, kind))
    }

    pub fn key(&self) -> &EntityKey {
        &self.key
    }

    pub fn node(&self) -> Node<'a> {
        self.node
    }

    pub fn kind(&self) -> DataModelKind {
        self.kind
    }

    pub fn source_file(&self) -> &'a SourceFile {
        self.project.file(self.file)
    }

    fn source(&self) -> &'a str {
        &self.source_file().source
    }

    /// `<kind> <name>`, e.g. `mongoose User`.
    pub fn display_string(&self) -> &str {
        self.display
            .get_or_init(|| format!("{} {}", self.kind.as_str(), self.name()))
    }

    /// Model name given to the ODM/ORM, or the declared class or function name.
    pub fn name(&self) -> String {
        let source = self.source();
        match self.kind {
            DataModelKind::Mongoose | DataModelKind::SequelizeDefine => call_arguments(self.node)
                .into_iter()
                .next()
                .and_then(|first| string_value(ast::strip_wrappers(first), source))
                .unwrap_or_default(),
            DataModelKind::Typeorm | DataModelKind::Class => {
                ClassInfo::from_node(self.node, source).name
            }
            DataModelKind::ConstructorFunction => function_name(self.node, source).unwrap_or_default(),
        }
    }

    pub fn properties(&self) -> &[(String, String)] {
        &self.shape().properties
    }

    pub fn property_names(&self) -> Vec<&str> {
        self.properties().iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn property_types(&self) -> Vec<&str> {
        self.properties().iter().map(|(_, kind)| kind.as_str()).collect()
    }

    pub fn methods_count(&self) -> usize {
        self.shape().methods_count
    }

    pub fn is_confirmed(&self) -> bool {
        self.kind.is_confirmed()
    }

    /// The resolved class chain, declaring class first, then each base class
    /// reachable through `extends`.
    pub fn class_chain(&self) -> Vec<ResolvedNode<'a>> {
        let resolver = Resolver::new(self.project);
        let mut chain = vec![ResolvedNode {
            file: self.file,
            node: self.node,
        }];
        let mut seen = HashSet::from([(self.file, self.node.id())]);
        while let Some(current) = chain.last().copied() {
            let Some(base) = base_class_expression(current.node)
                .and_then(|base| resolver.resolve(current.file, base).value())
                .filter(|base| ast::is_class_like(base.node.kind()))
            else {
                break;
            };
            if !seen.insert((base.file, base.node.id())) {
                break;
            }
            chain.push(base);
        }
        chain
    }

    fn shape(&self) -> &Shape {
        self.shape.get_or_init(|| self.compute_shape())
    }

    fn compute_shape(&self) -> Shape {
        let source = self.source();
        match self.kind {
            DataModelKind::Mongoose => {
                let mut shape = Shape::default();
                if let Some(paths) = mongoose_paths(self.project, self.file, self.node) {
                    let paths_source = self.project.file(paths.file).source.as_str();
                    let mut keys = Vec::new();
                    collect_schema_paths(paths.node, paths_source, &mut keys, &mut shape);
                }
                shape
            }
            DataModelKind::SequelizeDefine => {
                let mut shape = Shape::default();
                if let Some(attributes) = sequelize_attributes(self.project, self.file, self.node) {
                    let attributes_source = self.project.file(attributes.file).source.as_str();
                    for (name, value) in object_entries(attributes.node, attributes_source) {
                        shape.set_property(name, sequelize_type(value, attributes_source));
                    }
                }
                shape
            }
            DataModelKind::Typeorm => {
                // base class columns come first
                let mut shape = Shape::default();
                for class in self.class_chain().into_iter().rev() {
                    let class_source = self.project.file(class.file).source.as_str();
                    let own = own_class_shape(class.node, class_source);
                    for (name, kind) in own.properties {
                        shape.set_property(name, kind);
                    }
                    shape.methods_count += own.methods_count;
                }
                shape
            }
            DataModelKind::ConstructorFunction => {
                let mut shape = Shape::default();
                if let Some(body) = self.node.child_by_field_name("body") {
                    collect_self_assignments(body, source, &mut shape);
                }
                shape
            }
            DataModelKind::Class => own_class_shape(self.node, source),
        }
    }
}

/// `<x>.model('Name', schema)` where `schema` evaluates to `new Schema({ .. })`;
/// yields the schema's path object.
fn mongoose_paths<'a>(project: &'a Project, file: FileId, call: Node<'a>) -> Option<ResolvedNode<'a>> {
    let source = project.file(file).source.as_str();
    let (_, method) = ast::member_object_and_property(call_target_node(call)?, source)?;
    if method != "model" {
        return None;
    }
    let args = call_arguments(call);
    if !(2..=4).contains(&args.len()) || ast::strip_wrappers(args[0]).kind() != "string" {
        return None;
    }
    let resolver = Resolver::new(project);
    let schema = resolver.resolve(file, args[1]).value()?;
    let schema_source = project.file(schema.file).source.as_str();
    if !is_schema_construction(schema.node, schema_source) {
        return None;
    }
    let paths = call_arguments(schema.node).into_iter().next()?;
    let paths = resolver.resolve(schema.file, paths).value()?;
    (paths.node.kind() == "object").then_some(paths)
}

/// `new Schema(..)`, `new mongoose.Schema<T>(..)`.
fn is_schema_construction(node: Node<'_>, source: &str) -> bool {
    if node.kind() != "new_expression" {
        return false;
    }
    let Some(constructor) = call_target_node(node) else {
        return false;
    };
    let text = node_text(constructor, source);
    let text = text.split('<').next().unwrap_or(text);
    ast::last_segment(text).ends_with("Schema")
}

/// Flatten a schema definition into dotted paths. Values declared as
/// `{ type: X, .. }` take `X`, arrays contribute their element paths, and an
/// empty array is `Mixed`.
fn collect_schema_paths(node: Node<'_>, source: &str, keys: &mut Vec<String>, shape: &mut Shape) {
    let node = ast::strip_wrappers(node);
    match node.kind() {
        "object" => {
            let entries = object_entries(node, source);
            if let Some((_, declared)) = entries.iter().find(|(key, _)| key == "type") {
                collect_schema_paths(*declared, source, keys, shape);
                return;
            }
            for (key, value) in entries {
                keys.push(key);
                collect_schema_paths(value, source, keys, shape);
                keys.pop();
            }
        }
        "array" => {
            let elements = ast::named_children(node);
            if elements.is_empty() {
                if !keys.is_empty() {
                    shape.set_property(keys.join("."), MIXED_TYPE);
                }
                return;
            }
            for element in elements {
                collect_schema_paths(element, source, keys, shape);
            }
        }
        "new_expression" if is_schema_construction(node, source) => {
            if let Some(paths) = call_arguments(node).into_iter().next() {
                collect_schema_paths(paths, source, keys, shape);
            }
        }
        _ => {
            if !keys.is_empty() {
                shape.set_property(keys.join("."), type_name(node, source));
            }
        }
    }
}

/// `<x>.define('Name', { .. })`; yields the attributes object.
fn sequelize_attributes<'a>(
    project: &'a Project,
    file: FileId,
    call: Node<'a>,
) -> Option<ResolvedNode<'a>> {
    let source = project.file(file).source.as_str();
    let (_, method) = ast::member_object_and_property(call_target_node(call)?, source)?;
    if method != "define" {
        return None;
    }
    let args = call_arguments(call);
    if args.len() < 2 || ast::strip_wrappers(args[0]).kind() != "string" {
        return None;
    }
    let attributes = Resolver::new(project).resolve(file, args[1]).value()?;
    (attributes.node.kind() == "object").then_some(attributes)
}

fn sequelize_type(value: Node<'_>, source: &str) -> String {
    let value = ast::strip_wrappers(value);
    if value.kind() != "object" {
        return type_name(value, source);
    }
    object_entries(value, source)
        .into_iter()
        .find(|(key, _)| key == "type")
        .map(|(_, declared)| type_name(declared, source))
        .unwrap_or_else(|| UNTYPED.to_string())
}

/// Text after the last `.` of a type expression: `Schema.Types.ObjectId` →
/// `ObjectId`, `DataTypes.STRING(50)` → `STRING`.
fn type_name(node: Node<'_>, source: &str) -> String {
    let node = ast::strip_wrappers(node);
    let raw = match node.kind() {
        "string" => string_value(node, source).unwrap_or_default(),
        "call_expression" => call_target_node(node)
            .map(|callee| node_text(callee, source).to_string())
            .unwrap_or_default(),
        _ => node_text(node, source).to_string(),
    };
    raw.rsplit('.').next().unwrap_or_default().to_string()
}

fn object_entries<'a>(object: Node<'a>, source: &str) -> Vec<(String, Node<'a>)> {
    let mut entries = Vec::new();
    for child in ast::named_children(object) {
        match child.kind() {
            "pair" => {
                let key = child
                    .child_by_field_name("key")
                    .and_then(|key| ast::property_key_name(key, source));
                if let (Some(key), Some(value)) = (key, child.child_by_field_name("value")) {
                    entries.push((key, value));
                }
            }
            "shorthand_property_identifier" => {
                entries.push((node_text(child, source).to_string(), child));
            }
            _ => {}
        }
    }
    entries
}

fn is_typeorm_entity(class: Node<'_>, source: &str, module: &ModuleInfo) -> bool {
    module.has_import(TYPEORM_MODULE)
        && ClassInfo::from_node(class, source)
            .decorators
            .iter()
            .any(|decorator| TYPEORM_ENTITY_DECORATORS.contains(&decorator.as_str()))
}

/// `extends <expr>` of a class node, for both grammars.
fn base_class_expression(class: Node<'_>) -> Option<Node<'_>> {
    let heritage = ast::named_children(class)
        .into_iter()
        .find(|child| child.kind() == "class_heritage")?;
    let first = heritage.named_child(0)?;
    match first.kind() {
        "extends_clause" => first
            .child_by_field_name("value")
            .or_else(|| first.named_child(0)),
        "implements_clause" => None,
        _ => Some(first),
    }
}

/// Properties and methods declared by the class body itself: field
/// declarations, getters, constructor parameter properties and constructor
/// `this.<name>` assignments. Static members are skipped.
fn own_class_shape(class: Node<'_>, source: &str) -> Shape {
    let mut shape = Shape::default();
    let Some(body) = class.child_by_field_name("body") else {
        return shape;
    };
    for member in ast::named_children(body) {
        if ast::has_keyword_child(member, "static") {
            continue;
        }
        match member.kind() {
            "public_field_definition" | "field_definition" => {
                let name = member
                    .child_by_field_name("name")
                    .or_else(|| member.child_by_field_name("property"))
                    .and_then(|name| ast::property_key_name(name, source));
                let Some(name) = name else {
                    continue;
                };
                let value = member.child_by_field_name("value");
                if value.is_some_and(|value| ast::is_function_like(value.kind())) {
                    shape.methods_count += 1;
                    continue;
                }
                shape.set_property(name, declared_type(member, "type", source));
            }
            "method_definition" => {
                let name = member
                    .child_by_field_name("name")
                    .and_then(|name| ast::property_key_name(name, source))
                    .unwrap_or_default();
                if name == "constructor" {
                    collect_parameter_properties(member, source, &mut shape);
                    if let Some(body) = member.child_by_field_name("body") {
                        collect_self_assignments(body, source, &mut shape);
                    }
                } else if ast::has_keyword_child(member, "get") {
                    shape.set_property(name, declared_type(member, "return_type", source));
                } else if !ast::has_keyword_child(member, "set") {
                    shape.methods_count += 1;
                }
            }
            _ => {}
        }
    }
    shape
}

fn declared_type(node: Node<'_>, field: &str, source: &str) -> String {
    node.child_by_field_name(field)
        .map(|annotation| ast::annotation_text(annotation, source))
        .unwrap_or_else(|| UNTYPED.to_string())
}

/// `constructor(public name: string, readonly id)`.
fn collect_parameter_properties(constructor: Node<'_>, source: &str, shape: &mut Shape) {
    for param in ast::function_parameters(constructor) {
        let is_property = ast::named_children(param)
            .into_iter()
            .any(|child| child.kind() == "accessibility_modifier")
            || ast::has_keyword_child(param, "readonly");
        if !is_property {
            continue;
        }
        let pattern = ast::parameter_pattern(param);
        if pattern.kind() != "identifier" {
            continue;
        }
        shape.set_property(node_text(pattern, source), declared_type(param, "type", source));
    }
}

/// `this.<name> = value` statements of a function body, nested functions other
/// than arrows excluded. Function values count as methods.
fn collect_self_assignments(body: Node<'_>, source: &str, shape: &mut Shape) {
    let mut stack = vec![body];
    let mut assignments = Vec::new();
    while let Some(node) = stack.pop() {
        if node.kind() == "assignment_expression" {
            assignments.push(node);
        }
        let mut children = ast::named_children(node);
        children.retain(|child| {
            !ast::is_function_like(child.kind()) || child.kind() == "arrow_function"
        });
        children.reverse();
        stack.extend(children);
    }
    for assignment in assignments {
        let Some(left) = assignment.child_by_field_name("left") else {
            continue;
        };
        let Some((object, property)) = ast::member_object_and_property(left, source) else {
            continue;
        };
        if object.kind() != "this" {
            continue;
        }
        let is_method = assignment
            .child_by_field_name("right")
            .is_some_and(|right| ast::is_function_like(ast::strip_wrappers(right).kind()));
        if is_method {
            shape.methods_count += 1;
        } else {
            shape.set_property(property, UNTYPED);
        }
    }
}

fn function_name(node: Node<'_>, source: &str) -> Option<String> {
    if let Some(name) = node.child_by_field_name("name") {
        return Some(node_text(name, source).to_string());
    }
    let parent = node.parent()?;
    if parent.kind() != "variable_declarator" {
        return None;
    }
    let name = parent.child_by_field_name("name")?;
    (name.kind() == "identifier").then(|| node_text(name, source).to_string())
}

/// A capitalised function that assigns at least one non-function `this.<name>`.
fn is_constructor_function(node: Node<'_>, source: &str) -> bool {
    let capitalised = function_name(node, source)
        .and_then(|name| name.chars().next())
        .is_some_and(|first| first.is_ascii_uppercase());
    if !capitalised {
        return false;
    }
    let Some(body) = node.child_by_field_name("body") else {
        return false;
    };
    let mut shape = Shape::default();
    collect_self_assignments(body, source, &mut shape);
    !shape.properties.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::SourceParser;

    fn project(files: &[(&str, &str)]) -> Project {
        let mut parser = SourceParser::new().unwrap();
        let mut project = Project::new("demo");
        for (path, source) in files {
            project.add(parser.parse(path, source.to_string()).unwrap());
        }
        project
    }

    fn detect_all(project: &Project, file: FileId) -> Vec<DataModelView<'_>> {
        let source_file = project.file(file);
        let module = ModuleInfo::collect(source_file);
        ast::collect_nodes(source_file.root(), |_| true)
            .into_iter()
            .filter_map(|node| DataModelView::detect(project, file, node, &module))
            .collect()
    }

    fn properties<'v>(view: &'v DataModelView<'_>) -> Vec<(&'v str, &'v str)> {
        view.properties()
            .iter()
            .map(|(name, kind)| (name.as_str(), kind.as_str()))
            .collect()
    }

    #[test]
    fn mongoose_schema_paths_are_flattened() {
        let project = project(&[(
            "models/user.js",
            r#"
const mongoose = require('mongoose');
const { Schema } = mongoose;
const userSchema = new Schema({
    _id: Schema.Types.ObjectId,
    firstName: { type: String, required: true },
    phoneNumbers: [String],
    primaryAddress: {
        city: { type: 'String' },
    },
    children: [{ name: String, age: { type: Number, min: 0 } }],
    stuff: [],
});
const User = mongoose.model('User', userSchema);
const Again = mongoose.model('User');
"#,
        )]);
        let views = detect_all(&project, FileId(0));
        assert_eq!(views.len(), 1);
        let view = &views[0];
        assert_eq!(view.kind(), DataModelKind::Mongoose);
        assert_eq!(view.name(), "User");
        assert_eq!(view.display_string(), "mongoose User");
        assert!(view.is_confirmed());
        assert_eq!(view.methods_count(), 0);
        assert_eq!(
            properties(view),
            vec![
                ("_id", "ObjectId"),
                ("firstName", "String"),
                ("phoneNumbers", "String"),
                ("primaryAddress.city", "String"),
                ("children.name", "String"),
                ("children.age", "Number"),
                ("stuff", "Mixed"),
            ]
        );
    }

    #[test]
    fn mongoose_schemas_resolve_through_imports() {
        let project = project(&[
            (
                "schemas/post.ts",
                "import { Schema } from 'mongoose';\nexport const PostSchema = new Schema({ title: String });\nexport default PostSchema;\n",
            ),
            (
                "models.ts",
                "import mongoose from 'mongoose';\nimport { PostSchema } from './schemas/post';\nimport * as schemas from './schemas/post';\nimport PostSchemaDefault from './schemas/post';\nmongoose.model('Post', PostSchema);\nmongoose.model('PostNs', schemas.PostSchema);\nmongoose.model('PostDefault', PostSchemaDefault);\n",
            ),
        ]);
        let views = detect_all(&project, FileId(1));
        let names: Vec<String> = views.iter().map(|view| view.name()).collect();
        assert_eq!(names, vec!["Post", "PostNs", "PostDefault"]);
        for view in &views {
            assert_eq!(properties(view), vec![("title", "String")]);
        }
    }

    #[test]
    fn sequelize_define_reads_attribute_keys() {
        let project = project(&[(
            "user.js",
            r#"
const User = sequelize.define('User', {
    userId: { type: DataTypes.INTEGER, primaryKey: true },
    firstName: DataTypes.STRING(50),
    someRandomThing: { allowNull: true },
});
sequelize.notDefine('User', { userId: DataTypes.INTEGER });
define(['dep'], function (dep) {});
"#,
        )]);
        let views = detect_all(&project, FileId(0));
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].kind(), DataModelKind::SequelizeDefine);
        assert_eq!(views[0].name(), "User");
        assert_eq!(
            views[0].property_names(),
            vec!["userId", "firstName", "someRandomThing"]
        );
        assert_eq!(views[0].property_types(), vec!["INTEGER", "STRING", "any"]);
    }

    #[test]
    fn typeorm_entities_include_inherited_columns() {
        let project = project(&[(
            "post.ts",
            r#"
import { Entity, Column, PrimaryGeneratedColumn } from 'typeorm';

export abstract class Content {
    @PrimaryGeneratedColumn()
    id: number;

    @Column()
    title: string;
}

@Entity()
export class Post extends Content {
    @Column()
    viewCount: number;

    publish() {}
    archive() {}
    remove() {}
    restore() {}
}

export class NotOrmClass {
    run() {}
}
"#,
        )]);
        let views = detect_all(&project, FileId(0));
        let kinds: Vec<(String, DataModelKind)> =
            views.iter().map(|view| (view.name(), view.kind())).collect();
        assert_eq!(
            kinds,
            vec![
                ("Content".to_string(), DataModelKind::Class),
                ("Post".to_string(), DataModelKind::Typeorm),
            ]
        );
        let post = &views[1];
        assert!(post.is_confirmed());
        assert_eq!(
            properties(post),
            vec![("id", "number"), ("title", "string"), ("viewCount", "number")]
        );
        assert_eq!(post.methods_count(), 4);
        assert_eq!(post.class_chain().len(), 2);
    }

    #[test]
    fn constructor_functions_are_unconfirmed_models() {
        let project = project(&[(
            "legacy.js",
            r#"
function UserFunction(firstName, lastName) {
    this.firstName = firstName;
    this.lastName = lastName;
    this.greet = function () { return this.firstName; };
}
function PlainOldFunction(a) { return a + 1; }
function mutatorMethod(value) { this.value = value; }
class UserClass {
    constructor(firstName) { this.firstName = firstName; }
    save() {}
    load() {}
}
"#,
        )]);
        let views = detect_all(&project, FileId(0));
        assert_eq!(views.len(), 1);
        let view = &views[0];
        assert_eq!(view.kind(), DataModelKind::ConstructorFunction);
        assert_eq!(view.name(), "UserFunction");
        assert_eq!(
            properties(view),
            vec![("firstName", "any"), ("lastName", "any")]
        );
        assert_eq!(view.methods_count(), 1);
        assert!(!view.is_confirmed());
    }

    #[test]
    fn record_shaped_classes_are_detected() {
        let project = project(&[(
            "users.ts",
            r#"
class UserClass {
    constructor(firstName, lastName) {
        this.firstName = firstName;
        this.lastName = lastName;
    }
    mutatorMethod(name) { this.firstName = name; }
}
class UserClassWithConstructorProperties {
    constructor(public firstName: string, private readonly lastName: string, other: number) {}
}
class UserClassWithPropertyDeclarations {
    firstName: string;
    lastName: string;
    static count = 0;
}
class UserClassWithGetters {
    get fullName(): string { return 'a b'; }
}
class Service {
    constructor(private repo: Repo) {}
    find() {}
    save() {}
}
"#,
        )]);
        let views = detect_all(&project, FileId(0));
        let found: Vec<(String, Vec<(&str, &str)>)> = views
            .iter()
            .map(|view| (view.name(), properties(view)))
            .collect();
        assert_eq!(
            found,
            vec![
                (
                    "UserClass".to_string(),
                    vec![("firstName", "any"), ("lastName", "any")]
                ),
                (
                    "UserClassWithConstructorProperties".to_string(),
                    vec![("firstName", "string"), ("lastName", "string")]
                ),
                (
                    "UserClassWithPropertyDeclarations".to_string(),
                    vec![("firstName", "string"), ("lastName", "string")]
                ),
                ("UserClassWithGetters".to_string(), vec![("fullName", "string")]),
            ]
        );
        assert!(views.iter().all(|view| view.kind() == DataModelKind::Class));
        assert!(views.iter().all(|view| !view.is_confirmed()));
        assert_eq!(views[0].methods_count(), 1);
    }
}
