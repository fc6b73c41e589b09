//! Backward symbol following across declarations, imports and exports.
//!
//! Every declaration a request steps through is recorded in a [`ResolutionPath`];
//! meeting one a second time ends that branch as [`Resolution::Unresolved`]. The
//! number of distinct declarations in a project bounds the work of one request, so
//! self-referencing and mutually-referencing bindings terminate.

use super::ast::{
    self, call_arguments, call_target_node, function_parameters, is_class_like,
    is_function_like, named_children, node_text, parameter_pattern, property_key_name,
    string_value, strip_wrappers,
};
use super::{FileId, Project};
use std::collections::HashSet;
use tree_sitter::Node;

/// Identity of a declaration-like node: variable declarator, function or class
/// declaration, parameter, import/export specifier, re-export statement, object
/// member or assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeclarationId {
    pub file: FileId,
    pub kind: u16,
    pub start_byte: usize,
    pub end_byte: usize,
}

impl DeclarationId {
    pub fn of(file: FileId, node: Node<'_>) -> Self {
        Self {
            file,
            kind: node.kind_id(),
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
        }
    }
}

/// Declarations visited by one top-level resolution request.
#[derive(Debug, Clone, Default)]
pub struct ResolutionPath {
    visited: HashSet<DeclarationId>,
}

impl ResolutionPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `id`; `false` when it was already on the path.
    pub fn enter(&mut self, id: DeclarationId) -> bool {
        self.visited.insert(id)
    }

    pub fn contains(&self, id: &DeclarationId) -> bool {
        self.visited.contains(id)
    }

    pub fn len(&self) -> usize {
        self.visited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ResolvedNode<'a> {
    pub file: FileId,
    pub node: Node<'a>,
}

#[derive(Debug, Clone)]
pub enum Resolution<'a> {
    /// A concrete construction: literal, function, class, call or `new` result.
    Value(ResolvedNode<'a>),
    /// A function parameter; its value is only known at call sites.
    Parameter(ResolvedNode<'a>),
    /// A project module used as a namespace.
    Module(FileId),
    /// Something obtained from a package outside the project, with the member
    /// chain selected from it.
    External { module: String, members: Vec<String> },
    Unresolved,
}

impl<'a> Resolution<'a> {
    pub fn is_unresolved(&self) -> bool {
        matches!(self, Resolution::Unresolved)
    }

    pub fn value(&self) -> Option<ResolvedNode<'a>> {
        match self {
            Resolution::Value(resolved) => Some(*resolved),
            _ => None,
        }
    }

    /// The function-like node this resolved to, if any.
    pub fn function(&self) -> Option<ResolvedNode<'a>> {
        self.value()
            .filter(|resolved| is_function_like(resolved.node.kind()))
    }
}

#[derive(Debug, Clone, Copy)]
enum ImportKind<'a> {
    Default,
    Named(&'a str),
    Namespace,
    Require,
}

#[derive(Debug, Clone, Copy)]
enum Binding<'a> {
    /// `variable_declarator`; the name may be a destructuring pattern.
    Declarator(Node<'a>),
    /// Function or class declaration, or a named function expression.
    Declaration(Node<'a>),
    Parameter(Node<'a>),
    Import {
        node: Node<'a>,
        module: Node<'a>,
        kind: ImportKind<'a>,
    },
}

pub struct Resolver<'a> {
    project: &'a Project,
}

impl<'a> Resolver<'a> {
    pub fn new(project: &'a Project) -> Self {
        Self { project }
    }

    pub fn project(&self) -> &'a Project {
        self.project
    }

    /// Resolve `node` with a fresh resolution path.
    pub fn resolve(&self, file: FileId, node: Node<'a>) -> Resolution<'a> {
        let mut path = ResolutionPath::new();
        self.resolve_with_path(file, node, &mut path)
    }

    pub fn resolve_with_path(
        &self,
        file: FileId,
        node: Node<'a>,
        path: &mut ResolutionPath,
    ) -> Resolution<'a> {
        let node = strip_wrappers(node);
        let source = self.source(file);
        match node.kind() {
            "identifier" | "shorthand_property_identifier" | "type_identifier" => {
                let name = node_text(node, source);
                match self.find_binding(file, node, name) {
                    Some(binding) => self.follow_binding(file, binding, name, path),
                    None => Resolution::Unresolved,
                }
            }
            "member_expression" | "optional_member_expression" => {
                let Some((object, property)) = ast::member_object_and_property(node, source)
                else {
                    return Resolution::Unresolved;
                };
                if object.kind() == "this" {
                    return self.this_member(file, node, &property, path);
                }
                let base = self.resolve_with_path(file, object, path);
                self.select_member(base, &property, path)
            }
            "subscript_expression" => {
                let key = node
                    .child_by_field_name("index")
                    .and_then(|index| string_value(index, source));
                let (Some(object), Some(key)) = (node.child_by_field_name("object"), key) else {
                    return Resolution::Unresolved;
                };
                let base = self.resolve_with_path(file, object, path);
                self.select_member(base, &key, path)
            }
            "assignment_expression" => match node.child_by_field_name("right") {
                Some(right) => self.resolve_with_path(file, right, path),
                None => Resolution::Unresolved,
            },
            "call_expression" => match self.required_specifier(file, node) {
                Some(specifier) => self.resolve_require(file, &specifier, path),
                None => Resolution::Value(ResolvedNode { file, node }),
            },
            _ => Resolution::Value(ResolvedNode { file, node }),
        }
    }

    /// External module an expression derives from, following calls, `new`,
    /// member access and bindings with one shared resolution path
    /// (`const app = express()` → `express`).
    pub fn framework_origin(&self, file: FileId, node: Node<'a>) -> Option<String> {
        let mut path = ResolutionPath::new();
        self.origin_with_path(file, node, &mut path)
    }

    fn origin_with_path(
        &self,
        file: FileId,
        node: Node<'a>,
        path: &mut ResolutionPath,
    ) -> Option<String> {
        let node = strip_wrappers(node);
        if ast::is_call_like(node.kind()) {
            if let Some(specifier) = self.required_specifier(file, node) {
                return match self.project.lookup_module(file, &specifier) {
                    Some(_) => None,
                    None => Some(specifier),
                };
            }
            let callee = call_target_node(node)?;
            return self.origin_with_path(file, callee, path);
        }
        match self.resolve_with_path(file, node, path) {
            Resolution::External { module, .. } => Some(module),
            Resolution::Value(resolved)
                if ast::is_call_like(resolved.node.kind()) && resolved.node.id() != node.id() =>
            {
                self.origin_with_path(resolved.file, resolved.node, path)
            }
            _ => None,
        }
    }

    /// Parameter count of the function an expression evaluates to.
    pub fn function_arity(&self, file: FileId, node: Node<'a>) -> Option<usize> {
        let node = strip_wrappers(node);
        let function = if is_function_like(node.kind()) {
            node
        } else {
            self.resolve(file, node).function()?.node
        };
        Some(function_parameters(function).len())
    }

    /// String a constant expression evaluates to: string literals, templates,
    /// `+` chains of those, and bindings or object members initialised with one.
    /// Template substitutions that do not fold are kept as written.
    pub fn constant_string(&self, file: FileId, node: Node<'a>) -> Option<String> {
        let mut path = ResolutionPath::new();
        self.constant_with_path(file, node, &mut path)
    }

    fn constant_with_path(
        &self,
        file: FileId,
        node: Node<'a>,
        path: &mut ResolutionPath,
    ) -> Option<String> {
        let node = strip_wrappers(node);
        let source = self.source(file);
        match node.kind() {
            "string" => string_value(node, source),
            "template_string" => {
                let start = node.start_byte() + 1;
                let end = node.end_byte().saturating_sub(1).max(start);
                let mut out = String::new();
                let mut pos = start;
                for part in named_children(node) {
                    if part.kind() != "template_substitution" {
                        continue;
                    }
                    out.push_str(source.get(pos..part.start_byte()).unwrap_or(""));
                    // each substitution follows its own branch of the path
                    let mut branch = path.clone();
                    let folded = part
                        .named_child(0)
                        .and_then(|inner| self.constant_with_path(file, inner, &mut branch));
                    match folded {
                        Some(value) => out.push_str(&value),
                        None => out.push_str(node_text(part, source)),
                    }
                    pos = part.end_byte();
                }
                out.push_str(source.get(pos..end).unwrap_or(""));
                Some(out)
            }
            "binary_expression" => {
                let operator = node.child_by_field_name("operator")?;
                if node_text(operator, source) != "+" {
                    return None;
                }
                let mut right_path = path.clone();
                let left = self.constant_with_path(file, node.child_by_field_name("left")?, path)?;
                let right = self.constant_with_path(
                    file,
                    node.child_by_field_name("right")?,
                    &mut right_path,
                )?;
                Some(left + &right)
            }
            "identifier" | "member_expression" | "subscript_expression" => {
                let resolved = self.resolve_with_path(file, node, path).value()?;
                let kind = resolved.node.kind();
                if !matches!(kind, "string" | "template_string" | "binary_expression") {
                    return None;
                }
                self.constant_with_path(resolved.file, resolved.node, path)
            }
            _ => None,
        }
    }

    fn source(&self, file: FileId) -> &'a str {
        self.project.file(file).source.as_str()
    }

    fn enter(&self, path: &mut ResolutionPath, file: FileId, node: Node<'_>) -> bool {
        path.enter(DeclarationId::of(file, node))
    }

    fn find_binding(&self, file: FileId, reference: Node<'a>, name: &str) -> Option<Binding<'a>> {
        let source = self.source(file);
        for scope in ast::ancestors(reference) {
            let kind = scope.kind();
            if is_function_like(kind) {
                for param in function_parameters(scope) {
                    if pattern_binds(parameter_pattern(param), name, source) {
                        return Some(Binding::Parameter(param));
                    }
                }
                if matches!(kind, "function_expression" | "function") {
                    let own_name = scope.child_by_field_name("name");
                    if own_name.is_some_and(|own| node_text(own, source) == name) {
                        return Some(Binding::Declaration(scope));
                    }
                }
            }
            if matches!(kind, "program" | "statement_block" | "class_static_block") {
                if let Some(binding) = block_binding(scope, name, source) {
                    return Some(binding);
                }
            }
        }
        None
    }

    fn follow_binding(
        &self,
        file: FileId,
        binding: Binding<'a>,
        name: &str,
        path: &mut ResolutionPath,
    ) -> Resolution<'a> {
        let source = self.source(file);
        match binding {
            Binding::Declarator(declarator) => {
                if !self.enter(path, file, declarator) {
                    return Resolution::Unresolved;
                }
                let Some(pattern) = declarator.child_by_field_name("name") else {
                    return Resolution::Unresolved;
                };
                let value = declarator
                    .child_by_field_name("value")
                    .or_else(|| later_assignment(declarator, name, source));
                let Some(value) = value else {
                    return Resolution::Unresolved;
                };
                if pattern.kind() == "identifier" {
                    return self.resolve_with_path(file, value, path);
                }
                let Some(keys) = destructured_keys(pattern, name, source) else {
                    return Resolution::Unresolved;
                };
                let mut current = self.resolve_with_path(file, value, path);
                for key in keys {
                    current = self.select_member(current, &key, path);
                }
                current
            }
            Binding::Declaration(node) => {
                if !self.enter(path, file, node) {
                    return Resolution::Unresolved;
                }
                Resolution::Value(ResolvedNode { file, node })
            }
            Binding::Parameter(node) => {
                if !self.enter(path, file, node) {
                    return Resolution::Unresolved;
                }
                Resolution::Parameter(ResolvedNode { file, node })
            }
            Binding::Import { node, module, kind } => {
                if !self.enter(path, file, node) {
                    return Resolution::Unresolved;
                }
                let Some(specifier) = string_value(module, source) else {
                    return Resolution::Unresolved;
                };
                let Some(target) = self.project.lookup_module(file, &specifier) else {
                    let members = match kind {
                        ImportKind::Named(imported) if imported != "default" => {
                            vec![imported.to_string()]
                        }
                        _ => Vec::new(),
                    };
                    return Resolution::External {
                        module: specifier,
                        members,
                    };
                };
                match kind {
                    ImportKind::Default => self.resolve_export(target, "default", path),
                    ImportKind::Named(imported) => self.resolve_export(target, imported, path),
                    ImportKind::Namespace => Resolution::Module(target),
                    ImportKind::Require => self.module_value(target, path),
                }
            }
        }
    }

    /// `require('x')` / `import('x')` with a literal specifier.
    fn required_specifier(&self, file: FileId, call: Node<'a>) -> Option<String> {
        let source = self.source(file);
        let callee = call_target_node(call)?;
        let name = node_text(callee, source);
        if call.kind() != "call_expression" || (name != "require" && name != "import") {
            return None;
        }
        let first = call_arguments(call).into_iter().next()?;
        string_value(first, source)
    }

    fn resolve_require(
        &self,
        file: FileId,
        specifier: &str,
        path: &mut ResolutionPath,
    ) -> Resolution<'a> {
        match self.project.lookup_module(file, specifier) {
            Some(target) => self.module_value(target, path),
            None => Resolution::External {
                module: specifier.to_string(),
                members: Vec::new(),
            },
        }
    }

    /// What `require` of a project file evaluates to: the `module.exports`
    /// assignment when present, the module namespace otherwise.
    fn module_value(&self, file: FileId, path: &mut ResolutionPath) -> Resolution<'a> {
        match self.module_exports_assignment(file) {
            Some(assignment) => {
                if !self.enter(path, file, assignment) {
                    return Resolution::Unresolved;
                }
                match assignment.child_by_field_name("right") {
                    Some(right) => self.resolve_with_path(file, right, path),
                    None => Resolution::Unresolved,
                }
            }
            None => Resolution::Module(file),
        }
    }

    fn module_exports_assignment(&self, file: FileId) -> Option<Node<'a>> {
        let source = self.source(file);
        top_level_assignments(self.project.file(file).root())
            .into_iter()
            .find(|assignment| {
                assignment
                    .child_by_field_name("left")
                    .is_some_and(|left| node_text(left, source) == "module.exports")
            })
    }

    /// Resolve the binding `file` exports under `name` (`default` included).
    fn resolve_export(&self, file: FileId, name: &str, path: &mut ResolutionPath) -> Resolution<'a> {
        let source = self.source(file);
        let root = self.project.file(file).root();
        let mut star_exports = Vec::new();
        for stmt in named_children(root) {
            if stmt.kind() != "export_statement" {
                continue;
            }
            let is_default = is_default_export(stmt);
            if let Some(declaration) = stmt.child_by_field_name("declaration") {
                if is_default {
                    if name != "default" {
                        continue;
                    }
                    if !self.enter(path, file, stmt) {
                        return Resolution::Unresolved;
                    }
                    return Resolution::Value(ResolvedNode {
                        file,
                        node: declaration,
                    });
                }
                if let Some(binding) = statement_binding(declaration, name, source) {
                    return self.follow_binding(file, binding, name, path);
                }
                continue;
            }
            if let Some(value) = stmt.child_by_field_name("value") {
                if name != "default" {
                    continue;
                }
                if !self.enter(path, file, stmt) {
                    return Resolution::Unresolved;
                }
                return self.resolve_with_path(file, value, path);
            }
            let from = stmt
                .child_by_field_name("source")
                .and_then(|src| string_value(src, source));
            let mut has_clause = false;
            for child in named_children(stmt) {
                match child.kind() {
                    "export_clause" => {
                        has_clause = true;
                        for spec in named_children(child) {
                            if spec.kind() != "export_specifier" {
                                continue;
                            }
                            let Some(local) = spec.child_by_field_name("name") else {
                                continue;
                            };
                            let local = export_name(local, source);
                            let exported = spec
                                .child_by_field_name("alias")
                                .map(|alias| export_name(alias, source))
                                .unwrap_or_else(|| local.clone());
                            if exported != name {
                                continue;
                            }
                            if !self.enter(path, file, spec) {
                                return Resolution::Unresolved;
                            }
                            return match &from {
                                Some(module) => self.resolve_reexport(file, module, &local, path),
                                None => self.resolve_top_level(file, &local, path),
                            };
                        }
                    }
                    "namespace_export" => {
                        has_clause = true;
                        let exported = child
                            .named_child(0)
                            .map(|ident| export_name(ident, source));
                        if exported.as_deref() != Some(name) {
                            continue;
                        }
                        let Some(module) = &from else {
                            continue;
                        };
                        if !self.enter(path, file, stmt) {
                            return Resolution::Unresolved;
                        }
                        return match self.project.lookup_module(file, module) {
                            Some(target) => Resolution::Module(target),
                            None => Resolution::External {
                                module: module.clone(),
                                members: Vec::new(),
                            },
                        };
                    }
                    _ => {}
                }
            }
            if !has_clause {
                if let Some(module) = from {
                    star_exports.push((stmt, module));
                }
            }
        }
        if let Some(resolution) = self.commonjs_export(file, name, path) {
            return resolution;
        }
        for (stmt, module) in star_exports {
            if !self.enter(path, file, stmt) {
                continue;
            }
            let Some(target) = self.project.lookup_module(file, &module) else {
                continue;
            };
            let resolution = self.resolve_export(target, name, path);
            if !resolution.is_unresolved() {
                return resolution;
            }
        }
        Resolution::Unresolved
    }

    fn resolve_reexport(
        &self,
        file: FileId,
        module: &str,
        local: &str,
        path: &mut ResolutionPath,
    ) -> Resolution<'a> {
        match self.project.lookup_module(file, module) {
            Some(target) => self.resolve_export(target, local, path),
            None => Resolution::External {
                module: module.to_string(),
                members: if local == "default" {
                    Vec::new()
                } else {
                    vec![local.to_string()]
                },
            },
        }
    }

    fn resolve_top_level(&self, file: FileId, name: &str, path: &mut ResolutionPath) -> Resolution<'a> {
        let source = self.source(file);
        let root = self.project.file(file).root();
        match block_binding(root, name, source) {
            Some(binding) => self.follow_binding(file, binding, name, path),
            None => Resolution::Unresolved,
        }
    }

    /// `exports.x = ..`, `module.exports.x = ..`, then members of `module.exports = ..`.
    fn commonjs_export(
        &self,
        file: FileId,
        name: &str,
        path: &mut ResolutionPath,
    ) -> Option<Resolution<'a>> {
        let source = self.source(file);
        let assignments = top_level_assignments(self.project.file(file).root());
        for assignment in &assignments {
            let Some(left) = assignment.child_by_field_name("left") else {
                continue;
            };
            let target = node_text(left, source);
            let member = target
                .strip_prefix("module.exports.")
                .or_else(|| target.strip_prefix("exports."));
            if member != Some(name) {
                continue;
            }
            if !self.enter(path, file, *assignment) {
                return Some(Resolution::Unresolved);
            }
            return Some(match assignment.child_by_field_name("right") {
                Some(right) => self.resolve_with_path(file, right, path),
                None => Resolution::Unresolved,
            });
        }
        self.module_exports_assignment(file)?;
        let value = self.module_value(file, path);
        if name == "default" {
            return Some(value);
        }
        Some(self.select_member(value, name, path))
    }

    fn select_member(
        &self,
        base: Resolution<'a>,
        property: &str,
        path: &mut ResolutionPath,
    ) -> Resolution<'a> {
        match base {
            Resolution::Value(resolved) => self.member_of_value(resolved, property, path),
            Resolution::Module(file) => self.resolve_export(file, property, path),
            Resolution::External { module, mut members } => {
                members.push(property.to_string());
                Resolution::External { module, members }
            }
            Resolution::Parameter(_) | Resolution::Unresolved => Resolution::Unresolved,
        }
    }

    fn member_of_value(
        &self,
        resolved: ResolvedNode<'a>,
        property: &str,
        path: &mut ResolutionPath,
    ) -> Resolution<'a> {
        let ResolvedNode { file, node } = resolved;
        let source = self.source(file);
        match node.kind() {
            "object" => {
                for member in named_children(node) {
                    match member.kind() {
                        "pair" => {
                            let key = member
                                .child_by_field_name("key")
                                .and_then(|key| property_key_name(key, source));
                            if key.as_deref() != Some(property) {
                                continue;
                            }
                            if !self.enter(path, file, member) {
                                return Resolution::Unresolved;
                            }
                            return match member.child_by_field_name("value") {
                                Some(value) => self.resolve_with_path(file, value, path),
                                None => Resolution::Unresolved,
                            };
                        }
                        "method_definition" => {
                            let key = member
                                .child_by_field_name("name")
                                .and_then(|key| property_key_name(key, source));
                            if key.as_deref() != Some(property) {
                                continue;
                            }
                            if !self.enter(path, file, member) {
                                return Resolution::Unresolved;
                            }
                            return Resolution::Value(ResolvedNode { file, node: member });
                        }
                        "shorthand_property_identifier" => {
                            if node_text(member, source) == property {
                                return self.resolve_with_path(file, member, path);
                            }
                        }
                        _ => {}
                    }
                }
                Resolution::Unresolved
            }
            kind if is_class_like(kind) => self.class_member(file, node, property, path),
            "call_expression" | "new_expression" => {
                let Some(callee) = call_target_node(node) else {
                    return Resolution::Unresolved;
                };
                match self.resolve_with_path(file, callee, path) {
                    Resolution::External { module, mut members } => {
                        members.push(property.to_string());
                        Resolution::External { module, members }
                    }
                    Resolution::Value(class)
                        if node.kind() == "new_expression" && is_class_like(class.node.kind()) =>
                    {
                        self.class_member(class.file, class.node, property, path)
                    }
                    _ => Resolution::Unresolved,
                }
            }
            _ => Resolution::Unresolved,
        }
    }

    fn this_member(
        &self,
        file: FileId,
        node: Node<'a>,
        property: &str,
        path: &mut ResolutionPath,
    ) -> Resolution<'a> {
        match ast::ancestors(node).find(|parent| is_class_like(parent.kind())) {
            Some(class) => self.class_member(file, class, property, path),
            None => Resolution::Unresolved,
        }
    }

    /// A method, a field initializer, or the first `this.<property> = ..`
    /// assignment inside the class.
    fn class_member(
        &self,
        file: FileId,
        class: Node<'a>,
        property: &str,
        path: &mut ResolutionPath,
    ) -> Resolution<'a> {
        let source = self.source(file);
        let Some(body) = class.child_by_field_name("body") else {
            return Resolution::Unresolved;
        };
        for member in named_children(body) {
            match member.kind() {
                "method_definition" => {
                    let name = member
                        .child_by_field_name("name")
                        .and_then(|name| property_key_name(name, source));
                    if name.as_deref() != Some(property) {
                        continue;
                    }
                    if !self.enter(path, file, member) {
                        return Resolution::Unresolved;
                    }
                    return Resolution::Value(ResolvedNode { file, node: member });
                }
                "public_field_definition" | "field_definition" => {
                    let name = member
                        .child_by_field_name("name")
                        .or_else(|| member.child_by_field_name("property"))
                        .and_then(|name| property_key_name(name, source));
                    if name.as_deref() != Some(property) {
                        continue;
                    }
                    if !self.enter(path, file, member) {
                        return Resolution::Unresolved;
                    }
                    return match member.child_by_field_name("value") {
                        Some(value) => self.resolve_with_path(file, value, path),
                        None => Resolution::Unresolved,
                    };
                }
                _ => {}
            }
        }
        let assignment = ast::collect_nodes(body, |node| node.kind() == "assignment_expression")
            .into_iter()
            .find(|assignment| {
                assignment
                    .child_by_field_name("left")
                    .and_then(|left| ast::member_object_and_property(left, source))
                    .is_some_and(|(object, name)| object.kind() == "this" && name == property)
            });
        let Some(assignment) = assignment else {
            return Resolution::Unresolved;
        };
        if !self.enter(path, file, assignment) {
            return Resolution::Unresolved;
        }
        match assignment.child_by_field_name("right") {
            Some(right) => self.resolve_with_path(file, right, path),
            None => Resolution::Unresolved,
        }
    }
}

/// First declaration of `name` among the direct statements of a block.
fn block_binding<'a>(block: Node<'a>, name: &str, source: &'a str) -> Option<Binding<'a>> {
    named_children(block)
        .into_iter()
        .find_map(|stmt| statement_binding(stmt, name, source))
}

fn statement_binding<'a>(stmt: Node<'a>, name: &str, source: &'a str) -> Option<Binding<'a>> {
    match stmt.kind() {
        "lexical_declaration" | "variable_declaration" => named_children(stmt)
            .into_iter()
            .filter(|declarator| declarator.kind() == "variable_declarator")
            .find(|declarator| {
                declarator
                    .child_by_field_name("name")
                    .is_some_and(|pattern| pattern_binds(pattern, name, source))
            })
            .map(Binding::Declarator),
        "function_declaration"
        | "generator_function_declaration"
        | "class_declaration"
        | "abstract_class_declaration" => {
            let own = stmt.child_by_field_name("name")?;
            (node_text(own, source) == name).then_some(Binding::Declaration(stmt))
        }
        "export_statement" => {
            let declaration = stmt.child_by_field_name("declaration")?;
            statement_binding(declaration, name, source)
        }
        "import_statement" => import_binding(stmt, name, source),
        _ => None,
    }
}

fn import_binding<'a>(stmt: Node<'a>, name: &str, source: &'a str) -> Option<Binding<'a>> {
    let module = stmt.child_by_field_name("source");
    for child in named_children(stmt) {
        match child.kind() {
            "import_clause" => {
                let module = module?;
                for part in named_children(child) {
                    match part.kind() {
                        "identifier" if node_text(part, source) == name => {
                            return Some(Binding::Import {
                                node: part,
                                module,
                                kind: ImportKind::Default,
                            });
                        }
                        "namespace_import" => {
                            let bound = part.named_child(0)?;
                            if node_text(bound, source) == name {
                                return Some(Binding::Import {
                                    node: part,
                                    module,
                                    kind: ImportKind::Namespace,
                                });
                            }
                        }
                        "named_imports" => {
                            for spec in named_children(part) {
                                if spec.kind() != "import_specifier" {
                                    continue;
                                }
                                let Some(imported) = spec.child_by_field_name("name") else {
                                    continue;
                                };
                                let local = spec.child_by_field_name("alias").unwrap_or(imported);
                                if node_text(local, source) != name {
                                    continue;
                                }
                                return Some(Binding::Import {
                                    node: spec,
                                    module,
                                    kind: ImportKind::Named(node_text(imported, source)),
                                });
                            }
                        }
                        _ => {}
                    }
                }
            }
            "import_require_clause" => {
                let bound = child.named_child(0)?;
                if node_text(bound, source) != name {
                    continue;
                }
                let module = child.child_by_field_name("source").or(module)?;
                return Some(Binding::Import {
                    node: child,
                    module,
                    kind: ImportKind::Require,
                });
            }
            _ => {}
        }
    }
    None
}

fn pattern_binds(pattern: Node<'_>, name: &str, source: &str) -> bool {
    match pattern.kind() {
        "identifier" | "shorthand_property_identifier_pattern" => {
            node_text(pattern, source) == name
        }
        "object_pattern" | "array_pattern" | "rest_pattern" => named_children(pattern)
            .into_iter()
            .any(|child| pattern_binds(child, name, source)),
        "pair_pattern" => pattern
            .child_by_field_name("value")
            .is_some_and(|value| pattern_binds(value, name, source)),
        "object_assignment_pattern" | "assignment_pattern" => pattern
            .child_by_field_name("left")
            .is_some_and(|left| pattern_binds(left, name, source)),
        "required_parameter" | "optional_parameter" => {
            pattern_binds(parameter_pattern(pattern), name, source)
        }
        _ => false,
    }
}

/// Property keys leading to `name` inside an object destructuring pattern
/// (`{ a: { b } }` → `["a", "b"]`). Array patterns have no keys.
fn destructured_keys(pattern: Node<'_>, name: &str, source: &str) -> Option<Vec<String>> {
    match pattern.kind() {
        "identifier" => (node_text(pattern, source) == name).then(Vec::new),
        "object_pattern" => {
            for child in named_children(pattern) {
                match child.kind() {
                    "shorthand_property_identifier_pattern" if node_text(child, source) == name => {
                        return Some(vec![name.to_string()]);
                    }
                    "object_assignment_pattern" => {
                        let left = child.child_by_field_name("left")?;
                        if node_text(left, source) == name {
                            return Some(vec![name.to_string()]);
                        }
                    }
                    "pair_pattern" => {
                        let key = child
                            .child_by_field_name("key")
                            .and_then(|key| property_key_name(key, source));
                        let value = child.child_by_field_name("value");
                        let (Some(key), Some(value)) = (key, value) else {
                            continue;
                        };
                        let value = match value.kind() {
                            "assignment_pattern" => value.child_by_field_name("left")?,
                            _ => value,
                        };
                        if let Some(mut rest) = destructured_keys(value, name, source) {
                            rest.insert(0, key);
                            return Some(rest);
                        }
                    }
                    _ => {}
                }
            }
            None
        }
        _ => None,
    }
}

/// `let app; app = express();` binds the declarator to the first later assignment
/// in the same block.
fn later_assignment<'a>(declarator: Node<'a>, name: &str, source: &str) -> Option<Node<'a>> {
    let block = declarator.parent()?.parent()?;
    let after = declarator.end_byte();
    ast::collect_nodes(block, |node| node.kind() == "assignment_expression")
        .into_iter()
        .filter(|assignment| assignment.start_byte() >= after)
        .find(|assignment| {
            assignment
                .child_by_field_name("left")
                .is_some_and(|left| left.kind() == "identifier" && node_text(left, source) == name)
        })
        .and_then(|assignment| assignment.child_by_field_name("right"))
}

fn top_level_assignments(root: Node<'_>) -> Vec<Node<'_>> {
    named_children(root)
        .into_iter()
        .filter(|stmt| stmt.kind() == "expression_statement")
        .filter_map(|stmt| stmt.named_child(0))
        .filter(|expr| expr.kind() == "assignment_expression")
        .collect()
}

fn is_default_export(stmt: Node<'_>) -> bool {
    let mut cursor = stmt.walk();
    let found = stmt.children(&mut cursor).any(|child| child.kind() == "default");
    found
}

/// Export names may be string literals (`export { a as "b" }`).
fn export_name(node: Node<'_>, source: &str) -> String {
    string_value(node, source).unwrap_or_else(|| node_text(node, source).to_string())
}
