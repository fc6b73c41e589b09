//! Per-file import list and enclosing-class facts fed into entity contexts.

use super::SourceFile;
use super::ast::{
    self, call_arguments, call_target_node, decorator_name, decorator_nodes, node_text,
    string_value,
};
use serde::Serialize;
use tree_sitter::Node;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportInfo {
    pub module: String,
    /// Local names bound by the import (default, namespace, named or the
    /// `require` declarator).
    pub bindings: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModuleInfo {
    pub imports: Vec<ImportInfo>,
}

impl ModuleInfo {
    pub fn collect(file: &SourceFile) -> Self {
        let source = file.source.as_str();
        let mut imports = Vec::new();
        let nodes = ast::collect_nodes(file.root(), |node| {
            matches!(node.kind(), "import_statement" | "call_expression")
        });
        for node in nodes {
            let import = match node.kind() {
                "import_statement" => import_from_statement(node, source),
                _ => import_from_call(node, source),
            };
            if let Some(import) = import {
                imports.push(import);
            }
        }
        Self { imports }
    }

    pub fn has_import(&self, module: &str) -> bool {
        self.imports.iter().any(|import| import.module == module)
    }

    pub fn has_any_import(&self, modules: &[&str]) -> bool {
        modules.iter().any(|module| self.has_import(module))
    }

    pub fn has_import_prefix(&self, prefix: &str) -> bool {
        self.imports
            .iter()
            .any(|import| import.module.starts_with(prefix))
    }
}

fn import_from_statement(node: Node<'_>, source: &str) -> Option<ImportInfo> {
    let mut bindings = Vec::new();
    let mut module = node
        .child_by_field_name("source")
        .and_then(|src| string_value(src, source));
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "import_clause" => collect_clause_bindings(child, source, &mut bindings),
            // `import fs = require('fs')`
            "import_require_clause" => {
                if let Some(name) = child.named_child(0) {
                    bindings.push(node_text(name, source).to_string());
                }
                if module.is_none() {
                    module = child
                        .child_by_field_name("source")
                        .and_then(|src| string_value(src, source));
                }
            }
            _ => {}
        }
    }
    Some(ImportInfo {
        module: module?,
        bindings,
    })
}

fn collect_clause_bindings(clause: Node<'_>, source: &str, out: &mut Vec<String>) {
    let mut cursor = clause.walk();
    for child in clause.named_children(&mut cursor) {
        match child.kind() {
            "identifier" => out.push(node_text(child, source).to_string()),
            "namespace_import" => {
                if let Some(name) = child.named_child(0) {
                    out.push(node_text(name, source).to_string());
                }
            }
            "named_imports" => {
                let mut inner = child.walk();
                for spec in child.named_children(&mut inner) {
                    if spec.kind() != "import_specifier" {
                        continue;
                    }
                    let local = spec
                        .child_by_field_name("alias")
                        .or_else(|| spec.child_by_field_name("name"));
                    if let Some(local) = local {
                        out.push(node_text(local, source).to_string());
                    }
                }
            }
            _ => {}
        }
    }
}

/// `require('x')` and `import('x')` calls with a literal specifier.
fn import_from_call(node: Node<'_>, source: &str) -> Option<ImportInfo> {
    let target = call_target_node(node)?;
    let callee = node_text(target, source);
    if callee != "require" && callee != "import" {
        return None;
    }
    let first = call_arguments(node).into_iter().next()?;
    let module = string_value(first, source)?;
    let mut bindings = Vec::new();
    let declarator = ast::ancestors(node)
        .take_while(|parent| {
            matches!(
                parent.kind(),
                "variable_declarator" | "await_expression" | "parenthesized_expression"
            )
        })
        .find(|parent| parent.kind() == "variable_declarator");
    if let Some(name) = declarator.and_then(|decl| decl.child_by_field_name("name")) {
        bindings.push(node_text(name, source).to_string());
    }
    Some(ImportInfo { module, bindings })
}

/// Facts about the class a node is declared in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassInfo {
    pub name: String,
    pub decorators: Vec<String>,
    pub extends: Option<String>,
    pub implements: Vec<String>,
    pub is_abstract: bool,
}

impl ClassInfo {
    pub fn from_node(node: Node<'_>, source: &str) -> Self {
        let name = node
            .child_by_field_name("name")
            .map(|name| node_text(name, source).to_string())
            .or_else(|| assigned_name(node, source))
            .unwrap_or_default();
        let decorators = decorator_nodes(node)
            .into_iter()
            .filter_map(|decorator| decorator_name(decorator, source))
            .collect();
        let (extends, implements) = heritage(node, source);
        Self {
            name,
            decorators,
            extends,
            implements,
            is_abstract: node.kind() == "abstract_class_declaration",
        }
    }

    pub fn enclosing(file: &SourceFile, node: Node<'_>) -> Option<Self> {
        let class = ast::ancestors(node).find(|parent| ast::is_class_like(parent.kind()))?;
        Some(Self::from_node(class, &file.source))
    }

    pub fn has_decorator(&self, name: &str) -> bool {
        self.decorators.iter().any(|decorator| decorator == name)
    }
}

/// `const Foo = class { .. }` names the class after the declarator.
fn assigned_name(node: Node<'_>, source: &str) -> Option<String> {
    let parent = node.parent()?;
    if parent.kind() != "variable_declarator" {
        return None;
    }
    let name = parent.child_by_field_name("name")?;
    Some(node_text(name, source).to_string())
}

fn heritage(node: Node<'_>, source: &str) -> (Option<String>, Vec<String>) {
    let mut extends = None;
    let mut implements = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() != "class_heritage" {
            continue;
        }
        let mut saw_clause = false;
        let mut inner = child.walk();
        for clause in child.named_children(&mut inner) {
            match clause.kind() {
                "extends_clause" => {
                    saw_clause = true;
                    extends = clause_targets(clause, source).into_iter().next();
                }
                "implements_clause" => {
                    saw_clause = true;
                    implements.extend(clause_targets(clause, source));
                }
                _ => {}
            }
        }
        // the JavaScript grammar has no clause nodes: `extends <expr>` directly
        if !saw_clause {
            extends = child
                .named_child(0)
                .map(|target| node_text(target, source).to_string())
                .filter(|target| !target.is_empty());
        }
    }
    (extends, implements)
}

fn clause_targets(node: Node<'_>, source: &str) -> Vec<String> {
    let mut targets = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        let kind = child.kind();
        if kind == "type_arguments" || kind == "type_parameters" || kind == "comment" {
            continue;
        }
        let name = node_text(child, source);
        if !name.is_empty() {
            targets.push(name.to_string());
        }
    }
    targets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::SourceParser;

    fn parse(path: &str, source: &str) -> SourceFile {
        SourceParser::new()
            .unwrap()
            .parse(path, source.to_string())
            .unwrap()
    }

    #[test]
    fn collects_es_and_commonjs_imports() {
        let file = parse(
            "a.ts",
            r#"
import express, { Router as R } from 'express';
import * as path from "path";
import 'reflect-metadata';
const koa = require('koa');
import fs = require('fs');
"#,
        );
        let info = ModuleInfo::collect(&file);
        let modules: Vec<&str> = info.imports.iter().map(|i| i.module.as_str()).collect();
        assert_eq!(modules, vec!["express", "path", "reflect-metadata", "koa", "fs"]);
        assert_eq!(info.imports[0].bindings, vec!["express", "R"]);
        assert_eq!(info.imports[1].bindings, vec!["path"]);
        assert_eq!(info.imports[3].bindings, vec!["koa"]);
        assert_eq!(info.imports[4].bindings, vec!["fs"]);
        assert!(info.has_import("koa"));
        assert!(!info.has_import("ko"));
        assert!(info.has_any_import(&["msw", "express"]));
    }

    #[test]
    fn class_info_reads_typescript_heritage() {
        let file = parse(
            "c.ts",
            r#"
@Controller('users')
export abstract class UsersController extends Base<User> implements OnInit, OnDestroy {
    find(id: string) { return id; }
}
"#,
        );
        let methods = ast::collect_nodes(file.root(), |n| n.kind() == "method_definition");
        let info = ClassInfo::enclosing(&file, methods[0]).unwrap();
        assert_eq!(info.name, "UsersController");
        assert_eq!(info.decorators, vec!["Controller"]);
        assert_eq!(info.extends.as_deref(), Some("Base"));
        assert_eq!(info.implements, vec!["OnInit", "OnDestroy"]);
        assert!(info.is_abstract);
    }

    #[test]
    fn class_info_reads_javascript_extends() {
        let file = parse(
            "c.js",
            "const Svc = class extends events.EventEmitter { run(x) {} };",
        );
        let methods = ast::collect_nodes(file.root(), |n| n.kind() == "method_definition");
        let info = ClassInfo::enclosing(&file, methods[0]).unwrap();
        assert_eq!(info.name, "Svc");
        assert_eq!(info.extends.as_deref(), Some("events.EventEmitter"));
        assert!(info.implements.is_empty());
        assert!(!info.is_abstract);
    }
}
