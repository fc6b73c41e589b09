use featurex::syntax::resolve::{Resolution, ResolutionPath, Resolver};
use featurex::syntax::{FileId, Project, SourceParser, ast};
use featurex::views::{ApiCallView, collect_api_calls};

fn project(files: &[(&str, &str)]) -> Project {
    let mut parser = SourceParser::new().unwrap();
    let mut project = Project::new("repo");
    for (path, source) in files {
        project.add(parser.parse(path, source.to_string()).unwrap());
    }
    project
}

fn call<'a>(project: &'a Project, path: &str, full_name: &str) -> ApiCallView<'a> {
    let file = project.file_id(path).unwrap();
    collect_api_calls(project, file)
        .into_iter()
        .find(|view| view.full_name() == full_name)
        .unwrap_or_else(|| panic!("no call {full_name} in {path}"))
}

#[test]
fn handler_imported_from_commonjs_module_is_internal() {
    let project = project(&[
        (
            "src/routes.js",
            "const express = require('express');\nconst { listUsers } = require('./controllers/users');\nconst router = express.Router();\nrouter.get('/users', listUsers);\n",
        ),
        (
            "src/controllers/users.js",
            "exports.listUsers = function (req, res) {\n  res.json([]);\n};\n",
        ),
    ]);
    let view = call(&project, "src/routes.js", "router.get");
    let (internal, external) = view.referenced_methods();
    assert!(external.is_empty());
    assert_eq!(internal.len(), 1);
    assert!(internal[0].starts_with("src/controllers/users.js+0+"));
    assert_eq!(view.receiver_origin(), "express");
}

#[test]
fn es_module_handler_through_index_file() {
    let project = project(&[
        (
            "app.ts",
            "import { Router } from 'express';\nimport { createOrder } from './orders';\nconst router = Router();\nrouter.post('/orders', createOrder);\n",
        ),
        ("orders/index.ts", "export { createOrder } from './handlers';\n"),
        (
            "orders/handlers.ts",
            "export async function createOrder(req, res) {\n  res.status(201).end();\n}\n",
        ),
    ]);
    let view = call(&project, "app.ts", "router.post");
    let (internal, _) = view.referenced_methods();
    assert_eq!(internal.len(), 1);
    assert!(internal[0].starts_with("orders/handlers.ts+0+"));
    assert_eq!(view.receiver_origin(), "express");
    assert_eq!(view.argument_arities(), vec![None, Some(2)]);
}

#[test]
fn re_export_loop_terminates_unresolved() {
    let project = project(&[
        ("a.js", "export { handler } from './b';\n"),
        ("b.js", "export { handler } from './a';\n"),
        (
            "server.js",
            "import { handler } from './a';\napp.get('/loop', handler);\n",
        ),
    ]);
    let view = call(&project, "server.js", "app.get");
    let (internal, external) = view.referenced_methods();
    assert!(internal.is_empty());
    assert_eq!(external, ["handler".to_string()]);
}

#[test]
fn self_referencing_object_terminates() {
    let project = project(&[(
        "api.js",
        "const api = { get: (path, fn) => api.get(path, fn) };\napi.get('/x', (req, res) => {});\n",
    )]);
    let file = FileId(0);
    let root = project.file(file).root();
    let identifiers = ast::collect_nodes(root, |node| {
        node.kind() == "identifier" && project.file(file).text(node) == "api"
    });
    let resolver = Resolver::new(&project);
    for identifier in identifiers {
        let resolution = resolver.resolve(file, identifier);
        assert!(matches!(
            resolution,
            Resolution::Value(_) | Resolution::Unresolved
        ));
    }
}

#[test]
fn mutual_alias_chain_is_unresolved_with_shared_path() {
    let project = project(&[("a.js", "var a = b;\nvar b = c;\nvar c = a;\nuse(a);\n")]);
    let file = FileId(0);
    let source_file = project.file(file);
    let argument = ast::collect_nodes(source_file.root(), |node| {
        node.kind() == "identifier"
            && source_file.text(node) == "a"
            && node.parent().is_some_and(|parent| parent.kind() == "arguments")
    })[0];
    let resolver = Resolver::new(&project);
    let mut path = ResolutionPath::new();
    assert!(
        resolver
            .resolve_with_path(file, argument, &mut path)
            .is_unresolved()
    );
    assert_eq!(path.len(), 3);
}

#[test]
fn koa_router_on_class_field() {
    let project = project(&[(
        "server.js",
        "const Router = require('koa-router');\nclass Api {\n  constructor() {\n    this.router = new Router();\n  }\n  mount() {\n    this.router.get('/status', async (ctx) => { ctx.body = 'ok'; });\n  }\n}\n",
    )]);
    let view = call(&project, "server.js", "this.router.get");
    assert_eq!(view.owner_text(), "this.router");
    assert_eq!(view.receiver_origin(), "koa-router");
}
