use criterion::{Criterion, black_box, criterion_group, criterion_main};
use featurex::features::{FeaturesEntityContext, api_features_extractor, method_features_extractor};
use featurex::syntax::outline::ModuleInfo;
use featurex::syntax::{FileId, Project, SourceParser};
use featurex::views::{EntityView, collect_api_calls, collect_methods};
use std::fmt::Write;
use std::sync::Arc;

fn router_source(routes: usize) -> String {
    let mut source = String::from(
        "const express = require('express');\nconst { requireUser } = require('./auth');\nconst router = express.Router();\n",
    );
    for idx in 0..routes {
        let _ = writeln!(
            source,
            "router.get('/resources/{idx}/:id', requireUser, async (req, res) => {{\n  const item = await db.find(req.params.id);\n  res.json(item);\n}});"
        );
    }
    source.push_str("module.exports = router;\n");
    source
}

fn build_project(routes: usize) -> Project {
    let mut parser = SourceParser::new().unwrap();
    let mut project = Project::new("bench");
    project.add(parser.parse("src/routes.js", router_source(routes)).unwrap());
    project.add(
        parser
            .parse(
                "src/auth.js",
                "exports.requireUser = function (req, res, next) { next(); };\n".to_string(),
            )
            .unwrap(),
    );
    project
}

fn bench_api_calls(c: &mut Criterion) {
    let project = build_project(200);
    let extractor = api_features_extractor("bench", "bench").unwrap();
    let module = Arc::new(ModuleInfo::collect(project.file(FileId(0))));
    c.bench_function("api_call_features_200_routes", |b| {
        b.iter(|| {
            let mut count = 0;
            for view in collect_api_calls(&project, FileId(0)) {
                let view = EntityView::from(view);
                let context = FeaturesEntityContext::for_entity(&view, "bench", Arc::clone(&module));
                count += extractor.features_values(&view, &context).unwrap().len();
            }
            black_box(count)
        })
    });
}

fn bench_methods(c: &mut Criterion) {
    let project = build_project(200);
    let extractor = method_features_extractor("bench", "bench").unwrap();
    let module = Arc::new(ModuleInfo::collect(project.file(FileId(0))));
    c.bench_function("method_features_200_handlers", |b| {
        b.iter(|| {
            let mut count = 0;
            for view in collect_methods(&project, FileId(0)) {
                let view = EntityView::from(view);
                let context = FeaturesEntityContext::for_entity(&view, "bench", Arc::clone(&module));
                count += extractor.features_values(&view, &context).unwrap().len();
            }
            black_box(count)
        })
    });
}

fn bench_parse(c: &mut Criterion) {
    let source = router_source(200);
    c.bench_function("parse_200_routes", |b| {
        let mut parser = SourceParser::new().unwrap();
        b.iter(|| black_box(parser.parse("src/routes.js", source.clone()).unwrap()))
    });
}

criterion_group!(benches, bench_api_calls, bench_methods, bench_parse);
criterion_main!(benches);
