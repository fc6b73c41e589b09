use featurex::features::FeatureData;
use featurex::model::{FeaturesByFile, RouteIndex, RunSummary};
use featurex::worker::{self, WorkerOptions};
use std::fs;
use std::io::Read;
use std::path::Path;

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn seed(root: &Path) {
    write(
        root,
        "shop/src/server.js",
        r#"
const express = require('express');
const { listItems } = require('./items');
const app = express();
app.get('/items', listItems);
app.get('/items/:id', (req, res) => res.json({}));
app.listen(3000);
"#,
    );
    write(
        root,
        "shop/src/items.js",
        "exports.listItems = function (req, res) {\n  res.json([]);\n};\n",
    );
    write(
        root,
        "shop/src/item.model.js",
        "const mongoose = require('mongoose');\nconst itemSchema = new mongoose.Schema({ name: String, tags: [String] });\nmodule.exports = mongoose.model('Item', itemSchema);\n",
    );
    write(root, "shop/node_modules/express/index.js", "module.exports = function () {};\n");
    write(
        root,
        "blog/api.ts",
        "import Router from 'koa-router';\nconst router = new Router();\nrouter.post('/posts/{slug}', async (ctx) => {});\n",
    );
    write(root, "blog/broken.ts", "router.get('/still', handler);\nexport const = ;\n");
}

#[test]
fn writes_one_artifact_set_per_repository() {
    let dir = tempfile::tempdir().unwrap();
    seed(dir.path());
    let output = dir.path().join(".featurex");
    let options = WorkerOptions {
        dir: dir.path().to_path_buf(),
        output: output.clone(),
        compress: false,
        no_ignore: true,
    };
    let summary = worker::run(&options, "repos").unwrap();

    let names: Vec<&str> = summary.repositories.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["blog", "shop"]);
    assert_eq!(summary.failed_repositories(), 0);

    let shop = &summary.repositories[1];
    assert_eq!(shop.stats.scanned, 3);
    assert_eq!(shop.stats.parsed, 3);
    assert_eq!(shop.stats.errors, 0);
    assert_eq!(shop.stats.data_models, 1);
    assert_eq!(shop.stats.graphql_declarations, 0);
    assert_eq!(
        shop.artifacts,
        vec![
            "shop/api-calls.json",
            "shop/methods.json",
            "shop/data-models.json",
            "shop/graphql.json",
            "shop/routes.json",
        ]
    );

    let data_models: FeaturesByFile =
        serde_json::from_str(&fs::read_to_string(output.join("shop/data-models.json")).unwrap())
            .unwrap();
    let item = data_models["src/item.model.js"].values().next().unwrap();
    let name = item.iter().find(|feature| feature.name == "DataModelName").unwrap();
    assert_eq!(name.value, FeatureData::text("Item"));
    let graphql: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(output.join("shop/graphql.json")).unwrap())
            .unwrap();
    assert_eq!(graphql, serde_json::json!([]));

    let api_calls: FeaturesByFile =
        serde_json::from_str(&fs::read_to_string(output.join("shop/api-calls.json")).unwrap())
            .unwrap();
    let server = &api_calls["src/server.js"];
    let routes: Vec<&FeatureData> = server
        .values()
        .filter_map(|features| {
            features
                .iter()
                .find(|feature| feature.name == "SuspectedApiRoute")
                .map(|feature| &feature.value)
        })
        .filter(|value| !value.is_empty())
        .collect();
    assert!(routes.contains(&&FeatureData::text("/items")));
    assert!(routes.contains(&&FeatureData::text("/items/:id")));

    let route_index: RouteIndex =
        serde_json::from_str(&fs::read_to_string(output.join("shop/routes.json")).unwrap())
            .unwrap();
    assert_eq!(route_index.len(), 2);
    assert_eq!(route_index["/items/{}"].len(), 1);

    let methods: FeaturesByFile =
        serde_json::from_str(&fs::read_to_string(output.join("shop/methods.json")).unwrap())
            .unwrap();
    assert!(methods.contains_key("src/items.js"));

    let written: RunSummary =
        serde_json::from_str(&fs::read_to_string(output.join("summary.json")).unwrap()).unwrap();
    assert_eq!(written, summary);
    assert_eq!(written.correlation_id, "repos");
}

#[test]
fn malformed_files_do_not_stop_the_repository() {
    let dir = tempfile::tempdir().unwrap();
    seed(dir.path());
    let options = WorkerOptions {
        dir: dir.path().join("blog"),
        output: dir.path().join("out"),
        compress: false,
        no_ignore: true,
    };
    let summary = worker::run(&options, "blog").unwrap();
    assert_eq!(summary.repositories.len(), 1);
    let blog = &summary.repositories[0];
    assert_eq!(blog.name, "blog");
    assert_eq!(blog.stats.parsed, 2);
    assert!(blog.stats.api_calls >= 2);
    let routes: RouteIndex = serde_json::from_str(
        &fs::read_to_string(dir.path().join("out/blog/routes.json")).unwrap(),
    )
    .unwrap();
    assert!(routes.contains_key("/posts/{}"));
    assert!(routes.contains_key("/still"));
}

#[test]
fn compressed_artifacts_are_zip_archives() {
    let dir = tempfile::tempdir().unwrap();
    seed(dir.path());
    let output = dir.path().join("zipped");
    let options = WorkerOptions {
        dir: dir.path().to_path_buf(),
        output: output.clone(),
        compress: true,
        no_ignore: true,
    };
    let summary = worker::run(&options, "repos").unwrap();
    assert!(summary.compressed);
    let archive_path = output.join("shop/api-calls.json.zip");
    let mut archive = zip::ZipArchive::new(fs::File::open(archive_path).unwrap()).unwrap();
    let mut entry = archive.by_name("api-calls.json").unwrap();
    let mut text = String::new();
    entry.read_to_string(&mut text).unwrap();
    let api_calls: FeaturesByFile = serde_json::from_str(&text).unwrap();
    assert!(api_calls.contains_key("src/server.js"));
    assert!(output.join("summary.json").exists());
}
