//! Folder worker: discovers repositories, extracts features from every API call,
//! method and data model in them, collects their TypeGraphQL declarations, and
//! writes the aggregated artifacts.

pub mod output;
pub mod scan;

use crate::config::Config;
use crate::features::{
    FeaturesEntityContext, FeaturesExtractor, api_features_extractor,
    data_model_features_extractor, method_features_extractor,
};
use crate::graphql::{self, GqlDeclaration};
use crate::index;
use crate::model::{
    EntityFeatures, EntityRecord, FeaturesByFile, RepositoryStats, RepositorySummary, RouteIndex,
    RunSummary,
};
use crate::syntax::outline::ModuleInfo;
use crate::syntax::{Project, SourceParser};
use crate::util;
use crate::views::{EntityView, collect_api_calls, collect_data_models, collect_methods};
use anyhow::{Context, Result};
use rayon::prelude::*;
use scan::ScanOptions;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, info_span, warn};

pub const API_CALLS_ARTIFACT: &str = "api-calls";
pub const METHODS_ARTIFACT: &str = "methods";
pub const DATA_MODELS_ARTIFACT: &str = "data-models";
pub const GRAPHQL_ARTIFACT: &str = "graphql";
pub const ROUTES_ARTIFACT: &str = "routes";
pub const SUMMARY_ARTIFACT: &str = "summary";

const ROUTE_FEATURE: &str = "SuspectedApiRouteNormalized";

#[derive(Debug, Clone)]
pub struct WorkerOptions {
    pub dir: PathBuf,
    pub output: PathBuf,
    pub compress: bool,
    pub no_ignore: bool,
}

/// Extract every repository under `options.dir` and write one artifact set per
/// repository plus `summary.json`. A failing repository is logged and recorded
/// in the summary; the others still run.
pub fn run(options: &WorkerOptions, correlation_id: &str) -> Result<RunSummary> {
    let started = Instant::now();
    let repositories = scan::discover_repositories(&options.dir)?;
    info!(
        correlation_id,
        dir = %options.dir.display(),
        repositories = repositories.len(),
        "starting extraction"
    );
    let scan_options = ScanOptions::new(options.no_ignore);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(Config::get().workers)
        .build()
        .context("build worker pool")?;
    let summaries: Vec<RepositorySummary> = pool.install(|| {
        repositories
            .par_iter()
            .map(|repo| {
                let name = repository_name(repo);
                let out_dir = options.output.join(&name);
                match extract_repository(repo, &name, &out_dir, options, &scan_options, correlation_id)
                {
                    Ok(summary) => summary,
                    Err(err) => {
                        error!(correlation_id, repo = %name, "repository failed: {err:#}");
                        RepositorySummary {
                            name,
                            path: repo.display().to_string(),
                            stats: RepositoryStats::default(),
                            artifacts: Vec::new(),
                            error: Some(format!("{err:#}")),
                        }
                    }
                }
            })
            .collect()
    });
    let summary = RunSummary {
        correlation_id: correlation_id.to_string(),
        dir: options.dir.display().to_string(),
        compressed: options.compress,
        repositories: summaries,
        duration_ms: started.elapsed().as_millis() as u64,
    };
    output::write_artifact(&options.output, SUMMARY_ARTIFACT, &summary, false)?;
    info!(
        correlation_id,
        repositories = summary.repositories.len(),
        failed = summary.failed_repositories(),
        duration_ms = summary.duration_ms,
        "extraction finished"
    );
    Ok(summary)
}

fn repository_name(repo: &Path) -> String {
    repo.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "repository".to_string())
}

/// Entity records of one repository, plus the counters gathered on the way.
#[derive(Debug, Default)]
pub struct RepositoryExtraction {
    pub api_calls: Vec<EntityRecord>,
    pub methods: Vec<EntityRecord>,
    pub data_models: Vec<EntityRecord>,
    pub graphql: Vec<GqlDeclaration>,
    pub stats: RepositoryStats,
}

fn extract_repository(
    repo: &Path,
    name: &str,
    out_dir: &Path,
    options: &WorkerOptions,
    scan_options: &ScanOptions,
    correlation_id: &str,
) -> Result<RepositorySummary> {
    let span = info_span!("repository", correlation_id, repo = %name);
    let _guard = span.enter();
    let started = Instant::now();

    let mut extraction = extract_directory(repo, name, scan_options, correlation_id)?;
    let routes = route_index(&extraction.api_calls);
    extraction.stats.routes = routes.len();

    let api_calls = features_by_file(extraction.api_calls);
    let methods = features_by_file(extraction.methods);
    let data_models = features_by_file(extraction.data_models);
    let mut artifacts = Vec::new();
    for path in [
        output::write_artifact(out_dir, API_CALLS_ARTIFACT, &api_calls, options.compress)?,
        output::write_artifact(out_dir, METHODS_ARTIFACT, &methods, options.compress)?,
        output::write_artifact(out_dir, DATA_MODELS_ARTIFACT, &data_models, options.compress)?,
        output::write_artifact(out_dir, GRAPHQL_ARTIFACT, &extraction.graphql, options.compress)?,
        output::write_artifact(out_dir, ROUTES_ARTIFACT, &routes, options.compress)?,
    ] {
        artifacts.push(util::normalize_rel_path(&options.output, &path)?);
    }

    extraction.stats.duration_ms = started.elapsed().as_millis() as u64;
    info!(
        files = extraction.stats.parsed,
        api_calls = extraction.stats.api_calls,
        methods = extraction.stats.methods,
        data_models = extraction.stats.data_models,
        graphql_declarations = extraction.stats.graphql_declarations,
        errors = extraction.stats.errors,
        "repository extracted"
    );
    Ok(RepositorySummary {
        name: name.to_string(),
        path: repo.display().to_string(),
        stats: extraction.stats,
        artifacts,
        error: None,
    })
}

/// Scan, parse and extract one repository. Files that cannot be read or
/// parsed, and entities whose extraction fails, are logged and counted.
pub fn extract_directory(
    repo: &Path,
    name: &str,
    scan_options: &ScanOptions,
    correlation_id: &str,
) -> Result<RepositoryExtraction> {
    let scanned = scan::scan_repo(repo, scan_options)
        .with_context(|| format!("scan {}", repo.display()))?;
    let mut stats = RepositoryStats {
        scanned: scanned.files.len(),
        skipped: scanned.skipped,
        ..RepositoryStats::default()
    };

    let mut parser = SourceParser::new()?;
    let mut project = Project::new(name);
    for file in &scanned.files {
        let source = match util::read_to_string(&file.abs_path) {
            Ok(source) => source,
            Err(err) => {
                warn!(path = %file.rel_path, "skipping unreadable file: {err:#}");
                stats.errors += 1;
                continue;
            }
        };
        match parser.parse(&file.rel_path, source) {
            Ok(parsed) => {
                project.add(parsed);
            }
            Err(err) => {
                warn!(path = %file.rel_path, "skipping unparsable file: {err:#}");
                stats.errors += 1;
            }
        }
    }
    stats.parsed = project.len();

    let api_extractor = api_features_extractor(name, correlation_id)?;
    let method_extractor = method_features_extractor(name, correlation_id)?;
    let data_model_extractor = data_model_features_extractor(name, correlation_id)?;
    let mut extraction = RepositoryExtraction {
        stats,
        ..RepositoryExtraction::default()
    };
    for (file_id, file) in project.files() {
        let module = Arc::new(ModuleInfo::collect(file));
        let api_views = collect_api_calls(&project, file_id)
            .into_iter()
            .map(EntityView::from);
        extract_views(
            &api_extractor,
            api_views,
            &module,
            correlation_id,
            &mut extraction.api_calls,
            &mut extraction.stats.errors,
        );
        let method_views = collect_methods(&project, file_id)
            .into_iter()
            .map(EntityView::from);
        extract_views(
            &method_extractor,
            method_views,
            &module,
            correlation_id,
            &mut extraction.methods,
            &mut extraction.stats.errors,
        );
        let data_model_views = collect_data_models(&project, file_id, &module)
            .into_iter()
            .map(EntityView::from);
        extract_views(
            &data_model_extractor,
            data_model_views,
            &module,
            correlation_id,
            &mut extraction.data_models,
            &mut extraction.stats.errors,
        );
    }
    extraction.graphql = graphql::extract_project(&project);
    extraction.stats.api_calls = extraction.api_calls.len();
    extraction.stats.methods = extraction.methods.len();
    extraction.stats.data_models = extraction.data_models.len();
    extraction.stats.graphql_declarations = extraction.graphql.len();
    Ok(extraction)
}

fn extract_views<'a>(
    extractor: &FeaturesExtractor,
    views: impl Iterator<Item = EntityView<'a>>,
    module: &Arc<ModuleInfo>,
    correlation_id: &str,
    records: &mut Vec<EntityRecord>,
    errors: &mut usize,
) {
    for view in views {
        let context = FeaturesEntityContext::for_entity(&view, correlation_id, Arc::clone(module));
        match extractor.features_values(&view, &context) {
            Ok(features) => records.push(EntityRecord {
                path: context.path,
                key: view.key().to_string(),
                features,
            }),
            Err(err) => {
                error!(entity = %view.key(), "feature extraction failed: {err}");
                *errors += 1;
            }
        }
    }
}

/// Group records by file; within a file the first record per entity key wins.
pub fn features_by_file(records: Vec<EntityRecord>) -> FeaturesByFile {
    index::index_by(
        records,
        |record| record.path.clone(),
        |record| BTreeMap::from([(record.key, record.features)]),
        |entities: &mut EntityFeatures, record| {
            entities.entry(record.key).or_insert(record.features);
        },
    )
}

/// Normalized route → keys of the API calls registering it.
pub fn route_index(records: &[EntityRecord]) -> RouteIndex {
    let pairs = records.iter().filter_map(|record| {
        let route = record
            .features
            .iter()
            .find(|feature| feature.name == ROUTE_FEATURE)
            .and_then(|feature| feature.value.as_text())
            .filter(|route| !route.is_empty())?;
        Some((route.to_string(), record.key.clone()))
    });
    index::group_by_key(pairs, |(route, _)| route.clone())
        .into_iter()
        .map(|(route, pairs)| (route, pairs.into_iter().map(|(_, key)| key).collect()))
        .collect()
}
