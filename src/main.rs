use anyhow::Result;
use clap::Parser;
use featurex::{cli, worker};
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn correlation_id(dir: &Path) -> String {
    dir.canonicalize()
        .ok()
        .as_deref()
        .unwrap_or(dir)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "featurex".to_string())
}

fn main() -> ExitCode {
    let args = cli::Args::parse();
    let Some(dir) = args.dir.clone() else {
        eprintln!("error: --dir is required");
        return ExitCode::from(1);
    };
    if !dir.is_dir() {
        eprintln!("error: {} is not an existing directory", dir.display());
        return ExitCode::from(1);
    }
    init_tracing();
    match run(&args, &dir) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(1)
        }
    }
}

fn run(args: &cli::Args, dir: &Path) -> Result<()> {
    let options = worker::WorkerOptions {
        dir: dir.to_path_buf(),
        output: args.output_dir(dir),
        compress: args.compress,
        no_ignore: args.no_ignore,
    };
    let summary = worker::run(&options, &correlation_id(dir))?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
