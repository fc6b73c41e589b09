use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "featurex",
    version,
    about = "Static feature extraction for JavaScript/TypeScript repositories",
    after_help = r#"Examples:
  featurex --dir ./repos
  featurex -d ./repos --compress
  featurex -d ./repos -o /tmp/features --no-ignore
"#
)]
pub struct Args {
    /// Folder containing one or more repositories to extract.
    #[arg(short = 'd', long)]
    pub dir: Option<PathBuf>,
    /// Write deflate-compressed artifacts.
    #[arg(short = 'c', long)]
    pub compress: bool,
    /// Output directory (defaults to <dir>/.featurex).
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
    /// Include files ignored by .gitignore.
    #[arg(long)]
    pub no_ignore: bool,
}

impl Args {
    pub fn output_dir(&self, dir: &std::path::Path) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| dir.join(".featurex"))
    }
}
