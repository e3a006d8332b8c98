//! Train the diabetes random forest and write its artifacts.
//!
//! Usage:
//!   cargo run --release --bin train -- [options]
//!
//! Options:
//!   --artifacts <dir>   Artifact directory (default: $DIABETES_ARTIFACT_DIR or `artifacts`)
//!   --offline           Skip the download and use the synthetic table
//!   --csv <path>        Train on a local CSV instead of downloading
//!   --url <url>         Dataset URL (default: $DIABETES_DATASET_URL or the Pima mirror)
//!   --seed <n>          Forest seed (default: 42)
//!   --trees <n>         Number of trees (default: 100)
//!   --depth <n>         Maximum depth (default: 10)
//!   --threads <n>       Worker threads, 0 = all cores (default: 0)
//!   --quiet             Only print errors

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{Context, Result, bail};

use diabetes_rf::config;
use diabetes_rf::training::{self, TrainOptions, Verbosity};
use diabetes_rf::{ArtifactPaths, DataSource, ForestConfig};

const USAGE: &str = "train

  --artifacts <dir>  Artifact directory
  --offline          Use the synthetic dataset, no download
  --csv <path>       Train on a local CSV
  --url <url>        Dataset URL
  --seed <n>         Forest seed (default: 42)
  --trees <n>        Number of trees (default: 100)
  --depth <n>        Maximum depth (default: 10)
  --threads <n>      Worker threads, 0 = all cores
  --quiet            Only print errors";

#[derive(Debug, Default)]
struct Args {
    artifacts: Option<PathBuf>,
    offline: bool,
    csv: Option<PathBuf>,
    url: Option<String>,
    seed: Option<u64>,
    trees: Option<u32>,
    depth: Option<u32>,
    threads: Option<usize>,
    quiet: bool,
    help: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--artifacts" => args.artifacts = Some(PathBuf::from(value(&mut it, &arg)?)),
            "--offline" => args.offline = true,
            "--csv" => args.csv = Some(PathBuf::from(value(&mut it, &arg)?)),
            "--url" => args.url = Some(value(&mut it, &arg)?),
            "--seed" => args.seed = Some(number(&mut it, &arg)?),
            "--trees" => args.trees = Some(number(&mut it, &arg)?),
            "--depth" => args.depth = Some(number(&mut it, &arg)?),
            "--threads" => args.threads = Some(number(&mut it, &arg)?),
            "--quiet" => args.quiet = true,
            "--help" | "-h" => args.help = true,
            other => bail!("unknown argument: {other}\n\n{USAGE}"),
        }
    }
    if args.offline && args.csv.is_some() {
        bail!("--offline and --csv are mutually exclusive");
    }
    Ok(args)
}

fn value(it: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    it.next().with_context(|| format!("{flag} needs a value"))
}

fn number<T>(it: &mut impl Iterator<Item = String>, flag: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = value(it, flag)?;
    raw.parse()
        .with_context(|| format!("{flag}: invalid number {raw:?}"))
}

fn data_source(args: &Args) -> DataSource {
    if let Some(path) = &args.csv {
        DataSource::File(path.clone())
    } else if args.offline || config::is_offline() {
        DataSource::synthetic()
    } else {
        DataSource::Remote {
            url: args.url.clone().unwrap_or_else(config::dataset_url),
            timeout: config::fetch_timeout(),
        }
    }
}

fn forest_config(args: &Args) -> Result<ForestConfig> {
    let defaults = ForestConfig::default();
    ForestConfig::builder()
        .n_trees(args.trees.unwrap_or(defaults.n_trees))
        .max_depth(args.depth.unwrap_or(defaults.max_depth))
        .seed(args.seed.unwrap_or(defaults.seed))
        .maybe_n_threads(args.threads.and_then(NonZeroUsize::new))
        .build()
        .context("invalid forest configuration")
}

fn run() -> Result<()> {
    let args = parse_args()?;
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }

    let artifacts = args
        .artifacts
        .clone()
        .map(ArtifactPaths::new)
        .unwrap_or_else(ArtifactPaths::from_env);

    let mut options = TrainOptions::new(data_source(&args), artifacts);
    options.forest = forest_config(&args)?;
    if args.quiet {
        options.verbosity = Verbosity::Silent;
    }
    log::debug!("training options: {options:?}");

    let report = training::run(&options).context("training failed")?;
    log::info!(
        "trained on {} rows ({}); hold-out accuracy {:.4}, auc {:.4}",
        report.n_train,
        report.provenance,
        report.accuracy,
        report.auc
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
