//! lungscan CLI - classify lung tissue scans.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lungscan::{ClassifierWorker, Config, Pipeline, Verdict};

/// Classify lung histopathology scans with an ONNX model.
#[derive(Parser, Debug)]
#[command(name = "lungscan")]
#[command(version, about, long_about = None)]
struct Args {
    /// Scan image paths.
    #[arg(value_name = "SCAN", required = true)]
    scans: Vec<PathBuf>,

    /// ONNX model path. Defaults to lung_classifier.onnx in the model cache directory.
    #[arg(short, long, env = "LUNGSCAN_MODEL", value_name = "PATH")]
    model: Option<PathBuf>,

    /// Threads ONNX Runtime may use per inference.
    #[arg(long, default_value = "1", value_name = "INT")]
    threads: usize,

    /// Print one JSON verdict per line instead of text.
    #[arg(long)]
    json: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("lungscan={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Classify every scan; returns whether all of them succeeded.
fn run(args: &Args) -> Result<bool> {
    let config = Config {
        model_path: args.model.clone(),
        intra_threads: args.threads,
    };

    let pipeline = Pipeline::new(&config).context("Failed to initialize pipeline")?;
    let worker = ClassifierWorker::spawn(pipeline).context("Failed to start worker")?;

    let pending: Vec<_> = args
        .scans
        .iter()
        .map(|path| (path, worker.submit(path.clone())))
        .collect();

    let pb = (pending.len() > 1).then(|| progress_bar(pending.len() as u64));

    let mut all_ok = true;
    for (path, verdict) in pending {
        let outcome = verdict
            .wait()
            .with_context(|| format!("Failed to classify {}", path.display()));

        match outcome {
            Ok(verdict) => {
                let line = render(path, &verdict, args.json)?;
                match &pb {
                    Some(pb) => pb.println(line),
                    None => println!("{line}"),
                }
            }
            Err(err) => {
                all_ok = false;
                tracing::error!("{err:#}");
            }
        }

        if let Some(pb) = &pb {
            pb.inc(1);
        }
    }

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    Ok(all_ok)
}

fn progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} Classifying [{bar:40.cyan/blue}] {pos}/{len}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}

fn render(path: &Path, verdict: &Verdict, json: bool) -> Result<String> {
    if json {
        let value = serde_json::json!({
            "scan": path,
            "verdict": verdict,
        });
        return serde_json::to_string(&value).context("Failed to serialize verdict");
    }

    Ok(format!(
        "{}\n  {}\n  {}",
        path.display(),
        verdict.headline,
        verdict.description
    ))
}
