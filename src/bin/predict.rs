//! Score one JSON record and print a single JSON line.
//!
//! Usage:
//!   predict [--rules] [input.json]
//!
//! Reads the request from the given file, or all of stdin when no path is
//! given. Artifacts are looked up in `$DIABETES_ARTIFACT_DIR` (default
//! `artifacts`). Exits 0 on success and 1 when an error payload is printed.

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use diabetes_rf::inference::{PredictError, PredictionResponse, respond, respond_with_rules};
use diabetes_rf::ArtifactPaths;

fn read_request(path: Option<&PathBuf>) -> Result<String, PredictError> {
    match path {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut raw = String::new();
            std::io::stdin().read_to_string(&mut raw)?;
            Ok(raw)
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut use_rules = false;
    let mut path = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--rules" => use_rules = true,
            _ if path.is_none() => path = Some(PathBuf::from(&arg)),
            other => log::warn!("ignoring extra argument {other:?}"),
        }
    }

    let response = match read_request(path.as_ref()) {
        Ok(raw) if use_rules => respond_with_rules(&raw),
        Ok(raw) => respond(&ArtifactPaths::from_env(), &raw),
        Err(err) => PredictionResponse::from(err),
    };

    println!("{response}");
    ExitCode::from(response.exit_code())
}
