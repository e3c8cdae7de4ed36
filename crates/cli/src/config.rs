use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub(crate) const MODEL_PATH_ENV: &str = "W2VGREP_MODEL_PATH";
const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_DIR_NAME: &str = "semantic-grep";

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) model_path: Option<PathBuf>,
}

/// `./config.json`, then the per-user and system-wide locations.
pub(crate) fn config_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Some(home) = dirs::home_dir() {
        candidates.push(
            home.join(".config")
                .join(CONFIG_DIR_NAME)
                .join(CONFIG_FILE_NAME),
        );
    }
    candidates.push(
        Path::new("/etc")
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME),
    );
    candidates
}

pub(crate) fn find_config_file(candidates: &[PathBuf]) -> Option<&Path> {
    candidates
        .iter()
        .map(PathBuf::as_path)
        .find(|path| path.is_file())
}

pub(crate) fn load_config(path: &Path) -> Result<Config> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read config {}", path.display()))?;
    serde_json::from_slice(&bytes)
        .with_context(|| format!("Failed to parse config {}", path.display()))
}

/// Model path from the flag, the environment, or the first config file found.
pub(crate) fn resolve_model_path(flag: Option<PathBuf>) -> Result<PathBuf> {
    resolve_model_path_from(flag, env::var_os(MODEL_PATH_ENV), &config_candidates())
}

fn resolve_model_path_from(
    flag: Option<PathBuf>,
    env_value: Option<std::ffi::OsString>,
    candidates: &[PathBuf],
) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }
    if let Some(value) = env_value.filter(|v| !v.is_empty()) {
        log::debug!("Model path taken from {MODEL_PATH_ENV}");
        return Ok(PathBuf::from(value));
    }

    if let Some(path) = find_config_file(candidates) {
        log::info!("Using config {}", path.display());
        if let Some(model_path) = load_config(path)?.model_path {
            return Ok(model_path);
        }
    }

    anyhow::bail!(
        "Model path is required. Pass -m/--model_path, set {MODEL_PATH_ENV}, \
         or add \"model_path\" to {CONFIG_FILE_NAME}"
    )
}
