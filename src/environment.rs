// src/environment.rs
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::config::{BackendKind, ConfigLayer};

/// Build the environment layer from the process environment.
///
/// A `.env` file in the working directory is loaded first when present.
pub fn load() -> ConfigLayer {
    match dotenvy::dotenv() {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => warn!("Ignoring unreadable .env file: {}", e),
    }

    from_lookup(|key| std::env::var(key).ok())
}

/// Build the environment layer from any key lookup.
pub fn from_lookup<F>(lookup: F) -> ConfigLayer
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    ConfigLayer {
        backend: get("COVER_LETTER_BACKEND").and_then(|v| {
            let kind = BackendKind::parse(&v);
            if kind.is_none() {
                warn!("Unknown COVER_LETTER_BACKEND value: {}", v);
            }
            kind
        }),
        endpoint: get("LLM_BASE_URL"),
        api_key: get("OPENAI_API_KEY"),
        model: get("COVER_LETTER_MODEL"),
        temperature: parsed(&get, "COVER_LETTER_TEMPERATURE"),
        cv_path: get("CV_PATH").map(PathBuf::from),
        output_dir: get("OUTPUT_DIR").map(PathBuf::from),
        input_dir: get("INPUT_DIR").map(PathBuf::from),
        input_pattern: get("INPUT_PATTERN"),
        scrape_delay_secs: parsed(&get, "SCRAPE_DELAY"),
        move_to_bin: get("MOVE_TO_BIN").and_then(|v| parse_flag("MOVE_TO_BIN", &v)),
        bin_dir: get("BIN_DIR").map(PathBuf::from),
        request_timeout_secs: parsed(&get, "REQUEST_TIMEOUT_SECS"),
        generation_timeout_secs: parsed(&get, "GENERATION_TIMEOUT_SECS"),
    }
}

fn parsed<T, G>(get: &G, key: &str) -> Option<T>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    let raw = get(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring invalid {} value: {}", key, raw);
            None
        }
    }
}

fn parse_flag(key: &str, value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            warn!("Ignoring invalid {} value: {}", key, value);
            None
        }
    }
}
