// src/config.rs
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_SCRAPE_DELAY: Duration = Duration::from_secs(1);

/// Which kind of text-generation endpoint to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Local completion server with model listing (`/api/tags`, `/api/generate`)
    #[default]
    Local,
    /// Hosted chat-completion API (`/v1/models`, `/v1/chat/completions`)
    Openai,
}

impl BackendKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "local" | "ollama" => Some(BackendKind::Local),
            "openai" | "chat" | "hosted" => Some(BackendKind::Openai),
            _ => None,
        }
    }

    pub fn default_endpoint(self) -> &'static str {
        match self {
            BackendKind::Local => "http://localhost:11434",
            BackendKind::Openai => "https://api.openai.com",
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            BackendKind::Local => "llama3.1",
            BackendKind::Openai => "gpt-4o",
        }
    }
}

/// One source of settings. Every field is optional so layers can be stacked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigLayer {
    pub backend: Option<BackendKind>,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub cv_path: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub input_dir: Option<PathBuf>,
    pub input_pattern: Option<String>,
    pub scrape_delay_secs: Option<f64>,
    pub move_to_bin: Option<bool>,
    pub bin_dir: Option<PathBuf>,
    pub request_timeout_secs: Option<u64>,
    pub generation_timeout_secs: Option<u64>,
}

impl ConfigLayer {
    /// Overlay `higher` on top of `self`; any value set in `higher` wins.
    pub fn merge(self, higher: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            backend: higher.backend.or(self.backend),
            endpoint: higher.endpoint.or(self.endpoint),
            api_key: higher.api_key.or(self.api_key),
            model: higher.model.or(self.model),
            temperature: higher.temperature.or(self.temperature),
            cv_path: higher.cv_path.or(self.cv_path),
            output_dir: higher.output_dir.or(self.output_dir),
            input_dir: higher.input_dir.or(self.input_dir),
            input_pattern: higher.input_pattern.or(self.input_pattern),
            scrape_delay_secs: higher.scrape_delay_secs.or(self.scrape_delay_secs),
            move_to_bin: higher.move_to_bin.or(self.move_to_bin),
            bin_dir: higher.bin_dir.or(self.bin_dir),
            request_timeout_secs: higher.request_timeout_secs.or(self.request_timeout_secs),
            generation_timeout_secs: higher
                .generation_timeout_secs
                .or(self.generation_timeout_secs),
        }
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub backend: BackendKind,
    pub endpoint: String,
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub cv_path: PathBuf,
    pub output_dir: PathBuf,
    pub input_dir: PathBuf,
    pub input_pattern: String,
    pub scrape_delay: Duration,
    pub move_to_bin: bool,
    pub bin_dir: PathBuf,
    pub request_timeout: Duration,
    pub generation_timeout: Duration,
}

impl AppConfig {
    /// Resolve settings with precedence CLI > file > environment > defaults.
    pub fn from_layers(env: ConfigLayer, file: ConfigLayer, cli: ConfigLayer) -> Self {
        Self::from_layer(env.merge(file).merge(cli))
    }

    pub fn from_layer(layer: ConfigLayer) -> Self {
        let backend = layer.backend.unwrap_or_default();
        let scrape_delay = layer
            .scrape_delay_secs
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            .unwrap_or(DEFAULT_SCRAPE_DELAY);

        Self {
            backend,
            endpoint: layer
                .endpoint
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| backend.default_endpoint().to_string()),
            api_key: layer.api_key.filter(|key| !key.trim().is_empty()),
            model: layer
                .model
                .unwrap_or_else(|| backend.default_model().to_string()),
            temperature: layer.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            cv_path: layer
                .cv_path
                .unwrap_or_else(|| PathBuf::from("input/resume.tex")),
            output_dir: layer.output_dir.unwrap_or_else(|| PathBuf::from("output")),
            input_dir: layer.input_dir.unwrap_or_else(|| PathBuf::from("input")),
            input_pattern: layer.input_pattern.unwrap_or_else(|| "*.txt".to_string()),
            scrape_delay,
            move_to_bin: layer.move_to_bin.unwrap_or(false),
            bin_dir: layer.bin_dir.unwrap_or_else(|| PathBuf::from("bin")),
            request_timeout: Duration::from_secs(layer.request_timeout_secs.unwrap_or(30)),
            generation_timeout: Duration::from_secs(
                layer.generation_timeout_secs.unwrap_or(300),
            ),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_layer(ConfigLayer::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_backend() {
        let config = AppConfig::default();
        assert_eq!(config.backend, BackendKind::Local);
        assert_eq!(config.endpoint, "http://localhost:11434");
        assert_eq!(config.model, "llama3.1");
        assert_eq!(config.cv_path, PathBuf::from("input/resume.tex"));
        assert_eq!(config.scrape_delay, Duration::from_secs(1));
        assert!(!config.move_to_bin);

        let hosted = AppConfig::from_layer(ConfigLayer {
            backend: Some(BackendKind::Openai),
            ..Default::default()
        });
        assert_eq!(hosted.endpoint, "https://api.openai.com");
        assert_eq!(hosted.model, "gpt-4o");
    }

    #[test]
    fn cli_beats_file_beats_env() {
        let env = ConfigLayer {
            model: Some("env-model".into()),
            endpoint: Some("http://env:1".into()),
            output_dir: Some("env-out".into()),
            move_to_bin: Some(true),
            ..Default::default()
        };
        let file = ConfigLayer {
            model: Some("file-model".into()),
            endpoint: Some("http://file:2/".into()),
            ..Default::default()
        };
        let cli = ConfigLayer {
            model: Some("cli-model".into()),
            ..Default::default()
        };

        let config = AppConfig::from_layers(env, file, cli);
        assert_eq!(config.model, "cli-model");
        assert_eq!(config.endpoint, "http://file:2");
        assert_eq!(config.output_dir, PathBuf::from("env-out"));
        assert!(config.move_to_bin);
    }

    #[test]
    fn blank_api_key_is_ignored() {
        let config = AppConfig::from_layer(ConfigLayer {
            api_key: Some("  ".into()),
            ..Default::default()
        });
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn out_of_range_delay_falls_back_to_default() {
        for secs in [-1.0, f64::NAN, f64::INFINITY, 1e20] {
            let config = AppConfig::from_layer(ConfigLayer {
                scrape_delay_secs: Some(secs),
                ..Default::default()
            });
            assert_eq!(config.scrape_delay, Duration::from_secs(1), "delay {}", secs);
        }
    }

    #[test]
    fn backend_names() {
        assert_eq!(BackendKind::parse("Ollama"), Some(BackendKind::Local));
        assert_eq!(BackendKind::parse("openai"), Some(BackendKind::Openai));
        assert_eq!(BackendKind::parse("gemini"), None);
    }
}
