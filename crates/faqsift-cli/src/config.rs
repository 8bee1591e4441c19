//! Configuration loading and path resolution for the CLI.
//!
//! The selection config is read from a TOML file found by, in order:
//! - the `--config` argument
//! - the `$FAQSIFT_CONFIG` environment variable
//! - `faqsift.toml` in the platform config directory
//!
//! If none exists, built-in defaults are used. Command-line overrides are
//! applied last, then the result is validated.

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use faqsift_core::SelectionConfig;
use std::path::{Path, PathBuf};
use tracing::info;

/// Config file name inside the platform config directory
const CONFIG_FILENAME: &str = "faqsift.toml";

/// Environment variable for a custom config file
const CONFIG_ENV: &str = "FAQSIFT_CONFIG";

/// Returns the platform config directory.
///
/// - macOS: `~/Library/Application Support/dev.faqsift.faqsift/`
/// - Linux: `~/.config/faqsift/`
/// - Windows: `%APPDATA%\faqsift\faqsift\config\`
pub fn config_dir() -> Option<PathBuf> {
    ProjectDirs::from("dev", "faqsift", "faqsift").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Picks the config file to load, if any.
///
/// An explicit path or environment path must exist; the platform default is
/// only used when present.
pub fn resolve_config_path(
    explicit: Option<&Path>,
    env_value: Option<String>,
    default_dir: Option<PathBuf>,
) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(anyhow!("Config file not found: {}", path.display()));
        }
        return Ok(Some(path.to_path_buf()));
    }

    if let Some(value) = env_value.filter(|v| !v.is_empty()) {
        let path = PathBuf::from(value);
        if !path.exists() {
            return Err(anyhow!(
                "Config file from ${} not found: {}",
                CONFIG_ENV,
                path.display()
            ));
        }
        return Ok(Some(path));
    }

    Ok(default_dir
        .map(|dir| dir.join(CONFIG_FILENAME))
        .filter(|path| path.exists()))
}

/// Parses a TOML selection config. Missing keys take their defaults.
pub fn parse_config(text: &str) -> Result<SelectionConfig> {
    toml::from_str(text).context("Invalid config file")
}

/// Loads the selection config (defaults when no file is found).
pub fn load_config(explicit: Option<&Path>) -> Result<SelectionConfig> {
    let path = resolve_config_path(explicit, std::env::var(CONFIG_ENV).ok(), config_dir())?;

    match path {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config = parse_config(&text)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            info!(path = %path.display(), "Loaded config");
            Ok(config)
        }
        None => Ok(SelectionConfig::default()),
    }
}

/// Command-line settings that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub top_n: Option<usize>,
    pub random_seed: Option<u64>,
    pub reduced_dim: Option<usize>,
    pub representatives: Option<usize>,
    pub word_budget: Option<usize>,
}

impl Overrides {
    /// Applies the overrides and validates the result.
    pub fn apply(self, mut config: SelectionConfig) -> Result<SelectionConfig> {
        if let Some(top_n) = self.top_n {
            config.top_n = top_n;
        }
        if let Some(seed) = self.random_seed {
            config.random_seed = seed;
        }
        if let Some(dim) = self.reduced_dim {
            config.reduced_dim = Some(dim);
        }
        if let Some(count) = self.representatives {
            config.representatives_per_subcluster = count;
        }
        if let Some(budget) = self.word_budget {
            config.word_budget = Some(budget);
        }

        config.validate().map_err(|e| anyhow!(e))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faqsift_core::SizeNormalization;
    use std::io::Write;

    #[test]
    fn test_parse_partial_config() {
        let config = parse_config(
            r#"
top_n = 20
k_candidates = [2, 3, 4]
size_normalization = "global"

[weights]
cohesion = 1.5

[size_band]
min = 0.1
"#,
        )
        .unwrap();

        assert_eq!(config.top_n, 20);
        assert_eq!(config.size_normalization, SizeNormalization::Global);
        assert_eq!(config.weights.cohesion, 1.5);
        assert_eq!(config.weights.size, 0.4);
        assert_eq!(config.size_band.min, 0.1);
        assert_eq!(config.size_band.max, 0.80);
    }

    #[test]
    fn test_parse_rejects_unknown_types() {
        assert!(parse_config("top_n = \"many\"").is_err());
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let missing = PathBuf::from("/nonexistent/faqsift.toml");
        assert!(resolve_config_path(Some(&missing), None, None).is_err());
    }

    #[test]
    fn test_explicit_path_wins_over_env() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let resolved =
            resolve_config_path(Some(file.path()), Some("/elsewhere.toml".to_string()), None)
                .unwrap();
        assert_eq!(resolved.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_env_path() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let env = file.path().to_string_lossy().to_string();
        let resolved = resolve_config_path(None, Some(env), None).unwrap();
        assert_eq!(resolved.as_deref(), Some(file.path()));

        assert!(resolve_config_path(None, Some("/nonexistent.toml".to_string()), None).is_err());
    }

    #[test]
    fn test_default_dir_used_only_when_present() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            resolve_config_path(None, None, Some(dir.path().to_path_buf())).unwrap(),
            None
        );

        let mut file = std::fs::File::create(dir.path().join(CONFIG_FILENAME)).unwrap();
        writeln!(file, "top_n = 3").unwrap();
        let resolved = resolve_config_path(None, None, Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(resolved, Some(dir.path().join(CONFIG_FILENAME)));
    }

    #[test]
    fn test_overrides_applied_and_validated() {
        let overrides = Overrides {
            top_n: Some(5),
            random_seed: Some(7),
            reduced_dim: Some(10),
            ..Default::default()
        };
        let config = overrides.apply(SelectionConfig::default()).unwrap();
        assert_eq!(config.top_n, 5);
        assert_eq!(config.random_seed, 7);
        assert_eq!(config.reduced_dim, Some(10));

        let invalid = Overrides {
            top_n: Some(0),
            ..Default::default()
        };
        assert!(invalid.apply(SelectionConfig::default()).is_err());
    }
}
