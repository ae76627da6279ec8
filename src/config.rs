//! Layered configuration.
//!
//! Every option resolves in the same order: command-line flag, then the
//! settings file / `WIKTFETCH_*` environment, then the built-in default.
use crate::args::Args;
use crate::client::DEFAULT_BASE_URL;
use crate::retry::RetryPolicy;
use anyhow::{Context, Result, bail};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub const DEFAULT_WORKERS: usize = 8;
pub const DEFAULT_LANGUAGE: &str = "nl";
pub const DEFAULT_INPUT: &str = "dutch_words.txt";
pub const DEFAULT_OUTPUT: &str = "output";

/// Optional values read from `wiktfetch.toml` and the environment.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Settings {
    pub workers: Option<usize>,
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub retry_delay_ms: Option<u64>,
    pub language: Option<String>,
    pub base_url: Option<String>,
    pub rate_limit: Option<u32>,
}

impl Settings {
    /// Reads `wiktfetch.toml` from the working directory if present, then
    /// `WIKTFETCH_*` variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::build(File::with_name("wiktfetch").required(false), environment())
    }

    /// Same as [`load`](Self::load) with an explicit, required file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::build(File::from(path).required(true), environment())
    }

    fn build<S>(file: S, env: Environment) -> Result<Self, ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        Config::builder()
            .add_source(file)
            .add_source(env)
            .build()?
            .try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("WIKTFETCH").try_parsing(true)
}

/// Fully resolved options for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetcherConfig {
    pub worker_count: usize,
    pub input_path: PathBuf,
    pub output_root: PathBuf,
    pub retry_delay: Duration,
    pub language: String,
    pub base_url: Url,
    pub rate_limit: Option<NonZeroU32>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            worker_count: DEFAULT_WORKERS,
            input_path: PathBuf::from(DEFAULT_INPUT),
            output_root: PathBuf::from(DEFAULT_OUTPUT),
            retry_delay: RetryPolicy::DEFAULT_DELAY,
            language: DEFAULT_LANGUAGE.to_string(),
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
            rate_limit: None,
        }
    }
}

impl FetcherConfig {
    /// Merges CLI flags over settings over defaults and validates the result.
    ///
    /// # Errors
    ///
    /// Fails on a zero worker count or an unparsable base URL.
    pub fn resolve(args: &Args, settings: Settings) -> Result<Self> {
        let defaults = Self::default();

        let worker_count = args.workers.or(settings.workers).unwrap_or(defaults.worker_count);
        if worker_count == 0 {
            bail!("worker count must be at least 1");
        }

        let base_url = match args.base_url.clone().or(settings.base_url) {
            Some(raw) => parse_base_url(&raw)?,
            None => defaults.base_url,
        };

        let retry_delay = args
            .retry_delay_ms
            .or(settings.retry_delay_ms)
            .map(Duration::from_millis)
            .unwrap_or(defaults.retry_delay);

        Ok(Self {
            worker_count,
            input_path: args.input.clone().or(settings.input).unwrap_or(defaults.input_path),
            output_root: args.output.clone().or(settings.output).unwrap_or(defaults.output_root),
            retry_delay,
            language: args.language.clone().or(settings.language).unwrap_or(defaults.language),
            base_url,
            rate_limit: args.rate_limit.or(settings.rate_limit).and_then(NonZeroU32::new),
        })
    }

    /// Retry forever with the configured delay.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::forever(self.retry_delay)
    }
}

/// Parses a base URL, adding the trailing slash `Url::join` needs to keep
/// the last path segment.
fn parse_base_url(raw: &str) -> Result<Url> {
    let raw = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };
    Url::parse(&raw).with_context(|| format!("Invalid base URL: {}", raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = FetcherConfig::resolve(&Args::default(), Settings::default()).unwrap();
        assert_eq!(config, FetcherConfig::default());
        assert_eq!(config.worker_count, 8);
        assert_eq!(config.retry_delay, Duration::from_secs(1));
        assert_eq!(config.retry_policy().max_attempts, None);
    }

    #[test]
    fn test_cli_overrides_settings() {
        let args = Args {
            workers: Some(2),
            language: Some("en".into()),
            ..Default::default()
        };
        let settings = Settings {
            workers: Some(16),
            retry_delay_ms: Some(250),
            output: Some(PathBuf::from("records")),
            ..Default::default()
        };

        let config = FetcherConfig::resolve(&args, settings).unwrap();
        assert_eq!(config.worker_count, 2);
        assert_eq!(config.language, "en");
        assert_eq!(config.retry_delay, Duration::from_millis(250));
        assert_eq!(config.output_root, PathBuf::from("records"));
        assert_eq!(config.input_path, PathBuf::from(DEFAULT_INPUT));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let args = Args {
            workers: Some(0),
            ..Default::default()
        };
        assert!(FetcherConfig::resolve(&args, Settings::default()).is_err());
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let args = Args {
            base_url: Some("http://127.0.0.1:8080/definition".into()),
            ..Default::default()
        };
        let config = FetcherConfig::resolve(&args, Settings::default()).unwrap();
        assert_eq!(config.base_url.as_str(), "http://127.0.0.1:8080/definition/");

        let args = Args {
            base_url: Some("not a url".into()),
            ..Default::default()
        };
        assert!(FetcherConfig::resolve(&args, Settings::default()).is_err());
    }

    #[test]
    fn test_zero_rate_limit_means_unlimited() {
        let args = Args {
            rate_limit: Some(0),
            ..Default::default()
        };
        let config = FetcherConfig::resolve(&args, Settings::default()).unwrap();
        assert_eq!(config.rate_limit, None);
    }

    #[test]
    fn test_settings_from_file() -> Result<()> {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
        writeln!(file, "workers = 3")?;
        writeln!(file, "language = \"de\"")?;
        writeln!(file, "output = \"/tmp/records\"")?;

        let settings = Settings::load_from(file.path())?;
        assert_eq!(settings.workers, Some(3));
        assert_eq!(settings.language.as_deref(), Some("de"));
        assert_eq!(settings.output, Some(PathBuf::from("/tmp/records")));
        assert_eq!(settings.input, None);
        Ok(())
    }

    #[test]
    fn test_malformed_settings_file_is_an_error() -> Result<()> {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
        writeln!(file, "workers = ")?;
        assert!(Settings::load_from(file.path()).is_err());

        let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
        writeln!(file, "workers = \"abc\"")?;
        assert!(Settings::load_from(file.path()).is_err());
        Ok(())
    }

    #[test]
    fn test_environment_overrides_and_rejects_bad_values() -> Result<()> {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
        writeln!(file, "workers = 3")?;

        let env = |value: &str| {
            let vars = config::Map::from([("WIKTFETCH_WORKERS".to_string(), value.to_string())]);
            environment().source(Some(vars))
        };

        let settings = Settings::build(File::from(file.path()), env("5"))?;
        assert_eq!(settings.workers, Some(5));

        assert!(Settings::build(File::from(file.path()), env("abc")).is_err());
        Ok(())
    }
}
