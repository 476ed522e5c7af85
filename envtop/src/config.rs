//! Command line flags, the optional YAML config file, and the merged result.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::builder::FalseyValueParser;
use clap::Parser;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

pub const DEFAULT_REVEAL_TIMEOUT_SECS: u64 = 30;

#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "envtop",
    version,
    about = "Browse, search, reveal and diff the environment of Kubernetes workloads"
)]
pub struct Cli {
    /// Kubeconfig context to use (default: current context)
    #[arg(long)]
    pub context: Option<String>,

    /// Refuse to reveal secret values
    #[arg(long = "disable-reveal", env = "ENVTOP_DISABLE_REVEAL", value_parser = FalseyValueParser::new())]
    pub disable_reveal: bool,

    /// Seconds a revealed value stays on screen
    #[arg(long = "reveal-timeout", value_name = "SECS")]
    pub reveal_timeout: Option<u64>,

    /// Directory that receives envtop.log
    #[arg(long = "log-dir", value_name = "PATH")]
    pub log_dir: Option<PathBuf>,

    /// YAML config file (default: $XDG_CONFIG_HOME/envtop/config.yaml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Keys accepted in `config.yaml`. Every key is optional.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub context: Option<String>,
    pub disable_reveal: Option<bool>,
    pub reveal_timeout: Option<u64>,
    pub log_dir: Option<PathBuf>,
}

impl FileConfig {
    pub fn from_yaml(path: &Path, text: &str) -> Result<Self> {
        serde_yaml::from_str::<Option<FileConfig>>(text)
            .map(Option::unwrap_or_default)
            .map_err(|source| Error::Config {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Reads `path`. A missing file is an error only when `required`.
    pub fn load(path: &Path, required: bool) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_yaml(path, &text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => {
                debug!(path = %path.display(), "no config file");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Options the session consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub reveal_disabled: bool,
    pub reveal_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reveal_disabled: false,
            reveal_timeout: Duration::from_secs(DEFAULT_REVEAL_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub context: Option<String>,
    pub log_dir: PathBuf,
    pub session: SessionConfig,
}

impl Config {
    /// Loads the config file named by the flags (or the default location)
    /// and lays the flags over it.
    pub fn load(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path, true)?,
            None => match default_config_path() {
                Some(path) => FileConfig::load(&path, false)?,
                None => FileConfig::default(),
            },
        };
        Ok(Self::merge(cli, file))
    }

    /// Flags win over file values.
    pub fn merge(cli: &Cli, file: FileConfig) -> Self {
        let timeout = cli
            .reveal_timeout
            .or(file.reveal_timeout)
            .unwrap_or(DEFAULT_REVEAL_TIMEOUT_SECS);
        Self {
            context: cli.context.clone().or(file.context),
            log_dir: cli
                .log_dir
                .clone()
                .or(file.log_dir)
                .unwrap_or_else(std::env::temp_dir),
            session: SessionConfig {
                reveal_disabled: cli.disable_reveal || file.disable_reveal.unwrap_or(false),
                reveal_timeout: Duration::from_secs(timeout),
            },
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    config_path_from(
        std::env::var_os("XDG_CONFIG_HOME"),
        std::env::var_os("HOME"),
    )
}

fn config_path_from(xdg: Option<OsString>, home: Option<OsString>) -> Option<PathBuf> {
    let base = match xdg.filter(|v| !v.is_empty()) {
        Some(dir) => PathBuf::from(dir),
        None => PathBuf::from(home?).join(".config"),
    };
    Some(base.join("envtop").join("config.yaml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from([
            "envtop",
            "--context",
            "kind-dev",
            "--reveal-timeout",
            "5",
            "--log-dir",
            "/tmp/logs",
        ])
        .unwrap();
        assert_eq!(cli.context.as_deref(), Some("kind-dev"));
        assert_eq!(cli.reveal_timeout, Some(5));
        assert_eq!(cli.log_dir, Some(PathBuf::from("/tmp/logs")));
    }

    #[test]
    fn test_file_config_parses_kebab_keys() {
        let text = "context: prod-ctx\ndisable-reveal: true\nreveal-timeout: 10\n";
        let file = FileConfig::from_yaml(Path::new("config.yaml"), text).unwrap();
        assert_eq!(file.context.as_deref(), Some("prod-ctx"));
        assert_eq!(file.disable_reveal, Some(true));
        assert_eq!(file.reveal_timeout, Some(10));
        assert!(file.log_dir.is_none());
    }

    #[test]
    fn test_empty_file_is_default() {
        let file = FileConfig::from_yaml(Path::new("config.yaml"), "").unwrap();
        assert_eq!(file, FileConfig::default());
    }

    #[test]
    fn test_bad_file_reports_path() {
        let err = FileConfig::from_yaml(Path::new("/etc/envtop.yaml"), "bogus-key: 1\n")
            .unwrap_err();
        assert!(err.to_string().starts_with("config file /etc/envtop.yaml"));
    }

    #[test]
    fn test_missing_optional_file_is_default() {
        let path = std::env::temp_dir().join("envtop-does-not-exist/config.yaml");
        assert_eq!(FileConfig::load(&path, false).unwrap(), FileConfig::default());
        assert!(FileConfig::load(&path, true).is_err());
    }

    #[test]
    fn test_cli_overrides_file() {
        let cli = Cli {
            context: Some("cli-ctx".into()),
            reveal_timeout: Some(3),
            ..Default::default()
        };
        let file = FileConfig {
            context: Some("file-ctx".into()),
            disable_reveal: Some(true),
            reveal_timeout: Some(99),
            log_dir: Some(PathBuf::from("/var/log/envtop")),
        };
        let config = Config::merge(&cli, file);
        assert_eq!(config.context.as_deref(), Some("cli-ctx"));
        assert_eq!(config.session.reveal_timeout, Duration::from_secs(3));
        assert!(config.session.reveal_disabled);
        assert_eq!(config.log_dir, PathBuf::from("/var/log/envtop"));
    }

    #[test]
    fn test_defaults() {
        let config = Config::merge(&Cli::default(), FileConfig::default());
        assert_eq!(config.session, SessionConfig::default());
        assert_eq!(config.session.reveal_timeout, Duration::from_secs(30));
        assert!(config.context.is_none());
    }

    #[test]
    fn test_default_config_path() {
        assert_eq!(
            config_path_from(Some("/xdg".into()), Some("/home/me".into())),
            Some(PathBuf::from("/xdg/envtop/config.yaml"))
        );
        assert_eq!(
            config_path_from(None, Some("/home/me".into())),
            Some(PathBuf::from("/home/me/.config/envtop/config.yaml"))
        );
        assert_eq!(config_path_from(None, None), None);
    }
}
