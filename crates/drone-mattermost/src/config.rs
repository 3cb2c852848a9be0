use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::cli::Cli;
use crate::error::{Error, Result};

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Plugin configuration, resolved once at startup and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub url: String,
    pub token: String,
    pub team: String,
    pub channel: String,
    pub template: String,
    pub replace: String,
    pub log_level: String,
    pub skip_verify: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: String::new(),
            token: String::new(),
            team: String::new(),
            channel: String::new(),
            template: String::new(),
            replace: String::new(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            skip_verify: false,
        }
    }
}

/// Optional TOML file carrying the same keys as the command line.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub url: Option<String>,
    pub token: Option<String>,
    pub team: Option<String>,
    pub channel: Option<String>,
    pub template: Option<String>,
    pub replace: Option<String>,
    pub log_level: Option<String>,
    pub skip_verify: Option<bool>,
}

impl FileConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Reading config file {}", path.display()))?;
        let cfg: FileConfig = toml::from_str(&contents)
            .with_context(|| format!("Parsing TOML config {}", path.display()))?;
        Ok(cfg)
    }
}

impl Config {
    /// Resolve configuration from the process environment, loading the TOML
    /// file named by `--config` or `PLUGIN_CONFIG` when present.
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let env = |key: &str| std::env::var(key).ok();
        let path: Option<PathBuf> = cli
            .config
            .clone()
            .or_else(|| non_empty(env("PLUGIN_CONFIG")).map(PathBuf::from));
        let file = match path {
            Some(p) => FileConfig::load(&p)?,
            None => FileConfig::default(),
        };
        Ok(Self::resolve(cli, file, env))
    }

    /// Merge flag, environment and file values. Flags win, then the
    /// `MATTERMOST_*` variable, then `PLUGIN_*`, then the file.
    pub fn resolve<F>(cli: &Cli, file: FileConfig, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |flag: &Option<String>, name: &str, file: Option<String>| -> String {
            flag.clone()
                .or_else(|| non_empty(env(&format!("MATTERMOST_{name}"))))
                .or_else(|| non_empty(env(&format!("PLUGIN_{name}"))))
                .or(file)
                .unwrap_or_default()
        };

        let skip_verify = cli.skip_verify
            || non_empty(env("PLUGIN_SKIP_VERIFY"))
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .or(file.skip_verify)
                .unwrap_or(false);

        let log_level = cli
            .log_level
            .clone()
            .or_else(|| non_empty(env("PLUGIN_LOG_LEVEL")))
            .or(file.log_level)
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Self {
            url: pick(&cli.url, "URL", file.url).trim().to_string(),
            token: pick(&cli.token, "TOKEN", file.token).trim().to_string(),
            team: pick(&cli.team, "TEAM", file.team).trim().to_string(),
            channel: pick(&cli.channel, "CHANNEL", file.channel).trim().to_string(),
            template: pick(&cli.template, "TEMPLATE", file.template),
            replace: pick(&cli.replace, "REPLACE", file.replace),
            log_level,
            skip_verify,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.is_empty() || self.token.is_empty() {
            return Err(Error::MissingCredentials);
        }
        if self.team.is_empty() || self.channel.is_empty() {
            return Err(Error::MissingDestination);
        }
        Ok(())
    }
}

/// Apply `KEY=value` lines from `path` to the process environment,
/// overriding variables that are already set. A missing file is ignored.
/// Lines that cannot be parsed are skipped; one description per skipped
/// line is returned so it can be logged once logging is up.
pub fn load_env_file(path: &Path) -> Vec<String> {
    if !path.exists() {
        return Vec::new();
    }
    let entries = match dotenvy::from_path_iter(path) {
        Ok(entries) => entries,
        Err(e) => return vec![format!("{}: {e}", path.display())],
    };

    let mut skipped = Vec::new();
    for entry in entries {
        match entry {
            Ok((key, value)) => std::env::set_var(key, value),
            Err(dotenvy::Error::Io(e)) => {
                skipped.push(format!("{}: {e}", path.display()));
                break;
            }
            Err(e) => skipped.push(format!("{}: {e}", path.display())),
        }
    }
    skipped
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
