use clap::Parser;
use std::path::PathBuf;

/// drone-mattermost – build notifications for Mattermost
///
/// Every option can also be set through the environment. Flags win over
/// `MATTERMOST_*` variables, which win over `PLUGIN_*` variables.
#[derive(Parser, Debug, Default)]
#[command(name = "drone-mattermost", author, version, about, long_about = None)]
pub struct Cli {
    /// Mattermost server url [env: MATTERMOST_URL, PLUGIN_URL]
    #[arg(long = "mattermost.url", value_name = "URL")]
    pub url: Option<String>,

    /// Mattermost access token [env: MATTERMOST_TOKEN, PLUGIN_TOKEN]
    #[arg(long = "mattermost.token", value_name = "TOKEN")]
    pub token: Option<String>,

    /// Mattermost team name [env: MATTERMOST_TEAM, PLUGIN_TEAM]
    #[arg(long = "mattermost.team", value_name = "TEAM")]
    pub team: Option<String>,

    /// Mattermost channel name [env: MATTERMOST_CHANNEL, PLUGIN_CHANNEL]
    #[arg(long = "mattermost.channel", value_name = "CHANNEL")]
    pub channel: Option<String>,

    /// Handlebars message template [env: MATTERMOST_TEMPLATE, PLUGIN_TEMPLATE]
    ///
    /// Fields are `repo.*`, `build.*` and `commit.*`; `commit` itself is an
    /// object, so use `{{truncate commit.sha 7}}` for the short SHA.
    #[arg(long = "mattermost.template", value_name = "TEMPLATE")]
    pub template: Option<String>,

    /// JSON list of {"regexp", "replace"} rules applied to the commit message
    /// [env: MATTERMOST_REPLACE, PLUGIN_REPLACE]
    #[arg(long = "mattermost.replace", value_name = "JSON")]
    pub replace: Option<String>,

    /// Log filter, e.g. `info` or `drone_mattermost=debug` [env: PLUGIN_LOG_LEVEL]
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Accept invalid TLS certificates [env: PLUGIN_SKIP_VERIFY]
    #[arg(long)]
    pub skip_verify: bool,

    /// Sets a custom config file [env: PLUGIN_CONFIG]
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}
