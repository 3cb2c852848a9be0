//! Drone plugin that posts build notifications to a Mattermost channel.
//!
//! A run validates the [`config::Config`], builds the optional commit message
//! [`replace::Replacer`], renders the message for the current
//! [`pipeline::Pipeline`] and publishes it through a [`mattermost::Messenger`]:
//! team lookup, channel lookup, post creation, in that order.
pub mod cli;
pub mod config;
pub mod error;
pub mod helpers;
pub mod mattermost;
pub mod message;
pub mod orchestrator;
pub mod pipeline;
pub mod replace;
pub mod template;

pub use error::{Error, ErrorKind, Result, Step};

/// Install a stderr `tracing` subscriber filtered by `level` (an
/// `EnvFilter` directive such as `info` or `drone_mattermost=debug`).
/// Unparseable directives fall back to `info`.
pub fn setup_logging(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
