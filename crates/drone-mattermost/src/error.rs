use std::fmt;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// One of the three Mattermost API calls made per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Team,
    Channel,
    Post,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Step::Team => "team lookup",
            Step::Channel => "channel lookup",
            Step::Post => "post creation",
        })
    }
}

/// Coarse classification of [`Error`], used to pick the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Template,
    Transport,
    Api,
}

impl ErrorKind {
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorKind::Configuration => 2,
            ErrorKind::Template => 3,
            ErrorKind::Transport => 4,
            ErrorKind::Api => 5,
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("missing url or token")]
    MissingCredentials,

    #[error("missing team or channel")]
    MissingDestination,

    #[error("token contains characters not allowed in an http header")]
    InvalidToken,

    #[error("unable to unmarshal replace from json: {0}")]
    InvalidReplaceSpec(#[source] serde_json::Error),

    #[error("unable to compile regexp {index} ({pattern:?}): {source}")]
    InvalidPattern {
        index: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("could not render message template: {0}")]
    TemplateRender(#[source] handlebars::RenderError),

    #[error("could not build http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("{step} failed: {source}")]
    Transport {
        step: Step,
        #[source]
        source: reqwest::Error,
    },

    #[error("{step} failed: status code ({status}) != {expected}")]
    UnexpectedStatus {
        step: Step,
        status: u16,
        expected: u16,
    },

    #[error("{step} failed: id is blank: status code == {status}")]
    BlankId { step: Step, status: u16 },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingCredentials | Error::MissingDestination | Error::InvalidToken => {
                ErrorKind::Configuration
            }
            Error::InvalidReplaceSpec(_)
            | Error::InvalidPattern { .. }
            | Error::TemplateRender(_) => ErrorKind::Template,
            Error::Client(_) | Error::Transport { .. } => ErrorKind::Transport,
            Error::UnexpectedStatus { .. } | Error::BlankId { .. } => ErrorKind::Api,
        }
    }

    /// The API call that failed, if any.
    pub fn step(&self) -> Option<Step> {
        match self {
            Error::Transport { step, .. }
            | Error::UnexpectedStatus { step, .. }
            | Error::BlankId { step, .. } => Some(*step),
            _ => None,
        }
    }
}
