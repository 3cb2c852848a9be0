use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Response};
use serde::Deserialize;

use crate::error::{Error, Result, Step};

/// Status code and object id returned by one API call. `id` is empty when
/// the server did not answer with a success status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub id: String,
}

/// The three Mattermost calls a notification needs.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn team_by_name(&self, name: &str) -> Result<Reply>;

    async fn channel_by_name(&self, team_id: &str, name: &str) -> Result<Reply>;

    async fn create_post(&self, channel_id: &str, message: &str) -> Result<Reply>;
}

/// Everything but RFC 3986 unreserved characters.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Debug, Default, Deserialize)]
struct IdOnly {
    #[serde(default)]
    id: String,
}

/// Mattermost API v4 client authenticated with a static bearer token.
pub struct MattermostClient {
    base: String,
    http: Client,
}

impl MattermostClient {
    pub fn new(url: &str, token: &str, skip_verify: bool) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
            .map_err(|_| Error::InvalidToken)?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = Client::builder()
            .default_headers(headers)
            .danger_accept_invalid_certs(skip_verify)
            .user_agent(concat!("drone-mattermost/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(Error::Client)?;

        Ok(Self {
            base: format!("{}/api/v4", url.trim().trim_end_matches('/')),
            http,
        })
    }

    async fn read_reply(step: Step, res: Response, ok: &[u16]) -> Result<Reply> {
        let status = res.status().as_u16();
        if !ok.contains(&status) {
            return Ok(Reply {
                status,
                id: String::new(),
            });
        }
        let body: IdOnly = res
            .json()
            .await
            .map_err(|source| Error::Transport { step, source })?;
        Ok(Reply {
            status,
            id: body.id,
        })
    }
}

fn segment(s: &str) -> String {
    utf8_percent_encode(s, SEGMENT).to_string()
}

#[async_trait]
impl Messenger for MattermostClient {
    async fn team_by_name(&self, name: &str) -> Result<Reply> {
        let step = Step::Team;
        let url = format!("{}/teams/name/{}", self.base, segment(name));
        let res = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| Error::Transport { step, source })?;
        Self::read_reply(step, res, &[200]).await
    }

    async fn channel_by_name(&self, team_id: &str, name: &str) -> Result<Reply> {
        let step = Step::Channel;
        let url = format!(
            "{}/teams/{}/channels/name/{}",
            self.base,
            segment(team_id),
            segment(name)
        );
        let res = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| Error::Transport { step, source })?;
        Self::read_reply(step, res, &[200]).await
    }

    async fn create_post(&self, channel_id: &str, message: &str) -> Result<Reply> {
        let step = Step::Post;
        let payload = serde_json::json!({
            "channel_id": channel_id,
            "message": message,
        });
        let res = self
            .http
            .post(format!("{}/posts", self.base))
            .json(&payload)
            .send()
            .await
            .map_err(|source| Error::Transport { step, source })?;
        Self::read_reply(step, res, &[200, 201]).await
    }
}
