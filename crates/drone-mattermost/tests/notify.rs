use std::sync::Mutex;

use assert_matches::assert_matches;
use async_trait::async_trait;

use drone_mattermost::config::Config;
use drone_mattermost::mattermost::{Messenger, Reply};
use drone_mattermost::orchestrator::run_with;
use drone_mattermost::pipeline::{Build, Commit, Pipeline, Repo};
use drone_mattermost::{Error, ErrorKind, Result, Step};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Team(String),
    Channel(String, String),
    Post(String, String),
}

/// Messenger answering from canned replies and recording every call.
struct FakeMessenger {
    team: Reply,
    channel: Reply,
    post: Reply,
    calls: Mutex<Vec<Call>>,
}

impl FakeMessenger {
    fn ok() -> Self {
        Self {
            team: reply(200, "team-id"),
            channel: reply(200, "channel-id"),
            post: reply(201, "post-id"),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

fn reply(status: u16, id: &str) -> Reply {
    Reply {
        status,
        id: id.to_string(),
    }
}

#[async_trait]
impl Messenger for FakeMessenger {
    async fn team_by_name(&self, name: &str) -> Result<Reply> {
        self.calls.lock().unwrap().push(Call::Team(name.into()));
        Ok(self.team.clone())
    }

    async fn channel_by_name(&self, team_id: &str, name: &str) -> Result<Reply> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Channel(team_id.into(), name.into()));
        Ok(self.channel.clone())
    }

    async fn create_post(&self, channel_id: &str, message: &str) -> Result<Reply> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Post(channel_id.into(), message.into()));
        Ok(self.post.clone())
    }
}

fn config() -> Config {
    Config {
        url: "https://chat.example.com".into(),
        token: "secret".into(),
        team: "octocat-team".into(),
        channel: "builds".into(),
        ..Config::default()
    }
}

fn pipeline() -> Pipeline {
    Pipeline {
        repo: Repo {
            owner: "octocat".into(),
            name: "hello-world".into(),
            ..Repo::default()
        },
        build: Build {
            number: 1,
            status: "success".into(),
            link: "http://github.com/octocat/hello-world".into(),
            ..Build::default()
        },
        commit: Commit {
            sha: "7fd1a60b01f91b314f59955a4e4d4e80d8edf11d".into(),
            branch: "master".into(),
            author: "octocat".into(),
            ..Commit::default()
        },
    }
}

#[tokio::test]
async fn posts_default_message_after_both_lookups() {
    let fake = FakeMessenger::ok();
    run_with(&fake, &config(), &pipeline()).await.unwrap();

    let calls = fake.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0], Call::Team("octocat-team".into()));
    assert_eq!(calls[1], Call::Channel("team-id".into(), "builds".into()));
    match &calls[2] {
        Call::Post(channel_id, message) => {
            assert_eq!(channel_id, "channel-id");
            assert!(message.contains("octocat/hello-world"));
            assert!(message.contains("success"));
        }
        other => panic!("unexpected call {other:?}"),
    }
}

#[tokio::test]
async fn custom_template_is_posted_verbatim() {
    let fake = FakeMessenger::ok();
    let cfg = Config {
        template: "{{repo.name}} #{{build.number}}: {{uppercaseFirst build.status}}\n".into(),
        ..config()
    };
    run_with(&fake, &cfg, &pipeline()).await.unwrap();
    assert_eq!(
        fake.calls()[2],
        Call::Post("channel-id".into(), "hello-world #1: Success".into())
    );
}

#[tokio::test]
async fn team_not_found_stops_before_channel_lookup() {
    let fake = FakeMessenger {
        team: reply(404, ""),
        ..FakeMessenger::ok()
    };
    let err = run_with(&fake, &config(), &pipeline()).await.unwrap_err();

    assert_matches!(
        err,
        Error::UnexpectedStatus {
            step: Step::Team,
            status: 404,
            expected: 200
        }
    );
    assert_eq!(err.kind(), ErrorKind::Api);
    assert_eq!(fake.calls(), vec![Call::Team("octocat-team".into())]);
}

#[tokio::test]
async fn blank_team_id_stops_before_channel_lookup() {
    let fake = FakeMessenger {
        team: reply(200, ""),
        ..FakeMessenger::ok()
    };
    let err = run_with(&fake, &config(), &pipeline()).await.unwrap_err();
    assert_matches!(err, Error::BlankId { step: Step::Team, .. });
    assert_eq!(fake.calls(), vec![Call::Team("octocat-team".into())]);
}

#[tokio::test]
async fn blank_channel_id_is_an_api_error() {
    let fake = FakeMessenger {
        channel: reply(200, ""),
        ..FakeMessenger::ok()
    };
    let err = run_with(&fake, &config(), &pipeline()).await.unwrap_err();
    assert_matches!(err, Error::BlankId { step: Step::Channel, status: 200 });
    assert_eq!(fake.calls().len(), 2);
}

#[tokio::test]
async fn post_accepts_200_and_rejects_500() {
    let fake = FakeMessenger {
        post: reply(200, "post-id"),
        ..FakeMessenger::ok()
    };
    assert!(run_with(&fake, &config(), &pipeline()).await.is_ok());

    let fake = FakeMessenger {
        post: reply(500, ""),
        ..FakeMessenger::ok()
    };
    let err = run_with(&fake, &config(), &pipeline()).await.unwrap_err();
    assert_matches!(err, Error::UnexpectedStatus { step: Step::Post, status: 500, expected: 201 });
}

#[tokio::test]
async fn invalid_configuration_makes_no_calls() {
    let fake = FakeMessenger::ok();

    let cfg = Config {
        token: String::new(),
        ..config()
    };
    let err = run_with(&fake, &cfg, &pipeline()).await.unwrap_err();
    assert_matches!(err, Error::MissingCredentials);

    let cfg = Config {
        channel: String::new(),
        ..config()
    };
    let err = run_with(&fake, &cfg, &pipeline()).await.unwrap_err();
    assert_matches!(err, Error::MissingDestination);

    let cfg = Config {
        replace: r#"[{"regexp": "["}]"#.into(),
        ..config()
    };
    let err = run_with(&fake, &cfg, &pipeline()).await.unwrap_err();
    assert_matches!(err, Error::InvalidPattern { index: 0, .. });
    assert_eq!(err.kind(), ErrorKind::Template);

    assert!(fake.calls().is_empty());
}
