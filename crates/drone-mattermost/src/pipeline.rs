//! Build metadata exposed by Drone through `DRONE_*` environment variables.
//!
//! The [`Pipeline`] value is also the data handed to message templates, so
//! field names here are the names users write in `{{...}}` expressions.

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Pipeline {
    pub repo: Repo,
    pub build: Build,
    pub commit: Commit,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Repo {
    pub owner: String,
    pub name: String,
    pub link: String,
    pub branch: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Build {
    pub number: u64,
    pub status: String,
    pub link: String,
    pub event: String,
    pub tag: String,
    pub branch: String,
    pub deploy_to: String,
    /// Unix timestamps in seconds.
    pub created: i64,
    pub started: i64,
    pub finished: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Commit {
    pub sha: String,
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub branch: String,
    pub link: String,
    /// Author username.
    pub author: String,
    pub author_name: String,
    pub author_email: String,
    pub author_avatar: String,
    pub message: CommitMessage,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommitMessage {
    pub title: String,
    pub body: String,
}

impl CommitMessage {
    /// Split a raw commit message into its first line and the rest.
    pub fn parse(raw: &str) -> Self {
        let mut lines = raw.split('\n');
        let title = lines.next().unwrap_or_default().trim().to_string();
        let body = lines.collect::<Vec<_>>().join("\n").trim().to_string();
        Self { title, body }
    }
}

impl Pipeline {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let s = |key: &str| env(key).unwrap_or_default();
        let n = |key: &str| env(key).and_then(|v| v.trim().parse::<i64>().ok()).unwrap_or(0);

        Pipeline {
            repo: Repo {
                owner: s("DRONE_REPO_OWNER"),
                name: s("DRONE_REPO_NAME"),
                link: s("DRONE_REPO_LINK"),
                branch: s("DRONE_REPO_BRANCH"),
            },
            build: Build {
                number: env("DRONE_BUILD_NUMBER")
                    .and_then(|v| v.trim().parse().ok())
                    .unwrap_or(0),
                status: s("DRONE_BUILD_STATUS"),
                link: s("DRONE_BUILD_LINK"),
                event: s("DRONE_BUILD_EVENT"),
                tag: s("DRONE_TAG"),
                branch: s("DRONE_BRANCH"),
                deploy_to: s("DRONE_DEPLOY_TO"),
                created: n("DRONE_BUILD_CREATED"),
                started: n("DRONE_BUILD_STARTED"),
                finished: n("DRONE_BUILD_FINISHED"),
            },
            commit: Commit {
                sha: s("DRONE_COMMIT_SHA"),
                git_ref: s("DRONE_COMMIT_REF"),
                branch: s("DRONE_COMMIT_BRANCH"),
                link: s("DRONE_COMMIT_LINK"),
                author: s("DRONE_COMMIT_AUTHOR"),
                author_name: s("DRONE_COMMIT_AUTHOR_NAME"),
                author_email: s("DRONE_COMMIT_AUTHOR_EMAIL"),
                author_avatar: s("DRONE_COMMIT_AUTHOR_AVATAR"),
                message: CommitMessage::parse(&s("DRONE_COMMIT_MESSAGE")),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn parse_title_and_body() {
        let msg = CommitMessage::parse("Initial commit\n\nMessage body line1\nmessage body line 2\n");
        assert_eq!(msg.title, "Initial commit");
        assert_eq!(msg.body, "Message body line1\nmessage body line 2");
    }

    #[test]
    fn parse_title_only() {
        let msg = CommitMessage::parse("  fix typo  ");
        assert_eq!(msg.title, "fix typo");
        assert_eq!(msg.body, "");
        assert_eq!(CommitMessage::parse(""), CommitMessage::default());
    }

    #[test]
    fn from_lookup_reads_drone_vars() {
        let vars: HashMap<&str, &str> = [
            ("DRONE_REPO_OWNER", "octocat"),
            ("DRONE_REPO_NAME", "hello-world"),
            ("DRONE_BUILD_NUMBER", "42"),
            ("DRONE_BUILD_STATUS", "success"),
            ("DRONE_BUILD_STARTED", "1546340400"),
            ("DRONE_BUILD_FINISHED", "not-a-number"),
            ("DRONE_COMMIT_SHA", "7fd1a60b01f91b314f59955a4e4d4e80d8edf11d"),
            ("DRONE_COMMIT_REF", "refs/heads/master"),
            ("DRONE_COMMIT_AUTHOR", "octocat"),
            ("DRONE_COMMIT_MESSAGE", "Initial commit\n\nbody"),
        ]
        .into_iter()
        .collect();
        let p = Pipeline::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(p.repo.owner, "octocat");
        assert_eq!(p.repo.name, "hello-world");
        assert_eq!(p.build.number, 42);
        assert_eq!(p.build.started, 1546340400);
        assert_eq!(p.build.finished, 0);
        assert_eq!(p.commit.git_ref, "refs/heads/master");
        assert_eq!(p.commit.message.title, "Initial commit");
        assert_eq!(p.commit.message.body, "body");
    }

    #[test]
    fn serializes_ref_field_name() {
        let p = Pipeline {
            commit: Commit {
                git_ref: "refs/tags/v1".into(),
                ..Commit::default()
            },
            ..Pipeline::default()
        };
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["commit"]["ref"], "refs/tags/v1");
        assert_eq!(v["commit"]["message"]["title"], "");
    }
}
