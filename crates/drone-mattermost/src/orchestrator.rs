use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result, Step};
use crate::mattermost::{MattermostClient, Messenger, Reply};
use crate::message::compose;
use crate::pipeline::Pipeline;
use crate::replace::Replacer;
use crate::template::Renderer;

/// Validate the configuration and build the message for `pipeline`.
pub fn prepare(config: &Config, pipeline: &Pipeline) -> Result<String> {
    config.validate()?;
    debug!("configuration validated");

    let replacer = Replacer::from_json(&config.replace)?;
    debug!(rules = !replacer.is_empty(), "replacer built");

    let message = compose(pipeline, &config.template, &replacer, &Renderer::new())?;
    debug!(custom_template = !config.template.trim().is_empty(), "message composed");
    Ok(message)
}

/// Resolve team and channel ids, then post `message`. Stops at the first
/// failing call.
pub async fn publish<M>(messenger: &M, team: &str, channel: &str, message: &str) -> Result<()>
where
    M: Messenger + ?Sized,
{
    info!(team, channel, message, "sending message");

    let reply = messenger.team_by_name(team).await?;
    let team_id = expect_id(Step::Team, reply)?;
    debug!(team_id = %team_id, "team resolved");

    let reply = messenger.channel_by_name(&team_id, channel).await?;
    let channel_id = expect_id(Step::Channel, reply)?;
    debug!(channel_id = %channel_id, "channel resolved");

    let reply = messenger.create_post(&channel_id, message).await?;
    if reply.status != 201 && reply.status != 200 {
        return Err(Error::UnexpectedStatus {
            step: Step::Post,
            status: reply.status,
            expected: 201,
        });
    }
    info!(post_id = %reply.id, "message posted");
    Ok(())
}

fn expect_id(step: Step, reply: Reply) -> Result<String> {
    if reply.status != 200 {
        return Err(Error::UnexpectedStatus {
            step,
            status: reply.status,
            expected: 200,
        });
    }
    if reply.id.is_empty() {
        return Err(Error::BlankId {
            step,
            status: reply.status,
        });
    }
    Ok(reply.id)
}

/// Full run against `messenger`.
pub async fn run_with<M>(messenger: &M, config: &Config, pipeline: &Pipeline) -> Result<()>
where
    M: Messenger + ?Sized,
{
    let message = prepare(config, pipeline)?;
    publish(messenger, &config.team, &config.channel, &message).await
}

/// Full run against the Mattermost server named in `config`.
pub async fn run(config: &Config, pipeline: &Pipeline) -> Result<()> {
    let message = prepare(config, pipeline)?;
    let client = MattermostClient::new(&config.url, &config.token, config.skip_verify)?;
    publish(&client, &config.team, &config.channel, &message).await
}
