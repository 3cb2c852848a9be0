use crate::error::Result;
use crate::helpers::truncate;
use crate::pipeline::Pipeline;
use crate::replace::Replacer;
use crate::template::Renderer;

/// Build the post body for `pipeline`.
///
/// The replacer is applied to the commit title and body of a private copy
/// of the pipeline. A blank template selects the built-in markdown format.
/// The result is trimmed.
pub fn compose(
    pipeline: &Pipeline,
    template: &str,
    replacer: &Replacer,
    renderer: &Renderer,
) -> Result<String> {
    let mut pipeline = pipeline.clone();
    if !replacer.is_empty() {
        let message = &mut pipeline.commit.message;
        message.title = replacer.apply(&message.title);
        message.body = replacer.apply(&message.body);
    }

    let message = if template.trim().is_empty() {
        default_message(&pipeline)
    } else {
        renderer.render(template, &pipeline)?
    };
    Ok(message.trim().to_string())
}

pub fn default_message(p: &Pipeline) -> String {
    if p.commit.message.title.is_empty() {
        return summary_message(p);
    }

    let mut msg = format!(
        "# Push `{}/{}:{}`\nPipeline for [branch `{}` by `{}`]({}): **{}**!\n> {}",
        p.repo.owner,
        p.repo.name,
        truncate(&p.commit.sha, 7),
        p.commit.branch,
        p.commit.author,
        p.build.link,
        p.build.status,
        p.commit.message.title,
    );
    if !p.commit.message.body.is_empty() {
        let quoted: Vec<String> = p
            .commit
            .message
            .body
            .split('\n')
            .map(|line| format!("> {line}"))
            .collect();
        msg.push_str("\n>\n");
        msg.push_str(&quoted.join("\n"));
    }
    msg
}

/// One-line fallback used when there is no commit message to quote.
fn summary_message(p: &Pipeline) -> String {
    let revision = if p.build.tag.is_empty() {
        truncate(&p.commit.sha, 7)
    } else {
        p.build.tag.clone()
    };
    format!(
        "Build [#{}]({}) of `{}/{}` (`{}`) on branch `{}` by `{}`: **{}**",
        p.build.number,
        p.build.link,
        p.repo.owner,
        p.repo.name,
        revision,
        p.commit.branch,
        p.commit.author,
        p.build.status,
    )
}
