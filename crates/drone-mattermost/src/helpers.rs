//! Template helpers available to user supplied message templates.

use chrono::format::{Item, StrftimeItems};
use chrono::DateTime;
use handlebars::{
    handlebars_helper, Context, Handlebars, Helper, HelperResult, Output, RenderContext,
    RenderErrorReason,
};
use regex::Regex;

/// First `n` codepoints of `s`, or `s` without its first `|n|` codepoints
/// when `n` is negative. Strings no longer than `|n|` are returned as is.
pub fn truncate(s: &str, n: i64) -> String {
    let count = s.chars().count() as u64;
    let k = n.unsigned_abs();
    if count <= k {
        return s.to_string();
    }
    let k = k as usize;
    if n < 0 {
        s.chars().skip(k).collect()
    } else {
        s.chars().take(k).collect()
    }
}

/// Uppercase the first codepoint. Characters whose uppercase form is more
/// than one codepoint (`ß`) are left alone.
pub fn uppercase_first(s: &str) -> String {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut upper = first.to_uppercase();
    let mapped = match (upper.next(), upper.next()) {
        (Some(c), None) => c,
        _ => first,
    };
    std::iter::once(mapped).chain(chars).collect()
}

pub fn regex_replace(pattern: &str, input: &str, replacement: &str) -> Result<String, regex::Error> {
    let re = Regex::new(pattern)?;
    Ok(re.replace_all(input, replacement).into_owned())
}

/// Render `to - from` seconds the way Go prints a `time.Duration`.
pub fn to_duration(from: i64, to: i64) -> String {
    let diff = to.saturating_sub(from);
    let sign = if diff < 0 { "-" } else { "" };
    let secs = diff.unsigned_abs();
    let (h, m, s) = (secs / 3600, secs / 60 % 60, secs % 60);
    if h > 0 {
        format!("{sign}{h}h{m}m{s}s")
    } else if m > 0 {
        format!("{sign}{m}m{s}s")
    } else {
        format!("{sign}{s}s")
    }
}

/// Format a Unix timestamp (UTC) with a strftime pattern.
pub fn datetime(timestamp: i64, format: &str) -> Option<String> {
    let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
    if items.iter().any(|i| matches!(i, Item::Error)) {
        return None;
    }
    let dt = DateTime::from_timestamp(timestamp, 0)?;
    Some(dt.format_with_items(items.into_iter()).to_string())
}

/// HTML escaping for `{{...}}` output. Only `& < > " '` are replaced so that
/// backticks and `=` survive inside markdown code spans.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

handlebars_helper!(truncate_helper: |value: str, n: i64| truncate(value, n));
handlebars_helper!(uppercase_first_helper: |value: str| uppercase_first(value));
handlebars_helper!(uppercase_helper: |value: str| value.to_uppercase());
handlebars_helper!(lowercase_helper: |value: str| value.to_lowercase());
handlebars_helper!(duration_helper: |from: i64, to: i64| to_duration(from, to));

fn str_param<'a>(h: &'a Helper, name: &'static str, index: usize) -> Result<&'a str, RenderErrorReason> {
    h.param(index)
        .ok_or(RenderErrorReason::ParamNotFoundForIndex(name, index))?
        .value()
        .as_str()
        .ok_or_else(|| RenderErrorReason::InvalidParamType("string"))
}

fn write_escaped(r: &Handlebars, rc: &RenderContext, out: &mut dyn Output, s: &str) -> HelperResult {
    if rc.is_disable_escape() {
        out.write(s)?;
    } else {
        out.write(&r.get_escape_fn()(s))?;
    }
    Ok(())
}

fn regex_replace_helper(
    h: &Helper,
    r: &Handlebars,
    _: &Context,
    rc: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let pattern = str_param(h, "regexReplace", 0)?;
    let input = str_param(h, "regexReplace", 1)?;
    let replacement = str_param(h, "regexReplace", 2)?;
    let replaced = regex_replace(pattern, input, replacement)
        .map_err(|e| RenderErrorReason::Other(format!("regexReplace: invalid pattern {pattern:?}: {e}")))?;
    write_escaped(r, rc, out, &replaced)
}

fn datetime_helper(
    h: &Helper,
    r: &Handlebars,
    _: &Context,
    rc: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let timestamp = h
        .param(0)
        .ok_or(RenderErrorReason::ParamNotFoundForIndex("datetime", 0))?
        .value()
        .as_i64()
        .ok_or(RenderErrorReason::InvalidParamType("i64"))?;
    let format = str_param(h, "datetime", 1)?;
    let formatted = datetime(timestamp, format).ok_or_else(|| {
        RenderErrorReason::Other(format!("datetime: cannot format {timestamp} with {format:?}"))
    })?;
    write_escaped(r, rc, out, &formatted)
}

/// Install every helper on `registry`.
pub fn register(registry: &mut Handlebars<'_>) {
    registry.register_helper("truncate", Box::new(truncate_helper));
    registry.register_helper("uppercaseFirst", Box::new(uppercase_first_helper));
    registry.register_helper("uppercase", Box::new(uppercase_helper));
    registry.register_helper("lowercase", Box::new(lowercase_helper));
    registry.register_helper("duration", Box::new(duration_helper));
    registry.register_helper("regexReplace", Box::new(regex_replace_helper));
    registry.register_helper("datetime", Box::new(datetime_helper));
}
