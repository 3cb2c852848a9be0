use regex::Regex;
use serde::Deserialize;

use crate::error::{Error, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleSpec {
    #[serde(default)]
    regexp: String,
    #[serde(default)]
    replace: String,
}

#[derive(Debug, Clone)]
struct Rule {
    re: Regex,
    replacement: String,
}

/// Ordered list of compiled find/replace rules. An empty replacer leaves
/// text untouched.
#[derive(Debug, Clone, Default)]
pub struct Replacer {
    rules: Vec<Rule>,
}

impl Replacer {
    /// Build a replacer from a JSON array of `{"regexp", "replace"}` objects.
    pub fn from_json(spec: &str) -> Result<Self> {
        if spec.trim().is_empty() {
            return Ok(Self::default());
        }
        let specs: Option<Vec<RuleSpec>> =
            serde_json::from_str(spec).map_err(Error::InvalidReplaceSpec)?;

        let rules = specs
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(index, spec)| match Regex::new(&spec.regexp) {
                Ok(re) => Ok(Rule {
                    re,
                    replacement: spec.replace,
                }),
                Err(source) => Err(Error::InvalidPattern {
                    index,
                    pattern: spec.regexp,
                    source,
                }),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { rules })
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn apply(&self, text: &str) -> String {
        self.rules.iter().fold(text.to_string(), |acc, rule| {
            rule.re.replace_all(&acc, rule.replacement.as_str()).into_owned()
        })
    }
}
