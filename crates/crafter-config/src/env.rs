use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Failure to expand a `{{ env.VAR }}` placeholder
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExpandError {
    /// Variable is unset and the placeholder has no default
    #[error("environment variable not found: `{0}`")]
    MissingVariable(String),
    /// Placeholder is not scoped with `env.`
    #[error("only variables scoped with 'env.' are supported: `{0}`")]
    UnsupportedScope(String),
}

/// Expand `{{ env.VAR }}` and `{{ env.VAR | default("x") }}` placeholders
///
/// Runs on the raw TOML text before parsing. Comment lines are copied
/// through untouched so commented-out settings never require variables.
pub fn expand_env(input: &str) -> Result<String, ExpandError> {
    let mut output = String::with_capacity(input.len());

    for line in input.split_inclusive('\n') {
        if line.trim_start().starts_with('#') {
            output.push_str(line);
        } else {
            expand_line(line, &mut output)?;
        }
    }

    Ok(output)
}

fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\{\{\s*([a-zA-Z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#).expect("must be valid regex")
    })
}

fn expand_line(line: &str, output: &mut String) -> Result<(), ExpandError> {
    let mut cursor = 0;

    for captures in placeholder().captures_iter(line) {
        let Some(whole) = captures.get(0) else { continue };
        output.push_str(&line[cursor..whole.start()]);
        output.push_str(&resolve(&captures)?);
        cursor = whole.end();
    }

    output.push_str(&line[cursor..]);
    Ok(())
}

fn resolve(captures: &Captures<'_>) -> Result<String, ExpandError> {
    let key = captures.get(1).map_or("", |m| m.as_str());
    let default = captures.get(2).map(|m| m.as_str());

    let name = key
        .strip_prefix("env.")
        .filter(|name| !name.is_empty() && !name.contains('.'))
        .ok_or_else(|| ExpandError::UnsupportedScope(key.to_owned()))?;

    match std::env::var(name) {
        Ok(value) => Ok(value),
        Err(_) => default
            .map(ToOwned::to_owned)
            .ok_or_else(|| ExpandError::MissingVariable(name.to_owned())),
    }
}
