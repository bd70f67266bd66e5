//! Directive configuration headers.
//!
//! Options may follow the start fence in one of two forms, both parsed as a
//! flat YAML mapping of scalars:
//!
//! ```text
//! :::{details} Summary
//! ---
//! open: true
//! class: wide
//! ---
//! Content
//! :::
//!
//! :::{details} Summary
//! :open: true
//! :class: wide
//! Content
//! :::
//! ```
//!
//! A header that is not a flat mapping, or is not valid YAML, is ignored and
//! its lines stay in the directive content.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde_yaml::Value;

/// Header options as raw strings, keyed by option name.
pub type HeaderOptions = BTreeMap<String, String>;

static DELIMITER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[ ]{0,3}-{3}[ \t]*$").unwrap());

/// `:key: value` line. Lines opening with three colons are fences, which the
/// caller filters out.
static SHORTHAND_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[ ]{0,3}:(.*)$").unwrap());

/// Find a header at the start of `lines`.
///
/// Returns the options and the number of lines the header occupies, or
/// `None` when there is no usable header.
///
/// # Example
///
/// ```
/// use rw_directives::header::split_header;
///
/// let lines = [":class: wide", ":id: intro", "Body text"];
/// let (options, consumed) = split_header(&lines).unwrap();
///
/// assert_eq!(consumed, 2);
/// assert_eq!(options["class"], "wide");
/// assert_eq!(options["id"], "intro");
/// ```
#[must_use]
pub fn split_header(lines: &[&str]) -> Option<(HeaderOptions, usize)> {
    let first = lines.first()?;

    if DELIMITER_RE.is_match(first) {
        let close = lines.iter().skip(1).position(|line| DELIMITER_RE.is_match(line))? + 1;
        let body = lines[1..close].join("\n");
        return parse_mapping(&body).map(|options| (options, close + 1));
    }

    let body: Vec<&str> = lines
        .iter()
        .map_while(|line| SHORTHAND_RE.captures(line).and_then(|caps| caps.get(1)))
        .map(|m| m.as_str())
        .take_while(|body| !body.starts_with("::"))
        .collect();
    if body.is_empty() {
        return None;
    }
    parse_mapping(&body.join("\n")).map(|options| (options, body.len()))
}

/// Parse YAML text as a flat mapping of scalars.
fn parse_mapping(body: &str) -> Option<HeaderOptions> {
    if body.trim().is_empty() {
        return Some(HeaderOptions::new());
    }

    let value: Value = match serde_yaml::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring malformed directive header");
            return None;
        }
    };
    let Value::Mapping(mapping) = value else {
        tracing::debug!("Ignoring directive header that is not a mapping");
        return None;
    };

    let mut options = HeaderOptions::new();
    for (key, value) in mapping {
        let (Value::String(key), Some(value)) = (key, scalar(value)) else {
            tracing::debug!("Ignoring directive header with non-scalar entries");
            return None;
        };
        options.insert(key, value);
    }
    Some(options)
}

fn scalar(value: Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s),
        Value::Sequence(_) | Value::Mapping(_) | Value::Tagged(_) => None,
    }
}
