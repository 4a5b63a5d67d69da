//! Payload parsers: the JSON document branch and the key=value branch.
//! Each parser emits its own records through the run's [`RunLog`].
use indexmap::IndexMap;
use serde_json::Value;

use crate::error::Result;
use crate::sink::RunLog;

/// Outcome of the JSON branch. A parse failure is reported, not returned as an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JsonOutcome {
    Parsed { pretty: String },
    Invalid { diagnostic: String },
}

/// Parse to a generic value and re-render it with two-space indentation.
/// Object keys keep the order they were read in and numbers keep their
/// literal digits.
pub fn pretty_print_json(raw: &str) -> std::result::Result<String, serde_json::Error> {
    let tree: Value = serde_json::from_str(raw)?;
    serde_json::to_string_pretty(&tree)
}

/// JSON branch: one `info` record with the pretty form, or one `warn` record
/// with the parser diagnostic. Never falls back to key=value parsing.
pub fn log_json_payload(log: &mut RunLog<'_>, raw: &str) -> Result<JsonOutcome> {
    match pretty_print_json(raw) {
        Ok(pretty) => {
            log.info(format!("Detected JSON payload; parsed content:\n{pretty}"))?;
            Ok(JsonOutcome::Parsed { pretty })
        }
        Err(e) => {
            let diagnostic = e.to_string();
            log.warn(format!(
                "Argument looked like JSON but could not be parsed: {diagnostic}"
            ))?;
            Ok(JsonOutcome::Invalid { diagnostic })
        }
    }
}

/// Insertion-ordered string map built from `key=value` tokens.
///
/// A repeated key overwrites the value but keeps the position of its first
/// occurrence. Tokens without a usable `=` are stored under `arg_<n>`, where
/// `n` is the map size at the moment of insertion.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyValueMap {
    entries: IndexMap<String, String>,
}

impl KeyValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Self {
        let mut map = Self::new();
        for arg in args {
            map.insert_token(arg.as_ref());
        }
        map
    }

    pub fn insert_token(&mut self, token: &str) {
        match split_pair(token) {
            Some((key, value)) => {
                self.entries.insert(key.to_string(), value.to_string());
            }
            None => {
                let key = format!("arg_{}", self.entries.len());
                self.entries.insert(key, token.to_string());
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Split at the first `=`, requiring a non-empty key and a non-empty value.
fn split_pair(token: &str) -> Option<(&str, &str)> {
    let eq = token.find('=')?;
    if eq == 0 || eq + 1 >= token.len() {
        return None;
    }
    Some((&token[..eq], &token[eq + 1..]))
}

/// Key=value branch: a header plus one `  <key> = <value>` record per entry.
pub fn log_key_value_payload<S: AsRef<str>>(
    log: &mut RunLog<'_>,
    args: &[S],
) -> Result<KeyValueMap> {
    let map = KeyValueMap::from_args(args);
    if map.is_empty() {
        log.info("No key=value pairs detected; arguments logged above only.")?;
        return Ok(map);
    }

    log.info("Parsed key=value arguments:")?;
    for (key, value) in map.iter() {
        log.info(format!("  {key} = {value}"))?;
    }
    Ok(map)
}
