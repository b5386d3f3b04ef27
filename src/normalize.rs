//! Field normalization across heterogeneous user APIs.
//!
//! Every source names its fields differently. Each target attribute has an
//! ordered table of candidate accessors; the first one that yields a
//! non-empty scalar wins. Key matching is case-insensitive.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::types::{User, NULL_SENTINEL};

/// Object fields that wrap a list of users in a source's response.
const ENVELOPE_KEYS: &[&str] = &["results", "users", "data"];

/// How to reach a candidate value inside a raw item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Accessor {
    /// Top-level key.
    Key(&'static str),
    /// Key of an object stored under a top-level key.
    Nested(&'static str, &'static str),
}

const FIRST_NAME: &[Accessor] = &[
    Accessor::Key("first_name"),
    Accessor::Key("firstName"),
    Accessor::Nested("name", "first"),
    Accessor::Key("name"),
];

const LAST_NAME: &[Accessor] = &[
    Accessor::Key("last_name"),
    Accessor::Key("lastName"),
    Accessor::Nested("name", "last"),
];

const EMAIL: &[Accessor] = &[Accessor::Key("email")];

const SOURCE_ID: &[Accessor] = &[Accessor::Key("id")];

/// Why a raw item produced no user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    #[error("item is not a JSON object")]
    NotAnObject,

    #[error("no first or last name field")]
    MissingNames,

    #[error("no first name field")]
    MissingFirstName,

    #[error("no last name field")]
    MissingLastName,
}

/// Users extracted from one payload, plus how many items were rejected.
#[derive(Debug, Default, PartialEq)]
pub struct Normalized {
    pub users: Vec<User>,
    pub skipped: usize,
}

/// Normalize one source payload into zero or more users.
///
/// `source` is the URL the payload came from; it becomes the `source_id` of
/// items that carry no id of their own.
pub fn normalize_payload(payload: &Value, source: &str) -> Normalized {
    let items = raw_items(payload);
    if items.is_empty() {
        warn!(source, "payload contains no user items");
    }

    let mut normalized = Normalized::default();
    for (index, item) in items.into_iter().enumerate() {
        let result = match item.as_object() {
            Some(object) => normalize_item(object, source),
            None => Err(SkipReason::NotAnObject),
        };

        match result {
            Ok(user) => normalized.users.push(user),
            Err(reason) => {
                warn!(source, index, %reason, "skipping record");
                normalized.skipped += 1;
            }
        }
    }

    debug!(
        source,
        accepted = normalized.users.len(),
        skipped = normalized.skipped,
        "normalized payload"
    );
    normalized
}

/// Split a payload into raw items: arrays are items, envelopes are unwrapped,
/// any other object is a single item.
fn raw_items(payload: &Value) -> Vec<&Value> {
    match payload {
        Value::Array(items) => items.iter().collect(),
        Value::Object(object) => match envelope_items(object) {
            Some(items) => items,
            None => vec![payload],
        },
        _ => Vec::new(),
    }
}

fn envelope_items(object: &Map<String, Value>) -> Option<Vec<&Value>> {
    // An object that already looks like a person is never an envelope.
    if resolve(object, FIRST_NAME).is_some() || resolve(object, LAST_NAME).is_some() {
        return None;
    }

    ENVELOPE_KEYS
        .iter()
        .find_map(|key| match get_ci(object, key)? {
            Value::Array(items) => Some(items.iter().collect()),
            inner @ Value::Object(_) => Some(vec![inner]),
            _ => None,
        })
}

/// Build a user from one raw item.
pub fn normalize_item(item: &Map<String, Value>, source: &str) -> Result<User, SkipReason> {
    let first = resolve(item, FIRST_NAME);
    let mut last = resolve(item, LAST_NAME).map(|(value, _)| value);

    let mut first_name = first.as_ref().map(|(value, _)| value.clone());

    // A single full-name string ("Leanne Graham") supplies both parts.
    if last.is_none() {
        if let Some((full, Accessor::Key("name"))) = &first {
            if let Some((given, family)) = split_full_name(full) {
                first_name = Some(given);
                last = Some(family);
            }
        }
    }

    let (first_name, last_name) = match (first_name, last) {
        (Some(first), Some(last)) => (first, last),
        (None, None) => return Err(SkipReason::MissingNames),
        (None, Some(_)) => return Err(SkipReason::MissingFirstName),
        (Some(_), None) => return Err(SkipReason::MissingLastName),
    };

    let email = resolve(item, EMAIL)
        .map(|(value, _)| value)
        .unwrap_or_else(|| NULL_SENTINEL.to_string());
    let source_id = resolve(item, SOURCE_ID)
        .map(|(value, _)| value)
        .unwrap_or_else(|| source.to_string());

    Ok(User {
        first_name,
        last_name,
        email,
        source_id,
    })
}

/// First candidate that yields a usable value, along with the accessor used.
fn resolve(item: &Map<String, Value>, candidates: &[Accessor]) -> Option<(String, Accessor)> {
    candidates.iter().find_map(|accessor| {
        let value = match *accessor {
            Accessor::Key(key) => get_ci(item, key),
            Accessor::Nested(outer, inner) => get_ci(item, outer)
                .and_then(Value::as_object)
                .and_then(|nested| get_ci(nested, inner)),
        }?;
        scalar_text(value).map(|text| (text, *accessor))
    })
}

/// Case-insensitive key lookup; an exact match wins over a folded one.
fn get_ci<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    object.get(key).or_else(|| {
        object
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    })
}

/// Text of a scalar JSON value. Null, blank strings and containers are absent.
/// Whitespace runs inside strings collapse to one space, so values never span lines.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let collapsed = s.split_whitespace().collect::<Vec<_>>().join(" ");
            (!collapsed.is_empty()).then_some(collapsed)
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn split_full_name(full: &str) -> Option<(String, String)> {
    let (given, family) = full.trim().rsplit_once(char::is_whitespace)?;
    let given = given.trim_end();
    if given.is_empty() || family.is_empty() {
        return None;
    }
    Some((given.to_string(), family.to_string()))
}
