//! Raw issue view and normalized corpus record
//!
//! [`RawIssue`] reads only the handful of fields the corpus needs from a stored
//! issue line. Everything else the fetcher stored is ignored, so the stored
//! data is always a superset of what the transformer consumes.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Lenient view of one stored issue
///
/// Missing and `null` fields are both treated as absent. Identifier and
/// timestamp fields are carried through untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawIssue {
    #[serde(default)]
    pub id: Option<Value>,

    #[serde(default)]
    pub key: Option<Value>,

    #[serde(default)]
    pub fields: Option<RawFields>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFields {
    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub created: Option<Value>,

    #[serde(default)]
    pub updated: Option<Value>,

    #[serde(default)]
    pub comment: Option<RawCommentPage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCommentPage {
    #[serde(default)]
    pub comments: Option<Vec<RawComment>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawComment {
    #[serde(default)]
    pub body: Option<String>,
}

impl RawIssue {
    /// Parses one stored line
    ///
    /// The issue, its `fields`, `fields.comment` and every comment entry must
    /// be JSON objects when present; arrays are rejected even though serde
    /// would accept them positionally.
    pub fn parse(line: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(line)?;
        if !value.is_object() {
            return Err(not_an_object("issue"));
        }

        let fields = value.get("fields");
        require_object("fields", fields)?;
        let comment = fields.and_then(|f| f.get("comment"));
        require_object("fields.comment", comment)?;
        if let Some(Value::Array(entries)) = comment.and_then(|c| c.get("comments")) {
            for entry in entries {
                require_object("comment entry", Some(entry))?;
            }
        }

        RawIssue::deserialize(value)
    }

    pub fn summary(&self) -> Option<&str> {
        self.fields.as_ref()?.summary.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.fields.as_ref()?.description.as_deref()
    }

    /// Comment bodies in stored order; absent bodies are yielded as `None`
    pub fn comment_bodies(&self) -> impl Iterator<Item = Option<&str>> {
        self.fields
            .as_ref()
            .and_then(|f| f.comment.as_ref())
            .and_then(|c| c.comments.as_ref())
            .into_iter()
            .flatten()
            .map(|c| c.body.as_deref())
    }
}

/// Accepts an absent, `null` or object value
fn require_object(what: &str, value: Option<&Value>) -> Result<(), serde_json::Error> {
    match value {
        None | Some(Value::Null) | Some(Value::Object(_)) => Ok(()),
        Some(_) => Err(not_an_object(what)),
    }
}

fn not_an_object(what: &str) -> serde_json::Error {
    serde::de::Error::custom(format!("{} is not a JSON object", what))
}

/// Ordered prompt name → prompt text pairs, serialized as a JSON object
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedPrompts(Vec<(String, String)>);

impl DerivedPrompts {
    pub fn push(&mut self, name: impl Into<String>, text: String) {
        self.0.push((name.into(), text));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, text)| text.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for DerivedPrompts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, text) in &self.0 {
            map.serialize_entry(name, text)?;
        }
        map.end()
    }
}

/// One line of the training corpus
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRecord {
    pub id: Option<Value>,
    pub key: Option<Value>,
    pub project: String,
    pub summary: String,
    pub description: String,
    pub comments: String,
    pub created: Option<Value>,
    pub updated: Option<Value>,
    pub derived: DerivedPrompts,
}
