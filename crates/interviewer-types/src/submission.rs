//! Form submission types: field mapping, payload and receipt.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::extraction::{ExtractionKey, ExtractionRecord};

/// Static mapping from extraction keys to the external form's field ids.
///
/// Supplied as configuration. Keys are validated against the closed
/// [`ExtractionKey`] set when deserialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct FieldMapping {
    fields: BTreeMap<ExtractionKey, String>,
}

impl FieldMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for tests and programmatic setup.
    pub fn with(mut self, key: ExtractionKey, field_id: impl Into<String>) -> Self {
        self.fields.insert(key, field_id.into());
        self
    }

    pub fn get(&self, key: ExtractionKey) -> Option<&str> {
        self.fields.get(&key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ExtractionKey, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// The key mapped onto `field_id`, if any.
    pub fn key_for(&self, field_id: &str) -> Option<ExtractionKey> {
        self.fields
            .iter()
            .find(|(_, id)| id.as_str() == field_id)
            .map(|(k, _)| *k)
    }

    /// Rename every mapped record key to its external field id.
    ///
    /// Keys without a mapping are left out. Pure, so applying it again to the
    /// same record yields the same entries.
    pub fn apply(&self, record: &ExtractionRecord) -> BTreeMap<String, String> {
        record
            .iter()
            .filter_map(|(key, value)| {
                self.fields
                    .get(&key)
                    .map(|field_id| (field_id.clone(), value.to_string()))
            })
            .collect()
    }
}

impl TryFrom<BTreeMap<String, String>> for FieldMapping {
    type Error = String;

    fn try_from(raw: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        let mut fields = BTreeMap::new();
        let mut owners: BTreeMap<String, ExtractionKey> = BTreeMap::new();
        for (key, field_id) in raw {
            let key: ExtractionKey = key.parse()?;
            let field_id = field_id.trim().to_string();
            if field_id.is_empty() {
                return Err(format!("field id for '{key}' is empty"));
            }
            if let Some(other) = owners.insert(field_id.clone(), key) {
                return Err(format!(
                    "field id '{field_id}' is mapped by both '{other}' and '{key}'"
                ));
            }
            fields.insert(key, field_id);
        }
        Ok(Self { fields })
    }
}

impl From<FieldMapping> for BTreeMap<String, String> {
    fn from(mapping: FieldMapping) -> Self {
        mapping
            .fields
            .into_iter()
            .map(|(k, v)| (k.as_str().to_string(), v))
            .collect()
    }
}

/// Key/value pairs sent to the form API, keyed by external field id.
///
/// Transient: built for one outbound call and dropped afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SubmissionPayload {
    fields: BTreeMap<String, String>,
}

impl SubmissionPayload {
    pub fn new(fields: BTreeMap<String, String>) -> Self {
        Self { fields }
    }

    /// Set a field, replacing whatever value it had.
    pub fn set(&mut self, field_id: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field_id.into(), value.into());
    }

    pub fn get(&self, field_id: &str) -> Option<&str> {
        self.fields.get(field_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// What the form API told us about an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    /// HTTP status returned by the form API (200 or 201).
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission_id: Option<String>,
    /// Link to the stored submission, when the API returns one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}
