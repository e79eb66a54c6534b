//! The closed extraction schema.
//!
//! An [`ExtractionRecord`] is what the extraction call turns a finished
//! interview into. Its key set is fixed by [`ExtractionKey`]: whatever the
//! oracle returns is normalized to exactly these keys before anything else
//! sees it.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Semantic keys of the extraction record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionKey {
    RespondentName,
    ContactDetails,
    IncidentDate,
    IncidentTime,
    Location,
    ViolationType,
    IncidentDescription,
    Perpetrators,
    Witnesses,
    Evidence,
    SupportNeeds,
    EstimatedBudget,
    ReferralSource,
}

impl ExtractionKey {
    /// Every key, in schema order.
    pub const ALL: [ExtractionKey; 13] = [
        ExtractionKey::RespondentName,
        ExtractionKey::ContactDetails,
        ExtractionKey::IncidentDate,
        ExtractionKey::IncidentTime,
        ExtractionKey::Location,
        ExtractionKey::ViolationType,
        ExtractionKey::IncidentDescription,
        ExtractionKey::Perpetrators,
        ExtractionKey::Witnesses,
        ExtractionKey::Evidence,
        ExtractionKey::SupportNeeds,
        ExtractionKey::EstimatedBudget,
        ExtractionKey::ReferralSource,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionKey::RespondentName => "respondent_name",
            ExtractionKey::ContactDetails => "contact_details",
            ExtractionKey::IncidentDate => "incident_date",
            ExtractionKey::IncidentTime => "incident_time",
            ExtractionKey::Location => "location",
            ExtractionKey::ViolationType => "violation_type",
            ExtractionKey::IncidentDescription => "incident_description",
            ExtractionKey::Perpetrators => "perpetrators",
            ExtractionKey::Witnesses => "witnesses",
            ExtractionKey::Evidence => "evidence",
            ExtractionKey::SupportNeeds => "support_needs",
            ExtractionKey::EstimatedBudget => "estimated_budget",
            ExtractionKey::ReferralSource => "referral_source",
        }
    }

    /// One-line meaning of the key, shown to the oracle in the extraction prompt.
    pub fn description(&self) -> &'static str {
        match self {
            ExtractionKey::RespondentName => "the name the respondent asked to be called",
            ExtractionKey::ContactDetails => "phone number, email or other way to reach the respondent",
            ExtractionKey::IncidentDate => "date of the incident",
            ExtractionKey::IncidentTime => "approximate time of day of the incident",
            ExtractionKey::Location => "where the incident happened",
            ExtractionKey::ViolationType => "the kind of human rights violation reported",
            ExtractionKey::IncidentDescription => "the respondent's account of what happened",
            ExtractionKey::Perpetrators => "who was responsible",
            ExtractionKey::Witnesses => "anyone who saw the incident",
            ExtractionKey::Evidence => "photos, documents, records or other evidence mentioned",
            ExtractionKey::SupportNeeds => "the support the respondent is asking for",
            ExtractionKey::EstimatedBudget => "estimated cost of the requested support",
            ExtractionKey::ReferralSource => "how the respondent heard about this service",
        }
    }
}

impl fmt::Display for ExtractionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExtractionKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        ExtractionKey::ALL
            .into_iter()
            .find(|k| k.as_str() == needle)
            .ok_or_else(|| format!("invalid extraction key: '{s}'"))
    }
}

/// Structured record produced by the extraction call.
///
/// Always holds exactly the [`ExtractionKey::ALL`] key set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractionRecord {
    fields: BTreeMap<ExtractionKey, String>,
}

impl ExtractionRecord {
    /// Normalize a parsed JSON object to the closed key set.
    ///
    /// Unknown keys are dropped, missing keys become empty strings, `null`
    /// becomes an empty string and other non-string values are rendered as
    /// their JSON text.
    pub fn from_json_object(object: &serde_json::Map<String, serde_json::Value>) -> Self {
        let fields = ExtractionKey::ALL
            .into_iter()
            .map(|key| {
                let value = match object.get(key.as_str()) {
                    None | Some(serde_json::Value::Null) => String::new(),
                    Some(serde_json::Value::String(s)) => s.trim().to_string(),
                    Some(other) => other.to_string(),
                };
                (key, value)
            })
            .collect();
        Self { fields }
    }

    pub fn get(&self, key: ExtractionKey) -> &str {
        self.fields.get(&key).map(String::as_str).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ExtractionKey, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(ExtractionKey, String)> for ExtractionRecord {
    /// Build a record from explicit pairs; absent keys are filled with "".
    fn from_iter<I: IntoIterator<Item = (ExtractionKey, String)>>(iter: I) -> Self {
        let mut fields: BTreeMap<ExtractionKey, String> =
            ExtractionKey::ALL.into_iter().map(|k| (k, String::new())).collect();
        fields.extend(iter);
        Self { fields }
    }
}
