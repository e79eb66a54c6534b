//! Submission payload assembly.

use interviewer_types::config::FormConfig;
use interviewer_types::extraction::ExtractionRecord;
use interviewer_types::submission::{FieldMapping, SubmissionPayload};

/// The two operator fields every submission carries.
///
/// Their values are set here and never sourced from the respondent or the
/// oracle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorOverrides {
    pub operator_name: String,
    pub case_assigned_to_field: String,
    pub referral_received_by_field: String,
}

impl OperatorOverrides {
    pub fn from_config(form: &FormConfig) -> Self {
        Self {
            operator_name: form.operator_name.clone(),
            case_assigned_to_field: form.case_assigned_to_field.clone(),
            referral_received_by_field: form.referral_received_by_field.clone(),
        }
    }
}

/// Map a record onto form field ids and force the operator fields.
pub fn build_payload(
    record: &ExtractionRecord,
    mapping: &FieldMapping,
    overrides: &OperatorOverrides,
) -> SubmissionPayload {
    let mut payload = SubmissionPayload::new(mapping.apply(record));
    payload.set(&overrides.case_assigned_to_field, &overrides.operator_name);
    payload.set(&overrides.referral_received_by_field, &overrides.operator_name);
    payload
}
