//! JotformSubmitter -- [`FormSubmitter`] for a Jotform-style REST API.
//!
//! One submission is one `POST {base}/form/{form_id}/submissions` carrying
//! `submission[{field_id}]=value` pairs as a urlencoded body. The key goes in
//! the `APIKEY` header.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use interviewer_core::form::FormSubmitter;
use interviewer_types::error::SubmissionError;
use interviewer_types::submission::{SubmissionPayload, SubmissionReceipt};

/// Client for the external form API. Not `Debug`: it holds the API key.
pub struct JotformSubmitter {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    form_id: String,
}

impl JotformSubmitter {
    pub fn new(
        base_url: impl Into<String>,
        form_id: impl Into<String>,
        api_key: SecretString,
        timeout: Duration,
    ) -> Result<Self, SubmissionError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SubmissionError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.into(),
            form_id: form_id.into(),
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/form/{}/submissions",
            self.base_url.trim_end_matches('/'),
            self.form_id
        )
    }
}

/// Urlencoded form pairs in the `submission[{id}]` convention.
fn form_pairs(payload: &SubmissionPayload) -> Vec<(String, String)> {
    payload
        .iter()
        .map(|(id, value)| (format!("submission[{id}]"), value.to_string()))
        .collect()
}

#[derive(Debug, Default, Deserialize)]
struct SubmitResponse {
    #[serde(default)]
    content: Option<SubmitContent>,
}

#[derive(Debug, Default, Deserialize)]
struct SubmitContent {
    #[serde(default, rename = "submissionID")]
    submission_id: Option<serde_json::Value>,
    #[serde(default, rename = "URL")]
    url: Option<String>,
}

/// Read the receipt out of a success body. Unknown shapes yield a bare status.
fn parse_receipt(status: u16, body: &str) -> SubmissionReceipt {
    let content = serde_json::from_str::<SubmitResponse>(body)
        .ok()
        .and_then(|r| r.content)
        .unwrap_or_default();

    let submission_id = content.submission_id.and_then(|v| match v {
        serde_json::Value::String(s) if !s.is_empty() => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    });

    SubmissionReceipt {
        status,
        submission_id,
        url: content.url.filter(|u| !u.is_empty()),
    }
}

impl FormSubmitter for JotformSubmitter {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<SubmissionReceipt, SubmissionError> {
        let response = self
            .client
            .post(self.url())
            .header("APIKEY", self.api_key.expose_secret())
            .form(&form_pairs(payload))
            .send()
            .await
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        match status {
            200 | 201 => Ok(parse_receipt(status, &body)),
            _ => Err(SubmissionError::Rejected { status, body }),
        }
    }
}
