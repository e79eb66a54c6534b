//! Transcript-to-record extraction.
//!
//! Flattening and parsing are plain functions; [`extract_record`] glues them
//! to one oracle call. Malformed oracle output is a hard error: there is no
//! repair pass and no retry.

use interviewer_types::error::FinalizeError;
use interviewer_types::extraction::ExtractionRecord;
use interviewer_types::llm::{CompletionRequest, Message};
use interviewer_types::turn::Transcript;

use crate::interview::prompt::extraction_prompt;
use crate::llm::box_provider::BoxLlmProvider;

/// Settings for the extraction call.
#[derive(Debug, Clone)]
pub struct ExtractionSettings {
    pub model: String,
    pub max_tokens: u32,
}

/// One `role: text` line per turn, newline-joined.
///
/// Attachment names, when present, follow as a final `attachments:` line.
pub fn flatten_transcript(transcript: &Transcript, attachments: &[String]) -> String {
    let mut lines: Vec<String> = transcript.iter().map(|t| t.to_line()).collect();
    if !attachments.is_empty() {
        lines.push(format!("attachments: {}", attachments.join(", ")));
    }
    lines.join("\n")
}

/// Remove an enclosing Markdown code fence, with or without a language tag.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Parse oracle output into a record with exactly the closed key set.
pub fn parse_record(raw: &str) -> Result<ExtractionRecord, FinalizeError> {
    let body = strip_code_fences(raw);
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| FinalizeError::MalformedOutput(format!("invalid JSON: {e}")))?;
    match value {
        serde_json::Value::Object(object) => Ok(ExtractionRecord::from_json_object(&object)),
        other => Err(FinalizeError::MalformedOutput(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Run the one-shot extraction call over a transcript.
///
/// No persona and no history: the whole transcript travels inside a single
/// user message.
#[tracing::instrument(
    name = "extract_record",
    skip(provider, settings, transcript, attachments),
    fields(model = %settings.model, turns = transcript.len())
)]
pub async fn extract_record(
    provider: &BoxLlmProvider,
    settings: &ExtractionSettings,
    transcript: &Transcript,
    attachments: &[String],
) -> Result<ExtractionRecord, FinalizeError> {
    let prompt = extraction_prompt(&flatten_transcript(transcript, attachments));
    let request = CompletionRequest {
        model: settings.model.clone(),
        messages: vec![Message::user(prompt)],
        system: None,
        max_tokens: settings.max_tokens,
        temperature: Some(0.0),
        json_output: true,
    };

    let response = provider.complete(&request).await?;
    parse_record(&response.content).inspect_err(|e| {
        let preview: String = response.content.chars().take(200).collect();
        tracing::warn!(error = %e, content_preview = %preview, "Extraction output rejected");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use interviewer_types::extraction::ExtractionKey;
    use interviewer_types::turn::Turn;

    use crate::testing::ScriptedProvider;

    const VALID_JSON: &str = r#"{"respondent_name": "Ama", "location": "Accra", "incident_date": "2024-03-02"}"#;

    #[test]
    fn test_flatten_one_line_per_turn() {
        let transcript: Transcript = vec![
            Turn::assistant("What should I call you?"),
            Turn::user("Ama"),
            Turn::diagnostic("An error occurred: timeout"),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            flatten_transcript(&transcript, &[]),
            "assistant: What should I call you?\nuser: Ama\nassistant: An error occurred: timeout"
        );
    }

    #[test]
    fn test_flatten_appends_attachments() {
        let transcript: Transcript = vec![Turn::user("I have photos")].into_iter().collect();
        let attachments = vec!["a.jpg".to_string(), "b.pdf".to_string()];
        assert_eq!(
            flatten_transcript(&transcript, &attachments),
            "user: I have photos\nattachments: a.jpg, b.pdf"
        );
    }

    #[test]
    fn test_strip_code_fences_variants() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{\"a\":1}\n```\n"), "{\"a\":1}");
        assert_eq!(strip_code_fences("  {\"a\":1}  "), "{\"a\":1}");
        assert_eq!(strip_code_fences("```json{\"a\":1}```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```JSON\n{}\n```"), "{}");
    }

    #[test]
    fn test_parse_fenced_record_has_closed_key_set() {
        let raw = format!("```json\n{VALID_JSON}\n```");
        let record = parse_record(&raw).unwrap();
        assert_eq!(record.len(), ExtractionKey::ALL.len());
        let keys: Vec<ExtractionKey> = record.iter().map(|(k, _)| k).collect();
        let mut expected = ExtractionKey::ALL.to_vec();
        expected.sort();
        assert_eq!(keys, expected);
        assert_eq!(record.get(ExtractionKey::RespondentName), "Ama");
        assert_eq!(record.get(ExtractionKey::Location), "Accra");
    }

    #[test]
    fn test_parse_rejects_prose() {
        let err = parse_record("Sure! Here is the record you asked for.").unwrap_err();
        assert!(matches!(err, FinalizeError::MalformedOutput(_)));
    }

    #[test]
    fn test_parse_rejects_non_object() {
        let err = parse_record("[1, 2, 3]").unwrap_err();
        match err {
            FinalizeError::MalformedOutput(msg) => assert!(msg.contains("an array")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_extract_record_sends_one_shot_json_request() {
        let provider = ScriptedProvider::replying([VALID_JSON]);
        let requests = provider.requests();
        let provider = BoxLlmProvider::new(provider);
        let settings = ExtractionSettings {
            model: "extract-model".to_string(),
            max_tokens: 2048,
        };
        let transcript: Transcript =
            vec![Turn::assistant("Name?"), Turn::user("Ama")].into_iter().collect();

        let record = extract_record(&provider, &settings, &transcript, &[]).await.unwrap();
        assert_eq!(record.get(ExtractionKey::RespondentName), "Ama");

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let req = &requests[0];
        assert_eq!(req.model, "extract-model");
        assert!(req.system.is_none());
        assert!(req.json_output);
        assert_eq!(req.temperature, Some(0.0));
        assert_eq!(req.messages.len(), 1);
        assert!(req.messages[0].content.contains("assistant: Name?\nuser: Ama"));
    }

    #[tokio::test]
    async fn test_extract_record_propagates_oracle_error() {
        let provider = BoxLlmProvider::new(ScriptedProvider::failing("connection reset"));
        let settings = ExtractionSettings {
            model: "m".to_string(),
            max_tokens: 10,
        };
        let err = extract_record(&provider, &settings, &Transcript::new(), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, FinalizeError::Oracle(_)));
    }
}
