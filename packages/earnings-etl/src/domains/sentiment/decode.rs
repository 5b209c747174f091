//! Decoding of `/v1/responses` bodies embedded in batch output lines.

use openai_client::ResponseBody;
use serde::Deserialize;
use serde_json::Value;

use super::prompt::SentimentAssessment;
use crate::error::{PipelineError, Result};

/// Extract the model's text from a response body: the first `output_text`
/// part of the first `message` output item. Reasoning items and any other
/// output kinds are ignored regardless of their position.
pub fn decode_output_text(body: &Value) -> Result<String> {
    let body = ResponseBody::deserialize(body)
        .map_err(|e| PipelineError::MalformedProviderResponse(e.to_string()))?;

    if !body.output.iter().any(|item| item.kind == "message") {
        return Err(PipelineError::MalformedProviderResponse(
            "no message item in output".to_string(),
        ));
    }

    body.output_text().map(str::to_string).ok_or_else(|| {
        PipelineError::MalformedProviderResponse("message has no output_text content".to_string())
    })
}

/// Parse and range-check the model's JSON answer.
pub fn parse_assessment(text: &str) -> Result<SentimentAssessment> {
    let assessment: SentimentAssessment =
        serde_json::from_str(text).map_err(|e| PipelineError::SchemaMismatch(e.to_string()))?;

    let score = assessment.sentiment_score;
    if !score.is_finite() || !(-1.0..=1.0).contains(&score) {
        return Err(PipelineError::SchemaMismatch(format!(
            "sentiment_score {} outside [-1, 1]",
            score
        )));
    }

    Ok(assessment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reasoning_item_before_message_is_skipped() {
        let body = json!({
            "output": [
                { "type": "reasoning", "summary": [] },
                { "type": "message", "content": [
                    { "type": "output_text", "text": "{\"a\":1}" }
                ]}
            ]
        });
        assert_eq!(decode_output_text(&body).unwrap(), "{\"a\":1}");
    }

    #[test]
    fn test_message_first_is_found() {
        let body = json!({
            "output": [
                { "type": "message", "content": [
                    { "type": "refusal", "refusal": "no" },
                    { "type": "output_text", "text": "answer" }
                ]}
            ]
        });
        assert_eq!(decode_output_text(&body).unwrap(), "answer");
    }

    #[test]
    fn test_missing_message_is_malformed() {
        let body = json!({ "output": [{ "type": "reasoning", "summary": [] }] });
        assert!(matches!(
            decode_output_text(&body),
            Err(PipelineError::MalformedProviderResponse(_))
        ));

        let body = json!({ "output": "not a list" });
        assert!(matches!(
            decode_output_text(&body),
            Err(PipelineError::MalformedProviderResponse(_))
        ));
    }

    #[test]
    fn test_parse_assessment_bounds() {
        let ok = parse_assessment(r#"{"reasoning_process":"Beat","sentiment_score":-1}"#).unwrap();
        assert_eq!(ok.sentiment_score, -1.0);

        for text in [
            r#"{"reasoning_process":"x","sentiment_score":1.5}"#,
            r#"{"reasoning_process":"x","sentiment_score":"high"}"#,
            r#"{"reasoning_process":"x"}"#,
            r#"{"reasoning_process":"x","sentiment_score":0.5,"ticker":"MSFT"}"#,
            "not json",
        ] {
            assert!(matches!(
                parse_assessment(text),
                Err(PipelineError::SchemaMismatch(_))
            ));
        }
    }
}
