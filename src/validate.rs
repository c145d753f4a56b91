//! Decoders for the model's JSON replies.
//!
//! Validation happens in two steps. First the load-bearing fields are
//! checked for presence, so a reply that dropped one of them fails with a
//! message naming the field. Then the whole value is decoded into the typed
//! result, which checks every field and closed enum set. Obligations the
//! prompt places on the model but the shape cannot express, such as the
//! dual-yield ordering, are logged when violated rather than corrected:
//! the reply is returned exactly as the model produced it.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{AdvisorError, AdvisorResult};
use crate::types::{ChatReply, CropInfo, Page, PredictionResult};

fn parse_object(raw: &str) -> AdvisorResult<Value> {
    let value: Value = serde_json::from_str(raw.trim())?;
    Ok(value)
}

fn require_fields(value: &Value, fields: &[&str]) -> AdvisorResult<()> {
    for field in fields {
        if value.get(field).map_or(true, Value::is_null) {
            return Err(AdvisorError::schema(format!("missing required field `{field}`")));
        }
    }
    Ok(())
}

/// Decodes a prediction reply, failing without a partial result when the
/// text is not JSON or the shape is off.
pub fn parse_prediction_reply(raw: &str) -> AdvisorResult<PredictionResult> {
    let value = parse_object(raw)?;
    require_fields(
        &value,
        &["predictedYieldWithPesticides", "summary", "weatherImpactAnalysis"],
    )?;

    let result: PredictionResult =
        serde_json::from_value(value).map_err(|e| AdvisorError::schema(e.to_string()))?;

    if result.predicted_yield_without_pesticides > result.predicted_yield_with_pesticides {
        log::warn!(
            "model violated the yield ordering: without pesticides {} > with pesticides {}",
            result.predicted_yield_without_pesticides,
            result.predicted_yield_with_pesticides
        );
    }
    if !(0.0..=1.0).contains(&result.confidence_score) {
        log::warn!("model confidence {} is outside [0, 1]", result.confidence_score);
    }

    Ok(result)
}

/// Decodes a crop fact-sheet reply.
pub fn parse_crop_info_reply(raw: &str) -> AdvisorResult<CropInfo> {
    let value = parse_object(raw)?;
    require_fields(&value, &["cropName", "idealConditions"])?;
    serde_json::from_value(value).map_err(|e| AdvisorError::schema(e.to_string()))
}

#[derive(Debug, Deserialize)]
struct RawChatReply {
    response: String,
    page: Option<String>,
}

/// Decodes an assistant reply. A page value outside the known set means no
/// navigation, never a failure.
pub fn parse_chat_reply(raw: &str) -> AdvisorResult<ChatReply> {
    let value = parse_object(raw)?;
    let reply: RawChatReply =
        serde_json::from_value(value).map_err(|e| AdvisorError::schema(e.to_string()))?;

    let page = reply.page.and_then(|name| match name.parse::<Page>() {
        Ok(page) => Some(page),
        Err(_) => {
            log::warn!("assistant suggested unknown page {name:?}; ignoring navigation");
            None
        }
    });

    Ok(ChatReply { response: reply.response, page })
}
