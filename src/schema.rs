//! Output-shape schemas sent alongside every generation request.
//!
//! The backend is asked for `application/json` constrained by one of these
//! structures, so the reply can be decoded straight into the domain types.
//! Type tags use the generative API's uppercase spelling ("OBJECT", "STRING",
//! "NUMBER", "ARRAY"). Enum value lists are built from the typed constants in
//! [`crate::types`] so the schema cannot drift from what the decoder accepts.

use serde_json::{json, Value};

use crate::types::{FertilizerType, Page};

const IMPACT_LEVELS: [&str; 3] = ["High", "Medium", "Low"];
const OVERALL_IMPACTS: [&str; 3] = ["Positive", "Neutral", "Negative"];

fn fertilizer_names() -> Vec<&'static str> {
    FertilizerType::ALL.iter().map(|f| f.as_str()).collect()
}

fn page_names() -> Vec<&'static str> {
    Page::ALL.iter().map(|p| p.as_str()).collect()
}

/// Schema for a full yield prediction, mirroring `PredictionResult`.
pub fn prediction_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "predictedYieldWithPesticides": {
                "type": "NUMBER",
                "description": "Predicted yield assuming pesticides are used."
            },
            "predictedYieldWithoutPesticides": {
                "type": "NUMBER",
                "description": "Predicted yield without pesticides; must be lower than the with-pesticides figure."
            },
            "yieldUnit": {
                "type": "STRING",
                "description": "The unit for both predicted yields, e.g., 'tons/hectare'."
            },
            "confidenceScore": {
                "type": "NUMBER",
                "description": "A score from 0.0 to 1.0 indicating model confidence."
            },
            "summary": {
                "type": "STRING",
                "description": "A brief summary of the prediction and key factors."
            },
            "weatherImpactAnalysis": {
                "type": "OBJECT",
                "properties": {
                    "overallImpact": { "type": "STRING", "enum": OVERALL_IMPACTS },
                    "temperatureEffect": {
                        "type": "STRING",
                        "description": "How the given average temperature affects this crop."
                    },
                    "rainfallEffect": {
                        "type": "STRING",
                        "description": "How the given annual rainfall affects this crop."
                    },
                    "keyWeatherRisks": {
                        "type": "ARRAY",
                        "items": { "type": "STRING" },
                        "description": "Named weather risks for this crop and climate; may be empty."
                    }
                },
                "required": ["overallImpact", "temperatureEffect", "rainfallEffect", "keyWeatherRisks"]
            },
            "recommendations": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING", "description": "Title of the recommendation." },
                        "description": { "type": "STRING", "description": "Detailed description of the recommendation." },
                        "impact": { "type": "STRING", "enum": IMPACT_LEVELS },
                        "potentialYieldIncrease": {
                            "type": "NUMBER",
                            "description": "Estimated percentage yield increase if the recommendation is followed."
                        },
                        "fertilizerType": { "type": "STRING", "enum": fertilizer_names() }
                    },
                    "required": ["title", "description", "impact"]
                }
            },
            "riskFactors": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "risk": { "type": "STRING", "description": "Description of the potential risk." },
                        "severity": { "type": "STRING", "enum": IMPACT_LEVELS }
                    },
                    "required": ["risk", "severity"]
                }
            }
        },
        "required": [
            "predictedYieldWithPesticides",
            "predictedYieldWithoutPesticides",
            "yieldUnit",
            "confidenceScore",
            "summary",
            "weatherImpactAnalysis",
            "recommendations",
            "riskFactors"
        ]
    })
}

/// Schema for the static crop fact sheet, mirroring `CropInfo`.
pub fn crop_info_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "cropName": { "type": "STRING" },
            "description": { "type": "STRING" },
            "idealConditions": {
                "type": "OBJECT",
                "properties": {
                    "soilType": { "type": "ARRAY", "items": { "type": "STRING" } },
                    "temperatureRange": { "type": "STRING" },
                    "annualRainfall": { "type": "STRING" }
                },
                "required": ["soilType", "temperatureRange", "annualRainfall"]
            },
            "commonPests": { "type": "ARRAY", "items": { "type": "STRING" } },
            "growingCycle": { "type": "STRING" }
        },
        "required": ["cropName", "description", "idealConditions", "commonPests", "growingCycle"]
    })
}

/// Schema for one assistant turn: the text to show, plus an optional page
/// the caller should open. `page` stays optional so plain answers need no
/// navigation field at all.
pub fn chat_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "response": {
                "type": "STRING",
                "description": "The assistant's conversational reply."
            },
            "page": {
                "type": "STRING",
                "enum": page_names(),
                "description": "Set only when the user asked to go somewhere in the app."
            }
        },
        "required": ["response"]
    })
}
