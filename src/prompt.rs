//! Request builders for the three AI-backed operations.
//!
//! All domain heuristics live here as explicit prompt directives: the model
//! is instructed, not computed against. Each builder pairs its prompt with
//! the matching output schema from [`crate::schema`] so the reply comes back
//! as decodable JSON. No network traffic happens in this module.

use crate::api::{GenerationRequest, HistoryTurn};
use crate::error::{AdvisorError, AdvisorResult};
use crate::schema;
use crate::types::{ChatMessage, CropType, Locale, Page, PredictionFormData, Sender, WaterSource};

/// Shown when a prediction is requested without a usable field area. The
/// area gate is the one local precondition guarding the remote call.
pub const AREA_REQUIRED_MESSAGE: &str =
    "Please provide a field area. You can enter it manually or draw the field on the map to calculate it.";

fn language_directive(locale: Locale) -> String {
    format!("Respond with all free-text fields written in {}.", locale.language_name())
}

fn water_source_guidance(source: WaterSource) -> String {
    if source.is_irrigated() {
        format!(
            "Water Source is '{source}'. Irrigation mitigates low or inconsistent rainfall and \
             supports yield stability; treat rainfall-related risks as reduced accordingly."
        )
    } else {
        "Water Source is 'Rainfed'. The crop depends entirely on rainfall. If the stated annual \
         rainfall is low or typically inconsistent for this crop, you MUST include a rainfall risk \
         factor with severity 'High'."
            .to_string()
    }
}

/// Builds the yield prediction request, or rejects it locally when the form
/// has no positive field area.
pub fn build_prediction_request(
    form: &PredictionFormData,
    locale: Locale,
) -> AdvisorResult<GenerationRequest> {
    if !form.area.is_finite() || form.area <= 0.0 {
        return Err(AdvisorError::validation(AREA_REQUIRED_MESSAGE));
    }

    let field_shape = if form.field_shape.is_empty() {
        "Not provided"
    } else {
        form.field_shape.as_str()
    };

    let prompt = format!(
        "Analyze the following agricultural data to predict crop yield and provide recommendations.\n\
         The output must be a JSON object matching the provided schema.\n\
         \n\
         **Critical Interpretation Guidance:**\n\
         - **Dual-scenario yield**: Provide both 'predictedYieldWithPesticides' (assuming effective \
         pest control) and 'predictedYieldWithoutPesticides' (assuming none). The without-pesticides \
         figure MUST be lower than the with-pesticides figure, and you MUST list a risk factor with \
         the risk 'High risk of pest infestation' and severity 'High' for the unprotected scenario.\n\
         - **Water Source**: {water_guidance}\n\
         - **Weather Impact**: For weatherImpactAnalysis, describe how the given temperature and \
         rainfall affect this crop, classify the overall impact as 'Positive', 'Neutral', or \
         'Negative', and list the key weather risks (the list may be empty).\n\
         - For riskFactors, provide a 'risk' description and a 'severity' level ('High', 'Medium', \
         'Low') for each identified risk.\n\
         \n\
         Farm Data:\n\
         - Crop Type: {crop}\n\
         - Field Shape (GeoJSON): {field_shape}\n\
         - Soil Type: {soil}\n\
         - Annual Rainfall (mm): {rainfall}\n\
         - Average Temperature (°C): {temperature}\n\
         - Fertilizer Type: {fertilizer}\n\
         - Water Source: {water}\n\
         - Area (hectares): {area}\n\
         \n\
         Based on this data, provide a detailed analysis including predicted yields, risk factors, \
         and actionable recommendations.\n\
         The confidence score should reflect the quality and completeness of the input data.\n\
         For example, for Wheat in Loamy soil with 450mm rainfall and 22°C, you might predict \
         around 2.8 tons/hectare.\n\
         {language}",
        water_guidance = water_source_guidance(form.water_source),
        crop = form.crop_type,
        field_shape = field_shape,
        soil = form.soil_type,
        rainfall = form.rainfall,
        temperature = form.temperature,
        fertilizer = form.fertilizer_type,
        water = form.water_source,
        area = form.area,
        language = language_directive(locale),
    );

    Ok(GenerationRequest::new(prompt, schema::prediction_schema()))
}

/// Builds the static crop fact-sheet request.
pub fn build_crop_info_request(crop: CropType, locale: Locale) -> GenerationRequest {
    let prompt = format!(
        "Provide detailed information about the crop: {crop}. The output must be a JSON object \
         matching the provided schema. Include ideal growing conditions, common pests, and the \
         typical growing cycle duration.\n{language}",
        language = language_directive(locale),
    );
    GenerationRequest::new(prompt, schema::crop_info_schema())
}

fn assistant_instruction(locale: Locale) -> String {
    let pages: Vec<&str> = Page::ALL.iter().map(|p| p.as_str()).collect();
    format!(
        "You are AgriBot, the assistant inside the AgriYield crop advisory app. Help users with \
         farming questions and with finding their way around the app. Be concise and practical. \
         The app has these pages: {pages}. When the user asks to open one of them, set 'page' to \
         the matching page id; otherwise omit 'page' entirely. {language}",
        pages = pages.join(", "),
        language = language_directive(locale),
    )
}

fn to_turn(message: &ChatMessage) -> HistoryTurn {
    match message.sender {
        Sender::User => HistoryTurn::user(message.text.clone()),
        Sender::Bot => HistoryTurn::model(message.text.clone()),
    }
}

/// Builds one assistant turn: prior messages are threaded as conversation
/// history and the new message becomes the final user turn.
pub fn build_chat_request(
    history: &[ChatMessage],
    message: &str,
    locale: Locale,
) -> GenerationRequest {
    GenerationRequest::new(message, schema::chat_schema())
        .with_system_instruction(assistant_instruction(locale))
        .with_history(history.iter().map(to_turn).collect())
}
