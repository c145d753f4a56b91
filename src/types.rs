use chrono::{Local, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CropType {
    Wheat,
    Corn,
    Rice,
    Soybean,
    Cotton,
    Sugarcane,
    Potatoes,
}

impl CropType {
    pub const ALL: [CropType; 7] = [
        CropType::Wheat,
        CropType::Corn,
        CropType::Rice,
        CropType::Soybean,
        CropType::Cotton,
        CropType::Sugarcane,
        CropType::Potatoes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CropType::Wheat => "Wheat",
            CropType::Corn => "Corn",
            CropType::Rice => "Rice",
            CropType::Soybean => "Soybean",
            CropType::Cotton => "Cotton",
            CropType::Sugarcane => "Sugarcane",
            CropType::Potatoes => "Potatoes",
        }
    }
}

impl fmt::Display for CropType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CropType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CropType::ALL
            .iter()
            .find(|crop| crop.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| {
                let names: Vec<&str> = CropType::ALL.iter().map(|c| c.as_str()).collect();
                format!("unknown crop {s:?}; expected one of: {}", names.join(", "))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoilType {
    Loamy,
    Sandy,
    Clay,
    Silty,
    Peaty,
}

impl SoilType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoilType::Loamy => "Loamy",
            SoilType::Sandy => "Sandy",
            SoilType::Clay => "Clay",
            SoilType::Silty => "Silty",
            SoilType::Peaty => "Peaty",
        }
    }
}

impl fmt::Display for SoilType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FertilizerType {
    #[serde(rename = "Nitrogen-based")]
    NitrogenBased,
    #[serde(rename = "Phosphorus-based")]
    PhosphorusBased,
    #[serde(rename = "Potassium-based")]
    PotassiumBased,
    Organic,
    None,
}

impl FertilizerType {
    pub const ALL: [FertilizerType; 5] = [
        FertilizerType::NitrogenBased,
        FertilizerType::PhosphorusBased,
        FertilizerType::PotassiumBased,
        FertilizerType::Organic,
        FertilizerType::None,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FertilizerType::NitrogenBased => "Nitrogen-based",
            FertilizerType::PhosphorusBased => "Phosphorus-based",
            FertilizerType::PotassiumBased => "Potassium-based",
            FertilizerType::Organic => "Organic",
            FertilizerType::None => "None",
        }
    }
}

impl fmt::Display for FertilizerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaterSource {
    Rainfed,
    #[serde(rename = "Canal Irrigation")]
    CanalIrrigation,
    #[serde(rename = "Well Irrigation")]
    WellIrrigation,
    #[serde(rename = "River/Lake")]
    RiverLake,
    #[serde(rename = "Drip Irrigation")]
    DripIrrigation,
}

impl WaterSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            WaterSource::Rainfed => "Rainfed",
            WaterSource::CanalIrrigation => "Canal Irrigation",
            WaterSource::WellIrrigation => "Well Irrigation",
            WaterSource::RiverLake => "River/Lake",
            WaterSource::DripIrrigation => "Drip Irrigation",
        }
    }

    /// Every source except rainfall itself counts as irrigated.
    pub fn is_irrigated(&self) -> bool {
        !matches!(self, WaterSource::Rainfed)
    }
}

impl fmt::Display for WaterSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Shared three-step scale used for recommendation impact and risk severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImpactLevel {
    High,
    Medium,
    Low,
}

impl ImpactLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImpactLevel::High => "High",
            ImpactLevel::Medium => "Medium",
            ImpactLevel::Low => "Low",
        }
    }
}

impl fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverallImpact {
    Positive,
    Neutral,
    Negative,
}

impl OverallImpact {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverallImpact::Positive => "Positive",
            OverallImpact::Neutral => "Neutral",
            OverallImpact::Negative => "Negative",
        }
    }
}

impl fmt::Display for OverallImpact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything the caller knows about a field when asking for a prediction.
///
/// `field_shape` holds the serialized polygon drawn on the map, or an empty
/// string when the user never drew one. `area` must be positive before a
/// prediction is requested; that check lives in the request builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionFormData {
    pub crop_type: CropType,
    pub field_shape: String,
    pub soil_type: SoilType,
    pub rainfall: f64,
    pub temperature: f64,
    pub fertilizer_type: FertilizerType,
    pub area: f64,
    pub water_source: WaterSource,
}

impl Default for PredictionFormData {
    fn default() -> Self {
        Self {
            crop_type: CropType::Wheat,
            field_shape: String::new(),
            soil_type: SoilType::Loamy,
            rainfall: 500.0,
            temperature: 25.0,
            fertilizer_type: FertilizerType::None,
            area: 0.0,
            water_source: WaterSource::Rainfed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub title: String,
    pub description: String,
    pub impact: ImpactLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub potential_yield_increase: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fertilizer_type: Option<FertilizerType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskFactor {
    pub risk: String,
    pub severity: ImpactLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherImpact {
    pub overall_impact: OverallImpact,
    pub temperature_effect: String,
    pub rainfall_effect: String,
    pub key_weather_risks: Vec<String>,
}

/// The validated shape of one model prediction.
///
/// Both yield figures share `yield_unit`. The without-pesticides figure is a
/// prompt-level obligation to be lower than the with-pesticides one; see the
/// validator for how violations are handled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub predicted_yield_with_pesticides: f64,
    pub predicted_yield_without_pesticides: f64,
    pub yield_unit: String,
    pub confidence_score: f64,
    pub summary: String,
    pub weather_impact_analysis: WeatherImpact,
    pub recommendations: Vec<Recommendation>,
    pub risk_factors: Vec<RiskFactor>,
}

/// One stored prediction: the inputs as submitted and the result as
/// validated. Entries are immutable; the history is append/clear only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub timestamp: String,
    pub form_data: PredictionFormData,
    pub result: PredictionResult,
}

impl HistoryEntry {
    /// Stamps the entry with a time-derived id and a display timestamp.
    pub fn new(form_data: PredictionFormData, result: PredictionResult) -> Self {
        Self {
            id: Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true),
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            form_data,
            result,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdealConditions {
    pub soil_type: Vec<String>,
    pub temperature_range: String,
    pub annual_rainfall: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropInfo {
    pub crop_name: String,
    pub description: String,
    pub ideal_conditions: IdealConditions,
    pub common_pests: Vec<String>,
    pub growing_cycle: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self { sender: Sender::User, text: text.into() }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self { sender: Sender::Bot, text: text.into() }
    }
}

/// Pages the assistant may ask the caller to open. The closed set mirrors
/// the application's views; anything else is treated as no navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Predict,
    History,
    Analytics,
    Explorer,
    About,
}

impl Page {
    pub const ALL: [Page; 5] = [
        Page::Predict,
        Page::History,
        Page::Analytics,
        Page::Explorer,
        Page::About,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Page::Predict => "predict",
            Page::History => "history",
            Page::Analytics => "analytics",
            Page::Explorer => "explorer",
            Page::About => "about",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Page {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Page::ALL
            .iter()
            .find(|page| page.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown page {s:?}"))
    }
}

/// What the assistant said, plus an optional request to open a page.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub response: String,
    pub page: Option<Page>,
}

/// Languages the model is asked to answer in. The code is what callers pass
/// around; the English language name is what goes into prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Es,
    Hi,
    Te,
    Ta,
    Kn,
    Fr,
    De,
    Pt,
    Bn,
}

impl Locale {
    pub const ALL: [Locale; 10] = [
        Locale::En,
        Locale::Es,
        Locale::Hi,
        Locale::Te,
        Locale::Ta,
        Locale::Kn,
        Locale::Fr,
        Locale::De,
        Locale::Pt,
        Locale::Bn,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Es => "es",
            Locale::Hi => "hi",
            Locale::Te => "te",
            Locale::Ta => "ta",
            Locale::Kn => "kn",
            Locale::Fr => "fr",
            Locale::De => "de",
            Locale::Pt => "pt",
            Locale::Bn => "bn",
        }
    }

    pub fn language_name(&self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::Es => "Spanish",
            Locale::Hi => "Hindi",
            Locale::Te => "Telugu",
            Locale::Ta => "Tamil",
            Locale::Kn => "Kannada",
            Locale::Fr => "French",
            Locale::De => "German",
            Locale::Pt => "Portuguese",
            Locale::Bn => "Bengali",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locale::ALL
            .iter()
            .find(|locale| locale.code().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| {
                let codes: Vec<&str> = Locale::ALL.iter().map(|l| l.code()).collect();
                format!("unknown locale {s:?}; expected one of: {}", codes.join(", "))
            })
    }
}
