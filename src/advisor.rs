//! Front door of the advisory core.
//!
//! `YieldAdvisor` owns the one backend handle and the history log, and
//! sequences every AI-backed operation the same way: build the request,
//! call the backend, decode the reply. Only a fully validated prediction
//! ever reaches the history; failed calls leave no partial entries.

use std::sync::Arc;

use crate::analytics::{self, CropYieldSummary};
use crate::api::GenerativeBackend;
use crate::error::AdvisorResult;
use crate::history::HistoryStore;
use crate::prompt;
use crate::types::{
    ChatMessage, ChatReply, CropInfo, CropType, HistoryEntry, Locale, PredictionFormData,
    PredictionResult,
};
use crate::validate;

#[derive(Clone)]
pub struct YieldAdvisor {
    backend: Arc<dyn GenerativeBackend>,
    history: HistoryStore,
}

impl YieldAdvisor {
    pub fn new(backend: Arc<dyn GenerativeBackend>, history: HistoryStore) -> Self {
        Self { backend, history }
    }

    /// Requests a yield prediction and records it in the history.
    ///
    /// The area precondition is checked before the backend is contacted, so
    /// an incomplete form never costs a remote call.
    pub async fn predict(
        &self,
        form: &PredictionFormData,
        locale: Locale,
    ) -> AdvisorResult<PredictionResult> {
        let request = prompt::build_prediction_request(form, locale)?;
        let reply = self.backend.generate(request).await?;
        let result = validate::parse_prediction_reply(&reply)?;

        self.history.append(HistoryEntry::new(form.clone(), result.clone()));
        Ok(result)
    }

    /// Looks up the static fact sheet for a crop.
    pub async fn crop_info(&self, crop: CropType, locale: Locale) -> AdvisorResult<CropInfo> {
        let request = prompt::build_crop_info_request(crop, locale);
        let reply = self.backend.generate(request).await?;
        validate::parse_crop_info_reply(&reply)
    }

    /// Sends one assistant turn, threading the prior messages as context.
    pub async fn chat(
        &self,
        history: &[ChatMessage],
        message: &str,
        locale: Locale,
    ) -> AdvisorResult<ChatReply> {
        let request = prompt::build_chat_request(history, message, locale);
        let reply = self.backend.generate(request).await?;
        validate::parse_chat_reply(&reply)
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Per-crop area-weighted averages over everything stored so far.
    pub fn avg_yield_by_crop(&self) -> AdvisorResult<Vec<CropYieldSummary>> {
        analytics::avg_yield_by_crop(&self.history.get_all())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockGenerativeBackend;
    use crate::error::AdvisorError;
    use crate::storage::MemoryStore;
    use crate::types::Page;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    fn memory_history() -> HistoryStore {
        HistoryStore::new(Arc::new(MemoryStore::new()))
    }

    fn advisor_with(mock: MockGenerativeBackend) -> YieldAdvisor {
        YieldAdvisor::new(Arc::new(mock), memory_history())
    }

    fn valid_form() -> PredictionFormData {
        PredictionFormData { area: 2.5, ..Default::default() }
    }

    fn prediction_reply() -> String {
        serde_json::json!({
            "predictedYieldWithPesticides": 3.1,
            "predictedYieldWithoutPesticides": 2.6,
            "yieldUnit": "tons/hectare",
            "confidenceScore": 0.81,
            "summary": "Good prospects with timely sowing.",
            "weatherImpactAnalysis": {
                "overallImpact": "Positive",
                "temperatureEffect": "Favourable.",
                "rainfallEffect": "Sufficient.",
                "keyWeatherRisks": ["Late frost"]
            },
            "recommendations": [],
            "riskFactors": [
                { "risk": "High risk of pest infestation", "severity": "High" }
            ]
        })
        .to_string()
    }

    #[tokio::test]
    async fn successful_prediction_lands_in_the_history() {
        let mut mock = MockGenerativeBackend::new();
        mock.expect_generate().times(1).returning(|_| Ok(prediction_reply()));
        let advisor = advisor_with(mock);

        let form = valid_form();
        let result = advisor.predict(&form, Locale::En).await.unwrap();
        assert_eq!(result.predicted_yield_with_pesticides, 3.1);

        let stored = advisor.history().get_all();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].form_data, form);
        assert_eq!(stored[0].result, result);
    }

    #[tokio::test]
    async fn missing_area_never_contacts_the_backend() {
        let mut mock = MockGenerativeBackend::new();
        mock.expect_generate().never();
        let advisor = advisor_with(mock);

        let form = PredictionFormData { area: 0.0, ..Default::default() };
        let err = advisor.predict(&form, Locale::En).await.unwrap_err();
        assert_matches!(err, AdvisorError::Validation(_));
        assert!(advisor.history().get_all().is_empty());
    }

    #[tokio::test]
    async fn backend_failure_leaves_no_history_entry() {
        let mut mock = MockGenerativeBackend::new();
        mock.expect_generate()
            .returning(|_| Err(AdvisorError::Backend { status: 503, message: "overloaded".to_string() }));
        let advisor = advisor_with(mock);

        let err = advisor.predict(&valid_form(), Locale::En).await.unwrap_err();
        assert_matches!(err, AdvisorError::Backend { status: 503, .. });
        assert!(advisor.history().get_all().is_empty());
    }

    #[tokio::test]
    async fn malformed_reply_leaves_no_partial_entry() {
        let mut mock = MockGenerativeBackend::new();
        mock.expect_generate()
            .returning(|_| Ok(r#"{"predictedYieldWithPesticides": 3.0}"#.to_string()));
        let advisor = advisor_with(mock);

        let err = advisor.predict(&valid_form(), Locale::En).await.unwrap_err();
        assert_matches!(err, AdvisorError::Schema(_));
        assert!(advisor.history().get_all().is_empty());
    }

    #[tokio::test]
    async fn crop_info_decodes_the_fact_sheet() {
        let mut mock = MockGenerativeBackend::new();
        mock.expect_generate()
            .withf(|request| request.prompt.contains("Potatoes"))
            .returning(|_| {
                Ok(serde_json::json!({
                    "cropName": "Potatoes",
                    "description": "A cool-season tuber crop.",
                    "idealConditions": {
                        "soilType": ["Loamy", "Sandy"],
                        "temperatureRange": "15-20°C",
                        "annualRainfall": "500-700mm"
                    },
                    "commonPests": ["Colorado potato beetle"],
                    "growingCycle": "90-120 days"
                })
                .to_string())
            });
        let advisor = advisor_with(mock);

        let info = advisor.crop_info(CropType::Potatoes, Locale::En).await.unwrap();
        assert_eq!(info.crop_name, "Potatoes");
        assert_eq!(info.common_pests, vec!["Colorado potato beetle"]);
    }

    #[tokio::test]
    async fn chat_threads_prior_turns_and_maps_navigation() {
        let mut mock = MockGenerativeBackend::new();
        mock.expect_generate()
            .withf(|request| {
                request.history.len() == 2
                    && request.prompt == "Take me to the analytics page"
                    && request.system_instruction.as_deref().is_some_and(|s| s.contains("analytics"))
            })
            .returning(|_| Ok(r#"{"response":"Opening analytics.","page":"analytics"}"#.to_string()));
        let advisor = advisor_with(mock);

        let prior = vec![
            ChatMessage::user("What does the analytics page show?"),
            ChatMessage::bot("Average yields per crop from your history."),
        ];
        let reply = advisor
            .chat(&prior, "Take me to the analytics page", Locale::En)
            .await
            .unwrap();
        assert_eq!(reply.page, Some(Page::Analytics));
        assert_eq!(reply.response, "Opening analytics.");
    }

    #[tokio::test]
    async fn chat_with_unknown_page_means_no_navigation() {
        let mut mock = MockGenerativeBackend::new();
        mock.expect_generate()
            .returning(|_| Ok(r#"{"response":"Done.","page":"settings"}"#.to_string()));
        let advisor = advisor_with(mock);

        let reply = advisor.chat(&[], "Open settings", Locale::En).await.unwrap();
        assert_eq!(reply.page, None);
    }

    #[tokio::test]
    async fn aggregates_run_over_the_stored_history() {
        let mut mock = MockGenerativeBackend::new();
        mock.expect_generate().times(2).returning(|_| Ok(prediction_reply()));
        let advisor = advisor_with(mock);

        advisor
            .predict(&PredictionFormData { area: 2.0, ..Default::default() }, Locale::En)
            .await
            .unwrap();
        advisor
            .predict(&PredictionFormData { area: 3.0, ..Default::default() }, Locale::En)
            .await
            .unwrap();

        let summaries = advisor.avg_yield_by_crop().unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].crop, CropType::Wheat);
        assert_eq!(summaries[0].avg_yield, 3.1);
    }
}
