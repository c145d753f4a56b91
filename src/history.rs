use std::sync::Arc;

use crate::storage::BlobStore;
use crate::types::HistoryEntry;

/// Storage key for the serialized prediction log.
pub const HISTORY_KEY: &str = "agri_yield_history";

/// Append-only, newest-first log of past predictions.
///
/// Reads and writes never fail the caller. A prediction that already
/// succeeded is not taken back because the disk was unhappy; failures are
/// logged and the session degrades to in-memory behavior.
#[derive(Clone)]
pub struct HistoryStore {
    store: Arc<dyn BlobStore>,
}

impl HistoryStore {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store }
    }

    /// Prepends the entry and persists the entire updated log.
    pub fn append(&self, entry: HistoryEntry) {
        let mut history = self.get_all();
        history.insert(0, entry);
        match serde_json::to_string(&history) {
            Ok(serialized) => {
                if let Err(e) = self.store.set(HISTORY_KEY, &serialized) {
                    log::warn!("failed to persist prediction history: {e}");
                }
            }
            Err(e) => log::warn!("failed to serialize prediction history: {e}"),
        }
    }

    /// All entries, newest first. Missing, unreadable, or corrupt storage
    /// reads as an empty log.
    pub fn get_all(&self) -> Vec<HistoryEntry> {
        match self.store.get(HISTORY_KEY) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(history) => history,
                Err(e) => {
                    log::warn!("stored prediction history is unreadable: {e}");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("failed to read prediction history: {e}");
                Vec::new()
            }
        }
    }

    /// Removes every entry. Clearing an already empty log is fine.
    pub fn clear(&self) {
        if let Err(e) = self.store.remove(HISTORY_KEY) {
            log::warn!("failed to clear prediction history: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdvisorResult;
    use crate::storage::MemoryStore;
    use crate::types::{
        CropType, ImpactLevel, OverallImpact, PredictionFormData, PredictionResult, WeatherImpact,
    };
    use pretty_assertions::assert_eq;

    fn entry_for(crop: CropType, area: f64, yield_with: f64) -> HistoryEntry {
        let form = PredictionFormData { crop_type: crop, area, ..Default::default() };
        let result = PredictionResult {
            predicted_yield_with_pesticides: yield_with,
            predicted_yield_without_pesticides: yield_with * 0.85,
            yield_unit: "tons/hectare".to_string(),
            confidence_score: 0.8,
            summary: "ok".to_string(),
            weather_impact_analysis: WeatherImpact {
                overall_impact: OverallImpact::Neutral,
                temperature_effect: "mild".to_string(),
                rainfall_effect: "adequate".to_string(),
                key_weather_risks: vec![],
            },
            recommendations: vec![],
            risk_factors: vec![crate::types::RiskFactor {
                risk: "High risk of pest infestation".to_string(),
                severity: ImpactLevel::High,
            }],
        };
        HistoryEntry::new(form, result)
    }

    struct FailingStore;

    impl BlobStore for FailingStore {
        fn get(&self, _key: &str) -> AdvisorResult<Option<String>> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk unavailable").into())
        }

        fn set(&self, _key: &str, _value: &str) -> AdvisorResult<()> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk unavailable").into())
        }

        fn remove(&self, _key: &str) -> AdvisorResult<()> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk unavailable").into())
        }
    }

    #[test]
    fn entries_come_back_newest_first() {
        let history = HistoryStore::new(Arc::new(MemoryStore::new()));
        let first = entry_for(CropType::Wheat, 2.0, 3.0);
        let second = entry_for(CropType::Corn, 1.0, 6.0);

        history.append(first.clone());
        history.append(second.clone());

        let all = history.get_all();
        assert_eq!(all, vec![second, first]);
    }

    #[test]
    fn empty_store_reads_as_empty_log() {
        let history = HistoryStore::new(Arc::new(MemoryStore::new()));
        assert!(history.get_all().is_empty());
    }

    #[test]
    fn corrupt_storage_reads_as_empty_log() {
        let store = Arc::new(MemoryStore::new());
        store.set(HISTORY_KEY, "definitely not json").unwrap();
        let history = HistoryStore::new(store);
        assert!(history.get_all().is_empty());
    }

    #[test]
    fn clear_is_idempotent() {
        let history = HistoryStore::new(Arc::new(MemoryStore::new()));
        history.append(entry_for(CropType::Rice, 1.5, 4.0));

        history.clear();
        assert!(history.get_all().is_empty());
        history.clear();
        assert!(history.get_all().is_empty());
    }

    #[test]
    fn storage_failures_never_reach_the_caller() {
        let history = HistoryStore::new(Arc::new(FailingStore));
        history.append(entry_for(CropType::Wheat, 2.0, 3.0));
        assert!(history.get_all().is_empty());
        history.clear();
    }

    #[test]
    fn log_round_trips_every_field() {
        let store = Arc::new(MemoryStore::new());
        let history = HistoryStore::new(store.clone());
        let entry = entry_for(CropType::Potatoes, 0.75, 18.2);
        history.append(entry.clone());

        let reread = HistoryStore::new(store).get_all();
        assert_eq!(reread, vec![entry]);
    }
}
