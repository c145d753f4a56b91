use serde::Serialize;

use crate::error::{AdvisorError, AdvisorResult};
use crate::types::{CropType, HistoryEntry};

/// Average yield for one crop across every stored prediction of it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CropYieldSummary {
    pub crop: CropType,
    pub avg_yield: f64,
}

/// Area-weighted average yield per crop, in order of first appearance.
///
/// Each entry contributes `yield * area` to its crop's total, so a six-ton
/// estimate on one hectare does not outweigh a three-ton estimate on ten.
/// The with-pesticides figure is used as the crop's potential yield. Every
/// stored entry is expected to carry a positive area; an entry that does
/// not is reported as an error instead of poisoning the averages with
/// NaN or infinity.
pub fn avg_yield_by_crop(history: &[HistoryEntry]) -> AdvisorResult<Vec<CropYieldSummary>> {
    let mut groups: Vec<(CropType, f64, f64)> = Vec::new();

    for entry in history {
        let area = entry.form_data.area;
        if !area.is_finite() || area <= 0.0 {
            return Err(AdvisorError::validation(format!(
                "history entry {} has a non-positive field area ({area})",
                entry.id
            )));
        }

        let yield_mass = entry.result.predicted_yield_with_pesticides * area;
        let crop = entry.form_data.crop_type;
        match groups.iter_mut().find(|(grouped, _, _)| *grouped == crop) {
            Some((_, total_mass, total_area)) => {
                *total_mass += yield_mass;
                *total_area += area;
            }
            None => groups.push((crop, yield_mass, area)),
        }
    }

    Ok(groups
        .into_iter()
        .map(|(crop, total_mass, total_area)| CropYieldSummary {
            crop,
            avg_yield: total_mass / total_area,
        })
        .collect())
}
