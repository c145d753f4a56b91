use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use agriyield::avg_yield_by_crop;
use agriyield::types::{
    CropType, HistoryEntry, ImpactLevel, OverallImpact, PredictionFormData, PredictionResult,
    RiskFactor, WeatherImpact,
};

fn synthetic_history(len: usize) -> Vec<HistoryEntry> {
    (0..len)
        .map(|i| {
            let form = PredictionFormData {
                crop_type: CropType::ALL[i % CropType::ALL.len()],
                area: 1.0 + (i % 17) as f64 * 0.35,
                ..Default::default()
            };
            let result = PredictionResult {
                predicted_yield_with_pesticides: 2.0 + (i % 11) as f64 * 0.4,
                predicted_yield_without_pesticides: 1.6 + (i % 11) as f64 * 0.35,
                yield_unit: "tons/hectare".to_string(),
                confidence_score: 0.8,
                summary: "synthetic".to_string(),
                weather_impact_analysis: WeatherImpact {
                    overall_impact: OverallImpact::Neutral,
                    temperature_effect: "mild".to_string(),
                    rainfall_effect: "adequate".to_string(),
                    key_weather_risks: vec![],
                },
                recommendations: vec![],
                risk_factors: vec![RiskFactor {
                    risk: "High risk of pest infestation".to_string(),
                    severity: ImpactLevel::High,
                }],
            };
            HistoryEntry::new(form, result)
        })
        .collect()
}

fn bench_avg_yield_by_crop(c: &mut Criterion) {
    let history = synthetic_history(10_000);
    c.bench_function("avg_yield_by_crop_10k_entries", |b| {
        b.iter(|| avg_yield_by_crop(black_box(&history)).unwrap())
    });

    let small = synthetic_history(100);
    c.bench_function("avg_yield_by_crop_100_entries", |b| {
        b.iter(|| avg_yield_by_crop(black_box(&small)).unwrap())
    });
}

criterion_group!(benches, bench_avg_yield_by_crop);
criterion_main!(benches);
