use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use agriyield::{
    BlobStore, ChatMessage, ChatTranscript, Config, CropInfo, CropType, CropYieldSummary,
    FileStore, GeminiClient, HistoryEntry, HistoryStore, Locale, PredictionFormData,
    PredictionResult, YieldAdvisor,
};

#[derive(Parser)]
#[command(name = "agriyield")]
#[command(about = "Crop yield advisory - AI predictions, local history, per-crop analytics", long_about = None)]
struct Cli {
    /// Language for model answers (en, es, hi, te, ta, kn, fr, de, pt, bn)
    #[arg(long, default_value = "en")]
    locale: String,

    /// Directory for history and chat storage (defaults to ~/.agriyield/store)
    #[arg(long)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Request a yield prediction for a field described in a JSON file
    Predict {
        /// Path to a JSON file with the prediction form data
        input: PathBuf,
    },
    /// Look up growing facts for a crop
    CropInfo {
        /// Crop name, e.g. Wheat or Sugarcane
        crop: String,
    },
    /// Ask the in-app assistant a question
    Chat {
        /// The message to send
        message: String,
    },
    /// Show stored predictions, newest first
    History {
        /// Remove every stored prediction instead of listing them
        #[arg(long)]
        clear: bool,
    },
    /// Show per-crop area-weighted average yields
    Analytics,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));

    let cli = Cli::parse();
    let locale: Locale = cli.locale.parse().map_err(|e: String| anyhow::anyhow!(e))?;

    let store: Arc<dyn BlobStore> = match &cli.store {
        Some(root) => Arc::new(FileStore::new(root)),
        None => Arc::new(FileStore::default()),
    };
    let history = HistoryStore::new(store.clone());

    match cli.command {
        Command::Predict { input } => {
            let raw = std::fs::read_to_string(&input)
                .with_context(|| format!("failed to read form data from {}", input.display()))?;
            let form: PredictionFormData = serde_json::from_str(&raw)
                .with_context(|| format!("{} is not a valid prediction form", input.display()))?;

            match advisor_with(history).predict(&form, locale).await {
                Ok(result) => print_prediction(&form, &result),
                Err(e) if e.is_user_input() => {
                    eprintln!("{e}");
                    std::process::exit(1);
                }
                Err(e) => {
                    log::error!("prediction failed: {e}");
                    eprintln!("Failed to get prediction from AgriYield-AI. Please check your inputs and API key.");
                    std::process::exit(1);
                }
            }
        }
        Command::CropInfo { crop } => {
            let crop: CropType = crop.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            match advisor_with(history).crop_info(crop, locale).await {
                Ok(info) => print_crop_info(&info),
                Err(e) => {
                    log::error!("crop lookup failed: {e}");
                    eprintln!("Failed to get crop information from AgriYield-AI.");
                    std::process::exit(1);
                }
            }
        }
        Command::Chat { message } => {
            let transcript = ChatTranscript::new(store);
            let mut messages = transcript.load();

            let reply = advisor_with(history).chat(&messages, &message, locale).await;
            messages.push(ChatMessage::user(message.as_str()));
            match reply {
                Ok(reply) => {
                    println!("{}", reply.response);
                    if let Some(page) = reply.page {
                        println!("(Suggested page: {page})");
                    }
                    messages.push(ChatMessage::bot(reply.response));
                    transcript.save(&messages);
                }
                Err(e) => {
                    log::error!("chat turn failed: {e}");
                    eprintln!("An error occurred.");
                    messages.push(ChatMessage::bot("An error occurred."));
                    transcript.save(&messages);
                    std::process::exit(1);
                }
            }
        }
        Command::History { clear } => {
            if clear {
                history.clear();
                println!("Prediction history cleared.");
            } else {
                print_history(&history.get_all());
            }
        }
        Command::Analytics => {
            let summaries = agriyield::avg_yield_by_crop(&history.get_all())?;
            print_analytics(&summaries);
        }
    }

    Ok(())
}

fn advisor_with(history: HistoryStore) -> YieldAdvisor {
    let config = Config::load_or_default();
    YieldAdvisor::new(Arc::new(GeminiClient::new(&config.ai)), history)
}

fn print_prediction(form: &PredictionFormData, result: &PredictionResult) {
    println!("Prediction for {} on {} hectares", form.crop_type, form.area);
    println!(
        "  Yield with pesticides:    {:.2} {}",
        result.predicted_yield_with_pesticides, result.yield_unit
    );
    println!(
        "  Yield without pesticides: {:.2} {}",
        result.predicted_yield_without_pesticides, result.yield_unit
    );
    println!("  Confidence: {:.0}%", result.confidence_score * 100.0);
    println!();
    println!("{}", result.summary);

    let weather = &result.weather_impact_analysis;
    println!();
    println!("Weather impact: {}", weather.overall_impact);
    println!("  Temperature: {}", weather.temperature_effect);
    println!("  Rainfall:    {}", weather.rainfall_effect);
    for risk in &weather.key_weather_risks {
        println!("  Risk: {risk}");
    }

    if !result.recommendations.is_empty() {
        println!();
        println!("Recommendations:");
        for rec in &result.recommendations {
            match rec.potential_yield_increase {
                Some(gain) => println!("  [{}] {} (+{gain}%)", rec.impact, rec.title),
                None => println!("  [{}] {}", rec.impact, rec.title),
            }
            println!("      {}", rec.description);
        }
    }

    if !result.risk_factors.is_empty() {
        println!();
        println!("Risk factors:");
        for risk in &result.risk_factors {
            println!("  [{}] {}", risk.severity, risk.risk);
        }
    }
}

fn print_crop_info(info: &CropInfo) {
    println!("{}", info.crop_name);
    println!("{}", info.description);
    println!();
    println!("Ideal conditions:");
    println!("  Soil:        {}", info.ideal_conditions.soil_type.join(", "));
    println!("  Temperature: {}", info.ideal_conditions.temperature_range);
    println!("  Rainfall:    {}", info.ideal_conditions.annual_rainfall);
    println!("Common pests: {}", info.common_pests.join(", "));
    println!("Growing cycle: {}", info.growing_cycle);
}

fn print_history(entries: &[HistoryEntry]) {
    if entries.is_empty() {
        println!("No predictions stored yet.");
        return;
    }
    for entry in entries {
        println!(
            "{}  {:<10} {:>7.2} ha  {:.2} {}",
            entry.timestamp,
            entry.form_data.crop_type.as_str(),
            entry.form_data.area,
            entry.result.predicted_yield_with_pesticides,
            entry.result.yield_unit
        );
    }
}

fn print_analytics(summaries: &[CropYieldSummary]) {
    if summaries.is_empty() {
        println!("No predictions stored yet; nothing to aggregate.");
        return;
    }
    println!("Area-weighted average yield by crop:");
    for summary in summaries {
        println!("  {:<10} {:.2}", summary.crop.as_str(), summary.avg_yield);
    }
}
