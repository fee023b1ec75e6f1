use crate::app::pipeline::PredictionOutcome;
use crate::data::ReferenceData;
use crate::domain::Category;

/// Currency string with two decimals, e.g. `5432.1` → `$5432.10`.
pub fn format_charges(charges: f64) -> String {
    format!("${charges:.2}")
}

/// One-line rendering of a submission outcome.
pub fn format_outcome(outcome: &PredictionOutcome) -> String {
    match outcome {
        PredictionOutcome::Success { charges } => {
            format!("Predicted Insurance Charges: {}", format_charges(*charges))
        }
        PredictionOutcome::Failed { message } => message.clone(),
    }
}

/// Option listing for `charges entities <category>`.
pub fn format_entities(category: Category, data: &ReferenceData) -> String {
    let mut out = String::new();
    out.push_str(&format!("{category} ({}):\n", data.source_name()));
    if data.entities().is_empty() {
        out.push_str("  (no options)\n");
    }
    for entity in data.entities() {
        out.push_str(&format!("  {:<12} {}\n", entity.label, entity.value));
    }
    out
}
