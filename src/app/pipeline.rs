//! Shared "submit" logic used by both CLI and TUI front-ends.
//!
//! Form values -> `PredictionRequest` -> one POST -> `PredictionOutcome`.
//! The front-ends only decide how to present the outcome.

use tracing::{error, info};

use crate::api::{ApiClient, ApiError};
use crate::data::References;
use crate::form::FormState;

/// Shown for any non-200 reply; client and server errors are not told apart.
pub const GENERIC_RESPONSE_ERROR: &str = "Error: Unable to parse JSON response.";

/// Result of one submission.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionOutcome {
    Success { charges: f64 },
    Failed { message: String },
}

impl PredictionOutcome {
    pub fn charges(&self) -> Option<f64> {
        match self {
            PredictionOutcome::Success { charges } => Some(*charges),
            PredictionOutcome::Failed { .. } => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PredictionOutcome::Success { .. })
    }
}

/// Build the request from the form and send exactly one prediction POST.
///
/// Every failure is folded into `Failed`; nothing is retried.
pub fn submit(client: &ApiClient, form: &FormState, refs: &References) -> PredictionOutcome {
    let request = match form.build_request(refs) {
        Ok(request) => request,
        Err(err) => {
            error!(error = %err, "could not build prediction request");
            return PredictionOutcome::Failed {
                message: format!("Error: {err}"),
            };
        }
    };

    info!(url = %client.predict_url(), ?request, "submitting prediction request");

    match client.predict(&request) {
        Ok(charges) => {
            info!(charges, "prediction received");
            PredictionOutcome::Success { charges }
        }
        Err(err) => {
            error!(error = %err, "prediction failed");
            PredictionOutcome::Failed {
                message: failure_message(&err),
            }
        }
    }
}

fn failure_message(err: &ApiError) -> String {
    match err {
        ApiError::Status(_) | ApiError::Decode(_) => GENERIC_RESPONSE_ERROR.to_string(),
        ApiError::MissingField(key) => format!("Error: Response did not include {key}."),
        ApiError::Transport(msg) => format!("Error: {msg}"),
    }
}
