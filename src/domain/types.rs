//! Shared domain types.
//!
//! These types are transient and form-scoped: a request is built fresh on each
//! submission and discarded once the outcome has been rendered.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// A selectable option for a categorical input (e.g. sex "Female" → 0).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEntity {
    pub label: String,
    pub value: i64,
}

impl ReferenceEntity {
    pub fn new(label: impl Into<String>, value: i64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Reference-data category served by `/api/entities/{category}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Category {
    Sex,
    Smoker,
    Region,
}

impl Category {
    /// Path segment and JSON key for this category.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Sex => "sex",
            Category::Smoker => "smoker",
            Category::Region => "region",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// US region of the applicant.
///
/// The prediction model encodes region as three one-hot flags; `Northeast` is
/// the baseline and maps to all-zero flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Region {
    Northwest,
    Southeast,
    Southwest,
    Northeast,
}

impl Region {
    /// Display order of the region choice.
    pub const ALL: [Region; 4] = [
        Region::Northwest,
        Region::Southeast,
        Region::Southwest,
        Region::Northeast,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Region::Northwest => "Northwest",
            Region::Southeast => "Southeast",
            Region::Southwest => "Southwest",
            Region::Northeast => "Northeast",
        }
    }

    /// One-hot flags as `(northwest, southeast, southwest)`.
    pub fn flags(self) -> (u8, u8, u8) {
        match self {
            Region::Northwest => (1, 0, 0),
            Region::Southeast => (0, 1, 0),
            Region::Southwest => (0, 0, 1),
            Region::Northeast => (0, 0, 0),
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|r| *r == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|r| *r == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// JSON body of `POST /api/predict`.
///
/// Field order matches the payload the prediction service expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRequest {
    pub age: u32,
    pub sex: i64,
    pub bmi: f64,
    pub children: u32,
    pub smoker: i64,
    pub northwest: u8,
    pub southeast: u8,
    pub southwest: u8,
}

impl PredictionRequest {
    /// Build a request, deriving the region flags from a single `Region` value
    /// so at most one flag can ever be set.
    pub fn new(age: u32, sex: i64, bmi: f64, children: u32, smoker: i64, region: Region) -> Self {
        let (northwest, southeast, southwest) = region.flags();
        Self {
            age,
            sex,
            bmi,
            children,
            smoker,
            northwest,
            southeast,
            southwest,
        }
    }
}

/// JSON body returned by `POST /api/predict` on success.
///
/// The key is optional at the decode layer; callers decide what a missing
/// value means.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PredictionResponse {
    #[serde(default)]
    pub predicted_charges: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_flags_are_mutually_exclusive() {
        for region in Region::ALL {
            let (nw, se, sw) = region.flags();
            assert!(nw + se + sw <= 1, "{region:?} sets more than one flag");
        }
        assert_eq!(Region::Northeast.flags(), (0, 0, 0));
        assert_eq!(Region::Southeast.flags(), (0, 1, 0));
    }

    #[test]
    fn region_cycles_in_display_order() {
        assert_eq!(Region::Northwest.next(), Region::Southeast);
        assert_eq!(Region::Northeast.next(), Region::Northwest);
        assert_eq!(Region::Northwest.prev(), Region::Northeast);
    }

    #[test]
    fn request_serializes_expected_keys() {
        let req = PredictionRequest::new(30, 0, 25.0, 2, 1, Region::Southwest);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "age": 30,
                "sex": 0,
                "bmi": 25.0,
                "children": 2,
                "smoker": 1,
                "northwest": 0,
                "southeast": 0,
                "southwest": 1
            })
        );
    }

    #[test]
    fn response_tolerates_missing_key() {
        let resp: PredictionResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(resp.predicted_charges, None);
        let resp: PredictionResponse =
            serde_json::from_str(r#"{"predicted_charges": 5432.1}"#).unwrap();
        assert_eq!(resp.predicted_charges, Some(5432.1));
    }
}
