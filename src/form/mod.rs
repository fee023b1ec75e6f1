//! Applicant form state.
//!
//! The form holds the six inputs with their bounds and defaults. Categorical
//! choices are stored as indices into the loaded reference lists and resolved
//! to integer codes by exact label match when a request is built.

use crate::data::References;
use crate::domain::{PredictionRequest, ReferenceEntity, Region};
use crate::error::AppError;

pub const AGE_MIN: u32 = 0;
pub const AGE_MAX: u32 = 120;
pub const AGE_DEFAULT: u32 = 30;

pub const BMI_MIN: f64 = 0.0;
pub const BMI_MAX: f64 = 100.0;
pub const BMI_DEFAULT: f64 = 25.0;
pub const BMI_STEP: f64 = 0.1;

pub const CHILDREN_MIN: u32 = 0;
pub const CHILDREN_MAX: u32 = 10;
pub const CHILDREN_DEFAULT: u32 = 0;

/// Rows of the form, in display order. `Submit` is the "Predict" action row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Age,
    Sex,
    Bmi,
    Children,
    Smoker,
    Region,
    Submit,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Age,
        Field::Sex,
        Field::Bmi,
        Field::Children,
        Field::Smoker,
        Field::Region,
        Field::Submit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::Age => "Age",
            Field::Sex => "Sex",
            Field::Bmi => "BMI (Body Mass Index)",
            Field::Children => "Number of Children",
            Field::Smoker => "Smoker",
            Field::Region => "Region",
            Field::Submit => "Predict",
        }
    }

    /// Fields that accept typed input.
    pub fn is_numeric(self) -> bool {
        matches!(self, Field::Age | Field::Bmi | Field::Children)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub age: u32,
    /// Index into the sex options.
    pub sex: usize,
    pub bmi: f64,
    pub children: u32,
    /// Index into the smoker options.
    pub smoker: usize,
    pub region: Region,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            age: AGE_DEFAULT,
            sex: 0,
            bmi: BMI_DEFAULT,
            children: CHILDREN_DEFAULT,
            smoker: 0,
            region: Region::ALL[0],
        }
    }
}

impl FormState {
    /// Build a form from label inputs (used by the one-shot CLI).
    pub fn from_labels(
        age: u32,
        sex_label: &str,
        bmi: f64,
        children: u32,
        smoker_label: &str,
        region: Region,
        refs: &References,
    ) -> Result<Self, AppError> {
        let form = Self {
            age: check_range("Age", age, AGE_MIN, AGE_MAX)?,
            sex: index_of("sex", refs.sex.entities(), sex_label)?,
            bmi: check_bmi(bmi)?,
            children: check_range("Number of children", children, CHILDREN_MIN, CHILDREN_MAX)?,
            smoker: index_of("smoker", refs.smoker.entities(), smoker_label)?,
            region,
        };
        Ok(form)
    }

    /// Step a field by `delta` units: numbers clamp at their bounds, choices wrap.
    pub fn adjust(&mut self, field: Field, delta: i32, refs: &References) {
        match field {
            Field::Age => {
                self.age = step_u32(self.age, delta, AGE_MIN, AGE_MAX);
            }
            Field::Bmi => {
                // Step in whole tenths so repeated presses don't accumulate drift.
                let tenths = (self.bmi / BMI_STEP).round() as i64 + i64::from(delta);
                let max_tenths = (BMI_MAX / BMI_STEP).round() as i64;
                self.bmi = tenths.clamp(0, max_tenths) as f64 / 10.0;
            }
            Field::Children => {
                self.children = step_u32(self.children, delta, CHILDREN_MIN, CHILDREN_MAX);
            }
            Field::Sex => {
                self.sex = cycle(self.sex, delta, refs.sex.entities().len());
            }
            Field::Smoker => {
                self.smoker = cycle(self.smoker, delta, refs.smoker.entities().len());
            }
            Field::Region => {
                self.region = if delta >= 0 {
                    self.region.next()
                } else {
                    self.region.prev()
                };
            }
            Field::Submit => {}
        }
    }

    /// Apply typed input to a numeric field. Out-of-range or unparsable input
    /// is rejected and the previous value is kept.
    pub fn set_numeric(&mut self, field: Field, input: &str) -> Result<(), AppError> {
        let trimmed = input.trim();
        match field {
            Field::Age => {
                let v = parse_u32("Age", trimmed)?;
                self.age = check_range("Age", v, AGE_MIN, AGE_MAX)?;
            }
            Field::Children => {
                let v = parse_u32("Number of children", trimmed)?;
                self.children = check_range("Number of children", v, CHILDREN_MIN, CHILDREN_MAX)?;
            }
            Field::Bmi => {
                let v = trimmed
                    .parse::<f64>()
                    .map_err(|_| AppError::new(2, format!("BMI must be a number (got '{trimmed}').")))?;
                self.bmi = check_bmi(v)?;
            }
            _ => {
                return Err(AppError::new(
                    2,
                    format!("{} does not accept typed input.", field.label()),
                ));
            }
        }
        Ok(())
    }

    pub fn sex_label<'a>(&self, refs: &'a References) -> Option<&'a str> {
        refs.sex.entities().get(self.sex).map(|e| e.label.as_str())
    }

    pub fn smoker_label<'a>(&self, refs: &'a References) -> Option<&'a str> {
        refs.smoker.entities().get(self.smoker).map(|e| e.label.as_str())
    }

    /// Point the sex and smoker choices at the same labels in freshly loaded
    /// reference data. A label the new list no longer has selects the first
    /// option.
    pub fn reselect(&mut self, previous: &References, current: &References) {
        self.sex = relocate(self.sex, previous.sex.entities(), current.sex.entities());
        self.smoker = relocate(
            self.smoker,
            previous.smoker.entities(),
            current.smoker.entities(),
        );
    }

    /// Text shown for a field's current value.
    pub fn display_value(&self, field: Field, refs: &References) -> String {
        match field {
            Field::Age => self.age.to_string(),
            Field::Sex => self.sex_label(refs).unwrap_or("-").to_string(),
            Field::Bmi => format!("{:.1}", self.bmi),
            Field::Children => self.children.to_string(),
            Field::Smoker => self.smoker_label(refs).unwrap_or("-").to_string(),
            Field::Region => self.region.label().to_string(),
            Field::Submit => String::new(),
        }
    }

    /// Build the prediction payload from the current values.
    pub fn build_request(&self, refs: &References) -> Result<PredictionRequest, AppError> {
        let sex_label = self
            .sex_label(refs)
            .ok_or_else(|| AppError::new(4, "No sex options available."))?;
        let smoker_label = self
            .smoker_label(refs)
            .ok_or_else(|| AppError::new(4, "No smoker options available."))?;

        let sex = resolve_code(refs.sex.entities(), sex_label)?;
        let smoker = resolve_code(refs.smoker.entities(), smoker_label)?;

        Ok(PredictionRequest::new(
            self.age,
            sex,
            self.bmi,
            self.children,
            smoker,
            self.region,
        ))
    }
}

/// Resolve a selected label to its integer code by exact match.
///
/// Options are drawn from the same list, so a miss is a logic error.
pub fn resolve_code(entities: &[ReferenceEntity], label: &str) -> Result<i64, AppError> {
    entities
        .iter()
        .find(|e| e.label == label)
        .map(|e| e.value)
        .ok_or_else(|| AppError::new(4, format!("No option matches label '{label}'.")))
}

fn index_of(name: &str, entities: &[ReferenceEntity], label: &str) -> Result<usize, AppError> {
    entities.iter().position(|e| e.label == label).ok_or_else(|| {
        let valid: Vec<&str> = entities.iter().map(|e| e.label.as_str()).collect();
        AppError::new(
            2,
            format!("Invalid {name} '{label}'. Expected one of: {}.", valid.join(", ")),
        )
    })
}

fn relocate(index: usize, previous: &[ReferenceEntity], current: &[ReferenceEntity]) -> usize {
    previous
        .get(index)
        .and_then(|old| current.iter().position(|e| e.label == old.label))
        .unwrap_or(0)
}

fn parse_u32(name: &str, raw: &str) -> Result<u32, AppError> {
    raw.parse::<u32>()
        .map_err(|_| AppError::new(2, format!("{name} must be a whole number (got '{raw}').")))
}

fn check_range(name: &str, value: u32, min: u32, max: u32) -> Result<u32, AppError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(AppError::new(
            2,
            format!("{name} must be between {min} and {max} (got {value})."),
        ))
    }
}

fn check_bmi(value: f64) -> Result<f64, AppError> {
    if value.is_finite() && (BMI_MIN..=BMI_MAX).contains(&value) {
        Ok(value)
    } else {
        Err(AppError::new(
            2,
            format!("BMI must be between {BMI_MIN:.1} and {BMI_MAX:.1} (got {value})."),
        ))
    }
}

fn step_u32(value: u32, delta: i32, min: u32, max: u32) -> u32 {
    let next = i64::from(value) + i64::from(delta);
    next.clamp(i64::from(min), i64::from(max)) as u32
}

fn cycle(index: usize, delta: i32, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let len = len as i64;
    (index as i64 + i64::from(delta)).rem_euclid(len) as usize
}
