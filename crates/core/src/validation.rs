//! Field-level validation of untrusted car objects.
//!
//! Every field is checked and all violations are collected, so callers see
//! the complete error set in one pass. Unknown keys, including `id`, are
//! ignored.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use validator::{Validate, ValidationErrors};

use crate::car::{CarPatch, NewCar, MAX_TEXT_LENGTH};
use crate::policy::CarPolicy;
use crate::presence::Presence;

pub const FIELD_MANUFACTURER: &str = "manufacturer";
pub const FIELD_MODEL: &str = "model";
pub const FIELD_HORSE_POWERS: &str = "horse_powers";
pub const FIELD_IS_BROKEN: &str = "is_broken";
pub const FIELD_PROBLEM_DESCRIPTION: &str = "problem_description";

/// Machine-readable reason for a field violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Required,
    Null,
    Blank,
    Invalid,
    MaxLength,
    MinValue,
    MaxValue,
}

/// A single field-level violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub code: ErrorCode,
    pub message: String,
}

impl FieldError {
    fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub(crate) fn required() -> Self {
        Self::new(ErrorCode::Required, "This field is required.")
    }

    fn null() -> Self {
        Self::new(ErrorCode::Null, "This field may not be null.")
    }

    fn blank() -> Self {
        Self::new(ErrorCode::Blank, "This field may not be blank.")
    }

    fn max_length(max: u64) -> Self {
        Self::new(
            ErrorCode::MaxLength,
            format!("Ensure this field has no more than {max} characters."),
        )
    }

    fn min_value(min: i64) -> Self {
        Self::new(
            ErrorCode::MinValue,
            format!("Ensure this value is greater than or equal to {min}."),
        )
    }

    fn max_value(max: i64) -> Self {
        Self::new(
            ErrorCode::MaxValue,
            format!("Ensure this value is less than or equal to {max}."),
        )
    }
}

/// Field name -> violations, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<FieldError>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, error: FieldError) {
        self.0.entry(field.into()).or_default().push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with at least one violation.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[FieldError]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Fold in violations reported by a `validator` derive.
    fn merge(&mut self, errors: ValidationErrors) {
        for (field, list) in errors.field_errors() {
            for error in list {
                let converted = match &*error.code {
                    "length" => FieldError::max_length(
                        error
                            .params
                            .get("max")
                            .and_then(Value::as_u64)
                            .unwrap_or(MAX_TEXT_LENGTH),
                    ),
                    code => FieldError::new(
                        ErrorCode::Invalid,
                        error
                            .message
                            .as_deref()
                            .map(str::to_owned)
                            .unwrap_or_else(|| format!("Failed rule `{code}`.")),
                    ),
                };
                self.add(field.to_string(), converted);
            }
        }
    }

    fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, errors) in &self.0 {
            for error in errors {
                if !first {
                    f.write_str("; ")?;
                }
                first = false;
                write!(f, "{field}: {}", error.message)?;
            }
        }
        Ok(())
    }
}

/// Whether missing required fields are violations (create) or "no change" (update).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Create,
    Partial,
}

/// Validate a full car object for creation.
pub fn validate_new(policy: &CarPolicy, data: &Map<String, Value>) -> Result<NewCar, FieldErrors> {
    let (patch, errors) = read_fields(policy, data, Mode::Create);
    errors.into_result(patch)?.into_new_car()
}

/// Validate a partial car object; only the keys present are checked.
pub fn validate_patch(
    policy: &CarPolicy,
    data: &Map<String, Value>,
) -> Result<CarPatch, FieldErrors> {
    let (patch, errors) = read_fields(policy, data, Mode::Partial);
    errors.into_result(patch)
}

fn read_fields(
    policy: &CarPolicy,
    data: &Map<String, Value>,
    mode: Mode,
) -> (CarPatch, FieldErrors) {
    let mut reader = FieldReader {
        data,
        policy,
        mode,
        errors: FieldErrors::new(),
    };

    let patch = CarPatch {
        manufacturer: reader.required_text(FIELD_MANUFACTURER),
        model: reader.required_text(FIELD_MODEL),
        horse_powers: reader.horse_powers(),
        is_broken: reader.flag(FIELD_IS_BROKEN),
        problem_description: reader.description(),
    };

    let mut errors = reader.errors;
    if let Err(length_errors) = patch.validate() {
        errors.merge(length_errors);
    }
    (patch, errors)
}

/// Raw state of one key in the input object.
enum Slot<'a> {
    Missing,
    Null,
    Value(&'a Value),
}

struct FieldReader<'a> {
    data: &'a Map<String, Value>,
    policy: &'a CarPolicy,
    mode: Mode,
    errors: FieldErrors,
}

impl<'a> FieldReader<'a> {
    fn slot(&self, field: &str) -> Slot<'a> {
        match self.data.get(field) {
            None => Slot::Missing,
            Some(Value::Null) => Slot::Null,
            Some(value) => Slot::Value(value),
        }
    }

    /// Shared handling of missing/null for non-nullable fields.
    fn non_null(&mut self, field: &'static str) -> Option<&'a Value> {
        match self.slot(field) {
            Slot::Missing => {
                if self.mode == Mode::Create {
                    self.errors.add(field, FieldError::required());
                }
                None
            }
            Slot::Null => {
                self.errors.add(field, FieldError::null());
                None
            }
            Slot::Value(value) => Some(value),
        }
    }

    fn string(&mut self, field: &'static str, value: &Value) -> Option<String> {
        match value.as_str() {
            Some(s) if self.policy.trim_whitespace => Some(s.trim().to_string()),
            Some(s) => Some(s.to_string()),
            None => {
                self.errors
                    .add(field, FieldError::new(ErrorCode::Invalid, "Not a valid string."));
                None
            }
        }
    }

    fn required_text(&mut self, field: &'static str) -> Option<String> {
        let value = self.non_null(field)?;
        let text = self.string(field, value)?;
        if text.is_empty() {
            self.errors.add(field, FieldError::blank());
            return None;
        }
        Some(text)
    }

    fn horse_powers(&mut self) -> Option<i64> {
        let value = self.non_null(FIELD_HORSE_POWERS)?;
        let bounds = self.policy.horse_powers;
        let error = match integer_magnitude(value) {
            Magnitude::Fits(number) if bounds.contains(number) => return Some(number),
            Magnitude::Fits(number) if number < bounds.min() => FieldError::min_value(bounds.min()),
            Magnitude::Fits(_) | Magnitude::TooLarge => FieldError::max_value(bounds.max()),
            Magnitude::TooSmall => FieldError::min_value(bounds.min()),
            Magnitude::NotAnInteger => {
                FieldError::new(ErrorCode::Invalid, "A valid integer is required.")
            }
        };
        self.errors.add(FIELD_HORSE_POWERS, error);
        None
    }

    fn flag(&mut self, field: &'static str) -> Option<bool> {
        let value = self.non_null(field)?;
        match value.as_bool() {
            Some(flag) => Some(flag),
            None => {
                self.errors
                    .add(field, FieldError::new(ErrorCode::Invalid, "Must be a valid boolean."));
                None
            }
        }
    }

    fn description(&mut self) -> Presence<Option<String>> {
        let field = FIELD_PROBLEM_DESCRIPTION;
        match self.slot(field) {
            Slot::Missing => Presence::Absent,
            Slot::Null if self.policy.description.allow_null => Presence::Present(None),
            Slot::Null => {
                self.errors.add(field, FieldError::null());
                Presence::Absent
            }
            Slot::Value(value) => match self.string(field, value) {
                Some(text) if text.is_empty() && !self.policy.description.allow_blank => {
                    self.errors.add(field, FieldError::blank());
                    Presence::Absent
                }
                Some(text) => Presence::Present(Some(text)),
                None => Presence::Absent,
            },
        }
    }
}

/// Where a JSON value sits relative to the `i64` range.
enum Magnitude {
    Fits(i64),
    TooLarge,
    TooSmall,
    NotAnInteger,
}

/// Whole numbers beyond `i64` are out of range, not malformed. Fractions and
/// whole numbers written as floats inside the range stay `NotAnInteger`.
fn integer_magnitude(value: &Value) -> Magnitude {
    if let Some(number) = value.as_i64() {
        return Magnitude::Fits(number);
    }
    if value.is_u64() {
        return Magnitude::TooLarge;
    }
    match value.as_f64() {
        Some(float) if float.fract() == 0.0 && float >= i64::MAX as f64 => Magnitude::TooLarge,
        Some(float) if float.fract() == 0.0 && float < i64::MIN as f64 => Magnitude::TooSmall,
        _ => Magnitude::NotAnInteger,
    }
}
