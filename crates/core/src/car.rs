//! Car entity model and DTOs.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::presence::Presence;
use crate::types::DbId;
use crate::validation::{
    FieldError, FieldErrors, FIELD_HORSE_POWERS, FIELD_IS_BROKEN, FIELD_MANUFACTURER, FIELD_MODEL,
};

/// Upper bound, in characters, for `manufacturer` and `model`.
pub const MAX_TEXT_LENGTH: u64 = 64;

/// A stored car. Field order here is the wire order of the encoded form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarRecord {
    pub id: DbId,
    pub manufacturer: String,
    pub model: String,
    pub horse_powers: i64,
    pub is_broken: bool,
    pub problem_description: Option<String>,
}

/// DTO for creating a new car. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCar {
    pub manufacturer: String,
    pub model: String,
    pub horse_powers: i64,
    pub is_broken: bool,
    /// `Absent` means the key was omitted; `Present(None)` is an explicit null.
    pub problem_description: Presence<Option<String>>,
}

impl NewCar {
    /// Materialize the record once the store has picked an id.
    pub fn into_record(self, id: DbId) -> CarRecord {
        CarRecord {
            id,
            manufacturer: self.manufacturer,
            model: self.model,
            horse_powers: self.horse_powers,
            is_broken: self.is_broken,
            problem_description: self.problem_description.flatten(),
        }
    }
}

/// DTO for updating an existing car. All fields are optional.
///
/// Text length limits are declared here; the remaining rules depend on the
/// active [`crate::policy::CarPolicy`] and are checked in
/// [`crate::validation`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct CarPatch {
    #[validate(length(max = 64))]
    pub manufacturer: Option<String>,
    #[validate(length(max = 64))]
    pub model: Option<String>,
    pub horse_powers: Option<i64>,
    pub is_broken: Option<bool>,
    pub problem_description: Presence<Option<String>>,
}

impl CarPatch {
    /// True when no field was supplied.
    pub fn is_empty(&self) -> bool {
        self.manufacturer.is_none()
            && self.model.is_none()
            && self.horse_powers.is_none()
            && self.is_broken.is_none()
            && self.problem_description.is_absent()
    }

    /// Overwrite only the supplied fields of `record`. The id is never touched.
    pub fn apply_to(self, record: CarRecord) -> CarRecord {
        CarRecord {
            id: record.id,
            manufacturer: self.manufacturer.unwrap_or(record.manufacturer),
            model: self.model.unwrap_or(record.model),
            horse_powers: self.horse_powers.unwrap_or(record.horse_powers),
            is_broken: self.is_broken.unwrap_or(record.is_broken),
            problem_description: self.problem_description.or_keep(record.problem_description),
        }
    }

    /// Promote to a [`NewCar`], reporting every required field still missing.
    pub fn into_new_car(self) -> Result<NewCar, FieldErrors> {
        match (self.manufacturer, self.model, self.horse_powers, self.is_broken) {
            (Some(manufacturer), Some(model), Some(horse_powers), Some(is_broken)) => Ok(NewCar {
                manufacturer,
                model,
                horse_powers,
                is_broken,
                problem_description: self.problem_description,
            }),
            (manufacturer, model, horse_powers, is_broken) => {
                let mut errors = FieldErrors::new();
                let missing = [
                    (FIELD_MANUFACTURER, manufacturer.is_none()),
                    (FIELD_MODEL, model.is_none()),
                    (FIELD_HORSE_POWERS, horse_powers.is_none()),
                    (FIELD_IS_BROKEN, is_broken.is_none()),
                ];
                for (field, _) in missing.into_iter().filter(|(_, absent)| *absent) {
                    errors.add(field, FieldError::required());
                }
                Err(errors)
            }
        }
    }
}
