//! Car codec: validation plus JSON encode/decode.
//!
//! The codec holds nothing but its [`CarPolicy`]; every call is independent.
//! Persistence goes through a caller-supplied [`CarStore`].

use serde::Serialize;
use serde_json::{Map, Value};

use crate::car::{CarPatch, CarRecord, NewCar};
use crate::error::{CoreError, DecodeError};
use crate::policy::CarPolicy;
use crate::store::CarStore;
use crate::types::DbId;
use crate::validation::{self, FieldErrors};

#[derive(Debug, Clone, Default)]
pub struct CarCodec {
    policy: CarPolicy,
}

impl CarCodec {
    pub fn new(policy: CarPolicy) -> Self {
        Self { policy }
    }

    /// Validate a full candidate for creation, collecting every violation.
    pub fn validate(&self, candidate: &Map<String, Value>) -> Result<NewCar, FieldErrors> {
        validation::validate_new(&self.policy, candidate)
    }

    /// Validate only the keys present in `candidate`.
    pub fn validate_partial(
        &self,
        candidate: &Map<String, Value>,
    ) -> Result<CarPatch, FieldErrors> {
        validation::validate_patch(&self.policy, candidate)
    }

    /// Hand validated data to the store, which assigns the id.
    pub fn create<S>(&self, store: &S, data: NewCar) -> Result<CarRecord, CoreError>
    where
        S: CarStore + ?Sized,
    {
        Ok(store.insert(data)?)
    }

    /// Apply a partial update to `existing` and persist the result.
    ///
    /// Fields absent from `patch` keep their current values.
    pub fn update<S>(
        &self,
        store: &S,
        existing: CarRecord,
        patch: CarPatch,
    ) -> Result<CarRecord, CoreError>
    where
        S: CarStore + ?Sized,
    {
        Ok(store.save(patch.apply_to(existing))?)
    }

    /// Load the record with `id` from the store and apply `patch` to it.
    pub fn update_by_id<S>(
        &self,
        store: &S,
        id: DbId,
        patch: CarPatch,
    ) -> Result<CarRecord, CoreError>
    where
        S: CarStore + ?Sized,
    {
        let existing = store
            .find_by_id(id)?
            .ok_or(CoreError::NotFound { entity: "Car", id })?;
        self.update(store, existing, patch)
    }

    /// Canonical UTF-8 JSON for a stored record, `id` included.
    ///
    /// A missing description is written as `null` when the policy accepts
    /// null, and left out otherwise, so the output always decodes again.
    pub fn encode(&self, record: &CarRecord) -> Result<Vec<u8>, CoreError> {
        let description = record.problem_description.as_deref();
        let problem_description = if self.policy.description.allow_null {
            Some(description)
        } else {
            description.map(Some)
        };
        let encoded = EncodedCar {
            id: record.id,
            manufacturer: &record.manufacturer,
            model: &record.model,
            horse_powers: record.horse_powers,
            is_broken: record.is_broken,
            problem_description,
        };
        serde_json::to_vec(&encoded).map_err(CoreError::Encode)
    }

    /// Parse, validate and create a record from JSON bytes.
    ///
    /// Malformed bytes fail with [`CoreError::Decode`]; a well-formed object
    /// that breaks field rules fails with [`CoreError::Validation`]. No record
    /// is created on either failure.
    pub fn decode<S>(&self, bytes: &[u8], store: &S) -> Result<CarRecord, CoreError>
    where
        S: CarStore + ?Sized,
    {
        let candidate = parse_object(bytes)?;
        let data = self.validate(&candidate)?;
        self.create(store, data)
    }

    /// Parse and validate a partial update body.
    pub fn decode_patch(&self, bytes: &[u8]) -> Result<CarPatch, CoreError> {
        let candidate = parse_object(bytes)?;
        Ok(self.validate_partial(&candidate)?)
    }
}

/// Wire view of a [`CarRecord`]. The outer `None` drops the description key.
#[derive(Serialize)]
struct EncodedCar<'a> {
    id: DbId,
    manufacturer: &'a str,
    model: &'a str,
    horse_powers: i64,
    is_broken: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    problem_description: Option<Option<&'a str>>,
}

/// Parse `bytes` as a JSON object.
pub fn parse_object(bytes: &[u8]) -> Result<Map<String, Value>, DecodeError> {
    match serde_json::from_slice::<Value>(bytes)? {
        Value::Object(map) => Ok(map),
        other => Err(DecodeError::NotAnObject {
            found: json_kind(&other),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
