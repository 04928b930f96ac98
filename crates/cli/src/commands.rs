//! Implementations behind each `car-codec` subcommand.
//!
//! Commands return an [`Outcome`] instead of printing so that the binary
//! decides on output streams and exit codes.

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use garage_core::car::CarRecord;
use garage_core::codec::{parse_object, CarCodec};
use garage_core::error::CoreError;
use garage_core::validation::FieldErrors;
use garage_store::InMemoryCarRepo;

/// Result of a command that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Input accepted; the payload goes to stdout.
    Accepted(String),
    /// Input rejected by field validation; the payload is the error map as JSON.
    Rejected(String),
}

/// Read a whole file, or stdin when `path` is `-`.
pub fn read_input(path: &Path) -> anyhow::Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("Failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Check a body against the field rules without storing anything.
pub fn validate(codec: &CarCodec, body: &[u8], partial: bool) -> anyhow::Result<Outcome> {
    let candidate = parse_object(body).context("Input is not a car object")?;
    let result = if partial {
        codec.validate_partial(&candidate).map(|_| ())
    } else {
        codec.validate(&candidate).map(|_| ())
    };
    match result {
        Ok(()) => Ok(Outcome::Accepted("ok".to_string())),
        Err(errors) => rejected(&errors),
    }
}

/// Decode a body into a fresh store and print the canonical encoding.
pub fn decode(codec: &CarCodec, body: &[u8]) -> anyhow::Result<Outcome> {
    let repo = InMemoryCarRepo::new();
    match codec.decode(body, &repo) {
        Ok(record) => {
            tracing::info!(id = record.id, "Decoded car");
            encoded(codec, &record)
        }
        Err(CoreError::Validation(errors)) => rejected(&errors),
        Err(err) => Err(err).context("Failed to decode car"),
    }
}

/// Apply a partial update body to a previously encoded record.
pub fn update(codec: &CarCodec, record: &[u8], patch: &[u8]) -> anyhow::Result<Outcome> {
    let existing: CarRecord =
        serde_json::from_slice(record).context("Stored record is not a valid encoded car")?;
    let id = existing.id;

    let repo = InMemoryCarRepo::new();
    repo.load(existing)
        .with_context(|| format!("Stored record with id {id} cannot be loaded"))?;

    let patch = match codec.decode_patch(patch) {
        Ok(patch) => patch,
        Err(CoreError::Validation(errors)) => return rejected(&errors),
        Err(err) => return Err(err).context("Failed to decode update"),
    };
    if patch.is_empty() {
        tracing::info!(id, "Update carries no fields; record unchanged");
    }

    let updated = codec.update_by_id(&repo, id, patch)?;
    tracing::info!(id, "Updated car");
    encoded(codec, &updated)
}

fn encoded(codec: &CarCodec, record: &CarRecord) -> anyhow::Result<Outcome> {
    let bytes = codec.encode(record)?;
    Ok(Outcome::Accepted(String::from_utf8(bytes)?))
}

fn rejected(errors: &FieldErrors) -> anyhow::Result<Outcome> {
    tracing::info!(fields = errors.len(), "Input rejected");
    Ok(Outcome::Rejected(serde_json::to_string(errors)?))
}
