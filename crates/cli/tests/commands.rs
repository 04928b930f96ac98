//! Integration tests for the `car-codec` command implementations.
//!
//! Commands are invoked as library functions so no process is spawned.

use assert_matches::assert_matches;
use garage_cli::commands::{decode, update, validate, Outcome};
use garage_core::codec::CarCodec;
use garage_core::policy::CarPolicy;
use serde_json::{json, Value};

fn body(value: Value) -> Vec<u8> {
    serde_json::to_vec(&value).unwrap()
}

fn corolla() -> Value {
    json!({
        "manufacturer": "Toyota",
        "model": "Corolla",
        "horse_powers": 132,
        "is_broken": false
    })
}

fn parse(payload: &str) -> Value {
    serde_json::from_str(payload).unwrap()
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

#[test]
fn validate_accepts_valid_object() {
    let outcome = validate(&CarCodec::default(), &body(corolla()), false).unwrap();
    assert_eq!(outcome, Outcome::Accepted("ok".to_string()));
}

#[test]
fn validate_reports_field_errors_as_json() {
    let outcome = validate(&CarCodec::new(CarPolicy::strict()), &body(corolla()), false).unwrap();
    let Outcome::Rejected(payload) = outcome else {
        panic!("expected rejection");
    };
    let errors = parse(&payload);
    assert_eq!(errors["horse_powers"][0]["code"], "max_value");
    assert_eq!(errors.as_object().unwrap().len(), 1);
}

#[test]
fn validate_partial_skips_missing_fields() {
    let outcome = validate(&CarCodec::default(), &body(json!({"is_broken": true})), true).unwrap();
    assert_eq!(outcome, Outcome::Accepted("ok".to_string()));

    let outcome = validate(&CarCodec::default(), &body(json!({"is_broken": true})), false).unwrap();
    assert_matches!(outcome, Outcome::Rejected(_));
}

#[test]
fn validate_fails_on_malformed_json() {
    assert!(validate(&CarCodec::default(), b"not json", false).is_err());
    assert!(validate(&CarCodec::default(), b"\"a string\"", false).is_err());
}

// ---------------------------------------------------------------------------
// decode / update
// ---------------------------------------------------------------------------

#[test]
fn decode_prints_canonical_record() {
    let outcome = decode(&CarCodec::default(), &body(corolla())).unwrap();
    let Outcome::Accepted(payload) = outcome else {
        panic!("expected acceptance");
    };
    assert_eq!(
        payload,
        r#"{"id":1,"manufacturer":"Toyota","model":"Corolla","horse_powers":132,"is_broken":false,"problem_description":null}"#
    );
}

#[test]
fn update_changes_only_supplied_fields() {
    let record = body(json!({
        "id": 12,
        "manufacturer": "Toyota",
        "model": "Corolla",
        "horse_powers": 132,
        "is_broken": false,
        "problem_description": "noisy"
    }));
    let outcome = update(&CarCodec::default(), &record, &body(json!({"is_broken": true}))).unwrap();
    let Outcome::Accepted(payload) = outcome else {
        panic!("expected acceptance");
    };
    assert_eq!(
        parse(&payload),
        json!({
            "id": 12,
            "manufacturer": "Toyota",
            "model": "Corolla",
            "horse_powers": 132,
            "is_broken": true,
            "problem_description": "noisy"
        })
    );
}

#[test]
fn update_rejects_invalid_patch() {
    let record = body(json!({
        "id": 3,
        "manufacturer": "Toyota",
        "model": "Corolla",
        "horse_powers": 132,
        "is_broken": false,
        "problem_description": null
    }));
    let outcome = update(&CarCodec::default(), &record, &body(json!({"model": ""}))).unwrap();
    let Outcome::Rejected(payload) = outcome else {
        panic!("expected rejection");
    };
    assert_eq!(parse(&payload)["model"][0]["code"], "blank");
}

#[test]
fn update_refuses_out_of_range_ids() {
    for id in [i64::MAX, 0, -1] {
        let record = body(json!({
            "id": id,
            "manufacturer": "Toyota",
            "model": "Corolla",
            "horse_powers": 132,
            "is_broken": false,
            "problem_description": null
        }));
        let result = update(&CarCodec::default(), &record, &body(json!({"is_broken": true})));
        assert!(result.is_err(), "id {id} was accepted");
    }
}

#[test]
fn update_accepts_record_encoded_without_description() {
    let mut policy = CarPolicy::permissive();
    policy.description.allow_null = false;
    let codec = CarCodec::new(policy);

    let Outcome::Accepted(stored) = decode(&codec, &body(corolla())).unwrap() else {
        panic!("expected acceptance");
    };
    assert!(parse(&stored).get("problem_description").is_none());

    let outcome = update(&codec, stored.as_bytes(), &body(json!({"is_broken": true}))).unwrap();
    let Outcome::Accepted(payload) = outcome else {
        panic!("expected acceptance");
    };
    assert_eq!(parse(&payload)["is_broken"], true);
    assert!(parse(&payload).get("problem_description").is_none());
}

#[test]
fn update_requires_a_stored_record() {
    let not_a_record = body(corolla());
    assert!(update(&CarCodec::default(), &not_a_record, &body(json!({}))).is_err());
}
