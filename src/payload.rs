//! The options payload handed to the engine's predict call.
//!
//! Version 1 of the contract is a JSON object with exactly two keys:
//!
//! ```text
//! { "threshold": <number|null>, "compute_feature_contributions": <bool> }
//! ```

use crate::options::PredictionOptions;
use log::debug;
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadVersion {
    V1,
}

impl PayloadVersion {
    pub const CURRENT: PayloadVersion = PayloadVersion::V1;
}

/// Serialized [`PredictionOptions`]. Both keys are always present.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Payload {
    threshold: Option<f32>,
    compute_feature_contributions: bool,
}

impl Payload {
    pub fn threshold(&self) -> Option<f32> {
        self.threshold
    }

    pub fn compute_feature_contributions(&self) -> bool {
        self.compute_feature_contributions
    }

    /// Render the payload as compact JSON, `threshold` first.
    pub fn to_json(&self) -> String {
        // Only a finite-or-absent f32 and a bool: serde_json cannot fail here.
        let json = serde_json::to_string(self).expect("options payload is always serializable");
        debug!("options payload: {}", json);
        json
    }

    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(
            "threshold".to_owned(),
            self.threshold
                .map(|t| Value::from(shortest_f64(t)))
                .unwrap_or(Value::Null),
        );
        map.insert(
            "compute_feature_contributions".to_owned(),
            Value::Bool(self.compute_feature_contributions),
        );
        map
    }
}

/// Widen through the f32's shortest decimal form, so the map holds `0.1` rather
/// than `0.10000000149011612`, matching what `to_json` writes.
fn shortest_f64(value: f32) -> f64 {
    value.to_string().parse().unwrap_or(value as f64)
}

impl From<PredictionOptions> for Payload {
    fn from(options: PredictionOptions) -> Self {
        serialize(&options)
    }
}

/// Serialize options with the current payload version.
pub fn serialize(options: &PredictionOptions) -> Payload {
    serialize_versioned(options, PayloadVersion::CURRENT)
}

pub fn serialize_versioned(options: &PredictionOptions, version: PayloadVersion) -> Payload {
    match version {
        PayloadVersion::V1 => Payload {
            threshold: options.threshold(),
            compute_feature_contributions: options.compute_feature_contributions(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::make_prediction_options;
    use serde_json::json;

    #[test]
    fn threshold_and_contributions() {
        let options = make_prediction_options(true, Some(0.75)).unwrap();
        assert_eq!(
            serialize(&options).to_json(),
            r#"{"threshold":0.75,"compute_feature_contributions":true}"#
        );
    }

    #[test]
    fn absent_threshold_is_null() {
        let options = make_prediction_options(false, None).unwrap();
        assert_eq!(
            serialize(&options).to_json(),
            r#"{"threshold":null,"compute_feature_contributions":false}"#
        );
    }

    #[test]
    fn f32_threshold_keeps_its_short_form() {
        let options = make_prediction_options(false, Some(0.1)).unwrap();
        assert_eq!(
            serialize(&options).to_json(),
            r#"{"threshold":0.1,"compute_feature_contributions":false}"#
        );
    }

    #[test]
    fn map_has_exactly_two_keys() {
        let cases = [(true, Some(0.25f32)), (false, None), (true, Some(-3.0))];
        for (compute, threshold) in cases {
            let options = make_prediction_options(compute, threshold).unwrap();
            let map = serialize(&options).to_map();
            assert_eq!(map.len(), 2);
            assert_eq!(map["compute_feature_contributions"], Value::Bool(compute));
            match threshold {
                Some(t) => {
                    let expected: f64 = t.to_string().parse().unwrap();
                    assert_eq!(map["threshold"], json!(expected));
                }
                None => assert!(map["threshold"].is_null()),
            }
        }
    }

    #[test]
    fn map_and_json_hold_the_same_threshold() {
        for threshold in [0.1f32, 0.3, 0.75, -12.5, 1e30, 3.4028235e38] {
            let options = make_prediction_options(false, Some(threshold)).unwrap();
            let payload = serialize(&options);
            let map = payload.to_map();
            let expected: f64 = threshold.to_string().parse().unwrap();
            assert_eq!(map["threshold"], json!(expected));

            let parsed: Value = serde_json::from_str(&payload.to_json()).unwrap();
            assert_eq!(parsed, Value::Object(map), "threshold {}", threshold);
        }

        let map = serialize(&make_prediction_options(false, Some(0.1)).unwrap()).to_map();
        assert_eq!(map["threshold"], json!(0.1));
    }

    #[test]
    fn serializing_twice_is_identical() {
        let options = make_prediction_options(true, Some(0.5)).unwrap();
        assert_eq!(serialize(&options).to_json(), serialize(&options).to_json());
        assert_eq!(serialize(&options).to_map(), serialize(&options).to_map());
    }

    #[test]
    fn options_serialize_through_serde_as_payload() {
        let options = make_prediction_options(true, None).unwrap();
        assert_eq!(
            serde_json::to_string(&options).unwrap(),
            serialize(&options).to_json()
        );
    }

    #[test]
    fn payload_parses_back_into_options() {
        let options = make_prediction_options(true, Some(0.625)).unwrap();
        let parsed = PredictionOptions::from_json_str(&serialize(&options).to_json()).unwrap();
        assert_eq!(parsed, options);
    }
}
