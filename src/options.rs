use crate::error::{ShadowError, ShadowResult};
use crate::payload::Payload;
use log::debug;
use serde::{Deserialize, Serialize};

/// Environment variable read by [`LoadOptions::from_env`].
pub const MODEL_LOCATION_ENV: &str = "SHADOW_MODEL_LOCATION";

/// How a model location was classified during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationKind {
    /// `scheme://...`
    Url,
    /// Anything else, handed to the engine as a filesystem path.
    Path,
}

/// Options for loading a model.
///
/// Construct with [`make_load_options`] or [`LoadOptions::new`]. The location is
/// validated once and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawLoadOptions")]
pub struct LoadOptions {
    location: String,
    #[serde(skip_serializing)]
    kind: LocationKind,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawLoadOptions {
    location: String,
}

impl TryFrom<RawLoadOptions> for LoadOptions {
    type Error = ShadowError;

    fn try_from(raw: RawLoadOptions) -> ShadowResult<Self> {
        LoadOptions::new(raw.location)
    }
}

impl LoadOptions {
    pub fn new(location: impl Into<String>) -> ShadowResult<Self> {
        let location = location.into();
        let kind = validate_location(&location)?;
        debug!("load options: location={} kind={:?}", location, kind);
        Ok(LoadOptions { location, kind })
    }

    /// Read the model location from `SHADOW_MODEL_LOCATION`.
    pub fn from_env() -> ShadowResult<Self> {
        Self::from_env_var(MODEL_LOCATION_ENV)
    }

    fn from_env_var(name: &str) -> ShadowResult<Self> {
        match std::env::var(name) {
            Ok(location) => Self::new(location),
            Err(std::env::VarError::NotPresent) => Err(ShadowError::invalid(
                "location",
                format!("{} is not set", name),
            )),
            Err(std::env::VarError::NotUnicode(_)) => Err(ShadowError::invalid(
                "location",
                format!("{} is not valid unicode", name),
            )),
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn kind(&self) -> LocationKind {
        self.kind
    }
}

/// Build [`LoadOptions`], failing with `InvalidArgument` on an empty or malformed location.
pub fn make_load_options(location: impl Into<String>) -> ShadowResult<LoadOptions> {
    LoadOptions::new(location)
}

fn validate_location(location: &str) -> ShadowResult<LocationKind> {
    if location.is_empty() {
        return Err(ShadowError::invalid("location", "must not be empty"));
    }
    if location.trim().is_empty() {
        return Err(ShadowError::invalid("location", "must not be blank"));
    }
    if location.trim() != location {
        return Err(ShadowError::invalid(
            "location",
            "must not have leading or trailing whitespace",
        ));
    }
    if let Some(c) = location.chars().find(|c| c.is_control()) {
        return Err(ShadowError::invalid(
            "location",
            format!("contains control character {:?}", c),
        ));
    }

    let Some((scheme, rest)) = location.split_once("://") else {
        return Ok(LocationKind::Path);
    };
    let mut chars = scheme.chars();
    let valid_scheme = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !valid_scheme {
        return Err(ShadowError::invalid(
            "location",
            format!("invalid url scheme {:?}", scheme),
        ));
    }
    if rest.is_empty() {
        return Err(ShadowError::invalid(
            "location",
            format!("url {:?} has nothing after the scheme", location),
        ));
    }
    Ok(LocationKind::Url)
}

/// Options for a single prediction request.
///
/// `compute_feature_contributions` has no default. The builder and the
/// deserializer both reject input that leaves it out.
///
/// Only [`PredictionOptions::builder`] and [`PredictionOptions::from_json_str`]
/// return [`ShadowError::InvalidArgument`]. Deserializing through serde directly
/// (`serde_json::from_str::<PredictionOptions>`, `toml`, ...) reports the same
/// message as that format's own data error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPredictionOptions", into = "Payload")]
pub struct PredictionOptions {
    threshold: Option<f32>,
    compute_feature_contributions: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPredictionOptions {
    #[serde(default)]
    threshold: Option<f32>,
    #[serde(default)]
    compute_feature_contributions: Option<bool>,
}

impl TryFrom<RawPredictionOptions> for PredictionOptions {
    type Error = ShadowError;

    fn try_from(raw: RawPredictionOptions) -> ShadowResult<Self> {
        let mut builder = PredictionOptions::builder();
        if let Some(flag) = raw.compute_feature_contributions {
            builder = builder.compute_feature_contributions(flag);
        }
        if let Some(threshold) = raw.threshold {
            builder = builder.threshold(threshold);
        }
        builder.build()
    }
}

impl PredictionOptions {
    pub fn new(compute_feature_contributions: bool, threshold: Option<f32>) -> ShadowResult<Self> {
        if let Some(t) = threshold {
            if !t.is_finite() {
                return Err(ShadowError::invalid(
                    "threshold",
                    format!("must be finite, got {}", t),
                ));
            }
        }
        debug!(
            "prediction options: threshold={:?} compute_feature_contributions={}",
            threshold, compute_feature_contributions
        );
        Ok(PredictionOptions {
            threshold,
            compute_feature_contributions,
        })
    }

    pub fn builder() -> PredictionOptionsBuilder {
        PredictionOptionsBuilder::default()
    }

    /// Parse options from a JSON object such as
    /// `{"threshold": 0.5, "compute_feature_contributions": true}`.
    ///
    /// Malformed JSON is reported as [`ShadowError::Json`]; a missing flag or a
    /// non-finite threshold as [`ShadowError::InvalidArgument`].
    pub fn from_json_str(s: &str) -> ShadowResult<Self> {
        let raw: RawPredictionOptions = serde_json::from_str(s)?;
        PredictionOptions::try_from(raw)
    }

    pub fn threshold(&self) -> Option<f32> {
        self.threshold
    }

    pub fn compute_feature_contributions(&self) -> bool {
        self.compute_feature_contributions
    }
}

/// Build [`PredictionOptions`], failing with `InvalidArgument` on a non-finite threshold.
pub fn make_prediction_options(
    compute_feature_contributions: bool,
    threshold: Option<f32>,
) -> ShadowResult<PredictionOptions> {
    PredictionOptions::new(compute_feature_contributions, threshold)
}

#[derive(Debug, Clone, Default)]
pub struct PredictionOptionsBuilder {
    threshold: Option<f32>,
    compute_feature_contributions: Option<bool>,
}

impl PredictionOptionsBuilder {
    pub fn threshold(mut self, threshold: f32) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn compute_feature_contributions(mut self, compute: bool) -> Self {
        self.compute_feature_contributions = Some(compute);
        self
    }

    pub fn build(self) -> ShadowResult<PredictionOptions> {
        let compute = self.compute_feature_contributions.ok_or_else(|| {
            ShadowError::invalid("compute_feature_contributions", "is required")
        })?;
        PredictionOptions::new(compute, self.threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_options_keep_url_location() {
        let options = make_load_options("https://example.com/model.bin").unwrap();
        assert_eq!(options.location(), "https://example.com/model.bin");
        assert_eq!(options.kind(), LocationKind::Url);
    }

    #[test]
    fn load_options_accept_paths() {
        let options = LoadOptions::new("models/heart_disease.shadow").unwrap();
        assert_eq!(options.kind(), LocationKind::Path);
        let options = LoadOptions::new("C:\\models\\m.shadow").unwrap();
        assert_eq!(options.kind(), LocationKind::Path);
    }

    #[test]
    fn empty_location_is_rejected() {
        let err = make_load_options("").unwrap_err();
        assert!(matches!(
            err,
            ShadowError::InvalidArgument { field: "location", .. }
        ));
    }

    #[test]
    fn malformed_locations_are_rejected() {
        for location in [
            "   ",
            " model.bin",
            "model.bin\n",
            "model\0.bin",
            "://example.com/model.bin",
            "1http://example.com",
            "ht tp://example.com",
            "https://",
        ] {
            let err = LoadOptions::new(location).unwrap_err();
            assert_eq!(err.field(), Some("location"), "{:?}", location);
        }
    }

    #[test]
    fn load_options_from_json() {
        let options: LoadOptions =
            serde_json::from_str(r#"{"location": "s3://bucket/model.bin"}"#).unwrap();
        assert_eq!(options.location(), "s3://bucket/model.bin");
        assert_eq!(options.kind(), LocationKind::Url);

        assert!(serde_json::from_str::<LoadOptions>(r#"{"location": ""}"#).is_err());
    }

    #[test]
    fn load_options_from_env_var() {
        let name = "SHADOW_TEST_MODEL_LOCATION_OPTIONS_RS";
        std::env::remove_var(name);
        let err = LoadOptions::from_env_var(name).unwrap_err();
        assert_eq!(err.field(), Some("location"));

        std::env::set_var(name, "/var/lib/shadow/model.bin");
        let options = LoadOptions::from_env_var(name).unwrap();
        assert_eq!(options.location(), "/var/lib/shadow/model.bin");
        std::env::remove_var(name);
    }

    #[test]
    fn prediction_options_expose_values() {
        let options = make_prediction_options(true, Some(0.75)).unwrap();
        assert_eq!(options.threshold(), Some(0.75));
        assert!(options.compute_feature_contributions());

        let options = make_prediction_options(false, None).unwrap();
        assert_eq!(options.threshold(), None);
        assert!(!options.compute_feature_contributions());
    }

    #[test]
    fn threshold_range_is_not_constrained() {
        assert!(make_prediction_options(false, Some(-12.5)).is_ok());
        assert!(make_prediction_options(false, Some(1e30)).is_ok());
    }

    #[test]
    fn non_finite_threshold_is_rejected() {
        for t in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            let err = make_prediction_options(true, Some(t)).unwrap_err();
            assert_eq!(err.field(), Some("threshold"));
        }
    }

    #[test]
    fn builder_requires_compute_feature_contributions() {
        let err = PredictionOptions::builder().threshold(0.5).build().unwrap_err();
        assert_eq!(err.field(), Some("compute_feature_contributions"));

        let options = PredictionOptions::builder()
            .threshold(0.5)
            .compute_feature_contributions(true)
            .build()
            .unwrap();
        assert_eq!(options, make_prediction_options(true, Some(0.5)).unwrap());
    }

    #[test]
    fn from_json_str_requires_compute_feature_contributions() {
        let err = PredictionOptions::from_json_str(r#"{"threshold": 0.5}"#).unwrap_err();
        assert_eq!(err.field(), Some("compute_feature_contributions"));

        let err = PredictionOptions::from_json_str("{}").unwrap_err();
        assert_eq!(err.field(), Some("compute_feature_contributions"));
    }

    #[test]
    fn from_json_str_accepts_null_threshold() {
        let options = PredictionOptions::from_json_str(
            r#"{"threshold": null, "compute_feature_contributions": false}"#,
        )
        .unwrap();
        assert_eq!(options, make_prediction_options(false, None).unwrap());
    }

    #[test]
    fn from_json_str_rejects_overflowing_threshold() {
        let err = PredictionOptions::from_json_str(
            r#"{"threshold": 1e40, "compute_feature_contributions": true}"#,
        )
        .unwrap_err();
        assert_eq!(err.field(), Some("threshold"));
    }

    #[test]
    fn serde_path_reports_validation_as_data_error() {
        let err = serde_json::from_str::<PredictionOptions>(r#"{"threshold": 0.5}"#).unwrap_err();
        assert_eq!(err.classify(), serde_json::error::Category::Data);
        assert!(err
            .to_string()
            .contains("invalid argument `compute_feature_contributions`"));

        let options: PredictionOptions =
            serde_json::from_str(r#"{"compute_feature_contributions": true}"#).unwrap();
        assert_eq!(options, make_prediction_options(true, None).unwrap());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = PredictionOptions::from_json_str(
            r#"{"compute_feature_contributions": true, "extra": 1}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ShadowError::Json(_)));
        assert!(err.to_string().contains("unknown field `extra`"));

        assert!(serde_json::from_str::<LoadOptions>(
            r#"{"location": "model.bin", "shadow_url": "model.bin"}"#
        )
        .is_err());
    }

    #[test]
    fn from_json_str_reports_malformed_json() {
        let err = PredictionOptions::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, ShadowError::Json(_)));
    }
}
