use crate::engine::PredictionEngine;
use crate::error::{ShadowError, ShadowResult};
use crate::options::{LoadOptions, PredictionOptions};
use crate::payload::serialize;
use crate::record::{validate_record, Record};
use log::{debug, warn};

/// The engine's response to one prediction, parsed but otherwise untouched.
pub type PredictionOutput = serde_json::Value;

/// A model loaded into a prediction engine.
///
/// # Thread Safety
///
/// Whether a `Model` may be shared across threads depends on the engine's
/// handle type. The native handle is neither `Send` nor `Sync`; for
/// multi-threaded use either load one model per thread, or wrap it in
/// `Arc<Mutex<Model<_>>>`.
pub struct Model<E: PredictionEngine> {
    engine: E,
    handle: E::Handle,
    location: String,
}

impl<E: PredictionEngine> Model<E> {
    /// Load the model found at `options.location()`.
    ///
    /// # Example
    /// ```
    /// # use shadow_rust::{make_load_options, Model, PredictionEngine, ShadowResult};
    /// struct Echo;
    /// impl PredictionEngine for Echo {
    ///     type Handle = ();
    ///     fn load_model(&self, _location: &str) -> ShadowResult<()> { Ok(()) }
    ///     fn predict(&self, _: &(), _input: &str, options: &str) -> ShadowResult<String> {
    ///         Ok(options.to_owned())
    ///     }
    /// }
    ///
    /// let options = make_load_options("https://example.com/model.bin").unwrap();
    /// let model = Model::load(Echo, &options).unwrap();
    /// assert_eq!(model.location(), "https://example.com/model.bin");
    /// ```
    pub fn load(engine: E, options: &LoadOptions) -> ShadowResult<Self> {
        debug!("loading model from {}", options.location());
        let handle = engine.load_model(options.location()).map_err(|e| {
            warn!("failed to load model from {}: {}", options.location(), e);
            e
        })?;
        Ok(Model {
            engine,
            handle,
            location: options.location().to_owned(),
        })
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Predict for a single record.
    ///
    /// Fails with `InvalidArgument` on a NaN or infinite column value before
    /// anything reaches the engine.
    pub fn predict(
        &self,
        input: &Record,
        options: &PredictionOptions,
    ) -> ShadowResult<PredictionOutput> {
        validate_record(input)?;
        let input_json = serde_json::to_string(input)?;
        let options_json = serialize(options).to_json();
        self.call_engine(&input_json, &options_json)
    }

    /// Predict for several records with the same options.
    pub fn predict_batch(
        &self,
        inputs: &[Record],
        options: &PredictionOptions,
    ) -> ShadowResult<Vec<PredictionOutput>> {
        let options_json = serialize(options).to_json();
        inputs
            .iter()
            .map(|input| {
                validate_record(input)?;
                let input_json = serde_json::to_string(input)?;
                self.call_engine(&input_json, &options_json)
            })
            .collect()
    }

    fn call_engine(&self, input_json: &str, options_json: &str) -> ShadowResult<PredictionOutput> {
        debug!("predict on {}: options={}", self.location, options_json);
        let response = self
            .engine
            .predict(&self.handle, input_json, options_json)
            .map_err(|e| {
                warn!("prediction on {} failed: {}", self.location, e);
                e
            })?;
        serde_json::from_str(&response).map_err(|e| {
            ShadowError::engine(format!("Engine returned invalid JSON: {}", e))
        })
    }
}
