// Raw C ABI of the native engine
#[cfg(feature = "native")]
mod sys;

mod error;
pub use crate::error::{ShadowError, ShadowResult};

mod options;
pub use crate::options::{
    make_load_options, make_prediction_options, LoadOptions, LocationKind, PredictionOptions,
    PredictionOptionsBuilder, MODEL_LOCATION_ENV,
};

mod payload;
pub use crate::payload::{serialize, serialize_versioned, Payload, PayloadVersion};

mod record;
pub use crate::record::{validate_record, InputValue, Record};

mod engine;
pub use crate::engine::PredictionEngine;

mod model;
pub use crate::model::{Model, PredictionOutput};

#[cfg(feature = "native")]
mod native;
#[cfg(feature = "native")]
pub use crate::native::{NativeEngine, NativeModelHandle};
