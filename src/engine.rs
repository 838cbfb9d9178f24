use crate::error::ShadowResult;

/// The native side of the boundary: something that can load a model and run
/// predictions on it.
///
/// The engine only ever sees strings. The location has already been validated,
/// and the input and options arrive as JSON produced by this crate. The
/// engine's own request and response schemas stay its business; the returned
/// string must be JSON.
pub trait PredictionEngine {
    /// Loaded model. Freed when dropped.
    type Handle;

    fn load_model(&self, location: &str) -> ShadowResult<Self::Handle>;

    fn predict(&self, handle: &Self::Handle, input: &str, options: &str) -> ShadowResult<String>;
}

impl<E: PredictionEngine + ?Sized> PredictionEngine for &E {
    type Handle = E::Handle;

    fn load_model(&self, location: &str) -> ShadowResult<Self::Handle> {
        (**self).load_model(location)
    }

    fn predict(&self, handle: &Self::Handle, input: &str, options: &str) -> ShadowResult<String> {
        (**self).predict(handle, input, options)
    }
}
