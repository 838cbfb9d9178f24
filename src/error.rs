use thiserror::Error;

pub type ShadowResult<T> = std::result::Result<T, ShadowError>;

#[derive(Debug, Error)]
pub enum ShadowError {
    /// A caller-supplied option failed validation.
    #[error("invalid argument `{field}`: {reason}")]
    InvalidArgument { field: &'static str, reason: String },

    /// The prediction engine reported a failure.
    #[error("engine error: {description}")]
    Engine { description: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ShadowError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ShadowError::InvalidArgument {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn engine(description: impl Into<String>) -> Self {
        ShadowError::Engine {
            description: description.into(),
        }
    }

    /// Name of the field that failed validation, if this is an `InvalidArgument`.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ShadowError::InvalidArgument { field, .. } => Some(*field),
            _ => None,
        }
    }

    /// Check the return value from a native engine call, and return the last error
    /// message on error.
    /// Return values of 0 are treated as success, non-zero values are treated as errors.
    #[cfg(feature = "native")]
    pub(crate) fn check_return_value(ret_val: i32) -> ShadowResult<()> {
        if ret_val == 0 {
            Ok(())
        } else {
            Err(ShadowError::fetch_engine_error())
        }
    }

    /// Fetch current error message from the native engine.
    #[cfg(feature = "native")]
    fn fetch_engine_error() -> Self {
        let ptr = unsafe { crate::sys::shadow_get_last_error() };
        if ptr.is_null() {
            return ShadowError::engine("Unknown error");
        }
        let c_str = unsafe { std::ffi::CStr::from_ptr(ptr) };
        let str_slice = c_str.to_str().unwrap_or("Unknown error");
        ShadowError::engine(str_slice)
    }
}
