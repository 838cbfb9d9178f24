use crate::engine::PredictionEngine;
use crate::error::{ShadowError, ShadowResult};
use crate::sys;
use log::debug;
use std::ffi::{CStr, CString};
use std::ptr;

/// [`PredictionEngine`] backed by the linked `libshadow`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeEngine;

/// A model handle owned by the native engine.
///
/// Not `Send` or `Sync`: the C API makes no thread-safety promises for a
/// single handle.
pub struct NativeModelHandle {
    handle: sys::ModelHandle,
}

impl Drop for NativeModelHandle {
    fn drop(&mut self) {
        if !self.handle.is_null() {
            unsafe {
                sys::shadow_model_free(self.handle);
            }
        }
    }
}

fn to_c_string(field: &'static str, value: &str) -> ShadowResult<CString> {
    CString::new(value)
        .map_err(|e| ShadowError::invalid(field, format!("contains NUL byte: {}", e)))
}

impl PredictionEngine for NativeEngine {
    type Handle = NativeModelHandle;

    fn load_model(&self, location: &str) -> ShadowResult<NativeModelHandle> {
        let location_c_str = to_c_string("location", location)?;
        let mut handle: sys::ModelHandle = ptr::null_mut();

        ShadowError::check_return_value(unsafe {
            sys::shadow_model_load(location_c_str.as_ptr(), &mut handle)
        })?;

        if handle.is_null() {
            return Err(ShadowError::engine("Engine returned a null model handle"));
        }
        debug!("native model loaded from {}", location);
        Ok(NativeModelHandle { handle })
    }

    fn predict(
        &self,
        handle: &NativeModelHandle,
        input: &str,
        options: &str,
    ) -> ShadowResult<String> {
        let input_c_str = to_c_string("input", input)?;
        let options_c_str = to_c_string("options", options)?;
        let mut out_json: *mut std::os::raw::c_char = ptr::null_mut();

        ShadowError::check_return_value(unsafe {
            sys::shadow_model_predict(
                handle.handle,
                input_c_str.as_ptr(),
                options_c_str.as_ptr(),
                &mut out_json,
            )
        })?;

        if out_json.is_null() {
            return Err(ShadowError::engine("Engine returned a null prediction"));
        }
        let output = unsafe { CStr::from_ptr(out_json) }
            .to_str()
            .map(str::to_owned)
            .map_err(|e| ShadowError::engine(format!("Prediction is not valid UTF-8: {}", e)));
        unsafe {
            sys::shadow_string_free(out_json);
        }
        output
    }
}
