//! Raw declarations for the Shadow engine's C ABI.
//!
//! Every fallible call returns 0 on success; on failure the message is
//! available from `shadow_get_last_error` until the next call on the same thread.

use std::os::raw::{c_char, c_int};

#[repr(C)]
pub struct ShadowModel {
    _private: [u8; 0],
}

pub type ModelHandle = *mut ShadowModel;

#[link(name = "shadow")]
extern "C" {
    pub fn shadow_get_last_error() -> *const c_char;

    pub fn shadow_model_load(location: *const c_char, out_model: *mut ModelHandle) -> c_int;

    /// `out_json` is allocated by the engine and released with `shadow_string_free`.
    pub fn shadow_model_predict(
        model: ModelHandle,
        input_json: *const c_char,
        options_json: *const c_char,
        out_json: *mut *mut c_char,
    ) -> c_int;

    pub fn shadow_string_free(s: *mut c_char);

    pub fn shadow_model_free(model: ModelHandle);
}
