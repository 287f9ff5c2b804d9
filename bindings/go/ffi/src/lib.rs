//! C-FFI layer for ecsdef — used by Go (cgo) and other FFI consumers.
//!
//! ZERO logic here. All calls delegate to `ecsdef-core`.
//!
//! # Memory Contract
//!
//! All functions that return `*mut c_char` allocate via `CString`.
//! The caller MUST free the returned string by calling `ecsdef_free_string()`.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

/// Result from an ecsdef FFI call.
/// If `error` is null, the call succeeded and `result` contains the output.
/// If `error` is non-null, the call failed and `error` contains the error message.
/// The caller MUST free both `result` and `error` with `ecsdef_free_string()`.
#[repr(C)]
pub struct EcsdefResult {
    pub result: *mut c_char,
    pub error: *mut c_char,
}

impl EcsdefResult {
    fn ok(value: String) -> Self {
        EcsdefResult {
            result: into_c_string(value),
            error: std::ptr::null_mut(),
        }
    }

    fn err(msg: String) -> Self {
        EcsdefResult {
            result: std::ptr::null_mut(),
            error: into_c_string(msg),
        }
    }
}

fn into_c_string(value: String) -> *mut c_char {
    // JSON output never contains NUL; error messages may echo input
    CString::new(value.replace('\0', "\u{FFFD}"))
        .unwrap_or_default()
        .into_raw()
}

/// Helper: convert a C string pointer to a Rust &str.
/// Returns None if the pointer is null or not valid UTF-8.
unsafe fn cstr_to_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok()
}

/// Decide whether two container definitions documents are semantically
/// equivalent. `result` is `"true"` or `"false"`.
///
/// # Safety
/// `a` and `b` must be valid null-terminated UTF-8 C strings.
/// The caller must free the returned strings with `ecsdef_free_string()`.
#[no_mangle]
pub unsafe extern "C" fn ecsdef_equivalent(
    a: *const c_char,
    b: *const c_char,
    is_awsvpc: bool,
) -> EcsdefResult {
    let a = match cstr_to_str(a) {
        Some(s) => s,
        None => return EcsdefResult::err("null or invalid UTF-8 input a".into()),
    };
    let b = match cstr_to_str(b) {
        Some(s) => s,
        None => return EcsdefResult::err("null or invalid UTF-8 input b".into()),
    };

    match ecsdef_core::definitions_are_equivalent(a, b, is_awsvpc) {
        Ok(equal) => EcsdefResult::ok(equal.to_string()),
        Err(e) => EcsdefResult::err(e.to_string()),
    }
}

/// Parse and validate a container definitions document, returning it
/// re-encoded in wire form.
///
/// # Safety
/// `text` must be a valid null-terminated UTF-8 C string.
/// The caller must free the returned strings with `ecsdef_free_string()`.
#[no_mangle]
pub unsafe extern "C" fn ecsdef_parse(text: *const c_char) -> EcsdefResult {
    let text = match cstr_to_str(text) {
        Some(s) => s,
        None => return EcsdefResult::err("null or invalid UTF-8 input".into()),
    };

    match ecsdef_core::parse(text).and_then(|defs| ecsdef_core::render(&defs)) {
        Ok(json) => EcsdefResult::ok(json),
        Err(e) => EcsdefResult::err(e.to_string()),
    }
}

/// Re-encode a document in wire form without canonicalizing it.
///
/// # Safety
/// `text` must be a valid null-terminated UTF-8 C string.
/// The caller must free the returned strings with `ecsdef_free_string()`.
#[no_mangle]
pub unsafe extern "C" fn ecsdef_render(text: *const c_char) -> EcsdefResult {
    let text = match cstr_to_str(text) {
        Some(s) => s,
        None => return EcsdefResult::err("null or invalid UTF-8 input".into()),
    };

    let defs = match ecsdef_core::parser::decode("input", text) {
        Ok(defs) => defs,
        Err(e) => return EcsdefResult::err(e.to_string()),
    };

    match ecsdef_core::render(&defs) {
        Ok(json) => EcsdefResult::ok(json),
        Err(e) => EcsdefResult::err(e.to_string()),
    }
}

/// Normalize a document to its canonical wire form.
///
/// # Safety
/// `text` must be a valid null-terminated UTF-8 C string.
/// The caller must free the returned strings with `ecsdef_free_string()`.
#[no_mangle]
pub unsafe extern "C" fn ecsdef_normalize(text: *const c_char, is_awsvpc: bool) -> EcsdefResult {
    let text = match cstr_to_str(text) {
        Some(s) => s,
        None => return EcsdefResult::err("null or invalid UTF-8 input".into()),
    };

    match ecsdef_core::normalize(text, is_awsvpc) {
        Ok(normalized) => EcsdefResult::ok(normalized),
        Err(e) => EcsdefResult::err(e.to_string()),
    }
}

/// Verify a document for structural problems.
/// Returns JSON: { "valid": bool, "errors": [...], "warnings": [...] }
///
/// # Safety
/// `text` must be a valid null-terminated UTF-8 C string.
/// The caller must free the returned strings with `ecsdef_free_string()`.
#[no_mangle]
pub unsafe extern "C" fn ecsdef_verify(text: *const c_char) -> EcsdefResult {
    let text = match cstr_to_str(text) {
        Some(s) => s,
        None => return EcsdefResult::err("null or invalid UTF-8 input".into()),
    };

    let defs = match ecsdef_core::parse(text) {
        Ok(defs) => defs,
        Err(e) => return EcsdefResult::err(e.to_string()),
    };

    let result = ecsdef_core::verifier::verify(&defs);
    let to_json = |severity: &str, d: &ecsdef_core::verifier::Diagnostic| {
        serde_json::json!({
            "severity": severity,
            "kind": d.kind.to_string(),
            "message": d.message,
            "index": d.index,
        })
    };

    let output = serde_json::json!({
        "valid": result.is_valid(),
        "errors": result.errors().into_iter().map(|d| to_json("error", d)).collect::<Vec<_>>(),
        "warnings": result.warnings().into_iter().map(|d| to_json("warning", d)).collect::<Vec<_>>(),
    });

    match serde_json::to_string_pretty(&output) {
        Ok(json) => EcsdefResult::ok(json),
        Err(e) => EcsdefResult::err(format!("Serialization error: {}", e)),
    }
}

/// Free a string previously returned by an ecsdef FFI function.
///
/// # Safety
/// `ptr` must be a pointer previously returned by an ecsdef FFI function,
/// or null (in which case this is a no-op).
#[no_mangle]
pub unsafe extern "C" fn ecsdef_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}
