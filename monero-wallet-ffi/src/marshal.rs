//! Primitive value marshalling between host and native representations.
//!
//! Every conversion is null-safe and every transient buffer has exactly one
//! owner; buffers handed to the host are released through the matching
//! `_free` function and nothing else.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::str::Utf8Error;

/// Convert a Rust string into a host-owned C string.
///
/// Returns null if the string contains an interior NUL.
pub fn rust_string_to_c(s: String) -> *mut c_char {
    match CString::new(s) {
        Ok(c_str) => c_str.into_raw(),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Read a C string into an owned Rust string; null reads as empty.
///
/// # Safety
/// `s` must be null or point to a valid, NUL-terminated C string.
pub unsafe fn c_string_to_rust(s: *const c_char) -> Result<String, Utf8Error> {
    if s.is_null() {
        return Ok(String::new());
    }
    CStr::from_ptr(s).to_str().map(|s| s.to_string())
}

/// Read a nullable C string parameter; null reads as `None`.
///
/// # Safety
/// `s` must be null or point to a valid, NUL-terminated C string.
pub unsafe fn c_string_opt(s: *const c_char) -> Result<Option<String>, Utf8Error> {
    if s.is_null() {
        return Ok(None);
    }
    CStr::from_ptr(s).to_str().map(|s| Some(s.to_string()))
}

/// Free a string returned by this crate.
///
/// # Safety
/// `s` must be null or a pointer obtained from this crate's string-returning
/// functions, and must not be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_string_free(s: *mut c_char) {
    if !s.is_null() {
        let _ = CString::from_raw(s);
    }
}

/// Host-owned array of C strings.
#[repr(C)]
pub struct FFIStringArray {
    pub ptr: *mut *mut c_char,
    pub len: usize,
}

impl FFIStringArray {
    pub fn new(items: Vec<String>) -> Self {
        let mut raw: Vec<*mut c_char> = items.into_iter().map(rust_string_to_c).collect();
        raw.shrink_to_fit();
        let len = raw.len();
        let boxed = raw.into_boxed_slice();
        FFIStringArray {
            ptr: Box::into_raw(boxed) as *mut *mut c_char,
            len,
        }
    }

    pub fn into_raw(self) -> *mut FFIStringArray {
        Box::into_raw(Box::new(self))
    }
}

/// Free a string array returned by this crate, including every element.
///
/// # Safety
/// `array` must be null or a pointer obtained from this crate, and must not
/// be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_string_array_free(array: *mut FFIStringArray) {
    if array.is_null() {
        return;
    }
    let array = Box::from_raw(array);
    if !array.ptr.is_null() {
        let strings = Vec::from_raw_parts(array.ptr, array.len, array.len);
        for s in strings {
            if !s.is_null() {
                let _ = CString::from_raw(s);
            }
        }
    }
}

/// Read a host-supplied array of C strings.
///
/// A null pointer or zero length reads as an empty collection.
///
/// # Safety
/// If non-null, `ptr` must point to `len` valid C string pointers.
pub unsafe fn string_array_to_vec(
    ptr: *const *const c_char,
    len: usize,
) -> Result<Vec<String>, Utf8Error> {
    if ptr.is_null() || len == 0 {
        return Ok(Vec::new());
    }
    let mut items = Vec::with_capacity(len);
    for idx in 0..len {
        items.push(c_string_to_rust(*ptr.add(idx))?);
    }
    Ok(items)
}

/// Read a host-supplied `u32` index array; null or zero length is empty.
///
/// # Safety
/// If non-null, `ptr` must point to `len` readable `u32` values.
pub unsafe fn u32_array_to_vec(ptr: *const u32, len: usize) -> Vec<u32> {
    if ptr.is_null() || len == 0 {
        return Vec::new();
    }
    std::slice::from_raw_parts(ptr, len).to_vec()
}

/// Host-owned byte buffer.
#[repr(C)]
pub struct FFIByteBuffer {
    pub ptr: *mut u8,
    pub len: usize,
}

impl FFIByteBuffer {
    pub fn new(bytes: Vec<u8>) -> Self {
        let len = bytes.len();
        let boxed = bytes.into_boxed_slice();
        FFIByteBuffer {
            ptr: Box::into_raw(boxed) as *mut u8,
            len,
        }
    }

    pub fn into_raw(self) -> *mut FFIByteBuffer {
        Box::into_raw(Box::new(self))
    }
}

/// Free a byte buffer returned by this crate.
///
/// # Safety
/// `buffer` must be null or a pointer obtained from this crate, and must not
/// be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_byte_buffer_free(buffer: *mut FFIByteBuffer) {
    if buffer.is_null() {
        return;
    }
    let buffer = Box::from_raw(buffer);
    if !buffer.ptr.is_null() {
        let _ = Box::from_raw(std::ptr::slice_from_raw_parts_mut(buffer.ptr, buffer.len));
    }
}

/// Read a host-supplied byte slice; null or zero length is empty.
///
/// # Safety
/// If non-null, `ptr` must point to `len` readable bytes.
pub unsafe fn byte_slice<'a>(ptr: *const u8, len: usize) -> &'a [u8] {
    if ptr.is_null() || len == 0 {
        return &[];
    }
    std::slice::from_raw_parts(ptr, len)
}
