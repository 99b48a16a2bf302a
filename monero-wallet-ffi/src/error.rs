//! Error translation at the bridge boundary.
//!
//! Engine failures are classified into [`FFIErrorCode`] values and their
//! message text is parked in a thread-local slot the host can read back;
//! no failure crosses the boundary untranslated and no operation returns a
//! sentinel value in place of an error.

use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;

use monero_wallet::WalletError;

/// Message used when a failure carries no usable text of its own.
pub const FALLBACK_ERROR_MESSAGE: &str = "unidentified wallet engine failure";

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Host-visible failure categories.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FFIErrorCode {
    Success = 0,
    NullPointer = 1,
    InvalidArgument = 2,
    OutOfMemory = 3,
    Io = 4,
    Parse = 5,
    UnsupportedState = 6,
    Listener = 7,
    WalletError = 8,
    Unknown = 99,
}

impl From<&WalletError> for FFIErrorCode {
    fn from(err: &WalletError) -> Self {
        match err {
            WalletError::OutOfMemory(_) => FFIErrorCode::OutOfMemory,
            WalletError::Io(_) => FFIErrorCode::Io,
            WalletError::Parse(_) => FFIErrorCode::Parse,
            WalletError::UnconfirmedOutput => FFIErrorCode::UnsupportedState,
            WalletError::Listener(_) => FFIErrorCode::Listener,
            WalletError::Wallet(_) => FFIErrorCode::WalletError,
        }
    }
}

pub fn set_last_error(err: &str) {
    let msg = if err.is_empty() {
        FALLBACK_ERROR_MESSAGE
    } else {
        err
    };
    let c_err =
        CString::new(msg).unwrap_or_else(|_| CString::new(FALLBACK_ERROR_MESSAGE).unwrap());
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = Some(c_err);
    });
}

pub fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Record a classified failure, logging it the way the engine side logs
/// boundary failures.
pub fn set_last_wallet_error(err: &WalletError) {
    tracing::debug!("bridge call failed: {err}");
    set_last_error(&err.to_string());
}

/// Message text of the most recent failure on this thread, or null.
///
/// The returned pointer stays valid until the next failing or succeeding
/// bridge call on the same thread.
#[no_mangle]
pub extern "C" fn monero_wallet_ffi_last_error() -> *const c_char {
    LAST_ERROR.with(|e| e.borrow().as_ref().map(|err| err.as_ptr()).unwrap_or(std::ptr::null()))
}

#[no_mangle]
pub extern "C" fn monero_wallet_ffi_clear_error() {
    clear_last_error();
}

/// Translate a result at the boundary: clears or records the thread-local
/// message and hands back the value.
pub fn handle_error<T>(result: monero_wallet::Result<T>) -> Option<T> {
    match result {
        Ok(value) => {
            clear_last_error();
            Some(value)
        }
        Err(e) => {
            set_last_wallet_error(&e);
            None
        }
    }
}

/// Unwrap a `Result` inside an `extern "C"` function, returning the error
/// code (one-argument form) or a caller-supplied value (two-argument form)
/// after recording the failure.
#[macro_export]
macro_rules! ffi_result {
    ($expr:expr) => {
        match $expr {
            Ok(val) => {
                $crate::error::clear_last_error();
                val
            }
            Err(e) => {
                $crate::error::set_last_wallet_error(&e);
                return $crate::error::FFIErrorCode::from(&e) as i32;
            }
        }
    };
    ($expr:expr, $ret:expr) => {
        match $expr {
            Ok(val) => {
                $crate::error::clear_last_error();
                val
            }
            Err(e) => {
                $crate::error::set_last_wallet_error(&e);
                return $ret;
            }
        }
    };
}

#[macro_export]
macro_rules! null_check {
    ($ptr:expr) => {
        if $ptr.is_null() {
            $crate::error::set_last_error("Null pointer provided");
            return $crate::error::FFIErrorCode::NullPointer as i32;
        }
    };
    ($ptr:expr, $ret:expr) => {
        if $ptr.is_null() {
            $crate::error::set_last_error("Null pointer provided");
            return $ret;
        }
    };
}
