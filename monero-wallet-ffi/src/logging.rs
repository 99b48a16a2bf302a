//! Logging initialization for the bridge library.
//!
//! Console sink only; hosts that want their own log pipeline leave the
//! console disabled and the tracing macros become no-ops.

use std::ffi::CStr;
use std::os::raw::c_char;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::error::{set_last_error, FFIErrorCode};

static LOGGING_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Initialize logging.
///
/// `level` selects the log level ("error", "warn", "info", "debug",
/// "trace"); null falls back to the `RUST_LOG` environment variable or INFO.
/// With `enable_console` false the call records the choice but installs no
/// output. First initialization wins; later calls are ignored.
///
/// # Safety
/// `level` must be null or point to a valid, NUL-terminated C string.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_init_logging(
    level: *const c_char,
    enable_console: bool,
) -> i32 {
    let env_filter = if level.is_null() {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(LevelFilter::INFO.to_string()))
    } else {
        match CStr::from_ptr(level).to_str() {
            Ok(s) => match s.parse::<LevelFilter>() {
                Ok(lf) => EnvFilter::new(lf.to_string()),
                Err(_) => {
                    set_last_error(&format!(
                        "Invalid log level '{s}'. Valid: error, warn, info, debug, trace"
                    ));
                    return FFIErrorCode::InvalidArgument as i32;
                }
            },
            Err(e) => {
                set_last_error(&format!("Invalid UTF-8 in log level: {e}"));
                return FFIErrorCode::InvalidArgument as i32;
            }
        }
    };

    if LOGGING_INITIALIZED.swap(true, Ordering::SeqCst) {
        tracing::warn!("Logging already initialized, ignoring subsequent init");
        return FFIErrorCode::Success as i32;
    }

    if !enable_console {
        return FFIErrorCode::Success as i32;
    }

    if tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_thread_ids(false)
        .try_init()
        .is_err()
    {
        // A subscriber installed by the host process is fine.
        tracing::debug!("tracing subscriber already set by the host");
    }

    FFIErrorCode::Success as i32
}
