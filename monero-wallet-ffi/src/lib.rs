//! C ABI bridge exposing the Monero wallet engine to managed host runtimes.
//!
//! The bridge is a boundary layer, not a wallet: it marshals values between
//! the host's representation and the engine's, translates failures into
//! status codes plus a thread-local message, keeps a registry of live wallet
//! instances behind opaque handles, relays engine notifications to host
//! callbacks, and encodes structured requests and results as JSON documents.
//!
//! All exported functions are `monero_wallet_ffi_*`. Calls are synchronous
//! and blocking; the host may call from any thread. Wallet instances are
//! obtained through a process-wide [`EngineBackend`](monero_wallet::EngineBackend)
//! installed once via [`install_backend`].

pub mod codec;
pub mod error;
pub mod listener;
pub mod logging;
pub mod marshal;
pub mod registry;
pub mod wallet;

pub use error::{
    monero_wallet_ffi_clear_error, monero_wallet_ffi_last_error, FFIErrorCode,
    FALLBACK_ERROR_MESSAGE,
};
pub use listener::{monero_wallet_ffi_set_callback_error, FFIWalletCallbacks, ListenerAdapter};
pub use marshal::{
    monero_wallet_ffi_byte_buffer_free, monero_wallet_ffi_string_array_free,
    monero_wallet_ffi_string_free, FFIByteBuffer, FFIStringArray,
};
pub use wallet::install_backend;
