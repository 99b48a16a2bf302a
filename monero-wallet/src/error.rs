//! Error types for the wallet bridge.

use std::io;
use thiserror::Error;

/// Main error type for wallet engine operations.
///
/// Every failure that crosses the bridge boundary is classified into one of
/// these variants at the single outermost catch point of the call; no failure
/// is surfaced as a sentinel value.
#[derive(Debug, Error)]
pub enum WalletError {
    /// Resource exhaustion inside the engine.
    #[error("out of memory: {0}")]
    OutOfMemory(String),

    /// I/O failure (wallet file, daemon connection).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed filter or request document. Raised before any engine call.
    #[error("parse error: {0}")]
    Parse(String),

    /// An output whose transaction has no resolvable containing block.
    ///
    /// The output query path only supports confirmed outputs; this state is
    /// rejected explicitly instead of surfacing as an incidental failure.
    #[error("output has no resolvable containing block")]
    UnconfirmedOutput,

    /// A failure raised by the host listener callback, re-raised at the
    /// native call site. Fatal to the in-flight operation that triggered
    /// the callback, not to the process.
    #[error("listener callback failed: {0}")]
    Listener(String),

    /// Generic engine failure carrying the original message.
    #[error("wallet error: {0}")]
    Wallet(String),
}

/// Result alias for wallet engine operations.
pub type Result<T> = std::result::Result<T, WalletError>;
