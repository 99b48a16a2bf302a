//! Engine-facing side of the Monero wallet bridge.
//!
//! This crate defines the narrow interface through which the native wallet
//! engine is consumed ([`WalletEngine`], [`WalletListener`], [`EngineBackend`]),
//! the document model exchanged across the bridge (blocks, transactions,
//! transfers, outputs, accounts, subaddresses, key images), the structured
//! filter objects for queries and sends, and the error taxonomy.
//!
//! The engine itself (key management, blockchain synchronization, transaction
//! construction) is an external collaborator; nothing in this crate performs
//! cryptography or touches the wallet file format.

pub mod engine;
pub mod error;
pub mod model;
pub mod query;

pub use engine::{EngineBackend, OutputEvent, WalletEngine, WalletListener};
pub use error::{Result, WalletError};
pub use model::{
    Account, Block, IncomingTransfer, IntegratedAddress, KeyImage, KeyImageImportResult,
    NetworkType, OutgoingTransfer, OutputWallet, ReserveCheck, RpcConnection, Subaddress,
    SyncResult, TxCheck, TxWallet,
};
pub use query::{Destination, OutputQuery, SendRequest, TransferQuery, TxQuery};
