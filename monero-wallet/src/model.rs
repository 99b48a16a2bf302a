//! Document model exchanged across the bridge.
//!
//! All documents serialize as camelCase JSON. Monetary and other 64-bit
//! magnitudes cross the boundary as decimal text (`DisplayFromStr`) so they
//! round-trip without precision loss through runtimes whose numeric types
//! cannot hold a full `u64`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

use crate::query::Destination;

/// Monero network selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    Mainnet,
    Testnet,
    Stagenet,
}

impl NetworkType {
    /// Decode the numeric code used on the call surface.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(NetworkType::Mainnet),
            1 => Some(NetworkType::Testnet),
            2 => Some(NetworkType::Stagenet),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            NetworkType::Mainnet => 0,
            NetworkType::Testnet => 1,
            NetworkType::Stagenet => 2,
        }
    }
}

/// Daemon connection descriptor: URI plus optional credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcConnection {
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub password: Option<String>,
}

/// Block container in the result tree.
///
/// A block with no height and no hash is a synthetic placeholder constructed
/// solely to group unconfirmed transactions for transport; it does not exist
/// in the engine's own model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub height: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub timestamp: Option<u64>,
}

impl Block {
    /// Whether this is a synthetic placeholder rather than a chain block.
    pub fn is_placeholder(&self) -> bool {
        self.height.is_none() && self.hash.is_none()
    }
}

/// Wallet-scoped transaction with its nested transfers and outputs.
///
/// `block` is shared (`Arc`) between all transactions confirmed in the same
/// block so the codec can rebuild the block tree by identity; it is skipped
/// during serialization because the transaction is always emitted nested
/// inside its block container.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxWallet {
    #[serde(skip)]
    pub block: Option<Arc<Block>>,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub payment_id: Option<String>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub fee: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub version: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub unlock_time: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub is_confirmed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub in_tx_pool: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub num_confirmations: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub do_not_relay: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub note: Option<String>,
    /// Relayable metadata produced by transaction construction.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub metadata: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub incoming_transfers: Vec<IncomingTransfer>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub outgoing_transfer: Option<OutgoingTransfer>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub outputs: Vec<OutputWallet>,
}

/// Incoming transfer within a transaction.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingTransfer {
    #[serde_as(as = "DisplayFromStr")]
    pub amount: u64,
    pub account_index: u32,
    pub subaddress_index: u32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub address: Option<String>,
}

/// Outgoing transfer within a transaction.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingTransfer {
    #[serde_as(as = "DisplayFromStr")]
    pub amount: u64,
    pub account_index: u32,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub subaddress_indices: Vec<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub destinations: Vec<Destination>,
}

/// Wallet-owned output within a transaction.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputWallet {
    #[serde_as(as = "DisplayFromStr")]
    pub amount: u64,
    pub account_index: u32,
    pub subaddress_index: u32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub index: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub key_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub is_spent: Option<bool>,
}

/// Account with optional nested subaddresses.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub index: u32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub primary_address: Option<String>,
    #[serde_as(as = "DisplayFromStr")]
    pub balance: u64,
    #[serde_as(as = "DisplayFromStr")]
    pub unlocked_balance: u64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub subaddresses: Vec<Subaddress>,
}

/// Subaddress within an account.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subaddress {
    pub account_index: u32,
    pub index: u32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub label: Option<String>,
    #[serde_as(as = "DisplayFromStr")]
    pub balance: u64,
    #[serde_as(as = "DisplayFromStr")]
    pub unlocked_balance: u64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub num_unspent_outputs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub is_used: Option<bool>,
}

/// Standard address paired with a payment id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegratedAddress {
    pub standard_address: String,
    pub payment_id: String,
    pub integrated_address: String,
}

/// Signed key image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyImage {
    pub hex: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub signature: Option<String>,
}

/// Result of importing signed key images.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyImageImportResult {
    pub height: u64,
    #[serde_as(as = "DisplayFromStr")]
    pub spent_amount: u64,
    #[serde_as(as = "DisplayFromStr")]
    pub unspent_amount: u64,
}

/// Result of a blocking sync call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
    pub num_blocks_fetched: u64,
    pub received_money: bool,
}

/// Result of checking a tx key or tx proof.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxCheck {
    pub is_good: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub num_confirmations: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub in_tx_pool: Option<bool>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub received_amount: Option<u64>,
}

/// Result of checking a reserve proof.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReserveCheck {
    pub is_good: bool,
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub total_amount: Option<u64>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub spent_amount: Option<u64>,
}
