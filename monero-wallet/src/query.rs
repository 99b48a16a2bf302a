//! Structured filter objects for queries and transfer submission.
//!
//! Filters arrive from the host as JSON documents, are deserialized once per
//! call before the engine is touched, and stay immutable for the duration of
//! the call. Malformed input fails with a parse error and zero engine calls.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

/// Criteria for selecting transactions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxQuery {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub is_confirmed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub in_tx_pool: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub is_incoming: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub is_outgoing: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tx_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub payment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub min_height: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub max_height: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub include_outputs: Option<bool>,
}

/// Criteria for selecting transfers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferQuery {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub is_incoming: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub account_index: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub subaddress_index: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub subaddress_indices: Vec<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tx_query: Option<TxQuery>,
}

/// Criteria for selecting outputs.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputQuery {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub account_index: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub subaddress_index: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub is_spent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub key_image: Option<String>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub min_amount: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tx_query: Option<TxQuery>,
}

/// A payment destination.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub address: String,
    #[serde_as(as = "DisplayFromStr")]
    pub amount: u64,
}

/// Request to construct (and optionally relay) outgoing transactions.
///
/// Also used for sweep-output (with `key_image` set) and for payment URI
/// construction and parsing.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRequest {
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub destinations: Vec<Destination>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub account_index: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub subaddress_indices: Vec<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub payment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub priority: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub ring_size: Option<u32>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub fee: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub do_not_relay: Option<bool>,
    /// Key image of the output to sweep; only meaningful for sweep-output.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub key_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sweep_each_subaddress: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub note: Option<String>,
}
