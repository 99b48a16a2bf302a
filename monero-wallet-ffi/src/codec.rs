//! Request parsing and result encoding.
//!
//! Engine query results arrive as flat transaction lists whose `block`
//! references are shared per containing block. The codec rebuilds the
//! block-to-transaction tree by reference identity, grouping unconfirmed
//! transactions under a single lazily created placeholder block, and wraps
//! every collection result in a top-level document object.

use std::collections::HashMap;
use std::sync::Arc;

use monero_wallet::{Account, Block, KeyImage, Result, Subaddress, TxWallet, WalletError};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Parse a host-supplied JSON document, classifying failures as parse errors
/// that name what was being parsed.
pub fn parse_document<T: DeserializeOwned>(json: &str, what: &str) -> Result<T> {
    serde_json::from_str(json).map_err(|e| WalletError::Parse(format!("invalid {what}: {e}")))
}

/// Encode a result document. An encoding failure is a wallet-level fault: the
/// model is fully serializable by construction.
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| WalletError::Wallet(format!("encoding failed: {e}")))
}

/// One block container with the transactions confirmed in it (or, for the
/// placeholder, the unconfirmed ones).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockDoc {
    #[serde(flatten)]
    pub block: Block,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub txs: Vec<TxWallet>,
}

/// Top-level wrapper for block-tree results. Empty results serialize as `{}`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BlocksDoc {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<BlockDoc>,
}

/// Top-level wrapper for account results.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AccountsDoc {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub accounts: Vec<Account>,
}

/// Top-level wrapper for subaddress results.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SubaddressesDoc {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subaddresses: Vec<Subaddress>,
}

/// Top-level wrapper for key image export results.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyImagesDoc {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub key_images: Vec<KeyImage>,
}

/// Top-level wrapper accepted for key image import.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyImagesImportDoc {
    #[serde(default)]
    pub key_images: Vec<KeyImage>,
}

/// Group transactions under their containing blocks by reference identity.
///
/// Transactions sharing one `Arc<Block>` land in one container; transactions
/// with no block share a single placeholder created on first need. Input
/// order is preserved within and across containers (first transaction of a
/// block fixes the block's position).
pub fn group_into_blocks(txs: Vec<Arc<TxWallet>>) -> BlocksDoc {
    let mut blocks: Vec<BlockDoc> = Vec::new();
    let mut seen: HashMap<*const Block, usize> = HashMap::new();
    let mut placeholder: Option<usize> = None;

    for tx in txs {
        let slot = match &tx.block {
            Some(block) => {
                let key = Arc::as_ptr(block);
                *seen.entry(key).or_insert_with(|| {
                    blocks.push(BlockDoc {
                        block: (**block).clone(),
                        txs: Vec::new(),
                    });
                    blocks.len() - 1
                })
            }
            None => *placeholder.get_or_insert_with(|| {
                blocks.push(BlockDoc {
                    block: Block::default(),
                    txs: Vec::new(),
                });
                blocks.len() - 1
            }),
        };
        blocks[slot].txs.push((*tx).clone());
    }

    BlocksDoc { blocks }
}

/// Like [`group_into_blocks`], but every transaction must be confirmed.
///
/// Output queries must resolve each output's containing block; an unconfirmed
/// transaction in the result set is a hard error, not a placeholder.
pub fn group_confirmed_blocks(txs: Vec<Arc<TxWallet>>) -> Result<BlocksDoc> {
    if txs.iter().any(|tx| tx.block.is_none()) {
        return Err(WalletError::UnconfirmedOutput);
    }
    Ok(group_into_blocks(txs))
}

/// Wrap transactions from one construction call in a single block container.
///
/// Sweep results are reported this way: all produced transactions share one
/// container, placeholder or real depending on the first transaction.
pub fn single_block(txs: Vec<Arc<TxWallet>>) -> BlocksDoc {
    if txs.is_empty() {
        return BlocksDoc::default();
    }
    let block = txs[0]
        .block
        .as_ref()
        .map(|b| (**b).clone())
        .unwrap_or_default();
    BlocksDoc {
        blocks: vec![BlockDoc {
            block,
            txs: txs.into_iter().map(|tx| (*tx).clone()).collect(),
        }],
    }
}
