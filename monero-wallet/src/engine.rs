//! Narrow interface to the external wallet engine.
//!
//! The bridge owns engine instances only through these traits; it never sees
//! key material, sync internals, or the wallet file format. Implementations
//! are expected to be internally synchronized: every method takes `&self` and
//! may be called from any host thread, while the engine is free to run its
//! own background threads for synchronization and mining.

use std::sync::Arc;

use crate::error::Result;
use crate::model::{
    Account, IntegratedAddress, KeyImage, KeyImageImportResult, NetworkType, ReserveCheck,
    RpcConnection, Subaddress, SyncResult, TxCheck, TxWallet,
};
use crate::query::{OutputQuery, SendRequest, TransferQuery, TxQuery};

/// An output-received / output-spent event raised by the engine.
///
/// `height` is zero for outputs whose transaction is still unconfirmed.
#[derive(Debug, Clone)]
pub struct OutputEvent {
    pub height: u64,
    pub tx_id: String,
    pub amount: u64,
    pub account_index: u32,
    pub subaddress_index: u32,
    pub tx_version: u32,
    pub unlock_time: u64,
}

/// Receiver of engine notifications.
///
/// Callbacks are invoked synchronously from whichever thread the engine
/// raises the event on, typically its background synchronization thread.
/// A returned error is re-raised into the engine at the call site and
/// terminates the operation that triggered the callback.
pub trait WalletListener: Send + Sync {
    fn on_sync_progress(
        &self,
        height: u64,
        start_height: u64,
        end_height: u64,
        percent_done: f64,
        message: &str,
    ) -> Result<()>;

    fn on_new_block(&self, height: u64) -> Result<()>;

    fn on_output_received(&self, event: &OutputEvent) -> Result<()>;

    fn on_output_spent(&self, event: &OutputEvent) -> Result<()>;
}

/// A single open wallet instance inside the native engine.
///
/// Query operations return transactions whose `block` references are shared
/// per containing block, which is what lets the codec rebuild the
/// block-to-transaction tree by identity.
pub trait WalletEngine: Send + Sync {
    // identity
    fn path(&self) -> String;
    fn network_type(&self) -> NetworkType;
    fn mnemonic(&self) -> Result<String>;
    fn language(&self) -> Result<String>;
    fn languages(&self) -> Result<Vec<String>>;
    fn public_view_key(&self) -> Result<String>;
    fn private_view_key(&self) -> Result<String>;
    fn public_spend_key(&self) -> Result<String>;
    fn private_spend_key(&self) -> Result<String>;
    fn address(&self, account_index: u32, subaddress_index: u32) -> Result<String>;
    fn address_index(&self, address: &str) -> Result<Subaddress>;
    fn integrated_address(
        &self,
        standard_address: &str,
        payment_id: &str,
    ) -> Result<IntegratedAddress>;
    fn decode_integrated_address(&self, integrated_address: &str) -> Result<IntegratedAddress>;

    // connectivity
    fn daemon_connection(&self) -> Result<Option<RpcConnection>>;
    fn set_daemon_connection(&self, connection: Option<RpcConnection>) -> Result<()>;
    fn is_connected(&self) -> Result<bool>;
    fn daemon_height(&self) -> Result<u64>;
    fn daemon_target_height(&self) -> Result<u64>;
    fn is_daemon_synced(&self) -> Result<bool>;
    fn is_synced(&self) -> Result<bool>;

    // listener
    fn set_listener(&self, listener: Option<Arc<dyn WalletListener>>);

    // synchronization
    fn sync(&self, start_height: u64) -> Result<SyncResult>;
    fn start_syncing(&self) -> Result<()>;
    fn stop_syncing(&self) -> Result<()>;
    fn rescan_blockchain(&self) -> Result<()>;
    fn height(&self) -> Result<u64>;
    fn chain_height(&self) -> Result<u64>;
    fn restore_height(&self) -> Result<u64>;
    fn set_restore_height(&self, restore_height: u64) -> Result<()>;

    // balances; None scopes widen to the account or whole wallet
    fn balance(&self, account_index: Option<u32>, subaddress_index: Option<u32>) -> Result<u64>;
    fn unlocked_balance(
        &self,
        account_index: Option<u32>,
        subaddress_index: Option<u32>,
    ) -> Result<u64>;

    // accounts and subaddresses
    fn accounts(&self, include_subaddresses: bool, tag: Option<&str>) -> Result<Vec<Account>>;
    fn account(&self, account_index: u32, include_subaddresses: bool) -> Result<Account>;
    fn create_account(&self, label: Option<&str>) -> Result<Account>;
    fn subaddresses(&self, account_index: u32, indices: &[u32]) -> Result<Vec<Subaddress>>;
    fn create_subaddress(&self, account_index: u32, label: Option<&str>) -> Result<Subaddress>;

    // queries
    fn txs(&self, query: &TxQuery) -> Result<Vec<Arc<TxWallet>>>;
    fn transfers(&self, query: &TransferQuery) -> Result<Vec<Arc<TxWallet>>>;
    fn outputs(&self, query: &OutputQuery) -> Result<Vec<Arc<TxWallet>>>;

    // output and key image import/export
    fn export_outputs(&self) -> Result<Vec<u8>>;
    fn import_outputs(&self, outputs: &[u8]) -> Result<u64>;
    fn key_images(&self) -> Result<Vec<KeyImage>>;
    fn import_key_images(&self, key_images: &[KeyImage]) -> Result<KeyImageImportResult>;

    // transfer submission
    fn send_split(&self, request: &SendRequest) -> Result<Vec<Arc<TxWallet>>>;
    fn sweep_output(&self, request: &SendRequest) -> Result<Arc<TxWallet>>;
    fn sweep_dust(&self, do_not_relay: bool) -> Result<Vec<Arc<TxWallet>>>;
    fn relay_txs(&self, tx_metadatas: &[String]) -> Result<Vec<String>>;

    // notes
    fn tx_notes(&self, tx_ids: &[String]) -> Result<Vec<String>>;
    fn set_tx_notes(&self, tx_ids: &[String], notes: &[String]) -> Result<()>;

    // proofs
    fn sign(&self, message: &str) -> Result<String>;
    fn verify(&self, message: &str, address: &str, signature: &str) -> Result<bool>;
    fn tx_key(&self, tx_id: &str) -> Result<String>;
    fn check_tx_key(&self, tx_id: &str, tx_key: &str, address: &str) -> Result<TxCheck>;
    fn tx_proof(&self, tx_id: &str, address: &str, message: &str) -> Result<String>;
    fn check_tx_proof(
        &self,
        tx_id: &str,
        address: &str,
        message: &str,
        signature: &str,
    ) -> Result<TxCheck>;
    fn spend_proof(&self, tx_id: &str, message: &str) -> Result<String>;
    fn check_spend_proof(&self, tx_id: &str, message: &str, signature: &str) -> Result<bool>;
    fn reserve_proof_wallet(&self, message: &str) -> Result<String>;
    fn reserve_proof_account(&self, account_index: u32, amount: u64, message: &str)
        -> Result<String>;
    fn check_reserve_proof(
        &self,
        address: &str,
        message: &str,
        signature: &str,
    ) -> Result<ReserveCheck>;

    // payment URIs
    fn create_payment_uri(&self, request: &SendRequest) -> Result<String>;
    fn parse_payment_uri(&self, uri: &str) -> Result<SendRequest>;

    // arbitrary attributes
    fn attribute(&self, key: &str) -> Result<Option<String>>;
    fn set_attribute(&self, key: &str, value: &str) -> Result<()>;

    // mining
    fn start_mining(&self, num_threads: u64, background_mining: bool, ignore_battery: bool)
        -> Result<()>;
    fn stop_mining(&self) -> Result<()>;

    // persistence; closing is dropping the instance
    fn save(&self) -> Result<()>;
    fn move_to(&self, path: &str, password: &str) -> Result<()>;
}

/// Factory through which the bridge obtains wallet instances.
///
/// Installed process-wide exactly once; see the bridge crate.
pub trait EngineBackend: Send + Sync {
    fn wallet_exists(&self, path: &str) -> Result<bool>;

    fn open_wallet(
        &self,
        path: &str,
        password: &str,
        network: NetworkType,
    ) -> Result<Box<dyn WalletEngine>>;

    fn create_wallet_random(
        &self,
        path: &str,
        password: &str,
        network: NetworkType,
        daemon: Option<RpcConnection>,
        language: &str,
    ) -> Result<Box<dyn WalletEngine>>;

    fn create_wallet_from_mnemonic(
        &self,
        path: &str,
        password: &str,
        network: NetworkType,
        mnemonic: &str,
        restore_height: u64,
    ) -> Result<Box<dyn WalletEngine>>;

    #[allow(clippy::too_many_arguments)]
    fn create_wallet_from_keys(
        &self,
        path: &str,
        password: &str,
        network: NetworkType,
        address: &str,
        view_key: &str,
        spend_key: &str,
        restore_height: u64,
        language: &str,
    ) -> Result<Box<dyn WalletEngine>>;
}
