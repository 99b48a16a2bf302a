#![allow(dead_code)]

//! Shared fake engine backend for surface tests.
//!
//! The fake records how often it was queried, hands back canned documents,
//! and lets tests drive listener notifications as if the engine's background
//! sync thread raised them.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use monero_wallet::{
    Account, EngineBackend, IntegratedAddress, KeyImage, KeyImageImportResult, NetworkType,
    OutputEvent, OutputQuery, ReserveCheck, Result, RpcConnection, SendRequest, Subaddress,
    SyncResult, TransferQuery, TxCheck, TxQuery, TxWallet, WalletEngine, WalletListener,
};
use once_cell::sync::Lazy;

pub struct MockState {
    pub balance: AtomicU64,
    pub query_calls: AtomicUsize,
    pub save_calls: AtomicUsize,
    pub txs: Mutex<Vec<Arc<TxWallet>>>,
    pub listener: Mutex<Option<Arc<dyn WalletListener>>>,
    pub last_tx_query: Mutex<Option<TxQuery>>,
}

impl MockState {
    fn new() -> Self {
        MockState {
            balance: AtomicU64::new(0),
            query_calls: AtomicUsize::new(0),
            save_calls: AtomicUsize::new(0),
            txs: Mutex::new(Vec::new()),
            listener: Mutex::new(None),
            last_tx_query: Mutex::new(None),
        }
    }

    pub fn listener(&self) -> Option<Arc<dyn WalletListener>> {
        self.listener.lock().unwrap().clone()
    }

    /// Raise an output-received event the way the engine's sync thread would.
    pub fn emit_output_received(&self, event: &OutputEvent) -> Result<()> {
        match self.listener() {
            Some(listener) => listener.on_output_received(event),
            None => Ok(()),
        }
    }
}

static STATE: Lazy<Arc<MockState>> = Lazy::new(|| Arc::new(MockState::new()));

pub fn shared_state() -> Arc<MockState> {
    Arc::clone(&STATE)
}

/// Install the fake backend once per test binary.
pub fn ensure_backend() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        monero_wallet_ffi::install_backend(Box::new(MockBackend {
            state: shared_state(),
        }));
    });
}

pub struct MockBackend {
    state: Arc<MockState>,
}

impl EngineBackend for MockBackend {
    fn wallet_exists(&self, path: &str) -> Result<bool> {
        Ok(path.ends_with(".keys"))
    }

    fn open_wallet(
        &self,
        _path: &str,
        _password: &str,
        network: NetworkType,
    ) -> Result<Box<dyn WalletEngine>> {
        Ok(Box::new(MockEngine {
            state: Arc::clone(&self.state),
            network,
        }))
    }

    fn create_wallet_random(
        &self,
        _path: &str,
        _password: &str,
        network: NetworkType,
        _daemon: Option<RpcConnection>,
        _language: &str,
    ) -> Result<Box<dyn WalletEngine>> {
        Ok(Box::new(MockEngine {
            state: Arc::clone(&self.state),
            network,
        }))
    }

    fn create_wallet_from_mnemonic(
        &self,
        _path: &str,
        _password: &str,
        network: NetworkType,
        _mnemonic: &str,
        _restore_height: u64,
    ) -> Result<Box<dyn WalletEngine>> {
        Ok(Box::new(MockEngine {
            state: Arc::clone(&self.state),
            network,
        }))
    }

    fn create_wallet_from_keys(
        &self,
        _path: &str,
        _password: &str,
        network: NetworkType,
        _address: &str,
        _view_key: &str,
        _spend_key: &str,
        _restore_height: u64,
        _language: &str,
    ) -> Result<Box<dyn WalletEngine>> {
        Ok(Box::new(MockEngine {
            state: Arc::clone(&self.state),
            network,
        }))
    }
}

pub struct MockEngine {
    pub state: Arc<MockState>,
    pub network: NetworkType,
}

impl WalletEngine for MockEngine {
    fn path(&self) -> String {
        "/tmp/mock-wallet".to_string()
    }

    fn network_type(&self) -> NetworkType {
        self.network
    }

    fn mnemonic(&self) -> Result<String> {
        Ok("mock seed phrase".to_string())
    }

    fn language(&self) -> Result<String> {
        Ok("English".to_string())
    }

    fn languages(&self) -> Result<Vec<String>> {
        Ok(vec!["English".to_string(), "Deutsch".to_string()])
    }

    fn public_view_key(&self) -> Result<String> {
        Ok("pub-view".to_string())
    }

    fn private_view_key(&self) -> Result<String> {
        Ok("priv-view".to_string())
    }

    fn public_spend_key(&self) -> Result<String> {
        Ok("pub-spend".to_string())
    }

    fn private_spend_key(&self) -> Result<String> {
        Ok("priv-spend".to_string())
    }

    fn address(&self, account_index: u32, subaddress_index: u32) -> Result<String> {
        Ok(format!("addr-{account_index}-{subaddress_index}"))
    }

    fn address_index(&self, _address: &str) -> Result<Subaddress> {
        Ok(Subaddress {
            account_index: 1,
            index: 2,
            ..Default::default()
        })
    }

    fn integrated_address(
        &self,
        standard_address: &str,
        payment_id: &str,
    ) -> Result<IntegratedAddress> {
        Ok(IntegratedAddress {
            standard_address: standard_address.to_string(),
            payment_id: payment_id.to_string(),
            integrated_address: format!("{standard_address}+{payment_id}"),
        })
    }

    fn decode_integrated_address(&self, integrated_address: &str) -> Result<IntegratedAddress> {
        Ok(IntegratedAddress {
            standard_address: "std".to_string(),
            payment_id: "pid".to_string(),
            integrated_address: integrated_address.to_string(),
        })
    }

    fn daemon_connection(&self) -> Result<Option<RpcConnection>> {
        Ok(Some(RpcConnection {
            uri: "http://localhost:38081".to_string(),
            username: None,
            password: None,
        }))
    }

    fn set_daemon_connection(&self, _connection: Option<RpcConnection>) -> Result<()> {
        Ok(())
    }

    fn is_connected(&self) -> Result<bool> {
        Ok(true)
    }

    fn daemon_height(&self) -> Result<u64> {
        Ok(250)
    }

    fn daemon_target_height(&self) -> Result<u64> {
        Ok(250)
    }

    fn is_daemon_synced(&self) -> Result<bool> {
        Ok(true)
    }

    fn is_synced(&self) -> Result<bool> {
        Ok(true)
    }

    fn set_listener(&self, listener: Option<Arc<dyn WalletListener>>) {
        *self.state.listener.lock().unwrap() = listener;
    }

    /// Drives the registered listener like a real sync would; a listener
    /// failure aborts the sync.
    fn sync(&self, start_height: u64) -> Result<SyncResult> {
        let listener = self.state.listener();
        let end_height = 3;
        if let Some(listener) = listener {
            for height in start_height..=end_height {
                listener.on_sync_progress(
                    height,
                    start_height,
                    end_height,
                    height as f64 / end_height as f64,
                    "Synchronizing",
                )?;
                listener.on_new_block(height)?;
            }
        }
        Ok(SyncResult {
            num_blocks_fetched: (end_height + 1).saturating_sub(start_height),
            received_money: false,
        })
    }

    fn start_syncing(&self) -> Result<()> {
        Ok(())
    }

    fn stop_syncing(&self) -> Result<()> {
        Ok(())
    }

    fn rescan_blockchain(&self) -> Result<()> {
        Ok(())
    }

    fn height(&self) -> Result<u64> {
        Ok(200)
    }

    fn chain_height(&self) -> Result<u64> {
        Ok(250)
    }

    fn restore_height(&self) -> Result<u64> {
        Ok(100)
    }

    fn set_restore_height(&self, _restore_height: u64) -> Result<()> {
        Ok(())
    }

    fn balance(&self, _account_index: Option<u32>, _subaddress_index: Option<u32>) -> Result<u64> {
        Ok(self.state.balance.load(Ordering::SeqCst))
    }

    fn unlocked_balance(
        &self,
        _account_index: Option<u32>,
        _subaddress_index: Option<u32>,
    ) -> Result<u64> {
        Ok(self.state.balance.load(Ordering::SeqCst) / 2)
    }

    fn accounts(&self, _include_subaddresses: bool, _tag: Option<&str>) -> Result<Vec<Account>> {
        Ok(vec![Account {
            index: 0,
            balance: self.state.balance.load(Ordering::SeqCst),
            unlocked_balance: 0,
            ..Default::default()
        }])
    }

    fn account(&self, account_index: u32, _include_subaddresses: bool) -> Result<Account> {
        Ok(Account {
            index: account_index,
            ..Default::default()
        })
    }

    fn create_account(&self, label: Option<&str>) -> Result<Account> {
        Ok(Account {
            index: 1,
            label: label.map(|l| l.to_string()),
            ..Default::default()
        })
    }

    fn subaddresses(&self, account_index: u32, indices: &[u32]) -> Result<Vec<Subaddress>> {
        Ok(indices
            .iter()
            .map(|&index| Subaddress {
                account_index,
                index,
                ..Default::default()
            })
            .collect())
    }

    fn create_subaddress(&self, account_index: u32, label: Option<&str>) -> Result<Subaddress> {
        Ok(Subaddress {
            account_index,
            index: 1,
            label: label.map(|l| l.to_string()),
            ..Default::default()
        })
    }

    fn txs(&self, query: &TxQuery) -> Result<Vec<Arc<TxWallet>>> {
        self.state.query_calls.fetch_add(1, Ordering::SeqCst);
        *self.state.last_tx_query.lock().unwrap() = Some(query.clone());
        Ok(self.state.txs.lock().unwrap().clone())
    }

    fn transfers(&self, _query: &TransferQuery) -> Result<Vec<Arc<TxWallet>>> {
        self.state.query_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.state.txs.lock().unwrap().clone())
    }

    fn outputs(&self, _query: &OutputQuery) -> Result<Vec<Arc<TxWallet>>> {
        self.state.query_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.state.txs.lock().unwrap().clone())
    }

    fn export_outputs(&self) -> Result<Vec<u8>> {
        Ok(vec![0xde, 0xad, 0xbe, 0xef])
    }

    fn import_outputs(&self, outputs: &[u8]) -> Result<u64> {
        Ok(outputs.len() as u64)
    }

    fn key_images(&self) -> Result<Vec<KeyImage>> {
        Ok(vec![KeyImage {
            hex: "aa".to_string(),
            signature: Some("sig".to_string()),
        }])
    }

    fn import_key_images(&self, key_images: &[KeyImage]) -> Result<KeyImageImportResult> {
        Ok(KeyImageImportResult {
            height: 200,
            spent_amount: key_images.len() as u64,
            unspent_amount: 0,
        })
    }

    fn send_split(&self, _request: &SendRequest) -> Result<Vec<Arc<TxWallet>>> {
        Ok(self.state.txs.lock().unwrap().clone())
    }

    fn sweep_output(&self, _request: &SendRequest) -> Result<Arc<TxWallet>> {
        Ok(Arc::new(TxWallet {
            id: "swept".to_string(),
            in_tx_pool: Some(true),
            ..Default::default()
        }))
    }

    fn sweep_dust(&self, _do_not_relay: bool) -> Result<Vec<Arc<TxWallet>>> {
        Ok(vec![
            Arc::new(TxWallet {
                id: "dust1".to_string(),
                ..Default::default()
            }),
            Arc::new(TxWallet {
                id: "dust2".to_string(),
                ..Default::default()
            }),
        ])
    }

    fn relay_txs(&self, tx_metadatas: &[String]) -> Result<Vec<String>> {
        Ok(tx_metadatas.iter().map(|m| format!("id-{m}")).collect())
    }

    fn tx_notes(&self, tx_ids: &[String]) -> Result<Vec<String>> {
        Ok(tx_ids.iter().map(|id| format!("note for {id}")).collect())
    }

    fn set_tx_notes(&self, _tx_ids: &[String], _notes: &[String]) -> Result<()> {
        Ok(())
    }

    fn sign(&self, message: &str) -> Result<String> {
        Ok(format!("signed:{message}"))
    }

    fn verify(&self, _message: &str, _address: &str, signature: &str) -> Result<bool> {
        Ok(signature.starts_with("signed:"))
    }

    fn tx_key(&self, _tx_id: &str) -> Result<String> {
        Ok("txkey".to_string())
    }

    fn check_tx_key(&self, _tx_id: &str, _tx_key: &str, _address: &str) -> Result<TxCheck> {
        Ok(TxCheck {
            is_good: true,
            received_amount: Some(5),
            ..Default::default()
        })
    }

    fn tx_proof(&self, _tx_id: &str, _address: &str, _message: &str) -> Result<String> {
        Ok("txproof".to_string())
    }

    fn check_tx_proof(
        &self,
        _tx_id: &str,
        _address: &str,
        _message: &str,
        _signature: &str,
    ) -> Result<TxCheck> {
        Ok(TxCheck {
            is_good: true,
            ..Default::default()
        })
    }

    fn spend_proof(&self, _tx_id: &str, _message: &str) -> Result<String> {
        Ok("spendproof".to_string())
    }

    fn check_spend_proof(&self, _tx_id: &str, _message: &str, _signature: &str) -> Result<bool> {
        Ok(true)
    }

    fn reserve_proof_wallet(&self, _message: &str) -> Result<String> {
        Ok("reserveproof".to_string())
    }

    fn reserve_proof_account(
        &self,
        _account_index: u32,
        amount: u64,
        _message: &str,
    ) -> Result<String> {
        Ok(format!("reserveproof:{amount}"))
    }

    fn check_reserve_proof(
        &self,
        _address: &str,
        _message: &str,
        _signature: &str,
    ) -> Result<ReserveCheck> {
        Ok(ReserveCheck {
            is_good: true,
            total_amount: Some(10),
            spent_amount: Some(0),
        })
    }

    fn create_payment_uri(&self, request: &SendRequest) -> Result<String> {
        Ok(format!(
            "monero:{}",
            request
                .destinations
                .first()
                .map(|d| d.address.as_str())
                .unwrap_or("")
        ))
    }

    fn parse_payment_uri(&self, uri: &str) -> Result<SendRequest> {
        Ok(SendRequest {
            destinations: vec![monero_wallet::Destination {
                address: uri.trim_start_matches("monero:").to_string(),
                amount: 0,
            }],
            ..Default::default()
        })
    }

    fn attribute(&self, key: &str) -> Result<Option<String>> {
        Ok(if key == "known" {
            Some("value".to_string())
        } else {
            None
        })
    }

    fn set_attribute(&self, _key: &str, _value: &str) -> Result<()> {
        Ok(())
    }

    fn start_mining(
        &self,
        _num_threads: u64,
        _background_mining: bool,
        _ignore_battery: bool,
    ) -> Result<()> {
        Ok(())
    }

    fn stop_mining(&self) -> Result<()> {
        Ok(())
    }

    fn save(&self) -> Result<()> {
        self.state.save_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn move_to(&self, _path: &str, _password: &str) -> Result<()> {
        Ok(())
    }
}
