//! Exported C-ABI call surface.
//!
//! Every function follows the same shape: null checks first, marshal inputs,
//! a single try point around the engine call, translate the failure, return.
//! Handle-returning functions report failure as `0`; pointer-returning
//! functions as null with the message readable via
//! [`monero_wallet_ffi_last_error`](crate::error::monero_wallet_ffi_last_error);
//! status-returning functions as a nonzero [`FFIErrorCode`].
//!
//! Calls block until the engine finishes. The host may call from any thread;
//! concurrent use of a single handle is the host's discipline, except that
//! close and set-listener tear the relay down in an order that is safe
//! against in-flight deliveries.

use std::os::raw::c_char;
use std::str::Utf8Error;
use std::sync::{Arc, OnceLock};

use monero_wallet::{
    EngineBackend, NetworkType, Result, RpcConnection, WalletEngine, WalletError, WalletListener,
};

use crate::codec::{
    group_confirmed_blocks, group_into_blocks, parse_document, single_block, to_json, AccountsDoc,
    KeyImagesDoc, KeyImagesImportDoc, SubaddressesDoc,
};
use crate::error::{clear_last_error, handle_error, set_last_error, FFIErrorCode};
use crate::listener::{FFIWalletCallbacks, ListenerAdapter};
use crate::marshal::{
    byte_slice, c_string_opt, c_string_to_rust, rust_string_to_c, string_array_to_vec,
    u32_array_to_vec, FFIByteBuffer, FFIStringArray,
};
use crate::registry::{WalletInstance, REGISTRY};
use crate::{ffi_result, null_check};

static ENGINE_BACKEND: OnceLock<Box<dyn EngineBackend>> = OnceLock::new();

/// Install the process-wide wallet engine backend.
///
/// Must be called exactly once before any wallet is opened or created;
/// returns false if a backend was already installed.
pub fn install_backend(backend: Box<dyn EngineBackend>) -> bool {
    ENGINE_BACKEND.set(backend).is_ok()
}

fn backend() -> Result<&'static dyn EngineBackend> {
    ENGINE_BACKEND
        .get()
        .map(|b| b.as_ref())
        .ok_or_else(|| WalletError::Wallet("no wallet engine backend installed".to_string()))
}

fn utf8_error(e: Utf8Error) -> WalletError {
    WalletError::Parse(format!("argument is not valid UTF-8: {e}"))
}

unsafe fn read_str(ptr: *const c_char) -> Result<String> {
    c_string_to_rust(ptr).map_err(utf8_error)
}

unsafe fn read_opt_str(ptr: *const c_char) -> Result<Option<String>> {
    c_string_opt(ptr).map_err(utf8_error)
}

fn parse_network(code: i32) -> Result<NetworkType> {
    NetworkType::from_code(code)
        .ok_or_else(|| WalletError::Parse(format!("invalid network type code {code}")))
}

fn with_wallet<T>(handle: u64, f: impl FnOnce(&dyn WalletEngine) -> Result<T>) -> Result<T> {
    let instance = REGISTRY.resolve_wallet(handle)?;
    f(instance.engine.as_ref())
}

/// Translate a string result into a host-owned C string or null.
fn string_result(result: Result<String>) -> *mut c_char {
    match handle_error(result) {
        Some(s) => rust_string_to_c(s),
        None => std::ptr::null_mut(),
    }
}

fn register_wallet(result: Result<Box<dyn WalletEngine>>) -> u64 {
    match handle_error(result) {
        Some(engine) => REGISTRY.insert_wallet(Arc::new(WalletInstance::new(engine))),
        None => 0,
    }
}

// ---- lifecycle ----

/// # Safety
/// `path` must be a valid C string; `out_exists` must be writable.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_wallet_exists(
    path: *const c_char,
    out_exists: *mut bool,
) -> i32 {
    null_check!(path);
    null_check!(out_exists);
    let path = ffi_result!(read_str(path));
    let exists = ffi_result!(backend().and_then(|b| b.wallet_exists(&path)));
    *out_exists = exists;
    FFIErrorCode::Success as i32
}

/// Open an existing wallet. Returns the wallet handle, or 0 on failure.
///
/// # Safety
/// `path` and `password` must be valid C strings.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_open_wallet(
    path: *const c_char,
    password: *const c_char,
    network_type: i32,
) -> u64 {
    null_check!(path, 0);
    let path = ffi_result!(read_str(path), 0);
    let password = ffi_result!(read_str(password), 0);
    let network = ffi_result!(parse_network(network_type), 0);
    tracing::debug!(%path, ?network, "opening wallet");
    register_wallet(backend().and_then(|b| b.open_wallet(&path, &password, network)))
}

/// Create a wallet with a freshly generated seed. Returns the handle, or 0.
///
/// `daemon_uri` may be null for an offline wallet; `language` may be null
/// for the engine default.
///
/// # Safety
/// All pointer arguments must be null or valid C strings; `path` non-null.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_create_wallet_random(
    path: *const c_char,
    password: *const c_char,
    network_type: i32,
    daemon_uri: *const c_char,
    daemon_username: *const c_char,
    daemon_password: *const c_char,
    language: *const c_char,
) -> u64 {
    null_check!(path, 0);
    let path = ffi_result!(read_str(path), 0);
    let password = ffi_result!(read_str(password), 0);
    let network = ffi_result!(parse_network(network_type), 0);
    let daemon_uri = ffi_result!(read_opt_str(daemon_uri), 0);
    let daemon_username = ffi_result!(read_opt_str(daemon_username), 0);
    let daemon_password = ffi_result!(read_opt_str(daemon_password), 0);
    let daemon = daemon_uri.map(|uri| RpcConnection {
        uri,
        username: daemon_username,
        password: daemon_password,
    });
    let language = ffi_result!(read_str(language), 0);
    tracing::debug!(%path, ?network, "creating wallet (random)");
    register_wallet(
        backend().and_then(|b| b.create_wallet_random(&path, &password, network, daemon, &language)),
    )
}

/// Restore a wallet from a mnemonic phrase. Returns the handle, or 0.
///
/// # Safety
/// `path`, `password` and `mnemonic` must be valid C strings.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_create_wallet_from_mnemonic(
    path: *const c_char,
    password: *const c_char,
    network_type: i32,
    mnemonic: *const c_char,
    restore_height: u64,
) -> u64 {
    null_check!(path, 0);
    null_check!(mnemonic, 0);
    let path = ffi_result!(read_str(path), 0);
    let password = ffi_result!(read_str(password), 0);
    let network = ffi_result!(parse_network(network_type), 0);
    let mnemonic = ffi_result!(read_str(mnemonic), 0);
    tracing::debug!(%path, ?network, restore_height, "creating wallet (mnemonic)");
    register_wallet(backend().and_then(|b| {
        b.create_wallet_from_mnemonic(&path, &password, network, &mnemonic, restore_height)
    }))
}

/// Restore a watch-only or full wallet from keys. Returns the handle, or 0.
///
/// # Safety
/// All pointer arguments must be null or valid C strings; `path` and
/// `address` non-null.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn monero_wallet_ffi_create_wallet_from_keys(
    path: *const c_char,
    password: *const c_char,
    network_type: i32,
    address: *const c_char,
    view_key: *const c_char,
    spend_key: *const c_char,
    restore_height: u64,
    language: *const c_char,
) -> u64 {
    null_check!(path, 0);
    null_check!(address, 0);
    let path = ffi_result!(read_str(path), 0);
    let password = ffi_result!(read_str(password), 0);
    let network = ffi_result!(parse_network(network_type), 0);
    let address = ffi_result!(read_str(address), 0);
    let view_key = ffi_result!(read_str(view_key), 0);
    let spend_key = ffi_result!(read_str(spend_key), 0);
    let language = ffi_result!(read_str(language), 0);
    tracing::debug!(%path, ?network, restore_height, "creating wallet (keys)");
    register_wallet(backend().and_then(|b| {
        b.create_wallet_from_keys(
            &path,
            &password,
            network,
            &address,
            &view_key,
            &spend_key,
            restore_height,
            &language,
        )
    }))
}

/// Close a wallet, optionally saving first. The handle goes stale; release
/// is exactly-once, and the listener relay is torn down before the engine
/// instance is dropped.
#[no_mangle]
pub extern "C" fn monero_wallet_ffi_close(handle: u64, save: bool) -> i32 {
    let instance = match REGISTRY.remove_wallet(handle) {
        Some(instance) => instance,
        None => {
            set_last_error("invalid wallet handle");
            return FFIErrorCode::WalletError as i32;
        }
    };
    tracing::debug!(handle, "closing wallet");
    if let Some((listener_handle, adapter)) = instance.listener.lock().unwrap().take() {
        instance.engine.set_listener(None);
        adapter.clear();
        REGISTRY.remove_listener(listener_handle);
    }
    if save {
        ffi_result!(instance.engine.save());
    }
    clear_last_error();
    FFIErrorCode::Success as i32
}

#[no_mangle]
pub extern "C" fn monero_wallet_ffi_save(handle: u64) -> i32 {
    ffi_result!(with_wallet(handle, |w| w.save()));
    FFIErrorCode::Success as i32
}

/// # Safety
/// `path` must be a valid C string; `password` null or a valid C string.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_move_to(
    handle: u64,
    path: *const c_char,
    password: *const c_char,
) -> i32 {
    null_check!(path);
    let path = ffi_result!(read_str(path));
    let password = ffi_result!(read_str(password));
    ffi_result!(with_wallet(handle, |w| w.move_to(&path, &password)));
    FFIErrorCode::Success as i32
}

// ---- connectivity ----

/// Serialized daemon connection descriptor, `null` JSON when unset.
#[no_mangle]
pub extern "C" fn monero_wallet_ffi_get_daemon_connection(handle: u64) -> *mut c_char {
    string_result(with_wallet(handle, |w| {
        w.daemon_connection().and_then(|conn| to_json(&conn))
    }))
}

/// Point the wallet at a daemon; a null `uri` clears the connection.
///
/// # Safety
/// Pointer arguments must be null or valid C strings.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_set_daemon_connection(
    handle: u64,
    uri: *const c_char,
    username: *const c_char,
    password: *const c_char,
) -> i32 {
    let uri = ffi_result!(read_opt_str(uri));
    let username = ffi_result!(read_opt_str(username));
    let password = ffi_result!(read_opt_str(password));
    let connection = uri.map(|uri| RpcConnection {
        uri,
        username,
        password,
    });
    ffi_result!(with_wallet(handle, |w| w.set_daemon_connection(connection)));
    FFIErrorCode::Success as i32
}

/// # Safety
/// `out` must be writable.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_is_connected(handle: u64, out: *mut bool) -> i32 {
    null_check!(out);
    *out = ffi_result!(with_wallet(handle, |w| w.is_connected()));
    FFIErrorCode::Success as i32
}

/// # Safety
/// `out` must be writable.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_get_daemon_height(handle: u64, out: *mut u64) -> i32 {
    null_check!(out);
    *out = ffi_result!(with_wallet(handle, |w| w.daemon_height()));
    FFIErrorCode::Success as i32
}

/// # Safety
/// `out` must be writable.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_get_daemon_target_height(
    handle: u64,
    out: *mut u64,
) -> i32 {
    null_check!(out);
    *out = ffi_result!(with_wallet(handle, |w| w.daemon_target_height()));
    FFIErrorCode::Success as i32
}

/// # Safety
/// `out` must be writable.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_is_daemon_synced(handle: u64, out: *mut bool) -> i32 {
    null_check!(out);
    *out = ffi_result!(with_wallet(handle, |w| w.is_daemon_synced()));
    FFIErrorCode::Success as i32
}

/// # Safety
/// `out` must be writable.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_is_synced(handle: u64, out: *mut bool) -> i32 {
    null_check!(out);
    *out = ffi_result!(with_wallet(handle, |w| w.is_synced()));
    FFIErrorCode::Success as i32
}

// ---- identity ----

#[no_mangle]
pub extern "C" fn monero_wallet_ffi_get_path(handle: u64) -> *mut c_char {
    string_result(with_wallet(handle, |w| Ok(w.path())))
}

/// # Safety
/// `out` must be writable.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_get_network_type(handle: u64, out: *mut i32) -> i32 {
    null_check!(out);
    *out = ffi_result!(with_wallet(handle, |w| Ok(w.network_type().code())));
    FFIErrorCode::Success as i32
}

#[no_mangle]
pub extern "C" fn monero_wallet_ffi_get_mnemonic(handle: u64) -> *mut c_char {
    string_result(with_wallet(handle, |w| w.mnemonic()))
}

#[no_mangle]
pub extern "C" fn monero_wallet_ffi_get_language(handle: u64) -> *mut c_char {
    string_result(with_wallet(handle, |w| w.language()))
}

/// Seed languages supported by the engine, or null on failure.
#[no_mangle]
pub extern "C" fn monero_wallet_ffi_get_languages(handle: u64) -> *mut FFIStringArray {
    match handle_error(with_wallet(handle, |w| w.languages())) {
        Some(languages) => FFIStringArray::new(languages).into_raw(),
        None => std::ptr::null_mut(),
    }
}

#[no_mangle]
pub extern "C" fn monero_wallet_ffi_get_public_view_key(handle: u64) -> *mut c_char {
    string_result(with_wallet(handle, |w| w.public_view_key()))
}

#[no_mangle]
pub extern "C" fn monero_wallet_ffi_get_private_view_key(handle: u64) -> *mut c_char {
    string_result(with_wallet(handle, |w| w.private_view_key()))
}

#[no_mangle]
pub extern "C" fn monero_wallet_ffi_get_public_spend_key(handle: u64) -> *mut c_char {
    string_result(with_wallet(handle, |w| w.public_spend_key()))
}

#[no_mangle]
pub extern "C" fn monero_wallet_ffi_get_private_spend_key(handle: u64) -> *mut c_char {
    string_result(with_wallet(handle, |w| w.private_spend_key()))
}

#[no_mangle]
pub extern "C" fn monero_wallet_ffi_get_address(
    handle: u64,
    account_index: u32,
    subaddress_index: u32,
) -> *mut c_char {
    string_result(with_wallet(handle, |w| {
        w.address(account_index, subaddress_index)
    }))
}

/// Subaddress document for an address owned by this wallet.
///
/// # Safety
/// `address` must be a valid C string.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_get_address_index(
    handle: u64,
    address: *const c_char,
) -> *mut c_char {
    null_check!(address, std::ptr::null_mut());
    let address = ffi_result!(read_str(address), std::ptr::null_mut());
    string_result(with_wallet(handle, |w| {
        w.address_index(&address).and_then(|s| to_json(&s))
    }))
}

/// # Safety
/// Pointer arguments must be null or valid C strings.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_get_integrated_address(
    handle: u64,
    standard_address: *const c_char,
    payment_id: *const c_char,
) -> *mut c_char {
    let standard_address = ffi_result!(read_str(standard_address), std::ptr::null_mut());
    let payment_id = ffi_result!(read_str(payment_id), std::ptr::null_mut());
    string_result(with_wallet(handle, |w| {
        w.integrated_address(&standard_address, &payment_id)
            .and_then(|a| to_json(&a))
    }))
}

/// # Safety
/// `integrated_address` must be a valid C string.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_decode_integrated_address(
    handle: u64,
    integrated_address: *const c_char,
) -> *mut c_char {
    null_check!(integrated_address, std::ptr::null_mut());
    let addr = ffi_result!(read_str(integrated_address), std::ptr::null_mut());
    string_result(with_wallet(handle, |w| {
        w.decode_integrated_address(&addr).and_then(|a| to_json(&a))
    }))
}

// ---- listener ----

/// Register (or replace, or with null `callbacks` remove) the host callback
/// table for a wallet. Returns the listener handle, or 0 when unregistering
/// or on failure; failure leaves a message in the last-error slot.
///
/// A previous registration is torn down completely before the new one is
/// installed: the engine stops referencing the relay, the old adapter is
/// neutralized so an in-flight delivery that lost the race drops its event,
/// then the old handle is released.
///
/// # Safety
/// `callbacks` must be null or point to a valid callback table; the function
/// copies the table and does not retain the pointer.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_set_listener(
    handle: u64,
    callbacks: *const FFIWalletCallbacks,
) -> u64 {
    let instance = ffi_result!(REGISTRY.resolve_wallet(handle), 0);

    let previous = instance.listener.lock().unwrap().take();
    if let Some((old_handle, adapter)) = previous {
        instance.engine.set_listener(None);
        adapter.clear();
        REGISTRY.remove_listener(old_handle);
    }

    if callbacks.is_null() {
        clear_last_error();
        return 0;
    }

    let adapter = Arc::new(ListenerAdapter::new(*callbacks));
    let listener_handle = REGISTRY.insert_listener(Arc::clone(&adapter));
    instance
        .engine
        .set_listener(Some(Arc::clone(&adapter) as Arc<dyn WalletListener>));
    *instance.listener.lock().unwrap() = Some((listener_handle, adapter));
    clear_last_error();
    listener_handle
}

// ---- synchronization ----

/// Blocking sync from `start_height`; returns the serialized sync result.
#[no_mangle]
pub extern "C" fn monero_wallet_ffi_sync(handle: u64, start_height: u64) -> *mut c_char {
    tracing::debug!(handle, start_height, "sync requested");
    string_result(with_wallet(handle, |w| {
        w.sync(start_height).and_then(|r| to_json(&r))
    }))
}

#[no_mangle]
pub extern "C" fn monero_wallet_ffi_start_syncing(handle: u64) -> i32 {
    ffi_result!(with_wallet(handle, |w| w.start_syncing()));
    FFIErrorCode::Success as i32
}

/// Request that background syncing stop; honored at the engine's next
/// checkpoint.
#[no_mangle]
pub extern "C" fn monero_wallet_ffi_stop_syncing(handle: u64) -> i32 {
    ffi_result!(with_wallet(handle, |w| w.stop_syncing()));
    FFIErrorCode::Success as i32
}

#[no_mangle]
pub extern "C" fn monero_wallet_ffi_rescan_blockchain(handle: u64) -> i32 {
    ffi_result!(with_wallet(handle, |w| w.rescan_blockchain()));
    FFIErrorCode::Success as i32
}

/// # Safety
/// `out` must be writable.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_get_height(handle: u64, out: *mut u64) -> i32 {
    null_check!(out);
    *out = ffi_result!(with_wallet(handle, |w| w.height()));
    FFIErrorCode::Success as i32
}

/// # Safety
/// `out` must be writable.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_get_chain_height(handle: u64, out: *mut u64) -> i32 {
    null_check!(out);
    *out = ffi_result!(with_wallet(handle, |w| w.chain_height()));
    FFIErrorCode::Success as i32
}

/// # Safety
/// `out` must be writable.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_get_restore_height(handle: u64, out: *mut u64) -> i32 {
    null_check!(out);
    *out = ffi_result!(with_wallet(handle, |w| w.restore_height()));
    FFIErrorCode::Success as i32
}

#[no_mangle]
pub extern "C" fn monero_wallet_ffi_set_restore_height(handle: u64, restore_height: u64) -> i32 {
    ffi_result!(with_wallet(handle, |w| w.set_restore_height(restore_height)));
    FFIErrorCode::Success as i32
}

// ---- balances; all returned as decimal text ----

#[no_mangle]
pub extern "C" fn monero_wallet_ffi_get_balance_wallet(handle: u64) -> *mut c_char {
    string_result(with_wallet(handle, |w| {
        w.balance(None, None).map(|b| b.to_string())
    }))
}

#[no_mangle]
pub extern "C" fn monero_wallet_ffi_get_balance_account(
    handle: u64,
    account_index: u32,
) -> *mut c_char {
    string_result(with_wallet(handle, |w| {
        w.balance(Some(account_index), None).map(|b| b.to_string())
    }))
}

#[no_mangle]
pub extern "C" fn monero_wallet_ffi_get_balance_subaddress(
    handle: u64,
    account_index: u32,
    subaddress_index: u32,
) -> *mut c_char {
    string_result(with_wallet(handle, |w| {
        w.balance(Some(account_index), Some(subaddress_index))
            .map(|b| b.to_string())
    }))
}

#[no_mangle]
pub extern "C" fn monero_wallet_ffi_get_unlocked_balance_wallet(handle: u64) -> *mut c_char {
    string_result(with_wallet(handle, |w| {
        w.unlocked_balance(None, None).map(|b| b.to_string())
    }))
}

#[no_mangle]
pub extern "C" fn monero_wallet_ffi_get_unlocked_balance_account(
    handle: u64,
    account_index: u32,
) -> *mut c_char {
    string_result(with_wallet(handle, |w| {
        w.unlocked_balance(Some(account_index), None)
            .map(|b| b.to_string())
    }))
}

#[no_mangle]
pub extern "C" fn monero_wallet_ffi_get_unlocked_balance_subaddress(
    handle: u64,
    account_index: u32,
    subaddress_index: u32,
) -> *mut c_char {
    string_result(with_wallet(handle, |w| {
        w.unlocked_balance(Some(account_index), Some(subaddress_index))
            .map(|b| b.to_string())
    }))
}

// ---- accounts and subaddresses ----

/// `{"accounts": [...]}` document; `tag` may be null.
///
/// # Safety
/// `tag` must be null or a valid C string.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_get_accounts(
    handle: u64,
    include_subaddresses: bool,
    tag: *const c_char,
) -> *mut c_char {
    let tag = ffi_result!(read_opt_str(tag), std::ptr::null_mut());
    string_result(with_wallet(handle, |w| {
        w.accounts(include_subaddresses, tag.as_deref())
            .and_then(|accounts| to_json(&AccountsDoc { accounts }))
    }))
}

#[no_mangle]
pub extern "C" fn monero_wallet_ffi_get_account(
    handle: u64,
    account_index: u32,
    include_subaddresses: bool,
) -> *mut c_char {
    string_result(with_wallet(handle, |w| {
        w.account(account_index, include_subaddresses)
            .and_then(|a| to_json(&a))
    }))
}

/// # Safety
/// `label` must be null or a valid C string.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_create_account(
    handle: u64,
    label: *const c_char,
) -> *mut c_char {
    let label = ffi_result!(read_opt_str(label), std::ptr::null_mut());
    string_result(with_wallet(handle, |w| {
        w.create_account(label.as_deref()).and_then(|a| to_json(&a))
    }))
}

/// `{"subaddresses": [...]}` document; an empty index array selects all.
///
/// # Safety
/// `indices` must be null or point to `indices_len` readable `u32` values.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_get_subaddresses(
    handle: u64,
    account_index: u32,
    indices: *const u32,
    indices_len: usize,
) -> *mut c_char {
    let indices = u32_array_to_vec(indices, indices_len);
    string_result(with_wallet(handle, |w| {
        w.subaddresses(account_index, &indices)
            .and_then(|subaddresses| to_json(&SubaddressesDoc { subaddresses }))
    }))
}

/// # Safety
/// `label` must be null or a valid C string.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_create_subaddress(
    handle: u64,
    account_index: u32,
    label: *const c_char,
) -> *mut c_char {
    let label = ffi_result!(read_opt_str(label), std::ptr::null_mut());
    string_result(with_wallet(handle, |w| {
        w.create_subaddress(account_index, label.as_deref())
            .and_then(|s| to_json(&s))
    }))
}

// ---- queries; filter JSON in, blocks JSON out ----

/// Transactions matching the filter, grouped under their blocks. A null
/// filter selects everything. Malformed filters fail before the engine is
/// touched.
///
/// # Safety
/// `query_json` must be null or a valid C string.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_get_txs(
    handle: u64,
    query_json: *const c_char,
) -> *mut c_char {
    let json = ffi_result!(read_opt_str(query_json), std::ptr::null_mut());
    string_result((|| {
        let query = match json {
            Some(json) => parse_document(&json, "tx query")?,
            None => Default::default(),
        };
        with_wallet(handle, |w| {
            w.txs(&query).map(group_into_blocks).and_then(|d| to_json(&d))
        })
    })())
}

/// # Safety
/// `query_json` must be null or a valid C string.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_get_transfers(
    handle: u64,
    query_json: *const c_char,
) -> *mut c_char {
    let json = ffi_result!(read_opt_str(query_json), std::ptr::null_mut());
    string_result((|| {
        let query = match json {
            Some(json) => parse_document(&json, "transfer query")?,
            None => Default::default(),
        };
        with_wallet(handle, |w| {
            w.transfers(&query)
                .map(group_into_blocks)
                .and_then(|d| to_json(&d))
        })
    })())
}

/// Outputs matching the filter. Every result transaction must be confirmed;
/// an unconfirmed transaction in the result set is an error.
///
/// # Safety
/// `query_json` must be null or a valid C string.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_get_outputs(
    handle: u64,
    query_json: *const c_char,
) -> *mut c_char {
    let json = ffi_result!(read_opt_str(query_json), std::ptr::null_mut());
    string_result((|| {
        let query = match json {
            Some(json) => parse_document(&json, "output query")?,
            None => Default::default(),
        };
        with_wallet(handle, |w| {
            w.outputs(&query)
                .and_then(group_confirmed_blocks)
                .and_then(|d| to_json(&d))
        })
    })())
}

// ---- output and key image import/export ----

/// Opaque output export blob, or null on failure.
#[no_mangle]
pub extern "C" fn monero_wallet_ffi_export_outputs(handle: u64) -> *mut FFIByteBuffer {
    match handle_error(with_wallet(handle, |w| w.export_outputs())) {
        Some(bytes) => FFIByteBuffer::new(bytes).into_raw(),
        None => std::ptr::null_mut(),
    }
}

/// Import an output export blob; writes the number of imported outputs.
///
/// # Safety
/// `data` must be null or point to `len` readable bytes; `out_imported`
/// must be writable.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_import_outputs(
    handle: u64,
    data: *const u8,
    len: usize,
    out_imported: *mut u64,
) -> i32 {
    null_check!(out_imported);
    let bytes = byte_slice(data, len);
    *out_imported = ffi_result!(with_wallet(handle, |w| w.import_outputs(bytes)));
    FFIErrorCode::Success as i32
}

/// `{"keyImages": [...]}` document.
#[no_mangle]
pub extern "C" fn monero_wallet_ffi_get_key_images(handle: u64) -> *mut c_char {
    string_result(with_wallet(handle, |w| {
        w.key_images()
            .and_then(|key_images| to_json(&KeyImagesDoc { key_images }))
    }))
}

/// Import signed key images from a `{"keyImages": [...]}` document; returns
/// the serialized import result.
///
/// # Safety
/// `json` must be a valid C string.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_import_key_images(
    handle: u64,
    json: *const c_char,
) -> *mut c_char {
    null_check!(json, std::ptr::null_mut());
    let json = ffi_result!(read_str(json), std::ptr::null_mut());
    string_result((|| {
        let doc: KeyImagesImportDoc = parse_document(&json, "key image document")?;
        with_wallet(handle, |w| {
            w.import_key_images(&doc.key_images).and_then(|r| to_json(&r))
        })
    })())
}

// ---- transfer submission ----

/// Construct (and unless `doNotRelay` is set, relay) transactions per the
/// request; returns the produced transactions grouped under their blocks.
///
/// # Safety
/// `request_json` must be a valid C string.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_send_split(
    handle: u64,
    request_json: *const c_char,
) -> *mut c_char {
    null_check!(request_json, std::ptr::null_mut());
    let json = ffi_result!(read_str(request_json), std::ptr::null_mut());
    tracing::debug!(handle, "send requested");
    string_result((|| {
        let request = parse_document(&json, "send request")?;
        with_wallet(handle, |w| {
            w.send_split(&request)
                .map(group_into_blocks)
                .and_then(|d| to_json(&d))
        })
    })())
}

/// Sweep the single output named by the request's key image; the produced
/// transaction is reported in its own block container.
///
/// # Safety
/// `request_json` must be a valid C string.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_sweep_output(
    handle: u64,
    request_json: *const c_char,
) -> *mut c_char {
    null_check!(request_json, std::ptr::null_mut());
    let json = ffi_result!(read_str(request_json), std::ptr::null_mut());
    string_result((|| {
        let request = parse_document(&json, "sweep request")?;
        with_wallet(handle, |w| {
            w.sweep_output(&request)
                .map(|tx| single_block(vec![tx]))
                .and_then(|d| to_json(&d))
        })
    })())
}

/// Sweep dust outputs; all produced transactions share one block container.
#[no_mangle]
pub extern "C" fn monero_wallet_ffi_sweep_dust(handle: u64, do_not_relay: bool) -> *mut c_char {
    string_result(with_wallet(handle, |w| {
        w.sweep_dust(do_not_relay)
            .map(single_block)
            .and_then(|d| to_json(&d))
    }))
}

/// Relay previously constructed transactions by their metadata; returns the
/// relayed transaction ids.
///
/// # Safety
/// `metadatas` must be null or point to `len` valid C string pointers.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_relay_txs(
    handle: u64,
    metadatas: *const *const c_char,
    len: usize,
) -> *mut FFIStringArray {
    let metadatas = ffi_result!(
        string_array_to_vec(metadatas, len).map_err(utf8_error),
        std::ptr::null_mut()
    );
    match handle_error(with_wallet(handle, |w| w.relay_txs(&metadatas))) {
        Some(ids) => FFIStringArray::new(ids).into_raw(),
        None => std::ptr::null_mut(),
    }
}

// ---- notes ----

/// # Safety
/// `tx_ids` must be null or point to `len` valid C string pointers.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_get_tx_notes(
    handle: u64,
    tx_ids: *const *const c_char,
    len: usize,
) -> *mut FFIStringArray {
    let tx_ids = ffi_result!(
        string_array_to_vec(tx_ids, len).map_err(utf8_error),
        std::ptr::null_mut()
    );
    match handle_error(with_wallet(handle, |w| w.tx_notes(&tx_ids))) {
        Some(notes) => FFIStringArray::new(notes).into_raw(),
        None => std::ptr::null_mut(),
    }
}

/// # Safety
/// The arrays must be null or point to the stated numbers of valid C string
/// pointers.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_set_tx_notes(
    handle: u64,
    tx_ids: *const *const c_char,
    tx_ids_len: usize,
    notes: *const *const c_char,
    notes_len: usize,
) -> i32 {
    let tx_ids = ffi_result!(string_array_to_vec(tx_ids, tx_ids_len).map_err(utf8_error));
    let notes = ffi_result!(string_array_to_vec(notes, notes_len).map_err(utf8_error));
    ffi_result!(with_wallet(handle, |w| w.set_tx_notes(&tx_ids, &notes)));
    FFIErrorCode::Success as i32
}

// ---- signing and proofs ----

/// # Safety
/// `message` must be a valid C string.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_sign(
    handle: u64,
    message: *const c_char,
) -> *mut c_char {
    null_check!(message, std::ptr::null_mut());
    let message = ffi_result!(read_str(message), std::ptr::null_mut());
    string_result(with_wallet(handle, |w| w.sign(&message)))
}

/// # Safety
/// Pointer arguments must be valid C strings; `out` must be writable.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_verify(
    handle: u64,
    message: *const c_char,
    address: *const c_char,
    signature: *const c_char,
    out: *mut bool,
) -> i32 {
    null_check!(out);
    let message = ffi_result!(read_str(message));
    let address = ffi_result!(read_str(address));
    let signature = ffi_result!(read_str(signature));
    *out = ffi_result!(with_wallet(handle, |w| w.verify(&message, &address, &signature)));
    FFIErrorCode::Success as i32
}

/// # Safety
/// `tx_id` must be a valid C string.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_get_tx_key(
    handle: u64,
    tx_id: *const c_char,
) -> *mut c_char {
    null_check!(tx_id, std::ptr::null_mut());
    let tx_id = ffi_result!(read_str(tx_id), std::ptr::null_mut());
    string_result(with_wallet(handle, |w| w.tx_key(&tx_id)))
}

/// Serialized check result.
///
/// # Safety
/// Pointer arguments must be valid C strings.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_check_tx_key(
    handle: u64,
    tx_id: *const c_char,
    tx_key: *const c_char,
    address: *const c_char,
) -> *mut c_char {
    let tx_id = ffi_result!(read_str(tx_id), std::ptr::null_mut());
    let tx_key = ffi_result!(read_str(tx_key), std::ptr::null_mut());
    let address = ffi_result!(read_str(address), std::ptr::null_mut());
    string_result(with_wallet(handle, |w| {
        w.check_tx_key(&tx_id, &tx_key, &address).and_then(|c| to_json(&c))
    }))
}

/// # Safety
/// Pointer arguments must be null or valid C strings; `tx_id` non-null.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_get_tx_proof(
    handle: u64,
    tx_id: *const c_char,
    address: *const c_char,
    message: *const c_char,
) -> *mut c_char {
    null_check!(tx_id, std::ptr::null_mut());
    let tx_id = ffi_result!(read_str(tx_id), std::ptr::null_mut());
    let address = ffi_result!(read_str(address), std::ptr::null_mut());
    let message = ffi_result!(read_str(message), std::ptr::null_mut());
    string_result(with_wallet(handle, |w| w.tx_proof(&tx_id, &address, &message)))
}

/// # Safety
/// Pointer arguments must be null or valid C strings.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_check_tx_proof(
    handle: u64,
    tx_id: *const c_char,
    address: *const c_char,
    message: *const c_char,
    signature: *const c_char,
) -> *mut c_char {
    let tx_id = ffi_result!(read_str(tx_id), std::ptr::null_mut());
    let address = ffi_result!(read_str(address), std::ptr::null_mut());
    let message = ffi_result!(read_str(message), std::ptr::null_mut());
    let signature = ffi_result!(read_str(signature), std::ptr::null_mut());
    string_result(with_wallet(handle, |w| {
        w.check_tx_proof(&tx_id, &address, &message, &signature)
            .and_then(|c| to_json(&c))
    }))
}

/// # Safety
/// Pointer arguments must be null or valid C strings; `tx_id` non-null.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_get_spend_proof(
    handle: u64,
    tx_id: *const c_char,
    message: *const c_char,
) -> *mut c_char {
    null_check!(tx_id, std::ptr::null_mut());
    let tx_id = ffi_result!(read_str(tx_id), std::ptr::null_mut());
    let message = ffi_result!(read_str(message), std::ptr::null_mut());
    string_result(with_wallet(handle, |w| w.spend_proof(&tx_id, &message)))
}

/// # Safety
/// Pointer arguments must be null or valid C strings; `out` writable.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_check_spend_proof(
    handle: u64,
    tx_id: *const c_char,
    message: *const c_char,
    signature: *const c_char,
    out: *mut bool,
) -> i32 {
    null_check!(out);
    let tx_id = ffi_result!(read_str(tx_id));
    let message = ffi_result!(read_str(message));
    let signature = ffi_result!(read_str(signature));
    *out = ffi_result!(with_wallet(handle, |w| {
        w.check_spend_proof(&tx_id, &message, &signature)
    }));
    FFIErrorCode::Success as i32
}

/// # Safety
/// `message` must be null or a valid C string.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_get_reserve_proof_wallet(
    handle: u64,
    message: *const c_char,
) -> *mut c_char {
    let message = ffi_result!(read_str(message), std::ptr::null_mut());
    string_result(with_wallet(handle, |w| w.reserve_proof_wallet(&message)))
}

/// `amount` is decimal text, like every monetary magnitude on this surface.
///
/// # Safety
/// `amount` must be a valid C string; `message` null or a valid C string.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_get_reserve_proof_account(
    handle: u64,
    account_index: u32,
    amount: *const c_char,
    message: *const c_char,
) -> *mut c_char {
    null_check!(amount, std::ptr::null_mut());
    let amount_text = ffi_result!(read_str(amount), std::ptr::null_mut());
    let amount = ffi_result!(
        amount_text
            .parse::<u64>()
            .map_err(|e| WalletError::Parse(format!("invalid amount {amount_text:?}: {e}"))),
        std::ptr::null_mut()
    );
    let message = ffi_result!(read_str(message), std::ptr::null_mut());
    string_result(with_wallet(handle, |w| {
        w.reserve_proof_account(account_index, amount, &message)
    }))
}

/// # Safety
/// Pointer arguments must be null or valid C strings.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_check_reserve_proof(
    handle: u64,
    address: *const c_char,
    message: *const c_char,
    signature: *const c_char,
) -> *mut c_char {
    let address = ffi_result!(read_str(address), std::ptr::null_mut());
    let message = ffi_result!(read_str(message), std::ptr::null_mut());
    let signature = ffi_result!(read_str(signature), std::ptr::null_mut());
    string_result(with_wallet(handle, |w| {
        w.check_reserve_proof(&address, &message, &signature)
            .and_then(|c| to_json(&c))
    }))
}

// ---- payment URIs ----

/// # Safety
/// `request_json` must be a valid C string.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_create_payment_uri(
    handle: u64,
    request_json: *const c_char,
) -> *mut c_char {
    null_check!(request_json, std::ptr::null_mut());
    let json = ffi_result!(read_str(request_json), std::ptr::null_mut());
    string_result((|| {
        let request = parse_document(&json, "payment uri request")?;
        with_wallet(handle, |w| w.create_payment_uri(&request))
    })())
}

/// Serialized send request decoded from a payment URI.
///
/// # Safety
/// `uri` must be a valid C string.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_parse_payment_uri(
    handle: u64,
    uri: *const c_char,
) -> *mut c_char {
    null_check!(uri, std::ptr::null_mut());
    let uri = ffi_result!(read_str(uri), std::ptr::null_mut());
    string_result(with_wallet(handle, |w| {
        w.parse_payment_uri(&uri).and_then(|r| to_json(&r))
    }))
}

// ---- attributes ----

/// Value for `key`, or null when the attribute is absent. Absence clears the
/// last-error slot, so a null return with no message means "not set".
///
/// # Safety
/// `key` must be a valid C string.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_get_attribute(
    handle: u64,
    key: *const c_char,
) -> *mut c_char {
    null_check!(key, std::ptr::null_mut());
    let key = ffi_result!(read_str(key), std::ptr::null_mut());
    match handle_error(with_wallet(handle, |w| w.attribute(&key))) {
        Some(Some(value)) => rust_string_to_c(value),
        Some(None) | None => std::ptr::null_mut(),
    }
}

/// # Safety
/// `key` and `value` must be valid C strings.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_set_attribute(
    handle: u64,
    key: *const c_char,
    value: *const c_char,
) -> i32 {
    null_check!(key);
    null_check!(value);
    let key = ffi_result!(read_str(key));
    let value = ffi_result!(read_str(value));
    ffi_result!(with_wallet(handle, |w| w.set_attribute(&key, &value)));
    FFIErrorCode::Success as i32
}

// ---- mining ----

#[no_mangle]
pub extern "C" fn monero_wallet_ffi_start_mining(
    handle: u64,
    num_threads: u64,
    background_mining: bool,
    ignore_battery: bool,
) -> i32 {
    ffi_result!(with_wallet(handle, |w| {
        w.start_mining(num_threads, background_mining, ignore_battery)
    }));
    FFIErrorCode::Success as i32
}

#[no_mangle]
pub extern "C" fn monero_wallet_ffi_stop_mining(handle: u64) -> i32 {
    ffi_result!(with_wallet(handle, |w| w.stop_mining()));
    FFIErrorCode::Success as i32
}

// ---- misc ----

/// Version of this library as a static NUL-terminated string.
#[no_mangle]
pub extern "C" fn monero_wallet_ffi_version() -> *const c_char {
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr() as *const c_char
}
