//! Relay of engine notifications to host-supplied callbacks.
//!
//! The engine raises events on its own background threads; the relay attaches
//! the calling thread to the host runtime if the host asked for that, invokes
//! the callback, and translates a nonzero status back into an error that is
//! fatal to the engine operation in flight.
//!
//! An adapter is either registered (holding a callback table) or unregistered.
//! Unregistering is observed atomically: a delivery that loses the race sees
//! the empty state under the same lock and drops the event.

use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::{c_char, c_void};
use std::sync::Mutex;

use monero_wallet::{OutputEvent, WalletError, WalletListener};

use crate::marshal::rust_string_to_c;

/// Sync progress callback. Returns 0 on success.
pub type SyncProgressCallback = extern "C" fn(
    height: u64,
    start_height: u64,
    end_height: u64,
    percent_done: f64,
    message: *const c_char,
    user_data: *mut c_void,
) -> i32;

/// New block callback. Returns 0 on success.
pub type NewBlockCallback = extern "C" fn(height: u64, user_data: *mut c_void) -> i32;

/// Output received callback. `amount` is decimal text. Returns 0 on success.
pub type OutputReceivedCallback = extern "C" fn(
    height: u64,
    tx_id: *const c_char,
    amount: *const c_char,
    account_index: u32,
    subaddress_index: u32,
    tx_version: u32,
    unlock_time: u64,
    user_data: *mut c_void,
) -> i32;

/// Output spent callback. `amount` is decimal text. Returns 0 on success.
pub type OutputSpentCallback = extern "C" fn(
    height: u64,
    tx_id: *const c_char,
    amount: *const c_char,
    account_index: u32,
    subaddress_index: u32,
    tx_version: u32,
    user_data: *mut c_void,
) -> i32;

/// Called before callbacks are invoked from a thread the host has never seen.
/// Returns true if the thread was attached and needs a matching detach.
pub type AttachThreadCallback = extern "C" fn(user_data: *mut c_void) -> bool;

/// Called after callback delivery on a thread `attach_thread` attached.
pub type DetachThreadCallback = extern "C" fn(user_data: *mut c_void);

/// Table of host callbacks registered for one wallet.
///
/// Any entry may be null; events with no corresponding entry are dropped.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct FFIWalletCallbacks {
    pub on_sync_progress: Option<SyncProgressCallback>,
    pub on_new_block: Option<NewBlockCallback>,
    pub on_output_received: Option<OutputReceivedCallback>,
    pub on_output_spent: Option<OutputSpentCallback>,
    pub attach_thread: Option<AttachThreadCallback>,
    pub detach_thread: Option<DetachThreadCallback>,
    pub user_data: *mut c_void,
}

impl Default for FFIWalletCallbacks {
    fn default() -> Self {
        FFIWalletCallbacks {
            on_sync_progress: None,
            on_new_block: None,
            on_output_received: None,
            on_output_spent: None,
            attach_thread: None,
            detach_thread: None,
            user_data: std::ptr::null_mut(),
        }
    }
}

// The host contract requires the callback table to be invocable from any
// thread; user_data is an opaque token the host interprets on its own side.
unsafe impl Send for FFIWalletCallbacks {}
unsafe impl Sync for FFIWalletCallbacks {}

thread_local! {
    static CALLBACK_ERROR: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Deposit a failure message from inside a host callback.
///
/// Read back by the relay when the callback returns a nonzero status; has no
/// effect on a callback that returns 0.
///
/// # Safety
/// `message` must be null or point to a valid, NUL-terminated C string.
#[no_mangle]
pub unsafe extern "C" fn monero_wallet_ffi_set_callback_error(message: *const c_char) {
    let text = crate::marshal::c_string_opt(message)
        .ok()
        .flatten()
        .filter(|s| !s.is_empty());
    CALLBACK_ERROR.with(|e| {
        *e.borrow_mut() = text;
    });
}

fn take_callback_error() -> Option<String> {
    CALLBACK_ERROR.with(|e| e.borrow_mut().take())
}

/// Bridges one registered callback table into [`WalletListener`].
///
/// The single mutex is the registration cell and the delivery lock in one:
/// events are delivered while it is held, and `clear` empties the cell under
/// the same lock, so an unregistration never interleaves with a delivery.
pub struct ListenerAdapter {
    callbacks: Mutex<Option<FFIWalletCallbacks>>,
}

impl ListenerAdapter {
    pub fn new(callbacks: FFIWalletCallbacks) -> Self {
        ListenerAdapter {
            callbacks: Mutex::new(Some(callbacks)),
        }
    }

    /// Transition to the unregistered state. Idempotent.
    pub fn clear(&self) {
        *self.callbacks.lock().unwrap() = None;
    }

    pub fn is_registered(&self) -> bool {
        self.callbacks.lock().unwrap().is_some()
    }

    /// Deliver one event: attach the thread if the host wants, invoke, map a
    /// nonzero status to a listener error, detach if this call attached.
    ///
    /// `invoke` returns `None` when the table has no entry for the event, in
    /// which case the event is silently dropped.
    fn deliver<F>(&self, invoke: F) -> Result<(), WalletError>
    where
        F: FnOnce(&FFIWalletCallbacks) -> Option<i32>,
    {
        // Held across the invocation: deliveries are serialized per adapter
        // and `clear` cannot interleave with one. Callbacks must not call
        // back into set-listener on the same wallet.
        let guard = self.callbacks.lock().unwrap();
        let callbacks = match *guard {
            Some(cbs) => cbs,
            None => return Ok(()),
        };

        let attached = callbacks
            .attach_thread
            .map(|attach| attach(callbacks.user_data))
            .unwrap_or(false);

        let status = invoke(&callbacks);

        if attached {
            if let Some(detach) = callbacks.detach_thread {
                detach(callbacks.user_data);
            }
        }

        match status {
            None | Some(0) => {
                take_callback_error();
                Ok(())
            }
            Some(code) => {
                let message = take_callback_error()
                    .unwrap_or_else(|| format!("listener callback returned status {code}"));
                Err(WalletError::Listener(message))
            }
        }
    }
}

impl WalletListener for ListenerAdapter {
    fn on_sync_progress(
        &self,
        height: u64,
        start_height: u64,
        end_height: u64,
        percent_done: f64,
        message: &str,
    ) -> Result<(), WalletError> {
        self.deliver(|cbs| {
            cbs.on_sync_progress.map(|cb| {
                let c_message = CString::new(message).unwrap_or_default();
                cb(
                    height,
                    start_height,
                    end_height,
                    percent_done,
                    c_message.as_ptr(),
                    cbs.user_data,
                )
            })
        })
    }

    fn on_new_block(&self, height: u64) -> Result<(), WalletError> {
        self.deliver(|cbs| cbs.on_new_block.map(|cb| cb(height, cbs.user_data)))
    }

    fn on_output_received(&self, event: &OutputEvent) -> Result<(), WalletError> {
        self.deliver(|cbs| {
            cbs.on_output_received.map(|cb| {
                let tx_id = rust_string_to_c(event.tx_id.clone());
                let amount = rust_string_to_c(event.amount.to_string());
                let status = cb(
                    event.height,
                    tx_id,
                    amount,
                    event.account_index,
                    event.subaddress_index,
                    event.tx_version,
                    event.unlock_time,
                    cbs.user_data,
                );
                unsafe {
                    crate::marshal::monero_wallet_ffi_string_free(tx_id);
                    crate::marshal::monero_wallet_ffi_string_free(amount);
                }
                status
            })
        })
    }

    fn on_output_spent(&self, event: &OutputEvent) -> Result<(), WalletError> {
        self.deliver(|cbs| {
            cbs.on_output_spent.map(|cb| {
                let tx_id = rust_string_to_c(event.tx_id.clone());
                let amount = rust_string_to_c(event.amount.to_string());
                let status = cb(
                    event.height,
                    tx_id,
                    amount,
                    event.account_index,
                    event.subaddress_index,
                    event.tx_version,
                    cbs.user_data,
                );
                unsafe {
                    crate::marshal::monero_wallet_ffi_string_free(tx_id);
                    crate::marshal::monero_wallet_ffi_string_free(amount);
                }
                status
            })
        })
    }
}
