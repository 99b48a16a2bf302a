//! Relay behavior: registration states, status translation, thread hooks.

use std::ffi::CString;
use std::os::raw::{c_char, c_void};
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use assert_matches::assert_matches;
use monero_wallet::{OutputEvent, WalletError, WalletListener};
use monero_wallet_ffi::listener::{FFIWalletCallbacks, ListenerAdapter};
use monero_wallet_ffi::monero_wallet_ffi_set_callback_error;

#[derive(Default)]
struct Capture {
    new_blocks: Mutex<Vec<u64>>,
    outputs_received: AtomicUsize,
    sync_messages: Mutex<Vec<String>>,
    attaches: AtomicUsize,
    detaches: AtomicUsize,
    attach_reports_attached: AtomicBool,
    fail_status: AtomicI32,
    fail_message: Mutex<Option<CString>>,
    callback_delay_ms: AtomicU64,
}

impl Capture {
    fn finish(&self) -> i32 {
        let delay = self.callback_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            thread::sleep(Duration::from_millis(delay));
        }
        let status = self.fail_status.load(Ordering::SeqCst);
        if status != 0 {
            if let Some(msg) = self.fail_message.lock().unwrap().as_ref() {
                unsafe { monero_wallet_ffi_set_callback_error(msg.as_ptr()) };
            }
        }
        status
    }
}

extern "C" fn on_sync_progress(
    height: u64,
    _start_height: u64,
    _end_height: u64,
    _percent_done: f64,
    message: *const c_char,
    user_data: *mut c_void,
) -> i32 {
    let capture = unsafe { &*(user_data as *const Capture) };
    let message = unsafe { std::ffi::CStr::from_ptr(message) }
        .to_string_lossy()
        .into_owned();
    capture
        .sync_messages
        .lock()
        .unwrap()
        .push(format!("{height}:{message}"));
    capture.finish()
}

extern "C" fn on_new_block(height: u64, user_data: *mut c_void) -> i32 {
    let capture = unsafe { &*(user_data as *const Capture) };
    capture.new_blocks.lock().unwrap().push(height);
    capture.finish()
}

extern "C" fn on_output_received(
    _height: u64,
    _tx_id: *const c_char,
    amount: *const c_char,
    _account_index: u32,
    _subaddress_index: u32,
    _tx_version: u32,
    _unlock_time: u64,
    user_data: *mut c_void,
) -> i32 {
    let capture = unsafe { &*(user_data as *const Capture) };
    // amounts cross as decimal text
    let amount = unsafe { std::ffi::CStr::from_ptr(amount) }.to_string_lossy();
    assert!(amount.chars().all(|c| c.is_ascii_digit()), "{amount}");
    capture.outputs_received.fetch_add(1, Ordering::SeqCst);
    capture.finish()
}

extern "C" fn attach_thread(user_data: *mut c_void) -> bool {
    let capture = unsafe { &*(user_data as *const Capture) };
    capture.attaches.fetch_add(1, Ordering::SeqCst);
    capture.attach_reports_attached.load(Ordering::SeqCst)
}

extern "C" fn detach_thread(user_data: *mut c_void) {
    let capture = unsafe { &*(user_data as *const Capture) };
    capture.detaches.fetch_add(1, Ordering::SeqCst);
}

fn callbacks_for(capture: &Arc<Capture>) -> FFIWalletCallbacks {
    FFIWalletCallbacks {
        on_sync_progress: Some(on_sync_progress),
        on_new_block: Some(on_new_block),
        on_output_received: Some(on_output_received),
        on_output_spent: None,
        attach_thread: Some(attach_thread),
        detach_thread: Some(detach_thread),
        user_data: Arc::as_ptr(capture) as *mut c_void,
    }
}

#[test]
fn delivers_events_and_marshals_amounts_as_text() {
    let capture = Arc::new(Capture::default());
    let adapter = ListenerAdapter::new(callbacks_for(&capture));

    adapter.on_new_block(7).unwrap();
    adapter
        .on_sync_progress(5, 0, 10, 0.5, "Synchronizing")
        .unwrap();
    adapter
        .on_output_received(&OutputEvent {
            height: 9,
            tx_id: "ab".to_string(),
            amount: u64::MAX,
            account_index: 0,
            subaddress_index: 1,
            tx_version: 2,
            unlock_time: 0,
        })
        .unwrap();

    assert_eq!(*capture.new_blocks.lock().unwrap(), vec![7]);
    assert_eq!(
        *capture.sync_messages.lock().unwrap(),
        vec!["5:Synchronizing".to_string()]
    );
    assert_eq!(capture.outputs_received.load(Ordering::SeqCst), 1);
}

#[test]
fn events_with_no_registered_entry_are_dropped() {
    let capture = Arc::new(Capture::default());
    let mut callbacks = callbacks_for(&capture);
    callbacks.on_new_block = None;
    let adapter = ListenerAdapter::new(callbacks);

    adapter.on_new_block(1).unwrap();
    assert!(capture.new_blocks.lock().unwrap().is_empty());
}

#[test]
fn cleared_adapter_drops_events() {
    let capture = Arc::new(Capture::default());
    let adapter = ListenerAdapter::new(callbacks_for(&capture));
    assert!(adapter.is_registered());

    adapter.on_new_block(1).unwrap();
    adapter.clear();
    assert!(!adapter.is_registered());

    adapter.on_new_block(2).unwrap();
    adapter.clear(); // idempotent

    assert_eq!(*capture.new_blocks.lock().unwrap(), vec![1]);
}

#[test]
fn nonzero_status_surfaces_as_listener_error() {
    let capture = Arc::new(Capture::default());
    capture.fail_status.store(3, Ordering::SeqCst);
    let adapter = ListenerAdapter::new(callbacks_for(&capture));

    let err = adapter.on_new_block(1).unwrap_err();
    assert_matches!(
        err,
        WalletError::Listener(msg) if msg == "listener callback returned status 3"
    );

    // A deposited message takes precedence over the generic one.
    *capture.fail_message.lock().unwrap() = Some(CString::new("host exception").unwrap());
    let err = adapter.on_new_block(2).unwrap_err();
    assert_matches!(err, WalletError::Listener(msg) if msg == "host exception");
}

#[test]
fn stale_callback_error_does_not_leak_into_success() {
    let capture = Arc::new(Capture::default());
    let adapter = ListenerAdapter::new(callbacks_for(&capture));

    // Deposit a message but return success; the next failure must not
    // pick it up.
    *capture.fail_message.lock().unwrap() = Some(CString::new("ignored").unwrap());
    capture.fail_status.store(0, Ordering::SeqCst);
    adapter.on_new_block(1).unwrap();

    *capture.fail_message.lock().unwrap() = None;
    capture.fail_status.store(1, Ordering::SeqCst);
    let err = adapter.on_new_block(2).unwrap_err();
    assert_matches!(
        err,
        WalletError::Listener(msg) if msg == "listener callback returned status 1"
    );
}

#[test]
fn detach_runs_only_when_attach_attached() {
    let capture = Arc::new(Capture::default());
    let adapter = ListenerAdapter::new(callbacks_for(&capture));

    capture.attach_reports_attached.store(false, Ordering::SeqCst);
    adapter.on_new_block(1).unwrap();
    assert_eq!(capture.attaches.load(Ordering::SeqCst), 1);
    assert_eq!(capture.detaches.load(Ordering::SeqCst), 0);

    capture.attach_reports_attached.store(true, Ordering::SeqCst);
    adapter.on_new_block(2).unwrap();
    assert_eq!(capture.attaches.load(Ordering::SeqCst), 2);
    assert_eq!(capture.detaches.load(Ordering::SeqCst), 1);
}

#[test]
fn clear_racing_a_slow_delivery_is_exactly_once_or_dropped() {
    let capture = Arc::new(Capture::default());
    capture.callback_delay_ms.store(20, Ordering::SeqCst);
    let adapter = Arc::new(ListenerAdapter::new(callbacks_for(&capture)));

    let delivering = Arc::clone(&adapter);
    let handle = thread::spawn(move || delivering.on_new_block(42));

    thread::sleep(Duration::from_millis(5));
    adapter.clear();
    handle.join().unwrap().unwrap();

    // The in-flight delivery either won the lock (delivered once) or lost
    // it (dropped); never half-delivered, never after a later event.
    let delivered = capture.new_blocks.lock().unwrap().clone();
    assert!(delivered.is_empty() || delivered == vec![42], "{delivered:?}");

    adapter.on_new_block(43).unwrap();
    let after = capture.new_blocks.lock().unwrap().clone();
    assert_eq!(after, delivered);
}

#[test]
fn sync_progress_arrives_in_emission_order_across_threads() {
    let capture = Arc::new(Capture::default());
    let adapter = Arc::new(ListenerAdapter::new(callbacks_for(&capture)));
    // Engine-style emission lock: the height sequence and its delivery are
    // one critical section, as an engine's sync loop would hold its own
    // state lock while notifying.
    let emission = Arc::new(Mutex::new(0u64));

    let mut handles = Vec::new();
    for _ in 0..4 {
        let adapter = Arc::clone(&adapter);
        let emission = Arc::clone(&emission);
        handles.push(thread::spawn(move || {
            for _ in 0..5 {
                let mut next = emission.lock().unwrap();
                let height = *next;
                *next += 1;
                adapter
                    .on_sync_progress(height, 0, 20, height as f64 / 20.0, "s")
                    .unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let heights: Vec<u64> = capture
        .sync_messages
        .lock()
        .unwrap()
        .iter()
        .map(|m| m.split(':').next().unwrap().parse().unwrap())
        .collect();
    assert_eq!(heights.len(), 20);
    assert!(heights.windows(2).all(|w| w[0] <= w[1]), "{heights:?}");
}

#[test]
fn concurrent_deliveries_are_serialized() {
    let capture = Arc::new(Capture::default());
    let adapter = Arc::new(ListenerAdapter::new(callbacks_for(&capture)));

    let mut handles = Vec::new();
    for height in 0..8u64 {
        let adapter = Arc::clone(&adapter);
        handles.push(thread::spawn(move || adapter.on_new_block(height)));
    }
    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    let mut delivered = capture.new_blocks.lock().unwrap().clone();
    delivered.sort_unstable();
    assert_eq!(delivered, (0..8).collect::<Vec<_>>());
}
