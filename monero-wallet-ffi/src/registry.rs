//! Process-wide registry of live wallet and listener instances.
//!
//! Handles crossing the boundary are opaque `u64` values, never raw pointers.
//! Each handle packs a slot index and a generation counter; releasing a slot
//! bumps its generation, so a stale handle can never resolve to a later
//! occupant of the same slot. Zero is reserved as the error sentinel and is
//! never issued.

use std::sync::{Arc, Mutex};

use monero_wallet::{WalletEngine, WalletError};
use once_cell::sync::Lazy;

use crate::listener::ListenerAdapter;

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Generation-tagged arena of live instances.
pub struct HandleTable<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
}

impl<T> HandleTable<T> {
    pub fn new() -> Self {
        HandleTable {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    fn encode(generation: u32, index: usize) -> u64 {
        ((generation as u64) << 32) | (index as u64 + 1)
    }

    fn decode(handle: u64) -> Option<(u32, usize)> {
        let low = handle & 0xffff_ffff;
        if low == 0 {
            return None;
        }
        Some(((handle >> 32) as u32, (low - 1) as usize))
    }

    pub fn insert(&mut self, value: T) -> u64 {
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.value = Some(value);
                Self::encode(slot.generation, index)
            }
            None => {
                let index = self.slots.len();
                self.slots.push(Slot {
                    generation: 0,
                    value: Some(value),
                });
                Self::encode(0, index)
            }
        }
    }

    pub fn get(&self, handle: u64) -> Option<&T> {
        let (generation, index) = Self::decode(handle)?;
        let slot = self.slots.get(index)?;
        if slot.generation != generation {
            return None;
        }
        slot.value.as_ref()
    }

    /// Release the slot; its generation is bumped so the handle goes stale.
    pub fn remove(&mut self, handle: u64) -> Option<T> {
        let (generation, index) = Self::decode(handle)?;
        let slot = self.slots.get_mut(index)?;
        if slot.generation != generation {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index);
        Some(value)
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.value.is_some()).count()
    }
}

impl<T> Default for HandleTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A wallet instance together with its currently relayed listener, if any.
///
/// The listener pairing is tracked here so that closing the wallet can tear
/// the relay down in the right order: detach from the engine first, then
/// neutralize the adapter, then drop the registry entry.
pub struct WalletInstance {
    pub engine: Box<dyn WalletEngine>,
    pub listener: Mutex<Option<(u64, Arc<ListenerAdapter>)>>,
}

impl std::fmt::Debug for WalletInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletInstance").finish_non_exhaustive()
    }
}

impl WalletInstance {
    pub fn new(engine: Box<dyn WalletEngine>) -> Self {
        WalletInstance {
            engine,
            listener: Mutex::new(None),
        }
    }
}

pub struct Registry {
    pub wallets: Mutex<HandleTable<Arc<WalletInstance>>>,
    pub listeners: Mutex<HandleTable<Arc<ListenerAdapter>>>,
}

pub static REGISTRY: Lazy<Registry> = Lazy::new(|| Registry {
    wallets: Mutex::new(HandleTable::new()),
    listeners: Mutex::new(HandleTable::new()),
});

impl Registry {
    /// Resolve a wallet handle to its instance.
    ///
    /// Clones the `Arc` and releases the table lock before returning, so
    /// blocking engine calls never run under the registry lock.
    pub fn resolve_wallet(&self, handle: u64) -> Result<Arc<WalletInstance>, WalletError> {
        self.wallets
            .lock()
            .unwrap()
            .get(handle)
            .cloned()
            .ok_or_else(|| WalletError::Wallet("invalid wallet handle".to_string()))
    }

    pub fn insert_wallet(&self, instance: Arc<WalletInstance>) -> u64 {
        self.wallets.lock().unwrap().insert(instance)
    }

    pub fn remove_wallet(&self, handle: u64) -> Option<Arc<WalletInstance>> {
        self.wallets.lock().unwrap().remove(handle)
    }

    pub fn insert_listener(&self, adapter: Arc<ListenerAdapter>) -> u64 {
        self.listeners.lock().unwrap().insert(adapter)
    }

    pub fn remove_listener(&self, handle: u64) -> Option<Arc<ListenerAdapter>> {
        self.listeners.lock().unwrap().remove(handle)
    }
}
