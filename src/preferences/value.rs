//! Reactive, persisted preference values.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use log::{debug, error, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::OnceCell;

use crate::config::PREFERENCES_KEY_PREFIX;
use crate::error_handling::StorageError;
use crate::storage::{read_json, write_json, StorageArea, StorageTier, StorageTiers};

/// Callback invoked with the new value after every `set`.
pub type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct ValueState<T> {
    value: T,
    // Insertion ordered; ids are unique
    listeners: Vec<(String, Listener<T>)>,
}

/// A named, typed value persisted in one storage tier.
///
/// The in-memory copy is the source of truth for the process: `set` updates it
/// and notifies listeners synchronously, then persists in the background.
/// Background writes of one value are applied one at a time and a write is
/// dropped once a newer `set` has queued its own, so storage settles on the
/// value `get` returns. Persistence failures are logged and never reach the
/// caller.
pub struct PreferenceValue<T> {
    name: &'static str,
    tier: StorageTier,
    default: T,
    state: Mutex<ValueState<T>>,
    area: OnceLock<Arc<dyn StorageArea>>,
    ready: OnceCell<()>,
    // Bumped under the state lock by every persisted `set`
    generation: Arc<AtomicU64>,
    // Held across each storage write of this value
    writer: Arc<tokio::sync::Mutex<()>>,
}

impl<T> PreferenceValue<T>
where
    T: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    /// Creates a value that starts at `default` until initialized.
    pub fn new(name: &'static str, tier: StorageTier, default: T) -> Self {
        Self {
            name,
            tier,
            state: Mutex::new(ValueState {
                value: default.clone(),
                listeners: Vec::new(),
            }),
            default,
            area: OnceLock::new(),
            ready: OnceCell::new(),
            generation: Arc::new(AtomicU64::new(0)),
            writer: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn tier(&self) -> StorageTier {
        self.tier
    }

    /// Value used until initialization, and kept when storage has none.
    pub fn default_value(&self) -> &T {
        &self.default
    }

    /// Key this value is stored under in its tier.
    pub fn storage_key(&self) -> String {
        format!("{PREFERENCES_KEY_PREFIX}{}", self.name)
    }

    /// Returns true once `init_defaults` has completed.
    pub fn is_ready(&self) -> bool {
        self.ready.initialized()
    }

    /// Binds the value to its tier. Runs once per process; later calls return
    /// immediately.
    ///
    /// A decodable stored value replaces the in-memory one. Otherwise the
    /// in-memory value is kept: the default, or whatever was `set` before
    /// initialization. It is written through when the tier has nothing under
    /// the key, and left unwritten when the read failed or the stored value
    /// did not decode. The value is marked ready in every case.
    pub async fn init_defaults(&self, tiers: &StorageTiers) {
        self.ready
            .get_or_init(|| async {
                let area = Arc::clone(tiers.area(self.tier));
                let loaded = read_json::<T>(area.as_ref(), &self.storage_key()).await;

                // Binding under the state lock splits every `set` cleanly into
                // before (memory only) and after (persisted)
                let write_through = {
                    let mut state = self.lock();
                    let _ = self.area.set(area);
                    match loaded {
                        Ok(Some(stored)) => {
                            debug!("Loaded preference '{}' = {:?}", self.name, stored);
                            state.value = stored;
                            false
                        }
                        Ok(None) => true,
                        Err(e) => {
                            warn!(
                                "Failed to load preference '{}', keeping {:?}: {}",
                                self.name, state.value, e
                            );
                            false
                        }
                    }
                };

                if write_through {
                    if let Err(e) = self.save().await {
                        error!("Failed to write default for preference '{}': {}", self.name, e);
                    }
                }
            })
            .await;
    }

    /// Returns a copy of the current value.
    ///
    /// Before initialization this is the default or the last value `set`;
    /// initialization replaces it only with a decodable stored value.
    pub fn get(&self) -> T {
        if !self.is_ready() {
            debug!("Preference '{}' read before initialization", self.name);
        }
        self.lock().value.clone()
    }

    /// Replaces the value, notifies listeners, and persists without waiting.
    ///
    /// Before initialization the change stays in memory. `init_defaults` then
    /// keeps it unless the tier holds a stored value.
    pub fn set(&self, value: T) {
        let (listeners, pending) = {
            let mut state = self.lock();
            state.value = value.clone();
            let pending = self.area.get().cloned().map(|area| {
                let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
                (area, generation)
            });
            let listeners: Vec<Listener<T>> =
                state.listeners.iter().map(|(_, l)| Arc::clone(l)).collect();
            (listeners, pending)
        };

        // Listeners run outside the lock so they may read the value back
        for listener in listeners {
            listener(&value);
        }

        match pending {
            Some((area, generation)) => self.persist(area, generation, value),
            None => debug!(
                "Preference '{}' not initialized; keeping change in memory only",
                self.name
            ),
        }
    }

    /// Registers `callback` under `id`, replacing any listener with that id.
    pub fn add_listener<F>(&self, id: impl Into<String>, callback: F)
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = id.into();
        let callback: Listener<T> = Arc::new(callback);
        let mut state = self.lock();
        match state.listeners.iter_mut().find(|(existing, _)| *existing == id) {
            Some(slot) => slot.1 = callback,
            None => state.listeners.push((id, callback)),
        }
    }

    /// Removes the listener registered under `id`. Returns whether one existed.
    pub fn remove_listener(&self, id: &str) -> bool {
        let mut state = self.lock();
        let before = state.listeners.len();
        state.listeners.retain(|(existing, _)| existing != id);
        state.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    /// Writes the current value to its tier and waits for the write.
    ///
    /// For callers that exit right after `set` and cannot rely on the
    /// background write finishing. Waits behind any background write already
    /// in progress. Does nothing before initialization.
    pub async fn save(&self) -> Result<(), StorageError> {
        let Some(area) = self.area.get().cloned() else {
            return Ok(());
        };
        let _guard = self.writer.lock().await;
        let current = self.get();
        write_json(area.as_ref(), &self.storage_key(), &current).await
    }

    fn persist(&self, area: Arc<dyn StorageArea>, generation: u64, value: T) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!(
                "No async runtime to persist preference '{}'; keeping change in memory only",
                self.name
            );
            return;
        };

        let key = self.storage_key();
        let latest = Arc::clone(&self.generation);
        let writer = Arc::clone(&self.writer);
        handle.spawn(async move {
            let _guard = writer.lock().await;
            if latest.load(Ordering::SeqCst) != generation {
                debug!("Skipping superseded write of preference '{}'", key);
                return;
            }
            if let Err(e) = write_json(area.as_ref(), &key, &value).await {
                error!("Failed to persist preference '{}': {}", key, e);
            }
        });
    }

    fn lock(&self) -> MutexGuard<'_, ValueState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
