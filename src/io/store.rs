use crate::io::slot::{StorageSlot, StoreError};
use crate::model::state::{CheckedStates, StoredData, ViewPreferences};

/// Events emitted by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    /// A mutation was written to the durable slot
    Saved,
    /// The in-memory payload was replaced wholesale from the durable slot
    Reinitialized,
}

/// Handle returned by [`StateStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&StoreEvent)>;

/// Owns the persisted payload and the slot backing it.
///
/// Reads go through [`StateStore::data`]; writes go through `crate::ops::mutation`.
pub struct StateStore {
    slot: Box<dyn StorageSlot>,
    data: StoredData,
    search_query: String,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl StateStore {
    /// Open a store over `slot`, loading whatever it holds.
    pub fn open(slot: impl StorageSlot + 'static) -> Self {
        let slot: Box<dyn StorageSlot> = Box::new(slot);
        let data = load(slot.as_ref());
        StateStore {
            slot,
            data,
            search_query: String::new(),
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn data(&self) -> &StoredData {
        &self.data
    }

    pub fn checked_states(&self) -> &CheckedStates {
        &self.data.checked_states
    }

    pub fn view_preferences(&self) -> ViewPreferences {
        ViewPreferences {
            hide_completed_items: self.data.hide_completed_items,
            active_search_query: self.search_query.clone(),
        }
    }

    pub(crate) fn checked_states_mut(&mut self) -> &mut CheckedStates {
        &mut self.data.checked_states
    }

    pub(crate) fn set_hide_completed_flag(&mut self, hide: bool) {
        self.data.hide_completed_items = hide;
    }

    pub(crate) fn set_search_query_text(&mut self, query: &str) {
        self.search_query = query.to_string();
    }

    /// Write the whole payload. Failures are logged and swallowed; the
    /// in-memory payload stays authoritative. Listeners hear about
    /// successful writes only.
    pub fn save(&mut self) {
        match self.try_save() {
            Ok(()) => self.notify_changed(),
            Err(e) => tracing::error!(error = %e, "could not save tracker state"),
        }
    }

    fn try_save(&mut self) -> Result<(), StoreError> {
        let content = serde_json::to_string(&self.data)?;
        self.slot.write(&content)
    }

    /// Tell listeners the persisted state changed.
    pub fn notify_changed(&mut self) {
        self.emit(StoreEvent::Saved);
    }

    /// Replace the in-memory payload with what the durable slot now holds.
    /// Used after something outside the store rewrote the slot.
    pub fn reload_from_durable(&mut self) {
        self.data = load(self.slot.as_ref());
        tracing::info!(
            items = self.data.checked_states.len(),
            "tracker state reloaded from storage"
        );
        self.emit(StoreEvent::Reinitialized);
    }

    /// Overwrite the durable slot with a raw blob, without touching memory.
    pub(crate) fn write_durable(&mut self, contents: &str) -> Result<(), StoreError> {
        self.slot.write(contents)
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&StoreEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    fn emit(&mut self, event: StoreEvent) {
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }
}

/// Read the payload from `slot`. Missing or unreadable data yields the
/// empty default.
pub fn load(slot: &dyn StorageSlot) -> StoredData {
    let content = match slot.read() {
        Ok(Some(content)) => content,
        Ok(None) => return StoredData::default(),
        Err(e) => {
            tracing::warn!(error = %e, "could not read tracker state, starting empty");
            return StoredData::default();
        }
    };
    match serde_json::from_str(&content) {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!(error = %e, "stored tracker state is corrupt, starting empty");
            StoredData::default()
        }
    }
}
