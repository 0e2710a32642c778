use crate::io::slot::StoreError;
use crate::io::store::StateStore;
use crate::model::config::DEFAULT_STORAGE_KEY;
use crate::model::state::StoredData;

/// Error type for payload import/export
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("not a tracker export: {0}")]
    InvalidPayload(#[from] serde_json::Error),
    #[error("not a tracker export: expected a JSON object")]
    NotAnObject,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// File name offered for exports
pub fn export_file_name() -> String {
    format!("{}.json", DEFAULT_STORAGE_KEY)
}

/// The current payload as pretty JSON.
pub fn export_payload(store: &StateStore) -> Result<String, TransferError> {
    Ok(serde_json::to_string_pretty(store.data())?)
}

/// Replace the durable payload with an exported one, then resynchronize the
/// store. Returns the payload now in effect.
///
/// The text must be a JSON object; individual malformed entries inside it
/// are coerced the same way a normal load coerces them.
pub fn import_payload(store: &mut StateStore, text: &str) -> Result<StoredData, TransferError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    if !value.is_object() {
        return Err(TransferError::NotAnObject);
    }
    let data: StoredData = serde_json::from_value(value)?;
    store.write_durable(&serde_json::to_string(&data)?)?;
    store.reload_from_durable();
    Ok(data)
}
