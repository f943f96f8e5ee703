//! Storage feature-availability probes.
//!
//! A trivial write + delete per mechanism; any exception means "unavailable".

use super::dom;
use super::{ProbeError, StorageSignals};
use web_sys::Storage;

const PROBE_KEY: &str = "__widget_storage_probe__";

pub fn probe_storage() -> Result<StorageSignals, ProbeError> {
    let window = dom::window()?;

    let session_storage = matches!(window.session_storage(), Ok(Some(ref s)) if write_and_delete(s));
    let local_storage = matches!(window.local_storage(), Ok(Some(ref s)) if write_and_delete(s));
    let indexed_db = matches!(window.indexed_db(), Ok(Some(_)));

    Ok(StorageSignals {
        session_storage,
        local_storage,
        indexed_db,
    })
}

fn write_and_delete(storage: &Storage) -> bool {
    storage.set_item(PROBE_KEY, PROBE_KEY).is_ok() && storage.remove_item(PROBE_KEY).is_ok()
}
