//! Process-wide extension state.
//!
//! Created empty at startup, seeded once from the host, then mutated only by
//! whole-list replacement. The host remains the system of record: every
//! mutation is followed by a persist call that serializes the current list
//! and hands it across the bridge. Replace and persist are issued
//! back-to-back from UI event handlers on the single UI thread, so the
//! persisted payload always reflects the just-applied mutation.

use tracing::debug;

use crate::bridge::HostBridge;
use crate::extensions::{serialize_extensions, Extension};

#[derive(Default)]
pub struct ExtensionStore {
    extensions: Vec<Extension>,
}

impl ExtensionStore {
    /// Empty store, awaiting the startup load.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with the startup load result.
    pub fn seeded(extensions: Vec<Extension>) -> Self {
        Self { extensions }
    }

    pub fn extensions(&self) -> &[Extension] {
        &self.extensions
    }

    /// Replace the whole list. The only mutation entry point; there is no
    /// partial or patch API.
    pub fn set_extensions(&mut self, extensions: Vec<Extension>) {
        debug!(count = extensions.len(), "Replacing extension list");
        self.extensions = extensions;
    }

    /// Serialize the list as it is *now* and hand it to the host.
    /// Reads at call time rather than from a snapshot, since callers issue
    /// `set_extensions` and `persist` as two back-to-back calls.
    pub fn persist(&self, bridge: &dyn HostBridge) {
        bridge.set_extensions(serialize_extensions(&self.extensions));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::test_support::FakeBridge;
    use crate::extensions::test_fixtures::sample_extensions;
    use crate::extensions::{parse_extensions, toggle_extension};

    #[test]
    fn starts_empty_and_seeds_once() {
        let store = ExtensionStore::new();
        assert!(store.extensions().is_empty());

        let store = ExtensionStore::seeded(sample_extensions());
        assert_eq!(store.extensions().len(), 2);
    }

    #[test]
    fn persist_hands_the_current_list_to_the_bridge() {
        let bridge = FakeBridge::new("[]");
        let mut store = ExtensionStore::seeded(sample_extensions());

        let toggled = toggle_extension(store.extensions(), "Foo");
        store.set_extensions(toggled.clone());
        store.persist(&bridge);

        let payload = bridge.last_set_payload().expect("persist was invoked");
        assert_eq!(parse_extensions(&payload).unwrap(), toggled);
    }

    #[test]
    fn persist_reads_at_call_time_not_a_snapshot() {
        let bridge = FakeBridge::new("[]");
        let mut store = ExtensionStore::seeded(sample_extensions());

        // Two replace+persist rounds; the second payload must reflect the
        // second replacement, not anything stale.
        let first = toggle_extension(store.extensions(), "Foo");
        store.set_extensions(first);
        store.persist(&bridge);

        let second = toggle_extension(store.extensions(), "Foo");
        store.set_extensions(second.clone());
        store.persist(&bridge);

        let payloads = bridge.set_payloads.lock().unwrap();
        assert_eq!(payloads.len(), 2);
        assert_eq!(parse_extensions(&payloads[1]).unwrap(), second);
        // Toggling twice restored the original.
        assert_eq!(second, sample_extensions());
    }
}
