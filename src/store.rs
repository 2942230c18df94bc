//! Envelope storage seam.
//!
//! Persisting protocols is the host's business. The library only needs to
//! fetch an envelope by contract-number key or the most recently saved one.
//! [`MemoryStore`] is enough for tests, the CLI and the wasm bindings.

use tracing::debug;

use crate::mapper::ProtocolMapper;
use crate::types::{Envelope, ProtocolConstruct};

/// Source of protocol envelopes. A miss returns `None`, never an error.
pub trait ProtocolStore {
    fn fetch(&self, key: &str) -> Option<Envelope>;
    fn fetch_latest(&self) -> Option<Envelope>;
}

/// Envelopes kept in save order; the last saved is the latest.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Vec<(String, Envelope)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save under `key`. Re-saving an existing key replaces it and makes it latest.
    pub fn save(&mut self, key: impl Into<String>, envelope: Envelope) {
        let key = key.into();
        self.entries.retain(|(k, _)| *k != key);
        self.entries.push((key, envelope));
    }

    /// Save under the envelope's own contract number.
    pub fn save_envelope(&mut self, envelope: Envelope) {
        let key = envelope.meta.contract_number.clone();
        self.save(key, envelope);
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ProtocolStore for MemoryStore {
    fn fetch(&self, key: &str) -> Option<Envelope> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, env)| env.clone())
    }

    fn fetch_latest(&self) -> Option<Envelope> {
        self.entries.last().map(|(_, env)| env.clone())
    }
}

/// Fetch by key (or the latest when `key` is `None`) and map.
pub fn load_construct<S: ProtocolStore + ?Sized>(
    store: &S,
    mapper: &ProtocolMapper,
    key: Option<&str>,
) -> Option<ProtocolConstruct> {
    let envelope = match key {
        Some(key) => store.fetch(key),
        None => store.fetch_latest(),
    };
    let Some(envelope) = envelope else {
        debug!(key, "no stored protocol found");
        return None;
    };

    debug!(
        wire = ?envelope.protocol.installations.iter().map(|i| i.name.as_str()).collect::<Vec<_>>(),
        "loaded protocol envelope"
    );
    let construct = mapper.to_construct(&envelope);
    debug!(
        mapped = ?construct.installations.iter().map(|i| i.name.as_str()).collect::<Vec<_>>(),
        "mapped protocol installations"
    );
    Some(construct)
}
