use std::collections::{BTreeMap, HashMap};

use crate::capability::Capability;

use super::{Mirror, RotationQueue};

/// Initial mirror order per capability, as read from the mirror list source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MirrorList {
    entries: BTreeMap<Capability, Vec<Mirror>>,
}

impl MirrorList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter, replacing any previous list for `capability`.
    pub fn with<I, S>(mut self, capability: Capability, mirrors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Mirror>,
    {
        self.insert(capability, mirrors.into_iter().map(Into::into).collect());
        self
    }

    pub fn insert(&mut self, capability: Capability, mirrors: Vec<Mirror>) {
        self.entries.insert(capability, mirrors);
    }

    pub fn mirrors(&self, capability: Capability) -> &[Mirror] {
        self.entries
            .get(&capability)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn total(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}

/// Owner of every capability's rotation queue.
///
/// Built once at startup and shared by handle with the fetcher and the
/// routing layer. Every capability has a queue; capabilities absent from the
/// list get an empty one.
#[derive(Debug)]
pub struct MirrorRegistry {
    queues: HashMap<Capability, RotationQueue>,
}

impl MirrorRegistry {
    pub fn new(list: MirrorList) -> Self {
        let mut entries = list.entries;
        let queues = Capability::ALL
            .into_iter()
            .map(|capability| {
                let mirrors = entries.remove(&capability).unwrap_or_default();
                (capability, RotationQueue::new(mirrors))
            })
            .collect();
        Self { queues }
    }

    pub fn queue(&self, capability: Capability) -> &RotationQueue {
        // Populated for every variant in `new`.
        &self.queues[&capability]
    }

    /// Current order of every queue.
    pub async fn snapshot(&self) -> BTreeMap<Capability, Vec<Mirror>> {
        let mut snapshot = BTreeMap::new();
        for capability in Capability::ALL {
            snapshot.insert(capability, self.queue(capability).peek().await);
        }
        snapshot
    }
}
