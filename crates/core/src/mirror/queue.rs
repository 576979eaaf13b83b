//! Per-capability rotation queue.

use std::collections::HashSet;
use tokio::sync::RwLock;

use super::Mirror;

/// Ordered, duplicate-free list of candidate mirrors for one capability.
///
/// Membership is fixed at construction. The only mutation is [`demote`],
/// which moves a mirror to the tail, so mirrors that keep failing drift to
/// the back while healthy ones end up at the front.
///
/// [`demote`]: RotationQueue::demote
#[derive(Debug, Default)]
pub struct RotationQueue {
    mirrors: RwLock<Vec<Mirror>>,
}

impl RotationQueue {
    /// Create a queue from an initial order. Later duplicates are dropped.
    pub fn new<I>(mirrors: I) -> Self
    where
        I: IntoIterator<Item = Mirror>,
    {
        let mut seen = HashSet::new();
        let mirrors = mirrors
            .into_iter()
            .filter(|m| seen.insert(m.clone()))
            .collect();
        Self {
            mirrors: RwLock::new(mirrors),
        }
    }

    /// Current order, head first.
    pub async fn peek(&self) -> Vec<Mirror> {
        self.mirrors.read().await.clone()
    }

    /// Move `mirror` to the tail, keeping the relative order of the rest.
    ///
    /// Returns `false` (and changes nothing) if the mirror is not a member.
    pub async fn demote(&self, mirror: &str) -> bool {
        let mut mirrors = self.mirrors.write().await;
        match mirrors.iter().position(|m| m == mirror) {
            Some(index) => {
                let demoted = mirrors.remove(index);
                mirrors.push(demoted);
                true
            }
            None => false,
        }
    }

    pub async fn len(&self) -> usize {
        self.mirrors.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.mirrors.read().await.is_empty()
    }
}
