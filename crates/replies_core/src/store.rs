use std::collections::HashSet;

use crate::PostSnapshot;

/// Identity-keyed, append-only accumulator of post snapshots.
///
/// The first snapshot seen for an identity wins; later renderings of the same
/// post are ignored even when their markup differs. Iteration follows
/// insertion order so formatting is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CollectionStore {
    seen: HashSet<String>,
    snapshots: Vec<PostSnapshot>,
}

impl CollectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `snapshot` unless its identity is already present.
    /// Returns whether the store grew.
    pub fn upsert_if_absent(&mut self, snapshot: PostSnapshot) -> bool {
        if self.seen.contains(&snapshot.identity) {
            return false;
        }
        self.seen.insert(snapshot.identity.clone());
        self.snapshots.push(snapshot);
        true
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.seen.contains(identity)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &PostSnapshot> {
        self.snapshots.iter()
    }

    pub fn into_snapshots(self) -> Vec<PostSnapshot> {
        self.snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::CollectionStore;
    use crate::PostSnapshot;

    #[test]
    fn first_write_wins() {
        let mut store = CollectionStore::new();
        assert!(store.upsert_if_absent(PostSnapshot::new("/a/status/1", "<article>v1</article>")));
        assert!(!store.upsert_if_absent(PostSnapshot::new("/a/status/1", "<article>v2</article>")));
        assert!(store.upsert_if_absent(PostSnapshot::new("/a/status/2", "<article>b</article>")));

        assert_eq!(store.len(), 2);
        assert!(store.contains("/a/status/1"));
        let markups: Vec<_> = store.values().map(|s| s.raw_markup.as_str()).collect();
        assert_eq!(markups, vec!["<article>v1</article>", "<article>b</article>"]);
    }
}
