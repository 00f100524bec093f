/// SHA-256 fingerprint of the order state of whole containers.
///
/// Taken right after an optimistic apply and compared again before the undo
/// runs. A mismatch means some other mutation touched the same containers in
/// the meantime (reordered, appended, removed or moved items out) and a blind
/// undo would corrupt the ordering.
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::types::{Arena, Orderable};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderFingerprint(pub String);

impl OrderFingerprint {
    /// Fingerprint every member `(uid, order, container)` of each container,
    /// in display order. `None` is the top level.
    pub fn capture<T: Orderable>(arena: &Arena<T>, containers: &[Option<String>]) -> Self {
        let mut hasher = Sha256::new();
        for container in containers {
            hasher.update(b"container");
            hash_container(&mut hasher, container.as_deref());
            for uid in arena.container_list(container.as_deref()) {
                hasher.update(uid.as_bytes());
                hasher.update([0u8]);
                if let Some(item) = arena.get(&uid) {
                    hasher.update((item.order() as u64).to_le_bytes());
                    hash_container(&mut hasher, item.container_uid());
                }
                hasher.update([0xffu8]);
            }
        }
        Self(hex::encode(hasher.finalize()))
    }
}

fn hash_container(hasher: &mut Sha256, container: Option<&str>) {
    match container {
        Some(uid) => {
            hasher.update([1u8]);
            hasher.update(uid.as_bytes());
            hasher.update([0u8]);
        }
        None => hasher.update([0u8]),
    }
}
