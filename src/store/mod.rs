use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::{Challenge, ChallengeStatus, ShareRecord};

/// Process-local storage for challenges and shares.
///
/// Everything here is lost on restart. Persistence is a deliberate
/// non-goal of the demo backend; swapping this handle for a real
/// database client is the intended production path.
#[derive(Clone, Default)]
pub struct Store {
    inner: Arc<RwLock<StoreInner>>,
}

#[derive(Default)]
struct StoreInner {
    challenges: HashMap<String, Challenge>,
    shares: Vec<ShareRecord>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_challenge(&self, challenge: Challenge) {
        let mut inner = self.inner.write().await;
        inner.challenges.insert(challenge.id.clone(), challenge);
    }

    pub async fn get_challenge(&self, id: &str) -> Option<Challenge> {
        let inner = self.inner.read().await;
        inner.challenges.get(id).cloned()
    }

    /// Pending challenges addressed to the given fid, newest first.
    pub async fn pending_challenges_for(&self, fid: u64) -> Vec<Challenge> {
        let inner = self.inner.read().await;
        let mut challenges: Vec<Challenge> = inner
            .challenges
            .values()
            .filter(|c| c.to.fid == fid && c.status == ChallengeStatus::Pending)
            .cloned()
            .collect();
        challenges.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        challenges
    }

    pub async fn record_share(&self, share: ShareRecord) {
        let mut inner = self.inner.write().await;
        inner.shares.push(share);
    }

    pub async fn share_count(&self) -> usize {
        let inner = self.inner.read().await;
        inner.shares.len()
    }
}
