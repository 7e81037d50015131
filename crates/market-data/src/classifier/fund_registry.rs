use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Instant;

use crate::cache::TTL_FUND_REGISTRY;

/// Snapshot of the TEFAS fund universe: code to fund name.
///
/// Readers always see the last committed snapshot; a refresh in flight
/// never blocks classification. An empty registry simply means the fund
/// rule cannot match yet.
#[derive(Default)]
pub struct FundRegistry {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    funds: HashMap<String, String>,
    loaded_at: Option<Instant>,
}

impl FundRegistry {
    pub fn new() -> Self {
        FundRegistry::default()
    }

    pub fn contains(&self, code: &str) -> bool {
        match self.inner.read() {
            Ok(inner) => inner.funds.contains_key(code),
            Err(poisoned) => poisoned.into_inner().funds.contains_key(code),
        }
    }

    pub fn name_of(&self, code: &str) -> Option<String> {
        match self.inner.read() {
            Ok(inner) => inner.funds.get(code).cloned(),
            Err(poisoned) => poisoned.into_inner().funds.get(code).cloned(),
        }
    }

    pub fn len(&self) -> usize {
        match self.inner.read() {
            Ok(inner) => inner.funds.len(),
            Err(poisoned) => poisoned.into_inner().funds.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when the snapshot is missing or older than its TTL; the
    /// refresh job uses this to skip redundant syncs.
    pub fn is_stale(&self) -> bool {
        let loaded_at = match self.inner.read() {
            Ok(inner) => inner.loaded_at,
            Err(poisoned) => poisoned.into_inner().loaded_at,
        };
        match loaded_at {
            Some(at) => at.elapsed() >= TTL_FUND_REGISTRY,
            None => true,
        }
    }

    /// Atomically replaces the snapshot.
    pub fn replace(&self, funds: HashMap<String, String>) {
        let mut inner = match self.inner.write() {
            Ok(inner) => inner,
            Err(poisoned) => poisoned.into_inner(),
        };
        inner.funds = funds;
        inner.loaded_at = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_registry_matches_nothing() {
        let reg = FundRegistry::new();
        assert!(reg.is_stale());
        assert!(!reg.contains("AFA"));
    }

    #[test]
    fn test_replace_commits_atomically() {
        let reg = FundRegistry::new();
        reg.replace(HashMap::from([(
            "AFA".to_string(),
            "Ak Portfoy Alternatif Enerji".to_string(),
        )]));
        assert!(reg.contains("AFA"));
        assert!(!reg.is_stale());
        assert_eq!(reg.name_of("AFA").as_deref(), Some("Ak Portfoy Alternatif Enerji"));
    }
}
