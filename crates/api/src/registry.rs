//! In-memory claims on strings that are about to be persisted as unique keys.
//!
//! The storage layer only learns about a username or token once its row is
//! inserted. Between the existence check and the insert, a claim here keeps a
//! concurrent registration from settling on the same string.

use dashmap::DashMap;

#[derive(Debug, Default)]
pub struct Registry(DashMap<Box<str>, ()>);

impl Registry {
    /// Claims the candidate. Returns `false` if someone else already holds it.
    pub fn claim(&self, candidate: &str) -> bool {
        use dashmap::mapref::entry::Entry::Vacant;
        if let Vacant(entry) = self.0.entry(candidate.into()) {
            entry.insert(());
            true
        } else {
            false
        }
    }

    pub fn release(&self, candidate: &str) {
        self.0.remove(candidate);
    }

    /// Claims the candidate for as long as the returned guard lives.
    pub fn reserve(&self, candidate: &str) -> Option<Reservation<'_>> {
        self.claim(candidate).then(|| Reservation { registry: self, candidate: candidate.into() })
    }

    pub fn is_claimed(&self, candidate: &str) -> bool {
        self.0.contains_key(candidate)
    }
}

/// Releases its claim when dropped.
#[derive(Debug)]
pub struct Reservation<'r> {
    registry: &'r Registry,
    candidate: Box<str>,
}

impl Reservation<'_> {
    pub fn as_str(&self) -> &str {
        &self.candidate
    }
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        self.registry.release(&self.candidate);
    }
}

#[cfg(test)]
mod tests {
    use super::Registry;
    use std::{
        sync::{Arc, Barrier},
        thread,
    };

    #[test]
    fn only_one_concurrent_claim_wins() {
        const THREADS: usize = 16;
        let registry = Arc::new(Registry::default());
        let barrier = Arc::new(Barrier::new(THREADS));
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let registry = registry.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    registry.claim("bob")
                })
            })
            .collect();

        let wins = handles.into_iter().map(|handle| handle.join().unwrap()).filter(|&won| won).count();
        assert_eq!(wins, 1);
        assert!(registry.is_claimed("bob"));
    }

    #[test]
    fn released_candidates_can_be_claimed_again() {
        let registry = Registry::default();
        assert!(registry.claim("bob"));
        assert!(!registry.claim("bob"));
        registry.release("bob");
        assert!(registry.claim("bob"));
        assert!(registry.claim("alice"));
    }

    #[test]
    fn reservations_release_on_drop() {
        let registry = Registry::default();
        let reservation = registry.reserve("bob").unwrap();
        assert_eq!(reservation.as_str(), "bob");
        assert!(registry.reserve("bob").is_none());
        drop(reservation);
        assert!(!registry.is_claimed("bob"));
        assert!(registry.reserve("bob").is_some());
    }
}
