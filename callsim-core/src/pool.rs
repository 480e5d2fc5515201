//! ## callsim-core::pool
//! **Fixed-size token pools**
//!
//! A pool owns a fixed backing array of unique tokens plus a stack of free
//! indices. Checkout pops an index, return pushes it back. The caller holds a
//! [`Lease`] for every checked-out token; leases are not `Clone`, so a token can
//! only be returned once per checkout.

use crate::SimulationError;

/// A checked-out token. Returned to its pool with [`ResourcePool::release`].
#[derive(Debug, PartialEq, Eq)]
pub struct Lease<T> {
    slot: usize,
    token: T,
}

impl<T: Copy> Lease<T> {
    #[inline]
    pub fn token(&self) -> T {
        self.token
    }

    #[inline]
    pub fn slot(&self) -> usize {
        self.slot
    }
}

#[derive(Debug)]
pub struct ResourcePool<T> {
    tokens: Box<[T]>,
    free_indices: Vec<usize>,
    leased: Vec<bool>,
}

impl<T: Copy> ResourcePool<T> {
    /// Builds a pool from its tokens. Every token starts available and the
    /// first checkout hands out `tokens[0]`.
    pub fn from_tokens(tokens: Vec<T>) -> Self {
        let capacity = tokens.len();
        Self {
            tokens: tokens.into_boxed_slice(),
            free_indices: (0..capacity).rev().collect(),
            leased: vec![false; capacity],
        }
    }

    /// Checks a token out, or returns `None` if every token is leased.
    pub fn acquire(&mut self) -> Option<Lease<T>> {
        let slot = self.free_indices.pop()?;
        self.leased[slot] = true;
        Some(Lease {
            slot,
            token: self.tokens[slot],
        })
    }

    /// Returns a leased token to the pool.
    pub fn release(&mut self, lease: Lease<T>) -> Result<(), SimulationError> {
        match self.leased.get_mut(lease.slot) {
            Some(leased) if *leased => {
                *leased = false;
                self.free_indices.push(lease.slot);
                Ok(())
            }
            Some(_) => Err(SimulationError::Inconsistent(format!(
                "pool slot {} returned while not checked out",
                lease.slot
            ))),
            None => Err(SimulationError::Inconsistent(format!(
                "pool slot {} out of range (capacity {})",
                lease.slot,
                self.capacity()
            ))),
        }
    }

    /// Number of tokens currently available.
    #[inline]
    pub fn available(&self) -> usize {
        self.free_indices.len()
    }

    /// Number of tokens currently checked out.
    #[inline]
    pub fn checked_out(&self) -> usize {
        self.capacity() - self.available()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.tokens.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_pool_hands_out_tokens_in_order() {
        let mut pool = ResourcePool::from_tokens(vec![10u32, 11, 12]);
        assert_eq!(pool.acquire().map(|l| l.token()), Some(10));
        assert_eq!(pool.acquire().map(|l| l.token()), Some(11));
        assert_eq!(pool.checked_out(), 2);
        assert_eq!(pool.available(), 1);
    }

    #[test]
    fn test_pool_exhaustion() {
        let mut pool = ResourcePool::from_tokens(vec![1u64, 2]);
        let first = pool.acquire().unwrap();
        let _second = pool.acquire().unwrap();
        assert!(pool.acquire().is_none());

        pool.release(first).unwrap();
        assert_eq!(pool.acquire().map(|l| l.token()), Some(1));
    }

    #[test]
    fn test_release_of_free_slot_is_rejected() {
        let mut pool = ResourcePool::from_tokens(vec![7u32]);
        let forged = Lease { slot: 0, token: 7 };
        assert!(matches!(
            pool.release(forged),
            Err(SimulationError::Inconsistent(_))
        ));
    }

    #[test]
    fn test_release_out_of_range_is_rejected() {
        let mut pool = ResourcePool::from_tokens(vec![7u32]);
        let forged = Lease { slot: 3, token: 7 };
        assert!(pool.release(forged).is_err());
        assert_eq!(pool.available(), 1);
    }

    #[test]
    fn test_empty_pool() {
        let mut pool: ResourcePool<u32> = ResourcePool::from_tokens(Vec::new());
        assert_eq!(pool.capacity(), 0);
        assert!(pool.acquire().is_none());
    }

    proptest! {
        #[test]
        fn checkouts_are_conserved(ops in prop::collection::vec(any::<bool>(), 0..300)) {
            let mut pool = ResourcePool::from_tokens((0u32..16).collect());
            let mut held = Vec::new();
            for acquire in ops {
                if acquire {
                    if let Some(lease) = pool.acquire() {
                        held.push(lease);
                    } else {
                        prop_assert_eq!(held.len(), 16);
                    }
                } else if let Some(lease) = held.pop() {
                    prop_assert!(pool.release(lease).is_ok());
                }
                prop_assert_eq!(pool.checked_out(), held.len());
                prop_assert_eq!(pool.available() + pool.checked_out(), pool.capacity());

                let mut tokens: Vec<u32> = held.iter().map(|l| l.token()).collect();
                tokens.sort_unstable();
                tokens.dedup();
                prop_assert_eq!(tokens.len(), held.len());
            }
        }
    }
}
