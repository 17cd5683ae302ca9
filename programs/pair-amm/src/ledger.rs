//! Reserve ledger: the only place pool records are mutated.
//!
//! Mutators assume the caller has already validated the amounts. Removing
//! more than a pool holds is a defect upstream and fails with
//! `InsufficientReserve`.

use std::collections::BTreeMap;

use anchor_lang::prelude::*;

use crate::errors::AmmError;
use crate::pair::{Direction, PairKey};
use crate::state::Pool;

pub trait ReserveLedger {
    /// Current record for `key`; a pair that never received a deposit reads
    /// as the zero state.
    fn get(&self, key: &PairKey) -> Result<Pool>;

    fn apply_deposit(
        &mut self,
        key: &PairKey,
        amount_low: u128,
        amount_high: u128,
        shares_issued: u128,
    ) -> Result<()>;

    fn apply_withdraw(
        &mut self,
        key: &PairKey,
        amount_low: u128,
        amount_high: u128,
        shares_burned: u128,
    ) -> Result<()>;

    fn apply_swap(
        &mut self,
        key: &PairKey,
        direction: Direction,
        amount_in: u128,
        amount_out: u128,
    ) -> Result<()>;
}

/// In-memory ledger holding every pool, keyed by canonical pair.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PoolTable {
    pools: BTreeMap<PairKey, Pool>,
}

impl PoolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    fn existing(&mut self, key: &PairKey) -> Result<&mut Pool> {
        match self.pools.get_mut(key) {
            Some(pool) => Ok(pool),
            None => {
                msg!("ledger has no pool for {} / {}", key.low, key.high);
                err!(AmmError::InsufficientReserve)
            }
        }
    }
}

impl ReserveLedger for PoolTable {
    fn get(&self, key: &PairKey) -> Result<Pool> {
        Ok(self
            .pools
            .get(key)
            .copied()
            .unwrap_or_else(|| Pool::empty(key)))
    }

    fn apply_deposit(
        &mut self,
        key: &PairKey,
        amount_low: u128,
        amount_high: u128,
        shares_issued: u128,
    ) -> Result<()> {
        self.pools
            .entry(*key)
            .or_insert_with(|| Pool::empty(key))
            .credit_deposit(amount_low, amount_high, shares_issued)
    }

    fn apply_withdraw(
        &mut self,
        key: &PairKey,
        amount_low: u128,
        amount_high: u128,
        shares_burned: u128,
    ) -> Result<()> {
        self.existing(key)?
            .debit_withdraw(amount_low, amount_high, shares_burned)
    }

    fn apply_swap(
        &mut self,
        key: &PairKey,
        direction: Direction,
        amount_in: u128,
        amount_out: u128,
    ) -> Result<()> {
        self.existing(key)?
            .settle_swap(direction, amount_in, amount_out)
    }
}

/// Ledger view over a single on-chain pool account.
///
/// The PDA derivation already maps the pair onto this account, so any other
/// key is rejected.
pub struct PoolSlot<'a> {
    key: PairKey,
    pool: &'a mut Pool,
}

impl<'a> PoolSlot<'a> {
    pub fn new(key: PairKey, pool: &'a mut Pool) -> Self {
        Self { key, pool }
    }

    fn check(&self, key: &PairKey) -> Result<()> {
        require!(self.key == *key, AmmError::PoolNotFound);
        Ok(())
    }
}

impl ReserveLedger for PoolSlot<'_> {
    fn get(&self, key: &PairKey) -> Result<Pool> {
        self.check(key)?;
        Ok(Pool {
            asset_low: key.low,
            asset_high: key.high,
            ..*self.pool
        })
    }

    fn apply_deposit(
        &mut self,
        key: &PairKey,
        amount_low: u128,
        amount_high: u128,
        shares_issued: u128,
    ) -> Result<()> {
        self.check(key)?;
        self.pool.bind_assets(key)?;
        self.pool
            .credit_deposit(amount_low, amount_high, shares_issued)
    }

    fn apply_withdraw(
        &mut self,
        key: &PairKey,
        amount_low: u128,
        amount_high: u128,
        shares_burned: u128,
    ) -> Result<()> {
        self.check(key)?;
        self.pool
            .debit_withdraw(amount_low, amount_high, shares_burned)
    }

    fn apply_swap(
        &mut self,
        key: &PairKey,
        direction: Direction,
        amount_in: u128,
        amount_out: u128,
    ) -> Result<()> {
        self.check(key)?;
        self.pool.settle_swap(direction, amount_in, amount_out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(a: u8, b: u8) -> PairKey {
        PairKey::new(
            Pubkey::new_from_array([a; 32]),
            Pubkey::new_from_array([b; 32]),
        )
        .unwrap()
    }

    #[test]
    fn unknown_pair_reads_as_zero_state() {
        let table = PoolTable::new();
        let pool = table.get(&key(1, 2)).unwrap();
        assert!(pool.is_empty());
        assert_eq!(pool.key(), key(1, 2));
        assert!(table.is_empty());
    }

    #[test]
    fn first_deposit_creates_record() {
        let mut table = PoolTable::new();
        table.apply_deposit(&key(1, 2), 10, 20, 3).unwrap();
        let pool = table.get(&key(2, 1)).unwrap();
        assert_eq!((pool.reserve_low, pool.reserve_high, pool.total_shares), (10, 20, 3));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn pools_are_independent() {
        let mut table = PoolTable::new();
        table.apply_deposit(&key(1, 2), 10, 20, 3).unwrap();
        table.apply_deposit(&key(1, 3), 7, 7, 7).unwrap();
        table.apply_swap(&key(1, 2), Direction::LowToHigh, 5, 4).unwrap();

        assert_eq!(table.get(&key(1, 3)).unwrap().reserve_low, 7);
        assert_eq!(table.get(&key(1, 2)).unwrap().reserve_low, 15);
    }

    #[test]
    fn mutating_a_missing_pool_is_fatal() {
        let mut table = PoolTable::new();
        assert_eq!(
            table.apply_withdraw(&key(1, 2), 1, 1, 1).unwrap_err(),
            AmmError::InsufficientReserve.into()
        );
        assert_eq!(
            table
                .apply_swap(&key(1, 2), Direction::HighToLow, 1, 1)
                .unwrap_err(),
            AmmError::InsufficientReserve.into()
        );
    }

    #[test]
    fn slot_rejects_foreign_pair() {
        let mut record = Pool::default();
        let mut slot = PoolSlot::new(key(1, 2), &mut record);
        assert_eq!(
            slot.get(&key(1, 3)).unwrap_err(),
            AmmError::PoolNotFound.into()
        );
        slot.apply_deposit(&key(1, 2), 4, 4, 4).unwrap();
        assert_eq!(record.key(), key(1, 2));
        assert_eq!(record.total_shares, 4);
    }
}
