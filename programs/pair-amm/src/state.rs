use anchor_lang::prelude::*;

use crate::errors::AmmError;
use crate::pair::{Direction, PairKey};

/// Reserves and share supply of one canonical asset pair
#[derive(
    AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, Default, PartialEq, Eq,
)]
pub struct Pool {
    /// Lower asset of the pair
    pub asset_low: Pubkey,

    /// Higher asset of the pair
    pub asset_high: Pubkey,

    /// Amount of `asset_low` held by the pool
    pub reserve_low: u128,

    /// Amount of `asset_high` held by the pool
    pub reserve_high: u128,

    /// Liquidity shares outstanding across all providers
    pub total_shares: u128,
}

/// On-chain pool account, PDA `[POOL_SEED, asset_low, asset_high]`
#[account]
#[derive(InitSpace)]
pub struct PairPool {
    pub pool: Pool,

    /// Share mint bound to this pair, default until the first deposit
    pub share_mint: Pubkey,

    pub bump: u8,
}

impl Pool {
    /// Zero-state pool for `key`
    pub fn empty(key: &PairKey) -> Self {
        Pool {
            asset_low: key.low,
            asset_high: key.high,
            ..Pool::default()
        }
    }

    pub fn key(&self) -> PairKey {
        PairKey {
            low: self.asset_low,
            high: self.asset_high,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_shares == 0 && self.reserve_low == 0 && self.reserve_high == 0
    }

    /// `(reserve_in, reserve_out)` for a swap in `direction`
    pub fn oriented(&self, direction: Direction) -> (u128, u128) {
        match direction {
            Direction::LowToHigh => (self.reserve_low, self.reserve_high),
            Direction::HighToLow => (self.reserve_high, self.reserve_low),
        }
    }

    /// Stamps the pair identity onto a freshly allocated record.
    pub(crate) fn bind_assets(&mut self, key: &PairKey) -> Result<()> {
        if self.asset_low == Pubkey::default() && self.asset_high == Pubkey::default() {
            self.asset_low = key.low;
            self.asset_high = key.high;
        }
        require!(self.key() == *key, AmmError::InvariantViolation);
        Ok(())
    }

    pub(crate) fn credit_deposit(
        &mut self,
        amount_low: u128,
        amount_high: u128,
        shares: u128,
    ) -> Result<()> {
        let reserve_low = self
            .reserve_low
            .checked_add(amount_low)
            .ok_or(AmmError::MathOverflow)?;
        let reserve_high = self
            .reserve_high
            .checked_add(amount_high)
            .ok_or(AmmError::MathOverflow)?;
        let total_shares = self
            .total_shares
            .checked_add(shares)
            .ok_or(AmmError::MathOverflow)?;

        self.reserve_low = reserve_low;
        self.reserve_high = reserve_high;
        self.total_shares = total_shares;
        Ok(())
    }

    pub(crate) fn debit_withdraw(
        &mut self,
        amount_low: u128,
        amount_high: u128,
        shares: u128,
    ) -> Result<()> {
        let reserve_low = drain(self.reserve_low, amount_low)?;
        let reserve_high = drain(self.reserve_high, amount_high)?;
        let total_shares = drain(self.total_shares, shares)?;

        self.reserve_low = reserve_low;
        self.reserve_high = reserve_high;
        self.total_shares = total_shares;
        Ok(())
    }

    pub(crate) fn settle_swap(
        &mut self,
        direction: Direction,
        amount_in: u128,
        amount_out: u128,
    ) -> Result<()> {
        let (reserve_in, reserve_out) = self.oriented(direction);
        let reserve_in = reserve_in
            .checked_add(amount_in)
            .ok_or(AmmError::MathOverflow)?;
        let reserve_out = drain(reserve_out, amount_out)?;

        match direction {
            Direction::LowToHigh => {
                self.reserve_low = reserve_in;
                self.reserve_high = reserve_out;
            }
            Direction::HighToLow => {
                self.reserve_high = reserve_in;
                self.reserve_low = reserve_out;
            }
        }
        Ok(())
    }
}

fn drain(held: u128, amount: u128) -> Result<u128> {
    match held.checked_sub(amount) {
        Some(left) => Ok(left),
        None => {
            msg!("reserve underflow: held {} < requested {}", held, amount);
            err!(AmmError::InsufficientReserve)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> PairKey {
        PairKey::new(
            Pubkey::new_from_array([1; 32]),
            Pubkey::new_from_array([2; 32]),
        )
        .unwrap()
    }

    #[test]
    fn deposit_then_withdraw_returns_to_zero() {
        let mut pool = Pool::empty(&pair());
        pool.credit_deposit(10, 20, 5).unwrap();
        assert!(!pool.is_empty());
        pool.debit_withdraw(10, 20, 5).unwrap();
        assert!(pool.is_empty());
        assert_eq!(pool.key(), pair());
    }

    #[test]
    fn swap_moves_reserves_in_opposite_directions() {
        let mut pool = Pool::empty(&pair());
        pool.credit_deposit(100, 200, 1).unwrap();

        pool.settle_swap(Direction::HighToLow, 50, 20).unwrap();
        assert_eq!((pool.reserve_low, pool.reserve_high), (80, 250));

        pool.settle_swap(Direction::LowToHigh, 20, 50).unwrap();
        assert_eq!((pool.reserve_low, pool.reserve_high), (100, 200));
    }

    #[test]
    fn over_withdraw_is_fatal_and_leaves_record_untouched() {
        let mut pool = Pool::empty(&pair());
        pool.credit_deposit(10, 20, 5).unwrap();
        let before = pool;

        let err = pool.debit_withdraw(5, 21, 1).unwrap_err();
        assert_eq!(err, AmmError::InsufficientReserve.into());
        assert_eq!(pool, before);
    }

    #[test]
    fn bind_assets_stamps_fresh_record_once() {
        let mut pool = Pool::default();
        pool.bind_assets(&pair()).unwrap();
        assert_eq!(pool.key(), pair());

        let other = PairKey::new(
            Pubkey::new_from_array([3; 32]),
            Pubkey::new_from_array([4; 32]),
        )
        .unwrap();
        assert_eq!(
            pool.bind_assets(&other).unwrap_err(),
            AmmError::InvariantViolation.into()
        );
    }
}
