//! Pool operations: deposit, withdraw and swap orchestration plus the pure
//! query surface.
//!
//! Each mutating call runs Validate -> Compute -> Move value -> Mint/Burn ->
//! Commit and returns the event to emit. All checks and arithmetic happen
//! before the first collaborator call. Rolling back collaborator effects
//! after a later failure is the host's job (the Solana runtime, or
//! [`crate::exchange::Exchange`] in memory).

use anchor_lang::prelude::*;

use crate::errors::AmmError;
use crate::events::{LiquidityAdded, LiquidityRemoved, SwappedTokens};
use crate::ledger::ReserveLedger;
use crate::math;
use crate::pair::PairKey;
use crate::registry::{get_or_create_binding, ShareRegistry, ShareToken};

/// Fungible asset collaborator. A failed transfer must abort the call.
pub trait AssetTransfer {
    /// Account holding pool funds: pulls land here and pushes are paid from it.
    fn custody(&self) -> Pubkey;

    /// Moves `amount` of `asset` from `from` into the custody account `to`.
    fn pull(&mut self, asset: &Pubkey, from: &Pubkey, to: &Pubkey, amount: u128) -> Result<()>;

    /// Pays `amount` of `asset` out of pool custody to `to`.
    fn push(&mut self, asset: &Pubkey, to: &Pubkey, amount: u128) -> Result<()>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DepositParams {
    pub asset_a: Pubkey,
    pub asset_b: Pubkey,
    pub desired_a: u128,
    pub desired_b: u128,
    pub min_a: u128,
    pub min_b: u128,
    pub recipient: Pubkey,
    pub deadline: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WithdrawParams {
    pub asset_a: Pubkey,
    pub asset_b: Pubkey,
    pub shares: u128,
    pub min_a: u128,
    pub min_b: u128,
    pub recipient: Pubkey,
    pub deadline: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapParams {
    pub amount_in: u128,
    pub amount_out_min: u128,
    pub path: Vec<Pubkey>,
    pub recipient: Pubkey,
    pub deadline: i64,
}

/// Reserves of a pair in the caller's `(A, B)` order
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Reserves {
    pub reserve_a: u128,
    pub reserve_b: u128,
    pub total_shares: u128,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SwapQuote {
    pub amount_in: u128,
    pub amount_out: u128,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DepositQuote {
    pub optimal_amount_a: u128,
    pub optimal_amount_b: u128,
    pub shares_to_mint: u128,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WithdrawQuote {
    pub amount_a: u128,
    pub amount_b: u128,
}

/// Everything one mutating call needs, borrowed for the length of the call.
pub struct PoolOperations<'a, L: ?Sized, R: ?Sized, X: ?Sized, S: ?Sized> {
    pub ledger: &'a mut L,
    pub registry: &'a mut R,
    pub assets: &'a mut X,
    pub shares: &'a mut S,
    /// Identity holding pool funds and controlling share tokens
    pub custody: Pubkey,
    /// Account the call acts for: pays deposits and swaps, burns shares
    pub caller: Pubkey,
    /// Current unix time in seconds
    pub now: i64,
}

impl<L, R, X, S> PoolOperations<'_, L, R, X, S>
where
    L: ReserveLedger + ?Sized,
    R: ShareRegistry + ?Sized,
    X: AssetTransfer + ?Sized,
    S: ShareToken + ?Sized,
{
    pub fn deposit(&mut self, params: &DepositParams) -> Result<LiquidityAdded> {
        self.check_call(params.deadline, &params.recipient)?;
        require!(
            params.desired_a > 0 && params.desired_b > 0,
            AmmError::ZeroAmount
        );
        require!(
            params.min_a <= params.desired_a && params.min_b <= params.desired_b,
            AmmError::MinExceedsDesired
        );

        let (key, orientation) = PairKey::resolve(params.asset_a, params.asset_b)?;
        let pool = self.ledger.get(&key)?;
        let (reserve_a, reserve_b) = orientation.arrange(pool.reserve_low, pool.reserve_high);

        let (amount_a, amount_b) = math::optimal_deposit(
            params.desired_a,
            params.desired_b,
            params.min_a,
            params.min_b,
            reserve_a,
            reserve_b,
        )?;
        let shares = math::shares_for_deposit(
            amount_a,
            amount_b,
            reserve_a,
            reserve_b,
            pool.total_shares,
        )?;
        require!(shares > 0, AmmError::InsufficientSharesMinted);

        self.assets
            .pull(&params.asset_a, &self.caller, &self.custody, amount_a)?;
        self.assets
            .pull(&params.asset_b, &self.caller, &self.custody, amount_b)?;

        let token = get_or_create_binding(
            &mut *self.registry,
            &mut *self.shares,
            &key,
            &self.custody,
        )?;
        self.shares.mint(&token, &params.recipient, shares)?;

        let (amount_low, amount_high) = orientation.arrange(amount_a, amount_b);
        self.ledger
            .apply_deposit(&key, amount_low, amount_high, shares)?;

        msg!(
            "deposit {} / {}: {} + {} for {} shares",
            key.low,
            key.high,
            amount_low,
            amount_high,
            shares
        );

        Ok(LiquidityAdded {
            pair_assets: [key.low, key.high],
            recipient: params.recipient,
            amount_a: amount_low,
            amount_b: amount_high,
            shares_minted: shares,
        })
    }

    pub fn withdraw(&mut self, params: &WithdrawParams) -> Result<LiquidityRemoved> {
        self.check_call(params.deadline, &params.recipient)?;
        require!(params.shares > 0, AmmError::ZeroAmount);

        let (key, orientation) = PairKey::resolve(params.asset_a, params.asset_b)?;
        let token = self
            .registry
            .binding(&key)
            .ok_or(AmmError::PoolNotFound)?;
        let pool = self.ledger.get(&key)?;
        require!(
            params.shares <= pool.total_shares,
            AmmError::InsufficientLiquidity
        );

        let (amount_low, amount_high) = math::amounts_for_withdraw(
            params.shares,
            pool.reserve_low,
            pool.reserve_high,
            pool.total_shares,
        )?;
        let (amount_a, amount_b) = orientation.arrange(amount_low, amount_high);
        require!(
            amount_a >= params.min_a && amount_b >= params.min_b,
            AmmError::SlippageExceeded
        );

        self.shares.burn(&token, &self.caller, params.shares)?;
        self.assets
            .push(&params.asset_a, &params.recipient, amount_a)?;
        self.assets
            .push(&params.asset_b, &params.recipient, amount_b)?;

        self.ledger
            .apply_withdraw(&key, amount_low, amount_high, params.shares)?;

        msg!(
            "withdraw {} / {}: {} shares for {} + {}",
            key.low,
            key.high,
            params.shares,
            amount_low,
            amount_high
        );

        Ok(LiquidityRemoved {
            pair_assets: [key.low, key.high],
            recipient: params.recipient,
            amount_a: amount_low,
            amount_b: amount_high,
            shares_burned: params.shares,
        })
    }

    pub fn swap(&mut self, params: &SwapParams) -> Result<SwappedTokens> {
        self.check_call(params.deadline, &params.recipient)?;
        require!(params.amount_in > 0, AmmError::ZeroAmount);

        let [asset_in, asset_out] = match params.path.as_slice() {
            [asset_in, asset_out] => [*asset_in, *asset_out],
            _ => return err!(AmmError::InvalidPath),
        };
        let key = PairKey::new(asset_in, asset_out)?;
        require!(
            self.registry.binding(&key).is_some(),
            AmmError::PoolNotFound
        );

        let pool = self.ledger.get(&key)?;
        let direction = key.direction_from(&asset_in)?;
        let (reserve_in, reserve_out) = pool.oriented(direction);

        let amount_out = math::swap_output(params.amount_in, reserve_in, reserve_out)?;
        require!(
            amount_out >= params.amount_out_min,
            AmmError::SlippageExceeded
        );
        require!(amount_out > 0, AmmError::InsufficientOutput);

        self.assets
            .pull(&asset_in, &self.caller, &self.custody, params.amount_in)?;
        self.assets
            .push(&asset_out, &params.recipient, amount_out)?;

        self.ledger
            .apply_swap(&key, direction, params.amount_in, amount_out)?;

        msg!(
            "swap {} -> {}: {} in, {} out",
            asset_in,
            asset_out,
            params.amount_in,
            amount_out
        );

        Ok(SwappedTokens {
            pair_assets: [asset_in, asset_out],
            recipient: params.recipient,
            amounts: [params.amount_in, amount_out],
        })
    }

    fn check_call(&self, deadline: i64, recipient: &Pubkey) -> Result<()> {
        require!(self.now <= deadline, AmmError::Expired);
        require!(*recipient != Pubkey::default(), AmmError::InvalidRecipient);
        Ok(())
    }
}

/// Reserves of `(asset_a, asset_b)` in argument order.
pub fn get_reserves<L>(ledger: &L, asset_a: Pubkey, asset_b: Pubkey) -> Result<Reserves>
where
    L: ReserveLedger + ?Sized,
{
    let (key, orientation) = PairKey::resolve(asset_a, asset_b)?;
    let pool = ledger.get(&key)?;
    let (reserve_a, reserve_b) = orientation.arrange(pool.reserve_low, pool.reserve_high);
    Ok(Reserves {
        reserve_a,
        reserve_b,
        total_shares: pool.total_shares,
    })
}

/// Value of one unit of `asset_a` in `asset_b`, scaled by 1e18.
pub fn get_spot_price<L>(ledger: &L, asset_a: Pubkey, asset_b: Pubkey) -> Result<u128>
where
    L: ReserveLedger + ?Sized,
{
    let reserves = get_reserves(ledger, asset_a, asset_b)?;
    math::spot_price(reserves.reserve_a, reserves.reserve_b)
}

pub fn quote_swap_output(amount_in: u128, reserve_in: u128, reserve_out: u128) -> Result<SwapQuote> {
    let amount_out = math::swap_output(amount_in, reserve_in, reserve_out)?;
    Ok(SwapQuote {
        amount_in,
        amount_out,
    })
}

/// Amounts and shares a deposit would use against current reserves.
pub fn quote_deposit<L>(
    ledger: &L,
    asset_a: Pubkey,
    asset_b: Pubkey,
    desired_a: u128,
    desired_b: u128,
    min_a: u128,
    min_b: u128,
) -> Result<DepositQuote>
where
    L: ReserveLedger + ?Sized,
{
    require!(desired_a > 0 && desired_b > 0, AmmError::ZeroAmount);
    require!(
        min_a <= desired_a && min_b <= desired_b,
        AmmError::MinExceedsDesired
    );
    let reserves = get_reserves(ledger, asset_a, asset_b)?;
    let (optimal_amount_a, optimal_amount_b) = math::optimal_deposit(
        desired_a,
        desired_b,
        min_a,
        min_b,
        reserves.reserve_a,
        reserves.reserve_b,
    )?;
    let shares_to_mint = math::shares_for_deposit(
        optimal_amount_a,
        optimal_amount_b,
        reserves.reserve_a,
        reserves.reserve_b,
        reserves.total_shares,
    )?;
    Ok(DepositQuote {
        optimal_amount_a,
        optimal_amount_b,
        shares_to_mint,
    })
}

/// Amounts `shares` would redeem, in argument order.
pub fn quote_withdraw<L>(
    ledger: &L,
    asset_a: Pubkey,
    asset_b: Pubkey,
    shares: u128,
) -> Result<WithdrawQuote>
where
    L: ReserveLedger + ?Sized,
{
    let reserves = get_reserves(ledger, asset_a, asset_b)?;
    let (amount_a, amount_b) = math::amounts_for_withdraw(
        shares,
        reserves.reserve_a,
        reserves.reserve_b,
        reserves.total_shares,
    )?;
    Ok(WithdrawQuote { amount_a, amount_b })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::PoolTable;
    use crate::registry::BindingTable;
    use crate::testing::{MemoryAssets, MemoryShareTokens};

    fn key(byte: u8) -> Pubkey {
        Pubkey::new_from_array([byte; 32])
    }

    #[test]
    fn swap_needs_a_share_binding() {
        let (low, high, trader) = (key(1), key(2), key(9));
        let pair = PairKey::new(low, high).unwrap();
        let mut ledger = PoolTable::new();
        ledger.apply_deposit(&pair, 1_000, 1_000, 1).unwrap();
        let mut registry = BindingTable::new();
        let mut assets = MemoryAssets::new(key(0xC0));
        assets.fund(low, trader, 100);
        let mut shares = MemoryShareTokens::new();

        let mut operations = PoolOperations {
            ledger: &mut ledger,
            registry: &mut registry,
            assets: &mut assets,
            shares: &mut shares,
            custody: key(0xC0),
            caller: trader,
            now: 0,
        };
        let err = operations
            .swap(&SwapParams {
                amount_in: 10,
                amount_out_min: 0,
                path: vec![low, high],
                recipient: trader,
                deadline: 0,
            })
            .unwrap_err();

        assert_eq!(err, AmmError::PoolNotFound.into());
        assert_eq!(assets.balance_of(&low, &trader), 100);
    }

    #[test]
    fn quote_deposit_validates_amounts() {
        let ledger = PoolTable::new();
        assert_eq!(
            quote_deposit(&ledger, key(1), key(2), 0, 5, 0, 0).unwrap_err(),
            AmmError::ZeroAmount.into()
        );
        assert_eq!(
            quote_deposit(&ledger, key(1), key(2), 5, 5, 6, 0).unwrap_err(),
            AmmError::MinExceedsDesired.into()
        );
        assert_eq!(
            quote_deposit(&ledger, key(1), key(1), 5, 5, 0, 0).unwrap_err(),
            AmmError::InvalidPair.into()
        );
    }

    #[test]
    fn empty_pair_quotes() {
        let ledger = PoolTable::new();
        let quote = quote_deposit(&ledger, key(2), key(1), 3_000_000_000, 2_000_000_000, 0, 0)
            .unwrap();
        assert_eq!(quote.optimal_amount_a, 3_000_000_000);
        assert_eq!(quote.optimal_amount_b, 2_000_000_000);
        assert_eq!(quote.shares_to_mint, 6);

        assert_eq!(
            quote_withdraw(&ledger, key(1), key(2), 1).unwrap_err(),
            AmmError::InsufficientLiquidity.into()
        );
    }

    #[test]
    fn reserves_follow_argument_order() {
        let pair = PairKey::new(key(1), key(2)).unwrap();
        let mut ledger = PoolTable::new();
        ledger.apply_deposit(&pair, 10, 40, 400).unwrap();

        let reversed = get_reserves(&ledger, key(2), key(1)).unwrap();
        assert_eq!(
            reversed,
            Reserves {
                reserve_a: 40,
                reserve_b: 10,
                total_shares: 400,
            }
        );
        assert_eq!(
            get_spot_price(&ledger, key(2), key(1)).unwrap(),
            250_000_000_000_000_000
        );
    }
}
