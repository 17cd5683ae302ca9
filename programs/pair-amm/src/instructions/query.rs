//! Read-only instructions. Results come back through return data.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::Mint;

use crate::constants::POOL_SEED;
use crate::ledger::PoolSlot;
use crate::ops::{self, DepositQuote, Reserves, SwapQuote};
use crate::pair::{seed_high, seed_low, PairKey};
use crate::state::{PairPool, Pool};

impl<'info> ReadPool<'info> {
    fn snapshot(&self) -> Result<(PairKey, Pool)> {
        let key = PairKey::new(self.mint_a.key(), self.mint_b.key())?;
        let pool = load_pool(&key, &self.pool)?;
        Ok((key, pool))
    }
}

/// Pool record stored in `info`; an account that was never created reads
/// as empty.
pub(crate) fn load_pool(key: &PairKey, info: &AccountInfo) -> Result<Pool> {
    if info.data_is_empty() {
        return Ok(Pool::empty(key));
    }
    require_keys_eq!(
        *info.owner,
        crate::ID,
        anchor_lang::error::ErrorCode::AccountOwnedByWrongProgram
    );
    let data = info.try_borrow_data()?;
    let account = PairPool::try_deserialize(&mut &data[..])?;
    Ok(account.pool)
}

pub fn get_reserves(ctx: Context<ReadPool>) -> Result<Reserves> {
    let (key, mut pool) = ctx.accounts.snapshot()?;
    let ledger = PoolSlot::new(key, &mut pool);
    ops::get_reserves(&ledger, ctx.accounts.mint_a.key(), ctx.accounts.mint_b.key())
}

pub fn get_spot_price(ctx: Context<ReadPool>) -> Result<u128> {
    let (key, mut pool) = ctx.accounts.snapshot()?;
    let ledger = PoolSlot::new(key, &mut pool);
    ops::get_spot_price(&ledger, ctx.accounts.mint_a.key(), ctx.accounts.mint_b.key())
}

pub fn quote_deposit(
    ctx: Context<ReadPool>,
    desired_a: u64,
    desired_b: u64,
    min_a: u64,
    min_b: u64,
) -> Result<DepositQuote> {
    let (key, mut pool) = ctx.accounts.snapshot()?;
    let ledger = PoolSlot::new(key, &mut pool);
    ops::quote_deposit(
        &ledger,
        ctx.accounts.mint_a.key(),
        ctx.accounts.mint_b.key(),
        desired_a as u128,
        desired_b as u128,
        min_a as u128,
        min_b as u128,
    )
}

pub fn quote_swap_output(
    _ctx: Context<QuoteSwap>,
    amount_in: u64,
    reserve_in: u64,
    reserve_out: u64,
) -> Result<SwapQuote> {
    ops::quote_swap_output(amount_in as u128, reserve_in as u128, reserve_out as u128)
}

#[derive(Accounts)]
pub struct ReadPool<'info> {
    pub mint_a: Box<InterfaceAccount<'info, Mint>>,
    pub mint_b: Box<InterfaceAccount<'info, Mint>>,

    /// CHECK: address is pinned by the seeds; may not be initialized yet
    #[account(
        seeds = [
            POOL_SEED,
            seed_low(&mint_a.key(), &mint_b.key()).as_ref(),
            seed_high(&mint_a.key(), &mint_b.key()).as_ref()
        ],
        bump,
    )]
    pub pool: UncheckedAccount<'info>,
}

#[derive(Accounts)]
pub struct QuoteSwap {}
