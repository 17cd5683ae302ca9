use anchor_lang::prelude::*;

pub mod constants;
pub mod errors;
pub mod events;
#[cfg(any(test, feature = "test-utils"))]
pub mod exchange;
pub mod instructions;
pub mod ledger;
pub mod math;
pub mod ops;
pub mod pair;
pub mod registry;
pub mod state;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

use instructions::*;
use ops::{DepositQuote, Reserves, SwapQuote};

declare_id!("Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS");

#[program]
pub mod pair_amm {
    use super::*;

    /// Add liquidity to a pair, creating its pool and share mint on first use
    pub fn deposit(
        ctx: Context<Deposit>,
        desired_a: u64,
        desired_b: u64,
        min_a: u64,
        min_b: u64,
        deadline: i64,
    ) -> Result<()> {
        instructions::deposit::process(ctx, desired_a, desired_b, min_a, min_b, deadline)
    }

    /// Burn liquidity shares for the proportional reserves
    pub fn withdraw(
        ctx: Context<Withdraw>,
        shares: u64,
        min_a: u64,
        min_b: u64,
        deadline: i64,
    ) -> Result<()> {
        instructions::withdraw::process(ctx, shares, min_a, min_b, deadline)
    }

    /// Swap an exact input amount using the constant product formula
    pub fn swap(
        ctx: Context<SwapTokens>,
        amount_in: u64,
        amount_out_min: u64,
        deadline: i64,
    ) -> Result<()> {
        instructions::swap::process(ctx, amount_in, amount_out_min, deadline)
    }

    /// Reserves and share supply of `(mint_a, mint_b)` in argument order
    pub fn get_reserves(ctx: Context<ReadPool>) -> Result<Reserves> {
        instructions::query::get_reserves(ctx)
    }

    /// Price of `mint_a` in `mint_b`, scaled by 1e18
    pub fn get_spot_price(ctx: Context<ReadPool>) -> Result<u128> {
        instructions::query::get_spot_price(ctx)
    }

    /// Output of an exact-input swap against the given reserves
    pub fn quote_swap_output(
        ctx: Context<QuoteSwap>,
        amount_in: u64,
        reserve_in: u64,
        reserve_out: u64,
    ) -> Result<SwapQuote> {
        instructions::query::quote_swap_output(ctx, amount_in, reserve_in, reserve_out)
    }

    /// Amounts and shares a deposit would use against current reserves
    pub fn quote_deposit(
        ctx: Context<ReadPool>,
        desired_a: u64,
        desired_b: u64,
        min_a: u64,
        min_b: u64,
    ) -> Result<DepositQuote> {
        instructions::query::quote_deposit(ctx, desired_a, desired_b, min_a, min_b)
    }
}
