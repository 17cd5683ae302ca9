use anchor_lang::prelude::*;

/// Seed prefix of the pool PDA: `[POOL_SEED, asset_low, asset_high]`
#[constant]
pub const POOL_SEED: &[u8] = b"pool";

/// Seed prefix of the share mint PDA: `[SHARE_MINT_SEED, pool]`
#[constant]
pub const SHARE_MINT_SEED: &[u8] = b"share_mint";

/// Decimals of every liquidity share mint
#[constant]
pub const SHARE_DECIMALS: u8 = 9;

/// Fixed-point unit for spot prices and the first-deposit share rule (1e18)
#[constant]
pub const PRICE_SCALE: u128 = 1_000_000_000_000_000_000;

#[constant]
pub const SHARE_TOKEN_NAME: &str = "Pair AMM Liquidity";

#[constant]
pub const SHARE_TOKEN_SYMBOL: &str = "PAL";
