use anchor_lang::prelude::*;

/// Liquidity was deposited; amounts follow the canonical `pair_assets` order
#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiquidityAdded {
    pub pair_assets: [Pubkey; 2],
    pub recipient: Pubkey,
    pub amount_a: u128,
    pub amount_b: u128,
    pub shares_minted: u128,
}

/// Liquidity was redeemed; amounts follow the canonical `pair_assets` order
#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiquidityRemoved {
    pub pair_assets: [Pubkey; 2],
    pub recipient: Pubkey,
    pub amount_a: u128,
    pub amount_b: u128,
    pub shares_burned: u128,
}

/// A swap along `pair_assets[0] -> pair_assets[1]`, `amounts = [in, out]`
#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwappedTokens {
    pub pair_assets: [Pubkey; 2],
    pub recipient: Pubkey,
    pub amounts: [u128; 2],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolEvent {
    LiquidityAdded(LiquidityAdded),
    LiquidityRemoved(LiquidityRemoved),
    SwappedTokens(SwappedTokens),
}

impl From<LiquidityAdded> for PoolEvent {
    fn from(event: LiquidityAdded) -> Self {
        PoolEvent::LiquidityAdded(event)
    }
}

impl From<LiquidityRemoved> for PoolEvent {
    fn from(event: LiquidityRemoved) -> Self {
        PoolEvent::LiquidityRemoved(event)
    }
}

impl From<SwappedTokens> for PoolEvent {
    fn from(event: SwappedTokens) -> Self {
        PoolEvent::SwappedTokens(event)
    }
}
