//! Share registry: binds each pair to exactly one liquidity share token.
//!
//! Bindings are created lazily on the first deposit into a pair and never
//! replaced afterwards.

use std::collections::BTreeMap;

use anchor_lang::prelude::*;

use crate::constants::{SHARE_TOKEN_NAME, SHARE_TOKEN_SYMBOL};
use crate::errors::AmmError;
use crate::pair::PairKey;

/// Mintable/burnable claim token collaborator.
///
/// Implementations must fail rather than mint or burn a partial amount.
pub trait ShareToken {
    /// Creates a new share token whose sole minter/burner is `controller`.
    fn create(&mut self, name: &str, symbol: &str, controller: &Pubkey) -> Result<Pubkey>;

    fn mint(&mut self, token: &Pubkey, to: &Pubkey, amount: u128) -> Result<()>;

    fn burn(&mut self, token: &Pubkey, from: &Pubkey, amount: u128) -> Result<()>;
}

/// Storage of pair → share token bindings.
pub trait ShareRegistry {
    fn binding(&self, key: &PairKey) -> Option<Pubkey>;

    /// Records a new binding. Rebinding a pair to a different token fails
    /// with `BindingConflict`.
    fn record_binding(&mut self, key: &PairKey, token: Pubkey) -> Result<()>;
}

/// Returns the pair's share token, creating and recording it on first use.
pub fn get_or_create_binding<R, S>(
    registry: &mut R,
    tokens: &mut S,
    key: &PairKey,
    controller: &Pubkey,
) -> Result<Pubkey>
where
    R: ShareRegistry + ?Sized,
    S: ShareToken + ?Sized,
{
    if let Some(token) = registry.binding(key) {
        return Ok(token);
    }

    let token = tokens.create(SHARE_TOKEN_NAME, SHARE_TOKEN_SYMBOL, controller)?;
    registry.record_binding(key, token)?;
    msg!(
        "bound share token {} to pair {} / {}",
        token,
        key.low,
        key.high
    );
    Ok(token)
}

/// In-memory registry for every pair.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BindingTable {
    bindings: BTreeMap<PairKey, Pubkey>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ShareRegistry for BindingTable {
    fn binding(&self, key: &PairKey) -> Option<Pubkey> {
        self.bindings.get(key).copied()
    }

    fn record_binding(&mut self, key: &PairKey, token: Pubkey) -> Result<()> {
        match self.bindings.get(key) {
            Some(existing) if *existing != token => err!(AmmError::BindingConflict),
            Some(_) => Ok(()),
            None => {
                self.bindings.insert(*key, token);
                Ok(())
            }
        }
    }
}

/// Registry view over the `share_mint` field of one on-chain pool account.
pub struct BindingSlot<'a> {
    key: PairKey,
    share_mint: &'a mut Pubkey,
}

impl<'a> BindingSlot<'a> {
    pub fn new(key: PairKey, share_mint: &'a mut Pubkey) -> Self {
        Self { key, share_mint }
    }
}

impl ShareRegistry for BindingSlot<'_> {
    fn binding(&self, key: &PairKey) -> Option<Pubkey> {
        if *key != self.key || *self.share_mint == Pubkey::default() {
            return None;
        }
        Some(*self.share_mint)
    }

    fn record_binding(&mut self, key: &PairKey, token: Pubkey) -> Result<()> {
        require!(*key == self.key, AmmError::PoolNotFound);
        if *self.share_mint != Pubkey::default() {
            require_keys_eq!(*self.share_mint, token, AmmError::BindingConflict);
            return Ok(());
        }
        *self.share_mint = token;
        Ok(())
    }
}
