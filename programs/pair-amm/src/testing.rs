//! In-memory collaborators for the pool engine.
//!
//! `MemoryAssets` is a plain balance book for fungible assets and
//! `MemoryShareTokens` a registry of share tokens with their holders. Both
//! are used by [`crate::exchange::Exchange`] and by the test suites.

use std::collections::BTreeMap;

use anchor_lang::prelude::*;

use crate::errors::AmmError;
use crate::ops::AssetTransfer;
use crate::registry::ShareToken;

/// Balances of every `(asset, owner)` pair
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryAssets {
    custody: Pubkey,
    balances: BTreeMap<(Pubkey, Pubkey), u128>,
    frozen: Option<Pubkey>,
}

impl MemoryAssets {
    /// Creates a book whose pushes are paid out of `custody`.
    pub fn new(custody: Pubkey) -> Self {
        Self {
            custody,
            ..Self::default()
        }
    }

    pub fn fund(&mut self, asset: Pubkey, owner: Pubkey, amount: u128) {
        *self.balances.entry((asset, owner)).or_default() += amount;
    }

    pub fn balance_of(&self, asset: &Pubkey, owner: &Pubkey) -> u128 {
        self.balances
            .get(&(*asset, *owner))
            .copied()
            .unwrap_or_default()
    }

    /// Makes every transfer of `asset` fail until cleared.
    pub fn freeze(&mut self, asset: Option<Pubkey>) {
        self.frozen = asset;
    }

    fn debit(&mut self, asset: &Pubkey, owner: &Pubkey, amount: u128) -> Result<()> {
        require!(self.frozen != Some(*asset), AmmError::TransferFailed);
        let balance = self.balances.entry((*asset, *owner)).or_default();
        match balance.checked_sub(amount) {
            Some(left) => {
                *balance = left;
                Ok(())
            }
            None => {
                msg!(
                    "insufficient {} balance for {}: {} < {}",
                    asset,
                    owner,
                    balance,
                    amount
                );
                err!(AmmError::TransferFailed)
            }
        }
    }

    fn credit(&mut self, asset: &Pubkey, owner: &Pubkey, amount: u128) -> Result<()> {
        let balance = self.balances.entry((*asset, *owner)).or_default();
        *balance = balance
            .checked_add(amount)
            .ok_or(AmmError::MathOverflow)?;
        Ok(())
    }
}

impl AssetTransfer for MemoryAssets {
    fn custody(&self) -> Pubkey {
        self.custody
    }

    fn pull(&mut self, asset: &Pubkey, from: &Pubkey, to: &Pubkey, amount: u128) -> Result<()> {
        require_keys_eq!(*to, self.custody, AmmError::TransferFailed);
        self.debit(asset, from, amount)?;
        self.credit(asset, to, amount)
    }

    fn push(&mut self, asset: &Pubkey, to: &Pubkey, amount: u128) -> Result<()> {
        let custody = self.custody;
        self.debit(asset, &custody, amount)?;
        self.credit(asset, to, amount)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShareTokenInfo {
    pub name: String,
    pub symbol: String,
    pub controller: Pubkey,
    pub supply: u128,
}

/// Share tokens created through [`ShareToken::create`], with holder balances
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryShareTokens {
    created: u64,
    tokens: BTreeMap<Pubkey, ShareTokenInfo>,
    balances: BTreeMap<(Pubkey, Pubkey), u128>,
}

impl MemoryShareTokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn info(&self, token: &Pubkey) -> Option<&ShareTokenInfo> {
        self.tokens.get(token)
    }

    pub fn controller_of(&self, token: &Pubkey) -> Option<Pubkey> {
        self.tokens.get(token).map(|info| info.controller)
    }

    pub fn supply_of(&self, token: &Pubkey) -> u128 {
        self.tokens
            .get(token)
            .map(|info| info.supply)
            .unwrap_or_default()
    }

    pub fn balance_of(&self, token: &Pubkey, holder: &Pubkey) -> u128 {
        self.balances
            .get(&(*token, *holder))
            .copied()
            .unwrap_or_default()
    }

    /// Moves shares between holders, the way an ordinary token transfer would.
    pub fn transfer(&mut self, token: &Pubkey, from: &Pubkey, to: &Pubkey, amount: u128) -> Result<()> {
        let from_balance = self.balance_of(token, from);
        require!(from_balance >= amount, AmmError::ShareTokenFailed);
        self.balances.insert((*token, *from), from_balance - amount);
        *self.balances.entry((*token, *to)).or_default() += amount;
        Ok(())
    }

    fn token_mut(&mut self, token: &Pubkey) -> Result<&mut ShareTokenInfo> {
        match self.tokens.get_mut(token) {
            Some(info) => Ok(info),
            None => err!(AmmError::ShareTokenFailed),
        }
    }
}

impl ShareToken for MemoryShareTokens {
    fn create(&mut self, name: &str, symbol: &str, controller: &Pubkey) -> Result<Pubkey> {
        self.created += 1;
        let mut bytes = [0xA5u8; 32];
        bytes[..8].copy_from_slice(&self.created.to_le_bytes());
        let token = Pubkey::new_from_array(bytes);

        self.tokens.insert(
            token,
            ShareTokenInfo {
                name: name.to_string(),
                symbol: symbol.to_string(),
                controller: *controller,
                supply: 0,
            },
        );
        Ok(token)
    }

    fn mint(&mut self, token: &Pubkey, to: &Pubkey, amount: u128) -> Result<()> {
        let info = self.token_mut(token)?;
        info.supply = info
            .supply
            .checked_add(amount)
            .ok_or(AmmError::MathOverflow)?;
        *self.balances.entry((*token, *to)).or_default() += amount;
        Ok(())
    }

    fn burn(&mut self, token: &Pubkey, from: &Pubkey, amount: u128) -> Result<()> {
        let held = self.balance_of(token, from);
        require!(held >= amount, AmmError::ShareTokenFailed);
        let info = self.token_mut(token)?;
        info.supply = info
            .supply
            .checked_sub(amount)
            .ok_or(AmmError::ShareTokenFailed)?;
        self.balances.insert((*token, *from), held - amount);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(byte: u8) -> Pubkey {
        Pubkey::new_from_array([byte; 32])
    }

    #[test]
    fn pull_and_push_move_balances_through_custody() {
        let mut assets = MemoryAssets::new(id(100));
        assets.fund(id(1), id(2), 50);

        assets.pull(&id(1), &id(2), &id(100), 30).unwrap();
        assets.push(&id(1), &id(3), 10).unwrap();

        assert_eq!(assets.balance_of(&id(1), &id(2)), 20);
        assert_eq!(assets.balance_of(&id(1), &id(100)), 20);
        assert_eq!(assets.balance_of(&id(1), &id(3)), 10);
    }

    #[test]
    fn pull_only_lands_in_custody() {
        let mut assets = MemoryAssets::new(id(100));
        assets.fund(id(1), id(2), 5);
        assert_eq!(assets.custody(), id(100));
        assert_eq!(
            assets.pull(&id(1), &id(2), &id(3), 5).unwrap_err(),
            AmmError::TransferFailed.into()
        );
        assert_eq!(assets.balance_of(&id(1), &id(2)), 5);
    }

    #[test]
    fn overdraft_fails() {
        let mut assets = MemoryAssets::new(id(100));
        assets.fund(id(1), id(2), 5);
        assert_eq!(
            assets.pull(&id(1), &id(2), &id(100), 6).unwrap_err(),
            AmmError::TransferFailed.into()
        );
        assert_eq!(assets.balance_of(&id(1), &id(2)), 5);
    }

    #[test]
    fn frozen_asset_refuses_transfers() {
        let mut assets = MemoryAssets::new(id(100));
        assets.fund(id(1), id(2), 5);
        assets.freeze(Some(id(1)));
        assert!(assets.pull(&id(1), &id(2), &id(100), 1).is_err());
        assets.freeze(None);
        assert!(assets.pull(&id(1), &id(2), &id(100), 1).is_ok());
    }

    #[test]
    fn created_tokens_are_distinct() {
        let mut shares = MemoryShareTokens::new();
        let a = shares.create("A", "A", &id(9)).unwrap();
        let b = shares.create("B", "B", &id(9)).unwrap();
        assert_ne!(a, b);
        assert_eq!(shares.info(&a).unwrap().symbol, "A");
    }

    #[test]
    fn burn_cannot_exceed_holding() {
        let mut shares = MemoryShareTokens::new();
        let token = shares.create("A", "A", &id(9)).unwrap();
        shares.mint(&token, &id(1), 10).unwrap();
        assert!(shares.burn(&token, &id(1), 11).is_err());
        shares.burn(&token, &id(1), 10).unwrap();
        assert_eq!(shares.supply_of(&token), 0);
    }

    #[test]
    fn mint_to_unknown_token_fails() {
        let mut shares = MemoryShareTokens::new();
        assert_eq!(
            shares.mint(&id(4), &id(1), 1).unwrap_err(),
            AmmError::ShareTokenFailed.into()
        );
    }
}
