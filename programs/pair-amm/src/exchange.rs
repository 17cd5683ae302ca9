//! In-memory host for the pool engine.
//!
//! On chain the runtime makes every instruction atomic. Here `Exchange`
//! provides the same guarantee itself: it takes `&mut self` for each
//! mutating call, snapshots all state first and restores the snapshot if the
//! call fails, so no partial transfer, mint or ledger update survives an
//! error.

use anchor_lang::prelude::*;

use crate::events::{LiquidityAdded, LiquidityRemoved, PoolEvent, SwappedTokens};
use crate::ledger::{PoolTable, ReserveLedger};
use crate::ops::{
    self, AssetTransfer, DepositParams, DepositQuote, PoolOperations, Reserves, SwapParams,
    SwapQuote, WithdrawParams, WithdrawQuote,
};
use crate::pair::PairKey;
use crate::registry::{BindingTable, ShareRegistry, ShareToken};
use crate::state::Pool;

#[derive(Clone, Debug)]
pub struct Exchange<X, S> {
    custody: Pubkey,
    pools: PoolTable,
    bindings: BindingTable,
    assets: X,
    shares: S,
    events: Vec<PoolEvent>,
}

impl<X, S> Exchange<X, S>
where
    X: AssetTransfer + Clone,
    S: ShareToken + Clone,
{
    /// Creates an exchange whose funds are held by the custody account of
    /// `assets`.
    pub fn new(assets: X, shares: S) -> Self {
        Self {
            custody: assets.custody(),
            pools: PoolTable::new(),
            bindings: BindingTable::new(),
            assets,
            shares,
            events: Vec::new(),
        }
    }

    pub fn custody(&self) -> Pubkey {
        self.custody
    }

    pub fn assets(&self) -> &X {
        &self.assets
    }

    pub fn assets_mut(&mut self) -> &mut X {
        &mut self.assets
    }

    pub fn shares(&self) -> &S {
        &self.shares
    }

    pub fn shares_mut(&mut self) -> &mut S {
        &mut self.shares
    }

    pub fn pools(&self) -> &PoolTable {
        &self.pools
    }

    /// Events of every successful call, oldest first
    pub fn events(&self) -> &[PoolEvent] {
        &self.events
    }

    pub fn pool(&self, asset_a: Pubkey, asset_b: Pubkey) -> Result<Pool> {
        self.pools.get(&PairKey::new(asset_a, asset_b)?)
    }

    pub fn share_token(&self, asset_a: Pubkey, asset_b: Pubkey) -> Result<Option<Pubkey>> {
        Ok(self.bindings.binding(&PairKey::new(asset_a, asset_b)?))
    }

    pub fn deposit(
        &mut self,
        caller: Pubkey,
        now: i64,
        params: &DepositParams,
    ) -> Result<LiquidityAdded> {
        self.transact(caller, now, |ops| ops.deposit(params))
    }

    pub fn withdraw(
        &mut self,
        caller: Pubkey,
        now: i64,
        params: &WithdrawParams,
    ) -> Result<LiquidityRemoved> {
        self.transact(caller, now, |ops| ops.withdraw(params))
    }

    pub fn swap(&mut self, caller: Pubkey, now: i64, params: &SwapParams) -> Result<SwappedTokens> {
        self.transact(caller, now, |ops| ops.swap(params))
    }

    pub fn get_reserves(&self, asset_a: Pubkey, asset_b: Pubkey) -> Result<Reserves> {
        ops::get_reserves(&self.pools, asset_a, asset_b)
    }

    pub fn get_spot_price(&self, asset_a: Pubkey, asset_b: Pubkey) -> Result<u128> {
        ops::get_spot_price(&self.pools, asset_a, asset_b)
    }

    pub fn quote_swap_output(
        &self,
        amount_in: u128,
        reserve_in: u128,
        reserve_out: u128,
    ) -> Result<SwapQuote> {
        ops::quote_swap_output(amount_in, reserve_in, reserve_out)
    }

    pub fn quote_deposit(
        &self,
        asset_a: Pubkey,
        asset_b: Pubkey,
        desired_a: u128,
        desired_b: u128,
        min_a: u128,
        min_b: u128,
    ) -> Result<DepositQuote> {
        ops::quote_deposit(
            &self.pools,
            asset_a,
            asset_b,
            desired_a,
            desired_b,
            min_a,
            min_b,
        )
    }

    pub fn quote_withdraw(
        &self,
        asset_a: Pubkey,
        asset_b: Pubkey,
        shares: u128,
    ) -> Result<WithdrawQuote> {
        ops::quote_withdraw(&self.pools, asset_a, asset_b, shares)
    }

    fn transact<T, F>(&mut self, caller: Pubkey, now: i64, call: F) -> Result<T>
    where
        T: Clone + Into<PoolEvent>,
        F: FnOnce(&mut PoolOperations<'_, PoolTable, BindingTable, X, S>) -> Result<T>,
    {
        let snapshot = (
            self.pools.clone(),
            self.bindings.clone(),
            self.assets.clone(),
            self.shares.clone(),
        );

        let mut operations = PoolOperations {
            ledger: &mut self.pools,
            registry: &mut self.bindings,
            assets: &mut self.assets,
            shares: &mut self.shares,
            custody: self.custody,
            caller,
            now,
        };

        match call(&mut operations) {
            Ok(event) => {
                self.events.push(event.clone().into());
                Ok(event)
            }
            Err(err) => {
                msg!("call rolled back: {}", err);
                let (pools, bindings, assets, shares) = snapshot;
                self.pools = pools;
                self.bindings = bindings;
                self.assets = assets;
                self.shares = shares;
                Err(err)
            }
        }
    }
}
