use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

use crate::constants::POOL_SEED;
use crate::instructions::token_cpi::{AssetLeg, PoolAuthority, ShareMinting, VaultTransfers};
use crate::ledger::PoolSlot;
use crate::ops::{PoolOperations, WithdrawParams};
use crate::pair::{seed_high, seed_low, PairKey};
use crate::registry::BindingSlot;
use crate::state::PairPool;

/// Burn `shares` of the pool of `(mint_a, mint_b)` and pay out the
/// proportional reserves
pub fn process(
    ctx: Context<Withdraw>,
    shares: u64,
    min_a: u64,
    min_b: u64,
    deadline: i64,
) -> Result<()> {
    let params = WithdrawParams {
        asset_a: ctx.accounts.mint_a.key(),
        asset_b: ctx.accounts.mint_b.key(),
        shares: shares as u128,
        min_a: min_a as u128,
        min_b: min_b as u128,
        recipient: ctx.accounts.recipient.key(),
        deadline,
    };
    ctx.accounts.withdraw(&params)
}

impl<'info> Withdraw<'info> {
    fn withdraw(&mut self, params: &WithdrawParams) -> Result<()> {
        let key = PairKey::new(params.asset_a, params.asset_b)?;
        let now = Clock::get()?.unix_timestamp;

        let authority = PoolAuthority {
            info: self.pool.to_account_info(),
            pair: key,
            bump: self.pool.bump,
        };
        let custody = authority.key();

        let mut assets = VaultTransfers {
            token_program: self.token_program.to_account_info(),
            caller: self.owner.to_account_info(),
            pool: authority.clone(),
            legs: [
                AssetLeg {
                    mint: &self.mint_a,
                    vault: &self.vault_a,
                    source: None,
                    destination: Some(&*self.recipient_a),
                },
                AssetLeg {
                    mint: &self.mint_b,
                    vault: &self.vault_b,
                    source: None,
                    destination: Some(&*self.recipient_b),
                },
            ],
        };
        let mut shares = ShareMinting {
            token_program: self.token_program.to_account_info(),
            share_mint: &self.share_mint,
            pool: authority,
            recipient_shares: None,
            holder: Some((&*self.owner_shares, self.owner.to_account_info())),
        };

        let state = &mut **self.pool;
        let mut ledger = PoolSlot::new(key, &mut state.pool);
        let mut registry = BindingSlot::new(key, &mut state.share_mint);

        let event = PoolOperations {
            ledger: &mut ledger,
            registry: &mut registry,
            assets: &mut assets,
            shares: &mut shares,
            custody,
            caller: self.owner.key(),
            now,
        }
        .withdraw(params)?;

        emit!(event);
        Ok(())
    }
}

#[derive(Accounts)]
pub struct Withdraw<'info> {
    /// Share holder; signs the burn and pays for recipient accounts
    #[account(mut)]
    pub owner: Signer<'info>,

    /// CHECK: only the key is used; payouts go to its associated accounts
    pub recipient: UncheckedAccount<'info>,

    pub mint_a: Box<InterfaceAccount<'info, Mint>>,
    pub mint_b: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        seeds = [
            POOL_SEED,
            seed_low(&mint_a.key(), &mint_b.key()).as_ref(),
            seed_high(&mint_a.key(), &mint_b.key()).as_ref()
        ],
        bump = pool.bump,
    )]
    pub pool: Box<Account<'info, PairPool>>,

    #[account(
        mut,
        address = pool.share_mint,
        mint::token_program = token_program,
    )]
    pub share_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        associated_token::mint = mint_a,
        associated_token::authority = pool,
        associated_token::token_program = token_program,
    )]
    pub vault_a: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        associated_token::mint = mint_b,
        associated_token::authority = pool,
        associated_token::token_program = token_program,
    )]
    pub vault_b: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Share account burned from
    #[account(
        mut,
        token::mint = share_mint,
        token::authority = owner,
        token::token_program = token_program,
    )]
    pub owner_shares: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        init_if_needed,
        payer = owner,
        associated_token::mint = mint_a,
        associated_token::authority = recipient,
        associated_token::token_program = token_program,
    )]
    pub recipient_a: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        init_if_needed,
        payer = owner,
        associated_token::mint = mint_b,
        associated_token::authority = recipient,
        associated_token::token_program = token_program,
    )]
    pub recipient_b: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}
