use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

use crate::constants::{POOL_SEED, SHARE_DECIMALS, SHARE_MINT_SEED};
use crate::instructions::token_cpi::{AssetLeg, PoolAuthority, ShareMinting, VaultTransfers};
use crate::ledger::PoolSlot;
use crate::ops::{DepositParams, PoolOperations};
use crate::pair::{seed_high, seed_low, PairKey};
use crate::registry::BindingSlot;
use crate::state::PairPool;

/// Add liquidity to the pool of `(mint_a, mint_b)`, creating it on first use
pub fn process(
    ctx: Context<Deposit>,
    desired_a: u64,
    desired_b: u64,
    min_a: u64,
    min_b: u64,
    deadline: i64,
) -> Result<()> {
    let params = DepositParams {
        asset_a: ctx.accounts.mint_a.key(),
        asset_b: ctx.accounts.mint_b.key(),
        desired_a: desired_a as u128,
        desired_b: desired_b as u128,
        min_a: min_a as u128,
        min_b: min_b as u128,
        recipient: ctx.accounts.recipient.key(),
        deadline,
    };
    ctx.accounts.deposit(ctx.bumps.pool, &params)
}

impl<'info> Deposit<'info> {
    fn deposit(&mut self, bump: u8, params: &DepositParams) -> Result<()> {
        let key = PairKey::new(params.asset_a, params.asset_b)?;
        let now = Clock::get()?.unix_timestamp;

        let authority = PoolAuthority {
            info: self.pool.to_account_info(),
            pair: key,
            bump,
        };
        let custody = authority.key();

        let mut assets = VaultTransfers {
            token_program: self.token_program.to_account_info(),
            caller: self.depositor.to_account_info(),
            pool: authority.clone(),
            legs: [
                AssetLeg {
                    mint: &self.mint_a,
                    vault: &self.vault_a,
                    source: Some(&*self.depositor_a),
                    destination: None,
                },
                AssetLeg {
                    mint: &self.mint_b,
                    vault: &self.vault_b,
                    source: Some(&*self.depositor_b),
                    destination: None,
                },
            ],
        };
        let mut shares = ShareMinting {
            token_program: self.token_program.to_account_info(),
            share_mint: &self.share_mint,
            pool: authority,
            recipient_shares: Some(&*self.recipient_shares),
            holder: None,
        };

        let state = &mut **self.pool;
        state.bump = bump;
        let mut ledger = PoolSlot::new(key, &mut state.pool);
        let mut registry = BindingSlot::new(key, &mut state.share_mint);

        let event = PoolOperations {
            ledger: &mut ledger,
            registry: &mut registry,
            assets: &mut assets,
            shares: &mut shares,
            custody,
            caller: self.depositor.key(),
            now,
        }
        .deposit(params)?;

        emit!(event);
        Ok(())
    }
}

#[derive(Accounts)]
pub struct Deposit<'info> {
    /// Liquidity provider paying both assets
    #[account(mut)]
    pub depositor: Signer<'info>,

    /// CHECK: only the key is used; minted shares go to its associated account
    pub recipient: UncheckedAccount<'info>,

    /// First asset in the caller's order
    pub mint_a: Box<InterfaceAccount<'info, Mint>>,

    /// Second asset in the caller's order
    pub mint_b: Box<InterfaceAccount<'info, Mint>>,

    /// Pool PDA, keyed by the canonically ordered pair
    #[account(
        init_if_needed,
        payer = depositor,
        space = 8 + PairPool::INIT_SPACE,
        seeds = [
            POOL_SEED,
            seed_low(&mint_a.key(), &mint_b.key()).as_ref(),
            seed_high(&mint_a.key(), &mint_b.key()).as_ref()
        ],
        bump,
    )]
    pub pool: Box<Account<'info, PairPool>>,

    /// Liquidity share mint, created with the pool
    #[account(
        init_if_needed,
        payer = depositor,
        seeds = [SHARE_MINT_SEED, pool.key().as_ref()],
        bump,
        mint::decimals = SHARE_DECIMALS,
        mint::authority = pool,
        mint::token_program = token_program,
    )]
    pub share_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Pool custody of `mint_a`
    #[account(
        init_if_needed,
        payer = depositor,
        associated_token::mint = mint_a,
        associated_token::authority = pool,
        associated_token::token_program = token_program,
    )]
    pub vault_a: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Pool custody of `mint_b`
    #[account(
        init_if_needed,
        payer = depositor,
        associated_token::mint = mint_b,
        associated_token::authority = pool,
        associated_token::token_program = token_program,
    )]
    pub vault_b: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = mint_a,
        token::authority = depositor,
        token::token_program = token_program,
    )]
    pub depositor_a: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = mint_b,
        token::authority = depositor,
        token::token_program = token_program,
    )]
    pub depositor_b: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Recipient's share account
    #[account(
        init_if_needed,
        payer = depositor,
        associated_token::mint = share_mint,
        associated_token::authority = recipient,
        associated_token::token_program = token_program,
    )]
    pub recipient_shares: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}
