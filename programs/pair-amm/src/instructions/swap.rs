use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

use crate::constants::POOL_SEED;
use crate::instructions::token_cpi::{AssetLeg, PoolAuthority, ShareMinting, VaultTransfers};
use crate::ledger::PoolSlot;
use crate::ops::{PoolOperations, SwapParams};
use crate::pair::{seed_high, seed_low, PairKey};
use crate::registry::BindingSlot;
use crate::state::PairPool;

/// Sell exactly `amount_in` of `mint_in` for at least `amount_out_min` of
/// `mint_out` (x * y = k, no fee)
pub fn process(
    ctx: Context<SwapTokens>,
    amount_in: u64,
    amount_out_min: u64,
    deadline: i64,
) -> Result<()> {
    let params = SwapParams {
        amount_in: amount_in as u128,
        amount_out_min: amount_out_min as u128,
        path: vec![ctx.accounts.mint_in.key(), ctx.accounts.mint_out.key()],
        recipient: ctx.accounts.recipient.key(),
        deadline,
    };
    ctx.accounts.swap(&params)
}

impl<'info> SwapTokens<'info> {
    fn swap(&mut self, params: &SwapParams) -> Result<()> {
        let key = PairKey::new(self.mint_in.key(), self.mint_out.key())?;
        let now = Clock::get()?.unix_timestamp;

        let authority = PoolAuthority {
            info: self.pool.to_account_info(),
            pair: key,
            bump: self.pool.bump,
        };
        let custody = authority.key();

        let mut assets = VaultTransfers {
            token_program: self.token_program.to_account_info(),
            caller: self.trader.to_account_info(),
            pool: authority.clone(),
            legs: [
                AssetLeg {
                    mint: &self.mint_in,
                    vault: &self.vault_in,
                    source: Some(&*self.trader_in),
                    destination: None,
                },
                AssetLeg {
                    mint: &self.mint_out,
                    vault: &self.vault_out,
                    source: None,
                    destination: Some(&*self.recipient_out),
                },
            ],
        };
        // Swaps never touch shares; the registry only proves the pool exists.
        let mut shares = ShareMinting {
            token_program: self.token_program.to_account_info(),
            share_mint: &self.share_mint,
            pool: authority,
            recipient_shares: None,
            holder: None,
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
            caller: self.trader.key(),
            now,
        }
        .swap(params)?;

        emit!(event);
        Ok(())
    }
}

#[derive(Accounts)]
pub struct SwapTokens<'info> {
    #[account(mut)]
    pub trader: Signer<'info>,

    /// CHECK: only the key is used; output goes to its associated account
    pub recipient: UncheckedAccount<'info>,

    /// Token being sold
    pub mint_in: Box<InterfaceAccount<'info, Mint>>,

    /// Token being bought
    pub mint_out: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        seeds = [
            POOL_SEED,
            seed_low(&mint_in.key(), &mint_out.key()).as_ref(),
            seed_high(&mint_in.key(), &mint_out.key()).as_ref()
        ],
        bump = pool.bump,
    )]
    pub pool: Box<Account<'info, PairPool>>,

    #[account(address = pool.share_mint)]
    pub share_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        associated_token::mint = mint_in,
        associated_token::authority = pool,
        associated_token::token_program = token_program,
    )]
    pub vault_in: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        associated_token::mint = mint_out,
        associated_token::authority = pool,
        associated_token::token_program = token_program,
    )]
    pub vault_out: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = mint_in,
        token::authority = trader,
        token::token_program = token_program,
    )]
    pub trader_in: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        init_if_needed,
        payer = trader,
        associated_token::mint = mint_out,
        associated_token::authority = recipient,
        associated_token::token_program = token_program,
    )]
    pub recipient_out: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}
