//! SPL token-interface implementations of the engine's collaborators.
//!
//! The pool PDA owns both vaults and is the share mint authority, so every
//! outgoing transfer and every mint is signed with the pool seeds.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{self, Burn, Mint, MintTo, TokenAccount, TransferChecked};

use crate::constants::POOL_SEED;
use crate::errors::AmmError;
use crate::ops::AssetTransfer;
use crate::pair::PairKey;
use crate::registry::ShareToken;

/// Pool PDA acting as signer for vault transfers and share mints
#[derive(Clone)]
pub struct PoolAuthority<'info> {
    pub info: AccountInfo<'info>,
    pub pair: PairKey,
    pub bump: u8,
}

impl<'info> PoolAuthority<'info> {
    pub fn key(&self) -> Pubkey {
        *self.info.key
    }

    fn signed<T>(&self, invoke: impl FnOnce(&[&[&[u8]]]) -> Result<T>) -> Result<T> {
        let bump = [self.bump];
        let seeds: &[&[u8]] = &[
            POOL_SEED,
            self.pair.low.as_ref(),
            self.pair.high.as_ref(),
            &bump,
        ];
        invoke(&[seeds])
    }
}

fn token_amount(amount: u128) -> Result<u64> {
    u64::try_from(amount).map_err(|_| error!(AmmError::MathOverflow))
}

/// Accounts for one asset of the pair
pub struct AssetLeg<'a, 'info> {
    pub mint: &'a InterfaceAccount<'info, Mint>,
    pub vault: &'a InterfaceAccount<'info, TokenAccount>,
    /// Caller's token account that pulls debit
    pub source: Option<&'a InterfaceAccount<'info, TokenAccount>>,
    /// Recipient's token account that pushes credit
    pub destination: Option<&'a InterfaceAccount<'info, TokenAccount>>,
}

pub struct VaultTransfers<'a, 'info> {
    pub token_program: AccountInfo<'info>,
    /// Signer that authorizes pulls from its own token accounts
    pub caller: AccountInfo<'info>,
    pub pool: PoolAuthority<'info>,
    pub legs: [AssetLeg<'a, 'info>; 2],
}

impl<'a, 'info> VaultTransfers<'a, 'info> {
    fn leg(&self, asset: &Pubkey) -> Result<&AssetLeg<'a, 'info>> {
        self.legs
            .iter()
            .find(|leg| leg.mint.key() == *asset)
            .ok_or_else(|| error!(AmmError::TransferFailed))
    }
}

impl AssetTransfer for VaultTransfers<'_, '_> {
    fn custody(&self) -> Pubkey {
        self.pool.key()
    }

    fn pull(&mut self, asset: &Pubkey, from: &Pubkey, to: &Pubkey, amount: u128) -> Result<()> {
        require_keys_eq!(*to, self.pool.key(), AmmError::TransferFailed);
        require_keys_eq!(*from, *self.caller.key, AmmError::TransferFailed);

        let leg = self.leg(asset)?;
        let source = leg
            .source
            .ok_or_else(|| error!(AmmError::TransferFailed))?;

        let ctx = CpiContext::new(
            self.token_program.clone(),
            TransferChecked {
                from: source.to_account_info(),
                mint: leg.mint.to_account_info(),
                to: leg.vault.to_account_info(),
                authority: self.caller.clone(),
            },
        );
        token_interface::transfer_checked(ctx, token_amount(amount)?, leg.mint.decimals)
    }

    fn push(&mut self, asset: &Pubkey, to: &Pubkey, amount: u128) -> Result<()> {
        let leg = self.leg(asset)?;
        let destination = leg
            .destination
            .ok_or_else(|| error!(AmmError::TransferFailed))?;
        require_keys_eq!(destination.owner, *to, AmmError::TransferFailed);

        let amount = token_amount(amount)?;
        self.pool.signed(|signer| {
            let ctx = CpiContext::new_with_signer(
                self.token_program.clone(),
                TransferChecked {
                    from: leg.vault.to_account_info(),
                    mint: leg.mint.to_account_info(),
                    to: destination.to_account_info(),
                    authority: self.pool.info.clone(),
                },
                signer,
            );
            token_interface::transfer_checked(ctx, amount, leg.mint.decimals)
        })
    }
}

/// Share mint PDA plus the holder accounts one instruction touches
pub struct ShareMinting<'a, 'info> {
    pub token_program: AccountInfo<'info>,
    pub share_mint: &'a InterfaceAccount<'info, Mint>,
    pub pool: PoolAuthority<'info>,
    /// Receives minted shares
    pub recipient_shares: Option<&'a InterfaceAccount<'info, TokenAccount>>,
    /// Share account burned from, with its signing owner
    pub holder: Option<(&'a InterfaceAccount<'info, TokenAccount>, AccountInfo<'info>)>,
}

impl ShareMinting<'_, '_> {
    fn check_token(&self, token: &Pubkey) -> Result<()> {
        require_keys_eq!(*token, self.share_mint.key(), AmmError::ShareTokenFailed);
        Ok(())
    }
}

impl ShareToken for ShareMinting<'_, '_> {
    // The mint itself is allocated by `init_if_needed`; binding only has to
    // confirm the pool controls it.
    fn create(&mut self, name: &str, symbol: &str, controller: &Pubkey) -> Result<Pubkey> {
        require_keys_eq!(*controller, self.pool.key(), AmmError::ShareTokenFailed);
        msg!(
            "share mint {} created for {} ({})",
            self.share_mint.key(),
            name,
            symbol
        );
        Ok(self.share_mint.key())
    }

    fn mint(&mut self, token: &Pubkey, to: &Pubkey, amount: u128) -> Result<()> {
        self.check_token(token)?;
        let destination = self
            .recipient_shares
            .ok_or_else(|| error!(AmmError::ShareTokenFailed))?;
        require_keys_eq!(destination.owner, *to, AmmError::ShareTokenFailed);

        let amount = token_amount(amount)?;
        self.pool.signed(|signer| {
            let ctx = CpiContext::new_with_signer(
                self.token_program.clone(),
                MintTo {
                    mint: self.share_mint.to_account_info(),
                    to: destination.to_account_info(),
                    authority: self.pool.info.clone(),
                },
                signer,
            );
            token_interface::mint_to(ctx, amount)
        })
    }

    fn burn(&mut self, token: &Pubkey, from: &Pubkey, amount: u128) -> Result<()> {
        self.check_token(token)?;
        let (holder, owner) = self
            .holder
            .clone()
            .ok_or_else(|| error!(AmmError::ShareTokenFailed))?;
        require_keys_eq!(holder.owner, *from, AmmError::ShareTokenFailed);
        require_keys_eq!(*owner.key, *from, AmmError::ShareTokenFailed);

        let ctx = CpiContext::new(
            self.token_program.clone(),
            Burn {
                mint: self.share_mint.to_account_info(),
                from: holder.to_account_info(),
                authority: owner,
            },
        );
        token_interface::burn(ctx, token_amount(amount)?)
    }
}
