use anchor_lang::prelude::*;

#[error_code]
pub enum AmmError {
    #[msg("Deadline for this operation has passed")]
    Expired,

    #[msg("Recipient must not be the null identifier")]
    InvalidRecipient,

    #[msg("Amount must be greater than zero")]
    ZeroAmount,

    #[msg("Minimum amount exceeds the desired amount")]
    MinExceedsDesired,

    #[msg("Pair assets must be distinct and non-null")]
    InvalidPair,

    #[msg("Swap path must contain exactly two assets")]
    InvalidPath,

    #[msg("Arithmetic overflow")]
    MathOverflow,

    #[msg("No pool exists for this pair")]
    PoolNotFound,

    #[msg("Pool has no reserves")]
    EmptyPool,

    #[msg("Requested shares exceed the outstanding supply")]
    InsufficientLiquidity,

    #[msg("Deposit is too small to mint any liquidity shares")]
    InsufficientSharesMinted,

    #[msg("Swap input is too small to produce any output")]
    InsufficientOutput,

    #[msg("Asset transfer failed")]
    TransferFailed,

    #[msg("Share token operation failed")]
    ShareTokenFailed,

    #[msg("Output amount is less than the specified minimum")]
    SlippageExceeded,

    #[msg("Internal invariant violated")]
    InvariantViolation,

    #[msg("Attempted to remove more than the pool holds")]
    InsufficientReserve,

    #[msg("Pair is already bound to a different share token")]
    BindingConflict,
}

/// Broad class of an [`AmmError`], used by callers to decide how to react.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input; retry with corrected arguments
    Validation,
    /// Current pool state does not allow the operation
    State,
    /// Price moved past the caller's bounds
    Slippage,
    /// Internal consistency failure, signals a defect
    Invariant,
}

impl AmmError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AmmError::Expired
            | AmmError::InvalidRecipient
            | AmmError::ZeroAmount
            | AmmError::MinExceedsDesired
            | AmmError::InvalidPair
            | AmmError::InvalidPath
            | AmmError::MathOverflow => ErrorKind::Validation,
            AmmError::PoolNotFound
            | AmmError::EmptyPool
            | AmmError::InsufficientLiquidity
            | AmmError::InsufficientSharesMinted
            | AmmError::InsufficientOutput
            | AmmError::TransferFailed
            | AmmError::ShareTokenFailed => ErrorKind::State,
            AmmError::SlippageExceeded => ErrorKind::Slippage,
            AmmError::InvariantViolation
            | AmmError::InsufficientReserve
            | AmmError::BindingConflict => ErrorKind::Invariant,
        }
    }
}
