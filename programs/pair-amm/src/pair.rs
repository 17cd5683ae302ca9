//! Canonical ordering of asset pairs.
//!
//! Every reserve lookup goes through [`PairKey::resolve`] so that `(X, Y)` and
//! `(Y, X)` address the same pool. The lower identifier (byte-wise) is always
//! stored first.

use anchor_lang::prelude::*;

use crate::errors::AmmError;

/// Ordered pair of asset identifiers, `low < high`.
#[derive(
    AnchorSerialize,
    AnchorDeserialize,
    InitSpace,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
)]
pub struct PairKey {
    pub low: Pubkey,
    pub high: Pubkey,
}

/// How the caller's `(A, B)` argument order maps onto `(low, high)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    /// A is the low asset
    Canonical,
    /// A is the high asset
    Reversed,
}

/// Which way value flows through a pool during a swap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    LowToHigh,
    HighToLow,
}

/// Returns `(low, high)` for two asset identifiers.
///
/// Fails with `InvalidPair` when the assets are equal or either one is the
/// null identifier.
pub fn canonicalize(asset_a: Pubkey, asset_b: Pubkey) -> Result<(Pubkey, Pubkey)> {
    let key = PairKey::new(asset_a, asset_b)?;
    Ok((key.low, key.high))
}

impl PairKey {
    pub fn new(asset_a: Pubkey, asset_b: Pubkey) -> Result<Self> {
        Self::resolve(asset_a, asset_b).map(|(key, _)| key)
    }

    /// Canonicalizes the pair and reports how the arguments were ordered.
    pub fn resolve(asset_a: Pubkey, asset_b: Pubkey) -> Result<(Self, Orientation)> {
        require!(
            asset_a != Pubkey::default() && asset_b != Pubkey::default(),
            AmmError::InvalidPair
        );
        require!(asset_a != asset_b, AmmError::InvalidPair);

        if asset_a < asset_b {
            Ok((PairKey { low: asset_a, high: asset_b }, Orientation::Canonical))
        } else {
            Ok((PairKey { low: asset_b, high: asset_a }, Orientation::Reversed))
        }
    }

    /// Direction of a swap that sells `asset_in` into this pair.
    pub fn direction_from(&self, asset_in: &Pubkey) -> Result<Direction> {
        if *asset_in == self.low {
            Ok(Direction::LowToHigh)
        } else if *asset_in == self.high {
            Ok(Direction::HighToLow)
        } else {
            err!(AmmError::InvalidPair)
        }
    }
}

impl Orientation {
    /// Reorders a caller-ordered `(a, b)` into `(low, high)`.
    ///
    /// The mapping is its own inverse, so the same call turns canonical
    /// values back into caller order.
    pub fn arrange<T>(self, first: T, second: T) -> (T, T) {
        match self {
            Orientation::Canonical => (first, second),
            Orientation::Reversed => (second, first),
        }
    }
}

/// Lower of two asset keys, used in PDA seeds.
pub fn seed_low(asset_a: &Pubkey, asset_b: &Pubkey) -> Pubkey {
    if asset_a <= asset_b {
        *asset_a
    } else {
        *asset_b
    }
}

/// Higher of two asset keys, used in PDA seeds.
pub fn seed_high(asset_a: &Pubkey, asset_b: &Pubkey) -> Pubkey {
    if asset_a <= asset_b {
        *asset_b
    } else {
        *asset_a
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(byte: u8) -> Pubkey {
        Pubkey::new_from_array([byte; 32])
    }

    #[test]
    fn order_of_arguments_does_not_matter() {
        let (x, y) = (key(7), key(3));
        assert_eq!(canonicalize(x, y).unwrap(), canonicalize(y, x).unwrap());
        assert_eq!(canonicalize(x, y).unwrap(), (y, x));
    }

    #[test]
    fn resolve_reports_orientation() {
        let (k, o) = PairKey::resolve(key(1), key(2)).unwrap();
        assert_eq!(o, Orientation::Canonical);
        assert_eq!(o.arrange(10, 20), (10, 20));

        let (k2, o2) = PairKey::resolve(key(2), key(1)).unwrap();
        assert_eq!(k, k2);
        assert_eq!(o2, Orientation::Reversed);
        assert_eq!(o2.arrange(10, 20), (20, 10));
    }

    #[test]
    fn rejects_identical_assets() {
        assert_eq!(
            PairKey::new(key(4), key(4)).unwrap_err(),
            AmmError::InvalidPair.into()
        );
    }

    #[test]
    fn rejects_null_asset() {
        assert_eq!(
            PairKey::new(Pubkey::default(), key(4)).unwrap_err(),
            AmmError::InvalidPair.into()
        );
        assert_eq!(
            PairKey::new(key(4), Pubkey::default()).unwrap_err(),
            AmmError::InvalidPair.into()
        );
    }

    #[test]
    fn direction_follows_input_asset() {
        let pair = PairKey::new(key(9), key(5)).unwrap();
        assert_eq!(pair.direction_from(&key(5)).unwrap(), Direction::LowToHigh);
        assert_eq!(pair.direction_from(&key(9)).unwrap(), Direction::HighToLow);
        assert!(pair.direction_from(&key(6)).is_err());
    }

    #[test]
    fn seeds_match_canonical_key() {
        let (a, b) = (key(200), key(17));
        let pair = PairKey::new(a, b).unwrap();
        assert_eq!(seed_low(&a, &b), pair.low);
        assert_eq!(seed_high(&a, &b), pair.high);
        assert_eq!(seed_low(&b, &a), pair.low);
    }
}
