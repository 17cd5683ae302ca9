//! Constant product math (x * y = k) without fees.
//!
//! Every function is pure and truncates toward zero. Products are taken in
//! 256 bits so 1e18-scaled amounts never overflow mid-computation; results
//! that do not fit back into `u128` fail with `MathOverflow`.

use anchor_lang::prelude::*;
use primitive_types::U256;

use crate::constants::PRICE_SCALE;
use crate::errors::AmmError;

/// `floor(a * b / d)` with a 256-bit intermediate.
pub fn mul_div(a: u128, b: u128, d: u128) -> Result<u128> {
    require!(d != 0, AmmError::EmptyPool);
    narrow(U256::from(a) * U256::from(b) / U256::from(d))
}

fn narrow(value: U256) -> Result<u128> {
    require!(value <= U256::from(u128::MAX), AmmError::MathOverflow);
    Ok(value.as_u128())
}

/// Output of selling `amount_in` into a pool holding `(reserve_in, reserve_out)`.
///
/// `amount_out = floor(amount_in * reserve_out / (reserve_in + amount_in))`
pub fn swap_output(amount_in: u128, reserve_in: u128, reserve_out: u128) -> Result<u128> {
    require!(amount_in > 0, AmmError::ZeroAmount);
    require!(reserve_in > 0 && reserve_out > 0, AmmError::EmptyPool);

    let numerator = U256::from(amount_in) * U256::from(reserve_out);
    let denominator = U256::from(reserve_in) + U256::from(amount_in);
    narrow(numerator / denominator)
}

/// Price of one unit of the `reserve_of` asset in units of the other, scaled by 1e18.
pub fn spot_price(reserve_of: u128, reserve_against: u128) -> Result<u128> {
    require!(reserve_of > 0 && reserve_against > 0, AmmError::EmptyPool);
    mul_div(reserve_against, PRICE_SCALE, reserve_of)
}

/// Amount of the `to` asset worth `amount` of the `from` asset at the pool ratio.
pub fn proportional(amount: u128, reserve_from: u128, reserve_to: u128) -> Result<u128> {
    require!(amount > 0, AmmError::ZeroAmount);
    require!(reserve_from > 0 && reserve_to > 0, AmmError::EmptyPool);
    mul_div(amount, reserve_to, reserve_from)
}

/// Amounts actually accepted from a depositor offering up to `(desired_a, desired_b)`.
///
/// An empty pool takes the desired amounts unchanged; the first depositor sets
/// the price. Otherwise whichever side binds first is taken in full and the
/// other side is scaled to the current reserve ratio.
pub fn optimal_deposit(
    desired_a: u128,
    desired_b: u128,
    min_a: u128,
    min_b: u128,
    reserve_a: u128,
    reserve_b: u128,
) -> Result<(u128, u128)> {
    if reserve_a == 0 && reserve_b == 0 {
        return Ok((desired_a, desired_b));
    }

    let candidate_b = proportional(desired_a, reserve_a, reserve_b)?;
    if candidate_b <= desired_b {
        require!(candidate_b >= min_b, AmmError::SlippageExceeded);
        return Ok((desired_a, candidate_b));
    }

    let candidate_a = proportional(desired_b, reserve_b, reserve_a)?;
    if candidate_a > desired_a {
        msg!(
            "optimal deposit overshoot: candidate_a {} > desired_a {}",
            candidate_a,
            desired_a
        );
        return err!(AmmError::InvariantViolation);
    }
    require!(candidate_a >= min_a, AmmError::SlippageExceeded);
    Ok((candidate_a, desired_b))
}

/// Liquidity shares minted for depositing `(amount_a, amount_b)`.
///
/// The first deposit mints `floor(amount_a * amount_b / 1e18)`. Later deposits
/// mint the smaller of the two contribution ratios applied to `total_shares`.
pub fn shares_for_deposit(
    amount_a: u128,
    amount_b: u128,
    reserve_a: u128,
    reserve_b: u128,
    total_shares: u128,
) -> Result<u128> {
    if total_shares == 0 {
        return mul_div(amount_a, amount_b, PRICE_SCALE);
    }

    require!(reserve_a > 0 && reserve_b > 0, AmmError::EmptyPool);
    let by_a = mul_div(amount_a, total_shares, reserve_a)?;
    let by_b = mul_div(amount_b, total_shares, reserve_b)?;
    Ok(by_a.min(by_b))
}

/// Proportional redemption of `shares` against the pool reserves.
pub fn amounts_for_withdraw(
    shares: u128,
    reserve_a: u128,
    reserve_b: u128,
    total_shares: u128,
) -> Result<(u128, u128)> {
    require!(shares > 0, AmmError::ZeroAmount);
    require!(shares <= total_shares, AmmError::InsufficientLiquidity);

    let amount_a = mul_div(shares, reserve_a, total_shares)?;
    let amount_b = mul_div(shares, reserve_b, total_shares)?;
    Ok((amount_a, amount_b))
}

#[cfg(test)]
mod tests {
    use super::*;

    const E18: u128 = PRICE_SCALE;

    #[test]
    fn swap_output_matches_reference_value() {
        let out = swap_output(100 * E18, 1000 * E18, 2000 * E18).unwrap();
        assert_eq!(out, 181_818_181_818_181_818_181);
    }

    #[test]
    fn swap_output_rejects_zero_input() {
        assert_eq!(
            swap_output(0, 10, 10).unwrap_err(),
            AmmError::ZeroAmount.into()
        );
    }

    #[test]
    fn swap_output_rejects_empty_pool() {
        assert_eq!(
            swap_output(5, 0, 10).unwrap_err(),
            AmmError::EmptyPool.into()
        );
        assert_eq!(
            swap_output(5, 10, 0).unwrap_err(),
            AmmError::EmptyPool.into()
        );
    }

    #[test]
    fn swap_output_never_drains_pool() {
        // Even an enormous input leaves at least one unit behind
        let out = swap_output(u128::MAX, 1, 1_000).unwrap();
        assert!(out < 1_000);
    }

    #[test]
    fn spot_price_is_scaled() {
        assert_eq!(spot_price(1000 * E18, 2000 * E18).unwrap(), 2 * E18);
        assert_eq!(spot_price(2000 * E18, 1000 * E18).unwrap(), E18 / 2);
        assert_eq!(
            spot_price(0, 1).unwrap_err(),
            AmmError::EmptyPool.into()
        );
    }

    #[test]
    fn proportional_truncates() {
        assert_eq!(proportional(10, 3, 1).unwrap(), 3);
        assert_eq!(proportional(500 * E18, 1000 * E18, 2000 * E18).unwrap(), 1000 * E18);
    }

    #[test]
    fn empty_pool_accepts_desired_amounts() {
        let used = optimal_deposit(1000 * E18, 2000 * E18, 0, 0, 0, 0).unwrap();
        assert_eq!(used, (1000 * E18, 2000 * E18));
    }

    #[test]
    fn a_constrained_deposit() {
        let used = optimal_deposit(500 * E18, 2000 * E18, 0, 0, 1000 * E18, 2000 * E18).unwrap();
        assert_eq!(used, (500 * E18, 1000 * E18));
    }

    #[test]
    fn b_constrained_deposit() {
        let used = optimal_deposit(1000 * E18, 500 * E18, 0, 0, 1000 * E18, 2000 * E18).unwrap();
        assert_eq!(used, (250 * E18, 500 * E18));
    }

    #[test]
    fn deposit_below_min_b_fails() {
        let result = optimal_deposit(500, 2000, 0, 1001, 1000, 2000);
        assert_eq!(result.unwrap_err(), AmmError::SlippageExceeded.into());
    }

    #[test]
    fn deposit_below_min_a_fails() {
        let result = optimal_deposit(1000, 500, 251, 0, 1000, 2000);
        assert_eq!(result.unwrap_err(), AmmError::SlippageExceeded.into());
    }

    #[test]
    fn first_mint_uses_product_rule() {
        let shares = shares_for_deposit(1000 * E18, 2000 * E18, 0, 0, 0).unwrap();
        assert_eq!(shares, 2_000_000 * E18);
    }

    #[test]
    fn first_mint_can_round_to_zero() {
        assert_eq!(shares_for_deposit(1_000, 1_000, 0, 0, 0).unwrap(), 0);
    }

    #[test]
    fn later_mint_takes_less_favourable_ratio() {
        // 10% of A but 5% of B: only 5% of shares
        let shares = shares_for_deposit(100, 100, 1000, 2000, 10_000).unwrap();
        assert_eq!(shares, 500);
    }

    #[test]
    fn full_withdraw_returns_all_reserves() {
        let (a, b) = amounts_for_withdraw(2_000_000 * E18, 1000 * E18, 2000 * E18, 2_000_000 * E18).unwrap();
        assert_eq!((a, b), (1000 * E18, 2000 * E18));
    }

    #[test]
    fn withdraw_more_than_supply_fails() {
        assert_eq!(
            amounts_for_withdraw(11, 100, 100, 10).unwrap_err(),
            AmmError::InsufficientLiquidity.into()
        );
    }

    #[test]
    fn mul_div_reports_overflow() {
        assert_eq!(
            mul_div(u128::MAX, u128::MAX, 1).unwrap_err(),
            AmmError::MathOverflow.into()
        );
    }
}
