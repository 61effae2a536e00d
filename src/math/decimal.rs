//! Wad-scaled decimal, precise to 18 digits.

#![allow(clippy::assign_op_pattern)]
#![allow(clippy::manual_range_contains)]
#![allow(missing_docs)]

use {
    crate::{
        error::CdpError,
        math::{common::*, Rate},
    },
    core::fmt,
    odra::casper_types::U256,
    alloc::{string::ToString, vec, vec::Vec},
};

/// Amounts, prices, and the interest index, scaled by `10^18`.
///
/// Every division truncates toward zero. That systematically rounds in the
/// market's favor by at most one raw unit per operation, and is one reason
/// accrued debt drifts slightly above what infinite precision would give.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Eq, Ord)]
pub struct Decimal(pub U256);

impl odra::casper_types::bytesrepr::ToBytes for Decimal {
    fn to_bytes(&self) -> Result<Vec<u8>, odra::casper_types::bytesrepr::Error> {
        self.0.to_bytes()
    }

    fn serialized_length(&self) -> usize {
        self.0.serialized_length()
    }
}

impl odra::casper_types::bytesrepr::FromBytes for Decimal {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), odra::casper_types::bytesrepr::Error> {
        let (value, remainder) = U256::from_bytes(bytes)?;
        Ok((Decimal(value), remainder))
    }
}

impl odra::casper_types::CLTyped for Decimal {
    fn cl_type() -> odra::casper_types::CLType {
        odra::casper_types::CLType::U256
    }
}

impl odra::schema::NamedCLTyped for Decimal {
    fn ty() -> odra::schema::casper_contract_schema::NamedCLType {
        <U256 as odra::schema::NamedCLTyped>::ty()
    }
}

impl odra::schema::SchemaCustomTypes for Decimal {
    fn schema_custom_types() -> Vec<Option<odra::schema::casper_contract_schema::CustomType>> {
        Vec::new()
    }
}

impl Decimal {
    /// One
    pub fn one() -> Self {
        Self(Self::wad())
    }

    /// Zero
    pub fn zero() -> Self {
        Self(U256::zero())
    }

    fn wad() -> U256 {
        U256::from(WAD)
    }

    /// Return raw scaled value as u128 (assumes the value fits into u128)
    #[allow(clippy::wrong_self_convention)]
    pub fn to_scaled_val(&self) -> u128 {
        self.0.as_u128()
    }

    /// Create decimal from a raw scaled value
    pub fn from_scaled_val(scaled_val: u128) -> Self {
        Self(U256::from(scaled_val))
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut scaled_val = self.0.to_string();
        if scaled_val.len() <= SCALE {
            scaled_val.insert_str(0, &vec!["0"; SCALE - scaled_val.len()].join(""));
            scaled_val.insert_str(0, "0.");
        } else {
            scaled_val.insert(scaled_val.len() - SCALE, '.');
        }
        f.write_str(&scaled_val)
    }
}

impl From<u64> for Decimal {
    fn from(val: u64) -> Self {
        Self(Self::wad().checked_mul(U256::from(val)).unwrap_or(U256::zero()))
    }
}

impl TryAdd for Decimal {
    fn try_add(self, rhs: Self) -> Result<Self, CdpError> {
        Ok(Self(self.0.checked_add(rhs.0).ok_or(CdpError::MathOverflow)?))
    }
}

impl TrySub for Decimal {
    fn try_sub(self, rhs: Self) -> Result<Self, CdpError> {
        Ok(Self(self.0.checked_sub(rhs.0).ok_or(CdpError::MathOverflow)?))
    }
}

impl TryMul<Decimal> for Decimal {
    fn try_mul(self, rhs: Self) -> Result<Self, CdpError> {
        Ok(Self(
            self.0
                .checked_mul(rhs.0)
                .ok_or(CdpError::MathOverflow)?
                .checked_div(Self::wad())
                .ok_or(CdpError::MathOverflow)?,
        ))
    }
}

// A wad times a ray, divided back by the ray identity, stays a wad. This is
// how the interest index absorbs a compounded per-second rate.
impl TryMul<Rate> for Decimal {
    fn try_mul(self, rhs: Rate) -> Result<Self, CdpError> {
        Ok(Self(
            self.0
                .checked_mul(rhs.0)
                .ok_or(CdpError::MathOverflow)?
                .checked_div(U256::from(RAY))
                .ok_or(CdpError::MathOverflow)?,
        ))
    }
}

impl TryDiv<Decimal> for Decimal {
    fn try_div(self, rhs: Self) -> Result<Self, CdpError> {
        if rhs.0.is_zero() {
            return Err(CdpError::DivideByZero);
        }
        Ok(Self(
            self.0
                .checked_mul(Self::wad())
                .ok_or(CdpError::MathOverflow)?
                .checked_div(rhs.0)
                .ok_or(CdpError::MathOverflow)?,
        ))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_scaler() {
        assert_eq!(U256::from(WAD), Decimal::wad());
        assert_eq!(Decimal::one(), Decimal::from(1u64));
    }

    #[test]
    fn test_mul_truncates_toward_zero() {
        let a = Decimal::from_scaled_val(1_500_000_000_000_000_000); // 1.5
        assert_eq!(
            a.try_mul(a).unwrap(),
            Decimal::from_scaled_val(2_250_000_000_000_000_000)
        );
        // 1 raw unit squared rounds all the way down to zero.
        let dust = Decimal::from_scaled_val(1);
        assert_eq!(dust.try_mul(dust).unwrap(), Decimal::zero());
    }

    #[test]
    fn test_div_truncates_toward_zero() {
        let ten = Decimal::from(10u64);
        let three = Decimal::from(3u64);
        assert_eq!(
            ten.try_div(three).unwrap(),
            Decimal::from_scaled_val(3_333_333_333_333_333_333)
        );
    }

    #[test]
    fn test_div_by_zero() {
        assert_eq!(
            Decimal::one().try_div(Decimal::zero()),
            Err(CdpError::DivideByZero)
        );
    }

    #[test]
    fn test_mul_overflow() {
        let huge = Decimal(U256::max_value());
        assert_eq!(huge.try_mul(huge), Err(CdpError::MathOverflow));
    }

    #[test]
    fn test_display() {
        assert_eq!(Decimal::one().to_string(), "1.000000000000000000");
        assert_eq!(
            Decimal::from_scaled_val(1_500_000).to_string(),
            "0.000000000001500000"
        );
    }
}
