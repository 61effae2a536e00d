//! Ray-scaled interest rate, precise to 27 digits.

use {
    crate::{
        error::CdpError,
        math::{common::*, Decimal, TryMul},
    },
    core::fmt,
    odra::casper_types::U256,
    alloc::{format, string::ToString, vec::Vec},
};

/// Per-second compounding rate, scaled by `10^27`.
///
/// A wad would lose the tail of rates like `1.000000001` once they are
/// raised to a large power; the extra nine digits keep year-long
/// compounding honest.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Eq, Ord)]
pub struct Rate(pub U256);

impl odra::casper_types::bytesrepr::ToBytes for Rate {
    fn to_bytes(&self) -> Result<Vec<u8>, odra::casper_types::bytesrepr::Error> {
        self.0.to_bytes()
    }

    fn serialized_length(&self) -> usize {
        self.0.serialized_length()
    }
}

impl odra::casper_types::bytesrepr::FromBytes for Rate {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), odra::casper_types::bytesrepr::Error> {
        let (value, remainder) = U256::from_bytes(bytes)?;
        Ok((Rate(value), remainder))
    }
}

impl odra::casper_types::CLTyped for Rate {
    fn cl_type() -> odra::casper_types::CLType {
        odra::casper_types::CLType::U256
    }
}

impl odra::schema::NamedCLTyped for Rate {
    fn ty() -> odra::schema::casper_contract_schema::NamedCLType {
        <U256 as odra::schema::NamedCLTyped>::ty()
    }
}

impl odra::schema::SchemaCustomTypes for Rate {
    fn schema_custom_types() -> Vec<Option<odra::schema::casper_contract_schema::CustomType>> {
        Vec::new()
    }
}

impl Rate {
    /// One, the rate at which nothing accrues
    pub fn one() -> Self {
        Self(Self::ray())
    }

    /// Zero
    pub fn zero() -> Self {
        Self(U256::zero())
    }

    fn ray() -> U256 {
        U256::from(RAY)
    }

    /// Return raw scaled value as u128
    pub fn to_scaled_val(&self) -> u128 {
        self.0.as_u128()
    }

    /// Create rate from a raw scaled value
    pub fn from_scaled_val(scaled_val: u128) -> Self {
        Self(U256::from(scaled_val))
    }

    /// Upscale a wad-precision rate to ray precision
    pub fn from_decimal(decimal: Decimal) -> Result<Self, CdpError> {
        Ok(Self(
            decimal
                .0
                .checked_mul(U256::from(WAD_TO_RAY))
                .ok_or(CdpError::MathOverflow)?,
        ))
    }

    /// Raise to an integer power by repeated squaring (compound interest).
    /// `try_pow(x, 0)` is one.
    pub fn try_pow(&self, exponent: u64) -> Result<Self, CdpError> {
        if exponent == 0 {
            return Ok(Self::one());
        }

        let mut result = Self::one();
        let mut base = *self;
        let mut exp = exponent;

        while exp > 0 {
            if exp % 2 == 1 {
                result = result.try_mul(base)?;
            }
            exp /= 2;
            if exp > 0 {
                base = base.try_mul(base)?;
            }
        }

        Ok(result)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut scaled_val = self.0.to_string();
        if scaled_val.len() <= RAY_SCALE {
            let padding = "0".repeat(RAY_SCALE - scaled_val.len());
            scaled_val = format!("0.{}{}", padding, scaled_val);
        } else {
            scaled_val.insert(scaled_val.len() - RAY_SCALE, '.');
        }
        f.write_str(&scaled_val)
    }
}

impl TryMul<Rate> for Rate {
    fn try_mul(self, rhs: Self) -> Result<Self, CdpError> {
        Ok(Self(
            self.0
                .checked_mul(rhs.0)
                .ok_or(CdpError::MathOverflow)?
                .checked_div(Self::ray())
                .ok_or(CdpError::MathOverflow)?,
        ))
    }
}

impl TryDiv<Rate> for Rate {
    fn try_div(self, rhs: Self) -> Result<Self, CdpError> {
        if rhs.0.is_zero() {
            return Err(CdpError::DivideByZero);
        }
        Ok(Self(
            self.0
                .checked_mul(Self::ray())
                .ok_or(CdpError::MathOverflow)?
                .checked_div(rhs.0)
                .ok_or(CdpError::MathOverflow)?,
        ))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    // 1.000001 per second at ray precision
    const RATE_RAY: u128 = 1_000_001_000_000_000_000_000_000_000;

    #[test]
    fn test_pow_zero_is_one() {
        let rate = Rate::from_scaled_val(RATE_RAY);
        assert_eq!(rate.try_pow(0).unwrap(), Rate::one());
        assert_eq!(Rate::zero().try_pow(0).unwrap(), Rate::one());
    }

    #[test]
    fn test_pow_two_steps_exact() {
        let rate = Rate::from_scaled_val(RATE_RAY);
        // (1 + 1e-6)^2 = 1 + 2e-6 + 1e-12, exactly representable in ray
        assert_eq!(
            rate.try_pow(2).unwrap(),
            Rate::from_scaled_val(1_000_002_000_001_000_000_000_000_000)
        );
    }

    #[test]
    fn test_pow_composes_additively() {
        let rate = Rate::from_scaled_val(RATE_RAY);
        let split = rate
            .try_pow(5)
            .unwrap()
            .try_mul(rate.try_pow(7).unwrap())
            .unwrap();
        let whole = rate.try_pow(12).unwrap();
        // each truncating multiplication may shed a raw unit
        let diff = split.0.max(whole.0) - split.0.min(whole.0);
        assert!(diff <= U256::from(12u64));
    }

    #[test]
    fn test_from_decimal() {
        let wad_rate = Decimal::from_scaled_val(1_000_001_000_000_000_000);
        assert_eq!(
            Rate::from_decimal(wad_rate).unwrap(),
            Rate::from_scaled_val(RATE_RAY)
        );
    }

    #[test]
    fn test_mul_identity() {
        let rate = Rate::from_scaled_val(RATE_RAY);
        assert_eq!(rate.try_mul(Rate::one()).unwrap(), rate);
    }

    #[test]
    fn test_div_by_zero() {
        assert_eq!(
            Rate::one().try_div(Rate::zero()),
            Err(CdpError::DivideByZero)
        );
    }
}
