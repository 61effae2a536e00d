//! The single market-wide interest index.
//!
//! The index is never ticked by a timer. It is a pure function of the
//! stored state and the current time, recomputed on demand by every entry
//! point that needs it and committed back to storage only when an
//! operation mutates the market.

use crate::error::CdpError;
use crate::math::{Decimal, Rate, TryMul};

/// Cumulative compounding factor since genesis, plus the rate that drives
/// it and the second it was last materialized at.
#[odra::odra_type]
pub struct InterestAccumulator {
    /// Per-second compounding rate, ray-scaled. `1.0` means no interest.
    pub rate_per_second: Rate,
    /// The index itself, wad-scaled. `1.0` at genesis, non-decreasing.
    pub index: Decimal,
    /// Timestamp (seconds) of the last committed materialization.
    pub last_update: u64,
}

impl InterestAccumulator {
    /// Fresh accumulator: unit index, unit rate, anchored at `now`.
    pub fn genesis(now: u64) -> Self {
        Self {
            rate_per_second: Rate::one(),
            index: Decimal::one(),
            last_update: now,
        }
    }

    /// The index as of `now`, without mutating anything:
    /// `index * rate_per_second ^ elapsed_seconds`.
    pub fn current_index(&self, now: u64) -> Result<Decimal, CdpError> {
        let elapsed = now
            .checked_sub(self.last_update)
            .ok_or(CdpError::MathOverflow)?;
        if elapsed == 0 {
            return Ok(self.index);
        }
        let growth = self.rate_per_second.try_pow(elapsed)?;
        self.index.try_mul(growth)
    }

    /// Materialize the index at `now`. Idempotent within one second;
    /// returns the committed index either way.
    pub fn commit(&mut self, now: u64) -> Result<Decimal, CdpError> {
        if now > self.last_update {
            self.index = self.current_index(now)?;
            self.last_update = now;
        }
        Ok(self.index)
    }

    /// Swap in a new rate. Commits first, so time elapsed under the old
    /// rate is locked in before the new rate can touch it. Rates below
    /// `1.0` would shrink the index and are rejected.
    pub fn set_rate(&mut self, now: u64, rate: Rate) -> Result<(), CdpError> {
        if rate < Rate::one() {
            return Err(CdpError::InvalidRate);
        }
        self.commit(now)?;
        self.rate_per_second = rate;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    // 1.000001 per second
    const RATE_RAY: u128 = 1_000_001_000_000_000_000_000_000_000;

    #[test]
    fn genesis_index_is_one() {
        let acc = InterestAccumulator::genesis(7);
        assert_eq!(acc.index, Decimal::one());
        assert_eq!(acc.current_index(7).unwrap(), Decimal::one());
    }

    #[test]
    fn unit_rate_never_grows() {
        let acc = InterestAccumulator::genesis(0);
        assert_eq!(acc.current_index(1_000_000).unwrap(), Decimal::one());
    }

    #[test]
    fn two_seconds_of_growth() {
        let mut acc = InterestAccumulator::genesis(0);
        acc.set_rate(0, Rate::from_scaled_val(RATE_RAY)).unwrap();
        // 1.000001^2 lands exactly on the wad grid
        assert_eq!(
            acc.current_index(2).unwrap(),
            Decimal::from_scaled_val(1_000_002_000_001_000_000)
        );
    }

    #[test]
    fn commit_is_idempotent_within_a_second() {
        let mut acc = InterestAccumulator::genesis(0);
        acc.set_rate(0, Rate::from_scaled_val(RATE_RAY)).unwrap();
        let first = acc.commit(5).unwrap();
        let second = acc.commit(5).unwrap();
        assert_eq!(first, second);
        assert_eq!(acc.index, first);
        assert_eq!(acc.last_update, 5);
    }

    #[test]
    fn stepwise_commits_match_one_shot_within_tolerance() {
        let rate = Rate::from_scaled_val(RATE_RAY);

        let mut stepped = InterestAccumulator::genesis(0);
        stepped.set_rate(0, rate).unwrap();
        stepped.commit(3).unwrap();
        stepped.commit(10).unwrap();

        let mut whole = InterestAccumulator::genesis(0);
        whole.set_rate(0, rate).unwrap();
        whole.commit(10).unwrap();

        let (a, b) = (stepped.index.0, whole.index.0);
        assert!(a.max(b) - a.min(b) <= 10u64.into());
    }

    #[test]
    fn rate_change_locks_in_old_growth() {
        let mut acc = InterestAccumulator::genesis(0);
        acc.set_rate(0, Rate::from_scaled_val(RATE_RAY)).unwrap();
        // switching to the unit rate at t=2 must keep the growth earned
        // under the old rate
        acc.set_rate(2, Rate::one()).unwrap();
        assert_eq!(
            acc.current_index(100).unwrap(),
            Decimal::from_scaled_val(1_000_002_000_001_000_000)
        );
    }

    #[test]
    fn sub_unit_rate_is_rejected() {
        let mut acc = InterestAccumulator::genesis(0);
        let below_one = Rate::from_scaled_val(crate::math::common::RAY - 1);
        assert_eq!(acc.set_rate(0, below_one), Err(CdpError::InvalidRate));
        assert_eq!(acc.rate_per_second, Rate::one());
    }
}
