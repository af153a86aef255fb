//! Balance arithmetic.
//!
//! All balance mutations go through [`BalanceFigures`] so that
//! `remaining = total - taken` holds after every approval, rejection and
//! withdrawal.

use rust_decimal::Decimal;
use serde::Serialize;

/// The three running figures of a leave balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BalanceFigures {
    /// Days allocated for the year.
    pub total: Decimal,
    /// Days used.
    pub taken: Decimal,
    /// Days left.
    pub remaining: Decimal,
}

impl BalanceFigures {
    /// A fresh balance with `total` days and nothing taken.
    pub fn opening(total: Decimal) -> Self {
        Self {
            total,
            taken: Decimal::ZERO,
            remaining: total,
        }
    }

    /// Charges `days` to the balance.
    ///
    /// Returns `None` when fewer than `days` remain.
    pub fn deduct(self, days: Decimal) -> Option<Self> {
        (self.remaining >= days).then(|| Self {
            total: self.total,
            taken: self.taken + days,
            remaining: self.remaining - days,
        })
    }

    /// Gives `days` back after a rejection or withdrawal.
    pub fn restore(self, days: Decimal) -> Self {
        Self {
            total: self.total,
            taken: (self.taken - days).max(Decimal::ZERO),
            remaining: self.remaining + days,
        }
    }

    /// Records unpaid days. Unpaid balances have no allocation, so only
    /// `taken` moves.
    pub fn record_unpaid(self, days: Decimal) -> Self {
        Self {
            taken: self.taken + days,
            ..self
        }
    }

    /// Reverses [`BalanceFigures::record_unpaid`].
    pub fn reverse_unpaid(self, days: Decimal) -> Self {
        Self {
            taken: (self.taken - days).max(Decimal::ZERO),
            ..self
        }
    }

    /// Adds freshly allocated days (accrual, carry-forward, comp-off).
    pub fn allocate(self, days: Decimal) -> Self {
        Self {
            total: self.total + days,
            taken: self.taken,
            remaining: self.remaining + days,
        }
    }

    /// Resets the allocation to `total`, keeping what was already taken.
    pub fn reallocate(self, total: Decimal) -> Self {
        Self {
            total,
            taken: self.taken,
            remaining: total - self.taken,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn n(v: i64) -> Decimal {
        Decimal::from(v)
    }

    #[test]
    fn test_deduct_requires_enough_remaining() {
        let balance = BalanceFigures::opening(n(3));
        assert!(balance.deduct(n(4)).is_none());
        let after = balance.deduct(n(3)).unwrap();
        assert_eq!(after.remaining, Decimal::ZERO);
        assert_eq!(after.taken, n(3));
    }

    #[test]
    fn test_restore_undoes_deduct() {
        let balance = BalanceFigures::opening(n(10));
        let restored = balance.deduct(n(4)).unwrap().restore(n(4));
        assert_eq!(restored, balance);
    }

    #[test]
    fn test_restore_never_makes_taken_negative() {
        let restored = BalanceFigures::opening(n(2)).restore(n(1));
        assert_eq!(restored.taken, Decimal::ZERO);
        assert_eq!(restored.remaining, n(3));
    }

    #[test]
    fn test_reallocate_keeps_taken() {
        let balance = BalanceFigures::opening(n(2)).deduct(n(1)).unwrap();
        let after = balance.reallocate(n(6));
        assert_eq!(after.remaining, n(5));
        assert_eq!(after.taken, n(1));
    }

    #[test]
    fn test_unpaid_only_moves_taken() {
        let balance = BalanceFigures::opening(Decimal::ZERO).record_unpaid(n(2));
        assert_eq!(balance.taken, n(2));
        assert_eq!(balance.remaining, Decimal::ZERO);
        assert_eq!(balance.reverse_unpaid(n(2)).taken, Decimal::ZERO);
    }

    proptest! {
        #[test]
        fn prop_remaining_is_total_minus_taken(
            total_halves in 0i64..60,
            ops in proptest::collection::vec((any::<bool>(), 1i64..6), 0..20)
        ) {
            let mut balance = BalanceFigures::opening(Decimal::new(total_halves * 5, 1));
            let mut booked: Vec<Decimal> = Vec::new();
            for (deduct, halves) in ops {
                let days = Decimal::new(halves * 5, 1);
                if deduct {
                    if let Some(next) = balance.deduct(days) {
                        balance = next;
                        booked.push(days);
                    }
                } else if let Some(days) = booked.pop() {
                    balance = balance.restore(days);
                }
                prop_assert_eq!(balance.remaining, balance.total - balance.taken);
                prop_assert!(balance.remaining >= Decimal::ZERO);
            }
        }
    }
}
