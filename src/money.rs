use std::fmt;

use serde::{Deserialize, Serialize};

/// Monetary value in integer US cents.
///
/// All balances, fees and prizes are carried as whole minor units so no
/// floating-point drift can enter the books.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Cents(i64);

impl Cents {
    pub const ZERO: Cents = Cents(0);

    pub const fn new(value: i64) -> Self {
        Cents(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for Cents {
    /// Formats as decimal dollars, e.g. `12.30` or `-0.05`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl std::ops::Add for Cents {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Cents(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Cents {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Cents(self.0 - rhs.0)
    }
}

impl std::ops::AddAssign for Cents {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl std::ops::SubAssign for Cents {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_preserves_value() {
        assert_eq!(Cents::new(1234).get(), 1234);
    }

    #[test]
    fn display_formats_positive() {
        assert_eq!(Cents::new(1230).to_string(), "12.30");
        assert_eq!(Cents::new(5).to_string(), "0.05");
        assert_eq!(Cents::new(0).to_string(), "0.00");
    }

    #[test]
    fn display_formats_negative() {
        assert_eq!(Cents::new(-1230).to_string(), "-12.30");
        assert_eq!(Cents::new(-5).to_string(), "-0.05");
    }

    #[test]
    fn default_is_zero() {
        assert_eq!(Cents::default(), Cents::ZERO);
    }

    #[test]
    fn add_and_sub() {
        assert_eq!(Cents::new(100) + Cents::new(50), Cents::new(150));
        assert_eq!(Cents::new(100) - Cents::new(30), Cents::new(70));
    }

    #[test]
    fn assign_ops() {
        let mut a = Cents::new(100);
        a += Cents::new(50);
        a -= Cents::new(30);
        assert_eq!(a, Cents::new(120));
    }

    #[test]
    fn ordering() {
        assert!(Cents::new(-1) < Cents::ZERO);
        assert!(Cents::ZERO < Cents::new(1));
    }

    #[test]
    fn is_negative() {
        assert!(Cents::new(-1).is_negative());
        assert!(!Cents::ZERO.is_negative());
        assert!(!Cents::new(1).is_negative());
    }
}
