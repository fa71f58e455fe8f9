//! Gas and deposit amounts.
//!
//! Both travel as decimal strings in call payloads because deposits do not
//! fit into a JSON number.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Number of decimals between one NEAR and one yoctoNEAR.
pub const NEAR_DECIMALS: usize = 24;
pub const YOCTO_PER_NEAR: u128 = 1_000_000_000_000_000_000_000_000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnitsError {
    #[error("`{0}` is not a decimal integer")]
    InvalidNumber(String),
    #[error("`{0}` does not fit into {1}")]
    Overflow(String, &'static str),
    #[error("`{0}` has more than {NEAR_DECIMALS} decimal places")]
    TooPrecise(String),
}

fn parse_decimal(s: &str, kind: &'static str) -> Result<u128, UnitsError> {
    let trimmed = s.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(UnitsError::InvalidNumber(s.to_string()));
    }
    trimmed
        .parse::<u128>()
        .map_err(|_| UnitsError::Overflow(s.to_string(), kind))
}

/// Prepaid gas attached to a function call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Gas(pub u64);

impl Gas {
    /// 300 Tgas, the per-transaction ceiling.
    pub const MAX: Gas = Gas(300_000_000_000_000);

    pub const fn from_tgas(tgas: u64) -> Self {
        Gas(tgas * 1_000_000_000_000)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl FromStr for Gas {
    type Err = UnitsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = parse_decimal(s, "u64")?;
        u64::try_from(value)
            .map(Gas)
            .map_err(|_| UnitsError::Overflow(s.to_string(), "u64"))
    }
}

impl fmt::Display for Gas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Value attached to a call, in yoctoNEAR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Deposit(pub u128);

impl Deposit {
    pub const ZERO: Deposit = Deposit(0);
    pub const ONE_YOCTO: Deposit = Deposit(1);

    pub fn as_yocto(&self) -> u128 {
        self.0
    }

    /// Parses a human NEAR amount such as `0.25` into yoctoNEAR.
    pub fn from_near(amount: &str) -> Result<Self, UnitsError> {
        let trimmed = amount.trim();
        let (whole, fraction) = match trimmed.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (trimmed, ""),
        };
        if whole.is_empty() && fraction.is_empty() {
            return Err(UnitsError::InvalidNumber(amount.to_string()));
        }
        if fraction.len() > NEAR_DECIMALS {
            return Err(UnitsError::TooPrecise(amount.to_string()));
        }
        let whole = if whole.is_empty() {
            0
        } else {
            parse_decimal(whole, "u128")?
        };
        let fraction = if fraction.is_empty() {
            0
        } else {
            let padded = format!("{fraction:0<width$}", width = NEAR_DECIMALS);
            parse_decimal(&padded, "u128")?
        };
        whole
            .checked_mul(YOCTO_PER_NEAR)
            .and_then(|yocto| yocto.checked_add(fraction))
            .map(Deposit)
            .ok_or_else(|| UnitsError::Overflow(amount.to_string(), "u128"))
    }

    /// Formats the amount in NEAR without trailing zeros.
    pub fn to_near_string(&self) -> String {
        let whole = self.0 / YOCTO_PER_NEAR;
        let fraction = self.0 % YOCTO_PER_NEAR;
        if fraction == 0 {
            return whole.to_string();
        }
        let fraction = format!("{fraction:0>width$}", width = NEAR_DECIMALS);
        format!("{whole}.{}", fraction.trim_end_matches('0'))
    }
}

impl FromStr for Deposit {
    type Err = UnitsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_decimal(s, "u128").map(Deposit)
    }
}

impl fmt::Display for Deposit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(u64),
}

macro_rules! string_serde {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                match StringOrNumber::deserialize(deserializer)? {
                    StringOrNumber::String(s) => s.parse().map_err(serde::de::Error::custom),
                    StringOrNumber::Number(n) => n.to_string().parse().map_err(serde::de::Error::custom),
                }
            }
        }
    };
}

string_serde!(Gas);
string_serde!(Deposit);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gas_parses_script_constant() {
        let gas: Gas = "300000000000000".parse().unwrap();
        assert_eq!(gas, Gas::MAX);
        assert_eq!(gas.to_string(), "300000000000000");
        assert_eq!(Gas::from_tgas(20), "20000000000000".parse().unwrap());
    }

    #[test]
    fn test_gas_rejects_garbage() {
        assert!(matches!("".parse::<Gas>(), Err(UnitsError::InvalidNumber(_))));
        assert!(matches!("-1".parse::<Gas>(), Err(UnitsError::InvalidNumber(_))));
        assert!(matches!("3e14".parse::<Gas>(), Err(UnitsError::InvalidNumber(_))));
        assert!(matches!(
            "18446744073709551616".parse::<Gas>(),
            Err(UnitsError::Overflow(_, "u64"))
        ));
    }

    #[test]
    fn test_deposit_parses_large_amounts() {
        let deposit: Deposit = "1040000000000000000000".parse().unwrap();
        assert_eq!(deposit.as_yocto(), 1_040_000_000_000_000_000_000);
        assert_eq!(deposit.to_string(), "1040000000000000000000");
    }

    #[test]
    fn test_deposit_from_near() {
        assert_eq!(Deposit::from_near("1").unwrap().as_yocto(), YOCTO_PER_NEAR);
        assert_eq!(
            Deposit::from_near("0.25").unwrap().as_yocto(),
            250_000_000_000_000_000_000_000
        );
        assert_eq!(
            Deposit::from_near(".1").unwrap().as_yocto(),
            100_000_000_000_000_000_000_000
        );
        assert!(matches!(
            Deposit::from_near("0.0000000000000000000000001"),
            Err(UnitsError::TooPrecise(_))
        ));
        assert!(Deposit::from_near("1.x").is_err());
    }

    #[test]
    fn test_deposit_from_near_needs_digits() {
        for amount in ["", ".", "  ", " . "] {
            assert!(
                matches!(Deposit::from_near(amount), Err(UnitsError::InvalidNumber(_))),
                "{amount:?} parsed"
            );
        }
        assert_eq!(Deposit::from_near("0.").unwrap(), Deposit::ZERO);
    }

    #[test]
    fn test_deposit_to_near_string() {
        assert_eq!(Deposit(YOCTO_PER_NEAR * 3).to_near_string(), "3");
        assert_eq!(
            Deposit(250_000_000_000_000_000_000_000).to_near_string(),
            "0.25"
        );
        assert_eq!(Deposit::ONE_YOCTO.to_near_string(), "0.000000000000000000000001");
    }

    #[test]
    fn test_serde_uses_strings() {
        let json = serde_json::to_string(&Deposit(1_020_000_000_000_000_000_000)).unwrap();
        assert_eq!(json, "\"1020000000000000000000\"");

        let gas: Gas = serde_json::from_str("\"300000000000000\"").unwrap();
        assert_eq!(gas, Gas::MAX);
        let gas: Gas = serde_json::from_str("30").unwrap();
        assert_eq!(gas, Gas(30));
        assert!(serde_json::from_str::<Deposit>("\"ten\"").is_err());
    }
}
