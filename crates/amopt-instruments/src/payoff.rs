//! Option type and the plain vanilla payoff.

use amopt_core::Real;
use std::fmt;

/// Option type (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OptionType {
    /// A call option (right to buy).
    Call,
    /// A put option (right to sell).
    Put,
}

impl OptionType {
    /// Build from an `is_call` flag.
    pub fn from_is_call(is_call: bool) -> Self {
        if is_call {
            OptionType::Call
        } else {
            OptionType::Put
        }
    }

    /// +1 for Call, −1 for Put.
    pub fn sign(self) -> Real {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }

    /// `true` for a call.
    pub fn is_call(self) -> bool {
        self == OptionType::Call
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => write!(f, "Call"),
            OptionType::Put => write!(f, "Put"),
        }
    }
}

/// `payoff = max(φ(S − K), 0)` where `φ = +1` for Call, `−1` for Put.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlainVanillaPayoff {
    /// Option type.
    pub option_type: OptionType,
    /// Strike price.
    pub strike: Real,
}

impl PlainVanillaPayoff {
    /// Create a new plain vanilla payoff.
    pub fn new(option_type: OptionType, strike: Real) -> Self {
        Self {
            option_type,
            strike,
        }
    }

    /// Exercise value at underlying price `spot`.
    #[inline]
    pub fn value(&self, spot: Real) -> Real {
        (self.option_type.sign() * (spot - self.strike)).max(0.0)
    }

    /// Signed exercise value `φ(S − K)`, negative out of the money.
    #[inline]
    pub fn signed_value(&self, spot: Real) -> Real {
        self.option_type.sign() * (spot - self.strike)
    }
}

impl fmt::Display for PlainVanillaPayoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vanilla {} @ {}", self.option_type, self.strike)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vanilla_call_put() {
        let call = PlainVanillaPayoff::new(OptionType::Call, 100.0);
        assert_eq!(call.value(110.0), 10.0);
        assert_eq!(call.value(90.0), 0.0);

        let put = PlainVanillaPayoff::new(OptionType::Put, 100.0);
        assert_eq!(put.value(90.0), 10.0);
        assert_eq!(put.value(110.0), 0.0);
        assert_eq!(put.signed_value(110.0), -10.0);
    }

    #[test]
    fn option_type_helpers() {
        assert_eq!(OptionType::from_is_call(true), OptionType::Call);
        assert_eq!(OptionType::from_is_call(false), OptionType::Put);
        assert!(OptionType::Call.is_call());
        assert_eq!(OptionType::Put.sign(), -1.0);
        assert_eq!(OptionType::Put.to_string(), "Put");
    }

    #[test]
    fn display() {
        let p = PlainVanillaPayoff::new(OptionType::Call, 95.0);
        assert_eq!(p.to_string(), "Vanilla Call @ 95");
    }
}
