//! Single-asset option contract.
//!
//! An [`OptionContract`] bundles the payoff terms with the market data the
//! pricers need (spot, volatility, domestic and foreign rates). It is
//! validated on construction and immutable afterwards.

use crate::instrument::{PricingEngine, PricingResults};
use crate::payoff::{OptionType, PlainVanillaPayoff};
use amopt_core::{
    ensure,
    errors::{Error, Result},
    Rate, Real, Time, Volatility,
};

/// Validated inputs for one option pricing request.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "OptionContractData")
)]
pub struct OptionContract {
    option_type: OptionType,
    spot: Real,
    strike: Real,
    expiry: Time,
    volatility: Volatility,
    domestic_rate: Rate,
    foreign_rate: Rate,
}

impl OptionContract {
    /// Build a contract.
    ///
    /// Fails with [`Error::InvalidArgument`] when a value is not finite,
    /// `spot <= 0`, `expiry < 0` or `volatility < 0`. A non-positive strike
    /// is accepted; the pricers resolve it to its intrinsic value.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        option_type: OptionType,
        spot: Real,
        strike: Real,
        expiry: Time,
        volatility: Volatility,
        domestic_rate: Rate,
        foreign_rate: Rate,
    ) -> Result<Self> {
        for (name, v) in [
            ("spot", spot),
            ("strike", strike),
            ("expiry", expiry),
            ("volatility", volatility),
            ("domestic rate", domestic_rate),
            ("foreign rate", foreign_rate),
        ] {
            ensure!(v.is_finite(), "{name} must be finite, got {v}");
        }
        ensure!(spot > 0.0, "spot must be positive, got {spot}");
        ensure!(expiry >= 0.0, "expiry must be non-negative, got {expiry}");
        ensure!(
            volatility >= 0.0,
            "volatility must be non-negative, got {volatility}"
        );
        Ok(Self {
            option_type,
            spot,
            strike,
            expiry,
            volatility,
            domestic_rate,
            foreign_rate,
        })
    }

    /// Call or put.
    pub fn option_type(&self) -> OptionType {
        self.option_type
    }

    /// `true` for a call.
    pub fn is_call(&self) -> bool {
        self.option_type.is_call()
    }

    /// Spot price of the underlying.
    pub fn spot(&self) -> Real {
        self.spot
    }

    /// Strike price.
    pub fn strike(&self) -> Real {
        self.strike
    }

    /// Time to expiry in years.
    pub fn expiry(&self) -> Time {
        self.expiry
    }

    /// Black-Scholes volatility.
    pub fn volatility(&self) -> Volatility {
        self.volatility
    }

    /// Continuously compounded domestic (discounting) rate.
    pub fn domestic_rate(&self) -> Rate {
        self.domestic_rate
    }

    /// Continuous foreign rate or dividend yield.
    pub fn foreign_rate(&self) -> Rate {
        self.foreign_rate
    }

    /// The exercise payoff.
    pub fn payoff(&self) -> PlainVanillaPayoff {
        PlainVanillaPayoff::new(self.option_type, self.strike)
    }

    /// Copy of this contract with another volatility.
    pub fn with_volatility(&self, volatility: Volatility) -> Result<Self> {
        Self::new(
            self.option_type,
            self.spot,
            self.strike,
            self.expiry,
            volatility,
            self.domestic_rate,
            self.foreign_rate,
        )
    }

    /// Price this contract using the given engine.
    pub fn price(&self, engine: &dyn PricingEngine<OptionContract>) -> Result<PricingResults> {
        engine.calculate(self)
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct OptionContractData {
    option_type: OptionType,
    spot: Real,
    strike: Real,
    expiry: Time,
    volatility: Volatility,
    domestic_rate: Rate,
    foreign_rate: Rate,
}

#[cfg(feature = "serde")]
impl TryFrom<OptionContractData> for OptionContract {
    type Error = Error;

    fn try_from(d: OptionContractData) -> Result<Self> {
        Self::new(
            d.option_type,
            d.spot,
            d.strike,
            d.expiry,
            d.volatility,
            d.domestic_rate,
            d.foreign_rate,
        )
    }
}
