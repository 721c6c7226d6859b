//! Currency Catalogue and Reference Rates
//!
//! This library defines the closed set of currencies the cars service can
//! quote prices in, together with a reference rate table. Currencies are
//! declared with a macro that generates the `CurrencyCode` enum and its
//! lookup tables.
//!
//! # Adding a New Currency
//! Add a line to the `define_currencies!` invocation:
//! ```ignore
//! define_currencies! {
//!     // ... existing currencies ...
//!     MXN => ("MXN", "Mexican Peso", "$", 0.058),
//! }
//! ```
//!
//! # Example
//! ```
//! use currency_rates::{CurrencyCode, RateTable};
//!
//! let table = RateTable::fixed();
//! let rate = table.quote(CurrencyCode::BRL, CurrencyCode::USD);
//! assert!((rate - 0.20).abs() < 1e-9);
//! ```

use rand::Rng;

/// Error returned when parsing an unknown currency code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown currency: {0}")]
pub struct UnknownCurrency(pub String);

// ─────────────────────────────────────────────────────────────────────────────
// THE MACRO: Defines the CurrencyCode enum and its lookup tables
// ─────────────────────────────────────────────────────────────────────────────

/// Macro to define currencies with generated lookup tables.
///
/// # Syntax
/// ```ignore
/// define_currencies! {
///     Name => ("CODE", "Display name", "SYMBOL", usd_value_of_one_unit),
/// }
/// ```
#[macro_export]
macro_rules! define_currencies {
    (
        $(
            $name:ident => ($code:literal, $display:literal, $symbol:literal, $usd_value:expr)
        ),* $(,)?
    ) => {
        /// ISO 4217 code of a supported currency.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
        #[serde(rename_all = "UPPERCASE")]
        pub enum CurrencyCode {
            $($name),*
        }

        impl CurrencyCode {
            pub fn code(&self) -> &'static str {
                match self {
                    $(CurrencyCode::$name => $code),*
                }
            }

            pub fn name(&self) -> &'static str {
                match self {
                    $(CurrencyCode::$name => $display),*
                }
            }

            pub fn symbol(&self) -> &'static str {
                match self {
                    $(CurrencyCode::$name => $symbol),*
                }
            }

            /// Value of one unit of this currency in US dollars.
            pub fn usd_value(&self) -> f64 {
                match self {
                    $(CurrencyCode::$name => $usd_value),*
                }
            }

            pub fn all() -> &'static [CurrencyCode] {
                &[$(CurrencyCode::$name),*]
            }
        }

        impl std::fmt::Display for CurrencyCode {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.code())
            }
        }

        impl std::str::FromStr for CurrencyCode {
            type Err = $crate::UnknownCurrency;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_uppercase().as_str() {
                    $($code => Ok(CurrencyCode::$name),)*
                    _ => Err($crate::UnknownCurrency(s.to_string())),
                }
            }
        }
    };
}

// ─────────────────────────────────────────────────────────────────────────────
// CURRENCY DEFINITIONS - Add new currencies here!
// ─────────────────────────────────────────────────────────────────────────────

define_currencies! {
    BRL => ("BRL", "Brazilian Real", "R$", 0.20),
    USD => ("USD", "US Dollar", "$", 1.0),
    EUR => ("EUR", "Euro", "€", 1.087),
    GBP => ("GBP", "Pound Sterling", "£", 1.266),
    JPY => ("JPY", "Japanese Yen", "¥", 0.0067),
    CAD => ("CAD", "Canadian Dollar", "C$", 0.73),
    AUD => ("AUD", "Australian Dollar", "A$", 0.66),
    CHF => ("CHF", "Swiss Franc", "Fr", 1.13),
    INR => ("INR", "Indian Rupee", "₹", 0.01203),
}

// ─────────────────────────────────────────────────────────────────────────────
// Rate Table
// ─────────────────────────────────────────────────────────────────────────────

/// Largest accepted fluctuation, in percent.
pub const MAX_FLUCTUATION_PERCENT: f64 = 99.0;

/// Reference rate table with optional random fluctuation.
///
/// Rates are expressed as "units of `destination` for one unit of `base`".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateTable {
    fluctuation_percent: f64,
}

impl Default for RateTable {
    fn default() -> Self {
        Self::fixed()
    }
}

impl RateTable {
    /// A table that always quotes the reference rates.
    pub fn fixed() -> Self {
        Self {
            fluctuation_percent: 0.0,
        }
    }

    /// A table whose quotes drift randomly by up to `percent` around the
    /// reference rate. Negative or non-finite values disable fluctuation;
    /// values above [`MAX_FLUCTUATION_PERCENT`] are clamped so quotes stay
    /// positive.
    pub fn fluctuating(percent: f64) -> Self {
        let fluctuation_percent = if percent.is_finite() && percent > 0.0 {
            percent.min(MAX_FLUCTUATION_PERCENT)
        } else {
            0.0
        };
        Self {
            fluctuation_percent,
        }
    }

    pub fn fluctuation_percent(&self) -> f64 {
        self.fluctuation_percent
    }

    /// Reference rate without fluctuation.
    pub fn reference_rate(&self, base: CurrencyCode, destination: CurrencyCode) -> f64 {
        if base == destination {
            return 1.0;
        }
        base.usd_value() / destination.usd_value()
    }

    /// Current quote, including fluctuation when enabled.
    pub fn quote(&self, base: CurrencyCode, destination: CurrencyCode) -> f64 {
        let rate = self.reference_rate(base, destination);
        if self.fluctuation_percent == 0.0 || base == destination {
            return rate;
        }
        let factor: f64 = rand::rng().random_range(-1.0..=1.0);
        rate + rate * (self.fluctuation_percent / 100.0) * factor
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
