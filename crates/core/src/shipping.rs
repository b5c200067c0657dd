//! Shipping settings and the shipping rate resolver.
//!
//! Shipping is a flat rate per zone. The admin configures two rates (inside
//! the capital, everywhere else), a global free-shipping threshold, an
//! optional time-boxed campaign threshold, and a list of districts that always
//! ship free.
//!
//! Missing or unreadable rates resolve to zero. There is no built-in fallback
//! rate; an unconfigured store ships free until an admin sets the rates, and
//! the resolver logs a warning when that happens.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::districts::{CAPITAL_DISTRICT, same_district};
use crate::lenient;
use crate::types::Money;

/// Shipping destination zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    /// Inside the capital district.
    Inside,
    /// Any other district.
    Outside,
}

impl Zone {
    /// Classify a district.
    #[must_use]
    pub fn of(district: &str) -> Self {
        if same_district(district, CAPITAL_DISTRICT) {
            Self::Inside
        } else {
            Self::Outside
        }
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inside => write!(f, "inside {CAPITAL_DISTRICT}"),
            Self::Outside => write!(f, "outside {CAPITAL_DISTRICT}"),
        }
    }
}

/// A time-windowed free-shipping campaign.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    #[serde(default, deserialize_with = "lenient::flag")]
    pub active: bool,
    /// Window start; `None` means the campaign has no lower bound.
    #[serde(default, deserialize_with = "lenient::option_datetime")]
    pub start_at: Option<DateTime<Utc>>,
    /// Window end; `None` means the campaign has no upper bound.
    #[serde(default, deserialize_with = "lenient::option_datetime")]
    pub end_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "lenient::option_decimal",
        serialize_with = "lenient::option_decimal_as_number"
    )]
    pub free_threshold: Option<Decimal>,
}

impl Campaign {
    /// Whether the campaign applies at `now`. Both bounds are inclusive.
    #[must_use]
    pub fn is_running(&self, now: DateTime<Utc>) -> bool {
        self.active
            && self.start_at.is_none_or(|start| start <= now)
            && self.end_at.is_none_or(|end| now <= end)
    }
}

/// Admin-configured shipping settings (`GET /api/shipping-settings`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingSettings {
    #[serde(
        default,
        deserialize_with = "lenient::option_decimal",
        serialize_with = "lenient::option_decimal_as_number"
    )]
    pub inside_dhaka_rate: Option<Decimal>,
    #[serde(
        default,
        deserialize_with = "lenient::option_decimal",
        serialize_with = "lenient::option_decimal_as_number"
    )]
    pub outside_dhaka_rate: Option<Decimal>,
    #[serde(
        default,
        deserialize_with = "lenient::option_decimal",
        serialize_with = "lenient::option_decimal_as_number"
    )]
    pub free_threshold: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub free_for_districts: Vec<String>,
    #[serde(default)]
    pub campaign: Campaign,
}

/// The outcome of resolving shipping, with the reason for the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShippingQuote {
    /// No district has been chosen yet.
    NoDistrict,
    /// The zone's rate is missing or unreadable.
    Unconfigured { zone: Zone },
    /// The district is on the free-shipping list.
    FreeDistrict { zone: Zone },
    /// The subtotal reached the active free-shipping threshold.
    ThresholdMet {
        zone: Zone,
        threshold: Money,
        campaign: bool,
    },
    /// The zone's flat rate applies.
    Rate { zone: Zone, rate: Money },
}

impl ShippingQuote {
    /// The shipping cost this quote charges.
    #[must_use]
    pub const fn amount(&self) -> Money {
        match self {
            Self::Rate { rate, .. } => *rate,
            _ => Money::ZERO,
        }
    }

    #[must_use]
    pub const fn zone(&self) -> Option<Zone> {
        match self {
            Self::NoDistrict => None,
            Self::Unconfigured { zone }
            | Self::FreeDistrict { zone }
            | Self::ThresholdMet { zone, .. }
            | Self::Rate { zone, .. } => Some(*zone),
        }
    }
}

impl ShippingSettings {
    /// Configured base rate for a zone, if it is a usable number.
    #[must_use]
    pub const fn rate_for(&self, zone: Zone) -> Option<Decimal> {
        match zone {
            Zone::Inside => self.inside_dhaka_rate,
            Zone::Outside => self.outside_dhaka_rate,
        }
    }

    /// Whether the district ships free regardless of subtotal.
    #[must_use]
    pub fn is_free_district(&self, district: &str) -> bool {
        self.free_for_districts
            .iter()
            .any(|free| same_district(free, district))
    }

    /// The free-shipping threshold in force at `now`, and whether it comes
    /// from the campaign.
    ///
    /// A running campaign's threshold replaces the global one. A running
    /// campaign without a readable threshold falls back to the global one.
    #[must_use]
    pub fn active_threshold(&self, now: DateTime<Utc>) -> (Option<Decimal>, bool) {
        if self.campaign.is_running(now)
            && let Some(threshold) = self.campaign.free_threshold
        {
            return (Some(threshold), true);
        }
        (self.free_threshold, false)
    }

    /// Resolve shipping for a district and subtotal at `now`, keeping the reason.
    #[must_use]
    pub fn quote(&self, district: &str, subtotal: Money, now: DateTime<Utc>) -> ShippingQuote {
        if district.trim().is_empty() {
            return ShippingQuote::NoDistrict;
        }

        let zone = Zone::of(district);
        let Some(rate) = self.rate_for(zone) else {
            tracing::warn!(%zone, "shipping rate not configured, charging no shipping");
            return ShippingQuote::Unconfigured { zone };
        };

        if self.is_free_district(district) {
            return ShippingQuote::FreeDistrict { zone };
        }

        let (threshold, campaign) = self.active_threshold(now);
        if let Some(threshold) = threshold
            && threshold > Decimal::ZERO
            && subtotal.amount() >= threshold
        {
            return ShippingQuote::ThresholdMet {
                zone,
                threshold: Money::new(threshold),
                campaign,
            };
        }

        ShippingQuote::Rate {
            zone,
            rate: Money::new(rate).non_negative(),
        }
    }

    /// Shipping cost for a district and subtotal at `now`.
    #[must_use]
    pub fn resolve(&self, district: &str, subtotal: Money, now: DateTime<Utc>) -> Money {
        self.quote(district, subtotal, now).amount()
    }
}
