//! Semantic scalar types: identifiers, money and server timestamps.
//!
//! # Design
//! `Id` and `Currency` are transparent over integers on the wire but do not
//! convert into one another, so a user id cannot be passed where an amount is
//! expected. Purchase quantities are plain `u32` counts.
//!
//! `Timestamp` decoding is deliberately lenient. The server reports times as
//! `YYYY-MM-DD HH:MM:SS` without a zone, and the field is not always a valid
//! date: `null`, the string `"null"` and anything unparseable all decode to
//! `Timestamp::ZERO` instead of failing the whole entity. Treat `ZERO` as
//! "unknown", never as a real point in time.

use std::fmt;
use std::ops::{Add, Neg, Sub};

use chrono::NaiveDateTime;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// Layout the server uses for every timestamp field.
pub const TIMESTAMP_LAYOUT: &str = "%Y-%m-%d %H:%M:%S";

/// Opaque identifier of a user, article or transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(u64);

impl Id {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for Id {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Signed amount of money in minor units (cents).
///
/// Negative amounts are outgoing (withdrawals, purchases, sent transfers).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Currency(i64);

impl Currency {
    pub const ZERO: Currency = Currency(0);

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Total for `quantity` items priced at `self`, or `None` on overflow.
    pub fn checked_times(self, quantity: u32) -> Option<Self> {
        self.0.checked_mul(i64::from(quantity)).map(Self)
    }

    pub fn checked_add(self, rhs: Currency) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_sub(self, rhs: Currency) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    pub fn checked_neg(self) -> Option<Self> {
        self.0.checked_neg().map(Self)
    }
}

// Operators saturate at the i64 range; use the checked forms to detect it.

impl Add for Currency {
    type Output = Currency;

    fn add(self, rhs: Currency) -> Currency {
        Currency(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Currency {
    type Output = Currency;

    fn sub(self, rhs: Currency) -> Currency {
        Currency(self.0.saturating_sub(rhs.0))
    }
}

impl Neg for Currency {
    type Output = Currency;

    fn neg(self) -> Currency {
        Currency(self.0.saturating_neg())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

/// A server timestamp, or `ZERO` when the server sent nothing usable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(Option<NaiveDateTime>);

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp(None);

    pub const fn new(at: NaiveDateTime) -> Self {
        Self(Some(at))
    }

    /// Parse the server layout; anything else yields `ZERO`.
    pub fn parse(text: &str) -> Self {
        let text = text.trim_matches('"');
        if text == "null" {
            return Self::ZERO;
        }
        Self(NaiveDateTime::parse_from_str(text, TIMESTAMP_LAYOUT).ok())
    }

    pub const fn is_zero(self) -> bool {
        self.0.is_none()
    }

    pub const fn get(self) -> Option<NaiveDateTime> {
        self.0
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(at: NaiveDateTime) -> Self {
        Self::new(at)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(at) => write!(f, "{}", at.format(TIMESTAMP_LAYOUT)),
            None => f.write_str("null"),
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Some(at) => serializer.collect_str(&at.format(TIMESTAMP_LAYOUT)),
            None => serializer.serialize_none(),
        }
    }
}

struct TimestampVisitor;

impl<'de> Visitor<'de> for TimestampVisitor {
    type Value = Timestamp;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a timestamp formatted as YYYY-MM-DD HH:MM:SS")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Timestamp, E> {
        Ok(Timestamp::parse(value))
    }

    fn visit_none<E: de::Error>(self) -> Result<Timestamp, E> {
        Ok(Timestamp::ZERO)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Timestamp, E> {
        Ok(Timestamp::ZERO)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Timestamp, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Timestamp, E> {
        Ok(Timestamp::ZERO)
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<Timestamp, E> {
        Ok(Timestamp::ZERO)
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<Timestamp, E> {
        Ok(Timestamp::ZERO)
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<Timestamp, E> {
        Ok(Timestamp::ZERO)
    }

    fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Timestamp, A::Error> {
        while seq.next_element::<de::IgnoredAny>()?.is_some() {}
        Ok(Timestamp::ZERO)
    }

    fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<Timestamp, A::Error> {
        while map.next_entry::<de::IgnoredAny, de::IgnoredAny>()?.is_some() {}
        Ok(Timestamp::ZERO)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TimestampVisitor)
    }
}
