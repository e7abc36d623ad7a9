//! Weighted selection over labelled, non-negative weights.
//!
//! [`WeightTable`] keeps entries in document order and reads values
//! leniently: anything that is not a finite, non-negative number loads as an
//! invalid entry which selection skips. A table that is not a JSON object at
//! all loads empty.

use std::fmt;

use rand::Rng;
use serde::de::{self, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// Ordered label → weight table. `None` marks a missing or non-numeric weight.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightTable {
    entries: Vec<(String, Option<f64>)>,
}

impl WeightTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. Negative or non-finite weights are stored as-is and
    /// skipped at selection time.
    pub fn with(mut self, label: impl Into<String>, weight: f64) -> Self {
        self.entries.push((label.into(), Some(weight)));
        self
    }

    /// Append an entry whose weight is missing or non-numeric.
    pub fn with_invalid(mut self, label: impl Into<String>) -> Self {
        self.entries.push((label.into(), None));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, Option<f64>)> {
        self.entries.iter().map(|(l, w)| (l.as_str(), *w))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    /// Entries that can take part in a draw.
    pub fn valid_entries(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries
            .iter()
            .filter_map(|(l, w)| valid_weight(*w).map(|w| (l.as_str(), w)))
    }

    /// Entries skipped by selection (missing, negative, or non-finite).
    pub fn invalid_labels(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, w)| valid_weight(*w).is_none())
            .map(|(l, _)| l.as_str())
    }
}

fn valid_weight(w: Option<f64>) -> Option<f64> {
    w.filter(|w| w.is_finite() && *w >= 0.0)
}

/// Pick one label with probability proportional to its weight.
///
/// Returns `None` for an empty table or one with no valid entries. When all
/// valid weights are zero, the first valid label wins. Floating-point drift
/// that exhausts the walk returns the last valid label.
pub fn select_weighted<'a>(table: &'a WeightTable, rng: &mut impl Rng) -> Option<&'a str> {
    if table.is_empty() {
        return None;
    }

    let mut total = 0.0;
    let mut largest: f64 = 0.0;
    let mut first = None;
    let mut last = None;
    for (label, weight) in table.valid_entries() {
        total += weight;
        largest = largest.max(weight);
        first.get_or_insert(label);
        last = Some(label);
    }
    let first = first?;

    if total == 0.0 {
        return Some(first);
    }

    // Finite weights can still sum past f64::MAX; draw on a rescaled table.
    let mut scale = 1.0;
    if !total.is_finite() {
        log::warn!(
            "Weight table overflows (largest weight {}); rescaling for selection",
            largest
        );
        scale = largest;
        total = table.valid_entries().map(|(_, w)| w / scale).sum();
    }

    let mut remaining = rng.gen_range(0.0..total);
    for (label, weight) in table.valid_entries() {
        let weight = weight / scale;
        if remaining < weight {
            return Some(label);
        }
        remaining -= weight;
    }
    last
}

/// Lenient reading of a single numeric value (weights, prevalences,
/// multipliers). Non-numeric values load as `None`.
pub fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(LenientNumberVisitor)
}

struct LenientNumberVisitor;

impl<'de> Visitor<'de> for LenientNumberVisitor {
    type Value = Option<f64>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a number")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(Some(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(v as f64))
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_str<E: de::Error>(self, _: &str) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
        d.deserialize_any(LenientNumberVisitor)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(None)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(None)
    }
}

/// Wrapper so map values can go through [`lenient_number`].
struct LenientValue(Option<f64>);

impl<'de> Deserialize<'de> for LenientValue {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        lenient_number(d).map(LenientValue)
    }
}

struct WeightTableVisitor;

impl<'de> Visitor<'de> for WeightTableVisitor {
    type Value = WeightTable;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of label to weight")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::new();
        while let Some((label, LenientValue(weight))) = map.next_entry::<String, LenientValue>()? {
            entries.push((label, weight));
        }
        Ok(WeightTable { entries })
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        log::warn!("Weight table is a list, not a map; treating as empty");
        Ok(WeightTable::default())
    }

    fn visit_str<E: de::Error>(self, _: &str) -> Result<Self::Value, E> {
        log::warn!("Weight table is a string, not a map; treating as empty");
        Ok(WeightTable::default())
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<Self::Value, E> {
        log::warn!("Weight table is a number, not a map; treating as empty");
        Ok(WeightTable::default())
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        self.visit_f64(v as f64)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        self.visit_f64(v as f64)
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
        log::warn!("Weight table is a bool, not a map; treating as empty");
        Ok(WeightTable::default())
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(WeightTable::default())
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(WeightTable::default())
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
        d.deserialize_any(WeightTableVisitor)
    }
}

impl<'de> Deserialize<'de> for WeightTable {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        d.deserialize_any(WeightTableVisitor)
    }
}

impl Serialize for WeightTable {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        let mut map = s.serialize_map(Some(self.entries.len()))?;
        for (label, weight) in &self.entries {
            map.serialize_entry(label, weight)?;
        }
        map.end()
    }
}
