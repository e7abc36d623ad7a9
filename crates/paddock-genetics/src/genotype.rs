//! Genotype — a horse's allele pairs plus its boolean coat modifiers.
//!
//! A genotype may be partial: unknown loci are simply absent. Once built it
//! is read-only; the generator and the inheritance engine assemble new
//! genotypes through [`GenotypeBuilder`] instead of editing existing ones.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::allele::{AlleleError, AllelePair};
use crate::loci::{Locus, Modifier};

/// Immutable genotype.
///
/// Serializes as one flat map: locus wire names to `"X/Y"` strings and
/// modifier names to booleans. Unknown keys and invalid pairs are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Genotype {
    loci: BTreeMap<Locus, AllelePair>,
    modifiers: BTreeMap<Modifier, bool>,
}

impl Genotype {
    pub fn builder() -> GenotypeBuilder {
        GenotypeBuilder::default()
    }

    /// Convenience constructor from `(locus, "X/Y")` entries.
    pub fn from_pairs(pairs: &[(Locus, &str)]) -> Result<Self, AlleleError> {
        let mut builder = Self::builder();
        for (locus, s) in pairs {
            builder = builder.parse(*locus, s)?;
        }
        Ok(builder.build())
    }

    pub fn get(&self, locus: Locus) -> Option<&AllelePair> {
        self.loci.get(&locus)
    }

    pub fn has_locus(&self, locus: Locus) -> bool {
        self.loci.contains_key(&locus)
    }

    /// Whether the locus is present and carries `symbol` at least once.
    pub fn carries(&self, locus: Locus, symbol: &str) -> bool {
        self.get(locus).is_some_and(|p| p.contains(symbol))
    }

    /// Copies of `symbol` at `locus` (0 when the locus is absent).
    pub fn copies(&self, locus: Locus, symbol: &str) -> usize {
        self.get(locus).map_or(0, |p| p.count(symbol))
    }

    pub fn loci(&self) -> impl Iterator<Item = (Locus, &AllelePair)> {
        self.loci.iter().map(|(l, p)| (*l, p))
    }

    pub fn modifier(&self, modifier: Modifier) -> Option<bool> {
        self.modifiers.get(&modifier).copied()
    }

    /// Modifier value, treating an absent modifier as `false`.
    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifier(modifier).unwrap_or(false)
    }

    pub fn modifiers(&self) -> impl Iterator<Item = (Modifier, bool)> + '_ {
        self.modifiers.iter().map(|(m, v)| (*m, *v))
    }

    pub fn is_empty(&self) -> bool {
        self.loci.is_empty() && self.modifiers.is_empty()
    }

    pub fn locus_count(&self) -> usize {
        self.loci.len()
    }
}

/// Accumulates loci and modifiers for a new genotype.
#[derive(Debug, Clone, Default)]
pub struct GenotypeBuilder {
    loci: BTreeMap<Locus, AllelePair>,
    modifiers: BTreeMap<Modifier, bool>,
}

impl GenotypeBuilder {
    pub fn pair(mut self, pair: AllelePair) -> Self {
        self.insert_pair(pair);
        self
    }

    pub fn parse(self, locus: Locus, s: &str) -> Result<Self, AlleleError> {
        Ok(self.pair(AllelePair::parse(locus, s)?))
    }

    pub fn modifier(mut self, modifier: Modifier, value: bool) -> Self {
        self.insert_modifier(modifier, value);
        self
    }

    pub fn insert_pair(&mut self, pair: AllelePair) {
        self.loci.insert(pair.locus(), pair);
    }

    pub fn insert_modifier(&mut self, modifier: Modifier, value: bool) {
        self.modifiers.insert(modifier, value);
    }

    pub fn build(self) -> Genotype {
        Genotype {
            loci: self.loci,
            modifiers: self.modifiers,
        }
    }
}

impl Serialize for Genotype {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        let mut map = s.serialize_map(Some(self.loci.len() + self.modifiers.len()))?;
        for (locus, pair) in &self.loci {
            map.serialize_entry(locus.name(), &pair.to_string())?;
        }
        for (modifier, value) in &self.modifiers {
            map.serialize_entry(modifier.name(), value)?;
        }
        map.end()
    }
}

struct GenotypeVisitor;

impl<'de> Visitor<'de> for GenotypeVisitor {
    type Value = Genotype;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of locus names to allele pairs and modifier names to booleans")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut builder = GenotypeBuilder::default();
        while let Some(key) = map.next_key::<String>()? {
            if let Some(locus) = Locus::from_name(&key) {
                let value: String = map.next_value()?;
                let pair = AllelePair::parse(locus, &value).map_err(de::Error::custom)?;
                builder.insert_pair(pair);
            } else if let Some(modifier) = Modifier::from_name(&key) {
                builder.insert_modifier(modifier, map.next_value()?);
            } else {
                return Err(de::Error::custom(format!("unknown genotype key '{}'", key)));
            }
        }
        Ok(builder.build())
    }
}

impl<'de> Deserialize<'de> for Genotype {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        d.deserialize_map(GenotypeVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pairs_and_queries() {
        let g = Genotype::from_pairs(&[
            (Locus::Extension, "e/e"),
            (Locus::Cream, "n/Cr"),
        ])
        .unwrap();
        assert!(g.has_locus(Locus::Extension));
        assert!(!g.has_locus(Locus::Gray));
        assert!(g.carries(Locus::Cream, "Cr"));
        assert_eq!(g.copies(Locus::Extension, "e"), 2);
        assert_eq!(g.copies(Locus::Gray, "G"), 0);
        assert_eq!(g.locus_count(), 2);
    }

    #[test]
    fn test_modifiers_default_false() {
        let g = Genotype::builder().modifier(Modifier::Sooty, true).build();
        assert_eq!(g.modifier(Modifier::Sooty), Some(true));
        assert_eq!(g.modifier(Modifier::Flaxen), None);
        assert!(!g.has_modifier(Modifier::Flaxen));
    }

    #[test]
    fn test_json_round_trip_uses_wire_names() {
        let g = Genotype::builder()
            .parse(Locus::Gray, "g/G")
            .unwrap()
            .modifier(Modifier::Rabicano, false)
            .build();
        let json = serde_json::to_string(&g).unwrap();
        assert!(json.contains("\"G_Gray\":\"G/g\""), "{json}");
        assert!(json.contains("\"rabicano\":false"), "{json}");
        let back: Genotype = serde_json::from_str(&json).unwrap();
        assert_eq!(back, g);
    }

    #[test]
    fn test_json_is_one_flat_map() {
        let g = Genotype::builder()
            .parse(Locus::Extension, "e/E")
            .unwrap()
            .modifier(Modifier::Sooty, true)
            .build();
        let json = serde_json::to_string(&g).unwrap();
        assert_eq!(json, r#"{"E_Extension":"E/e","sooty":true}"#);
    }

    #[test]
    fn test_flat_document_loads() {
        let g: Genotype =
            serde_json::from_str(r#"{"E_Extension":"e/e","Cr_Cream":"Cr/n","sooty":true}"#)
                .unwrap();
        assert_eq!(g.get(Locus::Extension).unwrap().to_string(), "e/e");
        assert_eq!(g.get(Locus::Cream).unwrap().to_string(), "Cr/n");
        assert_eq!(g.modifier(Modifier::Sooty), Some(true));
        assert_eq!(g.locus_count(), 2);
    }

    #[test]
    fn test_deserialize_rejects_invalid_pair() {
        let json = r#"{"Cr_Cream":"Cr/Q"}"#;
        assert!(serde_json::from_str::<Genotype>(json).is_err());
    }

    #[test]
    fn test_deserialize_rejects_unknown_keys() {
        // A nested document is not silently read as an empty genotype
        let nested = r#"{"loci":{"E_Extension":"E/e"}}"#;
        assert!(serde_json::from_str::<Genotype>(nested).is_err());
        assert!(serde_json::from_str::<Genotype>(r#"{"X_Unknown":"a/a"}"#).is_err());
    }

    #[test]
    fn test_partial_json_loads() {
        let g: Genotype = serde_json::from_str(r#"{"E_Extension":"E/e"}"#).unwrap();
        assert_eq!(g.locus_count(), 1);
        assert_eq!(g.modifiers().count(), 0);
        let empty: Genotype = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_bincode_round_trip() {
        let g = Genotype::builder()
            .parse(Locus::Dun, "nd2/D")
            .unwrap()
            .parse(Locus::Pearl, "prl/n")
            .unwrap()
            .modifier(Modifier::Flaxen, false)
            .build();
        let bytes = bincode::serialize(&g).unwrap();
        let back: Genotype = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back, g);
    }
}
