//! Shade selection — a cosmetic light/dark variation on the resolved color.

use std::collections::BTreeMap;

use rand::Rng;

use crate::weighted::{select_weighted, WeightTable};

/// Shade used when no bias table matches.
pub const DEFAULT_SHADE: &str = "standard";

/// Pick a shade for `shade_key`.
///
/// Tables are tried by exact key, then base color, then the key's first
/// word, then `"Default"`. The first table found is drawn from; an empty or
/// all-invalid table yields [`DEFAULT_SHADE`].
pub fn select_shade(
    shade_bias: &BTreeMap<String, WeightTable>,
    shade_key: &str,
    base_color: &str,
    rng: &mut impl Rng,
) -> String {
    let first_word = shade_key.split_whitespace().next().unwrap_or("");
    let table = [shade_key, base_color, first_word, "Default"]
        .into_iter()
        .filter(|k| !k.is_empty())
        .find_map(|k| shade_bias.get(k));

    table
        .and_then(|t| select_weighted(t, rng))
        .unwrap_or(DEFAULT_SHADE)
        .to_string()
}

/// Whether a shade is worth showing in the display name.
pub fn is_visible_shade(shade: &str) -> bool {
    !shade.eq_ignore_ascii_case(DEFAULT_SHADE) && !shade.eq_ignore_ascii_case("medium")
}

/// Prefix `name` with the capitalized shade unless it is a default shade
/// or the name already mentions it.
pub fn apply_shade(name: &str, shade: &str) -> String {
    if !is_visible_shade(shade) || shade.trim().is_empty() {
        return name.to_string();
    }
    let lower = name.to_lowercase();
    if lower.contains(&shade.to_lowercase()) {
        return name.to_string();
    }
    format!("{} {}", capitalize(shade), name)
}

/// Uppercase the first letter of each word.
pub fn capitalize(s: &str) -> String {
    s.split_whitespace()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn bias(entries: &[(&str, &str)]) -> BTreeMap<String, WeightTable> {
        entries
            .iter()
            .map(|(k, shade)| (k.to_string(), WeightTable::new().with(*shade, 1.0)))
            .collect()
    }

    #[test]
    fn test_lookup_order() {
        let mut rng = StdRng::seed_from_u64(1);
        let b = bias(&[
            ("Sooty Buckskin", "exact"),
            ("Bay", "base"),
            ("Sooty", "word"),
            ("Default", "fallback"),
        ]);
        assert_eq!(select_shade(&b, "Sooty Buckskin", "Bay", &mut rng), "exact");
        assert_eq!(select_shade(&b, "Buckskin Dun", "Bay", &mut rng), "base");
        assert_eq!(select_shade(&b, "Sooty Grulla", "Black", &mut rng), "word");
        assert_eq!(select_shade(&b, "Perlino", "Chestnut", &mut rng), "fallback");
    }

    #[test]
    fn test_no_table_is_standard() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(select_shade(&BTreeMap::new(), "Bay", "Bay", &mut rng), "standard");
        let empty: BTreeMap<_, _> = [("Bay".to_string(), WeightTable::new())].into();
        assert_eq!(select_shade(&empty, "Bay", "Bay", &mut rng), "standard");
    }

    #[test]
    fn test_apply_shade() {
        assert_eq!(apply_shade("Bay", "dark"), "Dark Bay");
        assert_eq!(apply_shade("Bay", "standard"), "Bay");
        assert_eq!(apply_shade("Bay", "Medium"), "Bay");
        assert_eq!(apply_shade("Dark Bay", "dark"), "Dark Bay");
        assert_eq!(apply_shade("Chestnut", "liver red"), "Liver Red Chestnut");
    }
}
