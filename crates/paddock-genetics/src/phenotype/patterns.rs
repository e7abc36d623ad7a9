//! White spotting, Appaloosa, and Gray — the stages that paint over the
//! base color.

use rand::Rng;

use crate::genotype::Genotype;
use crate::loci::Locus;
use crate::profile::AdvancedMarkingsBias;
use crate::weighted::{select_weighted, WeightTable};

/// Dominant White alleles that leave the horse (nearly) all white.
pub const NEAR_TOTAL_WHITE: &[&str] = &["W1", "W2", "W3", "W4", "W13", "W15", "W19", "W22"];

/// Dominant White allele that only adds minimal white.
pub const MINIMAL_WHITE: &str = "W20";

/// Chance a gray horse develops a bloody shoulder, before the breed multiplier.
pub const BLOODY_SHOULDER_BASE_CHANCE: f64 = 0.05;

/// Base weight of the Snowflake and Frost Appaloosa modifiers; the rest is "none".
pub const APPALOOSA_MODIFIER_BASE_CHANCE: f64 = 0.1;

/// White-pattern outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WhitePatterns {
    /// Dominant White forces a plain `White` coat.
    pub full_white: bool,
    /// Descriptor tokens in display order.
    pub tokens: Vec<String>,
}

/// Resolve Dominant White, Frame Overo, Tobiano, Sabino, Splash, and Eden
/// White. A near-total-white allele short-circuits everything else.
pub fn white_patterns(genotype: &Genotype) -> WhitePatterns {
    let mut out = WhitePatterns::default();

    if let Some(pair) = genotype.get(Locus::DominantWhite) {
        if pair.symbols().iter().any(|s| NEAR_TOTAL_WHITE.contains(s)) {
            out.full_white = true;
            return out;
        }
        for symbol in distinct_variants(pair.symbols(), "n") {
            let token = if symbol == MINIMAL_WHITE {
                "Minimal White"
            } else {
                "Dominant White"
            };
            push_unique(&mut out.tokens, token.to_string());
        }
    }

    if genotype.carries(Locus::FrameOvero, "O") {
        push_unique(&mut out.tokens, "Frame Overo".into());
    }
    if genotype.carries(Locus::Tobiano, "To") {
        push_unique(&mut out.tokens, "Tobiano".into());
    }
    if genotype.carries(Locus::Sabino1, "Sb1") {
        push_unique(&mut out.tokens, "Sabino".into());
    }
    if let Some(pair) = genotype.get(Locus::SplashWhite) {
        for symbol in distinct_variants(pair.symbols(), "n") {
            let number = symbol.trim_start_matches("SW");
            push_unique(&mut out.tokens, format!("Splash White {}", number));
        }
    }
    if let Some(pair) = genotype.get(Locus::EdenWhite) {
        for symbol in distinct_variants(pair.symbols(), "n") {
            let number = symbol.trim_start_matches("EDXW");
            push_unique(&mut out.tokens, format!("Eden White {}", number));
        }
    }

    out
}

fn distinct_variants(symbols: [&'static str; 2], wild_type: &str) -> Vec<&'static str> {
    let mut out: Vec<&'static str> = Vec::with_capacity(2);
    for s in symbols {
        if s != wild_type && !out.contains(&s) {
            out.push(s);
        }
    }
    out
}

fn push_unique(tokens: &mut Vec<String>, token: String) {
    if !tokens.iter().any(|t| t.eq_ignore_ascii_case(&token)) {
        tokens.push(token);
    }
}

/// Leopard-complex outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppaloosaPattern {
    pub name: Option<String>,
    pub mottling: bool,
    pub striping: bool,
}

/// Age-banded severity of a heterozygous leopard-complex blanket.
pub fn appaloosa_severity(age: u32) -> &'static str {
    match age {
        0..=4 => "Light",
        5..=8 => "Moderate",
        _ => "Heavy",
    }
}

/// Resolve Leopard Complex with Pattern-1.
///
/// Only the heterozygous, no-PATN1 case draws randomness: a weighted
/// Snowflake/Frost/none pick, then a coin between Blanket and Varnish Roan.
pub fn appaloosa_pattern(
    genotype: &Genotype,
    age: u32,
    bias: &AdvancedMarkingsBias,
    rng: &mut impl Rng,
) -> AppaloosaPattern {
    let lp = genotype.copies(Locus::LeopardComplex, "Lp");
    if lp == 0 {
        return AppaloosaPattern::default();
    }
    let patn1 = genotype.carries(Locus::Pattern1, "PATN1");

    let name = match (lp, patn1) {
        (2, true) => "Fewspot Leopard Appaloosa".to_string(),
        (2, false) => "Snowcap Appaloosa".to_string(),
        (_, true) => "Leopard Appaloosa".to_string(),
        (_, false) => {
            let modifiers = WeightTable::new()
                .with("Snowflake", APPALOOSA_MODIFIER_BASE_CHANCE * bias.snowflake())
                .with("Frost", APPALOOSA_MODIFIER_BASE_CHANCE * bias.frost())
                .with("none", 1.0 - 2.0 * APPALOOSA_MODIFIER_BASE_CHANCE);
            let modifier = select_weighted(&modifiers, rng).unwrap_or("none");
            let pattern = if rng.gen_bool(0.5) {
                "Blanket Appaloosa"
            } else {
                "Varnish Roan Appaloosa"
            };
            let mut words = vec![appaloosa_severity(age)];
            if modifier != "none" {
                words.push(modifier);
            }
            words.push(pattern);
            words.join(" ")
        }
    };

    AppaloosaPattern {
        name: Some(name),
        mottling: true,
        striping: true,
    }
}

/// Age-staged gray term on top of a base tone (`Steel`, `Rose`, or empty).
pub fn gray_stage(tone: &str, age: u32) -> String {
    let stage = match age {
        0..=3 => "Gray",
        4..=6 => "Dark Dapple Gray",
        7..=9 => "Light Dapple Gray",
        10..=12 => return "White Gray".to_string(),
        _ => return "Fleabitten Gray".to_string(),
    };
    if tone.is_empty() {
        stage.to_string()
    } else {
        format!("{} {}", tone, stage)
    }
}

/// Roll for the rare bloody-shoulder marking on a gray horse.
pub fn roll_bloody_shoulder(bias: &AdvancedMarkingsBias, rng: &mut impl Rng) -> bool {
    let chance = (BLOODY_SHOULDER_BASE_CHANCE * bias.bloody_shoulder()).clamp(0.0, 1.0);
    rng.gen::<f64>() < chance
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn genotype(pairs: &[(Locus, &str)]) -> Genotype {
        Genotype::from_pairs(pairs).unwrap()
    }

    #[test]
    fn test_near_total_white_short_circuits() {
        let w = white_patterns(&genotype(&[
            (Locus::DominantWhite, "W1/n"),
            (Locus::Tobiano, "To/n"),
        ]));
        assert!(w.full_white);
        assert!(w.tokens.is_empty());
    }

    #[test]
    fn test_minimal_and_generic_dominant_white() {
        let w = white_patterns(&genotype(&[(Locus::DominantWhite, "W20/n")]));
        assert!(!w.full_white);
        assert_eq!(w.tokens, vec!["Minimal White"]);

        let w = white_patterns(&genotype(&[(Locus::DominantWhite, "W5/W20")]));
        assert_eq!(w.tokens, vec!["Minimal White", "Dominant White"]);

        let w = white_patterns(&genotype(&[(Locus::DominantWhite, "W10/W5")]));
        assert_eq!(w.tokens, vec!["Dominant White"]);
    }

    #[test]
    fn test_spotting_tokens_in_order() {
        let w = white_patterns(&genotype(&[
            (Locus::Tobiano, "To/To"),
            (Locus::FrameOvero, "O/n"),
            (Locus::Sabino1, "Sb1/n"),
            (Locus::SplashWhite, "SW1/SW2"),
            (Locus::EdenWhite, "EDXW3/EDXW3"),
        ]));
        assert_eq!(
            w.tokens,
            vec![
                "Frame Overo",
                "Tobiano",
                "Sabino",
                "Splash White 2",
                "Splash White 1",
                "Eden White 3"
            ]
        );
    }

    #[test]
    fn test_homozygous_leopard_names() {
        let mut rng = StdRng::seed_from_u64(1);
        let bias = AdvancedMarkingsBias::default();
        let fewspot = appaloosa_pattern(
            &genotype(&[(Locus::LeopardComplex, "Lp/Lp"), (Locus::Pattern1, "PATN1/patn1")]),
            5,
            &bias,
            &mut rng,
        );
        assert_eq!(fewspot.name.as_deref(), Some("Fewspot Leopard Appaloosa"));
        assert!(fewspot.mottling && fewspot.striping);

        let snowcap = appaloosa_pattern(
            &genotype(&[(Locus::LeopardComplex, "Lp/Lp")]),
            5,
            &bias,
            &mut rng,
        );
        assert_eq!(snowcap.name.as_deref(), Some("Snowcap Appaloosa"));
    }

    #[test]
    fn test_heterozygous_leopard_with_pattern1() {
        let mut rng = StdRng::seed_from_u64(1);
        let p = appaloosa_pattern(
            &genotype(&[(Locus::LeopardComplex, "Lp/lp"), (Locus::Pattern1, "PATN1/PATN1")]),
            2,
            &AdvancedMarkingsBias::default(),
            &mut rng,
        );
        assert_eq!(p.name.as_deref(), Some("Leopard Appaloosa"));
    }

    #[test]
    fn test_heterozygous_leopard_generated_name() {
        let mut rng = StdRng::seed_from_u64(17);
        let g = genotype(&[(Locus::LeopardComplex, "Lp/lp")]);
        let bias = AdvancedMarkingsBias::default();
        for (age, band) in [(1, "Light"), (4, "Light"), (8, "Moderate"), (9, "Heavy")] {
            let name = appaloosa_pattern(&g, age, &bias, &mut rng).name.unwrap();
            assert!(name.starts_with(band), "{name}");
            assert!(
                name.ends_with("Blanket Appaloosa") || name.ends_with("Varnish Roan Appaloosa"),
                "{name}"
            );
        }
    }

    #[test]
    fn test_frost_multiplier_can_force_frost() {
        let mut rng = StdRng::seed_from_u64(23);
        let g = genotype(&[(Locus::LeopardComplex, "Lp/lp")]);
        let bias = AdvancedMarkingsBias {
            snowflake_probability_multiplier: Some(0.0),
            frost_probability_multiplier: Some(1000.0),
            ..Default::default()
        };
        let frost = (0..50)
            .filter(|_| {
                appaloosa_pattern(&g, 6, &bias, &mut rng)
                    .name
                    .unwrap()
                    .contains("Frost")
            })
            .count();
        assert!(frost >= 45, "frost={frost}");
    }

    #[test]
    fn test_no_leopard_no_pattern() {
        let mut rng = StdRng::seed_from_u64(1);
        let p = appaloosa_pattern(
            &genotype(&[(Locus::LeopardComplex, "lp/lp"), (Locus::Pattern1, "PATN1/PATN1")]),
            3,
            &AdvancedMarkingsBias::default(),
            &mut rng,
        );
        assert_eq!(p, AppaloosaPattern::default());
    }

    #[test]
    fn test_gray_stages() {
        assert_eq!(gray_stage("Steel", 0), "Steel Gray");
        assert_eq!(gray_stage("Steel", 3), "Steel Gray");
        assert_eq!(gray_stage("Steel", 4), "Steel Dark Dapple Gray");
        assert_eq!(gray_stage("Rose", 9), "Rose Light Dapple Gray");
        assert_eq!(gray_stage("Rose", 12), "White Gray");
        assert_eq!(gray_stage("Steel", 13), "Fleabitten Gray");
        assert_eq!(gray_stage("", 5), "Dark Dapple Gray");
    }

    #[test]
    fn test_bloody_shoulder_multiplier_bounds() {
        let mut rng = StdRng::seed_from_u64(5);
        let never = AdvancedMarkingsBias {
            bloody_shoulder_probability_multiplier: Some(0.0),
            ..Default::default()
        };
        let always = AdvancedMarkingsBias {
            bloody_shoulder_probability_multiplier: Some(100.0),
            ..Default::default()
        };
        for _ in 0..100 {
            assert!(!roll_bloody_shoulder(&never, &mut rng));
            assert!(roll_bloody_shoulder(&always, &mut rng));
        }
    }
}
