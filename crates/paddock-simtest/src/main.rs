//! Paddock Headless Genetics Harness
//!
//! Validates breed data and the genetics pipeline without a database.
//! Runs entirely in-process — no DB, no networking, no rendering.
//!
//! Usage:
//!   cargo run -p paddock-simtest
//!   cargo run -p paddock-simtest -- --verbose
//!   cargo run -p paddock-simtest -- --seed 1234
//!
//! Set `RUST_LOG=debug` to see the library's diagnostics.

use std::collections::BTreeMap;

use paddock_genetics::breeding::{breed_foal, create_store_horse, refresh_phenotype};
use paddock_genetics::generator::generate_genotype;
use paddock_genetics::genotype::Genotype;
use paddock_genetics::inheritance::{inherit_genotype, MAX_INHERITANCE_ATTEMPTS};
use paddock_genetics::loci::Locus;
use paddock_genetics::persistence::{load_record, save_record, HorseRecord};
use paddock_genetics::phenotype::{resolve_phenotype, UNDEFINED_PHENOTYPE};
use paddock_genetics::profile::{load_breed_profiles, validate_profile, BreedGeneticProfile};
use paddock_genetics::weighted::{select_weighted, WeightTable};
use rand::rngs::StdRng;
use rand::SeedableRng;

// ── Breed profiles (same JSON the game server loads) ────────────────────
const PROFILES_JSON: &str = include_str!("../../../data/breed_profiles.json");

const DEFAULT_SEED: u64 = 42;
const SWEEP_HORSES: usize = 2000;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().collect();
    let verbose = args.iter().any(|a| a == "--verbose");
    let seed = args
        .iter()
        .position(|a| a == "--seed")
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_SEED);

    println!("=== Paddock Genetics Harness (seed {}) ===\n", seed);
    log::info!("Harness starting with seed {}", seed);

    let mut results = Vec::new();

    // 1. Breed profile validation
    let profiles = match load_breed_profiles(PROFILES_JSON) {
        Ok(p) => p,
        Err(e) => {
            println!("  ✗ profiles_parse: {}", e);
            std::process::exit(1);
        }
    };
    results.extend(validate_breed_profiles(&profiles, verbose));

    // 2. Weighted selector
    results.extend(validate_weighted_selector(seed, verbose));

    // 3. Generation sweep
    results.extend(validate_generation(&profiles, seed, verbose));

    // 4. Phenotype fixtures
    results.extend(validate_phenotypes(&profiles, seed, verbose));

    // 5. Inheritance
    results.extend(validate_inheritance(&profiles, seed, verbose));

    // 6. Record save/load
    results.extend(validate_records(&profiles, seed, verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn genotype(pairs: &[(Locus, &str)]) -> Genotype {
    match Genotype::from_pairs(pairs) {
        Ok(g) => g,
        Err(e) => {
            log::error!("Bad harness fixture {:?}: {}", pairs, e);
            Genotype::default()
        }
    }
}

// ── 1. Breed Profiles ───────────────────────────────────────────────────

fn validate_breed_profiles(
    profiles: &BTreeMap<String, BreedGeneticProfile>,
    verbose: bool,
) -> Vec<TestResult> {
    println!("--- Breed Profiles ---");
    let mut results = Vec::new();

    results.push(TestResult {
        name: "profiles_not_empty".into(),
        passed: !profiles.is_empty(),
        detail: format!("{} breeds loaded", profiles.len()),
    });

    for (breed, profile) in profiles {
        let issues = validate_profile(profile);
        results.push(TestResult {
            name: format!("profile_clean_{}", breed.to_lowercase().replace(' ', "_")),
            passed: issues.is_empty(),
            detail: if issues.is_empty() {
                format!("{} loci weighted, no issues", profile.allele_weights.len())
            } else {
                issues
                    .iter()
                    .map(|i| i.to_string())
                    .collect::<Vec<_>>()
                    .join("; ")
            },
        });

        if verbose {
            println!(
                "  {}: {} weighted loci, {} restricted loci, {} modifiers",
                breed,
                profile.allele_weights.len(),
                profile.allowed_alleles.len(),
                profile.boolean_modifiers_prevalence.len()
            );
        }
    }

    results
}

// ── 2. Weighted Selector ────────────────────────────────────────────────

fn validate_weighted_selector(seed: u64, _verbose: bool) -> Vec<TestResult> {
    println!("--- Weighted Selector ---");
    let mut results = Vec::new();
    let mut rng = StdRng::seed_from_u64(seed);

    // Zero-weight entries are never chosen
    let table = WeightTable::new()
        .with("never", 0.0)
        .with("often", 3.0)
        .with_invalid("broken")
        .with("sometimes", 1.0);
    let mut bad_pick = None;
    for _ in 0..SWEEP_HORSES {
        match select_weighted(&table, &mut rng) {
            Some("often") | Some("sometimes") => {}
            other => {
                bad_pick = Some(format!("{:?}", other));
                break;
            }
        }
    }
    results.push(TestResult {
        name: "selector_skips_zero_and_invalid".into(),
        passed: bad_pick.is_none(),
        detail: bad_pick.unwrap_or_else(|| format!("{} draws all positive", SWEEP_HORSES)),
    });

    // All-zero falls back to the first valid entry
    let zeros = WeightTable::new()
        .with_invalid("broken")
        .with("first", 0.0)
        .with("second", 0.0);
    let pick = select_weighted(&zeros, &mut rng);
    results.push(TestResult {
        name: "selector_all_zero_first".into(),
        passed: pick == Some("first"),
        detail: format!("picked {:?}", pick),
    });

    let empty_table = WeightTable::new();
    let empty = select_weighted(&empty_table, &mut rng);
    results.push(TestResult {
        name: "selector_empty_sentinel".into(),
        passed: empty.is_none(),
        detail: format!("picked {:?}", empty),
    });

    results
}

// ── 3. Generation ───────────────────────────────────────────────────────

fn validate_generation(
    profiles: &BTreeMap<String, BreedGeneticProfile>,
    seed: u64,
    verbose: bool,
) -> Vec<TestResult> {
    println!("--- Generation Sweep ---");
    let mut results = Vec::new();
    let mut rng = StdRng::seed_from_u64(seed);

    for (breed, profile) in profiles {
        let mut violations = 0;
        let mut chestnuts = 0;
        for _ in 0..SWEEP_HORSES {
            let g = generate_genotype(Some(profile), &mut rng);
            violations += g.loci().filter(|(_, p)| profile.is_disallowed(p)).count();
            if g.get(Locus::Extension).map_or(false, |p| p.to_string() == "e/e") {
                chestnuts += 1;
            }
        }

        results.push(TestResult {
            name: format!("generation_legal_{}", breed.to_lowercase().replace(' ', "_")),
            passed: violations == 0,
            detail: format!("{} disallowed pairs in {} horses", violations, SWEEP_HORSES),
        });

        // Observed e/e frequency should track its weight share
        if let Some(table) = profile.allele_weights.get(&Locus::Extension) {
            let total: f64 = table.valid_entries().map(|(_, w)| w).sum();
            let expected = table
                .valid_entries()
                .find(|(label, _)| *label == "e/e")
                .map_or(0.0, |(_, w)| w / total);
            let observed = chestnuts as f64 / SWEEP_HORSES as f64;
            results.push(TestResult {
                name: format!("generation_frequency_{}", breed.to_lowercase().replace(' ', "_")),
                passed: (observed - expected).abs() < 0.05,
                detail: format!("e/e observed {:.3}, expected {:.3}", observed, expected),
            });
            if verbose {
                println!("  {}: e/e {:.3} (expected {:.3})", breed, observed, expected);
            }
        }
    }

    let empty = generate_genotype(Some(&BreedGeneticProfile::default()), &mut rng);
    results.push(TestResult {
        name: "generation_empty_profile".into(),
        passed: empty.is_empty(),
        detail: format!("{} loci from an empty profile", empty.locus_count()),
    });

    let missing = generate_genotype(None, &mut rng);
    results.push(TestResult {
        name: "generation_missing_profile".into(),
        passed: missing.is_empty(),
        detail: format!("{} loci without a profile", missing.locus_count()),
    });

    results
}

// ── 4. Phenotype ────────────────────────────────────────────────────────

fn validate_phenotypes(
    profiles: &BTreeMap<String, BreedGeneticProfile>,
    seed: u64,
    verbose: bool,
) -> Vec<TestResult> {
    println!("--- Phenotype Fixtures ---");
    let mut results = Vec::new();
    let mut rng = StdRng::seed_from_u64(seed);
    let plain = BreedGeneticProfile::default();

    let fixtures: Vec<(Vec<(Locus, &str)>, u32, &str)> = vec![
        (vec![(Locus::Extension, "e/e")], 5, "Chestnut"),
        (vec![(Locus::Extension, "E/e"), (Locus::Agouti, "A/a")], 5, "Bay"),
        (vec![(Locus::Extension, "E/E"), (Locus::Agouti, "a/a")], 5, "Black"),
        (vec![(Locus::Extension, "e/e"), (Locus::Cream, "Cr/n")], 5, "Palomino"),
        (vec![(Locus::Extension, "e/e"), (Locus::Cream, "Cr/Cr")], 5, "Cremello"),
        (
            vec![(Locus::Extension, "E/E"), (Locus::Agouti, "A/A"), (Locus::Cream, "Cr/n")],
            5,
            "Buckskin",
        ),
        (
            vec![(Locus::Extension, "E/E"), (Locus::Agouti, "a/a"), (Locus::Dun, "D/nd2")],
            5,
            "Grulla",
        ),
        (vec![(Locus::Extension, "e/e"), (Locus::Dun, "D/D")], 5, "Red Dun"),
        (
            vec![(Locus::Extension, "E/e"), (Locus::Agouti, "A/a"), (Locus::Champagne, "Ch/n")],
            5,
            "Amber Champagne",
        ),
        (
            vec![(Locus::Extension, "E/E"), (Locus::Agouti, "a/a"), (Locus::Silver, "Z/n")],
            5,
            "Silver Black",
        ),
        (vec![(Locus::Extension, "e/e"), (Locus::Pearl, "prl/prl")], 5, "Apricot"),
        (
            vec![(Locus::Extension, "E/E"), (Locus::Agouti, "A/A"), (Locus::Roan, "Rn/rn")],
            5,
            "Bay Roan",
        ),
        (
            vec![(Locus::Extension, "E/e"), (Locus::Agouti, "A/a"), (Locus::Tobiano, "To/n")],
            5,
            "Bay Tobiano",
        ),
        (
            vec![(Locus::Extension, "E/E"), (Locus::DominantWhite, "W1/n"), (Locus::Gray, "G/g")],
            5,
            "White",
        ),
        (
            vec![(Locus::Extension, "E/E"), (Locus::Agouti, "a/a"), (Locus::Gray, "G/g")],
            2,
            "Steel Gray",
        ),
        (vec![(Locus::Extension, "e/e"), (Locus::Gray, "G/G")], 15, "Fleabitten Gray"),
    ];

    let mut mismatches = Vec::new();
    for (pairs, age, expected) in &fixtures {
        let r = resolve_phenotype(&genotype(pairs), &plain, *age, &mut rng);
        if r.final_display_color != *expected {
            mismatches.push(format!("{} != {}", r.final_display_color, expected));
        } else if verbose {
            println!("  {:<18} age {:>2}", expected, age);
        }
    }
    results.push(TestResult {
        name: "phenotype_fixtures".into(),
        passed: mismatches.is_empty(),
        detail: if mismatches.is_empty() {
            format!("{} fixtures resolved", fixtures.len())
        } else {
            mismatches.join("; ")
        },
    });

    // Store horses always get a name
    let mut undefined = 0;
    let mut names: BTreeMap<String, usize> = BTreeMap::new();
    for profile in profiles.values() {
        for i in 0..SWEEP_HORSES / 4 {
            let horse = create_store_horse(Some(profile), (i % 20) as u32, &mut rng);
            let name = horse.phenotype.final_display_color;
            if name.is_empty() || name == UNDEFINED_PHENOTYPE {
                undefined += 1;
            }
            *names.entry(name).or_insert(0) += 1;
        }
    }
    results.push(TestResult {
        name: "phenotype_always_named".into(),
        passed: undefined == 0,
        detail: format!("{} undefined, {} distinct names", undefined, names.len()),
    });
    if verbose {
        let mut common: Vec<_> = names.iter().collect();
        common.sort_by(|a, b| b.1.cmp(a.1));
        for (name, count) in common.iter().take(10) {
            println!("  {:>5} × {}", count, name);
        }
    }

    // Aging a gray changes its name but not its markings
    let gray = genotype(&[(Locus::Extension, "e/e"), (Locus::Gray, "G/g")]);
    let young = refresh_phenotype(&gray, None, 3, &mut StdRng::seed_from_u64(seed));
    let older = refresh_phenotype(&gray, None, 4, &mut StdRng::seed_from_u64(seed));
    results.push(TestResult {
        name: "phenotype_gray_birthday".into(),
        passed: young.final_display_color != older.final_display_color
            && young.phenotypic_markings == older.phenotypic_markings
            && young.determined_shade == older.determined_shade,
        detail: format!(
            "{} → {}",
            young.final_display_color, older.final_display_color
        ),
    });

    results
}

// ── 5. Inheritance ──────────────────────────────────────────────────────

fn validate_inheritance(
    profiles: &BTreeMap<String, BreedGeneticProfile>,
    seed: u64,
    verbose: bool,
) -> Vec<TestResult> {
    println!("--- Inheritance ---");
    let mut results = Vec::new();
    let mut rng = StdRng::seed_from_u64(seed);
    let open = BreedGeneticProfile::default();

    // Aa × Aa → about a quarter aa
    let carrier = genotype(&[(Locus::Agouti, "A/a")]);
    let mut recessive = 0;
    for _ in 0..SWEEP_HORSES {
        if let Ok(foal) = inherit_genotype(Some(&carrier), Some(&carrier), Some(&open), &mut rng) {
            if foal.copies(Locus::Agouti, "a") == 2 {
                recessive += 1;
            }
        }
    }
    let ratio = recessive as f64 / SWEEP_HORSES as f64;
    results.push(TestResult {
        name: "inheritance_mendelian_ratio".into(),
        passed: (ratio - 0.25).abs() < 0.04,
        detail: format!("a/a ratio {:.3} (expected 0.250)", ratio),
    });

    // D/D × D/D always breeds true
    let dun = genotype(&[(Locus::Dun, "D/D")]);
    let all_dun = (0..200).all(|_| {
        inherit_genotype(Some(&dun), Some(&dun), Some(&open), &mut rng)
            .map_or(false, |f| f.get(Locus::Dun).map_or(false, |p| p.to_string() == "D/D"))
    });
    results.push(TestResult {
        name: "inheritance_homozygous_true".into(),
        passed: all_dun,
        detail: "D/D × D/D → D/D".into(),
    });

    // Every draw disallowed: fallback after the attempt cap
    let mut strict = BreedGeneticProfile::default();
    strict
        .allowed_alleles
        .insert(Locus::FrameOvero, vec!["O/n".into(), "n/n".into()]);
    strict
        .disallowed_combinations
        .insert(Locus::FrameOvero, vec!["O/O".into()]);
    let lethal = genotype(&[(Locus::FrameOvero, "O/O")]);
    let fallback = inherit_genotype(Some(&lethal), Some(&lethal), Some(&strict), &mut rng)
        .ok()
        .and_then(|f| f.get(Locus::FrameOvero).map(|p| p.to_string()));
    results.push(TestResult {
        name: "inheritance_fallback_terminates".into(),
        passed: fallback.as_deref() == Some("n/n"),
        detail: format!(
            "after {} attempts: {:?}",
            MAX_INHERITANCE_ATTEMPTS, fallback
        ),
    });

    // Missing inputs fail fast
    let missing = breed_foal(None, Some(&dun), Some(&open), &mut rng);
    results.push(TestResult {
        name: "inheritance_missing_sire".into(),
        passed: missing.is_err(),
        detail: match missing {
            Err(e) => e.to_string(),
            Ok(_) => "foal produced without a sire".into(),
        },
    });

    // Foals of every breed stay within breed rules
    for (breed, profile) in profiles {
        let mut violations = 0;
        for _ in 0..SWEEP_HORSES / 10 {
            let sire = create_store_horse(Some(profile), 8, &mut rng);
            let dam = create_store_horse(Some(profile), 6, &mut rng);
            match breed_foal(Some(&sire.genotype), Some(&dam.genotype), Some(profile), &mut rng) {
                Ok(foal) => {
                    violations += foal
                        .genotype
                        .loci()
                        .filter(|(_, p)| profile.is_disallowed(p))
                        .count();
                }
                Err(e) => {
                    log::warn!("{} foal failed: {}", breed, e);
                    violations += 1;
                }
            }
        }
        results.push(TestResult {
            name: format!("inheritance_legal_{}", breed.to_lowercase().replace(' ', "_")),
            passed: violations == 0,
            detail: format!("{} violations in {} foals", violations, SWEEP_HORSES / 10),
        });
        if verbose {
            println!("  {}: {} foals bred", breed, SWEEP_HORSES / 10);
        }
    }

    results
}

// ── 6. Records ──────────────────────────────────────────────────────────

fn validate_records(
    profiles: &BTreeMap<String, BreedGeneticProfile>,
    seed: u64,
    verbose: bool,
) -> Vec<TestResult> {
    println!("--- Records ---");
    let mut results = Vec::new();
    let mut rng = StdRng::seed_from_u64(seed);

    let mut failures = Vec::new();
    let mut bytes = 0;
    for (breed, profile) in profiles {
        let record = HorseRecord {
            breed: Some(breed.clone()),
            age: 7,
            genetics: create_store_horse(Some(profile), 7, &mut rng),
        };
        let mut buffer = Vec::new();
        if let Err(e) = save_record(&mut buffer, &record) {
            failures.push(format!("{}: save failed: {}", breed, e));
            continue;
        }
        bytes += buffer.len();
        match load_record(&buffer[..]) {
            Ok(loaded) if loaded == record => {}
            Ok(_) => failures.push(format!("{}: record changed on reload", breed)),
            Err(e) => failures.push(format!("{}: load failed: {}", breed, e)),
        }
    }
    if verbose {
        println!("  {} bytes across {} records", bytes, profiles.len());
    }

    results.push(TestResult {
        name: "records_roundtrip".into(),
        passed: failures.is_empty(),
        detail: if failures.is_empty() {
            format!("{} records, {} bytes", profiles.len(), bytes)
        } else {
            failures.join("; ")
        },
    });

    results
}
