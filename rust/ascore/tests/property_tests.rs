use ascore::combinations::generate_site_combinations;
use ascore::models::{
    DynamicModification,
    ModMass,
    ModificationOccurrence,
};
use ascore::scoring::peptide_score;
use ascore::spectrum::{
    ExperimentalSpectrum,
    MAX_PEAK_DEPTH,
    Peak,
    find_value_range,
};
use rand::rngs::StdRng;
use rand::{
    Rng,
    SeedableRng,
};
use std::collections::HashSet;

fn modification(id: u32, symbol: char, residues: &str) -> DynamicModification {
    DynamicModification {
        id,
        symbol,
        label: symbol.to_string(),
        mass: ModMass::new(79.966331, None),
        residues: residues.chars().collect(),
        n_terminal: false,
        c_terminal: false,
    }
}

/// Every assignment of ids (or nothing) to every position, filtered by counts.
fn brute_force(mods: &[(DynamicModification, usize)], sequence: &str) -> HashSet<Vec<u32>> {
    let options: Vec<Vec<u32>> = sequence
        .chars()
        .map(|aa| {
            let mut opts = vec![0];
            opts.extend(
                mods.iter()
                    .filter(|(m, _)| m.matches_residue(aa))
                    .map(|(m, _)| m.id),
            );
            opts
        })
        .collect();

    let mut out = HashSet::new();
    let mut current = vec![0; sequence.len()];
    fn walk(
        pos: usize,
        options: &[Vec<u32>],
        current: &mut Vec<u32>,
        mods: &[(DynamicModification, usize)],
        out: &mut HashSet<Vec<u32>>,
    ) {
        if pos == options.len() {
            let ok = mods
                .iter()
                .all(|(m, count)| current.iter().filter(|x| **x == m.id).count() == *count);
            if ok {
                out.insert(current.clone());
            }
            return;
        }
        for opt in options[pos].iter() {
            current[pos] = *opt;
            walk(pos + 1, options, current, mods, out);
        }
        current[pos] = 0;
    }
    walk(0, &options, &mut current, mods, &mut out);
    out
}

#[test]
fn test_combinations_match_brute_force() {
    let mut rng = StdRng::seed_from_u64(2024);
    let alphabet: Vec<char> = "ASTYKPE".chars().collect();
    for _ in 0..200 {
        let len = rng.random_range(3..10);
        let sequence: String = (0..len)
            .map(|_| alphabet[rng.random_range(0..alphabet.len())])
            .collect();
        let mods = vec![
            (modification(1, '*', "ST"), rng.random_range(0..3)),
            (modification(2, '#', "SY"), rng.random_range(0..2)),
        ];
        let occurrences: Vec<ModificationOccurrence<'_>> = mods
            .iter()
            .filter(|(_, count)| *count > 0)
            .map(|(m, count)| ModificationOccurrence {
                modification: m,
                count: *count,
            })
            .collect();

        let combos = generate_site_combinations(&occurrences, &sequence);
        let expected = brute_force(&mods, &sequence);

        let got: HashSet<Vec<u32>> = combos.assignments.iter().cloned().collect();
        assert_eq!(got.len(), combos.len(), "duplicates for {sequence}");
        assert_eq!(got, expected, "{sequence} {:?}", mods.iter().map(|x| x.1).collect::<Vec<_>>());
    }
}

#[test]
fn test_aasts_has_three_candidates() {
    let phospho = modification(1, '*', "ST");
    let occ = [ModificationOccurrence {
        modification: &phospho,
        count: 2,
    }];
    let combos = generate_site_combinations(&occ, "AASTS");
    assert_eq!(combos.len(), 3);
    for assignment in combos.assignments.iter() {
        assert_eq!(assignment.iter().filter(|x| **x == 1).count(), 2);
    }
}

#[test]
fn test_find_value_range_matches_linear_scan() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..500 {
        let n = rng.random_range(0..60);
        let mut values: Vec<f64> = (0..n).map(|_| rng.random_range(0.0..100.0)).collect();
        // Some exact repeats
        if n > 3 {
            values[1] = values[0];
        }
        values.sort_by(|a, b| a.total_cmp(b));
        let target = rng.random_range(-5.0..105.0);
        let tol = rng.random_range(0.0..5.0);

        let linear: Vec<usize> = (0..values.len())
            .filter(|i| (values[*i] - target).abs() <= tol)
            .collect();
        match find_value_range(&values, target, tol) {
            None => assert!(linear.is_empty()),
            Some(range) => {
                assert_eq!(range.clone().collect::<Vec<_>>(), linear);
            }
        }
    }
}

#[test]
fn test_peak_depth_is_nested_and_bounded() {
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..20 {
        let peaks: Vec<Peak> = (0..rng.random_range(1..400))
            .map(|_| Peak {
                mz: rng.random_range(100.0..1500.0),
                intensity: rng.random_range(1.0..1000.0),
            })
            .collect();
        let spectrum = ExperimentalSpectrum::new(1, 2, 1600.0, peaks).unwrap();
        let min_mz = spectrum.peaks()[0].mz;
        let window = |mz: f64| ((mz - min_mz) / 100.0).floor() as i64;

        let mut previous: Vec<f64> = Vec::new();
        for depth in 1..=MAX_PEAK_DEPTH {
            let current = spectrum.peak_depth_spectrum(depth).unwrap();
            assert!(current.windows(2).all(|w| w[0] <= w[1]));
            for mz in previous.iter() {
                assert!(current.contains(mz), "depth {depth} lost {mz}");
            }
            let mut per_window = std::collections::HashMap::new();
            for mz in current {
                *per_window.entry(window(*mz)).or_insert(0usize) += 1;
            }
            assert!(per_window.values().all(|n| *n <= depth));
            previous = current.to_vec();
        }
    }
}

#[test]
fn test_score_decreases_with_probability() {
    for n in [1, 5, 20, 80] {
        let mut last = f64::INFINITY;
        for step in 1..100 {
            let p = step as f64 / 100.0;
            let score = peptide_score(p, n, n);
            assert!(score >= 0.0);
            assert!(score <= last, "n {n} p {p}");
            last = score;
        }
        assert!(peptide_score(1.0, n, n) == 0.0);
    }
}
