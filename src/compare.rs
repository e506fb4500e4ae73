use std::collections::BTreeMap;

use crate::extract::NormalizedStats;

/// Signed per-statistic delta, team A minus team B.
pub type StatDifferences = BTreeMap<String, f64>;

/// Only keys of `a` that are finite on both sides make it into the output.
pub fn compare(a: &NormalizedStats, b: &NormalizedStats) -> StatDifferences {
    a.iter()
        .filter_map(|(key, value_a)| {
            let value_b = b.get(key)?;
            if value_a.is_finite() && value_b.is_finite() {
                Some((key.to_string(), value_a - value_b))
            } else {
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::TeamRecord;
    use crate::extract::normalize;

    fn stats(pairs: &[(&str, &str)]) -> NormalizedStats {
        let record: TeamRecord = pairs.iter().copied().collect();
        normalize(&record).unwrap()
    }

    #[test]
    fn differences_cover_shared_numeric_keys_only() {
        let a = stats(&[
            ("Team", "A"),
            ("PTS", "100"),
            ("TO", "10"),
            ("Streak", "W2"),
            ("OnlyA", "5"),
            ("BLK", "4.5"),
        ]);
        let b = stats(&[
            ("Team", "B"),
            ("PTS", "90"),
            ("TO", "12"),
            ("Streak", "L1"),
            ("BLK", "n/a"),
            ("OnlyB", "3"),
        ]);

        let diff = compare(&a, &b);
        assert_eq!(
            diff,
            BTreeMap::from([("PTS".to_string(), 10.0), ("TO".to_string(), -2.0)])
        );
    }

    #[test]
    fn infinite_values_are_skipped() {
        let a = stats(&[("Team", "A"), ("PTS", "Infinity"), ("AST", "25")]);
        let b = stats(&[("Team", "B"), ("PTS", "100"), ("AST", "24")]);
        let diff = compare(&a, &b);
        assert_eq!(diff.len(), 1);
        assert_eq!(diff["AST"], 1.0);
    }

    #[test]
    fn comparison_is_antisymmetric() {
        let a = stats(&[("Team", "A"), ("FG%", "47.3"), ("3P%", "36.1"), ("Reb", "44.2")]);
        let b = stats(&[("Team", "B"), ("FG%", "45.9"), ("3P%", "38.0"), ("Reb", "41.7")]);
        let ab = compare(&a, &b);
        let ba = compare(&b, &a);
        assert_eq!(ab.len(), 3);
        for (key, delta) in &ab {
            assert_eq!(*delta, -ba[key]);
        }
    }
}
