use crate::error::{AppError, AppResult};
use crate::models::PrizeEntry;
use rand::Rng;

/// Pure weighted pick: walk entries in catalog order accumulating weight and
/// return the first whose cumulative weight reaches `roll` (1-based, in
/// `[1, total]`). Entries with non-positive weight never win. Returns the
/// zero-based catalog position alongside the entry.
pub fn pick(entries: &[PrizeEntry], roll: i64) -> Option<(usize, &PrizeEntry)> {
    let mut acc = 0i64;
    for (i, entry) in entries.iter().enumerate() {
        if entry.weight <= 0 {
            continue;
        }
        acc += entry.weight;
        if roll <= acc {
            return Some((i, entry));
        }
    }
    None
}

/// Draw one entry with probability proportional to its weight. A catalog
/// whose total weight is not positive is a configuration error, not a
/// condition to paper over with the first entry.
pub fn draw(entries: &[PrizeEntry]) -> AppResult<(usize, &PrizeEntry)> {
    let total: i64 = entries.iter().map(|e| e.weight.max(0)).sum();
    if total <= 0 {
        return Err(AppError::ConfigError(
            "total prize weight must be positive".into(),
        ));
    }
    let roll = rand::thread_rng().gen_range(1..=total);
    pick(entries, roll)
        .ok_or_else(|| AppError::InternalError(format!("weighted pick missed at roll {roll}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(weights: &[i64]) -> Vec<PrizeEntry> {
        weights
            .iter()
            .enumerate()
            .map(|(i, &w)| PrizeEntry {
                index: i + 1,
                name: format!("Gift {}", i + 1),
                weight: w,
                sticker: String::new(),
            })
            .collect()
    }

    #[test]
    fn roll_boundaries_partition_by_weight() {
        let entries = catalog(&[1, 2, 3, 4]);
        // cumulative: 1 | 2..=3 | 4..=6 | 7..=10
        let expected = [0, 1, 1, 2, 2, 2, 3, 3, 3, 3];
        for (roll, &want) in (1..=10).zip(expected.iter()) {
            let (got, _) = pick(&entries, roll).unwrap();
            assert_eq!(got, want, "roll {roll}");
        }
    }

    #[test]
    fn zero_weight_entries_never_win() {
        let entries = catalog(&[0, 5, 0]);
        for roll in 1..=5 {
            let (i, _) = pick(&entries, roll).unwrap();
            assert_eq!(i, 1);
        }
    }

    #[test]
    fn zero_total_weight_is_a_config_error() {
        let entries = catalog(&[0, 0, 0, 0]);
        assert!(matches!(draw(&entries), Err(AppError::ConfigError(_))));
    }

    #[test]
    fn empty_catalog_is_a_config_error() {
        assert!(matches!(draw(&[]), Err(AppError::ConfigError(_))));
    }

    #[test]
    fn equal_weights_converge_to_uniform() {
        let entries = catalog(&[1, 1, 1, 1]);
        let trials = 20_000;
        let mut counts = [0u32; 4];
        for _ in 0..trials {
            let (i, _) = draw(&entries).unwrap();
            counts[i] += 1;
        }
        for &c in &counts {
            let freq = c as f64 / trials as f64;
            // 25% each; generous bounds keep the test deterministic enough
            assert!((0.20..=0.30).contains(&freq), "frequency {freq}");
        }
    }

    #[test]
    fn unequal_weights_converge_proportionally() {
        let entries = catalog(&[1, 2, 3, 4]);
        let trials = 20_000;
        let mut counts = [0u32; 4];
        for _ in 0..trials {
            let (i, _) = draw(&entries).unwrap();
            counts[i] += 1;
        }
        for (i, &c) in counts.iter().enumerate() {
            let freq = c as f64 / trials as f64;
            let expected = (i + 1) as f64 / 10.0;
            assert!(
                (freq - expected).abs() < 0.05,
                "segment {i}: got {freq}, expected {expected}"
            );
        }
    }
}
