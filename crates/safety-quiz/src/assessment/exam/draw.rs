use super::DifficultyMix;
use crate::assessment::bank::QuestionBank;
use crate::assessment::domain::Difficulty;
use rand::seq::SliceRandom;
use rand::Rng;

/// Picks `count` bank positions, balancing difficulty quotas and categories.
///
/// Basic and intermediate quotas are `round(count * weight / sum)`; advanced
/// takes the remainder. Inside a quota, categories are visited round-robin in
/// the configured order. Any shortfall is topped up at random from the unused
/// pool and the final selection is shuffled.
pub(crate) fn balanced_positions<R: Rng + ?Sized>(
    bank: &QuestionBank,
    count: usize,
    categories: &[String],
    mix: Option<&DifficultyMix>,
    rng: &mut R,
) -> Vec<usize> {
    let mut all: Vec<usize> = (0..bank.len()).collect();
    if count >= bank.len() {
        all.shuffle(rng);
        return all;
    }

    let mut picked: Vec<usize> = Vec::with_capacity(count);
    match mix.and_then(|mix| mix.quotas(count)) {
        Some(quotas) => {
            for (difficulty, quota) in Difficulty::ordered().into_iter().zip(quotas) {
                let candidates: Vec<usize> = all
                    .iter()
                    .copied()
                    .filter(|position| {
                        bank.questions()[*position].difficulty() == Some(difficulty)
                    })
                    .collect();
                picked.extend(round_robin(bank, candidates, quota, categories, rng));
            }
        }
        None => picked.extend(round_robin(bank, all.clone(), count, categories, rng)),
    }

    if picked.len() < count {
        let mut remaining: Vec<usize> = all
            .drain(..)
            .filter(|position| !picked.contains(position))
            .collect();
        remaining.shuffle(rng);
        remaining.truncate(count - picked.len());
        picked.extend(remaining);
    }

    picked.shuffle(rng);
    picked
}

fn round_robin<R: Rng + ?Sized>(
    bank: &QuestionBank,
    candidates: Vec<usize>,
    quota: usize,
    categories: &[String],
    rng: &mut R,
) -> Vec<usize> {
    // One bucket per configured category plus a trailing bucket for the rest.
    let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); categories.len() + 1];
    for position in candidates {
        let slot = bank.questions()[position]
            .category()
            .and_then(|category| categories.iter().position(|name| name == category))
            .unwrap_or(categories.len());
        buckets[slot].push(position);
    }
    for bucket in &mut buckets {
        bucket.shuffle(rng);
    }

    let mut picked = Vec::with_capacity(quota);
    while picked.len() < quota && buckets.iter().any(|bucket| !bucket.is_empty()) {
        for bucket in &mut buckets {
            if picked.len() == quota {
                break;
            }
            if let Some(position) = bucket.pop() {
                picked.push(position);
            }
        }
    }
    picked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::domain::QuestionRecord;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn bank() -> QuestionBank {
        let categories = ["Legislation", "Hazards", "Controls"];
        let difficulties = [
            Difficulty::Basic,
            Difficulty::Intermediate,
            Difficulty::Advanced,
        ];
        let records = (0..30)
            .map(|index| {
                QuestionRecord::new(index, format!("Q{index}"), &["A", "B", "C", "D"], 0, "")
                    .with_category(categories[index as usize % 3])
                    .with_difficulty(difficulties[(index as usize / 3) % 3])
            })
            .collect();
        QuestionBank::new(records).expect("bank validates")
    }

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn draws_unique_positions_of_requested_size() {
        let bank = bank();
        let mut rng = StdRng::seed_from_u64(7);
        let positions = balanced_positions(&bank, 12, &[], None, &mut rng);

        assert_eq!(positions.len(), 12);
        let unique: HashSet<usize> = positions.iter().copied().collect();
        assert_eq!(unique.len(), 12);
    }

    #[test]
    fn spreads_draw_across_categories() {
        let bank = bank();
        let mut rng = StdRng::seed_from_u64(11);
        let categories = names(&["Legislation", "Hazards", "Controls"]);
        let positions = balanced_positions(&bank, 9, &categories, None, &mut rng);

        for category in &categories {
            let hits = positions
                .iter()
                .filter(|position| {
                    bank.questions()[**position].category() == Some(category.as_str())
                })
                .count();
            assert_eq!(hits, 3, "category {category} should get an equal share");
        }
    }

    #[test]
    fn honours_difficulty_quotas() {
        let bank = bank();
        let mut rng = StdRng::seed_from_u64(3);
        let mix = DifficultyMix {
            basic: 0.35,
            intermediate: 0.45,
            advanced: 0.2,
        };
        let positions = balanced_positions(&bank, 20, &[], Some(&mix), &mut rng);

        let count = |difficulty| {
            positions
                .iter()
                .filter(|position| bank.questions()[**position].difficulty() == Some(difficulty))
                .count()
        };
        assert_eq!(count(Difficulty::Basic), 7);
        assert_eq!(count(Difficulty::Intermediate), 9);
        assert_eq!(count(Difficulty::Advanced), 4);
    }

    #[test]
    fn tops_up_when_a_difficulty_runs_short() {
        let bank = bank();
        let mut rng = StdRng::seed_from_u64(5);
        let mix = DifficultyMix {
            basic: 1.0,
            intermediate: 0.0,
            advanced: 0.0,
        };
        let positions = balanced_positions(&bank, 15, &[], Some(&mix), &mut rng);

        assert_eq!(positions.len(), 15);
        let basic = positions
            .iter()
            .filter(|position| {
                bank.questions()[**position].difficulty() == Some(Difficulty::Basic)
            })
            .count();
        assert_eq!(basic, 12, "every basic question is used before topping up");
    }

    #[test]
    fn oversized_request_returns_whole_bank() {
        let bank = bank();
        let mut rng = StdRng::seed_from_u64(1);
        let positions = balanced_positions(&bank, 50, &[], None, &mut rng);
        assert_eq!(positions.len(), 30);
    }

    #[test]
    fn same_seed_gives_same_draw() {
        let bank = bank();
        let first = balanced_positions(&bank, 10, &[], None, &mut StdRng::seed_from_u64(42));
        let second = balanced_positions(&bank, 10, &[], None, &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
    }
}
