//! Drafting a question set from a module pool, balanced by difficulty.

use rand::{Rng, seq::SliceRandom};
use tracing::debug;

use crate::model::{Difficulty, Question};

use super::DiagnosticTag;

/// Share of a draft per difficulty tier, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mix {
    pub basic: usize,
    pub intermediate: usize,
    pub advanced: usize,
}

impl Mix {
    const BALANCED: Self = Self {
        basic: 30,
        intermediate: 50,
        advanced: 20,
    };

    const STRETCH: Self = Self {
        basic: 10,
        intermediate: 40,
        advanced: 50,
    };

    const REMEDIAL: Self = Self {
        basic: 50,
        intermediate: 40,
        advanced: 10,
    };

    /// Leans advanced when mastery outweighs misconceptions, basic when any
    /// misconception remains, balanced otherwise.
    #[must_use]
    pub fn for_tags(tags: &[DiagnosticTag]) -> Self {
        let count = |tag| tags.iter().filter(|&&t| t == tag).count();
        let mastered = count(DiagnosticTag::Master);
        let misconceptions = count(DiagnosticTag::Misconception);

        if mastered > misconceptions {
            Self::STRETCH
        } else if misconceptions > 0 {
            Self::REMEDIAL
        } else {
            Self::BALANCED
        }
    }
}

/// Draws up to `limit` distinct questions from `pool` and shuffles them.
///
/// Basic and intermediate quotas are rounded down; advanced questions fill
/// whatever is left. A tier with too few questions yields what it has, so
/// the draft may come back short.
pub fn draft<'q, R: Rng + ?Sized>(
    pool: &'q [Question],
    tags: &[DiagnosticTag],
    limit: usize,
    rng: &mut R,
) -> Vec<&'q Question> {
    let mix = Mix::for_tags(tags);
    let tier = |difficulty| -> Vec<&'q Question> {
        pool.iter().filter(|q| q.difficulty == difficulty).collect()
    };

    let mut selected = Vec::with_capacity(limit);
    selected.extend(
        tier(Difficulty::Basic)
            .choose_multiple(rng, limit * mix.basic / 100)
            .copied(),
    );
    selected.extend(
        tier(Difficulty::Intermediate)
            .choose_multiple(rng, limit * mix.intermediate / 100)
            .copied(),
    );
    let remaining = limit.saturating_sub(selected.len());
    selected.extend(
        tier(Difficulty::Advanced)
            .choose_multiple(rng, remaining)
            .copied(),
    );
    selected.shuffle(rng);

    debug!(?mix, limit, drafted = selected.len(), "drafted question set");
    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;

    use rand::{SeedableRng, rngs::StdRng};

    fn pool(per_tier: usize) -> Vec<Question> {
        [
            Difficulty::Basic,
            Difficulty::Intermediate,
            Difficulty::Advanced,
        ]
        .into_iter()
        .flat_map(|difficulty| {
            (0..per_tier).map(move |i| Question {
                id: format!("{difficulty:?}-{i}"),
                question: "?".into(),
                options: vec!["a".into(), "b".into()],
                correct_index: 0,
                difficulty,
                explanation: String::new(),
                topic_id: None,
            })
        })
        .collect()
    }

    fn tally(questions: &[&Question]) -> (usize, usize, usize) {
        let count = |d| questions.iter().filter(|q| q.difficulty == d).count();
        (
            count(Difficulty::Basic),
            count(Difficulty::Intermediate),
            count(Difficulty::Advanced),
        )
    }

    #[test]
    fn picks_mix_from_tags() {
        use DiagnosticTag::{Guess, Master, Misconception};

        assert_eq!(Mix::for_tags(&[]), Mix::BALANCED);
        assert_eq!(Mix::for_tags(&[Guess]), Mix::BALANCED);
        assert_eq!(Mix::for_tags(&[Master, Master, Misconception]), Mix::STRETCH);
        assert_eq!(Mix::for_tags(&[Master, Misconception]), Mix::REMEDIAL);
    }

    #[test]
    fn balanced_draft_of_thirty_from_seventy() {
        let pool = pool(25);
        let mut rng = StdRng::seed_from_u64(7);

        let drafted = draft(&pool, &[], 30, &mut rng);
        assert_eq!(drafted.len(), 30);
        assert_eq!(tally(&drafted), (9, 15, 6));

        let ids: HashSet<_> = drafted.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids.len(), 30);
    }

    #[test]
    fn remedial_draft_leans_basic() {
        let pool = pool(25);
        let mut rng = StdRng::seed_from_u64(7);

        let drafted = draft(&pool, &[DiagnosticTag::Misconception], 20, &mut rng);
        assert_eq!(tally(&drafted), (10, 8, 2));
    }

    #[test]
    fn short_tiers_yield_a_short_draft() {
        let pool = pool(2);
        let mut rng = StdRng::seed_from_u64(1);

        let drafted = draft(&pool, &[], 30, &mut rng);
        assert_eq!(drafted.len(), 6);
    }

    #[test]
    fn same_seed_same_draft() {
        let pool = pool(10);
        let a: Vec<_> = draft(&pool, &[], 12, &mut StdRng::seed_from_u64(42))
            .iter()
            .map(|q| q.id.clone())
            .collect();
        let b: Vec<_> = draft(&pool, &[], 12, &mut StdRng::seed_from_u64(42))
            .iter()
            .map(|q| q.id.clone())
            .collect();
        assert_eq!(a, b);
    }
}
