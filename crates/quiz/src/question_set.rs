use std::collections::HashSet;

use formats::{Dataset, Difficulty};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::error::QuizError;
use crate::question::Question;

pub const DEFAULT_QUESTION_COUNT: usize = 10;

/// Ordered questions for one session, drawn without replacement.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionSet {
    questions: Vec<Question>,
    tier: Option<Difficulty>,
}

impl QuestionSet {
    /// Draws `count` distinct countries from the eligible pool, or from the
    /// `tier` sub-pool when one is given.
    pub fn new<R: Rng + ?Sized>(
        dataset: &Dataset,
        count: usize,
        tier: Option<Difficulty>,
        rng: &mut R,
    ) -> Result<Self, QuizError> {
        let pool = dataset.pool(tier);
        let indices = sample_indices(pool.len(), count, rng)?;

        let questions = indices
            .into_iter()
            .map(|i| {
                let id = pool[i];
                let country = dataset.country(id).ok_or(QuizError::UnknownCountry(id))?;
                Question::new(country.clone())
            })
            .collect::<Result<Vec<_>, _>>()?;

        info!(count, ?tier, pool = pool.len(), "question set drawn");
        Ok(Self { questions, tier })
    }

    /// Reproducible draw from a `ChaCha8Rng` seeded with `seed`.
    pub fn seeded(
        dataset: &Dataset,
        count: usize,
        tier: Option<Difficulty>,
        seed: u64,
    ) -> Result<Self, QuizError> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self::new(dataset, count, tier, &mut rng)
    }

    pub fn tier(&self) -> Option<Difficulty> {
        self.tier
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get_question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn get_question_mut(&mut self, index: usize) -> Option<&mut Question> {
        self.questions.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.questions.iter()
    }

    /// True once every question has an answer.
    pub fn is_answered(&self) -> bool {
        self.questions.iter().all(Question::is_answered)
    }

    pub fn answered_count(&self) -> usize {
        self.questions.iter().filter(|q| q.is_answered()).count()
    }

    pub fn correct_count(&self) -> usize {
        self.questions.iter().filter(|q| q.is_correct()).count()
    }

    pub fn total_score(&self) -> u32 {
        self.questions.iter().map(|q| q.score().total).sum()
    }
}

impl<'a> IntoIterator for &'a QuestionSet {
    type Item = &'a Question;
    type IntoIter = std::slice::Iter<'a, Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.questions.iter()
    }
}

/// `count` distinct indices below `len` by rejection sampling.
///
/// Fails up front when the draw cannot succeed, so the loop always terminates.
pub fn sample_indices<R: Rng + ?Sized>(
    len: usize,
    count: usize,
    rng: &mut R,
) -> Result<Vec<usize>, QuizError> {
    if count == 0 || count > len {
        return Err(QuizError::NotEnoughCountries {
            requested: count,
            available: len,
        });
    }
    let mut seen = HashSet::with_capacity(count);
    let mut picked = Vec::with_capacity(count);
    while picked.len() < count {
        let i = rng.gen_range(0..len);
        if seen.insert(i) {
            picked.push(i);
        }
    }
    Ok(picked)
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashSet};

    use super::{DEFAULT_QUESTION_COUNT, QuestionSet, sample_indices};
    use crate::error::QuizError;
    use crate::scoring::ScoringConfig;
    use formats::{AdjacencyGraph, Country, Dataset, DetailSet, Difficulty};
    use foundation::geometry::Geometry;
    use foundation::ids::CountryId;
    use foundation::math::LonLat;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn square(id: i64) -> Country {
        let lon = (id as f64) * 12.0 - 170.0;
        Country {
            id: CountryId(id),
            name: format!("C{id}"),
            geometry: Geometry::Polygon(vec![vec![
                LonLat::new(lon, 0.0),
                LonLat::new(lon + 10.0, 0.0),
                LonLat::new(lon + 10.0, 10.0),
                LonLat::new(lon, 10.0),
                LonLat::new(lon, 0.0),
            ]]),
        }
    }

    fn dataset(n: i64) -> Dataset {
        let set = DetailSet::new((1..=n).map(square).collect(), vec![], vec![]);
        let eligible: Vec<CountryId> = (1..=n).map(CountryId).collect();
        let mut tiers = BTreeMap::new();
        tiers.insert(Difficulty::Easy, vec![CountryId(1), CountryId(2), CountryId(3)]);
        Dataset::new(set.clone(), set, AdjacencyGraph::new(), eligible, tiers).expect("dataset")
    }

    #[test]
    fn draws_distinct_countries() {
        let ds = dataset(12);
        let set = QuestionSet::seeded(&ds, DEFAULT_QUESTION_COUNT, None, 7).expect("set");
        assert_eq!(set.len(), 10);
        let ids: HashSet<CountryId> = set.iter().map(|q| q.target_id()).collect();
        assert_eq!(ids.len(), 10);
        assert!(!set.is_answered());
        assert_eq!(set.total_score(), 0);
    }

    #[test]
    fn same_seed_same_questions() {
        let ds = dataset(12);
        let a = QuestionSet::seeded(&ds, 5, None, 42).expect("set");
        let b = QuestionSet::seeded(&ds, 5, None, 42).expect("set");
        let ids = |s: &QuestionSet| s.iter().map(|q| q.target_id()).collect::<Vec<_>>();
        assert_eq!(ids(&a), ids(&b));
    }

    #[test]
    fn whole_pool_and_too_many() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut all = sample_indices(6, 6, &mut rng).expect("sample");
        all.sort_unstable();
        assert_eq!(all, vec![0, 1, 2, 3, 4, 5]);

        assert_eq!(
            sample_indices(6, 7, &mut rng),
            Err(QuizError::NotEnoughCountries { requested: 7, available: 6 })
        );
        assert_eq!(
            sample_indices(6, 0, &mut rng),
            Err(QuizError::NotEnoughCountries { requested: 0, available: 6 })
        );
    }

    #[test]
    fn tiers_restrict_the_pool() {
        let ds = dataset(12);
        let set = QuestionSet::seeded(&ds, 3, Some(Difficulty::Easy), 3).expect("set");
        let mut ids: Vec<i64> = set.iter().map(|q| q.target_id().0).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(set.tier(), Some(Difficulty::Easy));

        assert!(matches!(
            QuestionSet::seeded(&ds, 1, Some(Difficulty::Hard), 3),
            Err(QuizError::NotEnoughCountries { available: 0, .. })
        ));
    }

    #[test]
    fn tier_sampling_never_repeats_a_country() {
        let set = DetailSet::new((1..=3).map(square).collect(), vec![], vec![]);
        let eligible: Vec<CountryId> = (1..=3).map(CountryId).collect();
        let mut tiers = BTreeMap::new();
        tiers.insert(Difficulty::Easy, vec![CountryId(1), CountryId(1), CountryId(2)]);
        assert!(Dataset::new(set.clone(), set, AdjacencyGraph::new(), eligible, tiers).is_err());

        let ds = dataset(12);
        for seed in 0..20 {
            let questions = QuestionSet::seeded(&ds, 3, Some(Difficulty::Easy), seed).expect("set");
            let ids: HashSet<CountryId> = questions.iter().map(|q| q.target_id()).collect();
            assert_eq!(ids.len(), 3);
        }
    }

    #[test]
    fn answered_when_every_question_is() {
        let ds = dataset(4);
        let mut set = QuestionSet::seeded(&ds, 2, None, 9).expect("set");
        let cfg = ScoringConfig::default();
        for i in 0..set.len() {
            let q = set.get_question_mut(i).expect("question");
            assert!(!q.is_answered());
            let target = q.target_id();
            let centroid = q.centroid();
            q.answer(Some(centroid), Some(target), ds.adjacency(), &cfg).expect("answer");
        }
        assert!(set.is_answered());
        assert_eq!(set.correct_count(), 2);
        assert_eq!(set.total_score(), 240);
    }
}
