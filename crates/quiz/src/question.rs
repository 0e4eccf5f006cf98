use formats::{AdjacencyGraph, Country};
use foundation::geometry::{ClosestPoint, closest_point_in_geometry};
use foundation::ids::CountryId;
use foundation::math::LonLat;
use tracing::debug;

use crate::error::QuizError;
use crate::scoring::{Score, ScoringConfig};

/// Outcome of answering a question. Written once.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    /// `None` when the round timed out.
    pub point: Option<LonLat>,
    /// `None` for timeouts and clicks outside every country.
    pub country: Option<CountryId>,
    /// Closest target vertex to `point`.
    pub closest: Option<ClosestPoint>,
    pub correct: bool,
    pub adjacent: bool,
    pub score: Score,
}

/// One round: a target country and, once answered, the scored answer.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    target: Country,
    centroid: LonLat,
    answer: Option<Answer>,
}

impl Question {
    /// Fails for targets whose geometry is not a polygon or multipolygon.
    pub fn new(target: Country) -> Result<Self, QuizError> {
        let centroid = target.centroid()?;
        Ok(Self {
            target,
            centroid,
            answer: None,
        })
    }

    pub fn target(&self) -> &Country {
        &self.target
    }

    pub fn target_id(&self) -> CountryId {
        self.target.id
    }

    pub fn name(&self) -> &str {
        &self.target.name
    }

    pub fn centroid(&self) -> LonLat {
        self.centroid
    }

    pub fn outcome(&self) -> Option<&Answer> {
        self.answer.as_ref()
    }

    pub fn is_answered(&self) -> bool {
        self.answer.is_some()
    }

    pub fn is_correct(&self) -> bool {
        self.answer.as_ref().is_some_and(|a| a.correct)
    }

    pub fn is_adjacent(&self) -> bool {
        self.answer.as_ref().is_some_and(|a| a.adjacent)
    }

    /// Zero until answered.
    pub fn score(&self) -> Score {
        self.answer.as_ref().map(|a| a.score).unwrap_or_default()
    }

    pub fn answer_country(&self) -> Option<CountryId> {
        self.answer.as_ref().and_then(|a| a.country)
    }

    pub fn closest_point(&self) -> Option<ClosestPoint> {
        self.answer.as_ref().and_then(|a| a.closest)
    }

    /// Scores a click (or a timeout when `point` is `None`) and records it.
    ///
    /// A second call fails with [`QuizError::AlreadyAnswered`]. A geometry
    /// error leaves the question unanswered.
    pub fn answer(
        &mut self,
        point: Option<LonLat>,
        country: Option<CountryId>,
        adjacency: &AdjacencyGraph,
        scoring: &ScoringConfig,
    ) -> Result<Score, QuizError> {
        if self.answer.is_some() {
            return Err(QuizError::AlreadyAnswered(self.target.id));
        }

        let answer = match point {
            None => Answer {
                point: None,
                country,
                closest: None,
                correct: false,
                adjacent: false,
                score: Score::default(),
            },
            Some(p) => {
                let closest = closest_point_in_geometry(p, &self.target.geometry)?;
                let (correct, adjacent, score) = match country {
                    None => (false, false, Score::new(0, scoring.proximity(closest.distance), 0)),
                    Some(id) if id == self.target.id => (
                        true,
                        false,
                        Score::new(scoring.accuracy_bonus, scoring.max_proximity, 0),
                    ),
                    Some(id) => {
                        let adjacent = adjacency.is_adjacent(id, self.target.id);
                        let bonus = if adjacent { scoring.adjacency_bonus } else { 0 };
                        (false, adjacent, Score::new(0, scoring.proximity(closest.distance), bonus))
                    }
                };
                Answer {
                    point: Some(p),
                    country,
                    closest: Some(closest),
                    correct,
                    adjacent,
                    score,
                }
            }
        };

        debug!(
            target = %self.target.id,
            clicked = ?answer.country,
            distance = answer.closest.map(|c| c.distance),
            total = answer.score.total,
            "question answered"
        );
        let score = answer.score;
        self.answer = Some(answer);
        Ok(score)
    }
}
