use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use petpal_core::{Mood, PetPalError, TaskTemplate};

use crate::catalog::default_catalog;

pub const DEFAULT_MOOD_THRESHOLD: f32 = 0.7;

/// Picks the next task from the catalog, preferring ones that suit the
/// pet's mood when the mood reading is trustworthy.
pub struct TaskSuggestionEngine {
    catalog: Vec<TaskTemplate>,
    mood_threshold: f32,
    rng: Mutex<StdRng>,
}

impl TaskSuggestionEngine {
    /// Fails on an empty catalog.
    pub fn new(catalog: Vec<TaskTemplate>, mood_threshold: f32) -> Result<Self, PetPalError> {
        Self::build(catalog, mood_threshold, StdRng::from_entropy())
    }

    pub fn with_seed(
        catalog: Vec<TaskTemplate>,
        mood_threshold: f32,
        seed: u64,
    ) -> Result<Self, PetPalError> {
        Self::build(catalog, mood_threshold, StdRng::seed_from_u64(seed))
    }

    /// Built-in catalog, optionally seeded.
    pub fn standard(mood_threshold: f32, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            catalog: default_catalog(),
            mood_threshold,
            rng: Mutex::new(rng),
        }
    }

    fn build(
        catalog: Vec<TaskTemplate>,
        mood_threshold: f32,
        rng: StdRng,
    ) -> Result<Self, PetPalError> {
        if catalog.is_empty() {
            return Err(PetPalError::PreconditionViolation(
                "task catalog is empty".into(),
            ));
        }
        Ok(Self {
            catalog,
            mood_threshold,
            rng: Mutex::new(rng),
        })
    }

    pub fn catalog(&self) -> &[TaskTemplate] {
        &self.catalog
    }

    pub fn mood_threshold(&self) -> f32 {
        self.mood_threshold
    }

    /// Templates eligible for this reading. The mood filter applies only when
    /// a mood is given and its confidence is strictly above the threshold.
    pub fn candidates(
        &self,
        mood: Option<Mood>,
        confidence: Option<f32>,
    ) -> Result<Vec<&TaskTemplate>, PetPalError> {
        let confident_mood = match (mood, confidence) {
            (Some(mood), Some(c)) if c > self.mood_threshold => Some(mood),
            _ => None,
        };

        let Some(mood) = confident_mood else {
            return Ok(self.catalog.iter().collect());
        };

        let matching: Vec<_> = self.catalog.iter().filter(|t| t.applies_to(mood)).collect();
        if matching.is_empty() {
            return Err(PetPalError::NoEligibleTask(mood.to_string()));
        }
        Ok(matching)
    }

    /// Uniform pick among the candidates. When no template suits a confident
    /// mood, the whole catalog is used instead.
    pub fn select(&self, mood: Option<Mood>, confidence: Option<f32>) -> TaskTemplate {
        let pool = match self.candidates(mood, confidence) {
            Ok(pool) => pool,
            Err(e) => {
                debug!(error = %e, "Falling back to full catalog");
                self.catalog.iter().collect()
            }
        };

        let index = match self.rng.lock() {
            Ok(mut rng) => rng.gen_range(0..pool.len()),
            Err(poisoned) => poisoned.into_inner().gen_range(0..pool.len()),
        };
        pool[index].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petpal_core::TaskType;
    use std::collections::HashSet;

    fn engine(seed: u64) -> TaskSuggestionEngine {
        TaskSuggestionEngine::with_seed(default_catalog(), DEFAULT_MOOD_THRESHOLD, seed).unwrap()
    }

    fn types(templates: Vec<&TaskTemplate>) -> HashSet<TaskType> {
        templates.into_iter().map(|t| t.task_type).collect()
    }

    #[test]
    fn confident_mood_filters_catalog() {
        let e = engine(1);
        let cases = [
            (Mood::Happy, vec![TaskType::Grooming, TaskType::Exercise, TaskType::Training]),
            (Mood::Excited, vec![TaskType::Exercise, TaskType::Training]),
            (Mood::Hungry, vec![TaskType::Feeding]),
            (Mood::Sad, vec![TaskType::Feeding]),
            (Mood::Tired, vec![TaskType::Rest]),
            (Mood::Calm, vec![TaskType::Grooming, TaskType::Rest]),
        ];
        for (mood, expected) in cases {
            let got = types(e.candidates(Some(mood), Some(0.9)).unwrap());
            assert_eq!(got, expected.into_iter().collect(), "{mood}");
        }
    }

    #[test]
    fn hungry_always_selects_feeding() {
        let e = engine(7);
        for _ in 0..50 {
            let t = e.select(Some(Mood::Hungry), Some(0.9));
            assert_eq!(t.task_type, TaskType::Feeding);
        }
    }

    #[test]
    fn threshold_is_strict() {
        let e = engine(1);
        assert_eq!(e.candidates(Some(Mood::Hungry), Some(0.7)).unwrap().len(), 5);
        assert_eq!(e.candidates(Some(Mood::Hungry), Some(0.71)).unwrap().len(), 1);
    }

    #[test]
    fn missing_mood_or_confidence_uses_full_catalog() {
        let e = engine(1);
        assert_eq!(e.candidates(None, None).unwrap().len(), 5);
        assert_eq!(e.candidates(None, Some(0.99)).unwrap().len(), 5);
        assert_eq!(e.candidates(Some(Mood::Tired), None).unwrap().len(), 5);
    }

    #[test]
    fn unmatched_confident_mood_falls_back() {
        let e = engine(3);
        assert!(matches!(
            e.candidates(Some(Mood::Unknown), Some(0.95)),
            Err(PetPalError::NoEligibleTask(_))
        ));
        let seen: HashSet<_> = (0..200)
            .map(|_| e.select(Some(Mood::Unknown), Some(0.95)).task_type)
            .collect();
        assert!(seen.len() > 1);
    }

    #[test]
    fn unfiltered_selection_reaches_every_task() {
        let e = engine(11);
        let seen: HashSet<_> = (0..500).map(|_| e.select(None, None).task_type).collect();
        assert_eq!(seen.len(), 5);
    }

    #[test]
    fn same_seed_same_sequence() {
        let a = engine(42);
        let b = engine(42);
        for _ in 0..20 {
            assert_eq!(a.select(None, None).task_type, b.select(None, None).task_type);
        }
    }

    #[test]
    fn empty_catalog_is_rejected() {
        assert!(matches!(
            TaskSuggestionEngine::new(Vec::new(), 0.7),
            Err(PetPalError::PreconditionViolation(_))
        ));
    }
}
