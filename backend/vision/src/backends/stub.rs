use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use petpal_core::{Classification, ClassifierOptions, Frame, ImageClassifier, Mood};

/// Development classifier: a random detectable mood with confidence in
/// `[0.7, 1.0)`. Seed it for reproducible runs.
pub struct StubClassifier {
    rng: Mutex<StdRng>,
}

impl StubClassifier {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }

    /// Draw one mood and score.
    pub fn sample(&self) -> (Mood, f32) {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        let mood = *Mood::DETECTABLE
            .choose(&mut *rng)
            .unwrap_or(&Mood::Happy);
        let confidence = rng.gen_range(0.7f32..1.0);
        (mood, confidence)
    }
}

impl Default for StubClassifier {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl ImageClassifier for StubClassifier {
    fn name(&self) -> &str {
        "stub"
    }

    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    async fn classify(
        &self,
        _frame: &Frame,
        _options: &ClassifierOptions,
    ) -> Result<Vec<Classification>> {
        let (mood, score) = self.sample();
        Ok(vec![Classification {
            category_name: mood.as_str().to_string(),
            score,
        }])
    }
}
