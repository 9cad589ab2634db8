//! Keyword classifier standing in for the sentiment and zero-shot street
//! models.

use rg_hazard::{Classification, ClassifierError, RumorClassifier};

const ALARMING: [&str; 6] = ["shooter", "shooting", "crash", "fire", "flood", "jam"];

pub struct KeywordClassifier;

impl RumorClassifier for KeywordClassifier {
    fn classify(&self, text: &str, candidate_streets: &[&str]) -> Result<Classification, ClassifierError> {
        let lower = text.to_lowercase();
        let negative = if ALARMING.iter().any(|w| lower.contains(w)) { 0.9 } else { 0.1 };
        let streets = candidate_streets
            .iter()
            .map(|s| {
                let score = if lower.contains(&s.to_lowercase()) { 0.95 } else { 0.05 };
                (s.to_string(), score)
            })
            .collect();
        Ok(Classification {
            sentiment: vec![("negative".into(), negative), ("positive".into(), 1.0 - negative)],
            streets,
        })
    }
}
