//! Rumor intake: classify free text and turn negative, street-related
//! rumors into contagion instances.
//!
//! The classifier itself is an external collaborator (a sentiment model and
//! a zero-shot street labeller in practice).  This module only applies the
//! thresholds from [`RumorParams`] to its scores:
//!
//! | Check                                   | Failure               |
//! |-----------------------------------------|-----------------------|
//! | `negative` score > `negative_threshold` | `NotNegative`         |
//! | some street score > `street_threshold`  | `NoRelevantStreet`    |
//! | a relevant street has road edges        | `UnknownStreet`       |
//!
//! An accepted rumor renders dangerous every edge of the highest-scoring
//! relevant street that exists in the road network, both directions
//! included.

use std::fmt;

use rg_contagion::ContagionEngine;
use rg_core::{EdgeId, PersonId, RumorId, RumorParams, Tick};
use rg_graph::RoadNetwork;
use tracing::info;

use crate::{ClassifierError, HazardError, HazardResult};

// ── Classifier seam ───────────────────────────────────────────────────────────

/// Scores produced by a [`RumorClassifier`] for one piece of text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    /// Sentiment label → score, e.g. `("negative", 0.81)`.
    pub sentiment: Vec<(String, f64)>,
    /// Candidate street → relevance score.
    pub streets:   Vec<(String, f64)>,
}

impl Classification {
    /// Score of the `negative` sentiment label; 0 when absent.
    pub fn negative_score(&self) -> f64 {
        self.sentiment
            .iter()
            .find(|(label, _)| label.eq_ignore_ascii_case("negative"))
            .map_or(0.0, |&(_, score)| score)
    }

    /// Streets scoring strictly above `threshold`, best first.  Equal
    /// scores keep the classifier's order.
    pub fn relevant_streets(&self, threshold: f64) -> Vec<(&str, f64)> {
        let mut out: Vec<(&str, f64)> = self
            .streets
            .iter()
            .filter(|(_, score)| *score > threshold)
            .map(|(name, score)| (name.as_str(), *score))
            .collect();
        out.sort_by(|a, b| b.1.total_cmp(&a.1));
        out
    }
}

/// External text classifier.
///
/// `candidate_streets` is the label set the street scores must be drawn
/// from.  Implementations may be slow; they are only called by the outer
/// orchestrator, never from inside an engine.
pub trait RumorClassifier {
    fn classify(&self, text: &str, candidate_streets: &[&str]) -> Result<Classification, ClassifierError>;
}

// ── Decisions ─────────────────────────────────────────────────────────────────

/// Why a rumor did not become a contagion instance.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    NotNegative { score: f64 },
    NoRelevantStreet,
    /// Every relevant street was unknown to the road network; carries the
    /// best-ranked one.
    UnknownStreet(String),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::NotNegative { score } => write!(f, "not negative (score {score:.2})"),
            Rejection::NoRelevantStreet      => f.write_str("no relevant street"),
            Rejection::UnknownStreet(s)      => write!(f, "unknown street `{s}`"),
        }
    }
}

/// Result of evaluating a rumor without acting on it.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Accept { street: String, edges: Vec<EdgeId> },
    Reject(Rejection),
}

/// Result of submitting a rumor to the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum IntakeOutcome {
    Accepted { rumor: RumorId, street: String, edges: usize },
    Rejected(Rejection),
}

impl IntakeOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, IntakeOutcome::Accepted { .. })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IntakeOutcome::Accepted { .. } => "accepted",
            IntakeOutcome::Rejected(_)     => "rejected",
        }
    }
}

// ── RumorIntake ───────────────────────────────────────────────────────────────

/// Applies classifier thresholds and spawns contagion instances.
pub struct RumorIntake {
    params: RumorParams,
}

impl RumorIntake {
    pub fn new(params: RumorParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &RumorParams {
        &self.params
    }

    /// Apply the thresholds to an existing classification.
    pub fn judge(&self, classification: &Classification, network: &RoadNetwork) -> Verdict {
        let negative = classification.negative_score();
        if negative <= self.params.negative_threshold {
            return Verdict::Reject(Rejection::NotNegative { score: negative });
        }
        let relevant = classification.relevant_streets(self.params.street_threshold);
        let Some(&(best, _)) = relevant.first() else {
            return Verdict::Reject(Rejection::NoRelevantStreet);
        };
        relevant
            .iter()
            .find(|(name, _)| !network.street_edges(name).is_empty())
            .map_or_else(
                || Verdict::Reject(Rejection::UnknownStreet(best.to_owned())),
                |&(name, _)| Verdict::Accept {
                    street: name.to_owned(),
                    edges:  network.street_edges(name).to_vec(),
                },
            )
    }

    /// Classify `text` against the network's street names and judge it.
    pub fn evaluate<C>(&self, text: &str, classifier: &C, network: &RoadNetwork) -> HazardResult<Verdict>
    where
        C: RumorClassifier + ?Sized,
    {
        let streets: Vec<&str> = network.street_names().collect();
        let classification = classifier.classify(text, &streets).map_err(HazardError::Classifier)?;
        Ok(self.judge(&classification, network))
    }

    /// Evaluate `text` and, if accepted, spawn a contagion instance for it.
    ///
    /// `seed` is forwarded to [`ContagionEngine::spawn`]; `None` lets the
    /// engine draw the first believer at random.
    pub fn submit<C>(
        &self,
        text:       &str,
        classifier: &C,
        network:    &RoadNetwork,
        engine:     &mut ContagionEngine,
        seed:       Option<PersonId>,
        now:        Tick,
    ) -> HazardResult<IntakeOutcome>
    where
        C: RumorClassifier + ?Sized,
    {
        match self.evaluate(text, classifier, network)? {
            Verdict::Accept { street, edges } => {
                let count = edges.len();
                let rumor = engine.spawn(text, edges, seed, now)?;
                info!(rumor = %rumor, street = %street, edges = count, tick = %now, "rumor accepted");
                Ok(IntakeOutcome::Accepted { rumor, street, edges: count })
            }
            Verdict::Reject(reason) => {
                info!(reason = %reason, tick = %now, "rumor rejected");
                Ok(IntakeOutcome::Rejected(reason))
            }
        }
    }
}
