//! Unit tests for rg-hazard.

#[cfg(test)]
mod helpers {
    use std::sync::Arc;

    use rg_contagion::{ContagionEngine, ContagionInstance};
    use rg_core::{ContagionParams, EdgeId, PersonId, RumorId, SimRng, Tick};
    use rg_graph::{PopulationGraph, RoadNetwork, RoadNetworkBuilder};

    use crate::{Classification, ClassifierError, RumorClassifier};

    /// `J0 ─A─ J1 ─B─ J2`, both on Main Street, plus `J2 ─C─ J3` on Side Street.
    pub fn street_network() -> RoadNetwork {
        let mut b = RoadNetworkBuilder::new();
        let j0 = b.add_node("J0", None);
        let j1 = b.add_node("J1", None);
        let j2 = b.add_node("J2", None);
        let j3 = b.add_node("J3", None);
        b.add_road("A", Some("Main Street"), j0, j1, 100.0, 10_000);
        b.add_road("B", Some("Main Street"), j1, j2, 100.0, 10_000);
        b.add_road("C", Some("Side Street"), j2, j3, 100.0, 10_000);
        b.build().unwrap()
    }

    /// Instance over a complete graph of `n` seeded at `seed`.  With
    /// `spread` one certain step infects everyone; otherwise only the seed
    /// believes the rumor.
    pub fn instance(n: usize, seed: PersonId, edges: &[u32], spread: bool) -> ContagionInstance {
        let params = ContagionParams {
            infection_probability: if spread { 1.0 } else { 0.0 },
            recovery_delay: 100,
            ..ContagionParams::default()
        };
        let mut inst = ContagionInstance::new(
            RumorId(0),
            "r",
            Arc::new(PopulationGraph::complete(n).unwrap()),
            seed,
            edges.iter().map(|&e| EdgeId(e)),
            &params,
            Tick::ZERO,
            SimRng::new(0),
        )
        .unwrap();
        if spread {
            inst.advance();
        }
        inst
    }

    pub fn engine(n: usize) -> ContagionEngine {
        ContagionEngine::new(
            Arc::new(PopulationGraph::complete(n).unwrap()),
            ContagionParams::default(),
            SimRng::new(3),
        )
        .unwrap()
    }

    pub struct Scripted(pub Classification);

    impl RumorClassifier for Scripted {
        fn classify(&self, _text: &str, _candidates: &[&str]) -> Result<Classification, ClassifierError> {
            Ok(self.0.clone())
        }
    }

    pub struct Broken;

    impl RumorClassifier for Broken {
        fn classify(&self, _text: &str, _candidates: &[&str]) -> Result<Classification, ClassifierError> {
            Err("model unavailable".into())
        }
    }

    pub fn classification(negative: f64, streets: &[(&str, f64)]) -> Classification {
        Classification {
            sentiment: vec![("negative".into(), negative), ("neutral".into(), 1.0 - negative)],
            streets:   streets.iter().map(|(s, v)| (s.to_string(), *v)).collect(),
        }
    }
}

// ── Registry ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod registry {
    use rg_core::{AgentId, PersonId};

    use crate::{AgentRegistry, HazardError};

    #[test]
    fn assignment_is_order_modulo_population() {
        let mut reg = AgentRegistry::new(3).unwrap();
        let people: Vec<_> = ["v0", "v1", "v2", "v3", "v4"].iter().map(|v| reg.assign(v).person).collect();
        assert_eq!(people, vec![PersonId(0), PersonId(1), PersonId(2), PersonId(0), PersonId(1)]);
        assert_eq!(reg.len(), 5);
    }

    #[test]
    fn assignment_is_fixed() {
        let mut reg = AgentRegistry::new(2).unwrap();
        let first = reg.assign("car");
        reg.assign("bus");
        assert_eq!(reg.assign("car"), first);
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.get("car"), Some(first));
        assert_eq!(reg.name_of(first.agent), Some("car"));
        assert_eq!(reg.person_of(AgentId(1)), Some(PersonId(1)));
    }

    #[test]
    fn unknown_vehicle_is_unassigned() {
        let reg = AgentRegistry::new(2).unwrap();
        assert!(reg.get("ghost").is_none());
        assert!(matches!(reg.require("ghost"), Err(HazardError::UnassignedAgent(n)) if n == "ghost"));
    }

    #[test]
    fn empty_population_rejected() {
        assert!(matches!(AgentRegistry::new(0), Err(HazardError::EmptyPopulation)));
    }
}

// ── Danger queries ────────────────────────────────────────────────────────────

#[cfg(test)]
mod danger {
    use rg_core::{EdgeId, PersonId};

    use super::helpers::*;
    use crate::{dangerous_edges, dangerous_for, is_dangerous_for};

    #[test]
    fn only_believers_see_danger() {
        let inst = instance(4, PersonId(2), &[5, 6], false);
        let instances = [inst];
        assert_eq!(dangerous_for(PersonId(2), &instances).into_iter().collect::<Vec<_>>(), vec![EdgeId(5), EdgeId(6)]);
        assert!(dangerous_for(PersonId(0), &instances).is_empty());
        assert!(is_dangerous_for(EdgeId(5), PersonId(2), &instances));
        assert!(!is_dangerous_for(EdgeId(5), PersonId(1), &instances));
    }

    #[test]
    fn union_over_believed_rumors() {
        let a = instance(3, PersonId(0), &[1], true);
        let b = instance(3, PersonId(1), &[2, 3], false);
        let instances = [a, b];
        let for_0: Vec<_> = dangerous_for(PersonId(0), &instances).into_iter().collect();
        let for_1: Vec<_> = dangerous_for(PersonId(1), &instances).into_iter().collect();
        assert_eq!(for_0, vec![EdgeId(1)]);
        assert_eq!(for_1, vec![EdgeId(1), EdgeId(2), EdgeId(3)]);
    }

    #[test]
    fn empty_without_instances() {
        assert!(dangerous_for(PersonId(0), &[]).is_empty());
        assert!(dangerous_edges(&[]).is_empty());
    }

    #[test]
    fn person_outside_population_sees_nothing() {
        let instances = [instance(2, PersonId(0), &[1], true)];
        assert!(dangerous_for(PersonId(9), &instances).is_empty());
    }

    #[test]
    fn global_set_covers_live_rumors_only() {
        let live = instance(3, PersonId(0), &[1], false);
        let mut done = instance(1, PersonId(0), &[7], false);
        while !done.is_complete() {
            done.advance();
        }
        let instances = [live, done];
        assert_eq!(dangerous_edges(&instances).into_iter().collect::<Vec<_>>(), vec![EdgeId(1)]);
    }
}

// ── Intake ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod intake {
    use rg_core::{PersonId, RumorId, RumorParams, Tick};

    use super::helpers::*;
    use crate::{HazardError, IntakeOutcome, Rejection, RumorIntake, Verdict};

    fn intake() -> RumorIntake {
        RumorIntake::new(RumorParams::default())
    }

    #[test]
    fn neutral_rumor_rejected() {
        let net = street_network();
        let c = classification(0.2, &[("Main Street", 0.9)]);
        assert_eq!(intake().judge(&c, &net), Verdict::Reject(Rejection::NotNegative { score: 0.2 }));
    }

    #[test]
    fn negative_threshold_is_strict() {
        let net = street_network();
        let c = classification(0.35, &[("Main Street", 0.9)]);
        assert!(matches!(intake().judge(&c, &net), Verdict::Reject(Rejection::NotNegative { .. })));
    }

    #[test]
    fn low_street_scores_rejected() {
        let net = street_network();
        let c = classification(0.9, &[("Main Street", 0.5), ("Side Street", 0.1)]);
        assert_eq!(intake().judge(&c, &net), Verdict::Reject(Rejection::NoRelevantStreet));
    }

    #[test]
    fn unknown_street_rejected() {
        let net = street_network();
        let c = classification(0.9, &[("Harbour Road", 0.8)]);
        assert_eq!(intake().judge(&c, &net), Verdict::Reject(Rejection::UnknownStreet("Harbour Road".into())));
    }

    #[test]
    fn best_known_street_wins_with_both_directions() {
        let net = street_network();
        let c = classification(0.9, &[("Side Street", 0.6), ("Harbour Road", 0.95), ("Main Street", 0.7)]);
        let Verdict::Accept { street, edges } = intake().judge(&c, &net) else {
            panic!("expected acceptance");
        };
        assert_eq!(street, "Main Street");
        let mut names: Vec<_> = edges.iter().map(|&e| net.edge_name[e.index()].as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["-A", "-B", "A", "B"]);
    }

    #[test]
    fn submit_spawns_an_instance() {
        let net = street_network();
        let mut engine = engine(4);
        let classifier = Scripted(classification(0.8, &[("Side Street", 0.7)]));
        let out = intake()
            .submit("crash on side street", &classifier, &net, &mut engine, Some(PersonId(1)), Tick(50))
            .unwrap();
        assert_eq!(out, IntakeOutcome::Accepted { rumor: RumorId(0), street: "Side Street".into(), edges: 2 });
        assert!(out.is_accepted());
        assert_eq!(out.as_str(), "accepted");
        let inst = engine.get(RumorId(0)).unwrap();
        assert_eq!(inst.label(), "crash on side street");
        assert!(inst.is_infected(PersonId(1)));
    }

    #[test]
    fn rejected_submission_spawns_nothing() {
        let net = street_network();
        let mut engine = engine(4);
        let classifier = Scripted(classification(0.1, &[("Side Street", 0.7)]));
        let out = intake().submit("nice weather", &classifier, &net, &mut engine, None, Tick(50)).unwrap();
        assert!(matches!(out, IntakeOutcome::Rejected(Rejection::NotNegative { .. })));
        assert_eq!(out.as_str(), "rejected");
        assert!(engine.is_empty());
    }

    #[test]
    fn classifier_failure_surfaces() {
        let net = street_network();
        let mut engine = engine(4);
        let err = intake().submit("x", &Broken, &net, &mut engine, None, Tick(0)).unwrap_err();
        assert!(matches!(err, HazardError::Classifier(_)));
    }
}
