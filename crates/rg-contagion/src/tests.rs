//! Unit tests for rg-contagion.

#[cfg(test)]
mod helpers {
    use std::sync::Arc;

    use rg_core::{ContagionParams, EdgeId, PersonId, RumorId, SimRng, Tick};
    use rg_graph::PopulationGraph;

    use crate::ContagionInstance;

    pub fn params(p: f64, delay: u64) -> ContagionParams {
        ContagionParams { infection_probability: p, recovery_delay: delay, ..ContagionParams::default() }
    }

    pub fn complete(n: usize) -> Arc<PopulationGraph> {
        Arc::new(PopulationGraph::complete(n).unwrap())
    }

    pub fn instance(graph: Arc<PopulationGraph>, p: f64, delay: u64, seed: u64) -> ContagionInstance {
        ContagionInstance::new(
            RumorId(0),
            "test rumor",
            graph,
            PersonId(0),
            [EdgeId(1), EdgeId(2)],
            &params(p, delay),
            Tick::ZERO,
            SimRng::new(seed),
        )
        .unwrap()
    }
}

// ── Instance construction ─────────────────────────────────────────────────────

#[cfg(test)]
mod construction {
    use std::sync::Arc;

    use rg_core::{EdgeId, PersonId, RumorId, SimRng, Tick};
    use rg_graph::PopulationGraph;

    use super::helpers::*;
    use crate::{ContagionError, ContagionInstance, Status};

    #[test]
    fn exactly_one_infected_at_tick_zero() {
        let inst = instance(complete(10), 0.5, 3, 1);
        assert_eq!(inst.tick(), Tick::ZERO);
        assert_eq!(inst.infected_count(), 1);
        assert_eq!(inst.status(PersonId(0)), Status::Infected);
        assert_eq!(inst.infected_at(PersonId(0)), Some(Tick::ZERO));
        assert!(inst.statuses()[1..].iter().all(|s| *s == Status::Susceptible));
        assert!(!inst.recovery_eligible());
    }

    #[test]
    fn seed_outside_population_rejected() {
        let err = ContagionInstance::new(
            RumorId(0),
            "x",
            complete(3),
            PersonId(3),
            [EdgeId(0)],
            &params(0.5, 1),
            Tick::ZERO,
            SimRng::new(0),
        )
        .err()
        .unwrap();
        assert!(matches!(err, ContagionError::SeedOutOfRange(PersonId(3), 3)));
    }

    #[test]
    fn empty_related_edges_rejected() {
        let err = ContagionInstance::new(
            RumorId(0),
            "x",
            complete(3),
            PersonId(0),
            std::iter::empty(),
            &params(0.5, 1),
            Tick::ZERO,
            SimRng::new(0),
        )
        .err()
        .unwrap();
        assert!(matches!(err, ContagionError::NoRelatedEdges));
    }

    #[test]
    fn probability_out_of_range_rejected() {
        let err = ContagionInstance::new(
            RumorId(0),
            "x",
            Arc::new(PopulationGraph::complete(2).unwrap()),
            PersonId(0),
            [EdgeId(0)],
            &params(1.5, 1),
            Tick::ZERO,
            SimRng::new(0),
        )
        .err()
        .unwrap();
        assert!(matches!(err, ContagionError::InvalidProbability(_)));
    }

    #[test]
    fn related_edges_deduplicated() {
        let inst = ContagionInstance::new(
            RumorId(0),
            "x",
            complete(2),
            PersonId(0),
            [EdgeId(4), EdgeId(4), EdgeId(1)],
            &params(0.5, 1),
            Tick::ZERO,
            SimRng::new(0),
        )
        .unwrap();
        assert_eq!(inst.related_edges().iter().copied().collect::<Vec<_>>(), vec![EdgeId(1), EdgeId(4)]);
    }
}

// ── Stepping ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod stepping {
    use rg_core::{PersonId, Tick};
    use rg_graph::PopulationGraph;
    use std::sync::Arc;

    use super::helpers::*;
    use crate::Status;

    #[test]
    fn certain_spread_then_recovery_after_delay() {
        let mut inst = instance(complete(4), 1.0, 2, 0);

        inst.advance();
        assert_eq!(inst.tick(), Tick(1));
        assert!(inst.statuses().iter().all(|s| *s == Status::Infected));
        assert!(inst.recovery_eligible());

        inst.advance();
        assert!(inst.statuses().iter().all(|s| *s == Status::Infected));

        inst.advance();
        assert_eq!(inst.tick(), Tick(3));
        assert!(inst.statuses().iter().all(|s| *s == Status::Recovered));
        assert!(inst.is_complete());
        assert_eq!(inst.completed_at(), Some(Tick(3)));
    }

    #[test]
    fn zero_probability_never_spreads() {
        let mut inst = instance(complete(5), 0.0, 1, 7);
        for _ in 0..20 {
            inst.advance();
        }
        assert_eq!(inst.infected_count(), 1);
        assert_eq!(inst.status(PersonId(0)), Status::Infected);
        assert!(!inst.recovery_eligible(), "latch must stay open while others are untouched");
    }

    #[test]
    fn transitions_are_monotone() {
        let mut inst = instance(complete(30), 0.1, 3, 99);
        let mut prev = inst.statuses().to_vec();
        for _ in 0..200 {
            let next = inst.advance().to_vec();
            for (a, b) in prev.iter().zip(&next) {
                assert!(a.can_become(*b), "{a} -> {b}");
            }
            prev = next;
        }
    }

    #[test]
    fn no_recovery_before_delay() {
        let mut inst = instance(complete(20), 0.3, 5, 3);
        for _ in 0..100 {
            inst.advance();
            let now = inst.tick();
            for i in 0..inst.population() {
                let person = PersonId(i as u32);
                if inst.status(person) == Status::Recovered {
                    let at = inst.infected_at(person).unwrap();
                    assert!(now.since(at) > 5, "{person} recovered at {now} after infection at {at}");
                }
            }
        }
    }

    #[test]
    fn infection_needs_an_infected_neighbour() {
        // 0 - 1   2 - 3 : person 0 can only ever reach 1.
        let graph = Arc::new(
            PopulationGraph::from_edges(4, &[(PersonId(0), PersonId(1)), (PersonId(2), PersonId(3))]).unwrap(),
        );
        let mut inst = instance(graph, 1.0, 1, 0);
        for _ in 0..10 {
            inst.advance();
        }
        assert_eq!(inst.status(PersonId(1)), Status::Infected);
        assert_eq!(inst.status(PersonId(2)), Status::Susceptible);
        assert_eq!(inst.status(PersonId(3)), Status::Susceptible);
    }

    #[test]
    fn spread_reads_the_pre_step_snapshot() {
        // Path 0 - 1 - 2: person 2 is two hops away and must wait a step.
        let graph = Arc::new(
            PopulationGraph::from_edges(3, &[(PersonId(0), PersonId(1)), (PersonId(1), PersonId(2))]).unwrap(),
        );
        let mut inst = instance(graph, 1.0, 10, 0);
        inst.advance();
        assert_eq!(inst.status(PersonId(1)), Status::Infected);
        assert_eq!(inst.status(PersonId(2)), Status::Susceptible);
        inst.advance();
        assert_eq!(inst.status(PersonId(2)), Status::Infected);
    }

    #[test]
    fn complete_instance_is_terminal() {
        let mut inst = instance(complete(4), 1.0, 0, 0);
        while !inst.is_complete() {
            inst.advance();
        }
        let tick = inst.tick();
        let statuses = inst.statuses().to_vec();
        inst.advance();
        assert_eq!(inst.tick(), tick);
        assert_eq!(inst.statuses(), statuses.as_slice());
    }

    #[test]
    fn single_person_recovers_on_its_own() {
        let mut inst = instance(complete(1), 0.5, 1, 0);
        assert!(inst.recovery_eligible());
        inst.advance();
        assert_eq!(inst.status(PersonId(0)), Status::Infected);
        inst.advance();
        assert_eq!(inst.status(PersonId(0)), Status::Recovered);
        assert!(inst.is_complete());
    }

    #[test]
    fn summary_reflects_state() {
        let mut inst = instance(complete(4), 1.0, 2, 0);
        inst.advance();
        let s = inst.summary();
        assert_eq!(s.steps, 1);
        assert_eq!(s.population, 4);
        assert_eq!(s.infected, 4);
        assert_eq!(s.recovered, 0);
        assert!(!s.complete);
        assert_eq!(s.related_edges.len(), 2);
    }
}

// ── Engine ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod engine {
    use rg_core::{EdgeId, PersonId, RumorId, SimRng, Tick};

    use super::helpers::*;
    use crate::{ContagionEngine, ContagionError, Status};

    #[test]
    fn spawn_assigns_sequential_ids() {
        let mut engine = ContagionEngine::new(complete(10), params(0.2, 2), SimRng::new(1)).unwrap();
        let a = engine.spawn("a", [EdgeId(0)], None, Tick(50)).unwrap();
        let b = engine.spawn("b", [EdgeId(1)], Some(PersonId(3)), Tick(100)).unwrap();
        assert_eq!(a, RumorId(0));
        assert_eq!(b, RumorId(1));
        assert_eq!(engine.len(), 2);
        assert_eq!(engine.get(b).unwrap().status(PersonId(3)), Status::Infected);
        assert_eq!(engine.get(a).unwrap().created_at(), Tick(50));
    }

    #[test]
    fn unknown_rumor_is_an_error() {
        let engine = ContagionEngine::new(complete(3), params(0.2, 2), SimRng::new(1)).unwrap();
        assert!(matches!(engine.get(RumorId(5)), Err(ContagionError::UnknownRumor(RumorId(5)))));
    }

    #[test]
    fn invalid_probability_rejected() {
        assert!(ContagionEngine::new(complete(3), params(-0.1, 2), SimRng::new(1)).is_err());
    }

    #[test]
    fn instances_evolve_independently() {
        let mut engine = ContagionEngine::new(complete(4), params(1.0, 1), SimRng::new(5)).unwrap();
        let fast = engine.spawn("fast", [EdgeId(0)], Some(PersonId(0)), Tick::ZERO).unwrap();
        engine.advance_all();
        engine.advance_all();
        let slow = engine.spawn("slow", [EdgeId(1)], Some(PersonId(1)), Tick(2)).unwrap();

        let f = engine.get(fast).unwrap();
        let s = engine.get(slow).unwrap();
        assert_eq!(f.tick(), Tick(2));
        assert_eq!(s.tick(), Tick::ZERO);
        assert_eq!(s.infected_count(), 1);
        assert!(f.statuses().iter().all(|st| *st != Status::Susceptible));
    }

    #[test]
    fn complete_instances_are_not_advanced() {
        let mut engine = ContagionEngine::new(complete(2), params(1.0, 0), SimRng::new(0)).unwrap();
        let id = engine.spawn("r", [EdgeId(0)], Some(PersonId(0)), Tick::ZERO).unwrap();
        let mut rounds = 0;
        while engine.live_count() > 0 {
            assert_eq!(engine.advance_all(), 1);
            rounds += 1;
            assert!(rounds < 10);
        }
        let steps = engine.get(id).unwrap().tick();
        assert_eq!(engine.advance_all(), 0);
        assert_eq!(engine.get(id).unwrap().tick(), steps);
        assert_eq!(engine.summaries().len(), 1);
        assert!(engine.summaries()[0].complete);
    }

    #[test]
    fn same_seed_same_history() {
        let run = || {
            let mut engine = ContagionEngine::new(complete(25), params(0.05, 4), SimRng::new(11)).unwrap();
            engine.spawn("a", [EdgeId(0)], None, Tick::ZERO).unwrap();
            engine.spawn("b", [EdgeId(1)], None, Tick::ZERO).unwrap();
            for _ in 0..30 {
                engine.advance_all();
            }
            engine.summaries()
        };
        assert_eq!(run(), run());
    }
}
