//! The population graph a rumor spreads over.
//!
//! One node per simulated person (in practice, one per vehicle slot).  The
//! reference configuration is a **complete** graph, which is stored
//! implicitly: no adjacency arrays are allocated, and
//! [`infected_neighbours`](PopulationGraph::infected_neighbours) is O(1).
//! Arbitrary undirected graphs are supported through
//! [`PopulationGraph::from_edges`], stored in CSR form like the road network.

use rg_core::PersonId;

use crate::{GraphError, GraphResult};

#[derive(Clone, Debug)]
enum Adjacency {
    Complete,
    Explicit {
        /// `start[p] .. start[p+1]` indexes `neighbours` for person `p`.
        start:      Vec<u32>,
        neighbours: Vec<PersonId>,
    },
}

/// Undirected population graph, immutable once built.
#[derive(Clone, Debug)]
pub struct PopulationGraph {
    size:      usize,
    adjacency: Adjacency,
}

impl PopulationGraph {
    /// Complete graph over `size` people: every pair is adjacent.
    pub fn complete(size: usize) -> GraphResult<Self> {
        if size == 0 {
            return Err(GraphError::EmptyPopulation);
        }
        Ok(Self { size, adjacency: Adjacency::Complete })
    }

    /// Explicit undirected graph over `size` people.
    ///
    /// Self-loops are dropped; duplicate pairs are kept once.
    pub fn from_edges(size: usize, pairs: &[(PersonId, PersonId)]) -> GraphResult<Self> {
        if size == 0 {
            return Err(GraphError::EmptyPopulation);
        }
        let mut directed: Vec<(PersonId, PersonId)> = Vec::with_capacity(pairs.len() * 2);
        for &(a, b) in pairs {
            for p in [a, b] {
                if p.index() >= size {
                    return Err(GraphError::PersonOutOfRange(p, size));
                }
            }
            if a != b {
                directed.push((a, b));
                directed.push((b, a));
            }
        }
        directed.sort_unstable();
        directed.dedup();

        let mut start = vec![0u32; size + 1];
        for &(a, _) in &directed {
            start[a.index() + 1] += 1;
        }
        for i in 1..=size {
            start[i] += start[i - 1];
        }
        let neighbours = directed.into_iter().map(|(_, b)| b).collect();

        Ok(Self { size, adjacency: Adjacency::Explicit { start, neighbours } })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.adjacency, Adjacency::Complete)
    }

    #[inline]
    pub fn contains(&self, person: PersonId) -> bool {
        person.index() < self.size
    }

    /// Iterator over all people in id order.
    pub fn people(&self) -> impl Iterator<Item = PersonId> + '_ {
        (0..self.size as u32).map(PersonId)
    }

    /// Neighbours of `person`, in ascending id order.
    pub fn neighbours(&self, person: PersonId) -> Box<dyn Iterator<Item = PersonId> + '_> {
        match &self.adjacency {
            Adjacency::Complete => Box::new(
                (0..self.size as u32)
                    .map(PersonId)
                    .filter(move |&p| p != person),
            ),
            Adjacency::Explicit { start, neighbours } => {
                let lo = start[person.index()] as usize;
                let hi = start[person.index() + 1] as usize;
                Box::new(neighbours[lo..hi].iter().copied())
            }
        }
    }

    pub fn degree(&self, person: PersonId) -> usize {
        match &self.adjacency {
            Adjacency::Complete => self.size - 1,
            Adjacency::Explicit { start, .. } => {
                (start[person.index() + 1] - start[person.index()]) as usize
            }
        }
    }

    /// Number of neighbours of `person` for which `is_infected` holds.
    ///
    /// `infected_total` is the number of infected people in the whole graph;
    /// for the complete graph it answers the query without iterating.
    pub fn infected_neighbours<F>(&self, person: PersonId, infected_total: usize, is_infected: F) -> usize
    where
        F: Fn(PersonId) -> bool,
    {
        match &self.adjacency {
            Adjacency::Complete => infected_total - usize::from(is_infected(person)),
            Adjacency::Explicit { .. } => self.neighbours(person).filter(|&p| is_infected(p)).count(),
        }
    }
}
