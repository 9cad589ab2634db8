//! Toy traffic service: vehicles depart on a fixed cadence along one of a
//! handful of precomputed trips and advance one edge every few ticks.

use std::collections::BTreeMap;

use rg_core::{EdgeId, Tick};
use rg_graph::{RoadNetwork, Router};
use rg_sim::{ServiceError, TrafficService};

const TICKS_PER_EDGE: u32 = 18;

struct Vehicle {
    route: Vec<EdgeId>,
    index: usize,
    /// Ticks spent on the current edge.
    dwell: u32,
}

pub struct LoopTraffic {
    trips:        Vec<Vec<EdgeId>>,
    depart_every: u64,
    vehicles:     BTreeMap<String, Vehicle>,
    departed:     Vec<String>,
    launched:     usize,
}

impl LoopTraffic {
    /// Precompute a shortest route for every `(from, to)` edge-name pair.
    pub fn new<R: Router>(
        network:      &RoadNetwork,
        router:       &R,
        trips:        &[(&str, &str)],
        depart_every: u64,
    ) -> Result<Self, ServiceError> {
        let mut routes = Vec::with_capacity(trips.len());
        for &(from, to) in trips {
            let (Some(a), Some(z)) = (network.edge_by_name(from), network.edge_by_name(to)) else {
                return Err(format!("trip {from} -> {to} names an unknown edge").into());
            };
            routes.push(router.route(network, a, z)?.edges);
        }
        Ok(Self {
            trips: routes,
            depart_every,
            vehicles: BTreeMap::new(),
            departed: Vec::new(),
            launched: 0,
        })
    }

    pub fn launched(&self) -> usize {
        self.launched
    }
}

impl TrafficService for LoopTraffic {
    fn advance(&mut self, now: Tick) -> Result<(), ServiceError> {
        self.vehicles.retain(|_, v| {
            v.dwell += 1;
            if v.dwell >= TICKS_PER_EDGE {
                v.dwell = 0;
                v.index += 1;
            }
            v.index < v.route.len()
        });

        if !self.trips.is_empty() && now.0.is_multiple_of(self.depart_every) {
            let name = format!("veh{}", self.launched);
            let route = self.trips[self.launched % self.trips.len()].clone();
            self.vehicles.insert(name.clone(), Vehicle { route, index: 0, dwell: 0 });
            self.departed.push(name);
            self.launched += 1;
        }
        Ok(())
    }

    fn departed(&mut self) -> Result<Vec<String>, ServiceError> {
        Ok(std::mem::take(&mut self.departed))
    }

    fn active(&self) -> Result<Vec<String>, ServiceError> {
        Ok(self.vehicles.keys().cloned().collect())
    }

    fn route_of(&self, vehicle: &str) -> Result<(Vec<EdgeId>, usize), ServiceError> {
        self.vehicles
            .get(vehicle)
            .map(|v| (v.route.clone(), v.index))
            .ok_or_else(|| format!("vehicle {vehicle} is not on the network").into())
    }

    fn set_route(&mut self, vehicle: &str, route: &[EdgeId]) -> Result<(), ServiceError> {
        let v = self
            .vehicles
            .get_mut(vehicle)
            .ok_or_else(|| format!("vehicle {vehicle} is not on the network"))?;
        v.route = route.to_vec();
        v.index = 0;
        Ok(())
    }

    fn vehicles_on(&self, edge: EdgeId) -> Result<usize, ServiceError> {
        Ok(self
            .vehicles
            .values()
            .filter(|v| v.route.get(v.index) == Some(&edge))
            .count())
    }
}
