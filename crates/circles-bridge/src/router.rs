//! cross-chain router (C10, spec.md 4.7)
//!
//! a small directed graph over supported chains; route selection never
//! touches amounts or identities, only the aggregate delay/fee/privacy
//! figures a `Route` proof attests to via `circles_zk::circuits::bridge::route_relation`.

use std::collections::BTreeMap;

use circles_zk::circuits::bridge::RouteEdgeWitness;

use crate::error::BridgeError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteMode {
    Fastest,
    Cheapest,
    MostPrivate,
}

#[derive(Clone, Copy, Debug)]
pub struct EdgeParams {
    pub delay_seconds: u64,
    pub fee_bp: u32,
    pub privacy_bonus: u32,
}

/// max hops a route may take end to end (spec.md 4.7).
pub const MAX_HOPS: usize = 3;
/// a route is only usable for `route_payment` once it clears this score.
pub const MIN_ROUTE_PRIVACY_SCORE: u32 = 50;

#[derive(Clone, Debug, Default)]
pub struct ChainGraph {
    edges: BTreeMap<(String, String), EdgeParams>,
}

#[derive(Clone, Debug)]
pub struct Route {
    pub hops: Vec<String>,
    pub edges: Vec<EdgeParams>,
    pub total_delay_seconds: u64,
    pub total_fee_bp: u32,
    pub privacy_score: u32,
}

impl Route {
    pub fn witness_edges(&self) -> Vec<RouteEdgeWitness> {
        self.edges
            .iter()
            .map(|e| RouteEdgeWitness {
                delay_seconds: e.delay_seconds,
                fee_bp: e.fee_bp,
                privacy_bonus: e.privacy_bonus,
            })
            .collect()
    }
}

impl ChainGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// connect two chains with an undirected edge (symmetric delay/fee/bonus).
    pub fn connect(&mut self, a: &str, b: &str, params: EdgeParams) {
        self.edges.insert((a.to_string(), b.to_string()), params);
        self.edges.insert((b.to_string(), a.to_string()), params);
    }

    pub fn is_connected(&self, a: &str, b: &str) -> bool {
        self.edges.contains_key(&(a.to_string(), b.to_string()))
    }

    fn neighbors<'a>(&'a self, chain: &str) -> impl Iterator<Item = (&'a str, EdgeParams)> {
        self.edges.iter().filter_map(move |((from, to), params)| {
            if from == chain {
                Some((to.as_str(), *params))
            } else {
                None
            }
        })
    }

    /// `find_route` (spec.md 4.7): breadth-first enumeration of all paths up
    /// to `MAX_HOPS`, scored per `mode` and the best one returned.
    pub fn find_route(&self, source: &str, target: &str, mode: RouteMode) -> Result<Route, BridgeError> {
        if source == target {
            return Err(BridgeError::IdenticalEndpoints);
        }

        let mut candidates = Vec::new();
        let mut stack = vec![(vec![source.to_string()], Vec::<EdgeParams>::new())];
        while let Some((path, edges)) = stack.pop() {
            let current = path.last().unwrap().clone();
            if current == target && !edges.is_empty() {
                candidates.push((path, edges));
                continue;
            }
            if edges.len() >= MAX_HOPS {
                continue;
            }
            for (next, params) in self.neighbors(&current) {
                if path.contains(&next.to_string()) {
                    continue;
                }
                let mut next_path = path.clone();
                next_path.push(next.to_string());
                let mut next_edges = edges.clone();
                next_edges.push(params);
                stack.push((next_path, next_edges));
            }
        }

        if candidates.is_empty() {
            return Err(BridgeError::Disconnected);
        }

        let scored = candidates.into_iter().map(|(hops, edges)| {
            let total_delay_seconds: u64 = edges.iter().map(|e| e.delay_seconds).sum();
            let total_fee_bp: u32 = edges.iter().map(|e| e.fee_bp).sum();
            let privacy_score = edges.iter().map(|e| e.privacy_bonus).sum::<u32>().min(100);
            Route { hops, edges, total_delay_seconds, total_fee_bp, privacy_score }
        });

        let best = match mode {
            RouteMode::Fastest => scored.min_by_key(|r| r.total_delay_seconds),
            RouteMode::Cheapest => scored.min_by_key(|r| r.total_fee_bp),
            RouteMode::MostPrivate => scored.max_by_key(|r| r.privacy_score),
        };
        best.ok_or(BridgeError::Disconnected)
    }
}
