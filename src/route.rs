//! Route ordering: nearest-neighbor construction plus 2-opt local search,
//! constrained by time-of-day precedence.
//!
//! Nodes are partitioned into three ordered groups (early morning, normal,
//! night). Construction visits group 0 exhaustively before group 1, and
//! group 1 before group 2; 2-opt only accepts reversals that keep that
//! order intact. The search is deterministic: nearest-neighbor ties break
//! on the first-encountered index and 2-opt takes the first strictly
//! improving move in scan order.

use crate::types::{Location, TimeSlot};

/// Cost substituted for unknown matrix cells. Large enough that the
/// search avoids such legs, finite so it still produces a complete route.
pub const UNKNOWN_COST_PENALTY: f64 = 100_000.0;

/// A reversal must beat the incumbent by at least this much.
const MIN_IMPROVEMENT: f64 = 1e-3;

/// Above this node count the 2-opt iteration cap shrinks to bound the
/// quadratic per-pass work.
const LARGE_ROUTE_THRESHOLD: usize = 15;
const MAX_PASSES_SMALL: usize = 1000;
const MAX_PASSES_LARGE: usize = 300;

/// One stop to order. The cost matrix carries all geometry; the node only
/// contributes its time-of-day constraint.
#[derive(Debug, Clone, Copy)]
pub struct RouteNode {
    pub slot: TimeSlot,
}

impl RouteNode {
    pub fn new(slot: TimeSlot) -> Self {
        Self { slot }
    }
}

impl From<&Location> for RouteNode {
    fn from(loc: &Location) -> Self {
        Self {
            slot: loc.time_slot,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RouteResult {
    /// Permutation of node indices.
    pub route: Vec<usize>,
    /// Sum of matrix costs along the route.
    pub total_cost: f64,
}

/// Order `nodes` by estimated travel cost subject to the slot-group
/// precedence. `costs[i][j]` is the travel cost from node i to node j,
/// `None` meaning unknown. A `fixed_start` node is always placed first
/// regardless of its group (used for a mandatory departure point).
/// `max_iterations` overrides the 2-opt pass cap; `Some(0)` yields the
/// plain nearest-neighbor route.
pub fn optimize_route(
    nodes: &[RouteNode],
    costs: &[Vec<Option<f64>>],
    fixed_start: Option<usize>,
    max_iterations: Option<usize>,
) -> RouteResult {
    let n = nodes.len();
    if n == 0 {
        return RouteResult {
            route: Vec::new(),
            total_cost: 0.0,
        };
    }
    if n == 1 {
        return RouteResult {
            route: vec![0],
            total_cost: 0.0,
        };
    }

    let cost = |from: usize, to: usize| -> f64 {
        if from == to {
            return 0.0;
        }
        costs
            .get(from)
            .and_then(|row| row.get(to))
            .copied()
            .flatten()
            .unwrap_or(UNKNOWN_COST_PENALTY)
    };

    let fixed_start = fixed_start.filter(|&idx| idx < n);
    let mut route = nearest_neighbor(nodes, &cost, fixed_start);

    let cap = max_iterations.unwrap_or(if n > LARGE_ROUTE_THRESHOLD {
        MAX_PASSES_LARGE
    } else {
        MAX_PASSES_SMALL
    });
    let total_cost = two_opt(&mut route, nodes, &cost, fixed_start.is_some(), cap);

    RouteResult { route, total_cost }
}

/// Greedy construction: within each slot group in order, repeatedly visit
/// the nearest unvisited node. The route's first node is the fixed start
/// if given, else the first node of the first non-empty group.
fn nearest_neighbor(
    nodes: &[RouteNode],
    cost: &impl Fn(usize, usize) -> f64,
    fixed_start: Option<usize>,
) -> Vec<usize> {
    let n = nodes.len();
    let mut route = Vec::with_capacity(n);
    let mut visited = vec![false; n];

    if let Some(start) = fixed_start {
        visited[start] = true;
        route.push(start);
    }

    for group in 0..=2u8 {
        let mut remaining: Vec<usize> = (0..n)
            .filter(|&i| !visited[i] && nodes[i].slot.group() == group)
            .collect();

        while !remaining.is_empty() {
            let pick = match route.last() {
                None => 0,
                Some(&current) => {
                    let mut best = 0;
                    let mut best_cost = f64::INFINITY;
                    for (pos, &candidate) in remaining.iter().enumerate() {
                        let c = cost(current, candidate);
                        if c < best_cost {
                            best_cost = c;
                            best = pos;
                        }
                    }
                    best
                }
            };
            let idx = remaining.remove(pick);
            visited[idx] = true;
            route.push(idx);
        }
    }

    route
}

/// First-improvement 2-opt with the slot-order guard. Returns the final
/// route cost.
fn two_opt(
    route: &mut [usize],
    nodes: &[RouteNode],
    cost: &impl Fn(usize, usize) -> f64,
    has_fixed_start: bool,
    max_passes: usize,
) -> f64 {
    let mut best_cost = route_cost(route, cost);
    let mut improved = true;
    let mut passes = 0;

    while improved && passes < max_passes {
        improved = false;
        passes += 1;

        for i in 0..route.len().saturating_sub(1) {
            for j in (i + 2)..route.len() {
                route[i + 1..=j].reverse();
                if slot_order_ok(route, nodes, has_fixed_start) {
                    let candidate = route_cost(route, cost);
                    if candidate < best_cost - MIN_IMPROVEMENT {
                        best_cost = candidate;
                        improved = true;
                        continue;
                    }
                }
                // Not an improvement (or order broken): undo the reversal.
                route[i + 1..=j].reverse();
            }
        }
    }

    best_cost
}

/// Slot groups along the route must never decrease. The fixed start node
/// sits outside the constraint.
fn slot_order_ok(route: &[usize], nodes: &[RouteNode], skip_first: bool) -> bool {
    let mut max_group = 0;
    for &idx in route.iter().skip(skip_first as usize) {
        let group = nodes[idx].slot.group();
        if group < max_group {
            return false;
        }
        max_group = group;
    }
    true
}

fn route_cost(route: &[usize], cost: &impl Fn(usize, usize) -> f64) -> f64 {
    route.windows(2).map(|leg| cost(leg[0], leg[1])).sum()
}
