//! Energy-constrained breadth-first search.
//!
//! Every move costs one unit of energy; stepping onto an energy cell adds its
//! bonus in the same move. A move is refused when `energy + bonus - 1` would
//! be negative, so an agent holding zero energy can still step onto a pickup.
//! Energy saturates at `u32::MAX` instead of wrapping.

use std::collections::VecDeque;

use crate::grid::{Coord, Grid};

/// How the search remembers where it has been.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SearchMode {
    /// Visited keyed by coordinate alone, marked on enqueue. Fast, but a
    /// coordinate first reached with little energy is never reconsidered,
    /// so some feasible detours through pickups are missed.
    #[default]
    Reference,
    /// Re-expands a coordinate whenever it is reached with strictly more
    /// energy than before. A pickup pays out only the first time a route
    /// enters it.
    EnergyAware,
}

/// Route from start to end inclusive, with the energy held on arrival at
/// each coordinate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    coords: Vec<Coord>,
    energy: Vec<u32>,
}

impl Path {
    pub fn coords(&self) -> &[Coord] {
        &self.coords
    }

    pub fn energy(&self) -> &[u32] {
        &self.energy
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn moves(&self) -> usize {
        self.coords.len().saturating_sub(1)
    }

    pub fn final_energy(&self) -> u32 {
        self.energy.last().copied().unwrap_or(0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(Path),
    /// The frontier ran dry before the exit; the energy budget was too small
    /// or the exit is walled off.
    NotFound,
}

impl SearchOutcome {
    pub fn path(&self) -> Option<&Path> {
        match self {
            SearchOutcome::Found(path) => Some(path),
            SearchOutcome::NotFound => None,
        }
    }
}

#[derive(Clone, Copy)]
struct Node {
    pos: Coord,
    energy: u32,
    parent: Option<usize>,
}

pub fn find_path(
    grid: &Grid,
    start: Coord,
    end: Coord,
    start_energy: u32,
    mode: SearchMode,
) -> SearchOutcome {
    if !grid.in_bounds(start) || !grid.in_bounds(end) {
        return SearchOutcome::NotFound;
    }
    match mode {
        SearchMode::Reference => reference_search(grid, start, end, start_energy),
        SearchMode::EnergyAware => energy_aware_search(grid, start, end, start_energy),
    }
}

fn reference_search(grid: &Grid, start: Coord, end: Coord, start_energy: u32) -> SearchOutcome {
    let size = grid.size();
    let mut visited = vec![vec![false; size]; size];
    let mut nodes = vec![Node {
        pos: start,
        energy: start_energy,
        parent: None,
    }];
    let mut q = VecDeque::from([0usize]);
    visited[start.row][start.col] = true;

    while let Some(idx) = q.pop_front() {
        let node = nodes[idx];
        if node.pos == end {
            return SearchOutcome::Found(rebuild(&nodes, idx));
        }
        for next in grid.neighbors(node.pos) {
            if visited[next.row][next.col] {
                continue;
            }
            let cell = grid.cell(next);
            if cell.is_obstacle() {
                continue;
            }
            let Some(energy) = node.energy.saturating_add(cell.bonus()).checked_sub(1) else {
                continue;
            };
            visited[next.row][next.col] = true;
            nodes.push(Node {
                pos: next,
                energy,
                parent: Some(idx),
            });
            q.push_back(nodes.len() - 1);
        }
    }
    SearchOutcome::NotFound
}

fn energy_aware_search(
    grid: &Grid,
    start: Coord,
    end: Coord,
    start_energy: u32,
) -> SearchOutcome {
    let size = grid.size();
    // Best arrival energy per coordinate; strictly increasing and capped at
    // u32::MAX, so the search terminates.
    let mut best: Vec<Vec<Option<u32>>> = vec![vec![None; size]; size];
    let mut nodes = vec![Node {
        pos: start,
        energy: start_energy,
        parent: None,
    }];
    let mut q = VecDeque::from([0usize]);
    best[start.row][start.col] = Some(start_energy);

    while let Some(idx) = q.pop_front() {
        let node = nodes[idx];
        if node.pos == end {
            return SearchOutcome::Found(rebuild(&nodes, idx));
        }
        for next in grid.neighbors(node.pos) {
            let cell = grid.cell(next);
            if cell.is_obstacle() {
                continue;
            }
            let bonus = if entered_on_route(&nodes, idx, next) {
                0
            } else {
                cell.bonus()
            };
            let Some(energy) = node.energy.saturating_add(bonus).checked_sub(1) else {
                continue;
            };
            if best[next.row][next.col].is_some_and(|seen| energy <= seen) {
                continue;
            }
            best[next.row][next.col] = Some(energy);
            nodes.push(Node {
                pos: next,
                energy,
                parent: Some(idx),
            });
            q.push_back(nodes.len() - 1);
        }
    }
    SearchOutcome::NotFound
}

/// Whether the route ending at `idx` has already stepped onto `target`.
fn entered_on_route(nodes: &[Node], mut idx: usize, target: Coord) -> bool {
    while let Some(parent) = nodes[idx].parent {
        if nodes[idx].pos == target {
            return true;
        }
        idx = parent;
    }
    false
}

fn rebuild(nodes: &[Node], goal: usize) -> Path {
    let mut coords = Vec::new();
    let mut energy = Vec::new();
    let mut cursor = Some(goal);
    while let Some(idx) = cursor {
        coords.push(nodes[idx].pos);
        energy.push(nodes[idx].energy);
        cursor = nodes[idx].parent;
    }
    coords.reverse();
    energy.reverse();
    Path { coords, energy }
}

/// Replays `coords` from `start_energy` and returns the energy after each
/// prefix, or `None` if the route leaves the grid, jumps, enters an
/// obstacle or runs out of energy. Pickups pay out on first entry only.
pub fn simulate(grid: &Grid, coords: &[Coord], start_energy: u32) -> Option<Vec<u32>> {
    let (&first, rest) = coords.split_first()?;
    if !grid.in_bounds(first) {
        return None;
    }
    let mut collected: Vec<Coord> = Vec::new();
    let mut energy = start_energy;
    let mut trace = vec![energy];
    let mut prev = first;
    for &pos in rest {
        if !grid.in_bounds(pos) || !prev.is_adjacent(pos) {
            return None;
        }
        let cell = grid.cell(pos);
        if cell.is_obstacle() {
            return None;
        }
        let bonus = if collected.contains(&pos) {
            0
        } else {
            collected.push(pos);
            cell.bonus()
        };
        energy = energy.saturating_add(bonus).checked_sub(1)?;
        trace.push(energy);
        prev = pos;
    }
    Some(trace)
}
