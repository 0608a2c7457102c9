use std::fmt;

use rand::Rng;
use tracing::{debug, info, warn};

use crate::agent::Agent;
use crate::error::Result;
use crate::generator::{generate, MazeConfig};
use crate::grid::{Coord, Grid};
use crate::pathfinder::{find_path, Path, SearchMode, SearchOutcome};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Idle,
    Searching,
    Arrived,
    EnergyExhausted,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Status::Idle => "press s to start",
            Status::Searching => "search in progress",
            Status::Arrived => "arrived at exit",
            Status::EnergyExhausted => "no feasible path: energy exhausted",
        };
        f.write_str(text)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartOutcome {
    /// A run was already in flight; nothing changed.
    Ignored,
    Playing { moves: usize },
    NoPath,
}

#[derive(Debug)]
struct Playback {
    path: Path,
    next: usize,
}

/// One game: the current maze, the agent walking it and the single run that
/// may be in flight.
pub struct Session<R> {
    config: MazeConfig,
    mode: SearchMode,
    start_energy: u32,
    rng: R,
    grid: Grid,
    agent: Agent,
    status: Status,
    playback: Option<Playback>,
    runs: u32,
}

impl<R: Rng> Session<R> {
    pub fn new(config: MazeConfig, start_energy: u32, mode: SearchMode, rng: R) -> Result<Self> {
        config.validate()?;
        let grid = Grid::new(config.size)?;
        let agent = Agent::new(grid.start(), start_energy);
        Ok(Self {
            config,
            mode,
            start_energy,
            rng,
            grid,
            agent,
            status: Status::Idle,
            playback: None,
            runs: 0,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn runs(&self) -> u32 {
        self.runs
    }

    pub fn is_running(&self) -> bool {
        self.playback.is_some()
    }

    /// Full path of the run in flight.
    pub fn path(&self) -> Option<&Path> {
        self.playback.as_ref().map(|p| &p.path)
    }

    /// Coordinates the agent has yet to visit.
    pub fn remaining(&self) -> &[Coord] {
        match &self.playback {
            Some(p) => &p.path.coords()[p.next.min(p.path.len())..],
            None => &[],
        }
    }

    /// Generates a fresh maze, resets the agent and searches for the exit.
    /// A no-op while a previous run is still playing back.
    pub fn start(&mut self) -> Result<StartOutcome> {
        if self.is_running() {
            debug!(run = self.runs, "start ignored, run in flight");
            return Ok(StartOutcome::Ignored);
        }
        let grid = generate(&mut self.rng, &self.config)?;
        Ok(self.begin(grid))
    }

    /// Resets the agent onto `grid` and searches it.
    pub(crate) fn begin(&mut self, grid: Grid) -> StartOutcome {
        self.grid = grid;
        self.playback = None;
        self.agent = Agent::new(self.grid.start(), self.start_energy);
        self.status = Status::Searching;
        self.runs += 1;

        let outcome = find_path(
            &self.grid,
            self.grid.start(),
            self.grid.end(),
            self.start_energy,
            self.mode,
        );
        match outcome {
            SearchOutcome::Found(path) => {
                let moves = path.moves();
                info!(
                    run = self.runs,
                    moves,
                    final_energy = path.final_energy(),
                    "path found"
                );
                self.playback = Some(Playback { path, next: 1 });
                StartOutcome::Playing { moves }
            }
            SearchOutcome::NotFound => {
                info!(run = self.runs, energy = self.start_energy, "no feasible path");
                self.status = Status::EnergyExhausted;
                StartOutcome::NoPath
            }
        }
    }

    /// Moves the agent one step along the path, collecting any pickup.
    /// Returns the new position, or `None` when nothing is playing.
    pub fn advance(&mut self) -> Option<Coord> {
        let playback = self.playback.as_mut()?;
        let to = *playback.path.coords().get(playback.next)?;
        playback.next += 1;
        let done = playback.next >= playback.path.len();

        let bonus = self.grid.cell(to).bonus();
        if !self.agent.step(to, bonus) {
            warn!(
                row = to.row,
                col = to.col,
                energy = self.agent.energy,
                "agent ran dry mid-path"
            );
            self.playback = None;
            self.status = Status::EnergyExhausted;
            return None;
        }
        if bonus > 0 {
            self.grid.clear(to);
        }
        if done {
            info!(run = self.runs, energy = self.agent.energy, "arrived at exit");
            self.playback = None;
            self.status = Status::Arrived;
        }
        Some(to)
    }

    /// Plays the remaining path to the end at once; returns the steps taken.
    pub fn play_out(&mut self) -> usize {
        let mut steps = 0;
        while self.advance().is_some() {
            steps += 1;
        }
        steps
    }

    pub fn cancel(&mut self) {
        if self.playback.take().is_some() {
            info!(run = self.runs, "playback cancelled");
            self.status = Status::Idle;
        }
    }
}
