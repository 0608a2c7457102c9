use crate::grid::Coord;

pub const DEFAULT_START_ENERGY: u32 = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Agent {
    pub position: Coord,
    pub energy: u32,
}

impl Agent {
    pub fn new(position: Coord, energy: u32) -> Self {
        Self { position, energy }
    }

    /// Moves onto `to`, paying one unit and collecting `bonus` in the same
    /// step. Refuses the move and leaves the agent untouched when the
    /// result would be negative.
    pub fn step(&mut self, to: Coord, bonus: u32) -> bool {
        match self.energy.saturating_add(bonus).checked_sub(1) {
            Some(energy) => {
                self.position = to;
                self.energy = energy;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_pays_then_collects() {
        let mut agent = Agent::new(Coord::new(0, 0), 2);
        assert!(agent.step(Coord::new(0, 1), 0));
        assert_eq!(agent.energy, 1);
        assert!(agent.step(Coord::new(0, 2), 5));
        assert_eq!(agent, Agent::new(Coord::new(0, 2), 5));
    }

    #[test]
    fn full_tank_saturates() {
        let mut agent = Agent::new(Coord::new(0, 0), u32::MAX);
        assert!(agent.step(Coord::new(0, 1), 5));
        assert_eq!(agent.energy, u32::MAX - 1);
        assert!(agent.step(Coord::new(0, 2), u32::MAX));
        assert_eq!(agent.energy, u32::MAX - 1);
    }

    #[test]
    fn empty_agent_only_moves_onto_pickups() {
        let mut agent = Agent::new(Coord::new(1, 1), 0);
        assert!(!agent.step(Coord::new(1, 2), 0));
        assert_eq!(agent.position, Coord::new(1, 1));
        assert!(agent.step(Coord::new(1, 2), 1));
        assert_eq!(agent.energy, 0);
    }
}
