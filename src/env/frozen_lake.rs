use ndarray::{Array1, Array3};

use super::Mdp;
use crate::error::{PlanningError, Result};
use crate::mdp::{Policy, RewardVector, TransitionModel};
use crate::utils::{from_1d_to_2d, from_2d_to_1d, inc};

/// Grid of `S`tart, `F`rozen, `H`ole and `G`oal cells.
///
/// Holes and goals are absorbing. Arriving on a goal cell pays 1, everything
/// else pays 0. On a slippery lake the intended move and both perpendicular
/// moves each happen with probability 1/3.
#[derive(Debug, Clone)]
pub struct FrozenLake {
    cells: Vec<u8>,
    nrow: usize,
    ncol: usize,
    is_slippery: bool,
}

impl FrozenLake {
    pub const MAP_4X4: [&'static str; 4] = ["SFFF", "FHFH", "FFFH", "HFFG"];

    pub const MAP_8X8: [&'static str; 8] = [
        "SFFFFFFF", "FFFFFFFF", "FFFHFFFF", "FFFFFHFF", "FFFHFFFF", "FHHFFFHF", "FHFFHFHF",
        "FFFHFFFG",
    ];

    pub const ACTIONS: [&'static str; 4] = ["LEFT", "DOWN", "RIGHT", "UP"];
    const ARROWS: [char; 4] = ['<', 'v', '>', '^'];

    pub fn new(map: &[&str], is_slippery: bool) -> Result<Self> {
        let nrow: usize = map.len();
        let ncol: usize = map.first().map_or(0, |row| row.len());
        if nrow == 0 || ncol == 0 {
            return Err(PlanningError::ShapeMismatch {
                what: "map",
                expected: "at least one row and one column".to_string(),
                found: format!("{nrow} rows, {ncol} columns"),
            });
        }
        if let Some((i, row)) = map.iter().enumerate().find(|(_, row)| row.len() != ncol) {
            return Err(PlanningError::ShapeMismatch {
                what: "map",
                expected: format!("{ncol} columns in every row"),
                found: format!("{} columns in row {i}", row.len()),
            });
        }
        let cells: Vec<u8> = map.iter().flat_map(|row| row.bytes()).collect();
        if let Some(c) = cells.iter().find(|c| !b"SFHG".contains(*c)) {
            return Err(PlanningError::InvalidMap(format!(
                "unknown cell '{}'",
                char::from(*c)
            )));
        }

        Ok(Self {
            cells,
            nrow,
            ncol,
            is_slippery,
        })
    }

    pub fn start_state(&self) -> Option<usize> {
        self.cells.iter().position(|&c| c == b'S')
    }

    pub fn is_terminal(&self, state: usize) -> bool {
        matches!(self.cells[state], b'G' | b'H')
    }

    /// Draws the policy as arrows, keeping holes and goals as they are.
    pub fn render_policy(&self, policy: &Policy) -> String {
        let mut out = String::with_capacity(self.nrow * (self.ncol + 1));
        for (state, &cell) in self.cells.iter().enumerate() {
            if self.is_terminal(state) {
                out.push(char::from(cell));
            } else {
                let arrow = policy
                    .get(state)
                    .and_then(|&action| Self::ARROWS.get(action))
                    .copied()
                    .unwrap_or('?');
                out.push(arrow);
            }
            let (_, col) = from_1d_to_2d(self.ncol, state);
            if col == self.ncol - 1 {
                out.push('\n');
            }
        }
        out
    }
}

impl Mdp for FrozenLake {
    fn n_states(&self) -> usize {
        self.nrow * self.ncol
    }

    fn n_actions(&self) -> usize {
        Self::ACTIONS.len()
    }

    fn transition_model(&self) -> TransitionModel {
        let n_states = self.n_states();
        let mut transitions = Array3::zeros((n_states, self.n_actions(), n_states));
        for row in 0..self.nrow {
            for col in 0..self.ncol {
                let s = from_2d_to_1d(self.ncol, row, col);
                for a in 0..self.n_actions() {
                    if self.is_terminal(s) {
                        transitions[[s, a, s]] = 1.0;
                    } else if self.is_slippery {
                        for b in [(a + 3) % 4, a, (a + 1) % 4] {
                            let (newrow, newcol) = inc(self.nrow, self.ncol, row, col, b);
                            transitions[[s, a, from_2d_to_1d(self.ncol, newrow, newcol)]] +=
                                1.0 / 3.0;
                        }
                    } else {
                        let (newrow, newcol) = inc(self.nrow, self.ncol, row, col, a);
                        transitions[[s, a, from_2d_to_1d(self.ncol, newrow, newcol)]] = 1.0;
                    }
                }
            }
        }
        transitions
    }

    fn reward_function(&self) -> RewardVector {
        self.cells
            .iter()
            .map(|&c| if c == b'G' { 1.0 } else { 0.0 })
            .collect::<Array1<f64>>()
    }
}
