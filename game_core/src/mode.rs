//! Mode state machine
//!
//! Decides which paddles take directives from the decision process and
//! which take human input. Transitions happen only on an explicit
//! mode-select command and never touch game state.

use std::fmt;
use std::str::FromStr;

use crate::Side;

/// Who drives the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Both paddles on human input, no directive requests
    Human,
    /// Paddle 2 on directives, paddle 1 on human input
    AutonomousPlay,
    /// Both paddles on directives (paddle 2 sees the mirrored board)
    #[default]
    SelfPlayTraining,
}

impl Mode {
    pub fn is_autonomous(self) -> bool {
        !matches!(self, Mode::Human)
    }

    /// Short name used on the wire
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Human => "human",
            Mode::AutonomousPlay => "play",
            Mode::SelfPlayTraining => "train",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "human" => Ok(Mode::Human),
            "play" | "autonomousPlay" => Ok(Mode::AutonomousPlay),
            "train" | "selfPlayTraining" => Ok(Mode::SelfPlayTraining),
            _ => Err(format!(
                "Invalid mode: '{}'. Must be 'human', 'play', or 'train'",
                s
            )),
        }
    }
}

/// Source of control for one paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Controller {
    Human,
    Decision,
}

/// Result of a mode-select command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeTransition {
    pub from: Mode,
    pub to: Mode,
}

impl ModeTransition {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

#[derive(Debug, Clone, Default)]
pub struct ModeController {
    mode: Mode,
}

impl ModeController {
    pub fn new(initial: Mode) -> Self {
        Self { mode: initial }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_autonomous(&self) -> bool {
        self.mode.is_autonomous()
    }

    /// Every mode is reachable from every other mode
    pub fn select(&mut self, mode: Mode) -> ModeTransition {
        let from = self.mode;
        self.mode = mode;
        ModeTransition { from, to: mode }
    }

    pub fn controller(&self, side: Side) -> Controller {
        match (self.mode, side) {
            (Mode::Human, _) => Controller::Human,
            (Mode::AutonomousPlay, Side::Left) => Controller::Human,
            (Mode::AutonomousPlay, Side::Right) => Controller::Decision,
            (Mode::SelfPlayTraining, _) => Controller::Decision,
        }
    }

    /// Paddles that need a directive request this tick
    pub fn decision_sides(&self) -> impl Iterator<Item = Side> + '_ {
        Side::BOTH
            .into_iter()
            .filter(move |side| self.controller(*side) == Controller::Decision)
    }
}
