//! Message protocol between the simulation and the decision process
//!
//! Every frame is a single JSON object tagged by `type`. The simulation
//! sends [`ToDecision`], the decision process answers with [`FromDecision`].
//! Directive requests carry a [`Ticket`] that the reply echoes, so late
//! replies from an earlier mode or episode can be recognised and dropped.

use game_core::{BoardGrid, Directive, Mode, Side};
use serde::{Deserialize, Serialize};

/// Correlates a directive reply with the request that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ticket {
    /// Bumped on every mode change and every episode end
    pub epoch: u32,
    /// Monotonic request counter
    pub seq: u64,
}

// ============================================================================
// Simulation → Decision
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ToDecision {
    /// Mode select
    #[serde(rename = "mode")]
    Mode {
        #[serde(with = "mode_wire")]
        data: Mode,
    },

    /// Board for one paddle, already oriented for that paddle
    #[serde(rename = "state")]
    State {
        #[serde(with = "board_wire")]
        data: BoardGrid,
        #[serde(with = "side_wire")]
        player: Side,
        ticket: Ticket,
    },

    /// End of episode: true when player 2 won the point
    #[serde(rename = "end")]
    End { data: bool },

    /// Liveness probe
    #[serde(rename = "ping")]
    Ping,

    /// Answer to a storage get
    #[serde(rename = "getDataWorker")]
    StorageValue { data: Option<String> },
}

// ============================================================================
// Decision → Simulation
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FromDecision {
    #[serde(rename = "setDataMain")]
    SetData { key: String, value: String },

    #[serde(rename = "getDataMain")]
    GetData { key: String },

    /// 1 = up, 2 = down, omitted = hold
    #[serde(rename = "movePlayer1")]
    MovePlayer1 {
        #[serde(
            default,
            with = "directive_wire",
            skip_serializing_if = "Directive::is_hold"
        )]
        data: Directive,
        ticket: Ticket,
    },

    #[serde(rename = "movePlayer2")]
    MovePlayer2 {
        #[serde(
            default,
            with = "directive_wire",
            skip_serializing_if = "Directive::is_hold"
        )]
        data: Directive,
        ticket: Ticket,
    },

    #[serde(rename = "pong")]
    Pong,
}

impl FromDecision {
    /// Build the move reply addressed to `side`
    pub fn directive(side: Side, data: Directive, ticket: Ticket) -> Self {
        match side {
            Side::Left => FromDecision::MovePlayer1 { data, ticket },
            Side::Right => FromDecision::MovePlayer2 { data, ticket },
        }
    }

    /// Split a move reply into its parts
    pub fn as_directive(&self) -> Option<(Side, Directive, Ticket)> {
        match *self {
            FromDecision::MovePlayer1 { data, ticket } => Some((Side::Left, data, ticket)),
            FromDecision::MovePlayer2 { data, ticket } => Some((Side::Right, data, ticket)),
            _ => None,
        }
    }
}

// ============================================================================
// Serialization Helpers
// ============================================================================

/// A frame that can cross the context boundary
pub trait Frame: Serialize + for<'de> Deserialize<'de> {
    fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

impl Frame for ToDecision {}
impl Frame for FromDecision {}

mod mode_wire {
    use game_core::Mode;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(mode: &Mode, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(mode.as_str())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Mode, D::Error> {
        let name = String::deserialize(d)?;
        name.parse().map_err(de::Error::custom)
    }
}

mod side_wire {
    use game_core::Side;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(side: &Side, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u8(side.player_number())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Side, D::Error> {
        let n = u8::deserialize(d)?;
        Side::from_player_number(n)
            .ok_or_else(|| de::Error::custom(format!("unknown player {n}")))
    }
}

mod directive_wire {
    use game_core::Directive;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(directive: &Directive, s: S) -> Result<S::Ok, S::Error> {
        match directive {
            Directive::MoveUp => s.serialize_u8(1),
            Directive::MoveDown => s.serialize_u8(2),
            Directive::Hold => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Directive, D::Error> {
        match Option::<u8>::deserialize(d)? {
            Some(1) => Ok(Directive::MoveUp),
            Some(2) => Ok(Directive::MoveDown),
            None => Ok(Directive::Hold),
            Some(n) => Err(de::Error::custom(format!("unknown move {n}"))),
        }
    }
}

mod board_wire {
    use game_core::BoardGrid;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(board: &BoardGrid, s: S) -> Result<S::Ok, S::Error> {
        board.to_rows().serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<BoardGrid, D::Error> {
        let rows = Vec::<Vec<bool>>::deserialize(d)?;
        BoardGrid::from_rows(rows).map_err(de::Error::custom)
    }
}
