//! Simulation context: owns the game and drives it on a fixed cadence

use std::thread;
use std::time::{Duration, Instant};

use decision_worker::{ChannelError, DecisionLink};
use game_core::{
    BoardEncoder, Config, ConfigError, Controller, Directive, EpisodeOutcome, GameState,
    InputQueue, Mode, ModeController, ModeTransition, PhysicsEngine, Score, Side,
};
use proto::{FromDecision, Ticket, ToDecision};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::{Storage, StoreProxy};

#[derive(Debug, Error)]
pub enum LoopError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0} mode needs the decision context, which is unavailable")]
    DecisionUnavailable(Mode),
}

/// Invoked at the end of every tick
pub trait Renderer {
    fn render(&mut self, state: &GameState, mode: Mode);
}

/// What one tick did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    /// Side that won a point this tick
    pub scorer: Option<Side>,
    /// Board states sent to the decision context
    pub requests: usize,
    /// Directives (human and decision) applied to paddles
    pub applied: usize,
    /// Decision replies dropped as stale
    pub discarded: usize,
}

/// Ping bookkeeping, in ticks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Liveness {
    awaiting_since: Option<u64>,
    last_round_trip: Option<u64>,
}

impl Liveness {
    pub fn awaiting(&self) -> bool {
        self.awaiting_since.is_some()
    }

    pub fn last_round_trip(&self) -> Option<u64> {
        self.last_round_trip
    }

    fn sent(&mut self, tick: u64) {
        self.awaiting_since.get_or_insert(tick);
    }

    fn answered(&mut self, tick: u64) {
        match self.awaiting_since.take() {
            Some(sent) => self.last_round_trip = Some(tick - sent),
            None => debug!("pong without a ping"),
        }
    }
}

/// The game loop
///
/// Each tick:
/// 1. drain replies from the decision context (storage requests are served
///    immediately, directives are checked against their ticket and buffered)
/// 2. advance physics one fixed step
/// 3. on a point: notify the decision context, start a new epoch
/// 4. send the board to the decision context for every decision paddle
/// 5. apply queued human input and buffered directives
/// 6. render
pub struct GameLoop<L, S> {
    engine: PhysicsEngine,
    encoder: BoardEncoder,
    modes: ModeController,
    link: Option<L>,
    store: StoreProxy<S>,
    inputs: InputQueue,
    /// At most one buffered directive per paddle, latest wins
    pending: [Option<Directive>; 2],
    last_seq: [Option<u64>; 2],
    epoch: u32,
    seq: u64,
    tick: u64,
    liveness: Liveness,
    renderer: Option<Box<dyn Renderer>>,
}

impl<L: DecisionLink, S: Storage> GameLoop<L, S> {
    /// Autonomous initial modes need a link
    pub fn new(config: Config, link: Option<L>, storage: S) -> Result<Self, LoopError> {
        let initial = config.initial_mode;
        if initial.is_autonomous() && link.is_none() {
            return Err(LoopError::DecisionUnavailable(initial));
        }
        let encoder = BoardEncoder::new(&config)?;
        let engine = PhysicsEngine::new(config)?;

        let mut game = Self {
            engine,
            encoder,
            modes: ModeController::new(initial),
            link,
            store: StoreProxy::new(storage),
            inputs: InputQueue::new(),
            pending: [None; 2],
            last_seq: [None; 2],
            epoch: 0,
            seq: 0,
            tick: 0,
            liveness: Liveness::default(),
            renderer: None,
        };
        game.send(&ToDecision::Mode { data: initial });
        info!(mode = %initial, board = game.encoder.board_size(), "game loop ready");
        Ok(game)
    }

    pub fn set_renderer(&mut self, renderer: Box<dyn Renderer>) {
        self.renderer = Some(renderer);
    }

    pub fn tick(&mut self) -> TickReport {
        self.tick += 1;
        let mut report = TickReport {
            tick: self.tick,
            ..TickReport::default()
        };

        report.discarded = self.pump();

        let dt = self.engine.config().tick_dt;
        let scorer = self.engine.advance(dt).scorer();
        if let Some(winner) = scorer {
            self.end_episode(winner);
            report.scorer = Some(winner);
        }

        report.requests = self.dispatch();
        report.applied = self.apply();

        if let Some(renderer) = self.renderer.as_mut() {
            renderer.render(&self.engine.snapshot(), self.modes.mode());
        }
        report
    }

    /// Tick `ticks` times at the configured wall-clock cadence
    pub fn run(&mut self, ticks: u64) -> Score {
        let interval = Duration::from_secs_f32(self.engine.config().tick_dt);
        let mut next = Instant::now();
        for _ in 0..ticks {
            let before = self.engine.score();
            self.tick();
            let after = self.engine.score();
            if after != before {
                info!(left = after.left, right = after.right, "score");
            }

            next += interval;
            let now = Instant::now();
            if next > now {
                thread::sleep(next - now);
            } else {
                // running behind: don't try to catch up with a burst
                next = now;
            }
        }
        self.engine.score()
    }

    /// Switch mode. Takes effect on the next tick; game state is untouched.
    pub fn set_mode(&mut self, mode: Mode) -> Result<ModeTransition, LoopError> {
        if mode.is_autonomous() && self.link.is_none() {
            return Err(LoopError::DecisionUnavailable(mode));
        }
        let transition = self.modes.select(mode);
        if transition.changed() {
            info!(from = %transition.from, to = %transition.to, "mode changed");
            self.next_epoch();
            self.send(&ToDecision::Mode { data: mode });
        }
        Ok(transition)
    }

    /// Queue a human command for the next apply stage
    pub fn human_input(&mut self, side: Side, directive: Directive) {
        self.inputs.push_input(side, directive);
    }

    /// Liveness probe; the answer is picked up by a later tick
    pub fn ping(&mut self) {
        if self.send(&ToDecision::Ping) {
            self.liveness.sent(self.tick);
        }
    }

    pub fn engine(&self) -> &PhysicsEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut PhysicsEngine {
        &mut self.engine
    }

    pub fn mode(&self) -> Mode {
        self.modes.mode()
    }

    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn liveness(&self) -> Liveness {
        self.liveness
    }

    pub fn pending(&self, side: Side) -> Option<Directive> {
        self.pending[side.index()]
    }

    pub fn decision_available(&self) -> bool {
        self.link.is_some()
    }

    pub fn link_mut(&mut self) -> Option<&mut L> {
        self.link.as_mut()
    }

    /// Detach the decision link, e.g. to shut its worker down
    pub fn take_link(&mut self) -> Option<L> {
        self.pending = [None; 2];
        self.link.take()
    }

    pub fn storage(&self) -> &S {
        self.store.storage()
    }

    fn pump(&mut self) -> usize {
        let mut discarded = 0;
        while let Some(link) = self.link.as_mut() {
            match link.try_recv() {
                Ok(Some(msg)) => {
                    if !self.receive(msg) {
                        discarded += 1;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    self.lose_decision(e);
                    break;
                }
            }
        }
        discarded
    }

    /// Returns false when a directive was discarded
    fn receive(&mut self, msg: FromDecision) -> bool {
        match msg {
            FromDecision::MovePlayer1 { data, ticket } => {
                return self.accept(Side::Left, data, ticket);
            }
            FromDecision::MovePlayer2 { data, ticket } => {
                return self.accept(Side::Right, data, ticket);
            }
            FromDecision::SetData { key, value } => self.store.set(&key, &value),
            FromDecision::GetData { key } => {
                let data = self.store.get(&key);
                self.send(&ToDecision::StorageValue { data });
            }
            FromDecision::Pong => self.liveness.answered(self.tick),
        }
        true
    }

    fn accept(&mut self, side: Side, directive: Directive, ticket: Ticket) -> bool {
        let i = side.index();
        let newer = self.last_seq[i].map_or(true, |last| ticket.seq > last);
        let controlled = self.modes.controller(side) == Controller::Decision;
        if ticket.epoch != self.epoch || !newer || !controlled {
            debug!(
                player = side.player_number(),
                epoch = ticket.epoch,
                seq = ticket.seq,
                current_epoch = self.epoch,
                "discarding stale directive"
            );
            return false;
        }
        self.last_seq[i] = Some(ticket.seq);
        self.pending[i] = Some(directive);
        true
    }

    fn end_episode(&mut self, winner: Side) {
        let outcome = EpisodeOutcome::new(winner);
        let score = self.engine.score();
        info!(
            winner = winner.player_number(),
            left = score.left,
            right = score.right,
            "point"
        );
        if self.modes.is_autonomous() {
            self.send(&ToDecision::End {
                data: outcome.right_won(),
            });
        }
        self.next_epoch();
    }

    fn dispatch(&mut self) -> usize {
        if self.link.is_none() {
            return 0;
        }
        let sides: Vec<Side> = self.modes.decision_sides().collect();
        if sides.is_empty() {
            return 0;
        }

        let state = self.engine.snapshot();
        let mut sent = 0;
        for side in sides {
            let ticket = Ticket {
                epoch: self.epoch,
                seq: self.seq,
            };
            self.seq += 1;
            let msg = ToDecision::State {
                data: self.encoder.encode_for(&state, side),
                player: side,
                ticket,
            };
            if !self.send(&msg) {
                break;
            }
            sent += 1;
        }
        sent
    }

    fn apply(&mut self) -> usize {
        let mut applied = 0;
        for (side, directive) in self.inputs.pop_inputs() {
            if self.modes.controller(side) == Controller::Human {
                self.engine.apply_directive(side, directive);
                applied += 1;
            } else {
                debug!(
                    player = side.player_number(),
                    "ignoring input for decision-controlled paddle"
                );
            }
        }
        for side in Side::BOTH {
            if let Some(directive) = self.pending[side.index()].take() {
                self.engine.apply_directive(side, directive);
                applied += 1;
            }
        }
        applied
    }

    fn next_epoch(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        self.pending = [None; 2];
    }

    /// Returns false when nothing was sent
    fn send(&mut self, msg: &ToDecision) -> bool {
        let Some(link) = self.link.as_mut() else {
            return false;
        };
        match link.send(msg) {
            Ok(()) => true,
            Err(ChannelError::Disconnected) => {
                self.lose_decision(ChannelError::Disconnected);
                false
            }
            Err(e) => {
                warn!(error = %e, "could not send to decision context");
                false
            }
        }
    }

    fn lose_decision(&mut self, e: ChannelError) {
        error!(
            error = %e,
            mode = %self.modes.mode(),
            "decision context lost, decision paddles will hold"
        );
        self.link = None;
        self.pending = [None; 2];
        self.liveness = Liveness::default();
    }
}
