//! Turn loop for a single encounter.
//!
//! Each full turn is a player half-turn followed by an opponent half-turn,
//! with a terminal check after each. `Status` and rejected actions go back
//! to the [`ActionSource`] without using up the half-turn.

use super::behavior::BehaviorEngine;
use super::enemy::Opponent;
use super::events::{CombatEvent, CombatObserver, TracingObserver};
use super::loot::RewardReport;
use super::session::{
    BattleView, CombatPhase, CombatResult, CombatSession, CombatStats, LogEntry, PlayerAction,
};
use crate::character::player::Player;
use crate::core::config::BattleConfig;
use crate::error::BattleError;
use rand::Rng;
use std::collections::VecDeque;

/// Supplies the player's actions.
pub trait ActionSource {
    fn choose_action(&mut self, view: &BattleView) -> PlayerAction;
}

impl<F> ActionSource for F
where
    F: FnMut(&BattleView) -> PlayerAction,
{
    fn choose_action(&mut self, view: &BattleView) -> PlayerAction {
        self(view)
    }
}

/// Plays back a fixed list of actions, then repeats the fallback.
#[derive(Debug, Clone)]
pub struct ScriptedActions {
    queue: VecDeque<PlayerAction>,
    fallback: PlayerAction,
}

impl ScriptedActions {
    pub fn new(actions: impl IntoIterator<Item = PlayerAction>) -> Self {
        Self {
            queue: actions.into_iter().collect(),
            fallback: PlayerAction::Attack(None),
        }
    }

    pub fn with_fallback(mut self, fallback: PlayerAction) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl Default for ScriptedActions {
    fn default() -> Self {
        Self::new(Vec::<PlayerAction>::new())
    }
}

impl ActionSource for ScriptedActions {
    fn choose_action(&mut self, _view: &BattleView) -> PlayerAction {
        self.queue.pop_front().unwrap_or_else(|| self.fallback.clone())
    }
}

/// Everything a finished encounter reports back.
#[derive(Debug, Clone)]
pub struct CombatOutcome {
    pub result: CombatResult,
    /// Victory came from the opponent running away.
    pub opponent_fled: bool,
    pub turns: u32,
    pub stats: CombatStats,
    /// Present only on victory.
    pub rewards: Option<RewardReport>,
    pub log: Vec<LogEntry>,
}

impl CombatOutcome {
    pub fn is_victory(&self) -> bool {
        self.result == CombatResult::Victory
    }
}

pub struct CombatOrchestrator<'a, R, S, O> {
    session: CombatSession<'a, R>,
    engine: BehaviorEngine,
    source: S,
    observer: O,
}

impl<'a, R, S, O> CombatOrchestrator<'a, R, S, O>
where
    R: Rng,
    S: ActionSource,
    O: CombatObserver,
{
    pub fn new(session: CombatSession<'a, R>, source: S, observer: O) -> Self {
        Self {
            session,
            engine: BehaviorEngine::new(),
            source,
            observer,
        }
    }

    /// Replaces the built-in behavior engine, e.g. one with custom policies.
    pub fn with_engine(mut self, engine: BehaviorEngine) -> Self {
        self.engine = engine;
        self
    }

    fn emit(&mut self, event: CombatEvent) {
        self.session.record(&event);
        self.observer.on_event(&event);
    }

    /// Runs until a terminal result.
    pub fn run(mut self) -> CombatOutcome {
        let started = CombatEvent::CombatStarted {
            player: self.session.player().name.clone(),
            opponent: self.session.opponent().name.clone(),
            allow_flee: self.session.allow_flee(),
        };
        self.emit(started);

        while !self.session.is_over() {
            let turn_started = self.session.begin_turn();
            self.emit(turn_started);

            self.session.set_phase(CombatPhase::PlayerTurn);
            self.player_half_turn();
            if self.resolve_half_turn() {
                break;
            }

            self.session.set_phase(CombatPhase::EnemyTurn);
            let event = self.session.opponent_act(&self.engine);
            self.emit(event);
            if self.resolve_half_turn() {
                break;
            }

            for expired in self.session.end_turn() {
                self.emit(expired);
            }
        }

        self.finish()
    }

    /// Prompts until the player takes an action that uses the half-turn.
    fn player_half_turn(&mut self) {
        loop {
            let view = self.session.view();
            let action = self.source.choose_action(&view);
            match self.session.player_act(&action) {
                Ok(event @ CombatEvent::StatusRequested(_)) => self.emit(event),
                Ok(event) => {
                    self.emit(event);
                    return;
                }
                // nothing the player picks can succeed; let resolution end it
                Err(err @ BattleError::CharacterDead(_)) => {
                    self.emit(CombatEvent::ActionRejected(err));
                    return;
                }
                Err(err) => self.emit(CombatEvent::ActionRejected(err)),
            }
        }
    }

    /// Returns true once the encounter is over.
    fn resolve_half_turn(&mut self) -> bool {
        self.session.set_phase(CombatPhase::Resolution);
        if let Some(event) = self.session.resolve() {
            self.emit(event);
        }
        self.session.is_over()
    }

    fn finish(mut self) -> CombatOutcome {
        self.session.set_phase(CombatPhase::End);
        let result = self.session.result();

        let rewards = if result == CombatResult::Victory {
            let report = self.session.grant_rewards();
            self.emit(CombatEvent::RewardsGranted(report.clone()));
            Some(report)
        } else {
            None
        };

        let turns = self.session.turn();
        self.emit(CombatEvent::CombatEnded { result, turns });

        let opponent_fled = self.session.opponent_fled();
        let (stats, log) = self.session.into_parts();
        CombatOutcome {
            result,
            opponent_fled,
            turns,
            stats,
            rewards,
            log: log.into_entries(),
        }
    }
}

/// Runs a regular encounter where the player may flee.
pub fn start_combat<R: Rng, S: ActionSource>(
    player: &mut Player,
    opponent: &mut Opponent,
    config: &BattleConfig,
    rng: R,
    source: S,
) -> CombatOutcome {
    let session = CombatSession::new(player, opponent, config, rng, true);
    CombatOrchestrator::new(session, source, TracingObserver).run()
}

/// Runs an encounter with fleeing disabled.
pub fn start_boss_battle<R: Rng, S: ActionSource>(
    player: &mut Player,
    opponent: &mut Opponent,
    config: &BattleConfig,
    rng: R,
    source: S,
) -> CombatOutcome {
    let session = CombatSession::new(player, opponent, config, rng, false);
    CombatOrchestrator::new(session, source, TracingObserver).run()
}
