//! Combat events and the observer port that receives them.
//!
//! The orchestrator never logs directly. It hands every event to the
//! [`CombatObserver`] it was built with; [`TracingObserver`] forwards them to
//! `tracing`, [`EventRecorder`] keeps them for inspection.

use super::enemy::AbilityEffect;
use super::loot::RewardReport;
use super::math::DamageOutcome;
use super::session::{BattleView, CombatResult};
use crate::character::player::ItemUseOutcome;
use crate::error::BattleError;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum CombatEvent {
    CombatStarted {
        player: String,
        opponent: String,
        allow_flee: bool,
    },
    TurnStarted {
        turn: u32,
    },
    StatusRequested(BattleView),
    ActionRejected(BattleError),
    PlayerAttack {
        weapon: Option<String>,
        damage: u32,
        was_crit: bool,
        /// Damage that got through the opponent's defense.
        dealt: u32,
    },
    PlayerItemUsed {
        item: String,
        outcome: ItemUseOutcome,
    },
    PlayerDefended,
    PlayerFleeFailed {
        chance: f64,
    },
    PlayerFled,
    EnemyAttack {
        outcome: DamageOutcome,
    },
    EnemyAbility {
        ability: String,
        effect: Option<AbilityEffect>,
        /// `None` for abilities that do not target the player.
        outcome: Option<DamageOutcome>,
    },
    EnemyDefended,
    EnemyFleeFailed,
    EnemyFled,
    StatusExpired {
        effect: String,
    },
    PlayerDied,
    EnemyDied {
        xp_gained: u64,
    },
    RewardsGranted(RewardReport),
    CombatEnded {
        result: CombatResult,
        turns: u32,
    },
}

impl fmt::Display for CombatEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CombatEvent::CombatStarted {
                player, opponent, ..
            } => write!(f, "Combat started: {player} vs {opponent}"),
            CombatEvent::TurnStarted { turn } => write!(f, "Turn {turn}"),
            CombatEvent::StatusRequested(view) => write!(
                f,
                "Status: {}/{} HP vs {} {}/{} HP",
                view.player_health,
                view.player_max_health,
                view.opponent_name,
                view.opponent_health,
                view.opponent_max_health
            ),
            CombatEvent::ActionRejected(err) => write!(f, "Action rejected: {err}"),
            CombatEvent::PlayerAttack {
                weapon,
                was_crit,
                dealt,
                ..
            } => {
                let with = weapon.as_deref().unwrap_or("bare hands");
                let crit = if *was_crit { " (critical)" } else { "" };
                write!(f, "Attacked with {with} for {dealt}{crit}")
            }
            CombatEvent::PlayerItemUsed { item, outcome } => match outcome {
                ItemUseOutcome::NoEffect => write!(f, "{item} had no effect"),
                _ => write!(f, "Used {item}"),
            },
            CombatEvent::PlayerDefended => f.write_str("Player is defending"),
            CombatEvent::PlayerFleeFailed { .. } => f.write_str("Failed to flee"),
            CombatEvent::PlayerFled => f.write_str("Player fled"),
            CombatEvent::EnemyAttack { outcome } => match outcome {
                DamageOutcome::Dodged => f.write_str("Enemy attack dodged"),
                DamageOutcome::Hit(n) => write!(f, "Enemy hit for {n}"),
            },
            CombatEvent::EnemyAbility { ability, effect, .. } => match effect {
                Some(AbilityEffect::Stun) => write!(f, "Enemy used {ability} (stun)"),
                Some(AbilityEffect::SelfBuff) => write!(f, "Enemy used {ability} and grew stronger"),
                None => write!(f, "Enemy used {ability}"),
            },
            CombatEvent::EnemyDefended => f.write_str("Enemy is defending"),
            CombatEvent::EnemyFleeFailed => f.write_str("Enemy tried to flee"),
            CombatEvent::EnemyFled => f.write_str("Enemy fled"),
            CombatEvent::StatusExpired { effect } => write!(f, "{effect} wore off"),
            CombatEvent::PlayerDied => f.write_str("Player was defeated"),
            CombatEvent::EnemyDied { xp_gained } => write!(f, "Enemy defeated (+{xp_gained} XP)"),
            CombatEvent::RewardsGranted(report) => {
                write!(f, "Rewards: {} XP, {} gold", report.xp, report.gold)
            }
            CombatEvent::CombatEnded { result, turns } => {
                write!(f, "Combat ended: {result:?} after {turns} turns")
            }
        }
    }
}

pub trait CombatObserver {
    fn on_event(&mut self, event: &CombatEvent);
}

impl<O: CombatObserver + ?Sized> CombatObserver for &mut O {
    fn on_event(&mut self, event: &CombatEvent) {
        (**self).on_event(event);
    }
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl CombatObserver for TracingObserver {
    fn on_event(&mut self, event: &CombatEvent) {
        match event {
            CombatEvent::CombatStarted { .. }
            | CombatEvent::CombatEnded { .. }
            | CombatEvent::RewardsGranted(_)
            | CombatEvent::PlayerDied
            | CombatEvent::EnemyDied { .. }
            | CombatEvent::EnemyFled
            | CombatEvent::PlayerFled => tracing::info!(target: "duel::combat", "{event}"),
            CombatEvent::ActionRejected(err) => {
                tracing::warn!(target: "duel::combat", severity = err.severity().as_str(), "{event}")
            }
            _ => tracing::debug!(target: "duel::combat", "{event}"),
        }
    }
}

/// Keeps every event it sees.
#[derive(Debug, Default, Clone)]
pub struct EventRecorder {
    pub events: Vec<CombatEvent>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&CombatEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl CombatObserver for EventRecorder {
    fn on_event(&mut self, event: &CombatEvent) {
        self.events.push(event.clone());
    }
}
