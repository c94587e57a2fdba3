//! State of one encounter and the rules for each half-turn.
//!
//! A [`CombatSession`] borrows exactly one player and one opponent for the
//! length of a fight and owns the RNG that drives it. It knows how to
//! resolve a single action; the turn loop lives in the orchestrator.

use super::behavior::{BehaviorEngine, EnemyAction};
use super::combatant::Combatant;
use super::enemy::{AbilityEffect, Opponent, Rank};
use super::events::CombatEvent;
use super::loot::{apply_rewards, RewardReport};
use super::math::{self, DamageOutcome};
use crate::character::player::{ItemUseOutcome, Player};
use crate::core::config::BattleConfig;
use crate::error::{BattleError, Result};
use crate::items::ItemKind;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatPhase {
    Start,
    PlayerTurn,
    EnemyTurn,
    /// Terminal conditions are being checked after a half-turn.
    Resolution,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatResult {
    Victory,
    Defeat,
    Fled,
    Ongoing,
}

impl CombatResult {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, CombatResult::Ongoing)
    }
}

/// One action the player can take on their half-turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerAction {
    /// Attack with a named weapon, or the equipped one when `None`.
    Attack(Option<String>),
    UseItem(String),
    Defend,
    Flee,
    /// Look at the battle state. Does not use up the half-turn.
    Status,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatStats {
    pub damage_dealt: u64,
    pub damage_taken: u64,
    pub critical_hits: u32,
    pub dodges: u32,
    pub items_used: u32,
    /// Abilities used by the opponent.
    pub abilities_used: u32,
    pub turns_elapsed: u32,
}

impl CombatStats {
    pub fn add_damage_dealt(&mut self, amount: u32, is_crit: bool) {
        self.damage_dealt += amount as u64;
        if is_crit {
            self.critical_hits += 1;
        }
    }

    pub fn add_damage_taken(&mut self, outcome: DamageOutcome) {
        match outcome {
            DamageOutcome::Dodged => self.dodges += 1,
            DamageOutcome::Hit(amount) => self.damage_taken += amount as u64,
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Damage dealt: {} | Damage taken: {} | Crits: {} | Dodges: {} | Items: {} | Turns: {}",
            self.damage_dealt,
            self.damage_taken,
            self.critical_hits,
            self.dodges,
            self.items_used,
            self.turns_elapsed
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub turn: u32,
    pub message: String,
}

/// Most recent combat messages, oldest dropped first.
#[derive(Debug, Clone)]
pub struct CombatLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl CombatLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn add(&mut self, turn: u32, message: String) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry { turn, message });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn recent(&self, count: usize) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().skip(self.entries.len().saturating_sub(count))
    }

    pub fn into_entries(self) -> Vec<LogEntry> {
        self.entries.into()
    }
}

/// What the player-action source gets to see.
#[derive(Debug, Clone, PartialEq)]
pub struct BattleView {
    pub turn: u32,
    pub player_health: u32,
    pub player_max_health: u32,
    pub player_defending: bool,
    pub opponent_name: String,
    pub opponent_rank: Rank,
    pub opponent_health: u32,
    pub opponent_max_health: u32,
    pub allow_flee: bool,
    pub weapons: Vec<String>,
    pub usable_items: Vec<String>,
}

pub struct CombatSession<'a, R> {
    pub(crate) player: &'a mut Player,
    pub(crate) opponent: &'a mut Opponent,
    config: &'a BattleConfig,
    rng: R,
    phase: CombatPhase,
    turn: u32,
    stats: CombatStats,
    log: CombatLog,
    result: CombatResult,
    allow_flee: bool,
    opponent_fled: bool,
}

impl<'a, R: Rng> CombatSession<'a, R> {
    pub fn new(
        player: &'a mut Player,
        opponent: &'a mut Opponent,
        config: &'a BattleConfig,
        rng: R,
        allow_flee: bool,
    ) -> Self {
        Self {
            player,
            opponent,
            config,
            rng,
            phase: CombatPhase::Start,
            turn: 0,
            stats: CombatStats::default(),
            log: CombatLog::new(config.combat_log_capacity),
            result: CombatResult::Ongoing,
            allow_flee,
            opponent_fled: false,
        }
    }

    pub fn phase(&self) -> CombatPhase {
        self.phase
    }

    pub fn set_phase(&mut self, phase: CombatPhase) {
        self.phase = phase;
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn stats(&self) -> &CombatStats {
        &self.stats
    }

    pub fn log(&self) -> &CombatLog {
        &self.log
    }

    pub fn result(&self) -> CombatResult {
        self.result
    }

    pub fn allow_flee(&self) -> bool {
        self.allow_flee
    }

    pub fn opponent_fled(&self) -> bool {
        self.opponent_fled
    }

    pub fn player(&self) -> &Player {
        &*self.player
    }

    pub fn opponent(&self) -> &Opponent {
        &*self.opponent
    }

    pub fn is_over(&self) -> bool {
        self.result.is_terminal()
    }

    /// Appends an event's message to the bounded log.
    pub fn record(&mut self, event: &CombatEvent) {
        self.log.add(self.turn, event.to_string());
    }

    pub fn view(&self) -> BattleView {
        BattleView {
            turn: self.turn,
            player_health: self.player.pools.health.current(),
            player_max_health: self.player.pools.health.max(),
            player_defending: self.player.is_defending,
            opponent_name: self.opponent.name.clone(),
            opponent_rank: self.opponent.rank,
            opponent_health: self.opponent.pools.health.current(),
            opponent_max_health: self.opponent.pools.health.max(),
            allow_flee: self.allow_flee,
            weapons: self
                .player
                .inventory
                .iter()
                .filter(|i| i.kind == ItemKind::Weapon)
                .map(|i| i.name.clone())
                .collect(),
            usable_items: self
                .player
                .inventory
                .iter()
                .filter(|i| i.kind.is_usable())
                .map(|i| i.name.clone())
                .collect(),
        }
    }

    /// Starts a new full turn.
    pub fn begin_turn(&mut self) -> CombatEvent {
        self.turn += 1;
        self.stats.turns_elapsed += 1;
        CombatEvent::TurnStarted { turn: self.turn }
    }

    /// Ends a full turn, counting down the player's buffs.
    pub fn end_turn(&mut self) -> Vec<CombatEvent> {
        self.player
            .tick_status_effects()
            .into_iter()
            .map(|e| CombatEvent::StatusExpired { effect: e.effect })
            .collect()
    }

    // ------------------------------------------------------------------
    // Player half-turn
    // ------------------------------------------------------------------

    /// Resolves one player action. An error leaves the session untouched.
    pub fn player_act(&mut self, action: &PlayerAction) -> Result<CombatEvent> {
        if !self.player.is_alive() {
            return Err(BattleError::CharacterDead(self.player.name.clone()));
        }
        match action {
            PlayerAction::Attack(weapon) => self.player_attack(weapon.as_deref()),
            PlayerAction::UseItem(name) => self.player_use_item(name),
            PlayerAction::Defend => {
                self.player.set_defending(true);
                Ok(CombatEvent::PlayerDefended)
            }
            PlayerAction::Flee => self.player_flee(),
            PlayerAction::Status => Ok(CombatEvent::StatusRequested(self.view())),
        }
    }

    fn player_attack(&mut self, weapon_name: Option<&str>) -> Result<CombatEvent> {
        let weapon = self.player.resolve_weapon(weapon_name)?;
        let weapon_label = weapon.map(|w| w.name.clone());
        let raw = self.player.attack_damage(weapon, self.config);

        let attack = math::roll_attack(
            raw,
            self.player.crit_chance(self.config),
            self.config.crit_multiplier,
            &mut self.rng,
        );
        let outcome = self.opponent.take_damage(attack.damage, self.config, &mut self.rng);
        self.player.set_defending(false);
        self.stats.add_damage_dealt(outcome.amount(), attack.is_crit);

        Ok(CombatEvent::PlayerAttack {
            weapon: weapon_label,
            damage: attack.damage,
            was_crit: attack.is_crit,
            dealt: outcome.amount(),
        })
    }

    fn player_use_item(&mut self, name: &str) -> Result<CombatEvent> {
        let outcome = self.player.use_item(name)?;
        if outcome != ItemUseOutcome::NoEffect {
            self.stats.items_used += 1;
        }
        Ok(CombatEvent::PlayerItemUsed {
            item: name.to_string(),
            outcome,
        })
    }

    fn player_flee(&mut self) -> Result<CombatEvent> {
        if !self.allow_flee {
            return Err(BattleError::FleeNotAllowed);
        }
        let chance = self
            .player
            .flee_chance(self.opponent.rank.is_boss_tier(), self.config);
        if math::roll_chance(chance, &mut self.rng) {
            self.result = CombatResult::Fled;
            Ok(CombatEvent::PlayerFled)
        } else {
            Ok(CombatEvent::PlayerFleeFailed { chance })
        }
    }

    // ------------------------------------------------------------------
    // Opponent half-turn
    // ------------------------------------------------------------------

    /// Lets the opponent choose and resolve one action, then ticks its
    /// ability cooldowns.
    pub fn opponent_act(&mut self, engine: &BehaviorEngine) -> CombatEvent {
        self.opponent.turns_in_combat += 1;
        let state = self.opponent.ai_state();
        let action = engine.decide(&self.opponent.behavior, &state, &mut self.rng);

        let event = match action {
            EnemyAction::Attack => self.opponent_attack(),
            EnemyAction::Defend => {
                self.opponent.set_defending(true);
                CombatEvent::EnemyDefended
            }
            EnemyAction::UseAbility => self.opponent_ability(),
            EnemyAction::Flee => self.opponent_flee(),
        };

        self.opponent.tick_abilities();
        event
    }

    fn opponent_attack(&mut self) -> CombatEvent {
        self.opponent.set_defending(false);
        let raw = self.opponent.roll_attack_damage(self.config, &mut self.rng);
        let outcome = self.player.take_damage(raw, self.config, &mut self.rng);
        self.stats.add_damage_taken(outcome);
        CombatEvent::EnemyAttack { outcome }
    }

    fn opponent_ability(&mut self) -> CombatEvent {
        let Some(ability) = self.opponent.trigger_random_ability(&mut self.rng) else {
            tracing::debug!(opponent = %self.opponent.name, "no ability ready, attacking");
            return self.opponent_attack();
        };
        self.opponent.set_defending(false);
        self.stats.abilities_used += 1;

        let outcome = if ability.effect == Some(AbilityEffect::SelfBuff) {
            self.opponent.apply_self_buff(self.config.self_buff_multiplier);
            None
        } else {
            let raw = (self.opponent.attack_power() as f64 * ability.damage_multiplier) as u32;
            let outcome = self.player.take_damage(raw, self.config, &mut self.rng);
            self.stats.add_damage_taken(outcome);
            Some(outcome)
        };

        CombatEvent::EnemyAbility {
            ability: ability.name,
            effect: ability.effect,
            outcome,
        }
    }

    fn opponent_flee(&mut self) -> CombatEvent {
        let escaped = !self.opponent.is_alive()
            || math::roll_chance(self.config.opponent_flee_chance, &mut self.rng);
        if escaped {
            self.opponent_fled = true;
            self.result = CombatResult::Victory;
            CombatEvent::EnemyFled
        } else {
            CombatEvent::EnemyFleeFailed
        }
    }

    // ------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------

    /// Checks terminal conditions: player death first, then opponent death.
    pub fn resolve(&mut self) -> Option<CombatEvent> {
        if self.result.is_terminal() {
            return None;
        }
        if !self.player.is_alive() {
            self.result = CombatResult::Defeat;
            return Some(CombatEvent::PlayerDied);
        }
        if !self.opponent.is_alive() {
            self.result = CombatResult::Victory;
            return Some(CombatEvent::EnemyDied {
                xp_gained: self.opponent.xp_reward,
            });
        }
        None
    }

    /// Rolls the opponent's loot and hands it to the player.
    pub fn grant_rewards(&mut self) -> RewardReport {
        let loot = self.opponent.loot.roll(&mut self.rng);
        apply_rewards(self.player, loot, self.config)
    }

    pub(crate) fn into_parts(self) -> (CombatStats, CombatLog) {
        (self.stats, self.log)
    }
}
