//! Opponent decision making.
//!
//! Each [`BehaviorTag`] maps to a [`BehaviorPolicy`] in a lookup table held
//! by [`BehaviorEngine`]. A policy sees only the opponent's health
//! percentage, whether any ability is ready, and two independent rolls in
//! `[0, 1)`. Most tables only read the first.
//! New tags are added with [`BehaviorEngine::register`]; the built-in
//! policies are never edited for it.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BehaviorTag {
    Aggressive,
    Defensive,
    Balanced,
    Coward,
    Berserker,
    Tactical,
    /// A policy registered at runtime.
    Custom(String),
}

impl BehaviorTag {
    pub fn builtin() -> [BehaviorTag; 6] {
        [
            BehaviorTag::Aggressive,
            BehaviorTag::Defensive,
            BehaviorTag::Balanced,
            BehaviorTag::Coward,
            BehaviorTag::Berserker,
            BehaviorTag::Tactical,
        ]
    }
}

impl fmt::Display for BehaviorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BehaviorTag::Aggressive => f.write_str("aggressive"),
            BehaviorTag::Defensive => f.write_str("defensive"),
            BehaviorTag::Balanced => f.write_str("balanced"),
            BehaviorTag::Coward => f.write_str("coward"),
            BehaviorTag::Berserker => f.write_str("berserker"),
            BehaviorTag::Tactical => f.write_str("tactical"),
            BehaviorTag::Custom(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyAction {
    Attack,
    Defend,
    UseAbility,
    Flee,
}

/// The slice of opponent state a policy may look at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiState {
    pub health_percentage: f64,
    pub ability_ready: bool,
}

/// Uniform draws handed to a policy for one decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rolls {
    pub first: f64,
    /// Independent of `first`, for tables with a second chance check.
    pub second: f64,
}

impl Rolls {
    pub fn new(first: f64, second: f64) -> Self {
        Self { first, second }
    }

    /// Same value for both checks.
    pub fn single(roll: f64) -> Self {
        Self::new(roll, roll)
    }

    pub fn draw(rng: &mut impl Rng) -> Self {
        Self::new(rng.gen::<f64>(), rng.gen::<f64>())
    }
}

pub trait BehaviorPolicy {
    fn decide(&self, state: &AiState, rolls: Rolls) -> EnemyAction;
}

impl<F> BehaviorPolicy for F
where
    F: Fn(&AiState, Rolls) -> EnemyAction,
{
    fn decide(&self, state: &AiState, rolls: Rolls) -> EnemyAction {
        self(state, rolls)
    }
}

// ============================================================================
// Built-in policies
// ============================================================================

fn aggressive(state: &AiState, rolls: Rolls) -> EnemyAction {
    if state.ability_ready && rolls.first < 0.4 {
        EnemyAction::UseAbility
    } else {
        EnemyAction::Attack
    }
}

fn defensive(state: &AiState, rolls: Rolls) -> EnemyAction {
    if state.health_percentage < 40.0 && rolls.first < 0.6 {
        EnemyAction::Defend
    } else {
        EnemyAction::Attack
    }
}

fn coward(state: &AiState, rolls: Rolls) -> EnemyAction {
    if state.health_percentage < 25.0 && rolls.first < 0.5 {
        EnemyAction::Flee
    } else {
        EnemyAction::Attack
    }
}

fn berserker(state: &AiState, _rolls: Rolls) -> EnemyAction {
    if state.ability_ready && state.health_percentage < 30.0 {
        EnemyAction::UseAbility
    } else {
        EnemyAction::Attack
    }
}

// The ability and defend checks are separate chances.
fn tactical(state: &AiState, rolls: Rolls) -> EnemyAction {
    if state.ability_ready && rolls.first < 0.3 {
        EnemyAction::UseAbility
    } else if state.health_percentage < 30.0 && rolls.second < 0.4 {
        EnemyAction::Defend
    } else {
        EnemyAction::Attack
    }
}

fn balanced(state: &AiState, rolls: Rolls) -> EnemyAction {
    let roll = rolls.first;
    if roll < 0.10 && state.health_percentage < 50.0 {
        EnemyAction::Defend
    } else if roll < 0.25 && state.ability_ready {
        EnemyAction::UseAbility
    } else {
        EnemyAction::Attack
    }
}

// ============================================================================
// Engine
// ============================================================================

pub struct BehaviorEngine {
    policies: HashMap<BehaviorTag, Box<dyn BehaviorPolicy>>,
}

impl Default for BehaviorEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BehaviorEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviorEngine")
            .field("tags", &self.policies.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl BehaviorEngine {
    /// Engine with the six built-in policies.
    pub fn new() -> Self {
        let mut engine = Self {
            policies: HashMap::new(),
        };
        engine.register(BehaviorTag::Aggressive, aggressive);
        engine.register(BehaviorTag::Defensive, defensive);
        engine.register(BehaviorTag::Balanced, balanced);
        engine.register(BehaviorTag::Coward, coward);
        engine.register(BehaviorTag::Berserker, berserker);
        engine.register(BehaviorTag::Tactical, tactical);
        engine
    }

    /// Adds or replaces the policy for `tag`.
    pub fn register(&mut self, tag: BehaviorTag, policy: impl BehaviorPolicy + 'static) {
        self.policies.insert(tag, Box::new(policy));
    }

    pub fn has_policy(&self, tag: &BehaviorTag) -> bool {
        self.policies.contains_key(tag)
    }

    /// Applies the policy with `roll` used for every check.
    pub fn decide_with_roll(&self, tag: &BehaviorTag, state: &AiState, roll: f64) -> EnemyAction {
        self.decide_with_rolls(tag, state, Rolls::single(roll))
    }

    /// Applies the policy to explicit rolls.
    ///
    /// An ability choice with nothing ready comes back as `Attack`. Tags with
    /// no registered policy fall back to the balanced table.
    pub fn decide_with_rolls(&self, tag: &BehaviorTag, state: &AiState, rolls: Rolls) -> EnemyAction {
        let chosen = match self.policies.get(tag) {
            Some(policy) => policy.decide(state, rolls),
            None => {
                tracing::warn!(%tag, "no policy registered, using balanced");
                balanced(state, rolls)
            }
        };

        if chosen == EnemyAction::UseAbility && !state.ability_ready {
            tracing::debug!(%tag, "ability chosen with none ready, attacking instead");
            return EnemyAction::Attack;
        }
        chosen
    }

    /// Draws fresh rolls from `rng` and decides.
    pub fn decide(&self, tag: &BehaviorTag, state: &AiState, rng: &mut impl Rng) -> EnemyAction {
        let rolls = Rolls::draw(rng);
        let action = self.decide_with_rolls(tag, state, rolls);
        tracing::debug!(%tag, roll = rolls.first, second = rolls.second, health = state.health_percentage, ?action, "opponent decision");
        action
    }
}
