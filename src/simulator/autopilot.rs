//! Scripted player used by the simulator.

use crate::combat::orchestrator::ActionSource;
use crate::combat::session::{BattleView, PlayerAction};

/// Drinks a named potion when health runs low, otherwise attacks with the
/// equipped weapon.
#[derive(Debug, Clone)]
pub struct AutoPilot {
    pub potion: String,
    pub heal_threshold: f64,
}

impl AutoPilot {
    pub fn new(potion: impl Into<String>, heal_threshold: f64) -> Self {
        Self {
            potion: potion.into(),
            heal_threshold,
        }
    }

    fn has_potion(&self, view: &BattleView) -> bool {
        view.usable_items
            .iter()
            .any(|name| name.eq_ignore_ascii_case(&self.potion))
    }
}

impl ActionSource for AutoPilot {
    fn choose_action(&mut self, view: &BattleView) -> PlayerAction {
        let health = view.player_health as f64 / view.player_max_health.max(1) as f64;
        if health < self.heal_threshold && self.has_potion(view) {
            PlayerAction::UseItem(self.potion.clone())
        } else {
            PlayerAction::Attack(None)
        }
    }
}
