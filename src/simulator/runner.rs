//! Runs simulated encounters through the real combat orchestrator.

use super::autopilot::AutoPilot;
use super::config::SimConfig;
use super::report::SimReport;
use crate::character::player::Player;
use crate::combat::events::TracingObserver;
use crate::combat::orchestrator::CombatOrchestrator;
use crate::combat::session::{CombatResult, CombatSession};
use crate::items::Item;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

const POTION_NAME: &str = "Health Potion";
const WEAPON_NAME: &str = "Training Blade";

/// Numbers from a single encounter.
#[derive(Debug, Clone, Serialize)]
pub struct RunStats {
    pub opponent: String,
    pub result: CombatResult,
    pub opponent_fled: bool,
    pub turns: u32,
    pub damage_dealt: u64,
    pub damage_taken: u64,
    pub crits: u32,
    pub dodges: u32,
    pub potions_used: u32,
    pub levels_gained: u32,
    pub final_health: u32,
}

/// Run the full simulation and return a report.
pub fn run_simulation(config: &SimConfig) -> SimReport {
    let mut all_runs = Vec::with_capacity(config.num_runs as usize);

    for run_idx in 0..config.num_runs {
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(run_idx as u64)),
            None => ChaCha8Rng::from_entropy(),
        };

        let run = simulate_single_run(config, &mut rng);
        if config.verbosity >= 2 {
            println!(
                "Run {}/{} - {:?} vs {} in {} turns, dealt {}, took {}, potions {}",
                run_idx + 1,
                config.num_runs,
                run.result,
                run.opponent,
                run.turns,
                run.damage_dealt,
                run.damage_taken,
                run.potions_used
            );
        }
        all_runs.push(run);
    }

    let report = SimReport::from_runs(all_runs);
    tracing::info!(
        runs = report.num_runs,
        win_rate = report.win_rate,
        avg_turns = report.avg_turns,
        "simulation finished"
    );
    report
}

fn prepare_player(config: &SimConfig) -> Player {
    let battle = &config.battle;
    let mut player = Player::new("Simulant", config.class, battle);

    for _ in 1..config.player_level {
        if let Err(err) = player.level_up(battle) {
            tracing::debug!(%err, "stopped levelling simulated player");
            break;
        }
    }

    if let Some(damage) = config.weapon_damage {
        let equipped = player
            .add_item(Item::weapon(WEAPON_NAME, damage))
            .map_err(|(err, _)| err)
            .and_then(|()| player.equip_item(WEAPON_NAME).map(|_| ()));
        if let Err(err) = equipped {
            tracing::warn!(%err, "simulated player starts unarmed");
        }
    }

    for _ in 0..config.potions {
        if let Err((err, _)) = player.add_item(Item::healing_potion(POTION_NAME, config.potion_heal)) {
            tracing::debug!(%err, "no room for more potions");
            break;
        }
    }
    player
}

/// Plays one encounter with the given RNG.
pub fn simulate_single_run(config: &SimConfig, rng: &mut ChaCha8Rng) -> RunStats {
    let mut player = prepare_player(config);
    let start_level = player.level();
    let mut opponent = config.opponent.spawn(config.opponent_level, config.rank, rng);
    let opponent_name = opponent.name.clone();

    let session = CombatSession::new(
        &mut player,
        &mut opponent,
        &config.battle,
        &mut *rng,
        !config.boss_battle,
    );
    let pilot = AutoPilot::new(POTION_NAME, config.heal_threshold);
    let outcome = CombatOrchestrator::new(session, pilot, TracingObserver).run();

    RunStats {
        opponent: opponent_name,
        result: outcome.result,
        opponent_fled: outcome.opponent_fled,
        turns: outcome.turns,
        damage_dealt: outcome.stats.damage_dealt,
        damage_taken: outcome.stats.damage_taken,
        crits: outcome.stats.critical_hits,
        dodges: outcome.stats.dodges,
        potions_used: outcome.stats.items_used,
        levels_gained: player.level() - start_level,
        final_health: player.pools.health.current(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::class::CharacterClass;
    use crate::simulator::config::SimOpponent;

    #[test]
    fn test_prepared_player_has_kit() {
        let config = SimConfig::default();
        let player = prepare_player(&config);
        assert_eq!(player.equipment.weapon_damage(), Some(8));
        assert_eq!(player.inventory.len(), 1);
        assert_eq!(player.inventory.quantity(POTION_NAME), 3);
    }

    #[test]
    fn test_player_level_is_applied() {
        let config = SimConfig {
            player_level: 5,
            ..Default::default()
        };
        assert_eq!(prepare_player(&config).level(), 5);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let config = SimConfig {
            num_runs: 20,
            seed: Some(1234),
            verbosity: 0,
            ..Default::default()
        };
        let a = run_simulation(&config);
        let b = run_simulation(&config);
        assert_eq!(a.victories, b.victories);
        assert_eq!(a.avg_turns, b.avg_turns);
        assert_eq!(a.num_runs, 20);
    }

    #[test]
    fn test_easy_matchup_is_won() {
        let config = SimConfig {
            num_runs: 25,
            seed: Some(7),
            opponent: SimOpponent::Goblin,
            class: CharacterClass::Warrior,
            verbosity: 0,
            ..Default::default()
        };
        let report = run_simulation(&config);
        assert_eq!(report.victories, 25);
        assert_eq!(report.defeats, 0);
    }
}
