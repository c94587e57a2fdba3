//! Integration test: full encounters through the public API
//!
//! Drives the orchestrator end to end with seeded RNGs and scripted players:
//! victory pays out, defeat and fleeing do not, rejected input re-prompts,
//! and the same seed always replays the same fight.

use duel::character::{CharacterClass, Player};
use duel::combat::{
    dragon, goblin, orc, start_boss_battle, start_combat, troll, AiState, BehaviorEngine, BehaviorTag,
    CombatEvent, CombatOrchestrator, CombatResult, CombatSession, Combatant, EnemyAction,
    EventRecorder, PlayerAction, Rank, Rolls, ScriptedActions,
};
use duel::core::BattleConfig;
use duel::error::BattleError;
use duel::items::Item;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn hero(config: &BattleConfig) -> Player {
    let mut player = Player::new("Hero", CharacterClass::Warrior, config);
    player.add_item(Item::weapon("Iron Sword", 10)).unwrap();
    player.equip_item("Iron Sword").unwrap();
    player
}

fn seeded(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

// =========================================================================
// Outcomes
// =========================================================================

#[test]
fn test_victory_grants_xp_and_gold() {
    let config = BattleConfig::default();
    let mut player = hero(&config);
    let mut enemy = orc(1, Rank::Normal);

    let outcome = start_combat(&mut player, &mut enemy, &config, seeded(11), ScriptedActions::default());

    assert_eq!(outcome.result, CombatResult::Victory);
    let rewards = outcome.rewards.expect("victory should carry rewards");
    assert_eq!(rewards.xp, 35);
    assert_eq!(player.progression.experience, 35);
    assert_eq!(player.gold, rewards.gold);
    assert!((5..=20).contains(&rewards.gold));
}

#[test]
fn test_dragon_boss_battle_is_lost_and_cannot_be_fled() {
    let config = BattleConfig::default();
    let mut player = hero(&config);
    let mut boss = dragon(5);
    let script = ScriptedActions::new([PlayerAction::Flee]).with_fallback(PlayerAction::Defend);

    let mut recorder = EventRecorder::new();
    let session = CombatSession::new(&mut player, &mut boss, &config, seeded(3), false);
    let outcome = CombatOrchestrator::new(session, script, &mut recorder).run();

    assert_eq!(outcome.result, CombatResult::Defeat);
    assert!(outcome.rewards.is_none());
    assert_eq!(player.gold, 0);
    assert_eq!(player.progression.experience, 0);
    assert_eq!(
        recorder.count(|e| matches!(e, CombatEvent::ActionRejected(BattleError::FleeNotAllowed))),
        1
    );
    assert!(recorder.count(|e| *e == CombatEvent::PlayerDefended) >= 1);
    assert_eq!(recorder.count(|e| matches!(e, CombatEvent::PlayerAttack { .. })), 0);
}

#[test]
fn test_start_boss_battle_disallows_flee() {
    let config = BattleConfig::default();
    let mut player = hero(&config);
    let mut boss = troll(1, Some(Rank::Boss));
    let outcome = start_boss_battle(&mut player, &mut boss, &config, seeded(8), ScriptedActions::default());
    assert!(outcome.result.is_terminal());
    assert_ne!(outcome.result, CombatResult::Fled);
}

// =========================================================================
// Turn accounting
// =========================================================================

#[test]
fn test_turn_counter_matches_turn_events() {
    let config = BattleConfig::default();
    let mut player = hero(&config);
    let mut enemy = troll(2, None);
    let mut recorder = EventRecorder::new();
    let session = CombatSession::new(&mut player, &mut enemy, &config, seeded(21), true);
    let outcome = CombatOrchestrator::new(session, ScriptedActions::default(), &mut recorder).run();

    let turns = recorder.count(|e| matches!(e, CombatEvent::TurnStarted { .. })) as u32;
    assert_eq!(turns, outcome.turns);
    assert_eq!(outcome.stats.turns_elapsed, outcome.turns);
    assert_eq!(
        recorder.events.last(),
        Some(&CombatEvent::CombatEnded {
            result: outcome.result,
            turns: outcome.turns
        })
    );
}

#[test]
fn test_status_requests_are_free() {
    let config = BattleConfig::default();
    let mut player = hero(&config);
    let mut enemy = goblin(1, Rank::Normal);
    let mut recorder = EventRecorder::new();
    let script = ScriptedActions::new([
        PlayerAction::Status,
        PlayerAction::Status,
        PlayerAction::Status,
    ]);
    let session = CombatSession::new(&mut player, &mut enemy, &config, seeded(4), true);
    CombatOrchestrator::new(session, script, &mut recorder).run();

    let first_enemy_action = recorder
        .events
        .iter()
        .position(|e| {
            matches!(
                e,
                CombatEvent::EnemyAttack { .. }
                    | CombatEvent::EnemyDefended
                    | CombatEvent::EnemyFled
                    | CombatEvent::EnemyFleeFailed
                    | CombatEvent::EnemyAbility { .. }
            )
        })
        .unwrap_or(usize::MAX);
    let statuses: Vec<usize> = recorder
        .events
        .iter()
        .enumerate()
        .filter(|(_, e)| matches!(e, CombatEvent::StatusRequested(_)))
        .map(|(i, _)| i)
        .collect();
    assert_eq!(statuses.len(), 3);
    assert!(statuses.iter().all(|&i| i < first_enemy_action));
}

// =========================================================================
// Determinism and extension
// =========================================================================

#[test]
fn test_same_seed_replays_identically() {
    let config = BattleConfig::default();
    let run = |seed: u64| {
        let mut player = hero(&config);
        let mut enemy = orc(4, Rank::Elite);
        let mut recorder = EventRecorder::new();
        let session = CombatSession::new(&mut player, &mut enemy, &config, seeded(seed), true);
        CombatOrchestrator::new(session, ScriptedActions::default(), &mut recorder).run();
        recorder.events
    };
    assert_eq!(run(99), run(99));
}

#[test]
fn test_custom_policy_is_used_by_orchestrator() {
    let config = BattleConfig::default();
    let mut player = hero(&config);
    let mut enemy = goblin(1, Rank::Normal);
    enemy.behavior = BehaviorTag::Custom("turtle".into());

    let mut engine = BehaviorEngine::new();
    engine.register(BehaviorTag::Custom("turtle".into()), |_: &AiState, _: Rolls| EnemyAction::Defend);

    let mut recorder = EventRecorder::new();
    let session = CombatSession::new(&mut player, &mut enemy, &config, seeded(5), true);
    let outcome = CombatOrchestrator::new(session, ScriptedActions::default(), &mut recorder)
        .with_engine(engine)
        .run();

    assert_eq!(outcome.result, CombatResult::Victory);
    assert_eq!(outcome.stats.damage_taken, 0);
    assert!(recorder.count(|e| *e == CombatEvent::EnemyDefended) >= 1);
    assert_eq!(recorder.count(|e| matches!(e, CombatEvent::EnemyAttack { .. })), 0);
    assert!(player.is_alive());
}
