//! Simulation report generation.

use super::runner::RunStats;
use crate::combat::session::CombatResult;
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregated results from multiple simulated encounters.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub num_runs: u32,
    pub victories: u32,
    pub defeats: u32,
    pub fled: u32,
    /// Victories where the opponent ran away
    pub opponent_fled: u32,

    pub win_rate: f64,
    pub avg_turns: f64,
    pub max_turns: u32,
    pub avg_damage_dealt: f64,
    pub avg_damage_taken: f64,
    pub avg_potions_used: f64,
    pub avg_crits: f64,
    pub avg_dodges: f64,

    /// Fight length in turns → number of runs
    pub turn_distribution: BTreeMap<u32, u32>,

    #[serde(skip)]
    pub run_stats: Vec<RunStats>,
}

fn average(runs: &[RunStats], value: impl Fn(&RunStats) -> f64) -> f64 {
    if runs.is_empty() {
        return 0.0;
    }
    runs.iter().map(value).sum::<f64>() / runs.len() as f64
}

impl SimReport {
    pub fn from_runs(runs: Vec<RunStats>) -> Self {
        let count = |result: CombatResult| runs.iter().filter(|r| r.result == result).count() as u32;
        let num_runs = runs.len() as u32;
        let victories = count(CombatResult::Victory);

        let mut turn_distribution = BTreeMap::new();
        for run in &runs {
            *turn_distribution.entry(run.turns).or_insert(0) += 1;
        }

        Self {
            num_runs,
            victories,
            defeats: count(CombatResult::Defeat),
            fled: count(CombatResult::Fled),
            opponent_fled: runs.iter().filter(|r| r.opponent_fled).count() as u32,
            win_rate: victories as f64 / num_runs.max(1) as f64,
            avg_turns: average(&runs, |r| r.turns as f64),
            max_turns: runs.iter().map(|r| r.turns).max().unwrap_or(0),
            avg_damage_dealt: average(&runs, |r| r.damage_dealt as f64),
            avg_damage_taken: average(&runs, |r| r.damage_taken as f64),
            avg_potions_used: average(&runs, |r| r.potions_used as f64),
            avg_crits: average(&runs, |r| r.crits as f64),
            avg_dodges: average(&runs, |r| r.dodges as f64),
            turn_distribution,
            run_stats: runs,
        }
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Runs: {} total, {} won, {} lost, {} fled\n\n",
            self.num_runs, self.victories, self.defeats, self.fled
        ));

        report.push_str("── OUTCOMES ─────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Win Rate:            {:.1}%\n", self.win_rate * 100.0));
        report.push_str(&format!("  Opponent Fled:       {}\n", self.opponent_fled));
        report.push_str(&format!("  Avg Turns:           {:.1}\n", self.avg_turns));
        report.push_str(&format!("  Longest Fight:       {}\n\n", self.max_turns));

        report.push_str("── DAMAGE ───────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Damage Dealt:    {:.1}\n", self.avg_damage_dealt));
        report.push_str(&format!("  Avg Damage Taken:    {:.1}\n", self.avg_damage_taken));
        report.push_str(&format!("  Avg Crits:           {:.2}\n", self.avg_crits));
        report.push_str(&format!("  Avg Dodges:          {:.2}\n", self.avg_dodges));
        report.push_str(&format!("  Avg Potions Used:    {:.2}\n\n", self.avg_potions_used));

        report.push_str("── FIGHT LENGTH ─────────────────────────────────────────────────\n");
        for (turns, runs) in &self.turn_distribution {
            let pct = (*runs as f64 / self.num_runs.max(1) as f64) * 100.0;
            let bar: String = "█".repeat((pct / 2.0) as usize);
            report.push_str(&format!("  {:3} turns: {:>5.1}% {}\n", turns, pct, bar));
        }

        report
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
