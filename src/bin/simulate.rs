//! Combat balance simulator CLI.
//!
//! Run Monte Carlo simulations of one matchup to analyze balance.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                          # 1000 runs, warrior vs random enemies
//!   cargo run --bin simulate -- -n 100 -e orc -l 3   # 100 runs vs a level 3 orc
//!   cargo run --bin simulate -- --seed 42            # Reproducible run

use duel::character::CharacterClass;
use duel::combat::Rank;
use duel::core::BattleConfig;
use duel::simulator::{run_simulation, SimConfig, SimOpponent};
use std::env;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

const DRAGON_PRESET_LEVEL: u32 = 10;

fn main() {
    let args: Vec<String> = env::args().collect();
    let config = match parse_args(&args) {
        Ok(config) => config,
        Err(msg) => {
            eprintln!("error: {msg}");
            eprintln!("run with --help for usage");
            std::process::exit(2);
        }
    };
    init_tracing(config.verbosity);

    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║              DUEL BALANCE SIMULATOR                           ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Configuration:");
    println!("  Runs:           {}", config.num_runs);
    println!("  Class:          {} (level {})", config.class, config.player_level);
    println!(
        "  Opponent:       {:?} (level {}, {})",
        config.opponent, config.opponent_level, config.rank
    );
    println!("  Potions:        {} x {} HP", config.potions, config.potion_heal);
    if config.boss_battle {
        println!("  Fleeing:        disabled");
    }
    if let Some(seed) = config.seed {
        println!("  Seed:           {}", seed);
    }
    println!();
    println!("Running simulation...");
    println!();

    let report = run_simulation(&config);

    println!("{}", report.to_text());

    if args.iter().any(|a| a == "--json") {
        println!("{}", report.to_json());
    }
}

fn init_tracing(verbosity: u8) {
    let default = match verbosity {
        0 | 1 => "warn",
        2 => "duel=info",
        _ => "duel=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn next_value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str, String> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| format!("{flag} needs a value"))
}

fn parse_number<T: FromStr>(value: &str, flag: &str) -> Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("{flag} expects a number, got '{value}'"))
}

fn parse_class(name: &str) -> Result<CharacterClass, String> {
    CharacterClass::all()
        .into_iter()
        .find(|c| c.name().eq_ignore_ascii_case(name))
        .ok_or_else(|| format!("unknown class '{name}'"))
}

fn parse_rank(name: &str) -> Result<Rank, String> {
    [Rank::Minion, Rank::Normal, Rank::Elite, Rank::Boss, Rank::Legendary]
        .into_iter()
        .find(|r| r.name().eq_ignore_ascii_case(name))
        .ok_or_else(|| format!("unknown rank '{name}'"))
}

/// `--dragon` picks the starting preset wherever it appears, so explicit
/// options always override it.
fn parse_args(args: &[String]) -> Result<SimConfig, String> {
    let mut config = if args.iter().skip(1).any(|a| a == "--dragon") {
        SimConfig::boss_test(DRAGON_PRESET_LEVEL)
    } else {
        SimConfig::default()
    };

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "-n" | "--runs" => {
                config.num_runs = parse_number(next_value(args, &mut i, flag)?, flag)?;
            }
            "-s" | "--seed" => {
                config.seed = Some(parse_number(next_value(args, &mut i, flag)?, flag)?);
            }
            "-c" | "--class" => {
                config.class = parse_class(next_value(args, &mut i, flag)?)?;
            }
            "-p" | "--player-level" => {
                config.player_level = parse_number(next_value(args, &mut i, flag)?, flag)?;
            }
            "-e" | "--enemy" => {
                let name = next_value(args, &mut i, flag)?;
                config.opponent =
                    SimOpponent::parse(name).ok_or_else(|| format!("unknown enemy '{name}'"))?;
            }
            "-l" | "--enemy-level" => {
                config.opponent_level = parse_number(next_value(args, &mut i, flag)?, flag)?;
            }
            "-r" | "--rank" => {
                config.rank = parse_rank(next_value(args, &mut i, flag)?)?;
            }
            "--potions" => {
                config.potions = parse_number(next_value(args, &mut i, flag)?, flag)?;
            }
            "--unarmed" => {
                config.weapon_damage = None;
            }
            "--boss" => {
                config.boss_battle = true;
            }
            "--config" => {
                let path = next_value(args, &mut i, flag)?;
                let text = std::fs::read_to_string(path)
                    .map_err(|e| format!("cannot read {path}: {e}"))?;
                config.battle = BattleConfig::from_json_str(&text)
                    .map_err(|e| format!("invalid battle config {path}: {e}"))?;
            }
            "-v" | "--verbose" => {
                config.verbosity = config.verbosity.max(1) + 1;
            }
            "-q" | "--quiet" => {
                config.verbosity = 0;
            }
            "--dragon" | "--json" => {}
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            other => return Err(format!("unknown option '{other}'")),
        }
        i += 1;
    }

    Ok(config)
}

fn print_help() {
    println!("Duel Balance Simulator");
    println!();
    println!("USAGE:");
    println!("    cargo run --bin simulate -- [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -n, --runs <N>           Number of simulated fights (default: 1000)");
    println!("    -s, --seed <S>           Random seed for reproducibility");
    println!("    -c, --class <C>          warrior, mage, rogue or ranger");
    println!("    -p, --player-level <L>   Player level (default: 1)");
    println!("    -e, --enemy <E>          random, goblin, orc, skeleton, wolf, troll, dragon");
    println!("    -l, --enemy-level <L>    Opponent level (default: 1)");
    println!("    -r, --rank <R>           minion, normal, elite, boss, legendary");
    println!("    --potions <N>            Starting health potions (default: 3)");
    println!("    --unarmed                Start without a weapon");
    println!("    --boss                   Disable fleeing");
    println!("    --config <FILE>          Load battle tuning from a JSON file");
    println!("    --dragon                 Preset: level 10 boss fight against a dragon");
    println!("                             (other options override it)");
    println!("    -v, --verbose            Per-run output (repeat for debug logs)");
    println!("    -q, --quiet              Only the report");
    println!("    --json                   Also print the report as JSON");
    println!("    -h, --help               Show this help");
}
