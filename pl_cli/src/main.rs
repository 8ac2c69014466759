//! Command-line front end for the pong_ladder bracket engine.
//!
//! Reads rosters and Swiss state as JSON, prints brackets, rating changes
//! and validation results as pretty JSON on stdout. Logs go to stderr.

mod config;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Error, bail};
use log::{info, warn};
use pico_args::Arguments;
use pong_ladder::{
    bracket::{
        BracketFormat, OpponentHistory, Participant, SwissPoints, generate_bracket,
        generate_swiss_round, repair_links, swiss_standings,
    },
    scoring::{
        GameScore, calculate_doubles_elo_change, calculate_doubles_tournament_elo_change,
        calculate_elo_change, calculate_tournament_elo_change, is_valid_best_of, validate_scores,
        validate_series_score,
    },
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use config::CliConfig;

const HELP: &str = "\
Generate brackets and score results for a ping-pong ladder

USAGE:
  pl_cli <COMMAND> [OPTIONS]

COMMANDS:
  bracket  --roster FILE [--format F] [--groups N]   Generate an opening bracket
  swiss    --roster FILE --round N [--state FILE]     Pair the next Swiss round
  elo      WINNER LOSER [--multiplier PCT]            Singles rating change
  doubles  W1 W2 L1 L2 [--multiplier PCT]             Doubles rating change
  validate [--best-of N] SCORES                       Check game scores (11-9,9-11,11-8)
  series   [--best-of N] SCORE                        Check a series score (2-1)

OPTIONS:
  --format     F           single, double, groups or swiss  [default: env LADDER_FORMAT or single]
  --groups     N           Round-robin group count          [default: env LADDER_GROUP_COUNT or 1]
  --best-of    N           Series length                    [default: env LADDER_DEFAULT_BEST_OF or 3]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  LADDER_ROSTER            Roster file used when --roster is omitted
  LADDER_BASE_MULTIPLIER   First elimination round multiplier, percent
  LADDER_FINAL_MULTIPLIER  Final multiplier, percent
  RUST_LOG                 Log filter (e.g. debug)
  (See .env.example for all configuration options)
";

/// Swiss state threaded between rounds by the caller
#[derive(Debug, Default, Serialize, Deserialize)]
struct SwissState {
    #[serde(default)]
    previous_opponents: OpponentHistory,
    #[serde(default)]
    swiss_points: SwissPoints,
}

fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    env_logger::builder().format_target(false).init();

    let Some(command) = pargs.subcommand()? else {
        print!("{HELP}");
        bail!("no command given");
    };

    let format: Option<BracketFormat> = pargs.opt_value_from_str("--format")?;
    let groups: Option<usize> = pargs.opt_value_from_str("--groups")?;
    let config = CliConfig::from_env(format, groups)?;
    config.validate()?;

    let output = match command.as_str() {
        "bracket" => bracket(&mut pargs, &config)?,
        "swiss" => swiss(&mut pargs, &config)?,
        "elo" => elo(&mut pargs)?,
        "doubles" => doubles(&mut pargs)?,
        "validate" => validate(&mut pargs, &config)?,
        "series" => series(&mut pargs, &config)?,
        other => bail!("unknown command '{other}', see --help"),
    };

    let remaining = pargs.finish();
    if !remaining.is_empty() {
        warn!("Ignoring unused arguments: {remaining:?}");
    }

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, Error> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn roster(pargs: &mut Arguments, config: &CliConfig) -> Result<Vec<Participant>, Error> {
    let path = config.roster_path(pargs.opt_value_from_str::<_, PathBuf>("--roster")?)?;
    let participants: Vec<Participant> = read_json(&path)?;
    info!("Loaded {} participants from {}", participants.len(), path.display());
    Ok(participants)
}

fn bracket(pargs: &mut Arguments, config: &CliConfig) -> Result<serde_json::Value, Error> {
    let participants = roster(pargs, config)?;
    let mut bracket = generate_bracket(&participants, &config.settings)?;
    let report = repair_links(&mut bracket);
    info!("Opening byes settled {} matches", report.byes_closed + report.promoted);
    Ok(serde_json::to_value(&bracket)?)
}

fn swiss(pargs: &mut Arguments, config: &CliConfig) -> Result<serde_json::Value, Error> {
    let participants = roster(pargs, config)?;
    let round_number: u32 = pargs.value_from_str("--round")?;
    let state: SwissState = match pargs.opt_value_from_str::<_, PathBuf>("--state")? {
        Some(path) => read_json(&path)?,
        None => SwissState::default(),
    };

    let round = generate_swiss_round(
        &participants,
        round_number,
        &state.previous_opponents,
        &state.swiss_points,
        config.settings.group_multiplier,
    )?;
    let standings = swiss_standings(&participants, &state.previous_opponents, &state.swiss_points);

    Ok(serde_json::json!({
        "round": round,
        "standings": standings,
    }))
}

fn elo(pargs: &mut Arguments) -> Result<serde_json::Value, Error> {
    let multiplier: Option<u32> = pargs.opt_value_from_str("--multiplier")?;
    let winner: i32 = pargs.free_from_str()?;
    let loser: i32 = pargs.free_from_str()?;

    let change = match multiplier {
        Some(multiplier) => calculate_tournament_elo_change(winner, loser, multiplier),
        None => calculate_elo_change(winner, loser),
    };
    Ok(serde_json::to_value(change)?)
}

fn doubles(pargs: &mut Arguments) -> Result<serde_json::Value, Error> {
    let multiplier: Option<u32> = pargs.opt_value_from_str("--multiplier")?;
    let winners: [i32; 2] = [pargs.free_from_str()?, pargs.free_from_str()?];
    let losers: [i32; 2] = [pargs.free_from_str()?, pargs.free_from_str()?];

    let change = match multiplier {
        Some(multiplier) => calculate_doubles_tournament_elo_change(winners, losers, multiplier),
        None => calculate_doubles_elo_change(winners, losers),
    };
    Ok(serde_json::to_value(change)?)
}

/// Parse "11-9,9-11,11-8" into game scores
fn parse_games(raw: &str) -> Result<Vec<GameScore>, Error> {
    raw.split(',')
        .map(|game| -> Result<GameScore, Error> {
            let (p1, p2) = game
                .trim()
                .split_once('-')
                .with_context(|| format!("game '{game}' is not POINTS-POINTS"))?;
            Ok(GameScore::new(p1.trim().parse()?, p2.trim().parse()?))
        })
        .collect()
}

fn best_of(pargs: &mut Arguments, config: &CliConfig) -> Result<u8, Error> {
    let best_of = pargs
        .opt_value_from_str("--best-of")?
        .unwrap_or(config.settings.best_of.default);
    if !is_valid_best_of(best_of) {
        bail!("--best-of {best_of} is not one of 1, 3, 5, 7");
    }
    Ok(best_of)
}

fn validate(pargs: &mut Arguments, config: &CliConfig) -> Result<serde_json::Value, Error> {
    let best_of = best_of(pargs, config)?;
    let raw: String = pargs.free_from_str()?;
    let games = parse_games(&raw)?;

    let result = match validate_scores(&games, best_of) {
        Ok(outcome) => serde_json::json!({ "valid": true, "outcome": outcome }),
        Err(reason) => {
            serde_json::json!({ "valid": false, "reason": reason, "message": reason.to_string() })
        }
    };
    Ok(result)
}

fn series(pargs: &mut Arguments, config: &CliConfig) -> Result<serde_json::Value, Error> {
    let best_of = best_of(pargs, config)?;
    let raw: String = pargs.free_from_str()?;

    let result = match validate_series_score(&raw, best_of) {
        Ok((winner_wins, loser_wins)) => serde_json::json!({
            "valid": true,
            "winner_wins": winner_wins,
            "loser_wins": loser_wins,
        }),
        Err(reason) => {
            serde_json::json!({ "valid": false, "reason": reason, "message": reason.to_string() })
        }
    };
    Ok(result)
}
