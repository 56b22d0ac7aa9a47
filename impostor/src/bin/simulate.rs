use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use rand::Rng;
use rand_pcg::Pcg64Mcg;
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

use impostor::catalog::CategorySelection;
use impostor::constants::GAME_NAME;
use impostor::rng::{derive_seed, pcg_from_seed};
use impostor::{
    Action, AccessTier, DiscussionDuration, GameConfig, ManualClock, Outcome, PcgSource,
    PhaseController, PhaseKind, TimerTick,
};

const LOG_TARGET: &str = "impostor::sim";

#[derive(Debug, Parser)]
#[command(author, version, about = "Play Impostor rounds with simulated voters", long_about = None)]
struct Args {
    /// Number of players at the table
    #[arg(long, env = "IMPOSTOR_PLAYERS", default_value_t = 4)]
    players: usize,

    /// Rounds to play
    #[arg(long, env = "IMPOSTOR_ROUNDS", default_value_t = 100)]
    rounds: u32,

    /// Seed for role, word and voter draws; random when omitted
    #[arg(long, env = "IMPOSTOR_SEED")]
    seed: Option<u64>,

    /// Unlock the pro categories
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pro: bool,

    /// JSON file with game tunables
    #[arg(long, env = "IMPOSTOR_CONFIG")]
    config: Option<PathBuf>,

    /// Chance that a crew member votes for the impostor
    #[arg(long, default_value_t = 0.5)]
    accuracy: f64,

    /// Print the summary as JSON
    #[arg(long, action = clap::ArgAction::SetTrue)]
    json: bool,

    /// Toggle structured (JSON) logs
    #[arg(long, env = "IMPOSTOR_LOG_JSON", default_value_t = false)]
    log_json: bool,
}

#[derive(Debug, Default, Serialize)]
struct Summary {
    seed: u64,
    rounds: u32,
    caught: u32,
    innocent_ejected: u32,
    no_ejection: u32,
    tie: u32,
}

impl Summary {
    fn record(&mut self, outcome: Outcome) {
        self.rounds += 1;
        match outcome {
            Outcome::Caught => self.caught += 1,
            Outcome::InnocentEjected => self.innocent_ejected += 1,
            Outcome::NoEjection => self.no_ejection += 1,
            Outcome::Tie => self.tie += 1,
        }
    }
}

type SimController = PhaseController<PcgSource, ManualClock>;

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_json)?;
    ensure!(
        (0.0..=1.0).contains(&args.accuracy),
        "accuracy must be between 0 and 1"
    );

    let config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => GameConfig::default(),
    };
    let seed = args.seed.unwrap_or_else(|| rand::thread_rng().gen());
    tracing::info!(
        target: LOG_TARGET,
        game = GAME_NAME,
        seed,
        players = args.players,
        rounds = args.rounds,
        "starting simulation"
    );

    let clock = ManualClock::new(0);
    let mut ctl = PhaseController::with_parts(config, PcgSource::from_seed(seed), clock.clone());
    let mut voters = pcg_from_seed(derive_seed(seed, "voters"));
    seat_players(&mut ctl, args.players, args.pro).context("failed to set up the table")?;

    let mut summary = Summary {
        seed,
        ..Summary::default()
    };
    for n in 0..args.rounds {
        let start = if n == 0 {
            Action::StartRound
        } else {
            Action::PlayAgain
        };
        ctl.apply(start)
            .with_context(|| format!("failed to start round {}", n + 1))?;
        let outcome = play_round(&mut ctl, &clock, &mut voters, args.accuracy)
            .with_context(|| format!("round {} did not finish", n + 1))?;
        summary.record(outcome);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "seed {}: {} rounds, caught {}, innocent ejected {}, no ejection {}, tie {}",
            summary.seed,
            summary.rounds,
            summary.caught,
            summary.innocent_ejected,
            summary.no_ejection,
            summary.tie
        );
    }
    Ok(())
}

fn init_tracing(json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt::fmt().with_env_filter(filter).with_writer(std::io::stderr);

    if json {
        builder.json().flatten_event(true).init();
    } else {
        builder.compact().init();
    }

    Ok(())
}

fn seat_players(ctl: &mut SimController, players: usize, pro: bool) -> Result<()> {
    ctl.apply(Action::OpenSetup)?;
    let seated: Vec<String> = ctl.roster().players().iter().map(|p| p.id.clone()).collect();
    for id in seated {
        ctl.apply(Action::RemovePlayer { id })?;
    }
    for n in 1..=players {
        ctl.apply(Action::AddPlayer {
            name: format!("Jugador {}", n),
        })?;
    }
    if pro {
        ctl.apply(Action::SetTier {
            tier: AccessTier::Pro,
        })?;
        ctl.apply(Action::SetCategories {
            ids: CategorySelection::all_for(AccessTier::Pro).ids().collect(),
        })?;
    }
    Ok(())
}

fn play_round(
    ctl: &mut SimController,
    clock: &ManualClock,
    voters: &mut Pcg64Mcg,
    accuracy: f64,
) -> Result<Outcome> {
    while ctl.phase_kind() == PhaseKind::RevealPass {
        ctl.apply(Action::ConfirmIdentity)?;
        ctl.apply(Action::HoldSecret)?;
        ctl.apply(Action::ReleaseSecret)?;
        ctl.apply(Action::NextReveal)?;
    }

    ctl.apply(Action::StartTimer {
        duration: DiscussionDuration::Short,
    })?;
    let poll_ms = ctl.config().timer_poll_ms;
    loop {
        clock.advance(poll_ms);
        if ctl.tick() == TimerTick::Completed {
            break;
        }
    }
    ctl.apply(Action::RequestVote)?;

    let impostor = ctl
        .round()
        .map(|r| r.impostor_id().to_string())
        .context("no round in progress")?;
    while ctl.phase_kind() == PhaseKind::VotePass {
        ctl.apply(Action::OpenBallot)?;
        let snapshot = ctl.snapshot();
        let voter = snapshot
            .round
            .and_then(|r| r.current_player)
            .context("ballot open without a voter")?;
        let ballot = snapshot.ballot;
        ensure!(!ballot.is_empty(), "empty ballot for {}", voter.id);
        let accuses = voter.id != impostor && voters.gen_bool(accuracy);
        let target = match ballot
            .iter()
            .find(|o| accuses && o.target.player_id() == Some(impostor.as_str()))
        {
            Some(option) => option.target.clone(),
            None => ballot[voters.gen_range(0..ballot.len())].target.clone(),
        };
        tracing::debug!(target: LOG_TARGET, voter = %voter.id, %target, "simulated vote");
        ctl.apply(Action::Vote { target })?;
    }

    let result = ctl.result().context("voting ended without a result")?;
    tracing::info!(
        target: LOG_TARGET,
        outcome = ?result.outcome,
        impostor = %result.impostor_name,
        word = %result.secret_word,
        "round result"
    );
    Ok(result.outcome)
}
