use std::sync::OnceLock;

use impostor::{
    Action, DiscussionDuration, Feedback, GameConfig, GameError, ManualClock, Outcome, PcgSource,
    PhaseController, PhaseKind, SecretView, TiePolicyKind, TimerTick, VoteTarget,
};
use tracing_subscriber::{fmt, EnvFilter};

static LOGGING: OnceLock<()> = OnceLock::new();

/// Idempotent log setup. `TEST_LOG` wins over `RUST_LOG`; quiet by default.
fn init_logging() {
    LOGGING.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));
        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}

type Controller = PhaseController<PcgSource, ManualClock>;

fn table(seed: u64, names: &[&str]) -> (Controller, ManualClock) {
    init_logging();
    let clock = ManualClock::new(10_000);
    let mut ctl = PhaseController::with_parts(
        GameConfig::default(),
        PcgSource::from_seed(seed),
        clock.clone(),
    );
    ctl.apply(Action::OpenSetup).unwrap();
    let ids: Vec<String> = ctl.roster().players().iter().map(|p| p.id.clone()).collect();
    for id in ids {
        ctl.apply(Action::RemovePlayer { id }).unwrap();
    }
    for name in names {
        ctl.apply(Action::AddPlayer {
            name: name.to_string(),
        })
        .unwrap();
    }
    (ctl, clock)
}

#[test]
fn full_game_from_setup_to_results() {
    let (mut ctl, clock) = table(77, &["Ana", "Bruno", "Carla", "Diego", "Eva"]);
    assert_eq!(ctl.roster().len(), 5);
    ctl.apply(Action::StartRound).unwrap();

    let mut confirmations = 0;
    let mut crew_words = Vec::new();
    while ctl.phase_kind() == PhaseKind::RevealPass {
        ctl.apply(Action::ConfirmIdentity).unwrap();
        ctl.apply(Action::HoldSecret).unwrap();
        if let Some(SecretView::Crew { word, .. }) = ctl.secret_view() {
            crew_words.push(word);
        }
        ctl.apply(Action::ReleaseSecret).unwrap();
        ctl.apply(Action::NextReveal).unwrap();
        confirmations += 1;
    }
    assert_eq!(confirmations, 5);
    assert_eq!(crew_words.len(), 4);
    assert!(crew_words.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(ctl.phase_kind(), PhaseKind::Discussion);

    ctl.apply(Action::StartTimer {
        duration: DiscussionDuration::Long,
    })
    .unwrap();
    let poll = ctl.config().timer_poll_ms;
    let mut finished = 0;
    let mut last = u64::MAX;
    for _ in 0..300 {
        clock.advance(poll);
        match ctl.tick() {
            TimerTick::Running { remaining_secs } => {
                assert!(remaining_secs <= last);
                last = remaining_secs;
            }
            TimerTick::Completed => finished += 1,
            TimerTick::Idle => {}
        }
    }
    assert_eq!(finished, 1);

    ctl.apply(Action::RequestVote).unwrap();
    let impostor = ctl.round().unwrap().impostor_id().to_string();
    let mut ballots = 0;
    while ctl.phase_kind() == PhaseKind::VotePass {
        ctl.apply(Action::OpenBallot).unwrap();
        let voter = ctl.round().unwrap().current_voter().unwrap().id.clone();
        let target = if voter == impostor {
            VoteTarget::Skip
        } else {
            VoteTarget::player(impostor.clone())
        };
        ctl.apply(Action::Vote { target }).unwrap();
        ballots += 1;
    }
    assert_eq!(ballots, 5);

    let result = ctl.result().unwrap().clone();
    assert_eq!(result.outcome, Outcome::Caught);
    assert_eq!(result.secret_word, crew_words[0]);
    assert_eq!(result.top_target, Some(VoteTarget::player(impostor)));
    let snapshot = ctl.snapshot().to_json().unwrap();
    assert!(snapshot.contains(&result.secret_word));
}

#[test]
fn same_seed_deals_the_same_round() {
    let deal = |seed| {
        let (mut ctl, _) = table(seed, &["Ana", "Bruno", "Carla", "Diego"]);
        ctl.apply(Action::StartRound).unwrap();
        ctl.round().unwrap().clone()
    };
    assert_eq!(deal(5), deal(5));
}

#[test]
fn every_player_can_be_the_impostor() {
    let mut seen = std::collections::HashSet::new();
    for seed in 0..200 {
        let (mut ctl, _) = table(seed, &["Ana", "Bruno", "Carla"]);
        ctl.apply(Action::StartRound).unwrap();
        seen.insert(ctl.round().unwrap().impostor().unwrap().name.clone());
    }
    assert_eq!(seen.len(), 3);
}

#[test]
fn short_names_and_small_tables_are_refused() {
    let (mut ctl, _) = table(1, &["Ana", "Bruno"]);
    assert_eq!(
        ctl.apply(Action::AddPlayer { name: "  X ".into() }),
        Err(GameError::InvalidName { min: 2 })
    );
    assert!(matches!(
        ctl.apply(Action::StartRound),
        Err(GameError::NotEnoughPlayers { found: 2, .. })
    ));
    assert_eq!(ctl.phase_kind(), PhaseKind::Setup);
}

#[test]
fn split_vote_ends_in_a_tie() {
    let (mut ctl, _) = table(3, &["Ana", "Bruno", "Carla", "Diego"]);
    ctl.apply(Action::StartRound).unwrap();
    while ctl.phase_kind() != PhaseKind::Discussion {
        ctl.apply(Action::ConfirmIdentity).unwrap();
        ctl.apply(Action::NextReveal).unwrap();
    }
    ctl.apply(Action::RequestVote).unwrap();
    let order: Vec<String> = ctl
        .round()
        .unwrap()
        .players()
        .iter()
        .map(|p| p.id.clone())
        .collect();
    // Two votes each for the first two players.
    let targets = [
        VoteTarget::player(order[1].clone()),
        VoteTarget::player(order[0].clone()),
        VoteTarget::player(order[1].clone()),
        VoteTarget::player(order[0].clone()),
    ];
    for target in targets {
        ctl.apply(Action::OpenBallot).unwrap();
        ctl.apply(Action::Vote { target }).unwrap();
    }
    let result = ctl.result().unwrap();
    assert_eq!(result.outcome, Outcome::Tie);
    assert_eq!(result.top_target, None);
}

#[test]
fn strict_tie_policy_can_be_configured() {
    init_logging();
    let config = GameConfig::from_json_str(r#"{"tie_policy": "strict_unique_max"}"#).unwrap();
    assert_eq!(config.tie_policy, TiePolicyKind::StrictUniqueMax);
    let mut ctl = PhaseController::with_parts(config, PcgSource::from_seed(9), ManualClock::new(0));
    let t = ctl.apply(Action::StartRound).unwrap();
    assert_eq!(t.phase, PhaseKind::RevealPass);
    assert_eq!(t.feedback.map(|f| f.pattern_ms()), Some(Feedback::Tap.pattern_ms()));

    while ctl.phase_kind() != PhaseKind::Discussion {
        ctl.apply(Action::ConfirmIdentity).unwrap();
        ctl.apply(Action::NextReveal).unwrap();
    }
    ctl.apply(Action::RequestVote).unwrap();
    let order: Vec<String> = ctl
        .round()
        .unwrap()
        .players()
        .iter()
        .map(|p| p.id.clone())
        .collect();
    assert_eq!(order.len(), 3);
    // One vote each for two players and one skip.
    let targets = [
        VoteTarget::player(order[1].clone()),
        VoteTarget::player(order[0].clone()),
        VoteTarget::Skip,
    ];
    for target in targets {
        ctl.apply(Action::OpenBallot).unwrap();
        ctl.apply(Action::Vote { target }).unwrap();
    }
    let result = ctl.result().unwrap();
    assert_eq!(result.outcome, Outcome::Tie);
    assert_eq!(result.top_target, None);
    assert_eq!(result.tally.len(), 3);
}
