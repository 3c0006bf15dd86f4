use rand::rngs::SmallRng;
use rand::SeedableRng;

use media_monopoly::game::globals::{Holding, CRISIS_POSITION, STARTING_BALANCE};
use media_monopoly::game::victory::evaluate;
use media_monopoly::{ChannelGroup, DiceRoll, GameError, GameState, Phase, Settings};

const NAMES: [&str; 5] = ["Alpha", "Beta", "Gamma", "Delta", "Epsilon"];

fn started(players: usize) -> GameState {
    let mut state = GameState::new(Settings::default());
    state.configure_and_start(players, &NAMES).unwrap();
    state
}

fn rng() -> SmallRng {
    SmallRng::seed_from_u64(9)
}

fn owned(level: u8) -> Holding {
    Holding {
        level,
        mortgaged: false,
    }
}

#[test]
fn scenario_a_unaffordable_tax_eliminates() {
    let mut state = started(3);
    state.players[0].balance = 500;
    state.players[0].holdings.insert(1, owned(1));

    // 0 -> 4, the VAT cell charging 2000
    state.roll_dice(DiceRoll::new(1, 3), &mut rng()).unwrap();

    let player = &state.players[0];
    assert!(player.is_bankrupt);
    assert_eq!(player.balance, 0);
    assert!(player.holdings.is_empty());
    assert_eq!(state.owner_of(1), None);

    // The turn moved on by itself
    assert_eq!(state.current_player_index, 1);
    assert_eq!(state.phase, Phase::TurnStart);
    assert_eq!(state.turn, 2);
}

#[test]
fn scenario_b_upgrade_needs_the_whole_group() {
    let mut state = started(3);
    state.players[0].holdings.insert(1, owned(0));
    state.players[0].holdings.insert(3, owned(0));

    assert_eq!(
        state.upgrade(1),
        Err(GameError::MonopolyRequired(ChannelGroup::Search))
    );
    assert_eq!(state.players[0].level(1), 0);
    assert_eq!(state.players[0].balance, STARTING_BALANCE);

    state.players[0].holdings.insert(5, owned(0));
    state.upgrade(1).unwrap();

    assert_eq!(state.players[0].level(1), 1);
    assert_eq!(state.players[0].balance, STARTING_BALANCE - 500);
}

#[test]
fn scenario_c_double_releases_from_crisis() {
    let mut state = started(3);
    state.send_current_to_jail();

    state.roll_dice(DiceRoll::new(3, 3), &mut rng()).unwrap();

    let player = &state.players[0];
    assert!(!player.is_jailed);
    assert_eq!(player.jail_attempts, 0);
    assert_eq!(player.position, CRISIS_POSITION + 6);
    assert_eq!(state.phase, Phase::Action);
}

#[test]
fn scenario_d_third_attempt_pays_the_fee() {
    let mut state = started(3);
    state.send_current_to_jail();
    state.players[0].jail_attempts = 2;
    state.players[0].balance = 1_000;

    state.roll_dice(DiceRoll::new(1, 2), &mut rng()).unwrap();

    let player = &state.players[0];
    assert!(!player.is_bankrupt);
    assert!(!player.is_jailed);
    assert_eq!(player.balance, 0);
    assert_eq!(player.position, CRISIS_POSITION + 3);
    assert_eq!(state.phase, Phase::Action);
}

#[test]
fn scenario_e_last_solvent_player_wins() {
    let mut state = started(4);

    for seat in 0..3 {
        assert_eq!(state.current_player_index, seat);
        state.concede().unwrap();
    }

    assert_eq!(state.winner, Some(3));
    assert_eq!(state.phase, Phase::GameOver);
    assert!(state.players[..3].iter().all(|p| p.is_bankrupt));
}

#[test]
fn failed_crisis_attempt_ends_the_turn_in_place() {
    let mut state = started(3);
    state.send_current_to_jail();

    state.roll_dice(DiceRoll::new(1, 2), &mut rng()).unwrap();

    let player = &state.players[0];
    assert!(player.is_jailed);
    assert_eq!(player.jail_attempts, 1);
    assert_eq!(player.position, CRISIS_POSITION);
    assert_eq!(state.current_player_index, 1);
    assert_eq!(state.phase, Phase::TurnStart);
}

#[test]
fn unaffordable_crisis_fee_eliminates() {
    let mut state = started(3);
    state.send_current_to_jail();
    state.players[0].jail_attempts = 2;
    state.players[0].balance = 999;

    state.roll_dice(DiceRoll::new(1, 2), &mut rng()).unwrap();

    assert!(state.players[0].is_bankrupt);
    assert_eq!(state.players[0].balance, 0);
    assert_eq!(state.current_player_index, 1);
}

#[test]
fn landing_on_go_to_crisis_jails_and_ends_the_turn() {
    let mut state = started(3);
    state.players[0].position = 25;

    state.roll_dice(DiceRoll::new(2, 3), &mut rng()).unwrap();

    let player = &state.players[0];
    assert!(player.is_jailed);
    assert_eq!(player.jail_attempts, 0);
    assert_eq!(player.position, CRISIS_POSITION);
    assert_eq!(state.current_player_index, 1);
}

#[test]
fn rent_moves_from_visitor_to_owner() {
    let mut state = started(3);
    state.players[1].holdings.insert(3, owned(2));

    state.roll_dice(DiceRoll::new(1, 2), &mut rng()).unwrap();

    // 40 base rent at the level 2 multiplier of 3
    assert_eq!(state.players[0].balance, STARTING_BALANCE - 120);
    assert_eq!(state.players[1].balance, STARTING_BALANCE + 120);
}

#[test]
fn unaffordable_rent_gives_the_owner_what_is_left() {
    let mut state = started(3);
    state.players[0].position = 35;
    state.players[0].balance = 1_200;
    state.players[1].holdings.insert(39, owned(4));

    state.roll_dice(DiceRoll::new(2, 2), &mut rng()).unwrap();

    assert!(state.players[0].is_bankrupt);
    assert_eq!(state.players[0].balance, 0);
    assert_eq!(state.players[1].balance, STARTING_BALANCE + 1_200);
    assert_eq!(state.current_player_index, 1);
}

#[test]
fn rent_is_waived_for_jailed_owners_and_mortgaged_channels() {
    let mut state = started(3);
    state.players[1].holdings.insert(3, owned(0));
    state.players[1].is_jailed = true;
    state.players[2].holdings.insert(
        6,
        Holding {
            level: 3,
            mortgaged: true,
        },
    );

    state.roll_dice(DiceRoll::new(1, 2), &mut rng()).unwrap();
    assert_eq!(state.players[0].balance, STARTING_BALANCE);

    state.end_turn().unwrap();
    state.players[1].is_jailed = false;
    state.players[1].position = 3;
    state.roll_dice(DiceRoll::new(1, 2), &mut rng()).unwrap();
    assert_eq!(state.players[1].balance, STARTING_BALANCE);
}

#[test]
fn buying_the_current_cell() {
    let mut state = started(3);
    state.roll_dice(DiceRoll::new(1, 2), &mut rng()).unwrap();

    assert_eq!(state.buy(5), Err(GameError::InvalidTarget(5)));

    state.buy(3).unwrap();
    assert!(state.players[0].owns(3));
    assert_eq!(state.players[0].level(3), 0);
    assert_eq!(state.players[0].balance, STARTING_BALANCE - 600);

    assert_eq!(state.buy(3), Err(GameError::InvalidTarget(3)));
}

#[test]
fn rejected_purchase_only_adds_a_log_line() {
    let mut state = started(3);
    state.players[0].balance = 100;
    state.roll_dice(DiceRoll::new(1, 2), &mut rng()).unwrap();

    let players = state.players.clone();
    let log_len = state.log.len();

    assert_eq!(
        state.buy(3),
        Err(GameError::InsufficientFunds {
            required: 600,
            available: 100
        })
    );

    assert_eq!(state.players, players);
    assert_eq!(state.phase, Phase::Action);
    assert_eq!(state.log.len(), log_len + 1);
}

#[test]
fn selling_refunds_half_and_drops_levels() {
    let mut state = started(3);
    state.players[0].holdings.insert(39, owned(4));

    state.sell(39).unwrap();

    assert_eq!(state.players[0].balance, STARTING_BALANCE + 2_000);
    assert!(!state.players[0].owns(39));
    assert_eq!(state.owner_of(39), None);

    assert_eq!(state.sell(39), Err(GameError::InvalidTarget(39)));
}

#[test]
fn upgrade_stops_at_the_maximum_level() {
    let mut state = started(3);
    for cell in [1, 3, 5] {
        state.players[0].holdings.insert(cell, owned(5));
    }

    assert_eq!(state.upgrade(1), Err(GameError::MaxLevel(1)));
}

#[test]
fn upgrade_without_uniform_build_skips_the_monopoly_check() {
    let mut state = GameState::new(Settings {
        time_limit_minutes: 60,
        uniform_build: false,
    });
    state.configure_and_start(3, &NAMES).unwrap();
    state.players[0].holdings.insert(39, owned(0));

    state.upgrade(39).unwrap();
    assert_eq!(state.players[0].level(39), 1);
}

#[test]
fn upgrading_someone_elses_channel_is_rejected() {
    let mut state = started(3);
    state.players[1].holdings.insert(1, owned(0));

    assert_eq!(state.upgrade(1), Err(GameError::InvalidTarget(1)));
    assert_eq!(state.upgrade(0), Err(GameError::InvalidTarget(0)));
}

#[test]
fn pending_card_blocks_the_end_of_the_turn() {
    let mut state = started(3);
    state.phase = Phase::Action;
    state.pending_card = Some(5);

    assert_eq!(state.end_turn(), Err(GameError::CardPending));

    state.apply_card().unwrap();
    assert_eq!(state.players[0].balance, STARTING_BALANCE + 1_500);
    assert_eq!(state.pending_card, None);

    state.end_turn().unwrap();
    assert_eq!(state.current_player_index, 1);
    assert_eq!(
        state.apply_card(),
        Err(GameError::InvalidPhase {
            intent: "apply card",
            phase: Phase::TurnStart,
        })
    );
}

#[test]
fn card_that_would_leave_a_negative_balance_eliminates() {
    let mut state = started(3);
    state.phase = Phase::Action;
    state.pending_card = Some(4);
    state.players[0].balance = 500;

    state.apply_card().unwrap();

    assert!(state.players[0].is_bankrupt);
    assert_eq!(state.players[0].balance, 0);
    assert_eq!(state.current_player_index, 1);
}

#[test]
fn anti_crisis_card_frees_the_player_before_rolling() {
    let mut state = started(3);
    state.send_current_to_jail();

    assert_eq!(state.use_anti_crisis(), Err(GameError::NoAntiCrisis));

    state.players[0].has_anti_crisis = true;
    state.use_anti_crisis().unwrap();

    assert!(!state.players[0].is_jailed);
    assert!(!state.players[0].has_anti_crisis);

    state.roll_dice(DiceRoll::new(1, 2), &mut rng()).unwrap();
    assert_eq!(state.players[0].position, CRISIS_POSITION + 3);
    assert_eq!(
        state.use_anti_crisis(),
        Err(GameError::InvalidPhase {
            intent: "use anti-crisis",
            phase: Phase::Action,
        })
    );
}

#[test]
fn time_limit_ends_the_game_on_the_next_intent() {
    let mut state = GameState::new(Settings {
        time_limit_minutes: 0,
        uniform_build: true,
    });
    state.configure_and_start(3, &NAMES).unwrap();
    state.players[2].balance += 10_000;

    state.roll_dice(DiceRoll::new(1, 2), &mut rng()).unwrap();

    assert_eq!(state.phase, Phase::GameOver);
    assert_eq!(state.winner, Some(2));
    assert!(state.log[0].message.contains("Time is up"));
}

#[test]
fn nothing_changes_after_the_game_is_over() {
    let mut state = started(3);
    state.concede().unwrap();
    state.concede().unwrap();
    assert_eq!(state.phase, Phase::GameOver);

    let players = state.players.clone();

    assert!(matches!(
        state.roll_dice(DiceRoll::new(1, 1), &mut rng()),
        Err(GameError::InvalidPhase { .. })
    ));
    assert!(matches!(state.sell(1), Err(GameError::InvalidPhase { .. })));
    assert!(matches!(state.concede(), Err(GameError::InvalidPhase { .. })));
    assert_eq!(state.players, players);
    assert_eq!(evaluate(&state, state.started_at), None);
}

#[test]
fn dice_outside_one_to_six_are_rejected() {
    let mut state = started(3);
    state.players[0].position = 20;

    for (first, second) in [(20, 20), (200, 100), (0, 0), (0, 3), (3, 7)] {
        let log_len = state.log.len();

        assert_eq!(
            state.roll_dice(DiceRoll::new(first, second), &mut rng()),
            Err(GameError::InvalidDice { first, second })
        );
        assert_eq!(state.log.len(), log_len + 1);
    }

    let player = &state.players[0];
    assert_eq!(player.position, 20);
    assert_eq!(player.balance, STARTING_BALANCE);
    assert_eq!(state.phase, Phase::TurnStart);

    // A jailed player can't escape on a pair of zeroes
    state.send_current_to_jail();
    assert!(state.roll_dice(DiceRoll::new(0, 0), &mut rng()).is_err());
    assert!(state.players[0].is_jailed);

    state.roll_dice(DiceRoll::new(6, 6), &mut rng()).unwrap();
    assert_eq!(state.players[0].position, CRISIS_POSITION + 12);
}
