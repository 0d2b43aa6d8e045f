//! Integration tests for the lucky draw.
//!
//! The contract is driven through its `instantiate` / `execute` / `query`
//! entry points with `cosmwasm_std::testing` mocks, covering a whole prize
//! event from the lowest prize down to the grand prize. The engine-level
//! tests at the bottom exercise `lucky_draw_common` directly.
//!
//! Run:
//! ```bash
//! cargo test -p lucky-draw-integration-tests
//! ```

use cosmwasm_std::testing::{message_info, mock_dependencies, mock_env, MockApi, MockQuerier};
use cosmwasm_std::{from_json, Env, MemoryStorage, OwnedDeps};
use lucky_draw::contract::{execute, instantiate, query};
use lucky_draw::error::ContractError;
use lucky_draw::msg::{
    DrawStateResponse, ExecuteMsg, InstantiateMsg, QueryMsg, SpinHistoryResponse, WinnersResponse,
};
use lucky_draw::state::SpinKind;
use lucky_draw_common::{
    DrawConfig, DrawEngine, DrawError, DrawState, PrizeSchedule, PrizeTierEntry, Randomizer,
    SeededRandomizer, TierGrouping, TierThreshold,
};

type Deps = OwnedDeps<MemoryStorage, MockApi, MockQuerier>;

// ─── Helpers ───

fn thresholds() -> Vec<TierThreshold> {
    [(10, "GRAND SET"), (50, "SEMI GRAND SET"), (100, "SET 2"), (150, "SET 1")]
        .iter()
        .map(|(max_number, label)| TierThreshold {
            max_number: *max_number,
            label: label.to_string(),
        })
        .collect()
}

fn prizes() -> Vec<PrizeTierEntry> {
    vec![
        PrizeTierEntry {
            number: 1,
            title: "GRAND PRIZE".to_string(),
            reward_description: "Honda City".to_string(),
            image_ref: Some("car.png".to_string()),
        },
        PrizeTierEntry {
            number: 2,
            title: "SECOND PRIZE".to_string(),
            reward_description: "Gold bar 10 baht".to_string(),
            image_ref: Some("goldbar.png".to_string()),
        },
        PrizeTierEntry {
            number: 150,
            title: "SET 1".to_string(),
            reward_description: "Gift voucher".to_string(),
            image_ref: None,
        },
    ]
}

fn guests(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("Guest {:03}", i)).collect()
}

fn instantiate_msg(names: Vec<String>) -> InstantiateMsg {
    let mock_api = MockApi::default();
    InstantiateMsg {
        operator: mock_api.addr_make("operator").to_string(),
        initial_prize_number: 150,
        min_prize_number: Some(1),
        grand_prize_start_no: 10,
        batch_size: Some(10),
        tier_thresholds: thresholds(),
        prizes: prizes(),
        max_reel_items: Some(40),
        remove_winner: None,
        image_base: Some("assets/images/prize".to_string()),
        names,
    }
}

fn setup(names: Vec<String>) -> Deps {
    let mut deps = mock_dependencies();
    let admin = deps.api.addr_make("admin");
    instantiate(
        deps.as_mut(),
        mock_env(),
        message_info(&admin, &[]),
        instantiate_msg(names),
    )
    .unwrap();
    deps
}

/// Each spin lands in its own block.
fn block_env(height_offset: u64) -> Env {
    let mut env = mock_env();
    env.block.height += height_offset;
    env.block.time = env.block.time.plus_seconds(height_offset * 5);
    env
}

fn spin(deps: &mut Deps, step: u64, redraw: bool) -> Result<cosmwasm_std::Response, ContractError> {
    let operator = deps.api.addr_make("operator");
    execute(
        deps.as_mut(),
        block_env(step),
        message_info(&operator, &[]),
        ExecuteMsg::Spin {
            entropy_hex: hex::encode(step.to_be_bytes()),
            redraw: Some(redraw),
        },
    )
}

fn draw_state(deps: &Deps) -> DrawStateResponse {
    from_json(query(deps.as_ref(), mock_env(), QueryMsg::DrawState {}).unwrap()).unwrap()
}

fn all_rounds(deps: &Deps) -> WinnersResponse {
    from_json(
        query(
            deps.as_ref(),
            mock_env(),
            QueryMsg::Winners {
                start_after: None,
                limit: Some(100),
            },
        )
        .unwrap(),
    )
    .unwrap()
}

// ────────────────────────────────────────────────────────────────────────────
// Contract flows
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn test_full_event_cycle() {
    let mut deps = setup(guests(200));

    // 14 batches (150..11) then 10 singles (10..1).
    for step in 0..24u64 {
        let before = draw_state(&deps);
        assert!(before.can_draw);
        spin(&mut deps, step, false).unwrap();
        let after = draw_state(&deps);
        let expected_drop = if before.current_prize_number > 10 { 10 } else { 1 };
        assert_eq!(
            before.current_prize_number - after.current_prize_number,
            expected_drop
        );
    }

    let view = draw_state(&deps);
    assert_eq!(view.current_prize_number, 0);
    assert_eq!(view.total_winners, 150);
    assert_eq!(view.total_rounds, 15);
    assert_eq!(view.remaining_names, 50);
    assert!(!view.can_draw);
    assert!(view.next.is_none());

    let rounds = all_rounds(&deps);
    assert_eq!(rounds.total_rounds, 15);
    let labels: Vec<&str> = rounds.rounds.iter().map(|r| r.round.label.as_str()).collect();
    assert_eq!(labels[0], "SET 1");
    assert_eq!(labels[5], "SET 2");
    assert_eq!(labels[10], "SEMI GRAND SET");
    assert_eq!(labels[14], "GRAND SET");

    let grand = &rounds.rounds[14].round;
    assert_eq!(grand.winners.len(), 10);
    let numbers: Vec<u32> = grand.winners.iter().map(|w| w.number).collect();
    assert_eq!(numbers, (1..=10).rev().collect::<Vec<_>>());
    assert_eq!(grand.winners[9].image_ref, "assets/images/prize/car.png");
    assert_eq!(grand.winners[9].reward_description, "Honda City");

    // Every prize went to a different guest.
    let mut names: Vec<&String> = rounds
        .rounds
        .iter()
        .flat_map(|r| r.round.winners.iter().map(|w| &w.name))
        .collect();
    names.sort();
    names.dedup();
    assert_eq!(names.len(), 150);

    let err = spin(&mut deps, 99, false).unwrap_err();
    assert!(matches!(
        err,
        ContractError::Draw(DrawError::PrizesExhausted { cursor: 0, min: 1 })
    ));

    let history: SpinHistoryResponse = from_json(
        query(
            deps.as_ref(),
            mock_env(),
            QueryMsg::SpinHistory {
                start_after: None,
                limit: Some(100),
            },
        )
        .unwrap(),
    )
    .unwrap();
    assert_eq!(history.spins.len(), 24);
    assert!(history.spins.iter().all(|s| s.kind == SpinKind::Spin));
    assert!(history.spins[13].round_closed);
    assert!(!history.spins[14].round_closed);
    assert!(history.spins[23].round_closed);

    eprintln!("test_full_event_cycle passed");
}

#[test]
fn test_redraw_inside_grand_round() {
    let mut deps = setup(guests(200));
    for step in 0..16u64 {
        spin(&mut deps, step, false).unwrap();
    }
    // Batches done, 10 and 9 drawn.
    let view = draw_state(&deps);
    assert_eq!(view.current_prize_number, 8);
    let names_before = view.remaining_names;

    let res = spin(&mut deps, 16, true).unwrap();
    let redraw_event = res.events.iter().find(|e| e.ty == "lucky_redraw").unwrap();
    assert!(redraw_event
        .attributes
        .iter()
        .any(|a| a.key == "prize_numbers" && a.value == "9"));

    let view = draw_state(&deps);
    assert_eq!(view.current_prize_number, 8);
    assert_eq!(view.total_winners, 142);
    // The redrawn guest is not put back.
    assert_eq!(view.remaining_names, names_before - 1);

    let rounds = all_rounds(&deps);
    let grand = &rounds.rounds[14].round;
    assert_eq!(grand.winners.len(), 2);
    assert_eq!(grand.winners[1].number, 9);

    // Only one level of undo.
    let operator = deps.api.addr_make("operator");
    execute(
        deps.as_mut(),
        block_env(17),
        message_info(&operator, &[]),
        ExecuteMsg::UndoLastDraw {},
    )
    .unwrap();
    let err = execute(
        deps.as_mut(),
        block_env(18),
        message_info(&operator, &[]),
        ExecuteMsg::UndoLastDraw {},
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ContractError::Draw(DrawError::InvalidRedraw { .. })
    ));

    let view = draw_state(&deps);
    assert_eq!(view.current_prize_number, 9);
    assert_eq!(all_rounds(&deps).rounds[14].round.winners.len(), 1);

    // Drawing resumes at 9.
    spin(&mut deps, 19, false).unwrap();
    assert_eq!(draw_state(&deps).current_prize_number, 8);
}

#[test]
fn test_roster_swap_mid_event() {
    let mut deps = setup(guests(12));
    spin(&mut deps, 0, false).unwrap();
    assert_eq!(draw_state(&deps).remaining_names, 2);

    // Only two left: the next batch hands out two prizes and empties the pool.
    spin(&mut deps, 1, false).unwrap();
    let view = draw_state(&deps);
    assert_eq!(view.remaining_names, 0);
    assert_eq!(view.current_prize_number, 130);
    assert!(matches!(
        spin(&mut deps, 2, false).unwrap_err(),
        ContractError::Draw(DrawError::EmptyPool)
    ));

    let operator = deps.api.addr_make("operator");
    execute(
        deps.as_mut(),
        block_env(3),
        message_info(&operator, &[]),
        ExecuteMsg::SetRoster {
            text: (200..230)
                .map(|i| format!("Guest {}", i))
                .collect::<Vec<_>>()
                .join("\n"),
        },
    )
    .unwrap();

    let view = draw_state(&deps);
    assert_eq!(view.remaining_names, 30);
    assert_eq!(view.current_prize_number, 130);
    assert_eq!(view.total_winners, 12);
    assert!(!view.has_previous_winner);

    spin(&mut deps, 4, false).unwrap();
    assert_eq!(draw_state(&deps).current_prize_number, 120);
}

// ────────────────────────────────────────────────────────────────────────────
// Engine properties
// ────────────────────────────────────────────────────────────────────────────

fn engine_config(initial: u32, grand: u32) -> DrawConfig {
    DrawConfig {
        initial_prize_number: initial,
        min_prize_number: 1,
        grouping: TierGrouping {
            grand_prize_start_no: grand,
            batch_size: 10,
            thresholds: thresholds(),
        },
        max_reel_items: 30,
        image_base: None,
    }
}

fn engine(initial: u32, grand: u32, seed: u8, names: Vec<String>) -> DrawEngine<SeededRandomizer> {
    let schedule = PrizeSchedule::new(prizes()).unwrap();
    let mut engine =
        DrawEngine::new(engine_config(initial, grand), schedule, SeededRandomizer::new([seed; 32]))
            .unwrap();
    engine.set_names(names);
    engine
}

#[test]
fn test_single_draw_from_three_names() {
    for seed in 0..10u8 {
        let pool: Vec<String> = ["A", "B", "C"].iter().map(|s| s.to_string()).collect();
        let mut engine = engine(3, 10, seed, pool.clone());
        let outcome = engine.spin(false).unwrap();

        assert_eq!(engine.names().len(), 2);
        assert!(pool.contains(&outcome.winners[0].name));
        assert!(!engine.names().contains(&outcome.winners[0].name));
        assert_eq!(engine.ledger().rounds().len(), 1);
        assert_eq!(engine.ledger().rounds()[0].winners.len(), 1);
        assert_eq!(engine.ledger().rounds()[0].winners[0].number, 3);
        assert_eq!(engine.current_prize_number(), 2);
    }
}

#[test]
fn test_undo_is_inverse_of_every_forward_draw() {
    // Undo does not return names, so every prize costs two guests.
    let mut engine = engine(150, 10, 7, guests(400));
    while engine.can_draw() {
        let ledger = engine.ledger().clone();
        let cursor = engine.current_prize_number();

        engine.spin(false).unwrap();
        engine.undo_last_draw().unwrap();
        assert_eq!(engine.ledger(), &ledger);
        assert_eq!(engine.current_prize_number(), cursor);

        engine.spin(false).unwrap();
    }
    assert_eq!(engine.ledger().total_winners(), 150);
}

#[test]
fn test_redraw_keeps_ledger_shape() {
    let mut engine = engine(38, 8, 9, guests(100));
    while engine.can_draw() {
        engine.spin(false).unwrap();
        let rounds = engine.ledger().rounds().len();
        let total = engine.ledger().total_winners();
        let cursor = engine.current_prize_number();

        engine.spin(true).unwrap();
        assert_eq!(engine.ledger().rounds().len(), rounds);
        assert_eq!(engine.ledger().total_winners(), total);
        assert_eq!(engine.current_prize_number(), cursor);
    }
    let rounds = engine.ledger().rounds();
    assert_eq!(rounds.len(), 4);
    assert_eq!(rounds[3].winners.len(), 8);
}

#[test]
fn test_restore_from_persisted_state() {
    let mut first = engine(60, 10, 11, guests(80));
    for _ in 0..3 {
        first.spin(false).unwrap();
    }
    let json = serde_json::to_string(first.state()).unwrap();
    let state: DrawState = serde_json::from_str(&json).unwrap();

    let schedule = PrizeSchedule::new(prizes()).unwrap();
    let mut resumed = DrawEngine::new(engine_config(60, 10), schedule, SeededRandomizer::new([12; 32]))
        .unwrap()
        .with_state(state)
        .unwrap();
    assert_eq!(resumed.current_prize_number(), 30);

    while resumed.can_draw() {
        resumed.spin(false).unwrap();
    }
    assert_eq!(resumed.ledger().total_winners(), 60);
    assert_eq!(resumed.names().len(), 20);
}

#[test]
fn test_shuffle_is_permutation() {
    let mut rng = SeededRandomizer::from_entropy(&[b"permutation"]);
    for size in [0usize, 1, 2, 7, 64] {
        let input: Vec<u32> = (0..size as u32).map(|i| i % 5).collect();
        let mut output = rng.shuffle(&input);
        let mut sorted = input.clone();
        sorted.sort_unstable();
        output.sort_unstable();
        assert_eq!(output, sorted);
    }
}
