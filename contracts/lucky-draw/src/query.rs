use cosmwasm_std::{to_json_binary, Binary, Deps, Order, StdResult};
use cw_storage_plus::Bound;

use crate::msg::{
    DrawStateResponse, IndexedRound, NamesResponse, SpinHistoryResponse, WinnersResponse,
};
use crate::state::{CONFIG, DRAW_STATE, SCHEDULE, SPINS};

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_draw_state(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    let schedule = SCHEDULE.load(deps.storage)?;
    let state = DRAW_STATE.load(deps.storage)?;

    let min = config.draw.min_prize_number;
    let cursor = state.current_prize_number;
    let next = if cursor >= min {
        Some(schedule.describe(&config.draw.grouping, cursor))
    } else {
        None
    };

    to_json_binary(&DrawStateResponse {
        current_prize_number: cursor,
        remaining_names: state.names.len() as u32,
        remove_winner: state.remove_winner,
        has_previous_winner: state.has_previous_winner,
        total_rounds: state.ledger.rounds().len() as u32,
        total_winners: state.ledger.total_winners() as u32,
        can_draw: !state.names.is_empty() && cursor >= min,
        can_redraw: !state.ledger.is_empty() && state.last_draw.is_some(),
        next,
    })
}

pub fn query_names(deps: Deps) -> StdResult<Binary> {
    let state = DRAW_STATE.load(deps.storage)?;
    to_json_binary(&NamesResponse { names: state.names })
}

pub fn query_winners(
    deps: Deps,
    start_after: Option<u32>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let limit = limit.unwrap_or(20).min(100) as usize;
    let start = start_after
        .map(|i| (i as usize).saturating_add(1))
        .unwrap_or(0);

    let state = DRAW_STATE.load(deps.storage)?;
    let total_rounds = state.ledger.rounds().len() as u32;
    let rounds: Vec<IndexedRound> = state
        .ledger
        .rounds()
        .iter()
        .enumerate()
        .skip(start)
        .take(limit)
        .map(|(index, round)| IndexedRound {
            index: index as u32,
            round: round.clone(),
        })
        .collect();

    to_json_binary(&WinnersResponse {
        rounds,
        total_rounds,
    })
}

pub fn query_current_round(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    let state = DRAW_STATE.load(deps.storage)?;
    let round = state
        .ledger
        .current_open_round(config.draw.min_prize_number)
        .cloned();
    to_json_binary(&round)
}

pub fn query_tier(deps: Deps, number: u32) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    let schedule = SCHEDULE.load(deps.storage)?;
    to_json_binary(&schedule.describe(&config.draw.grouping, number))
}

pub fn query_prize(deps: Deps, number: u32) -> StdResult<Binary> {
    let schedule = SCHEDULE.load(deps.storage)?;
    to_json_binary(&schedule.entry(number).ok())
}

pub fn query_spin(deps: Deps, spin_id: u64) -> StdResult<Binary> {
    let spin = SPINS.load(deps.storage, spin_id)?;
    to_json_binary(&spin)
}

pub fn query_spin_history(
    deps: Deps,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let limit = limit.unwrap_or(20).min(100) as usize;
    let start = start_after.map(Bound::exclusive);

    let spins: Vec<_> = SPINS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .filter_map(|r| r.ok())
        .map(|(_, spin)| spin)
        .collect();

    to_json_binary(&SpinHistoryResponse { spins })
}
