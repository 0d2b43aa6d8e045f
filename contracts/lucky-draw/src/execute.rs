use cosmwasm_std::{DepsMut, Env, MessageInfo, Response, Storage};
use lucky_draw_common::{clean_names, parse_roster, DrawEngine, SeededRandomizer};

use crate::error::ContractError;
use crate::hooks::{EventLog, StateSink};
use crate::msg::UpdateConfigParams;
use crate::state::{
    LuckyDrawConfig, SpinKind, SpinRecord, CONFIG, DRAW_STATE, NEXT_SPIN_ID, SCHEDULE, SPINS,
};

pub const MIN_REEL_ITEMS: u32 = 1;
pub const MAX_REEL_ITEMS: u32 = 500;

type HostedEngine<'a> = DrawEngine<SeededRandomizer, EventLog, StateSink<'a>>;

pub fn validate_reel_length(value: u32) -> Result<(), ContractError> {
    if !(MIN_REEL_ITEMS..=MAX_REEL_ITEMS).contains(&value) {
        return Err(ContractError::InvalidReelLength {
            value,
            min: MIN_REEL_ITEMS,
            max: MAX_REEL_ITEMS,
        });
    }
    Ok(())
}

fn ensure_operator(config: &LuckyDrawConfig, info: &MessageInfo, action: &str) -> Result<(), ContractError> {
    if info.sender != config.operator && info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: format!("only operator can {}", action),
        });
    }
    Ok(())
}

/// Seed = sha256( entropy || block_height_be || block_time_nanos_be || spin_id_be )
fn block_randomizer(env: &Env, spin_id: u64, entropy: &[u8]) -> SeededRandomizer {
    SeededRandomizer::from_entropy(&[
        entropy,
        &env.block.height.to_be_bytes(),
        &env.block.time.nanos().to_be_bytes(),
        &spin_id.to_be_bytes(),
    ])
}

fn load_engine<'a>(
    storage: &'a mut dyn Storage,
    randomizer: SeededRandomizer,
) -> Result<HostedEngine<'a>, ContractError> {
    let config = CONFIG.load(storage)?;
    let schedule = SCHEDULE.load(storage)?;
    let state = DRAW_STATE.load(storage)?;

    let engine = DrawEngine::new(config.draw, schedule, randomizer)?
        .with_state(state)?
        .with_listener(EventLog::default())
        .with_sink(StateSink::new(storage));
    Ok(engine)
}

/// Hands the collected events back once the sink has flushed cleanly.
fn finish_engine(engine: HostedEngine<'_>) -> Result<EventLog, ContractError> {
    let (_, log, sink) = engine.into_parts();
    sink.finish()?;
    Ok(log)
}

fn decode_entropy(entropy_hex: &str) -> Result<Vec<u8>, ContractError> {
    let entropy = hex::decode(entropy_hex).map_err(|_| ContractError::InvalidHex {
        field: "entropy_hex".to_string(),
    })?;
    if entropy.is_empty() {
        return Err(ContractError::EmptyEntropy);
    }
    Ok(entropy)
}

fn peek_spin_id(storage: &dyn Storage) -> Result<u64, ContractError> {
    Ok(NEXT_SPIN_ID.may_load(storage)?.unwrap_or(0))
}

/// Appends to the history and claims the id. Only called after the engine succeeded.
fn record_spin(storage: &mut dyn Storage, record: &SpinRecord) -> Result<(), ContractError> {
    SPINS.save(storage, record.id, record)?;
    NEXT_SPIN_ID.save(storage, &(record.id + 1))?;
    Ok(())
}

/// Replace the candidate pool. Operator only.
/// Names are trimmed and blanks dropped. Cursor and winner ledger are untouched.
pub fn set_names(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    names: Vec<String>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_operator(&config, &info, "change the name list")?;

    let names = clean_names(names);
    let count = names.len();
    let mut engine = load_engine(deps.storage, block_randomizer(&env, 0, b"roster"))?;
    engine.set_names(names);
    let log = finish_engine(engine)?;

    Ok(Response::new()
        .add_attribute("action", "set_names")
        .add_attribute("count", count.to_string())
        .add_events(log.into_events()))
}

/// Replace the candidate pool from roster text, one name per line.
pub fn set_roster(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    text: String,
) -> Result<Response, ContractError> {
    set_names(deps, env, info, parse_roster(&text))
}

pub fn set_remove_winner(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    remove_winner: bool,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_operator(&config, &info, "change winner removal")?;

    let mut engine = load_engine(deps.storage, block_randomizer(&env, 0, b"settings"))?;
    engine.set_remove_winner(remove_winner);
    finish_engine(engine)?;

    Ok(Response::new()
        .add_attribute("action", "set_remove_winner")
        .add_attribute("remove_winner", remove_winner.to_string()))
}

/// Draw the next round. Operator only.
///
/// 1. Decode operator entropy and derive the shuffle seed from it and the block
/// 2. Restore the engine from storage and run the spin (optionally as a redraw)
/// 3. The engine's sink writes the new pool/ledger/cursor back
/// 4. Append the spin to the audit history and claim its id
pub fn spin(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    entropy_hex: String,
    redraw: bool,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_operator(&config, &info, "spin")?;

    let entropy = decode_entropy(&entropy_hex)?;
    let spin_id = peek_spin_id(deps.storage)?;
    let randomizer = block_randomizer(&env, spin_id, &entropy);
    let seed = randomizer.seed_hex();

    let mut engine = load_engine(deps.storage, randomizer)?;
    let outcome = engine.spin(redraw)?;
    let log = finish_engine(engine)?;

    let kind = if redraw { SpinKind::Redraw } else { SpinKind::Spin };
    let record = SpinRecord {
        id: spin_id,
        kind,
        prize_number: outcome.prize_number,
        label: outcome.label.clone(),
        winners: outcome.winners.clone(),
        round_closed: outcome.round_closed,
        seed: Some(seed.clone()),
        created_at: env.block.time,
        block_height: env.block.height,
    };
    record_spin(deps.storage, &record)?;

    Ok(Response::new()
        .add_attribute("action", if redraw { "redraw" } else { "spin" })
        .add_attribute("spin_id", spin_id.to_string())
        .add_attribute("prize_number", outcome.prize_number.to_string())
        .add_attribute("winner_count", outcome.winners.len().to_string())
        .add_attribute("seed", seed)
        .add_events(log.into_events()))
}

/// Reverse the previous draw without drawing again. Operator only.
pub fn undo_last_draw(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_operator(&config, &info, "undo a draw")?;

    let spin_id = peek_spin_id(deps.storage)?;
    let mut engine = load_engine(deps.storage, block_randomizer(&env, spin_id, b"undo"))?;
    let undone = engine.undo_last_draw()?;
    let prize_number = engine.current_prize_number();
    let label = engine.describe(prize_number).label;
    let log = finish_engine(engine)?;

    let record = SpinRecord {
        id: spin_id,
        kind: SpinKind::Undo,
        prize_number,
        label,
        winners: undone.clone(),
        round_closed: false,
        seed: None,
        created_at: env.block.time,
        block_height: env.block.height,
    };
    record_spin(deps.storage, &record)?;

    Ok(Response::new()
        .add_attribute("action", "undo_last_draw")
        .add_attribute("spin_id", spin_id.to_string())
        .add_attribute("prize_number", prize_number.to_string())
        .add_attribute("undone_count", undone.len().to_string())
        .add_events(log.into_events()))
}

/// Update configuration. Admin only.
pub fn update_config(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    params: UpdateConfigParams,
) -> Result<Response, ContractError> {
    let UpdateConfigParams {
        operator,
        max_reel_items,
        tier_thresholds,
        image_base,
    } = params;

    let mut config = CONFIG.load(deps.storage)?;

    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can update config".to_string(),
        });
    }

    if let Some(op) = operator {
        config.operator = deps.api.addr_validate(&op)?;
    }
    if let Some(items) = max_reel_items {
        validate_reel_length(items)?;
        config.draw.max_reel_items = items;
    }
    if let Some(thresholds) = tier_thresholds {
        config.draw.grouping.thresholds = thresholds;
    }
    if let Some(base) = image_base {
        config.draw.image_base = if base.is_empty() { None } else { Some(base) };
    }
    config.draw.validate()?;

    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new().add_attribute("action", "update_config"))
}
