use cosmwasm_std::{entry_point, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult};
use cw2::{get_contract_version, set_contract_version};
use lucky_draw_common::{clean_names, DrawConfig, DrawState, PrizeSchedule, TierGrouping};

use crate::error::ContractError;
use crate::execute;
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg, UpdateConfigParams};
use crate::query;
use crate::state::{LuckyDrawConfig, CONFIG, DRAW_STATE, NEXT_SPIN_ID, SCHEDULE};

const CONTRACT_NAME: &str = "crates.io:lucky-draw";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_MIN_PRIZE_NUMBER: u32 = 1;
const DEFAULT_BATCH_SIZE: u32 = 10;
const DEFAULT_MAX_REEL_ITEMS: u32 = 30;

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let max_reel_items = msg.max_reel_items.unwrap_or(DEFAULT_MAX_REEL_ITEMS);
    execute::validate_reel_length(max_reel_items)?;

    let draw = DrawConfig {
        initial_prize_number: msg.initial_prize_number,
        min_prize_number: msg.min_prize_number.unwrap_or(DEFAULT_MIN_PRIZE_NUMBER),
        grouping: TierGrouping {
            grand_prize_start_no: msg.grand_prize_start_no,
            batch_size: msg.batch_size.unwrap_or(DEFAULT_BATCH_SIZE),
            thresholds: msg.tier_thresholds,
        },
        max_reel_items,
        image_base: msg.image_base.filter(|base| !base.is_empty()),
    };
    draw.validate()?;

    let schedule = PrizeSchedule::new(msg.prizes)?;

    let mut state = DrawState::new(&draw);
    state.names = clean_names(msg.names);
    state.remove_winner = msg.remove_winner.unwrap_or(true);

    let config = LuckyDrawConfig {
        admin: info.sender.clone(),
        operator: deps.api.addr_validate(&msg.operator)?,
        draw,
    };

    CONFIG.save(deps.storage, &config)?;
    SCHEDULE.save(deps.storage, &schedule)?;
    DRAW_STATE.save(deps.storage, &state)?;
    NEXT_SPIN_ID.save(deps.storage, &0u64)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "lucky-draw")
        .add_attribute("admin", info.sender.to_string())
        .add_attribute("initial_prize_number", config.draw.initial_prize_number.to_string())
        .add_attribute("prizes", schedule.len().to_string())
        .add_attribute("names", state.names.len().to_string()))
}

#[entry_point]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::SetNames { names } => execute::set_names(deps, env, info, names),
        ExecuteMsg::SetRoster { text } => execute::set_roster(deps, env, info, text),
        ExecuteMsg::SetRemoveWinner { remove_winner } => {
            execute::set_remove_winner(deps, env, info, remove_winner)
        }
        ExecuteMsg::Spin {
            entropy_hex,
            redraw,
        } => execute::spin(deps, env, info, entropy_hex, redraw.unwrap_or(false)),
        ExecuteMsg::UndoLastDraw {} => execute::undo_last_draw(deps, env, info),
        ExecuteMsg::UpdateConfig {
            operator,
            max_reel_items,
            tier_thresholds,
            image_base,
        } => execute::update_config(
            deps,
            env,
            info,
            UpdateConfigParams {
                operator,
                max_reel_items,
                tier_thresholds,
                image_base,
            },
        ),
    }
}

#[entry_point]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => query::query_config(deps),
        QueryMsg::DrawState {} => query::query_draw_state(deps),
        QueryMsg::Names {} => query::query_names(deps),
        QueryMsg::Winners { start_after, limit } => query::query_winners(deps, start_after, limit),
        QueryMsg::CurrentRound {} => query::query_current_round(deps),
        QueryMsg::Tier { number } => query::query_tier(deps, number),
        QueryMsg::Prize { number } => query::query_prize(deps, number),
        QueryMsg::Spin { spin_id } => query::query_spin(deps, spin_id),
        QueryMsg::SpinHistory { start_after, limit } => {
            query::query_spin_history(deps, start_after, limit)
        }
    }
}

#[entry_point]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let stored = get_contract_version(deps.storage)?;
    if stored.contract != CONTRACT_NAME {
        return Err(ContractError::Unauthorized {
            reason: "Cannot migrate from different contract type".to_string(),
        });
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("from_version", stored.version)
        .add_attribute("to_version", CONTRACT_VERSION))
}
