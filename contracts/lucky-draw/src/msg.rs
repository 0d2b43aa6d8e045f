use cosmwasm_schema::{cw_serde, QueryResponses};
use lucky_draw_common::{PrizeTierEntry, Round, TierInfo, TierThreshold};

use crate::state::{LuckyDrawConfig, SpinRecord};

#[cw_serde]
pub struct InstantiateMsg {
    pub operator: String,
    /// First prize number drawn; the draw counts down from here.
    pub initial_prize_number: u32,
    /// Defaults to 1.
    pub min_prize_number: Option<u32>,
    /// Prize numbers at or below this are drawn one winner at a time.
    pub grand_prize_start_no: u32,
    /// Winners per round above the grand-prize start. Defaults to 10.
    pub batch_size: Option<u32>,
    pub tier_thresholds: Vec<TierThreshold>,
    pub prizes: Vec<PrizeTierEntry>,
    /// Defaults to 30.
    pub max_reel_items: Option<u32>,
    /// Defaults to true.
    pub remove_winner: Option<bool>,
    pub image_base: Option<String>,
    pub names: Vec<String>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Replace the candidate pool. Operator only.
    SetNames { names: Vec<String> },
    /// Replace the candidate pool from newline-separated text. Operator only.
    SetRoster { text: String },
    /// Toggle removal of winners from the pool. Operator only.
    SetRemoveWinner { remove_winner: bool },
    /// Draw the next round. With `redraw` the previous draw is reversed and
    /// drawn again. Operator only.
    Spin {
        /// Operator-supplied entropy (hex-encoded), mixed with block data.
        entropy_hex: String,
        redraw: Option<bool>,
    },
    /// Reverse the previous draw without drawing again. Operator only.
    UndoLastDraw {},
    /// Update configuration. Admin only.
    UpdateConfig {
        operator: Option<String>,
        max_reel_items: Option<u32>,
        tier_thresholds: Option<Vec<TierThreshold>>,
        image_base: Option<String>,
    },
}

#[cw_serde]
pub struct MigrateMsg {}

/// Unpacked `ExecuteMsg::UpdateConfig`.
pub struct UpdateConfigParams {
    pub operator: Option<String>,
    pub max_reel_items: Option<u32>,
    pub tier_thresholds: Option<Vec<TierThreshold>>,
    pub image_base: Option<String>,
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(LuckyDrawConfig)]
    Config {},
    #[returns(DrawStateResponse)]
    DrawState {},
    #[returns(NamesResponse)]
    Names {},
    #[returns(WinnersResponse)]
    Winners {
        /// Round index to start after.
        start_after: Option<u32>,
        limit: Option<u32>,
    },
    #[returns(Option<Round>)]
    CurrentRound {},
    #[returns(TierInfo)]
    Tier { number: u32 },
    #[returns(Option<PrizeTierEntry>)]
    Prize { number: u32 },
    #[returns(SpinRecord)]
    Spin { spin_id: u64 },
    #[returns(SpinHistoryResponse)]
    SpinHistory {
        start_after: Option<u64>,
        limit: Option<u32>,
    },
}

#[cw_serde]
pub struct DrawStateResponse {
    pub current_prize_number: u32,
    pub remaining_names: u32,
    pub remove_winner: bool,
    pub has_previous_winner: bool,
    pub total_rounds: u32,
    pub total_winners: u32,
    /// A forward spin would pass its preconditions.
    pub can_draw: bool,
    /// There is a draw that can still be reversed.
    pub can_redraw: bool,
    /// Tier of the next draw; `None` once every prize is drawn.
    pub next: Option<TierInfo>,
}

#[cw_serde]
pub struct NamesResponse {
    pub names: Vec<String>,
}

#[cw_serde]
pub struct IndexedRound {
    pub index: u32,
    pub round: Round,
}

#[cw_serde]
pub struct WinnersResponse {
    pub rounds: Vec<IndexedRound>,
    pub total_rounds: u32,
}

#[cw_serde]
pub struct SpinHistoryResponse {
    pub spins: Vec<SpinRecord>,
}
