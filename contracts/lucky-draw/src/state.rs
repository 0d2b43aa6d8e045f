use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Timestamp};
use cw_storage_plus::{Item, Map};
use lucky_draw_common::{DrawConfig, DrawState, PrizeSchedule, WinnerRecord};

pub const CONFIG: Item<LuckyDrawConfig> = Item::new("config");
pub const SCHEDULE: Item<PrizeSchedule> = Item::new("schedule");
/// Pool, ledger and cursor. Written by the engine's persistence sink.
pub const DRAW_STATE: Item<DrawState> = Item::new("draw_state");
pub const NEXT_SPIN_ID: Item<u64> = Item::new("next_spin_id");
/// Append-only audit trail; redraws and undos get their own entries.
pub const SPINS: Map<u64, SpinRecord> = Map::new("spins");

#[cw_serde]
pub struct LuckyDrawConfig {
    pub admin: Addr,
    /// Runs the event: edits the roster, spins, redraws.
    pub operator: Addr,
    pub draw: DrawConfig,
}

#[cw_serde]
pub enum SpinKind {
    Spin,
    Redraw,
    Undo,
}

#[cw_serde]
pub struct SpinRecord {
    pub id: u64,
    pub kind: SpinKind,
    pub prize_number: u32,
    pub label: String,
    /// Winners drawn, or for `Undo` the winners taken back.
    pub winners: Vec<WinnerRecord>,
    pub round_closed: bool,
    /// sha256 seed fed to the shuffle, hex-encoded. `None` for undo.
    pub seed: Option<String>,
    pub created_at: Timestamp,
    pub block_height: u64,
}
