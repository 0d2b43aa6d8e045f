use cosmwasm_std::StdError;
use lucky_draw_common::DrawError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Draw(#[from] DrawError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("invalid hex: {field}")]
    InvalidHex { field: String },

    #[error("spin entropy must not be empty")]
    EmptyEntropy,

    #[error("invalid reel length: {value} (must be between {min} and {max})")]
    InvalidReelLength { value: u32, min: u32, max: u32 },
}
