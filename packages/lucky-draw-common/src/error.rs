use thiserror::Error;

/// Failures surfaced by the draw engine.
///
/// `EmptyPool` and `PrizesExhausted` are precondition failures: the engine
/// state is untouched and the caller may recover (load a roster, stop the
/// event). `InvalidRedraw` means the caller asked to reverse a draw that does
/// not exist. `ScheduleMismatch` never aborts a draw; it is only reported.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DrawError {
    #[error("candidate pool is empty")]
    EmptyPool,

    #[error("invalid redraw: {reason}")]
    InvalidRedraw { reason: String },

    #[error("no prize scheduled for number {number}")]
    ScheduleMismatch { number: u32 },

    #[error("all prizes drawn: cursor {cursor} is below minimum prize number {min}")]
    PrizesExhausted { cursor: u32, min: u32 },

    #[error("invalid draw config: {reason}")]
    InvalidConfig { reason: String },

    #[error("prize number {number} appears more than once in the schedule")]
    DuplicatePrizeNumber { number: u32 },
}

impl DrawError {
    /// Whether the caller can recover by fixing its input and retrying.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DrawError::EmptyPool | DrawError::PrizesExhausted { .. } | DrawError::ScheduleMismatch { .. }
        )
    }
}
