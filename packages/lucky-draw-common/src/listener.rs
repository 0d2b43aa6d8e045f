use crate::engine::{DrawState, SpinOutcome};
use crate::ledger::{Round, WinnerRecord};

/// Hooks fired synchronously by the engine. Every hook is optional.
pub trait DrawListener {
    /// Preconditions passed; the draw for `prize_number` is about to run.
    fn on_spin_start(&mut self, _prize_number: u32) {}

    /// Bookkeeping for the draw is finished.
    fn on_spin_end(&mut self, _outcome: &SpinOutcome) {}

    fn on_name_list_changed(&mut self, _names: &[String]) {}

    fn on_round_complete(&mut self, _round: &Round) {}

    /// The previous draw was reversed; `undone` is in ledger order.
    fn on_redraw(&mut self, _undone: &[WinnerRecord]) {}

    /// A winner was drawn for a number the prize schedule does not know.
    fn on_schedule_mismatch(&mut self, _number: u32) {}
}

/// Receives the full engine state after every change worth keeping.
/// The engine does not read anything back.
pub trait PersistenceSink {
    fn persist(&mut self, state: &DrawState);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopListener;

impl DrawListener for NoopListener {}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl PersistenceSink for NoopSink {
    fn persist(&mut self, _state: &DrawState) {}
}
