use cosmwasm_std::{Event, StdResult, Storage};
use lucky_draw_common::{
    DrawListener, DrawState, PersistenceSink, Round, SpinOutcome, WinnerRecord,
};

use crate::state::DRAW_STATE;

/// Collects engine callbacks as `lucky_*` events for the response.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}

fn join_numbers(winners: &[WinnerRecord]) -> String {
    winners
        .iter()
        .map(|w| w.number.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Empty attribute values are rejected on chain.
fn label_or_dash(label: &str) -> String {
    if label.is_empty() {
        "-".to_string()
    } else {
        label.to_string()
    }
}

impl DrawListener for EventLog {
    fn on_spin_start(&mut self, prize_number: u32) {
        self.events.push(
            Event::new("lucky_spin_start").add_attribute("prize_number", prize_number.to_string()),
        );
    }

    fn on_spin_end(&mut self, outcome: &SpinOutcome) {
        self.events.push(
            Event::new("lucky_draw_result")
                .add_attribute("prize_number", outcome.prize_number.to_string())
                .add_attribute("label", label_or_dash(&outcome.label))
                .add_attribute("round_size", outcome.round_size.to_string())
                .add_attribute("winner_count", outcome.winners.len().to_string())
                .add_attribute("prize_numbers", join_numbers(&outcome.winners))
                .add_attribute("round_closed", outcome.round_closed.to_string())
                .add_attribute("redraw", outcome.redraw.to_string())
                .add_attribute("reel_length", outcome.reel.len().to_string()),
        );
        for winner in &outcome.winners {
            let mut event = Event::new("lucky_winner")
                .add_attribute("number", winner.number.to_string())
                .add_attribute("name", winner.name.clone());
            if !winner.reward_description.is_empty() {
                event = event.add_attribute("reward", winner.reward_description.clone());
            }
            if !winner.image_ref.is_empty() {
                event = event.add_attribute("image", winner.image_ref.clone());
            }
            self.events.push(event);
        }
    }

    fn on_name_list_changed(&mut self, names: &[String]) {
        self.events.push(
            Event::new("lucky_names_changed").add_attribute("count", names.len().to_string()),
        );
    }

    fn on_round_complete(&mut self, round: &Round) {
        self.events.push(
            Event::new("lucky_round_complete")
                .add_attribute("label", label_or_dash(&round.label))
                .add_attribute("round_size", round.round_size.to_string())
                .add_attribute("winner_count", round.winners.len().to_string()),
        );
    }

    fn on_redraw(&mut self, undone: &[WinnerRecord]) {
        self.events.push(
            Event::new("lucky_redraw")
                .add_attribute("undone_count", undone.len().to_string())
                .add_attribute("prize_numbers", join_numbers(undone)),
        );
    }

    fn on_schedule_mismatch(&mut self, number: u32) {
        self.events.push(
            Event::new("lucky_schedule_mismatch").add_attribute("number", number.to_string()),
        );
    }
}

/// Writes engine state to `DRAW_STATE`. The first storage error is kept and
/// handed back by `finish`, later writes are skipped.
pub struct StateSink<'a> {
    storage: &'a mut dyn Storage,
    result: StdResult<()>,
}

impl<'a> StateSink<'a> {
    pub fn new(storage: &'a mut dyn Storage) -> Self {
        Self {
            storage,
            result: Ok(()),
        }
    }

    pub fn finish(self) -> StdResult<()> {
        self.result
    }
}

impl PersistenceSink for StateSink<'_> {
    fn persist(&mut self, state: &DrawState) {
        if self.result.is_ok() {
            self.result = DRAW_STATE.save(self.storage, state);
        }
    }
}
