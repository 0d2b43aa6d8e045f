use cosmwasm_schema::cw_serde;

use crate::error::DrawError;
use crate::ledger::{Round, WinnerLedger, WinnerRecord};
use crate::listener::{DrawListener, NoopListener, NoopSink, PersistenceSink};
use crate::randomizer::Randomizer;
use crate::schedule::{PrizeSchedule, TierGrouping, TierInfo};

/// Static parameters of a draw event.
#[cw_serde]
pub struct DrawConfig {
    /// Cursor value before the first draw (the lowest-ranked prize).
    pub initial_prize_number: u32,
    /// Last prize number handed out; the cursor ends one below it.
    pub min_prize_number: u32,
    pub grouping: TierGrouping,
    /// Number of names on a freshly spun reel.
    pub max_reel_items: u32,
    /// Prefix joined in front of schedule image refs, e.g. `assets/images/prize`.
    pub image_base: Option<String>,
}

impl DrawConfig {
    pub fn validate(&self) -> Result<(), DrawError> {
        self.grouping.validate()?;

        if self.min_prize_number == 0 {
            return Err(DrawError::InvalidConfig {
                reason: "min_prize_number must be at least 1".to_string(),
            });
        }
        if self.min_prize_number > self.initial_prize_number {
            return Err(DrawError::InvalidConfig {
                reason: format!(
                    "min_prize_number {} exceeds initial_prize_number {}",
                    self.min_prize_number, self.initial_prize_number
                ),
            });
        }
        if self.max_reel_items == 0 {
            return Err(DrawError::InvalidConfig {
                reason: "max_reel_items must be at least 1".to_string(),
            });
        }

        let grand = self.grouping.grand_prize_start_no;
        if self.initial_prize_number > grand {
            let span = self.initial_prize_number - grand;
            if span % self.grouping.batch_size != 0 {
                return Err(DrawError::InvalidConfig {
                    reason: format!(
                        "prizes above the grand-prize start ({}) must come in whole batches of {}",
                        span, self.grouping.batch_size
                    ),
                });
            }
            if self.min_prize_number > grand + 1 {
                return Err(DrawError::InvalidConfig {
                    reason: "min_prize_number falls inside a batch round".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Bookkeeping needed to reverse the most recent forward draw.
#[cw_serde]
pub struct LastDraw {
    /// Cursor value the draw started from.
    pub prize_number: u32,
    pub round_size: u32,
    /// Whether the draw opened its own round (as opposed to appending).
    pub new_round: bool,
    pub winners: u32,
}

/// The mutable half of the engine: pool, ledger and cursor.
#[cw_serde]
pub struct DrawState {
    pub names: Vec<String>,
    pub ledger: WinnerLedger,
    pub current_prize_number: u32,
    pub remove_winner: bool,
    /// A winner from the previous spin is still shown at the top of the reel.
    pub has_previous_winner: bool,
    pub last_draw: Option<LastDraw>,
}

impl DrawState {
    pub fn new(config: &DrawConfig) -> Self {
        Self {
            names: vec![],
            ledger: WinnerLedger::new(),
            current_prize_number: config.initial_prize_number,
            remove_winner: true,
            has_previous_winner: false,
            last_draw: None,
        }
    }

    pub fn validate(&self, config: &DrawConfig) -> Result<(), DrawError> {
        let cursor = self.current_prize_number;
        if cursor > config.initial_prize_number || cursor < config.min_prize_number.saturating_sub(1) {
            return Err(DrawError::InvalidConfig {
                reason: format!(
                    "cursor {} outside [{}, {}]",
                    cursor,
                    config.min_prize_number.saturating_sub(1),
                    config.initial_prize_number
                ),
            });
        }
        let grand = config.grouping.grand_prize_start_no;
        if cursor > grand && (cursor - grand) % config.grouping.batch_size != 0 {
            return Err(DrawError::InvalidConfig {
                reason: format!("cursor {} is not on a batch boundary", cursor),
            });
        }
        Ok(())
    }
}

/// Result of one spin.
#[cw_serde]
pub struct SpinOutcome {
    /// Cursor value the winners were numbered from.
    pub prize_number: u32,
    pub label: String,
    pub round_size: u32,
    /// Winners in ledger order: highest prize number first.
    pub winners: Vec<WinnerRecord>,
    /// The round that received the winners is now complete.
    pub round_closed: bool,
    pub redraw: bool,
    /// Names for the display reel; the last entry is the first winner.
    pub reel: Vec<String>,
}

/// The draw state machine.
///
/// Owns the candidate pool, winner ledger and cursor, and drives the injected
/// randomizer, listener and persistence sink. A spin either completes all of
/// its bookkeeping or returns an error before touching anything.
pub struct DrawEngine<R, L = NoopListener, S = NoopSink> {
    config: DrawConfig,
    schedule: PrizeSchedule,
    state: DrawState,
    randomizer: R,
    listener: L,
    sink: S,
}

impl<R: Randomizer> DrawEngine<R> {
    pub fn new(config: DrawConfig, schedule: PrizeSchedule, randomizer: R) -> Result<Self, DrawError> {
        config.validate()?;
        let state = DrawState::new(&config);
        Ok(Self {
            config,
            schedule,
            state,
            randomizer,
            listener: NoopListener,
            sink: NoopSink,
        })
    }
}

impl<R, L, S> DrawEngine<R, L, S> {
    pub fn with_listener<L2: DrawListener>(self, listener: L2) -> DrawEngine<R, L2, S> {
        DrawEngine {
            config: self.config,
            schedule: self.schedule,
            state: self.state,
            randomizer: self.randomizer,
            listener,
            sink: self.sink,
        }
    }

    pub fn with_sink<S2: PersistenceSink>(self, sink: S2) -> DrawEngine<R, L, S2> {
        DrawEngine {
            config: self.config,
            schedule: self.schedule,
            state: self.state,
            randomizer: self.randomizer,
            listener: self.listener,
            sink,
        }
    }

    /// Resumes from a previously persisted state.
    pub fn with_state(mut self, state: DrawState) -> Result<Self, DrawError> {
        state.validate(&self.config)?;
        self.state = state;
        Ok(self)
    }

    pub fn config(&self) -> &DrawConfig {
        &self.config
    }

    pub fn schedule(&self) -> &PrizeSchedule {
        &self.schedule
    }

    pub fn state(&self) -> &DrawState {
        &self.state
    }

    pub fn names(&self) -> &[String] {
        &self.state.names
    }

    pub fn ledger(&self) -> &WinnerLedger {
        &self.state.ledger
    }

    pub fn current_prize_number(&self) -> u32 {
        self.state.current_prize_number
    }

    pub fn remove_winner(&self) -> bool {
        self.state.remove_winner
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn into_parts(self) -> (DrawState, L, S) {
        (self.state, self.listener, self.sink)
    }

    pub fn describe(&self, number: u32) -> TierInfo {
        self.schedule.describe(&self.config.grouping, number)
    }

    pub fn current_open_round(&self) -> Option<&Round> {
        self.state
            .ledger
            .current_open_round(self.config.min_prize_number)
    }

    /// True when a forward spin would pass its preconditions.
    pub fn can_draw(&self) -> bool {
        !self.state.names.is_empty()
            && self.state.current_prize_number >= self.config.min_prize_number
    }
}

impl<R: Randomizer, L: DrawListener, S: PersistenceSink> DrawEngine<R, L, S> {
    /// Replaces the candidate pool. Cursor and ledger are left alone.
    pub fn set_names(&mut self, names: Vec<String>) {
        self.state.names = names;
        self.state.has_previous_winner = false;
        self.listener.on_name_list_changed(&self.state.names);
        self.sink.persist(&self.state);
    }

    pub fn set_remove_winner(&mut self, remove_winner: bool) {
        self.state.remove_winner = remove_winner;
        self.sink.persist(&self.state);
    }

    /// Reverses the most recent forward draw: the cursor goes back to where
    /// that draw started and its winners leave the ledger. Removed names are
    /// not returned to the pool. Only one level of undo exists.
    pub fn undo_last_draw(&mut self) -> Result<Vec<WinnerRecord>, DrawError> {
        let last = self.pending_undo()?;
        let undone = self.apply_undo(&last)?;
        self.listener.on_redraw(&undone);
        self.sink.persist(&self.state);
        Ok(undone)
    }

    /// Runs one draw. With `redraw` the previous draw is reversed first and
    /// its prize numbers are drawn again.
    pub fn spin(&mut self, redraw: bool) -> Result<SpinOutcome, DrawError> {
        if self.state.names.is_empty() {
            return Err(DrawError::EmptyPool);
        }

        let pending = if redraw {
            Some(self.pending_undo()?)
        } else {
            None
        };
        let cursor = pending
            .as_ref()
            .map(|last| last.prize_number)
            .unwrap_or(self.state.current_prize_number);
        if cursor < self.config.min_prize_number {
            return Err(DrawError::PrizesExhausted {
                cursor,
                min: self.config.min_prize_number,
            });
        }

        self.listener.on_spin_start(cursor);

        if let Some(last) = pending {
            let undone = self.apply_undo(&last)?;
            self.listener.on_redraw(&undone);
        }

        let rule = self.config.grouping.rule_for(cursor);
        let shuffled = self.randomizer.shuffle(&self.state.names);
        let reel = self.build_reel(&shuffled);

        let take = (rule.round_size as usize).min(shuffled.len());
        let mut winners = Vec::with_capacity(take);
        for (offset, name) in shuffled.iter().rev().take(take).enumerate() {
            winners.push(self.winner_record(cursor - offset as u32, name));
        }

        let min = self.config.min_prize_number;
        let new_round = self.config.grouping.starts_round(cursor);
        if new_round {
            self.state.ledger.push_round(Round {
                label: rule.label.clone(),
                round_size: rule.round_size,
                winners: winners.clone(),
            });
        } else {
            for winner in &winners {
                self.state
                    .ledger
                    .append_to_open_round(&rule.label, winner.clone(), min);
            }
        }

        if self.state.remove_winner {
            for winner in &winners {
                if let Some(pos) = self.state.names.iter().position(|n| *n == winner.name) {
                    self.state.names.remove(pos);
                }
            }
        }

        self.state.current_prize_number = cursor.saturating_sub(rule.round_size);
        self.state.has_previous_winner = true;
        self.state.last_draw = Some(LastDraw {
            prize_number: cursor,
            round_size: rule.round_size,
            new_round,
            winners: winners.len() as u32,
        });

        let round_closed = self
            .state
            .ledger
            .last_round()
            .map(|r| r.is_complete(min))
            .unwrap_or(false);

        let outcome = SpinOutcome {
            prize_number: cursor,
            label: rule.label,
            round_size: rule.round_size,
            winners,
            round_closed,
            redraw,
            reel,
        };

        self.sink.persist(&self.state);
        if round_closed {
            if let Some(round) = self.state.ledger.last_round() {
                self.listener.on_round_complete(round);
            }
        }
        self.listener.on_spin_end(&outcome);

        Ok(outcome)
    }

    fn pending_undo(&self) -> Result<LastDraw, DrawError> {
        if self.state.ledger.is_empty() {
            return Err(DrawError::InvalidRedraw {
                reason: "winner ledger is empty".to_string(),
            });
        }
        self.state
            .last_draw
            .clone()
            .ok_or_else(|| DrawError::InvalidRedraw {
                reason: "previous draw was already reversed".to_string(),
            })
    }

    fn apply_undo(&mut self, last: &LastDraw) -> Result<Vec<WinnerRecord>, DrawError> {
        let inconsistent = || DrawError::InvalidRedraw {
            reason: "ledger does not match the last draw".to_string(),
        };

        let undone = if last.new_round {
            self.state
                .ledger
                .pop_last_round()
                .map(|round| round.winners)
                .ok_or_else(inconsistent)?
        } else {
            let mut popped = Vec::with_capacity(last.winners as usize);
            for _ in 0..last.winners {
                popped.push(self.state.ledger.pop_last_winner().ok_or_else(inconsistent)?);
            }
            popped.reverse();
            popped
        };

        self.state.current_prize_number = last.prize_number;
        self.state.last_draw = None;
        Ok(undone)
    }

    fn winner_record(&mut self, number: u32, name: &str) -> WinnerRecord {
        match self.schedule.entry(number) {
            Ok(entry) => WinnerRecord {
                number,
                name: name.to_string(),
                image_ref: entry
                    .image_ref
                    .as_deref()
                    .filter(|img| !img.is_empty())
                    .map(|img| match &self.config.image_base {
                        Some(base) => format!("{}/{}", base.trim_end_matches('/'), img),
                        None => img.to_string(),
                    })
                    .unwrap_or_default(),
                reward_description: entry.reward_description.clone(),
            },
            Err(_) => {
                self.listener.on_schedule_mismatch(number);
                WinnerRecord {
                    number,
                    name: name.to_string(),
                    image_ref: String::new(),
                    reward_description: String::new(),
                }
            }
        }
    }

    /// Pads the shuffle by repeating it in front of itself until the reel is
    /// long enough, then keeps the tail so the shuffle's last entry stays last.
    fn build_reel(&self, shuffled: &[String]) -> Vec<String> {
        if shuffled.is_empty() {
            return vec![];
        }
        let len = (self.config.max_reel_items as usize)
            .saturating_sub(self.state.has_previous_winner as usize)
            .max(1);
        let mut padded = shuffled.to_vec();
        while padded.len() < len {
            padded.extend_from_within(..);
        }
        padded.split_off(padded.len() - len)
    }
}
