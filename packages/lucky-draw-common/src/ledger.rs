use cosmwasm_schema::cw_serde;

#[cw_serde]
pub struct WinnerRecord {
    pub number: u32,
    pub name: String,
    pub image_ref: String,
    pub reward_description: String,
}

/// A group of winners shown together.
///
/// Batch rounds (`round_size > 1`) are filled by a single draw and are closed
/// as soon as they exist. Single rounds collect one winner per draw and stay
/// open until the minimum prize number has been handed out.
#[cw_serde]
pub struct Round {
    pub label: String,
    pub round_size: u32,
    pub winners: Vec<WinnerRecord>,
}

impl Round {
    pub fn is_batch(&self) -> bool {
        self.round_size > 1
    }

    pub fn is_complete(&self, min_prize_number: u32) -> bool {
        self.is_batch()
            || self
                .winners
                .last()
                .map(|w| w.number <= min_prize_number)
                .unwrap_or(false)
    }
}

#[cw_serde]
#[derive(Default)]
pub struct WinnerLedger {
    rounds: Vec<Round>,
}

impl WinnerLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    pub fn total_winners(&self) -> usize {
        self.rounds.iter().map(|r| r.winners.len()).sum()
    }

    /// All winners in the order they were appended.
    pub fn winners(&self) -> impl Iterator<Item = &WinnerRecord> {
        self.rounds.iter().flat_map(|r| r.winners.iter())
    }

    pub fn last_round(&self) -> Option<&Round> {
        self.rounds.last()
    }

    pub fn current_open_round(&self, min_prize_number: u32) -> Option<&Round> {
        self.rounds
            .last()
            .filter(|r| !r.is_complete(min_prize_number))
    }

    pub fn push_round(&mut self, round: Round) {
        self.rounds.push(round);
    }

    /// Adds a single-draw winner to the open round, opening one first if the
    /// last round is closed or the ledger is empty.
    pub fn append_to_open_round(&mut self, label: &str, winner: WinnerRecord, min_prize_number: u32) {
        if self.current_open_round(min_prize_number).is_none() {
            self.rounds.push(Round {
                label: label.to_string(),
                round_size: 1,
                winners: vec![],
            });
        }
        if let Some(round) = self.rounds.last_mut() {
            round.winners.push(winner);
        }
    }

    /// Removes the single most recent winner, dropping its round if that
    /// leaves it empty.
    pub fn pop_last_winner(&mut self) -> Option<WinnerRecord> {
        let round = self.rounds.last_mut()?;
        let winner = round.winners.pop();
        if round.winners.is_empty() {
            self.rounds.pop();
        }
        winner
    }

    pub fn pop_last_round(&mut self) -> Option<Round> {
        self.rounds.pop()
    }
}
