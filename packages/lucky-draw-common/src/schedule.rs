use cosmwasm_schema::cw_serde;

use crate::error::DrawError;

/// Metadata for one prize slot. `number` 1 is the top prize.
#[cw_serde]
pub struct PrizeTierEntry {
    pub number: u32,
    pub title: String,
    pub reward_description: String,
    pub image_ref: Option<String>,
}

/// A label that applies to every prize number `<= max_number`.
#[cw_serde]
pub struct TierThreshold {
    pub max_number: u32,
    pub label: String,
}

/// How prize numbers are grouped into rounds and labelled.
#[cw_serde]
pub struct TierGrouping {
    /// Numbers at or below this are drawn one at a time.
    pub grand_prize_start_no: u32,
    /// Winners per round above the grand-prize boundary.
    pub batch_size: u32,
    pub thresholds: Vec<TierThreshold>,
}

#[cw_serde]
pub struct RoundRule {
    pub round_size: u32,
    pub label: String,
}

/// Everything known about a prize number: its schedule entry (if any), the
/// size of the round it is drawn in and the tier label.
#[cw_serde]
pub struct TierInfo {
    pub number: u32,
    pub tier: Option<PrizeTierEntry>,
    pub round_size: u32,
    pub label: String,
}

impl TierGrouping {
    pub fn round_size(&self, number: u32) -> u32 {
        if number > self.grand_prize_start_no {
            self.batch_size
        } else {
            1
        }
    }

    /// Thresholds are checked in ascending `max_number` order; the first one
    /// that covers `number` wins. No match gives an empty label.
    pub fn label_for(&self, number: u32) -> String {
        let mut thresholds: Vec<&TierThreshold> = self.thresholds.iter().collect();
        thresholds.sort_by_key(|t| t.max_number);
        thresholds
            .into_iter()
            .find(|t| number <= t.max_number)
            .map(|t| t.label.clone())
            .unwrap_or_default()
    }

    pub fn rule_for(&self, number: u32) -> RoundRule {
        RoundRule {
            round_size: self.round_size(number),
            label: self.label_for(number),
        }
    }

    /// Whether a draw at `number` opens a fresh round in the ledger.
    pub fn starts_round(&self, number: u32) -> bool {
        self.round_size(number) == self.batch_size || number == self.grand_prize_start_no
    }

    pub fn validate(&self) -> Result<(), DrawError> {
        // A batch of one would be indistinguishable from a single draw.
        if self.batch_size < 2 {
            return Err(DrawError::InvalidConfig {
                reason: "batch_size must be at least 2".to_string(),
            });
        }
        let mut seen: Vec<u32> = self.thresholds.iter().map(|t| t.max_number).collect();
        seen.sort_unstable();
        if seen.windows(2).any(|w| w[0] == w[1]) {
            return Err(DrawError::InvalidConfig {
                reason: "tier thresholds must have distinct max_number values".to_string(),
            });
        }
        Ok(())
    }
}

/// Static prize table, kept sorted by prize number.
#[cw_serde]
pub struct PrizeSchedule {
    entries: Vec<PrizeTierEntry>,
}

impl PrizeSchedule {
    pub fn new(mut entries: Vec<PrizeTierEntry>) -> Result<Self, DrawError> {
        entries.sort_by_key(|e| e.number);
        if let Some(dup) = entries.windows(2).find(|w| w[0].number == w[1].number) {
            return Err(DrawError::DuplicatePrizeNumber {
                number: dup[0].number,
            });
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[PrizeTierEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact-number lookup.
    pub fn entry(&self, number: u32) -> Result<&PrizeTierEntry, DrawError> {
        self.entries
            .binary_search_by_key(&number, |e| e.number)
            .map(|idx| &self.entries[idx])
            .map_err(|_| DrawError::ScheduleMismatch { number })
    }

    pub fn describe(&self, grouping: &TierGrouping, number: u32) -> TierInfo {
        let rule = grouping.rule_for(number);
        TierInfo {
            number,
            tier: self.entry(number).ok().cloned(),
            round_size: rule.round_size,
            label: rule.label,
        }
    }
}
