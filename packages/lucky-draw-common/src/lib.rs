pub mod engine;
pub mod error;
pub mod ledger;
pub mod listener;
pub mod randomizer;
pub mod roster;
pub mod schedule;

pub use engine::{DrawConfig, DrawEngine, DrawState, LastDraw, SpinOutcome};
pub use error::DrawError;
pub use ledger::{Round, WinnerLedger, WinnerRecord};
pub use listener::{DrawListener, NoopListener, NoopSink, PersistenceSink};
pub use randomizer::{Randomizer, SeededRandomizer};
pub use roster::{clean_names, parse_roster};
pub use schedule::{PrizeSchedule, PrizeTierEntry, RoundRule, TierGrouping, TierInfo, TierThreshold};
