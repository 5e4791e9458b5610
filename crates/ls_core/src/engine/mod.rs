pub mod clock;
pub mod completion;
pub mod delivery;
pub mod eligibility;

pub use clock::InningsClock;
pub use delivery::WicketCommand;
pub use eligibility::{eligible_bowlers, BowlingHistory, OverEntry, OverQuota};
