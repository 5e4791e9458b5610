use serde::{Deserialize, Serialize};

/// Extra delivery types. Wide and no-ball are illegal deliveries (they do
/// not consume a ball of the over); bye and leg-bye are legal deliveries
/// whose runs bypass the batter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "kebab-case")]
pub enum ExtraKind {
    Wide,
    NoBall,
    Bye,
    LegBye,
}

impl ExtraKind {
    /// Whether the delivery counts toward the 6-ball over.
    pub fn counts_as_legal_ball(&self) -> bool {
        matches!(self, ExtraKind::Bye | ExtraKind::LegBye)
    }

    /// Whether the runs are charged to the bowler's analysis.
    /// Byes and leg-byes are the fielding side's fault, not the bowler's.
    pub fn charges_bowler(&self) -> bool {
        matches!(self, ExtraKind::Wide | ExtraKind::NoBall)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExtraKind::Wide => "wide",
            ExtraKind::NoBall => "no-ball",
            ExtraKind::Bye => "bye",
            ExtraKind::LegBye => "leg-bye",
        }
    }
}

/// Dismissal types, including the four combination events where an extra
/// delivery also produces a wicket.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "kebab-case")]
pub enum WicketKind {
    Bowled,
    Caught,
    RunOut,
    HitWicket,
    StumpOut,
    /// Stumping (or run-out) off a wide: wicket on an illegal delivery.
    WideWicket,
    /// Run-out off a no-ball: wicket on an illegal delivery.
    NoBallWicket,
    /// Run-out while running leg-byes: a legal delivery.
    LegByeWicket,
    /// Run-out while running byes: a legal delivery.
    ByeWicket,
}

impl WicketKind {
    /// Whether the wicket ball consumes a ball of the over.
    /// Wide and no-ball combinations do not; everything else does.
    pub fn counts_as_legal_ball(&self) -> bool {
        !matches!(self, WicketKind::WideWicket | WicketKind::NoBallWicket)
    }

    /// Whether the wicket goes into the bowler's analysis. Run-outs and the
    /// bye/leg-bye/no-ball combinations never credit the bowler.
    pub fn credits_bowler(&self) -> bool {
        matches!(
            self,
            WicketKind::Bowled
                | WicketKind::Caught
                | WicketKind::HitWicket
                | WicketKind::StumpOut
                | WicketKind::WideWicket
        )
    }

    /// Wide and no-ball wickets carry the mandatory penalty run even when
    /// the caller reports fewer.
    pub fn forces_minimum_run(&self) -> bool {
        matches!(self, WicketKind::WideWicket | WicketKind::NoBallWicket)
    }

    /// The extra component of a combination wicket, if any.
    pub fn extra_component(&self) -> Option<ExtraKind> {
        match self {
            WicketKind::WideWicket => Some(ExtraKind::Wide),
            WicketKind::NoBallWicket => Some(ExtraKind::NoBall),
            WicketKind::LegByeWicket => Some(ExtraKind::LegBye),
            WicketKind::ByeWicket => Some(ExtraKind::Bye),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WicketKind::Bowled => "bowled",
            WicketKind::Caught => "caught",
            WicketKind::RunOut => "run-out",
            WicketKind::HitWicket => "hit-wicket",
            WicketKind::StumpOut => "stump-out",
            WicketKind::WideWicket => "wide-wicket",
            WicketKind::NoBallWicket => "no-ball-wicket",
            WicketKind::LegByeWicket => "leg-bye-wicket",
            WicketKind::ByeWicket => "bye-wicket",
        }
    }
}

/// Which of the two batters at the crease was dismissed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DismissedBatter {
    #[default]
    Striker,
    NonStriker,
}

/// Commentary line for a run-scoring delivery, e.g. `"4.2 B1 to S1: 3 runs"`.
pub fn describe_runs(over: u16, ball: u8, bowler: &str, striker: &str, runs: u32) -> String {
    let what = match runs {
        0 => "no run".to_string(),
        1 => "1 run".to_string(),
        4 => "FOUR".to_string(),
        6 => "SIX".to_string(),
        n => format!("{} runs", n),
    };
    format!("{}.{} {} to {}: {}", over, ball, bowler, striker, what)
}

/// Commentary line for an extra delivery.
pub fn describe_extra(over: u16, ball: u8, bowler: &str, kind: ExtraKind, runs: u32) -> String {
    format!("{}.{} {}: {} {}", over, ball, bowler, kind.label(), runs)
}

/// Commentary line for a wicket (including combination events).
pub fn describe_wicket(
    over: u16,
    ball: u8,
    bowler: &str,
    out: &str,
    kind: WicketKind,
    fielder: Option<&str>,
) -> String {
    match fielder {
        Some(f) => format!("{}.{} {}: WICKET! {} {} ({})", over, ball, bowler, out, kind.label(), f),
        None => format!("{}.{} {}: WICKET! {} {}", over, ball, bowler, out, kind.label()),
    }
}
