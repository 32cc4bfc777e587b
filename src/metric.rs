//! Control metric: two land areas → percentage and change since last run.
//!
//! All math runs on unrounded values. Rounding to three decimals is a
//! display contract applied only by the formatting helpers here.

use std::fmt;

use crate::error::AnalysisError;
use crate::resolve::TerritoryAreas;

/// Decimal places shown for percentages and deltas.
const DISPLAY_DECIMALS: usize = 3;

/// The tracked faction's share of land, with its change since the
/// previously persisted share when there is one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlMetric {
    /// Faction A's share in percent, unrounded.
    pub percent: f64,
    pub delta: Option<Delta>,
}

/// Change in control percentage, already rounded to display precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Delta(f64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    /// Zero or positive change.
    Gain,
    Loss,
}

/// Faction A's area as a percentage of both factions' area.
pub fn control_percent(areas: &TerritoryAreas) -> Result<f64, AnalysisError> {
    let total = areas.faction_a + areas.faction_b;
    if total <= 0.0 {
        return Err(AnalysisError::DegenerateArea);
    }
    Ok(areas.faction_a / total * 100.0)
}

/// Compute the new percentage and, if `previous` is known, the delta.
pub fn track(areas: &TerritoryAreas, previous: Option<f64>) -> Result<ControlMetric, AnalysisError> {
    let percent = control_percent(areas)?;
    Ok(ControlMetric {
        percent,
        delta: previous.map(|old| Delta::new(percent - old)),
    })
}

impl ControlMetric {
    /// One-line summary, e.g.
    /// `Ukraine controls 75.0% relative to the invasion's start (🟢 +5.0%)`.
    pub fn report_line(&self, label: &str) -> String {
        let mut line = format!(
            "{label} controls {}% relative to the invasion's start",
            display_decimal(self.percent)
        );
        if let Some(delta) = self.delta {
            line.push_str(&format!(" ({delta})"));
        }
        line
    }
}

impl Delta {
    /// Round `raw` to display precision. Negative zero becomes zero.
    pub fn new(raw: f64) -> Self {
        let rounded = round_display(raw);
        Self(if rounded == 0.0 { 0.0 } else { rounded })
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn trend(self) -> Trend {
        if self.0 >= 0.0 {
            Trend::Gain
        } else {
            Trend::Loss
        }
    }

    /// Signed decimal, e.g. `+5.0` or `-0.125`.
    pub fn signed(self) -> String {
        match self.trend() {
            Trend::Gain => format!("+{}", display_decimal(self.0)),
            Trend::Loss => display_decimal(self.0),
        }
    }
}

impl fmt::Display for Delta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = match self.trend() {
            Trend::Gain => '\u{1f7e2}',
            Trend::Loss => '\u{1f534}',
        };
        write!(f, "{marker} {}%", self.signed())
    }
}

/// Round to display precision.
///
/// Rounds the exact binary value, ties to even, so `0.0625` becomes
/// `0.062` and `1.0005` (stored just below the tie) becomes `1.0`.
pub fn round_display(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{value:.prec$}", prec = DISPLAY_DECIMALS)
        .parse()
        .unwrap_or(value)
}

/// Shortest decimal form of the rounded value, keeping at least one
/// fractional digit (`75.0`, `33.333`).
pub fn display_decimal(value: f64) -> String {
    let text = round_display(value).to_string();
    if text.contains('.') || !value.is_finite() {
        text
    } else {
        format!("{text}.0")
    }
}
