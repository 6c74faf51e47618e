//! Goal periods, tier thresholds and commission schedules
use super::error::{EngineError, ValidationError};
use super::sale::TimeStamp;
use super::utils::new_record_id;
use chrono::{Datelike, NaiveDate, Utc};

/// Ten-day sub-period of a calendar month used as the goal-tracking window:
/// 1st-10th, 11th-20th, 21st-end.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, Eq, PartialEq)]
pub enum Dezena {
    #[n(0)]
    First,
    #[n(1)]
    Second,
    #[n(2)]
    Third,
}

impl Dezena {
    pub fn of_day(day: u32) -> Self {
        match day {
            1..=10 => Dezena::First,
            11..=20 => Dezena::Second,
            _ => Dezena::Third,
        }
    }
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, Eq, PartialEq)]
pub struct Period {
    #[n(0)]
    pub year: i32,
    #[n(1)]
    pub month: u32,
    #[n(2)]
    pub dezena: Dezena,
}

impl Period {
    pub fn new(year: i32, month: u32, dezena: Dezena) -> Self {
        Self {
            year,
            month,
            dezena,
        }
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            dezena: Dezena::of_day(date.day()),
        }
    }

    pub fn contains(&self, at: &TimeStamp<Utc>) -> bool {
        let date = at.to_datetime_utc().date_naive();
        *self == Self::containing(date)
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let dezena = match self.dezena {
            Dezena::First => 1,
            Dezena::Second => 2,
            Dezena::Third => 3,
        };
        write!(f, "{:04}-{:02}/d{}", self.year, self.month, dezena)
    }
}

/// Performance bracket for a vendor's accumulated sales value. Ordering
/// follows the thresholds, with None below bronze.
#[derive(Debug, Clone, Copy, Eq, Ord, PartialEq, PartialOrd)]
pub enum Tier {
    None,
    Bronze,
    Silver,
    Gold,
    Diamond,
}

impl Tier {
    /// Highest tier whose threshold is within the accumulated value.
    pub fn for_value(total_value: u64, goal: &Goal) -> Tier {
        if total_value >= goal.diamond {
            Tier::Diamond
        } else if total_value >= goal.gold {
            Tier::Gold
        } else if total_value >= goal.silver {
            Tier::Silver
        } else if total_value >= goal.bronze {
            Tier::Bronze
        } else {
            Tier::None
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::None => write!(f, "none"),
            Tier::Bronze => write!(f, "bronze"),
            Tier::Silver => write!(f, "silver"),
            Tier::Gold => write!(f, "gold"),
            Tier::Diamond => write!(f, "diamond"),
        }
    }
}

/// Per-vendor, per-dezena goal schedule. Thresholds are monetary values in
/// minor units and must be non-decreasing bronze <= silver <= gold <= diamond.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq)]
pub struct Goal {
    #[n(0)]
    pub id: String,
    #[n(1)]
    pub vendor_id: String,
    #[n(2)]
    pub unit_id: String,
    #[n(3)]
    pub period: Period,
    #[n(4)]
    pub bronze: u64,
    #[n(5)]
    pub silver: u64,
    #[n(6)]
    pub gold: u64,
    #[n(7)]
    pub diamond: u64,
    #[n(8)]
    pub pa_goal: f64,
    #[n(9)]
    pub ticket_goal: u64,
    #[n(10)]
    pub working_days: u32,
}

// Also used for constructing drafts before the thresholds are agreed
#[derive(Debug, Default)]
pub struct GoalDraft {
    vendor_id: Option<String>,
    unit_id: Option<String>,
    period: Option<Period>,
    bronze: u64,
    silver: u64,
    gold: u64,
    diamond: u64,
    pa_goal: f64,
    ticket_goal: u64,
    working_days: u32,
}

impl GoalDraft {
    /// Construct a new draft object, the basis for a stored goal
    pub fn new() -> Self {
        Self::default()
    }
    pub fn for_vendor(mut self, vendor_id: &str) -> Self {
        self.vendor_id = Some(vendor_id.to_owned());
        self
    }
    pub fn in_unit(mut self, unit_id: &str) -> Self {
        self.unit_id = Some(unit_id.to_owned());
        self
    }
    pub fn for_period(mut self, period: Period) -> Self {
        self.period = Some(period);
        self
    }
    pub fn thresholds(mut self, bronze: u64, silver: u64, gold: u64, diamond: u64) -> Self {
        self.bronze = bronze;
        self.silver = silver;
        self.gold = gold;
        self.diamond = diamond;
        self
    }
    pub fn pa_goal(mut self, pa_goal: f64) -> Self {
        self.pa_goal = pa_goal;
        self
    }
    pub fn ticket_goal(mut self, ticket_goal: u64) -> Self {
        self.ticket_goal = ticket_goal;
        self
    }
    pub fn working_days(mut self, working_days: u32) -> Self {
        self.working_days = working_days;
        self
    }

    // Checks fields, performs validation, then mints the goal record
    pub fn validate_and_finalise(&self) -> anyhow::Result<Goal> {
        let vendor_id = self
            .vendor_id
            .clone()
            .ok_or_else(|| anyhow::Error::msg("Goal vendor is not set"))?;
        let unit_id = self
            .unit_id
            .clone()
            .ok_or_else(|| anyhow::Error::msg("Goal unit is not set"))?;
        let period = self
            .period
            .ok_or_else(|| anyhow::Error::msg("Goal period is not set"))?;

        if !(self.bronze <= self.silver && self.silver <= self.gold && self.gold <= self.diamond) {
            return Err(EngineError::Validation(ValidationError::ThresholdOrder).into());
        }
        if self.working_days == 0 {
            return Err(anyhow::Error::msg("Goal working days is set to zero"));
        }

        Ok(Goal {
            id: new_record_id("goal_")?,
            vendor_id,
            unit_id,
            period,
            bronze: self.bronze,
            silver: self.silver,
            gold: self.gold,
            diamond: self.diamond,
            pa_goal: self.pa_goal,
            ticket_goal: self.ticket_goal,
            working_days: self.working_days,
        })
    }
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq)]
pub struct TierRates {
    #[n(0)]
    pub bronze: f64,
    #[n(1)]
    pub silver: f64,
    #[n(2)]
    pub gold: f64,
    #[n(3)]
    pub diamond: f64,
}

impl TierRates {
    pub fn rate(&self, tier: Tier) -> Option<f64> {
        match tier {
            Tier::None => None,
            Tier::Bronze => Some(self.bronze),
            Tier::Silver => Some(self.silver),
            Tier::Gold => Some(self.gold),
            Tier::Diamond => Some(self.diamond),
        }
    }
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq)]
pub struct TierAmounts {
    #[n(0)]
    pub bronze: u64,
    #[n(1)]
    pub silver: u64,
    #[n(2)]
    pub gold: u64,
    #[n(3)]
    pub diamond: u64,
}

impl TierAmounts {
    pub fn amount(&self, tier: Tier) -> Option<u64> {
        match tier {
            Tier::None => None,
            Tier::Bronze => Some(self.bronze),
            Tier::Silver => Some(self.silver),
            Tier::Gold => Some(self.gold),
            Tier::Diamond => Some(self.diamond),
        }
    }
}

/// How a vendor is paid for reaching a tier. Percentage and progressive
/// carry rates applied to the accumulated value; the two labels share one
/// formula and differ only in how the schedule was populated upstream.
/// Fixed carries flat payouts awarded at the achieved tier.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq)]
pub enum CommissionSchedule {
    #[n(0)]
    Percentage(#[n(0)] TierRates),
    #[n(1)]
    Progressive(#[n(0)] TierRates),
    #[n(2)]
    Fixed(#[n(0)] TierAmounts),
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq)]
pub struct Commission {
    #[n(0)]
    pub id: String,
    #[n(1)]
    pub vendor_id: String,
    #[n(2)]
    pub goal_id: String,
    #[n(3)]
    pub schedule: CommissionSchedule,
}

impl Commission {
    pub fn new(
        vendor_id: &str,
        goal_id: &str,
        schedule: CommissionSchedule,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            id: new_record_id("comm_")?,
            vendor_id: vendor_id.to_owned(),
            goal_id: goal_id.to_owned(),
            schedule,
        })
    }
}
