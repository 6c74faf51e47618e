//! Pure derivation functions over aggregated vendor sales
//!
//! Everything here is recomputed on demand from current aggregates; nothing
//! holds state or touches the store.
use super::goal::{Commission, CommissionSchedule, Goal, Period, Tier};
use super::sale::{Sale, SaleStatus};

/// Projected period total from the running daily average. Days elapsed is
/// clamped to one so a period that has just started projects from the first
/// day rather than dividing by zero.
pub fn projection(total_value: u64, days_elapsed: u32, total_days: u32) -> f64 {
    let daily_average = total_value as f64 / days_elapsed.max(1) as f64;
    daily_average * total_days as f64
}

/// Amount still missing to reach a threshold, floored at zero.
pub fn missing_to(total_value: u64, threshold: u64) -> u64 {
    threshold.saturating_sub(total_value)
}

/// Value that must land per remaining day to close the missing amount.
pub fn daily_target(missing: u64, remaining_days: u32) -> f64 {
    missing as f64 / remaining_days.max(1) as f64
}

/// Commission owed for the achieved tier. Fixed schedules pay the flat
/// amount for the tier; percentage and progressive schedules apply the
/// tier's rate to the accumulated value. No tier, no payout.
pub fn commission_owed(total_value: u64, tier: Tier, schedule: &CommissionSchedule) -> f64 {
    match schedule {
        CommissionSchedule::Fixed(amounts) => amounts.amount(tier).unwrap_or(0) as f64,
        CommissionSchedule::Percentage(rates) | CommissionSchedule::Progressive(rates) => {
            total_value as f64 * rates.rate(tier).unwrap_or(0.0) / 100.0
        }
    }
}

/// Items-per-sale ratio (PA), a proxy for basket size. A vendor with no
/// sales has a PA of zero, not a division error.
pub fn items_per_sale(item_count: u32, sales_count: u32) -> f64 {
    if sales_count == 0 {
        return 0.0;
    }
    item_count as f64 / sales_count as f64
}

/// Average sale value ("ticket medio").
pub fn average_ticket(total_value: u64, sales_count: u32) -> f64 {
    if sales_count == 0 {
        return 0.0;
    }
    total_value as f64 / sales_count as f64
}

/// Aggregated approved sales for one vendor in one period. Recomputed from
/// the approved Sale set whenever it changes; never mutated directly.
#[derive(Debug, Clone, PartialEq)]
pub struct VendorStats {
    pub vendor_id: String,
    pub period: Period,
    pub sales_count: u32,
    pub total_value: u64,
    pub item_count: u32,
    pub days_elapsed: u32,
}

impl VendorStats {
    /// Fold the approved sales of `vendor_id` that fall inside `period`.
    /// Pending and rejected sales never count.
    pub fn collect(vendor_id: &str, period: Period, sales: &[Sale], days_elapsed: u32) -> Self {
        let mut stats = Self {
            vendor_id: vendor_id.to_owned(),
            period,
            sales_count: 0,
            total_value: 0,
            item_count: 0,
            days_elapsed,
        };

        for sale in sales {
            if sale.vendor_id != vendor_id
                || sale.status != SaleStatus::Approved
                || !period.contains(&sale.created_at)
            {
                continue;
            }
            stats.sales_count += 1;
            stats.total_value += sale.value;
            stats.item_count += sale.item_count;
        }

        stats
    }
}

/// Display row derived from a vendor's stats against the period goal.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreCard {
    pub stats: VendorStats,
    pub tier: Tier,
    pub projection: f64,
    pub missing_to_diamond: u64,
    pub daily_target: f64,
    pub pa: f64,
    pub average_ticket: f64,
    pub commission_owed: Option<f64>,
}

impl ScoreCard {
    pub fn build(stats: VendorStats, goal: &Goal, commission: Option<&Commission>) -> Self {
        let tier = Tier::for_value(stats.total_value, goal);
        let missing = missing_to(stats.total_value, goal.diamond);
        let remaining_days = goal.working_days.saturating_sub(stats.days_elapsed);

        Self {
            tier,
            projection: projection(stats.total_value, stats.days_elapsed, goal.working_days),
            missing_to_diamond: missing,
            daily_target: daily_target(missing, remaining_days),
            pa: items_per_sale(stats.item_count, stats.sales_count),
            average_ticket: average_ticket(stats.total_value, stats.sales_count),
            commission_owed: commission
                .map(|c| commission_owed(stats.total_value, tier, &c.schedule)),
            stats,
        }
    }
}
