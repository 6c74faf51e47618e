//! Smoke Screen Unit tests for sales-floor engine components
//!
//! These test are unit tests that span the codebase, testing behavior in
//! isolation from integration scenarios. These are intended as smoke-screen
//! and generally test the happy-path.
//!
#![allow(unused_imports)]

use chrono::{Datelike, Timelike, Utc};
use sales_floor::{
    error::EngineError,
    goal::{
        Commission, CommissionSchedule, Dezena, GoalDraft, Period, Tier, TierAmounts, TierRates,
    },
    metrics::{
        average_ticket, commission_owed, daily_target, items_per_sale, missing_to, projection,
    },
    queue::{QueueEntry, QueueStatus},
    roster::{Capability, Role, Staff, Unit},
    sale::{Sale, SaleStatus, TimeStamp},
    utils::new_record_id,
};

// UTILS MODULE TESTS
#[cfg(test)]
mod utils_tests {
    use super::*;

    /// Test that new_record_id generates valid bech32-encoded strings
    /// with the correct human-readable prefix
    #[test]
    fn generates_valid_bech32_with_hrp() {
        let result = new_record_id("sale_");
        assert!(result.is_ok());

        let encoded = result.unwrap();
        assert!(encoded.starts_with("sale_1"));
        assert!(encoded.len() > 10); // UUID should produce substantial output
    }

    /// Test that the function handles empty strings appropriately
    #[test]
    fn handles_empty_hrp() {
        // Empty string should fail
        let result = new_record_id("");
        assert!(result.is_err());
    }

    /// Test that multiple calls generate unique identifiers
    #[test]
    fn generates_unique_ids() {
        let id1 = new_record_id("sale_").unwrap();
        let id2 = new_record_id("sale_").unwrap();
        let id3 = new_record_id("sale_").unwrap();

        assert_ne!(id1, id2);
        assert_ne!(id2, id3);
        assert_ne!(id1, id3);
    }

    /// Test that different HRPs produce different encoded strings
    #[test]
    fn different_hrps_produce_different_encodings() {
        let sale_id = new_record_id("sale_").unwrap();
        let unit_id = new_record_id("unit_").unwrap();

        assert!(sale_id.starts_with("sale_"));
        assert!(unit_id.starts_with("unit_"));
        assert_ne!(sale_id, unit_id);
    }
}

// SALE MODULE TESTS
#[cfg(test)]
mod sale_tests {
    use super::*;

    /// Test that TimeStamp::new() creates a timestamp close to current time
    #[test]
    fn timestamp_new_creates_current_time() {
        let ts = TimeStamp::new();
        let now = Utc::now();

        let diff = (now - ts.to_datetime_utc()).num_seconds().abs();
        assert!(diff < 1); // Should be within 1 second
    }

    /// Test that TimeStamp can be created with specific date/time values
    #[test]
    fn timestamp_new_with_creates_specific_time() {
        let ts = TimeStamp::new_with(2026, 8, 7, 10, 30, 0);
        let dt = ts.to_datetime_utc();

        assert_eq!(dt.year(), 2026);
        assert_eq!(dt.month(), 8);
        assert_eq!(dt.day(), 7);
        assert_eq!(dt.hour(), 10);
        assert_eq!(dt.minute(), 30);
    }

    /// Test that a freshly minted sale starts pending with no approval marks
    #[test]
    fn new_sale_starts_pending() {
        let sale = Sale::new("vendor_x", "unit_x", 850, 3).unwrap();

        assert_eq!(sale.status, SaleStatus::Pending);
        assert!(sale.is_pending());
        assert!(sale.id.starts_with("sale_"));
        assert!(sale.approved_at.is_none());
        assert!(sale.approved_by.is_none());
        assert!(sale.rejection_reason.is_none());
    }

    /// Test that zero figures are rejected at construction
    #[test]
    fn new_sale_rejects_zero_figures() {
        assert!(Sale::new("vendor_x", "unit_x", 0, 3).is_err());
        assert!(Sale::new("vendor_x", "unit_x", 850, 0).is_err());
    }

    /// Test that approval stamps the record and keeps corrected figures
    #[test]
    fn approval_stamps_and_corrects() {
        let mut sale = Sale::new("vendor_x", "unit_x", 850, 3).unwrap();

        sale.approve("manager_x", Some(900), Some(4)).unwrap();

        assert_eq!(sale.status, SaleStatus::Approved);
        assert_eq!(sale.value, 900);
        assert_eq!(sale.item_count, 4);
        assert_eq!(sale.approved_by.as_deref(), Some("manager_x"));
        assert!(sale.approved_at.is_some());
    }

    /// Test that a zero correction is rejected and leaves the sale pending
    #[test]
    fn zero_correction_is_rejected() {
        let mut sale = Sale::new("vendor_x", "unit_x", 850, 3).unwrap();

        assert!(sale.approve("manager_x", Some(0), None).is_err());
        assert!(sale.is_pending());
        assert_eq!(sale.value, 850);
    }

    /// Test that rejection is terminal and records the reason
    #[test]
    fn rejection_is_terminal() {
        let mut sale = Sale::new("vendor_x", "unit_x", 850, 3).unwrap();

        sale.reject(Some("no receipt")).unwrap();
        assert_eq!(sale.status, SaleStatus::Rejected);
        assert_eq!(sale.rejection_reason.as_deref(), Some("no receipt"));

        assert!(matches!(
            sale.approve("manager_x", None, None),
            Err(EngineError::InvalidStateTransition { .. })
        ));
    }
}

// QUEUE MODULE TESTS
#[cfg(test)]
mod queue_tests {
    use super::*;

    /// Test that a new entry is an active waiting entry at the given rank
    #[test]
    fn new_entry_waits_at_position() {
        let entry = QueueEntry::new("vendor_x", "unit_x", 5).unwrap();

        assert_eq!(entry.status, QueueStatus::Waiting);
        assert_eq!(entry.position, 5);
        assert!(entry.is_active);
        assert_eq!(entry.customer_count, 0);
    }

    /// Test the waiting -> serving transition and its service clock
    #[test]
    fn start_serving_stamps_clock() {
        let mut entry = QueueEntry::new("vendor_x", "unit_x", 1).unwrap();

        entry.start_serving().unwrap();

        assert_eq!(entry.status, QueueStatus::Serving);
        assert!(entry.started_serving_at.is_some());
        assert_eq!(entry.customer_count, 1);
    }

    /// Test that suspension is only reachable from waiting
    #[test]
    fn suspend_requires_waiting() {
        let mut entry = QueueEntry::new("vendor_x", "unit_x", 1).unwrap();
        entry.start_serving().unwrap();

        assert!(matches!(
            entry.suspend(),
            Err(EngineError::InvalidStateTransition { .. })
        ));
    }

    /// Test that deactivation keeps the position for the record
    #[test]
    fn deactivation_preserves_position() {
        let mut entry = QueueEntry::new("vendor_x", "unit_x", 7).unwrap();
        entry.deactivate();

        assert!(!entry.is_active);
        assert_eq!(entry.position, 7);
    }
}

// GOAL MODULE TESTS
#[cfg(test)]
mod goal_tests {
    use super::*;

    /// Test the dezena windows over a calendar month
    #[test]
    fn dezena_windows() {
        assert_eq!(Dezena::of_day(5), Dezena::First);
        assert_eq!(Dezena::of_day(15), Dezena::Second);
        assert_eq!(Dezena::of_day(25), Dezena::Third);
    }

    /// Test that a period contains exactly its own dezena's timestamps
    #[test]
    fn period_contains_own_window() {
        let period = Period::new(2026, 8, Dezena::First);

        assert!(period.contains(&TimeStamp::new_with(2026, 8, 1, 9, 0, 0)));
        assert!(period.contains(&TimeStamp::new_with(2026, 8, 10, 23, 59, 0)));
        assert!(!period.contains(&TimeStamp::new_with(2026, 8, 11, 0, 0, 0)));
        assert!(!period.contains(&TimeStamp::new_with(2026, 7, 5, 9, 0, 0)));
    }

    /// Test that goal drafts enforce the threshold ordering invariant
    #[test]
    fn draft_enforces_threshold_order() {
        let draft = GoalDraft::new()
            .for_vendor("vendor_x")
            .in_unit("unit_x")
            .for_period(Period::new(2026, 8, Dezena::Second))
            .thresholds(5_000, 4_999, 10_000, 15_000)
            .working_days(9);

        assert!(draft.validate_and_finalise().is_err());
    }

    /// Test that equal thresholds are allowed (non-decreasing, not strict)
    #[test]
    fn draft_allows_equal_thresholds() {
        let draft = GoalDraft::new()
            .for_vendor("vendor_x")
            .in_unit("unit_x")
            .for_period(Period::new(2026, 8, Dezena::Second))
            .thresholds(5_000, 5_000, 10_000, 10_000)
            .working_days(9);

        assert!(draft.validate_and_finalise().is_ok());
    }

    /// Test tier ordering used by the monotonicity property
    #[test]
    fn tier_ordering() {
        assert!(Tier::None < Tier::Bronze);
        assert!(Tier::Bronze < Tier::Silver);
        assert!(Tier::Silver < Tier::Gold);
        assert!(Tier::Gold < Tier::Diamond);
    }
}

// ROSTER MODULE TESTS
#[cfg(test)]
mod roster_tests {
    use super::*;

    /// Test the role capability matrix
    #[test]
    fn capability_matrix() {
        assert!(Role::Admin.can(Capability::ManageRoster));
        assert!(!Role::Admin.can(Capability::ApproveSales));
        assert!(!Role::Admin.can(Capability::SubmitSales));

        assert!(Role::Manager.can(Capability::ApproveSales));
        assert!(Role::Supervisor.can(Capability::ApproveSales));
        assert!(!Role::Manager.can(Capability::ManageRoster));

        assert!(Role::Vendor.can(Capability::SubmitSales));
        assert!(Role::Vendor.can(Capability::JoinQueue));
        assert!(!Role::Vendor.can(Capability::ApproveSales));
    }

    /// Test the active-vendor check used by submit preconditions
    #[test]
    fn active_vendor_check() {
        let vendor = Staff::new("Maria", Role::Vendor, Some("unit_x")).unwrap();
        assert!(vendor.is_active_vendor());

        let manager = Staff::new("Carlos", Role::Manager, Some("unit_x")).unwrap();
        assert!(!manager.is_active_vendor());

        let mut inactive = Staff::new("Ana", Role::Vendor, None).unwrap();
        inactive.is_active = false;
        assert!(!inactive.is_active_vendor());
    }
}

// METRICS MODULE TESTS
#[cfg(test)]
mod metrics_tests {
    use super::*;

    /// Test the projection arithmetic on the documented examples
    #[test]
    fn projection_examples() {
        assert_eq!(projection(1_000, 1, 10), 10_000.0);
        assert_eq!(projection(1_000, 5, 10), 2_000.0);
    }

    /// Test missing-to-threshold flooring
    #[test]
    fn missing_examples() {
        assert_eq!(missing_to(12_000, 15_000), 3_000);
        assert_eq!(missing_to(16_000, 15_000), 0);
    }

    /// Test the PA ratio and its empty-period guard
    #[test]
    fn pa_examples() {
        assert_eq!(items_per_sale(45, 15), 3.0);
        assert_eq!(items_per_sale(0, 0), 0.0);
    }

    /// Test fixed and rate commission on the documented examples
    #[test]
    fn commission_examples() {
        let fixed = CommissionSchedule::Fixed(TierAmounts {
            bronze: 200,
            silver: 350,
            gold: 500,
            diamond: 800,
        });
        assert_eq!(commission_owed(10_000, Tier::Gold, &fixed), 500.0);

        let percentage = CommissionSchedule::Percentage(TierRates {
            bronze: 0.5,
            silver: 0.75,
            gold: 1.0,
            diamond: 1.5,
        });
        assert_eq!(commission_owed(10_000, Tier::Gold, &percentage), 100.0);
    }

    /// Test the daily target division guard
    #[test]
    fn daily_target_guards_last_day() {
        assert_eq!(daily_target(2_500, 2), 1_250.0);
        assert_eq!(daily_target(2_500, 0), 2_500.0);
    }

    /// Test the average ticket ratio
    #[test]
    fn average_ticket_examples() {
        assert_eq!(average_ticket(12_500, 15), 12_500.0 / 15.0);
        assert_eq!(average_ticket(0, 0), 0.0);
    }
}
