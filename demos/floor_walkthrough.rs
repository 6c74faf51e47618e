//! End-to-end walkthrough of a floor day: roster setup, queue rotation,
//! sale approval and the derived scorecard, with the audit trail landing on
//! stdout through the tracing sink.

use sales_floor::{
    audit::{Actor, TracingSink},
    goal::{CommissionSchedule, GoalDraft, Period, TierRates},
    roster::Role,
    service::FloorService,
};
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let db = Arc::new(sled::open("floor")?);

    if !db.is_empty() {
        db.clear()?;
    }

    let service = FloorService::new(db, Arc::new(TracingSink))?;
    let admin = Actor::new("staff_admin", "Admin", Role::Admin);

    // roster
    let unit = service.register_unit("Loja Centro", 150_000, &admin)?;
    let manager = service.register_staff("Carlos", Role::Manager, Some(&unit.id), &admin)?;
    let vendor = service.register_staff("Maria", Role::Vendor, Some(&unit.id), &admin)?;
    service.assign_manager(&unit.id, &manager.id, &admin)?;

    // the vendor takes a place in the rotation and serves a customer
    let entry = service.join_queue(&vendor.id, &unit.id)?;
    service.start_serving(&entry.id)?;

    // the sale goes in pending and the manager approves it with a correction
    let sale = service.submit_sale(&vendor.id, &unit.id, 850, 3)?;
    let approver = Actor::new(&manager.id, &manager.name, manager.role);
    let sale = service.approve_sale(&sale.id, Some(900), None, &approver)?;
    println!("approved: {sale:#?}");

    service.leave_queue(&entry.id)?;

    // goal and commission for the running dezena, then the derived scorecard
    let period = Period::containing(chrono::Utc::now().date_naive());
    service.set_goal(
        GoalDraft::new()
            .for_vendor(&vendor.id)
            .in_unit(&unit.id)
            .for_period(period)
            .thresholds(5_000, 7_500, 10_000, 15_000)
            .pa_goal(3.0)
            .ticket_goal(800)
            .working_days(9),
        &admin,
    )?;
    service.set_commission(
        &vendor.id,
        period,
        CommissionSchedule::Progressive(TierRates {
            bronze: 0.5,
            silver: 0.75,
            gold: 1.0,
            diamond: 1.5,
        }),
        &admin,
    )?;

    let card = service.vendor_scorecard(&vendor.id, period, 1)?;
    println!("{} is at tier {}", vendor.name, card.tier);
    println!("{card:#?}");

    for unit in service.units()? {
        println!(
            "unit {} pending sales: {}",
            unit.name,
            service.pending_sales(Some(&unit.id))?.len()
        );
    }

    Ok(())
}
