//! Service layer API for sales-floor workflow operations
use super::audit::{Actor, AuditEntry, AuditSink};
use super::error::{EngineError, ValidationError};
use super::goal::{Commission, CommissionSchedule, Goal, GoalDraft, Period};
use super::metrics::{ScoreCard, VendorStats};
use super::queue::QueueEntry;
use super::roster::{Capability, Role, Staff, Unit};
use super::sale::Sale;
use super::store::FloorStore;
use std::sync::Arc;

pub struct FloorService {
    store: FloorStore,
    audit: Arc<dyn AuditSink + Send + Sync>,
}

fn actor_for(member: &Staff) -> Actor {
    Actor::new(&member.id, &member.name, member.role)
}

impl FloorService {
    pub fn new(
        db: Arc<sled::Db>,
        audit: Arc<dyn AuditSink + Send + Sync>,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            store: FloorStore::open(&db)?,
            audit,
        })
    }

    // roster administration

    pub fn register_unit(
        &self,
        name: &str,
        monthly_goal: u64,
        actor: &Actor,
    ) -> anyhow::Result<Unit> {
        let unit = Unit::new(name, monthly_goal)?;
        self.store.upsert_unit(&unit)?;

        self.audit.record(
            AuditEntry::new(
                actor,
                "unit_registered",
                format!("registered unit {} ({})", unit.name, unit.id),
            )
            .in_unit(&unit.id),
        );

        Ok(unit)
    }

    pub fn deactivate_unit(&self, unit_id: &str, actor: &Actor) -> anyhow::Result<Unit> {
        let mut unit = self
            .store
            .unit(unit_id)?
            .ok_or_else(|| EngineError::NotFound(unit_id.to_owned()))?;

        unit.is_active = false;
        self.store.upsert_unit(&unit)?;

        self.audit.record(
            AuditEntry::new(
                actor,
                "unit_deactivated",
                format!("deactivated unit {}", unit.name),
            )
            .in_unit(unit_id),
        );

        Ok(unit)
    }

    /// Point a unit at its manager. The referenced staff member must be able
    /// to approve sales.
    pub fn assign_manager(
        &self,
        unit_id: &str,
        manager_id: &str,
        actor: &Actor,
    ) -> anyhow::Result<Unit> {
        let mut unit = self
            .store
            .unit(unit_id)?
            .ok_or_else(|| EngineError::NotFound(unit_id.to_owned()))?;
        let manager = self
            .store
            .staff_member(manager_id)?
            .ok_or_else(|| EngineError::NotFound(manager_id.to_owned()))?;

        if !manager.is_active || !manager.role.can(Capability::ApproveSales) {
            return Err(EngineError::Validation(ValidationError::CannotApproveSales(
                manager_id.to_owned(),
            ))
            .into());
        }

        unit.manager_id = Some(manager.id.clone());
        self.store.upsert_unit(&unit)?;

        self.audit.record(
            AuditEntry::new(
                actor,
                "manager_assigned",
                format!("assigned {} to manage {}", manager.name, unit.name),
            )
            .in_unit(unit_id),
        );

        Ok(unit)
    }

    pub fn register_staff(
        &self,
        name: &str,
        role: Role,
        unit_id: Option<&str>,
        actor: &Actor,
    ) -> anyhow::Result<Staff> {
        if let Some(unit_id) = unit_id {
            self.store
                .unit(unit_id)?
                .ok_or_else(|| EngineError::NotFound(unit_id.to_owned()))?;
        }

        let member = Staff::new(name, role, unit_id)?;
        self.store.upsert_staff(&member)?;

        let mut entry = AuditEntry::new(
            actor,
            "staff_registered",
            format!("registered {} {} ({})", member.role, member.name, member.id),
        );
        if let Some(unit_id) = unit_id {
            entry = entry.in_unit(unit_id);
        }
        self.audit.record(entry);

        Ok(member)
    }

    /// Registered units in creation order.
    pub fn units(&self) -> anyhow::Result<Vec<Unit>> {
        self.store.units()
    }

    /// Deactivation takes the member off the active roster; historical sales
    /// are untouched.
    pub fn deactivate_staff(&self, staff_id: &str, actor: &Actor) -> anyhow::Result<Staff> {
        let mut member = self
            .store
            .staff_member(staff_id)?
            .ok_or_else(|| EngineError::NotFound(staff_id.to_owned()))?;

        member.is_active = false;
        self.store.upsert_staff(&member)?;

        self.audit.record(AuditEntry::new(
            actor,
            "staff_deactivated",
            format!("deactivated {} {}", member.role, member.name),
        ));

        Ok(member)
    }

    // sale lifecycle

    /// Submit a sale for approval. The vendor must be on the active roster
    /// and the unit must exist and be active; the sale lands pending with no
    /// effect on queue or stats until it is resolved.
    pub fn submit_sale(
        &self,
        vendor_id: &str,
        unit_id: &str,
        value: u64,
        item_count: u32,
    ) -> anyhow::Result<Sale> {
        let vendor = self
            .store
            .staff_member(vendor_id)?
            .ok_or_else(|| EngineError::NotFound(vendor_id.to_owned()))?;
        if !vendor.is_active_vendor() {
            return Err(EngineError::Validation(ValidationError::NotAnActiveVendor(
                vendor_id.to_owned(),
            ))
            .into());
        }
        let unit = self
            .store
            .unit(unit_id)?
            .ok_or_else(|| EngineError::NotFound(unit_id.to_owned()))?;
        if !unit.is_active {
            return Err(EngineError::Validation(ValidationError::NotAnActiveUnit(
                unit_id.to_owned(),
            ))
            .into());
        }

        let sale = Sale::new(vendor_id, unit_id, value, item_count)?;
        self.store.upsert_sale(&sale)?;

        self.audit.record(
            AuditEntry::new(
                &actor_for(&vendor),
                "sale_submitted",
                format!(
                    "submitted sale {} of {} ({} items)",
                    sale.id, sale.value, sale.item_count
                ),
            )
            .in_unit(unit_id),
        );

        Ok(sale)
    }

    /// Approve a pending sale, optionally correcting the reported figures in
    /// the same record write as the status change.
    pub fn approve_sale(
        &self,
        sale_id: &str,
        corrected_value: Option<u64>,
        corrected_item_count: Option<u32>,
        approver: &Actor,
    ) -> anyhow::Result<Sale> {
        let mut sale = self
            .store
            .sale(sale_id)?
            .ok_or_else(|| EngineError::NotFound(sale_id.to_owned()))?;

        sale.approve(&approver.id, corrected_value, corrected_item_count)?;
        self.store.upsert_sale(&sale)?;

        let correction = if corrected_value.is_some() || corrected_item_count.is_some() {
            " with correction"
        } else {
            ""
        };
        self.audit.record(
            AuditEntry::new(
                approver,
                "sale_approved",
                format!(
                    "approved sale {} of {} ({} items){}",
                    sale.id, sale.value, sale.item_count, correction
                ),
            )
            .in_unit(&sale.unit_id),
        );

        Ok(sale)
    }

    /// Reject a pending sale. No correction is permitted on rejection.
    pub fn reject_sale(
        &self,
        sale_id: &str,
        reason: Option<&str>,
        approver: &Actor,
    ) -> anyhow::Result<Sale> {
        let mut sale = self
            .store
            .sale(sale_id)?
            .ok_or_else(|| EngineError::NotFound(sale_id.to_owned()))?;

        sale.reject(reason)?;
        self.store.upsert_sale(&sale)?;

        self.audit.record(
            AuditEntry::new(
                approver,
                "sale_rejected",
                format!(
                    "rejected sale {}{}",
                    sale.id,
                    reason.map(|r| format!(": {r}")).unwrap_or_default()
                ),
            )
            .in_unit(&sale.unit_id),
        );

        Ok(sale)
    }

    /// Pending sales for review, most recent first.
    pub fn pending_sales(&self, unit_id: Option<&str>) -> anyhow::Result<Vec<Sale>> {
        self.store.pending_sales(unit_id)
    }

    // queue

    /// Join a unit's service rotation at the next arrival rank.
    pub fn join_queue(&self, vendor_id: &str, unit_id: &str) -> anyhow::Result<QueueEntry> {
        let member = self
            .store
            .staff_member(vendor_id)?
            .ok_or_else(|| EngineError::NotFound(vendor_id.to_owned()))?;
        if !member.is_active || !member.role.can(Capability::JoinQueue) {
            return Err(EngineError::Validation(ValidationError::CannotJoinQueue(
                vendor_id.to_owned(),
            ))
            .into());
        }
        let unit = self
            .store
            .unit(unit_id)?
            .ok_or_else(|| EngineError::NotFound(unit_id.to_owned()))?;
        if !unit.is_active {
            return Err(EngineError::Validation(ValidationError::NotAnActiveUnit(
                unit_id.to_owned(),
            ))
            .into());
        }

        if self.store.active_entry_for(unit_id, vendor_id)?.is_some() {
            return Err(EngineError::AlreadyQueued {
                vendor_id: vendor_id.to_owned(),
                unit_id: unit_id.to_owned(),
            }
            .into());
        }

        let entry = QueueEntry::new(vendor_id, unit_id, self.store.next_position(unit_id)?)?;
        self.store.upsert_queue_entry(&entry)?;

        self.audit.record(
            AuditEntry::new(
                &actor_for(&member),
                "queue_joined",
                format!("joined the queue at position {}", entry.position),
            )
            .in_unit(unit_id),
        );

        Ok(entry)
    }

    /// Leave the rotation. The entry is soft-deleted and the remaining
    /// positions are NOT renumbered: rank, not slot, determines who is
    /// served next.
    pub fn leave_queue(&self, entry_id: &str) -> anyhow::Result<QueueEntry> {
        let mut entry = self
            .store
            .queue_entry(entry_id)?
            .ok_or_else(|| EngineError::NotFound(entry_id.to_owned()))?;

        entry.deactivate();
        self.store.upsert_queue_entry(&entry)?;

        if let Some(member) = self.store.staff_member(&entry.vendor_id)? {
            self.audit.record(
                AuditEntry::new(
                    &actor_for(&member),
                    "queue_left",
                    format!("left the queue from position {}", entry.position),
                )
                .in_unit(&entry.unit_id),
            );
        }

        Ok(entry)
    }

    pub fn start_serving(&self, entry_id: &str) -> anyhow::Result<QueueEntry> {
        let mut entry = self
            .store
            .queue_entry(entry_id)?
            .ok_or_else(|| EngineError::NotFound(entry_id.to_owned()))?;

        entry.start_serving()?;
        self.store.upsert_queue_entry(&entry)?;

        if let Some(member) = self.store.staff_member(&entry.vendor_id)? {
            self.audit.record(
                AuditEntry::new(
                    &actor_for(&member),
                    "serving_started",
                    format!("started serving from position {}", entry.position),
                )
                .in_unit(&entry.unit_id),
            );
        }

        Ok(entry)
    }

    pub fn suspend_entry(&self, entry_id: &str) -> anyhow::Result<QueueEntry> {
        let mut entry = self
            .store
            .queue_entry(entry_id)?
            .ok_or_else(|| EngineError::NotFound(entry_id.to_owned()))?;

        entry.suspend()?;
        self.store.upsert_queue_entry(&entry)?;

        Ok(entry)
    }

    pub fn resume_entry(&self, entry_id: &str) -> anyhow::Result<QueueEntry> {
        let mut entry = self
            .store
            .queue_entry(entry_id)?
            .ok_or_else(|| EngineError::NotFound(entry_id.to_owned()))?;

        entry.resume()?;
        self.store.upsert_queue_entry(&entry)?;

        Ok(entry)
    }

    /// Active entries of a unit in serving order.
    pub fn active_queue(&self, unit_id: &str) -> anyhow::Result<Vec<QueueEntry>> {
        self.store.active_queue(unit_id)
    }

    // goals and commissions

    /// Validate and store a goal schedule for a vendor's period.
    pub fn set_goal(&self, draft: GoalDraft, actor: &Actor) -> anyhow::Result<Goal> {
        let goal = draft.validate_and_finalise()?;

        self.store
            .staff_member(&goal.vendor_id)?
            .ok_or_else(|| EngineError::NotFound(goal.vendor_id.clone()))?;

        self.store.upsert_goal(&goal)?;

        self.audit.record(
            AuditEntry::new(
                actor,
                "goal_set",
                format!(
                    "set {} goal for {} (diamond at {})",
                    goal.period, goal.vendor_id, goal.diamond
                ),
            )
            .in_unit(&goal.unit_id),
        );

        Ok(goal)
    }

    /// Attach a commission schedule to the stored goal for a vendor/period.
    pub fn set_commission(
        &self,
        vendor_id: &str,
        period: Period,
        schedule: CommissionSchedule,
        actor: &Actor,
    ) -> anyhow::Result<Commission> {
        let goal = self.store.goal_for(vendor_id, period)?.ok_or_else(|| {
            EngineError::Validation(ValidationError::DanglingCommission(vendor_id.to_owned()))
        })?;

        let commission = Commission::new(vendor_id, &goal.id, schedule)?;
        self.store.upsert_commission(&commission)?;

        self.audit.record(
            AuditEntry::new(
                actor,
                "commission_set",
                format!("set {} commission schedule for {}", period, vendor_id),
            )
            .in_unit(&goal.unit_id),
        );

        Ok(commission)
    }

    pub fn goal_for(&self, vendor_id: &str, period: Period) -> anyhow::Result<Option<Goal>> {
        self.store.goal_for(vendor_id, period)
    }

    pub fn commission_for(
        &self,
        vendor_id: &str,
        period: Period,
    ) -> anyhow::Result<Option<Commission>> {
        match self.store.goal_for(vendor_id, period)? {
            Some(goal) => self.store.commission_for_goal(&goal.id),
            None => Ok(None),
        }
    }

    // reporting

    /// Aggregate a vendor's approved sales for the period. Pure projection,
    /// safe to recompute on every read.
    pub fn vendor_stats(
        &self,
        vendor_id: &str,
        period: Period,
        days_elapsed: u32,
    ) -> anyhow::Result<VendorStats> {
        let sales = self.store.vendor_sales(vendor_id)?;
        Ok(VendorStats::collect(vendor_id, period, &sales, days_elapsed))
    }

    /// Full display row: stats plus tier, projection and commission against
    /// the stored goal for the period.
    pub fn vendor_scorecard(
        &self,
        vendor_id: &str,
        period: Period,
        days_elapsed: u32,
    ) -> anyhow::Result<ScoreCard> {
        let goal = self
            .store
            .goal_for(vendor_id, period)?
            .ok_or_else(|| EngineError::NotFound(format!("goal for {vendor_id} in {period}")))?;
        let commission = self.store.commission_for_goal(&goal.id)?;
        let stats = self.vendor_stats(vendor_id, period, days_elapsed)?;

        Ok(ScoreCard::build(stats, &goal, commission.as_ref()))
    }
}
