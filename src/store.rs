//! Embedded persistence for floor records
//!
//! One sled tree per collection, records encoded with minicbor and keyed by
//! their bech32 id (goals use a vendor/period key, commissions their goal
//! id). Absence is reported as `None`; constraint checks live in the
//! service layer where the error kinds are.
use super::goal::{Commission, Goal, Period};
use super::queue::QueueEntry;
use super::roster::{Staff, Unit};
use super::sale::{Sale, SaleStatus};
use std::sync::Arc;

pub struct FloorStore {
    units: sled::Tree,
    staff: sled::Tree,
    sales: sled::Tree,
    queue: sled::Tree,
    goals: sled::Tree,
    commissions: sled::Tree,
}

fn put<T: minicbor::Encode<()>>(tree: &sled::Tree, key: &str, record: &T) -> anyhow::Result<()> {
    tree.insert(key.as_bytes(), minicbor::to_vec(record)?)?;
    Ok(())
}

fn get<T: for<'b> minicbor::Decode<'b, ()>>(
    tree: &sled::Tree,
    key: &str,
) -> anyhow::Result<Option<T>> {
    match tree.get(key.as_bytes())? {
        Some(raw) => Ok(Some(minicbor::decode(raw.as_ref())?)),
        None => Ok(None),
    }
}

fn scan<T: for<'b> minicbor::Decode<'b, ()>>(tree: &sled::Tree) -> anyhow::Result<Vec<T>> {
    let mut records = Vec::new();
    for item in tree.iter() {
        let (_, raw) = item?;
        records.push(minicbor::decode(raw.as_ref())?);
    }
    Ok(records)
}

impl FloorStore {
    pub fn open(db: &Arc<sled::Db>) -> anyhow::Result<Self> {
        Ok(Self {
            units: db.open_tree("units")?,
            staff: db.open_tree("staff")?,
            sales: db.open_tree("sales")?,
            queue: db.open_tree("queue_entries")?,
            goals: db.open_tree("goals")?,
            commissions: db.open_tree("commissions")?,
        })
    }

    // units

    pub fn upsert_unit(&self, unit: &Unit) -> anyhow::Result<()> {
        put(&self.units, &unit.id, unit)
    }

    pub fn unit(&self, id: &str) -> anyhow::Result<Option<Unit>> {
        get(&self.units, id)
    }

    pub fn units(&self) -> anyhow::Result<Vec<Unit>> {
        let mut units: Vec<Unit> = scan(&self.units)?;
        units.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(units)
    }

    // staff

    pub fn upsert_staff(&self, member: &Staff) -> anyhow::Result<()> {
        put(&self.staff, &member.id, member)
    }

    pub fn staff_member(&self, id: &str) -> anyhow::Result<Option<Staff>> {
        get(&self.staff, id)
    }

    // sales

    pub fn upsert_sale(&self, sale: &Sale) -> anyhow::Result<()> {
        put(&self.sales, &sale.id, sale)
    }

    pub fn sale(&self, id: &str) -> anyhow::Result<Option<Sale>> {
        get(&self.sales, id)
    }

    /// Pending sales, most recent first, optionally restricted to a unit.
    pub fn pending_sales(&self, unit_id: Option<&str>) -> anyhow::Result<Vec<Sale>> {
        let mut sales: Vec<Sale> = scan(&self.sales)?;
        sales.retain(|sale| {
            sale.status == SaleStatus::Pending
                && unit_id.is_none_or(|unit| sale.unit_id == unit)
        });
        sales.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sales)
    }

    pub fn vendor_sales(&self, vendor_id: &str) -> anyhow::Result<Vec<Sale>> {
        let mut sales: Vec<Sale> = scan(&self.sales)?;
        sales.retain(|sale| sale.vendor_id == vendor_id);
        Ok(sales)
    }

    // queue

    pub fn upsert_queue_entry(&self, entry: &QueueEntry) -> anyhow::Result<()> {
        put(&self.queue, &entry.id, entry)
    }

    pub fn queue_entry(&self, id: &str) -> anyhow::Result<Option<QueueEntry>> {
        get(&self.queue, id)
    }

    /// Active entries of a unit in serving order (ascending position).
    pub fn active_queue(&self, unit_id: &str) -> anyhow::Result<Vec<QueueEntry>> {
        let mut entries: Vec<QueueEntry> = scan(&self.queue)?;
        entries.retain(|entry| entry.is_active && entry.unit_id == unit_id);
        entries.sort_by_key(|entry| entry.position);
        Ok(entries)
    }

    pub fn active_entry_for(
        &self,
        unit_id: &str,
        vendor_id: &str,
    ) -> anyhow::Result<Option<QueueEntry>> {
        Ok(self
            .active_queue(unit_id)?
            .into_iter()
            .find(|entry| entry.vendor_id == vendor_id))
    }

    /// Next arrival rank: one past the highest active position, 1 on an
    /// empty queue. Inactive entries do not count, so ranks are never
    /// reissued while a holder is still queued.
    pub fn next_position(&self, unit_id: &str) -> anyhow::Result<u32> {
        Ok(self
            .active_queue(unit_id)?
            .iter()
            .map(|entry| entry.position)
            .max()
            .unwrap_or(0)
            + 1)
    }

    // goals and commissions

    fn goal_key(vendor_id: &str, period: Period) -> String {
        format!("{vendor_id}|{period}")
    }

    pub fn upsert_goal(&self, goal: &Goal) -> anyhow::Result<()> {
        put(&self.goals, &Self::goal_key(&goal.vendor_id, goal.period), goal)
    }

    pub fn goal_for(&self, vendor_id: &str, period: Period) -> anyhow::Result<Option<Goal>> {
        get(&self.goals, &Self::goal_key(vendor_id, period))
    }

    pub fn upsert_commission(&self, commission: &Commission) -> anyhow::Result<()> {
        put(&self.commissions, &commission.goal_id, commission)
    }

    pub fn commission_for_goal(&self, goal_id: &str) -> anyhow::Result<Option<Commission>> {
        get(&self.commissions, goal_id)
    }
}
