//! Service queue entries and position assignment
use super::error::EngineError;
use super::sale::TimeStamp;
use super::utils::new_record_id;
use chrono::Utc;

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, Eq, PartialEq)]
pub enum QueueStatus {
    #[n(0)]
    Waiting,
    #[n(1)]
    Serving,
    #[n(2)]
    Suspended,
}

impl std::fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueueStatus::Waiting => write!(f, "waiting"),
            QueueStatus::Serving => write!(f, "serving"),
            QueueStatus::Suspended => write!(f, "suspended"),
        }
    }
}

/// One vendor's place in a unit's service rotation.
///
/// Positions are 1-based arrival ranks, unique among the active entries of a
/// unit. Leaving the queue deactivates the entry without renumbering the
/// survivors, so gaps in the numbering are expected; ascending position still
/// gives the serving order.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq)]
pub struct QueueEntry {
    #[n(0)]
    pub id: String,
    #[n(1)]
    pub vendor_id: String,
    #[n(2)]
    pub unit_id: String,
    #[n(3)]
    pub position: u32,
    #[n(4)]
    pub status: QueueStatus,
    #[n(5)]
    pub entered_at: TimeStamp<Utc>,
    #[n(6)]
    pub started_serving_at: Option<TimeStamp<Utc>>,
    #[n(7)]
    pub customer_count: u32,
    #[n(8)]
    pub is_active: bool,
}

impl QueueEntry {
    pub fn new(vendor_id: &str, unit_id: &str, position: u32) -> anyhow::Result<Self> {
        Ok(Self {
            id: new_record_id("queue_")?,
            vendor_id: vendor_id.to_owned(),
            unit_id: unit_id.to_owned(),
            position,
            status: QueueStatus::Waiting,
            entered_at: TimeStamp::new(),
            started_serving_at: None,
            customer_count: 0,
            is_active: true,
        })
    }

    fn guard_active(&self, action: &'static str) -> Result<(), EngineError> {
        if !self.is_active {
            return Err(EngineError::InvalidStateTransition {
                id: self.id.clone(),
                state: "inactive".to_owned(),
                action,
            });
        }
        Ok(())
    }

    /// Take the vendor from Waiting into Serving and start the service clock.
    pub fn start_serving(&mut self) -> Result<(), EngineError> {
        self.guard_active("start serving")?;
        if self.status != QueueStatus::Waiting {
            return Err(EngineError::InvalidStateTransition {
                id: self.id.clone(),
                state: self.status.to_string(),
                action: "start serving",
            });
        }

        self.status = QueueStatus::Serving;
        self.started_serving_at = Some(TimeStamp::new());
        self.customer_count += 1;

        Ok(())
    }

    /// Step out of rotation without giving up the position.
    pub fn suspend(&mut self) -> Result<(), EngineError> {
        self.guard_active("suspend")?;
        if self.status != QueueStatus::Waiting {
            return Err(EngineError::InvalidStateTransition {
                id: self.id.clone(),
                state: self.status.to_string(),
                action: "suspend",
            });
        }

        self.status = QueueStatus::Suspended;
        Ok(())
    }

    /// Return a suspended vendor to rotation at the original position.
    pub fn resume(&mut self) -> Result<(), EngineError> {
        self.guard_active("resume")?;
        if self.status != QueueStatus::Suspended {
            return Err(EngineError::InvalidStateTransition {
                id: self.id.clone(),
                state: self.status.to_string(),
                action: "resume",
            });
        }

        self.status = QueueStatus::Waiting;
        Ok(())
    }

    /// Soft-delete on leave or completed service. Survivors keep their
    /// positions.
    pub fn deactivate(&mut self) {
        self.is_active = false;
    }
}
