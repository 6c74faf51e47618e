//! Core sale record and its status transitions
use super::error::{EngineError, ValidationError};
use super::utils::new_record_id;
use chrono::{DateTime, TimeZone, Utc};

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, Eq, Ord, PartialEq, PartialOrd)]
pub enum SaleStatus {
    #[n(0)]
    Pending,
    #[n(1)]
    Approved,
    #[n(2)]
    Rejected,
}

impl std::fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaleStatus::Pending => write!(f, "pending"),
            SaleStatus::Approved => write!(f, "approved"),
            SaleStatus::Rejected => write!(f, "rejected"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TimeStamp<T: TimeZone>(DateTime<T>);

impl<T: TimeZone> PartialEq for TimeStamp<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
impl<T: TimeZone> Eq for TimeStamp<T> {}
impl<T: TimeZone> PartialOrd for TimeStamp<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl<T: TimeZone> Ord for TimeStamp<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl TimeStamp<Utc> {
    pub fn new() -> Self {
        Self(Utc::now())
    }
    pub fn new_with(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Self {
        Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
            .unwrap()
            .into()
    }
    pub fn to_datetime_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// A single sale as reported from the floor. Monetary values are integers
/// in minor currency units.
///
/// Status moves Pending -> Approved or Pending -> Rejected exactly once;
/// both outcomes are terminal.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq)]
pub struct Sale {
    #[n(0)]
    pub id: String,
    #[n(1)]
    pub vendor_id: String,
    #[n(2)]
    pub unit_id: String,
    #[n(3)]
    pub value: u64,
    #[n(4)]
    pub item_count: u32,
    #[n(5)]
    pub status: SaleStatus,
    #[n(6)]
    pub created_at: TimeStamp<Utc>,
    #[n(7)]
    pub approved_at: Option<TimeStamp<Utc>>,
    #[n(8)]
    pub approved_by: Option<String>,
    #[n(9)]
    pub rejection_reason: Option<String>,
}

impl Sale {
    /// Validate the reported figures and mint a pending sale.
    pub fn new(vendor_id: &str, unit_id: &str, value: u64, item_count: u32) -> anyhow::Result<Self> {
        if value == 0 {
            return Err(EngineError::Validation(ValidationError::ZeroValue).into());
        }
        if item_count == 0 {
            return Err(EngineError::Validation(ValidationError::ZeroItemCount).into());
        }

        Ok(Self {
            id: new_record_id("sale_")?,
            vendor_id: vendor_id.to_owned(),
            unit_id: unit_id.to_owned(),
            value,
            item_count,
            status: SaleStatus::Pending,
            created_at: TimeStamp::new(),
            approved_at: None,
            approved_by: None,
            rejection_reason: None,
        })
    }

    pub fn is_pending(&self) -> bool {
        self.status == SaleStatus::Pending
    }

    /// Approve a pending sale. A supplied correction replaces the reported
    /// value/item count in the same transition as the status change.
    pub fn approve(
        &mut self,
        approver_id: &str,
        corrected_value: Option<u64>,
        corrected_item_count: Option<u32>,
    ) -> Result<(), EngineError> {
        if !self.is_pending() {
            return Err(EngineError::InvalidStateTransition {
                id: self.id.clone(),
                state: self.status.to_string(),
                action: "approve",
            });
        }
        if corrected_value == Some(0) {
            return Err(ValidationError::ZeroValue.into());
        }
        if corrected_item_count == Some(0) {
            return Err(ValidationError::ZeroItemCount.into());
        }

        if let Some(value) = corrected_value {
            self.value = value;
        }
        if let Some(count) = corrected_item_count {
            self.item_count = count;
        }
        self.status = SaleStatus::Approved;
        self.approved_at = Some(TimeStamp::new());
        self.approved_by = Some(approver_id.to_owned());

        Ok(())
    }

    /// Reject a pending sale. No correction is permitted on rejection; who
    /// rejected is recorded by the audit trail, not on the record.
    pub fn reject(&mut self, reason: Option<&str>) -> Result<(), EngineError> {
        if !self.is_pending() {
            return Err(EngineError::InvalidStateTransition {
                id: self.id.clone(),
                state: self.status.to_string(),
                action: "reject",
            });
        }

        self.status = SaleStatus::Rejected;
        self.rejection_reason = reason.map(str::to_owned);

        Ok(())
    }
}

impl<T: TimeZone> From<DateTime<T>> for TimeStamp<T> {
    fn from(value: DateTime<T>) -> Self {
        TimeStamp(value)
    }
}
impl<C> minicbor::Encode<C> for TimeStamp<Utc> {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        if let Some(nsec) = self.0.timestamp_nanos_opt() {
            return e.i64(nsec)?.ok();
        }

        Err(minicbor::encode::Error::message(
            "failed to encode timestamp. timestamp_nanos_opt returned None",
        ))
    }
}
impl<'b, C> minicbor::Decode<'b, C> for TimeStamp<Utc> {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        let nsecs = d.i64()?;

        Ok(TimeStamp(DateTime::from_timestamp_nanos(nsecs)))
    }
}
