//! Action logging seam for lifecycle operations
//!
//! The engine describes what happened; persisting or displaying the trail is
//! the collaborator's problem.
use super::roster::Role;
use super::sale::TimeStamp;
use chrono::Utc;

/// The caller as resolved by the identity collaborator before an operation
/// is attributed. Carries no credentials.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: String,
    pub name: String,
    pub role: Role,
}

impl Actor {
    pub fn new(id: &str, name: &str, role: Role) -> Self {
        Self {
            id: id.to_owned(),
            name: name.to_owned(),
            role,
        }
    }
}

/// One human-readable action description with optional unit association.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub actor_id: String,
    pub actor_name: String,
    pub actor_role: Role,
    pub action: &'static str,
    pub details: String,
    pub unit_id: Option<String>,
    pub at: TimeStamp<Utc>,
}

impl AuditEntry {
    pub fn new(actor: &Actor, action: &'static str, details: String) -> Self {
        Self {
            actor_id: actor.id.clone(),
            actor_name: actor.name.clone(),
            actor_role: actor.role,
            action,
            details,
            unit_id: None,
            at: TimeStamp::new(),
        }
    }

    pub fn in_unit(mut self, unit_id: &str) -> Self {
        self.unit_id = Some(unit_id.to_owned());
        self
    }
}

pub trait AuditSink {
    fn record(&self, entry: AuditEntry);
}

/// Default sink: structured tracing events, one per lifecycle action.
#[derive(Debug, Default)]
pub struct TracingSink;

impl AuditSink for TracingSink {
    fn record(&self, entry: AuditEntry) {
        tracing::info!(
            actor = %entry.actor_id,
            actor_name = %entry.actor_name,
            role = %entry.actor_role,
            unit = entry.unit_id.as_deref().unwrap_or("-"),
            action = entry.action,
            "{}",
            entry.details,
        );
    }
}
