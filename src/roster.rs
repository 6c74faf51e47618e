//! Organizational units, staff accounts and role capabilities
use super::sale::TimeStamp;
use super::utils::new_record_id;
use chrono::Utc;

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, Eq, PartialEq)]
pub enum Role {
    #[n(0)]
    Admin,
    #[n(1)]
    Manager,
    #[n(2)]
    Supervisor,
    #[n(3)]
    Vendor,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Capability {
    ManageRoster,
    ApproveSales,
    SubmitSales,
    JoinQueue,
}

impl Role {
    /// Capability lookup replacing scattered role-string comparisons. The
    /// engine itself only consults this for audit texture; enforcement is the
    /// identity collaborator's job.
    pub fn capabilities(&self) -> &'static [Capability] {
        match self {
            Role::Admin => &[Capability::ManageRoster],
            Role::Manager | Role::Supervisor => {
                &[Capability::ApproveSales, Capability::JoinQueue]
            }
            Role::Vendor => &[Capability::SubmitSales, Capability::JoinQueue],
        }
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Manager => write!(f, "manager"),
            Role::Supervisor => write!(f, "supervisor"),
            Role::Vendor => write!(f, "vendor"),
        }
    }
}

/// An organizational unit. A unit's active roster determines which vendor
/// references are valid for its sales and queue.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq)]
pub struct Unit {
    #[n(0)]
    pub id: String,
    #[n(1)]
    pub name: String,
    #[n(2)]
    pub manager_id: Option<String>,
    #[n(3)]
    pub monthly_goal: u64,
    #[n(4)]
    pub is_active: bool,
    #[n(5)]
    pub created_at: TimeStamp<Utc>,
}

impl Unit {
    pub fn new(name: &str, monthly_goal: u64) -> anyhow::Result<Self> {
        Ok(Self {
            id: new_record_id("unit_")?,
            name: name.to_owned(),
            manager_id: None,
            monthly_goal,
            is_active: true,
            created_at: TimeStamp::new(),
        })
    }
}

/// A staff account as seen by the engine: identity and role, no credentials.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq)]
pub struct Staff {
    #[n(0)]
    pub id: String,
    #[n(1)]
    pub name: String,
    #[n(2)]
    pub role: Role,
    #[n(3)]
    pub unit_id: Option<String>,
    #[n(4)]
    pub is_active: bool,
    #[n(5)]
    pub created_at: TimeStamp<Utc>,
}

impl Staff {
    pub fn new(name: &str, role: Role, unit_id: Option<&str>) -> anyhow::Result<Self> {
        Ok(Self {
            id: new_record_id("staff_")?,
            name: name.to_owned(),
            role,
            unit_id: unit_id.map(str::to_owned),
            is_active: true,
            created_at: TimeStamp::new(),
        })
    }

    pub fn is_active_vendor(&self) -> bool {
        self.is_active && self.role == Role::Vendor
    }
}
