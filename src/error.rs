#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("sale value must be greater than zero")]
    ZeroValue,
    #[error("sale item count must be greater than zero")]
    ZeroItemCount,
    #[error("{0} does not reference an active vendor")]
    NotAnActiveVendor(String),
    #[error("{0} does not reference an active unit")]
    NotAnActiveUnit(String),
    #[error("{0} cannot join a service queue")]
    CannotJoinQueue(String),
    #[error("{0} cannot approve sales")]
    CannotApproveSales(String),
    #[error("goal thresholds must satisfy bronze <= silver <= gold <= diamond")]
    ThresholdOrder,
    #[error("commission {0} is not linked to a stored goal")]
    DanglingCommission(String),
}

#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    #[error("no record found for {0}")]
    NotFound(String),
    #[error("{id} cannot {action} while {state}")]
    InvalidStateTransition {
        id: String,
        state: String,
        action: &'static str,
    },
    #[error("vendor {vendor_id} already has an active queue entry in {unit_id}")]
    AlreadyQueued { vendor_id: String, unit_id: String },
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
}
