//! Shared primitive identifier aliases.

/// Caller-assigned flight identifier. Uniqueness is not validated on insert.
pub type FlightId = u32;
/// System-assigned passenger identifier, monotonic from the ledger seed.
pub type PassengerId = u32;
