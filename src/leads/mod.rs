//! Lead records and projections over them.

pub mod filter;
pub mod model;

pub use filter::LeadFilter;
pub use model::{Customer, FunnelStage, Lead, StoredTemplate};
