//! Lead engine: lead acquisition, storage, templated outreach and funnel stats.

pub mod campaign;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod leads;
pub mod source;
pub mod stats;
pub mod store;
pub mod templates;
pub mod transport;
