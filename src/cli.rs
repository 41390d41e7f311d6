use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::templates::TemplateKey;

#[derive(Debug, Parser)]
#[command(name = "leadgen", version, about = "Lead generation and outreach campaigns")]
pub struct Cli {
    /// SQLite database file (overrides the configured path).
    #[arg(long, global = true, env = "LEADGEN_DB_PATH")]
    pub db_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Acquire leads for an industry and location and store them.
    Generate {
        industry: String,
        location: String,
        #[arg(default_value_t = 25)]
        count: usize,
    },

    /// List stored leads, newest first.
    List {
        /// Only show these industries (repeatable).
        #[arg(long)]
        industry: Vec<String>,

        /// Only show these locations (repeatable).
        #[arg(long)]
        location: Vec<String>,

        /// How many of the newest leads to read.
        #[arg(long, default_value_t = 100)]
        limit: usize,

        /// Read every lead, ignoring `--limit`.
        #[arg(long, conflicts_with = "limit")]
        all: bool,
    },

    /// Render a template for the newest lead without sending.
    Preview {
        #[arg(value_enum, default_value_t = TemplateKey::LeadGeneration)]
        template: TemplateKey,
    },

    /// Send a template to the next batch of unsent leads.
    Campaign {
        #[arg(value_enum, default_value_t = TemplateKey::LeadGeneration)]
        template: TemplateKey,

        /// Maximum leads to contact (overrides LEADGEN_CAMPAIGN_BATCH).
        #[arg(long)]
        batch: Option<usize>,
    },

    /// Funnel counts and industry breakdown.
    Stats,

    /// Write every lead as CSV. `-` writes to stdout; default is a timestamped file.
    Export { path: Option<PathBuf> },

    /// Delete every lead.
    Clear,

    /// Record a tracking event for one lead.
    Track {
        #[arg(value_enum)]
        event: TrackEvent,
        email: String,
    },
}

/// Funnel events reported by the tracking collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TrackEvent {
    Opened,
    Responded,
}
