use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;

use leadgen::campaign::{CampaignAborted, CampaignReport, CampaignRunner, select_unsent};
use leadgen::cli::{Cli, Commands, TrackEvent};
use leadgen::config::AppConfig;
use leadgen::export;
use leadgen::leads::{LeadFilter, filter};
use leadgen::source::{EnrichmentProvider, HunterClient, LeadSource};
use leadgen::stats;
use leadgen::store::{LeadStore, LibSqlBackend};
use leadgen::templates::{CustomTemplate, TemplateEngine, TemplateKey};
use leadgen::transport::{LogTransport, SmtpMailer, Transport};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install rustls crypto provider before any TLS usage
    let _ = rustls::crypto::ring::default_provider().install_default();

    // Logs go to stderr so CSV on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::from_env().context("loading configuration")?;
    if let Some(db_path) = cli.db_path {
        config.db_path = db_path;
    }
    let store: Arc<dyn LeadStore> = Arc::new(
        LibSqlBackend::new_local(&config.db_path)
            .await
            .with_context(|| format!("opening lead store at {}", config.db_path.display()))?,
    );

    match cli.command {
        Commands::Generate {
            industry,
            location,
            count,
        } => generate(&config, store.as_ref(), &industry, &location, count).await,
        Commands::List {
            industry,
            location,
            limit,
            all,
        } => {
            let lead_filter = LeadFilter {
                industries: industry,
                locations: location,
            };
            list(store.as_ref(), &lead_filter, (!all).then_some(limit)).await
        }
        Commands::Preview { template } => preview(&config, store, template).await,
        Commands::Campaign { template, batch } => {
            let batch_size = batch.unwrap_or(config.campaign.batch_size);
            campaign(&config, store, template, batch_size).await
        }
        Commands::Stats => show_stats(store.as_ref()).await,
        Commands::Export { path } => export_leads(store.as_ref(), path.as_deref()).await,
        Commands::Clear => {
            let removed = store.clear_all().await?;
            println!("All leads cleared ({removed} removed)");
            Ok(())
        }
        Commands::Track { event, email } => track(store.as_ref(), event, &email).await,
    }
}

async fn generate(
    config: &AppConfig,
    store: &dyn LeadStore,
    industry: &str,
    location: &str,
    count: usize,
) -> anyhow::Result<()> {
    let provider = match &config.enrichment {
        Some(enrichment) => {
            let client: Arc<dyn EnrichmentProvider> = Arc::new(HunterClient::new(enrichment)?);
            Some(client)
        }
        None => None,
    };
    let source = LeadSource::new(provider);

    let generation = source
        .generate_detailed(industry, location, count, Utc::now())
        .await;
    if let Some(reason) = &generation.degraded {
        eprintln!("Warning: enrichment unavailable ({reason}); used synthetic leads");
    }
    store.upsert(&generation.leads).await?;

    println!(
        "Generated {} leads successfully! ({} external, {} synthetic)",
        generation.leads.len(),
        generation.external,
        generation.synthetic
    );
    for lead in &generation.leads {
        println!("  {:<32} {:<36} {}", lead.company_name, lead.email, lead.phone);
    }
    Ok(())
}

async fn list(
    store: &dyn LeadStore,
    lead_filter: &LeadFilter,
    limit: Option<usize>,
) -> anyhow::Result<()> {
    let leads = store.list(limit).await?;
    if leads.is_empty() {
        println!("No leads in database yet. Generate some leads first!");
        return Ok(());
    }

    let shown = lead_filter.apply(&leads);
    for lead in &shown {
        println!(
            "{:<10} {:<32} {:<36} {:<14} {}",
            lead.stage(),
            lead.company_name,
            lead.email,
            lead.industry,
            lead.location
        );
    }
    println!(
        "\n{} of {} leads shown (industries: {}; locations: {})",
        shown.len(),
        leads.len(),
        filter::distinct_industries(&leads).join(", "),
        filter::distinct_locations(&leads).join(", ")
    );
    Ok(())
}

/// Template engine with the stored `custom` template registered, if valid.
async fn load_engine(store: &dyn LeadStore) -> anyhow::Result<TemplateEngine> {
    let Some(stored) = store.get_template(TemplateKey::Custom.as_str()).await? else {
        return Ok(TemplateEngine::new());
    };
    match CustomTemplate::from_stored(&stored) {
        Ok(custom) => Ok(TemplateEngine::with_custom(custom)),
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring stored custom template");
            Ok(TemplateEngine::new())
        }
    }
}

fn build_transport(config: &AppConfig) -> anyhow::Result<Arc<dyn Transport>> {
    if let Some(smtp) = &config.smtp {
        return Ok(Arc::new(SmtpMailer::new(smtp)?));
    }
    Ok(Arc::new(LogTransport::new()))
}

async fn build_runner(config: &AppConfig, store: Arc<dyn LeadStore>) -> anyhow::Result<CampaignRunner> {
    let engine = load_engine(store.as_ref()).await?;
    Ok(CampaignRunner::new(
        store,
        build_transport(config)?,
        engine,
        config.campaign.send_interval,
    ))
}

async fn preview(
    config: &AppConfig,
    store: Arc<dyn LeadStore>,
    key: TemplateKey,
) -> anyhow::Result<()> {
    let Some(lead) = store.list(Some(1)).await?.into_iter().next() else {
        println!("Generate some leads first to start email campaigns!");
        return Ok(());
    };
    let runner = build_runner(config, store).await?;
    let email = runner.preview(&lead, key);
    println!("To: {}\nSubject: {}\n\n{}", lead.email, email.subject, email.body);
    Ok(())
}

async fn campaign(
    config: &AppConfig,
    store: Arc<dyn LeadStore>,
    key: TemplateKey,
    batch_size: usize,
) -> anyhow::Result<()> {
    let window = store.list(Some(config.campaign.window)).await?;
    let batch = select_unsent(&window, batch_size);
    if batch.is_empty() {
        println!("No unsent leads available");
        return Ok(());
    }

    let runner = build_runner(config, store).await?;
    match runner.run_campaign(&batch, key).await {
        Ok(report) => {
            print_report(&report);
            Ok(())
        }
        Err(CampaignAborted { report, source }) => {
            print_report(&report);
            Err(source).context("campaign stopped: lead store failed")
        }
    }
}

fn print_report(report: &CampaignReport) {
    println!("{report}");
    for failure in &report.failures {
        println!("  failed: {} ({})", failure.email, failure.error);
    }
}

async fn show_stats(store: &dyn LeadStore) -> anyhow::Result<()> {
    let stats = stats::collect(store).await?;
    println!("Total leads:     {}", stats.total);
    println!("Emails sent:     {} ({:.1}%)", stats.sent, stats.send_rate() * 100.0);
    println!("Emails opened:   {}", stats.opened);
    println!(
        "Responses:       {} ({:.1}% of sent)",
        stats.responded,
        stats.response_rate() * 100.0
    );
    if !stats.locations.is_empty() {
        println!("Locations:       {}", stats.locations.join(", "));
    }
    if !stats.by_industry.is_empty() {
        println!("\nLeads by industry:");
        for (industry, count) in stats.top_industries() {
            println!("  {industry:<24} {count}");
        }
    }
    Ok(())
}

async fn export_leads(store: &dyn LeadStore, target: Option<&Path>) -> anyhow::Result<()> {
    let leads = store.list(None).await?;
    if target == Some(Path::new("-")) {
        export::write_csv(std::io::stdout().lock(), &leads)?;
        return Ok(());
    }

    let path = target
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(export::export_file_name(Utc::now())));
    let file =
        std::fs::File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    let rows = export::write_csv(std::io::BufWriter::new(file), &leads)?;
    eprintln!("Exported {rows} leads to {}", path.display());
    Ok(())
}

async fn track(store: &dyn LeadStore, event: TrackEvent, email: &str) -> anyhow::Result<()> {
    let (changed, label) = match event {
        TrackEvent::Opened => (store.mark_opened(email).await?, "opened"),
        TrackEvent::Responded => (store.mark_responded(email).await?, "responded"),
    };
    if changed {
        println!("Recorded {label} for {email}");
    } else {
        println!("No change for {email} (unknown lead, already recorded, or earlier stage missing)");
    }
    Ok(())
}
