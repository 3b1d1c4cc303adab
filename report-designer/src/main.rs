//! # Report Designer CLI
//!
//! Command-line access to the report template store.
//!
//! ## Usage
//!
//! ```bash
//! # Check a template configuration file
//! report-designer validate monthly.json
//!
//! # Create (or update with --id) a template from a file
//! report-designer push monthly.json --name "Monthly incidents"
//!
//! # Render a preview PDF of an unsaved configuration
//! report-designer preview monthly.json --data-source incidents --out preview.pdf
//!
//! # Export a saved template
//! report-designer export 12 --format xlsx
//!
//! # List templates
//! report-designer list --search monthly
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use report_client::ReportClient;
use report_designer::logger::init_logger;
use report_designer::{AllowAll, DesignerConfig, EditorSession, Navigation, Notifier, TemplateLibrary};
use shared::models::{ReportFormat, TemplateConfig, TemplateListQuery};

/// Report Designer - report template authoring tools
#[derive(Parser, Debug)]
#[command(name = "report-designer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse and validate a template configuration file
    Validate {
        /// TemplateConfig JSON file
        file: PathBuf,
    },

    /// Save a template configuration file to the backend
    Push {
        /// TemplateConfig JSON file
        file: PathBuf,

        /// Template name
        #[arg(long)]
        name: String,

        /// Update this template instead of creating a new one
        #[arg(long)]
        id: Option<i64>,

        #[arg(long)]
        description: Option<String>,

        /// Make the template visible to other users
        #[arg(long)]
        public: bool,
    },

    /// Render a preview of a template configuration file
    Preview {
        /// TemplateConfig JSON file
        file: PathBuf,

        /// Data source (defaults to the first table's, then the configured default)
        #[arg(long)]
        data_source: Option<String>,

        /// Output PDF path
        #[arg(long, value_name = "FILE", default_value = "preview.pdf")]
        out: PathBuf,
    },

    /// Export a saved template as PDF or XLSX
    Export {
        /// Template id
        id: i64,

        /// pdf or xlsx
        #[arg(long, default_value = "pdf")]
        format: ReportFormat,

        /// Output path (defaults to the template name)
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// List saved templates
    List {
        #[arg(long)]
        search: Option<String>,

        #[arg(long, default_value = "1")]
        page: u32,

        #[arg(long, default_value = "20")]
        limit: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let config = DesignerConfig::from_env();
    init_logger(&config.log_level, config.log_json)?;

    let cli = Cli::parse();
    match cli.command {
        Commands::Validate { file } => validate(&file).await,
        Commands::Push {
            file,
            name,
            id,
            description,
            public,
        } => {
            let template = read_config(&file).await?;
            let mut session = session(&config)?;
            if let Some(id) = id {
                session.load(id).await?;
            }
            session.canvas_mut().load(template);
            session.set_name(name);
            session.set_description(description);
            session.set_public(public);
            match session.save().await? {
                Navigation::Replace(route) => println!("Created template {}", route.path()),
                Navigation::Stay => println!("Updated {}", session.route().path()),
            }
            Ok(())
        }
        Commands::Preview {
            file,
            data_source,
            out,
        } => {
            let template = read_config(&file).await?;
            let mut session = session(&config)?;
            let inferred = template.primary_data_source().map(str::to_string);
            session.canvas_mut().load(template);
            if let Some(key) = data_source.or(inferred) {
                session.set_data_source(&key)?;
            }
            let doc = session.preview().await?;
            write_output(&out, &doc.bytes).await
        }
        Commands::Export { id, format, out } => {
            let mut session = session(&config)?;
            session.load(id).await?;
            let doc = session.export(format).await?;
            let out = out
                .or_else(|| doc.file_name.clone().map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from(shared::models::report_file_name(session.name(), format)));
            write_output(&out, &doc.bytes).await
        }
        Commands::List {
            search,
            page,
            limit,
        } => {
            let client = ReportClient::from_config(&config.client_config())?;
            let mut library = TemplateLibrary::new(client, AllowAll, Notifier::new(config.notice_ttl_ms));
            let query = TemplateListQuery {
                search,
                page,
                limit,
            };
            let result = library.list(&query).await?;
            for t in &result.data {
                let default = if t.is_default { " (default)" } else { "" };
                println!("{:>6}  {}{}", t.id, t.name, default);
            }
            println!(
                "page {}/{} ({} templates)",
                page,
                result.total_pages(limit).max(1),
                result.total
            );
            Ok(())
        }
    }
}

fn session(config: &DesignerConfig) -> anyhow::Result<EditorSession<ReportClient, AllowAll>> {
    let client = ReportClient::from_config(&config.client_config())?;
    Ok(EditorSession::new(client, AllowAll, config.clone()))
}

async fn read_config(path: &Path) -> anyhow::Result<TemplateConfig> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    let config: TemplateConfig =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}

async fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    println!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

async fn validate(path: &Path) -> anyhow::Result<()> {
    let config = read_config(path).await?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?;

    let (width, height) = config.page.page_size_mm();
    println!(
        "page: {:?} {:?} ({} x {} mm), body height {} mm",
        config.page.paper_size,
        config.page.orientation,
        width,
        height,
        config.body_height_mm()
    );
    for (name, enabled, count) in [
        (
            "header",
            config.effective_header().is_some(),
            config.header.as_ref().map_or(0, |h| h.elements.len()),
        ),
        (
            "footer",
            config.effective_footer().is_some(),
            config.footer.as_ref().map_or(0, |f| f.elements.len()),
        ),
    ] {
        let state = if enabled { "enabled" } else { "disabled" };
        println!("{}: {} ({} elements)", name, state, count);
    }

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for el in config.all_elements() {
        *counts.entry(el.element_type().as_str()).or_default() += 1;
    }
    for (ty, count) in &counts {
        println!("  {:<14} {}", ty, count);
    }
    if let Some(ds) = config.primary_data_source() {
        println!("data source: {}", ds);
    }
    println!("OK");
    Ok(())
}
