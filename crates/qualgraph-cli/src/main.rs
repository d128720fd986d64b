use anyhow::{Context, Result, anyhow};
use clap::Parser;
use qualgraph_app::{GraphSettings, GraphView, RenderOptions, Report, ReportScope, ReportViewer};
use qualgraph_core::NodeKey;
use qualgraph_storage::Storage;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the coding database
    #[arg(short, long)]
    db: PathBuf,

    /// JSON settings file; defaults are used when absent
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Category or code to use as subtree root
    #[arg(short, long, default_value = qualgraph_app::ALL_ROOTS_LABEL)]
    root: String,

    /// Draw codes without their colors
    #[arg(long)]
    monochrome: bool,

    /// Larger font for categories
    #[arg(long)]
    large_category_font: bool,

    /// Canvas width, overriding the settings file
    #[arg(long)]
    width: Option<f32>,

    /// Canvas height, overriding the settings file
    #[arg(long)]
    height: Option<f32>,

    /// Print the excerpt report for this code instead of the graph
    #[arg(long, value_name = "CODE")]
    report: Option<String>,

    /// With --report, only include codings assigned to cases
    #[arg(long, requires = "report")]
    cases: bool,
}

/// Writes reports to stdout as JSON.
struct JsonReportViewer;

impl ReportViewer for JsonReportViewer {
    fn show(&mut self, report: Report) {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => tracing::error!("Failed to encode report: {}", e),
        }
    }
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays valid JSON.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = args
        .settings
        .as_deref()
        .map(GraphSettings::load_from)
        .unwrap_or_default();
    if let Some(width) = args.width {
        settings.canvas_width = width;
    }
    if let Some(height) = args.height {
        settings.canvas_height = height;
    }
    let saved = settings.render_options();
    let options = RenderOptions {
        monochrome: args.monochrome || saved.monochrome,
        enlarge_category_font: args.large_category_font || saved.enlarge_category_font,
    };

    let storage = Storage::open(&args.db)
        .with_context(|| format!("Failed to open coding database {:?}", args.db))?;
    let mut view = GraphView::new(storage, settings);

    if let Some(code_name) = args.report {
        let code = view
            .store()
            .get_codes()?
            .into_iter()
            .find(|c| c.name == code_name)
            .ok_or_else(|| anyhow!("No code named {code_name:?}"))?;
        let scope = if args.cases {
            ReportScope::Cases
        } else {
            ReportScope::Coded
        };
        view.show_report(NodeKey::Code(code.id), scope, &mut JsonReportViewer)?;
        return Ok(());
    }

    let selector = view
        .resolve_root(&args.root)?
        .ok_or_else(|| anyhow!("No category or code named {:?}", args.root))?;
    view.render(selector, options)?;
    println!("{}", serde_json::to_string_pretty(&view.snapshot())?);
    Ok(())
}
