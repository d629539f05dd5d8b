use anyhow::Context;
use api_shared::{AnalysisRes, CatalogRes, SymptomAnalysisReq};
use clap::{Parser, Subcommand};
use medcase_core::{Analyzer, DiseaseCatalog};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "medcase")]
#[command(about = "Educational symptom assessment CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse symptoms given as flags and print the result as JSON
    Analyze {
        /// Symptom name, optionally with a severity or answer (`fever`, `headache=8`)
        #[arg(long = "symptom", value_name = "NAME[=VALUE]")]
        symptoms: Vec<String>,
        /// Free-text description scanned for symptom keywords
        #[arg(long)]
        description: Option<String>,
        #[arg(long, default_value_t = 1)]
        duration_days: u32,
        #[arg(long, default_value_t = 30)]
        age: u32,
        #[arg(long)]
        gender: Option<String>,
        #[arg(long)]
        chronic: bool,
        #[arg(long)]
        pregnant: bool,
        #[arg(long)]
        smoker: bool,
        #[arg(long)]
        immunocompromised: bool,
        /// YAML disease catalog to use instead of the built-in one
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Analyse a JSON analysis request read from a file
    AnalyzeFile {
        path: PathBuf,
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// List the disease patterns
    Catalog {
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

fn load_catalog(path: Option<&Path>) -> anyhow::Result<Arc<DiseaseCatalog>> {
    match path {
        Some(path) => Ok(Arc::new(DiseaseCatalog::from_yaml_file(path)?)),
        None => Ok(DiseaseCatalog::builtin()),
    }
}

/// `fever` becomes `true`, `headache=8` a severity, anything else a text answer.
fn symptom_entry(raw: &str) -> (String, serde_json::Value) {
    match raw.split_once('=') {
        None => (raw.trim().to_string(), serde_json::Value::Bool(true)),
        Some((name, value)) => {
            let value = value.trim();
            let json = match value.parse::<f64>() {
                Ok(n) => serde_json::json!(n),
                Err(_) => serde_json::Value::String(value.to_string()),
            };
            (name.trim().to_string(), json)
        }
    }
}

fn run_analysis(req: SymptomAnalysisReq, catalog: Option<&Path>) -> anyhow::Result<()> {
    let analyzer = Analyzer::new(load_catalog(catalog)?);
    let (payload, patient) = req.into_parts()?;
    let result = analyzer.analyze(&payload, &patient)?;
    tracing::debug!(analysis_id = %result.analysis_id, "analysis complete");

    let res: AnalysisRes = result.into();
    println!("{}", serde_json::to_string_pretty(&res)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("medcase=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            symptoms,
            description,
            duration_days,
            age,
            gender,
            chronic,
            pregnant,
            smoker,
            immunocompromised,
            catalog,
        } => {
            let req = SymptomAnalysisReq {
                symptoms: symptoms.iter().map(|s| symptom_entry(s)).collect(),
                symptom_description: description,
                duration_days,
                temperature: None,
                age,
                gender,
                has_chronic_conditions: chronic,
                is_smoker: smoker,
                is_pregnant: pregnant,
                is_immunocompromised: immunocompromised,
            };
            run_analysis(req, catalog.as_deref())
        }
        Commands::AnalyzeFile { path, catalog } => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let req: SymptomAnalysisReq = serde_json::from_str(&raw)
                .with_context(|| format!("parsing {}", path.display()))?;
            run_analysis(req, catalog.as_deref())
        }
        Commands::Catalog { catalog } => {
            let catalog = load_catalog(catalog.as_deref())?;
            let listing = CatalogRes::from(&*catalog);
            for pattern in listing.patterns {
                println!(
                    "{} [{}]: {}",
                    pattern.name,
                    pattern.urgency,
                    pattern.core_symptoms.join(", ")
                );
            }
            Ok(())
        }
    }
}
