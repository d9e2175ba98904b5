use std::path::PathBuf;

use clap::Parser;
use dotenvy::dotenv;
use serde::Deserialize;
use tracing::{error, info};

use cr_core::extract::{CandidateFixture, ProfileExtractor};
use cr_core::pipeline::{self, RankingConfig, RankingEngine};
use cr_core::request::RequestBuilder;
use cr_core::requisition::Requisition;
use cr_core::scoring::WeightConfig;
use cr_core::table::{HeaderLayout, TableRow};

/// 表読み取り側コラボレータが生成する入力ドキュメント。
#[derive(Debug, Deserialize)]
struct TableDocument {
    layout: HeaderLayout,
    fixture: CandidateFixture,
    rows: Vec<TableRow>,
    jd: String,
    #[serde(default)]
    weights: Option<WeightConfig>,
}

#[derive(Debug, Parser)]
#[command(
    name = "cr-cli",
    about = "Build a candidate match request from a skill-matrix table document"
)]
struct Cli {
    /// Input table document (JSON)
    #[arg(long)]
    input: PathBuf,

    /// Output path for the match request JSON
    #[arg(long, default_value = "cv_match_request.json")]
    output: PathBuf,

    /// Build the request for a single candidate (0-based row index)
    #[arg(long)]
    candidate: Option<usize>,

    /// Maximum number of ranked candidates requested downstream
    #[arg(long, env = "CR_TOP_K", default_value_t = 1)]
    top_k: u32,

    /// Also rank locally and log the ordering preview
    #[arg(long, default_value_t = false)]
    preview: bool,
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(&cli.input)?;
    let doc: TableDocument = serde_json::from_str(&raw)?;

    let requisition = Requisition::from_content(doc.jd.as_str());
    let weights = doc.weights.unwrap_or_default();
    let extractor = ProfileExtractor::new(doc.layout, doc.fixture);

    let profiles = match cli.candidate {
        Some(index) => vec![pipeline::profile_by_index(&extractor, &doc.rows, index)?],
        None => pipeline::extract_profiles(&extractor, &doc.rows),
    };

    let builder = RequestBuilder::new(weights, cli.top_k)?;
    let payload = builder.build(&profiles, &requisition);
    let json = payload.to_json()?;
    std::fs::write(&cli.output, &json)?;

    info!(
        candidates = payload.list_cv.len(),
        output = %cli.output.display(),
        payload_hash = %payload.payload_hash()?,
        "match request written"
    );

    if cli.preview {
        let engine = RankingEngine::new(RankingConfig {
            weights,
            top_k: cli.top_k as usize,
        })?;
        let result = engine.run(&profiles, &requisition)?;

        for (position, candidate) in result.candidates.iter().enumerate() {
            info!(
                run_id = %result.run_id,
                rank = position + 1,
                cv_id = %candidate.cv_id,
                combined = candidate.combined,
                license = candidate.sub_scores.license_score,
                "ranked candidate"
            );
        }
    }

    Ok(())
}

fn main() {
    dotenv().ok();
    cr_core::logging::init("cr-cli");

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        error!(error = %err, "cr-cli failed");
        std::process::exit(1);
    }
}
