//! tripcrew command-line binary.
//!
//! `plan` orchestrates the research roles for one trip and writes a Markdown
//! report; `evaluate` scores an existing report against reference texts.
//!
//! # Environment Variables
//!
//! - `GEMINI_API_KEY`: Gemini API key (required for planning; when set,
//!   evaluation also reports embedding-based semantic similarity)
//! - `GEMINI_API_KEY_2`, `GEMINI_API_KEY_3`: optional extra keys, spread
//!   across roles to ease per-key rate limits
//! - `RUST_LOG`: log filter (default: "info")
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin planner -- plan --from "New York" --to Paris \
//!     --start 2025-05-15 --end 2025-05-22
//! cargo run --bin planner -- evaluate \
//!     --summary reports/travel_plan_Paris_20250515_120000.md --refs references/
//! ```

use std::process::ExitCode;

use tripcrew::cli::{self, CliCommand, EvaluateArgs, PlanArgs};
use tripcrew::eval::{evaluate_now, SemanticScorer};
use tripcrew::llm::GeminiEmbedding;
use tripcrew::{Environment, TaskStatus, TravelPlanner};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match cli::parse(std::env::args().skip(1)) {
        Ok(CliCommand::Help) => {
            println!("{}", cli::usage());
            ExitCode::SUCCESS
        }
        Ok(CliCommand::Version) => {
            println!("tripcrew {}", tripcrew::VERSION);
            ExitCode::SUCCESS
        }
        Ok(CliCommand::Plan(args)) => run_plan(&args),
        Ok(CliCommand::Evaluate(args)) => run_evaluate(&args),
        Err(err) => {
            eprintln!("error: {err}");
            eprintln!("\n{}", cli::usage());
            ExitCode::FAILURE
        }
    }
}

fn run_plan(args: &PlanArgs) -> ExitCode {
    println!(
        "Planning a trip from {} to {} ({} to {})...",
        args.starting_point, args.destination, args.start_date, args.end_date
    );

    let mut planner = TravelPlanner::from_environment(&Environment::from_process());
    if let Some(dir) = &args.reports_dir {
        planner = planner.with_reports_dir(dir);
    }

    match planner.plan(&args.to_request()) {
        Ok(outcome) => {
            println!("\nTravel plan generated successfully!");
            println!("Report saved to: {}", outcome.report_path.display());
            for (task_id, result) in &outcome.results {
                match &result.status {
                    TaskStatus::Ok => {}
                    TaskStatus::EmptyOutput => eprintln!("note: {task_id} produced no output"),
                    TaskStatus::Error(message) => eprintln!("note: {task_id} failed: {message}"),
                }
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_evaluate(args: &EvaluateArgs) -> ExitCode {
    let env = Environment::from_process();
    let scorer = env
        .get("GEMINI_API_KEY")
        .filter(|key| !key.is_empty())
        .map(GeminiEmbedding::new);

    let meta = (!args.meta.is_empty()).then(|| args.meta.clone());
    let result = evaluate_now(
        &args.summary,
        &args.refs,
        meta,
        scorer.as_ref().map(|s| s as &dyn SemanticScorer),
    );

    match result {
        Ok(json_path) => {
            println!("Evaluation saved to: {}", json_path.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
