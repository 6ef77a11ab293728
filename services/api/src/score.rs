use clap::Args;
use receipt_points::error::AppError;
use receipt_points::receipts::{ReceiptSubmission, ReceiptValidator, ScoreBreakdown, ScoringEngine};
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Receipt JSON file in the same shape accepted by POST /receipts/process
    #[arg(long)]
    pub(crate) file: PathBuf,
    /// Print the breakdown as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let breakdown = score_file(&args.file)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
    } else {
        print!("{}", render_breakdown(&args.file, &breakdown));
    }
    Ok(())
}

fn score_file(path: &Path) -> Result<ScoreBreakdown, AppError> {
    let raw = std::fs::read_to_string(path)?;
    let submission: ReceiptSubmission = serde_json::from_str(&raw)?;
    let receipt = ReceiptValidator::new().validate(submission)?;
    Ok(ScoringEngine::new().breakdown(&receipt))
}

fn render_breakdown(path: &Path, breakdown: &ScoreBreakdown) -> String {
    let mut out = format!("Receipt score for {}\n", path.display());
    for component in &breakdown.components {
        out.push_str(&format!(
            "- {:<24} {:>6}  {}\n",
            component.rule.label(),
            component.points,
            component.notes
        ));
    }
    out.push_str(&format!("Total: {} points\n", breakdown.total));
    out
}
