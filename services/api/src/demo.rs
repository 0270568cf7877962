use crate::infra::load_directory;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use voter_match::config::AppConfig;
use voter_match::error::AppError;
use voter_match::matching::{
    InMemoryDirectory, Issue, MatchOutcome, MatchRequest, MatchService, PointAllocation,
    QuizAnswer, RangePolicy, UserResponse,
};

/// Positions used by the demo voter, cycled across the quiz issues.
const DEMO_POSITIONS: [i32; 5] = [5, 1, 5, 4, 2];

#[derive(Args, Debug)]
pub(crate) struct IssuesArgs {
    /// Region code (state abbreviation) used to scope state issues
    #[arg(long)]
    pub(crate) region: Option<String>,
    /// Folder with the CSV directory exports (defaults to the bundled sample)
    #[arg(long)]
    pub(crate) directory: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct MatchArgs {
    /// ZIP code the candidates must serve
    #[arg(long)]
    pub(crate) zip_code: String,
    /// JSON file holding an array of {issueId, position, importance} responses
    #[arg(long)]
    pub(crate) responses: PathBuf,
    /// Folder with the CSV directory exports (defaults to the bundled sample)
    #[arg(long)]
    pub(crate) directory: Option<PathBuf>,
    /// Handling of out-of-range positions and importances (reject or clamp)
    #[arg(long, value_parser = crate::infra::parse_range_policy)]
    pub(crate) range_policy: Option<RangePolicy>,
    /// Print the raw JSON payload instead of the table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// ZIP code for the demo voter
    #[arg(long, default_value = "77493")]
    pub(crate) zip_code: String,
    /// Region code used to pick the quiz issues
    #[arg(long, default_value = "TX")]
    pub(crate) region: String,
    /// Folder with the CSV directory exports (defaults to the bundled sample)
    #[arg(long)]
    pub(crate) directory: Option<PathBuf>,
}

pub(crate) fn run_issues(args: IssuesArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = build_service(
        args.directory.or(config.matching.directory_dir),
        config.matching.range_policy,
    )?;

    let issues = service.issues(args.region.as_deref())?;
    println!(
        "{} issue(s) for region {}",
        issues.len(),
        args.region.as_deref().unwrap_or("(all)")
    );
    for issue in &issues {
        render_issue(issue);
    }

    Ok(())
}

pub(crate) fn run_match(args: MatchArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let policy = args.range_policy.unwrap_or(config.matching.range_policy);
    let service = build_service(args.directory.or(config.matching.directory_dir), policy)?;

    let raw = std::fs::read_to_string(&args.responses)?;
    let responses: Vec<UserResponse> = serde_json::from_str(&raw)?;

    let outcome = service.match_candidates(MatchRequest {
        zip_code: args.zip_code,
        responses,
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        render_matches(&outcome);
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        zip_code,
        region,
        directory,
    } = args;

    let service = build_service(directory, RangePolicy::Reject)?;
    let issues = service.issues(Some(&region))?;

    println!("Candidate match demo");
    println!("  ZIP code: {}  Region: {}", zip_code, region);
    println!("  Quiz issues: {}", issues.len());

    let answers = demo_answers(&issues);
    let allocation = demo_allocation(&issues)?;

    println!("\nImportance allocation");
    for answer in &answers {
        println!(
            "  {:<24} position {}  points {:>2}",
            answer.issue_id.to_string(),
            answer.position,
            allocation.points_for(&answer.issue_id)
        );
    }
    println!(
        "  Allocated {} point(s), {} remaining",
        allocation.total(),
        allocation.remaining()
    );

    let responses = allocation.complete(&answers)?;
    let outcome = service.match_candidates(MatchRequest {
        zip_code,
        responses,
    })?;

    println!();
    render_matches(&outcome);
    Ok(())
}

fn build_service(
    directory: Option<PathBuf>,
    policy: RangePolicy,
) -> Result<MatchService<InMemoryDirectory, InMemoryDirectory>, AppError> {
    let directory = Arc::new(load_directory(directory.as_deref())?);
    Ok(MatchService::new(directory.clone(), directory, policy))
}

fn demo_answers(issues: &[Issue]) -> Vec<QuizAnswer> {
    issues
        .iter()
        .zip(DEMO_POSITIONS.iter().cycle())
        .map(|(issue, position)| QuizAnswer {
            issue_id: issue.id.clone(),
            position: *position,
        })
        .collect()
}

/// Even split of the budget, pulled back under the per-issue cap.
fn demo_allocation(issues: &[Issue]) -> Result<PointAllocation, AppError> {
    let mut allocation = PointAllocation::even(issues.iter().map(|issue| issue.id.clone()));
    for issue in issues {
        allocation.adjust(&issue.id, 0)?;
    }
    Ok(allocation)
}

fn render_issue(issue: &Issue) {
    let scope = if issue.is_global() {
        "all regions".to_string()
    } else {
        issue.locations.join(", ")
    };
    println!(
        "  [{}] {} ({}, {})",
        issue.id,
        issue.title,
        issue.category.label(),
        scope
    );
}

pub(crate) fn render_matches(outcome: &MatchOutcome) {
    if let Some(message) = &outcome.message {
        println!("{}", message);
    }
    if outcome.matches.is_empty() {
        return;
    }

    println!("Ranked matches");
    for (rank, result) in outcome.matches.iter().enumerate() {
        println!(
            "  {}. {} ({}, {}) {}% match",
            rank + 1,
            result.name,
            result.party,
            result.office,
            result.match_percentage
        );
        for detail in &result.agreement_details {
            println!(
                "       {:<24} you {}  candidate {}  importance {}  difference {}",
                detail.issue_id.to_string(),
                detail.user_position,
                detail.candidate_position,
                detail.importance,
                detail.difference
            );
        }
    }
}
