use ace_motivation::ai::{AiAdvisor, HttpCompletionClient};
use ace_motivation::assessment::{
    generate_report_id, Completeness, QuestionnaireResult, RawResponses, ResponseSet, Role,
};
use ace_motivation::config::AppConfig;
use ace_motivation::error::AppError;
use ace_motivation::telemetry;
use chrono::Utc;
use clap::Args;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

const CLI_USER_ID: &str = "cli";

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON file mapping question ids to answers (1-5), optionally under a
    /// top-level "responses" key
    #[arg(long)]
    pub(crate) responses: PathBuf,
    /// Who answered the questionnaire (student or parent)
    #[arg(long, default_value = "student")]
    pub(crate) role: Role,
    /// Print the full result as JSON instead of a text summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResponseFile {
    Wrapped { responses: RawResponses },
    Flat(RawResponses),
}

impl ResponseFile {
    fn into_responses(self) -> RawResponses {
        match self {
            ResponseFile::Wrapped { responses } | ResponseFile::Flat(responses) => responses,
        }
    }
}

/// Validate a complete answer set and run the scoring pipeline without
/// persisting anything.
pub(crate) fn score_responses(
    role: Role,
    user_id: &str,
    raw: &RawResponses,
) -> Result<QuestionnaireResult, AppError> {
    let responses = ResponseSet::validate(raw, role, Completeness::Complete)?;
    Ok(QuestionnaireResult::assemble(
        generate_report_id(),
        user_id.to_string(),
        role,
        responses,
        Utc::now(),
    ))
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let contents = fs::read_to_string(&args.responses)?;
    let raw = serde_json::from_str::<ResponseFile>(&contents)?.into_responses();
    let result = score_responses(args.role, CLI_USER_ID, &raw)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        render_result(&result);
    }
    Ok(())
}

fn render_result(result: &QuestionnaireResult) {
    let kind = result.motivation_type;
    println!("ACE motivation report {}", result.report_id);
    println!("Role: {}", result.role.label());
    println!();
    println!("Scores");
    for point in &result.radar {
        println!("  {:<11} {:>2}/{}", point.label, point.score, point.full_mark);
    }
    println!();
    println!("Motivation type: {} {}", kind.icon, kind.name);
    println!("  {}", kind.description);
    println!("  Strengths: {}", kind.strengths.join(", "));
    println!("  Challenges: {}", kind.challenges.join(", "));

    if !result.weak_dimensions.is_empty() {
        let weak: Vec<&str> = result
            .weak_dimensions
            .iter()
            .map(|dimension| dimension.label())
            .collect();
        println!();
        println!("Dimensions to develop: {}", weak.join(", "));
    }

    println!();
    println!("Dimension insights");
    for insight in &result.dimension_insights {
        println!(
            "  {}: {}",
            insight.dimension.label(),
            insight.description
        );
    }

    println!();
    println!("Suggestions");
    for (position, suggestion) in result.suggestions.iter().enumerate() {
        println!("  {}. {}", position + 1, suggestion.title);
        println!("     {}", suggestion.content);
    }
}

pub(crate) async fn run_check_ai() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let client = HttpCompletionClient::new(&config.ai)?;
    if !client.is_configured() {
        println!("AI endpoint {} has no API key configured (set APP_AI_API_KEY); chat and evaluation will use fallback text", client.endpoint());
        return Ok(());
    }

    let endpoint = client.endpoint().to_string();
    let advisor = AiAdvisor::new(Arc::new(client), &config.ai);
    if advisor.check_connection().await {
        println!("AI endpoint {endpoint} reachable (model {})", advisor.model());
    } else {
        println!("AI endpoint {endpoint} unreachable; chat and evaluation will use fallback text");
    }
    Ok(())
}
