use anyhow::Context;
use hall_quiz::{Difficulty, QuizClient, QuizRequest};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::QuizArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `hall quiz`.
pub async fn handle(args: &QuizArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let request = QuizRequest {
        subject: args.subject.clone(),
        topic: args.topic.clone(),
        count: args.count,
        difficulty: args.difficulty.parse::<Difficulty>()?,
    };
    request.validate()?;

    let client = QuizClient::from_config(&ctx.config.quiz)
        .context("set quiz.api_key (STUDYHALL_QUIZ__API_KEY) to generate questions")?;
    let response = client.generate(&request).await?;
    output(&response, flags.format)
}
