//! Agent 2: compares the résumé summary against the job description.

use crate::agents::prompts::mismatch_prompt;
use crate::agents::schemas::mismatch_tool;
use crate::agents::AgentRunner;
use crate::models::MismatchNote;

pub async fn detect_mismatch(
    runner: &AgentRunner,
    resume_summary: &str,
    job_description: &str,
) -> Option<MismatchNote> {
    runner
        .invoke_as(mismatch_prompt(resume_summary, job_description), mismatch_tool())
        .await
}
