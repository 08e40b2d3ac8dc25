//! Agent 1: pulls technologies, strengths, domain and a summary out of raw résumé text.

use tracing::debug;

use crate::agents::prompts::extract_resume_prompt;
use crate::agents::schemas::resume_profile_tool;
use crate::agents::AgentRunner;
use crate::models::ResumeProfile;

pub async fn extract_resume_profile(
    runner: &AgentRunner,
    resume_text: &str,
) -> Option<ResumeProfile> {
    debug!("Extracting resume profile from {} chars", resume_text.len());
    runner
        .invoke_as(extract_resume_prompt(resume_text), resume_profile_tool())
        .await
}
