//! Agents 3–5: question generators. All three share the question-set schema
//! but declare their own tool names.

use crate::agents::prompts::{
    resume_questions_prompt, role_questions_prompt, GENERAL_QUESTIONS_PROMPT,
};
use crate::agents::schemas::{general_questions_tool, resume_questions_tool, role_questions_tool};
use crate::agents::AgentRunner;
use crate::models::QuestionSet;

/// ~10 questions for any software role.
pub async fn generate_general_questions(runner: &AgentRunner) -> Option<QuestionSet> {
    runner
        .invoke_as(GENERAL_QUESTIONS_PROMPT.to_string(), general_questions_tool())
        .await
}

/// ~20 questions tailored to the job description.
pub async fn generate_role_questions(
    runner: &AgentRunner,
    job_description: &str,
) -> Option<QuestionSet> {
    runner
        .invoke_as(role_questions_prompt(job_description), role_questions_tool())
        .await
}

/// 5–10 questions about the candidate's own projects and stack.
pub async fn generate_resume_questions(
    runner: &AgentRunner,
    resume_summary: &str,
) -> Option<QuestionSet> {
    runner
        .invoke_as(resume_questions_prompt(resume_summary), resume_questions_tool())
        .await
}
