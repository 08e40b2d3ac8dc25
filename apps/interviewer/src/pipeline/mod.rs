//! Interview pipeline: runs the five agents in a fixed order and compiles the table.
//!
//! Flow: extract résumé → detect mismatch → general questions → role questions →
//!       résumé questions → compile.
//!
//! Stages run one at a time, each under the timeout guard and followed by the
//! pacing delay. A stage that fails or times out leaves its output absent; stages
//! that need the résumé summary are skipped when extraction produced nothing.
//! Absent question sets compile as empty and an absent note as "".

use std::fmt::Debug;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::agents::{
    detect_mismatch, extract_resume_profile, generate_general_questions,
    generate_resume_questions, generate_role_questions, AgentRunner,
};
use crate::config::PipelineConfig;
use crate::errors::AppError;
use crate::llm_client::CompletionBackend;
use crate::models::InterviewTable;
use crate::resume_source::read_resume;
use crate::timeout::with_timeout;

pub mod compiler;

pub use compiler::compile;

// ────────────────────────────────────────────────────────────────────────────
// Stage bookkeeping
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Extract,
    Mismatch,
    GeneralQuestions,
    RoleQuestions,
    ResumeQuestions,
}

impl Stage {
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Extract => "Agent 1: Resume Extraction",
            Stage::Mismatch => "Agent 2: Mismatch Detection",
            Stage::GeneralQuestions => "Agent 3: General Questions",
            Stage::RoleQuestions => "Agent 4: Role-Specific Questions",
            Stage::ResumeQuestions => "Agent 5: Resume-Based Questions",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Completed,
    /// The agent returned nothing (client or decode error, already logged).
    Failed,
    TimedOut,
    /// Not invoked because an input it depends on is absent.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageReport {
    pub stage: Stage,
    pub status: StageStatus,
    pub elapsed_ms: u64,
}

/// Result of one pipeline run: the table plus how each stage went.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineRun {
    pub table: InterviewTable,
    pub stages: Vec<StageReport>,
}

impl PipelineRun {
    #[cfg(test)]
    pub fn status_of(&self, stage: Stage) -> Option<StageStatus> {
        self.stages
            .iter()
            .find(|r| r.stage == stage)
            .map(|r| r.status)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestrator
// ────────────────────────────────────────────────────────────────────────────

pub struct Pipeline {
    runner: AgentRunner,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(backend: Arc<dyn CompletionBackend>, config: PipelineConfig) -> Self {
        Self {
            runner: AgentRunner::new(backend, &config),
            config,
        }
    }

    /// Reads the résumé at `path` (text or PDF) and runs the pipeline on it.
    /// Failing to read the résumé is the only fatal error.
    pub async fn run_from_file(
        &self,
        path: &Path,
        job_description: &str,
        job_role: &str,
    ) -> Result<PipelineRun, AppError> {
        let resume_text = read_resume(path).await?;
        Ok(self.run(&resume_text, job_description, job_role).await)
    }

    pub async fn run(&self, resume_text: &str, job_description: &str, job_role: &str) -> PipelineRun {
        let span = info_span!("pipeline", run_id = %Uuid::new_v4(), role = job_role);
        self.run_stages(resume_text, job_description, job_role)
            .instrument(span)
            .await
    }

    async fn run_stages(
        &self,
        resume_text: &str,
        job_description: &str,
        job_role: &str,
    ) -> PipelineRun {
        info!("Starting interview pipeline");
        let mut reports = Vec::with_capacity(5);
        let runner = &self.runner;

        let profile = self
            .stage(
                &mut reports,
                Stage::Extract,
                extract_resume_profile(runner, resume_text),
            )
            .await;
        let summary = profile.as_ref().map(|p| p.summary.as_str());

        let note = match summary {
            Some(summary) => {
                self.stage(
                    &mut reports,
                    Stage::Mismatch,
                    detect_mismatch(runner, summary, job_description),
                )
                .await
            }
            None => skip(&mut reports, Stage::Mismatch),
        };

        let general = self
            .stage(
                &mut reports,
                Stage::GeneralQuestions,
                generate_general_questions(runner),
            )
            .await;

        let role = self
            .stage(
                &mut reports,
                Stage::RoleQuestions,
                generate_role_questions(runner, job_description),
            )
            .await;

        let resume = match summary {
            Some(summary) => {
                self.stage(
                    &mut reports,
                    Stage::ResumeQuestions,
                    generate_resume_questions(runner, summary),
                )
                .await
            }
            None => skip(&mut reports, Stage::ResumeQuestions),
        };

        let table = compile(
            &general.unwrap_or_default(),
            &role.unwrap_or_default(),
            &resume.unwrap_or_default(),
            &note.map(|n| n.mismatch_note).unwrap_or_default(),
            job_role,
        );
        info!("Compiled interview table with {} questions", table.questions.len());

        PipelineRun {
            table,
            stages: reports,
        }
    }

    /// Runs one agent under the timeout guard, records how it went, then paces.
    async fn stage<T, F>(&self, reports: &mut Vec<StageReport>, stage: Stage, operation: F) -> Option<T>
    where
        F: Future<Output = Option<T>>,
        T: Debug,
    {
        info!("{}...", stage.label());
        let started = Instant::now();

        let (status, output) =
            match with_timeout(operation, self.config.agent_timeout, stage.label()).await {
                Ok(Some(output)) => {
                    debug!("{}: {:?}", stage.label(), output);
                    (StageStatus::Completed, Some(output))
                }
                Ok(None) => {
                    warn!("{} produced no result", stage.label());
                    (StageStatus::Failed, None)
                }
                Err(e) => {
                    warn!("{e}");
                    (StageStatus::TimedOut, None)
                }
            };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        info!("{} finished: {:?} in {}ms", stage.label(), status, elapsed_ms);
        reports.push(StageReport {
            stage,
            status,
            elapsed_ms,
        });

        if !self.config.stage_delay.is_zero() {
            tokio::time::sleep(self.config.stage_delay).await;
        }
        output
    }
}

fn skip<T>(reports: &mut Vec<StageReport>, stage: Stage) -> Option<T> {
    warn!("{} skipped: resume summary unavailable", stage.label());
    reports.push(StageReport {
        stage,
        status: StageStatus::Skipped,
        elapsed_ms: 0,
    });
    None
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
