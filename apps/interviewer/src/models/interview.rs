use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Structured résumé facts produced by the extraction agent.
///
/// Only `summary` feeds later prompts; the other fields are kept for the
/// stage log and the server response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeProfile {
    pub technologies: String,
    #[serde(default)]
    pub strengths: String,
    pub domain: String,
    pub summary: String,
}

impl ResumeProfile {
    /// Wraps an unstructured reply. The whole description stands in as the summary.
    pub fn from_description(text: &str) -> Self {
        Self {
            summary: text.trim().to_string(),
            ..Self::default()
        }
    }
}

/// Fit assessment between the résumé and the job description.
/// An empty note means the model reported no mismatch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MismatchNote {
    #[serde(rename = "mismatchNote")]
    pub mismatch_note: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Importance {
    #[serde(alias = "high", alias = "HIGH")]
    High,
    #[serde(alias = "medium", alias = "MEDIUM")]
    Medium,
    #[serde(alias = "low", alias = "LOW")]
    Low,
}

/// Origin category of a question. Attached by the table compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    General,
    Role,
    Resume,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub importance: Importance,
    /// Requested as 1–10; the model's value is passed through untouched.
    pub weightage: Number,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub question_type: Option<QuestionType>,
}

/// One category of generated questions, in the order the model returned them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionSet {
    pub questions: Vec<Question>,
}

/// Final merged document printed at the end of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewTable {
    pub role: String,
    pub note: String,
    pub questions: Vec<Question>,
}
