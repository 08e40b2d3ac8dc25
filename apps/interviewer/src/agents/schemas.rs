//! Tool declarations (name, description, JSON Schema) for each agent.

use serde_json::{json, Value};

use crate::llm_client::ToolSpec;

pub fn resume_profile_tool() -> ToolSpec {
    ToolSpec {
        name: "extract_resume_info",
        description: "Extracts key information from a resume text.",
        parameters: json!({
            "type": "object",
            "properties": {
                "technologies": { "type": "string" },
                "strengths": { "type": "string" },
                "domain": { "type": "string" },
                "summary": { "type": "string" }
            },
            "required": ["technologies", "domain", "summary"]
        }),
    }
}

pub fn mismatch_tool() -> ToolSpec {
    ToolSpec {
        name: "detect_mismatch",
        description: "Checks for role mismatch between resume and job description.",
        parameters: json!({
            "type": "object",
            "properties": {
                "mismatchNote": {
                    "type": "string",
                    "description": "Summary of mismatch if any, empty when the resume fits"
                }
            },
            "required": ["mismatchNote"]
        }),
    }
}

pub fn general_questions_tool() -> ToolSpec {
    ToolSpec {
        name: "generate_general_questions",
        description: "Generates general interview questions.",
        parameters: question_set_schema(),
    }
}

pub fn role_questions_tool() -> ToolSpec {
    ToolSpec {
        name: "generate_role_questions",
        description: "Generates role-specific interview questions.",
        parameters: question_set_schema(),
    }
}

pub fn resume_questions_tool() -> ToolSpec {
    ToolSpec {
        name: "generate_resume_questions",
        description: "Generates questions from resume projects or tech stack.",
        parameters: question_set_schema(),
    }
}

fn question_set_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "questions": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "question": { "type": "string" },
                        "importance": { "type": "string", "enum": ["High", "Medium", "Low"] },
                        "weightage": { "type": "number", "minimum": 1, "maximum": 10 }
                    },
                    "required": ["question", "importance", "weightage"]
                }
            }
        },
        "required": ["questions"]
    })
}
