// Shared prompt fragments. Each agent keeps its own templates in
// agents/prompts.rs; this file only holds the cross-cutting pieces.

/// System prompt used for every agent call.
pub const INTERVIEWER_SYSTEM: &str = "You are an experienced technical recruiter \
    preparing a structured interview for a software candidate. \
    Be concise and factual. Base every statement on the material provided.";

/// Appended to prompts in text mode, where no tool schema constrains the reply.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    Respond with valid JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT include explanations or apologies.";
