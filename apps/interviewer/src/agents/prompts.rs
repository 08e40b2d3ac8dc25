// Prompt builders for the five agents. Inputs are embedded verbatim.

/// Agent 1: résumé extraction.
pub fn extract_resume_prompt(resume_text: &str) -> String {
    format!(
        "Analyze the resume below. Extract the key technologies, strengths, \
        domain experience (e.g. frontend/backend), projects and programming languages, \
        then write a short summary of the candidate.\n\n\
        RESUME:\n{resume_text}"
    )
}

/// Agent 2: role mismatch detection.
pub fn mismatch_prompt(resume_summary: &str, job_description: &str) -> String {
    format!(
        "Resume Info:\n{resume_summary}\n\n\
        Job Description:\n{job_description}\n\n\
        Is there any mismatch in roles (e.g. the resume is backend-focused but the job is frontend)? \
        If yes, give a brief note. If the resume fits the role, return an empty note."
    )
}

/// Agent 3: general questions. Independent of any pipeline input.
pub const GENERAL_QUESTIONS_PROMPT: &str = "Generate 10 general technical and behavioral \
    interview questions suitable for any software role. For each, assign an importance level \
    (High/Medium/Low) and a weightage from 1 to 10.";

/// Agent 4: role-specific questions.
pub fn role_questions_prompt(job_description: &str) -> String {
    format!(
        "Based on this job description, create 20 tailored interview questions. \
        For each, assign an importance level (High/Medium/Low) and a weightage from 1 to 10.\n\n\
        JOB DESCRIPTION:\n{job_description}"
    )
}

/// Agent 5: résumé-based questions.
pub fn resume_questions_prompt(resume_summary: &str) -> String {
    format!(
        "Based on this resume:\n{resume_summary}\n\n\
        Generate 5 to 10 interview questions about the candidate's projects or technologies. \
        For each, assign an importance level (High/Medium/Low) and a weightage from 1 to 10."
    )
}
