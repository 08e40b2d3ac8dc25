//! Axum route handlers for the interview pipeline.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::pipeline::PipelineRun;
use crate::resume_source::ResumeUpload;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct InterviewRequest {
    pub resume_text: String,
    pub job_description: String,
    pub job_role: String,
}

impl InterviewRequest {
    fn validate(&self) -> Result<(), AppError> {
        for (field, value) in [
            ("resume_text", &self.resume_text),
            ("job_description", &self.job_description),
            ("job_role", &self.job_role),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::Validation(format!("{field} cannot be empty")));
            }
        }
        Ok(())
    }
}

/// POST /api/v1/interviews
///
/// Runs the full pipeline on a résumé given as text.
pub async fn handle_create_interview(
    State(state): State<AppState>,
    Json(request): Json<InterviewRequest>,
) -> Result<Json<PipelineRun>, AppError> {
    request.validate()?;

    let run = state
        .pipeline
        .run(&request.resume_text, &request.job_description, &request.job_role)
        .await;

    Ok(Json(run))
}

/// POST /api/v1/interviews/upload
///
/// Multipart form: `resume` (text or PDF file), `job_description`, `job_role`.
pub async fn handle_upload_interview(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<PipelineRun>, AppError> {
    let mut upload: Option<ResumeUpload> = None;
    let mut job_description = String::new();
    let mut job_role = String::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read resume: {e}")))?;
                upload = Some(ResumeUpload {
                    file_name,
                    content_type,
                    data,
                });
            }
            "job_description" | "job_role" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read {name}: {e}")))?;
                if name == "job_role" {
                    job_role = text;
                } else {
                    job_description = text;
                }
            }
            _ => {}
        }
    }

    let upload =
        upload.ok_or_else(|| AppError::Validation("resume file is required".to_string()))?;
    let request = InterviewRequest {
        resume_text: upload.into_text().await?,
        job_description,
        job_role,
    };
    request.validate()?;

    let run = state
        .pipeline
        .run(&request.resume_text, &request.job_description, &request.job_role)
        .await;

    Ok(Json(run))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::agents::testing::*;
    use crate::config::PipelineConfig;
    use crate::pipeline::Pipeline;
    use crate::routes::build_router;
    use crate::state::AppState;

    fn app(script: Vec<Scripted>) -> axum::Router {
        let config = PipelineConfig {
            stage_delay: Duration::ZERO,
            ..PipelineConfig::new("http://localhost/openai")
        };
        let pipeline = Pipeline::new(ScriptedBackend::new(script), config);
        build_router(AppState {
            pipeline: Arc::new(pipeline),
        })
    }

    fn full_script() -> Vec<Scripted> {
        vec![
            profile_reply("Frontend engineer"),
            note_reply(""),
            questions_reply("General", 10),
            questions_reply("Role", 20),
            questions_reply("Resume", 5),
        ]
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(vec![])
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_create_interview_returns_table_and_stages() {
        let body = json!({
            "resume_text": "Skilled in React, 3 years frontend",
            "job_description": "We are hiring a Frontend Developer proficient in React.",
            "job_role": "Frontend Developer"
        });
        let response = app(full_script())
            .oneshot(
                Request::post("/api/v1/interviews")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["table"]["role"], "Frontend Developer");
        assert_eq!(json["table"]["note"], "");
        assert_eq!(json["table"]["questions"].as_array().unwrap().len(), 35);
        assert_eq!(json["table"]["questions"][0]["type"], "general");
        assert_eq!(json["stages"].as_array().unwrap().len(), 5);
        assert_eq!(json["stages"][0]["stage"], "extract");
        assert_eq!(json["stages"][0]["status"], "completed");
    }

    #[tokio::test]
    async fn test_create_interview_rejects_empty_role() {
        let body = json!({
            "resume_text": "resume",
            "job_description": "jd",
            "job_role": "   "
        });
        let response = app(vec![])
            .oneshot(
                Request::post("/api/v1/interviews")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_upload_text_resume() {
        let boundary = "interviewer-boundary";
        let body = format!(
            "--{boundary}\r\n\
            Content-Disposition: form-data; name=\"resume\"; filename=\"resume.txt\"\r\n\
            Content-Type: text/plain\r\n\r\n\
            Skilled in React, 3 years frontend\r\n\
            --{boundary}\r\n\
            Content-Disposition: form-data; name=\"job_description\"\r\n\r\n\
            Hiring backend engineer, Go required\r\n\
            --{boundary}\r\n\
            Content-Disposition: form-data; name=\"job_role\"\r\n\r\n\
            Backend Engineer\r\n\
            --{boundary}--\r\n"
        );
        let response = app(full_script())
            .oneshot(
                Request::post("/api/v1/interviews/upload")
                    .header(
                        "content-type",
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["table"]["role"], "Backend Engineer");
    }

    #[tokio::test]
    async fn test_upload_without_resume_is_rejected() {
        let boundary = "interviewer-boundary";
        let body = format!(
            "--{boundary}\r\n\
            Content-Disposition: form-data; name=\"job_role\"\r\n\r\n\
            Backend Engineer\r\n\
            --{boundary}--\r\n"
        );
        let response = app(vec![])
            .oneshot(
                Request::post("/api/v1/interviews/upload")
                    .header(
                        "content-type",
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
