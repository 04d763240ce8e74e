pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::matching::handlers as matching;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Resume analysis
        .route("/api/v1/resumes", get(analysis::handle_list_resumes))
        .route("/api/v1/resumes/analyze", post(analysis::handle_analyze))
        .route(
            "/api/v1/resumes/:resume_id/analysis",
            get(analysis::handle_get_analysis),
        )
        // Matching
        .route("/api/v1/match", post(matching::handle_match))
        .route(
            "/api/v1/resumes/:resume_id/matches",
            post(matching::handle_match_resume_to_jobs).get(matching::handle_list_matches),
        )
        // Job postings
        .route(
            "/api/v1/jobs",
            post(matching::handle_create_job).get(matching::handle_list_jobs),
        )
        .route("/api/v1/jobs/:job_id", get(matching::handle_get_job))
        .route(
            "/api/v1/jobs/:job_id/matches",
            get(matching::handle_list_job_matches),
        )
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::analysis::entities::EntityRecognizer;
    use crate::analysis::extract::tests::{build_docx, build_pdf};
    use crate::analysis::vocabulary::Vocabulary;
    use crate::analysis::ResumeAnalyzer;
    use crate::config::Config;
    use crate::matching::matcher::KeywordJobMatcher;
    use crate::storage::MemoryAnalysisStore;

    const BOUNDARY: &str = "resume-analyzer-test-boundary";

    fn app() -> Router {
        let analyzer = ResumeAnalyzer::new(
            &Vocabulary::default(),
            Arc::new(EntityRecognizer::new().unwrap()),
            None,
        )
        .unwrap();
        build_router(AppState {
            config: Config::default(),
            analyzer: Arc::new(analyzer),
            matcher: Arc::new(KeywordJobMatcher),
            store: Arc::new(MemoryAnalysisStore::new()),
        })
    }

    fn resume_docx() -> Vec<u8> {
        build_docx(&[
            "Jane Doe",
            "Skills: Python, SQL, Docker",
            "",
            "Work Experience",
            "Engineer, Acme Corp, 2019 - present",
            "",
            "Education",
            "Bachelor of Science, State University",
        ])
    }

    fn multipart_body(file_name: &str, bytes: &[u8], extra: &[(&str, &str)]) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, value) in extra {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload(body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/resumes/analyze")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health_reports_backends() {
        let (status, body) = send(&app(), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["storage"], "memory");
        assert_eq!(body["matcher"], "keyword");
    }

    #[tokio::test]
    async fn test_analyze_docx_then_fetch_latest() {
        let app = app();
        let (status, body) =
            send(&app, upload(multipart_body("cv.docx", &resume_docx(), &[]))).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["skills"], json!(["python", "sql", "docker"]));
        assert_eq!(body["education"].as_array().unwrap().len(), 1);
        assert_eq!(body["experience"].as_array().unwrap().len(), 1);
        // 3 skills → 12, 1 education → 15, 1 experience → 10.
        assert_eq!(body["score"], 37);
        assert!(body["wordcloud_path"].is_null());

        let resume_id = body["resume_id"].as_str().unwrap().to_string();
        let (status, stored) =
            send(&app, get(&format!("/api/v1/resumes/{resume_id}/analysis"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stored["skills"], body["skills"]);
        assert_eq!(stored["education"], body["education"]);
        assert_eq!(stored["suggestions"], body["suggestions"]);
        assert_eq!(stored["id"], body["analysis_id"]);
    }

    #[tokio::test]
    async fn test_reanalysis_appends_to_existing_resume() {
        let app = app();
        let (_, first) = send(&app, upload(multipart_body("cv.docx", &resume_docx(), &[]))).await;
        let resume_id = first["resume_id"].as_str().unwrap().to_string();

        let (status, second) = send(
            &app,
            upload(multipart_body("cv.docx", &resume_docx(), &[("resume_id", resume_id.as_str())])),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{second}");
        assert_eq!(second["resume_id"], first["resume_id"]);
        assert_ne!(second["analysis_id"], first["analysis_id"]);

        let (_, stored) = send(&app, get(&format!("/api/v1/resumes/{resume_id}/analysis"))).await;
        assert_eq!(stored["id"], second["analysis_id"]);
    }

    #[tokio::test]
    async fn test_unsupported_extension_is_415() {
        let (status, body) =
            send(&app(), upload(multipart_body("cv.txt", b"Python SQL", &[]))).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body["error"]["code"], "UNSUPPORTED_FORMAT");
    }

    #[tokio::test]
    async fn test_corrupt_pdf_is_422() {
        let (status, body) =
            send(&app(), upload(multipart_body("cv.pdf", b"not a pdf", &[]))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "EXTRACTION_FAILED");
    }

    #[tokio::test]
    async fn test_bad_resume_id_field_is_400() {
        let (status, body) = send(
            &app(),
            upload(multipart_body("cv.docx", &resume_docx(), &[("resume_id", "nope")])),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_missing_analysis_is_404() {
        let uri = format!("/api/v1/resumes/{}/analysis", uuid::Uuid::new_v4());
        let (status, body) = send(&app(), get(&uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_match_endpoint() {
        let req = json_request(
            "POST",
            "/api/v1/match",
            json!({
                "features": { "skills": ["python", "sql"], "education": [], "experience": [] },
                "job": { "title": "Data Engineer", "required_skills": "Python, Java, SQL" }
            }),
        );
        let (status, body) = send(&app(), req).await;
        assert_eq!(status, StatusCode::OK);
        let skill_score = body["skill_score"].as_f64().unwrap();
        assert!((skill_score - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(body["education_score"], 25.0);
        assert_eq!(body["experience_score"], 0.0);
        assert_eq!(body["details"][0], "Skills match: 2/3 (67%)");
        assert_eq!(body["band"], "medium");
    }

    #[tokio::test]
    async fn test_job_crud() {
        let app = app();
        let (status, created) = send(
            &app,
            json_request(
                "POST",
                "/api/v1/jobs",
                json!({ "title": "Backend Engineer", "required_skills": "rust, sql" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let job_id = created["id"].as_str().unwrap().to_string();

        let (status, fetched) = send(&app, get(&format!("/api/v1/jobs/{job_id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["title"], "Backend Engineer");

        let (_, listed) = send(&app, get("/api/v1/jobs")).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let (status, _) = send(&app, get(&format!("/api/v1/jobs/{}", uuid::Uuid::new_v4()))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) =
            send(&app, json_request("POST", "/api/v1/jobs", json!({ "title": "  " }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_rank_stored_resume_against_jobs() {
        let app = app();
        for (title, skills) in [("Ops", "kubernetes"), ("Data", "python, sql")] {
            send(
                &app,
                json_request("POST", "/api/v1/jobs", json!({ "title": title, "required_skills": skills })),
            )
            .await;
        }
        let (_, analyzed) =
            send(&app, upload(multipart_body("cv.docx", &resume_docx(), &[]))).await;
        let resume_id = analyzed["resume_id"].as_str().unwrap().to_string();

        let uri = format!("/api/v1/resumes/{resume_id}/matches");
        let (status, ranked) = send(&app, json_request("POST", &uri, Value::Null)).await;
        assert_eq!(status, StatusCode::OK, "{ranked}");
        let ranked = ranked.as_array().unwrap();
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0]["job_title"], "Data");
        assert_eq!(ranked[0]["score"], 100.0);
        assert_eq!(ranked[1]["job_title"], "Ops");

        let (status, stored) = send(&app, get(&uri)).await;
        assert_eq!(status, StatusCode::OK);
        let stored = stored.as_array().unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0]["score"], 100.0);
        assert_eq!(stored[0]["details"][1], "Education match: Yes");
    }

    #[tokio::test]
    async fn test_analyze_pdf() {
        let pdf = build_pdf(&[
            "Jane Doe\nSkills: Python, SQL, Docker",
            "Work Experience\nEngineer, Acme Corp, 2019 - present",
        ]);
        let (status, body) = send(&app(), upload(multipart_body("cv.pdf", &pdf, &[]))).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["skills"], json!(["python", "sql", "docker"]));
        assert!(!body["experience"].as_array().unwrap().is_empty());
        assert!(body["text_length"].as_u64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_list_resumes_by_owner() {
        let app = app();
        let owner = uuid::Uuid::new_v4().to_string();
        send(&app, upload(multipart_body("mine.docx", &resume_docx(), &[("owner_id", owner.as_str())]))).await;
        send(&app, upload(multipart_body("other.docx", &resume_docx(), &[]))).await;

        let (status, all) = send(&app, get("/api/v1/resumes")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(all.as_array().unwrap().len(), 2);
        assert_eq!(all[0]["file_name"], "other.docx");

        let (status, mine) = send(&app, get(&format!("/api/v1/resumes?owner_id={owner}"))).await;
        assert_eq!(status, StatusCode::OK);
        let mine = mine.as_array().unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0]["file_name"], "mine.docx");
        assert_eq!(mine[0]["owner_id"], owner.as_str());
    }

    #[tokio::test]
    async fn test_list_candidates_for_job() {
        let app = app();
        let (_, job) = send(
            &app,
            json_request("POST", "/api/v1/jobs", json!({ "title": "Data", "required_skills": "python, sql, go, java" })),
        )
        .await;
        let job_id = job["id"].as_str().unwrap().to_string();

        let strong = resume_docx();
        let weak = build_docx(&["John Roe", "Skills: Go"]);
        for (name, bytes) in [("weak.docx", weak), ("strong.docx", strong)] {
            let (_, analyzed) = send(&app, upload(multipart_body(name, &bytes, &[]))).await;
            let resume_id = analyzed["resume_id"].as_str().unwrap().to_string();
            let uri = format!("/api/v1/resumes/{resume_id}/matches");
            let (status, _) = send(&app, json_request("POST", &uri, Value::Null)).await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, candidates) = send(&app, get(&format!("/api/v1/jobs/{job_id}/matches"))).await;
        assert_eq!(status, StatusCode::OK, "{candidates}");
        let candidates = candidates.as_array().unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0]["file_name"], "strong.docx");
        assert_eq!(candidates[1]["file_name"], "weak.docx");
        assert_eq!(candidates[0]["job_id"], job_id.as_str());
        assert_eq!(candidates[0]["details"][0], "Skills match: 2/4 (50%)");

        let uri = format!("/api/v1/jobs/{}/matches", uuid::Uuid::new_v4());
        let (status, body) = send(&app, get(&uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }
}
