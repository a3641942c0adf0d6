use axum::{
    extract::{Multipart, Path, State},
    routing::post,
    Json, Router,
};
use tracing::info;

use crate::chat::{UploadReport, UploadedFile};
use crate::models::AppState;
use crate::routes::session_handle;
use crate::session::SessionId;
use crate::types::{AppError, AppResult};

pub fn router() -> Router<AppState> {
    Router::new().route("/api/sessions/{id}/files", post(upload_files))
}

/// Accepts any number of file parts. Parts without a file name are ignored.
async fn upload_files(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadReport>> {
    let handle = session_handle(&state, id).await?;

    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidRequest(e.body_text()))?
    {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidRequest(e.body_text()))?;
        files.push(UploadedFile {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    info!(session_id = %id, files = files.len(), "File upload received");

    let mut session = handle.lock().await;
    let report = state.chat.ingest(&mut session, files).await;
    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;

    use crate::extract::docx::tests::build_docx;
    use crate::extract::pdf::tests::build_pdf;
    use crate::extract::spreadsheet::tests::{build_xlsx, Cell};
    use crate::extract::{DOCX_MIME, PDF_MIME, XLSX_MIME};
    use crate::llm::provider::testing::ScriptedClient;
    use crate::routes::create_router;
    use crate::routes::tests::{create_session, part, test_state, upload, view};

    #[tokio::test]
    async fn test_multiple_formats_in_one_upload() {
        let app = create_router(test_state(Arc::new(ScriptedClient::default())));
        let id = create_session(&app).await;

        let pdf = build_pdf(&[Some("Page one"), Some("Page two")]);
        let docx = build_docx(&["Intro", "Details"]);
        let xlsx = build_xlsx(&[(
            "Budget",
            vec![
                vec![Cell::Text("line"), Cell::Text("amount")],
                vec![Cell::Text("travel"), Cell::Number(120.0)],
            ],
        )]);
        let (status, report) = upload(
            &app,
            &id,
            &[
                part("paper.pdf", PDF_MIME, &pdf),
                part("letter.docx", DOCX_MIME, &docx),
                part("notes.txt", "text/plain", b"hello world"),
                part("budget.xlsx", XLSX_MIME, &xlsx),
            ],
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let files = report["files"].as_array().unwrap();
        assert_eq!(files.len(), 4);
        assert!(files.iter().all(|f| f["status"] == "processed"));
        assert_eq!(files[0]["kind"], "pdf");
        assert_eq!(files[1]["kind"], "docx");
        assert_eq!(files[2]["kind"], "text");
        assert_eq!(files[3]["kind"], "spreadsheet");
        let budget = "\nSheet: Budget\n| line | amount |\n| --- | --- |\n| travel | 120 |\n";
        assert_eq!(files[3]["characters"], budget.chars().count());

        let (_, session) = view(&app, &id).await;
        let names: Vec<&str> = session["documents"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["file_name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["paper.pdf", "letter.docx", "notes.txt", "budget.xlsx"]);
    }

    #[tokio::test]
    async fn test_reupload_is_skipped() {
        let app = create_router(test_state(Arc::new(ScriptedClient::default())));
        let id = create_session(&app).await;

        upload(&app, &id, &[part("notes.txt", "text/plain", b"hello world")]).await;
        let (status, report) = upload(&app, &id, &[part("notes.txt", "text/plain", b"changed")]).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["files"][0]["status"], "skipped");

        let (_, session) = view(&app, &id).await;
        assert_eq!(session["documents"].as_array().unwrap().len(), 1);
        assert_eq!(session["documents"][0]["characters"], 11);
    }

    #[tokio::test]
    async fn test_broken_file_reports_failure() {
        let app = create_router(test_state(Arc::new(ScriptedClient::default())));
        let id = create_session(&app).await;

        let (status, report) = upload(&app, &id, &[part("broken.pdf", PDF_MIME, b"%PDF-garbage")]).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["files"][0]["status"], "failed");
        assert!(report["files"][0]["error"].as_str().unwrap().contains("PDF"));
        assert_eq!(report["notice"], "Processed 0 of 1 files; 1 could not be read.");

        let (_, session) = view(&app, &id).await;
        assert!(session["documents"].as_array().unwrap().is_empty());
    }
}
