//! Shared helpers for HTTP integration tests

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::http::{header, Request};
use axum::Router;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::{TestResponse, TestServer};
use tempfile::TempDir;
use zip::{write::SimpleFileOptions, ZipWriter};

use course_host_server::{build_router, config::Config, state::AppState};

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub data_dir: PathBuf,
    _temp_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = temp_dir.path().join("data");

        let mut config = Config::with_data_dir(data_dir.clone());
        config.server.public_dir = temp_dir.path().join("no-public-dir");

        let state = AppState::new(config);
        state.store().ensure_layout().await.unwrap();

        let server = TestServer::new(build_router(state.clone())).unwrap();

        Self {
            server,
            state,
            data_dir,
            _temp_dir: temp_dir,
        }
    }

    /// A router sharing this app's state, for driving requests directly
    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    pub fn course_dir(&self, course_id: &str) -> PathBuf {
        self.data_dir.join("courses").join(course_id)
    }

    pub fn staged_archives(&self) -> usize {
        std::fs::read_dir(self.data_dir.join("uploads")).unwrap().count()
    }

    /// Upload an archive through the multipart endpoint
    pub async fn upload(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        course_id: Option<&str>,
    ) -> TestResponse {
        let mut form = MultipartForm::new();
        if let Some(course_id) = course_id {
            form = form.add_text("courseId", course_id.to_string());
        }
        form = form.add_part(
            "courseFile",
            Part::bytes(bytes)
                .file_name(file_name.to_string())
                .mime_type("application/zip"),
        );

        self.server.post("/api/upload").multipart(form).await
    }
}

/// Raw multipart upload request carrying `bytes` as the course archive
pub fn upload_request(file_name: &str, bytes: &[u8]) -> Request<Body> {
    const BOUNDARY: &str = "course-host-test-boundary";

    let mut body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"courseFile\"; filename=\"{file_name}\"\r\n\
         Content-Type: application/zip\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Number of entries directly inside `dir`, zero when it does not exist
pub fn count_entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}

/// Build an in-memory ZIP from (name, contents) pairs
pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    for (name, data) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(data).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

pub fn tincan_xml(launch: &str) -> Vec<u8> {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<tincan xmlns="http://projecttincan.com/tincan.xsd">
  <activities>
    <activity id="http://example.com/course" type="http://adlnet.gov/expapi/activities/course">
      <name lang="und">Test Course</name>
      <launch lang="und">{}</launch>
    </activity>
  </activities>
</tincan>"#,
        launch
    )
    .into_bytes()
}
