//! Course file serving
//!
//! Files are streamed from disk; range requests on media seek to the start
//! offset and read only the requested window.

use std::io::{self, SeekFrom};
use std::path::Path;

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use futures::TryStreamExt;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

use crate::error::{AppError, Result};
use crate::storage::CourseStore;

use super::mime;
use super::paths::{ensure_contained, SafePath};
use super::range::{parse_range, ByteRange};

/// Index files tried when a directory is requested
pub const DIRECTORY_INDEX_FILES: &[&str] = &["index.html", "story.html"];

const STORY_CONTENT_SECURITY_POLICY: &str = "default-src * 'self' 'unsafe-inline' 'unsafe-eval' data: blob:; \
    script-src * 'self' 'unsafe-inline' 'unsafe-eval'; \
    connect-src * 'self'; \
    img-src * data: blob: 'self'; \
    frame-src *; \
    style-src * 'self' 'unsafe-inline'; \
    font-src * 'self'; \
    media-src * blob: 'self';";

/// URL of a file inside a course
pub fn course_file_url(course_id: &str, encoded_path: &str) -> String {
    format!("/courses/{}/{}", urlencoding::encode(course_id), encoded_path)
}

/// Serve `requested` (relative to the course root) for `course_id`
pub async fn serve_course_file(
    store: &CourseStore,
    course_id: &str,
    requested: &str,
    headers: &HeaderMap,
) -> Result<Response> {
    let course_root = store
        .course_dir(course_id)
        .map_err(|_| AppError::NotFound("Course not found".to_string()))?;

    match tokio::fs::metadata(&course_root).await {
        Ok(meta) if meta.is_dir() => {}
        _ => return Err(AppError::NotFound("Course not found".to_string())),
    }

    let safe_path = SafePath::parse(requested)?;
    let absolute = safe_path.join_to(&course_root);

    let metadata = match tokio::fs::metadata(&absolute).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => return Err(e.into()),
        Err(e) => {
            tracing::debug!(
                course_id = %course_id,
                path = %safe_path.as_url_path(),
                "File not found: {}",
                e
            );
            return Err(AppError::NotFound("File not found".to_string()));
        }
    };

    ensure_contained(&course_root, &absolute).await?;

    if metadata.is_dir() {
        return redirect_to_index(course_id, &safe_path, &absolute).await;
    }

    let ext = mime::extension(&safe_path.as_url_path());
    let size = metadata.len();
    let is_media = mime::is_media(&ext);

    let range = match headers.get(header::RANGE) {
        Some(value) if is_media => {
            let value = value
                .to_str()
                .map_err(|_| AppError::RangeNotSatisfiable { size })?;
            match parse_range(value, size) {
                Ok(range) => Some(range),
                Err(e) => {
                    tracing::warn!(
                        course_id = %course_id,
                        path = %safe_path.as_url_path(),
                        range = %value,
                        size,
                        "Invalid range request"
                    );
                    return Err(e);
                }
            }
        }
        _ => None,
    };

    let body = open_body(&absolute, range, size).await?;

    let mut builder = Response::builder()
        .header(header::CONTENT_TYPE, mime::content_type(&ext))
        .header(header::X_CONTENT_TYPE_OPTIONS, "nosniff");

    builder = match range {
        Some(range) => {
            tracing::debug!(
                course_id = %course_id,
                path = %safe_path.as_url_path(),
                "Range request: {} ({} bytes)",
                range.content_range(size),
                range.len()
            );
            builder
                .status(StatusCode::PARTIAL_CONTENT)
                .header(header::CONTENT_RANGE, range.content_range(size))
                .header(header::CONTENT_LENGTH, range.len())
        }
        None => builder
            .status(StatusCode::OK)
            .header(header::CONTENT_LENGTH, size),
    };

    if is_media {
        builder = builder.header(header::ACCEPT_RANGES, "bytes");
    }

    if let Some(cache_control) = mime::cache_control(&ext) {
        builder = builder.header(header::CACHE_CONTROL, cache_control);
    }

    let mut response = builder
        .body(body)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if mime::is_story_content(&safe_path.as_url_path()) {
        apply_story_headers(response.headers_mut());
    }

    Ok(response)
}

/// Redirect a directory request to its index file
async fn redirect_to_index(
    course_id: &str,
    safe_path: &SafePath,
    absolute: &Path,
) -> Result<Response> {
    for index in DIRECTORY_INDEX_FILES {
        let is_file = tokio::fs::metadata(absolute.join(index))
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);

        if is_file {
            let target = course_file_url(course_id, &safe_path.child(index).encoded());
            return Ok(Redirect::temporary(&target).into_response());
        }
    }

    Err(AppError::NotFound("Directory index not found".to_string()))
}

/// Open the file and wrap the requested window in a streaming body
async fn open_body(path: &Path, range: Option<ByteRange>, size: u64) -> Result<Body> {
    let mut file = tokio::fs::File::open(path).await?;

    let (start, len) = match range {
        Some(range) => (range.start, range.len()),
        None => (0, size),
    };

    if start > 0 {
        file.seek(SeekFrom::Start(start)).await?;
    }

    let shown_path = path.display().to_string();
    let stream = ReaderStream::new(file.take(len)).inspect_err(move |e| {
        // Headers are already on the wire; the connection is aborted
        tracing::error!(path = %shown_path, "Error streaming file: {}", e);
    });

    Ok(Body::from_stream(stream))
}

fn apply_story_headers(headers: &mut HeaderMap) {
    let story_headers = [
        ("cross-origin-embedder-policy", "credentialless"),
        ("cross-origin-opener-policy", "same-origin-allow-popups"),
        ("cross-origin-resource-policy", "cross-origin"),
        ("content-security-policy", STORY_CONTENT_SECURITY_POLICY),
    ];

    for (name, value) in story_headers {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use std::fs;
    use tempfile::TempDir;

    fn store_with_course(files: &[(&str, &[u8])]) -> (TempDir, CourseStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = CourseStore::new(temp_dir.path());
        let course_dir = store.course_dir("demo").unwrap();
        fs::create_dir_all(&course_dir).unwrap();
        for (name, data) in files {
            let path = course_dir.join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, data).unwrap();
        }
        (temp_dir, store)
    }

    fn range_header(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::RANGE, HeaderValue::from_str(value).unwrap());
        headers
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
    }

    #[tokio::test]
    async fn test_serves_html_without_caching() {
        let (_dir, store) = store_with_course(&[("index.html", b"<html></html>")]);
        let response = serve_course_file(&store, "demo", "index.html", &HeaderMap::new())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-cache");
        assert_eq!(response.headers()[header::CONTENT_LENGTH], "13");
        assert!(response.headers().get(header::ACCEPT_RANGES).is_none());
        assert_eq!(body_bytes(response).await, b"<html></html>");
    }

    #[tokio::test]
    async fn test_media_range_request() {
        let data: Vec<u8> = (0..1000u32).map(|i| (i % 251) as u8).collect();
        let (_dir, store) = store_with_course(&[("media/clip.mp4", &data)]);

        let response = serve_course_file(&store, "demo", "media/clip.mp4", &range_header("bytes=0-99"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(response.headers()[header::CONTENT_RANGE], "bytes 0-99/1000");
        assert_eq!(response.headers()[header::CONTENT_LENGTH], "100");
        assert_eq!(response.headers()[header::ACCEPT_RANGES], "bytes");
        assert_eq!(response.headers()[header::CONTENT_TYPE], "video/mp4");
        assert_eq!(body_bytes(response).await, &data[..100]);
    }

    #[tokio::test]
    async fn test_media_range_from_middle() {
        let data: Vec<u8> = (0..1000u32).map(|i| (i % 251) as u8).collect();
        let (_dir, store) = store_with_course(&[("audio.mp3", &data)]);

        let response = serve_course_file(&store, "demo", "audio.mp3", &range_header("bytes=900-"))
            .await
            .unwrap();

        assert_eq!(response.headers()[header::CONTENT_RANGE], "bytes 900-999/1000");
        assert_eq!(body_bytes(response).await, &data[900..]);
    }

    #[tokio::test]
    async fn test_media_range_not_satisfiable() {
        let (_dir, store) = store_with_course(&[("clip.webm", &[0u8; 1000])]);

        let result =
            serve_course_file(&store, "demo", "clip.webm", &range_header("bytes=2000-3000")).await;

        assert!(matches!(
            result,
            Err(AppError::RangeNotSatisfiable { size: 1000 })
        ));
    }

    #[tokio::test]
    async fn test_media_without_range_is_complete() {
        let (_dir, store) = store_with_course(&[("clip.mp4", &[7u8; 64])]);
        let response = serve_course_file(&store, "demo", "clip.mp4", &HeaderMap::new())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::ACCEPT_RANGES], "bytes");
        assert_eq!(response.headers()[header::CONTENT_LENGTH], "64");
        assert_eq!(body_bytes(response).await.len(), 64);
    }

    #[tokio::test]
    async fn test_range_ignored_for_non_media() {
        let (_dir, store) = store_with_course(&[("app.js", b"console.log(1)")]);
        let response = serve_course_file(&store, "demo", "app.js", &range_header("bytes=0-3"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CACHE_CONTROL], mime::LONG_CACHE);
        assert_eq!(body_bytes(response).await, b"console.log(1)");
    }

    #[tokio::test]
    async fn test_traversal_is_forbidden() {
        let (_dir, store) = store_with_course(&[("index.html", b"x")]);
        let result =
            serve_course_file(&store, "demo", "../../etc/passwd", &HeaderMap::new()).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_missing_file_and_course() {
        let (_dir, store) = store_with_course(&[("index.html", b"x")]);

        let missing_file = serve_course_file(&store, "demo", "nope.html", &HeaderMap::new()).await;
        assert!(matches!(missing_file, Err(AppError::NotFound(_))));

        let missing_course =
            serve_course_file(&store, "other", "index.html", &HeaderMap::new()).await;
        assert!(matches!(missing_course, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_directory_redirects_to_index() {
        let (_dir, store) = store_with_course(&[
            ("lesson 1/story.html", b"story"),
            ("lesson2/index.html", b"index"),
            ("lesson2/story.html", b"story"),
            ("empty/readme.txt", b""),
        ]);

        let response = serve_course_file(&store, "demo", "lesson 1", &HeaderMap::new())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers()[header::LOCATION],
            "/courses/demo/lesson%201/story.html"
        );

        let response = serve_course_file(&store, "demo", "lesson2/", &HeaderMap::new())
            .await
            .unwrap();
        assert_eq!(
            response.headers()[header::LOCATION],
            "/courses/demo/lesson2/index.html"
        );

        let result = serve_course_file(&store, "demo", "empty", &HeaderMap::new()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_story_content_headers() {
        let (_dir, store) = store_with_course(&[("story_content/user.js", b"//")]);
        let response = serve_course_file(&store, "demo", "story_content/user.js", &HeaderMap::new())
            .await
            .unwrap();

        assert_eq!(
            response.headers()["cross-origin-embedder-policy"],
            "credentialless"
        );
        assert_eq!(
            response.headers()["cross-origin-resource-policy"],
            "cross-origin"
        );
        assert!(response.headers().contains_key("content-security-policy"));
    }
}
