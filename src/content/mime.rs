//! Content type and caching classification by file extension

/// Cache directive for static assets and media
pub const LONG_CACHE: &str = "public, max-age=86400";
/// Cache directive for HTML, so re-uploaded packages are picked up
pub const NO_CACHE: &str = "no-cache";

/// Lowercased extension of a path, without the dot
pub fn extension(path: &str) -> String {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    match file_name.rsplit_once('.') {
        Some((_, ext)) => ext.to_ascii_lowercase(),
        None => String::new(),
    }
}

/// Content type for an extension
pub fn content_type(ext: &str) -> &'static str {
    match ext {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css",
        "js" => "application/javascript",
        "json" | "tincan" => "application/json",
        "xml" => "application/xml",
        "txt" => "text/plain",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "mp4" | "f4v" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "ogg" | "ogv" => "video/ogg",
        "mov" => "video/quicktime",
        "flv" => "video/x-flv",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "m4a" => "audio/mp4",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",
        "eot" => "application/vnd.ms-fontobject",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "swf" => "application/x-shockwave-flash",
        "xap" => "application/x-silverlight-app",
        _ => "application/octet-stream",
    }
}

/// Audio and video files, served with byte-range support
pub fn is_media(ext: &str) -> bool {
    matches!(
        ext,
        "mp4" | "webm" | "ogv" | "mov" | "m4v" | "f4v" | "flv" | "mp3" | "wav" | "ogg" | "m4a"
    )
}

pub fn is_html(ext: &str) -> bool {
    matches!(ext, "html" | "htm")
}

/// Stylesheets, scripts, images and fonts
pub fn is_static_asset(ext: &str) -> bool {
    matches!(
        ext,
        "css"
            | "js"
            | "jpg"
            | "jpeg"
            | "png"
            | "gif"
            | "webp"
            | "svg"
            | "ico"
            | "woff"
            | "woff2"
            | "ttf"
            | "eot"
            | "otf"
    )
}

/// Cache-Control value for an extension, if any
pub fn cache_control(ext: &str) -> Option<&'static str> {
    if is_html(ext) {
        Some(NO_CACHE)
    } else if is_static_asset(ext) || is_media(ext) {
        Some(LONG_CACHE)
    } else {
        None
    }
}

/// Articulate Storyline output, which needs relaxed cross-origin headers
pub fn is_story_content(path: &str) -> bool {
    let path = format!("/{}", path);
    path.contains("/story_content/")
        || path.contains("/mobile/")
        || path.ends_with("/story.html")
        || path.ends_with("/story_html5.html")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension() {
        assert_eq!(extension("story_content/video.MP4"), "mp4");
        assert_eq!(extension("a.b/file"), "");
        assert_eq!(extension("archive.tar.gz"), "gz");
        assert_eq!(extension("noext"), "");
    }

    #[test]
    fn test_content_type_table() {
        assert_eq!(content_type("html"), "text/html; charset=utf-8");
        assert_eq!(content_type("js"), "application/javascript");
        assert_eq!(content_type("mp3"), "audio/mpeg");
        assert_eq!(content_type("woff2"), "font/woff2");
        assert_eq!(content_type("exe"), "application/octet-stream");
        assert_eq!(content_type(""), "application/octet-stream");
    }

    #[test]
    fn test_cache_control() {
        assert_eq!(cache_control("html"), Some(NO_CACHE));
        assert_eq!(cache_control("css"), Some(LONG_CACHE));
        assert_eq!(cache_control("mp4"), Some(LONG_CACHE));
        assert_eq!(cache_control("json"), None);
    }

    #[test]
    fn test_story_content() {
        assert!(is_story_content("story.html"));
        assert!(is_story_content("story_content/slides.js"));
        assert!(is_story_content("res/mobile/player.js"));
        assert!(is_story_content("story_html5.html"));
        assert!(!is_story_content("history.html"));
        assert!(!is_story_content("index.html"));
    }
}
