use std::path::Path;

pub const FALLBACK_MIME: &str = "application/octet-stream";

/// Strips parameters (`; codecs=...`) and surrounding whitespace.
pub fn essence(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
}

pub fn is_video(content_type: &str) -> bool {
    essence(content_type)
        .to_ascii_lowercase()
        .starts_with("video/")
}

pub fn extension_to_content_type(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "mov" | "qt" => "video/quicktime",
        "mkv" => "video/x-matroska",
        "avi" => "video/x-msvideo",
        "mpeg" | "mpg" => "video/mpeg",
        "ogv" => "video/ogg",
        "3gp" => "video/3gpp",
        "wmv" => "video/x-ms-wmv",
        "flv" => "video/x-flv",
        _ => FALLBACK_MIME,
    }
}

pub fn content_type_for_path(path: impl AsRef<Path>) -> &'static str {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .map(extension_to_content_type)
        .unwrap_or(FALLBACK_MIME)
}
