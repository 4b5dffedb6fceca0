use std::path::{Path, PathBuf};

use regex::Regex;

use crate::domain::AppError;

/// Hosts we accept as download targets.
const YOUTUBE_HOST_MARKERS: [&str; 2] = ["youtube.com", "youtu.be"];

/// Checks that the input looks like a YouTube video or playlist link.
pub fn is_youtube_url(input: &str) -> bool {
    YOUTUBE_HOST_MARKERS
        .iter()
        .any(|marker| input.contains(marker))
}

/// Validates a user-supplied target URL, returning the trimmed form.
///
/// Rejects empty/whitespace-only input and anything without a YouTube host
/// marker. No network traffic happens before this passes.
pub fn validate_target_url(input: &str) -> Result<&str, AppError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AppError::EmptyUrl);
    }
    if !is_youtube_url(trimmed) {
        return Err(AppError::NotYoutube);
    }
    Ok(trimmed)
}

/// Extracts the filename token from a Content-Disposition header value.
///
/// Accepts quoted and bare values after any `filename`-prefixed key, so
/// `filename="a.mp3"`, `filename=a.mp3` and `filename*=UTF-8''a.mp3` all
/// yield a candidate.
pub fn extract_filename_from_disposition(disposition: &str) -> Option<String> {
    let re = Regex::new(r#"filename[^;=\n]*=\s*(?:"([^"]*)"|'([^']*)'|([^;\n]*))"#).ok()?;
    let caps = re.captures(disposition)?;
    let value = caps
        .get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))?
        .as_str()
        .trim();

    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Default filename when the server sends no usable hint.
pub fn default_filename(is_playlist: bool) -> &'static str {
    if is_playlist {
        "youtube_playlist.zip"
    } else {
        "youtube_audio.mp3"
    }
}

/// Resolves the filename to save under: header hint if present and usable,
/// else the kind default; always sanitized and carrying the right extension.
pub fn resolve_filename(disposition: Option<&str>, is_playlist: bool) -> String {
    let hinted = disposition
        .and_then(extract_filename_from_disposition)
        .map(|name| sanitize_filename(&name))
        .filter(|name| !name.is_empty() && name != "download");

    let name = hinted.unwrap_or_else(|| default_filename(is_playlist).to_string());
    let extension = if is_playlist { ".zip" } else { ".mp3" };

    ensure_extension(&name, extension)
}

fn ensure_extension(name: &str, extension: &str) -> String {
    if name.to_ascii_lowercase().ends_with(extension) {
        name.to_string()
    } else {
        format!("{}{}", name, extension)
    }
}

/// Sanitize filename to remove invalid characters
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            _ => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Picks a non-clobbering path in `dir` for `filename`, inserting a ` (n)`
/// counter before the extension when the plain name is taken.
pub fn unique_destination(dir: &Path, filename: &str) -> PathBuf {
    let candidate = dir.join(filename);
    if !candidate.exists() {
        return candidate;
    }

    let (stem, extension) = match filename.rsplit_once('.') {
        Some((stem, ext)) => (stem, format!(".{}", ext)),
        None => (filename, String::new()),
    };

    let mut counter = 1u32;
    loop {
        let candidate = dir.join(format!("{} ({}){}", stem, counter, extension));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}
