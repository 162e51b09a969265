//! Media helpers built on `ffprobe` / `ffmpeg` and MIME guessing.
//!
//! None of these are on the upload path; they exist for a media server or
//! operator tooling sitting next to the bot.

use std::path::{Path, PathBuf};

use crate::core::error::{AppError, AppResult};

/// MIME fragments that make a file streamable.
pub const STREAMABLE_MIME_MARKERS: [&str; 3] = ["video", "audio", "pdf"];

/// Directory thumbnails are written to.
pub const THUMBNAIL_DIR: &str = "thumbnails";

/// Guesses a MIME type from the file extension, `application/octet-stream`
/// when unknown.
pub fn guess_mime_type<P: AsRef<Path>>(path: P) -> String {
    mime_guess::from_path(path)
        .first()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| mime::APPLICATION_OCTET_STREAM.essence_str().to_string())
}

/// True if the MIME type mentions video, audio or pdf.
pub fn is_streamable_mime(mime_type: &str) -> bool {
    STREAMABLE_MIME_MARKERS.iter().any(|marker| mime_type.contains(marker))
}

/// Streamability judged from the file name alone.
pub fn is_streamable_path<P: AsRef<Path>>(path: P) -> bool {
    is_streamable_mime(&guess_mime_type(path))
}

/// Runs `ffprobe` and returns its JSON description of the container and
/// streams.
pub async fn get_media_info<P: AsRef<Path>>(path: P) -> AppResult<serde_json::Value> {
    let output = tokio::process::Command::new("ffprobe")
        .args(["-v", "quiet", "-print_format", "json", "-show_format", "-show_streams"])
        .arg(path.as_ref())
        .output()
        .await?;

    if !output.status.success() {
        return Err(AppError::Media(format!(
            "ffprobe failed for {}: {}",
            path.as_ref().display(),
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(serde_json::from_slice(&output.stdout)?)
}

/// Path of the thumbnail generated for `path` inside `thumb_dir`.
pub fn thumbnail_path<P: AsRef<Path>>(path: P, thumb_dir: &Path) -> PathBuf {
    let basename = path
        .as_ref()
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_string());
    thumb_dir.join(format!("{}.jpg", basename))
}

/// Grabs the frame at one second, scaled to 320px wide, into `thumb_dir`.
pub async fn create_stream_thumbnail<P: AsRef<Path>>(path: P, thumb_dir: &Path) -> AppResult<PathBuf> {
    tokio::fs::create_dir_all(thumb_dir).await?;
    let thumb_path = thumbnail_path(&path, thumb_dir);

    let output = tokio::process::Command::new("ffmpeg")
        .arg("-y")
        .arg("-i")
        .arg(path.as_ref())
        .args(["-ss", "00:00:01", "-vframes", "1", "-vf", "scale=320:-1"])
        .arg(&thumb_path)
        .output()
        .await?;

    if !output.status.success() {
        return Err(AppError::Media(format!(
            "ffmpeg thumbnail failed for {}: {}",
            path.as_ref().display(),
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    log::info!("🖼️ Thumbnail created: {}", thumb_path.display());
    Ok(thumb_path)
}
