//! Download and streaming link formatting.
//!
//! Links are plain strings under `DOWNLOAD_URL`; whatever serves them lives
//! outside this crate.

use std::collections::BTreeMap;
use std::path::Path;
use strum::{AsRefStr, Display, EnumIter, EnumString};
use url::Url;

/// Kinds of links produced for a streamable upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, AsRefStr, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum LinkKind {
    Direct,
    Stream,
    Preview,
    /// Local path of the stored file, not a URL
    Original,
}

fn base(base_url: &Url) -> &str {
    base_url.as_str().trim_end_matches('/')
}

fn basename(stored_path: &Path) -> String {
    let name = stored_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    urlencoding::encode(&name).into_owned()
}

/// Builds `direct`, `stream` and `preview` URLs for a stored file, plus the
/// `original` local path.
pub fn generate_stream_links(stored_path: &Path, base_url: &Url) -> BTreeMap<LinkKind, String> {
    let base = base(base_url);
    let name = basename(stored_path);

    BTreeMap::from([
        (LinkKind::Direct, format!("{}/download/{}", base, name)),
        (LinkKind::Stream, format!("{}/stream/{}", base, name)),
        (LinkKind::Preview, format!("{}/preview/{}", base, name)),
        (LinkKind::Original, stored_path.to_string_lossy().into_owned()),
    ])
}

/// Plain download link for files that are not streamed.
pub fn direct_file_link(stored_path: &Path, base_url: &Url) -> String {
    format!("{}/files/{}", base(base_url), basename(stored_path))
}

/// Telegram share-sheet URL for a link.
pub fn share_url(link: &str) -> String {
    format!("https://t.me/share/url?url={}", urlencoding::encode(link))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    fn base_url() -> Url {
        Url::parse("https://files.example.com").unwrap()
    }

    #[test]
    fn test_generate_stream_links() {
        let links = generate_stream_links(Path::new("downloads/AgAD-movie.mp4"), &base_url());

        assert_eq!(links.len(), 4);
        assert_eq!(links[&LinkKind::Direct], "https://files.example.com/download/AgAD-movie.mp4");
        assert_eq!(links[&LinkKind::Stream], "https://files.example.com/stream/AgAD-movie.mp4");
        assert_eq!(links[&LinkKind::Preview], "https://files.example.com/preview/AgAD-movie.mp4");
        assert_eq!(links[&LinkKind::Original], "downloads/AgAD-movie.mp4");
    }

    #[test]
    fn test_base_with_path_and_trailing_slash() {
        let base = Url::parse("https://example.com/bot/").unwrap();
        let link = direct_file_link(Path::new("downloads/a.zip"), &base);
        assert_eq!(link, "https://example.com/bot/files/a.zip");
    }

    #[test]
    fn test_names_are_percent_encoded() {
        let link = direct_file_link(Path::new("downloads/my file.zip"), &base_url());
        assert_eq!(link, "https://files.example.com/files/my%20file.zip");
    }

    #[test]
    fn test_share_url() {
        assert_eq!(
            share_url("https://x.io/files/a.zip"),
            "https://t.me/share/url?url=https%3A%2F%2Fx.io%2Ffiles%2Fa.zip"
        );
    }

    #[test]
    fn test_link_kind_names() {
        let names: Vec<String> = LinkKind::iter().map(|k| k.to_string()).collect();
        assert_eq!(names, ["direct", "stream", "preview", "original"]);
        assert_eq!(LinkKind::from_str("preview").unwrap(), LinkKind::Preview);
    }
}
