use std::path::{Path, PathBuf};

use clonify_common::Result;
use url::Url;

use crate::cloner::ClonedSite;

pub const DEFAULT_DOWNLOAD_NAME: &str = "website-clone.html";

/// File name for a saved clone: the host with dots turned into underscores.
///
/// ```
/// use clonify_web::download::download_filename;
///
/// assert_eq!(download_filename("https://example.co.uk/page"), "example_co_uk_clone.html");
/// assert_eq!(download_filename("no url here"), "website-clone.html");
/// ```
pub fn download_filename(target: &str) -> String {
    match Url::parse(target.trim()) {
        Ok(url) => match url.host_str() {
            Some(host) if !host.is_empty() => format!("{}_clone.html", host.replace('.', "_")),
            _ => DEFAULT_DOWNLOAD_NAME.to_string(),
        },
        Err(_) => DEFAULT_DOWNLOAD_NAME.to_string(),
    }
}

/// Write the fetched markup, unchanged, into `dir`.
pub async fn save_download(dir: &Path, site: &ClonedSite) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(download_filename(site.target.as_str()));
    tokio::fs::write(&path, site.result.html.as_bytes()).await?;
    tracing::info!(path = %path.display(), bytes = site.result.html.len(), "download.saved");
    Ok(path)
}
