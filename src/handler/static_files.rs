//! Static file serving module
//!
//! Serves the root index page and the `/static/` asset tree.

use crate::config::StaticConfig;
use crate::http::{self, mime};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// Serve the index file for `/`
pub async fn serve_index(config: &StaticConfig) -> Response<Full<Bytes>> {
    let file_path = Path::new(&config.dir).join(&config.index_file);
    match load_single_file(&file_path).await {
        Some((content, content_type)) => http::build_file_response(content, content_type),
        None => http::build_404_response(),
    }
}

/// Serve a file from the static directory
///
/// `path` is the full request path; `route_prefix` is stripped from it before
/// resolving against the directory.
pub async fn serve_directory(
    config: &StaticConfig,
    path: &str,
    route_prefix: &str,
) -> Response<Full<Bytes>> {
    let relative = path.strip_prefix(route_prefix).unwrap_or_default();
    match load_from_directory(&config.dir, relative, &config.index_file).await {
        Some((content, content_type)) => http::build_file_response(content, content_type),
        None => http::build_404_response(),
    }
}

/// Load static file from directory with index file support
pub async fn load_from_directory(
    static_dir: &str,
    relative_path: &str,
    index_file: &str,
) -> Option<(Vec<u8>, &'static str)> {
    let decoded = urlencoding::decode(relative_path).ok()?;
    let relative = sanitize(&decoded)?;

    let static_dir_canonical = match Path::new(static_dir).canonicalize() {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!("Static directory not found or inaccessible '{static_dir}': {e}");
            return None;
        }
    };

    let mut file_path = static_dir_canonical.join(relative);
    if file_path.is_dir() {
        file_path = file_path.join(index_file);
    }

    // File not found is common (404), no need to log at warning level
    let Ok(file_path_canonical) = file_path.canonicalize() else {
        return None;
    };
    if !file_path_canonical.starts_with(&static_dir_canonical) {
        tracing::warn!(
            "Path traversal attempt blocked: {} -> {}",
            relative_path,
            file_path_canonical.display()
        );
        return None;
    }

    load_single_file(&file_path_canonical).await
}

/// Load a single regular file
pub async fn load_single_file(path: &Path) -> Option<(Vec<u8>, &'static str)> {
    if !fs::metadata(path).await.ok()?.is_file() {
        return None;
    }
    match fs::read(path).await {
        Ok(content) => Some((content, mime::content_type_for(path))),
        Err(e) => {
            tracing::error!("Failed to read file '{}': {}", path.display(), e);
            None
        }
    }
}

/// Keep only normal path components; any `..` rejects the whole path
fn sanitize(relative: &str) -> Option<PathBuf> {
    let mut clean = PathBuf::new();
    for component in Path::new(relative.trim_start_matches('/')).components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(clean)
}
