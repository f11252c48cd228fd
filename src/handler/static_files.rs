//! Static file serving module
//!
//! Resolves request paths under the site root, with index files,
//! traversal protection and `ETag` revalidation.

use crate::config::SiteConfig;
use crate::http::{self, cache, mime, SiteResponse};
use crate::logger;
use hyper::body::Bytes;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// Request details the static handler needs
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<&'a str>,
}

/// A file loaded from the site root
#[derive(Debug)]
pub struct Asset {
    pub content: Bytes,
    pub content_type: &'static str,
}

/// Serve a site path, falling back to the root index for extension-less paths
pub async fn serve_site(ctx: &RequestContext<'_>, site: &SiteConfig) -> SiteResponse {
    let mut asset = load_from_directory(&site.root, ctx.path, &site.index_files).await;

    if asset.is_none() && site.fallback_to_index && Path::new(ctx.path).extension().is_none() {
        logger::log_debug(&format!("No file for {}, serving site index", ctx.path));
        asset = load_from_directory(&site.root, "/", &site.index_files).await;
    }

    match asset {
        Some(asset) => build_asset_response(asset, ctx),
        None => http::build_404_response(),
    }
}

/// Keep only normal path segments, dropping `..`, `.` and roots
fn sanitize(path: &str) -> PathBuf {
    Path::new(path.trim_start_matches('/'))
        .components()
        .filter_map(|c| match c {
            Component::Normal(segment) => Some(segment),
            _ => None,
        })
        .collect()
}

async fn is_dir(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|m| m.is_dir())
}

async fn is_file(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|m| m.is_file())
}

/// Load a file from the site root with index file support
pub async fn load_from_directory(root: &str, path: &str, index_files: &[String]) -> Option<Asset> {
    let root_canonical = match fs::canonicalize(root).await {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Site root not found or inaccessible '{root}': {e}"
            ));
            return None;
        }
    };

    let mut file_path = root_canonical.join(sanitize(path));

    if is_dir(&file_path).await {
        let mut index = None;
        for name in index_files {
            let candidate = file_path.join(name);
            if is_file(&candidate).await {
                index = Some(candidate);
                break;
            }
        }
        file_path = index?;
    }

    // Missing files are ordinary 404s, not worth a warning
    let canonical = fs::canonicalize(&file_path).await.ok()?;
    if !canonical.starts_with(&root_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            path,
            canonical.display()
        ));
        return None;
    }
    if !is_file(&canonical).await {
        return None;
    }

    let content = match fs::read(&canonical).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {}",
                canonical.display(),
                e
            ));
            return None;
        }
    };

    Some(Asset {
        content: Bytes::from(content),
        content_type: mime::get_content_type(canonical.extension().and_then(|e| e.to_str())),
    })
}

/// Build the 200 or 304 for a loaded asset
fn build_asset_response(asset: Asset, ctx: &RequestContext<'_>) -> SiteResponse {
    let etag = cache::generate_etag(&asset.content);
    let cache_control = cache::CachePolicy::for_content_type(asset.content_type).to_header_value();

    if cache::check_etag_match(ctx.if_none_match, &etag) {
        return http::build_304_response(&etag, &cache_control);
    }

    http::build_file_response(
        asset.content,
        asset.content_type,
        &etag,
        &cache_control,
        ctx.is_head,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use hyper::StatusCode;

    fn site_fixture() -> (tempfile::TempDir, SiteConfig) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("public");
        std::fs::create_dir_all(root.join("assets")).unwrap();
        std::fs::create_dir_all(root.join("legal")).unwrap();
        std::fs::write(root.join("index.html"), "<h1>DC Infrastructures</h1>").unwrap();
        std::fs::write(root.join("assets/site.css"), "body{}").unwrap();
        std::fs::write(root.join("legal/index.htm"), "<p>legal</p>").unwrap();
        std::fs::write(dir.path().join("secret.txt"), "outside").unwrap();

        let site = SiteConfig {
            root: root.to_str().unwrap().to_string(),
            ..SiteConfig::default()
        };
        (dir, site)
    }

    fn ctx(path: &str) -> RequestContext<'_> {
        RequestContext {
            path,
            is_head: false,
            if_none_match: None,
        }
    }

    async fn body_text(resp: SiteResponse) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_sanitize_drops_parent_segments() {
        assert_eq!(sanitize("/../../etc/passwd"), PathBuf::from("etc/passwd"));
        assert_eq!(sanitize("/assets/./site.css"), PathBuf::from("assets/site.css"));
        assert_eq!(sanitize("/"), PathBuf::new());
    }

    #[tokio::test]
    async fn test_root_serves_index() {
        let (_dir, site) = site_fixture();
        let resp = serve_site(&ctx("/"), &site).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["Content-Type"], "text/html; charset=utf-8");
        assert_eq!(resp.headers()["Cache-Control"], "no-cache");
        assert_eq!(body_text(resp).await, "<h1>DC Infrastructures</h1>");
    }

    #[tokio::test]
    async fn test_nested_directory_index() {
        let (_dir, site) = site_fixture();
        let resp = serve_site(&ctx("/legal/"), &site).await;
        assert_eq!(body_text(resp).await, "<p>legal</p>");
    }

    #[tokio::test]
    async fn test_asset_gets_public_cache() {
        let (_dir, site) = site_fixture();
        let resp = serve_site(&ctx("/assets/site.css"), &site).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["Content-Type"], "text/css; charset=utf-8");
        assert_eq!(resp.headers()["Cache-Control"], "public, max-age=3600");
    }

    #[tokio::test]
    async fn test_traversal_stays_inside_root() {
        let (_dir, site) = site_fixture();
        let resp = serve_site(&ctx("/../secret.txt"), &site).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_missing_asset_is_404_but_deep_link_falls_back() {
        let (_dir, site) = site_fixture();
        let resp = serve_site(&ctx("/assets/missing.js"), &site).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = serve_site(&ctx("/services"), &site).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_text(resp).await, "<h1>DC Infrastructures</h1>");

        let strict = SiteConfig {
            fallback_to_index: false,
            ..site
        };
        let resp = serve_site(&ctx("/services"), &strict).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_matching_etag_is_304() {
        let (_dir, site) = site_fixture();
        let first = serve_site(&ctx("/"), &site).await;
        let etag = first.headers()["ETag"].to_str().unwrap().to_string();

        let revalidate = RequestContext {
            path: "/",
            is_head: false,
            if_none_match: Some(&etag),
        };
        let resp = serve_site(&revalidate, &site).await;
        assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
        assert_eq!(resp.headers()["ETag"], etag.as_str());
    }

    #[tokio::test]
    async fn test_head_has_length_but_no_body() {
        let (_dir, site) = site_fixture();
        let head = RequestContext {
            path: "/",
            is_head: true,
            if_none_match: None,
        };
        let resp = serve_site(&head, &site).await;
        assert_eq!(resp.headers()["Content-Length"], "27");
        assert_eq!(body_text(resp).await, "");
    }

    #[tokio::test]
    async fn test_missing_root_is_404() {
        let site = SiteConfig {
            root: "/definitely/not/a/site/root".to_string(),
            ..SiteConfig::default()
        };
        let resp = serve_site(&ctx("/"), &site).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
