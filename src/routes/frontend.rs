//! 前端静态资源路由
//!
//! 构建产物通过 rust-embed 嵌入二进制，未命中的路径回退到 index.html，
//! 未注册的 `/api/` 路径返回 JSON 404 而不是页面。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use rust_embed::Embed;
use std::borrow::Cow;
use std::path::Path;

use crate::config::AppConfig;
use crate::models::{ApiResponse, ErrorCode};

#[derive(Embed)]
#[folder = "frontend/dist/"]
struct FrontendAssets;

const INDEX_HTML: &str = "index.html";

fn extension(path: &str) -> &str {
    Path::new(path)
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
}

fn get_mime_type(path: &str) -> &'static str {
    match extension(path) {
        "html" => "text/html; charset=utf-8",
        "js" | "mjs" => "application/javascript; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "json" | "map" => "application/json; charset=utf-8",
        "webmanifest" => "application/manifest+json",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "txt" => "text/plain; charset=utf-8",
        "wasm" => "application/wasm",
        _ => "application/octet-stream",
    }
}

/// 带 hash 的构建产物可以长期缓存
fn should_cache(path: &str) -> bool {
    path.starts_with("assets/")
        && matches!(
            extension(path),
            "js" | "mjs" | "css" | "woff" | "woff2" | "ttf" | "png" | "jpg" | "jpeg" | "svg"
                | "webp"
        )
}

fn is_api_path(path: &str) -> bool {
    path == "api" || path.starts_with("api/")
}

// 页面标题跟随系统名称
fn render_index(content: &[u8], config: &AppConfig) -> Vec<u8> {
    String::from_utf8_lossy(content)
        .replace("%SYSTEM_NAME%", &config.app.system_name)
        .into_bytes()
}

pub async fn serve_frontend(req: HttpRequest) -> ActixResult<HttpResponse> {
    let path = req.match_info().query("tail").trim_start_matches('/');

    if is_api_path(path) {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            format!("No API route for /{path}"),
        )));
    }

    let (file_path, asset) = match FrontendAssets::get(path).filter(|_| !path.is_empty()) {
        Some(asset) => (path, Some(asset)),
        None => (INDEX_HTML, FrontendAssets::get(INDEX_HTML)),
    };

    let Some(asset) = asset else {
        tracing::warn!("Frontend bundle has no {}", INDEX_HTML);
        return Ok(HttpResponse::NotFound()
            .content_type("text/plain; charset=utf-8")
            .body("Frontend assets are not embedded in this build"));
    };

    let mime = get_mime_type(file_path);
    let body: Cow<'_, [u8]> = if file_path == INDEX_HTML {
        Cow::Owned(render_index(&asset.data, AppConfig::get()))
    } else {
        asset.data
    };

    let cache_control = if should_cache(file_path) {
        "public, max-age=31536000, immutable"
    } else {
        "no-cache"
    };

    Ok(HttpResponse::Ok()
        .content_type(mime)
        .insert_header(("Cache-Control", cache_control))
        .body(body.into_owned()))
}

/// 兜底路由，必须最后注册
pub fn configure_frontend_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/{tail:.*}", web::get().to(serve_frontend));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_mime_type() {
        assert_eq!(get_mime_type("index.html"), "text/html; charset=utf-8");
        assert_eq!(
            get_mime_type("assets/app.3f2a.js"),
            "application/javascript; charset=utf-8"
        );
        assert_eq!(get_mime_type("unknown.xyz"), "application/octet-stream");
    }

    #[test]
    fn test_only_hashed_assets_are_cached() {
        assert!(should_cache("assets/app.3f2a.js"));
        assert!(should_cache("assets/index.9c1b.css"));
        assert!(!should_cache("index.html"));
        assert!(!should_cache("favicon.png"));
    }

    #[test]
    fn test_api_paths_are_not_spa_routes() {
        assert!(is_api_path("api/v1/unknown"));
        assert!(is_api_path("api"));
        assert!(!is_api_path("classes/3"));
        assert!(!is_api_path("apiary"));
    }
}
