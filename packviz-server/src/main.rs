//! Results-serving HTTP daemon for the packing visualizer.
//!
//! Serves the visualizer's static assets plus two data routes: `/list_csv`
//! returns a JSON listing of the placement result files, and
//! `/packing_data/<name>` returns one of those files byte-for-byte as
//! `text/csv`. Every other path falls back to static file serving from the
//! document root. Configured through `PACKVIZ_RESULTS_DIR` (default
//! `../Results`), `PACKVIZ_STATIC_DIR` (default `.`) and `PACKVIZ_PORT`
//! (default `8000`).

use std::env;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use bytes::Bytes;
use http_body_util::Full;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use packviz::results::{is_placement_file, placement_files};
use percent_encoding::percent_decode_str;
use tokio::net::TcpListener;

/// Serving roots, resolved once at startup.
#[derive(Debug)]
struct Config {
    results_dir: PathBuf,
    static_dir: PathBuf,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    let r = main_impl().await;
    std::process::exit(if r.is_ok() { 0 } else { 1 });
}

async fn main_impl() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Arc::new(Config {
        results_dir: env_path("PACKVIZ_RESULTS_DIR", "../Results"),
        static_dir: env_path("PACKVIZ_STATIC_DIR", "."),
    });
    let port: u16 = env::var("PACKVIZ_PORT")
        .unwrap_or_else(|_| "8000".to_string())
        .parse()
        .context("PACKVIZ_PORT is not a valid port number")?;

    let listener = TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("cannot listen on port {port}"))?;
    log::info!("Serving at port {port}.");
    log::info!("Results directory: {}", config.results_dir.display());

    loop {
        let (stream, peer) = tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            accepted = listener.accept() => accepted.context("accept failed")?,
        };
        let config = config.clone();
        tokio::task::spawn(async move {
            let service = service_fn(move |req| {
                let config = config.clone();
                async move { Ok::<_, std::convert::Infallible>(handle(&config, req).await) }
            });
            if let Err(err) = http1::Builder::new()
                .serve_connection(TokioIo::new(stream), service)
                .await
            {
                log::warn!("connection from {peer}: {err:#}");
            }
        });
    }
    log::info!("Shutting down.");
    Ok(())
}

fn env_path(var: &str, default: &str) -> PathBuf {
    PathBuf::from(env::var(var).unwrap_or_else(|_| default.to_string()))
}

async fn handle(config: &Config, req: Request<hyper::body::Incoming>) -> Response<Full<Bytes>> {
    if req.method() != Method::GET {
        return status_response(StatusCode::METHOD_NOT_ALLOWED);
    }
    let path = req.uri().path();
    let result = if path == "/list_csv" {
        list_csv(config)
    } else if let Some(name) = path.strip_prefix("/packing_data/") {
        packing_data(config, name).await
    } else {
        static_file(config, path).await
    };
    result.unwrap_or_else(|err| {
        log::warn!("GET {}: {err:#}", req.uri().path());
        status_response(StatusCode::INTERNAL_SERVER_ERROR)
    })
}

/// `GET /list_csv`: JSON array of placement result filenames.
///
/// An absent or unreadable results directory yields an empty listing, not
/// an error.
fn list_csv(config: &Config) -> Result<Response<Full<Bytes>>> {
    let files = placement_files(&config.results_dir).unwrap_or_default();
    let body = serde_json::to_string(&files)?;
    Ok(Response::builder()
        .header(hyper::header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
        .body(Full::new(Bytes::from(body)))?)
}

/// `GET /packing_data/<name>`: one placement result file, byte-for-byte.
///
/// Only names matching `item_placements_*.csv` and containing no path
/// separators are ever looked up; anything else, including traversal
/// attempts, is answered with 404.
async fn packing_data(config: &Config, name: &str) -> Result<Response<Full<Bytes>>> {
    let Ok(name) = percent_decode_str(name).decode_utf8() else {
        return Ok(status_response(StatusCode::NOT_FOUND));
    };
    if name.contains(['/', '\\']) || !is_placement_file(&name) {
        return Ok(status_response(StatusCode::NOT_FOUND));
    }
    serve_file(&config.results_dir.join(name.as_ref()), mime::TEXT_CSV).await
}

/// Static fallback: resolves the request path inside the document root.
async fn static_file(config: &Config, path: &str) -> Result<Response<Full<Bytes>>> {
    let Some(relative) = sanitize_request_path(path) else {
        return Ok(status_response(StatusCode::NOT_FOUND));
    };
    let target = config.static_dir.join(relative);
    let kind = content_type(&target);
    serve_file(&target, kind).await
}

/// Decodes a request path and rejects anything that could escape the
/// document root. `/` resolves to `index.html`.
fn sanitize_request_path(path: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(path).decode_utf8().ok()?;
    let trimmed = decoded.trim_start_matches('/');
    if trimmed.is_empty() {
        return Some(PathBuf::from("index.html"));
    }
    let relative = Path::new(trimmed);
    if relative
        .components()
        .all(|component| matches!(component, Component::Normal(_)))
    {
        Some(relative.to_path_buf())
    } else {
        None
    }
}

async fn serve_file(path: &Path, kind: mime::Mime) -> Result<Response<Full<Bytes>>> {
    match tokio::fs::metadata(path).await {
        Ok(metadata) if metadata.is_file() => {}
        Ok(_) => return Ok(status_response(StatusCode::NOT_FOUND)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Ok(status_response(StatusCode::NOT_FOUND));
        }
        Err(err) => return Err(err.into()),
    }
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("cannot read {}", path.display()))?;
    Ok(Response::builder()
        .header(hyper::header::CONTENT_TYPE, kind.as_ref())
        .body(Full::new(Bytes::from(bytes)))?)
}

/// Maps a file extension to the content type the visualizer expects.
///
/// `.csv` is explicitly `text/csv`, which the stock static handlers this
/// replaces would not guess.
fn content_type(path: &Path) -> mime::Mime {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("html") => mime::TEXT_HTML_UTF_8,
        Some("js") => mime::APPLICATION_JAVASCRIPT,
        Some("css") => mime::TEXT_CSS,
        Some("json") => mime::APPLICATION_JSON,
        Some("csv") => mime::TEXT_CSV,
        Some("png") => mime::IMAGE_PNG,
        Some("svg") => mime::IMAGE_SVG,
        _ => mime::APPLICATION_OCTET_STREAM,
    }
}

fn status_response(status: StatusCode) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(
        status.canonical_reason().unwrap_or_default().to_string(),
    )));
    *response.status_mut() = status;
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_request_path() {
        assert_eq!(sanitize_request_path("/"), Some(PathBuf::from("index.html")));
        assert_eq!(
            sanitize_request_path("/visualizer.js"),
            Some(PathBuf::from("visualizer.js"))
        );
        assert_eq!(
            sanitize_request_path("/assets/style.css"),
            Some(PathBuf::from("assets/style.css"))
        );
        assert_eq!(sanitize_request_path("/../secret"), None);
        assert_eq!(sanitize_request_path("/a/../../secret"), None);
        assert_eq!(sanitize_request_path("/%2e%2e/secret"), None);
        assert_eq!(sanitize_request_path("/./a"), None);
    }

    #[test]
    fn test_content_type() {
        assert_eq!(content_type(Path::new("index.html")), mime::TEXT_HTML_UTF_8);
        assert_eq!(
            content_type(Path::new("data/item_placements_run1.csv")),
            mime::TEXT_CSV
        );
        assert_eq!(
            content_type(Path::new("unknown.bin")),
            mime::APPLICATION_OCTET_STREAM
        );
    }
}
