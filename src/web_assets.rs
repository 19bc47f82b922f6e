//! The embedded UI, served to the webview through the `app://` custom protocol.

use mime_guess::mime;
use rust_embed::RustEmbed;
use std::borrow::Cow;
use wry::http::{header::CONTENT_TYPE, Request, Response, StatusCode};

/// Name of the custom protocol the webview loads the UI from.
pub const PROTOCOL: &str = "app";
/// URL of the UI's entry page. WebView2 exposes custom protocols as `http://<name>.localhost`.
#[cfg(not(windows))]
pub const INDEX_URL: &str = "app://localhost/index.html";
#[cfg(windows)]
pub const INDEX_URL: &str = "http://app.localhost/index.html";

/// UI files from `src/ui/dist`, embedded into the binary.
#[derive(RustEmbed)]
#[folder = "src/ui/dist"]
#[include = "**/*"]
pub struct UiAssets;

/// Provides (Bytes, Content-Type) for a requested resource.
/// Unknown paths fall back to `index.html`.
pub fn load(path: &str) -> Option<(Cow<'static, [u8]>, String)> {
    let norm = normalize(path);
    if let Some(file) = UiAssets::get(&norm) {
        let ct = content_type(&norm);
        Some((file.data, ct))
    } else if norm != "index.html" {
        UiAssets::get("index.html").map(|f| (f.data, String::from("text/html; charset=utf-8")))
    } else {
        None
    }
}

/// Answers a custom-protocol request from the embedded assets.
pub fn serve(request: Request<Vec<u8>>) -> Response<Cow<'static, [u8]>> {
    let path = request.uri().path();
    match load(path) {
        Some((data, content_type)) => Response::builder()
            .header(CONTENT_TYPE, content_type)
            .body(data)
            .unwrap_or_else(|_| Response::new(Cow::Borrowed(&[]))),
        None => {
            tracing::warn!("No embedded asset for {}", path);
            let mut response = Response::new(Cow::Borrowed(&b"Not Found"[..]));
            *response.status_mut() = StatusCode::NOT_FOUND;
            response
        }
    }
}

fn normalize(raw: &str) -> String {
    let p = raw.trim_start_matches('/').trim();
    if p.is_empty() {
        "index.html".into()
    } else {
        p.to_string()
    }
}

fn content_type(path: &str) -> String {
    let guess = mime_guess::from_path(path).first_or(mime::APPLICATION_OCTET_STREAM);
    match guess.type_() {
        mime::TEXT | mime::APPLICATION if guess.subtype() == mime::JAVASCRIPT => {
            "application/javascript; charset=utf-8".into()
        }
        mime::TEXT | mime::APPLICATION if guess.subtype() == mime::JSON => {
            "application/json; charset=utf-8".into()
        }
        mime::TEXT if guess.subtype() == mime::HTML => "text/html; charset=utf-8".into(),
        mime::TEXT if guess.subtype() == "css" => "text/css; charset=utf-8".into(),
        _ => guess.essence_str().to_string(),
    }
}
