//! Embedded web dashboard for salesboard.
//!
//! Provides a lightweight HTTP server (sync, via `tiny_http`) that serves:
//! - The single-page sales dashboard (KPI cards, three cross-filtering charts)
//! - JSON API endpoints for the current render, filter events, and health
//!
//! Launched via `salesboard serve` (default: `http://127.0.0.1:8050`).

mod api;
mod frontend;
pub mod session;

use std::io::{Cursor, Read};

use anyhow::{Context, Result};
use tiny_http::{Header, Method, Response, Server, StatusCode};

use crate::analytics::Journal;
use crate::config::{LogLevel, SalesboardConfig};
use crate::data::CanonicalTable;

pub use session::{EventOutcome, Session};

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the dashboard server for an already-loaded table.
///
/// Blocks the current thread. Requests are handled sequentially, so the
/// single filter session never sees interleaved events. Per-request errors
/// become 500 responses without stopping the server.
pub fn serve(config: &SalesboardConfig, table: &CanonicalTable) -> Result<()> {
    let addr = config.server.addr.as_str();
    let server = Server::http(addr)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

    let mut session = Session::new(table, config, Journal::from_config(&config.logging));

    println!("salesboard dashboard running at http://{addr}");
    println!("Press Ctrl+C to stop.\n");

    if config.server.open_browser {
        let _ = open_browser(&format!("http://{addr}"));
    }

    for mut request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();

        let body = if matches!(method, Method::Post) {
            let mut buf = String::new();
            let _ = request.as_reader().read_to_string(&mut buf);
            Some(buf)
        } else {
            None
        };

        let result = dispatch(&mut session, &method, &url, body.as_deref());

        let status = match result {
            Ok(resp) => {
                let status = resp.status_code().0;
                let _ = request.respond(resp);
                status
            }
            Err(e) => {
                if config.logging.allows(LogLevel::Error) {
                    eprintln!("error: {method} {url}: {e:#}");
                }
                let body = serde_json::json!({ "error": format!("{e:#}") }).to_string();
                let resp = Response::from_data(body.into_bytes())
                    .with_header(content_type_json())
                    .with_status_code(StatusCode(500));
                let _ = request.respond(resp);
                500
            }
        };

        if config.logging.allows(LogLevel::Info) {
            println!(
                "{} {} {} {}",
                method,
                url,
                status,
                chrono::Local::now().format("%H:%M:%S")
            );
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Dispatch an incoming request to the appropriate handler.
fn dispatch(
    session: &mut Session,
    method: &Method,
    url: &str,
    body: Option<&str>,
) -> Result<Response<Cursor<Vec<u8>>>> {
    let path = url.split('?').next().unwrap_or(url);

    match (method, path) {
        // Frontend
        (&Method::Get, "/") | (&Method::Get, "/index.html") => Ok(serve_frontend()),

        // API
        (&Method::Get, "/api/dashboard") => api::get_dashboard(session),
        (&Method::Post, "/api/events") => api::post_events(session, body.unwrap_or("{}")),
        (&Method::Get, "/api/health") => api::get_health(session),

        _ => Ok(not_found()),
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn serve_frontend() -> Response<Cursor<Vec<u8>>> {
    Response::from_data(frontend::INDEX_HTML.as_bytes().to_vec())
        .with_header(content_type_html())
        .with_status_code(StatusCode(200))
}

fn not_found() -> Response<Cursor<Vec<u8>>> {
    let body = r#"{"error": "not found"}"#;
    Response::from_data(body.as_bytes().to_vec())
        .with_header(content_type_json())
        .with_status_code(StatusCode(404))
}

/// JSON content type header.
pub(crate) fn content_type_json() -> Header {
    Header::from_bytes("Content-Type", "application/json; charset=utf-8")
        .expect("static header is valid")
}

fn content_type_html() -> Header {
    Header::from_bytes("Content-Type", "text/html; charset=utf-8")
        .expect("static header is valid")
}

/// Attempt to open a URL in the system default browser.
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", url])
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::OrderLine;

    fn table() -> CanonicalTable {
        CanonicalTable::from_rows(vec![OrderLine {
            order_id: "B-1".to_string(),
            sub_category: "Chairs".to_string(),
            state: "CA".to_string(),
            customer: "Alice".to_string(),
            amount: 100.0,
            profit: 10.0,
            quantity: 2,
        }])
    }

    #[test]
    fn routes_known_paths() {
        let table = table();
        let config = SalesboardConfig::default();
        let mut session = Session::new(&table, &config, Journal::disabled());

        let status = |resp: Response<Cursor<Vec<u8>>>| resp.status_code().0;
        assert_eq!(
            status(dispatch(&mut session, &Method::Get, "/", None).unwrap()),
            200
        );
        assert_eq!(
            status(dispatch(&mut session, &Method::Get, "/api/dashboard?x=1", None).unwrap()),
            200
        );
        assert_eq!(
            status(dispatch(&mut session, &Method::Post, "/api/events", Some("{}")).unwrap()),
            200
        );
        assert_eq!(
            status(dispatch(&mut session, &Method::Get, "/api/health", None).unwrap()),
            200
        );
        assert_eq!(
            status(dispatch(&mut session, &Method::Get, "/nope", None).unwrap()),
            404
        );
    }

    #[test]
    fn event_route_updates_session() {
        let table = table();
        let config = SalesboardConfig::default();
        let mut session = Session::new(&table, &config, Journal::disabled());

        let body = r#"{"triggered":["chart-customer"],"signals":{"chart-customer":{"points":[{"x":"Alice","y":100}]}}}"#;
        dispatch(&mut session, &Method::Post, "/api/events", Some(body)).unwrap();
        assert_eq!(session.filters().customer.as_value(), Some("Alice"));

        let body = r#"{"triggered":["clear-btn"]}"#;
        dispatch(&mut session, &Method::Post, "/api/events", Some(body)).unwrap();
        assert!(session.filters().is_unfiltered());
    }

    #[test]
    fn frontend_wires_expected_elements() {
        for id in ["chart-subcat", "chart-state", "chart-customer", "clear-btn"] {
            assert!(frontend::INDEX_HTML.contains(id), "missing {id}");
        }
    }
}
