//! Local dashboard: one page, one button.

use anyhow::{Result, anyhow};
use std::{
    sync::Arc,
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};
use tiny_http::{Header, Method, Request, Response, Server};

use crate::config::Settings;
use crate::error::FatalError;
use crate::pipeline::{RunOutcome, run_daily_analysis};
use crate::render::{Page, render_page};

pub struct ServeOptions {
    pub bind_addr: String,
    pub open_browser: bool,
}

pub fn serve(settings: &Settings, opts: ServeOptions) -> Result<()> {
    let server = Server::http(opts.bind_addr.as_str())
        .map_err(|e| anyhow!("Failed to bind dashboard on {}: {e:?}", opts.bind_addr))?;

    let running = Arc::new(AtomicBool::new(true));
    let r2 = running.clone();
    ctrlc::set_handler(move || {
        r2.store(false, Ordering::SeqCst);
    })?;

    let url = format!("http://{}/", server.server_addr());
    println!("Teacher's Command Center running at {url} (Ctrl-C to stop)");
    if opts.open_browser
        && let Err(e) = open::that(&url)
    {
        log::warn!("could not open browser automatically: {e}");
    }

    while running.load(Ordering::SeqCst) {
        let Ok(maybe_request) = server.recv_timeout(Duration::from_millis(500)) else {
            continue;
        };
        let Some(request) = maybe_request else {
            continue;
        };
        handle(request, settings);
    }

    log::info!("Dashboard stopped");
    Ok(())
}

fn handle(request: Request, settings: &Settings) {
    let (status, body) = respond_to(request.method(), request.url(), || {
        run_daily_analysis(settings)
    });

    let mut response = Response::from_string(body).with_status_code(status);
    if let Ok(h) = Header::from_bytes(&b"Content-Type"[..], &b"text/html; charset=utf-8"[..]) {
        response.add_header(h);
    }
    if let Err(e) = request.respond(response) {
        log::warn!("failed to write response: {e}");
    }
}

/// Route a request; `run` is only invoked for `POST /run`.
fn respond_to(
    method: &Method,
    url: &str,
    run: impl FnOnce() -> Result<RunOutcome>,
) -> (u16, String) {
    let path = url.split('?').next().unwrap_or("/");
    match (method, path) {
        (Method::Get, "/") => (200, render_page(Page::Idle)),
        (Method::Post, "/run") => {
            log::info!("Running daily analysis");
            (200, page_for(run()))
        }
        (_, "/run") => (405, render_page(Page::Error("Use the button to run the analysis."))),
        _ => (404, render_page(Page::Error("Page not found."))),
    }
}

/// Fatal errors halt the action but not the server: they become a notice.
pub fn page_for(result: Result<RunOutcome>) -> String {
    match result {
        Ok(outcome) => render_page(outcome.page()),
        Err(e) => {
            let msg = match e.downcast_ref::<FatalError>() {
                Some(fatal) => fatal.to_string(),
                None => {
                    log::error!("Daily analysis failed: {e:#}");
                    format!("Daily analysis failed: {e:#}")
                }
            };
            render_page(Page::Error(&msg))
        }
    }
}
