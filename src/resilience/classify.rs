//! Response validity heuristics.
//!
//! # Responsibilities
//! - Decide, before reading the body, whether a direct response is worth inspecting
//! - Decide, from status and body text, whether an attempt produced a result,
//!   failed on its route, or failed fatally
//!
//! # Design Decisions
//! - 401 on the direct route is fatal before the body is read
//! - Any other failing direct status counts as a network failure
//! - HTML bodies from relays are error pages, whatever their status
//! - 401 on any route is fatal: no route fixes bad credentials
//! - Other failing statuses are route failures (see DESIGN.md on masking)
//! - Unparsable success bodies are returned as text

use reqwest::StatusCode;

use crate::http::error::RouteFailure;
use crate::http::response::Payload;

const HTML_MARKERS: [&str; 2] = ["<!doctype", "<html"];

/// Outcome of inspecting one response.
#[derive(Debug)]
pub enum Verdict {
    /// Usable result; stop the sequence.
    Accept(Payload),
    /// This route failed; try the next one.
    Skip(RouteFailure),
    /// Credentials rejected; abort the sequence.
    Unauthorized,
}

/// Status-only check applied before the body is read. Settles every
/// failing direct response; relays always reach [`classify`].
pub fn precheck(is_direct: bool, status: StatusCode) -> Option<Verdict> {
    if !is_direct || status.is_success() {
        return None;
    }
    if status == StatusCode::UNAUTHORIZED {
        return Some(Verdict::Unauthorized);
    }
    Some(Verdict::Skip(RouteFailure::Status(status.as_u16())))
}

/// Classify a response from its status and body text.
pub fn classify(status: StatusCode, body: &str) -> Verdict {
    let text = body.trim();

    if looks_like_html(text) {
        return Verdict::Skip(RouteFailure::BlockedRelay);
    }

    if !status.is_success() {
        if status == StatusCode::UNAUTHORIZED {
            return Verdict::Unauthorized;
        }
        return Verdict::Skip(RouteFailure::Status(status.as_u16()));
    }

    match serde_json::from_str(text) {
        Ok(value) => Verdict::Accept(Payload::Json(value)),
        Err(_) => Verdict::Accept(Payload::Text(text.to_string())),
    }
}

/// True when `text` (already trimmed) opens an HTML document.
pub fn looks_like_html(text: &str) -> bool {
    HTML_MARKERS.iter().any(|marker| {
        text.get(..marker.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(marker))
    })
}
