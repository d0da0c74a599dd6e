use crate::magic::build_magic_packet;
use crate::wol::{self, Destination, Transport, WakeError};
use lazy_static::lazy_static;
use log::{info, warn};
use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};
use rouille::{router, Request, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const INDEX_HTML: &str = include_str!("index.html");
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const JSON_CONTENT_TYPE: &str = "application/json";

lazy_static! {
    static ref PACKETS_SENT: IntCounter = register_int_counter!(
        "wol_packets_sent_total",
        "Magic packets handed to the network stack"
    )
    .unwrap();
    static ref REQUESTS_FAILED: IntCounterVec = register_int_counter_vec!(
        "wol_requests_failed_total",
        "Wake requests that did not result in a magic packet",
        &["reason"]
    )
    .unwrap();
}

#[derive(Deserialize, Debug)]
pub struct WakeRequest {
    mac: String,
    #[serde(default)]
    port: Option<u16>,
    #[serde(default)]
    target: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct WakeResponse {
    status: &'static str,
    mac: String,
    target: String,
    port: u16,
}

#[derive(Serialize, Debug)]
struct ErrorResponse {
    #[serde(rename = "errorCode")]
    error_code: &'static str,
    #[serde(rename = "debugString")]
    debug_string: String,
}

#[derive(thiserror::Error, Debug)]
pub enum RequestError {
    #[error("Request has no body")]
    MissingBody,
    #[error("Unsupported content type {0}")]
    UnsupportedContentType(String),
    #[error("Could not decode form body: {0}")]
    Form(#[from] serde_urlencoded::de::Error),
    #[error("Could not decode json body: {0}")]
    Json(#[from] serde_json::Error),
}

fn error_response(status: u16, error_code: &'static str, debug_string: String) -> Response {
    Response::json(&ErrorResponse {
        error_code,
        debug_string,
    })
    .with_status_code(status)
}

impl From<RequestError> for Response {
    fn from(e: RequestError) -> Self {
        REQUESTS_FAILED.with_label_values(&["bad_request"]).inc();
        error_response(400, "badRequest", e.to_string())
    }
}

impl From<WakeError> for Response {
    fn from(e: WakeError) -> Self {
        match e {
            WakeError::InvalidMacFormat(_) => {
                REQUESTS_FAILED.with_label_values(&["invalid_mac"]).inc();
                error_response(400, "invalidMacFormat", e.to_string())
            }
            WakeError::Transmission(_) => {
                REQUESTS_FAILED.with_label_values(&["transmission"]).inc();
                error_response(502, "transmissionError", e.to_string())
            }
        }
    }
}

fn decode_wake_request(request: &Request) -> Result<WakeRequest, RequestError> {
    let content_type = request
        .header("Content-Type")
        .and_then(|value| value.split(';').next())
        .map(|value| value.trim().to_ascii_lowercase())
        .unwrap_or_else(|| FORM_CONTENT_TYPE.to_string());
    let body = request.data().ok_or(RequestError::MissingBody)?;
    match content_type.as_str() {
        FORM_CONTENT_TYPE => Ok(serde_urlencoded::from_reader(body)?),
        JSON_CONTENT_TYPE => Ok(serde_json::from_reader(body)?),
        _ => Err(RequestError::UnsupportedContentType(content_type)),
    }
}

fn varz() -> Response {
    let metrics = prometheus::gather();
    let encoder = prometheus::TextEncoder::new();
    match encoder.encode_to_string(&metrics) {
        Ok(text) => Response::text(text),
        Err(e) => Response::text(e.to_string()).with_status_code(500),
    }
}

/// HTTP front-end that turns wake requests into magic packets.
///
/// Each request opens its own socket through the shared transport, so the
/// service is safe to run on rouille's thread pool without extra locking.
pub struct WakeService {
    transport: Arc<dyn Transport>,
    default_port: u16,
    default_target: String,
}

impl WakeService {
    pub fn new(transport: Arc<dyn Transport>, default_port: u16, default_target: String) -> Self {
        Self {
            transport,
            default_port,
            default_target,
        }
    }

    pub fn handle(&self, request: &Request) -> Response {
        let response = router!(request,
            (GET) (/) => { Response::html(INDEX_HTML) },
            (GET) (/varz) => { varz() },
            (POST) (/wake) => { self.wake(request) },
            _ => Response::empty_404()
        );
        info!(
            "{method} {request} {status}",
            method = request.method(),
            request = request.raw_url(),
            status = response.status_code,
        );
        response
    }

    fn wake(&self, request: &Request) -> Response {
        let wake_request = match decode_wake_request(request) {
            Ok(wake_request) => wake_request,
            Err(e) => return e.into(),
        };
        let port = wake_request.port.unwrap_or(self.default_port);
        let target = wake_request
            .target
            .as_deref()
            .map(str::trim)
            .filter(|target| !target.is_empty())
            .unwrap_or(self.default_target.as_str());

        let result = build_magic_packet(&wake_request.mac).and_then(|packet| {
            let destination = Destination::resolve(target, port)?;
            wol::transmit(self.transport.as_ref(), &packet, destination)?;
            Ok((packet.target(), destination))
        });
        match result {
            Ok((mac, destination)) => {
                PACKETS_SENT.inc();
                info!("sent magic packet for {} to {}", mac, destination);
                Response::json(&WakeResponse {
                    status: "sent",
                    mac: mac.to_string(),
                    target: destination.ip().to_string(),
                    port: destination.port(),
                })
            }
            Err(e) => {
                warn!("wake request for {:?} failed: {}", wake_request.mac, e);
                e.into()
            }
        }
    }
}
