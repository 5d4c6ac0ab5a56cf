//! Transports for RPC calls.

use std::sync::atomic::{AtomicU64, Ordering};

use log::*;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::Value;

use crate::config::RpcConfig;
use crate::error::{Result, RpcError};
use crate::request::RpcRequest;

/// A transport for RPC calls.
///
/// Implemented by [`HttpSender`] against a real node and by
/// [`MockSender`](crate::mock_sender::MockSender) in tests. The returned
/// value is the `result` member of the JSON-RPC response.
pub trait RpcSender {
    fn send(&self, request: RpcRequest, params: Value) -> Result<Value>;

    fn url(&self) -> String;
}

/// JSON-RPC over HTTP with a blocking `reqwest` client.
///
/// Each sender owns its client. Request ids count up from zero.
pub struct HttpSender {
    client: reqwest::blocking::Client,
    url: String,
    request_id: AtomicU64,
}

impl HttpSender {
    pub fn new(config: &RpcConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            url: config.url.clone(),
            request_id: AtomicU64::new(0),
        })
    }
}

#[derive(Deserialize, Debug)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// Pull `result` out of a response body, or turn its `error` member into
/// [`RpcError::Rpc`].
pub(crate) fn parse_response(mut json: Value) -> Result<Value> {
    if json["error"].is_object() {
        let error = serde_json::from_value::<RpcErrorObject>(json["error"].take())?;
        return Err(RpcError::Rpc {
            code: error.code,
            message: error.message,
        });
    }
    match json.get_mut("result") {
        Some(result) => Ok(result.take()),
        None => Err(RpcError::Parse(format!("response has no result: {json}"))),
    }
}

impl RpcSender for HttpSender {
    fn send(&self, request: RpcRequest, params: Value) -> Result<Value> {
        let request_id = self.request_id.fetch_add(1, Ordering::Relaxed);
        let request_json = request.build_request_json(request_id, params).to_string();
        debug!("{request} #{request_id} -> {}", self.url);

        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .body(request_json)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(|err| {
                warn!("{request} #{request_id} failed: {err}");
                RpcError::from(err)
            })?;

        let body = response.text()?;
        let json: Value = serde_json::from_str(&body)?;
        parse_response(json).inspect_err(|err| warn!("{request} #{request_id}: {err}"))
    }

    fn url(&self) -> String {
        self.url.clone()
    }
}
