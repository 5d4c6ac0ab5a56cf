//! An [`RpcSender`] used for unit testing [`RpcClient`](crate::client::RpcClient).

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::{json, Value};
use sol_core::codec::base64_decode;
use sol_core::SignedTransaction;

use crate::error::{Result, RpcError};
use crate::request::RpcRequest;
use crate::sender::RpcSender;

pub const PUBKEY: &str = "7RoSF9fUmdphVCpabEoefH81WwrW7orsWonXWqTXkKV8";
pub const BLOCKHASH: &str = "EkSnNWid2cvwEVnVx9aBqawnmiCNiDgp3gUdkDPTKN1N";
pub const SIGNATURE: &str =
    "43yNSFC6fYTuPgTNFFhF4axw7AfWxB2BPdurme8yrsWEYwm8299xh8n6TAHjGymiSub1XtyxTNyd9GBfY2hxoBw8";

pub type Mocks = HashMap<RpcRequest, Value>;

/// Canned responses for [`RpcClient`](crate::client::RpcClient) tests.
///
/// Queued responses are returned first, one per call, in order. Once a
/// request's queue is empty a default response is produced, steered by the
/// `url` directive:
///
/// - `"fails"`: every call is an HTTP error.
/// - `"sig_not_found"`: `getSignatureStatuses` reports `[null]`.
/// - `"tx_failed"`: `getSignatureStatuses` reports a status with an `err`.
/// - `"no_token_account"`: `getTokenAccountsByOwner` returns no accounts.
/// - `"malicious"`: `sendTransaction` returns a signature unrelated to the
///   submitted transaction.
///
/// Anything else (customarily `"succeeds"`) gets the happy-path defaults.
pub struct MockSender {
    url: String,
    responses: Mutex<HashMap<RpcRequest, VecDeque<Result<Value>>>>,
    requests: Mutex<Vec<(RpcRequest, Value)>>,
}

impl MockSender {
    pub fn new(url: impl Into<String>) -> Self {
        Self::new_with_mocks(url, Mocks::default())
    }

    /// Each mock answers the first call of its request.
    pub fn new_with_mocks(url: impl Into<String>, mocks: Mocks) -> Self {
        let responses = mocks
            .into_iter()
            .map(|(request, value)| (request, VecDeque::from([Ok(value)])))
            .collect();
        Self {
            url: url.into(),
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a response (or failure) for the next unanswered `request`.
    pub fn with_response(self, request: RpcRequest, response: Result<Value>) -> Self {
        lock(&self.responses)
            .entry(request)
            .or_default()
            .push_back(response);
        self
    }

    /// Every request sent so far, with its params.
    pub fn requests(&self) -> Vec<(RpcRequest, Value)> {
        lock(&self.requests).clone()
    }

    fn default_response(&self, request: RpcRequest, params: &Value) -> Result<Value> {
        let context = json!({"slot": 1});
        let value = match request {
            RpcRequest::GetBalance => json!({"context": context, "value": 50}),
            RpcRequest::GetLatestBlockhash => json!({
                "context": context,
                "value": {"blockhash": BLOCKHASH, "lastValidBlockHeight": 150},
            }),
            RpcRequest::GetEpochInfo => json!({
                "absoluteSlot": 34,
                "blockHeight": 34,
                "epoch": 1,
                "slotIndex": 2,
                "slotsInEpoch": 32,
                "transactionCount": 123,
            }),
            RpcRequest::GetSignatureStatuses => {
                let status = match self.url.as_str() {
                    "sig_not_found" => Value::Null,
                    "tx_failed" => json!({
                        "slot": 1,
                        "confirmations": null,
                        "err": {"InstructionError": [0, "UninitializedAccount"]},
                        "confirmationStatus": "confirmed",
                    }),
                    _ => json!({
                        "slot": 1,
                        "confirmations": null,
                        "err": null,
                        "confirmationStatus": "finalized",
                    }),
                };
                json!({"context": context, "value": [status]})
            }
            RpcRequest::GetTokenAccountsByOwner => {
                let accounts = if self.url == "no_token_account" {
                    json!([])
                } else {
                    json!([{"pubkey": PUBKEY, "account": {"lamports": 2039280}}])
                };
                json!({"context": context, "value": accounts})
            }
            RpcRequest::SendTransaction => {
                if self.url == "malicious" {
                    json!(SIGNATURE)
                } else {
                    let encoded = params[0]
                        .as_str()
                        .ok_or_else(|| RpcError::Parse("missing transaction".into()))?;
                    let tx = SignedTransaction::deserialize(&base64_decode(encoded)?)?;
                    json!(tx.signature().to_string())
                }
            }
        };
        Ok(value)
    }
}

impl RpcSender for MockSender {
    fn send(&self, request: RpcRequest, params: Value) -> Result<Value> {
        lock(&self.requests).push((request, params.clone()));

        if let Some(response) = lock(&self.responses)
            .get_mut(&request)
            .and_then(VecDeque::pop_front)
        {
            return response;
        }
        if self.url == "fails" {
            return Err(RpcError::Http("mock transport failure".into()));
        }

        self.default_response(request, &params)
    }

    fn url(&self) -> String {
        format!("MockSender: {}", self.url)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queued_responses_come_first_then_defaults() {
        let sender = MockSender::new("succeeds")
            .with_response(RpcRequest::GetBalance, Ok(json!({"value": 1})))
            .with_response(RpcRequest::GetBalance, Ok(json!({"value": 2})));

        let balance = |s: &MockSender| {
            s.send(RpcRequest::GetBalance, json!([])).unwrap()["value"].clone()
        };
        assert_eq!(balance(&sender), 1);
        assert_eq!(balance(&sender), 2);
        assert_eq!(balance(&sender), 50);
    }

    #[test]
    fn queued_errors_are_returned() {
        let sender = MockSender::new("succeeds").with_response(
            RpcRequest::GetEpochInfo,
            Err(RpcError::Http("timed out".into())),
        );
        assert!(sender.send(RpcRequest::GetEpochInfo, json!([])).is_err());
        assert!(sender.send(RpcRequest::GetEpochInfo, json!([])).is_ok());
    }

    #[test]
    fn fails_directive() {
        let sender = MockSender::new("fails");
        assert!(matches!(
            sender.send(RpcRequest::GetBalance, json!([])),
            Err(RpcError::Http(_))
        ));
    }

    #[test]
    fn records_requests() {
        let sender = MockSender::new("succeeds");
        sender.send(RpcRequest::GetBalance, json!([PUBKEY])).unwrap();
        assert_eq!(
            sender.requests(),
            vec![(RpcRequest::GetBalance, json!([PUBKEY]))]
        );
    }

    #[test]
    fn mocks_answer_once() {
        let mut mocks = Mocks::new();
        mocks.insert(RpcRequest::GetBalance, json!({"value": 9}));
        let sender = MockSender::new_with_mocks("succeeds", mocks);
        assert_eq!(sender.send(RpcRequest::GetBalance, json!([])).unwrap()["value"], 9);
        assert_eq!(sender.send(RpcRequest::GetBalance, json!([])).unwrap()["value"], 50);
    }
}
