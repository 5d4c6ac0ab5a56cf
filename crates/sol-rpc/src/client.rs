//! A blocking client for the handful of node methods a signing device
//! needs: balance, blockhash, submission, confirmation, token accounts.

use std::thread::sleep;
use std::time::{Duration, Instant};

use log::*;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use sol_core::{Hash, Pubkey, Signature, SignedTransaction};

use crate::config::RpcConfig;
use crate::error::{Result, RpcError};
use crate::mock_sender::MockSender;
use crate::request::RpcRequest;
use crate::sender::{HttpSender, RpcSender};

/// How long [`RpcClient::confirm_transaction`] callers usually wait.
pub const DEFAULT_CONFIRM_WAIT: Duration = Duration::from_millis(5000);

/// The `{ context, value }` wrapper most node methods return.
#[derive(Debug, Deserialize)]
struct Response<T> {
    value: T,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpochInfo {
    pub absolute_slot: u64,
    pub block_height: u64,
    pub epoch: u64,
    pub slot_index: u64,
    pub slots_in_epoch: u64,
    #[serde(default)]
    pub transaction_count: Option<u64>,
}

/// One entry of a `getSignatureStatuses` response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionStatus {
    pub slot: u64,
    #[serde(default)]
    pub confirmations: Option<u64>,
    #[serde(default)]
    pub err: Option<Value>,
    #[serde(default)]
    pub confirmation_status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcBlockhash {
    blockhash: String,
}

#[derive(Debug, Deserialize)]
struct RpcKeyedAccount {
    pubkey: String,
}

pub struct RpcClient<S: RpcSender = HttpSender> {
    sender: S,
    config: RpcConfig,
}

impl RpcClient<HttpSender> {
    /// Connect over HTTP to `config.url`.
    pub fn new(config: RpcConfig) -> Result<Self> {
        let sender = HttpSender::new(&config)?;
        Ok(Self::new_with_sender(sender, config))
    }
}

impl RpcClient<MockSender> {
    /// A client backed by [`MockSender`]; `url` is its behavior directive.
    pub fn new_mock(url: impl Into<String>) -> Self {
        let url = url.into();
        let config = RpcConfig::new(url.clone()).with_poll_interval(Duration::from_millis(1));
        Self::new_with_sender(MockSender::new(url), config)
    }
}

impl<S: RpcSender> RpcClient<S> {
    pub fn new_with_sender(sender: S, config: RpcConfig) -> Self {
        Self { sender, config }
    }

    pub fn url(&self) -> String {
        self.sender.url()
    }

    pub fn config(&self) -> &RpcConfig {
        &self.config
    }

    pub fn sender(&self) -> &S {
        &self.sender
    }

    /// Send `request` and deserialize its `result`.
    pub fn send<T: DeserializeOwned>(&self, request: RpcRequest, params: Value) -> Result<T> {
        debug!("{request} {params}");
        let result = self.sender.send(request, params)?;
        serde_json::from_value(result)
            .map_err(|err| RpcError::Parse(format!("{request}: {err}")))
    }

    /// Balance in lamports.
    pub fn get_balance(&self, pubkey: &Pubkey) -> Result<u64> {
        let response: Response<u64> =
            self.send(RpcRequest::GetBalance, json!([pubkey.to_string()]))?;
        Ok(response.value)
    }

    /// The blockhash to put in the next transaction's message.
    pub fn get_latest_blockhash(&self) -> Result<Hash> {
        let response: Response<RpcBlockhash> =
            self.send(RpcRequest::GetLatestBlockhash, json!([]))?;
        Ok(response.value.blockhash.parse::<Hash>()?)
    }

    pub fn get_epoch_info(&self) -> Result<EpochInfo> {
        self.send(RpcRequest::GetEpochInfo, json!([]))
    }

    /// Submit an already base64-encoded transaction. Returns the signature
    /// string the node reports.
    pub fn send_raw_transaction(&self, transaction_base64: &str) -> Result<String> {
        let params = json!([
            transaction_base64,
            {
                "encoding": "base64",
                "skipPreflight": self.config.skip_preflight,
                "preflightCommitment": self.config.preflight_commitment,
            }
        ]);
        self.send(RpcRequest::SendTransaction, params)
    }

    /// Submit a signed transaction.
    ///
    /// The node must answer with the transaction's own first signature; any
    /// other answer is [`RpcError::SignatureMismatch`]. The transaction may
    /// or may not have landed in that case.
    pub fn send_transaction(&self, transaction: &SignedTransaction) -> Result<Signature> {
        let reported = self.send_raw_transaction(&transaction.to_base64()?)?;
        let signature = reported
            .parse::<Signature>()
            .map_err(|err| RpcError::Parse(format!("signature {reported:?}: {err}")))?;

        let expected = *transaction.signature();
        if signature != expected {
            warn!("node returned signature {signature}, expected {expected}");
            return Err(RpcError::SignatureMismatch {
                expected,
                actual: signature,
            });
        }
        Ok(signature)
    }

    /// Status of one signature, searching full transaction history.
    /// `None` means the node has not seen it.
    pub fn get_signature_status(&self, signature: &Signature) -> Result<Option<TransactionStatus>> {
        let params = json!([[signature.to_string()], {"searchTransactionHistory": true}]);
        let response: Response<Vec<Option<TransactionStatus>>> =
            self.send(RpcRequest::GetSignatureStatuses, params)?;
        Ok(response.value.into_iter().next().flatten())
    }

    /// Poll until `signature` lands without error or `max_wait` runs out.
    ///
    /// Returns `Ok(false)` on timeout or when the transaction landed with an
    /// error. Transport failures while polling are logged and retried.
    pub fn confirm_transaction(&self, signature: &Signature, max_wait: Duration) -> Result<bool> {
        let start = Instant::now();
        loop {
            match self.get_signature_status(signature) {
                Ok(Some(status)) => match status.err {
                    None => {
                        debug!("{signature} confirmed in slot {}", status.slot);
                        return Ok(true);
                    }
                    Some(err) => {
                        warn!("{signature} failed: {err}");
                        return Ok(false);
                    }
                },
                Ok(None) => trace!("{signature} not yet seen"),
                Err(err) => warn!("polling {signature}: {err}"),
            }

            let elapsed = start.elapsed();
            if elapsed >= max_wait {
                debug!("{signature} unconfirmed after {elapsed:?}");
                return Ok(false);
            }
            sleep(self.config.poll_interval.min(max_wait - elapsed));
        }
    }

    /// The first token account `owner` holds for `mint`, if any.
    pub fn find_associated_token_account(
        &self,
        owner: &Pubkey,
        mint: &Pubkey,
    ) -> Result<Option<Pubkey>> {
        let params = json!([
            owner.to_string(),
            {"mint": mint.to_string()},
            {"encoding": "jsonParsed"},
        ]);
        let response: Response<Vec<RpcKeyedAccount>> =
            self.send(RpcRequest::GetTokenAccountsByOwner, params)?;

        match response.value.into_iter().next() {
            Some(account) => Ok(Some(account.pubkey.parse::<Pubkey>()?)),
            None => Ok(None),
        }
    }
}
