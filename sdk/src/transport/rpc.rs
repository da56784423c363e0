//! Lightweight JSON-RPC transport
//!
//! Implements only the four RPC methods the SDK needs on top of a blocking
//! `ureq` agent, avoiding solana-client and its networking stack.

use std::str::FromStr;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Deserialize;
use serde_json::{json, Value};
use solana_sdk::{
    hash::Hash,
    instruction::Instruction,
    signature::{Keypair, Signature},
    signer::Signer,
    transaction::Transaction,
};
use tracing::{debug, warn};

use super::Transport;
use crate::accounts::RecordKind;
use crate::config::{commitment_name, SdkConfig};
use crate::core::TransportFault;
use crate::prelude::*;

/// JSON-RPC client over HTTP
pub struct RpcTransport {
    url: String,
    agent: ureq::Agent,
    commitment: &'static str,
}

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
    data: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct WithContext<T> {
    value: T,
}

#[derive(Debug, Deserialize)]
struct UiAccount {
    data: (String, String), // (data, encoding)
}

#[derive(Debug, Deserialize)]
struct KeyedAccount {
    pubkey: String,
    account: UiAccount,
}

#[derive(Debug, Deserialize)]
struct LatestBlockhash {
    blockhash: String,
}

impl RpcTransport {
    pub fn new(config: &SdkConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(config.timeout())
            .timeout_read(config.timeout())
            .build();

        Self {
            url: config.rpc_url.clone(),
            agent,
            commitment: commitment_name(config.commitment),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn call<T>(&self, method: &'static str, params: Value) -> Result<T, TransportFault>
    where
        T: for<'de> Deserialize<'de>,
    {
        let request_body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params
        });

        debug!(method, url = %self.url, "RPC call");

        // ureq is blocking
        let response_body = tokio::task::spawn_blocking({
            let agent = self.agent.clone();
            let url = self.url.clone();
            let body = request_body.to_string();

            move || match agent
                .post(&url)
                .set("Content-Type", "application/json")
                .send_string(&body)
            {
                Ok(response) => response.into_string().map_err(|e| e.to_string()),
                // JSON-RPC errors may arrive with a non-2xx status
                Err(ureq::Error::Status(_, response)) => {
                    response.into_string().map_err(|e| e.to_string())
                }
                Err(e) => Err(e.to_string()),
            }
        })
        .await
        .map_err(|e| TransportFault::new(format!("{} task failed: {}", method, e)))?
        .map_err(|e| TransportFault::new(format!("{} request failed: {}", method, e)))?;

        let response: RpcResponse<T> = serde_json::from_str(&response_body)
            .map_err(|e| TransportFault::new(format!("{} returned malformed JSON: {}", method, e)))?;

        if let Some(error) = response.error {
            let fault = fault_from_rpc_error(error);
            warn!(method, code = ?fault.code, "RPC error: {}", fault);
            return Err(fault);
        }

        response
            .result
            .ok_or_else(|| TransportFault::new(format!("No result in {} response", method)))
    }

    async fn latest_blockhash(&self) -> Result<Hash, TransportFault> {
        let response: WithContext<LatestBlockhash> = self
            .call("getLatestBlockhash", json!([{ "commitment": self.commitment }]))
            .await?;

        Hash::from_str(&response.value.blockhash)
            .map_err(|e| TransportFault::new(format!("Failed to parse blockhash: {}", e)))
    }
}

#[async_trait]
impl Transport for RpcTransport {
    async fn fetch_raw_record(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, TransportFault> {
        let params = json!([
            address.to_string(),
            {
                "encoding": "base64",
                "commitment": self.commitment
            }
        ]);

        let response: WithContext<Option<UiAccount>> = self.call("getAccountInfo", params).await?;
        response
            .value
            .map(|account| decode_account_data(&account))
            .transpose()
    }

    async fn fetch_all_raw_records(
        &self,
        program_id: &Pubkey,
        kind: RecordKind,
    ) -> Result<Vec<(Pubkey, Vec<u8>)>, TransportFault> {
        let params = json!([
            program_id.to_string(),
            {
                "encoding": "base64",
                "commitment": self.commitment,
                "filters": [{
                    "memcmp": {
                        "offset": 0,
                        "bytes": STANDARD.encode(kind.discriminator()),
                        "encoding": "base64"
                    }
                }]
            }
        ]);

        let accounts: Vec<KeyedAccount> = self.call("getProgramAccounts", params).await?;
        debug!(kind = kind.name(), count = accounts.len(), "fetched program accounts");

        accounts
            .into_iter()
            .map(|keyed| {
                let address = Pubkey::from_str(&keyed.pubkey).map_err(|e| {
                    TransportFault::new(format!("Invalid account key {}: {}", keyed.pubkey, e))
                })?;
                Ok((address, decode_account_data(&keyed.account)?))
            })
            .collect()
    }

    async fn submit(
        &self,
        instructions: &[Instruction],
        signers: &[&Keypair],
    ) -> Result<Signature, TransportFault> {
        let payer = signers
            .first()
            .ok_or_else(|| TransportFault::new("No fee payer among signers"))?;
        let blockhash = self.latest_blockhash().await?;

        let mut transaction = Transaction::new_with_payer(instructions, Some(&payer.pubkey()));
        transaction
            .try_sign(signers, blockhash)
            .map_err(|e| TransportFault::new(format!("Failed to sign transaction: {}", e)))?;

        let wire = bincode::serialize(&transaction)
            .map_err(|e| TransportFault::new(format!("Failed to serialize transaction: {}", e)))?;
        let params = json!([
            STANDARD.encode(wire),
            {
                "encoding": "base64",
                "skipPreflight": false,
                "preflightCommitment": self.commitment
            }
        ]);

        let signature: String = self.call("sendTransaction", params).await?;
        debug!(%signature, instructions = instructions.len(), "transaction submitted");

        Signature::from_str(&signature)
            .map_err(|e| TransportFault::new(format!("Invalid signature {}: {}", signature, e)))
    }
}

fn decode_account_data(account: &UiAccount) -> Result<Vec<u8>, TransportFault> {
    let (data, encoding) = &account.data;
    if encoding != "base64" {
        return Err(TransportFault::new(format!(
            "Unsupported data encoding: {}",
            encoding
        )));
    }
    STANDARD
        .decode(data)
        .map_err(|e| TransportFault::new(format!("Failed to decode account data: {}", e)))
}

/// Turn a JSON-RPC error into a fault, keeping the custom program code and
/// simulation logs of a failed preflight
fn fault_from_rpc_error(error: RpcError) -> TransportFault {
    let data = error.data.unwrap_or(Value::Null);
    let logs = data
        .get("logs")
        .and_then(Value::as_array)
        .map(|lines| {
            lines
                .iter()
                .filter_map(|line| line.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();

    TransportFault {
        code: data.get("err").and_then(custom_program_code),
        message: Some(format!("RPC error {}: {}", error.code, error.message)),
        logs,
    }
}

/// `{"InstructionError": [index, {"Custom": code}]}`
fn custom_program_code(err: &Value) -> Option<u32> {
    err.get("InstructionError")?
        .get(1)?
        .get("Custom")?
        .as_u64()
        .and_then(|code| u32::try_from(code).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rpc_error(value: Value) -> RpcError {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_preflight_failure_keeps_code_and_logs() {
        let fault = fault_from_rpc_error(rpc_error(json!({
            "code": -32002,
            "message": "Transaction simulation failed: Error processing Instruction 0: custom program error: 0x1774",
            "data": {
                "err": { "InstructionError": [0, { "Custom": 6004 }] },
                "logs": ["Program log: AnchorError occurred", "Program failed"]
            }
        })));
        assert_eq!(fault.code, Some(6004));
        assert_eq!(fault.logs.len(), 2);
        assert!(fault.message.unwrap().contains("-32002"));
    }

    #[test]
    fn test_plain_rpc_error_has_no_code() {
        let fault = fault_from_rpc_error(rpc_error(json!({
            "code": -32602,
            "message": "Invalid param: could not find account"
        })));
        assert_eq!(fault.code, None);
        assert!(fault.logs.is_empty());
        assert!(fault.is_not_found());
    }

    #[test]
    fn test_account_data_encoding() {
        let account = UiAccount {
            data: (STANDARD.encode([1u8, 2, 3]), "base64".to_string()),
        };
        assert_eq!(decode_account_data(&account).unwrap(), vec![1, 2, 3]);

        let account = UiAccount {
            data: ("AQID".to_string(), "base58".to_string()),
        };
        assert!(decode_account_data(&account).is_err());
    }

    #[test]
    fn test_null_account_value_deserializes() {
        let response: RpcResponse<WithContext<Option<UiAccount>>> = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": { "context": { "slot": 1 }, "value": null }
        }))
        .unwrap();
        assert!(response.result.unwrap().value.is_none());
    }
}
