use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use alloy::primitives::Address;
use serde_json::Value;

use wave_portal_client_core::{PortError, WalletPort};

use crate::PortalAdapterConfig;

/// EIP-1193 error code for a request the user declined.
const USER_REJECTED_CODE: i64 = 4001;

/// Wallet provider adapter. The proxy runtime forwards EIP-1193 requests to
/// a JSON-RPC bridge in front of the browser wallet; without one, the
/// development profile falls back to a deterministic single-account wallet.
#[derive(Debug, Clone)]
pub struct Eip1193WalletAdapter {
    mode: WalletMode,
    state: Arc<Mutex<WalletState>>,
}

#[derive(Debug, Clone)]
enum WalletMode {
    Disabled(String),
    Deterministic,
    Proxy(ProxyRuntime),
}

#[derive(Debug, Clone)]
struct ProxyRuntime {
    base_url: String,
    client: reqwest::blocking::Client,
}

#[derive(Debug)]
struct WalletState {
    accounts: Vec<Address>,
    authorized: bool,
}

impl Default for WalletState {
    fn default() -> Self {
        Self {
            accounts: vec!["0x1000000000000000000000000000000000000001"
                .parse()
                .expect("valid built-in deterministic account")],
            authorized: false,
        }
    }
}

impl Default for Eip1193WalletAdapter {
    fn default() -> Self {
        Self::with_config(&PortalAdapterConfig::default())
    }
}

impl Eip1193WalletAdapter {
    pub fn with_config(config: &PortalAdapterConfig) -> Self {
        let mode = if let Some(base_url) = config.provider_proxy_url.clone() {
            let timeout = Duration::from_millis(config.http_timeout_ms);
            match reqwest::blocking::Client::builder().timeout(timeout).build() {
                Ok(client) => WalletMode::Proxy(ProxyRuntime { base_url, client }),
                Err(e) => {
                    if config.strict_runtime_required() {
                        WalletMode::Disabled(format!(
                            "failed to initialize provider proxy client: {e}"
                        ))
                    } else {
                        WalletMode::Deterministic
                    }
                }
            }
        } else if config.strict_runtime_required() {
            WalletMode::Disabled(
                "provider proxy URL not configured in production profile".to_owned(),
            )
        } else {
            WalletMode::Deterministic
        };

        Self {
            mode,
            state: Arc::new(Mutex::new(WalletState::default())),
        }
    }

    pub fn debug_set_accounts(&self, accounts: Vec<Address>) -> Result<(), PortError> {
        self.lock()?.accounts = accounts;
        Ok(())
    }

    /// Mark the deterministic wallet as pre-authorized, as if a prior
    /// session had approved it.
    pub fn debug_authorize(&self) -> Result<(), PortError> {
        self.lock()?.authorized = true;
        Ok(())
    }

    fn check_mode(&self) -> Result<(), PortError> {
        if let WalletMode::Disabled(reason) = &self.mode {
            tracing::debug!(%reason, "wallet provider disabled");
            return Err(PortError::ProviderUnavailable);
        }
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, WalletState>, PortError> {
        self.state
            .lock()
            .map_err(|e| PortError::RemoteCallFailed(format!("wallet state lock poisoned: {e}")))
    }

    fn proxy_call(&self, method: &str, params: Value) -> Result<Value, PortError> {
        let WalletMode::Proxy(proxy) = &self.mode else {
            return Err(PortError::RemoteCallFailed(
                "provider proxy runtime not enabled".to_owned(),
            ));
        };

        let payload = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        let response = proxy
            .client
            .post(&proxy.base_url)
            .json(&payload)
            .send()
            .map_err(|e| {
                tracing::debug!(%e, "provider proxy unreachable");
                PortError::ProviderUnavailable
            })?;
        let status = response.status();
        let body: Value = response.json().map_err(|e| {
            PortError::RemoteCallFailed(format!("provider proxy json decode failed: {e}"))
        })?;
        if !status.is_success() {
            return Err(PortError::RemoteCallFailed(format!(
                "provider proxy status {status}: {body}"
            )));
        }
        if let Some(error) = body.get("error") {
            if error.get("code").and_then(Value::as_i64) == Some(USER_REJECTED_CODE) {
                return Err(PortError::UserRejected);
            }
            return Err(PortError::RemoteCallFailed(format!(
                "provider returned error: {error}"
            )));
        }
        body.get("result")
            .cloned()
            .ok_or_else(|| PortError::RemoteCallFailed("provider proxy missing result".to_owned()))
    }

    fn decode_accounts(result: &Value) -> Result<Vec<Address>, PortError> {
        let arr = result
            .as_array()
            .ok_or_else(|| PortError::RemoteCallFailed("accounts: array expected".to_owned()))?;
        let mut accounts = Vec::with_capacity(arr.len());
        for item in arr {
            let raw = item
                .as_str()
                .ok_or_else(|| PortError::RemoteCallFailed("accounts: string expected".to_owned()))?;
            let parsed: Address = raw
                .parse()
                .map_err(|e| PortError::Validation(format!("invalid account address: {e}")))?;
            accounts.push(parsed);
        }
        Ok(accounts)
    }
}

impl WalletPort for Eip1193WalletAdapter {
    fn request_accounts(&self) -> Result<Vec<Address>, PortError> {
        self.check_mode()?;

        if matches!(self.mode, WalletMode::Proxy(_)) {
            let result = self.proxy_call("eth_requestAccounts", serde_json::json!([]))?;
            let accounts = Self::decode_accounts(&result)?;
            let mut state = self.lock()?;
            state.accounts = accounts.clone();
            state.authorized = true;
            return Ok(accounts);
        }

        let mut state = self.lock()?;
        state.authorized = true;
        Ok(state.accounts.clone())
    }

    fn authorized_accounts(&self) -> Result<Vec<Address>, PortError> {
        self.check_mode()?;

        if matches!(self.mode, WalletMode::Proxy(_)) {
            let result = self.proxy_call("eth_accounts", serde_json::json!([]))?;
            let accounts = Self::decode_accounts(&result)?;
            if !accounts.is_empty() {
                let mut state = self.lock()?;
                state.accounts = accounts.clone();
                state.authorized = true;
            }
            return Ok(accounts);
        }

        let state = self.lock()?;
        if state.authorized {
            Ok(state.accounts.clone())
        } else {
            Ok(Vec::new())
        }
    }
}
