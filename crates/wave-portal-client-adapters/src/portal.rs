use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use alloy::primitives::{keccak256, Address, B256};
use serde_json::Value;

use wave_portal_client_core::{
    BonusFlag, NewWaveEvent, PendingWave, PortError, PortalPort, RawWave, TimestampSecs,
};

use crate::PortalAdapterConfig;

/// Start of the deterministic runtime's synthetic chain clock.
const GENESIS_SECS: u64 = 1_700_000_000;
/// Synthetic block interval between accepted calls.
const BLOCK_INTERVAL_SECS: u64 = 12;

/// Contract proxy adapter. The gateway runtime forwards calls to an HTTP
/// gateway bound to the deployed contract; without one, the development
/// profile falls back to a deterministic in-memory portal that models the
/// contract's observable behavior (storage append, per-account cooldown,
/// bonus draw, `NewWave` emission).
#[derive(Debug, Clone)]
pub struct PortalAdapter {
    mode: PortalMode,
    contract_address: Address,
    cooldown_secs: u64,
    state: Arc<Mutex<PortalState>>,
}

#[derive(Debug, Clone)]
enum PortalMode {
    Disabled(String),
    Deterministic,
    Gateway(GatewayRuntime),
}

#[derive(Debug, Clone)]
struct GatewayRuntime {
    base_url: String,
    client: reqwest::blocking::Client,
}

#[derive(Debug)]
struct PortalState {
    waves: Vec<RawWave>,
    queued: Vec<NewWaveEvent>,
    subscribed: bool,
    sender: Address,
    chain_now_secs: u64,
    last_wave_at: HashMap<Address, u64>,
    known_txs: Vec<B256>,
    nonce: u64,
}

impl Default for PortalState {
    fn default() -> Self {
        Self {
            waves: Vec::new(),
            queued: Vec::new(),
            subscribed: false,
            sender: "0x1000000000000000000000000000000000000001"
                .parse()
                .expect("valid built-in deterministic account"),
            chain_now_secs: GENESIS_SECS,
            last_wave_at: HashMap::new(),
            known_txs: Vec::new(),
            nonce: 0,
        }
    }
}

impl Default for PortalAdapter {
    fn default() -> Self {
        Self::with_config(&PortalAdapterConfig::default())
    }
}

impl PortalAdapter {
    pub fn with_config(config: &PortalAdapterConfig) -> Self {
        let mode = if let Some(base_url) = config.portal_gateway_url.clone() {
            let timeout = Duration::from_millis(config.http_timeout_ms);
            match reqwest::blocking::Client::builder().timeout(timeout).build() {
                Ok(client) => PortalMode::Gateway(GatewayRuntime { base_url, client }),
                Err(e) => {
                    if config.strict_runtime_required() {
                        PortalMode::Disabled(format!(
                            "failed to initialize portal gateway client: {e}"
                        ))
                    } else {
                        PortalMode::Deterministic
                    }
                }
            }
        } else if config.strict_runtime_required() {
            PortalMode::Disabled(
                "portal gateway URL not configured in production profile".to_owned(),
            )
        } else {
            PortalMode::Deterministic
        };

        Self {
            mode,
            contract_address: config.contract_address,
            cooldown_secs: config.wave_cooldown_secs,
            state: Arc::new(Mutex::new(PortalState::default())),
        }
    }

    /// Deterministic in-memory runtime regardless of configuration.
    pub fn in_memory() -> Self {
        Self {
            mode: PortalMode::Deterministic,
            contract_address: PortalAdapterConfig::default().contract_address,
            cooldown_secs: PortalAdapterConfig::default().wave_cooldown_secs,
            state: Arc::new(Mutex::new(PortalState::default())),
        }
    }

    /// In-memory runtime with a custom cooldown, for tests that need several
    /// accepted waves in a row.
    pub fn in_memory_with_cooldown(cooldown_secs: u64) -> Self {
        let mut adapter = Self::in_memory();
        adapter.cooldown_secs = cooldown_secs;
        adapter
    }

    pub fn debug_set_sender(&self, sender: Address) -> Result<(), PortError> {
        self.lock()?.sender = sender;
        Ok(())
    }

    pub fn debug_seed_history(&self, waves: Vec<RawWave>) -> Result<(), PortError> {
        self.lock()?.waves = waves;
        Ok(())
    }

    /// Pull gateway-side pending events into the local queue so that
    /// `drain_new_waves` stays cheap on the render path. A deterministic
    /// runtime queues at emission time and has nothing to pull.
    pub fn sync(&self) -> Result<usize, PortError> {
        if !matches!(self.mode, PortalMode::Gateway(_)) {
            return Ok(0);
        }
        if !self.lock()?.subscribed {
            return Ok(0);
        }
        let result = self.gateway_call(
            "portal_pendingEvents",
            serde_json::json!({ "contract": self.contract_address }),
        )?;
        let events: Vec<NewWaveEvent> = serde_json::from_value(result)
            .map_err(|e| PortError::RemoteCallFailed(format!("malformed event payload: {e}")))?;
        let fetched = events.len();
        self.lock()?.queued.extend(events);
        Ok(fetched)
    }

    fn check_mode(&self) -> Result<(), PortError> {
        if let PortalMode::Disabled(reason) = &self.mode {
            tracing::debug!(%reason, "portal contract proxy disabled");
            return Err(PortError::ProviderUnavailable);
        }
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, PortalState>, PortError> {
        self.state
            .lock()
            .map_err(|e| PortError::RemoteCallFailed(format!("portal state lock poisoned: {e}")))
    }

    fn gateway_call(&self, method: &str, params: Value) -> Result<Value, PortError> {
        let PortalMode::Gateway(gateway) = &self.mode else {
            return Err(PortError::RemoteCallFailed(
                "portal gateway runtime not enabled".to_owned(),
            ));
        };

        let payload = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        let response = gateway
            .client
            .post(&gateway.base_url)
            .json(&payload)
            .send()
            .map_err(|e| PortError::RemoteCallFailed(format!("portal gateway request failed: {e}")))?;
        let status = response.status();
        let body: Value = response.json().map_err(|e| {
            PortError::RemoteCallFailed(format!("portal gateway json decode failed: {e}"))
        })?;
        if !status.is_success() {
            return Err(PortError::RemoteCallFailed(format!(
                "portal gateway status {status}: {body}"
            )));
        }
        if let Some(error) = body.get("error") {
            return Err(PortError::RemoteCallFailed(format!(
                "portal gateway returned error: {error}"
            )));
        }
        body.get("result")
            .cloned()
            .ok_or_else(|| PortError::RemoteCallFailed("portal gateway missing result".to_owned()))
    }

    fn deterministic_wave(&self, message: &str) -> Result<PendingWave, PortError> {
        let mut state = self.lock()?;
        state.chain_now_secs += BLOCK_INTERVAL_SECS;
        let now = state.chain_now_secs;
        let sender = state.sender;

        if let Some(&last) = state.last_wave_at.get(&sender) {
            if now < last.saturating_add(self.cooldown_secs) {
                return Err(PortError::SubmissionFailed(format!(
                    "must wait {}s between waves from one account",
                    self.cooldown_secs
                )));
            }
        }
        state.last_wave_at.insert(sender, now);
        state.nonce += 1;

        let mut seed = Vec::new();
        seed.extend_from_slice(sender.as_slice());
        seed.extend_from_slice(&state.nonce.to_be_bytes());
        seed.extend_from_slice(message.as_bytes());
        let tx_hash = keccak256(seed);

        // Bonus draw: last hash bit, a stand-in for the contract's lottery.
        let bonus = if tx_hash.as_slice()[31] & 1 == 0 {
            BonusFlag::Yes
        } else {
            BonusFlag::No
        };

        state.waves.push(RawWave {
            waver: sender,
            timestamp: now,
            message: message.to_owned(),
        });
        if state.subscribed {
            state.queued.push(NewWaveEvent {
                from: sender,
                timestamp: TimestampSecs(now),
                message: message.to_owned(),
                bonus,
            });
        }
        state.known_txs.push(tx_hash);
        Ok(PendingWave { tx_hash })
    }
}

impl PortalPort for PortalAdapter {
    fn get_all_waves(&self) -> Result<Vec<RawWave>, PortError> {
        self.check_mode()?;

        if matches!(self.mode, PortalMode::Gateway(_)) {
            let result = self.gateway_call(
                "portal_getAllWaves",
                serde_json::json!({ "contract": self.contract_address }),
            )?;
            return serde_json::from_value(result)
                .map_err(|e| PortError::RemoteCallFailed(format!("malformed wave payload: {e}")));
        }

        Ok(self.lock()?.waves.clone())
    }

    fn get_total_waves(&self) -> Result<u64, PortError> {
        self.check_mode()?;

        if matches!(self.mode, PortalMode::Gateway(_)) {
            let result = self.gateway_call(
                "portal_getTotalWaves",
                serde_json::json!({ "contract": self.contract_address }),
            )?;
            return result
                .as_u64()
                .ok_or_else(|| PortError::RemoteCallFailed("total: integer expected".to_owned()));
        }

        Ok(self.lock()?.waves.len() as u64)
    }

    fn wave(&self, message: &str, gas_limit: u64) -> Result<PendingWave, PortError> {
        self.check_mode()?;
        if gas_limit == 0 {
            return Err(PortError::Validation("gas limit must be non-zero".to_owned()));
        }

        if matches!(self.mode, PortalMode::Gateway(_)) {
            let result = self
                .gateway_call(
                    "portal_wave",
                    serde_json::json!({
                        "contract": self.contract_address,
                        "message": message,
                        "gasLimit": gas_limit,
                    }),
                )
                .map_err(|e| match e {
                    PortError::RemoteCallFailed(msg) => PortError::SubmissionFailed(msg),
                    other => other,
                })?;
            let hash = result
                .get("txHash")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    PortError::SubmissionFailed("wave must return a tx hash".to_owned())
                })?;
            let tx_hash: B256 = hash
                .parse()
                .map_err(|e| PortError::Validation(format!("invalid tx hash: {e}")))?;
            return Ok(PendingWave { tx_hash });
        }

        self.deterministic_wave(message)
    }

    fn wait_for_wave(&self, pending: &PendingWave) -> Result<(), PortError> {
        self.check_mode()?;

        if matches!(self.mode, PortalMode::Gateway(_)) {
            self.gateway_call(
                "portal_waitForTransaction",
                serde_json::json!({ "txHash": pending.tx_hash }),
            )
            .map_err(|e| match e {
                PortError::RemoteCallFailed(msg) => PortError::SubmissionFailed(msg),
                other => other,
            })?;
            return Ok(());
        }

        if self.lock()?.known_txs.contains(&pending.tx_hash) {
            Ok(())
        } else {
            Err(PortError::RemoteCallFailed(format!(
                "unknown transaction: {}",
                pending.tx_hash
            )))
        }
    }

    fn subscribe_new_waves(&self) -> Result<(), PortError> {
        self.check_mode()?;
        {
            let state = self.lock()?;
            if state.subscribed {
                return Err(PortError::Validation(
                    "already subscribed to NewWave".to_owned(),
                ));
            }
        }

        if matches!(self.mode, PortalMode::Gateway(_)) {
            self.gateway_call(
                "portal_subscribe",
                serde_json::json!({ "contract": self.contract_address }),
            )?;
        }

        self.lock()?.subscribed = true;
        Ok(())
    }

    fn unsubscribe_new_waves(&self) -> Result<(), PortError> {
        self.check_mode()?;
        self.lock()?.subscribed = false;

        if matches!(self.mode, PortalMode::Gateway(_)) {
            self.gateway_call(
                "portal_unsubscribe",
                serde_json::json!({ "contract": self.contract_address }),
            )?;
        }
        Ok(())
    }

    fn drain_new_waves(&self) -> Result<Vec<NewWaveEvent>, PortError> {
        self.check_mode()?;
        Ok(std::mem::take(&mut self.lock()?.queued))
    }
}
