use alloy::primitives::Address;

/// Default deployment of the wave portal contract.
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0xCCCc6F0832A2a69B06967E60d5eBccb028c6a6b3";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeProfile {
    /// Deterministic fallbacks allowed when no runtime is configured.
    Development,
    /// Real runtimes required; missing configuration disables the adapter.
    Production,
}

#[derive(Debug, Clone)]
pub struct PortalAdapterConfig {
    pub runtime_profile: RuntimeProfile,
    /// JSON-RPC endpoint bridging the browser wallet (EIP-1193).
    pub provider_proxy_url: Option<String>,
    /// HTTP gateway bound to the deployed portal contract.
    pub portal_gateway_url: Option<String>,
    pub contract_address: Address,
    pub http_timeout_ms: u64,
    /// Fixed gas ceiling for the `wave` call.
    pub wave_gas_limit: u64,
    /// How long a toast stays visible unless superseded.
    pub notification_ttl_ms: u64,
    /// Cadence of the background event poll.
    pub event_poll_interval_ms: u64,
    /// Minimum interval between waves from one account, enforced by the
    /// deterministic runtime the way the contract does.
    pub wave_cooldown_secs: u64,
}

impl Default for PortalAdapterConfig {
    fn default() -> Self {
        Self {
            runtime_profile: RuntimeProfile::Development,
            provider_proxy_url: None,
            portal_gateway_url: None,
            contract_address: DEFAULT_CONTRACT_ADDRESS
                .parse()
                .expect("valid built-in contract address"),
            http_timeout_ms: 15_000,
            wave_gas_limit: 300_000,
            notification_ttl_ms: 5_000,
            event_poll_interval_ms: 1_000,
            wave_cooldown_secs: 300,
        }
    }
}

impl PortalAdapterConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(profile) = std::env::var("WAVE_PORTAL_PROFILE") {
            if profile.eq_ignore_ascii_case("production") {
                config.runtime_profile = RuntimeProfile::Production;
            }
        }
        if let Ok(url) = std::env::var("WAVE_PORTAL_PROVIDER_PROXY_URL") {
            if !url.is_empty() {
                config.provider_proxy_url = Some(url);
            }
        }
        if let Ok(url) = std::env::var("WAVE_PORTAL_GATEWAY_URL") {
            if !url.is_empty() {
                config.portal_gateway_url = Some(url);
            }
        }
        if let Ok(raw) = std::env::var("WAVE_PORTAL_CONTRACT") {
            match raw.parse() {
                Ok(address) => config.contract_address = address,
                Err(err) => tracing::warn!(%err, "ignoring malformed WAVE_PORTAL_CONTRACT"),
            }
        }
        config
    }

    pub fn strict_runtime_required(&self) -> bool {
        self.runtime_profile == RuntimeProfile::Production
    }
}
