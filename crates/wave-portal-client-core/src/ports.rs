use alloy::primitives::Address;
use thiserror::Error;

use crate::domain::{NewWaveEvent, PendingWave, RawWave};

#[derive(Debug, Error)]
pub enum PortError {
    #[error("wallet provider unavailable")]
    ProviderUnavailable,
    #[error("authorization declined by user")]
    UserRejected,
    #[error("remote call failed: {0}")]
    RemoteCallFailed(String),
    #[error("wave submission failed: {0}")]
    SubmissionFailed(String),
    #[error("validation error: {0}")]
    Validation(String),
}

pub trait WalletPort {
    /// Prompt the provider for account authorization.
    fn request_accounts(&self) -> Result<Vec<Address>, PortError>;
    /// Query already-authorized accounts without prompting.
    fn authorized_accounts(&self) -> Result<Vec<Address>, PortError>;
}

pub trait PortalPort {
    fn get_all_waves(&self) -> Result<Vec<RawWave>, PortError>;
    fn get_total_waves(&self) -> Result<u64, PortError>;
    /// Submit a wave under a fixed gas ceiling.
    fn wave(&self, message: &str, gas_limit: u64) -> Result<PendingWave, PortError>;
    /// Suspend the caller until the pending wave is confirmed on-chain.
    fn wait_for_wave(&self, pending: &PendingWave) -> Result<(), PortError>;
    /// Start delivering `NewWave` events. A second subscribe without an
    /// intervening unsubscribe is a caller error.
    fn subscribe_new_waves(&self) -> Result<(), PortError>;
    fn unsubscribe_new_waves(&self) -> Result<(), PortError>;
    /// Take every event delivered since the previous drain, in emission order.
    fn drain_new_waves(&self) -> Result<Vec<NewWaveEvent>, PortError>;
}

pub trait ClockPort {
    fn now_ms(&self) -> Result<u64, PortError>;
}
