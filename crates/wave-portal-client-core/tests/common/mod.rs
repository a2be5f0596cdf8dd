#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use alloy::primitives::{keccak256, Address};

use wave_portal_client_core::{
    BonusFlag, ClientOptions, ClockPort, NewWaveEvent, PendingWave, PortError, PortalPort, RawWave,
    TimestampSecs, WalletPort, WaveClient,
};

/// Manually advanced wall clock.
#[derive(Debug, Default)]
pub struct TestClock {
    now: AtomicU64,
}

impl TestClock {
    pub fn advance_ms(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn now(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Shareable `ClockPort` view over a `TestClock`. A local newtype is required
/// because `Arc` is a foreign, non-fundamental type, so the orphan rules forbid
/// implementing the foreign `ClockPort` trait directly for `Arc<TestClock>`.
#[derive(Debug, Clone)]
pub struct SharedClock(Arc<TestClock>);

impl ClockPort for SharedClock {
    fn now_ms(&self) -> Result<u64, PortError> {
        Ok(self.0.now.load(Ordering::SeqCst))
    }
}

#[derive(Debug, Clone)]
pub enum WalletMode {
    /// No wallet extension present at all.
    Absent,
    /// An account is already authorized from a previous session.
    Authorized(Vec<Address>),
    /// Accounts exist but authorization requires the prompt.
    PromptOnly(Vec<Address>),
    /// The user declines the authorization prompt.
    Rejecting,
}

#[derive(Debug, Clone)]
pub struct FakeWallet {
    pub mode: WalletMode,
}

impl FakeWallet {
    pub fn new(mode: WalletMode) -> Self {
        Self { mode }
    }
}

impl WalletPort for FakeWallet {
    fn request_accounts(&self) -> Result<Vec<Address>, PortError> {
        match &self.mode {
            WalletMode::Absent => Err(PortError::ProviderUnavailable),
            WalletMode::Rejecting => Err(PortError::UserRejected),
            WalletMode::Authorized(accounts) | WalletMode::PromptOnly(accounts) => {
                Ok(accounts.clone())
            }
        }
    }

    fn authorized_accounts(&self) -> Result<Vec<Address>, PortError> {
        match &self.mode {
            WalletMode::Absent => Err(PortError::ProviderUnavailable),
            WalletMode::Rejecting | WalletMode::PromptOnly(_) => Ok(Vec::new()),
            WalletMode::Authorized(accounts) => Ok(accounts.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadFailure {
    Absent,
    Remote,
}

#[derive(Debug, Default)]
struct PortalFixture {
    history: Vec<RawWave>,
    queued: Vec<NewWaveEvent>,
    subscribed: bool,
    subscribe_calls: u32,
    unsubscribe_calls: u32,
    read_failure: Option<ReadFailure>,
    wave_failure: Option<String>,
    submitted: Vec<String>,
}

/// Scriptable portal collaborator shared between the test and the client.
#[derive(Debug, Clone, Default)]
pub struct FakePortal {
    state: Arc<Mutex<PortalFixture>>,
}

impl FakePortal {
    pub fn with_history(history: Vec<RawWave>) -> Self {
        let portal = Self::default();
        portal.lock().history = history;
        portal
    }

    pub fn set_history(&self, history: Vec<RawWave>) {
        self.lock().history = history;
    }

    pub fn push_event(&self, event: NewWaveEvent) {
        self.lock().queued.push(event);
    }

    pub fn set_read_failure(&self, failure: Option<ReadFailure>) {
        self.lock().read_failure = failure;
    }

    pub fn set_wave_failure(&self, reason: Option<&str>) {
        self.lock().wave_failure = reason.map(str::to_owned);
    }

    pub fn subscribe_calls(&self) -> u32 {
        self.lock().subscribe_calls
    }

    pub fn unsubscribe_calls(&self) -> u32 {
        self.lock().unsubscribe_calls
    }

    pub fn submitted(&self) -> Vec<String> {
        self.lock().submitted.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PortalFixture> {
        self.state.lock().expect("portal fixture lock")
    }

    fn read_error(failure: ReadFailure) -> PortError {
        match failure {
            ReadFailure::Absent => PortError::ProviderUnavailable,
            ReadFailure::Remote => PortError::RemoteCallFailed("read call failed".to_owned()),
        }
    }
}

impl PortalPort for FakePortal {
    fn get_all_waves(&self) -> Result<Vec<RawWave>, PortError> {
        let fixture = self.lock();
        if let Some(failure) = fixture.read_failure {
            return Err(Self::read_error(failure));
        }
        Ok(fixture.history.clone())
    }

    fn get_total_waves(&self) -> Result<u64, PortError> {
        let fixture = self.lock();
        if let Some(failure) = fixture.read_failure {
            return Err(Self::read_error(failure));
        }
        Ok(fixture.history.len() as u64)
    }

    fn wave(&self, message: &str, _gas_limit: u64) -> Result<PendingWave, PortError> {
        let mut fixture = self.lock();
        if let Some(reason) = fixture.wave_failure.clone() {
            return Err(PortError::SubmissionFailed(reason));
        }
        fixture.submitted.push(message.to_owned());
        Ok(PendingWave {
            tx_hash: keccak256(message.as_bytes()),
        })
    }

    fn wait_for_wave(&self, _pending: &PendingWave) -> Result<(), PortError> {
        Ok(())
    }

    fn subscribe_new_waves(&self) -> Result<(), PortError> {
        let mut fixture = self.lock();
        fixture.subscribe_calls += 1;
        if fixture.subscribed {
            return Err(PortError::Validation("already subscribed".to_owned()));
        }
        fixture.subscribed = true;
        Ok(())
    }

    fn unsubscribe_new_waves(&self) -> Result<(), PortError> {
        let mut fixture = self.lock();
        fixture.unsubscribe_calls += 1;
        fixture.subscribed = false;
        Ok(())
    }

    fn drain_new_waves(&self) -> Result<Vec<NewWaveEvent>, PortError> {
        Ok(std::mem::take(&mut self.lock().queued))
    }
}

pub type TestClient = WaveClient<FakeWallet, FakePortal, SharedClock>;

pub fn new_client(wallet: FakeWallet, portal: FakePortal, clock: Arc<TestClock>) -> TestClient {
    WaveClient::new(wallet, portal, SharedClock(clock), ClientOptions::default())
}

pub fn addr(byte: u8) -> Address {
    Address::repeat_byte(byte)
}

pub fn raw_wave(waver: Address, timestamp: u64, message: &str) -> RawWave {
    RawWave {
        waver,
        timestamp,
        message: message.to_owned(),
    }
}

pub fn wave_event(from: Address, timestamp: u64, message: &str, bonus: &str) -> NewWaveEvent {
    NewWaveEvent {
        from,
        timestamp: TimestampSecs(timestamp),
        message: message.to_owned(),
        bonus: BonusFlag::from_contract_str(bonus),
    }
}
