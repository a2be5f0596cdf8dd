use alloy::primitives::{Address, B256};
use serde::{Deserialize, Serialize};

/// Milliseconds since the Unix epoch, as reported by a clock port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimestampMs(pub u64);

/// Seconds since the Unix epoch, the contract's timestamp representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimestampSecs(pub u64);

/// A wave exactly as the contract reports it from `getAllWaves`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawWave {
    pub waver: Address,
    pub timestamp: u64,
    pub message: String,
}

/// One entry of the client's wave list.
///
/// The contract provides no per-wave identifier, so equality of the full
/// field triple is the only available key; exact duplicates are
/// indistinguishable from distinct waves that happen to collide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveRecord {
    pub waver: Address,
    pub timestamp: TimestampSecs,
    pub message: String,
}

impl From<RawWave> for WaveRecord {
    fn from(raw: RawWave) -> Self {
        Self {
            waver: raw.waver,
            timestamp: TimestampSecs(raw.timestamp),
            message: raw.message,
        }
    }
}

/// Whether a wave won the contract's bonus draw.
///
/// The contract emits the flag as a plain string; anything other than
/// `"yes"` counts as a miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BonusFlag {
    Yes,
    No,
}

impl BonusFlag {
    pub fn from_contract_str(raw: &str) -> Self {
        if raw == "yes" {
            BonusFlag::Yes
        } else {
            BonusFlag::No
        }
    }

    pub fn granted(self) -> bool {
        self == BonusFlag::Yes
    }

    pub fn as_contract_str(self) -> &'static str {
        match self {
            BonusFlag::Yes => "yes",
            BonusFlag::No => "no",
        }
    }
}

impl From<String> for BonusFlag {
    fn from(raw: String) -> Self {
        Self::from_contract_str(&raw)
    }
}

impl From<BonusFlag> for String {
    fn from(flag: BonusFlag) -> Self {
        flag.as_contract_str().to_owned()
    }
}

/// A `NewWave` contract event as delivered by the live subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWaveEvent {
    pub from: Address,
    pub timestamp: TimestampSecs,
    pub message: String,
    pub bonus: BonusFlag,
}

impl NewWaveEvent {
    pub fn to_record(&self) -> WaveRecord {
        WaveRecord {
            waver: self.from,
            timestamp: self.timestamp,
            message: self.message.clone(),
        }
    }
}

/// Handle for a submitted wave transaction awaiting on-chain confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingWave {
    pub tx_hash: B256,
}

/// What armed the currently visible toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationCause {
    SubmissionFailed,
    BonusAwarded,
}

/// The single transient toast slot. Arming a new notification replaces the
/// slot and its deadline; only the most recently armed deadline is honored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub text: String,
    pub cause: NotificationCause,
    pub expires_at_ms: TimestampMs,
}
