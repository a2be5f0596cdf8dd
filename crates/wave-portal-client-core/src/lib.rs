pub mod client;
pub mod domain;
pub mod ports;
pub mod state_machine;

pub use client::{
    ClientOptions, SubmitOutcome, WaveClient, BONUS_NOTIFICATION_TEXT, CONNECT_WALLET_TEXT,
    COOLDOWN_TEXT,
};
pub use domain::{
    BonusFlag, NewWaveEvent, Notification, NotificationCause, PendingWave, RawWave, TimestampMs,
    TimestampSecs, WaveRecord,
};
pub use ports::{ClockPort, PortError, PortalPort, WalletPort};
pub use state_machine::{submission_transition, StateTransition, SubmissionAction, SubmissionState};
