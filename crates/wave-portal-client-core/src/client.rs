//! The UI-state synchronizer between a wallet provider and the portal
//! contract. Owns the reconciled view model (account, wave list, submission
//! status, toast) and drives every transition; no other actor writes these.

use alloy::primitives::{Address, B256};

use crate::domain::{
    Notification, NotificationCause, TimestampMs, WaveRecord,
};
use crate::ports::{ClockPort, PortError, PortalPort, WalletPort};
use crate::state_machine::{submission_transition, SubmissionAction, SubmissionState};

/// Toast shown when a wave wins the contract's bonus draw.
pub const BONUS_NOTIFICATION_TEXT: &str = "You have earned 0.0001 ether.";
/// Toast shown when a submission fails without a connected account.
pub const CONNECT_WALLET_TEXT: &str = "Connect your wallet.";
/// Toast shown for every other submission failure. The contract enforces a
/// cooldown between waves from the same account, and that wording stands in
/// for all write failures; the true cause is not classified.
pub const COOLDOWN_TEXT: &str = "Must wait 5 minutes.";

#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Fixed gas ceiling for the `wave` contract call.
    pub gas_limit: u64,
    /// How long a toast stays visible unless superseded.
    pub notification_ttl_ms: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            gas_limit: 300_000,
            notification_ttl_ms: 5_000,
        }
    }
}

/// Outcome of a completed `submit_wave` call. Failure is an outcome, not an
/// error: the in-flight state is closed and a toast is armed either way, and
/// nothing is retried.
#[derive(Debug)]
pub enum SubmitOutcome {
    Confirmed { tx_hash: B256 },
    Failed { error: PortError },
}

/// Token proving the client holds the single live event subscription.
#[derive(Debug)]
struct EventSubscription;

pub struct WaveClient<W, P, C>
where
    W: WalletPort,
    P: PortalPort,
    C: ClockPort,
{
    wallet: W,
    portal: P,
    clock: C,
    options: ClientOptions,
    account: Option<Address>,
    waves: Vec<WaveRecord>,
    submission: SubmissionState,
    notification: Option<Notification>,
    subscription: Option<EventSubscription>,
    revision: u64,
}

impl<W, P, C> WaveClient<W, P, C>
where
    W: WalletPort,
    P: PortalPort,
    C: ClockPort,
{
    pub fn new(wallet: W, portal: P, clock: C, options: ClientOptions) -> Self {
        Self {
            wallet,
            portal,
            clock,
            options,
            account: None,
            waves: Vec::new(),
            submission: SubmissionState::Idle,
            notification: None,
            subscription: None,
            revision: 0,
        }
    }

    pub fn account(&self) -> Option<Address> {
        self.account
    }

    pub fn waves(&self) -> &[WaveRecord] {
        &self.waves
    }

    pub fn wave_count(&self) -> usize {
        self.waves.len()
    }

    pub fn submission(&self) -> SubmissionState {
        self.submission
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Bumped on every observable state change; cheap staleness check for a
    /// rendering layer that snapshots the client.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Request account authorization from the provider and adopt the primary
    /// address. Errors are reported to the caller, never retried here.
    pub fn connect(&mut self) -> Result<Address, PortError> {
        let accounts = self.wallet.request_accounts()?;
        let primary = accounts
            .first()
            .copied()
            .ok_or_else(|| PortError::Validation("provider returned no accounts".to_owned()))?;
        self.account = Some(primary);
        self.touch();
        tracing::info!(account = %primary, "wallet connected");
        Ok(primary)
    }

    /// Startup probe: adopt an already-authorized account without prompting,
    /// then pull history. Safe to call repeatedly; re-fetching history is the
    /// only repeated side effect.
    pub fn detect_existing_connection(&mut self) -> Result<Option<Address>, PortError> {
        let accounts = self.wallet.authorized_accounts()?;
        let Some(primary) = accounts.first().copied() else {
            tracing::debug!("no authorized account found");
            return Ok(None);
        };
        self.account = Some(primary);
        self.touch();
        tracing::info!(account = %primary, "existing connection detected");
        if let Err(err) = self.refresh_history() {
            tracing::warn!(%err, "history refresh after detection failed");
        }
        Ok(Some(primary))
    }

    /// Fetch the full remote history and replace the wave list wholesale.
    /// This is a replace, not a merge: live events that raced the fetch and
    /// are not yet reflected remotely drop out of view until the next event.
    /// On error the list is left untouched.
    pub fn refresh_history(&mut self) -> Result<usize, PortError> {
        let raw = self.portal.get_all_waves()?;
        let mapped: Vec<WaveRecord> = raw.into_iter().map(WaveRecord::from).collect();
        match self.portal.get_total_waves() {
            Ok(total) if total as usize != mapped.len() => {
                tracing::warn!(
                    total,
                    fetched = mapped.len(),
                    "remote wave count disagrees with fetched history"
                );
            }
            Ok(total) => tracing::debug!(total, "retrieved total wave count"),
            Err(err) => tracing::debug!(%err, "total wave count unavailable"),
        }
        self.waves = mapped;
        self.touch();
        tracing::info!(count = self.waves.len(), "wave history replaced");
        Ok(self.waves.len())
    }

    /// Submit a wave and wait for confirmation. Always ends in `Mined`:
    /// success and failure both close the in-flight state, and a failure arms
    /// the toast instead of propagating.
    pub fn submit_wave(&mut self, message: &str) -> Result<SubmitOutcome, PortError> {
        if self.submission == SubmissionState::Mining {
            return Err(PortError::Validation(
                "a submission is already in flight".to_owned(),
            ));
        }
        if self.submission == SubmissionState::Mined {
            self.apply_submission(SubmissionAction::Reset)?;
        }
        self.apply_submission(SubmissionAction::Begin)?;

        let outcome = self.try_submit(message);

        self.apply_submission(SubmissionAction::Confirm)?;

        match outcome {
            Ok(tx_hash) => {
                tracing::info!(%tx_hash, "wave mined");
                if let Ok(total) = self.portal.get_total_waves() {
                    tracing::debug!(total, "retrieved total wave count");
                }
                Ok(SubmitOutcome::Confirmed { tx_hash })
            }
            Err(error) => {
                tracing::warn!(%error, "wave submission failed");
                let text = if self.account.is_none() {
                    CONNECT_WALLET_TEXT
                } else {
                    COOLDOWN_TEXT
                };
                self.notify(NotificationCause::SubmissionFailed, text)?;
                Ok(SubmitOutcome::Failed { error })
            }
        }
    }

    fn try_submit(&self, message: &str) -> Result<B256, PortError> {
        let total = self.portal.get_total_waves()?;
        tracing::debug!(total, "retrieved total wave count");
        let pending = self.portal.wave(message, self.options.gas_limit)?;
        tracing::info!(tx_hash = %pending.tx_hash, "mining");
        self.portal.wait_for_wave(&pending)?;
        Ok(pending.tx_hash)
    }

    /// Drain the event subscription and apply every `NewWave` in emission
    /// order. This is the single source of list growth after the initial
    /// load; a self-submitted wave arrives here like any other.
    pub fn pump_events(&mut self) -> Result<usize, PortError> {
        let events = self.portal.drain_new_waves()?;
        let applied = events.len();
        for event in events {
            tracing::debug!(from = %event.from, "new wave event");
            self.waves.push(event.to_record());
            if event.bonus.granted() {
                self.notify(NotificationCause::BonusAwarded, BONUS_NOTIFICATION_TEXT)?;
            }
        }
        if applied > 0 {
            self.touch();
        }
        Ok(applied)
    }

    /// Arm the toast. The slot and its deadline are replaced together, so a
    /// stale hide can never outlive the toast it was scheduled for.
    pub fn notify(&mut self, cause: NotificationCause, text: &str) -> Result<(), PortError> {
        let now = self.clock.now_ms()?;
        self.notification = Some(Notification {
            text: text.to_owned(),
            cause,
            expires_at_ms: TimestampMs(now.saturating_add(self.options.notification_ttl_ms)),
        });
        self.touch();
        Ok(())
    }

    /// Hide the toast once its deadline passes. Returns whether it was hidden.
    pub fn tick(&mut self) -> Result<bool, PortError> {
        let Some(notification) = self.notification.as_ref() else {
            return Ok(false);
        };
        if self.clock.now_ms()? < notification.expires_at_ms.0 {
            return Ok(false);
        }
        self.notification = None;
        self.touch();
        Ok(true)
    }

    /// Acquire the event subscription if not already held. Idempotent; the
    /// internal token guarantees at most one live subscription.
    pub fn ensure_subscribed(&mut self) -> Result<(), PortError> {
        if self.subscription.is_some() {
            return Ok(());
        }
        self.portal.subscribe_new_waves()?;
        self.subscription = Some(EventSubscription);
        tracing::debug!("subscribed to NewWave events");
        Ok(())
    }

    /// Release the subscription. Called on teardown; also runs on drop.
    pub fn shutdown(&mut self) {
        if self.subscription.take().is_some() {
            if let Err(err) = self.portal.unsubscribe_new_waves() {
                tracing::debug!(%err, "unsubscribe on shutdown failed");
            }
        }
    }

    fn apply_submission(&mut self, action: SubmissionAction) -> Result<(), PortError> {
        let (next, transition) = submission_transition(self.submission, action)?;
        tracing::debug!(
            from = ?transition.from,
            to = ?transition.to,
            reason = transition.reason,
            "submission state"
        );
        self.submission = next;
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

impl<W, P, C> Drop for WaveClient<W, P, C>
where
    W: WalletPort,
    P: PortalPort,
    C: ClockPort,
{
    fn drop(&mut self) {
        self.shutdown();
    }
}
