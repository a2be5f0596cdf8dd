//! View-model types: render snapshots projected from the client.

use alloy::primitives::Address;

use wave_portal_client_core::{
    ClockPort, PortalPort, SubmissionState, WalletPort, WaveClient, WaveRecord,
};

/// Immutable render snapshot of the client state. Captured whenever the
/// client's revision moves, so a frame never renders a half-applied update.
#[derive(Debug, Clone)]
pub struct ViewSnapshot {
    pub revision: u64,
    pub account: Option<Address>,
    pub waves: Vec<WaveRow>,
    pub wave_count: usize,
    pub submission: SubmissionState,
    pub toast: Option<String>,
}

impl Default for ViewSnapshot {
    fn default() -> Self {
        Self {
            revision: 0,
            account: None,
            waves: Vec::new(),
            wave_count: 0,
            submission: SubmissionState::Idle,
            toast: None,
        }
    }
}

impl ViewSnapshot {
    pub fn capture<W, P, C>(client: &WaveClient<W, P, C>) -> Self
    where
        W: WalletPort,
        P: PortalPort,
        C: ClockPort,
    {
        Self {
            revision: client.revision(),
            account: client.account(),
            waves: client.waves().iter().map(WaveRow::from_record).collect(),
            wave_count: client.wave_count(),
            submission: client.submission(),
            toast: client.notification().map(|n| n.text.clone()),
        }
    }
}

/// One row of the wave list, pre-formatted for display.
#[derive(Debug, Clone)]
pub struct WaveRow {
    pub address: String,
    pub timestamp: String,
    pub message: String,
}

impl WaveRow {
    pub fn from_record(record: &WaveRecord) -> Self {
        Self {
            address: record.waver.to_string(),
            timestamp: format_timestamp(record.timestamp.0),
            message: record.message.clone(),
        }
    }
}

pub fn format_timestamp(secs: u64) -> String {
    chrono::DateTime::<chrono::Utc>::from_timestamp(secs as i64, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| format!("t+{secs}s"))
}

/// Abbreviated 0x1234…abcd form for header display.
pub fn short_address(address: &Address) -> String {
    let full = address.to_string();
    format!("{}…{}", &full[..6], &full[full.len() - 4..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_render_as_utc() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00:00 UTC");
        assert_eq!(format_timestamp(100), "1970-01-01 00:01:40 UTC");
    }

    #[test]
    fn short_address_keeps_both_ends() {
        let address: Address = "0x1000000000000000000000000000000000000001"
            .parse()
            .expect("address");
        let short = short_address(&address);
        assert!(short.starts_with("0x1000"));
        assert!(short.ends_with("0001"));
    }
}
