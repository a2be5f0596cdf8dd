use alloy::primitives::Address;

use wave_portal_client_adapters::PortalAdapter;
use wave_portal_client_core::{BonusFlag, PortError, PortalPort};

fn sender() -> Address {
    "0x1000000000000000000000000000000000000001"
        .parse()
        .expect("deterministic sender")
}

#[test]
fn accepted_wave_appends_storage_and_emits_event() {
    let portal = PortalAdapter::in_memory_with_cooldown(0);
    portal.subscribe_new_waves().expect("subscribe");

    let pending = portal.wave("gm", 300_000).expect("wave");
    portal.wait_for_wave(&pending).expect("wait");

    let waves = portal.get_all_waves().expect("get all");
    assert_eq!(waves.len(), 1);
    assert_eq!(waves[0].waver, sender());
    assert_eq!(waves[0].message, "gm");
    assert_eq!(portal.get_total_waves().expect("total"), 1);

    let events = portal.drain_new_waves().expect("drain");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].from, sender());
    assert_eq!(events[0].message, "gm");
    assert_eq!(events[0].timestamp.0, waves[0].timestamp);
}

#[test]
fn events_are_queued_only_while_subscribed() {
    let portal = PortalAdapter::in_memory_with_cooldown(0);

    portal.wave("unheard", 300_000).expect("wave");
    assert!(portal.drain_new_waves().expect("drain").is_empty());

    // The wave still landed in storage.
    assert_eq!(portal.get_total_waves().expect("total"), 1);
}

#[test]
fn drain_empties_the_queue() {
    let portal = PortalAdapter::in_memory_with_cooldown(0);
    portal.subscribe_new_waves().expect("subscribe");
    portal.wave("gm", 300_000).expect("wave");

    assert_eq!(portal.drain_new_waves().expect("drain").len(), 1);
    assert!(portal.drain_new_waves().expect("second drain").is_empty());
}

#[test]
fn cooldown_rejects_back_to_back_waves() {
    let portal = PortalAdapter::in_memory();

    portal.wave("first", 300_000).expect("first wave");
    let err = portal.wave("second", 300_000).expect_err("cooldown");
    assert!(matches!(err, PortError::SubmissionFailed(_)));
    assert!(err.to_string().contains("must wait"));

    // The rejected wave left no trace in storage.
    assert_eq!(portal.get_total_waves().expect("total"), 1);
}

#[test]
fn zero_cooldown_allows_consecutive_waves() {
    let portal = PortalAdapter::in_memory_with_cooldown(0);

    portal.wave("first", 300_000).expect("first wave");
    portal.wave("second", 300_000).expect("second wave");
    assert_eq!(portal.get_total_waves().expect("total"), 2);
}

#[test]
fn seeded_history_is_served_back() {
    let portal = PortalAdapter::in_memory();
    portal
        .debug_seed_history(vec![wave_portal_client_core::RawWave {
            waver: sender(),
            timestamp: 100,
            message: "Frozen".to_owned(),
        }])
        .expect("seed");

    let waves = portal.get_all_waves().expect("get all");
    assert_eq!(waves.len(), 1);
    assert_eq!(waves[0].message, "Frozen");
    assert_eq!(portal.get_total_waves().expect("total"), 1);
}

#[test]
fn cooldown_is_tracked_per_account() {
    let portal = PortalAdapter::in_memory();
    let other: Address = "0x2000000000000000000000000000000000000002"
        .parse()
        .expect("other account");

    portal.wave("first", 300_000).expect("first wave");
    portal.debug_set_sender(other).expect("switch sender");
    portal.wave("second", 300_000).expect("other account waves freely");
}

#[test]
fn bonus_draw_is_deterministic() {
    let draws = |messages: &[&str]| -> Vec<BonusFlag> {
        let portal = PortalAdapter::in_memory_with_cooldown(0);
        portal.subscribe_new_waves().expect("subscribe");
        for message in messages {
            portal.wave(message, 300_000).expect("wave");
        }
        portal
            .drain_new_waves()
            .expect("drain")
            .into_iter()
            .map(|e| e.bonus)
            .collect()
    };

    let first = draws(&["gm", "wagmi", "gn"]);
    let second = draws(&["gm", "wagmi", "gn"]);
    assert_eq!(first, second);
}

#[test]
fn double_subscribe_is_rejected() {
    let portal = PortalAdapter::in_memory();
    portal.subscribe_new_waves().expect("subscribe");

    let err = portal.subscribe_new_waves().expect_err("guarded");
    assert!(matches!(err, PortError::Validation(_)));

    portal.unsubscribe_new_waves().expect("unsubscribe");
    portal.subscribe_new_waves().expect("resubscribe");
}

#[test]
fn waiting_on_an_unknown_transaction_fails() {
    let portal = PortalAdapter::in_memory();
    let pending = wave_portal_client_core::PendingWave {
        tx_hash: alloy::primitives::B256::ZERO,
    };
    let err = portal.wait_for_wave(&pending).expect_err("unknown tx");
    assert!(matches!(err, PortError::RemoteCallFailed(_)));
}

#[test]
fn zero_gas_limit_is_rejected() {
    let portal = PortalAdapter::in_memory_with_cooldown(0);
    let err = portal.wave("gm", 0).expect_err("gas limit");
    assert!(matches!(err, PortError::Validation(_)));
}
