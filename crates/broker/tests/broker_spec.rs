use passclip_broker::{
    BrokerEvent, Capability, ChannelEventSink, ClipboardBroker, CopyContext, EventKind, HostWindow, Ownership,
    PlaceholderCompiler, SecretRecord,
};
use passclip_clipboard::{ClearOutcome, MemoryClipboard};
use passclip_core::{AppConfig, FingerprintEngine, Payload, ValidationError, PRODUCT_NAME};
use std::cell::{Cell, RefCell};
use std::sync::Arc;
use tokio::sync::mpsc::Receiver;

fn setup(config: AppConfig) -> (Arc<MemoryClipboard>, ClipboardBroker, Receiver<BrokerEvent>) {
    let clip = Arc::new(MemoryClipboard::new());
    let (events, rx) = ChannelEventSink::channel(16);
    let broker = ClipboardBroker::new(clip.clone(), &config).with_events(events);
    (clip, broker, rx)
}

#[derive(Default)]
struct Record {
    touches: RefCell<Vec<bool>>,
}

impl SecretRecord for Record {
    fn touch(&self, modified: bool) {
        self.touches.borrow_mut().push(modified);
    }
}

#[derive(Default)]
struct Window {
    lost_focus: Cell<u32>,
    minimized: Cell<u32>,
    refreshed: Cell<u32>,
}

impl HostWindow for Window {
    fn lose_focus(&self) {
        self.lost_focus.set(self.lost_focus.get() + 1);
    }
    fn minimize(&self) {
        self.minimized.set(self.minimized.get() + 1);
    }
    fn refresh(&self) {
        self.refreshed.set(self.refreshed.get() + 1);
    }
}

#[test]
fn copy_then_verify_matches() {
    let (_clip, broker, _rx) = setup(AppConfig::default());
    let payloads = [
        Payload::text("hunter2"),
        Payload::text("ünïcødé ✓"),
        Payload::data("application/x-key-file", vec![0, 1, 2, 255]),
    ];
    for payload in &payloads {
        assert!(broker.copy(payload, false, CopyContext::default()).unwrap());
        assert_eq!(broker.verify_ownership(), Ownership::Match, "{:?}", payload);
    }
}

#[test]
fn clear_if_owner_empties_and_forgets() {
    let (clip, broker, _rx) = setup(AppConfig::default());
    broker.copy(&Payload::text("pw"), false, CopyContext::default()).unwrap();

    assert_eq!(broker.clear_if_owner(), Ownership::Match);
    assert!(clip.is_empty());
    assert_eq!(broker.verify_ownership(), Ownership::NoRecordedWrite);
    assert_eq!(broker.clear_if_owner(), Ownership::NoRecordedWrite);
}

#[test]
fn external_replacement_is_left_intact() {
    let (clip, broker, _rx) = setup(AppConfig::default());
    broker.copy(&Payload::text("pw"), true, CopyContext::default()).unwrap();
    clip.set_external_data("image/png", &[9, 9, 9]);
    clip.set_external_text("from another app");

    assert_eq!(broker.clear_if_owner(), Ownership::Mismatch);
    assert_eq!(clip.text().as_deref(), Some("from another app"));
}

#[test]
fn policy_denial_changes_nothing() {
    let clip = Arc::new(MemoryClipboard::new());
    let broker = ClipboardBroker::new(clip.clone(), &AppConfig::default()).with_policy(|_: Capability| false);

    broker.copy(&Payload::text("visible"), false, CopyContext::default()).unwrap();
    let before = broker.ownership_state();
    let changes = clip.change_count();

    assert!(!broker.copy(&Payload::text("secret"), true, CopyContext::default()).unwrap());
    assert_eq!(clip.text().as_deref(), Some("visible"));
    assert_eq!(clip.change_count(), changes);
    assert_eq!(broker.ownership_state(), before);
}

#[test]
fn policy_only_gates_sensitive_copies() {
    let clip = Arc::new(MemoryClipboard::new());
    let broker = ClipboardBroker::new(clip.clone(), &AppConfig::default()).with_policy(|_: Capability| false);
    assert!(broker.copy(&Payload::text("note"), false, CopyContext::default()).unwrap());
}

#[test]
fn malformed_payload_fails_validation_every_time() {
    let (clip, broker, _rx) = setup(AppConfig::default());
    clip.set_external_text("untouched");
    let bad = Payload::data("", vec![1]);

    for _ in 0..3 {
        assert_eq!(
            broker.copy(&bad, false, CopyContext::default()),
            Err(ValidationError::EmptyFormat)
        );
    }
    assert_eq!(clip.text().as_deref(), Some("untouched"));
}

#[test]
fn clear_is_idempotent() {
    let (clip, broker, _rx) = setup(AppConfig::default());
    broker.copy(&Payload::text("pw"), false, CopyContext::default()).unwrap();

    assert_eq!(broker.clear(), ClearOutcome::Vacated);
    assert!(clip.is_empty());
    assert_eq!(broker.clear(), ClearOutcome::Vacated);
    assert!(clip.is_empty());
    assert!(!broker.ownership_state().is_owned());
}

#[test]
fn secret_round_trip_scenario() {
    let (clip, broker, _rx) = setup(AppConfig::default());
    let record = Record::default();

    assert!(broker.copy(&Payload::text("Sup3rSecret!"), true, CopyContext::for_record(&record)).unwrap());
    assert_eq!(clip.text().as_deref(), Some("Sup3rSecret!"));
    assert_eq!(
        broker.ownership_state().fingerprint,
        Some(FingerprintEngine.digest(b"Sup3rSecret!"))
    );

    assert_eq!(broker.clear_if_owner(), Ownership::Match);
    assert!(clip.text().is_none());
    assert!(broker.ownership_state().fingerprint.is_none());
}

#[test]
fn unrelated_copy_survives_scenario() {
    let (clip, broker, _rx) = setup(AppConfig::default());
    broker.copy(&Payload::text("Sup3rSecret!"), true, CopyContext::default()).unwrap();
    clip.set_external_text("unrelated");

    broker.clear_if_owner();
    assert_eq!(clip.text().as_deref(), Some("unrelated"));
}

#[test]
fn failed_write_leaves_clipboard_and_state_empty() {
    let (clip, broker, mut rx) = setup(AppConfig::default());
    broker.copy(&Payload::text("first"), false, CopyContext::default()).unwrap();
    let _ = rx.try_recv();
    clip.fail_writes(true);

    assert!(!broker.copy(&Payload::text("second"), false, CopyContext::default()).unwrap());
    assert!(clip.is_empty());
    assert!(!broker.ownership_state().is_owned());
    assert!(rx.try_recv().is_err());
}

#[test]
fn ignore_marker_follows_config_and_platform() {
    let (clip, broker, _rx) = setup(AppConfig::default());
    broker.copy(&Payload::text("pw"), false, CopyContext::default()).unwrap();
    assert_eq!(clip.ignore_marker().as_deref(), Some(PRODUCT_NAME));

    let mut config = AppConfig::default();
    config.security.use_ignore_format_marker = false;
    let (clip, broker, _rx) = setup(config);
    broker.copy(&Payload::text("pw"), false, CopyContext::default()).unwrap();
    assert!(clip.ignore_marker().is_none());

    let clip = Arc::new(MemoryClipboard::new().without_ignore_marker());
    let broker = ClipboardBroker::new(clip.clone(), &AppConfig::default());
    assert!(broker.copy(&Payload::text("pw"), false, CopyContext::default()).unwrap());
    assert!(clip.ignore_marker().is_none());
}

#[test]
fn sensitive_copy_never_leaks_into_events() {
    let (_clip, broker, mut rx) = setup(AppConfig::default());
    let record = Record::default();

    broker.copy(&Payload::text("Sup3rSecret!"), true, CopyContext::for_record(&record)).unwrap();
    let event = rx.try_recv().unwrap();
    assert_eq!(event.kind, EventKind::CopiedEntryInfo);
    assert!(event.description.is_empty());
    assert_eq!(*record.touches.borrow(), vec![false]);

    broker.copy(&Payload::text("just a note"), false, CopyContext::for_record(&record)).unwrap();
    let event = rx.try_recv().unwrap();
    assert_eq!(event.kind, EventKind::CopiedData);
    assert_eq!(event.description, "just a note");
    // Only sensitive copies touch the record.
    assert_eq!(record.touches.borrow().len(), 1);
}

#[test]
fn placeholders_are_compiled_before_placing() {
    struct FieldRefs;
    impl PlaceholderCompiler for FieldRefs {
        fn compile(&self, text: &str, _record: Option<&dyn SecretRecord>) -> String {
            text.replace("{USER}", "alice")
        }
    }

    let clip = Arc::new(MemoryClipboard::new());
    let broker = ClipboardBroker::new(clip.clone(), &AppConfig::default()).with_compiler(FieldRefs);
    broker.copy(&Payload::text("{USER}@example.org"), false, CopyContext::default()).unwrap();

    assert_eq!(clip.text().as_deref(), Some("alice@example.org"));
    assert_eq!(broker.verify_ownership(), Ownership::Match);
}

#[test]
fn copy_and_minimize_follows_window_config() {
    let mut config = AppConfig::default();
    config.main_window.minimize_after_copy = true;
    let (_clip, broker, _rx) = setup(config);
    let window = Window::default();

    let ctx = CopyContext::default().with_window(&window);
    assert!(broker.copy_and_minimize(&Payload::text("pw"), false, ctx).unwrap());
    assert_eq!(window.minimized.get(), 1);
    assert_eq!(window.lost_focus.get(), 0);
    assert_eq!(window.refreshed.get(), 1);
}

#[test]
fn copy_and_minimize_skips_window_on_failure() {
    let mut config = AppConfig::default();
    config.main_window.drop_to_back_after_copy = true;
    config.main_window.minimize_after_copy = true;
    let (clip, broker, _rx) = setup(config);
    clip.fail_writes(true);
    let window = Window::default();

    let ctx = CopyContext::default().with_window(&window);
    assert!(!broker.copy_and_minimize(&Payload::text("pw"), false, ctx).unwrap());
    assert_eq!(window.minimized.get(), 0);
    assert_eq!(window.lost_focus.get(), 0);
}

#[test]
fn fallback_clear_used_without_native_vacate() {
    let clip = Arc::new(MemoryClipboard::new().without_native_vacate());
    let broker = ClipboardBroker::new(clip.clone(), &AppConfig::default());
    broker.copy(&Payload::text("pw"), false, CopyContext::default()).unwrap();

    assert_eq!(broker.clear_if_owner(), Ownership::Match);
    assert!(clip.text().is_none());
    assert_eq!(clip.vacate_calls(), 0);
}

#[test]
fn broker_is_shareable_across_threads() {
    let (clip, broker, _rx) = setup(AppConfig::default());
    let broker = Arc::new(broker);

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let broker = broker.clone();
            std::thread::spawn(move || {
                broker.copy(&Payload::text(format!("pw-{}", i)), false, CopyContext::default()).unwrap();
                broker.verify_ownership()
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), Ownership::Match);
    }

    assert_eq!(broker.clear_if_owner(), Ownership::Match);
    assert!(clip.text().is_none());
}
