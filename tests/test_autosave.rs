mod common;

use std::time::{Duration, Instant};

use common::*;
use intern_track::DebouncedAutosave;

#[test]
fn test_typing_burst_saves_once_after_quiet_period() {
    let t0 = Instant::now();
    let quiet = Duration::from_millis(1000);
    let mut autosave = DebouncedAutosave::new(quiet);
    let mut sink = RecordingSink::default();

    for (i, text) in ["J", "Jk", "Jku", "Jkuat"].iter().enumerate() {
        autosave.on_change(details_with_institution(text), t0 + Duration::from_millis(150 * i as u64));
    }
    assert_eq!(autosave.next_deadline(), Some(t0 + Duration::from_millis(450) + quiet));

    assert!(autosave.poll(t0 + Duration::from_millis(1400), &mut sink).is_none());
    assert!(matches!(autosave.poll(t0 + Duration::from_millis(1450), &mut sink), Some(Ok(()))));
    assert_eq!(sink.saved, vec![details_with_institution("Jkuat")]);
}

#[test]
fn test_failed_save_is_reported_and_not_retried() {
    let t0 = Instant::now();
    let mut autosave = DebouncedAutosave::new(Duration::from_millis(500));
    let mut sink = RecordingSink {
        offline: true,
        ..RecordingSink::default()
    };

    autosave.on_change(details_with_institution("Acme"), t0);
    assert!(matches!(autosave.poll(t0 + Duration::from_secs(1), &mut sink), Some(Err(_))));
    assert!(autosave.last_error().is_some());
    assert!(!autosave.is_pending());

    sink.offline = false;
    assert!(autosave.poll(t0 + Duration::from_secs(5), &mut sink).is_none());
    assert!(sink.saved.is_empty());

    autosave.on_change(details_with_institution("Acme Ltd"), t0 + Duration::from_secs(6));
    assert!(matches!(autosave.poll(t0 + Duration::from_secs(7), &mut sink), Some(Ok(()))));
    assert_eq!(autosave.last_error(), None);
    assert_eq!(sink.saved.len(), 1);
}

#[test]
fn test_closed_autosave_drops_changes() {
    let t0 = Instant::now();
    let mut autosave = DebouncedAutosave::new(Duration::from_millis(200));
    let mut backend = seeded_backend();

    autosave.on_change(details_with_institution("Before close"), t0);
    assert!(autosave.flush_pending(&mut backend).unwrap());
    autosave.close();
    autosave.on_change(details_with_institution("After close"), t0 + Duration::from_millis(10));

    assert!(autosave.poll(t0 + Duration::from_secs(1), &mut backend).is_none());
    assert_eq!(backend.persist_count(), 1);
    assert_eq!(backend.details().map(|d| d.institution.as_str()), Some("Before close"));
}
