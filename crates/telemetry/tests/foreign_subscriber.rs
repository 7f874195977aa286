//! Initialization when another global subscriber is already in place.

use blueprint_telemetry::ensure_initialized;

#[test]
fn test_existing_subscriber_is_not_an_error() {
    tracing::subscriber::set_global_default(tracing_subscriber::registry())
        .expect("no subscriber installed yet");

    let logger = ensure_initialized();
    assert!(!logger.installed());
    assert_eq!(logger.handler_count(), 0);

    tracing::info!("still safe to log");
}
