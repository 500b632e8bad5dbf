//! Events emitted while loading carry the name of the template source.
//! Global logging is process-wide, so this binary holds a single test.

use hb_template::config::runtime::LoggingPreferences;
use hb_template::logging::service::create_test_logger;
use hb_template::logging::{self, codes, LogEvent, LogLevel, LoggingService};
use hb_template::{ReaderSource, Template};
use std::io::Cursor;
use std::sync::Arc;

#[test]
fn test_load_events_carry_source_name() {
    logging::config::init_runtime_preferences(LoggingPreferences {
        include_source_context: true,
        ..LoggingPreferences::default()
    })
    .unwrap();

    let memory = create_test_logger();
    let service = Arc::new(LoggingService::new(memory.clone(), LogLevel::Info));
    logging::init_global_logging_with_service(service).unwrap();

    let good = ReaderSource::with_name(Cursor::new(b"ok {{x}}".to_vec()), "welcome.hbs");
    Template::load(good).unwrap();

    let bad = ReaderSource::with_name(Cursor::new(b"\n  {{".to_vec()), "broken.hbs");
    assert!(Template::load(bad).is_err());

    let events_for = |name: &str| -> Vec<LogEvent> {
        memory
            .get_events()
            .into_iter()
            .filter(|e| e.context.get("source").map(String::as_str) == Some(name))
            .collect()
    };

    let good_events = events_for("welcome.hbs");
    assert!(good_events
        .iter()
        .any(|e| e.code == codes::success::TEMPLATE_LOADED));
    assert!(good_events
        .iter()
        .any(|e| e.code == codes::success::PARSING_COMPLETE));
    assert!(good_events.iter().all(|e| !e.is_error()));

    let bad_events = events_for("broken.hbs");
    let error = bad_events
        .iter()
        .find(|e| e.code == codes::syntax::UNTERMINATED_EXPRESSION)
        .unwrap();
    assert_eq!(error.span.map(|s| s.start().line), Some(2));
    assert!(!bad_events
        .iter()
        .any(|e| e.code == codes::success::TEMPLATE_LOADED));
}
