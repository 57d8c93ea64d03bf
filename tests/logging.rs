use harvest::prelude::*;

#[test]
fn second_initialisation_fails() {
    let config = LoggingConfig {
        log_level: "warn".to_string(),
        log_format: LogFormat::Json,
    };

    let _first = init_subscriber(&config);

    assert!(
        matches!(init_subscriber(&config), Err(LoggingError::Init(_))),
        "a subscriber is already installed"
    );
}
