//! Installing the global log subscriber

use tetrad::cli::init_tracing;

#[test]
fn second_subscriber_install_is_an_error() {
    init_tracing("warn").unwrap();

    let err = init_tracing("debug").unwrap_err();
    assert!(err.to_string().contains("log subscriber"));
}
