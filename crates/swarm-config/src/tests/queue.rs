use crate::{Config, QueueConfig};
use crate::tests::setup_config_dir;

use googletest::assert_that;
use googletest::prelude::{anything, eq, err};
use serial_test::serial;

// =========================================================================
// Validation Tests - Queue
// =========================================================================

#[test]
#[serial]
fn given_unsorted_thresholds_when_validate_then_error() {
    // Given
    let (temp, _guard) = setup_config_dir();
    std::fs::write(
        temp.path().join("config.toml"),
        r#"
            [queue]
            load_thresholds = [500, 250]
            delivery_queue_count = 2
        "#,
    )
    .unwrap();

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_duplicate_thresholds_when_validate_then_error() {
    // Given
    let (temp, _guard) = setup_config_dir();
    std::fs::write(
        temp.path().join("config.toml"),
        r#"
            [queue]
            load_thresholds = [250, 250, 500]
            delivery_queue_count = 3
        "#,
    )
    .unwrap();

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_count_mismatch_when_validate_then_error() {
    // Given
    let (temp, _guard) = setup_config_dir();
    std::fs::write(
        temp.path().join("config.toml"),
        r#"
            [queue]
            load_thresholds = [250, 500]
            delivery_queue_count = 10
        "#,
    )
    .unwrap();

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_empty_queue_name_when_validate_then_error() {
    // Given
    let (temp, _guard) = setup_config_dir();
    std::fs::write(
        temp.path().join("config.toml"),
        "[queue]\nfanout_queue = \"\"",
    )
    .unwrap();

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
fn given_bucket_index_when_delivery_queue_then_prefixed_name() {
    let queue = QueueConfig::default();

    assert_that!(queue.delivery_queue(0).as_str(), eq("swarm-delivery-0"));
    assert_that!(queue.delivery_queue(7).as_str(), eq("swarm-delivery-7"));
}
