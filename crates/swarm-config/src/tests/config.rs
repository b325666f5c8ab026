use crate::Config;
use crate::broadcast_config::DEFAULT_PARTITION_COUNT;
use crate::queue_config::DEFAULT_FANOUT_QUEUE;
use crate::tests::{EnvGuard, setup_config_dir};

use googletest::assert_that;
use googletest::prelude::{anything, eq, ok};
use serial_test::serial;

// =========================================================================
// Happy Path Tests
// =========================================================================

#[test]
#[serial]
fn given_no_config_file_when_load_then_ok_with_defaults() {
    // Given
    let _temp = setup_config_dir();

    // When
    let result = Config::load();

    // Then
    assert_that!(result, ok(anything()));
    let config = result.unwrap();
    assert_that!(config.server.port, eq(crate::DEFAULT_PORT));
    assert_that!(config.broadcast.partition_count, eq(DEFAULT_PARTITION_COUNT));
    assert_that!(config.queue.fanout_queue.as_str(), eq(DEFAULT_FANOUT_QUEUE));
}

#[test]
#[serial]
fn given_no_config_file_when_load_and_validate_then_ok() {
    // Given
    let _temp = setup_config_dir();

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, ok(anything()));
}

#[test]
#[serial]
fn given_valid_toml_file_when_load_then_uses_toml_values() {
    // Given
    let (temp, _guard) = setup_config_dir();
    std::fs::write(
        temp.path().join("config.toml"),
        r#"
            [server]
            port = 9000

            [broadcast]
            partition_count = 64
        "#,
    )
    .unwrap();

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.server.port, eq(9000));
    assert_that!(config.broadcast.partition_count, eq(64));
}

#[test]
#[serial]
fn given_env_var_and_toml_when_load_then_env_var_overrides_toml() {
    // Given
    let (temp, _guard) = setup_config_dir();
    std::fs::write(
        temp.path().join("config.toml"),
        "[broadcast]\npartition_count = 64",
    )
    .unwrap();
    let _partitions = EnvGuard::set("SWARM_PARTITION_COUNT", "128");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.broadcast.partition_count, eq(128));
}

#[test]
#[serial]
fn given_multiple_env_overrides_when_load_then_all_apply() {
    // Given
    let _temp = setup_config_dir();
    let _port = EnvGuard::set("SWARM_SERVER_PORT", "7777");
    let _host = EnvGuard::set("SWARM_SERVER_HOST", "0.0.0.0");
    let _fanout = EnvGuard::set("SWARM_FANOUT_QUEUE", "fanout-test");
    let _page = EnvGuard::set("SWARM_REGISTRY_PAGE_SIZE", "25");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.server.port, eq(7777));
    assert_that!(config.server.host.as_str(), eq("0.0.0.0"));
    assert_that!(config.queue.fanout_queue.as_str(), eq("fanout-test"));
    assert_that!(config.registry.page_size, eq(25));
}
