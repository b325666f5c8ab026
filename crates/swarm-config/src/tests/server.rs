use crate::Config;
use crate::tests::{EnvGuard, setup_config_dir};

use googletest::assert_that;
use googletest::prelude::{anything, err, ok};
use serial_test::serial;

// =========================================================================
// Validation Tests - Server
// =========================================================================

#[test]
#[serial]
fn given_privileged_port_when_validate_then_error() {
    // Given
    let _temp = setup_config_dir();
    let _port = EnvGuard::set("SWARM_SERVER_PORT", "80");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_port_zero_when_validate_then_ok_auto_assign() {
    // Given
    let _temp = setup_config_dir();
    let _port = EnvGuard::set("SWARM_SERVER_PORT", "0");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, ok(anything()));
}
