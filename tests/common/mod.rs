//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

use voxbridge::{DataType, DatasetBounds, DatasetSizes};

/// Initialize tracing for test output (idempotent)
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_test_writer()
        .try_init();
}

/// Assert two floats are approximately equal
pub fn assert_float_eq(a: f32, b: f32, epsilon: f32) {
    assert!(
        (a - b).abs() < epsilon,
        "Expected {} to be approximately equal to {} (epsilon: {})",
        a,
        b,
        epsilon
    );
}

/// The dataset used by the worked example: (64, 64, 10) uint16, 3 channels
pub fn example_dataset() -> (DataType, DatasetSizes, DatasetBounds) {
    (
        DataType::UInt16,
        DatasetSizes {
            x: 64,
            y: 64,
            z: 10,
            c: 3,
            t: 2,
        },
        DatasetBounds {
            min: [0.0, 0.0, 0.0],
            max: [128.0, 128.0, 50.0],
        },
    )
}
