//! Test helper modules for flacbox-core integration tests
//!
//! Provides reusable test infrastructure:
//! - FakeStore: scripted in-memory document tree
//! - FakeExtractor: metadata extraction from scripted file bytes
//! - FakeEngine: media engine with controllable transport state and events

#![allow(dead_code)]

pub mod fake_engine;
pub mod fake_store;

pub use fake_engine::FakeEngine;
pub use fake_store::{meta_bytes, FakeExtractor, FakeStore};

/// Route tracing output through the test harness, filtered by `RUST_LOG`.
/// Only the first call installs a subscriber.
pub fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
