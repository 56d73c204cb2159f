#![allow(dead_code)]

pub mod app_builder;
pub mod fake_provider;
pub mod flows;

pub use app_builder::{create_test_app, memory_state};
