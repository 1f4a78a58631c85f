//! # Integration tests
//!
//! Integration tests completely external from the crate. All code written in this module could be
//! written by an external user of the crate.

mod chart;
mod views;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}
