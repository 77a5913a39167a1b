#![allow(dead_code)]

pub use cmdfeed_test_utils::{init_tracing, with_timeout};

use std::error::Error;

pub type TestResult = Result<(), Box<dyn Error>>;
