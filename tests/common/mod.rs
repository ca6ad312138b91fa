#![allow(unused_imports)]

pub use agent_runtime_test_utils::builders::{ConfigBuilder, TestProject, shell_launcher};
pub use agent_runtime_test_utils::fake_process_table::FakeProcessTable;
pub use agent_runtime_test_utils::{eventually, init_tracing, with_timeout};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;
