mod common;
use crate::common::{ConfigBuilder, FakeProcessTable, TestProject, TestResult, init_tracing};

use std::sync::Arc;

use agent_runtime::errors::AgentError;
use agent_runtime::fs::RealFileSystem;
use agent_runtime::supervisor::{PortCheck, ProcessCheck, StopOutcome, Supervisor};
use nix::errno::Errno;
use nix::sys::signal::Signal;
use tokio::net::TcpListener;

fn supervisor(project: &TestProject, table: &FakeProcessTable) -> Supervisor {
    Supervisor::with_backends(
        project.settings(),
        Arc::new(RealFileSystem),
        Arc::new(table.clone()),
    )
}

fn supervisor_on_port(project: &TestProject, table: &FakeProcessTable, port: u16) -> Supervisor {
    let mut settings = project.settings();
    settings.port = Some(port);
    Supervisor::with_backends(settings, Arc::new(RealFileSystem), Arc::new(table.clone()))
}

async fn closed_port() -> std::io::Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    listener.local_addr().map(|addr| addr.port())
}

#[test]
fn stop_without_record_is_not_running() -> TestResult {
    let project = TestProject::new();
    let table = FakeProcessTable::new();

    let outcome = supervisor(&project, &table).stop()?;

    assert_eq!(outcome, StopOutcome::NotRunning);
    assert!(table.sent().is_empty());
    assert!(!project.path(".agent.pid").exists());
    Ok(())
}

#[test]
fn stop_sends_sigterm_and_clears_record() -> TestResult {
    init_tracing();
    let project = TestProject::new();
    project.write(".agent.pid", "4000");
    let table = FakeProcessTable::new().with_process(4000);

    let outcome = supervisor(&project, &table).stop()?;

    assert_eq!(outcome, StopOutcome::Terminated(4000));
    assert_eq!(table.sent(), vec![(4000, Signal::SIGTERM)]);
    assert!(!project.path(".agent.pid").exists());
    Ok(())
}

#[test]
fn stop_falls_back_to_sigkill() -> TestResult {
    let project = TestProject::new();
    project.write(".agent.pid", "4000");
    let table = FakeProcessTable::new()
        .with_process(4000)
        .failing(Signal::SIGTERM, Errno::EINVAL);

    let outcome = supervisor(&project, &table).stop()?;

    assert_eq!(outcome, StopOutcome::Killed(4000));
    assert_eq!(
        table.sent(),
        vec![(4000, Signal::SIGTERM), (4000, Signal::SIGKILL)]
    );
    assert!(!project.path(".agent.pid").exists());
    Ok(())
}

#[test]
fn stop_on_exited_process_clears_record() -> TestResult {
    let project = TestProject::new();
    project.write(".agent.pid", "4000");
    let table = FakeProcessTable::new();

    let outcome = supervisor(&project, &table).stop()?;

    assert_eq!(outcome, StopOutcome::AlreadyExited(4000));
    assert!(!project.path(".agent.pid").exists());
    Ok(())
}

#[test]
fn stop_reports_signal_failure_but_still_clears_record() {
    let project = TestProject::new();
    project.write(".agent.pid", "4000");
    let table = FakeProcessTable::new()
        .with_process(4000)
        .failing(Signal::SIGTERM, Errno::EPERM)
        .failing(Signal::SIGKILL, Errno::EPERM);

    match supervisor(&project, &table).stop() {
        Err(AgentError::SignalFailed { pid, source }) => {
            assert_eq!(pid, 4000);
            assert_eq!(source, Errno::EPERM);
        }
        other => panic!("expected SignalFailed, got {other:?}"),
    }
    assert!(!project.path(".agent.pid").exists());
}

#[test]
fn stop_with_corrupt_record_removes_it() -> TestResult {
    let project = TestProject::new();
    project.write(".agent.pid", "garbage");
    let table = FakeProcessTable::new();

    let outcome = supervisor(&project, &table).stop()?;

    assert_eq!(outcome, StopOutcome::NotRunning);
    assert!(table.sent().is_empty());
    assert!(!project.path(".agent.pid").exists());
    Ok(())
}

#[test]
fn second_stop_is_a_no_op() -> TestResult {
    let project = TestProject::new();
    project.write(".agent.pid", "4000");
    let table = FakeProcessTable::new().with_process(4000);
    let sup = supervisor(&project, &table);

    assert_eq!(sup.stop()?, StopOutcome::Terminated(4000));
    assert_eq!(sup.stop()?, StopOutcome::NotRunning);
    assert_eq!(table.sent().len(), 1);
    Ok(())
}

#[tokio::test]
async fn health_without_record_stops_early() {
    let project = TestProject::new().with_config(ConfigBuilder::new("demo"));
    let table = FakeProcessTable::new();

    let report = supervisor(&project, &table).health().await;

    assert_eq!(report.process, ProcessCheck::NotRecorded);
    assert_eq!(report.port, None);
    assert_eq!(report.config_present, None);
    assert!(!report.process_healthy());
}

#[tokio::test]
async fn health_heals_missing_process() {
    let project = TestProject::new().with_config(ConfigBuilder::new("demo"));
    project.write(".agent.pid", "31337");
    let table = FakeProcessTable::new();

    let report = supervisor(&project, &table).health().await;

    assert_eq!(report.process, ProcessCheck::Missing(31337));
    assert_eq!(report.port, None);
    assert_eq!(report.config_present, Some(true));
    assert!(!project.path(".agent.pid").exists());
}

#[tokio::test]
async fn health_reports_port_and_process_separately() -> TestResult {
    let project = TestProject::new();
    project.write(".agent.pid", "31337");
    let table = FakeProcessTable::new().with_process(31337);
    let port = closed_port().await?;

    let report = supervisor_on_port(&project, &table, port).health().await;

    assert_eq!(report.process, ProcessCheck::Running(31337));
    assert!(report.process_healthy());
    assert!(matches!(report.port, Some(PortCheck::Unreachable { .. })), "{report:?}");
    assert_eq!(report.config_present, Some(false));
    assert!(project.path(".agent.pid").exists());

    let rendered = report.to_string();
    assert!(rendered.contains("[ok]   process 31337 is running"), "{rendered}");
    assert!(rendered.contains(&format!("[warn] port {port}")), "{rendered}");
    Ok(())
}

#[tokio::test]
async fn health_reaches_listening_port_from_config() -> TestResult {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    let project = TestProject::new().with_config(ConfigBuilder::new("demo").port(port));
    project.write(".agent.pid", "31337");
    let table = FakeProcessTable::new().with_process(31337);

    let report = supervisor(&project, &table).health().await;

    assert_eq!(report.port, Some(PortCheck::Reachable(port)));
    assert_eq!(report.config_present, Some(true));
    Ok(())
}
