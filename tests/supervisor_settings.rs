use std::path::PathBuf;

use agent_runtime::config::{RawConfig, RuntimeConfig};
use agent_runtime::supervisor::SupervisorSettings;

fn config_with_port(port: Option<u16>) -> RuntimeConfig {
    let mut raw = RawConfig::new()
        .with("name", "demo")
        .with("version", "1.0.0")
        .with("framework", "ADK_JAVA")
        .with("types", "YAML");
    if let Some(port) = port {
        raw = raw.with("port", port);
    }
    RuntimeConfig::try_from(raw).expect("valid config")
}

#[test]
fn defaults_use_well_known_locations() {
    let settings = SupervisorSettings::default();
    assert_eq!(settings.pid_path, PathBuf::from(".agent.pid"));
    assert_eq!(settings.log_path, PathBuf::from("logs/agent.log"));
    assert_eq!(settings.build_dir, PathBuf::from("target"));
    assert_eq!(settings.artifact_glob, "*.jar");
    assert_eq!(settings.config_path, PathBuf::from("runtime.config.json"));
}

#[test]
fn rooted_settings_keep_relative_layout() {
    let settings = SupervisorSettings::rooted_at("/srv/agent");
    assert_eq!(settings.project_dir, PathBuf::from("/srv/agent"));
    assert_eq!(settings.pid_path, PathBuf::from("/srv/agent/.agent.pid"));
    assert_eq!(settings.log_path, PathBuf::from("/srv/agent/logs/agent.log"));
    assert_eq!(settings.build_dir, PathBuf::from("/srv/agent/target"));
}

#[test]
fn port_resolution_order() {
    let mut settings = SupervisorSettings::default();
    assert_eq!(settings.resolve_port(None), 8080);
    assert_eq!(settings.resolve_port(Some(&config_with_port(None))), 8080);
    assert_eq!(settings.resolve_port(Some(&config_with_port(Some(9000)))), 9000);

    settings.port = Some(7000);
    assert_eq!(settings.resolve_port(Some(&config_with_port(Some(9000)))), 7000);
}

#[test]
fn default_port_is_not_passed_to_the_server() {
    let settings = SupervisorSettings::default();
    assert!(settings.server_args(8080).is_empty());
    assert_eq!(settings.server_args(9000), vec!["--server.port=9000".to_string()]);
}
