mod common;
use crate::common::{ConfigBuilder, TestProject, TestResult};

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use agent_runtime::cli::CliArgs;
use agent_runtime::config::{
    RawConfig, RuntimeConfig, discover_configs, load_and_validate, load_from_fs, render_config,
    validate_config,
};
use agent_runtime::errors::AgentError;
use agent_runtime::fs::mock::MockFileSystem;
use agent_runtime::types::Framework;
use clap::Parser;
use serde_json::json;

fn invalid_reason(err: AgentError) -> String {
    match err {
        AgentError::ConfigInvalid(reason) => reason,
        other => panic!("expected ConfigInvalid, got {other:?}"),
    }
}

#[test]
fn loads_valid_config_from_disk() -> TestResult {
    let project = TestProject::new().with_config(ConfigBuilder::new("demo-agent").port(9000));

    let cfg = load_and_validate(project.path("runtime.config.json"))?;

    assert_eq!(cfg.name(), "demo-agent");
    assert_eq!(cfg.version(), "1.0.0");
    assert_eq!(cfg.framework(), Framework::SpringAiAlibabaGraph);
    assert_eq!(cfg.port(), Some(9000));
    assert_eq!(cfg.get("types"), Some(&json!("YAML")));
    Ok(())
}

#[test]
fn unknown_keys_are_carried_through() -> TestResult {
    let project = TestProject::new().with_config(
        ConfigBuilder::new("demo").with("schema", json!("./config/agent.yaml")),
    );

    let cfg = load_and_validate(project.path("runtime.config.json"))?;
    assert_eq!(cfg.values().get("schema"), Some(&json!("./config/agent.yaml")));
    Ok(())
}

#[test]
fn missing_file_is_config_not_found() {
    let project = TestProject::new();
    let path = project.path("runtime.config.json");

    match load_and_validate(&path) {
        Err(AgentError::ConfigNotFound(p)) => assert_eq!(p, path),
        other => panic!("expected ConfigNotFound, got {other:?}"),
    }
}

#[test]
fn malformed_json_is_config_parse() {
    let project = TestProject::new();
    project.write("runtime.config.json", "{ \"name\": ");

    assert!(matches!(
        load_and_validate(project.path("runtime.config.json")),
        Err(AgentError::ConfigParse { .. })
    ));
}

#[test]
fn non_object_json_is_config_parse() {
    let fs = MockFileSystem::new();
    fs.add_file("runtime.config.json", "[1, 2, 3]");

    assert!(matches!(
        load_from_fs(&fs, Path::new("runtime.config.json")),
        Err(AgentError::ConfigParse { .. })
    ));
}

#[test]
fn each_required_key_is_enforced() {
    for key in ["name", "version", "framework", "types"] {
        let raw: RawConfig = serde_json::from_str(&ConfigBuilder::new("x").without(key).to_json())
            .expect("builder json parses");
        let reason = invalid_reason(RuntimeConfig::try_from(raw).unwrap_err());
        assert!(reason.contains(key), "{key}: {reason}");
    }
}

#[test]
fn every_known_framework_is_accepted() {
    for fw in Framework::ALL {
        let raw = RawConfig::new()
            .with("name", "x")
            .with("version", "1")
            .with("framework", fw.as_str())
            .with("types", "YAML");
        let cfg = RuntimeConfig::try_from(raw).expect("known framework");
        assert_eq!(cfg.framework(), fw);
    }
}

#[test]
fn framework_match_is_exact() {
    for bad in ["spring_ai_alibaba_graph", "LANGCHAIN", "", " ADK_JAVA"] {
        let raw = RawConfig::new()
            .with("name", "x")
            .with("version", "1")
            .with("framework", bad)
            .with("types", "YAML");
        let reason = invalid_reason(RuntimeConfig::try_from(raw).unwrap_err());
        assert!(reason.contains("unsupported framework"), "{bad:?}: {reason}");
    }
}

#[test]
fn non_string_framework_is_rejected() {
    let raw = RawConfig::new()
        .with("name", "x")
        .with("version", "1")
        .with("framework", 3)
        .with("types", "YAML");
    assert!(validate_config(&raw).is_err());
}

#[test]
fn unusable_port_is_ignored_not_rejected() -> TestResult {
    for bad in [json!(0), json!(70000), json!("8080"), json!(-1), json!(80.5)] {
        let project = TestProject::new().with_config(ConfigBuilder::new("x").with("port", bad.clone()));

        let cfg = load_and_validate(project.path("runtime.config.json"))?;

        assert_eq!(cfg.port(), None, "{bad}");
        assert_eq!(cfg.get("port"), Some(&bad));
    }
    Ok(())
}

#[test]
fn discover_lists_valid_configs_in_name_order() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_dir("proj");
    fs.add_file(
        "proj/runtime.config.prod.json",
        ConfigBuilder::new("prod-agent").framework("ADK_JAVA").to_json(),
    );
    fs.add_file("proj/runtime.config.json", ConfigBuilder::new("dev-agent").to_json());
    fs.add_file("proj/runtime.config.broken.json", "not json");
    fs.add_file(
        "proj/runtime.config.old.json",
        ConfigBuilder::new("old").without("types").to_json(),
    );
    fs.add_file("proj/package.json", "{}");

    let found = discover_configs(&fs, Path::new("proj"))?;
    let names: Vec<(PathBuf, &str)> = found
        .iter()
        .map(|(path, cfg)| (path.clone(), cfg.name()))
        .collect();

    assert_eq!(
        names,
        vec![
            (PathBuf::from("proj/runtime.config.json"), "dev-agent"),
            (PathBuf::from("proj/runtime.config.prod.json"), "prod-agent"),
        ]
    );
    assert_eq!(found[1].1.framework(), Framework::AdkJava);
    Ok(())
}

#[test]
fn discover_in_missing_dir_is_empty() -> TestResult {
    let fs = MockFileSystem::new();
    assert!(discover_configs(&fs, Path::new("nowhere"))?.is_empty());
    Ok(())
}

#[test]
fn render_shows_config_as_written() -> TestResult {
    let project = TestProject::new()
        .with_config(ConfigBuilder::new("demo").without("types").with("port", json!("oops")));

    let pretty = render_config(project.path("runtime.config.json"))?.expect("config exists");

    assert!(pretty.contains("\"name\": \"demo\""), "{pretty}");
    assert!(pretty.contains("\"port\": \"oops\""), "{pretty}");
    Ok(())
}

#[test]
fn render_of_missing_config_is_none() -> TestResult {
    let project = TestProject::new();
    assert_eq!(render_config(project.path("runtime.config.json"))?, None);
    Ok(())
}

#[tokio::test]
async fn config_show_without_file_exits_zero() -> TestResult {
    let project = TestProject::new();
    let missing = project.path("runtime.config.json");
    let args = CliArgs::parse_from([
        OsStr::new("agent-runtime"),
        OsStr::new("config"),
        OsStr::new("show"),
        missing.as_os_str(),
    ]);

    assert_eq!(agent_runtime::run(args).await?, 0);
    Ok(())
}

#[tokio::test]
async fn config_validate_without_file_fails() {
    let project = TestProject::new();
    let missing = project.path("runtime.config.json");
    let args = CliArgs::parse_from([
        OsStr::new("agent-runtime"),
        OsStr::new("config"),
        OsStr::new("validate"),
        missing.as_os_str(),
    ]);

    assert!(matches!(
        agent_runtime::run(args).await,
        Err(AgentError::ConfigNotFound(_))
    ));
}
