mod common;
use crate::common::{TestProject, TestResult};

use std::path::PathBuf;

use agent_runtime::artifact::{ArtifactLocator, pick_candidate};
use agent_runtime::errors::AgentError;
use agent_runtime::fs::RealFileSystem;
use agent_runtime::fs::mock::MockFileSystem;
use proptest::prelude::*;

fn mock_build_dir(names: &[&str]) -> MockFileSystem {
    let fs = MockFileSystem::new();
    fs.add_dir("target");
    for name in names {
        fs.add_file(format!("target/{name}"), b"PK".to_vec());
    }
    fs
}

#[test]
fn prefers_non_test_artifact() -> TestResult {
    let fs = mock_build_dir(&["a-test.jar", "app.jar"]);
    let locator = ArtifactLocator::new(&fs, "target");

    assert_eq!(locator.locate("*.jar")?, PathBuf::from("target/app.jar"));
    Ok(())
}

#[test]
fn release_jar_beats_tests_jar_that_sorts_first() -> TestResult {
    let fs = mock_build_dir(&["app-1.0-tests.jar", "app-1.0.jar"]);
    let locator = ArtifactLocator::new(&fs, "target");

    assert_eq!(locator.locate("*.jar")?, PathBuf::from("target/app-1.0.jar"));
    Ok(())
}

#[test]
fn falls_back_to_first_test_artifact() -> TestResult {
    let fs = mock_build_dir(&["z-test.jar", "b-tests.jar"]);
    let locator = ArtifactLocator::new(&fs, "target");

    assert_eq!(locator.locate("*.jar")?, PathBuf::from("target/b-tests.jar"));
    Ok(())
}

#[test]
fn picks_first_non_test_in_name_order() -> TestResult {
    let fs = mock_build_dir(&["zeta.jar", "alpha.jar", "middle.jar"]);
    let locator = ArtifactLocator::new(&fs, "target");

    assert_eq!(locator.locate("*.jar")?, PathBuf::from("target/alpha.jar"));
    Ok(())
}

#[test]
fn ignores_non_matching_files_and_subdirectories() -> TestResult {
    let fs = mock_build_dir(&["app.jar.original", "notes.txt"]);
    fs.add_file("target/classes/inner.jar", b"PK".to_vec());
    let locator = ArtifactLocator::new(&fs, "target");

    assert!(matches!(
        locator.locate("*.jar"),
        Err(AgentError::ArtifactNotFound(_))
    ));
    Ok(())
}

#[test]
fn missing_build_dir_is_artifact_not_found() {
    let fs = MockFileSystem::new();
    let locator = ArtifactLocator::new(&fs, "target");

    match locator.locate("*.jar") {
        Err(AgentError::ArtifactNotFound(msg)) => assert!(msg.contains("*.jar"), "{msg}"),
        other => panic!("expected ArtifactNotFound, got {other:?}"),
    }
}

#[test]
fn invalid_glob_is_artifact_not_found() {
    let fs = mock_build_dir(&["app.jar"]);
    let locator = ArtifactLocator::new(&fs, "target");

    assert!(matches!(
        locator.locate("[*.jar"),
        Err(AgentError::ArtifactNotFound(_))
    ));
}

#[test]
fn locates_on_real_filesystem() -> TestResult {
    let project = TestProject::new()
        .with_artifact("agent-0.1.0.jar", "")
        .with_artifact("agent-0.1.0-test.jar", "");
    let fs = RealFileSystem;
    let locator = ArtifactLocator::new(&fs, project.path("target"));

    assert_eq!(
        locator.locate("*.jar")?,
        project.path("target/agent-0.1.0.jar")
    );
    Ok(())
}

#[test]
fn pick_candidate_on_empty_list_is_none() {
    assert_eq!(pick_candidate(&[]), None);
}

fn jar_names() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::btree_set("[a-z]{1,6}(-test)?", 1..8)
        .prop_map(|names| names.into_iter().map(|n| format!("{n}.jar")).collect())
}

proptest! {
    #[test]
    fn choice_does_not_depend_on_directory_order(
        names in jar_names(),
        rotate in 0usize..8,
    ) {
        let mut shuffled = names.clone();
        let len = shuffled.len();
        shuffled.rotate_left(rotate % len);

        let in_order = mock_build_dir(&names.iter().map(String::as_str).collect::<Vec<_>>());
        let rotated = mock_build_dir(&shuffled.iter().map(String::as_str).collect::<Vec<_>>());

        let a = ArtifactLocator::new(&in_order, "target").locate("*.jar").unwrap();
        let b = ArtifactLocator::new(&rotated, "target").locate("*.jar").unwrap();
        prop_assert_eq!(&a, &b);

        let chosen = a.file_name().unwrap().to_string_lossy().into_owned();
        let has_plain = names.iter().any(|n| !n.contains("test"));
        prop_assert_eq!(chosen.contains("test"), !has_plain);
    }
}
