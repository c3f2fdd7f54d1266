use std::{
    path::Path,
    process::{Command, Output},
};

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_create-react-test"))
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("CREATE_REACT_TEST_TRACE")
        .output()
        .unwrap()
}

fn entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}

#[test]
fn missing_project_prints_usage() {
    let tmp = tempfile::tempdir().unwrap();
    let out = run(tmp.path(), &[]);

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Please specify the project directory"));
    assert!(stderr.contains("create-react-test --help"));
    assert_eq!(entries(tmp.path()), 0);
}

#[test]
fn reserved_names_are_refused() {
    let tmp = tempfile::tempdir().unwrap();

    for name in ["react", "react-dom", "react-scripts"] {
        let out = run(tmp.path(), &[name, "--template", "node"]);

        assert_eq!(out.status.code(), Some(1), "{name}");
        let stderr = String::from_utf8_lossy(&out.stderr);
        assert!(stderr.contains("a dependency with the same name exists"));
        assert!(stderr.contains("  react-dom"));
    }

    assert_eq!(entries(tmp.path()), 0);
}

#[test]
fn invalid_names_list_reasons() {
    let tmp = tempfile::tempdir().unwrap();
    let out = run(tmp.path(), &["My App"]);

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("npm naming restrictions"));
    assert!(stderr.contains("* name can only contain URL-friendly characters"));
    assert!(stderr.contains("* name can no longer contain capital letters"));
    assert_eq!(entries(tmp.path()), 0);
}

#[test]
fn existing_target_is_untouched() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("foo"), "original").unwrap();
    std::fs::create_dir(tmp.path().join("bar")).unwrap();

    let out = run(tmp.path(), &["foo"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("foo already exists"));
    assert_eq!(
        std::fs::read_to_string(tmp.path().join("foo")).unwrap(),
        "original"
    );

    let out = run(tmp.path(), &["bar", "--unknown-flag"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("bar already exists"));
    assert_eq!(entries(&tmp.path().join("bar")), 0);

    let out = run(tmp.path(), &["--registry", "https://r.example", "bar"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("bar already exists"));
    assert_eq!(entries(tmp.path()), 2);
}

#[test]
fn help_mentions_required_argument() {
    let tmp = tempfile::tempdir().unwrap();
    let out = run(tmp.path(), &["--help"]);

    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("--template"));
    assert!(stdout.contains("Only <project-directory> is required"));
}
