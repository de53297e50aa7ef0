use assert_cmd::Command;
use assert_cmd::cargo;
use mockito::Server;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::path::Path;
use std::process::Stdio;
use tempfile::tempdir;

/// typst-sync isolated from the user's environment: no editor, no config file.
fn typst_sync(data_dir: &Path) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("typst-sync"));
    cmd.env_remove("EDITOR")
        .env_remove("VISUAL")
        .env_remove("TYPST_SYNC_REPO")
        .env_remove("TYPST_SYNC_DATA_DIR")
        .env_remove("TYPST_SYNC_CONFIG")
        .arg("--config")
        .arg(data_dir.join("no-such-config.toml"))
        .arg("--data-dir")
        .arg(data_dir);
    cmd
}

fn create_mylib(data_dir: &Path) {
    typst_sync(data_dir)
        .args(["create", "mylib", "--version", "0.1.0", "--entrypoint", "lib.typ"])
        .assert()
        .success();
}

fn check_git_available() -> bool {
    std::process::Command::new("git")
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[test]
fn test_list_empty_data_dir() {
    let data_dir = tempdir().unwrap();

    typst_sync(data_dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(contains("No local packages."));
}

#[test]
fn test_create_then_list() {
    let data_dir = tempdir().unwrap();
    let package_dir = data_dir.path().join("typst/packages/local/mylib/0.1.0");

    typst_sync(data_dir.path())
        .args(["create", "mylib", "--version", "0.1.0", "--entrypoint", "lib.typ"])
        .assert()
        .success()
        .stdout(contains("Created @local/mylib:0.1.0"))
        .stdout(contains("lib.typ"));

    assert_eq!(
        std::fs::read_to_string(package_dir.join("typst.toml")).unwrap(),
        "[package]\nname = \"mylib\"\nversion = \"0.1.0\"\nentrypoint = \"lib.typ\""
    );
    assert_eq!(
        std::fs::read_to_string(package_dir.join("lib.typ")).unwrap(),
        "= Hello Typst"
    );

    typst_sync(data_dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(contains("@local/mylib:0.1.0"));
}

#[test]
fn test_create_with_prompts() {
    let data_dir = tempdir().unwrap();

    typst_sync(data_dir.path())
        .arg("create")
        .write_stdin("\nnotes\n\n\n")
        .assert()
        .success()
        .stdout(contains("Please input package name"))
        .stdout(contains("Created @local/notes:0.1.0"));

    assert!(
        data_dir
            .path()
            .join("typst/packages/local/notes/0.1.0/lib.typ")
            .is_file()
    );
}

#[test]
fn test_create_rejects_invalid_version() {
    let data_dir = tempdir().unwrap();

    typst_sync(data_dir.path())
        .args(["create", "mylib", "--version", "1.0"])
        .assert()
        .failure()
        .stderr(contains("Please input valid package version like 0.1.0"));

    assert!(!data_dir.path().join("typst").exists());
}

#[test]
fn test_import_local_into_document() {
    let data_dir = tempdir().unwrap();
    create_mylib(data_dir.path());
    let document = data_dir.path().join("main.typ");
    std::fs::write(&document, "= Notes\n").unwrap();

    typst_sync(data_dir.path())
        .args(["import", "--local-only", "--document"])
        .arg(&document)
        .args(["--line", "1"])
        .write_stdin("1\n")
        .assert()
        .success()
        .stdout(contains("Please select a package to import"));

    assert_eq!(
        std::fs::read_to_string(&document).unwrap(),
        "#import \"@local/mylib:0.1.0\": *\n= Notes\n"
    );
}

#[test]
fn test_import_falls_back_to_local_when_index_unavailable() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/preview/index.json")
        .with_status(500)
        .create();

    let data_dir = tempdir().unwrap();
    create_mylib(data_dir.path());

    typst_sync(data_dir.path())
        .arg("import")
        .arg("--index-url")
        .arg(format!("{}/preview/index.json", server.url()))
        .write_stdin("1\n")
        .assert()
        .success()
        .stderr(contains(
            "Can not get preview packages list, please try again later.",
        ))
        .stdout(contains("#import \"@local/mylib:0.1.0\": *"));
}

#[test]
fn test_list_preview_packages() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/preview/index.json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[
                {"name": "cetz", "version": "0.2.1", "entrypoint": "src/lib.typ"},
                {"name": "cetz", "version": "0.2.2", "entrypoint": "src/lib.typ"},
                {"name": "acrostiche", "version": "0.1.0", "entrypoint": "acrostiche.typ"}
            ]"#,
        )
        .create();

    let data_dir = tempdir().unwrap();

    typst_sync(data_dir.path())
        .args(["list", "--preview", "--index-url"])
        .arg(format!("{}/preview/index.json", server.url()))
        .assert()
        .success()
        .stdout(contains("@preview/acrostiche:0.1.0\n@preview/cetz:0.2.2"))
        .stdout(contains("0.2.1").not());

    mock.assert();
}

#[test]
fn test_open_prints_entry_file() {
    let data_dir = tempdir().unwrap();
    create_mylib(data_dir.path());

    typst_sync(data_dir.path())
        .args(["open", "@local/mylib:0.1.0"])
        .assert()
        .success()
        .stdout(contains("lib.typ"));

    typst_sync(data_dir.path())
        .args(["open", "@local/mylib:9.9.9"])
        .assert()
        .failure()
        .stderr(contains("Package manifest not found"));
}

#[test]
fn test_config_file_supplies_data_dir() {
    let data_dir = tempdir().unwrap();
    create_mylib(data_dir.path());
    let config = data_dir.path().join("config.toml");
    std::fs::write(
        &config,
        format!("dataDir = {:?}\n", data_dir.path().to_string_lossy()),
    )
    .unwrap();

    Command::new(cargo::cargo_bin!("typst-sync"))
        .env_remove("TYPST_SYNC_DATA_DIR")
        .env_remove("TYPST_SYNC_REPO")
        .env_remove("TYPST_SYNC_CONFIG")
        .arg("--config")
        .arg(&config)
        .arg("list")
        .assert()
        .success()
        .stdout(contains("@local/mylib:0.1.0"));
}

#[test]
fn test_push_without_sync_repo_fails() {
    let data_dir = tempdir().unwrap();

    typst_sync(data_dir.path())
        .arg("push")
        .assert()
        .failure()
        .stderr(contains(
            "Can not find syncRepo, please make sure you have configured syncRepo.",
        ));

    assert!(!data_dir.path().join("typst").exists());
}

#[test]
fn test_push_then_pull_through_bare_remote() {
    if !check_git_available() {
        eprintln!("Skipping test: git not available");
        return;
    }

    let remote_root = tempdir().unwrap();
    let remote = remote_root.path().join("packages.git");
    let status = std::process::Command::new("git")
        .arg("init")
        .arg("--bare")
        .arg(&remote)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .unwrap();
    assert!(status.success());
    let remote_url = remote.to_string_lossy().into_owned();

    let identity = [
        ("GIT_AUTHOR_NAME", "Test User"),
        ("GIT_AUTHOR_EMAIL", "test@example.com"),
        ("GIT_COMMITTER_NAME", "Test User"),
        ("GIT_COMMITTER_EMAIL", "test@example.com"),
    ];

    let first = tempdir().unwrap();
    create_mylib(first.path());
    typst_sync(first.path())
        .envs(identity)
        .args(["push", "--sync-repo", &remote_url])
        .assert()
        .success()
        .stdout(contains("Typst packages pushed"));
    assert!(first.path().join("typst/.git").exists());

    let second = tempdir().unwrap();
    typst_sync(second.path())
        .envs(identity)
        .args(["pull", "--sync-repo", &remote_url])
        .assert()
        .success()
        .stdout(contains("Typst packages pulled"));

    assert_eq!(
        std::fs::read_to_string(
            second
                .path()
                .join("typst/packages/local/mylib/0.1.0/lib.typ")
        )
        .unwrap(),
        "= Hello Typst"
    );

    typst_sync(second.path())
        .arg("list")
        .assert()
        .success()
        .stdout(contains("@local/mylib:0.1.0"));
}

#[test]
fn test_repeated_push_to_remote_path_with_spaces() {
    if !check_git_available() {
        eprintln!("Skipping test: git not available");
        return;
    }

    let remote_root = tempdir().unwrap();
    let remote = remote_root.path().join("my packages.git");
    let status = std::process::Command::new("git")
        .arg("init")
        .arg("--bare")
        .arg(&remote)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .unwrap();
    assert!(status.success());
    let remote_url = remote.to_string_lossy().into_owned();

    let identity = [
        ("GIT_AUTHOR_NAME", "Test User"),
        ("GIT_AUTHOR_EMAIL", "test@example.com"),
        ("GIT_COMMITTER_NAME", "Test User"),
        ("GIT_COMMITTER_EMAIL", "test@example.com"),
    ];

    let data_dir = tempdir().unwrap();
    create_mylib(data_dir.path());
    for _ in 0..2 {
        typst_sync(data_dir.path())
            .envs(identity)
            .args(["push", "--sync-repo", &remote_url])
            .assert()
            .success()
            .stdout(contains("Typst packages pushed"));
    }
}
