//! Integration tests for shipit
//!
//! These tests drive the real binary against temporary projects.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to create a shipit Command isolated from the user's environment
fn shipit(dir: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("shipit");
    cmd.current_dir(dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join(".xdg"))
        .env_remove("RUST_LOG")
        .env_remove("SHIPIT_BUILD_CMD")
        .env_remove("SHIPIT_LOG_HEIGHT")
        .arg("--plain");
    cmd
}

/// Helper to create a temporary project directory
fn create_temp_project() -> TempDir {
    TempDir::new().unwrap()
}

/// Helper to write `.shipit/shipit.toml`
fn write_config(dir: &TempDir, content: &str) {
    let shipit_dir = dir.path().join(".shipit");
    fs::create_dir_all(&shipit_dir).unwrap();
    fs::write(shipit_dir.join("shipit.toml"), content).unwrap();
}

const POM: &str = r#"<project>
    <modelVersion>4.0.0</modelVersion>
    <groupId>org.example</groupId>
    <artifactId>demo</artifactId>
    <version>1.2.3</version>
</project>
"#;

// =============================================================================
// Basic CLI Tests
// =============================================================================

mod cli_basics {
    use super::*;

    #[test]
    fn test_shipit_help() {
        let dir = create_temp_project();
        shipit(&dir)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("release"));
    }

    #[test]
    fn test_shipit_version() {
        let dir = create_temp_project();
        shipit(&dir).arg("--version").assert().success();
    }

    #[test]
    fn test_missing_project_dir_fails() {
        let dir = create_temp_project();
        shipit(&dir)
            .args(["--project-dir", "does-not-exist", "build"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to resolve project directory"));
    }
}

// =============================================================================
// Custom Sequences
// =============================================================================

#[cfg(unix)]
mod sequences {
    use super::*;

    const SEQUENCES: &str = r#"
[sequences.lenient]
title = "Lenient run"
success = "Lenient done"
steps = [
    { command = "echo first" },
    { command = "echo middle; false", allow_failure = true },
    { command = "echo last" },
]

[sequences.strict]
title = "Strict run"
steps = [
    { command = "echo first" },
    { command = "false" },
    { command = "echo never-reached" },
]

[sequences.argv]
steps = [{ args = ["echo", "from argv"] }]
"#;

    #[test]
    fn test_run_list() {
        let dir = create_temp_project();
        write_config(&dir, SEQUENCES);

        shipit(&dir)
            .args(["run", "--list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("lenient"))
            .stdout(predicate::str::contains("strict"))
            .stdout(predicate::str::contains("(3 steps)"));
    }

    #[test]
    fn test_run_without_sequences() {
        let dir = create_temp_project();
        shipit(&dir)
            .arg("run")
            .assert()
            .success()
            .stdout(predicate::str::contains("No sequences defined"));
    }

    #[test]
    fn test_allowed_failure_continues() {
        let dir = create_temp_project();
        write_config(&dir, SEQUENCES);

        shipit(&dir)
            .args(["run", "lenient"])
            .assert()
            .success()
            .stdout(predicate::str::contains("first"))
            .stdout(predicate::str::contains("middle"))
            .stdout(predicate::str::contains("allowed to fail"))
            .stdout(predicate::str::contains("last"))
            .stdout(predicate::str::contains("Lenient done"));
    }

    #[test]
    fn test_fail_fast_stops_and_exits_one() {
        let dir = create_temp_project();
        write_config(&dir, SEQUENCES);

        shipit(&dir)
            .args(["run", "strict"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("Execution failed!"))
            .stdout(predicate::str::contains("Command: false"))
            .stdout(predicate::str::contains("never-reached").not());
    }

    #[test]
    fn test_argv_step() {
        let dir = create_temp_project();
        write_config(&dir, SEQUENCES);

        shipit(&dir)
            .args(["run", "argv"])
            .assert()
            .success()
            .stdout(predicate::str::contains("from argv"))
            .stdout(predicate::str::contains("argv finished"));
    }

    #[test]
    fn test_unknown_sequence() {
        let dir = create_temp_project();
        write_config(&dir, SEQUENCES);

        shipit(&dir)
            .args(["run", "nope"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown sequence 'nope'"));
    }

    #[test]
    fn test_invalid_step_is_an_error() {
        let dir = create_temp_project();
        write_config(&dir, "[sequences.bad]\nsteps = [{ allow_failure = true }]\n");

        shipit(&dir)
            .args(["run", "bad"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid step 1"));
    }

    #[test]
    fn test_long_download_lines_are_truncated() {
        let dir = create_temp_project();
        write_config(
            &dir,
            r#"
[sequences.dl]
steps = [{ command = "printf 'Downloading %0150d\\n' 0" }]
"#,
        );

        let zeros = "0".repeat(150);
        shipit(&dir)
            .args(["run", "dl"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Downloading 000"))
            .stdout(predicate::str::contains("..."))
            .stdout(predicate::str::contains(zeros.as_str()).not());
    }
}

// =============================================================================
// Build and Release
// =============================================================================

#[cfg(unix)]
mod release {
    use super::*;

    #[test]
    fn test_build_with_override() {
        let dir = create_temp_project();
        shipit(&dir)
            .args(["--build-cmd", "echo compiling", "build"])
            .assert()
            .success()
            .stdout(predicate::str::contains("compiling"))
            .stdout(predicate::str::contains("Build succeeded"));
    }

    #[test]
    fn test_build_failure_exits_one() {
        let dir = create_temp_project();
        shipit(&dir)
            .args(["--build-cmd", "exit 3", "build"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("exited with code 3"));
    }

    #[test]
    fn test_build_command_from_env_and_config() {
        let dir = create_temp_project();
        write_config(&dir, "[build]\ncommand = \"echo from-config\"\n");

        shipit(&dir)
            .arg("build")
            .assert()
            .success()
            .stdout(predicate::str::contains("from-config"));

        shipit(&dir)
            .env("SHIPIT_BUILD_CMD", "echo from-env")
            .arg("build")
            .assert()
            .success()
            .stdout(predicate::str::contains("from-env"));
    }

    #[test]
    fn test_release_without_manifest_fails() {
        let dir = create_temp_project();
        shipit(&dir)
            .args(["--yes", "release"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Manifest not found"));
    }

    #[test]
    fn test_declined_release_exits_one_and_renders_metadata() {
        let dir = create_temp_project();
        fs::write(dir.path().join("pom.xml"), POM).unwrap();
        fs::write(
            dir.path().join(".zenodo.template.json"),
            r#"{"version": "{{VERSION}}"}"#,
        )
        .unwrap();

        // No terminal: the confirmation cannot be answered and counts as "no".
        shipit(&dir)
            .args(["release", "--skip-build"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("Detected version: 1.2.3"))
            .stdout(predicate::str::contains("Release cancelled"));

        let rendered = fs::read_to_string(dir.path().join(".zenodo.json")).unwrap();
        assert_eq!(rendered, r#"{"version": "1.2.3"}"#);
    }

    #[test]
    fn test_tag_push_failure_reports_git_command() {
        let dir = create_temp_project();
        fs::write(dir.path().join("pom.xml"), POM).unwrap();
        write_config(&dir, "[release]\nremote = \"nowhere\"\n");

        shipit(&dir)
            .args(["--yes", "tag", "--version", "9.9.9"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("git push nowhere main"));
    }
}

// =============================================================================
// Project Scaffolding
// =============================================================================

mod scaffold {
    use super::*;

    #[test]
    fn test_new_creates_plugin_project() {
        let dir = create_temp_project();

        shipit(&dir)
            .args([
                "new",
                "NIA Neural Inference Assistant",
                "--artifact-id",
                "nia-imagej",
                "--group-id",
                "cn.ac.cns",
                "--author",
                "Kui Wang",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("Created:"))
            .stdout(predicate::str::contains("Project structure generated successfully"));

        let root = dir.path().join("nia-imagej");
        assert!(root.join("pom.xml").is_file());
        assert!(root.join(".gitignore").is_file());
        assert!(root.join(".shipit/shipit.toml").is_file());
        assert!(
            root.join("src/main/java/cn/ac/cns/nia/Nia_Plugin.java")
                .is_file()
        );
        let pom = fs::read_to_string(root.join("pom.xml")).unwrap();
        assert!(pom.contains("<version>0.1.0-SNAPSHOT</version>"));
    }

    #[test]
    fn test_new_refuses_non_empty_directory() {
        let dir = create_temp_project();
        let target = dir.path().join("occupied");
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("keep.txt"), "x").unwrap();

        shipit(&dir)
            .args(["new", "Demo", "--dir", "occupied", "--author", "a"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("--force"));

        shipit(&dir)
            .args(["new", "Demo", "--dir", "occupied", "--author", "a", "--force"])
            .assert()
            .success();
        assert!(target.join("pom.xml").exists());
    }

    #[test]
    fn test_new_rejects_bad_package() {
        let dir = create_temp_project();
        shipit(&dir)
            .args(["new", "Demo", "--package", "not a.package"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid package"));
    }

    #[cfg(unix)]
    #[test]
    fn test_generated_project_reads_its_version() {
        let dir = create_temp_project();
        shipit(&dir)
            .args(["new", "Demo", "--author", "a", "--initial-version", "0.3.0"])
            .assert()
            .success();

        let project = dir.path().join("demo");
        let mut cmd = cargo_bin_cmd!("shipit");
        cmd.current_dir(&project)
            .env("XDG_CONFIG_HOME", dir.path().join(".xdg"))
            .args(["--plain", "release", "--skip-build"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("Detected version: 0.3.0"));
    }
}

// =============================================================================
// Configuration
// =============================================================================

mod config {
    use super::*;

    #[test]
    fn test_config_init_then_validate() {
        let dir = create_temp_project();

        shipit(&dir)
            .args(["config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Created shipit.toml"));
        assert!(dir.path().join(".shipit/shipit.toml").exists());

        shipit(&dir)
            .args(["config", "validate"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Configuration is valid."));

        shipit(&dir)
            .args(["config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("already exists"));
    }

    #[test]
    fn test_config_validate_reports_warnings() {
        let dir = create_temp_project();
        write_config(&dir, "[display]\nlog_height = 0\n");

        shipit(&dir)
            .args(["config", "validate"])
            .assert()
            .success()
            .stdout(predicate::str::contains("log_height is 0"));
    }

    #[test]
    fn test_config_show_effective_values() {
        let dir = create_temp_project();
        write_config(&dir, "[display]\nlog_height = 20\n");

        shipit(&dir)
            .args(["--log-height", "7", "config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("log_height = 20"))
            .stdout(predicate::str::contains("log_height = 7"));
    }

    #[test]
    fn test_malformed_config_fails() {
        let dir = create_temp_project();
        write_config(&dir, "[display\n");

        shipit(&dir)
            .args(["config", "show"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid config file"));
    }

    #[cfg(unix)]
    #[test]
    fn test_log_file_is_created() {
        let dir = create_temp_project();
        write_config(
            &dir,
            "[logging]\nfile = \".shipit/shipit.log\"\n\n[sequences.hello]\nsteps = [{ command = \"echo hi\" }]\n",
        );

        shipit(&dir).args(["run", "hello"]).assert().success();
        assert!(dir.path().join(".shipit/shipit.log").exists());
    }
}
