//! The concrete build and git sequences of a release.

use crate::config::ReleaseSection;
use crate::sequence::{Sequence, Step};
use std::path::{Path, PathBuf};

const MVND: &str = "mvnd";
const MVN: &str = "mvn";

/// Locate an executable on `PATH`.
pub fn find_on_path(program: &str) -> Option<PathBuf> {
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths).find_map(|dir| executable_in(&dir, program))
}

fn executable_in(dir: &Path, program: &str) -> Option<PathBuf> {
    let candidate = dir.join(program);
    if candidate.is_file() {
        return Some(candidate);
    }
    #[cfg(windows)]
    for ext in ["exe", "cmd", "bat"] {
        let candidate = dir.join(format!("{}.{}", program, ext));
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}

/// Build command: explicit override, else `mvnd` when installed, else `mvn`.
pub fn resolve_build_command(override_cmd: Option<String>) -> String {
    if let Some(cmd) = override_cmd {
        return cmd;
    }
    let tool = if find_on_path(MVND).is_some() { MVND } else { MVN };
    tracing::debug!(tool, "auto-detected build tool");
    format!("{} clean package", tool)
}

/// Single fail-fast build step.
pub fn build_sequence(build_cmd: &str) -> Sequence {
    Sequence::new("Building project", "Build succeeded").step(build_cmd)
}

/// Tag name for `version`.
pub fn tag_name(release: &ReleaseSection, version: &str) -> String {
    format!("{}{}", release.tag_prefix, version)
}

/// Commit message with `{tag}` and `{version}` filled in.
pub fn commit_message(release: &ReleaseSection, tag: &str, version: &str) -> String {
    release
        .commit_message
        .replace("{tag}", tag)
        .replace("{version}", version)
}

/// Push the branch, replace any existing tag locally and remotely, then push
/// the fresh annotated tag.
pub fn tag_sequence(release: &ReleaseSection, tag: &str) -> Sequence {
    let remote = release.remote.as_str();
    Sequence::new(format!("Tagging {}", tag), format!("Pushed {}", tag))
        .push(Step::argv(["git", "push", remote, release.branch.as_str()]))
        .push(Step {
            allow_failure: true,
            ..Step::argv(["git", "tag", "-d", tag])
        })
        .push(Step {
            allow_failure: true,
            ..Step::argv(["git".to_string(), "push".into(), remote.into(), format!(":refs/tags/{}", tag)])
        })
        .push(Step::argv([
            "git".to_string(),
            "tag".into(),
            "-a".into(),
            tag.into(),
            "-m".into(),
            format!("Release {}", tag),
        ]))
        .push(Step::argv(["git", "push", remote, tag]))
}

/// Argument vectors of the quiet staging commands run before tagging.
pub fn commit_commands(files: &[PathBuf], message: &str) -> [Vec<String>; 2] {
    let mut add = vec!["git".to_string(), "add".to_string()];
    add.extend(files.iter().map(|f| f.to_string_lossy().into_owned()));
    let commit = vec![
        "git".to_string(),
        "commit".to_string(),
        "-m".to_string(),
        message.to_string(),
    ];
    [add, commit]
}
