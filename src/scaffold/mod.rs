//! `shipit new`: generate an ImageJ plugin project from embedded templates.
//!
//! Templates live under `templates/plugin/` and are compiled into the binary.
//! File contents use `{{snake_case}}` placeholders; names the project does not
//! define (such as the release-time `{{VERSION}}`) are left in place. Path
//! segments are mapped as follows:
//!
//! | Template segment | Output |
//! |------------------|--------|
//! | `__package_path__` | package as directories (`cn/ac/cns/nia`) |
//! | `__plugin_class__` | plugin class name |
//! | `_name` | `.name` |

pub mod project;

pub use project::{PluginProject, ProjectInput};

use crate::errors::ScaffoldError;
use regex::{Captures, Regex};
use rust_embed::RustEmbed;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/templates/plugin/"]
struct PluginTemplates;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([a-z_]+)\}\}").expect("valid static regex"));

/// Replace every known `{{key}}`; unknown keys stay verbatim.
pub fn render(template: &str, vars: &BTreeMap<&'static str, String>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| match vars.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Output path (relative to the project root) of an embedded template file.
pub fn output_path(template_path: &str, project: &PluginProject) -> PathBuf {
    let mut out = PathBuf::new();
    for segment in template_path.split('/') {
        if segment == "__package_path__" {
            out.extend(project.package.split('.'));
            continue;
        }
        let mapped = segment.replace("__plugin_class__", &project.plugin_class);
        if let Some(rest) = mapped.strip_prefix('_')
            && !rest.starts_with('_')
        {
            out.push(format!(".{}", rest));
        } else {
            out.push(mapped);
        }
    }
    out
}

/// Template paths in a stable order.
pub fn template_files() -> Vec<String> {
    let mut files: Vec<String> = PluginTemplates::iter().map(|p| p.into_owned()).collect();
    files.sort();
    files
}

fn is_empty_dir(dir: &Path) -> bool {
    std::fs::read_dir(dir)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(true)
}

/// Write the project into `target`, returning the created files (relative).
///
/// A non-empty `target` is refused unless `force` is set; existing files are
/// then overwritten.
pub fn generate(
    project: &PluginProject,
    target: &Path,
    force: bool,
) -> Result<Vec<PathBuf>, ScaffoldError> {
    if target.exists() && !force && !is_empty_dir(target) {
        return Err(ScaffoldError::TargetNotEmpty {
            path: target.to_path_buf(),
        });
    }

    let vars = project.variables();
    let mut created = Vec::new();

    for template_path in template_files() {
        let Some(file) = PluginTemplates::get(&template_path) else {
            continue;
        };
        let relative = output_path(&template_path, project);
        let destination = target.join(&relative);

        let content = render(&String::from_utf8_lossy(&file.data), &vars);

        if let Some(parent) = destination.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ScaffoldError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(&destination, content).map_err(|source| ScaffoldError::Write {
            path: destination.clone(),
            source,
        })?;

        tracing::debug!(file = %relative.display(), "created");
        created.push(relative);
    }

    tracing::info!(
        target = %target.display(),
        files = created.len(),
        "project generated"
    );
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ScaffoldSection, ShipitToml};
    use crate::release::manifest::project_version;
    use tempfile::tempdir;

    fn nia() -> PluginProject {
        PluginProject::resolve(
            ProjectInput {
                name: "NIA Neural Inference Assistant".into(),
                group_id: Some("cn.ac.cns".into()),
                artifact_id: Some("nia-imagej".into()),
                author: Some("Kui Wang".into()),
                email: Some("k@cns.ac.cn".into()),
                url: Some("https://www.cns.ac.cn".into()),
                ..Default::default()
            },
            &ScaffoldSection::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_render_keeps_unknown_placeholders() {
        let vars = BTreeMap::from([("name", "nia".to_string())]);
        assert_eq!(
            render("{{name}} {{VERSION}} {{other}} ${maven.prop}", &vars),
            "nia {{VERSION}} {{other}} ${maven.prop}"
        );
    }

    #[test]
    fn test_output_path_mapping() {
        let project = nia();
        assert_eq!(
            output_path("src/main/java/__package_path__/__plugin_class__.java", &project),
            PathBuf::from("src/main/java/cn/ac/cns/nia/Nia_Plugin.java")
        );
        assert_eq!(output_path("_gitignore", &project), PathBuf::from(".gitignore"));
        assert_eq!(
            output_path("_shipit/shipit.toml", &project),
            PathBuf::from(".shipit/shipit.toml")
        );
        assert_eq!(output_path("README.md", &project), PathBuf::from("README.md"));
    }

    #[test]
    fn test_generate_full_project() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("nia");
        let created = generate(&nia(), &target, false).unwrap();

        assert_eq!(created.len(), template_files().len());
        for expected in [
            "pom.xml",
            "README.md",
            ".gitignore",
            ".zenodo.template.json",
            ".shipit/shipit.toml",
            "src/main/java/cn/ac/cns/nia/Nia_Plugin.java",
            "src/main/java/cn/ac/cns/nia/engine/InferenceEngine.java",
            "src/main/resources/PUT_YOUR_MODEL_HERE.txt",
        ] {
            assert!(target.join(expected).is_file(), "missing {}", expected);
        }

        let pom = std::fs::read_to_string(target.join("pom.xml")).unwrap();
        assert_eq!(project_version(&pom).as_deref(), Some("0.1.0-SNAPSHOT"));
        assert!(pom.contains("<artifactId>nia-imagej</artifactId>"));
        assert!(pom.contains("${djl.version}"));
        assert!(pom.contains("cn.ac.cns.nia.internal.djl"));

        let plugin =
            std::fs::read_to_string(target.join("src/main/java/cn/ac/cns/nia/Nia_Plugin.java"))
                .unwrap();
        assert!(plugin.starts_with("package cn.ac.cns.nia;"));
        assert!(plugin.contains("public class Nia_Plugin implements PlugIn"));

        let zenodo = std::fs::read_to_string(target.join(".zenodo.template.json")).unwrap();
        assert!(zenodo.contains("{{VERSION}}"));

        let config = ShipitToml::load(&target.join(".shipit/shipit.toml")).unwrap();
        assert_eq!(
            config.project.name.as_deref(),
            Some("NIA Neural Inference Assistant")
        );
        assert!(config.sequences.contains_key("verify"));
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_generated_metadata_template_is_valid_json_after_release_render() {
        let dir = tempdir().unwrap();
        generate(&nia(), dir.path(), false).unwrap();
        let template = std::fs::read_to_string(dir.path().join(".zenodo.template.json")).unwrap();
        let rendered = template.replace("{{VERSION}}", "1.0.0");
        let json: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(json["version"], "1.0.0");
    }

    #[test]
    fn test_non_empty_target_needs_force() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "keep").unwrap();

        let err = generate(&nia(), dir.path(), false).unwrap_err();
        assert!(matches!(err, ScaffoldError::TargetNotEmpty { .. }));
        assert!(!dir.path().join("pom.xml").exists());

        generate(&nia(), dir.path(), true).unwrap();
        assert!(dir.path().join("pom.xml").exists());
        assert!(dir.path().join("notes.txt").exists());
    }
}
