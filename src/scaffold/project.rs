//! Inputs of `shipit new`, defaulted and validated.

use crate::config::ScaffoldSection;
use crate::errors::ScaffoldError;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

pub const DEFAULT_VERSION: &str = "0.1.0-SNAPSHOT";
pub const DEFAULT_GROUP_ID: &str = "org.example";
const DEFAULT_DESCRIPTION: &str = "An ImageJ plugin powered by DJL and ONNX Runtime.";

static JAVA_IDENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("valid static regex"));
static ARTIFACT_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]*$").expect("valid static regex"));

const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally",
    "float", "for", "goto", "if", "implements", "import", "instanceof", "int", "interface",
    "long", "native", "new", "package", "private", "protected", "public", "return", "short",
    "static", "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "try", "void", "volatile", "while", "true", "false", "null",
];

/// Raw answers from the command line; `None` means "use the default".
#[derive(Debug, Clone, Default)]
pub struct ProjectInput {
    pub name: String,
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub package: Option<String>,
    pub plugin_class: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub email: Option<String>,
    pub url: Option<String>,
}

/// Fully resolved project values substituted into the templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginProject {
    pub project_name: String,
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub package: String,
    pub plugin_class: String,
    pub description: String,
    pub author: String,
    pub email: String,
    pub url: String,
}

impl PluginProject {
    /// Fill in defaults (CLI first, then `[scaffold]`) and validate.
    pub fn resolve(input: ProjectInput, defaults: &ScaffoldSection) -> Result<Self, ScaffoldError> {
        let project_name = input.name.trim().to_string();
        if project_name.is_empty() {
            return Err(invalid("name", &project_name, "must not be empty"));
        }

        let group_id = input
            .group_id
            .or_else(|| defaults.group_id.clone())
            .unwrap_or_else(|| DEFAULT_GROUP_ID.to_string());
        let artifact_id = input.artifact_id.unwrap_or_else(|| slugify(&project_name));
        let package = input
            .package
            .unwrap_or_else(|| default_package(&group_id, &artifact_id));
        let plugin_class = input
            .plugin_class
            .unwrap_or_else(|| default_plugin_class(&artifact_id));
        let author = input
            .author
            .or_else(|| defaults.author.clone())
            .or_else(|| std::env::var("USER").ok())
            .or_else(|| std::env::var("USERNAME").ok())
            .unwrap_or_else(|| "author".to_string());

        let project = Self {
            project_name,
            group_id,
            artifact_id,
            version: input.version.unwrap_or_else(|| DEFAULT_VERSION.to_string()),
            package,
            plugin_class,
            description: input
                .description
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            author,
            email: input
                .email
                .or_else(|| defaults.email.clone())
                .unwrap_or_default(),
            url: input.url.or_else(|| defaults.url.clone()).unwrap_or_default(),
        };
        project.validate()?;
        Ok(project)
    }

    fn validate(&self) -> Result<(), ScaffoldError> {
        check_dotted("group id", &self.group_id)?;
        check_dotted("package", &self.package)?;
        if !is_java_ident(&self.plugin_class) {
            return Err(invalid(
                "plugin class",
                &self.plugin_class,
                "must be a Java identifier",
            ));
        }
        if !ARTIFACT_ID.is_match(&self.artifact_id) {
            return Err(invalid(
                "artifact id",
                &self.artifact_id,
                "use letters, digits, '-', '_' or '.'",
            ));
        }
        if self.version.is_empty() || self.version.contains(char::is_whitespace) {
            return Err(invalid("version", &self.version, "must be non-empty without spaces"));
        }

        for (field, value) in [
            ("version", &self.version),
            ("name", &self.project_name),
            ("description", &self.description),
            ("author", &self.author),
            ("email", &self.email),
            ("url", &self.url),
        ] {
            if value.contains(['"', '\\', '<', '>', '&']) || value.contains(char::is_control) {
                return Err(invalid(
                    field,
                    value,
                    "must not contain quotes, backslashes, '<', '>', '&' or control characters",
                ));
            }
        }
        Ok(())
    }

    /// Template variables keyed by placeholder name.
    pub fn variables(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("project_name", self.project_name.clone()),
            ("group_id", self.group_id.clone()),
            ("artifact_id", self.artifact_id.clone()),
            ("version", self.version.clone()),
            ("package", self.package.clone()),
            ("package_path", self.package_path()),
            ("plugin_class", self.plugin_class.clone()),
            ("description", self.description.clone()),
            ("author", self.author.clone()),
            ("author_id", author_id(&self.author)),
            ("email", self.email.clone()),
            ("url", self.url.clone()),
        ])
    }

    /// `cn.ac.cns.nia` -> `cn/ac/cns/nia`
    pub fn package_path(&self) -> String {
        self.package.replace('.', "/")
    }
}

fn invalid(field: &'static str, value: &str, reason: &'static str) -> ScaffoldError {
    ScaffoldError::InvalidInput {
        field,
        value: value.to_string(),
        reason,
    }
}

fn is_java_ident(s: &str) -> bool {
    JAVA_IDENT.is_match(s) && !JAVA_KEYWORDS.contains(&s)
}

fn check_dotted(field: &'static str, value: &str) -> Result<(), ScaffoldError> {
    if value.split('.').all(is_java_ident) {
        Ok(())
    } else {
        Err(invalid(field, value, "must be dot-separated Java identifiers"))
    }
}

/// "NIA Neural Assistant" -> "nia-neural-assistant"
fn slugify(name: &str) -> String {
    let mut slug = String::new();
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-').to_string();
    if slug.is_empty() {
        "plugin".to_string()
    } else {
        slug
    }
}

fn first_word(artifact_id: &str) -> String {
    artifact_id
        .split(['-', '_', '.'])
        .find(|w| !w.is_empty())
        .unwrap_or("plugin")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

fn default_package(group_id: &str, artifact_id: &str) -> String {
    let mut word = first_word(artifact_id).to_ascii_lowercase();
    if !is_java_ident(&word) {
        word = format!("p{}", word);
    }
    format!("{}.{}", group_id, word)
}

fn default_plugin_class(artifact_id: &str) -> String {
    let word = first_word(artifact_id).to_ascii_lowercase();
    let mut chars = word.chars();
    let pascal = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => c.to_ascii_uppercase().to_string() + chars.as_str(),
        _ => format!("P{}", word),
    };
    format!("{}_Plugin", pascal)
}

fn author_id(author: &str) -> String {
    author
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
