//! The yaml configuration store (`~/.jira.yml` by default) and the `config`
//! command group that edits it. Keys are addressed with dot notation, e.g.
//! `jira.default.project`.

use crate::prelude::{println, *};
use serde_yaml::{Mapping, Value};
use std::path::PathBuf;

use jtools_core::tracker::REPLY_HEADER_TEMPLATE;

#[derive(Debug, Clone)]
pub struct Config {
    path: PathBuf,
    root: Value,
}

/// Credentials resolved from the `auth.*` keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Auth {
    /// API token. `pat` tokens go out as a bearer header; otherwise the
    /// token is paired with `username` for basic auth.
    Api {
        username: String,
        token: String,
        pat: bool,
    },
    Basic {
        username: String,
        password: String,
    },
}

/// One entry of the `jira.issues` list: a field to pull into displays, or to
/// exclude from them, with an optional dotted render path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueFieldConfig {
    pub name: String,
    pub exclude: bool,
    pub render: Option<String>,
}

fn value_as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::String(text) => match text.to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn value_as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.parse().ok(),
        _ => None,
    }
}

fn set_nested(node: &mut Value, keys: &[&str], value: Value) {
    if !matches!(node, Value::Mapping(_)) {
        *node = Value::Mapping(Mapping::new());
    }
    if let Value::Mapping(map) = node {
        let key = Value::String(keys[0].to_string());
        if keys.len() == 1 {
            map.insert(key, value);
            return;
        }
        if !map.contains_key(&key) {
            map.insert(key.clone(), Value::Mapping(Mapping::new()));
        }
        if let Some(child) = map.get_mut(&key) {
            set_nested(child, &keys[1..], value);
        }
    }
}

fn clear_nested(node: &mut Value, keys: &[&str]) {
    if let Value::Mapping(map) = node {
        let key = Value::String(keys[0].to_string());
        if keys.len() == 1 {
            map.remove(&key);
        } else if let Some(child) = map.get_mut(&key) {
            clear_nested(child, &keys[1..]);
        }
    }
}

impl Config {
    pub fn load(global: &crate::Global) -> Result<Self> {
        let path = match &global.config {
            Some(path) => PathBuf::from(path),
            None => dirs_next::home_dir()
                .ok_or_else(|| eyre!("Unable to determine the home directory"))?
                .join(".jira.yml"),
        };
        Self::from_path(path)
    }

    /// Opens a store at `path`. A missing file reads as an empty store.
    pub fn from_path(path: PathBuf) -> Result<Self> {
        let root = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| f!("Failed to read {}", path.display()))?;
            serde_yaml::from_str(&contents)
                .with_context(|| f!("Invalid yaml in {}", path.display()))?
        } else {
            Value::Mapping(Mapping::new())
        };
        Ok(Self { path, root })
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| f!("Failed to create {}", parent.display()))?;
            }
        }
        let contents = serde_yaml::to_string(&self.root)?;
        std::fs::write(&self.path, contents)
            .with_context(|| f!("Failed to write {}", self.path.display()))
    }

    pub fn get(&self, key_path: &str) -> Option<&Value> {
        let mut current = &self.root;
        for key in key_path.split('.') {
            current = current.get(key)?;
        }
        Some(current)
    }

    pub fn set(&mut self, key_path: &str, value: Value) {
        let keys: Vec<&str> = key_path.split('.').collect();
        set_nested(&mut self.root, &keys, value);
    }

    pub fn clear(&mut self, key_path: &str) {
        let keys: Vec<&str> = key_path.split('.').collect();
        clear_nested(&mut self.root, &keys);
    }

    /// Pushes onto the sequence at `key_path`, creating it if absent.
    pub fn append(&mut self, key_path: &str, value: Value) -> Result<()> {
        let keys: Vec<&str> = key_path.split('.').collect();
        match self.get(key_path).cloned() {
            None | Some(Value::Null) => {
                set_nested(&mut self.root, &keys, Value::Sequence(vec![value]));
                Ok(())
            }
            Some(Value::Sequence(mut members)) => {
                members.push(value);
                set_nested(&mut self.root, &keys, Value::Sequence(members));
                Ok(())
            }
            Some(_) => Err(eyre!("{} is not a list", key_path)),
        }
    }

    pub fn get_str(&self, key_path: &str) -> Option<String> {
        self.get(key_path).and_then(|value| match value {
            Value::String(text) => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            Value::Bool(flag) => Some(flag.to_string()),
            _ => None,
        })
    }

    fn default_str(&self, key: &str, default: &str) -> String {
        self.get_str(&f!("jira.default.{}", key))
            .unwrap_or_else(|| default.to_string())
    }

    fn default_bool(&self, key: &str, default: bool) -> bool {
        self.get(&f!("jira.default.{}", key))
            .and_then(value_as_bool)
            .unwrap_or(default)
    }

    fn default_u64(&self, key: &str, default: u64) -> u64 {
        self.get(&f!("jira.default.{}", key))
            .and_then(value_as_u64)
            .unwrap_or(default)
    }

    pub fn server(&self) -> Result<String> {
        self.get_str("jira.server")
            .ok_or_else(|| eyre!(Error::MissingServer))
    }

    pub fn auth(&self) -> Result<Auth> {
        let kind = self
            .get_str("auth.type")
            .unwrap_or_else(|| "api".to_string());
        match kind.as_str() {
            "api" => {
                let token = self
                    .get_str("auth.key")
                    .ok_or(Error::MissingAuth("key", "api"))?;
                let pat = self
                    .get("auth.pat")
                    .and_then(value_as_bool)
                    .unwrap_or(false);
                let username = self.get_str("auth.username").unwrap_or_default();
                if !pat && username.is_empty() {
                    return Err(Error::MissingAuth("username", "api").into());
                }
                Ok(Auth::Api {
                    username,
                    token,
                    pat,
                })
            }
            "basic" => {
                let username = self
                    .get_str("auth.username")
                    .ok_or(Error::MissingAuth("username", "basic"))?;
                let password = self
                    .get_str("auth.password")
                    .ok_or(Error::MissingAuth("password", "basic"))?;
                Ok(Auth::Basic { username, password })
            }
            other => Err(Error::UnknownAuthType(other.to_string()).into()),
        }
    }

    pub fn default_project(&self) -> Option<String> {
        self.get_str("jira.default.project")
    }

    /// Minimum milliseconds between API calls; 0 disables rate limiting.
    pub fn call_interval(&self) -> u64 {
        self.default_u64("call_interval", 500)
    }

    /// Milliseconds to sleep when a call lands inside the interval.
    pub fn wait_time(&self) -> u64 {
        self.default_u64("wait_time", 500)
    }

    /// Whether issue text is converted between tracker markup and Markdown
    /// at the display/submit boundary.
    pub fn markdown_enabled(&self) -> bool {
        self.default_bool("markdown", false)
    }

    pub fn case_sensitive(&self) -> bool {
        self.default_bool("case_sensitive", true)
    }

    /// Lead-in template for quoted comment replies.
    pub fn reply_header(&self) -> String {
        self.default_str("replyto", REPLY_HEADER_TEMPLATE)
    }

    /// Whether the planning-poker extension endpoints are consulted.
    pub fn eausm_enabled(&self) -> bool {
        self.get("jira.eausm")
            .and_then(value_as_bool)
            .unwrap_or(true)
    }

    pub fn issue_field_config(&self) -> Vec<IssueFieldConfig> {
        let entries = match self.get("jira.issues") {
            Some(Value::Sequence(entries)) => entries,
            _ => return Vec::new(),
        };
        let mut configs = Vec::new();
        for entry in entries {
            let field = match entry.get("field") {
                Some(field) => field,
                None => continue,
            };
            let name = match field.get("name").and_then(|v| v.as_str()) {
                Some(name) => name,
                None => continue,
            };
            configs.push(IssueFieldConfig {
                name: name.to_string(),
                exclude: field.get("exclude").and_then(value_as_bool).unwrap_or(false),
                render: field
                    .get("render")
                    .and_then(|v| v.as_str())
                    .map(str::to_string),
            });
        }
        configs
    }

    /// Extra fields to pull into issue displays.
    pub fn requested_fields(&self) -> Vec<String> {
        self.issue_field_config()
            .into_iter()
            .filter(|cfg| !cfg.exclude)
            .map(|cfg| cfg.name)
            .collect()
    }

    /// Standard display sections to suppress.
    pub fn excluded_fields(&self) -> Vec<String> {
        self.issue_field_config()
            .into_iter()
            .filter(|cfg| cfg.exclude)
            .map(|cfg| cfg.name)
            .collect()
    }

    /// Dotted render path configured for a field, if any.
    pub fn render_for(&self, fieldname: &str) -> Option<String> {
        self.issue_field_config()
            .into_iter()
            .find(|cfg| cfg.name.eq_ignore_ascii_case(fieldname))
            .and_then(|cfg| cfg.render)
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::Null => "null".to_string(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}

#[derive(Debug, clap::Parser)]
#[command(name = "config")]
#[command(about = "Reads and writes the yaml configuration")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Display a configured value, if one is set
    Get { key: String },

    /// Set a configuration key to the value specified
    Set {
        key: String,
        value: String,

        /// Parse the value as yaml instead of storing a string
        #[arg(long, default_value = "false")]
        forced: bool,
    },

    /// Clear a configuration entry
    Clear { key: String },

    /// Append a value onto a configuration list
    Append { key: String, value: String },
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let mut config = Config::load(&global)?;

    match app.command {
        Commands::Get { key } => match config.get(&key) {
            None => println!("# {} is not set.", key),
            Some(value) => println!("{} = {}", key, render_value(value)),
        },
        Commands::Set { key, value, forced } => {
            let stored = if forced {
                serde_yaml::from_str(&value)
                    .with_context(|| f!("Failed to parse '{}' as yaml", value))?
            } else {
                Value::String(value.clone())
            };
            config.set(&key, stored);
            config.save()?;
            println!("{} = {}", key, value);
        }
        Commands::Clear { key } => {
            config.clear(&key);
            config.save()?;
            println!("# {} cleared", key);
        }
        Commands::Append { key, value } => {
            config.append(&key, Value::String(value.clone()))?;
            config.save()?;
            println!("{} = {}", key, value);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sandbox() -> (tempfile::TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::from_path(dir.path().join("jira.yml")).unwrap();
        (dir, config)
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let (_dir, config) = sandbox();

        assert!(config.get("jira.server").is_none());
        assert!(config.server().is_err());
    }

    #[test]
    fn test_set_save_reload_round_trip() {
        let (dir, mut config) = sandbox();

        config.set("jira.server", Value::String("https://jira.example.com".into()));
        config.set("auth.type", Value::String("api".into()));
        config.save().unwrap();

        let reloaded = Config::from_path(dir.path().join("jira.yml")).unwrap();
        assert_eq!(
            reloaded.server().unwrap(),
            "https://jira.example.com".to_string()
        );
        assert_eq!(reloaded.get_str("auth.type").as_deref(), Some("api"));
    }

    #[test]
    fn test_clear_removes_only_the_leaf() {
        let (_dir, mut config) = sandbox();

        config.set("jira.server", Value::String("https://a".into()));
        config.set("jira.default.project", Value::String("NET".into()));
        config.clear("jira.default.project");

        assert!(config.get("jira.default.project").is_none());
        assert_eq!(config.get_str("jira.server").as_deref(), Some("https://a"));
    }

    #[test]
    fn test_append_builds_sequences() {
        let (_dir, mut config) = sandbox();

        config.append("jira.favorites", Value::String("NET-1".into())).unwrap();
        config.append("jira.favorites", Value::String("NET-2".into())).unwrap();

        match config.get("jira.favorites") {
            Some(Value::Sequence(members)) => assert_eq!(members.len(), 2),
            other => panic!("expected a sequence, got {:?}", other),
        }

        config.set("jira.server", Value::String("https://a".into()));
        assert!(config.append("jira.server", Value::String("x".into())).is_err());
    }

    #[test]
    fn test_typed_defaults() {
        let (_dir, mut config) = sandbox();

        assert_eq!(config.call_interval(), 500);
        assert_eq!(config.wait_time(), 500);
        assert!(!config.markdown_enabled());
        assert!(config.case_sensitive());
        assert!(config.eausm_enabled());

        // Numbers survive being stored as strings.
        config.set("jira.default.call_interval", Value::String("250".into()));
        config.set("jira.default.markdown", Value::String("true".into()));
        config.set("jira.eausm", Value::Bool(false));

        assert_eq!(config.call_interval(), 250);
        assert!(config.markdown_enabled());
        assert!(!config.eausm_enabled());
    }

    #[test]
    fn test_auth_resolution() {
        let (_dir, mut config) = sandbox();

        assert!(config.auth().is_err());

        config.set("auth.key", Value::String("token".into()));
        assert!(config.auth().is_err());

        config.set("auth.username", Value::String("dev@example.com".into()));
        assert_eq!(
            config.auth().unwrap(),
            Auth::Api {
                username: "dev@example.com".to_string(),
                token: "token".to_string(),
                pat: false,
            }
        );

        config.set("auth.pat", Value::Bool(true));
        assert!(matches!(config.auth().unwrap(), Auth::Api { pat: true, .. }));

        config.set("auth.type", Value::String("kerberos".into()));
        assert!(config.auth().is_err());
    }

    #[test]
    fn test_issue_field_config() {
        let (dir, _) = sandbox();
        let yaml = "\
jira:
  issues:
    - field:
        name: Story Points
    - field:
        name: Epic Link
        exclude: true
    - field:
        name: Sprint
        render: \"0.name\"
";
        std::fs::write(dir.path().join("jira.yml"), yaml).unwrap();
        let config = Config::from_path(dir.path().join("jira.yml")).unwrap();

        assert_eq!(config.requested_fields(), vec!["Story Points", "Sprint"]);
        assert_eq!(config.excluded_fields(), vec!["Epic Link"]);
        assert_eq!(config.render_for("sprint").as_deref(), Some("0.name"));
        assert!(config.render_for("Story Points").is_none());
    }
}
