//! Feature-flag file parsing and shell snippet generation
//!
//! flags.json is a flat map of flag name to value. It drives a generated
//! `flags.sh` of export lines that the user's rc files source; the rendering
//! is deterministic so re-runs never produce spurious diffs.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::types::{DotsmithError, DotsmithResult};

/// A single value from flags.json.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Number(i64),
    Text(String),
}

/// The parsed flags file. A BTreeMap keeps rendering order stable.
pub type FlagsFile = BTreeMap<String, FlagValue>;

pub fn parse_flags(json_str: &str) -> DotsmithResult<FlagsFile> {
    Ok(serde_json::from_str(json_str)?)
}

/// Render the flags as a shell snippet of `export DOT_*` lines.
pub fn render_flags(flags: &FlagsFile) -> String {
    let mut out = String::from("# Generated by dotsmith. Source this from your shell rc.\n");
    for (name, value) in flags {
        let key = shell_key(name);
        match value {
            FlagValue::Bool(enabled) => {
                out.push_str(&format!("export DOT_{}={}\n", key, u8::from(*enabled)));
            }
            FlagValue::Number(n) => {
                out.push_str(&format!("export DOT_{}={}\n", key, n));
            }
            FlagValue::Text(text) => {
                out.push_str(&format!("export DOT_{}='{}'\n", key, quote_single(text)));
            }
        }
    }
    out
}

/// Parse `flags_path` and write the rendered snippet as `flags.sh` under
/// `out_dir`. Returns the path written.
pub fn generate_flags_script(flags_path: &Path, out_dir: &Path) -> DotsmithResult<PathBuf> {
    let content = std::fs::read_to_string(flags_path).map_err(|e| {
        DotsmithError::Config(format!(
            "failed to read flags file {}: {}",
            flags_path.display(),
            e
        ))
    })?;
    let flags = parse_flags(&content)?;

    std::fs::create_dir_all(out_dir)?;
    let script_path = out_dir.join("flags.sh");
    std::fs::write(&script_path, render_flags(&flags))?;
    Ok(script_path)
}

/// Normalize a flag name into a shell-safe environment variable suffix.
fn shell_key(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Escape embedded single quotes for a single-quoted shell string.
fn quote_single(text: &str) -> String {
    text.replace('\'', r"'\''")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mixed_value_types() {
        let flags =
            parse_flags(r#"{"use-tmux": true, "font-size": 13, "theme": "gruvbox"}"#).unwrap();
        assert_eq!(flags.get("use-tmux"), Some(&FlagValue::Bool(true)));
        assert_eq!(flags.get("font-size"), Some(&FlagValue::Number(13)));
        assert_eq!(
            flags.get("theme"),
            Some(&FlagValue::Text("gruvbox".to_string()))
        );
    }

    #[test]
    fn renders_sorted_deterministic_exports() {
        let flags = parse_flags(
            r#"{"zsh-vi-mode": true, "theme": "gruvbox", "font-size": 13, "ligatures": false}"#,
        )
        .unwrap();

        let rendered = render_flags(&flags);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(
            lines,
            vec![
                "# Generated by dotsmith. Source this from your shell rc.",
                "export DOT_FONT_SIZE=13",
                "export DOT_LIGATURES=0",
                "export DOT_THEME='gruvbox'",
                "export DOT_ZSH_VI_MODE=1",
            ]
        );
        assert!(rendered.ends_with('\n'));
    }

    #[test]
    fn escapes_single_quotes_in_text_values() {
        let mut flags = FlagsFile::new();
        flags.insert(
            "greeting".to_string(),
            FlagValue::Text("it's me".to_string()),
        );
        let rendered = render_flags(&flags);
        assert!(rendered.contains(r"export DOT_GREETING='it'\''s me'"));
    }

    #[test]
    fn generates_script_file_in_out_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let flags_path = temp_dir.path().join("flags.json");
        std::fs::write(&flags_path, r#"{"use-tmux": true}"#).unwrap();

        let out_dir = temp_dir.path().join("generated");
        let script = generate_flags_script(&flags_path, &out_dir).unwrap();

        assert_eq!(script, out_dir.join("flags.sh"));
        let written = std::fs::read_to_string(script).unwrap();
        assert!(written.contains("export DOT_USE_TMUX=1"));
    }

    #[test]
    fn missing_flags_file_is_a_config_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = generate_flags_script(
            &temp_dir.path().join("absent.json"),
            temp_dir.path(),
        );
        assert!(matches!(result, Err(DotsmithError::Config(_))));
    }
}
