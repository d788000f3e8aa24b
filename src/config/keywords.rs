// src/config/keywords.rs
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::Path;

/// Built-in scan list, used when no keyword file is configured.
pub const DEFAULT_KEYWORDS: [&str; 12] = [
    "basil mask viral",
    "kojic acid tiktok",
    "peptide lotion trend",
    "celsius energy drink",
    "crocs comfort 2026",
    "humanoid robot home",
    "ozempic alternative natural",
    "pickleball ontario",
    "rucking trend canada",
    "tim hortons viral item",
    "canadian cottage trend",
    "solar lawn mower",
];

pub fn default_keywords() -> Vec<String> {
    DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect()
}

/// Load keywords from an explicit path. Supports TOML (`keywords = [...]`) or a JSON array.
pub fn load_keywords_from(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading keywords from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let list = parse_keywords(&content, ext.as_str())?;
    if list.is_empty() {
        return Err(anyhow!("keyword file {} is empty", path.display()));
    }
    Ok(list)
}

fn parse_keywords(s: &str, hint_ext: &str) -> Result<Vec<String>> {
    let try_toml = hint_ext == "toml" || s.contains("keywords");
    if try_toml {
        if let Ok(v) = parse_toml(s) {
            return Ok(v);
        }
    }
    if let Ok(v) = parse_json(s) {
        return Ok(v);
    }
    if !try_toml {
        if let Ok(v) = parse_toml(s) {
            return Ok(v);
        }
    }
    Err(anyhow!("unsupported keyword file format"))
}

fn parse_toml(s: &str) -> Result<Vec<String>> {
    #[derive(serde::Deserialize)]
    struct TomlKeywords {
        keywords: Vec<String>,
    }
    let v: TomlKeywords = toml::from_str(s)?;
    Ok(clean_list(v.keywords))
}

fn parse_json(s: &str) -> Result<Vec<String>> {
    let v: Vec<String> = serde_json::from_str(s)?;
    Ok(clean_list(v))
}

/// Trim, drop empties and duplicates. Scan order is significant, so first occurrence wins.
fn clean_list(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for it in items {
        let t = it.trim();
        if !t.is_empty() && !out.iter().any(|k| k == t) {
            out.push(t.to_string());
        }
    }
    out
}
