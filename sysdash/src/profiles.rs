//! Saved API endpoints: a JSON map of profile name -> { url, tls_ca }.
//! Stored at $XDG_CONFIG_HOME/sysdash/profiles.json (fallback ~/.config/sysdash/profiles.json).

use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, io, path::PathBuf};

const PROFILES_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ProfileEntry {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls_ca: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProfilesFile {
    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileEntry>,
    #[serde(default)]
    pub version: u32,
}

impl ProfilesFile {
    /// Insert or replace `name`. Returns false when the stored entry is
    /// already identical.
    pub fn upsert(&mut self, name: &str, entry: ProfileEntry) -> bool {
        if self.profiles.get(name) == Some(&entry) {
            return false;
        }
        self.profiles.insert(name.to_string(), entry);
        true
    }
}

pub fn config_dir() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        PathBuf::from(xdg).join("sysdash")
    } else {
        dirs_next::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sysdash")
    }
}

pub fn profiles_path() -> PathBuf {
    config_dir().join("profiles.json")
}

/// Missing or unreadable files load as empty.
pub fn load_profiles() -> ProfilesFile {
    let path = profiles_path();
    match fs::read_to_string(&path) {
        Ok(s) => serde_json::from_str(&s).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "ignoring malformed profiles file");
            ProfilesFile::default()
        }),
        Err(_) => ProfilesFile::default(),
    }
}

pub fn save_profiles(p: &ProfilesFile) -> io::Result<()> {
    let path = profiles_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut p = p.clone();
    p.version = PROFILES_VERSION;
    let data = serde_json::to_vec_pretty(&p).map_err(io::Error::other)?;
    fs::write(path, data)
}

#[derive(Debug, PartialEq, Eq)]
pub enum ResolveProfile {
    /// Use the URL given on the command line (url, tls_ca).
    Direct(String, Option<String>),
    /// Loaded from an existing profile entry (url, tls_ca).
    Loaded(String, Option<String>),
    /// Ask the user to pick one of these profile names.
    PromptSelect(Vec<String>),
    /// Ask the user for the URL of a new profile with this name.
    PromptCreate(String),
    /// Nothing to connect to.
    None,
}

pub struct ProfileRequest {
    pub profile_name: Option<String>,
    pub url: Option<String>,
    pub tls_ca: Option<String>,
}

impl ProfileRequest {
    pub fn resolve(self, pf: &ProfilesFile) -> ResolveProfile {
        match (self.url, self.profile_name) {
            (Some(u), _) => ResolveProfile::Direct(u, self.tls_ca),
            (None, Some(name)) => match pf.profiles.get(&name) {
                // an explicit --tls-ca wins over the stored one
                Some(entry) => ResolveProfile::Loaded(
                    entry.url.clone(),
                    self.tls_ca.or_else(|| entry.tls_ca.clone()),
                ),
                None => ResolveProfile::PromptCreate(name),
            },
            (None, None) if pf.profiles.is_empty() => ResolveProfile::None,
            (None, None) => ResolveProfile::PromptSelect(pf.profiles.keys().cloned().collect()),
        }
    }
}
