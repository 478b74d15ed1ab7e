//! Read-only view of the per-user registry used for desktop detection.

use std::collections::BTreeMap;

/// Registry reads needed to resolve the active virtual desktop.
///
/// Paths are relative to the reader's root hive (`HKEY_CURRENT_USER` for
/// desktop detection). Every read is fallible and
/// reports failure as `None` / empty; nothing here may panic or propagate.
pub trait RegistryReader {
    /// A `REG_BINARY` value.
    fn binary(&self, path: &str, value: &str) -> Option<Vec<u8>>;

    /// A `REG_SZ` value.
    fn string(&self, path: &str, value: &str) -> Option<String>;

    /// Names of the immediate subkeys of `path`.
    fn subkeys(&self, path: &str) -> Vec<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Value {
    Binary(Vec<u8>),
    String(String),
}

/// In-memory registry, for non-Windows builds and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryRegistry {
    values: BTreeMap<(String, String), Value>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_binary(&mut self, path: &str, value: &str, data: impl Into<Vec<u8>>) -> &mut Self {
        self.values
            .insert(key(path, value), Value::Binary(data.into()));
        self
    }

    pub fn set_string(&mut self, path: &str, value: &str, data: impl Into<String>) -> &mut Self {
        self.values
            .insert(key(path, value), Value::String(data.into()));
        self
    }

    pub fn remove(&mut self, path: &str, value: &str) -> &mut Self {
        self.values.remove(&key(path, value));
        self
    }
}

// Registry paths are case-insensitive.
fn key(path: &str, value: &str) -> (String, String) {
    (path.to_ascii_lowercase(), value.to_ascii_lowercase())
}

impl RegistryReader for MemoryRegistry {
    fn binary(&self, path: &str, value: &str) -> Option<Vec<u8>> {
        match self.values.get(&key(path, value)) {
            Some(Value::Binary(b)) => Some(b.clone()),
            _ => None,
        }
    }

    fn string(&self, path: &str, value: &str) -> Option<String> {
        match self.values.get(&key(path, value)) {
            Some(Value::String(s)) => Some(s.clone()),
            _ => None,
        }
    }

    fn subkeys(&self, path: &str) -> Vec<String> {
        let prefix = format!("{}\\", path.to_ascii_lowercase());
        let mut names: Vec<String> = self
            .values
            .keys()
            .filter_map(|(p, _)| p.strip_prefix(&prefix))
            .filter_map(|rest| rest.split('\\').next())
            .map(str::to_string)
            .collect();
        names.sort();
        names.dedup();
        names
    }
}
