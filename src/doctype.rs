use std::collections::HashMap;
use std::path::Path;

use crate::config;

/// Bidirectional map between document-type names and the codes the backend
/// expects. Built from `name: code` lines; an absent definitions file yields
/// an empty registry and the hardcoded default code is used downstream.
#[derive(Debug, Default)]
pub struct DocTypeRegistry {
    by_name: HashMap<String, String>,
    by_code: HashMap<String, String>,
}

impl DocTypeRegistry {
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents),
            Err(_) => {
                tracing::debug!("No document-type definitions at {}", path.display());
                Self::default()
            }
        }
    }

    pub fn parse(contents: &str) -> Self {
        let mut by_name = HashMap::new();
        let mut by_code = HashMap::new();

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let Some((name, code)) = line.split_once(':') else {
                continue;
            };
            let (name, code) = (name.trim(), code.trim());
            if name.is_empty() || code.is_empty() {
                continue;
            }
            by_name.insert(name.to_lowercase(), code.to_string());
            by_code.insert(code.to_string(), name.to_string());
        }

        Self { by_name, by_code }
    }

    pub fn code_for(&self, name: &str) -> Option<&str> {
        self.by_name.get(&name.to_lowercase()).map(String::as_str)
    }

    /// Code for `name`, falling back to the hardcoded default.
    pub fn resolve(&self, name: &str) -> String {
        self.code_for(name)
            .unwrap_or(config::DEFAULT_DOC_TYPE)
            .to_string()
    }

    pub fn name_for(&self, code: &str) -> Option<&str> {
        self.by_code.get(code).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// (name, code) pairs sorted by name, for display.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut out: Vec<(String, String)> = self
            .by_code
            .iter()
            .map(|(code, name)| (name.clone(), code.clone()))
            .collect();
        out.sort();
        out
    }
}
