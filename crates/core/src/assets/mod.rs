use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::{MetronomeError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Texture,
    Font,
    Sound,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Texture => "texture",
            Self::Font => "font",
            Self::Sound => "sound",
        };
        f.write_str(name)
    }
}

/// Registry of the assets surfaces ask for when they are loaded.
///
/// Without a catalog every request is accepted and recorded so the host can
/// load them. With a catalog, requests for ids outside it fail.
#[derive(Debug, Default)]
pub struct AssetStore {
    catalog: Option<HashSet<String>>,
    required: BTreeMap<String, AssetKind>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog<I, T>(ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            catalog: Some(ids.into_iter().map(Into::into).collect()),
            required: BTreeMap::new(),
        }
    }

    pub fn require(&mut self, kind: AssetKind, id: &str) -> Result<()> {
        if let Some(catalog) = &self.catalog {
            if !catalog.contains(id) {
                return Err(MetronomeError::msg(format!("unknown {kind} asset `{id}`")));
            }
        }
        self.required.insert(id.to_string(), kind);
        Ok(())
    }

    /// Texture ids for the normal, hot and pressed states of a button.
    pub fn require_button(&mut self, texture: &str) -> Result<()> {
        for state in ["Normal", "Hot", "Pressed"] {
            self.require(AssetKind::Texture, &format!("Textures/Buttons/{texture}{state}"))?;
        }
        Ok(())
    }

    pub fn is_required(&self, id: &str) -> bool {
        self.required.contains_key(id)
    }

    pub fn required(&self) -> impl Iterator<Item = (&str, AssetKind)> {
        self.required.iter().map(|(id, kind)| (id.as_str(), *kind))
    }
}
