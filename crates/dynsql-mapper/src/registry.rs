//! Mapper-file registry.
//!
//! A mapper file is an XML document whose top-level children are
//! `<query id="...">` elements; the file stem names the module:
//!
//! ```xml
//! <mapper>
//!   <query id="find_by_status">
//!     SELECT * FROM jobs<where><if test="status">status = :status</if></where>
//!   </query>
//! </mapper>
//! ```
//!
//! Fragments are stored as raw text, markup included, and parsed into
//! a template at call time. A `<query>` nested deeper than the top
//! level is ignored, as is one without an id.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, warn};

use crate::error::{MapperError, Result};

/// Named query fragments grouped by module.
#[derive(Debug, Clone, Default)]
pub struct MapperRegistry {
    modules: HashMap<String, HashMap<String, String>>,
}

impl MapperRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every `*.xml` file directly under `dir`. Subdirectories
    /// are not scanned. A malformed file fails the whole load.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let mut registry = Self::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("xml") {
                continue;
            }
            registry.load_file(&path)?;
        }
        Ok(registry)
    }

    /// Loads one mapper file, merging its queries into the module
    /// named after the file stem. A duplicate id replaces the earlier
    /// fragment.
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        let module = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let source = fs::read_to_string(path)?;
        let queries = parse_mapper(&source).map_err(|message| MapperError::Malformed {
            path: path.to_path_buf(),
            message,
        })?;
        debug!(module = %module, count = queries.len(), "Loaded mapper file");
        self.modules.entry(module).or_default().extend(queries);
        Ok(())
    }

    /// Returns the raw fragment registered under `module`/`id`.
    #[must_use]
    pub fn lookup(&self, module: &str, id: &str) -> Option<&str> {
        self.modules.get(module)?.get(id).map(String::as_str)
    }

    /// Returns the module names in sorted order.
    #[must_use]
    pub fn modules(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.modules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of registered queries across all modules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.values().map(HashMap::len).sum()
    }

    /// Returns true if no queries are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Extracts `(id, fragment)` pairs from depth-1 `<query>` elements.
fn parse_mapper(source: &str) -> std::result::Result<Vec<(String, String)>, String> {
    let mut reader = Reader::from_str(source);
    let mut queries = Vec::new();
    let mut depth = 0usize;

    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Start(start) => {
                depth += 1;
                if depth == 2 && start.name().as_ref() == b"query" {
                    match query_id(&start)? {
                        Some(id) => {
                            let fragment = reader
                                .read_text(start.name())
                                .map_err(|e| e.to_string())?
                                .into_owned();
                            depth -= 1;
                            queries.push((id, fragment));
                        }
                        None => {
                            warn!("query element without id attribute, skipping");
                        }
                    }
                }
            }
            Event::Empty(start) => {
                if depth == 1 && start.name().as_ref() == b"query" {
                    match query_id(&start)? {
                        Some(id) => queries.push((id, String::new())),
                        None => warn!("query element without id attribute, skipping"),
                    }
                }
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(queries)
}

fn query_id(start: &BytesStart<'_>) -> std::result::Result<Option<String>, String> {
    start
        .try_get_attribute("id")
        .map_err(|e| e.to_string())?
        .map(|attr| {
            attr.unescape_value()
                .map(|value| value.into_owned())
                .map_err(|e| e.to_string())
        })
        .transpose()
}
