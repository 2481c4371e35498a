//! Parse-once template store

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, warn};

use super::handle::{HandleBuilder, TemplateHandle};
use super::source::{ParseStatus, TemplateDefinition, TemplateOrigin, TemplateSource};
use crate::error::ParseResult;

/// Identity of a cached template set
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct TemplateSet {
    layout: String,
    fragments: Vec<String>,
}

#[derive(Default)]
struct StoreState {
    handles: HashMap<TemplateSet, TemplateHandle>,
    definitions: Vec<TemplateDefinition>,
}

/// Loads template sets through a [`TemplateOrigin`] and keeps them compiled.
///
/// Build one store at startup and share it (for example behind an `Arc`);
/// each distinct layout + fragments set is read and parsed at most once.
pub struct TemplateStore {
    origin: TemplateOrigin,
    state: RwLock<StoreState>,
}

impl TemplateStore {
    /// Create a store resolving identifiers through `origin`
    pub fn new(origin: TemplateOrigin) -> Self {
        Self {
            origin,
            state: RwLock::new(StoreState::default()),
        }
    }

    /// Store reading templates from files under `dir`
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self::new(TemplateOrigin::Directory(dir.into()))
    }

    /// Store reading templates compiled into the binary
    pub fn bundled() -> Self {
        Self::new(TemplateOrigin::Bundled)
    }

    pub fn origin(&self) -> &TemplateOrigin {
        &self.origin
    }

    /// Load a layout and its fragments as one executable set.
    ///
    /// The layout is parsed first; if it fails, no fragment is touched. The
    /// first fragment fills the layout's content slot. A set that was loaded
    /// before is returned from the cache without reading any source.
    pub fn load<S: AsRef<str>>(&self, layout: &str, fragments: &[S]) -> ParseResult<TemplateHandle> {
        let key = TemplateSet {
            layout: layout.to_string(),
            fragments: fragments.iter().map(|f| f.as_ref().to_string()).collect(),
        };

        if let Some(handle) = self.read_state().handles.get(&key) {
            debug!(layout = %layout, "Template set served from cache");
            return Ok(handle.clone());
        }

        let layout_source = self.origin.resolve(layout);
        let mut builder =
            self.parse_source(&layout_source, |name, text| HandleBuilder::with_layout(name, text))?;

        for fragment in &key.fragments {
            let source = self.origin.resolve(fragment);
            self.parse_source(&source, |name, text| builder.add_fragment(name, text))?;
        }

        let handle = builder.finish();
        let mut state = self.write_state();
        let cached = state.handles.entry(key).or_insert(handle).clone();

        info!(
            layout = %cached.layout(),
            fragments = ?cached.fragments(),
            "Template set loaded"
        );

        Ok(cached)
    }

    /// Copy `base` and parse extra fragments into the copy.
    ///
    /// The first new fragment replaces the content slot of the copy; `base`
    /// keeps rendering exactly as before. Composed handles are not cached.
    pub fn compose<S: AsRef<str>>(
        &self,
        base: &TemplateHandle,
        fragments: &[S],
    ) -> ParseResult<TemplateHandle> {
        let mut builder = HandleBuilder::from_handle(base);

        for fragment in fragments {
            let source = self.origin.resolve(fragment.as_ref());
            self.parse_source(&source, |name, text| builder.add_fragment(name, text))?;
        }

        let handle = builder.finish();
        debug!(
            layout = %handle.layout(),
            fragments = ?handle.fragments(),
            "Composed template set"
        );

        Ok(handle)
    }

    /// Every source the store has attempted to parse, with its outcome
    pub fn definitions(&self) -> Vec<TemplateDefinition> {
        self.read_state().definitions.clone()
    }

    /// Number of cached template sets
    pub fn cached_sets(&self) -> usize {
        self.read_state().handles.len()
    }

    fn parse_source<T>(
        &self,
        source: &TemplateSource,
        parse: impl FnOnce(&str, &str) -> ParseResult<T>,
    ) -> ParseResult<T> {
        let name = source.name();
        let result = source.read().and_then(|text| parse(&name, &text));

        let status = match &result {
            Ok(_) => {
                debug!(template = %name, source = %source, "Parsed template");
                ParseStatus::Parsed
            }
            Err(e) => {
                warn!(template = %name, source = %source, error = %e, "Failed to load template");
                ParseStatus::Failed(e.to_string())
            }
        };

        self.record(TemplateDefinition {
            name,
            source: source.clone(),
            status,
        });

        result
    }

    fn record(&self, definition: TemplateDefinition) {
        let mut state = self.write_state();
        match state
            .definitions
            .iter_mut()
            .find(|existing| existing.source == definition.source)
        {
            Some(existing) => *existing = definition,
            None => state.definitions.push(definition),
        }
    }

    // Handles are immutable once inserted, so a poisoned lock still holds
    // consistent data.
    fn read_state(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
