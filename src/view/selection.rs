//! Location and desk selection.
//!
//! DESIGN
//! ======
//! A [`LocationSelection`] always names a floor that exists under the
//! selected library. Invalid or missing ids fall back to the first library
//! and then to that library's first floor, so a stale URL never yields an
//! empty dashboard.

use serde::Serialize;

use crate::desk::DeskState;
use crate::registry::{Floor, Registry};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSelection {
    pub library_id: String,
    pub floor_id: String,
}

impl LocationSelection {
    /// Resolve requested ids against `registry`, recovering silently from
    /// unknown or mismatched values.
    #[must_use]
    pub fn resolve(registry: &Registry, library: Option<&str>, floor: Option<&str>) -> Self {
        let library_id = registry.libraries().first().map(|l| l.id).unwrap_or_default();
        let mut selection = Self { library_id: String::new(), floor_id: String::new() };
        selection.set_library(registry, library_id);

        // EDGE: invalid ids leave the first-library defaults in place.
        if let Some(library) = library {
            selection.set_library(registry, library);
        }
        if let Some(floor) = floor {
            selection.set_floor(registry, floor);
        }
        selection
    }

    /// Switch library. Unknown or unchanged ids are a no-op; otherwise the
    /// floor resets to the new library's first floor.
    pub fn set_library(&mut self, registry: &Registry, library_id: &str) -> bool {
        if library_id == self.library_id || registry.library(library_id).is_none() {
            return false;
        }
        self.library_id = library_id.to_string();
        self.floor_id = registry
            .floors_for_library(library_id)
            .first()
            .map(|f| f.id.to_string())
            .unwrap_or_default();
        true
    }

    /// Switch floor within the selected library.
    pub fn set_floor(&mut self, registry: &Registry, floor_id: &str) -> bool {
        if floor_id == self.floor_id {
            return false;
        }
        let belongs = registry
            .floor(floor_id)
            .is_some_and(|f| f.library_id == self.library_id);
        if belongs {
            self.floor_id = floor_id.to_string();
        }
        belongs
    }

    #[must_use]
    pub fn available_floors(&self, registry: &Registry) -> Vec<&'static Floor> {
        registry.floors_for_library(&self.library_id)
    }

    /// Canonical `library=..&floor=..` string mirrored into the page URL.
    #[must_use]
    pub fn to_query(&self) -> String {
        format!("library={}&floor={}", self.library_id, self.floor_id)
    }
}

// =============================================================================
// DESK SELECTION
// =============================================================================

/// At most one selected desk, with toggle semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeskSelection {
    selected: Option<String>,
}

impl DeskSelection {
    #[must_use]
    pub fn new(selected: Option<&str>) -> Self {
        Self { selected: selected.filter(|id| !id.is_empty()).map(str::to_string) }
    }

    /// Select `desk_id`, or clear the selection if it is already selected.
    pub fn toggle(&mut self, desk_id: &str) {
        if self.selected.as_deref() == Some(desk_id) {
            self.selected = None;
        } else {
            self.selected = Some(desk_id.to_string());
        }
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// The selected desk, only if it is among `visible`.
    #[must_use]
    pub fn resolve<'a>(&self, visible: &'a [DeskState]) -> Option<&'a DeskState> {
        let id = self.selected.as_deref()?;
        visible.iter().find(|d| d.desk_id == id)
    }
}

#[cfg(test)]
#[path = "selection_test.rs"]
mod tests;
