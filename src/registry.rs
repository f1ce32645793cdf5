//! Static location registry: libraries → floors → desk identifiers.
//!
//! DESIGN
//! ======
//! Everything here is `&'static` data loaded with the binary. Desk counts
//! vary per floor to mirror real layouts. The live demo location is kept
//! separate from the simulated libraries so the simulator and the live
//! synchronizer never own the same desk.

use serde::Serialize;

// =============================================================================
// ENTITIES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Library {
    pub id: &'static str,
    pub name: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Floor {
    pub id: &'static str,
    pub library_id: &'static str,
    pub name: &'static str,
}

/// Fixed desk id list for one floor.
#[derive(Debug, Clone, Copy)]
pub struct FloorDesks {
    pub floor_id: &'static str,
    pub desk_ids: &'static [&'static str],
}

// =============================================================================
// BUILT-IN DATA
// =============================================================================

const LIBRARIES: &[Library] = &[
    Library { id: "ussher", name: "Ussher Library" },
    Library { id: "berkeley", name: "Berkeley Library" },
    Library { id: "hamilton", name: "Hamilton Library" },
    Library { id: DEMO_LIBRARY_ID, name: "Live Demo Library" },
];

const FLOORS: &[Floor] = &[
    Floor { id: "ussher-gf", library_id: "ussher", name: "Ground Floor" },
    Floor { id: "ussher-1f", library_id: "ussher", name: "1st Floor" },
    Floor { id: "ussher-2f", library_id: "ussher", name: "2nd Floor" },
    Floor { id: "ussher-3f", library_id: "ussher", name: "3rd Floor" },
    Floor { id: "berkeley-gf", library_id: "berkeley", name: "Ground Floor" },
    Floor { id: "berkeley-1f", library_id: "berkeley", name: "1st Floor" },
    Floor { id: "berkeley-2f", library_id: "berkeley", name: "2nd Floor" },
    Floor { id: "hamilton-gf", library_id: "hamilton", name: "Ground Floor" },
    Floor { id: "hamilton-1f", library_id: "hamilton", name: "1st Floor" },
    Floor { id: DEMO_FLOOR_ID, library_id: DEMO_LIBRARY_ID, name: "Ground Floor" },
];

const DESKS: &[FloorDesks] = &[
    FloorDesks {
        floor_id: "ussher-gf",
        desk_ids: &["UG-D1", "UG-D2", "UG-D3", "UG-D4", "UG-D5", "UG-D6", "UG-D7", "UG-D8"],
    },
    FloorDesks {
        floor_id: "ussher-1f",
        desk_ids: &["U1-D1", "U1-D2", "U1-D3", "U1-D4", "U1-D5", "U1-D6", "U1-D7", "U1-D8"],
    },
    FloorDesks {
        floor_id: "ussher-2f",
        desk_ids: &["U2-D1", "U2-D2", "U2-D3", "U2-D4", "U2-D5", "U2-D6", "U2-D7", "U2-D8"],
    },
    FloorDesks { floor_id: "ussher-3f", desk_ids: &["U3-D1", "U3-D2", "U3-D3", "U3-D4", "U3-D5", "U3-D6"] },
    FloorDesks { floor_id: "berkeley-gf", desk_ids: &["BG-D1", "BG-D2", "BG-D3", "BG-D4", "BG-D5", "BG-D6"] },
    FloorDesks {
        floor_id: "berkeley-1f",
        desk_ids: &["B1-D1", "B1-D2", "B1-D3", "B1-D4", "B1-D5", "B1-D6", "B1-D7", "B1-D8"],
    },
    FloorDesks {
        floor_id: "berkeley-2f",
        desk_ids: &["B2-D1", "B2-D2", "B2-D3", "B2-D4", "B2-D5", "B2-D6", "B2-D7", "B2-D8"],
    },
    FloorDesks { floor_id: "hamilton-gf", desk_ids: &["HG-D1", "HG-D2", "HG-D3", "HG-D4", "HG-D5", "HG-D6"] },
    FloorDesks { floor_id: "hamilton-1f", desk_ids: &["H1-D1", "H1-D2", "H1-D3", "H1-D4", "H1-D5", "H1-D6"] },
    FloorDesks { floor_id: DEMO_FLOOR_ID, desk_ids: &[DEMO_DESK_ID] },
];

pub const DEMO_LIBRARY_ID: &str = "demo";
pub const DEMO_FLOOR_ID: &str = "demo-gf";
pub const DEMO_DESK_ID: &str = "DG-D1";

// =============================================================================
// REGISTRY
// =============================================================================

/// Read-only view over the location hierarchy.
#[derive(Debug, Clone, Copy)]
pub struct Registry {
    libraries: &'static [Library],
    floors: &'static [Floor],
    desks: &'static [FloorDesks],
}

impl Registry {
    #[must_use]
    pub const fn builtin() -> Self {
        Self { libraries: LIBRARIES, floors: FLOORS, desks: DESKS }
    }

    #[must_use]
    pub fn libraries(&self) -> &'static [Library] {
        self.libraries
    }

    #[must_use]
    pub fn floors(&self) -> &'static [Floor] {
        self.floors
    }

    #[must_use]
    pub fn library(&self, library_id: &str) -> Option<&'static Library> {
        self.libraries.iter().find(|l| l.id == library_id)
    }

    #[must_use]
    pub fn floor(&self, floor_id: &str) -> Option<&'static Floor> {
        self.floors.iter().find(|f| f.id == floor_id)
    }

    /// Floors belonging to `library_id`, in registry order.
    #[must_use]
    pub fn floors_for_library(&self, library_id: &str) -> Vec<&'static Floor> {
        self.floors
            .iter()
            .filter(|f| f.library_id == library_id)
            .collect()
    }

    /// Desk ids on `floor_id`; empty for unknown floors.
    #[must_use]
    pub fn desk_ids_for_floor(&self, floor_id: &str) -> &'static [&'static str] {
        self.desks
            .iter()
            .find(|d| d.floor_id == floor_id)
            .map(|d| d.desk_ids)
            .unwrap_or_default()
    }

    /// Floor that carries `desk_id`, if any.
    #[must_use]
    pub fn floor_of_desk(&self, desk_id: &str) -> Option<&'static str> {
        self.desks
            .iter()
            .find(|d| d.desk_ids.iter().any(|id| *id == desk_id))
            .map(|d| d.floor_id)
    }

    /// Every `(floor_id, desk_id)` pair in registry order.
    #[must_use]
    pub fn all_desks(&self) -> Vec<(&'static str, &'static str)> {
        self.desks
            .iter()
            .flat_map(|d| d.desk_ids.iter().map(move |id| (d.floor_id, *id)))
            .collect()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
