//! Desk filters: free-text search plus status and noise facets.
//!
//! Facets combine with AND and an empty facet set restricts nothing, so the
//! order filters are applied in never changes the result.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::desk::{DeskState, NoiseBand, OccupancyStatus, StatusScheme};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeskFilters {
    search: String,
    statuses: BTreeSet<OccupancyStatus>,
    noises: BTreeSet<NoiseBand>,
}

/// Filter state as echoed back to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterEcho {
    pub search: String,
    pub statuses: Vec<&'static str>,
    pub noise: Vec<NoiseBand>,
    pub has_active_filters: bool,
}

impl DeskFilters {
    /// Build from query values. `status` and `noise` are comma lists; unknown
    /// entries are dropped.
    #[must_use]
    pub fn from_query(search: Option<&str>, status: Option<&str>, noise: Option<&str>, scheme: StatusScheme) -> Self {
        let statuses: BTreeSet<_> = split_list(status).filter_map(|raw| scheme.parse_status(raw)).collect();
        let noises: BTreeSet<_> = split_list(noise).filter_map(NoiseBand::parse).collect();

        let mut filters = Self::default();
        filters.set_search(search.unwrap_or_default());
        for status in statuses {
            filters.toggle_status(status);
        }
        for band in noises {
            filters.toggle_noise(band);
        }
        filters
    }

    pub fn set_search(&mut self, text: &str) {
        self.search = text.trim().to_string();
    }

    /// Add `status` to the facet, or remove it if present.
    pub fn toggle_status(&mut self, status: OccupancyStatus) {
        if !self.statuses.remove(&status) {
            self.statuses.insert(status);
        }
    }

    pub fn toggle_noise(&mut self, band: NoiseBand) {
        if !self.noises.remove(&band) {
            self.noises.insert(band);
        }
    }

    pub fn clear_all(&mut self) {
        self.search.clear();
        self.statuses.clear();
        self.noises.clear();
    }

    #[must_use]
    pub fn has_active_filters(&self) -> bool {
        !self.search.is_empty() || !self.statuses.is_empty() || !self.noises.is_empty()
    }

    #[must_use]
    pub fn matches(&self, desk: &DeskState) -> bool {
        let search_ok = self.search.is_empty()
            || desk
                .desk_id
                .to_lowercase()
                .contains(&self.search.to_lowercase());
        let status_ok = self.statuses.is_empty() || self.statuses.contains(&desk.status());
        let noise_ok = self.noises.is_empty() || self.noises.contains(&desk.noise);
        search_ok && status_ok && noise_ok
    }

    /// Desks passing every facet, in input order.
    #[must_use]
    pub fn apply(&self, desks: &[DeskState]) -> Vec<DeskState> {
        desks.iter().filter(|d| self.matches(d)).cloned().collect()
    }

    #[must_use]
    pub fn echo(&self, scheme: StatusScheme) -> FilterEcho {
        FilterEcho {
            search: self.search.clone(),
            statuses: self.statuses.iter().map(|s| scheme.label(*s)).collect(),
            noise: self.noises.iter().copied().collect(),
            has_active_filters: self.has_active_filters(),
        }
    }
}

fn split_list(raw: Option<&str>) -> impl Iterator<Item = &str> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
#[path = "filters_test.rs"]
mod tests;
