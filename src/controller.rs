// The catalog state controller: single point of truth for which vehicles are
// currently visible. Owns the list, the active filters/sort, the pagination
// cursor and the loading/error flags, and coordinates fetches against the
// catalog API. One instance per catalog session; views subscribe to state
// changes through a watch channel instead of being driven directly.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

use crate::catalog_api::CatalogApi;
use crate::error::CatalogError;
use crate::models::{FilterPatch, FilterSet, SortKey, SortOrder, SortSpec, Vehicle, VehicleQuery};

pub const PAGE_SIZE: u32 = 20;

const LIST_ERROR_FALLBACK: &str = "Error loading vehicles";

/// Snapshot of everything a listing view needs to render.
#[derive(Debug, Clone)]
pub struct CollectionState {
    /// Vehicles in server response order; never re-sorted client-side.
    pub vehicles: Vec<Vehicle>,
    pub loading: bool,
    pub error: Option<String>,
    pub filters: FilterSet,
    pub sort: SortSpec,
    /// 0-based page cursor; the next incremental fetch starts at
    /// `page * PAGE_SIZE`.
    pub page: u32,
    /// Heuristic: true while the last page came back full. A catalog whose
    /// size is an exact multiple of the page size costs one extra empty
    /// fetch before this flips false.
    pub has_more: bool,
}

impl Default for CollectionState {
    fn default() -> Self {
        CollectionState {
            vehicles: Vec::new(),
            loading: false,
            error: None,
            filters: FilterSet::default(),
            sort: SortSpec::default(),
            page: 0,
            has_more: true,
        }
    }
}

pub struct CatalogController {
    api: Arc<dyn CatalogApi>,
    state: watch::Sender<CollectionState>,
    /// Monotonically increasing fetch tag. A response is only applied when
    /// its tag is still the latest issued, so a fetch superseded by a
    /// reset-style operation can never overwrite newer state.
    fetch_seq: AtomicU64,
}

impl CatalogController {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        let (state, _) = watch::channel(CollectionState::default());
        CatalogController {
            api,
            state,
            fetch_seq: AtomicU64::new(0),
        }
    }

    /// Current state, cloned.
    pub fn snapshot(&self) -> CollectionState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change. Views hold one of these and
    /// re-render when it fires.
    pub fn subscribe(&self) -> watch::Receiver<CollectionState> {
        self.state.subscribe()
    }

    /// First fetch of a catalog session: default (or previously seeded)
    /// filters and sort, page 0.
    pub async fn initialize(&self) {
        self.fetch(true, None, None).await;
    }

    /// Re-runs the current filters/sort from page 0, replacing the list.
    pub async fn refresh(&self) {
        self.fetch(true, None, None).await;
    }

    /// Shallow-merges `patch` into the active filters, restarts pagination
    /// and refetches. Offset paging has no continuation token, so any filter
    /// change must restart from page 0 or later offsets would be computed
    /// against a different logical subset.
    pub async fn set_filters(&self, patch: FilterPatch) {
        let mut filters = self.state.borrow().filters.clone();
        filters.apply(patch);
        self.state.send_modify(|state| {
            state.filters = filters.clone();
            state.page = 0;
        });
        self.fetch(true, Some(filters), None).await;
    }

    /// Replaces the sort spec, restarts pagination and refetches.
    pub async fn set_sort(&self, key: SortKey, order: SortOrder) {
        let sort = SortSpec { key, order };
        self.state.send_modify(|state| {
            state.sort = sort;
            state.page = 0;
        });
        self.fetch(true, None, Some(sort)).await;
    }

    /// Restores the default filters (everything cleared, status back to
    /// "available"), restarts pagination and refetches. Always issues the
    /// fetch, even when the filters did not visibly change.
    pub async fn reset_filters(&self) {
        let filters = FilterSet::default();
        self.state.send_modify(|state| {
            state.filters = filters.clone();
            state.page = 0;
        });
        self.fetch(true, Some(filters), None).await;
    }

    /// Appends the next page. No-op while a fetch is in flight (guards
    /// against duplicate requests from repeated clicks) or when the last
    /// page signalled exhaustion.
    pub async fn load_more(&self) {
        {
            let state = self.state.borrow();
            if state.loading || !state.has_more {
                return;
            }
        }
        self.fetch(false, None, None).await;
    }

    /// Independent single-vehicle lookup; does not touch collection state.
    /// Failures are returned to the caller, `err.is_not_found()`
    /// distinguishing a missing vehicle from a service problem.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Vehicle, CatalogError> {
        self.api.vehicle_by_slug(slug).await.map_err(|err| {
            tracing::warn!(slug, error = %err, "vehicle lookup failed");
            err
        })
    }

    /// The single fetch primitive every list operation funnels through.
    /// `reset` selects replace-vs-append; the overrides take precedence over
    /// stored filters/sort for this call only.
    async fn fetch(
        &self,
        reset: bool,
        override_filters: Option<FilterSet>,
        override_sort: Option<SortSpec>,
    ) {
        let seq = self.fetch_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let query = {
            let state = self.state.borrow();
            VehicleQuery {
                skip: if reset { 0 } else { state.page * PAGE_SIZE },
                limit: PAGE_SIZE,
                sort: override_sort.unwrap_or(state.sort),
                filters: override_filters.unwrap_or_else(|| state.filters.clone()),
            }
        };
        self.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });

        let result = self.api.list_vehicles(&query).await;

        if self.fetch_seq.load(Ordering::SeqCst) != seq {
            // A newer operation superseded this fetch while it was in
            // flight; its response must not touch state.
            tracing::debug!(seq, "discarding stale vehicle page");
            return;
        }

        self.state.send_modify(|state| {
            match result {
                Ok(batch) => {
                    tracing::debug!(seq, count = batch.len(), reset, "vehicle page applied");
                    state.has_more = batch.len() == PAGE_SIZE as usize;
                    if reset {
                        state.vehicles = batch;
                        state.page = 1;
                    } else {
                        state.vehicles.extend(batch);
                        state.page += 1;
                    }
                }
                Err(err) => {
                    tracing::warn!(seq, error = %err, "vehicle fetch failed");
                    state.error = Some(err.user_message(LIST_ERROR_FALLBACK));
                }
            }
            state.loading = false;
        });
    }
}
