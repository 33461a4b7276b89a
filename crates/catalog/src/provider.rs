use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use common::Track;
use parking_lot::{Mutex, RwLock};
use rand::seq::SliceRandom;
use source::{LocalFiles, SourceError, TrackSource};
use tracing::{debug, info, warn};

use crate::index::{CatalogIndex, CatalogStats};
use crate::search::{search_tracks, SearchField};
use crate::state::{LoadEvent, LoadState};

/// Which catalog a query reads: the full catalog or the offline
/// subset the user keeps locally.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope {
    Full,
    Offline,
}

#[derive(Debug)]
pub enum LoadError {
    Source(SourceError),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Source(err) => write!(f, "source error: {}", err),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<SourceError> for LoadError {
    fn from(err: SourceError) -> Self {
        LoadError::Source(err)
    }
}

/// One complete, internally consistent view of the catalog and all
/// derived indices. Replaced wholesale on every membership or
/// metadata change; readers holding an older snapshot keep a
/// consistent picture.
#[derive(Default)]
pub(crate) struct Snapshot {
    pub loaded: bool,
    pub tracks: Vec<Track>,
    pub by_id: HashMap<String, Track>,
    pub offline_ids: HashSet<String>,
    pub full: CatalogIndex,
    pub offline: CatalogIndex,
}

impl Snapshot {
    pub fn index(&self, scope: Scope) -> &CatalogIndex {
        match scope {
            Scope::Full => &self.full,
            Scope::Offline => &self.offline,
        }
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            artists: self.full.artists().len(),
            albums: self.full.album_count(),
            tracks: self.tracks.len(),
        }
    }
}

/// Canonical catalog state. Guarded by one mutex; the offline catalog
/// is an id-only membership set over the canonical records, so every
/// metadata update is visible through both scopes without aliasing.
struct Inner {
    state: LoadState,
    order: Vec<String>,
    records: HashMap<String, Track>,
    offline_ids: HashSet<String>,
}

impl Inner {
    fn new() -> Inner {
        Inner {
            state: LoadState::NotLoaded,
            order: Vec::new(),
            records: HashMap::new(),
            offline_ids: HashSet::new(),
        }
    }

    fn snapshot(&self) -> Snapshot {
        let tracks: Vec<Track> = self
            .order
            .iter()
            .filter_map(|id| self.records.get(id))
            .cloned()
            .collect();
        let by_id: HashMap<String, Track> = tracks
            .iter()
            .map(|track| (track.id.clone(), track.clone()))
            .collect();
        let full = CatalogIndex::build(&tracks);
        let offline = CatalogIndex::build(
            tracks.iter().filter(|track| self.offline_ids.contains(&track.id)),
        );
        Snapshot {
            loaded: self.state.is_loaded(),
            tracks,
            by_id,
            offline_ids: self.offline_ids.clone(),
            full,
            offline,
        }
    }
}

/// The catalog cache. One shared instance serves all callers; bulk
/// mutations serialize on the canonical-state mutex while readers go
/// through the published snapshot and never block on them.
pub struct CatalogProvider {
    source: Arc<dyn TrackSource>,
    local: Arc<dyn LocalFiles>,
    inner: Mutex<Inner>,
    published: RwLock<Arc<Snapshot>>,
    favorites: RwLock<HashSet<String>>,
}

impl CatalogProvider {
    pub fn new(source: Arc<dyn TrackSource>, local: Arc<dyn LocalFiles>) -> CatalogProvider {
        CatalogProvider {
            source,
            local,
            inner: Mutex::new(Inner::new()),
            published: RwLock::new(Arc::new(Snapshot::default())),
            favorites: RwLock::new(HashSet::new()),
        }
    }

    /// Populates the catalog from the source and builds all indices.
    ///
    /// Holds the canonical-state mutex for the whole populate and
    /// rebuild, so a concurrent second call blocks and then observes
    /// the first attempt's outcome instead of racing its own load.
    /// Calling on an already loaded catalog is a no-op that reports
    /// success immediately. On failure nothing is published and the
    /// state returns to not-loaded so the caller may retry.
    pub fn load(&self) -> Result<CatalogStats, LoadError> {
        let mut inner = self.inner.lock();
        if inner.state.is_loaded() {
            debug!("Catalog already loaded; skipping rebuild");
            return Ok(self.stats());
        }
        inner.state = inner.state.apply(LoadEvent::Begin);

        let fetched = match self.source.fetch() {
            Ok(tracks) => tracks,
            Err(err) => {
                inner.state = inner.state.apply(LoadEvent::Fail);
                warn!("Catalog load failed: {}", err);
                return Err(err.into());
            }
        };

        inner.order.clear();
        inner.records.clear();
        inner.offline_ids.clear();
        for track in fetched {
            let id = track.id.clone();
            if inner.records.insert(id.clone(), track).is_none() {
                inner.order.push(id.clone());
            }
            if self.local.exists(&id) {
                inner.offline_ids.insert(id);
            }
        }
        inner.state = inner.state.apply(LoadEvent::Succeed);

        let snapshot = inner.snapshot();
        let stats = snapshot.stats();
        *self.published.write() = Arc::new(snapshot);
        info!(
            "Catalog ready: {} artists, {} albums, {} tracks ({} offline)",
            stats.artists,
            stats.albums,
            stats.tracks,
            inner.offline_ids.len()
        );
        Ok(stats)
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot().loaded
    }

    pub fn stats(&self) -> CatalogStats {
        self.snapshot().stats()
    }

    pub(crate) fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.published.read())
    }

    pub fn artists(&self, scope: Scope) -> Vec<String> {
        self.snapshot().index(scope).artists().to_vec()
    }

    pub fn genres(&self, scope: Scope) -> Vec<String> {
        self.snapshot().index(scope).genres().to_vec()
    }

    pub fn albums_by_artist(&self, artist: &str, scope: Scope) -> Vec<String> {
        self.snapshot().index(scope).albums_by_artist(artist).to_vec()
    }

    pub fn tracks_by_artist(&self, artist: &str, scope: Scope) -> Vec<Track> {
        self.snapshot().index(scope).tracks_by_artist(artist).to_vec()
    }

    pub fn tracks_by_album(&self, album: &str, scope: Scope) -> Vec<Track> {
        self.snapshot().index(scope).tracks_by_album(album).to_vec()
    }

    pub fn tracks_by_genre(&self, genre: &str, scope: Scope) -> Vec<Track> {
        self.snapshot().index(scope).tracks_by_genre(genre).to_vec()
    }

    pub fn track(&self, track_id: &str) -> Option<Track> {
        self.snapshot().by_id.get(track_id).cloned()
    }

    pub fn offline_track(&self, track_id: &str) -> Option<Track> {
        let snapshot = self.snapshot();
        if !snapshot.offline_ids.contains(track_id) {
            return None;
        }
        snapshot.by_id.get(track_id).cloned()
    }

    /// All offline tracks in canonical order.
    pub fn offline_tracks(&self) -> Vec<Track> {
        let snapshot = self.snapshot();
        snapshot
            .tracks
            .iter()
            .filter(|track| snapshot.offline_ids.contains(&track.id))
            .cloned()
            .collect()
    }

    /// The full catalog in a fresh random order.
    pub fn shuffled_tracks(&self) -> Vec<Track> {
        let mut tracks = self.snapshot().tracks.clone();
        let mut rng = rand::rng();
        tracks.shuffle(&mut rng);
        tracks
    }

    /// Case-insensitive substring search over the full catalog.
    /// Returns nothing while the catalog is not loaded.
    pub fn search(&self, field: SearchField, query: &str) -> Vec<Track> {
        let snapshot = self.snapshot();
        if !snapshot.loaded {
            return Vec::new();
        }
        search_tracks(&snapshot.tracks, field, query)
    }

    /// Replaces a track's artwork locators in place and republishes
    /// the snapshot so both scopes observe the update.
    ///
    /// # Panics
    ///
    /// Panics when `track_id` is absent from the canonical catalog:
    /// callers only hold ids obtained from this catalog, so a miss
    /// means the store and its indices have diverged.
    pub fn update_artwork(&self, track_id: &str, art_url: &str, icon_url: &str) {
        let mut inner = self.inner.lock();
        let record = inner
            .records
            .get_mut(track_id)
            .unwrap_or_else(|| panic!("inconsistent catalog: no record for track {}", track_id));
        *record = record.with_artwork(art_url.to_string(), icon_url.to_string());
        let snapshot = inner.snapshot();
        *self.published.write() = Arc::new(snapshot);
    }

    /// Registers a catalog track in the offline subset and rebuilds
    /// the offline-scope indices synchronously.
    ///
    /// # Panics
    ///
    /// Panics when `track_id` is not in the full catalog; offline ids
    /// must stay a subset of catalog ids.
    pub fn add_to_offline(&self, track_id: &str) {
        let mut inner = self.inner.lock();
        assert!(
            inner.records.contains_key(track_id),
            "inconsistent catalog: no record for track {}",
            track_id
        );
        inner.offline_ids.insert(track_id.to_string());
        let snapshot = inner.snapshot();
        *self.published.write() = Arc::new(snapshot);
        debug!("Track {} added to the offline catalog", track_id);
    }

    pub fn set_favorite(&self, track_id: &str, favorite: bool) {
        let mut favorites = self.favorites.write();
        if favorite {
            favorites.insert(track_id.to_string());
        } else {
            favorites.remove(track_id);
        }
    }

    pub fn is_favorite(&self, track_id: &str) -> bool {
        self.favorites.read().contains(track_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{failing_source, sample_tracks, FakeLocal, FakeSource};

    fn provider_with_local(local: &[&str]) -> CatalogProvider {
        CatalogProvider::new(
            Arc::new(FakeSource::new(sample_tracks())),
            Arc::new(FakeLocal::new(local)),
        )
    }

    #[test]
    fn queries_before_load_are_empty() {
        let provider = provider_with_local(&[]);
        assert!(!provider.is_loaded());
        assert!(provider.artists(Scope::Full).is_empty());
        assert!(provider.track("t1").is_none());
        assert!(provider.search(SearchField::Title, "rock").is_empty());
        assert!(provider.shuffled_tracks().is_empty());
    }

    #[test]
    fn load_populates_both_scopes() {
        let provider = provider_with_local(&["t1"]);
        let stats = provider.load().unwrap();
        assert_eq!(stats.tracks, 3);
        assert!(provider.is_loaded());
        assert_eq!(provider.artists(Scope::Full), ["A", "B"]);
        assert_eq!(provider.artists(Scope::Offline), ["A"]);
        assert!(provider.offline_track("t1").is_some());
        assert!(provider.offline_track("t2").is_none());
    }

    #[test]
    fn offline_ids_stay_a_subset_of_catalog_ids() {
        let provider = provider_with_local(&["t1", "t3"]);
        provider.load().unwrap();
        let offline = provider.offline_tracks();
        for track in offline {
            assert!(provider.track(&track.id).is_some());
        }
    }

    #[test]
    fn failed_load_leaves_nothing_published_and_permits_retry() {
        let source = Arc::new(failing_source());
        let provider = CatalogProvider::new(source.clone(), Arc::new(FakeLocal::new(&[])));
        assert!(provider.load().is_err());
        assert!(!provider.is_loaded());
        assert!(provider.artists(Scope::Full).is_empty());
        // The failure returned the state to not-loaded, so a second
        // request reaches the source again instead of short-circuiting.
        assert!(provider.load().is_err());
        assert_eq!(source.fetch_count(), 2);
    }

    #[test]
    fn load_is_idempotent_once_loaded() {
        let source = Arc::new(FakeSource::new(sample_tracks()));
        let provider =
            CatalogProvider::new(source.clone(), Arc::new(FakeLocal::new(&[])));
        provider.load().unwrap();
        provider.load().unwrap();
        assert_eq!(source.fetch_count(), 1);
    }

    #[test]
    fn add_to_offline_updates_all_offline_indices() {
        let provider = provider_with_local(&[]);
        provider.load().unwrap();
        assert!(provider.artists(Scope::Offline).is_empty());

        provider.add_to_offline("t2");
        assert!(provider.offline_track("t2").is_some());
        assert_eq!(provider.artists(Scope::Offline), ["A"]);
        assert_eq!(provider.genres(Scope::Offline), ["G"]);
        assert_eq!(provider.albums_by_artist("A", Scope::Offline), ["Y"]);
        assert_eq!(provider.tracks_by_album("Y", Scope::Offline).len(), 1);
    }

    #[test]
    #[should_panic(expected = "inconsistent catalog")]
    fn add_to_offline_panics_on_unknown_id() {
        let provider = provider_with_local(&[]);
        provider.load().unwrap();
        provider.add_to_offline("no-such-track");
    }

    #[test]
    fn artwork_update_is_visible_in_both_scopes() {
        let provider = provider_with_local(&["t1"]);
        provider.load().unwrap();
        provider.update_artwork("t1", "art://t1", "icon://t1");

        assert_eq!(provider.track("t1").unwrap().art_url.as_deref(), Some("art://t1"));
        assert_eq!(
            provider.offline_track("t1").unwrap().icon_url.as_deref(),
            Some("icon://t1")
        );
        let indexed = provider.tracks_by_artist("A", Scope::Offline);
        assert_eq!(indexed[0].art_url.as_deref(), Some("art://t1"));
    }

    #[test]
    #[should_panic(expected = "inconsistent catalog")]
    fn artwork_update_panics_on_unknown_id() {
        let provider = provider_with_local(&[]);
        provider.load().unwrap();
        provider.update_artwork("no-such-track", "a", "b");
    }

    #[test]
    fn favorites_are_independent_of_catalog_membership() {
        let provider = provider_with_local(&[]);
        provider.set_favorite("not-in-catalog", true);
        assert!(provider.is_favorite("not-in-catalog"));
        provider.set_favorite("not-in-catalog", false);
        assert!(!provider.is_favorite("not-in-catalog"));
    }

    #[test]
    fn shuffled_listing_covers_the_full_catalog() {
        let provider = provider_with_local(&[]);
        provider.load().unwrap();
        let mut ids: Vec<String> = provider
            .shuffled_tracks()
            .into_iter()
            .map(|t| t.id)
            .collect();
        ids.sort();
        assert_eq!(ids, ["t1", "t2", "t3"]);
    }

    #[test]
    fn search_is_scoped_to_the_requested_field() {
        let provider = provider_with_local(&[]);
        provider.load().unwrap();
        let hits = provider.search(SearchField::Title, "rock");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "t1");
        // "Rock and Roll" is a title, not an album.
        assert!(provider.search(SearchField::Album, "rock").is_empty());
    }
}
