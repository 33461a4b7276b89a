mod browse;
mod index;
mod load;
mod media_id;
mod provider;
mod search;
mod state;

pub use browse::{BrowseNode, BrowseStrings, NodeKind};
pub use index::{CatalogIndex, CatalogStats};
pub use load::spawn_load;
pub use media_id::{
    MediaId, MediaIdError, MEDIA_ID_BY_ALBUM, MEDIA_ID_BY_ARTIST, MEDIA_ID_BY_GENRE,
    MEDIA_ID_ROOT, OFFLINE_PREFIX,
};
pub use provider::{CatalogProvider, LoadError, Scope};
pub use search::SearchField;
pub use state::{LoadEvent, LoadState};
