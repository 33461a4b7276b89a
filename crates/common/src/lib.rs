use serde::{Deserialize, Serialize};

/// One media track's metadata, immutable once built. Artwork locators
/// are the only fields the catalog ever replaces after ingestion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub album: String,
    pub album_id: String,
    pub artist: String,
    pub artist_id: String,
    pub source: String,
    #[serde(default)]
    pub icon_url: Option<String>,
    #[serde(default)]
    pub art_url: Option<String>,
    pub track_no: u32,
    pub duration_ms: u32,
    pub genre: String,
    pub total_track_count: u32,
}

impl Track {
    /// Returns a copy with both artwork locators replaced.
    pub fn with_artwork(&self, art_url: String, icon_url: String) -> Track {
        let mut track = self.clone();
        track.art_url = Some(art_url);
        track.icon_url = Some(icon_url);
        track
    }
}

pub fn format_duration(duration_ms: u32) -> String {
    let total_secs = duration_ms / 1000;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}
