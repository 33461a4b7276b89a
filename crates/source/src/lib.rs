use std::collections::BTreeMap;
use std::path::PathBuf;

use common::Track;
use serde::Deserialize;
use tracing::debug;

const DEFAULT_GENRE: &str = "Rock";
const DEFAULT_TOTAL_TRACK_COUNT: u32 = 10;

/// Produces the full list of catalog tracks. The whole sequence fails
/// atomically: callers never receive partial results.
pub trait TrackSource: Send + Sync {
    fn fetch(&self) -> Result<Vec<Track>, SourceError>;
}

/// Answers whether the media resource for a track id is already
/// present on local storage.
pub trait LocalFiles: Send + Sync {
    fn exists(&self, track_id: &str) -> bool;
}

#[derive(Debug)]
pub enum SourceError {
    Http(reqwest::Error),
    Status(u16),
    Json(serde_json::Error),
    Io(std::io::Error),
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceError::Http(err) => write!(f, "http error: {}", err),
            SourceError::Status(code) => write!(f, "unexpected http status: {}", code),
            SourceError::Json(err) => write!(f, "json error: {}", err),
            SourceError::Io(err) => write!(f, "io error: {}", err),
        }
    }
}

impl std::error::Error for SourceError {}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Http(err)
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Json(err)
    }
}

impl From<std::io::Error> for SourceError {
    fn from(err: std::io::Error) -> Self {
        SourceError::Io(err)
    }
}

/// One track object as it appears in the remote catalog document.
/// `duration` is in seconds on the wire; `genre` and `totalTrackCount`
/// are synthesized when the feed omits them.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTrack {
    id: String,
    title: String,
    album_name: String,
    album_id: String,
    artist_name: String,
    artist_id: String,
    source: String,
    album_image_url: Option<String>,
    track_number: u32,
    duration: u32,
    #[serde(default)]
    genre: Option<String>,
    #[serde(default)]
    total_track_count: Option<u32>,
}

impl From<RawTrack> for Track {
    fn from(raw: RawTrack) -> Track {
        Track {
            id: raw.id,
            title: raw.title,
            album: raw.album_name,
            album_id: raw.album_id,
            artist: raw.artist_name,
            artist_id: raw.artist_id,
            source: raw.source,
            icon_url: raw.album_image_url,
            art_url: None,
            track_no: raw.track_number,
            duration_ms: raw.duration.saturating_mul(1000),
            genre: raw.genre.unwrap_or_else(|| DEFAULT_GENRE.to_string()),
            total_track_count: raw.total_track_count.unwrap_or(DEFAULT_TOTAL_TRACK_COUNT),
        }
    }
}

/// Parses a remote catalog document: a single JSON object whose values
/// are track objects, keyed by opaque record ids.
pub fn parse_catalog(document: &str) -> Result<Vec<Track>, SourceError> {
    let records: BTreeMap<String, RawTrack> = serde_json::from_str(document)?;
    Ok(records.into_values().map(Track::from).collect())
}

/// Fetches the catalog from a remote JSON document over HTTP.
pub struct RemoteJsonSource {
    client: reqwest::blocking::Client,
    url: String,
}

impl RemoteJsonSource {
    pub fn new(url: impl Into<String>) -> Result<Self, SourceError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("catalog-cache/0.1")
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl TrackSource for RemoteJsonSource {
    fn fetch(&self) -> Result<Vec<Track>, SourceError> {
        debug!("Fetching catalog from {}", self.url);
        let response = self.client.get(&self.url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }
        let body = response.text()?;
        let tracks = parse_catalog(&body)?;
        debug!("Fetched {} tracks", tracks.len());
        Ok(tracks)
    }
}

/// Reads the catalog document from a local file. Used by tooling and
/// tests in place of the remote endpoint.
pub struct FileJsonSource {
    path: PathBuf,
}

impl FileJsonSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TrackSource for FileJsonSource {
    fn fetch(&self) -> Result<Vec<Track>, SourceError> {
        let body = std::fs::read_to_string(&self.path)?;
        parse_catalog(&body)
    }
}

/// Existence predicate over a directory of downloaded media, one file
/// per track id.
pub struct DirLocalFiles {
    dir: PathBuf,
}

impl DirLocalFiles {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl LocalFiles for DirLocalFiles {
    fn exists(&self, track_id: &str) -> bool {
        self.dir.join(track_id).is_file()
    }
}
