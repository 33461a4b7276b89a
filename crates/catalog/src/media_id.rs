use std::fmt;

/// Category vocabulary of the hierarchical media-id grammar. These
/// strings are the wire contract with the browse-tree consumer.
pub const MEDIA_ID_ROOT: &str = "__ROOT__";
pub const MEDIA_ID_BY_ARTIST: &str = "__BY_ARTIST__";
pub const MEDIA_ID_BY_GENRE: &str = "__BY_GENRE__";
pub const MEDIA_ID_BY_ALBUM: &str = "__BY_ALBUM__";

/// Scope marker. Prepended directly to the id string, without a
/// separator, when the offline catalog is being browsed.
pub const OFFLINE_PREFIX: &str = "OFFLINE";

const CATEGORY_SEPARATOR: char = '/';
const LEAF_SEPARATOR: char = '|';

/// A parsed hierarchical media id: optional offline scope marker,
/// "/"-delimited category path, and for playable leaves the flat
/// track id after a "|". `encode` and `parse` are exact inverses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaId {
    pub offline: bool,
    pub categories: Vec<String>,
    pub track_id: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum MediaIdError {
    /// A category name contains a reserved separator character.
    InvalidName(String),
    /// A track id contains the leaf separator.
    InvalidTrackId(String),
    /// The id string has more than one leaf separator.
    ExtraLeafSeparator(String),
    /// The id string ends in a leaf separator with no track id.
    MissingTrackId(String),
}

impl fmt::Display for MediaIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaIdError::InvalidName(name) => {
                write!(f, "category name contains a reserved character: {:?}", name)
            }
            MediaIdError::InvalidTrackId(id) => {
                write!(f, "track id contains a reserved character: {:?}", id)
            }
            MediaIdError::ExtraLeafSeparator(raw) => {
                write!(f, "more than one leaf separator in media id: {:?}", raw)
            }
            MediaIdError::MissingTrackId(raw) => {
                write!(f, "media id ends in a leaf separator: {:?}", raw)
            }
        }
    }
}

impl std::error::Error for MediaIdError {}

impl MediaId {
    /// A browsable id addressing a category path.
    pub fn browsable<S: AsRef<str>>(categories: &[S]) -> Result<MediaId, MediaIdError> {
        let categories = validated_categories(categories)?;
        Ok(MediaId {
            offline: false,
            categories,
            track_id: None,
        })
    }

    /// A playable leaf id embedding the browse path that produced it,
    /// with the flat track id kept extractable.
    pub fn playable<S: AsRef<str>>(
        categories: &[S],
        track_id: &str,
    ) -> Result<MediaId, MediaIdError> {
        if track_id.contains(LEAF_SEPARATOR) {
            return Err(MediaIdError::InvalidTrackId(track_id.to_string()));
        }
        let categories = validated_categories(categories)?;
        Ok(MediaId {
            offline: false,
            categories,
            track_id: Some(track_id.to_string()),
        })
    }

    pub fn with_offline(mut self, offline: bool) -> MediaId {
        self.offline = offline;
        self
    }

    /// Browsable ids have no track component; only they may be handed
    /// to the browse tree for expansion.
    pub fn is_browseable(&self) -> bool {
        self.track_id.is_none()
    }

    pub fn parse(raw: &str) -> Result<MediaId, MediaIdError> {
        let (offline, rest) = match raw.strip_prefix(OFFLINE_PREFIX) {
            Some(rest) => (true, rest),
            None => (false, raw),
        };

        let mut parts = rest.split(LEAF_SEPARATOR);
        let path = parts.next().unwrap_or_default();
        let track_id = parts.next();
        if parts.next().is_some() {
            return Err(MediaIdError::ExtraLeafSeparator(raw.to_string()));
        }
        if let Some(track_id) = track_id {
            if track_id.is_empty() {
                return Err(MediaIdError::MissingTrackId(raw.to_string()));
            }
        }

        let categories = if path.is_empty() {
            Vec::new()
        } else {
            path.split(CATEGORY_SEPARATOR).map(str::to_string).collect()
        };

        Ok(MediaId {
            offline,
            categories,
            track_id: track_id.map(str::to_string),
        })
    }

    pub fn encode(&self) -> String {
        let mut out = String::new();
        if self.offline {
            out.push_str(OFFLINE_PREFIX);
        }
        out.push_str(&self.categories.join("/"));
        if let Some(track_id) = &self.track_id {
            out.push(LEAF_SEPARATOR);
            out.push_str(track_id);
        }
        out
    }
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

fn validated_categories<S: AsRef<str>>(categories: &[S]) -> Result<Vec<String>, MediaIdError> {
    categories
        .iter()
        .map(|name| {
            let name = name.as_ref();
            if name.contains(CATEGORY_SEPARATOR) || name.contains(LEAF_SEPARATOR) {
                Err(MediaIdError::InvalidName(name.to_string()))
            } else {
                Ok(name.to_string())
            }
        })
        .collect()
}
