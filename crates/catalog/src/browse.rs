use serde::Serialize;
use tracing::warn;

use crate::media_id::{
    MediaId, MEDIA_ID_BY_ALBUM, MEDIA_ID_BY_ARTIST, MEDIA_ID_BY_GENRE, MEDIA_ID_ROOT,
};
use crate::provider::{CatalogProvider, Scope};
use common::Track;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Browsable,
    Playable,
}

/// One entry of a browse-tree response.
#[derive(Clone, Debug, Serialize)]
pub struct BrowseNode {
    pub id: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub icon: Option<String>,
    pub kind: NodeKind,
}

/// Display strings for the synthetic category nodes. Owned by the
/// caller so the catalog stays free of localization concerns. In
/// `item_subtitle_template`, every `{}` is replaced by the item name.
#[derive(Clone, Debug, Default)]
pub struct BrowseStrings {
    pub artists_title: String,
    pub artists_subtitle: String,
    pub genres_title: String,
    pub genres_subtitle: String,
    pub item_subtitle_template: String,
    pub category_icon: Option<String>,
}

impl BrowseStrings {
    fn item_subtitle(&self, name: &str) -> Option<String> {
        if self.item_subtitle_template.is_empty() {
            return None;
        }
        Some(self.item_subtitle_template.replace("{}", name))
    }
}

impl CatalogProvider {
    /// Children of one browse-tree node, addressed by its media id.
    /// Unrecognized or malformed ids yield an empty list, never an
    /// error; the id grammar is the wire contract with the consumer.
    pub fn children(&self, media_id: &str, strings: &BrowseStrings) -> Vec<BrowseNode> {
        let parsed = match MediaId::parse(media_id) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!("Skipping malformed media id {:?}: {}", media_id, err);
                return Vec::new();
            }
        };
        if !parsed.is_browseable() {
            return Vec::new();
        }
        let scope = if parsed.offline {
            Scope::Offline
        } else {
            Scope::Full
        };
        let snapshot = self.snapshot();
        let index = snapshot.index(scope);

        let categories: Vec<&str> = parsed.categories.iter().map(String::as_str).collect();
        match categories.as_slice() {
            [MEDIA_ID_ROOT] => vec![
                category_node(MEDIA_ID_BY_ARTIST, &strings.artists_title, &strings.artists_subtitle, strings),
                category_node(MEDIA_ID_BY_GENRE, &strings.genres_title, &strings.genres_subtitle, strings),
            ],
            [MEDIA_ID_BY_ARTIST] => index
                .artists()
                .iter()
                .filter_map(|artist| artist_node(artist, strings))
                .collect(),
            [MEDIA_ID_BY_GENRE] => index
                .genres()
                .iter()
                .filter_map(|genre| genre_node(genre, strings))
                .collect(),
            [MEDIA_ID_BY_ARTIST, artist, MEDIA_ID_BY_ALBUM] => index
                .albums_by_artist(artist)
                .iter()
                .filter_map(|album| album_node(artist, album, strings))
                .collect(),
            [MEDIA_ID_BY_ARTIST, _, MEDIA_ID_BY_ALBUM, album] => index
                .tracks_by_album(album)
                .iter()
                .filter_map(track_node)
                .collect(),
            [MEDIA_ID_BY_GENRE, genre] => index
                .tracks_by_genre(genre)
                .iter()
                .filter_map(track_node)
                .collect(),
            _ => {
                warn!("Skipping unmatched media id: {:?}", media_id);
                Vec::new()
            }
        }
    }
}

fn category_node(
    media_id: &str,
    title: &str,
    subtitle: &str,
    strings: &BrowseStrings,
) -> BrowseNode {
    BrowseNode {
        id: media_id.to_string(),
        title: title.to_string(),
        subtitle: Some(subtitle.to_string()),
        icon: strings.category_icon.clone(),
        kind: NodeKind::Browsable,
    }
}

fn artist_node(artist: &str, strings: &BrowseStrings) -> Option<BrowseNode> {
    let id = encode_or_skip(MediaId::browsable(&[MEDIA_ID_BY_ARTIST, artist, MEDIA_ID_BY_ALBUM]))?;
    Some(BrowseNode {
        id,
        title: artist.to_string(),
        subtitle: strings.item_subtitle(artist),
        icon: None,
        kind: NodeKind::Browsable,
    })
}

fn genre_node(genre: &str, strings: &BrowseStrings) -> Option<BrowseNode> {
    let id = encode_or_skip(MediaId::browsable(&[MEDIA_ID_BY_GENRE, genre]))?;
    Some(BrowseNode {
        id,
        title: genre.to_string(),
        subtitle: strings.item_subtitle(genre),
        icon: None,
        kind: NodeKind::Browsable,
    })
}

fn album_node(artist: &str, album: &str, strings: &BrowseStrings) -> Option<BrowseNode> {
    let id = encode_or_skip(MediaId::browsable(&[
        MEDIA_ID_BY_ARTIST,
        artist,
        MEDIA_ID_BY_ALBUM,
        album,
    ]))?;
    Some(BrowseNode {
        id,
        title: album.to_string(),
        subtitle: strings.item_subtitle(album),
        icon: None,
        kind: NodeKind::Browsable,
    })
}

/// Playable leaves embed the artist-scoped path that produced them so
/// a later play request can rebuild the originating browse context.
/// The flat track id stays extractable after the leaf separator.
fn track_node(track: &Track) -> Option<BrowseNode> {
    let id = encode_or_skip(MediaId::playable(
        &[MEDIA_ID_BY_ARTIST, track.artist.as_str()],
        &track.id,
    ))?;
    Some(BrowseNode {
        id,
        title: track.title.clone(),
        subtitle: Some(track.artist.clone()),
        icon: track.icon_url.clone(),
        kind: NodeKind::Playable,
    })
}

fn encode_or_skip(result: Result<MediaId, crate::media_id::MediaIdError>) -> Option<String> {
    match result {
        Ok(id) => Some(id.encode()),
        Err(err) => {
            warn!("Skipping node with unencodable name: {}", err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_tracks, FakeLocal, FakeSource};
    use std::sync::Arc;

    fn strings() -> BrowseStrings {
        BrowseStrings {
            artists_title: "Artists".to_string(),
            artists_subtitle: "Browse by artist".to_string(),
            genres_title: "Genres".to_string(),
            genres_subtitle: "Browse by genre".to_string(),
            item_subtitle_template: "All tracks of {}".to_string(),
            category_icon: Some("res://category".to_string()),
        }
    }

    fn loaded_provider(local: &[&str]) -> CatalogProvider {
        let provider = CatalogProvider::new(
            Arc::new(FakeSource::new(sample_tracks())),
            Arc::new(FakeLocal::new(local)),
        );
        provider.load().unwrap();
        provider
    }

    #[test]
    fn root_yields_artist_then_genre_categories() {
        let provider = loaded_provider(&[]);
        let nodes = provider.children(MEDIA_ID_ROOT, &strings());
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].id, MEDIA_ID_BY_ARTIST);
        assert_eq!(nodes[0].title, "Artists");
        assert_eq!(nodes[0].kind, NodeKind::Browsable);
        assert_eq!(nodes[1].id, MEDIA_ID_BY_GENRE);
        assert_eq!(nodes[1].icon.as_deref(), Some("res://category"));
    }

    #[test]
    fn artist_listing_links_to_album_category() {
        let provider = loaded_provider(&[]);
        let nodes = provider.children(MEDIA_ID_BY_ARTIST, &strings());
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].title, "A");
        assert_eq!(nodes[0].id, "__BY_ARTIST__/A/__BY_ALBUM__");
        assert_eq!(nodes[0].subtitle.as_deref(), Some("All tracks of A"));
    }

    #[test]
    fn albums_of_artist_in_first_seen_order() {
        let provider = loaded_provider(&[]);
        let nodes = provider.children("__BY_ARTIST__/A/__BY_ALBUM__", &strings());
        let titles: Vec<&str> = nodes.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, ["X", "Y"]);
        assert!(nodes.iter().all(|n| n.kind == NodeKind::Browsable));
    }

    #[test]
    fn album_tracks_are_playable_with_reversible_ids() {
        let provider = loaded_provider(&[]);
        let nodes = provider.children("__BY_ARTIST__/A/__BY_ALBUM__/X", &strings());
        assert_eq!(nodes.len(), 1);
        let node = &nodes[0];
        assert_eq!(node.kind, NodeKind::Playable);
        let parsed = MediaId::parse(&node.id).unwrap();
        assert_eq!(parsed.track_id.as_deref(), Some("t1"));
        assert_eq!(parsed.categories, [MEDIA_ID_BY_ARTIST, "A"]);
        assert_eq!(parsed.encode(), node.id);
    }

    #[test]
    fn genre_tracks_are_playable_leaves() {
        let provider = loaded_provider(&[]);
        let nodes = provider.children("__BY_GENRE__/G", &strings());
        let titles: Vec<&str> = nodes.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, ["Rock and Roll", "Jazz Standards"]);
        assert!(nodes.iter().all(|n| n.kind == NodeKind::Playable));
    }

    #[test]
    fn offline_prefix_selects_the_offline_scope() {
        let provider = loaded_provider(&["t1"]);
        let full = provider.children(MEDIA_ID_BY_ARTIST, &strings());
        assert_eq!(full.len(), 2);
        let offline = provider.children("OFFLINE__BY_ARTIST__", &strings());
        assert_eq!(offline.len(), 1);
        assert_eq!(offline[0].title, "A");
        let offline_genres = provider.children("OFFLINE__BY_GENRE__", &strings());
        assert_eq!(offline_genres.len(), 1);
    }

    #[test]
    fn unmatched_ids_yield_empty_lists() {
        let provider = loaded_provider(&[]);
        assert!(provider.children("__BY_NOTHING__", &strings()).is_empty());
        assert!(provider.children("", &strings()).is_empty());
        assert!(provider
            .children("__BY_ARTIST__/A/__BY_ALBUM__/X/extra", &strings())
            .is_empty());
    }

    #[test]
    fn playable_ids_are_not_browseable() {
        let provider = loaded_provider(&[]);
        let leaves = provider.children("__BY_GENRE__/G", &strings());
        let leaf_id = leaves[0].id.clone();
        assert!(provider.children(&leaf_id, &strings()).is_empty());
    }

    #[test]
    fn browse_before_load_is_empty() {
        let provider = CatalogProvider::new(
            Arc::new(FakeSource::new(sample_tracks())),
            Arc::new(FakeLocal::new(&[])),
        );
        assert!(provider.children(MEDIA_ID_BY_ARTIST, &strings()).is_empty());
    }
}
