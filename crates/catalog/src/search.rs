use common::Track;

/// Metadata field a search query is matched against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchField {
    Title,
    Album,
    Artist,
}

/// Case-insensitive substring scan over the given records. O(n) by
/// design; catalogs are small and search is infrequent next to
/// browsing, so no inverted index is kept.
pub(crate) fn search_tracks(tracks: &[Track], field: SearchField, query: &str) -> Vec<Track> {
    let query = query.to_lowercase();
    tracks
        .iter()
        .filter(|track| field_value(track, field).to_lowercase().contains(&query))
        .cloned()
        .collect()
}

fn field_value(track: &Track, field: SearchField) -> &str {
    match field {
        SearchField::Title => &track.title,
        SearchField::Album => &track.album,
        SearchField::Artist => &track.artist,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: &str, title: &str, album: &str, artist: &str) -> Track {
        Track {
            id: id.to_string(),
            title: title.to_string(),
            album: album.to_string(),
            album_id: "al".to_string(),
            artist: artist.to_string(),
            artist_id: "ar".to_string(),
            source: String::new(),
            icon_url: None,
            art_url: None,
            track_no: 1,
            duration_ms: 1000,
            genre: "Rock".to_string(),
            total_track_count: 1,
        }
    }

    #[test]
    fn matches_are_case_insensitive_substrings() {
        let tracks = vec![
            track("t1", "Rock and Roll", "X", "A"),
            track("t2", "Jazz Standards", "Y", "A"),
        ];
        let hits = search_tracks(&tracks, SearchField::Title, "rock");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "t1");
    }

    #[test]
    fn searches_only_the_requested_field() {
        let tracks = vec![track("t1", "Something", "Rocky Road", "A")];
        assert!(search_tracks(&tracks, SearchField::Title, "rock").is_empty());
        assert_eq!(search_tracks(&tracks, SearchField::Album, "rock").len(), 1);
        assert_eq!(search_tracks(&tracks, SearchField::Artist, "a").len(), 1);
    }

    #[test]
    fn empty_query_matches_everything() {
        let tracks = vec![
            track("t1", "One", "X", "A"),
            track("t2", "Two", "Y", "B"),
        ];
        assert_eq!(search_tracks(&tracks, SearchField::Title, "").len(), 2);
    }
}
