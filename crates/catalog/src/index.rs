use std::collections::HashMap;

use common::Track;
use serde::Serialize;

/// Derived browse views for one catalog scope. Always produced by a
/// full rebuild and published wholesale; never mutated in place.
/// Bucket ordering follows canonical catalog insertion order, so it
/// is stable across rebuilds.
#[derive(Clone, Debug, Default)]
pub struct CatalogIndex {
    artists: Vec<String>,
    genres: Vec<String>,
    by_artist: HashMap<String, Vec<Track>>,
    by_album: HashMap<String, Vec<Track>>,
    by_genre: HashMap<String, Vec<Track>>,
    albums_by_artist: HashMap<String, Vec<String>>,
}

impl CatalogIndex {
    pub fn build<'a>(tracks: impl IntoIterator<Item = &'a Track>) -> CatalogIndex {
        let mut index = CatalogIndex::default();
        for track in tracks {
            if !index.by_artist.contains_key(&track.artist) {
                index.artists.push(track.artist.clone());
            }
            if !index.by_genre.contains_key(&track.genre) {
                index.genres.push(track.genre.clone());
            }
            index
                .by_artist
                .entry(track.artist.clone())
                .or_default()
                .push(track.clone());
            index
                .by_album
                .entry(track.album.clone())
                .or_default()
                .push(track.clone());
            index
                .by_genre
                .entry(track.genre.clone())
                .or_default()
                .push(track.clone());
            let albums = index
                .albums_by_artist
                .entry(track.artist.clone())
                .or_default();
            if !albums.contains(&track.album) {
                albums.push(track.album.clone());
            }
        }
        index
    }

    /// Artist names in first-seen order.
    pub fn artists(&self) -> &[String] {
        &self.artists
    }

    /// Genre names in first-seen order.
    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    /// Distinct album names of one artist, first-seen order.
    pub fn albums_by_artist(&self, artist: &str) -> &[String] {
        self.albums_by_artist
            .get(artist)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn tracks_by_artist(&self, artist: &str) -> &[Track] {
        self.by_artist
            .get(artist)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn tracks_by_album(&self, album: &str) -> &[Track] {
        self.by_album
            .get(album)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn tracks_by_genre(&self, genre: &str) -> &[Track] {
        self.by_genre
            .get(genre)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn album_count(&self) -> usize {
        self.by_album.len()
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct CatalogStats {
    pub artists: usize,
    pub albums: usize,
    pub tracks: usize,
}
