//! Ordered playlist list mirrored from the backend

use std::collections::HashSet;

use syncify_protocol::{Playlist, PlaylistId};
use tracing::warn;
use uuid::Uuid;

/// The playlists in backend order
///
/// Records are addressed by id; positions are only used for display and for
/// the positional helpers. Ids are kept unique and non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistStore {
    playlists: Vec<Playlist>,
}

impl PlaylistStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.playlists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.playlists.is_empty()
    }

    pub fn as_slice(&self) -> &[Playlist] {
        &self.playlists
    }

    pub fn iter(&self) -> impl Iterator<Item = &Playlist> {
        self.playlists.iter()
    }

    pub fn contains(&self, id: &PlaylistId) -> bool {
        self.position(id).is_some()
    }

    pub fn position(&self, id: &PlaylistId) -> Option<usize> {
        self.playlists.iter().position(|p| &p.id == id)
    }

    pub fn get(&self, id: &PlaylistId) -> Option<&Playlist> {
        self.playlists.iter().find(|p| &p.id == id)
    }

    pub fn get_mut(&mut self, id: &PlaylistId) -> Option<&mut Playlist> {
        self.playlists.iter_mut().find(|p| &p.id == id)
    }

    pub fn get_at(&self, index: usize) -> Option<&Playlist> {
        self.playlists.get(index)
    }

    /// Swap in a new list wholesale
    ///
    /// Records arriving without an id, or repeating one seen earlier in the
    /// list, get a fresh id. Returns how many were reassigned.
    pub fn replace(&mut self, playlists: Vec<Playlist>) -> usize {
        self.playlists = playlists;

        let mut seen = HashSet::with_capacity(self.playlists.len());
        let mut clashing = Vec::new();
        for (index, playlist) in self.playlists.iter().enumerate() {
            if playlist.id.is_empty() || !seen.insert(playlist.id.clone()) {
                clashing.push(index);
            }
        }

        for &index in &clashing {
            let id = self.fresh_id();
            warn!(
                "playlist '{}' had id '{}', reassigned {id}",
                self.playlists[index].name, self.playlists[index].id
            );
            self.playlists[index].id = id;
        }

        clashing.len()
    }

    /// Append a "New Playlist" placeholder and return its id
    pub fn push_new(&mut self) -> PlaylistId {
        let id = self.fresh_id();
        self.playlists.push(Playlist::placeholder(id.clone()));
        id
    }

    pub fn remove(&mut self, id: &PlaylistId) -> Option<Playlist> {
        let index = self.position(id)?;
        Some(self.playlists.remove(index))
    }

    pub fn remove_at(&mut self, index: usize) -> Option<Playlist> {
        (index < self.playlists.len()).then(|| self.playlists.remove(index))
    }

    fn fresh_id(&self) -> PlaylistId {
        loop {
            let id = PlaylistId::new(Uuid::new_v4().to_string());
            if !self.contains(&id) {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(id: &str, name: &str) -> Playlist {
        Playlist {
            name: name.to_string(),
            ..Playlist::placeholder(id.into())
        }
    }

    #[test]
    fn test_push_new_is_placeholder() {
        let mut store = PlaylistStore::new();
        let id = store.push_new();
        let playlist = store.get(&id).unwrap();
        assert_eq!(playlist.name, "New Playlist");
        assert_eq!(playlist.sleep, 0);
        assert!(Uuid::parse_str(id.as_str()).is_ok());
    }

    #[test]
    fn test_replace_repairs_ids() {
        let mut store = PlaylistStore::new();
        let repaired = store.replace(vec![
            named("a", "One"),
            named("a", "Two"),
            named("", "Three"),
            named("b", "Four"),
        ]);
        assert_eq!(repaired, 2);
        assert_eq!(store.get_at(0).unwrap().id, PlaylistId::from("a"));
        assert_ne!(store.get_at(1).unwrap().id, PlaylistId::from("a"));
        assert!(!store.get_at(2).unwrap().id.is_empty());
        assert_eq!(store.get_at(3).unwrap().id, PlaylistId::from("b"));

        let ids: HashSet<_> = store.iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn test_remove_by_id_and_index() {
        let mut store = PlaylistStore::new();
        store.replace(vec![named("a", "One"), named("b", "Two"), named("c", "Three")]);

        assert_eq!(store.remove(&"b".into()).unwrap().name, "Two");
        assert_eq!(store.position(&"c".into()), Some(1));
        assert!(store.remove(&"b".into()).is_none());

        assert_eq!(store.remove_at(0).unwrap().name, "One");
        assert!(store.remove_at(5).is_none());
        assert_eq!(store.len(), 1);
    }
}
