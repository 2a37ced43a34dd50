//! Lists owning their tracks.
//!
//! A list is the only place that attaches a track to itself or detaches it again. Listed
//! tracks are never handed out mutably, changes go through [`ListRegistry`].

use std::{fmt::Display, rc::Rc};

use serde::Serialize;

use crate::domain::{
    error::TrackError,
    identity::UniqueId,
    media::{KindSet, MediaTrack},
    root::{ListRoots, OpaqueRoot},
    track::TrackType,
};

/// Handle of a list inside a [`ListRegistry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ListId(usize);

impl ListId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }
}

impl Display for ListId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug)]
pub struct TrackList {
    id: ListId,
    name: String,
    track_type: TrackType,
    kinds: Rc<KindSet>,
    tracks: Vec<MediaTrack>,
    log_identifier: u64,
}

impl TrackList {
    pub fn id(&self) -> ListId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn track_type(&self) -> TrackType {
        self.track_type
    }

    /// kind set shared by the tracks created for this list
    pub fn kinds(&self) -> Rc<KindSet> {
        Rc::clone(&self.kinds)
    }

    /// Takes ownership of `track` and points it back at this list.
    pub(crate) fn append(&mut self, mut track: MediaTrack) -> Result<UniqueId, TrackError> {
        let unique_id = track.track().unique_id();

        if track.track().track_type() != self.track_type {
            return Err(TrackError::TypeMismatch {
                track: unique_id,
                track_type: track.track().track_type(),
                list_type: self.track_type,
            });
        }
        if let Some(list) = track.track().track_list() {
            return Err(TrackError::AlreadyInList {
                track: unique_id,
                list,
            });
        }

        track.track_mut().set_track_list(self.id);
        track.track_mut().set_log_identifier(self.log_identifier);
        log::debug!(
            "track {:016x} added to list '{}'",
            track.track().log_identifier(),
            self.name
        );
        self.tracks.push(track);
        Ok(unique_id)
    }

    /// Hands the track back to the caller, no longer attached to any list.
    pub(crate) fn remove(&mut self, unique_id: UniqueId) -> Result<MediaTrack, TrackError> {
        let index = self
            .position(unique_id)
            .ok_or(TrackError::TrackNotFound(unique_id))?;

        let mut track = self.tracks.remove(index);
        track.track_mut().clear_track_list();
        log::debug!(
            "track {:016x} removed from list '{}'",
            track.track().log_identifier(),
            self.name
        );
        Ok(track)
    }

    fn position(&self, unique_id: UniqueId) -> Option<usize> {
        self.tracks
            .iter()
            .position(|track| track.track().unique_id() == unique_id)
    }

    pub fn get(&self, unique_id: UniqueId) -> Option<&MediaTrack> {
        self.position(unique_id).map(|index| &self.tracks[index])
    }

    fn get_mut(&mut self, unique_id: UniqueId) -> Option<&mut MediaTrack> {
        let index = self.position(unique_id)?;
        Some(&mut self.tracks[index])
    }

    /// looks a track up by its public id
    pub fn find_by_id(&self, id: &str) -> Option<&MediaTrack> {
        self.tracks.iter().find(|track| track.track().id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MediaTrack> {
        self.tracks.iter()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn opaque_root(&self) -> OpaqueRoot {
        OpaqueRoot::List(self.id)
    }

    pub fn log_identifier(&self) -> u64 {
        self.log_identifier
    }
}

/// Owns every list. Lists are never removed, so a [`ListId`] stays valid.
#[derive(Debug, Default)]
pub struct ListRegistry {
    lists: Vec<TrackList>,
}

impl ListRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_list(
        &mut self,
        name: &str,
        track_type: TrackType,
        kinds: KindSet,
    ) -> Result<ListId, TrackError> {
        if self.find(name).is_some() {
            return Err(TrackError::DuplicateListName(name.to_string()));
        }

        let id = ListId::new(self.lists.len());
        self.lists.push(TrackList {
            id,
            name: name.to_string(),
            track_type,
            kinds: Rc::new(kinds),
            tracks: Vec::new(),
            log_identifier: (self.lists.len() as u64 + 1) << 16,
        });
        Ok(id)
    }

    pub fn get(&self, id: ListId) -> Option<&TrackList> {
        self.lists.get(id.0)
    }

    pub fn find(&self, name: &str) -> Option<&TrackList> {
        self.lists.iter().find(|list| list.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackList> {
        self.lists.iter()
    }

    fn list_mut(&mut self, id: ListId) -> Result<&mut TrackList, TrackError> {
        self.lists.get_mut(id.0).ok_or(TrackError::UnknownList(id))
    }

    /// Looks up a listed track, read-only.
    pub fn track(&self, list: ListId, unique_id: UniqueId) -> Result<&MediaTrack, TrackError> {
        self.get(list)
            .ok_or(TrackError::UnknownList(list))?
            .get(unique_id)
            .ok_or(TrackError::TrackNotFound(unique_id))
    }

    fn track_mut(
        &mut self,
        list: ListId,
        unique_id: UniqueId,
    ) -> Result<&mut MediaTrack, TrackError> {
        self.list_mut(list)?
            .get_mut(unique_id)
            .ok_or(TrackError::TrackNotFound(unique_id))
    }

    pub fn append(&mut self, list: ListId, track: MediaTrack) -> Result<UniqueId, TrackError> {
        self.list_mut(list)?.append(track)
    }

    pub fn remove(&mut self, list: ListId, unique_id: UniqueId) -> Result<MediaTrack, TrackError> {
        self.list_mut(list)?.remove(unique_id)
    }

    pub fn set_language(
        &mut self,
        list: ListId,
        unique_id: UniqueId,
        language: &str,
    ) -> Result<(), TrackError> {
        self.track_mut(list, unique_id)?.set_language(language);
        Ok(())
    }

    pub fn set_kind(
        &mut self,
        list: ListId,
        unique_id: UniqueId,
        kind: &str,
    ) -> Result<(), TrackError> {
        self.track_mut(list, unique_id)?.set_kind(kind);
        Ok(())
    }

    /// Moves a track between two lists. Nothing changes if the move is not possible.
    pub fn move_track(
        &mut self,
        unique_id: UniqueId,
        from: ListId,
        to: ListId,
    ) -> Result<(), TrackError> {
        let target_type = self
            .get(to)
            .ok_or(TrackError::UnknownList(to))?
            .track_type();
        let source = self.get(from).ok_or(TrackError::UnknownList(from))?;
        let track = source
            .get(unique_id)
            .ok_or(TrackError::TrackNotFound(unique_id))?;

        if track.track().track_type() != target_type {
            return Err(TrackError::TypeMismatch {
                track: unique_id,
                track_type: track.track().track_type(),
                list_type: target_type,
            });
        }
        if from == to {
            return Ok(());
        }

        let track = self.lists[from.0].remove(unique_id)?;
        self.lists[to.0].append(track)?;
        Ok(())
    }
}

impl ListRoots for ListRegistry {
    fn list_root(&self, list: ListId) -> Option<OpaqueRoot> {
        self.get(list).map(TrackList::opaque_root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        identity::IdentityRegistry,
        track::{TrackInit, child_log_identifier, tests::init},
    };

    fn registry() -> anyhow::Result<(ListRegistry, ListId, ListId)> {
        let mut lists = ListRegistry::new();
        let audio = lists.create_list(
            "audio",
            TrackType::Audio,
            KindSet::defaults_for(TrackType::Audio),
        )?;
        let dub = lists.create_list(
            "dub",
            TrackType::Audio,
            KindSet::defaults_for(TrackType::Audio),
        )?;
        Ok((lists, audio, dub))
    }

    fn audio_track(ids: &IdentityRegistry, lists: &ListRegistry, list: ListId) -> MediaTrack {
        let kinds = lists.get(list).map(TrackList::kinds).unwrap();
        MediaTrack::new(ids, None, init(TrackType::Audio, "en"), kinds)
    }

    #[test]
    fn test_append_sets_owner_and_root() -> anyhow::Result<()> {
        let ids = IdentityRegistry::new();
        let (mut lists, audio, _) = registry()?;
        let track = audio_track(&ids, &lists, audio);

        let unique_id = lists.append(audio, track)?;

        let list = lists.get(audio).unwrap();
        let track = list.get(unique_id).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(track.track().track_list(), Some(audio));
        assert_eq!(track.track().opaque_root(&lists), OpaqueRoot::List(audio));
        assert_eq!(
            track.track().log_identifier(),
            child_log_identifier(list.log_identifier(), unique_id.get())
        );
        Ok(())
    }

    #[test]
    fn test_remove_detaches_track() -> anyhow::Result<()> {
        let ids = IdentityRegistry::new();
        let (mut lists, audio, _) = registry()?;
        let track = audio_track(&ids, &lists, audio);
        let unique_id = lists.append(audio, track)?;

        let track = lists.remove(audio, unique_id)?;

        assert!(lists.get(audio).unwrap().is_empty());
        assert_eq!(track.track().track_list(), None);
        assert_eq!(
            track.track().opaque_root(&lists),
            OpaqueRoot::Track(unique_id)
        );

        assert_eq!(
            lists.remove(audio, unique_id).unwrap_err(),
            TrackError::TrackNotFound(unique_id)
        );
        Ok(())
    }

    #[test]
    fn test_append_rejects_wrong_type() -> anyhow::Result<()> {
        let ids = IdentityRegistry::new();
        let (mut lists, audio, _) = registry()?;
        let video = MediaTrack::new(
            &ids,
            None,
            init(TrackType::Video, "en"),
            Rc::new(KindSet::defaults_for(TrackType::Video)),
        );
        let unique_id = video.track().unique_id();

        let err = lists.append(audio, video).unwrap_err();

        assert_eq!(
            err,
            TrackError::TypeMismatch {
                track: unique_id,
                track_type: TrackType::Video,
                list_type: TrackType::Audio,
            }
        );
        Ok(())
    }

    #[test]
    fn test_append_rejects_track_owned_elsewhere() -> anyhow::Result<()> {
        let ids = IdentityRegistry::new();
        let (mut lists, audio, dub) = registry()?;
        let mut track = audio_track(&ids, &lists, audio);
        track.track_mut().set_track_list(dub);
        let unique_id = track.track().unique_id();

        let err = lists.append(audio, track).unwrap_err();

        assert_eq!(
            err,
            TrackError::AlreadyInList {
                track: unique_id,
                list: dub,
            }
        );
        Ok(())
    }

    #[test]
    fn test_move_track_between_lists() -> anyhow::Result<()> {
        let ids = IdentityRegistry::new();
        let (mut lists, audio, dub) = registry()?;
        let track = audio_track(&ids, &lists, audio);
        let unique_id = lists.append(audio, track)?;

        lists.move_track(unique_id, audio, dub)?;

        assert!(lists.get(audio).unwrap().get(unique_id).is_none());
        let moved = lists.get(dub).unwrap().get(unique_id).unwrap();
        assert_eq!(moved.track().track_list(), Some(dub));
        assert_eq!(moved.track().opaque_root(&lists), OpaqueRoot::List(dub));
        Ok(())
    }

    #[test]
    fn test_move_track_to_wrong_type_changes_nothing() -> anyhow::Result<()> {
        let ids = IdentityRegistry::new();
        let (mut lists, audio, _) = registry()?;
        let text = lists.create_list(
            "subs",
            TrackType::Text,
            KindSet::defaults_for(TrackType::Text),
        )?;
        let track = audio_track(&ids, &lists, audio);
        let unique_id = lists.append(audio, track)?;

        let err = lists.move_track(unique_id, audio, text).unwrap_err();

        assert!(matches!(err, TrackError::TypeMismatch { .. }));
        let track = lists.get(audio).unwrap().get(unique_id).unwrap();
        assert_eq!(track.track().track_list(), Some(audio));
        Ok(())
    }

    #[test]
    fn test_duplicate_list_name() -> anyhow::Result<()> {
        let (mut lists, _, _) = registry()?;
        let err = lists
            .create_list("audio", TrackType::Audio, KindSet::defaults_for(TrackType::Audio))
            .unwrap_err();
        assert_eq!(err, TrackError::DuplicateListName("audio".to_string()));
        Ok(())
    }

    #[test]
    fn test_find_by_public_id() -> anyhow::Result<()> {
        let ids = IdentityRegistry::new();
        let (mut lists, audio, _) = registry()?;
        let kinds = lists.get(audio).unwrap().kinds();
        let track = MediaTrack::new(
            &ids,
            None,
            TrackInit {
                id: Some("director".to_string()),
                ..init(TrackType::Audio, "en")
            },
            kinds,
        );
        let unique_id = lists.append(audio, track)?;

        lists.set_language(audio, unique_id, "fr-CA")?;

        let track = lists.find("audio").unwrap().find_by_id("director").unwrap();
        assert_eq!(track.track().valid_bcp47_language(), "fr-CA");
        assert!(lists.find("audio").unwrap().find_by_id("7").is_none());
        Ok(())
    }

    fn assert_owned_by_holder(lists: &ListRegistry) {
        for list in lists.iter() {
            for track in list.iter() {
                assert_eq!(track.track().track_list(), Some(list.id()));
                assert_eq!(track.track().opaque_root(lists), list.opaque_root());
            }
        }
    }

    #[test]
    fn test_listed_tracks_stay_owned_by_their_list() -> anyhow::Result<()> {
        let ids = IdentityRegistry::new();
        let (mut lists, audio, dub) = registry()?;
        let first = lists.append(audio, audio_track(&ids, &lists, audio))?;
        let second = lists.append(audio, audio_track(&ids, &lists, audio))?;
        assert_owned_by_holder(&lists);

        lists.set_language(audio, first, "en_GB")?;
        lists.set_kind(audio, first, "commentary")?;
        lists.set_kind(audio, second, "karaoke")?;
        assert_owned_by_holder(&lists);

        let listed = lists.track(audio, first)?;
        assert_eq!(listed.track().language(), "en_GB");
        assert_eq!(listed.track().valid_bcp47_language(), "");
        assert_eq!(listed.kind(), "commentary");
        assert_eq!(lists.track(audio, second)?.kind(), "");

        lists.move_track(second, audio, dub)?;
        assert_owned_by_holder(&lists);

        let evicted = lists.remove(audio, first)?;
        assert_owned_by_holder(&lists);
        assert_eq!(evicted.track().track_list(), None);
        assert_eq!(lists.append(dub, evicted)?, first);
        assert_owned_by_holder(&lists);
        Ok(())
    }

    #[test]
    fn test_mutators_report_unknown_list_and_track() -> anyhow::Result<()> {
        let ids = IdentityRegistry::new();
        let (mut lists, audio, dub) = registry()?;
        let unique_id = lists.append(audio, audio_track(&ids, &lists, audio))?;
        let missing = ListId::new(9);

        assert_eq!(
            lists.set_language(missing, unique_id, "en").unwrap_err(),
            TrackError::UnknownList(missing)
        );
        assert_eq!(
            lists.set_kind(dub, unique_id, "main").unwrap_err(),
            TrackError::TrackNotFound(unique_id)
        );
        assert_eq!(
            lists.track(dub, unique_id).unwrap_err(),
            TrackError::TrackNotFound(unique_id)
        );
        Ok(())
    }
}
