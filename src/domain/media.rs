//! Tracks that carry a kind (main, commentary, subtitles, ...).

use std::rc::Rc;

use crate::domain::{
    context::HostContext,
    identity::IdentityRegistry,
    track::{Track, TrackInit, TrackType},
};

pub const AUDIO_KINDS: &[&str] = &[
    "alternative",
    "commentary",
    "description",
    "main",
    "main-desc",
    "translation",
];

pub const VIDEO_KINDS: &[&str] = &[
    "alternative",
    "captions",
    "commentary",
    "main",
    "sign",
    "subtitles",
];

pub const TEXT_KINDS: &[&str] = &[
    "captions",
    "chapters",
    "descriptions",
    "forced",
    "metadata",
    "subtitles",
];

/// Kinds a track accepts. Anything else is stored as an empty kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindSet {
    kinds: Vec<String>,
}

impl KindSet {
    pub fn new<I, S>(kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kinds: kinds.into_iter().map(Into::into).collect(),
        }
    }

    pub fn defaults_for(track_type: TrackType) -> Self {
        let kinds = match track_type {
            TrackType::Audio => AUDIO_KINDS,
            TrackType::Video => VIDEO_KINDS,
            TrackType::Text => TEXT_KINDS,
        };
        Self::new(kinds.iter().copied())
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.kinds.iter().any(|accepted| accepted == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.kinds.iter().map(String::as_str)
    }
}

#[derive(Debug)]
pub struct MediaTrack {
    track: Track,
    kind: String,
    kinds: Rc<KindSet>,
}

impl MediaTrack {
    pub fn new(
        ids: &IdentityRegistry,
        context: Option<&Rc<dyn HostContext>>,
        init: TrackInit,
        kinds: Rc<KindSet>,
    ) -> Self {
        Self {
            track: Track::new(ids, context, init),
            kind: String::new(),
            kinds,
        }
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub(crate) fn track_mut(&mut self) -> &mut Track {
        &mut self.track
    }

    pub fn set_language(&mut self, language: impl Into<String>) {
        self.track.set_language(language);
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn set_kind(&mut self, kind: &str) {
        if self.kinds.contains(kind) {
            self.kind = kind.to_string();
        } else {
            self.kind.clear();
        }
    }

    pub fn accepted_kinds(&self) -> &KindSet {
        &self.kinds
    }
}
