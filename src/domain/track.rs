use std::{
    fmt::Display,
    rc::{Rc, Weak},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::domain::{
    bcp47::is_valid_language_tag,
    context::{HostContext, Severity},
    error::TrackError,
    identity::{IdentityRegistry, TrackId, UniqueId},
    list::ListId,
};

pub const NULL_CHARACTER_MESSAGE: &str =
    "The language contains a null character and is not a valid BCP 47 language tag.";

const PARENT_LOG_MASK: u64 = 0xffff_ffff_ffff_0000;
const CHILD_LOG_MASK: u64 = 0xffff;

/// Combines a parent's log identifier with a child id, keeping the parent's high 48 bits.
pub fn child_log_identifier(parent: u64, child: u64) -> u64 {
    (parent & PARENT_LOG_MASK) | (child & CHILD_LOG_MASK)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackType {
    Audio,
    Video,
    Text,
}

impl Display for TrackType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TrackType::Audio => "audio",
            TrackType::Video => "video",
            TrackType::Text => "text",
        };
        write!(f, "{name}")
    }
}

impl FromStr for TrackType {
    type Err = TrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "audio" => Ok(TrackType::Audio),
            "video" => Ok(TrackType::Video),
            "text" => Ok(TrackType::Text),
            _ => Err(TrackError::UnknownTrackType(s.to_string())),
        }
    }
}

/// Everything a track is created from
#[derive(Debug, Clone)]
pub struct TrackInit {
    pub track_type: TrackType,
    /// overrides the id derived from `track_id`
    pub id: Option<String>,
    pub track_id: TrackId,
    pub label: String,
    pub language: String,
}

/// Identity and language of a single audio, video or text track.
///
/// A track belongs to at most one [`TrackList`](crate::domain::list::TrackList). It only knows
/// the list's handle, the list owns the track.
#[derive(Debug)]
pub struct Track {
    unique_id: UniqueId,
    id: String,
    track_id: TrackId,
    track_type: TrackType,
    label: String,
    language: String,
    valid_bcp47_language: String,
    track_list: Option<ListId>,
    context: Option<Weak<dyn HostContext>>,
    log_identifier: u64,
}

impl Track {
    /// Creates a track observing `context`.
    ///
    /// An invalid initial language is cached as empty without any console message.
    pub fn new(
        ids: &IdentityRegistry,
        context: Option<&Rc<dyn HostContext>>,
        init: TrackInit,
    ) -> Self {
        let TrackInit {
            track_type,
            id,
            track_id,
            label,
            language,
        } = init;

        let unique_id = ids.next_id();
        let valid_bcp47_language = if is_valid_language_tag(&language) {
            language.clone()
        } else {
            String::new()
        };

        Self {
            unique_id,
            id: id.unwrap_or_else(|| track_id.to_string()),
            track_id,
            track_type,
            label,
            language,
            valid_bcp47_language,
            track_list: None,
            context: context.map(Rc::downgrade),
            log_identifier: unique_id.get(),
        }
    }

    pub fn unique_id(&self) -> UniqueId {
        self.unique_id
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn track_id(&self) -> TrackId {
        self.track_id
    }

    pub fn track_type(&self) -> TrackType {
        self.track_type
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// language exactly as last set, possibly not a valid tag
    pub fn language(&self) -> &str {
        &self.language
    }

    /// empty unless [`Track::language`] is a well-formed BCP 47 tag
    pub fn valid_bcp47_language(&self) -> &str {
        &self.valid_bcp47_language
    }

    pub fn set_language(&mut self, language: impl Into<String>) {
        let language = language.into();

        if language.is_empty() || is_valid_language_tag(&language) {
            self.valid_bcp47_language = language.clone();
            self.language = language;
            return;
        }

        self.valid_bcp47_language.clear();
        log::debug!(
            "track {:016x}: {language:?} is not a valid BCP 47 tag",
            self.log_identifier
        );

        let message = if language.contains('\0') {
            NULL_CHARACTER_MESSAGE.to_string()
        } else {
            format!("The language '{language}' is not a valid BCP 47 language tag.")
        };
        self.language = language;

        let Some(context) = self.script_context() else {
            return;
        };
        context.add_console_message(Severity::Warning, message);
    }

    /// The context this track reports to, if it is still around and live.
    pub fn script_context(&self) -> Option<Rc<dyn HostContext>> {
        self.context
            .as_ref()
            .and_then(Weak::upgrade)
            .filter(|context| context.is_live())
    }

    /// Switches the observed context, e.g. when the track moves to another document.
    pub fn observe_context(&mut self, context: Option<&Rc<dyn HostContext>>) {
        self.context = context.map(Rc::downgrade);
    }

    pub fn track_list(&self) -> Option<ListId> {
        self.track_list
    }

    pub(crate) fn set_track_list(&mut self, list: ListId) {
        self.track_list = Some(list);
    }

    pub(crate) fn clear_track_list(&mut self) {
        self.track_list = None;
    }

    pub fn log_identifier(&self) -> u64 {
        self.log_identifier
    }

    pub fn set_log_identifier(&mut self, parent: u64) {
        self.log_identifier = child_log_identifier(parent, self.unique_id.get());
    }
}
