use thiserror::Error;

use crate::domain::{identity::UniqueId, list::ListId, track::TrackType};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrackError {
    #[error("track {0} not found")]
    TrackNotFound(UniqueId),

    #[error("track {track} already belongs to list {list}")]
    AlreadyInList { track: UniqueId, list: ListId },

    #[error("{track_type} track {track} cannot be added to a {list_type} list")]
    TypeMismatch {
        track: UniqueId,
        track_type: TrackType,
        list_type: TrackType,
    },

    #[error("list {0} not found")]
    UnknownList(ListId),

    #[error("a list named '{0}' already exists")]
    DuplicateListName(String),

    #[error("unknown track type '{0}'")]
    UnknownTrackType(String),
}
