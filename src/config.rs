use anyhow::Context;
use serde::Deserialize;
use std::{path::Path, rc::Rc};

use crate::domain::{
    context::HostContext,
    error::TrackError,
    identity::{IdentityRegistry, TrackId},
    list::{ListRegistry, TrackList},
    media::{KindSet, MediaTrack},
    track::{TrackInit, TrackType},
};

#[derive(Debug, Deserialize)]
pub struct Config {
    pub version: u32,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub kinds: KindOverrides,
    #[serde(default)]
    pub lists: Vec<ListConfig>,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&contents).with_context(|| "Failed to parse config TOML")
    }

    /// accepted kinds for `track_type`, the built-in set unless overridden
    pub fn kinds_for(&self, track_type: TrackType) -> KindSet {
        let overridden = match track_type {
            TrackType::Audio => &self.kinds.audio,
            TrackType::Video => &self.kinds.video,
            TrackType::Text => &self.kinds.text,
        };
        match overridden {
            Some(kinds) => KindSet::new(kinds.iter().cloned()),
            None => KindSet::defaults_for(track_type),
        }
    }

    /// Creates every configured list and its tracks.
    ///
    /// Unknown kinds and malformed languages are normalized, not rejected.
    pub fn build_lists(
        &self,
        ids: &IdentityRegistry,
        context: Option<&Rc<dyn HostContext>>,
    ) -> Result<ListRegistry, TrackError> {
        let mut lists = ListRegistry::new();

        for list_config in &self.lists {
            let list_id = lists.create_list(
                &list_config.name,
                list_config.track_type,
                self.kinds_for(list_config.track_type),
            )?;
            let kinds = lists
                .get(list_id)
                .map(TrackList::kinds)
                .ok_or(TrackError::UnknownList(list_id))?;

            for track_config in &list_config.tracks {
                let mut track = MediaTrack::new(
                    ids,
                    context,
                    TrackInit {
                        track_type: list_config.track_type,
                        id: track_config.id.clone(),
                        track_id: TrackId(track_config.track_id),
                        label: track_config.label.clone(),
                        language: track_config.language.clone(),
                    },
                    Rc::clone(&kinds),
                );

                track.set_kind(&track_config.kind);
                if track.kind() != track_config.kind {
                    log::warn!(
                        "list '{}': kind '{}' is not accepted for {} tracks, track {} has no kind",
                        list_config.name,
                        track_config.kind,
                        list_config.track_type,
                        track_config.track_id
                    );
                }

                lists.append(list_id, track)?;
            }
        }

        Ok(lists)
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct Logging {
    /// env_logger filter used when RUST_LOG is not set
    pub level: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct KindOverrides {
    pub audio: Option<Vec<String>>,
    pub video: Option<Vec<String>>,
    pub text: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct ListConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub track_type: TrackType,
    #[serde(default)]
    pub tracks: Vec<TrackConfig>,
}

#[derive(Debug, Deserialize)]
pub struct TrackConfig {
    pub id: Option<String>,
    pub track_id: u64,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub kind: String,
}
