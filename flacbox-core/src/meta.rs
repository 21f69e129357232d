//! Embedded tag extraction
//!
//! Reads title/artist/album/track/disc/duration and embedded artwork from an
//! opened audio handle. Every field is independently optional and a parse
//! failure anywhere degrades to `None` — extraction never fails past its own
//! boundary.

use crate::store::ReadSeek;
use lofty::file::{AudioFile, TaggedFile, TaggedFileExt};
use lofty::probe::Probe;
use lofty::tag::{Accessor, ItemKey};
use tracing::debug;

/// Extracted per-file metadata, every field optional
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackMeta {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration_ms: Option<u64>,
    pub track_number: Option<u32>,
    pub disc_number: Option<u32>,
}

/// Metadata extraction over an opened document handle
///
/// The scanner and the playback session consume this as a capability so that
/// tests can substitute scripted extractors.
pub trait MetadataExtractor: Send + Sync {
    /// Extract display metadata; unparseable input yields an all-`None` result
    fn extract(&self, handle: Box<dyn ReadSeek>) -> TrackMeta;

    /// Extract embedded artwork bytes; absence and failure both yield `None`
    fn extract_art(&self, handle: Box<dyn ReadSeek>) -> Option<Vec<u8>>;
}

/// Tag reader backed by the `lofty` crate
///
/// Handles FLAC Vorbis comments along with the other tag formats lofty
/// understands, which covers files tagged by other players.
#[derive(Debug, Default)]
pub struct LoftyExtractor;

impl LoftyExtractor {
    /// Create a lofty-backed extractor
    pub fn new() -> Self {
        Self
    }

    fn probe(handle: Box<dyn ReadSeek>) -> Option<TaggedFile> {
        let probe = match Probe::new(handle).guess_file_type() {
            Ok(probe) => probe,
            Err(e) => {
                debug!("file type probe failed: {}", e);
                return None;
            }
        };
        match probe.read() {
            Ok(tagged) => Some(tagged),
            Err(e) => {
                debug!("tag read failed: {}", e);
                None
            }
        }
    }
}

impl MetadataExtractor for LoftyExtractor {
    fn extract(&self, handle: Box<dyn ReadSeek>) -> TrackMeta {
        let Some(tagged) = Self::probe(handle) else {
            return TrackMeta::default();
        };

        let duration_ms = Some(tagged.properties().duration().as_millis() as u64);

        let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) else {
            return TrackMeta {
                duration_ms,
                ..TrackMeta::default()
            };
        };

        // Track/disc tags sometimes carry "3/12" style strings; fall back to
        // parsing the leading digits when the typed accessor comes up empty.
        let track_number = tag.track().or_else(|| {
            tag.get_string(&ItemKey::TrackNumber).and_then(leading_number)
        });
        let disc_number = tag.disk().or_else(|| {
            tag.get_string(&ItemKey::DiscNumber).and_then(leading_number)
        });

        TrackMeta {
            title: tag.title().map(|s| s.to_string()),
            artist: tag.artist().map(|s| s.to_string()),
            album: tag.album().map(|s| s.to_string()),
            duration_ms,
            track_number,
            disc_number,
        }
    }

    fn extract_art(&self, handle: Box<dyn ReadSeek>) -> Option<Vec<u8>> {
        let tagged = Self::probe(handle)?;
        let tag = tagged.primary_tag().or_else(|| tagged.first_tag())?;
        tag.pictures().first().map(|picture| picture.data().to_vec())
    }
}

fn leading_number(raw: &str) -> Option<u32> {
    let digits: String = raw.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}
