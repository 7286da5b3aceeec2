//! Content-derived frame identifiers.
//!
//! A frame's id names its scene node and is the `/item/<id>` route segment, so
//! it must be a pure function of the image source.

use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier of a frame, derived from its image source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(Uuid);

impl FrameId {
    /// Derive the id for an image source (name-based UUID, URL namespace).
    pub fn from_source(source: &str) -> Self {
        Self(Uuid::new_v5(&Uuid::NAMESPACE_URL, source.as_bytes()))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for FrameId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "https://images.pexels.com/photos/1103970/pexels-photo-1103970.jpeg";

    #[test]
    fn test_id_is_deterministic() {
        assert_eq!(FrameId::from_source(SOURCE), FrameId::from_source(SOURCE));
        assert_eq!(
            FrameId::from_source(SOURCE).to_string(),
            FrameId::from_source(SOURCE).to_string()
        );
    }

    #[test]
    fn test_distinct_sources_get_distinct_ids() {
        assert_ne!(
            FrameId::from_source("photos/a.jpg"),
            FrameId::from_source("photos/b.jpg")
        );
    }

    #[test]
    fn test_display_round_trips_through_route_segment() {
        let id = FrameId::from_source(SOURCE);
        let text = id.to_string();
        assert_eq!(text.len(), 36);
        assert_eq!(text, text.to_lowercase());
        assert_eq!(text.parse::<FrameId>().unwrap(), id);
        assert_eq!(id.as_uuid().get_version_num(), 5);
    }
}
