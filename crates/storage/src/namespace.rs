//! The two tile namespaces and their object layout.

use object_store::path::Path;
use pyramid_common::{TileId, TileKind};
use std::fmt;

/// Partition of the tile store.
///
/// Objects live at `{dir}/{zoom}_{tx}_{ty}.{extension}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Rendered PNG rasters
    Image,
    /// Point records as CSV
    Data,
}

impl Namespace {
    pub const ALL: [Namespace; 2] = [Namespace::Image, Namespace::Data];

    pub fn dir(&self) -> &'static str {
        match self {
            Namespace::Image => "image_tiles",
            Namespace::Data => "data_tiles",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Namespace::Image => "png",
            Namespace::Data => "csv",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Namespace::Image => "image/png",
            Namespace::Data => "text/csv",
        }
    }

    pub fn for_kind(kind: TileKind) -> Self {
        match kind {
            TileKind::Image => Namespace::Image,
            TileKind::Data => Namespace::Data,
        }
    }

    /// Object path of `id` in this namespace.
    pub fn object_path(&self, id: &TileId) -> Path {
        Path::from(format!("{}/{}.{}", self.dir(), id.key(), self.extension()))
    }

    /// Recover the tile id from an object file name, if it belongs here.
    pub fn parse_file_name(&self, file_name: &str) -> Option<TileId> {
        file_name
            .strip_suffix(self.extension())
            .and_then(|stem| stem.strip_suffix('.'))
            .and_then(|key| key.parse().ok())
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Namespace::Image => write!(f, "image"),
            Namespace::Data => write!(f, "data"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_paths() {
        let id = TileId::new(2, -1, 7);
        assert_eq!(Namespace::Image.object_path(&id).as_ref(), "image_tiles/2_-1_7.png");
        assert_eq!(Namespace::Data.object_path(&id).as_ref(), "data_tiles/2_-1_7.csv");
    }

    #[test]
    fn test_parse_file_name() {
        assert_eq!(
            Namespace::Image.parse_file_name("3_4_-5.png"),
            Some(TileId::new(3, 4, -5))
        );
        assert_eq!(Namespace::Image.parse_file_name("3_4_5.csv"), None);
        assert_eq!(Namespace::Data.parse_file_name("3_4_5.csv#12"), None);
        assert_eq!(Namespace::Data.parse_file_name("notes.csv"), None);
    }

    #[test]
    fn test_for_kind() {
        assert_eq!(Namespace::for_kind(TileKind::Image), Namespace::Image);
        assert_eq!(Namespace::for_kind(TileKind::Data), Namespace::Data);
    }
}
