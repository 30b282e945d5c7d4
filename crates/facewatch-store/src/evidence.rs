//! Evidence image store — JPEG crops of detected faces.

use chrono::{DateTime, Local};
use facewatch_core::{BoundingBox, Frame, FrameError};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Timestamp component of evidence filenames.
const FILENAME_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Debug, Error)]
pub enum EvidenceError {
    #[error("evidence store I/O at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Crop(#[from] FrameError),
    #[error("evidence image write failed: {0}")]
    Write(#[from] image::ImageError),
}

/// Directory of saved face crops.
///
/// Filenames are `{name}_{YYYYMMDD_HHMMSS}.jpg` with the identity name
/// substituted verbatim. A second save for the same name within the same
/// wall-clock second overwrites the first — last write wins.
#[derive(Debug, Clone)]
pub struct EvidenceStore {
    dir: PathBuf,
}

impl EvidenceStore {
    /// Open the store rooted at `dir`, creating the directory if missing.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, EvidenceError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| EvidenceError::Io {
            path: dir.display().to_string(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Filename a save at `time` for `name` will use.
    ///
    /// Pure, so a log record can reference the filename even when the image
    /// write itself fails.
    pub fn filename_for(name: &str, time: &DateTime<Local>) -> String {
        format!("{name}_{}.jpg", time.format(FILENAME_TIMESTAMP_FORMAT))
    }

    /// Crop `region` out of `frame` and write it as a JPEG.
    ///
    /// Returns the filename (not the full path) on success. The region must
    /// lie inside the frame; a malformed box is a crop error.
    pub fn save(
        &self,
        frame: &Frame,
        region: &BoundingBox,
        name: &str,
        time: &DateTime<Local>,
    ) -> Result<String, EvidenceError> {
        let crop = frame.crop(region)?;
        let filename = Self::filename_for(name, time);
        let path = self.dir.join(&filename);
        crop.to_rgb_image().save(&path)?;
        tracing::debug!(file = %filename, "saved evidence crop");
        Ok(filename)
    }
}
