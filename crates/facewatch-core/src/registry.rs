//! Known-identity registry built from a directory of reference images.
//!
//! One image per identity: the filename stem is the name, the first detected
//! face provides the embedding. The registry is rebuilt wholesale on every
//! registration pass; nothing is cached between runs.

use crate::embedder::FaceEmbedder;
use crate::frame::Frame;
use crate::types::Embedding;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extensions considered reference images. Matching is exact, so uppercase
/// variants ("x.JPG") are ignored.
const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// A registered identity: reference filename stem plus its embedding.
#[derive(Debug, Clone)]
pub struct KnownIdentity {
    pub name: String,
    pub embedding: Embedding,
}

/// Why a reference image contributed no identity.
#[derive(Debug, Clone)]
pub enum SkipReason {
    /// The image decoded but the embedder found no face in it.
    NoFace,
    /// The file could not be read or decoded.
    Unreadable(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NoFace => write!(f, "no face found"),
            SkipReason::Unreadable(err) => write!(f, "unreadable: {err}"),
        }
    }
}

/// Outcome of one registration pass over a reference directory.
#[derive(Debug)]
pub struct LoadReport {
    pub registry: IdentityRegistry,
    /// Filenames that contributed an identity, in iteration order.
    pub registered: Vec<String>,
    /// Filenames that were skipped, with the reason.
    pub skipped: Vec<(String, SkipReason)>,
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("cannot read registry directory {dir}: {source}")]
    DirUnreadable {
        dir: String,
        #[source]
        source: std::io::Error,
    },
    #[error("no usable reference faces in {dir} ({} file(s) skipped)", .skipped.len())]
    Empty {
        dir: String,
        skipped: Vec<(String, SkipReason)>,
    },
}

/// In-memory lookup table of known identities.
///
/// Entry order is the lexicographic order of the source filenames, which
/// makes last-wins deduplication and tie-breaking deterministic.
#[derive(Debug, Clone, Default)]
pub struct IdentityRegistry {
    entries: Vec<KnownIdentity>,
}

impl IdentityRegistry {
    /// Build a registry by scanning `dir` for reference images.
    ///
    /// Files are visited in lexicographic filename order. Unreadable images
    /// and images without a detectable face are skipped with a warning; a
    /// duplicate stem replaces the earlier entry in place (last file wins).
    /// A pass that yields zero identities is an error — there is nothing to
    /// recognize against.
    pub fn load(dir: &Path, embedder: &mut dyn FaceEmbedder) -> Result<LoadReport, RegistryError> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
            .map_err(|source| RegistryError::DirUnreadable {
                dir: dir.display().to_string(),
                source,
            })?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| has_image_extension(path))
            .collect();
        files.sort();

        let mut registry = IdentityRegistry::default();
        let mut registered = Vec::new();
        let mut skipped = Vec::new();

        for path in files {
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string();
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_string();

            let frame = match load_frame(&path) {
                Ok(frame) => frame,
                Err(err) => {
                    tracing::warn!(file = %file_name, error = %err, "skipping unreadable reference image");
                    skipped.push((file_name, SkipReason::Unreadable(err.to_string())));
                    continue;
                }
            };

            // Only the first detected face provides the reference embedding.
            match embedder.embed(&frame).into_iter().next() {
                Some(face) => {
                    tracing::info!(file = %file_name, name = %stem, "registered identity");
                    registry.insert(stem, face.embedding);
                    registered.push(file_name);
                }
                None => {
                    tracing::warn!(file = %file_name, "no face found in reference image");
                    skipped.push((file_name, SkipReason::NoFace));
                }
            }
        }

        if registry.is_empty() {
            return Err(RegistryError::Empty {
                dir: dir.display().to_string(),
                skipped,
            });
        }

        Ok(LoadReport { registry, registered, skipped })
    }

    /// Build a registry from explicit (name, embedding) pairs.
    ///
    /// Duplicate names keep their first position; the later embedding wins.
    pub fn from_entries(entries: impl IntoIterator<Item = (String, Embedding)>) -> Self {
        let mut registry = IdentityRegistry::default();
        for (name, embedding) in entries {
            registry.insert(name, embedding);
        }
        registry
    }

    fn insert(&mut self, name: String, embedding: Embedding) {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(existing) => existing.embedding = embedding,
            None => self.entries.push(KnownIdentity { name, embedding }),
        }
    }

    pub fn entries(&self) -> &[KnownIdentity] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext))
}

fn load_frame(path: &Path) -> Result<Frame, image::ImageError> {
    let img = image::open(path)?;
    Ok(Frame::from(img.to_rgb8()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BoundingBox, ProbeFace};
    use std::path::Path;

    /// Embedder stub that derives the embedding from the top-left pixel
    /// color. Black frames count as "no face".
    struct ColorEmbedder;

    impl FaceEmbedder for ColorEmbedder {
        fn embed(&mut self, frame: &Frame) -> Vec<ProbeFace> {
            let Some([r, g, b]) = frame.pixel(0, 0) else {
                return Vec::new();
            };
            if r == 0 && g == 0 && b == 0 {
                return Vec::new();
            }
            vec![ProbeFace {
                location: BoundingBox {
                    top: 0,
                    right: frame.width,
                    bottom: frame.height,
                    left: 0,
                },
                embedding: Embedding::new(vec![
                    r as f32 / 255.0,
                    g as f32 / 255.0,
                    b as f32 / 255.0,
                ]),
            }]
        }
    }

    fn write_image(path: &Path, rgb: [u8; 3]) {
        let img = image::RgbImage::from_pixel(8, 8, image::Rgb(rgb));
        img.save(path).expect("test image should save");
    }

    #[test]
    fn test_load_registers_identities() {
        let dir = tempfile::tempdir().expect("tempdir should be available");
        write_image(&dir.path().join("alice.png"), [200, 10, 10]);
        write_image(&dir.path().join("bob.png"), [10, 200, 10]);

        let report = IdentityRegistry::load(dir.path(), &mut ColorEmbedder).unwrap();
        assert_eq!(report.registry.len(), 2);
        assert_eq!(report.registered, vec!["alice.png", "bob.png"]);
        assert!(report.skipped.is_empty());

        let names: Vec<_> = report.registry.names().collect();
        assert_eq!(names, vec!["alice", "bob"]);
    }

    #[test]
    fn test_duplicate_stem_last_file_wins_in_place() {
        let dir = tempfile::tempdir().expect("tempdir should be available");
        // Lexicographic order: alice.jpg, alice.png, bob.png — alice.png
        // replaces alice.jpg without moving her ahead of bob.
        write_image(&dir.path().join("alice.jpg"), [200, 10, 10]);
        write_image(&dir.path().join("alice.png"), [10, 10, 200]);
        write_image(&dir.path().join("bob.png"), [10, 200, 10]);

        let report = IdentityRegistry::load(dir.path(), &mut ColorEmbedder).unwrap();
        let entries = report.registry.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "alice");
        assert_eq!(entries[1].name, "bob");

        // alice carries the embedding of the later file (blue, PNG is lossless).
        let alice = &entries[0].embedding.values;
        assert!((alice[2] - 200.0 / 255.0).abs() < 1e-6);
        assert!(alice[0] < 0.1);
    }

    #[test]
    fn test_uppercase_extension_ignored() {
        let dir = tempfile::tempdir().expect("tempdir should be available");
        write_image(&dir.path().join("alice.png"), [200, 10, 10]);
        // Saved as PNG content; the extension alone decides eligibility.
        let img = image::RgbImage::from_pixel(8, 8, image::Rgb([10, 200, 10]));
        let mut buf = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
            .expect("png encode");
        std::fs::write(dir.path().join("carol.PNG"), buf).expect("write");

        let report = IdentityRegistry::load(dir.path(), &mut ColorEmbedder).unwrap();
        assert_eq!(report.registry.len(), 1);
        let names: Vec<_> = report.registry.names().collect();
        assert_eq!(names, vec!["alice"]);
    }

    #[test]
    fn test_no_face_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().expect("tempdir should be available");
        write_image(&dir.path().join("alice.png"), [200, 10, 10]);
        write_image(&dir.path().join("empty.png"), [0, 0, 0]);

        let report = IdentityRegistry::load(dir.path(), &mut ColorEmbedder).unwrap();
        assert_eq!(report.registry.len(), 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].0, "empty.png");
        assert!(matches!(report.skipped[0].1, SkipReason::NoFace));
    }

    #[test]
    fn test_unreadable_file_is_skipped() {
        let dir = tempfile::tempdir().expect("tempdir should be available");
        write_image(&dir.path().join("alice.png"), [200, 10, 10]);
        std::fs::write(dir.path().join("junk.png"), b"not an image").expect("write");

        let report = IdentityRegistry::load(dir.path(), &mut ColorEmbedder).unwrap();
        assert_eq!(report.registry.len(), 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].0, "junk.png");
        assert!(matches!(report.skipped[0].1, SkipReason::Unreadable(_)));
    }

    #[test]
    fn test_zero_usable_faces_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir should be available");
        write_image(&dir.path().join("empty.png"), [0, 0, 0]);

        let result = IdentityRegistry::load(dir.path(), &mut ColorEmbedder);
        match result {
            Err(RegistryError::Empty { skipped, .. }) => {
                assert_eq!(skipped.len(), 1);
            }
            other => panic!("expected Empty, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_directory_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir should be available");
        let result = IdentityRegistry::load(dir.path(), &mut ColorEmbedder);
        assert!(matches!(result, Err(RegistryError::Empty { .. })));
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let result =
            IdentityRegistry::load(Path::new("/nonexistent/facewatch-registry"), &mut ColorEmbedder);
        assert!(matches!(result, Err(RegistryError::DirUnreadable { .. })));
    }

    #[test]
    fn test_from_entries_last_wins() {
        let registry = IdentityRegistry::from_entries([
            ("alice".to_string(), Embedding::new(vec![1.0])),
            ("bob".to_string(), Embedding::new(vec![2.0])),
            ("alice".to_string(), Embedding::new(vec![3.0])),
        ]);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.entries()[0].name, "alice");
        assert_eq!(registry.entries()[0].embedding.values, vec![3.0]);
        assert_eq!(registry.entries()[1].name, "bob");
    }
}
