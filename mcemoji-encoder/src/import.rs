//! Adding PNG files to a record store

use crate::{Error, Result};
use image::ImageFormat;
use mcemoji_core::{RecordDefaults, Store};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Outcome of importing a batch of files
#[derive(Debug, Default)]
pub struct ImportReport {
    /// Store indices of the accepted files, in input order
    pub added: Vec<usize>,
    /// Files that were not imported
    pub rejected: Vec<(PathBuf, Error)>,
}

impl ImportReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Imports a single PNG file, naming the emoji after the file
///
/// Only files ending in `.png` are accepted, and their content must be PNG.
/// The emoji gets the default metrics and no permission.
pub fn import_png(store: &mut Store, path: &Path, defaults: RecordDefaults) -> Result<usize> {
    let name = emoji_name(path).ok_or_else(|| Error::InvalidExtension(path.to_path_buf()))?;
    let bytes = fs::read(path)?;
    if !is_png(&bytes) {
        return Err(Error::NotPng(path.to_path_buf()));
    }

    let index = store.add(name, bytes, defaults.ascent, defaults.height, None);
    debug!(path = %path.display(), index, "imported emoji");
    Ok(index)
}

/// Imports every file it can, collecting the failures
pub fn import_pngs<I, P>(store: &mut Store, paths: I, defaults: RecordDefaults) -> ImportReport
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut report = ImportReport::default();
    for path in paths {
        let path = path.as_ref();
        match import_png(store, path, defaults) {
            Ok(index) => report.added.push(index),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "emoji not imported");
                report.rejected.push((path.to_path_buf(), err));
            }
        }
    }
    report
}

/// Derives the emoji name by stripping `.png` from the file name
pub(crate) fn emoji_name(path: &Path) -> Option<&str> {
    path.file_name()?
        .to_str()?
        .strip_suffix(".png")
        .filter(|stem| !stem.is_empty())
}

/// Checks the signature of PNG data
pub(crate) fn is_png(bytes: &[u8]) -> bool {
    matches!(image::guess_format(bytes), Ok(ImageFormat::Png))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::RgbaImage;
    use std::io::Cursor;

    pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        RgbaImage::new(width, height)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_emoji_name() {
        assert_eq!(emoji_name(Path::new("dir/smile.png")), Some("smile"));
        assert_eq!(emoji_name(Path::new("smile.PNG")), None);
        assert_eq!(emoji_name(Path::new("smile.jpg")), None);
        assert_eq!(emoji_name(Path::new(".png")), None);
        assert_eq!(emoji_name(Path::new("smile")), None);
    }

    #[test]
    fn test_import_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("smile.png");
        let png = png_bytes(4, 4);
        fs::write(&path, &png).unwrap();

        let mut store = Store::new();
        let index = import_png(&mut store, &path, RecordDefaults::default()).unwrap();

        let record = store.get(index).unwrap();
        assert_eq!(record.name, "smile");
        assert_eq!((record.ascent, record.height), (8, 9));
        assert_eq!(record.permission, None);
        assert_eq!(record.image, png);
    }

    #[test]
    fn test_import_batch_reports_rejections() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("smile.png");
        let fake = dir.path().join("fake.png");
        let text = dir.path().join("notes.txt");
        fs::write(&good, png_bytes(2, 2)).unwrap();
        fs::write(&fake, b"not an image").unwrap();
        fs::write(&text, b"hello").unwrap();

        let mut store = Store::new();
        let report = import_pngs(&mut store, [&text, &good, &fake], RecordDefaults::LEGACY);

        assert_eq!(report.added, vec![0]);
        assert!(!report.is_clean());
        assert_eq!(report.rejected.len(), 2);
        assert!(matches!(report.rejected[0].1, Error::InvalidExtension(_)));
        assert!(matches!(report.rejected[1].1, Error::NotPng(_)));
        assert_eq!(store.get(0).unwrap().ascent, 7);
        assert_eq!(
            report.rejected[0].1.to_string(),
            format!("Cannot load {}. Invalid extension", text.display())
        );
    }

    #[test]
    fn test_duplicate_file_names_are_renamed() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        fs::create_dir_all(&a).unwrap();
        fs::create_dir_all(&b).unwrap();
        fs::write(a.join("smile.png"), png_bytes(1, 1)).unwrap();
        fs::write(b.join("smile.png"), png_bytes(1, 1)).unwrap();

        let mut store = Store::new();
        let report = import_pngs(
            &mut store,
            [a.join("smile.png"), b.join("smile.png")],
            RecordDefaults::default(),
        );

        assert!(report.is_clean());
        assert_eq!(store.get(0).unwrap().name, "smile");
        assert_ne!(store.get(1).unwrap().name, "smile");
    }
}
