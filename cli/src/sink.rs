use std::path::Path;

use anyhow::Context;
use cloudmask_engine::MaskImage;

/// Encodes the mask; the format follows the file extension.
pub fn save_mask(mask: &MaskImage, path: &Path) -> anyhow::Result<()> {
    mask.save(path)
        .with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GrayImage;

    #[test]
    fn writes_readable_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mask.png");
        let mask = GrayImage::from_fn(6, 4, |x, _| image::Luma([if x < 3 { 0 } else { 255 }]));
        save_mask(&mask, &path).unwrap();
        let decoded = image::open(&path).unwrap().to_luma8();
        assert_eq!(decoded, mask);
    }

    #[test]
    fn missing_directory_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("mask.png");
        let err = save_mask(&GrayImage::new(2, 2), &path).unwrap_err();
        assert!(err.to_string().contains("failed to write"));
    }
}
