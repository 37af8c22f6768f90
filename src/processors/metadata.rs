// pixtone/src/processors/metadata.rs
use crate::core::{Error, Result};
use exif::{Exif, In, Reader, Tag};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

const COMMON_FIELDS: [(Tag, &str); 12] = [
    (Tag::Make, "Camera Make"),
    (Tag::Model, "Camera Model"),
    (Tag::DateTimeOriginal, "Original Date/Time"),
    (Tag::ExposureTime, "Exposure Time"),
    (Tag::FNumber, "Aperture"),
    (Tag::FocalLength, "Focal Length"),
    (Tag::PhotographicSensitivity, "ISO"),
    (Tag::ExposureBiasValue, "Exposure Bias"),
    (Tag::WhiteBalance, "White Balance"),
    (Tag::Orientation, "Orientation"),
    (Tag::Software, "Software"),
    (Tag::ColorSpace, "Color Space"),
];

pub struct MetadataProcessor;

impl MetadataProcessor {
    pub fn new() -> Self {
        Self
    }

    pub fn read_metadata(&self, path: &Path) -> Result<Option<Exif>> {
        let file = File::open(path).map_err(|e| Error::decode(path, e))?;
        let mut bufreader = BufReader::new(&file);

        match Reader::new().read_from_container(&mut bufreader) {
            Ok(exif) => {
                log::debug!("Found EXIF data in {}", path.display());
                Ok(Some(exif))
            }
            Err(exif::Error::NotFound(_)) => {
                log::debug!("No EXIF data found in {}", path.display());
                Ok(None)
            }
            Err(e) => {
                log::warn!("Failed to read EXIF from {}: {}", path.display(), e);
                Ok(None)
            }
        }
    }

    pub fn has_metadata(&self, path: &Path) -> Result<bool> {
        Ok(self.read_metadata(path)?.is_some())
    }

    /// Labelled values for the shooting parameters worth showing next to an edit.
    pub fn extract_common_metadata(&self, exif: &Exif) -> Vec<(String, String)> {
        COMMON_FIELDS
            .iter()
            .filter_map(|(tag, label)| {
                exif.get_field(*tag, In::PRIMARY).map(|field| {
                    (
                        label.to_string(),
                        field.display_value().with_unit(exif).to_string(),
                    )
                })
            })
            .collect()
    }
}

impl Default for MetadataProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;
    use assert_fs::TempDir;

    #[test]
    fn png_without_exif_reports_none() {
        let temp = TempDir::new().unwrap();
        let file = temp.child("plain.png");
        image::RgbImage::new(2, 2).save(file.path()).unwrap();

        let processor = MetadataProcessor::new();
        assert!(!processor.has_metadata(file.path()).unwrap());
    }

    #[test]
    fn missing_file_is_an_error() {
        let processor = MetadataProcessor::new();
        assert!(processor.read_metadata(Path::new("/nonexistent.jpg")).is_err());
    }
}
