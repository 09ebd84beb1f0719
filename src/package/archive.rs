//! ZIP packaging of captured images.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::CapturedImage;
use crate::error::Result;

/// Bundle images into a ZIP archive, one flat entry per image, in order.
pub fn build_zip(images: &[CapturedImage]) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for image in images {
        let name = image.file_name.replace(['/', '\\'], "_");
        writer.start_file(name, options)?;
        writer.write_all(&image.bytes)?;
    }

    Ok(writer.finish()?.into_inner())
}
