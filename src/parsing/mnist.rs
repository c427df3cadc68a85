//! The two MNIST record kinds, built on the generic IDX reader.

use super::idx::{self, Expect, ParseError};
use super::Dataset;

pub const LABEL_MAGIC: u32 = 2049;
pub const IMAGE_MAGIC: u32 = 2051;
pub const IMAGE_ROWS: u32 = 28;
pub const IMAGE_COLS: u32 = 28;
pub const IMAGE_SIZE: usize = (IMAGE_ROWS * IMAGE_COLS) as usize;
pub const NUM_CLASSES: usize = 10;
pub const GREYSCALE_SIZE: f64 = 255f64;

/// Load a label record file and return exactly `expected_count` labels,
/// each in 0..=9.
pub fn load_labels(path: &str, expected_count: u32) -> Result<Vec<u8>, ParseError> {
    let bytes = idx::read_file(path)?;

    parse_labels(path, &bytes, expected_count)
}

/// Load an image record file and return exactly `expected_count * 784` raw
/// intensity bytes, row-major per image, images in file order.
pub fn load_images(path: &str, expected_count: u32) -> Result<Vec<u8>, ParseError> {
    let bytes = idx::read_file(path)?;

    parse_images(path, &bytes, expected_count)
}

/// Load an image/label file pair into a dataset.
pub fn load_dataset(
    images_path: &str,
    labels_path: &str,
    expected_count: u32,
) -> Result<Dataset, ParseError> {
    let images = load_images(images_path, expected_count)?;
    let labels = load_labels(labels_path, expected_count)?;

    Ok(Dataset { images, labels })
}

fn parse_labels(path: &str, bytes: &[u8], expected_count: u32) -> Result<Vec<u8>, ParseError> {
    let header = [
        Expect {
            name: "magic number",
            value: LABEL_MAGIC,
        },
        Expect {
            name: "item count",
            value: expected_count,
        },
    ];
    let payload = idx::parse_records(path, bytes, &header, 1)?;

    // A label byte outside the ten digit classes would poison the one-hot
    // encoding later, so it is rejected here.
    if let Some(&bad) = payload.iter().find(|&&label| label > 9) {
        return Err(ParseError::Format {
            path: path.to_string(),
            field: "label value",
            expected: 9,
            actual: bad as u32,
        });
    }

    Ok(payload.to_vec())
}

fn parse_images(path: &str, bytes: &[u8], expected_count: u32) -> Result<Vec<u8>, ParseError> {
    let header = [
        Expect {
            name: "magic number",
            value: IMAGE_MAGIC,
        },
        Expect {
            name: "item count",
            value: expected_count,
        },
        Expect {
            name: "row count",
            value: IMAGE_ROWS,
        },
        Expect {
            name: "column count",
            value: IMAGE_COLS,
        },
    ];
    let payload = idx::parse_records(path, bytes, &header, IMAGE_SIZE)?;

    Ok(payload.to_vec())
}
