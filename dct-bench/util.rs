use std::path::Path;

use dct_denoise::{codec::Png, DecodeError, ImageBuffer, ImageCodec};

pub fn from_png(data: &[u8]) -> Result<ImageBuffer, DecodeError> {
    Png::default().decode(data)
}

/// Directory holding `path`, as the key its suite is stored under.
pub fn parent_dir(path: &Path) -> Option<&str> {
    path.parent().and_then(Path::to_str)
}

pub fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
}
