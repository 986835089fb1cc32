//! Saving the generated pack to disk.
//!
//! The pack is written verbatim — the saved bytes are exactly the UTF-8 of
//! the generated text, no re-encoding, no trailing additions.

use std::fs;
use std::path::{Path, PathBuf};

pub const PACK_FILENAME: &str = "pack_creativo.txt";

/// Write the pack text to `path` byte-for-byte.
pub fn write_pack(path: &Path, text: &str) -> std::io::Result<()> {
    fs::write(path, text.as_bytes())
}

/// Ask the user where to save, pre-filled with [`PACK_FILENAME`]. Returns
/// the chosen path, or `None` when the dialog was cancelled.
pub fn ask_pack_path() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_file_name(PACK_FILENAME)
        .add_filter("Text", &["txt"])
        .save_file()
}
