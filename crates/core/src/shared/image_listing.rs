use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Lists the files directly inside `dir` whose name ends in `.<ext>` for one
/// of `extensions` (case-insensitive), sorted by file name.
///
/// The scan is not recursive. Symlinks are followed, so a link to an image
/// is listed while a directory (or a link to one) is skipped even when its
/// name carries a matching extension.
pub fn list_images(dir: &Path, extensions: &[&str]) -> io::Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if has_extension(&path, extensions) && fs::metadata(&path)?.is_file() {
            images.push(path);
        }
    }
    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(images)
}

/// Name-suffix match: a file called just `.jpg` counts as a JPEG.
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
        return false;
    };
    let name = name.to_lowercase();
    extensions.iter().any(|ext| {
        name.strip_suffix(ext)
            .is_some_and(|stem| stem.ends_with('.'))
    })
}
