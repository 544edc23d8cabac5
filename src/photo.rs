//! Picking and decoding the photo shown under the text

use std::fs;
use std::path::{Path, PathBuf};

use image::{GenericImageView, ImageBuffer, Rgb};
use rand::Rng;

use crate::error::PaperError;

/// Decoded photo, 16 bits per channel
pub type Photo = ImageBuffer<Rgb<u16>, Vec<u16>>;

/// File extensions treated as photos
const EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Chooses one of `n` candidates
pub trait Selector {
    /// Index in `0..n`, or `None` when there is nothing to choose from
    fn pick(&mut self, n: usize) -> Option<usize>;
}

/// Uniformly random choice
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomPick;

impl Selector for RandomPick {
    fn pick(&mut self, n: usize) -> Option<usize> {
        (n > 0).then(|| rand::thread_rng().gen_range(0..n))
    }
}

impl<F> Selector for F
where
    F: FnMut(usize) -> Option<usize>,
{
    fn pick(&mut self, n: usize) -> Option<usize> {
        self(n).filter(|&i| i < n)
    }
}

/// Decode an encoded image (PNG or JPEG)
pub fn decode(bytes: &[u8]) -> Result<Photo, PaperError> {
    let img = image::load_from_memory(bytes)?;
    let (w, h) = img.dimensions();
    log::debug!("Decoded {}x{} photo", w, h);
    Ok(img.to_rgb16())
}

/// Photo files directly inside `dir`, sorted by name
pub fn candidates(dir: &Path) -> Result<Vec<PathBuf>, PaperError> {
    let entries = fs::read_dir(dir).map_err(|e| PaperError::MissingSource {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut found: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && is_photo(p))
        .collect();
    found.sort();
    Ok(found)
}

fn is_photo(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// Pick one photo from `dir` and decode it
pub fn load(dir: &Path, selector: &mut impl Selector) -> Result<Photo, PaperError> {
    let found = candidates(dir)?;
    let Some(path) = selector.pick(found.len()).and_then(|i| found.get(i)) else {
        return Err(PaperError::MissingSource {
            path: dir.to_path_buf(),
            reason: format!("no photo picked among {} candidates", found.len()),
        });
    };

    log::info!("Showing photo {}", path.display());
    let bytes = fs::read(path).map_err(|e| PaperError::MissingSource {
        path: path.clone(),
        reason: e.to_string(),
    })?;
    decode(&bytes)
}
