//! Frame sequences discovered on disk, one directory per animation variant.
use std::{
    collections::HashMap,
    fmt, fs,
    path::{Path, PathBuf},
};

use bevy::prelude::*;

use crate::pet::AnimationKey;

pub const DEFAULT_ASSET_ROOT: &str = "assets";
pub const PET_FRAMES_DIR: &str = "mocha";
const FRAME_EXTENSION: &str = "png";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// No usable frames for an animation.
    Missing { key: AnimationKey },
    /// A variant directory could not be read.
    Unreadable { dir: PathBuf, message: String },
    /// A variant directory exists but holds no frames.
    Empty { dir: PathBuf },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { key } => write!(f, "no frames for animation '{}'", key),
            Self::Unreadable { dir, message } => write!(f, "cannot read {:?}: {}", dir, message),
            Self::Empty { dir } => write!(f, "{:?} contains no .{} frames", dir, FRAME_EXTENSION),
        }
    }
}

impl std::error::Error for AssetError {}

/// Frame paths per animation, relative to the asset root so they can be
/// handed straight to the `AssetServer`.
#[derive(Resource, Debug, Clone, Default)]
pub struct AnimationCatalog {
    variants: HashMap<AnimationKey, Vec<Vec<String>>>,
}

impl AnimationCatalog {
    /// Scans `<root>/mocha/<variant>/*.png` for every key. Unusable
    /// directories are logged and skipped.
    pub fn scan(root: &Path) -> Self {
        let mut catalog = Self::default();
        for key in AnimationKey::ALL {
            for variant in key.variants() {
                let relative = Path::new(PET_FRAMES_DIR).join(variant);
                match scan_frames(root, &relative) {
                    Ok(frames) => catalog.insert(key, frames),
                    Err(err) => warn!(target: "animation", "{}", err),
                }
            }
        }
        if !catalog.has(AnimationKey::Idle) {
            warn!(
                target: "animation",
                "No idle frames under {:?}; missing animations will be blank",
                root
            );
        }
        info!(
            target: "animation",
            "Found frames for {} of {} animations under {:?}",
            catalog.variants.len(),
            AnimationKey::ALL.len(),
            root
        );
        catalog
    }

    pub fn insert(&mut self, key: AnimationKey, frames: Vec<String>) {
        if !frames.is_empty() {
            self.variants.entry(key).or_default().push(frames);
        }
    }

    pub fn has(&self, key: AnimationKey) -> bool {
        self.variants.contains_key(&key)
    }

    pub fn lookup(&self, key: AnimationKey) -> Result<&[Vec<String>], AssetError> {
        self.variants
            .get(&key)
            .map(Vec::as_slice)
            .ok_or(AssetError::Missing { key })
    }

    /// Frames for `key`, picking one variant at random. Missing animations
    /// degrade to idle, then to nothing (a blank sprite).
    pub fn frames_for(&self, key: AnimationKey, rng: &mut fastrand::Rng) -> &[String] {
        let variants = match self.lookup(key) {
            Ok(variants) => variants,
            Err(err) => {
                warn!(target: "animation", "{}; showing idle", err);
                match self.lookup(AnimationKey::Idle) {
                    Ok(variants) => variants,
                    Err(_) => return &[],
                }
            }
        };
        match variants.len() {
            0 => &[],
            1 => &variants[0],
            len => &variants[rng.usize(..len)],
        }
    }
}

fn scan_frames(root: &Path, relative: &Path) -> Result<Vec<String>, AssetError> {
    let dir = root.join(relative);
    let entries = fs::read_dir(&dir).map_err(|err| AssetError::Unreadable {
        dir: dir.clone(),
        message: err.to_string(),
    })?;

    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| {
            Path::new(name)
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(FRAME_EXTENSION))
        })
        .collect();

    if names.is_empty() {
        return Err(AssetError::Empty { dir });
    }
    names.sort();

    // Asset paths always use forward slashes.
    let prefix = relative.to_string_lossy().replace('\\', "/");
    Ok(names
        .into_iter()
        .map(|name| format!("{}/{}", prefix, name))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{env, time::SystemTime};

    fn temp_root(label: &str) -> PathBuf {
        let unique_suffix = SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        env::temp_dir().join(format!("mochapet_assets_{}_{}", label, unique_suffix))
    }

    fn write_frames(root: &Path, variant: &str, names: &[&str]) {
        let dir = root.join(PET_FRAMES_DIR).join(variant);
        fs::create_dir_all(&dir).expect("create frame dir");
        for name in names {
            fs::write(dir.join(name), b"png").expect("write frame");
        }
    }

    #[test]
    fn scan_sorts_frames_and_ignores_other_files() {
        let root = temp_root("scan");
        write_frames(&root, "idle", &["002.png", "000.png", "001.PNG", "notes.txt"]);
        write_frames(&root, "dance1", &["a.png"]);
        write_frames(&root, "dance2", &["b.png"]);

        let catalog = AnimationCatalog::scan(&root);
        let idle = &catalog.lookup(AnimationKey::Idle).expect("idle")[0];
        assert_eq!(idle, &vec!["mocha/idle/000.png", "mocha/idle/001.PNG", "mocha/idle/002.png"]);
        assert_eq!(catalog.lookup(AnimationKey::Dancing).expect("dancing").len(), 2);
        assert!(!catalog.has(AnimationKey::Crying));

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn missing_animation_degrades_to_idle_then_blank() {
        let mut rng = fastrand::Rng::with_seed(2);
        let mut catalog = AnimationCatalog::default();
        assert!(catalog.frames_for(AnimationKey::Angry, &mut rng).is_empty());
        assert_eq!(
            catalog.lookup(AnimationKey::Angry),
            Err(AssetError::Missing {
                key: AnimationKey::Angry
            })
        );

        catalog.insert(AnimationKey::Idle, vec!["mocha/idle/0.png".into()]);
        assert_eq!(
            catalog.frames_for(AnimationKey::Angry, &mut rng),
            &["mocha/idle/0.png".to_string()]
        );
    }

    #[test]
    fn empty_directories_are_reported() {
        let root = temp_root("empty");
        fs::create_dir_all(root.join(PET_FRAMES_DIR).join("idle")).expect("dir");
        let err = scan_frames(&root, &Path::new(PET_FRAMES_DIR).join("idle")).expect_err("empty");
        assert!(matches!(err, AssetError::Empty { .. }));
        let _ = fs::remove_dir_all(&root);
    }
}
