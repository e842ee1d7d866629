// File: src/persistence.rs
use crate::error::Result;
use crate::fuzzy::automaton::AutomatonFactory;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Writes precomputed automaton tables atomically: the snapshot only
/// appears at `path` once it is complete.
pub fn save_factory(factory: &AutomatonFactory, path: &Path) -> Result<()> {
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(temp_file.as_file());
        bincode::serialize_into(&mut writer, factory)?;
        writer.flush()?;
    }
    temp_file.persist(path).map_err(|e| e.error)?;
    log::info!(
        "saved automaton tables for distance {} to {}",
        factory.max_distance(),
        path.display()
    );
    Ok(())
}

pub fn load_factory(path: &Path) -> Result<AutomatonFactory> {
    let reader = BufReader::new(File::open(path)?);
    let factory: AutomatonFactory = bincode::deserialize_from(reader)?;
    factory.validate()?;
    log::info!(
        "loaded automaton tables for distance {} from {}",
        factory.max_distance(),
        path.display()
    );
    Ok(factory)
}

/// Loads the snapshot at `path` if it holds tables for `max_distance`,
/// otherwise builds them and tries to leave a snapshot behind.
pub fn load_or_build(path: &Path, max_distance: u8) -> Result<AutomatonFactory> {
    match load_factory(path) {
        Ok(factory) if factory.max_distance() == max_distance => return Ok(factory),
        Ok(factory) => log::warn!(
            "snapshot {} is for distance {}, rebuilding for {}",
            path.display(),
            factory.max_distance(),
            max_distance
        ),
        Err(e) => log::warn!("could not load snapshot {}: {}", path.display(), e),
    }

    let factory = AutomatonFactory::new(max_distance)?;
    if let Err(e) = save_factory(&factory, path) {
        log::warn!("could not save snapshot {}: {}", path.display(), e);
    }
    Ok(factory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SuggestError;

    #[test]
    fn test_snapshot_keeps_behaviour() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tables").join("lev2.bin");
        let built = AutomatonFactory::new(2).unwrap();
        save_factory(&built, &path).unwrap();

        let loaded = load_factory(&path).unwrap();
        assert_eq!(loaded.state_count(), built.state_count());
        assert_eq!(loaded.transition_count(), built.transition_count());
        assert_eq!(loaded.distance("food", "fxod"), Some(1));
    }

    #[test]
    fn test_load_or_build_rebuilds_on_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lev.bin");
        save_factory(&AutomatonFactory::new(1).unwrap(), &path).unwrap();

        let factory = load_or_build(&path, 2).unwrap();
        assert_eq!(factory.max_distance(), 2);
        assert_eq!(load_factory(&path).unwrap().max_distance(), 2);
    }

    #[test]
    fn test_tampered_snapshot_is_rebuilt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lev.bin");
        save_factory(&AutomatonFactory::new(1).unwrap(), &path).unwrap();

        // The distance byte follows the u32 format version.
        let mut bytes = fs::read(&path).unwrap();
        assert_eq!(bytes[4], 1);
        bytes[4] = 2;
        fs::write(&path, &bytes).unwrap();
        assert!(load_factory(&path).is_err());

        let factory = load_or_build(&path, 2).unwrap();
        assert_eq!(factory.distance("abcdef", "abcdef"), Some(0));
        assert_eq!(factory.distance("abcdef", "abdef"), Some(1));
        assert_eq!(load_factory(&path).unwrap().max_distance(), 2);
    }

    #[test]
    fn test_stale_format_and_truncation_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lev.bin");
        save_factory(&AutomatonFactory::new(1).unwrap(), &path).unwrap();
        let bytes = fs::read(&path).unwrap();

        let mut stale = bytes.clone();
        stale[0] = stale[0].wrapping_add(1);
        fs::write(&path, &stale).unwrap();
        assert!(matches!(load_factory(&path), Err(SuggestError::CorruptSnapshot(_))));

        fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();
        assert!(matches!(load_factory(&path), Err(SuggestError::Snapshot(_))));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_factory(&dir.path().join("missing.bin")).is_err());
        assert_eq!(load_or_build(&dir.path().join("fresh.bin"), 1).unwrap().max_distance(), 1);
    }
}
