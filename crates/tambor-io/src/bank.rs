//! Offline wavetable-bank building.
//!
//! A bank lives on disk as one directory per drum kind, each holding WAV
//! files:
//!
//! ```text
//! <root>/kick/808.wav
//! <root>/kick/acoustic.wav
//! <root>/closed-hat/tight.wav
//! ```
//!
//! Every file is mixed to mono and resampled once to the bank rate at its
//! full length. Tables within a kind are ordered by file name, so a
//! [`SampleSelection::Index`](tambor_synth::SampleSelection) is stable across
//! loads; the table name is the file stem.

use crate::resample::resample_linear;
use crate::wav::read_wav;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tambor_synth::{DrumKind, NamedTable, WavetableBank};

/// Drum kind whose tables live in a directory named `name`.
pub fn drum_for_dir(name: &str) -> Result<DrumKind> {
    name.parse()
        .map_err(|_| Error::UnknownTableKind(name.to_string()))
}

fn wav_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"))
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Load every WAV file in `dir` as tables at `rate`, ordered by file name.
pub fn load_tables(dir: impl AsRef<Path>, rate: f32) -> Result<Vec<NamedTable>> {
    let dir = dir.as_ref();
    let mut tables = Vec::new();
    for path in wav_files(dir)? {
        let (samples, spec) = read_wav(&path)?;
        let resampled = resample_linear(&samples, spec.sample_rate as f32, rate);
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        tracing::debug!(
            table = %name,
            source_rate = spec.sample_rate,
            frames = resampled.len(),
            "loaded table"
        );
        tables.push(NamedTable::new(name, resampled));
    }
    Ok(tables)
}

/// Build a bank at `rate` from the directory tree under `root`.
///
/// Subdirectories that are not drum kinds are skipped with a warning. A tree
/// with no tables at all is an error.
pub fn load_bank(root: impl AsRef<Path>, rate: f32) -> Result<WavetableBank> {
    let root = root.as_ref();
    let mut bank = WavetableBank::new(rate);

    let mut dirs: Vec<PathBuf> = std::fs::read_dir(root)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();

    for dir in dirs {
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let drum = match drum_for_dir(&name) {
            Ok(drum) => drum,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), "skipping table directory: {e}");
                continue;
            }
        };
        for table in load_tables(&dir, bank.rate())? {
            bank.insert(drum, table);
        }
    }

    if bank.is_empty() {
        return Err(Error::EmptyBank(root.to_path_buf()));
    }

    tracing::info!(
        root = %root.display(),
        tables = bank.len(),
        kinds = bank.kinds().count(),
        rate = bank.rate(),
        "loaded wavetable bank"
    );
    Ok(bank)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wav::{WavSpec, write_wav};
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, samples: &[f32], rate: u32) {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let spec = WavSpec {
            sample_rate: rate,
            ..Default::default()
        };
        write_wav(path, samples, spec).unwrap();
    }

    #[test]
    fn tables_are_ordered_by_file_name() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "b.wav", &[0.2; 4], 44100);
        write(dir.path(), "a.wav", &[0.1; 4], 44100);
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let tables = load_tables(dir.path(), 44100.0).unwrap();
        let names: Vec<_> = tables.iter().map(NamedTable::name).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn bank_resamples_to_its_rate() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "kick/low.wav", &[0.5; 22050], 22050);
        let bank = load_bank(dir.path(), 44100.0).unwrap();
        assert_eq!(bank.tables(DrumKind::Kick)[0].len(), 44100);
    }

    #[test]
    fn unknown_directories_are_skipped() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "cowbell/x.wav", &[0.5; 8], 44100);
        write(dir.path(), "open-hat/y.wav", &[0.5; 8], 44100);
        let bank = load_bank(dir.path(), 44100.0).unwrap();
        assert_eq!(bank.len(), 1);
        assert_eq!(bank.tables(DrumKind::OpenHat).len(), 1);
    }

    #[test]
    fn empty_tree_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("kick")).unwrap();
        assert!(matches!(
            load_bank(dir.path(), 44100.0),
            Err(Error::EmptyBank(_))
        ));
    }

    #[test]
    fn directory_names_map_to_kinds() {
        assert_eq!(drum_for_dir("closed-hat").unwrap(), DrumKind::ClosedHat);
        assert!(matches!(
            drum_for_dir("hihat"),
            Err(Error::UnknownTableKind(_))
        ));
    }
}
