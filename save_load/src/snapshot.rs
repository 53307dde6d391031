use {
    chrono::Local,
    experience::ExperienceLedger,
    progression_resources::{ConsumedRewards, ProgressionError},
    serde::{Deserialize, Serialize},
    std::{
        collections::BTreeSet,
        fs, io,
        path::{Path, PathBuf},
    },
    thiserror::Error,
};

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save file i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("failed to serialize progress: {0}")]
    Serialize(#[from] ron::Error),
    #[error("failed to parse save file: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error(transparent)]
    InvalidProgress(#[from] ProgressionError),
}

/// Everything needed to resume progression in a later session.
///
/// Unlock state is not stored: it is derived from `level` on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSave {
    pub level: u32,
    pub current_exp: u64,
    /// Empty unless consumed ids are configured to persist.
    #[serde(default)]
    pub consumed_reward_source_ids: BTreeSet<String>,
    #[serde(default)]
    pub saved_at: Option<String>,
}

impl ProgressSave {
    pub fn capture(
        ledger: &ExperienceLedger,
        consumed: &ConsumedRewards,
        persist_consumed_rewards: bool,
    ) -> Self {
        let consumed_reward_source_ids = if persist_consumed_rewards {
            consumed.iter().map(str::to_string).collect()
        } else {
            BTreeSet::new()
        };

        Self {
            level: ledger.level(),
            current_exp: ledger.current_exp(),
            consumed_reward_source_ids,
            saved_at: Some(Local::now().to_rfc3339()),
        }
    }

    /// Applies the snapshot. On error nothing is changed.
    pub fn restore(
        &self,
        ledger: &mut ExperienceLedger,
        consumed: &mut ConsumedRewards,
    ) -> Result<(), SaveError> {
        ledger.restore(self.level, self.current_exp)?;
        *consumed = self.consumed_reward_source_ids.iter().cloned().collect();
        Ok(())
    }

    /// Writes the snapshot next to its final location first and renames it
    /// into place, so a crash mid-write keeps the previous save intact.
    pub fn write_to(&self, path: &Path) -> Result<(), SaveError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let serialized = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        let staging = path.with_extension("ron.tmp");
        fs::write(&staging, serialized)?;
        fs::rename(&staging, path)?;
        Ok(())
    }

    /// Reads a snapshot. A missing file is not an error: it means a new game.
    pub fn read_from(path: &Path) -> Result<Option<Self>, SaveError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        Ok(Some(ron::from_str(&contents)?))
    }
}

/// Moves a save that could not be used to `<path>.bak`, so the next save does
/// not overwrite it. Replaces an older backup.
pub fn set_aside(path: &Path) -> Result<PathBuf, SaveError> {
    let backup = path.with_extension("ron.bak");
    fs::rename(path, &backup)?;
    Ok(backup)
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        growth::{Growth, LinearGrowth},
    };

    fn ledger() -> ExperienceLedger {
        ExperienceLedger::new(Growth::Linear(LinearGrowth::new(0, 100)), 10)
    }

    fn scratch_file(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("hearth_progression_{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_write_then_read_restores_progress() {
        let mut source = ledger();
        source.restore(4, 120).unwrap();
        let consumed: ConsumedRewards = ["dq-2024-01-01", "q7"].into_iter().collect();

        let path = scratch_file("roundtrip.ron");
        ProgressSave::capture(&source, &consumed, true)
            .write_to(&path)
            .unwrap();

        let save = ProgressSave::read_from(&path).unwrap().unwrap();
        let mut ledger = ledger();
        let mut restored = ConsumedRewards::default();
        save.restore(&mut ledger, &mut restored).unwrap();

        assert_eq!(ledger.progress(), source.progress());
        assert!(restored.contains("dq-2024-01-01"));
        assert_eq!(restored.len(), 2);
        assert!(save.saved_at.is_some());

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_session_scoped_ids_are_not_written() {
        let consumed: ConsumedRewards = ["q1"].into_iter().collect();
        let save = ProgressSave::capture(&ledger(), &consumed, false);
        assert!(save.consumed_reward_source_ids.is_empty());
    }

    #[test]
    fn test_missing_file_means_new_game() {
        let path = scratch_file("does_not_exist.ron");
        assert!(ProgressSave::read_from(&path).unwrap().is_none());
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let path = scratch_file("corrupt.ron");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "(level: \"three\")").unwrap();

        assert!(matches!(
            ProgressSave::read_from(&path),
            Err(SaveError::Parse(_))
        ));
        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_rejected_save_is_kept_as_backup() {
        let path = scratch_file("rejected.ron");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "(level: 40, current_exp: 10)").unwrap();

        let backup = set_aside(&path).unwrap();
        assert!(!path.exists());
        assert_eq!(
            fs::read_to_string(&backup).unwrap(),
            "(level: 40, current_exp: 10)"
        );
        assert!(backup.to_string_lossy().ends_with("rejected.ron.bak"));

        fs::remove_file(&backup).ok();
    }

    #[test]
    fn test_inconsistent_save_is_rejected() {
        let save = ProgressSave {
            level: 2,
            current_exp: 500,
            consumed_reward_source_ids: ["q1".to_string()].into(),
            saved_at: None,
        };
        let mut ledger = ledger();
        let mut consumed = ConsumedRewards::default();

        assert!(matches!(
            save.restore(&mut ledger, &mut consumed),
            Err(SaveError::InvalidProgress(_))
        ));
        assert_eq!(ledger.level(), 1);
        assert!(consumed.is_empty());
    }
}
