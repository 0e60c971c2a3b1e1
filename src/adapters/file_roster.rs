//! Plain-text roster storage: one administrator id per line.

use async_trait::async_trait;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

use crate::domain::errors::RosterError;
use crate::domain::models::{AdminRoster, UserId};
use crate::domain::ports::RosterRepository;

/// Roster file repository.
///
/// Saves go through a sibling temp file and a rename, so readers see either
/// the old or the new roster, never a partial write. Concurrent
/// read-modify-write cycles can still lose an update.
pub struct FileRosterRepository {
    path: PathBuf,
    bootstrap: Vec<UserId>,
}

impl FileRosterRepository {
    /// `bootstrap` is served while the file is missing or unreadable as a roster.
    pub fn new(path: impl Into<PathBuf>, bootstrap: Vec<UserId>) -> Self {
        Self {
            path: path.into(),
            bootstrap,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> RosterError {
        RosterError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn bootstrap_roster(&self) -> AdminRoster {
        AdminRoster::from_ids(self.bootstrap.iter().copied())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map_or_else(|| OsString::from("roster"), OsString::from);
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// Parses the roster file format. Blank lines and `#` comments, including
/// trailing ones, are skipped.
pub fn parse_roster(contents: &str) -> Result<AdminRoster, RosterError> {
    let mut ids = Vec::new();
    for (index, raw) in contents.lines().enumerate() {
        let line = raw.split_once('#').map_or(raw, |(entry, _)| entry).trim();
        if line.is_empty() {
            continue;
        }
        let id = line.parse::<UserId>().map_err(|_| RosterError::InvalidEntry {
            line: index + 1,
            value: line.to_string(),
        })?;
        ids.push(id);
    }
    Ok(AdminRoster::from_ids(ids))
}

fn render_roster(roster: &AdminRoster) -> String {
    roster.ids().iter().map(|id| format!("{id}\n")).collect()
}

#[async_trait]
impl RosterRepository for FileRosterRepository {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> Result<AdminRoster, RosterError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => match parse_roster(&contents) {
                Ok(roster) => {
                    debug!(admins = roster.len(), "roster loaded");
                    Ok(roster)
                }
                Err(err) => {
                    warn!(error = %err, admins = self.bootstrap.len(), "roster file unreadable, using bootstrap list");
                    Ok(self.bootstrap_roster())
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(admins = self.bootstrap.len(), "no roster file, using bootstrap list");
                Ok(self.bootstrap_roster())
            }
            Err(err) => Err(self.io_error(err)),
        }
    }

    #[instrument(skip(self, roster), fields(path = %self.path.display(), admins = roster.len()))]
    async fn save(&self, roster: &AdminRoster) -> Result<(), RosterError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, render_roster(roster))
            .await
            .map_err(|e| self.io_error(e))?;
        if let Err(err) = tokio::fs::rename(&temp, &self.path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(self.io_error(err));
        }

        info!("roster saved");
        Ok(())
    }
}
