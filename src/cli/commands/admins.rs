//! `incident-intake admins ...`: roster maintenance from the host.

use anyhow::{bail, Context, Result};
use comfy_table::Cell;
use serde::Serialize;
use std::path::PathBuf;

use crate::adapters::FileRosterRepository;
use crate::cli::output::{list_table, output, CommandOutput};
use crate::cli::AdminCommands;
use crate::domain::models::{Config, RemovalRejection, UserId};
use crate::domain::ports::RosterRepository;

#[derive(Debug, Serialize)]
pub struct AdminListOutput {
    pub path: PathBuf,
    pub admins: Vec<UserId>,
}

impl CommandOutput for AdminListOutput {
    fn to_human(&self) -> String {
        if self.admins.is_empty() {
            return format!("No administrators in {}.", self.path.display());
        }
        let mut table = list_table(&["#", "Telegram id"]);
        for (index, id) in self.admins.iter().enumerate() {
            table.add_row(vec![Cell::new(index + 1), Cell::new(id)]);
        }
        format!(
            "{} administrator(s) in {}:\n{table}",
            self.admins.len(),
            self.path.display()
        )
    }
}

#[derive(Debug, Serialize)]
pub struct AdminChangeOutput {
    pub success: bool,
    pub message: String,
    pub admins: Vec<UserId>,
}

impl CommandOutput for AdminChangeOutput {
    fn to_human(&self) -> String {
        self.message.clone()
    }
}

pub async fn execute(command: AdminCommands, config: &Config, json_mode: bool) -> Result<()> {
    let repo = FileRosterRepository::new(
        config.roster.path.clone(),
        config.roster.bootstrap_admins.clone(),
    );
    let mut roster = repo.load().await.context("Failed to load administrator roster")?;

    match command {
        AdminCommands::List => {
            output(
                &AdminListOutput {
                    path: repo.path().to_path_buf(),
                    admins: roster.ids().to_vec(),
                },
                json_mode,
            );
        }
        AdminCommands::Add { id } => {
            let id = UserId(id);
            let message = if roster.insert(id) {
                repo.save(&roster).await.context("Failed to save administrator roster")?;
                format!("Administrator {id} added.")
            } else {
                format!("Administrator {id} is already on the list.")
            };
            output(
                &AdminChangeOutput {
                    success: true,
                    message,
                    admins: roster.ids().to_vec(),
                },
                json_mode,
            );
        }
        AdminCommands::Remove { id } => {
            let id = UserId(id);
            // Acting as the target keeps the host from emptying the roster.
            match roster.remove(id, id) {
                Err(RemovalRejection::NotFound) => bail!("Administrator {id} is not on the list"),
                Err(RemovalRejection::LastSelf) => {
                    bail!("Refusing to remove {id}: it is the last administrator")
                }
                Ok(()) => {}
            }
            repo.save(&roster).await.context("Failed to save administrator roster")?;
            output(
                &AdminChangeOutput {
                    success: true,
                    message: format!("Administrator {id} removed."),
                    admins: roster.ids().to_vec(),
                },
                json_mode,
            );
        }
    }

    Ok(())
}
