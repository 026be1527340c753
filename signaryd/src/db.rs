use signary_common::{config, db};
use std::process::ExitCode;

#[derive(clap::Args, Debug)]
pub struct Run {
    #[command(subcommand)]
    pub(crate) command: Command,

    #[command(flatten)]
    pub(crate) database: config::Database,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Drop and re-create the database, then apply all migrations
    Create,
    /// Apply pending migrations
    Migrate,
    /// Roll back all migrations, then re-apply them
    Refresh,
}

impl Run {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        use Command::*;
        match self.command {
            Create => {
                db::Database::bootstrap(&self.database).await?;
            }
            Migrate => {
                db::Database::new(&self.database).await?.migrate().await?;
            }
            Refresh => {
                db::Database::new(&self.database).await?.refresh().await?;
            }
        }

        Ok(ExitCode::SUCCESS)
    }
}
