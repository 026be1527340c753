use clap::Parser;
use std::process::{ExitCode, Termination};

mod db;

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Manage the database schema
    Db(db::Run),
}

#[derive(clap::Parser, Debug)]
#[command(
    author,
    version = env!("CARGO_PKG_VERSION"),
    about = "signaryd",
    long_about = None
)]
pub struct Signaryd {
    #[command(subcommand)]
    pub(crate) command: Option<Command>,

    #[command(flatten)]
    pub(crate) run: signary_server::Run,
}

impl Signaryd {
    async fn run(self) -> ExitCode {
        match self.run_command().await {
            Ok(code) => code,
            Err(err) => {
                log::error!("Error: {err}");
                for (n, err) in err.chain().skip(1).enumerate() {
                    if n == 0 {
                        log::error!("Caused by:");
                    }
                    log::error!("\t{err}");
                }

                ExitCode::FAILURE
            }
        }
    }

    async fn run_command(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Some(Command::Db(db)) => db.run().await,
            None => self.run.run().await,
        }
    }
}

#[actix_web::main]
async fn main() -> impl Termination {
    env_logger::init();
    Signaryd::parse().run().await
}
