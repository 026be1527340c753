use actix_web::{middleware, web, App, HttpResponse, HttpServer};
use anyhow::Context;
use signary_common::{config::Database, db};
use signary_module_certificate::{graph::Graph, service::CertificateService};
use signary_module_signer::service::SignerService;
use signary_module_storage::{
    config::{StorageConfig, StorageStrategy},
    service::{dispatch::DispatchBackend, fs::FileSystemBackend},
};
use std::{
    net::{IpAddr, SocketAddr},
    path::PathBuf,
    process::ExitCode,
    str::FromStr,
};

pub mod openapi;

/// Mount every module, plus the merged API document.
pub fn configure(
    config: &mut web::ServiceConfig,
    db: db::Database,
    storage: impl Into<DispatchBackend>,
) {
    let graph = Graph::new(db.clone());

    signary_module_certificate::endpoints::configure(
        config,
        CertificateService::new(graph, storage),
    );
    signary_module_signer::endpoints::configure(config, SignerService::new(db));

    config.route("/openapi.json", web::get().to(openapi_json));
}

async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(openapi::openapi())
}

#[derive(Clone, Debug, clap::Args)]
#[command(next_help_heading = "HTTP endpoint")]
#[group(id = "http")]
pub struct HttpConfig {
    /// The address to listen on
    #[arg(
        id = "http-server-bind-address",
        long,
        env = "HTTP_SERVER_BIND_ADDR",
        default_value = "::1"
    )]
    pub bind_addr: String,

    /// The port to listen on
    #[arg(
        id = "http-server-bind-port",
        short = 'p',
        long,
        env = "HTTP_SERVER_BIND_PORT",
        default_value_t = 8080
    )]
    pub bind_port: u16,

    /// The number of worker threads, zero falls back to the number of cores.
    #[arg(
        id = "http-server-workers",
        long,
        env = "HTTP_SERVER_WORKERS",
        default_value_t = 0
    )]
    pub workers: usize,
}

/// Run the API server
#[derive(clap::Args, Debug)]
pub struct Run {
    /// Apply pending database migrations on startup
    #[arg(long, env)]
    pub devmode: bool,

    /// Database configuration
    #[command(flatten)]
    pub database: Database,

    /// Location of the storage
    #[command(flatten)]
    pub storage: StorageConfig,

    #[command(flatten)]
    pub http: HttpConfig,
}

impl Run {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let db = db::Database::new(&self.database).await?;

        if self.devmode {
            db.migrate().await?;
        }

        let storage = match self.storage.storage_strategy {
            StorageStrategy::Fs => {
                let base = self
                    .storage
                    .fs_path
                    .clone()
                    .unwrap_or_else(|| PathBuf::from("./.signary/storage"));
                DispatchBackend::Filesystem(FileSystemBackend::new(base).await?)
            }
        };

        let addr = SocketAddr::new(
            IpAddr::from_str(&self.http.bind_addr).context("parse bind address")?,
            self.http.bind_port,
        );

        let mut http = HttpServer::new(move || {
            App::new()
                .wrap(middleware::Logger::default())
                .configure(|svc| configure(svc, db.clone(), storage.clone()))
        });

        if self.http.workers > 0 {
            log::info!("Using {} worker(s)", self.http.workers);
            http = http.workers(self.http.workers);
        }

        log::info!("Binding to: {addr}");
        http.bind(addr).context("bind")?.run().await?;

        Ok(ExitCode::SUCCESS)
    }
}
