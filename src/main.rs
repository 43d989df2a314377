use anyhow::Context;
use std::sync::Arc;
use tracing::{info, warn};
use warden::{
    api::routes::create_router,
    auth::{jwt::generate_secret, password::hash_password},
    cli::{output::Output, Cli, Commands},
    db::{seed_users, TursoUserStore, UserStore},
    AppState, WardenConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    match cli.command {
        Some(Commands::HashPassword { ref password }) => {
            let hash = hash_password(password).context("Failed to hash password")?;
            output.raw(&hash);
            Ok(())
        }
        Some(Commands::GenerateSecret) => {
            output.raw(&generate_secret());
            Ok(())
        }
        Some(Commands::Config { validate }) => show_config(&cli, &output, validate),
        Some(Commands::Serve) | None => serve(&cli, &output).await,
    }
}

fn show_config(cli: &Cli, output: &Output, validate: bool) -> anyhow::Result<()> {
    let config = match WardenConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            output.error(&e.to_string());
            return Err(e.into());
        }
    };

    if validate {
        output.success(&format!("{} is valid", cli.config.display()));
        return Ok(());
    }

    output.header("Server");
    output.kv("address", &config.bind_address());
    output.kv("log_level", &config.server.log_level);

    output.header("Auth");
    output.kv("secret env", &config.auth.jwt_secret_env);
    output.kv("token ttl", &format!("{}s", config.auth.jwt_expiry));
    output.kv("login path", &config.auth.login_path);

    output.header("Database");
    output.kv("url", &config.database.url);

    output.header("Seed users");
    for user in &config.users {
        output.list_item(&format!("{} [{}]", user.username, user.roles.join(", ")));
    }

    Ok(())
}

async fn serve(cli: &Cli, output: &Output) -> anyhow::Result<()> {
    let config = WardenConfig::load(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;

    init_tracing(&config, cli);

    if cli.verbose {
        output.banner();
    }

    let secret = config.jwt_secret()?;

    let store = TursoUserStore::new_local(&config.database.url).await?;
    let seeded = seed_users(&store, &config.users).await?;
    if config.users.is_empty() {
        warn!("No [[users]] configured; nobody can log in until users are added");
    }
    info!(seeded, database = %config.database.url, "User store ready");

    let addr = config.bind_address();
    let users: Arc<dyn UserStore> = Arc::new(store);
    let app = create_router(AppState::new(config, secret, users));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(%addr, "Warden listening");
    info!("OpenAPI spec at http://{}/api-docs/openapi.json", addr);
    #[cfg(feature = "swagger-ui")]
    info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn init_tracing(config: &WardenConfig, cli: &Cli) {
    let default_level = if cli.verbose {
        "debug"
    } else {
        config.server.log_level.as_str()
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("warden={default_level},warden_server={default_level},tower_http={default_level}")
            .into()
    });

    if cli.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(!cli.no_color)
            .init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => warn!("Received Ctrl+C, shutting down"),
        _ = terminate => warn!("Received SIGTERM, shutting down"),
    }
}
