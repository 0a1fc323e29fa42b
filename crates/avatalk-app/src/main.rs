mod boot;
mod cli;
mod orchestrator;
mod terminal;

use std::process::ExitCode;

use avatalk_common::EventBus;
use avatalk_config::{ApiKeys, AvatalkConfig};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVE: &str = "avatalk=info";

/// Load environment variables from a .env file (KEY=VALUE lines).
///
/// Variables already set in the environment win.
fn load_dotenv() {
    let manifest_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let candidates = [
        std::path::PathBuf::from(".env"),
        // Workspace root, two levels up from crates/avatalk-app/
        manifest_dir.join("..").join("..").join(".env"),
    ];

    for path in &candidates {
        if let Ok(contents) = std::fs::read_to_string(path) {
            for (key, value) in parse_dotenv(&contents) {
                if std::env::var(key).is_err() {
                    std::env::set_var(key, value);
                }
            }
            return;
        }
    }
}

fn parse_dotenv(contents: &str) -> Vec<(&str, &str)> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| {
            let key = key.trim().trim_start_matches("export ").trim();
            let value = value.trim().trim_matches('"').trim_matches('\'');
            (key, value)
        })
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

fn init_logging(cli_level: Option<&str>, config: &AvatalkConfig) {
    let directive = cli_level.unwrap_or(config.logging.level.directive());
    let directive: Result<Directive, _> = directive
        .parse()
        .or_else(|_| DEFAULT_DIRECTIVE.parse());
    let filter = match directive {
        Ok(directive) => EnvFilter::from_default_env().add_directive(directive),
        Err(_) => EnvFilter::from_default_env(),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    load_dotenv();
    let args = cli::parse();

    let loaded = avatalk_config::load_config(args.config.as_deref());
    let mut config = match &loaded {
        Ok(config) => config.clone(),
        Err(_) => AvatalkConfig::default(),
    };
    init_logging(args.log_level.as_deref(), &config);

    tracing::info!("avatalk v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(path) = &args.config {
        tracing::info!("Using config override: {}", path.display());
    }
    if let Err(e) = &loaded {
        tracing::warn!("Config load failed, using defaults: {e}");
    }

    if let Some(avatar) = &args.avatar {
        config.avatar.avatar_name = avatar.clone();
    }
    let mode = args.mode.unwrap_or(config.session.mode);
    tracing::info!(mode = ?mode, avatar = %config.avatar.avatar_name, "Config loaded");

    let keys = match ApiKeys::from_env(mode) {
        Ok(keys) => keys,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let bus = EventBus::new(config.session.event_capacity as usize);
    let result = runtime.block_on(async {
        let orchestrator = boot::build_orchestrator(&config, &keys, mode, bus)
            .map_err(|e| e.to_string())?;
        terminal::run(orchestrator).await.map_err(|e| e.to_string())
    });

    match result {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotenv_lines_are_parsed() {
        let pairs = parse_dotenv(
            "# keys\nVITE_HEYGEN_API_KEY=\"hg\"\n\nexport OPENAI_API_KEY='sk'\nBROKEN\n=nokey\n",
        );
        assert_eq!(
            pairs,
            vec![("VITE_HEYGEN_API_KEY", "hg"), ("OPENAI_API_KEY", "sk")]
        );
    }
}
