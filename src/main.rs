use std::{env, fs, path::Path, process, sync::Arc};

use anyhow::Context;
use log::{error, info};
use tokio::{net::TcpListener, signal};

use linreg_serve::{
    config, server, ModelArtifact, ModelInfo, ModelStore, RequestHandler, ServerConfig,
};

fn usage(bin: &str) -> ! {
    eprintln!("Usage: {bin} [serve]");
    eprintln!("       {bin} pack <model_info.json> <out.safetensors>");
    process::exit(1);
}

fn main() -> anyhow::Result<()> {
    // Read before the logger so RUST_LOG may come from `.env`.
    let dotenv = config::load_dotenv()?;
    env_logger::init();
    if let Some(path) = dotenv {
        info!("loaded environment from {}", path.display());
    }

    let args: Vec<String> = env::args().collect();
    let bin = args.first().map(String::as_str).unwrap_or("linreg-serve");

    match args.get(1).map(String::as_str) {
        None | Some("serve") => run_server(),
        Some("pack") => {
            let (Some(info_path), Some(out_path)) = (args.get(2), args.get(3)) else {
                usage(bin);
            };
            pack(Path::new(info_path), Path::new(out_path))
        }
        Some(other) => {
            eprintln!("Unknown mode: {other}");
            usage(bin);
        }
    }
}

#[tokio::main]
async fn run_server() -> anyhow::Result<()> {
    let config = ServerConfig::from_env()?;

    // No degraded mode: a model that fails to load never gets a listener.
    let store = match ModelStore::load(config.model_path(), config.model_info_path()) {
        Ok(store) => store,
        Err(e) => {
            error!("failed to load model: {e}");
            return Err(e.into());
        }
    };
    let handler = RequestHandler::new(Arc::new(store));

    let addr = config.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("cannot bind {addr}"))?;

    server::serve(listener, handler, async {
        if signal::ctrl_c().await.is_ok() {
            info!("received SIGINT, shutting down");
        }
    })
    .await?;

    Ok(())
}

/// Writes a weights file from an existing sidecar, so a model described only
/// by `model_info.json` can be served.
fn pack(info_path: &Path, out_path: &Path) -> anyhow::Result<()> {
    let content = fs::read_to_string(info_path)
        .with_context(|| format!("cannot read {}", info_path.display()))?;
    let info = ModelInfo::from_json(&content)
        .map_err(|e| anyhow::anyhow!("invalid sidecar {}: {e}", info_path.display()))?;

    let artifact = ModelArtifact::from_info(info)?;
    artifact.save_weights(out_path)?;

    info!(
        "wrote {} ({} features)",
        out_path.display(),
        artifact.feature_count()
    );
    Ok(())
}
