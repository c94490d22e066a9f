//! # Inpaint Mask
//!
//! Command-line host for the inpaint masking workflow.

use std::path::Path;

use anyhow::Context;
use clap::Parser;
use inpaint_client::{CliArgs, ClientConfig, InpaintApp, Notification, ReqwestTransport, Uploader};
use inpaint_core::event::parse_script;
use inpaint_core::SourceImage;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "inpaint_client=info,inpaint_core=info,inpaint_renderer=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();
    let config = ClientConfig::from(args);

    tracing::info!("Canvas config: {}x{}", config.width, config.height);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(&config))
}

async fn run(config: &ClientConfig) -> anyhow::Result<()> {
    let mut app = InpaintApp::new(config)?;

    let image = config
        .image
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("No source image given"))?;
    let source = SourceImage::from_path(image)
        .with_context(|| format!("Failed to load {}", image.display()))?;
    app.load_image(source)?;

    if let Some(ref strokes) = config.strokes {
        let script = std::fs::read_to_string(strokes)
            .with_context(|| format!("Failed to read stroke script {}", strokes.display()))?;
        let events = parse_script(&script)?;
        let stamps = app.replay(&events)?;
        tracing::info!(
            "Applied {stamps} stamps from {} events in {}",
            events.len(),
            strokes.display()
        );
    }

    write_artifacts(&app, config)?;

    if !config.upload {
        tracing::info!("Upload disabled; done");
        return Ok(());
    }

    let base_url = config
        .base_url
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("No base URL configured (set --base-url or INPAINT_BASE_URL)"))?;
    let uploader =
        Uploader::with_description(base_url, ReqwestTransport::new()?, &config.description)?;

    let notification = app.export(&uploader).await;
    if let Some(message) = notification.message() {
        println!("{message}");
    }

    match notification {
        Notification::Success(_) => {
            for line in app.display_lines() {
                println!("{line}");
            }
            Ok(())
        }
        Notification::Failure(reason) => Err(anyhow::anyhow!("Upload failed: {reason}")),
        Notification::Skipped => Ok(()),
    }
}

/// Write the requested local outputs.
fn write_artifacts(app: &InpaintApp, config: &ClientConfig) -> anyhow::Result<()> {
    let (source, compositor) = app.state().export_inputs()?;
    let exporter = app.exporter();

    if let Some(ref path) = config.mask_out {
        let mask = exporter.encode_mask(compositor.mask())?;
        write_file(path, mask.bytes())?;
    }

    if let Some(ref path) = config.preview_out {
        write_file(path, &exporter.encode_preview(compositor.preview())?)?;
    }

    if let Some(ref path) = config.display_out {
        write_file(path, &exporter.compose_display(source, compositor.preview())?)?;
    }

    Ok(())
}

fn write_file(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}
