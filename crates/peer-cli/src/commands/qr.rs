//! Show-qr command

use std::path::Path;

use colored::Colorize;
use peer_fs::{ConfigLayout, Settings};
use qrcode::render::unicode;
use qrcode::{EcLevel, QrCode};

use crate::error::{CliError, Result};

/// Renders `content` as a half-block QR code.
///
/// Colours are inverted so the code reads on dark terminals.
pub fn render_qr(content: &str) -> Result<String> {
    let code = QrCode::with_error_correction_level(content.as_bytes(), EcLevel::L)
        .map_err(|e| CliError::user(format!("Cannot encode QR code: {e}")))?;

    Ok(code
        .render::<unicode::Dense1x2>()
        .dark_color(unicode::Dense1x2::Light)
        .light_color(unicode::Dense1x2::Dark)
        .quiet_zone(true)
        .build())
}

/// Run the show-qr command
///
/// Works without a server config; only the client's own config is read.
pub fn run_show_qr(config_dir: &Path, name: &str) -> Result<()> {
    let settings = Settings::load_or_default(config_dir)?;
    let layout = ConfigLayout::new(config_dir, &settings);

    let content = layout.read_client_config(name)?;
    tracing::debug!(client = name, bytes = content.len(), "Rendering client config");

    println!("{} {}", "QR code for".bold(), name.green().bold());
    println!();
    println!("{}", render_qr(&content)?);
    Ok(())
}
