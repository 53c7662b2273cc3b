use std::{fs, path::Path};

use anyhow::{bail, Context};
use serde::Deserialize;
use server_api::{layout::LayoutOptions, render::RenderOptions};

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub server_bind: String,
    pub font_path: Option<String>,
    pub width: u32,
    pub height: u32,
    pub background: String,
    pub max_words: usize,
    pub min_font_size: f32,
    pub max_font_size: f32,
    pub max_body_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:5000".into(),
            font_path: None,
            width: 600,
            height: 400,
            background: "white".into(),
            max_words: 100,
            min_font_size: 10.0,
            max_font_size: 100.0,
            max_body_bytes: 4 * 1024 * 1024,
        }
    }
}

/// Optional overrides read from `server.toml`.
#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    bind_addr: Option<String>,
    font_path: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    background: Option<String>,
    max_words: Option<usize>,
    min_font_size: Option<f32>,
    max_font_size: Option<f32>,
    max_body_bytes: Option<usize>,
}

pub fn load_settings() -> anyhow::Result<Settings> {
    let mut settings = Settings::default();
    apply_file(&mut settings, Path::new("server.toml"))?;
    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file(settings: &mut Settings, path: &Path) -> anyhow::Result<()> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read '{}'", path.display()));
        }
    };
    let file_cfg: FileSettings = toml::from_str(&raw)
        .with_context(|| format!("failed to parse '{}'", path.display()))?;

    if let Some(v) = file_cfg.bind_addr {
        settings.server_bind = v;
    }
    if file_cfg.font_path.is_some() {
        settings.font_path = file_cfg.font_path;
    }
    if let Some(v) = file_cfg.width {
        settings.width = v;
    }
    if let Some(v) = file_cfg.height {
        settings.height = v;
    }
    if let Some(v) = file_cfg.background {
        settings.background = v;
    }
    if let Some(v) = file_cfg.max_words {
        settings.max_words = v;
    }
    if let Some(v) = file_cfg.min_font_size {
        settings.min_font_size = v;
    }
    if let Some(v) = file_cfg.max_font_size {
        settings.max_font_size = v;
    }
    if let Some(v) = file_cfg.max_body_bytes {
        settings.max_body_bytes = v;
    }
    Ok(())
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("WORDCLOUD_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = lookup("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = lookup("WORDCLOUD_FONT_PATH") {
        settings.font_path = Some(v);
    }
    if let Some(v) = lookup("APP__FONT_PATH") {
        settings.font_path = Some(v);
    }

    if let Some(v) = lookup("APP__BACKGROUND") {
        settings.background = v;
    }

    if let Some(v) = lookup("APP__MAX_WORDS") {
        if let Ok(parsed) = v.parse::<usize>() {
            settings.max_words = parsed;
        }
    }
}

impl Settings {
    pub fn render_options(&self) -> anyhow::Result<RenderOptions> {
        if self.width == 0 || self.height == 0 {
            bail!("canvas size must be non-zero, got {}x{}", self.width, self.height);
        }
        if self.min_font_size <= 0.0 || self.min_font_size > self.max_font_size {
            bail!(
                "invalid font size range {}..{}",
                self.min_font_size,
                self.max_font_size
            );
        }
        Ok(RenderOptions {
            layout: LayoutOptions {
                width: self.width,
                height: self.height,
                min_font_size: self.min_font_size,
                max_font_size: self.max_font_size,
                ..LayoutOptions::default()
            },
            background: parse_color(&self.background)?,
            max_words: self.max_words,
        })
    }
}

/// Accepts `white`, `black` or `#rrggbb`.
pub fn parse_color(raw: &str) -> anyhow::Result<[u8; 3]> {
    let raw = raw.trim();
    match raw.to_ascii_lowercase().as_str() {
        "white" => return Ok([255, 255, 255]),
        "black" => return Ok([0, 0, 0]),
        _ => {}
    }

    let Some(hex) = raw.strip_prefix('#') else {
        bail!("unsupported colour '{raw}'");
    };
    if hex.len() != 6 || !hex.is_ascii() {
        bail!("unsupported colour '{raw}'");
    }
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16).with_context(|| format!("invalid colour '{raw}'"))
    };
    Ok([channel(0)?, channel(2)?, channel(4)?])
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
