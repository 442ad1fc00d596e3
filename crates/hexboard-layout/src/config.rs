//! Environment configuration for the layout tool.

use anyhow::{bail, Context};
use hexboard_core::{LayoutConfig, Orientation};
use std::fmt::Display;
use std::str::FromStr;

/// Everything the tool reads from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub layout: LayoutConfig,
    /// Generate a hexagonal grid of this radius instead of reading cells from stdin
    pub radius: Option<u32>,
    pub pretty: bool,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup` so tests need not touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut layout = LayoutConfig::default();

        if let Some(size) = parse_var(&lookup, "HEXBOARD_SIZE")? {
            layout.size = size;
        }
        if let Some(padding) = parse_var(&lookup, "HEXBOARD_PADDING")? {
            layout.padding = padding;
        }
        if let Some(spacing) = parse_var(&lookup, "HEXBOARD_SPACING")? {
            layout.spacing = spacing;
        }
        if let Some(raw) = lookup("HEXBOARD_ORIENTATION") {
            layout.orientation = parse_orientation(&raw)?;
        }
        layout.validate().context("Invalid layout settings")?;

        let pretty = match lookup("HEXBOARD_PRETTY").as_deref().map(str::trim) {
            None | Some("") | Some("0") | Some("false") => false,
            Some("1") | Some("true") => true,
            Some(other) => bail!("HEXBOARD_PRETTY must be 1/0 or true/false, got {:?}", other),
        };

        Ok(Self {
            layout,
            radius: parse_var(&lookup, "HEXBOARD_RADIUS")?,
            pretty,
        })
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("{} has invalid value {:?}: {}", key, raw, e)),
    }
}

fn parse_orientation(raw: &str) -> anyhow::Result<Orientation> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "flat" | "flat_top" => Ok(Orientation::FlatTop),
        "pointy" | "pointy_top" => Ok(Orientation::PointyTop),
        other => bail!("HEXBOARD_ORIENTATION must be flat or pointy, got {:?}", other),
    }
}
