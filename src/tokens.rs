//! Heuristic design tokens bucketed from extracted stylesheet values.
//!
//! Bucket assignment is approximate and frequency based: it produces prompt
//! material, not a styling system.

use crate::parsers::css::StyleExtraction;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Luma below which a color counts as dark
pub const DARK_LUMA_THRESHOLD: f64 = 128.0;

/// (max - min) / max above which a color counts as vibrant
pub const VIBRANT_SATURATION_THRESHOLD: f64 = 0.3;

/// Vibrant colors outside this luma band are not treated as accents
const ACCENT_LUMA_RANGE: std::ops::RangeInclusive<f64> = 40.0..=220.0;

/// How many values each list token keeps
const LIST_LIMIT: usize = 6;

/// An sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Parse hex, `rgb()`/`rgba()` and a few named colors
    pub fn parse(value: &str) -> Option<Rgb> {
        let value = value.trim().to_ascii_lowercase();

        if let Some(hex) = value.strip_prefix('#') {
            return parse_hex(hex);
        }
        if let Some(args) = value
            .strip_prefix("rgba(")
            .or_else(|| value.strip_prefix("rgb("))
        {
            return parse_rgb_args(args.trim_end_matches(')'));
        }

        match value.as_str() {
            "white" => Some(Rgb { r: 255, g: 255, b: 255 }),
            "black" => Some(Rgb { r: 0, g: 0, b: 0 }),
            _ => None,
        }
    }

    /// ITU-R BT.601 luma
    pub fn luma(&self) -> f64 {
        0.299 * f64::from(self.r) + 0.587 * f64::from(self.g) + 0.114 * f64::from(self.b)
    }

    pub fn is_dark(&self) -> bool {
        self.luma() < DARK_LUMA_THRESHOLD
    }

    /// RGB max-min saturation ratio
    pub fn saturation(&self) -> f64 {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        if max == 0 {
            0.0
        } else {
            f64::from(max - min) / f64::from(max)
        }
    }

    pub fn is_vibrant(&self) -> bool {
        self.saturation() > VIBRANT_SATURATION_THRESHOLD
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 | 4 => {
            let expand = |i: usize| channel(&hex[i..=i].repeat(2));
            Some(Rgb {
                r: expand(0)?,
                g: expand(1)?,
                b: expand(2)?,
            })
        }
        6 | 8 => Some(Rgb {
            r: channel(&hex[0..2])?,
            g: channel(&hex[2..4])?,
            b: channel(&hex[4..6])?,
        }),
        _ => None,
    }
}

fn parse_rgb_args(args: &str) -> Option<Rgb> {
    let parts: Vec<&str> = args
        .split([',', ' ', '/'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if parts.len() < 3 {
        return None;
    }
    let channel = |s: &str| -> Option<u8> {
        if let Some(pct) = s.strip_suffix('%') {
            let pct: f64 = pct.parse().ok()?;
            return Some((pct.clamp(0.0, 100.0) * 2.55).round() as u8);
        }
        let v: f64 = s.parse().ok()?;
        Some(v.clamp(0.0, 255.0).round() as u8)
    };
    Some(Rgb {
        r: channel(parts[0])?,
        g: channel(parts[1])?,
        b: channel(parts[2])?,
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackgroundTokens {
    pub dark: Option<String>,
    pub light: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextTokens {
    pub primary: Option<String>,
    pub secondary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccentTokens {
    pub primary: Option<String>,
    pub secondary: Option<String>,
}

/// Overall tone of the captured application
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    #[default]
    Light,
}

/// Aggregated, heuristically categorized style values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DesignTokenSet {
    pub theme: Theme,
    pub backgrounds: BackgroundTokens,
    pub text: TextTokens,
    pub accents: AccentTokens,
    pub borders: Vec<String>,
    pub font_families: Vec<String>,
    pub font_sizes: Vec<String>,
    pub spacing: Vec<String>,
    pub radii: Vec<String>,
    pub shadows: Vec<String>,
    pub custom_properties: BTreeMap<String, String>,
}

impl DesignTokenSet {
    /// Bucket an extraction into named tokens
    pub fn from_extraction(extraction: &StyleExtraction) -> Self {
        let resolve = |value: &str| resolve_color(value, &extraction.custom_properties);

        let backgrounds = ranked_colors(&extraction.background_colors, &resolve);
        let dark_bg = backgrounds.iter().find(|(_, rgb)| rgb.is_dark());
        let light_bg = backgrounds.iter().find(|(_, rgb)| !rgb.is_dark());

        let dark_weight: usize = weight(&extraction.background_colors, &resolve, true);
        let light_weight: usize = weight(&extraction.background_colors, &resolve, false);
        let theme = if dark_weight > light_weight {
            Theme::Dark
        } else {
            Theme::Light
        };

        // text on the dominant background should contrast with it
        let text_colors: Vec<(String, Rgb)> = ranked_colors(&extraction.text_colors, &resolve)
            .into_iter()
            .filter(|(_, rgb)| !rgb.is_vibrant())
            .filter(|(_, rgb)| match theme {
                Theme::Dark => !rgb.is_dark(),
                Theme::Light => rgb.is_dark(),
            })
            .collect();

        let mut all_colors = extraction.background_colors.clone();
        for (k, v) in extraction
            .text_colors
            .iter()
            .chain(extraction.border_colors.iter())
        {
            *all_colors.entry(k.clone()).or_insert(0) += v;
        }
        let accents: Vec<String> = ranked_colors(&all_colors, &resolve)
            .into_iter()
            .filter(|(_, rgb)| rgb.is_vibrant() && ACCENT_LUMA_RANGE.contains(&rgb.luma()))
            .map(|(hex, _)| hex)
            .collect();

        let borders = ranked_colors(&extraction.border_colors, &resolve)
            .into_iter()
            .map(|(hex, _)| hex)
            .take(LIST_LIMIT)
            .collect();

        Self {
            theme,
            backgrounds: BackgroundTokens {
                dark: dark_bg.map(|(hex, _)| hex.clone()),
                light: light_bg.map(|(hex, _)| hex.clone()),
            },
            text: TextTokens {
                primary: text_colors.first().map(|(hex, _)| hex.clone()),
                secondary: text_colors.get(1).map(|(hex, _)| hex.clone()),
            },
            accents: AccentTokens {
                primary: accents.first().cloned(),
                secondary: accents.get(1).cloned(),
            },
            borders,
            font_families: ranked(&extraction.font_families),
            font_sizes: ranked(&extraction.font_sizes),
            spacing: ranked(&extraction.spacing),
            radii: ranked(&extraction.radii),
            shadows: ranked(&extraction.shadows),
            custom_properties: extraction.custom_properties.clone(),
        }
    }

    /// Primary page background for the detected theme
    pub fn page_background(&self) -> Option<&str> {
        match self.theme {
            Theme::Dark => self.backgrounds.dark.as_deref(),
            Theme::Light => self.backgrounds.light.as_deref(),
        }
    }

    /// Render the tokens as literal lines for prompt text
    pub fn describe(&self) -> String {
        let mut lines = Vec::new();
        let theme = match self.theme {
            Theme::Dark => "dark",
            Theme::Light => "light",
        };
        lines.push(format!("- Theme: {}", theme));

        let mut color = |label: &str, value: &Option<String>| {
            if let Some(v) = value {
                lines.push(format!("- {}: {}", label, v));
            }
        };
        color("Dark background", &self.backgrounds.dark);
        color("Light background", &self.backgrounds.light);
        color("Primary text", &self.text.primary);
        color("Secondary text", &self.text.secondary);
        color("Primary accent", &self.accents.primary);
        color("Secondary accent", &self.accents.secondary);

        let mut list = |label: &str, values: &[String]| {
            if !values.is_empty() {
                lines.push(format!("- {}: {}", label, values.join(", ")));
            }
        };
        list("Border colors", &self.borders);
        list("Font families", &self.font_families);
        list("Font sizes", &self.font_sizes);
        list("Spacing", &self.spacing);
        list("Border radius", &self.radii);
        list("Shadows", &self.shadows);

        lines.join("\n")
    }
}

/// Resolve `var(--x)` references one level deep, then parse
fn resolve_color(value: &str, properties: &BTreeMap<String, String>) -> Option<Rgb> {
    let value = value.trim();
    if let Some(inner) = value
        .strip_prefix("var(")
        .and_then(|v| v.strip_suffix(')'))
    {
        let name = inner.split(',').next().unwrap_or_default().trim();
        return properties.get(name).and_then(|v| Rgb::parse(v));
    }
    Rgb::parse(value)
}

/// Parseable colors by descending frequency, ties broken by value
fn ranked_colors<F>(counts: &BTreeMap<String, usize>, resolve: &F) -> Vec<(String, Rgb)>
where
    F: Fn(&str) -> Option<Rgb>,
{
    let mut merged: BTreeMap<String, (usize, Rgb)> = BTreeMap::new();
    for (value, count) in counts {
        if let Some(rgb) = resolve(value) {
            let entry = merged.entry(rgb.to_hex()).or_insert((0, rgb));
            entry.0 += count;
        }
    }
    let mut colors: Vec<(String, usize, Rgb)> = merged
        .into_iter()
        .map(|(hex, (count, rgb))| (hex, count, rgb))
        .collect();
    colors.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    colors.into_iter().map(|(hex, _, rgb)| (hex, rgb)).collect()
}

fn weight<F>(counts: &BTreeMap<String, usize>, resolve: &F, dark: bool) -> usize
where
    F: Fn(&str) -> Option<Rgb>,
{
    counts
        .iter()
        .filter_map(|(v, c)| resolve(v).map(|rgb| (rgb, *c)))
        .filter(|(rgb, _)| rgb.is_dark() == dark)
        .map(|(_, c)| c)
        .sum()
}

fn ranked(counts: &BTreeMap<String, usize>) -> Vec<String> {
    let mut values: Vec<(&String, &usize)> = counts.iter().collect();
    values.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    values
        .into_iter()
        .take(LIST_LIMIT)
        .map(|(v, _)| v.clone())
        .collect()
}
