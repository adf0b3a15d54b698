//! Regex rules over raw stylesheet text.
//!
//! Each rule is an independent pass that returns every matched value in
//! source order, duplicates included, so callers can count frequencies.
//! This is deliberately not a CSS parser.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

fn rule(pattern: &'static str) -> Regex {
    Regex::new(pattern).expect("static css rule is valid")
}

static CUSTOM_PROPERTY: LazyLock<Regex> =
    LazyLock::new(|| rule(r"(--[A-Za-z0-9_-]+)\s*:\s*([^;}]+)"));
static TEXT_COLOR: LazyLock<Regex> =
    LazyLock::new(|| rule(r"(?i)(?:^|[;{\s])color\s*:\s*([^;}!]+)"));
static BACKGROUND_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    rule(r"(?i)background(?:-color)?\s*:\s*(#[0-9a-f]{3,8}\b|rgba?\([^)]*\)|hsla?\([^)]*\)|var\([^)]*\)|white\b|black\b)")
});
static BORDER_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    rule(r"(?i)border(?:-(?:top|right|bottom|left))?(?:-color)?\s*:[^;}]*?(#[0-9a-f]{3,8}\b|rgba?\([^)]*\)|hsla?\([^)]*\))")
});
static FONT_FAMILY: LazyLock<Regex> =
    LazyLock::new(|| rule(r"(?i)font-family\s*:\s*([^;}!]+)"));
static FONT_SIZE: LazyLock<Regex> = LazyLock::new(|| rule(r"(?i)font-size\s*:\s*([^;}!]+)"));
static SPACING: LazyLock<Regex> = LazyLock::new(|| {
    rule(r"(?i)(?:padding|margin)(?:-(?:top|right|bottom|left|inline|block))?\s*:\s*([^;}!]+)")
});
static RADIUS: LazyLock<Regex> = LazyLock::new(|| rule(r"(?i)border-radius\s*:\s*([^;}!]+)"));
static SHADOW: LazyLock<Regex> = LazyLock::new(|| rule(r"(?i)box-shadow\s*:\s*([^;}!]+)"));

/// Frequency counts per extracted category
///
/// Map keys form the deduplicated set, values the raw occurrence count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleExtraction {
    pub custom_properties: BTreeMap<String, String>,
    pub text_colors: BTreeMap<String, usize>,
    pub background_colors: BTreeMap<String, usize>,
    pub border_colors: BTreeMap<String, usize>,
    pub font_families: BTreeMap<String, usize>,
    pub font_sizes: BTreeMap<String, usize>,
    pub spacing: BTreeMap<String, usize>,
    pub radii: BTreeMap<String, usize>,
    pub shadows: BTreeMap<String, usize>,
}

impl StyleExtraction {
    /// Fold another extraction's counts into this one
    pub fn merge(&mut self, other: &StyleExtraction) {
        for (k, v) in &other.custom_properties {
            self.custom_properties
                .entry(k.clone())
                .or_insert_with(|| v.clone());
        }
        merge_counts(&mut self.text_colors, &other.text_colors);
        merge_counts(&mut self.background_colors, &other.background_colors);
        merge_counts(&mut self.border_colors, &other.border_colors);
        merge_counts(&mut self.font_families, &other.font_families);
        merge_counts(&mut self.font_sizes, &other.font_sizes);
        merge_counts(&mut self.spacing, &other.spacing);
        merge_counts(&mut self.radii, &other.radii);
        merge_counts(&mut self.shadows, &other.shadows);
    }

    pub fn is_empty(&self) -> bool {
        self.custom_properties.is_empty()
            && self.text_colors.is_empty()
            && self.background_colors.is_empty()
            && self.border_colors.is_empty()
            && self.font_families.is_empty()
            && self.font_sizes.is_empty()
            && self.spacing.is_empty()
            && self.radii.is_empty()
            && self.shadows.is_empty()
    }
}

/// Run every rule over the stylesheet text
pub fn extract(css: &str) -> StyleExtraction {
    StyleExtraction {
        custom_properties: custom_properties(css).into_iter().collect(),
        text_colors: count(text_colors(css)),
        background_colors: count(background_colors(css)),
        border_colors: count(border_colors(css)),
        font_families: count(font_families(css)),
        font_sizes: count(font_sizes(css)),
        spacing: count(spacing(css)),
        radii: count(radii(css)),
        shadows: count(shadows(css)),
    }
}

/// `--name: value` definitions, last definition wins
pub fn custom_properties(css: &str) -> Vec<(String, String)> {
    CUSTOM_PROPERTY
        .captures_iter(css)
        .map(|c| (c[1].to_string(), normalize(&c[2])))
        .collect()
}

/// `color:` values, excluding the `*-color` longhands
pub fn text_colors(css: &str) -> Vec<String> {
    captures(&TEXT_COLOR, css)
}

/// Color values of `background` and `background-color`
pub fn background_colors(css: &str) -> Vec<String> {
    captures(&BACKGROUND_COLOR, css)
}

/// Color values of `border*` declarations
pub fn border_colors(css: &str) -> Vec<String> {
    captures(&BORDER_COLOR, css)
}

pub fn font_families(css: &str) -> Vec<String> {
    captures(&FONT_FAMILY, css)
}

pub fn font_sizes(css: &str) -> Vec<String> {
    captures(&FONT_SIZE, css)
}

/// `padding*` and `margin*` values
pub fn spacing(css: &str) -> Vec<String> {
    captures(&SPACING, css)
}

pub fn radii(css: &str) -> Vec<String> {
    captures(&RADIUS, css)
}

pub fn shadows(css: &str) -> Vec<String> {
    captures(&SHADOW, css)
}

fn captures(re: &Regex, css: &str) -> Vec<String> {
    re.captures_iter(css)
        .map(|c| normalize(&c[1]))
        .filter(|v| !v.is_empty() && !is_keyword(v))
        .collect()
}

fn normalize(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase()
}

fn is_keyword(value: &str) -> bool {
    matches!(
        value,
        "inherit" | "initial" | "unset" | "revert" | "transparent" | "currentcolor" | "none" | "0"
    )
}

fn count(values: Vec<String>) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }
    counts
}

fn merge_counts(into: &mut BTreeMap<String, usize>, from: &BTreeMap<String, usize>) {
    for (k, v) in from {
        *into.entry(k.clone()).or_insert(0) += v;
    }
}
