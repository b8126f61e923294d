//! Application Manifest Module
//!
//! Serde types for the installable application manifest: identity, colors,
//! display mode, start URL and scope, and the icon descriptors with their
//! `any` / `maskable` purpose flag. Field names follow the manifest JSON.

use serde::{Deserialize, Serialize};

// == Icon Purpose ==
/// How an icon may be used by the installing platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconPurpose {
    /// General-purpose icon
    #[default]
    Any,
    /// Icon safe to mask into platform shapes
    Maskable,
}

// == Icon Descriptor ==
/// One installable icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconDescriptor {
    /// Source path of the image
    pub src: String,
    /// Pixel dimensions, e.g. `192x192`
    pub sizes: String,
    /// MIME type of the image
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Usage flag; absent means `any`
    #[serde(default)]
    pub purpose: IconPurpose,
}

// == Display Mode ==
/// Presentation of the installed application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayMode {
    #[default]
    Standalone,
    MinimalUi,
    Fullscreen,
    Browser,
}

// == Web App Manifest ==
/// The installable application manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebAppManifest {
    /// Full application name
    pub name: String,
    /// Name shown where space is constrained
    pub short_name: String,
    /// One-line description
    #[serde(default)]
    pub description: String,
    /// Toolbar/UI theme color
    pub theme_color: String,
    /// Splash background color
    pub background_color: String,
    /// Presentation mode; `standalone` unless overridden
    #[serde(default)]
    pub display: DisplayMode,
    /// URL opened on launch
    pub start_url: String,
    /// Navigation scope of the installed app
    pub scope: String,
    /// Installable icons
    pub icons: Vec<IconDescriptor>,
}

impl WebAppManifest {
    /// Parses a manifest from its JSON document.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Serializes the manifest to its JSON document.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Icons flagged as safe for masking.
    pub fn maskable_icons(&self) -> impl Iterator<Item = &IconDescriptor> {
        self.icons
            .iter()
            .filter(|icon| icon.purpose == IconPurpose::Maskable)
    }
}
