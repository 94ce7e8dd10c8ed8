use serde::{Deserialize, Deserializer, Serialize};

/// A product as understood by the rest of the system, reconciled from the
/// commerce search API's variable response shapes.
///
/// Field names serialize as camelCase so persisted catalogs and exported
/// files stay compatible with the JSON the search API and earlier exports
/// use on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Stable identifier from the source system. Natural identity key for
    /// catalog membership lookups.
    pub id: String,
    /// Flat title field some response shapes send instead of `titles`.
    #[serde(default)]
    pub name: Option<String>,
    /// Nested title shape; callers read `titles.default`.
    #[serde(default)]
    pub titles: Option<Titles>,
    /// Nested image shape; callers read `media.default.src`.
    #[serde(default)]
    pub media: Option<Media>,
    /// Flat image URL field some response shapes send instead of `media`.
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub pricing: Pricing,
    /// Colour/material variants, each with its own image gallery.
    #[serde(default)]
    pub swatches: Vec<Swatch>,
    /// Stock/size variant records, preserved opaquely. The source shape
    /// varies per template and is not consumed structurally.
    #[serde(default)]
    pub variants: Vec<serde_json::Value>,
    /// Availability signal, preserved opaquely (boolean or count-based).
    #[serde(default)]
    pub stock: Option<serde_json::Value>,
}

impl Product {
    /// Best-effort display title: non-empty `titles.default`, then
    /// non-empty `name`. The "Untitled Product" fallback is a presentation
    /// concern and lives in the rendering layer, not here.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.titles
            .as_ref()
            .and_then(|t| t.default.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .or_else(|| {
                self.name
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
            })
    }

    /// Primary image URL: `media.default.src`, then the flat `image_url`.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.media
            .as_ref()
            .and_then(|m| m.default.as_ref())
            .and_then(|asset| asset.src.as_deref())
            .filter(|s| !s.trim().is_empty())
            .or_else(|| self.image_url.as_deref().filter(|s| !s.trim().is_empty()))
    }
}

/// Nested title shape from the search API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Titles {
    #[serde(default)]
    pub default: Option<String>,
}

/// Nested media shape from the search API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Media {
    #[serde(default)]
    pub default: Option<MediaAsset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MediaAsset {
    #[serde(default)]
    pub src: Option<String>,
}

/// Current and previous price in the store's base currency (GBP).
///
/// The source API sends prices as either JSON numbers or numeric strings;
/// both deserialize to `f64`. A missing `price` defaults to `0.0`; a missing
/// `was` stays `None` so markdown display can distinguish "never reduced"
/// from "reduced to zero".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Pricing {
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: f64,
    #[serde(default, deserialize_with = "lenient_was")]
    pub was: Option<f64>,
}

impl Pricing {
    /// `true` when a strictly higher previous price exists.
    #[must_use]
    pub fn is_reduced(&self) -> bool {
        self.was.is_some_and(|was| was > self.price)
    }
}

/// A colour/material variant of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Swatch {
    #[serde(default)]
    pub id: String,
    /// Accepts both the `colourName` and legacy `colour` spellings.
    #[serde(default, alias = "colour")]
    pub colour_name: Option<String>,
    #[serde(default)]
    pub hex: Option<String>,
    /// Image gallery URLs, in source order. The API sends either a flat
    /// list of URLs or a list of per-view URL lists; both flatten here.
    #[serde(default, deserialize_with = "swatch_images")]
    pub images: Vec<String>,
}

/// A JSON value that is either a number or a numeric string.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

impl NumberOrString {
    fn as_f64(&self) -> Option<f64> {
        match self {
            NumberOrString::Number(n) => Some(*n),
            NumberOrString::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }
}

fn lenient_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(0.0),
        Some(value) => value
            .as_f64()
            .ok_or_else(|| serde::de::Error::custom("price is not numeric")),
    }
}

fn lenient_was<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(value) => value
            .as_f64()
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom("was price is not numeric")),
    }
}

fn swatch_images<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(flatten_image_urls(&raw))
}

/// Flattens a gallery value that mixes bare URLs and nested URL lists into
/// one ordered list, dropping empties and non-strings.
fn flatten_image_urls(raw: &[serde_json::Value]) -> Vec<String> {
    let mut urls = Vec::new();
    for entry in raw {
        match entry {
            serde_json::Value::String(url) if !url.trim().is_empty() => {
                urls.push(url.clone());
            }
            serde_json::Value::Array(inner) => {
                urls.extend(
                    inner
                        .iter()
                        .filter_map(serde_json::Value::as_str)
                        .filter(|url| !url.trim().is_empty())
                        .map(str::to_string),
                );
            }
            _ => {}
        }
    }
    urls
}
