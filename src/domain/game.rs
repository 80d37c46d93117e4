use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use url::Url;

/// Hosts a listing's cover art may be served from. Anything else is dropped.
pub const ALLOWED_IMAGE_HOSTNAMES: [&str; 7] = [
    "cdn.akamai.steamstatic.com",
    "shared.fastly.steamstatic.com",
    "cdn1.epicgames.com",
    "cdn2.unrealengine.com",
    "images.gog-statics.com",
    "m.media-amazon.com",
    "images-na.ssl-images-amazon.com",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "Epic Games Store")]
    EpicGamesStore,
    #[serde(rename = "Amazon Prime Gaming")]
    AmazonPrimeGaming,
    #[serde(rename = "GOG")]
    Gog,
    #[serde(rename = "Steam")]
    Steam,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::EpicGamesStore,
        Platform::AmazonPrimeGaming,
        Platform::Gog,
        Platform::Steam,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::EpicGamesStore => "Epic Games Store",
            Platform::AmazonPrimeGaming => "Amazon Prime Gaming",
            Platform::Gog => "GOG",
            Platform::Steam => "Steam",
        }
    }

    /// Matches the display name, ignoring case and surrounding whitespace.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One element of the model's array, before any validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GameCandidate {
    pub title: Option<String>,
    pub platform: Option<String>,
    #[serde(rename = "dealLink")]
    pub deal_link: Option<String>,
    #[serde(rename = "imageURL")]
    pub image_url: Option<String>,
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
    /// Models use both spellings, sometimes in the same object.
    #[serde(rename = "original_price")]
    pub original_price: Option<String>,
    #[serde(rename = "originalPrice")]
    pub original_price_camel: Option<String>,
    #[serde(rename = "gameplayURL")]
    pub gameplay_url: Option<String>,
    pub gameplay: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameListing {
    pub title: String,
    pub platform: Platform,
    #[serde(rename = "dealLink")]
    pub deal_link: String,
    #[serde(rename = "imageURL")]
    pub image_url: String,
    #[serde(rename = "endDate", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(rename = "original_price", skip_serializing_if = "Option::is_none")]
    pub original_price: Option<String>,
    #[serde(rename = "gameplayURL", skip_serializing_if = "Option::is_none")]
    pub gameplay_url: Option<String>,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum InvalidListing {
    #[error("missing or empty field `{0}`")]
    Missing(&'static str),
    #[error("unknown platform `{0}`")]
    UnknownPlatform(String),
    #[error("`{field}` is not an absolute https URL: {value}")]
    NotHttps { field: &'static str, value: String },
}

fn required(value: Option<String>, field: &'static str) -> Result<String, InvalidListing> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(InvalidListing::Missing(field))
}

fn https_url(value: String, field: &'static str) -> Result<String, InvalidListing> {
    match Url::parse(&value) {
        Ok(url) if url.scheme() == "https" && url.host_str().is_some() => Ok(value),
        _ => Err(InvalidListing::NotHttps { field, value }),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl TryFrom<GameCandidate> for GameListing {
    type Error = InvalidListing;

    fn try_from(candidate: GameCandidate) -> Result<Self, Self::Error> {
        let title = required(candidate.title, "title")?;
        let platform_name = required(candidate.platform, "platform")?;
        let platform = Platform::from_name(&platform_name)
            .ok_or(InvalidListing::UnknownPlatform(platform_name))?;
        let deal_link = https_url(required(candidate.deal_link, "dealLink")?, "dealLink")?;
        let image_url = https_url(required(candidate.image_url, "imageURL")?, "imageURL")?;

        // An unusable video link is not worth losing the game over.
        let gameplay_url = [candidate.gameplay_url, candidate.gameplay]
            .into_iter()
            .filter_map(non_blank)
            .find(|u| Url::parse(u).is_ok());

        Ok(Self {
            title,
            platform,
            deal_link,
            image_url,
            end_date: non_blank(candidate.end_date),
            // Empty means "no price known" and is kept as the model sent it.
            original_price: candidate
                .original_price
                .or(candidate.original_price_camel)
                .map(|p| p.trim().to_string()),
            gameplay_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate() -> GameCandidate {
        GameCandidate {
            title: Some("Game A".to_string()),
            platform: Some("Steam".to_string()),
            deal_link: Some("https://store.steampowered.com/x".to_string()),
            image_url: Some("https://cdn.akamai.steamstatic.com/x.jpg".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn valid_candidate_becomes_listing() {
        let listing = GameListing::try_from(candidate()).unwrap();
        assert_eq!(listing.title, "Game A");
        assert_eq!(listing.platform, Platform::Steam);
        assert!(listing.end_date.is_none());
    }

    #[test]
    fn platform_names_are_matched_loosely() {
        assert_eq!(
            Platform::from_name(" epic games store "),
            Some(Platform::EpicGamesStore)
        );
        assert_eq!(Platform::from_name("Itch.io"), None);
    }

    #[test]
    fn rejects_missing_title_and_unknown_platform() {
        let mut c = candidate();
        c.title = Some("   ".to_string());
        assert_eq!(
            GameListing::try_from(c).unwrap_err(),
            InvalidListing::Missing("title")
        );

        let mut c = candidate();
        c.platform = Some("Origin".to_string());
        assert_eq!(
            GameListing::try_from(c).unwrap_err(),
            InvalidListing::UnknownPlatform("Origin".to_string())
        );
    }

    #[test]
    fn rejects_non_https_deal_link() {
        let mut c = candidate();
        c.deal_link = Some("http://store.steampowered.com/x".to_string());
        assert!(matches!(
            GameListing::try_from(c),
            Err(InvalidListing::NotHttps { field: "dealLink", .. })
        ));
    }

    #[test]
    fn drops_broken_gameplay_url_but_keeps_game() {
        let mut c = candidate();
        c.gameplay_url = Some("not a url".to_string());
        c.original_price = Some(String::new());
        let listing = GameListing::try_from(c).unwrap();
        assert!(listing.gameplay_url.is_none());
        assert_eq!(listing.original_price.as_deref(), Some(""));
    }

    #[test]
    fn both_price_spellings_in_one_object_are_accepted() {
        let raw = r#"{"title":"Game A","platform":"Steam","dealLink":"https://store.steampowered.com/x","imageURL":"https://cdn.akamai.steamstatic.com/x.jpg","original_price":"$19.99","originalPrice":"19.99","gameplay":"https://youtu.be/abcdefghijk"}"#;
        let c: GameCandidate = serde_json::from_str(raw).unwrap();
        let listing = GameListing::try_from(c).unwrap();
        assert_eq!(listing.original_price.as_deref(), Some("$19.99"));
        assert_eq!(
            listing.gameplay_url.as_deref(),
            Some("https://youtu.be/abcdefghijk")
        );

        let camel_only = r#"{"originalPrice":"$4.99"}"#;
        let c: GameCandidate = serde_json::from_str(camel_only).unwrap();
        assert_eq!(c.original_price_camel.as_deref(), Some("$4.99"));
    }

    #[test]
    fn serializes_with_wire_names() {
        let listing = GameListing::try_from(candidate()).unwrap();
        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(json["platform"], "Steam");
        assert_eq!(json["imageURL"], "https://cdn.akamai.steamstatic.com/x.jpg");
        assert!(json.get("endDate").is_none());
    }
}
