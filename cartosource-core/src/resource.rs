//! References to remote documents: tile descriptors, geometry files, images.
//!
//! Style records may carry absolute URLs (`https://…`, `mapbox://…`) or
//! relative references such as `tiles.json` that the host resolves against
//! its own base. Both are kept; only strings that cannot be a reference at
//! all (empty, whitespace, JSON punctuation) are rejected.

use std::fmt;

use url::Url;

/// A remote reference taken from a style record.
///
/// # Examples
/// ```
/// use cartosource_core::ResourceUrl;
/// use url::Url;
///
/// let absolute = ResourceUrl::parse("https://tile.example/tiles.json").expect("absolute");
/// assert!(absolute.is_absolute());
///
/// let relative = ResourceUrl::parse("assets/parks.geojson").expect("relative");
/// let base = Url::parse("https://app.example/styles/").expect("base");
/// assert_eq!(
///     relative.resolve(&base).map(String::from),
///     Ok("https://app.example/styles/assets/parks.geojson".to_owned())
/// );
///
/// assert!(ResourceUrl::parse("{\"type\":\"Point\"}").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceUrl {
    /// A URL with a scheme.
    Absolute(Url),
    /// A relative reference, resolved by the host.
    Relative(String),
}

impl ResourceUrl {
    /// Classify `raw` as an absolute URL, a relative reference, or neither.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match Url::parse(raw) {
            Ok(url) => Some(Self::Absolute(url)),
            Err(url::ParseError::RelativeUrlWithoutBase) if is_relative_reference(raw) => {
                Some(Self::Relative(raw.to_owned()))
            }
            Err(err) => {
                log::debug!("treating {raw:?} as a non-URL value: {err}");
                None
            }
        }
    }

    /// The reference exactly as written in the record.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Absolute(url) => url.as_str(),
            Self::Relative(reference) => reference,
        }
    }

    /// Whether the reference carries its own scheme.
    #[must_use]
    pub const fn is_absolute(&self) -> bool {
        matches!(self, Self::Absolute(_))
    }

    /// Resolve against `base`; absolute URLs are returned unchanged.
    ///
    /// # Errors
    /// Returns the `url` crate's [`url::ParseError`] when the reference
    /// cannot be joined onto `base`.
    pub fn resolve(&self, base: &Url) -> Result<Url, url::ParseError> {
        match self {
            Self::Absolute(url) => Ok(url.clone()),
            Self::Relative(reference) => base.join(reference),
        }
    }
}

impl fmt::Display for ResourceUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Characters that may not appear unescaped in a URI reference.
fn is_excluded(ch: char) -> bool {
    ch.is_whitespace()
        || ch.is_control()
        || matches!(
            ch,
            '"' | '<' | '>' | '\\' | '^' | '`' | '{' | '|' | '}' | '[' | ']'
        )
}

fn is_relative_reference(raw: &str) -> bool {
    !raw.is_empty() && !raw.chars().any(is_excluded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://tile.example/tiles.json")]
    #[case("mapbox://mapbox.satellite")]
    #[case("asset://parks.geojson")]
    fn absolute_urls_keep_their_scheme(#[case] raw: &str) {
        let url = ResourceUrl::parse(raw).expect("absolute URL");
        assert!(url.is_absolute());
    }

    #[rstest]
    #[case("tiles.json")]
    #[case("assets/parks.geojson")]
    #[case("../data/radar.png?v=2")]
    #[case("/static/tiles.json")]
    fn relative_references_are_kept_verbatim(#[case] raw: &str) {
        let url = ResourceUrl::parse(raw).expect("relative reference");
        assert_eq!(url, ResourceUrl::Relative(raw.to_owned()));
        assert_eq!(url.as_str(), raw);
    }

    #[rstest]
    #[case("")]
    #[case("not a url")]
    #[case(r#"{"type":"Point","coordinates":[0,0]}"#)]
    #[case("{broken")]
    #[case("[1,2]")]
    fn non_references_are_rejected(#[case] raw: &str) {
        assert!(ResourceUrl::parse(raw).is_none());
    }

    #[rstest]
    fn resolve_joins_relative_references() {
        let base = Url::parse("https://app.example/styles/main.json").expect("base");
        let url = ResourceUrl::parse("tiles.json").expect("relative reference");
        assert_eq!(
            url.resolve(&base).map(String::from),
            Ok("https://app.example/styles/tiles.json".to_owned())
        );
    }
}
