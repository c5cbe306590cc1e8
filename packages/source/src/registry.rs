//! Site registry: loads the embedded site definitions.
//!
//! Each `.toml` file in `packages/source/sites/` is baked into the binary
//! at compile time via [`include_str!`] and deserialized into its adapter's
//! typed definition.

use crate::SourceError;
use crate::bbref::BbrefSite;
use crate::site_def::{SiteInfo, parse_site_toml};
use crate::sportsws::SportsWsSite;
use crate::spotrac::SpotracSite;

const BBREF_TOML: &str = include_str!("../sites/bbref.toml");
const SPOTRAC_TOML: &str = include_str!("../sites/spotrac.toml");
const SPORTSWS_TOML: &str = include_str!("../sites/sportsws.toml");

/// Every configured site, one typed definition per adapter.
#[derive(Debug, Clone)]
pub struct SiteRegistry {
    /// Basketball-Reference.
    pub bbref: BbrefSite,
    /// Spotrac.
    pub spotrac: SpotracSite,
    /// Sports.ws.
    pub sportsws: SportsWsSite,
}

impl SiteRegistry {
    /// Parses the embedded site definitions.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Config`] if a definition is malformed.
    pub fn load() -> Result<Self, SourceError> {
        Ok(Self {
            bbref: parse_site_toml("bbref.toml", BBREF_TOML)?,
            spotrac: parse_site_toml("spotrac.toml", SPOTRAC_TOML)?,
            sportsws: parse_site_toml("sportsws.toml", SPORTSWS_TOML)?,
        })
    }

    /// Shared fields of every site, for listings.
    #[must_use]
    pub fn sites(&self) -> [&SiteInfo; 3] {
        [&self.bbref.site, &self.spotrac.site, &self.sportsws.site]
    }
}
