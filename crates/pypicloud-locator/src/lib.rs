pub use crate::distribution::{Digest, Distribution};
pub use crate::error::Error;
pub use crate::locator::{PreferWheelLocator, PreferWheelLocatorBuilder, DEFAULT_CANONICAL_HOST};
pub use crate::requirement::{Requirement, RequirementError};
pub use crate::score::{score_url, UrlScore};
pub use crate::specifiers::{LegacySpecifier, LenientVersionSpecifiers};
pub use crate::version::{LegacyVersion, ReleaseVersion};

mod distribution;
mod error;
mod html;
mod locator;
mod requirement;
mod score;
mod specifiers;
mod version;
