//! Route groups sharing a quota.

/// A set of routes that share one per-client quota.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum RouteGroup {
    /// Text generation, vision and stored-image retrieval
    Standard,
    /// Image generation and image-model diagnostics
    Image,
}
