//! Marker types.

/// Marker type describing an entity creation.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// Marker type describing a token or session expiration.
#[derive(Clone, Copy, Debug)]
pub struct Expiration;

/// Marker type describing a token or session issuance.
#[derive(Clone, Copy, Debug)]
pub struct Issuance;
