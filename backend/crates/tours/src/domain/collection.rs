//! Document collections

use derive_more::Display;

/// The document collections served by this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Collection {
    #[display("tours")]
    Tours,
    #[display("reviews")]
    Reviews,
    #[display("bookings")]
    Bookings,
}

impl Collection {
    pub const ALL: [Collection; 3] = [Self::Tours, Self::Reviews, Self::Bookings];

    /// Table holding the collection, one `(id uuid, doc jsonb)` row per document
    pub const fn table(&self) -> &'static str {
        match self {
            Self::Tours => "tours",
            Self::Reviews => "reviews",
            Self::Bookings => "bookings",
        }
    }

    /// Fields whose combined values must be unique across the collection
    pub const fn unique_keys(&self) -> &'static [&'static str] {
        match self {
            Self::Tours => &["name"],
            Self::Reviews => &["tour", "user"],
            Self::Bookings => &[],
        }
    }
}
