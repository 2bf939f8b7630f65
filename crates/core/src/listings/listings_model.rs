//! Listing domain models.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Open-ended bag of marketplace-defined listing fields, in insertion order.
pub type ListingFields = Map<String, Value>;

/// Keys owned by the envelope. They never live inside a field bag.
pub const RESERVED_FIELDS: [&str; 3] = ["id", "agencyId", "userId"];

/// Removes envelope keys from a field bag.
///
/// Remote records carry their own `id`, which duplicates the listing id.
pub fn sanitize_fields(mut fields: ListingFields) -> ListingFields {
    for key in RESERVED_FIELDS {
        fields.remove(key);
    }
    fields
}

/// Local mirror of a marketplace listing, keyed by the marketplace id.
///
/// Serializes as the uniform envelope `{id, agencyId, userId, ...fields}`.
/// `user_id` is `None` for imported listings nobody has claimed yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub agency_id: String,
    pub user_id: Option<String>,
    #[serde(flatten)]
    pub fields: ListingFields,
}

impl Listing {
    pub fn new(
        id: impl Into<String>,
        agency_id: impl Into<String>,
        user_id: Option<String>,
        fields: ListingFields,
    ) -> Self {
        Self {
            id: id.into(),
            agency_id: agency_id.into(),
            user_id,
            fields: sanitize_fields(fields),
        }
    }

    /// Mirror of a listing pulled in by bulk import: owned by the agency, unclaimed.
    pub fn imported(id: impl Into<String>, agency_id: impl Into<String>, fields: ListingFields) -> Self {
        Self::new(id, agency_id, None, fields)
    }
}
