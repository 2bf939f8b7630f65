//! Database models for agencies.

use diesel::prelude::*;

use propsync_core::agencies::{AccessGrant, Agency};

/// Database model for agencies.
///
/// `None` columns are written as NULL on upsert so that a fresh grant
/// without a remote user id does not keep the previous one around.
#[derive(Queryable, Selectable, Insertable, AsChangeset, Identifiable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::agencies)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct AgencyDB {
    pub id: String,
    pub access_token: Option<String>,
    pub remote_user_id: Option<String>,
    pub updated_at: String,
}

impl AgencyDB {
    pub fn from_grant(agency_id: &str, grant: AccessGrant, updated_at: String) -> Self {
        Self {
            id: agency_id.to_string(),
            access_token: Some(grant.access_token),
            remote_user_id: grant.remote_user_id,
            updated_at,
        }
    }
}

impl From<AgencyDB> for Agency {
    fn from(db: AgencyDB) -> Self {
        Self {
            id: db.id,
            access_token: db.access_token,
            remote_user_id: db.remote_user_id,
        }
    }
}
