use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;

use propsync_core::listings::{sanitize_fields, Listing, ListingFields, ListingRepositoryTrait};
use propsync_core::Result;

use super::model::ListingDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::listings;

pub struct ListingRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ListingRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        ListingRepository { pool, writer }
    }
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

fn to_listings(rows: Vec<ListingDB>) -> Result<Vec<Listing>> {
    let mut mirrored = Vec::with_capacity(rows.len());
    for row in rows {
        mirrored.push(Listing::try_from(row)?);
    }
    Ok(mirrored)
}

#[async_trait]
impl ListingRepositoryTrait for ListingRepository {
    fn get_by_id(&self, listing_id: &str) -> Result<Option<Listing>> {
        let mut conn = get_connection(&self.pool)?;
        let row = listings::table
            .find(listing_id)
            .select(ListingDB::as_select())
            .first::<ListingDB>(&mut conn)
            .optional()
            .into_core()?;

        match row {
            Some(row) => Ok(Some(Listing::try_from(row)?)),
            None => Ok(None),
        }
    }

    async fn upsert(&self, listing: Listing) -> Result<Listing> {
        let row = ListingDB::from_listing(listing, now())?;

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Listing> {
                let stored = diesel::insert_into(listings::table)
                    .values(&row)
                    .on_conflict(listings::id)
                    .do_update()
                    .set(&row)
                    .returning(ListingDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Listing::try_from(stored)?)
            })
            .await
    }

    async fn set_user_id(&self, listing_id: &str, user_id: &str) -> Result<usize> {
        let listing_id = listing_id.to_string();
        let user_id = user_id.to_string();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::update(listings::table.find(listing_id))
                    .set((
                        listings::user_id.eq(Some(user_id)),
                        listings::updated_at.eq(now()),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }

    async fn update_fields(&self, listing_id: &str, fields: ListingFields) -> Result<usize> {
        let listing_id = listing_id.to_string();
        let fields = serde_json::to_string(&sanitize_fields(fields)).map_err(StorageError::from)?;

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::update(listings::table.find(listing_id))
                    .set((listings::fields.eq(fields), listings::updated_at.eq(now())))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }

    async fn delete(&self, listing_id: &str) -> Result<usize> {
        let listing_id = listing_id.to_string();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(listings::table.find(listing_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }

    fn list_by_agency(&self, agency_id: &str) -> Result<Vec<Listing>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = listings::table
            .filter(listings::agency_id.eq(agency_id))
            .order(listings::id.asc())
            .select(ListingDB::as_select())
            .load::<ListingDB>(&mut conn)
            .map_err(StorageError::from)?;
        to_listings(rows)
    }

    fn list_by_user(&self, user_id: &str) -> Result<Vec<Listing>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = listings::table
            .filter(listings::user_id.eq(user_id))
            .order(listings::id.asc())
            .select(ListingDB::as_select())
            .load::<ListingDB>(&mut conn)
            .map_err(StorageError::from)?;
        to_listings(rows)
    }
}
