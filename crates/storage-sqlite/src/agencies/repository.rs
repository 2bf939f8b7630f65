use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::debug;
use std::sync::Arc;

use propsync_core::agencies::{AccessGrant, Agency, AgencyRepositoryTrait};
use propsync_core::Result;

use super::model::AgencyDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::agencies;

pub struct AgencyRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl AgencyRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        AgencyRepository { pool, writer }
    }
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[async_trait]
impl AgencyRepositoryTrait for AgencyRepository {
    fn get_by_id(&self, agency_id: &str) -> Result<Option<Agency>> {
        let mut conn = get_connection(&self.pool)?;
        let agency = agencies::table
            .find(agency_id)
            .select(AgencyDB::as_select())
            .first::<AgencyDB>(&mut conn)
            .optional()
            .into_core()?;
        Ok(agency.map(Agency::from))
    }

    async fn set_token(&self, agency_id: &str, grant: AccessGrant) -> Result<Agency> {
        let row = AgencyDB::from_grant(agency_id, grant, now());
        debug!("Storing marketplace credential for agency {}", row.id);

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Agency> {
                let stored = diesel::insert_into(agencies::table)
                    .values(&row)
                    .on_conflict(agencies::id)
                    .do_update()
                    .set(&row)
                    .returning(AgencyDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Agency::from(stored))
            })
            .await
    }

    async fn clear_token(&self, agency_id: &str) -> Result<bool> {
        let agency_id = agency_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<bool> {
                let affected = diesel::update(agencies::table.find(agency_id))
                    .set((
                        agencies::access_token.eq(None::<String>),
                        agencies::remote_user_id.eq(None::<String>),
                        agencies::updated_at.eq(now()),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(affected > 0)
            })
            .await
    }
}
