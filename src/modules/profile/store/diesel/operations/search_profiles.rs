use diesel::{
    result::{DatabaseErrorKind, Error as DieselError},
    sql_types::{BigInt, Text},
    RunQueryDsl,
};

use crate::modules::profile::store::{diesel::models::ProfileModel, ProfileStoreError};

use super::ProfileStoreOperations;

pub trait ProfileStoreSearchProfiles {
    fn search_profiles(
        &mut self,
        query: &str,
        limit: u32,
        offset: u32,
        sort_by: &str,
        tenant_id: &str,
    ) -> Result<Vec<ProfileModel>, ProfileStoreError>;
}

/// Builds the search statement.
///
/// The caller's predicate and sort expression are spliced in verbatim, but only ever see the
/// rows of a subquery that is already restricted to the tenant. The tenant, limit and offset
/// are bound parameters, in that order.
pub(super) fn search_statement(query: &str, sort_by: &str) -> String {
    let mut statement =
        String::from("SELECT * FROM (SELECT * FROM profiles WHERE tenant_id = ?) AS scoped");
    if !query.trim().is_empty() {
        statement.push_str(" WHERE (");
        statement.push_str(query);
        statement.push(')');
    }
    if !sort_by.trim().is_empty() {
        statement.push_str(" ORDER BY ");
        statement.push_str(sort_by);
    }
    statement.push_str(" LIMIT ? OFFSET ?");
    statement
}

#[cfg(feature = "sqlite")]
impl<'a> ProfileStoreSearchProfiles for ProfileStoreOperations<'a, diesel::sqlite::SqliteConnection> {
    fn search_profiles(
        &mut self,
        query: &str,
        limit: u32,
        offset: u32,
        sort_by: &str,
        tenant_id: &str,
    ) -> Result<Vec<ProfileModel>, ProfileStoreError> {
        // SQLite treats a negative limit as no limit
        let limit = if limit == 0 { -1 } else { i64::from(limit) };

        diesel::sql_query(search_statement(query, sort_by))
            .bind::<Text, _>(tenant_id)
            .bind::<BigInt, _>(limit)
            .bind::<BigInt, _>(i64::from(offset))
            .load::<ProfileModel>(self.conn)
            .map_err(classify_search_error)
    }
}

/// Statement errors from a caller-supplied predicate are the caller's fault; anything else
/// means the backend is in trouble.
fn classify_search_error(err: DieselError) -> ProfileStoreError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::Unknown, ref info)
            if !info.message().contains("database is locked") =>
        {
            ProfileStoreError::invalid_query("query", info.message().to_string())
        }
        err => ProfileStoreError::from(err),
    }
}
