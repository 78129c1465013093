//! A memory-backed implementation of the [ProfileStore]
//!
//! Enforces the same key and uniqueness rules as the database. Search understands a subset of
//! the SQL predicate language: `column = value` terms joined by `AND`, where a value is a
//! single-quoted string, a number, `true` or `false`. `sort_by` is a single column optionally
//! followed by `ASC` or `DESC`.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::modules::error::{ConstraintViolationError, ConstraintViolationType, InternalError};
use crate::modules::time::get_current_time;

use super::error::ProfileStoreError;
use super::{validate_key, Profile, ProfileKey, ProfilePatch, ProfileStore};

#[derive(Default, Clone)]
pub struct MemoryProfileStore {
    inner: Arc<Mutex<BTreeMap<ProfileKey, Profile>>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProfileStore for MemoryProfileStore {
    fn create_profile(&self, profile: Profile) -> Result<String, ProfileStoreError> {
        let mut inner = self.inner.lock().map_err(|_| {
            ProfileStoreError::Internal(InternalError::with_message(
                "Cannot access profile store: mutex lock poisoned".to_string(),
            ))
        })?;

        let key = profile.key();
        let conflict = inner.contains_key(&key)
            || inner
                .values()
                .any(|existing| existing.email == profile.email || existing.mobile == profile.mobile);
        if conflict {
            return Err(ProfileStoreError::ConstraintViolation(
                ConstraintViolationError::with_violation_type(ConstraintViolationType::Unique),
            ));
        }

        let profile_id = profile.profile_id.clone();
        inner.insert(key, profile);
        Ok(profile_id)
    }

    fn delete_profile(
        &self,
        profile_id: &str,
        tenant_id: &str,
    ) -> Result<bool, ProfileStoreError> {
        validate_key(profile_id, tenant_id)?;
        let mut inner = self.inner.lock().map_err(|_| {
            ProfileStoreError::Internal(InternalError::with_message(
                "Cannot access profile store: mutex lock poisoned".to_string(),
            ))
        })?;
        Ok(inner
            .remove(&ProfileKey::new(tenant_id, profile_id))
            .is_some())
    }

    fn search_profiles(
        &self,
        query: &str,
        limit: u32,
        offset: u32,
        sort_by: &str,
        tenant_id: &str,
    ) -> Result<Vec<Profile>, ProfileStoreError> {
        let predicate = parse_predicate(query)?;
        let ordering = parse_sort(sort_by)?;

        let inner = self.inner.lock().map_err(|_| {
            ProfileStoreError::Internal(InternalError::with_message(
                "Cannot access profile store: mutex lock poisoned".to_string(),
            ))
        })?;

        let mut profiles = inner
            .values()
            .filter(|profile| profile.tenant_id == tenant_id)
            .filter(|profile| {
                predicate
                    .iter()
                    .all(|(column, literal)| matches_literal(column_value(profile, column), literal))
            })
            .cloned()
            .collect::<Vec<_>>();

        if let Some((column, descending)) = ordering {
            profiles.sort_by(|a, b| {
                let ordering = compare_values(column_value(a, column), column_value(b, column));
                if descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }

        let page = profiles.into_iter().skip(offset as usize);
        Ok(if limit == 0 {
            page.collect()
        } else {
            page.take(limit as usize).collect()
        })
    }

    fn update_profile(
        &self,
        filter: &ProfileKey,
        patch: ProfilePatch,
    ) -> Result<bool, ProfileStoreError> {
        filter.validate()?;
        let patch = patch.normalized();
        if patch.is_empty() {
            return Ok(false);
        }

        let mut inner = self.inner.lock().map_err(|_| {
            ProfileStoreError::Internal(InternalError::with_message(
                "Cannot access profile store: mutex lock poisoned".to_string(),
            ))
        })?;
        if !inner.contains_key(filter) {
            return Ok(false);
        }

        let conflict = inner.iter().any(|(key, other)| {
            key != filter
                && (patch.email.as_deref() == Some(other.email.as_str())
                    || patch.mobile.as_deref() == Some(other.mobile.as_str()))
        });
        if conflict {
            return Err(ProfileStoreError::ConstraintViolation(
                ConstraintViolationError::with_violation_type(ConstraintViolationType::Unique),
            ));
        }

        match inner.get_mut(filter) {
            Some(profile) => {
                patch.apply_to(profile, get_current_time());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn clone_box(&self) -> Box<dyn ProfileStore> {
        Box::new(self.clone())
    }
}

const COLUMNS: &[&str] = &[
    "tenant_id",
    "profile_id",
    "full_name",
    "gender",
    "email",
    "mobile",
    "birth_date",
    "city_id",
    "country_id",
    "address",
    "latitude",
    "longitude",
    "profile_image_url",
    "active",
    "created_by",
    "created_at",
    "updated_by",
    "updated_at",
    "deleted_by",
    "deleted_at",
];

/// A column value with the storage class SQLite gives it.
#[derive(Debug, PartialEq)]
enum Value {
    Null,
    Number(f64),
    Text(String),
}

/// A literal from a predicate. Numbers keep their source text for comparison against text
/// columns.
#[derive(Debug, PartialEq)]
enum Literal {
    Number { value: f64, text: String },
    Text(String),
}

/// Renders a column the way SQLite stores it: booleans as 1/0, timestamps as text.
fn column_value(profile: &Profile, column: &str) -> Value {
    let text = |value: Option<&String>| value.map_or(Value::Null, |value| Value::Text(value.clone()));
    let time = |value: Option<&chrono::NaiveDateTime>| {
        value.map_or(Value::Null, |value| {
            Value::Text(value.format("%Y-%m-%d %H:%M:%S%.f").to_string())
        })
    };
    let number = |value: Option<f64>| value.map_or(Value::Null, Value::Number);
    match column {
        "tenant_id" => text(Some(&profile.tenant_id)),
        "profile_id" => text(Some(&profile.profile_id)),
        "full_name" => text(Some(&profile.full_name)),
        "gender" => text(profile.gender.as_ref()),
        "email" => text(Some(&profile.email)),
        "mobile" => text(Some(&profile.mobile)),
        "birth_date" => time(profile.birth_date.as_ref()),
        "city_id" => text(profile.city_id.as_ref()),
        "country_id" => text(profile.country_id.as_ref()),
        "address" => text(profile.address.as_ref()),
        "latitude" => number(profile.latitude),
        "longitude" => number(profile.longitude),
        "profile_image_url" => text(profile.profile_image_url.as_ref()),
        "active" => number(Some(if profile.active { 1.0 } else { 0.0 })),
        "created_by" => text(profile.created_by.as_ref()),
        "created_at" => time(Some(&profile.created_at)),
        "updated_by" => text(profile.updated_by.as_ref()),
        "updated_at" => time(Some(&profile.updated_at)),
        "deleted_by" => text(profile.deleted_by.as_ref()),
        "deleted_at" => time(profile.deleted_at.as_ref()),
        _ => Value::Null,
    }
}

fn known_column(name: &str) -> Result<&'static str, ProfileStoreError> {
    COLUMNS
        .iter()
        .find(|column| column.eq_ignore_ascii_case(name))
        .copied()
        .ok_or_else(|| ProfileStoreError::invalid_query("query", format!("no such column: {}", name)))
}

fn parse_predicate(query: &str) -> Result<Vec<(&'static str, Literal)>, ProfileStoreError> {
    if query.trim().is_empty() {
        return Ok(Vec::new());
    }

    split_and(query)
        .into_iter()
        .map(|term| {
            let (column, literal) = term.split_once('=').ok_or_else(|| {
                ProfileStoreError::invalid_query(
                    "query",
                    format!("expected `column = value`, found `{}`", term.trim()),
                )
            })?;
            Ok((known_column(column.trim())?, parse_literal(literal.trim())?))
        })
        .collect()
}

/// Splits on the `AND` keyword, ignoring any that appear inside quoted strings. Quoted text is
/// kept as written.
fn split_and(query: &str) -> Vec<&str> {
    let bytes = query.as_bytes();
    let is_word = |byte: u8| byte.is_ascii_alphanumeric() || byte == b'_';

    let mut terms = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\'' {
            // a doubled quote inside a literal toggles twice and stays quoted
            in_quotes = !in_quotes;
        } else if !in_quotes
            && bytes[i..].len() >= 3
            && bytes[i..i + 3].eq_ignore_ascii_case(b"and")
            && (i == 0 || !is_word(bytes[i - 1]))
            && bytes.get(i + 3).map_or(true, |next| !is_word(*next))
        {
            terms.push(&query[start..i]);
            i += 3;
            start = i;
            continue;
        }
        i += 1;
    }
    terms.push(&query[start..]);
    terms
}

/// Parses a number the way SQLite reads a numeric literal, so words like `NaN` or `inf` are not
/// numbers.
fn sql_number(text: &str) -> Option<f64> {
    let well_formed = text.bytes().any(|byte| byte.is_ascii_digit())
        && text
            .bytes()
            .all(|byte| byte.is_ascii_digit() || matches!(byte, b'+' | b'-' | b'.' | b'e' | b'E'));
    if well_formed {
        text.parse::<f64>().ok()
    } else {
        None
    }
}

fn parse_literal(literal: &str) -> Result<Literal, ProfileStoreError> {
    if literal.len() >= 2 && literal.starts_with('\'') && literal.ends_with('\'') {
        return Ok(Literal::Text(literal[1..literal.len() - 1].replace("''", "'")));
    }
    if literal.eq_ignore_ascii_case("true") {
        return Ok(Literal::Number {
            value: 1.0,
            text: "1".to_string(),
        });
    }
    if literal.eq_ignore_ascii_case("false") {
        return Ok(Literal::Number {
            value: 0.0,
            text: "0".to_string(),
        });
    }
    if let Some(value) = sql_number(literal) {
        // SQLite renders integer literals without leading zeros or a sign prefix
        let text = match literal.parse::<i64>() {
            Ok(integer) => integer.to_string(),
            Err(_) => literal.to_string(),
        };
        return Ok(Literal::Number { value, text });
    }
    Err(ProfileStoreError::invalid_query(
        "query",
        format!("unsupported value `{}`", literal),
    ))
}

fn parse_sort(sort_by: &str) -> Result<Option<(&'static str, bool)>, ProfileStoreError> {
    let mut words = sort_by.split_whitespace();
    let column = match words.next() {
        Some(column) => known_column(column)
            .map_err(|_| ProfileStoreError::invalid_query("sort_by", format!("no such column: {}", column)))?,
        None => return Ok(None),
    };
    let descending = match words.next() {
        None => false,
        Some(direction) if direction.eq_ignore_ascii_case("asc") => false,
        Some(direction) if direction.eq_ignore_ascii_case("desc") => true,
        Some(direction) => {
            return Err(ProfileStoreError::invalid_query(
                "sort_by",
                format!("unsupported sort direction `{}`", direction),
            ))
        }
    };
    if words.next().is_some() {
        return Err(ProfileStoreError::invalid_query(
            "sort_by",
            "only a single sort column is supported".to_string(),
        ));
    }
    Ok(Some((column, descending)))
}

/// Equality under column affinity: a text column compares the literal as text, a numeric column
/// converts a quoted literal to a number when it reads as one.
fn matches_literal(value: Value, literal: &Literal) -> bool {
    match (value, literal) {
        // NULL never compares equal
        (Value::Null, _) => false,
        (Value::Number(value), Literal::Number { value: literal, .. }) => value == *literal,
        (Value::Number(value), Literal::Text(literal)) => {
            sql_number(literal.trim()).map_or(false, |literal| value == literal)
        }
        (Value::Text(value), Literal::Text(literal)) => value == *literal,
        (Value::Text(value), Literal::Number { text, .. }) => value == *text,
    }
}

/// Orders values the way SQLite does: NULL first, then numbers, then text.
fn compare_values(a: Value, b: Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Number(a), Value::Number(b)) => a.total_cmp(&b),
        (Value::Number(_), Value::Text(_)) => Ordering::Less,
        (Value::Text(_), Value::Number(_)) => Ordering::Greater,
        (Value::Text(a), Value::Text(b)) => a.cmp(&b),
    }
}
