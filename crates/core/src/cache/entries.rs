//! Generation and entry operations for the SQLite store.

use async_trait::async_trait;
use bytes::Bytes;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

use super::connection::CacheDb;
use super::hash::compute_request_key;
use super::store::{CacheStore, check_cacheable};
use crate::{Error, Request, Response};

/// Row shape read back from `entries`.
struct StoredEntry {
    status: i64,
    headers_json: String,
    body: Vec<u8>,
}

impl StoredEntry {
    fn into_response(self) -> Result<Response, Error> {
        let headers: Vec<(String, String)> =
            serde_json::from_str(&self.headers_json).map_err(|e| Error::CorruptEntry(e.to_string()))?;
        let status = u16::try_from(self.status).map_err(|_| Error::CorruptEntry(format!("status {}", self.status)))?;
        Ok(Response { status, headers, body: Bytes::from(self.body) })
    }
}

#[async_trait]
impl CacheStore for CacheDb {
    async fn open(&self, generation: &str) -> Result<(), Error> {
        let generation = generation.to_string();
        let now = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT OR IGNORE INTO generations (name, created_at) VALUES (?1, ?2)",
                    params![generation, now],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    async fn generations(&self) -> Result<Vec<String>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare("SELECT name FROM generations ORDER BY created_at ASC, name ASC")?;
                let names = stmt
                    .query_map([], |row| row.get::<_, String>(0))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(names)
            })
            .await
            .map_err(Error::from)
    }

    async fn delete_generation(&self, generation: &str) -> Result<bool, Error> {
        let generation = generation.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let deleted = conn.execute("DELETE FROM generations WHERE name = ?1", params![generation])?;
                Ok(deleted > 0)
            })
            .await
            .map_err(Error::from)
    }

    async fn match_request(&self, generation: &str, request: &Request) -> Result<Option<Response>, Error> {
        let generation = generation.to_string();
        let hash = compute_request_key(&request.method, request.cache_url().as_str());
        let stored = self
            .conn
            .call(move |conn| -> Result<Option<StoredEntry>, Error> {
                let result = conn.query_row(
                    "SELECT status, headers_json, body FROM entries WHERE generation = ?1 AND hash = ?2",
                    params![generation, hash],
                    |row| Ok(StoredEntry { status: row.get(0)?, headers_json: row.get(1)?, body: row.get(2)? }),
                );

                match result {
                    Ok(entry) => Ok(Some(entry)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)?;

        stored.map(StoredEntry::into_response).transpose()
    }

    async fn put(&self, generation: &str, request: &Request, response: &Response) -> Result<(), Error> {
        check_cacheable(request, response)?;

        let generation = generation.to_string();
        let url = request.cache_url().to_string();
        let method = request.method.to_ascii_uppercase();
        let hash = compute_request_key(&method, &url);
        let status = i64::from(response.status);
        let headers_json = serde_json::to_string(&response.headers).map_err(|e| Error::InvalidInput(e.to_string()))?;
        let body = response.body.to_vec();
        let now = chrono::Utc::now().to_rfc3339();

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT OR IGNORE INTO generations (name, created_at) VALUES (?1, ?2)",
                    params![&generation, &now],
                )?;
                conn.execute(
                    "INSERT INTO entries (generation, hash, method, url, status, headers_json, body, stored_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                     ON CONFLICT(generation, hash) DO UPDATE SET
                        status = excluded.status,
                        headers_json = excluded.headers_json,
                        body = excluded.body,
                        stored_at = excluded.stored_at",
                    params![&generation, &hash, &method, &url, status, &headers_json, &body, &now],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    async fn cached_urls(&self, generation: &str) -> Result<Vec<String>, Error> {
        let generation = generation.to_string();
        self.conn
            .call(move |conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare("SELECT url FROM entries WHERE generation = ?1 ORDER BY seq ASC")?;
                let urls = stmt
                    .query_map(params![generation], |row| row.get::<_, String>(0))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(urls)
            })
            .await
            .map_err(Error::from)
    }
}
