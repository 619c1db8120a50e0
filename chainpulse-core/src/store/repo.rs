//! Store repository layer
//!
//! Insert and query operations over the SQLite store. All statements are
//! parameterized; nothing user-supplied is ever spliced into SQL text.

use std::path::PathBuf;
use std::sync::Mutex;

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};

use crate::error::Result;
use crate::provider::DataProvider;
use crate::types::{EntityMeta, Network, RawDailyRow};

/// SQLite-backed store and [`DataProvider`] implementation.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Open or create a store at the given path.
    pub fn open(path: &PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory store (tests and dry runs).
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: Mutex::new(Connection::open_in_memory()?),
        })
    }

    /// Run pending schema migrations.
    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        super::schema::migrate(&conn)?;
        Ok(())
    }

    // ============================================
    // Inserts (import path)
    // ============================================

    /// Upsert one day's network-wide new-account count.
    pub fn insert_new_accounts(&self, network: Network, day: NaiveDate, count: i64) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO daily_new_accounts (network, day, new_count)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (network, day) DO UPDATE SET new_count = excluded.new_count",
            params![network.as_str(), day.to_string(), count],
        )?;
        Ok(())
    }

    /// Upsert one day's network-wide deleted-account count.
    ///
    /// Days without a deletion row are legal; the totals query LEFT JOINs
    /// this table so absence reads back as a missing `deleted_count`.
    pub fn insert_deleted_accounts(
        &self,
        network: Network,
        day: NaiveDate,
        count: i64,
    ) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO daily_deleted_accounts (network, day, deleted_count)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (network, day) DO UPDATE SET deleted_count = excluded.deleted_count",
            params![network.as_str(), day.to_string(), count],
        )?;
        Ok(())
    }

    /// Upsert one day's new-account count for a single entity.
    pub fn insert_entity_accounts(
        &self,
        network: Network,
        day: NaiveDate,
        entity_id: &str,
        count: i64,
    ) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO daily_new_accounts_per_entity (network, day, entity_id, new_count)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (network, day, entity_id) DO UPDATE SET new_count = excluded.new_count",
            params![network.as_str(), day.to_string(), entity_id, count],
        )?;
        Ok(())
    }

    /// Upsert an entity's metadata.
    pub fn upsert_entity(&self, network: Network, meta: &EntityMeta) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO entities (network, slug, title, logo_url, website_url, has_contract)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT (network, slug) DO UPDATE SET
                 title = excluded.title,
                 logo_url = excluded.logo_url,
                 website_url = excluded.website_url,
                 has_contract = excluded.has_contract",
            params![
                network.as_str(),
                meta.slug,
                meta.title,
                meta.logo_url,
                meta.website_url,
                meta.has_contract as i64,
            ],
        )?;
        Ok(())
    }

    fn entity_meta_from_row(row: &Row) -> rusqlite::Result<EntityMeta> {
        Ok(EntityMeta {
            slug: row.get(0)?,
            title: row.get(1)?,
            logo_url: row.get(2)?,
            website_url: row.get(3)?,
            has_contract: row.get::<_, i64>(4)? != 0,
        })
    }
}

impl DataProvider for Store {
    fn fetch_daily_account_totals(
        &self,
        network: Network,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawDailyRow>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT n.day, n.new_count, d.deleted_count
             FROM daily_new_accounts n
             LEFT JOIN daily_deleted_accounts d
                 ON d.network = n.network AND d.day = n.day
             WHERE n.network = ?1 AND n.day >= ?2 AND n.day <= ?3
             ORDER BY n.day",
        )?;

        let rows = stmt
            .query_map(
                params![network.as_str(), start.to_string(), end.to_string()],
                |row| {
                    Ok(RawDailyRow {
                        day: Some(row.get(0)?),
                        entity_id: None,
                        new_count: Some(row.get(1)?),
                        // NULL from the outer join means no deletion row,
                        // which the normalizer reads as zero deletions.
                        deleted_count: row.get(2)?,
                    })
                },
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
    }

    fn fetch_daily_accounts_by_entity(
        &self,
        network: Network,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawDailyRow>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT day, entity_id, new_count
             FROM daily_new_accounts_per_entity
             WHERE network = ?1 AND day >= ?2 AND day <= ?3
             ORDER BY day, entity_id",
        )?;

        let rows = stmt
            .query_map(
                params![network.as_str(), start.to_string(), end.to_string()],
                |row| {
                    Ok(RawDailyRow {
                        day: Some(row.get(0)?),
                        entity_id: Some(row.get(1)?),
                        new_count: Some(row.get(2)?),
                        deleted_count: None,
                    })
                },
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
    }

    fn fetch_entity_metadata(&self, network: Network) -> Result<Vec<EntityMeta>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT slug, title, logo_url, website_url, has_contract
             FROM entities
             WHERE network = ?1
             ORDER BY slug",
        )?;

        let metas = stmt
            .query_map(params![network.as_str()], Self::entity_meta_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(metas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 3, d).unwrap()
    }

    fn store() -> Store {
        let store = Store::open_in_memory().unwrap();
        store.migrate().unwrap();
        store
    }

    #[test]
    fn test_totals_left_join_deletions() {
        let store = store();
        store.insert_new_accounts(Network::Mainnet, day(1), 10).unwrap();
        store.insert_new_accounts(Network::Mainnet, day(2), 5).unwrap();
        store
            .insert_deleted_accounts(Network::Mainnet, day(2), 2)
            .unwrap();

        let rows = store
            .fetch_daily_account_totals(Network::Mainnet, day(1), day(2))
            .unwrap();
        assert_eq!(rows.len(), 2);
        // Absence of a deletion row means zero deletions, not zero rows.
        assert_eq!(rows[0].deleted_count, None);
        assert_eq!(rows[1].deleted_count, Some(2));
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let store = store();
        for d in 1..=5 {
            store.insert_new_accounts(Network::Mainnet, day(d), 1).unwrap();
        }
        let rows = store
            .fetch_daily_account_totals(Network::Mainnet, day(2), day(4))
            .unwrap();
        let days: Vec<_> = rows.iter().filter_map(|r| r.day.clone()).collect();
        assert_eq!(days, vec!["2022-03-02", "2022-03-03", "2022-03-04"]);
    }

    #[test]
    fn test_networks_are_isolated() {
        let store = store();
        store.insert_new_accounts(Network::Mainnet, day(1), 10).unwrap();
        store.insert_new_accounts(Network::Testnet, day(1), 99).unwrap();

        let rows = store
            .fetch_daily_account_totals(Network::Testnet, day(1), day(1))
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].new_count, Some(99));
    }

    #[test]
    fn test_entity_rows_roundtrip() {
        let store = store();
        store
            .insert_entity_accounts(Network::Mainnet, day(1), "alpha", 5)
            .unwrap();
        store
            .insert_entity_accounts(Network::Mainnet, day(1), "beta", 3)
            .unwrap();

        let rows = store
            .fetch_daily_accounts_by_entity(Network::Mainnet, day(1), day(1))
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].entity_id.as_deref(), Some("alpha"));
        assert_eq!(rows[1].entity_id.as_deref(), Some("beta"));
    }

    #[test]
    fn test_entity_meta_upsert_overwrites() {
        let store = store();
        let mut meta = EntityMeta {
            slug: "alpha".to_string(),
            title: "Alpha".to_string(),
            logo_url: None,
            website_url: None,
            has_contract: false,
        };
        store.upsert_entity(Network::Mainnet, &meta).unwrap();
        meta.title = "Alpha App".to_string();
        meta.has_contract = true;
        store.upsert_entity(Network::Mainnet, &meta).unwrap();

        let metas = store.fetch_entity_metadata(Network::Mainnet).unwrap();
        assert_eq!(metas.len(), 1);
        assert_eq!(metas[0].title, "Alpha App");
        assert!(metas[0].has_contract);
    }
}
