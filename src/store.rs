//! The catalog store: one owned SQLite connection plus its diagnostic log.
//!
//! # Intention
//!
//! - Every data statement is parameter-bound; only [`CatalogStore::execute_raw`]
//!   runs caller text verbatim.
//! - Every submitted statement lands in the [`DiagnosticLog`], failures
//!   annotated with the engine message.
//! - Multi-statement operations (`initialize`, `delete_all_data`) are
//!   transactional: a failure leaves no partial effect behind.

use rusqlite::types::ToSql;
use rusqlite::{params, Connection, Row, Statement};
use tracing::{debug, error, info, warn};

use crate::config::CatalogConfig;
use crate::diagnostics::DiagnosticLog;
use crate::error::{engine_message, CatalogError, Result};
use crate::model::{normalize_description, NewProduct, ProductRow, ProductUpdate, ShopRow};
use crate::schema::catalog_schema;
use crate::sort::{ProductSort, SortKey};

const ENABLE_FOREIGN_KEYS: &str = "PRAGMA foreign_keys = ON;";
const INSERT_SHOP: &str = "INSERT INTO shops (name) VALUES (?1);";
const SELECT_SHOPS: &str = "SELECT id, name FROM shops ORDER BY id;";
const DELETE_SHOP: &str = "DELETE FROM shops WHERE id = ?1;";
const DELETE_ALL_PRODUCTS: &str = "DELETE FROM products;";
const DELETE_ALL_SHOPS: &str = "DELETE FROM shops;";
const INSERT_PRODUCT: &str =
    "INSERT INTO products (shop_id, name, price, description) VALUES (?1, ?2, ?3, ?4);";
const SELECT_PRODUCTS: &str =
    "SELECT id, name, price, bought, description FROM products WHERE shop_id = ?1";
const UPDATE_PRODUCT: &str =
    "UPDATE products SET name = ?1, price = ?2, bought = ?3, description = ?4 WHERE id = ?5;";
const DELETE_PRODUCT: &str = "DELETE FROM products WHERE id = ?1;";

/// Owner of the catalog database connection.
///
/// A store starts closed; [`initialize`](Self::initialize) opens it and may be
/// called again to switch files. The connection is released on
/// [`close`](Self::close) or drop. The diagnostic log outlives connections.
#[derive(Debug, Default)]
pub struct CatalogStore {
    connection: Option<Connection>,
    path: Option<String>,
    log: DiagnosticLog,
}

impl CatalogStore {
    /// Create a closed store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store and initialize it from `config`.
    pub fn open(config: &CatalogConfig) -> Result<Self> {
        let mut store = Self::new();
        store.initialize_with(config)?;
        Ok(store)
    }

    pub fn is_initialized(&self) -> bool {
        self.connection.is_some()
    }

    /// Path of the open database, if any.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Opens (or creates) the database at `path`, closing any open one first,
    /// enables foreign keys and creates the catalog tables if absent.
    pub fn initialize(&mut self, path: &str) -> Result<()> {
        self.initialize_with(&CatalogConfig::new(path))
    }

    pub fn initialize_with(&mut self, config: &CatalogConfig) -> Result<()> {
        self.close();

        let path = config.db_path.as_str();
        info!(path, "opening catalog database");
        let mut conn = Connection::open(path).map_err(|e| {
            let message = engine_message(&e);
            error!(path, error = %message, "database open error");
            CatalogError::Open {
                path: path.to_string(),
                message,
            }
        })?;

        if let Some(timeout) = config.busy_timeout() {
            conn.busy_timeout(timeout)
                .map_err(|e| CatalogError::schema(&e))?;
        }

        // foreign_keys is a no-op inside a transaction, so it goes first.
        execute_logged(&conn, &mut self.log, ENABLE_FOREIGN_KEYS).map_err(CatalogError::Schema)?;

        let tx = conn.transaction().map_err(|e| CatalogError::schema(&e))?;
        for sql in catalog_schema().statements() {
            execute_logged(&tx, &mut self.log, &sql).map_err(CatalogError::Schema)?;
        }
        tx.commit().map_err(|e| CatalogError::schema(&e))?;

        self.connection = Some(conn);
        self.path = Some(path.to_string());
        Ok(())
    }

    /// Releases the connection. Later operations fail with `NotInitialized`.
    pub fn close(&mut self) {
        self.path = None;
        if let Some(conn) = self.connection.take() {
            info!("closing catalog database");
            if let Err((_, e)) = conn.close() {
                warn!(error = %e, "database close error");
            }
        }
    }

    /// Inserts a shop and returns its id.
    pub fn add_shop(&mut self, name: &str) -> Result<i64> {
        let (conn, log) = self.session()?;
        let mut stmt = prepare_logged(conn, log, INSERT_SHOP)?;
        stmt.execute(params![name])
            .map_err(|e| step_failed(log, &e))?;
        Ok(conn.last_insert_rowid())
    }

    /// All shops, ordered by id.
    pub fn list_shops(&mut self) -> Result<Vec<ShopRow>> {
        let (conn, log) = self.session()?;
        let mut stmt = prepare_logged(conn, log, SELECT_SHOPS)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(ShopRow {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>());
        rows.map_err(|e| step_failed(log, &e))
    }

    /// Deletes a shop and, by cascade, its products. Returns rows removed
    /// from `shops` (0 when `id` is unknown).
    pub fn delete_shop(&mut self, id: i64) -> Result<usize> {
        let (conn, log) = self.session()?;
        let mut stmt = prepare_logged(conn, log, DELETE_SHOP)?;
        stmt.execute(params![id]).map_err(|e| step_failed(log, &e))
    }

    /// Deletes every product, then every shop, in one transaction.
    pub fn delete_all_data(&mut self) -> Result<()> {
        let (conn, log) = self.session()?;
        let tx = conn.transaction().map_err(|e| CatalogError::statement(&e))?;
        for sql in [DELETE_ALL_PRODUCTS, DELETE_ALL_SHOPS] {
            execute_logged(&tx, log, sql).map_err(CatalogError::Statement)?;
        }
        tx.commit().map_err(|e| CatalogError::statement(&e))
    }

    /// Runs `sql` exactly as given, without parameter binding.
    ///
    /// Maintenance escape hatch: the caller owns injection safety.
    pub fn execute_raw(&mut self, sql: &str) -> Result<()> {
        let (conn, log) = self.session()?;
        execute_logged(conn, log, sql).map_err(CatalogError::Statement)
    }

    /// Inserts a product and returns its id. An empty description is stored
    /// as NULL; an unknown `shop_id` fails the foreign-key check.
    pub fn add_product(&mut self, product: &NewProduct) -> Result<i64> {
        let (conn, log) = self.session()?;
        let mut stmt = prepare_logged(conn, log, INSERT_PRODUCT)?;
        stmt.execute(params![
            product.shop_id,
            product.name,
            product.price,
            normalize_description(product.description.as_deref()),
        ])
        .map_err(|e| step_failed(log, &e))?;
        Ok(conn.last_insert_rowid())
    }

    /// Products of `shop_id` ordered by `sort` (ties broken by id). A
    /// non-empty `search` keeps only names containing it; `%` and `_` in the
    /// term match literally.
    pub fn list_products(
        &mut self,
        shop_id: i64,
        sort: ProductSort,
        search: &str,
    ) -> Result<Vec<ProductRow>> {
        let pattern = (!search.is_empty()).then(|| format!("%{}%", escape_like(search)));

        let mut sql = String::from(SELECT_PRODUCTS);
        if pattern.is_some() {
            sql.push_str(" AND name LIKE ?2 ESCAPE '\\'");
        }
        sql.push_str(" ORDER BY ");
        sql.push_str(&sort.sql());
        if sort.key != SortKey::Id {
            sql.push_str(", id ASC");
        }
        sql.push(';');

        let mut bound: Vec<&dyn ToSql> = vec![&shop_id];
        if let Some(pattern) = &pattern {
            bound.push(pattern);
        }

        let (conn, log) = self.session()?;
        let mut stmt = prepare_logged(conn, log, &sql)?;
        let rows = stmt
            .query_map(bound.as_slice(), product_from_row)
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>());
        rows.map_err(|e| step_failed(log, &e))
    }

    /// Replaces name, price, bought and description of product `id`.
    /// Returns rows changed; an unknown id is not an error.
    pub fn update_product(&mut self, update: &ProductUpdate) -> Result<usize> {
        let (conn, log) = self.session()?;
        let mut stmt = prepare_logged(conn, log, UPDATE_PRODUCT)?;
        stmt.execute(params![
            update.name,
            update.price,
            update.bought,
            normalize_description(update.description.as_deref()),
            update.id,
        ])
        .map_err(|e| step_failed(log, &e))
    }

    /// Returns rows removed; an unknown id is not an error.
    pub fn delete_product(&mut self, id: i64) -> Result<usize> {
        let (conn, log) = self.session()?;
        let mut stmt = prepare_logged(conn, log, DELETE_PRODUCT)?;
        stmt.execute(params![id]).map_err(|e| step_failed(log, &e))
    }

    pub fn diagnostic_log(&self) -> &[String] {
        self.log.entries()
    }

    pub fn clear_diagnostic_log(&mut self) {
        debug!(entries = self.log.len(), "clearing diagnostic log");
        self.log.clear();
    }

    fn session(&mut self) -> Result<(&mut Connection, &mut DiagnosticLog)> {
        match self.connection.as_mut() {
            Some(conn) => Ok((conn, &mut self.log)),
            None => {
                error!("Database not initialized");
                Err(CatalogError::NotInitialized)
            }
        }
    }
}

/// Runs one or more statements without binding, recording them in `log`.
fn execute_logged(
    conn: &Connection,
    log: &mut DiagnosticLog,
    sql: &str,
) -> std::result::Result<(), String> {
    log.record_statement(sql);
    debug!(sql, "executing SQL");
    conn.execute_batch(sql).map_err(|e| {
        let message = engine_message(&e);
        log.record_step_error(&message);
        error!(sql, error = %message, "SQL error");
        message
    })
}

fn prepare_logged<'c>(
    conn: &'c Connection,
    log: &mut DiagnosticLog,
    sql: &str,
) -> Result<Statement<'c>> {
    log.record_statement(sql);
    debug!(sql, "preparing SQL");
    conn.prepare(sql).map_err(|e| {
        let message = engine_message(&e);
        log.record_prepare_error(&message);
        error!(sql, error = %message, "prepare error");
        CatalogError::Statement(message)
    })
}

fn step_failed(log: &mut DiagnosticLog, err: &rusqlite::Error) -> CatalogError {
    let message = engine_message(err);
    log.record_step_error(&message);
    error!(error = %message, "step error");
    CatalogError::Statement(message)
}

fn product_from_row(row: &Row<'_>) -> rusqlite::Result<ProductRow> {
    let bought: Option<i64> = row.get(3)?;
    Ok(ProductRow {
        id: row.get(0)?,
        name: row.get(1)?,
        price: row.get(2)?,
        bought: bought.unwrap_or(0) != 0,
        description: row.get(4)?,
    })
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
