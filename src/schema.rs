//! Declarative schema for the catalog database.
//!
//! Tables are described as data and rendered to `CREATE ... IF NOT EXISTS`
//! statements, so re-applying the schema to an existing file is a no-op.

/// Catalog tables in creation order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    pub tables: Vec<TableDefinition>,
}

impl Schema {
    pub fn add_table(mut self, table: TableDefinition) -> Self {
        self.tables.push(table);
        self
    }

    /// DDL statements in creation order: every table, then its indexes.
    pub fn statements(&self) -> Vec<String> {
        let mut out = Vec::new();
        for table in &self.tables {
            out.push(table.create_sql());
            out.extend(table.index_sql());
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableDefinition {
    pub name: String,
    pub columns: Vec<ColumnDefinition>,
    pub foreign_keys: Vec<ForeignKey>,
    /// Each entry is one single-column index.
    pub indexed_columns: Vec<String>,
}

impl TableDefinition {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            columns: Vec::new(),
            foreign_keys: Vec::new(),
            indexed_columns: Vec::new(),
        }
    }

    pub fn column(mut self, column: ColumnDefinition) -> Self {
        self.columns.push(column);
        self
    }

    pub fn foreign_key(mut self, fk: ForeignKey) -> Self {
        self.foreign_keys.push(fk);
        self
    }

    pub fn index(mut self, column: &str) -> Self {
        self.indexed_columns.push(column.to_string());
        self
    }

    pub fn create_sql(&self) -> String {
        let mut parts: Vec<String> = self.columns.iter().map(ColumnDefinition::sql).collect();
        parts.extend(self.foreign_keys.iter().map(ForeignKey::sql));
        format!(
            "CREATE TABLE IF NOT EXISTS {} ({});",
            self.name,
            parts.join(", ")
        )
    }

    pub fn index_sql(&self) -> Vec<String> {
        self.indexed_columns
            .iter()
            .map(|column| {
                format!(
                    "CREATE INDEX IF NOT EXISTS idx_{table}_{column} ON {table}({column});",
                    table = self.name
                )
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    pub name: String,
    pub data_type: DataType,
    pub constraints: Vec<ColumnConstraint>,
    pub default_integer: Option<i64>,
}

impl ColumnDefinition {
    pub fn new(name: &str, data_type: DataType) -> Self {
        Self {
            name: name.to_string(),
            data_type,
            constraints: Vec::new(),
            default_integer: None,
        }
    }

    pub fn constraint(mut self, constraint: ColumnConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn default_integer(mut self, value: i64) -> Self {
        self.default_integer = Some(value);
        self
    }

    fn sql(&self) -> String {
        let mut sql = format!("{} {}", self.name, self.data_type.sql());
        for constraint in &self.constraints {
            sql.push(' ');
            match constraint {
                ColumnConstraint::AutoIncrementKey => sql.push_str("PRIMARY KEY AUTOINCREMENT"),
                ColumnConstraint::NotNull => sql.push_str("NOT NULL"),
                ColumnConstraint::NonEmpty => {
                    sql.push_str(&format!("CHECK (length({}) > 0)", self.name))
                }
            }
        }
        if let Some(default) = self.default_integer {
            sql.push_str(&format!(" DEFAULT {default}"));
        }
        sql
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Integer,
    Text,
    Real,
}

impl DataType {
    fn sql(self) -> &'static str {
        match self {
            DataType::Integer => "INTEGER",
            DataType::Text => "TEXT",
            DataType::Real => "REAL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnConstraint {
    /// Ids are never reused while the file persists.
    AutoIncrementKey,
    NotNull,
    /// Text column must not be the empty string.
    NonEmpty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    pub column: String,
    pub foreign_table: String,
    pub foreign_column: String,
    pub cascade_delete: bool,
}

impl ForeignKey {
    pub fn new(column: &str, foreign_table: &str, foreign_column: &str) -> Self {
        Self {
            column: column.to_string(),
            foreign_table: foreign_table.to_string(),
            foreign_column: foreign_column.to_string(),
            cascade_delete: false,
        }
    }

    pub fn cascade_delete(mut self) -> Self {
        self.cascade_delete = true;
        self
    }

    fn sql(&self) -> String {
        format!(
            "FOREIGN KEY ({}) REFERENCES {}({}){}",
            self.column,
            self.foreign_table,
            self.foreign_column,
            if self.cascade_delete { " ON DELETE CASCADE" } else { "" }
        )
    }
}

/// The two-table shops/products schema.
pub fn catalog_schema() -> Schema {
    let shops = TableDefinition::new("shops")
        .column(
            ColumnDefinition::new("id", DataType::Integer)
                .constraint(ColumnConstraint::AutoIncrementKey),
        )
        .column(
            ColumnDefinition::new("name", DataType::Text)
                .constraint(ColumnConstraint::NotNull)
                .constraint(ColumnConstraint::NonEmpty),
        );

    let products = TableDefinition::new("products")
        .column(
            ColumnDefinition::new("id", DataType::Integer)
                .constraint(ColumnConstraint::AutoIncrementKey),
        )
        .column(
            ColumnDefinition::new("shop_id", DataType::Integer)
                .constraint(ColumnConstraint::NotNull),
        )
        .column(
            ColumnDefinition::new("name", DataType::Text)
                .constraint(ColumnConstraint::NotNull)
                .constraint(ColumnConstraint::NonEmpty),
        )
        .column(ColumnDefinition::new("price", DataType::Real))
        .column(
            ColumnDefinition::new("bought", DataType::Integer)
                .constraint(ColumnConstraint::NotNull)
                .default_integer(0),
        )
        .column(ColumnDefinition::new("description", DataType::Text))
        .foreign_key(ForeignKey::new("shop_id", "shops", "id").cascade_delete())
        .index("shop_id");

    Schema::default().add_table(shops).add_table(products)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_catalog_tables() {
        let statements = catalog_schema().statements();
        assert_eq!(
            statements,
            vec![
                "CREATE TABLE IF NOT EXISTS shops (id INTEGER PRIMARY KEY AUTOINCREMENT, \
                 name TEXT NOT NULL CHECK (length(name) > 0));"
                    .to_string(),
                "CREATE TABLE IF NOT EXISTS products (id INTEGER PRIMARY KEY AUTOINCREMENT, \
                 shop_id INTEGER NOT NULL, name TEXT NOT NULL CHECK (length(name) > 0), \
                 price REAL, bought INTEGER NOT NULL DEFAULT 0, description TEXT, \
                 FOREIGN KEY (shop_id) REFERENCES shops(id) ON DELETE CASCADE);"
                    .to_string(),
                "CREATE INDEX IF NOT EXISTS idx_products_shop_id ON products(shop_id);"
                    .to_string(),
            ]
        );
    }
}
