use crate::value::Value;

/// SQL dialect of the backing database.
///
/// Determines placeholder style (`$1, $2, ...` for Postgres, `?` elsewhere)
/// and identifier quoting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    MySql,
    Sqlite,
}

impl Dialect {
    pub fn placeholder(self, index: usize) -> String {
        match self {
            Dialect::Postgres => format!("${index}"),
            Dialect::MySql | Dialect::Sqlite => "?".to_string(),
        }
    }

    pub fn quote_char(self) -> char {
        match self {
            Dialect::MySql => '`',
            Dialect::Postgres | Dialect::Sqlite => '"',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Dialect::Postgres => "postgres",
            Dialect::MySql => "mysql",
            Dialect::Sqlite => "sqlite",
        }
    }
}

/// Comparison operator of a [`Condition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Like,
}

impl Op {
    pub fn sql(self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Ne => "!=",
            Op::Gt => ">",
            Op::Ge => ">=",
            Op::Lt => "<",
            Op::Le => "<=",
            Op::Like => "LIKE",
        }
    }
}

/// A single `(column, operator, value)` predicate.
///
/// Column names are honored as-is; an unknown column fails at execution time,
/// not at build time.
#[derive(Debug, Clone)]
pub struct Condition {
    pub column: String,
    pub op: Op,
    pub value: Value,
}

impl Condition {
    pub fn new(column: &str, op: Op, value: impl Into<Value>) -> Self {
        Self {
            column: column.to_string(),
            op,
            value: value.into(),
        }
    }

    pub fn eq(column: &str, value: impl Into<Value>) -> Self {
        Self::new(column, Op::Eq, value)
    }

    pub fn ne(column: &str, value: impl Into<Value>) -> Self {
        Self::new(column, Op::Ne, value)
    }

    pub fn gt(column: &str, value: impl Into<Value>) -> Self {
        Self::new(column, Op::Gt, value)
    }

    pub fn ge(column: &str, value: impl Into<Value>) -> Self {
        Self::new(column, Op::Ge, value)
    }

    pub fn lt(column: &str, value: impl Into<Value>) -> Self {
        Self::new(column, Op::Lt, value)
    }

    pub fn le(column: &str, value: impl Into<Value>) -> Self {
        Self::new(column, Op::Le, value)
    }

    pub fn like(column: &str, pattern: impl Into<Value>) -> Self {
        Self::new(column, Op::Like, pattern)
    }
}

/// A fluent builder for SELECT, COUNT, and DELETE statements.
///
/// # Example
///
/// ```ignore
/// let (sql, params) = QueryBuilder::new("users")
///     .dialect(Dialect::Postgres)
///     .where_eq("status", "active")
///     .order_by("id", true)
///     .limit(10)
///     .build_select(&["id", "name"]);
/// ```
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    table: String,
    dialect: Dialect,
    conditions: Vec<Condition>,
    order: Vec<(String, bool)>,
    limit_val: Option<u64>,
    offset_val: Option<u64>,
}

impl QueryBuilder {
    /// Create a builder for `table`.
    ///
    /// Placeholder style defaults to `?`; repositories override it with their
    /// own dialect before building.
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            dialect: Dialect::Sqlite,
            conditions: Vec::new(),
            order: Vec::new(),
            limit_val: None,
            offset_val: None,
        }
    }

    /// Set the SQL dialect (affects placeholder style).
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Add an arbitrary predicate. All predicates are combined with `AND`.
    pub fn filter(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn where_eq(self, column: &str, value: impl Into<Value>) -> Self {
        self.filter(Condition::eq(column, value))
    }

    pub fn where_like(self, column: &str, pattern: impl Into<Value>) -> Self {
        self.filter(Condition::like(column, pattern))
    }

    pub fn order_by(mut self, column: &str, ascending: bool) -> Self {
        self.order.push((column.to_string(), ascending));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit_val = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset_val = Some(offset);
        self
    }

    /// Build a SELECT statement returning `(sql, bind_values)`.
    pub fn build_select(&self, columns: &[&str]) -> (String, Vec<Value>) {
        let mut sql = format!("SELECT {} FROM {}", columns.join(", "), self.table);
        let mut params = Vec::new();
        let mut placeholder_idx = 1usize;
        self.append_where(&mut sql, &mut params, &mut placeholder_idx);
        self.append_order(&mut sql);
        self.append_limit_offset(&mut sql);
        (sql, params)
    }

    /// Build a COUNT statement returning `(sql, bind_values)`.
    pub fn build_count(&self) -> (String, Vec<Value>) {
        let mut sql = format!("SELECT COUNT(*) FROM {}", self.table);
        let mut params = Vec::new();
        let mut placeholder_idx = 1usize;
        self.append_where(&mut sql, &mut params, &mut placeholder_idx);
        (sql, params)
    }

    /// Build a DELETE statement returning `(sql, bind_values)`.
    pub fn build_delete(&self) -> (String, Vec<Value>) {
        let mut sql = format!("DELETE FROM {}", self.table);
        let mut params = Vec::new();
        let mut placeholder_idx = 1usize;
        self.append_where(&mut sql, &mut params, &mut placeholder_idx);
        (sql, params)
    }

    fn append_where(&self, sql: &mut String, params: &mut Vec<Value>, placeholder_idx: &mut usize) {
        if self.conditions.is_empty() {
            return;
        }
        sql.push_str(" WHERE ");
        let mut first = true;
        for condition in &self.conditions {
            if !first {
                sql.push_str(" AND ");
            }
            first = false;
            let placeholder = self.dialect.placeholder(*placeholder_idx);
            *placeholder_idx += 1;
            sql.push_str(&format!(
                "{} {} {placeholder}",
                condition.column,
                condition.op.sql()
            ));
            params.push(condition.value.clone());
        }
    }

    fn append_order(&self, sql: &mut String) {
        if self.order.is_empty() {
            return;
        }
        sql.push_str(" ORDER BY ");
        let clauses: Vec<_> = self
            .order
            .iter()
            .map(|(column, ascending)| {
                if *ascending {
                    format!("{column} ASC")
                } else {
                    format!("{column} DESC")
                }
            })
            .collect();
        sql.push_str(&clauses.join(", "));
    }

    fn append_limit_offset(&self, sql: &mut String) {
        if let Some(limit) = self.limit_val {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        if let Some(offset) = self.offset_val {
            sql.push_str(&format!(" OFFSET {offset}"));
        }
    }
}

/// Build a multi-row INSERT statement.
///
/// `rows` must be at least one; callers are responsible for treating an empty
/// batch as a no-op before getting here, since the VALUES syntax cannot
/// represent zero rows.
///
/// `returning` appends a `RETURNING <column>` clause (Postgres key writeback).
pub fn insert_statement(
    dialect: Dialect,
    table: &str,
    columns: &[&str],
    rows: usize,
    returning: Option<&str>,
) -> String {
    let mut placeholder_idx = 1usize;
    let tuples: Vec<String> = (0..rows)
        .map(|_| {
            let placeholders: Vec<String> = columns
                .iter()
                .map(|_| {
                    let placeholder = dialect.placeholder(placeholder_idx);
                    placeholder_idx += 1;
                    placeholder
                })
                .collect();
            format!("({})", placeholders.join(", "))
        })
        .collect();
    let mut sql = format!(
        "INSERT INTO {table} ({}) VALUES {}",
        columns.join(", "),
        tuples.join(", ")
    );
    if let Some(column) = returning {
        sql.push_str(&format!(" RETURNING {column}"));
    }
    sql
}

/// Build an UPDATE-by-id statement setting exactly `columns`.
///
/// Bind order is the column values followed by the id.
pub fn update_statement(dialect: Dialect, table: &str, columns: &[&str], id_column: &str) -> String {
    let mut placeholder_idx = 1usize;
    let assignments: Vec<String> = columns
        .iter()
        .map(|column| {
            let placeholder = dialect.placeholder(placeholder_idx);
            placeholder_idx += 1;
            format!("{column} = {placeholder}")
        })
        .collect();
    let id_placeholder = dialect.placeholder(placeholder_idx);
    format!(
        "UPDATE {table} SET {} WHERE {id_column} = {id_placeholder}",
        assignments.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_select() {
        let (sql, params) = QueryBuilder::new("users").build_select(&["*"]);
        assert_eq!(sql, "SELECT * FROM users");
        assert!(params.is_empty());
    }

    #[test]
    fn test_where_eq() {
        let (sql, params) = QueryBuilder::new("users")
            .where_eq("email", "a@b.com")
            .build_select(&["*"]);
        assert_eq!(sql, "SELECT * FROM users WHERE email = ?");
        assert_eq!(params, vec![Value::Text("a@b.com".to_string())]);
    }

    #[test]
    fn test_complex_query() {
        let (sql, params) = QueryBuilder::new("users")
            .where_eq("status", "active")
            .where_like("name", "%alice%")
            .order_by("id", true)
            .limit(10)
            .offset(20)
            .build_select(&["id", "name"]);
        assert_eq!(
            sql,
            "SELECT id, name FROM users WHERE status = ? AND name LIKE ? ORDER BY id ASC LIMIT 10 OFFSET 20"
        );
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_postgres_placeholders() {
        let (sql, params) = QueryBuilder::new("users")
            .dialect(Dialect::Postgres)
            .where_eq("status", "active")
            .filter(Condition::gt("age", 21))
            .build_select(&["*"]);
        assert_eq!(
            sql,
            "SELECT * FROM users WHERE status = $1 AND age > $2"
        );
        assert_eq!(params, vec![Value::Text("active".to_string()), Value::Int(21)]);
    }

    #[test]
    fn test_count_query() {
        let (sql, params) = QueryBuilder::new("users")
            .where_eq("active", true)
            .build_count();
        assert_eq!(sql, "SELECT COUNT(*) FROM users WHERE active = ?");
        assert_eq!(params, vec![Value::Bool(true)]);
    }

    #[test]
    fn test_delete_by_condition() {
        let (sql, params) = QueryBuilder::new("users")
            .dialect(Dialect::Postgres)
            .filter(Condition::ne("status", "active"))
            .build_delete();
        assert_eq!(sql, "DELETE FROM users WHERE status != $1");
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_insert_statement_mysql_style() {
        let sql = insert_statement(Dialect::MySql, "users", &["name", "age"], 1, None);
        assert_eq!(sql, "INSERT INTO users (name, age) VALUES (?, ?)");
    }

    #[test]
    fn test_insert_statement_postgres_returning() {
        let sql = insert_statement(Dialect::Postgres, "users", &["name", "age"], 1, Some("id"));
        assert_eq!(
            sql,
            "INSERT INTO users (name, age) VALUES ($1, $2) RETURNING id"
        );
    }

    #[test]
    fn test_insert_statement_batch_numbering() {
        let sql = insert_statement(Dialect::Postgres, "users", &["name", "age"], 3, None);
        assert_eq!(
            sql,
            "INSERT INTO users (name, age) VALUES ($1, $2), ($3, $4), ($5, $6)"
        );
    }

    #[test]
    fn test_update_statement() {
        let sql = update_statement(Dialect::Postgres, "users", &["name", "age"], "id");
        assert_eq!(sql, "UPDATE users SET name = $1, age = $2 WHERE id = $3");

        let sql = update_statement(Dialect::Sqlite, "users", &["name"], "id");
        assert_eq!(sql, "UPDATE users SET name = ? WHERE id = ?");
    }
}
