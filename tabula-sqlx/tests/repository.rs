use sqlx::FromRow;
use tabula_data::{Condition, DataError, Entity, ErrorKind, QueryBuilder, Repository, Value};
use tabula_sqlx::{Config, Provider, SqlxRepository};
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq, FromRow)]
struct User {
    id: i64,
    name: String,
    age: i64,
}

impl User {
    fn new(name: &str, age: i64) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
            age,
        }
    }
}

impl Entity for User {
    fn table_name() -> &'static str {
        "users"
    }

    fn columns() -> &'static [&'static str] {
        &["name", "age"]
    }

    fn id_value(&self) -> Value {
        Value::Int(self.id)
    }

    fn values(&self) -> Vec<Value> {
        vec![self.name.clone().into(), self.age.into()]
    }

    fn set_generated_id(&mut self, id: i64) {
        self.id = id;
    }
}

async fn setup() -> (Provider, SqlxRepository<User>, TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = Config {
        driver: "sqlite".into(),
        database: dir.path().join("test.db").to_string_lossy().into_owned(),
        ..Config::default()
    };
    let provider = Provider::connect(config).await.expect("connect");
    let repo: SqlxRepository<User> = provider.repository();
    repo.raw_exec(
        "CREATE TABLE users (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL, age INTEGER NOT NULL)",
        Vec::new(),
    )
    .await
    .expect("create table");
    (provider, repo, dir)
}

#[tokio::test]
async fn test_create_writes_back_generated_id() {
    let (_provider, repo, _dir) = setup().await;
    let mut user = User::new("Alice", 25);
    repo.create(&mut user).await.expect("create");
    assert_ne!(user.id, 0);

    let found = repo.find_by_id(user.id).await.expect("find");
    assert_eq!(found, user);
}

#[tokio::test]
async fn test_create_batch() {
    let (_provider, repo, _dir) = setup().await;
    let users = vec![User::new("Alice", 25), User::new("Bob", 30), User::new("Carol", 35)];
    repo.create_batch(&users).await.expect("batch");
    assert_eq!(repo.count().await.expect("count"), 3);
}

#[tokio::test]
async fn test_create_batch_empty_is_noop() {
    let (_provider, repo, _dir) = setup().await;
    repo.create_batch(&[]).await.expect("empty batch");
    assert_eq!(repo.count().await.expect("count"), 0);
}

#[tokio::test]
async fn test_find_by_id_missing_is_not_found() {
    let (_provider, repo, _dir) = setup().await;
    let err = repo.find_by_id(9999i64).await.expect_err("missing id");
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_find_all_empty_is_ok() {
    let (_provider, repo, _dir) = setup().await;
    let users = repo.find_all().await.expect("find_all");
    assert!(users.is_empty());
}

#[tokio::test]
async fn test_query_with_conditions() {
    let (_provider, repo, _dir) = setup().await;
    repo.create_batch(&[User::new("Alice", 25), User::new("Bob", 30)])
        .await
        .expect("batch");

    let adults = repo
        .query(repo.query_builder().filter(Condition::ge("age", 30)))
        .await
        .expect("query");
    assert_eq!(adults.len(), 1);
    assert_eq!(adults[0].name, "Bob");
}

#[tokio::test]
async fn test_query_one_empty_is_not_found() {
    let (_provider, repo, _dir) = setup().await;
    let err = repo
        .query_one(repo.query_builder().where_eq("name", "Nobody"))
        .await
        .expect_err("empty result");
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_update_all_fields() {
    let (_provider, repo, _dir) = setup().await;
    let mut user = User::new("Alice", 25);
    repo.create(&mut user).await.expect("create");

    user.name = "Alicia".into();
    user.age = 26;
    let affected = repo.update(&user).await.expect("update");
    assert_eq!(affected, 1);

    let found = repo.find_by_id(user.id).await.expect("find");
    assert_eq!(found, user);
}

#[tokio::test]
async fn test_update_partial_touches_only_named_fields() {
    let (_provider, repo, _dir) = setup().await;
    let mut user = User::new("Alice", 25);
    repo.create(&mut user).await.expect("create");

    let affected = repo
        .update_partial(user.id, &[("age", Value::Int(26))])
        .await
        .expect("partial update");
    assert_eq!(affected, 1);

    let found = repo.find_by_id(user.id).await.expect("find");
    assert_eq!(found.age, 26);
    assert_eq!(found.name, "Alice");
}

#[tokio::test]
async fn test_update_partial_empty_is_noop() {
    let (_provider, repo, _dir) = setup().await;
    let mut user = User::new("Alice", 25);
    repo.create(&mut user).await.expect("create");

    let affected = repo.update_partial(user.id, &[]).await.expect("noop");
    assert_eq!(affected, 0);
}

#[tokio::test]
async fn test_update_partial_unknown_field_fails_at_execution() {
    let (_provider, repo, _dir) = setup().await;
    let mut user = User::new("Alice", 25);
    repo.create(&mut user).await.expect("create");

    let result = repo
        .update_partial(user.id, &[("no_such_column", Value::Int(1))])
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_delete_by_condition() {
    let (_provider, repo, _dir) = setup().await;
    repo.create_batch(&[User::new("Alice", 25), User::new("Bob", 30), User::new("Carol", 35)])
        .await
        .expect("batch");

    let affected = repo
        .delete_by_condition(Condition::gt("age", 28))
        .await
        .expect("delete");
    assert_eq!(affected, 2);
    assert_eq!(repo.count().await.expect("count"), 1);
}

#[tokio::test]
async fn test_count_and_exists() {
    let (_provider, repo, _dir) = setup().await;
    assert_eq!(repo.count().await.expect("count"), 0);
    assert!(!repo.exists().await.expect("exists"));

    repo.create_batch(&[User::new("Alice", 25), User::new("Bob", 30)])
        .await
        .expect("batch");
    assert_eq!(repo.count().await.expect("count"), 2);
    assert!(repo.exists().await.expect("exists"));
}

#[tokio::test]
async fn test_duplicate_key_is_duplicate_kind() {
    let (_provider, repo, _dir) = setup().await;
    repo.raw_exec("CREATE UNIQUE INDEX users_name_idx ON users (name)", Vec::new())
        .await
        .expect("unique index");

    let mut first = User::new("Alice", 25);
    repo.create(&mut first).await.expect("create");

    let mut second = User::new("Alice", 30);
    let err = repo.create(&mut second).await.expect_err("duplicate");
    assert_eq!(err.kind(), ErrorKind::Duplicate);
}

#[tokio::test]
async fn test_transaction_commit() {
    let (_provider, repo, _dir) = setup().await;
    repo.transaction(|tx| {
        Box::pin(async move {
            let mut alice = User::new("Alice", 25);
            let mut bob = User::new("Bob", 30);
            tx.create(&mut alice).await?;
            tx.create(&mut bob).await?;
            assert_eq!(tx.count().await?, 2);
            Ok(())
        })
    })
    .await
    .expect("transaction");

    assert_eq!(repo.count().await.expect("count"), 2);
}

#[tokio::test]
async fn test_transaction_error_rolls_back() {
    let (_provider, repo, _dir) = setup().await;
    let result: Result<(), DataError> = repo
        .transaction(|tx| {
            Box::pin(async move {
                let mut alice = User::new("Alice", 25);
                tx.create(&mut alice).await?;
                Err(DataError::generic("boom"))
            })
        })
        .await;
    assert!(result.is_err());

    // Nothing written by the callback survives.
    assert_eq!(repo.count().await.expect("count"), 0);
}

#[tokio::test]
async fn test_raw_query_scans_into_entity() {
    let (_provider, repo, _dir) = setup().await;
    repo.create_batch(&[User::new("Alice", 25), User::new("Bob", 30)])
        .await
        .expect("batch");

    let users = repo
        .raw_query(
            "SELECT id, name, age FROM users WHERE age > ? ORDER BY age",
            vec![Value::Int(26)],
        )
        .await
        .expect("raw query");
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].name, "Bob");
}

#[tokio::test]
async fn test_raw_exec_reports_rows_affected() {
    let (_provider, repo, _dir) = setup().await;
    repo.create_batch(&[User::new("Alice", 25), User::new("Bob", 30)])
        .await
        .expect("batch");

    let result = repo
        .raw_exec("UPDATE users SET age = age + 1", Vec::new())
        .await
        .expect("raw exec");
    assert_eq!(result.rows_affected(), 2);
}

#[tokio::test]
async fn test_entity_info_from_descriptor() {
    let (_provider, repo, _dir) = setup().await;
    let info = repo.entity_info();
    assert_eq!(info.name, "User");
    assert_eq!(info.table_name, "users");
    let names: Vec<_> = info.fields.iter().map(|f| f.name).collect();
    assert_eq!(names, vec!["id", "name", "age"]);
    assert!(info.fields[0].primary_key);
}

#[tokio::test]
async fn test_provider_health_and_info() {
    let (provider, _repo, _dir) = setup().await;
    provider.health().await.expect("health");

    let info = provider.info();
    assert_eq!(info.name, "sqlx");
    assert_eq!(info.database, "sqlite");
    assert!(!info.features.is_empty());
}

#[tokio::test]
async fn test_unsupported_driver_fails_fast() {
    let config = Config {
        driver: "mongodb".into(),
        ..Config::default()
    };
    let err = Provider::connect(config).await.expect_err("unsupported");
    assert_eq!(err.kind(), ErrorKind::Generic);
    assert!(err.message().contains("unsupported driver: mongodb"));
}

#[tokio::test]
async fn test_sqlite_missing_directory_fails_fast() {
    let config = Config {
        driver: "sqlite".into(),
        database: "/definitely/not/a/real/dir/test.db".into(),
        ..Config::default()
    };
    let err = Provider::connect(config).await.expect_err("missing dir");
    assert_eq!(err.kind(), ErrorKind::Generic);
    assert!(err.message().contains("database directory does not exist"));
}

#[tokio::test]
async fn test_in_memory_database() {
    let config = Config {
        driver: "sqlite".into(),
        database: ":memory:".into(),
        pool: tabula_sqlx::PoolConfig {
            // A shared :memory: database only exists per connection.
            max_connections: Some(1),
            ..Default::default()
        },
        ..Config::default()
    };
    let provider = Provider::connect(config).await.expect("connect");
    let repo: SqlxRepository<User> = provider.repository();
    repo.raw_exec(
        "CREATE TABLE users (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL, age INTEGER NOT NULL)",
        Vec::new(),
    )
    .await
    .expect("create table");

    let mut user = User::new("Alice", 25);
    repo.create(&mut user).await.expect("create");
    assert_eq!(repo.count().await.expect("count"), 1);
}

#[tokio::test]
async fn test_end_to_end_scenario() {
    let (_provider, repo, _dir) = setup().await;

    let mut alice = User::new("Alice", 25);
    let mut bob = User::new("Bob", 30);
    repo.create(&mut alice).await.expect("create alice");
    repo.create(&mut bob).await.expect("create bob");
    assert_eq!(repo.count().await.expect("count"), 2);

    let affected = repo.delete(alice.id).await.expect("delete");
    assert_eq!(affected, 1);
    assert_eq!(repo.count().await.expect("count"), 1);

    let err = repo.find_by_id(alice.id).await.expect_err("deleted");
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let remaining = repo
        .query_one(QueryBuilder::new("users").where_eq("name", "Bob"))
        .await
        .expect("bob remains");
    assert_eq!(remaining, bob);
}
