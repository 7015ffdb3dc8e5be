//! Renders statements for SQLite and runs them against an in-memory database.

use chrono::{DateTime, Utc};
use oxide_sqlbuilder::{
    bool_column, date_column, float_column, int_column, lit, string_column, AlterTable,
    CreateIndex, CreateTable, Delete, DropTable, ExprOps, Insert, Order, Select, SqlValue,
    SqliteDialect, Statement, Table, Update,
};
use sqlx::sqlite::{SqliteArguments, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, Sqlite};

type Query<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

async fn create_test_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await
        .expect("Failed to create in-memory SQLite pool")
}

fn bind_value(query: Query<'_>, value: SqlValue) -> Query<'_> {
    match value {
        SqlValue::Null => query.bind(Option::<i64>::None),
        SqlValue::Bool(b) => query.bind(b),
        SqlValue::Int(i) => query.bind(i),
        SqlValue::Float(f) => query.bind(f),
        SqlValue::Text(s) => query.bind(s),
        SqlValue::Blob(b) => query.bind(b),
        SqlValue::Timestamp(t) => query.bind(t),
        SqlValue::Custom(c) => query.bind(c.to_sql_inline()),
    }
}

async fn execute(pool: &SqlitePool, stmt: &impl Statement) -> u64 {
    let (sql, args) = stmt.to_sql(&SqliteDialect).expect("statement renders");
    let query = args.into_iter().fold(sqlx::query(&sql), bind_value);
    query
        .execute(pool)
        .await
        .unwrap_or_else(|e| panic!("Failed to execute: {sql}\nError: {e}"))
        .rows_affected()
}

async fn fetch(pool: &SqlitePool, stmt: &impl Statement) -> Vec<SqliteRow> {
    let (sql, args) = stmt.to_sql(&SqliteDialect).expect("statement renders");
    let query = args.into_iter().fold(sqlx::query(&sql), bind_value);
    query
        .fetch_all(pool)
        .await
        .unwrap_or_else(|e| panic!("Failed to fetch: {sql}\nError: {e}"))
}

fn users() -> Table {
    Table::new(
        "users",
        [
            int_column("id").primary_key().auto_increment(),
            string_column("name").not_null(),
            float_column("score"),
            bool_column("active").default(true),
            date_column("created"),
        ],
    )
    .unwrap()
}

async fn seed(pool: &SqlitePool, t: &Table) {
    execute(pool, &CreateTable::new(t).if_not_exists()).await;
    let created = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
    for (name, score, active) in [("ann", 4.5, true), ("bob", 2.0, false), ("cyd", 3.5, true)] {
        let rows = execute(
            pool,
            &Insert::new(t)
                .columns([t.c("name"), t.c("score"), t.c("active"), t.c("created")])
                .values([lit(name), lit(score), lit(active), lit(created)]),
        )
        .await;
        assert_eq!(rows, 1);
    }
}

#[tokio::test]
async fn test_insert_and_select() {
    let pool = create_test_pool().await;
    let t = users();
    seed(&pool, &t).await;

    let rows = fetch(
        &pool,
        &Select::new(&t)
            .columns([t.c("name"), t.c("score")])
            .where_clause(t.c("score").gt(3.0))
            .order_by(t.c("name"), Order::Desc),
    )
    .await;
    let names: Vec<String> = rows.iter().map(|r| r.get::<String, _>(0)).collect();
    assert_eq!(names, vec!["cyd", "ann"]);
    assert!((rows[1].get::<f64, _>(1) - 4.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_select_from_subquery() {
    let pool = create_test_pool().await;
    let t = users();
    seed(&pool, &t).await;

    let active = Select::new(&t)
        .column(t.c("name"))
        .column(t.c("score").alias("points"))
        .where_clause(t.c("active").eq(true))
        .to_subquery("active_users");
    let rows = fetch(
        &pool,
        &Select::new(&active)
            .columns([active.c("name")])
            .where_clause(active.c("points").lt(4.0))
            .order_by(active.c("points"), Order::Asc),
    )
    .await;
    let names: Vec<String> = rows.iter().map(|r| r.get::<String, _>(0)).collect();
    assert_eq!(names, vec!["cyd"]);
}

#[tokio::test]
async fn test_limit_offset_bind() {
    let pool = create_test_pool().await;
    let t = users();
    seed(&pool, &t).await;

    let rows = fetch(
        &pool,
        &Select::new(&t)
            .columns([t.c("name")])
            .order_by(t.c("id"), Order::Asc)
            .limit(1)
            .offset(1),
    )
    .await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get::<String, _>(0), "bob");
}

#[tokio::test]
async fn test_update_and_delete() {
    let pool = create_test_pool().await;
    let t = users();
    seed(&pool, &t).await;

    let updated = execute(
        &pool,
        &Update::new(&t)
            .set(t.c("active"), true)
            .where_clause(t.c("active").eq(false)),
    )
    .await;
    assert_eq!(updated, 1);

    let deleted = execute(
        &pool,
        &Delete::new(&t).where_clause(t.c("name").in_list(["ann", "bob"])),
    )
    .await;
    assert_eq!(deleted, 2);

    let rows = fetch(&pool, &Select::new(&t).columns([t.c("name")])).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get::<String, _>(0), "cyd");
}

#[tokio::test]
async fn test_null_comparison_rewrite() {
    let pool = create_test_pool().await;
    let t = users();
    seed(&pool, &t).await;

    execute(
        &pool,
        &Insert::new(&t)
            .set(t.c("name"), "dee")
            .set(t.c("score"), oxide_sqlbuilder::Null),
    )
    .await;

    let rows = fetch(
        &pool,
        &Select::new(&t)
            .columns([t.c("name")])
            .where_clause(t.c("score").eq(oxide_sqlbuilder::Null)),
    )
    .await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get::<String, _>(0), "dee");
}

#[tokio::test]
async fn test_alter_then_apply() {
    let pool = create_test_pool().await;
    let t = users();
    seed(&pool, &t).await;

    let add = AlterTable::new(&t).add_column(int_column("rank").default(0));
    execute(&pool, &add).await;
    add.apply_to_table().unwrap();

    let rename = AlterTable::new(&t).rename_to("members");
    execute(&pool, &rename).await;
    rename.apply_to_table().unwrap();

    execute(
        &pool,
        &Update::new(&t)
            .set(t.c("rank"), 7)
            .where_clause(t.c("name").eq("ann")),
    )
    .await;

    let rows = fetch(
        &pool,
        &Select::new(&t)
            .columns([t.c("rank")])
            .where_clause(t.c("name").eq("ann")),
    )
    .await;
    assert_eq!(rows[0].get::<i64, _>(0), 7);

    execute(
        &pool,
        &CreateIndex::new(&t)
            .name("members_name")
            .columns([t.c("name")])
            .unique()
            .if_not_exists(),
    )
    .await;
    execute(&pool, &DropTable::new(&t).if_exists()).await;

    let gone: Option<(String,)> =
        sqlx::query_as("SELECT name FROM sqlite_master WHERE type='table' AND name='members'")
            .fetch_optional(&pool)
            .await
            .unwrap();
    assert!(gone.is_none());
}
