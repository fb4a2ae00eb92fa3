use crate::argparse::{AlbumArgs, ExplainArgs, SearchArgs};
use anyhow::{anyhow, Context, Result};
use photo_search::search::{render, SqlValue};
use photo_search::{
    compile_filter, Database, Dialect, EntityKind, FilterQuery, Pagination, Scope, SearchConfig,
};
use serde_json::{json, Value};

async fn open_database(config: &SearchConfig) -> Result<Database> {
    Database::connect_with_retry(&config.database_url, config.retry)
        .await
        .with_context(|| format!("Failed to open database {}", config.database_url))
}

pub async fn search_command(config: &SearchConfig, args: SearchArgs) -> Result<()> {
    let db = open_database(config).await?;
    let scope = if args.all { Scope::All } else { Scope::Public };
    let query = FilterQuery::new(args.filter)
        .with_merged(args.merged)
        .with_page(args.offset, args.limit)
        .with_scope(scope);

    let results = db.search_photos(&query, config.query_timeout).await?;
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

pub async fn album_command(config: &SearchConfig, args: AlbumArgs) -> Result<()> {
    let db = open_database(config).await?;
    let page = Pagination::new(args.offset, args.limit);

    let photos = db
        .album_photos(&args.uid, page, config.query_timeout)
        .await?
        .ok_or_else(|| anyhow!("Album not found: {}", args.uid))?;
    println!("{}", serde_json::to_string_pretty(&photos)?);
    Ok(())
}

pub async fn seed_demo_command(config: &SearchConfig) -> Result<()> {
    let db = open_database(config).await?;
    db.insert_fixtures()
        .await
        .context("Failed to load demo fixtures")?;
    println!("Demo photos loaded into {}", config.database_url);
    Ok(())
}

pub fn explain_command(args: ExplainArgs) -> Result<()> {
    let dialect = Dialect::from_name(&args.dialect).ok_or_else(|| {
        anyhow!(
            "Unknown dialect: {} (use sqlite, mysql or postgres)",
            args.dialect
        )
    })?;
    let predicate = compile_filter(&args.filter, dialect)?;
    println!("{}", serde_json::to_string_pretty(&explain(&predicate, dialect))?);
    Ok(())
}

fn explain(predicate: &photo_search::Predicate, dialect: Dialect) -> Value {
    let fragment = |kind: EntityKind| {
        let fragment = render(predicate, dialect, &kind);
        json!({
            "where": fragment.sql,
            "binds": fragment.binds.iter().map(bind_json).collect::<Vec<_>>(),
        })
    };

    json!({
        "dialect": dialect.name,
        "batch_size": dialect.batch_size(),
        "direct": fragment(EntityKind::Direct),
        "album": fragment(EntityKind::Album),
    })
}

fn bind_json(value: &SqlValue) -> Value {
    match value {
        SqlValue::String(s) => json!(s),
        SqlValue::Integer(i) => json!(i),
        SqlValue::Float(f) => json!(f),
        SqlValue::Bool(b) => json!(b),
    }
}
