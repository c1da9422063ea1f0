use anyhow::Context;
use rusqlite::{params, params_from_iter, Connection};
use uuid::Uuid;

use super::filter::{Filter, FindOptions, Update};
use super::{DeleteResult, Document, InsertOneResult, UpdateResult};

// ── Reads ──

pub fn find(
    conn: &Connection,
    collection: &str,
    filter: &Filter,
    options: &FindOptions,
) -> anyhow::Result<Vec<Document>> {
    let (where_sql, mut values) = filter.to_sql();
    let sql = format!(
        "SELECT id, body FROM documents WHERE collection = ? AND {where_sql} {}",
        options.order_sql()
    );
    values.insert(0, collection.to_string().into());

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(values), |row| {
        Ok(parse_document_row(row))
    })?;

    let mut docs = vec![];
    for row in rows {
        docs.push(options.apply_projection(row??));
    }
    Ok(docs)
}

pub fn find_one(
    conn: &Connection,
    collection: &str,
    filter: &Filter,
    options: &FindOptions,
) -> anyhow::Result<Option<Document>> {
    let (where_sql, mut values) = filter.to_sql();
    let sql = format!(
        "SELECT id, body FROM documents WHERE collection = ? AND {where_sql} {} LIMIT 1",
        options.order_sql()
    );
    values.insert(0, collection.to_string().into());

    let result = conn.query_row(&sql, params_from_iter(values), |row| {
        Ok(parse_document_row(row))
    });

    match result {
        Ok(doc) => Ok(Some(options.apply_projection(doc?))),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn count(conn: &Connection, collection: &str) -> anyhow::Result<i64> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM documents WHERE collection = ?1",
        params![collection],
        |row| row.get(0),
    )?;
    Ok(count)
}

// ── Writes ──

/// Stores `doc` under a freshly generated id. Any `_id` the caller supplied is discarded.
pub fn insert_one(
    conn: &Connection,
    collection: &str,
    mut doc: Document,
) -> anyhow::Result<InsertOneResult> {
    doc.remove("_id");
    let id = Uuid::new_v4().to_string();
    let body = serde_json::to_string(&doc).context("failed to encode document")?;

    conn.execute(
        "INSERT INTO documents (collection, id, body) VALUES (?1, ?2, ?3)",
        params![collection, id, body],
    )?;

    Ok(InsertOneResult {
        acknowledged: true,
        inserted_id: id,
    })
}

/// Applies `update` to the first document matching `filter`.
pub fn update_one(
    conn: &Connection,
    collection: &str,
    filter: &Filter,
    update: &Update,
) -> anyhow::Result<UpdateResult> {
    let mut result = UpdateResult {
        acknowledged: true,
        matched_count: 0,
        modified_count: 0,
        upserted_id: None,
        upserted_count: 0,
    };

    let Some(mut doc) = find_one(conn, collection, filter, &FindOptions::new())? else {
        return Ok(result);
    };
    result.matched_count = 1;

    if !update.apply(&mut doc) {
        return Ok(result);
    }

    let id = match doc.remove("_id") {
        Some(serde_json::Value::String(id)) => id,
        _ => anyhow::bail!("stored document is missing its id"),
    };
    let body = serde_json::to_string(&doc).context("failed to encode document")?;

    conn.execute(
        "UPDATE documents SET body = ?1 WHERE collection = ?2 AND id = ?3",
        params![body, collection, id],
    )?;
    result.modified_count = 1;

    Ok(result)
}

pub fn delete_one(
    conn: &Connection,
    collection: &str,
    filter: &Filter,
) -> anyhow::Result<DeleteResult> {
    let (where_sql, mut values) = filter.to_sql();
    let sql = format!(
        "DELETE FROM documents WHERE rowid = (
            SELECT rowid FROM documents WHERE collection = ? AND {where_sql} ORDER BY rowid LIMIT 1
        )"
    );
    values.insert(0, collection.to_string().into());

    let deleted = conn.execute(&sql, params_from_iter(values))?;

    Ok(DeleteResult {
        acknowledged: true,
        deleted_count: deleted as u64,
    })
}

fn parse_document_row(row: &rusqlite::Row) -> anyhow::Result<Document> {
    let id: String = row.get(0)?;
    let body: String = row.get(1)?;

    let mut doc: Document = serde_json::from_str(&body)
        .with_context(|| format!("stored document {id} is not a JSON object"))?;
    doc.insert("_id".to_string(), serde_json::Value::String(id));

    Ok(doc)
}
