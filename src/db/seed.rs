use std::fs;

use anyhow::Context;

use super::{queries, Document, Store, SERVICES};

/// Loads a JSON array of service records into an empty `services` collection.
///
/// Returns the number of inserted records; a non-empty collection is left untouched.
pub fn load_services(store: &Store, path: &str) -> anyhow::Result<usize> {
    let raw = fs::read_to_string(path).with_context(|| format!("failed to read seed file: {path}"))?;
    let records: Vec<Document> =
        serde_json::from_str(&raw).with_context(|| format!("seed file is not a JSON array of objects: {path}"))?;

    store.with_conn(|conn| -> anyhow::Result<usize> {
        if queries::count(conn, SERVICES)? > 0 {
            tracing::info!("services collection already populated, skipping seed");
            return Ok(0);
        }

        let tx = conn.unchecked_transaction()?;
        for record in &records {
            queries::insert_one(&tx, SERVICES, record.clone())?;
        }
        tx.commit()?;

        tracing::info!(count = records.len(), "seeded services from {path}");
        Ok(records.len())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::filter::{Filter, FindOptions};

    #[test]
    fn test_load_services_once() {
        let dir = std::env::temp_dir().join(format!("car_doctor_seed_{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("services.json");
        fs::write(
            &path,
            r#"[{"title":"Engine Oil Change","price":20,"img":"oil.jpg","service_id":"01"},
                {"title":"Battery Charge","price":30,"img":"battery.jpg","service_id":"02"}]"#,
        )
        .unwrap();
        let path = path.to_string_lossy().to_string();

        let store = Store::open(":memory:").unwrap();
        assert_eq!(load_services(&store, &path).unwrap(), 2);
        assert_eq!(load_services(&store, &path).unwrap(), 0);

        let docs = store
            .with_conn(|conn| queries::find(conn, SERVICES, &Filter::new(), &FindOptions::new()))
            .unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0]["title"], "Engine Oil Change");

        fs::remove_dir_all(&dir).unwrap();
    }
}
