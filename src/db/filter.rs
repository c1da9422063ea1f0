//! Filter, sort, projection and update documents, compiled to SQL over the JSON `body` column.
//!
//! Field names are always `&'static str` chosen by the caller's code, never request input,
//! so they are interpolated into the SQL text. Values are always bound as parameters.

use rusqlite::types::Value as SqlValue;

use super::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

impl SortOrder {
    /// Anything other than `ascending` sorts descending.
    pub fn parse(s: Option<&str>) -> Self {
        match s {
            Some("ascending") => SortOrder::Ascending,
            _ => SortOrder::Descending,
        }
    }

    fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq(String),
    ContainsIgnoreCase(String),
    /// Exclusive on both ends.
    Between { gt: f64, lt: f64 },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<(&'static str, Condition)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by_id(id: impl Into<String>) -> Self {
        Self::new().eq("_id", id)
    }

    pub fn eq(mut self, field: &'static str, value: impl Into<String>) -> Self {
        self.clauses.push((field, Condition::Eq(value.into())));
        self
    }

    pub fn contains_ignore_case(mut self, field: &'static str, needle: impl Into<String>) -> Self {
        self.clauses
            .push((field, Condition::ContainsIgnoreCase(needle.into())));
        self
    }

    pub fn between(mut self, field: &'static str, gt: f64, lt: f64) -> Self {
        self.clauses.push((field, Condition::Between { gt, lt }));
        self
    }

    /// Renders the conditions as `AND`-joined SQL fragments with their bound values.
    pub(crate) fn to_sql(&self) -> (String, Vec<SqlValue>) {
        let mut fragments = Vec::with_capacity(self.clauses.len());
        let mut params = Vec::new();

        for (field, condition) in &self.clauses {
            let column = field_expr(field);
            match condition {
                Condition::Eq(value) => {
                    fragments.push(format!("{column} = ?"));
                    params.push(SqlValue::Text(value.clone()));
                }
                Condition::ContainsIgnoreCase(needle) => {
                    fragments.push(format!("instr(unicode_lower({column}), unicode_lower(?)) > 0"));
                    params.push(SqlValue::Text(needle.clone()));
                }
                Condition::Between { gt, lt } => {
                    fragments.push(format!("{column} > ? AND {column} < ?"));
                    params.push(SqlValue::Real(*gt));
                    params.push(SqlValue::Real(*lt));
                }
            }
        }

        if fragments.is_empty() {
            ("1 = 1".to_string(), params)
        } else {
            (fragments.join(" AND "), params)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    sort: Option<(&'static str, SortOrder)>,
    projection: Option<Vec<&'static str>>,
}

impl FindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sort(mut self, field: &'static str, order: SortOrder) -> Self {
        self.sort = Some((field, order));
        self
    }

    /// Restricts returned documents to `_id` plus the given fields.
    pub fn project(mut self, fields: &[&'static str]) -> Self {
        self.projection = Some(fields.to_vec());
        self
    }

    pub(crate) fn order_sql(&self) -> String {
        match self.sort {
            Some((field, order)) => format!("ORDER BY {} {}, rowid ASC", field_expr(field), order.as_sql()),
            None => "ORDER BY rowid ASC".to_string(),
        }
    }

    pub(crate) fn apply_projection(&self, doc: Document) -> Document {
        match &self.projection {
            None => doc,
            Some(fields) => doc
                .into_iter()
                .filter(|(key, _)| key == "_id" || fields.iter().any(|f| *f == key.as_str()))
                .collect(),
        }
    }
}

/// A `$set`-style partial update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Update {
    set: Document,
}

impl Update {
    pub fn set(field: &'static str, value: impl Into<serde_json::Value>) -> Self {
        let mut set = Document::new();
        set.insert(field.to_string(), value.into());
        Self { set }
    }

    /// Merges the update into `doc`, returning whether anything changed.
    pub(crate) fn apply(&self, doc: &mut Document) -> bool {
        let mut changed = false;
        for (key, value) in &self.set {
            if doc.get(key) != Some(value) {
                doc.insert(key.clone(), value.clone());
                changed = true;
            }
        }
        changed
    }
}

/// `field` is spliced into the SQL text; every caller passes a `&'static str` literal.
fn field_expr(field: &str) -> String {
    debug_assert!(field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
    if field == "_id" {
        "id".to_string()
    } else {
        format!("json_extract(body, '$.{field}')")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_filter_matches_everything() {
        let (sql, params) = Filter::new().to_sql();
        assert_eq!(sql, "1 = 1");
        assert!(params.is_empty());
    }

    #[test]
    fn test_service_listing_filter() {
        let (sql, params) = Filter::new()
            .contains_ignore_case("title", "Oil")
            .between("price", 10.0, 400.0)
            .to_sql();
        assert_eq!(
            sql,
            "instr(unicode_lower(json_extract(body, '$.title')), unicode_lower(?)) > 0 AND \
             json_extract(body, '$.price') > ? AND json_extract(body, '$.price') < ?"
        );
        assert_eq!(
            params,
            vec![
                SqlValue::Text("Oil".to_string()),
                SqlValue::Real(10.0),
                SqlValue::Real(400.0)
            ]
        );
    }

    #[test]
    fn test_id_maps_to_column() {
        let (sql, _) = Filter::by_id("abc").to_sql();
        assert_eq!(sql, "id = ?");
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!(SortOrder::parse(Some("ascending")), SortOrder::Ascending);
        assert_eq!(SortOrder::parse(Some("descending")), SortOrder::Descending);
        assert_eq!(SortOrder::parse(Some("sideways")), SortOrder::Descending);
        assert_eq!(SortOrder::parse(None), SortOrder::Descending);
    }

    #[test]
    fn test_projection_keeps_id() {
        let doc = json!({"_id": "1", "title": "Oil change", "price": 20, "description": "long"});
        let doc = doc.as_object().unwrap().clone();
        let projected = FindOptions::new().project(&["title", "price"]).apply_projection(doc);
        assert_eq!(projected.len(), 3);
        assert!(projected.contains_key("_id"));
        assert!(!projected.contains_key("description"));
    }

    #[test]
    fn test_update_reports_changes() {
        let mut doc = json!({"status": "pending", "email": "a@x.com"})
            .as_object()
            .unwrap()
            .clone();
        assert!(!Update::set("status", "pending").apply(&mut doc));
        assert!(Update::set("status", "confirmed").apply(&mut doc));
        assert_eq!(doc["status"], "confirmed");
        assert_eq!(doc["email"], "a@x.com");
    }
}
