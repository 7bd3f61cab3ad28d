use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use filedrop_core::models::FileSearchParams;

pub(crate) const FILE_COLUMNS: &str =
    "id, owner_id, name, size, file_type, storage_key, created_at, updated_at, expiration_date";

/// Build the owner-scoped search statement.
///
/// Filter values are always bound parameters. The ORDER BY clause is assembled from
/// the static column and keyword names of the typed sort enums only.
pub fn build_search_query(
    owner_id: Uuid,
    params: &FileSearchParams,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::<Postgres>::new(format!(
        "SELECT {} FROM files WHERE owner_id = ",
        FILE_COLUMNS
    ));
    qb.push_bind(owner_id);

    if let Some(query) = params.query.as_deref().filter(|q| !q.is_empty()) {
        qb.push(" AND name ILIKE ");
        qb.push_bind(format!("%{}%", escape_like(query)));
    }

    if let Some(file_type) = params.file_type.as_deref().filter(|t| !t.is_empty()) {
        qb.push(" AND file_type = ");
        qb.push_bind(file_type.trim_start_matches('.').to_lowercase());
    }

    if let Some(from) = params.created_from {
        qb.push(" AND created_at >= ");
        qb.push_bind(from);
    }

    if let Some(to) = params.created_to {
        qb.push(" AND created_at <= ");
        qb.push_bind(to);
    }

    let (field, direction) = params.ordering();
    qb.push(" ORDER BY ");
    qb.push(field.column());
    qb.push(" ");
    qb.push(direction.keyword());
    qb.push(", id ");
    qb.push(direction.keyword());

    if let Some(limit) = params.limit {
        qb.push(" LIMIT ");
        qb.push_bind(limit);
    }

    if let Some(offset) = params.offset {
        qb.push(" OFFSET ");
        qb.push_bind(offset);
    }

    qb
}

/// Escape LIKE wildcards so the name filter is a literal substring match.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
