use sqlx::MySqlPool;

use crate::errors::ApiError;

/// SQL bindable value for dynamic updates
#[derive(Debug)]
pub enum SqlValue {
    String(String),
    U8(u8),
    U64(u64),
}

/// Dynamic UPDATE statement plus its bind values
#[derive(Debug)]
pub struct SqlUpdate {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

/// Build an UPDATE from the typed (column, value) pairs a handler collected
/// from a partial payload. Columns come from code, never the request.
pub fn build_update(
    table: &str,
    fields: Vec<(&str, SqlValue)>,
    id_column: &str,
    id_value: u64,
) -> Result<SqlUpdate, ApiError> {
    if fields.is_empty() {
        return Err(ApiError::Validation("No fields provided for update".into()));
    }

    let set_clause = fields
        .iter()
        .map(|(column, _)| format!("{} = ?", column))
        .collect::<Vec<_>>()
        .join(", ");

    let sql = format!(
        "UPDATE {} SET {} WHERE {} = ?",
        table, set_clause, id_column
    );

    let mut values: Vec<SqlValue> = fields.into_iter().map(|(_, value)| value).collect();
    values.push(SqlValue::U64(id_value));

    Ok(SqlUpdate { sql, values })
}

/// Execute the update, returning the number of affected rows
pub async fn execute_update(pool: &MySqlPool, update: SqlUpdate) -> Result<u64, sqlx::Error> {
    let mut query = sqlx::query(&update.sql);

    for value in update.values {
        query = match value {
            SqlValue::String(v) => query.bind(v),
            SqlValue::U8(v) => query.bind(v),
            SqlValue::U64(v) => query.bind(v),
        };
    }

    let result = query.execute(pool).await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_set_clause_in_field_order() {
        let update = build_update(
            "users",
            vec![
                ("name", SqlValue::String("John".into())),
                ("role_id", SqlValue::U8(3)),
            ],
            "id",
            7,
        )
        .unwrap();

        assert_eq!(update.sql, "UPDATE users SET name = ?, role_id = ? WHERE id = ?");
        assert!(matches!(update.values.last(), Some(SqlValue::U64(7))));
    }

    #[test]
    fn empty_update_is_rejected() {
        let err = build_update("users", Vec::new(), "id", 7).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
