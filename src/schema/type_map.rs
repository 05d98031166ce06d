use serde::Serialize;

/// Language-neutral column type shared by every generator target.
///
/// The mapping from SQL type names is deterministic and total: any name not
/// in the lookup table falls back to [`GenericType::Object`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum GenericType {
    Boolean,
    Byte,
    Short,
    Integer,
    Long,
    Float,
    Double,
    BigDecimal,
    String,
    Date,
    Time,
    DateTime,
    Uuid,
    Bytes,
    List(Box<GenericType>),
    Object,
}

impl std::fmt::Display for GenericType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenericType::Boolean => write!(f, "Boolean"),
            GenericType::Byte => write!(f, "Byte"),
            GenericType::Short => write!(f, "Short"),
            GenericType::Integer => write!(f, "Integer"),
            GenericType::Long => write!(f, "Long"),
            GenericType::Float => write!(f, "Float"),
            GenericType::Double => write!(f, "Double"),
            GenericType::BigDecimal => write!(f, "BigDecimal"),
            GenericType::String => write!(f, "String"),
            GenericType::Date => write!(f, "Date"),
            GenericType::Time => write!(f, "Time"),
            GenericType::DateTime => write!(f, "DateTime"),
            GenericType::Uuid => write!(f, "Uuid"),
            GenericType::Bytes => write!(f, "Bytes"),
            GenericType::List(inner) => write!(f, "List<{inner}>"),
            GenericType::Object => write!(f, "Object"),
        }
    }
}

/// Map a raw SQL type to its generic counterpart.
///
/// The input may carry length/precision arguments (`VARCHAR(255)`,
/// `NUMERIC(10,2)`) and array suffixes (`TEXT[]`); arguments are stripped and
/// array element types are mapped recursively.
pub fn map_sql_type(sql_type: &str) -> GenericType {
    let normalized = normalize_type_name(sql_type);
    if let Some(base) = normalized.strip_suffix("[]") {
        return GenericType::List(Box::new(map_sql_type(base)));
    }
    match normalized.as_str() {
        "SMALLINT" | "INT2" | "SMALLSERIAL" => GenericType::Short,
        "TINYINT" => GenericType::Byte,
        "INT" | "INTEGER" | "INT4" | "MEDIUMINT" | "SERIAL" => GenericType::Integer,
        "BIGINT" | "INT8" | "BIGSERIAL" => GenericType::Long,
        "REAL" | "FLOAT4" => GenericType::Float,
        "FLOAT" | "FLOAT8" | "DOUBLE" | "DOUBLE PRECISION" => GenericType::Double,
        "DECIMAL" | "NUMERIC" | "MONEY" => GenericType::BigDecimal,
        "BOOLEAN" | "BOOL" | "BIT" => GenericType::Boolean,
        "CHAR" | "CHARACTER" | "VARCHAR" | "CHARACTER VARYING" | "NCHAR" | "NVARCHAR"
        | "TEXT" | "CITEXT" | "CLOB" => GenericType::String,
        "DATE" => GenericType::Date,
        "TIME" | "TIMETZ" | "TIME WITH TIME ZONE" | "TIME WITHOUT TIME ZONE" => GenericType::Time,
        "TIMESTAMP" | "TIMESTAMPTZ" | "TIMESTAMP WITH TIME ZONE"
        | "TIMESTAMP WITHOUT TIME ZONE" | "DATETIME" => GenericType::DateTime,
        "UUID" => GenericType::Uuid,
        // JSON payloads cross the generator boundary as opaque strings.
        "JSON" | "JSONB" | "XML" => GenericType::String,
        "BYTEA" | "BLOB" | "BINARY" | "VARBINARY" => GenericType::Bytes,
        _ => GenericType::Object,
    }
}

/// Uppercase the name, drop length/precision arguments, collapse whitespace.
fn normalize_type_name(sql_type: &str) -> String {
    let mut stripped = String::with_capacity(sql_type.len());
    let mut depth = 0usize;
    for ch in sql_type.chars() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => stripped.push(ch.to_ascii_uppercase()),
            _ => {}
        }
    }
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
