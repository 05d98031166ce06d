#![allow(clippy::unwrap_used, clippy::expect_used)]

use sqlschema::{parse_schema, GenericType, IndexMethod};

const SHOP_SQL: &str = r#"
CREATE TABLE categories (
    id SERIAL PRIMARY KEY,
    name VARCHAR(120) NOT NULL UNIQUE,
    description TEXT
);

CREATE TABLE products (
    id BIGSERIAL PRIMARY KEY,
    category_id INT NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
    sku CHAR(12) NOT NULL,
    price NUMERIC(10,2) NOT NULL DEFAULT 0,
    tags TEXT[],
    attributes JSONB,
    in_stock BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ DEFAULT now(),
    CONSTRAINT uq_products_sku UNIQUE (sku),
    CHECK (price >= 0)
);

CREATE INDEX idx_products_category ON products (category_id);
CREATE INDEX idx_products_attrs ON products USING GIN (attributes);
"#;

#[test]
fn test_parse_tables_and_columns() {
    let schema = parse_schema(SHOP_SQL, "shop.sql");

    assert!(schema.warnings.is_empty(), "warnings: {:?}", schema.warnings);
    assert_eq!(schema.tables.len(), 2);
    assert_eq!(schema.source, "shop.sql");

    let categories = schema.table("categories").unwrap();
    assert_eq!(categories.primary_key_columns, vec!["id"]);

    let id = categories.column("id").unwrap();
    assert!(id.primary_key);
    assert!(id.auto_increment);
    assert!(!id.nullable);
    assert_eq!(id.generic_type, GenericType::Integer);

    let name = categories.column("name").unwrap();
    assert!(name.unique);
    assert!(!name.nullable);
    assert_eq!(name.length, Some(120));
    assert_eq!(name.generic_type, GenericType::String);

    let description = categories.column("description").unwrap();
    assert!(description.nullable);
    assert!(!description.unique);
}

#[test]
fn test_type_mapping_and_specs() {
    let schema = parse_schema(SHOP_SQL, "shop.sql");
    let products = schema.table("products").unwrap();

    let id = products.column("id").unwrap();
    assert_eq!(id.generic_type, GenericType::Long);
    assert!(id.auto_increment);

    let price = products.column("price").unwrap();
    assert_eq!(price.generic_type, GenericType::BigDecimal);
    assert_eq!(price.precision, Some(10));
    assert_eq!(price.scale, Some(2));
    assert_eq!(price.default.as_deref(), Some("0"));

    let tags = products.column("tags").unwrap();
    assert_eq!(
        tags.generic_type,
        GenericType::List(Box::new(GenericType::String))
    );

    let attributes = products.column("attributes").unwrap();
    assert_eq!(attributes.generic_type, GenericType::String);

    let in_stock = products.column("in_stock").unwrap();
    assert_eq!(in_stock.generic_type, GenericType::Boolean);
    assert_eq!(in_stock.default.as_deref(), Some("true"));

    let created_at = products.column("created_at").unwrap();
    assert_eq!(created_at.generic_type, GenericType::DateTime);
    assert_eq!(created_at.default.as_deref(), Some("now()"));
}

#[test]
fn test_table_level_constraints() {
    let schema = parse_schema(SHOP_SQL, "shop.sql");
    let products = schema.table("products").unwrap();

    // the single-column table-level UNIQUE flags the column itself
    assert!(products.column("sku").unwrap().unique);
    assert!(products.unique_constraints.contains(&vec!["sku".to_string()]));

    assert_eq!(products.check_constraints.len(), 1);
    assert!(products.check_constraints[0].contains("price"));

    let fk = &products.foreign_keys[0];
    assert_eq!(fk.column, "category_id");
    assert_eq!(fk.referenced_table, "categories");
    assert_eq!(fk.referenced_column, "id");
    assert_eq!(fk.on_delete, Some(sqlschema::ForeignKeyAction::Cascade));
    assert_eq!(fk.on_update, None);
}

#[test]
fn test_indexes_attach_to_their_table() {
    let schema = parse_schema(SHOP_SQL, "shop.sql");
    let products = schema.table("products").unwrap();

    assert_eq!(products.indexes.len(), 2);
    assert!(schema.standalone_indexes.is_empty());

    let by_category = products
        .indexes
        .iter()
        .find(|i| i.name == "idx_products_category")
        .unwrap();
    assert_eq!(by_category.columns, vec!["category_id"]);
    assert_eq!(by_category.method, IndexMethod::Btree);
    assert!(!by_category.unique);

    let by_attrs = products
        .indexes
        .iter()
        .find(|i| i.name == "idx_products_attrs")
        .unwrap();
    assert_eq!(by_attrs.method, IndexMethod::Gin);
}

#[test]
fn test_table_level_primary_key_overrides_inline_flags() {
    let schema = parse_schema(
        "CREATE TABLE t (a INT PRIMARY KEY, b INT NOT NULL, PRIMARY KEY (b));",
        "t.sql",
    );
    let table = schema.table("t").unwrap();

    assert_eq!(table.primary_key_columns, vec!["b"]);
    assert!(!table.column("a").unwrap().primary_key);
    assert!(table.column("b").unwrap().primary_key);
}

#[test]
fn test_composite_primary_key_flags_every_column() {
    let schema = parse_schema(
        "CREATE TABLE order_items (
            order_id INT,
            product_id INT,
            quantity INT NOT NULL,
            PRIMARY KEY (order_id, product_id)
        );",
        "items.sql",
    );
    let table = schema.table("order_items").unwrap();

    assert_eq!(table.primary_key_columns, vec!["order_id", "product_id"]);
    assert!(table.column("order_id").unwrap().primary_key);
    assert!(table.column("product_id").unwrap().primary_key);
    assert!(!table.column("quantity").unwrap().primary_key);
}

#[test]
fn test_malformed_statement_becomes_warning_not_error() {
    let schema = parse_schema(
        "CREATE TABLE a(id INT PRIMARY KEY); \
         CREATE TABL b(id INT); \
         CREATE TABLE c(id INT PRIMARY KEY);",
        "broken.sql",
    );

    assert_eq!(schema.tables.len(), 2);
    assert!(schema.table("a").is_some());
    assert!(schema.table("c").is_some());
    assert_eq!(schema.warnings.len(), 1);
    assert!(schema.warnings[0].contains("CREATE TABL"));
}

#[test]
fn test_schema_qualified_table_name() {
    let schema = parse_schema(
        "CREATE TABLE public.users(id INT PRIMARY KEY);",
        "qualified.sql",
    );
    let users = schema.table("users").unwrap();

    assert_eq!(users.name, "users");
    assert_eq!(users.schema.as_deref(), Some("public"));
}

#[test]
fn test_first_default_wins() {
    let schema = parse_schema("CREATE TABLE d(x INT DEFAULT 1 DEFAULT 2);", "d.sql");
    let x = schema.table("d").unwrap().column("x").unwrap();
    assert_eq!(x.default.as_deref(), Some("1"));
}

#[test]
fn test_auto_increment_column_spec() {
    let schema = parse_schema(
        "CREATE TABLE counters(id INT AUTO_INCREMENT PRIMARY KEY, value INT);",
        "counters.sql",
    );
    let id = schema.table("counters").unwrap().column("id").unwrap();
    assert!(id.auto_increment);
    assert!(id.primary_key);
}

#[test]
fn test_derived_names_and_business_columns() {
    let schema = parse_schema(SHOP_SQL, "shop.sql");

    let categories = schema.table("categories").unwrap();
    assert_eq!(categories.entity_name(), "Category");
    assert_eq!(categories.module_name(), "categories");

    let products = schema.table("products").unwrap();
    assert_eq!(products.entity_name(), "Product");

    // id (pk), category_id (fk), created_at (audit) are not business columns
    let business: Vec<&str> = products
        .business_columns()
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(business, vec!["sku", "price", "tags", "attributes", "in_stock"]);
}
