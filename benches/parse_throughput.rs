use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sqlschema::parse_schema;

fn example_ddl() -> &'static str {
    r#"
CREATE TABLE users (
    id SERIAL PRIMARY KEY,
    email VARCHAR(255) NOT NULL UNIQUE,
    display_name VARCHAR(120),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE categories (
    id SERIAL PRIMARY KEY,
    name VARCHAR(120) NOT NULL UNIQUE
);

CREATE TABLE posts (
    id BIGSERIAL PRIMARY KEY,
    user_id INT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    category_id INT REFERENCES categories(id),
    title VARCHAR(200) NOT NULL,
    body TEXT,
    tags TEXT[],
    metadata JSONB,
    published BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ
);

CREATE TABLE comments (
    id BIGSERIAL PRIMARY KEY,
    post_id BIGINT NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
    user_id INT NOT NULL REFERENCES users(id),
    body TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE post_likes (
    post_id BIGINT REFERENCES posts(id),
    user_id INT REFERENCES users(id)
);

CREATE INDEX idx_posts_user ON posts (user_id);
CREATE INDEX idx_posts_metadata ON posts USING GIN (metadata);
CREATE UNIQUE INDEX idx_comments_dedupe ON comments (post_id, user_id, created_at);

ALTER TABLE posts ADD CONSTRAINT chk_title_len CHECK (length(title) > 0);

CREATE OR REPLACE FUNCTION post_count(p_user_id INT)
RETURNS BIGINT
LANGUAGE plpgsql
AS $$
BEGIN
    RETURN (SELECT count(*) FROM posts WHERE user_id = p_user_id);
END;
$$;
"#
}

fn bench_parse_throughput(c: &mut Criterion) {
    let ddl = example_ddl();
    c.bench_function("parse_schema", |b| {
        b.iter(|| {
            let schema = parse_schema(black_box(ddl), "bench.sql");
            black_box(&schema);
        })
    });

    c.bench_function("relations", |b| {
        let schema = parse_schema(ddl, "bench.sql");
        b.iter(|| {
            let relations = schema.relations();
            black_box(&relations);
        })
    });
}

criterion_group!(benches, bench_parse_throughput);
criterion_main!(benches);
