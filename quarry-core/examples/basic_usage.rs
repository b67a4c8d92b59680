use quarry_core::{
    and, op, or, select, Conditions, DatabaseConfig, Operand, Postgres, RenderContext, TablePrefix,
};

fn main() -> quarry_core::Result<()> {
    let context = RenderContext::with_prefix("t_");

    // Fields, a join and nested conditions
    let orders = select("users", "u")
        .add_field_as("u", "id", "user_id")?
        .add_field("o", "total")
        .left_join("orders", "o", "o.uid = u.id")
        .equals("u.status", "active")
        .any_of(|group| group.greater_than("o.total", 100).is_null("o.coupon"))
        .order_by("o.total", "DESC")?
        .limit_from(20, 10);

    let rendered = context.render(&orders)?;
    println!("SELECT SQL: {}", rendered.sql);
    println!("Params: {:?}", rendered.params);

    // Aggregates with HAVING
    let per_tag = select("posts", "p")
        .add_field("p", "tag")
        .add_count("*", "posts")?
        .group_by("p.tag")
        .having(and().condition("posts", op::GTE, Operand::value(5))?);
    println!("Grouped SQL: {}", context.to_sql(&per_tag)?);

    // Sub-selects keep their parameters in placeholder order
    let banned = select("bans", "b")
        .add_field("b", "uid")
        .equals("b.active", true);
    let visible = select("users", "u")
        .add_fields("u")
        .not_in_select("u.id", banned)
        .group(or().equals("u.role", "admin").equals("u.role", "editor"));

    let postgres = RenderContext::new(Postgres, TablePrefix::new("app_"));
    let rendered = postgres.render(&visible)?;
    println!("PostgreSQL SQL: {}", rendered.sql);
    println!("Params: {:?}", rendered.params);

    // Context from configuration
    let config = DatabaseConfig::from_json(r#"{"table_prefix": "t_", "dialect": "sqlite"}"#)?;
    let sqlite = RenderContext::from_config(&config);
    println!("SQLite SQL: {}", sqlite.to_sql(&select("users", "u").add_fields("u").limit(5))?);

    Ok(())
}
