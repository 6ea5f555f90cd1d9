//! Builder-composed introspection queries, per engine.
//!
//! Two queries per engine: an identity query returning one `{id, name}` row
//! for the current database, and a catalog query joining table-level system
//! catalog rows with column-level rows into one row per (table, column)
//! pair. Both render through the generic
//! [`QueryBuilder`](sqlforge::QueryBuilder); the reduction in
//! [`introspect`](crate::introspect) relies only on the aliased column
//! names, so each engine's query maps its own catalog onto the same shape:
//! `table_id`, `table_schema`, `table_name`, `table_comment`, `column_id`,
//! `column_name`, `column_comment`, `is_primary_key`, `is_auto_increment`,
//! `is_nullable`, `data_type`, `length`, `precision`, `scale`.
//!
//! System catalog names are deliberately left unquoted: quoting would make
//! them case-sensitive on Oracle and PostgreSQL.

use sqlforge::{Engine, QueryBuilder, SqlError, SqlResult, qb};

/// Check that `engine` has catalog support registered.
pub fn supported(engine: Engine) -> SqlResult<()> {
    match engine {
        Engine::SqlServer | Engine::MySql | Engine::PostgreSql | Engine::Oracle => Ok(()),
        other => Err(SqlError::not_implemented(other.to_string())),
    }
}

/// The one-row `{id, name}` query identifying the current database.
pub fn identity_query(engine: Engine) -> SqlResult<QueryBuilder> {
    supported(engine)?;
    let q = match engine {
        Engine::SqlServer => {
            qb::builder(engine)?.select_raw("Db_Id() As id, Db_Name() As name")
        }
        Engine::MySql => qb::builder(engine)?
            .select_raw("Database() As id, Database() As name"),
        Engine::PostgreSql => qb::builder(engine)?
            .select_raw("oid As id, datname As name")
            .from("pg_database")
            .and_where("datname = current_database()"),
        Engine::Oracle => qb::builder(engine)?
            .select_raw("Sys_Context('USERENV', 'DB_NAME') As id")
            .select_raw("Sys_Context('USERENV', 'DB_NAME') As name")
            .from("dual"),
        _ => unreachable!("supported() gates the engine set"),
    };
    Ok(q)
}

/// The joined (table, column) catalog query.
pub fn catalog_query(engine: Engine) -> SqlResult<QueryBuilder> {
    supported(engine)?;
    match engine {
        Engine::SqlServer => sql_server_catalog(),
        Engine::MySql => mysql_catalog(),
        Engine::PostgreSql => postgresql_catalog(),
        Engine::Oracle => oracle_catalog(),
        _ => unreachable!("supported() gates the engine set"),
    }
}

fn sql_server_catalog() -> SqlResult<QueryBuilder> {
    Ok(qb::builder(Engine::SqlServer)?
        .select_raw("t.object_id As table_id")
        .select_raw("Schema_Name(t.schema_id) As table_schema")
        .select_raw("t.name As table_name")
        .select_raw("Cast(tp.value As NVarChar(500)) As table_comment")
        .select_raw("c.column_id As column_id")
        .select_raw("c.name As column_name")
        .select_raw("Cast(cp.value As NVarChar(500)) As column_comment")
        .select_raw("IsNull(pk.is_primary_key, 0) As is_primary_key")
        .select_raw("c.is_identity As is_auto_increment")
        .select_raw("c.is_nullable As is_nullable")
        .select_raw("ty.name As data_type")
        .select_raw("c.max_length As length")
        .select_raw("c.precision As precision")
        .select_raw("c.scale As scale")
        .from("sys.tables t")
        .inner_join("sys.columns c", "c.object_id = t.object_id")
        .inner_join("sys.types ty", "ty.user_type_id = c.user_type_id")
        .left_join(
            "sys.extended_properties tp",
            "tp.major_id = t.object_id And tp.minor_id = 0 And tp.name = 'MS_Description'",
        )
        .left_join(
            "sys.extended_properties cp",
            "cp.major_id = t.object_id And cp.minor_id = c.column_id And cp.name = 'MS_Description'",
        )
        .left_join(
            "(Select ic.object_id, ic.column_id, 1 As is_primary_key \
             From sys.index_columns ic \
             Inner Join sys.indexes i On i.object_id = ic.object_id And i.index_id = ic.index_id \
             Where i.is_primary_key = 1) pk",
            "pk.object_id = t.object_id And pk.column_id = c.column_id",
        )
        .order_by("t.object_id, c.column_id"))
}

fn mysql_catalog() -> SqlResult<QueryBuilder> {
    Ok(qb::builder(Engine::MySql)?
        .select_raw("t.table_name As table_id")
        .select_raw("t.table_schema As table_schema")
        .select_raw("t.table_name As table_name")
        .select_raw("t.table_comment As table_comment")
        .select_raw("c.ordinal_position As column_id")
        .select_raw("c.column_name As column_name")
        .select_raw("c.column_comment As column_comment")
        .select_raw("(c.column_key = 'PRI') As is_primary_key")
        .select_raw("(c.extra Like '%auto_increment%') As is_auto_increment")
        .select_raw("(c.is_nullable = 'YES') As is_nullable")
        .select_raw("c.data_type As data_type")
        .select_raw("c.character_maximum_length As length")
        .select_raw("c.numeric_precision As precision")
        .select_raw("c.numeric_scale As scale")
        .from("information_schema.tables t")
        .inner_join(
            "information_schema.columns c",
            "c.table_schema = t.table_schema And c.table_name = t.table_name",
        )
        .and_where("t.table_schema = Database()")
        .and_where("t.table_type = 'BASE TABLE'")
        .order_by("t.table_name, c.ordinal_position"))
}

fn postgresql_catalog() -> SqlResult<QueryBuilder> {
    Ok(qb::builder(Engine::PostgreSql)?
        .select_raw("c.oid As table_id")
        .select_raw("n.nspname As table_schema")
        .select_raw("c.relname As table_name")
        .select_raw("obj_description(c.oid) As table_comment")
        .select_raw("a.attnum As column_id")
        .select_raw("a.attname As column_name")
        .select_raw("col_description(c.oid, a.attnum) As column_comment")
        .select_raw("Coalesce(i.indisprimary, False) As is_primary_key")
        .select_raw(
            "(a.attidentity In ('a', 'd') Or Coalesce(pg_get_expr(ad.adbin, ad.adrelid), '') \
             Like 'nextval(%') As is_auto_increment",
        )
        .select_raw("Not a.attnotnull As is_nullable")
        .select_raw("format_type(a.atttypid, Null) As data_type")
        .select_raw("information_schema._pg_char_max_length(a.atttypid, a.atttypmod) As length")
        .select_raw("information_schema._pg_numeric_precision(a.atttypid, a.atttypmod) As precision")
        .select_raw("information_schema._pg_numeric_scale(a.atttypid, a.atttypmod) As scale")
        .from("pg_catalog.pg_class c")
        .inner_join("pg_catalog.pg_namespace n", "n.oid = c.relnamespace")
        .inner_join("pg_catalog.pg_attribute a", "a.attrelid = c.oid")
        .left_join(
            "pg_catalog.pg_attrdef ad",
            "ad.adrelid = c.oid And ad.adnum = a.attnum",
        )
        .left_join(
            "pg_catalog.pg_index i",
            "i.indrelid = c.oid And a.attnum = Any(i.indkey) And i.indisprimary",
        )
        .and_where("c.relkind = 'r'")
        .and_where("a.attnum > 0")
        .and_where("Not a.attisdropped")
        .where_eq("n.nspname", "public")
        .order_by("c.oid, a.attnum"))
}

fn oracle_catalog() -> SqlResult<QueryBuilder> {
    Ok(qb::builder(Engine::Oracle)?
        .select_raw("t.table_name As table_id")
        .select_raw("Sys_Context('USERENV', 'CURRENT_SCHEMA') As table_schema")
        .select_raw("t.table_name As table_name")
        .select_raw("tc.comments As table_comment")
        .select_raw("c.column_id As column_id")
        .select_raw("c.column_name As column_name")
        .select_raw("cc.comments As column_comment")
        .select_raw("Nvl2(pk.column_name, 1, 0) As is_primary_key")
        .select_raw("c.identity_column As is_auto_increment")
        .select_raw("Decode(c.nullable, 'Y', 1, 0) As is_nullable")
        .select_raw("c.data_type As data_type")
        .select_raw("c.data_length As length")
        .select_raw("c.data_precision As precision")
        .select_raw("c.data_scale As scale")
        .from("user_tables t")
        .inner_join("user_tab_columns c", "c.table_name = t.table_name")
        .left_join("user_tab_comments tc", "tc.table_name = t.table_name")
        .left_join(
            "user_col_comments cc",
            "cc.table_name = t.table_name And cc.column_name = c.column_name",
        )
        .left_join(
            "(Select cols.table_name, cols.column_name \
             From user_constraints cons \
             Inner Join user_cons_columns cols On cols.constraint_name = cons.constraint_name \
             Where cons.constraint_type = 'P') pk",
            "pk.table_name = t.table_name And pk.column_name = c.column_name",
        )
        .order_by("t.table_name, c.column_id"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_has_no_catalog() {
        assert!(supported(Engine::Sqlite).is_err());
        assert!(identity_query(Engine::Sqlite).is_err());
        assert!(catalog_query(Engine::Sqlite).is_err());
    }

    #[test]
    fn sql_server_queries_target_sys_catalogs() {
        let identity = identity_query(Engine::SqlServer).unwrap().render_select();
        assert_eq!(identity.sql, "Select Db_Id() As id, Db_Name() As name");

        let catalog = catalog_query(Engine::SqlServer).unwrap().render_select();
        assert!(catalog.sql.contains("From sys.tables t"));
        assert!(catalog.sql.contains("Inner Join sys.columns c On c.object_id = t.object_id"));
        assert!(catalog.sql.contains("Order By t.object_id, c.column_id"));
        assert!(catalog.params.is_empty());
    }

    #[test]
    fn postgresql_catalog_parameterizes_the_schema() {
        let catalog = catalog_query(Engine::PostgreSql).unwrap().render_select();
        assert!(catalog.sql.contains("From pg_catalog.pg_class c"));
        assert!(catalog.sql.contains("\"n\".\"nspname\" = @p0"));
        assert_eq!(catalog.params.len(), 1);
        assert_eq!(catalog.params[0].value.as_text(), Some("public"));
    }

    #[test]
    fn mysql_catalog_scopes_to_current_database() {
        let catalog = catalog_query(Engine::MySql).unwrap().render_select();
        assert!(catalog.sql.contains("From information_schema.tables t"));
        assert!(catalog.sql.contains("t.table_schema = Database()"));
        assert!(catalog.sql.contains("t.table_type = 'BASE TABLE'"));
    }

    #[test]
    fn oracle_catalog_reads_user_views() {
        let identity = identity_query(Engine::Oracle).unwrap().render_select();
        assert!(identity.sql.ends_with("From dual"));

        let catalog = catalog_query(Engine::Oracle).unwrap().render_select();
        assert!(catalog.sql.contains("From user_tables t"));
        assert!(catalog.sql.contains("constraint_type = 'P'"));
    }

    #[test]
    fn every_catalog_exposes_the_reduction_columns() {
        for engine in [Engine::SqlServer, Engine::MySql, Engine::PostgreSql, Engine::Oracle] {
            let sql = catalog_query(engine).unwrap().render_select().sql;
            for alias in [
                "table_id", "table_schema", "table_name", "table_comment", "column_id",
                "column_name", "column_comment", "is_primary_key", "is_auto_increment",
                "is_nullable", "data_type", "length", "precision", "scale",
            ] {
                assert!(sql.contains(&format!("As {alias}")), "{engine}: missing {alias}");
            }
        }
    }
}
