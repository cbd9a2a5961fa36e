use super::tree::{
    ColumnNode, ColumnOption, Constraint, ConstraintKind, CreateTableStmt, KeyPart, OptionExpr,
    ReferOption, Reference, Statement, TableOption, TypeFlags,
};
use super::*;
use crate::error::SqlFmtError;

fn column(name: &str, type_spec: &str, options: Vec<ColumnOption>) -> ColumnNode {
    ColumnNode {
        name: name.to_string(),
        type_spec: type_spec.to_string(),
        flags: TypeFlags::default(),
        options,
    }
}

fn key(name: &str) -> KeyPart {
    KeyPart {
        column: name.to_string(),
        length: None,
    }
}

fn index_constraint(kind: ConstraintKind, name: &str, keys: Vec<KeyPart>) -> Constraint {
    Constraint {
        kind,
        name: name.to_string(),
        keys,
        refer: None,
    }
}

#[test]
fn test_build_assigns_ordinals() {
    let stmt = CreateTableStmt {
        name: "t".to_string(),
        columns: vec![
            column("a", "INT", vec![]),
            column("b", "INT", vec![]),
            column("c", "INT", vec![]),
        ],
        ..Default::default()
    };

    let table = build_create_table(&stmt);
    let ordinals: Vec<usize> = table.columns.iter().map(|c| c.ordinal).collect();
    assert_eq!(ordinals, vec![1, 2, 3]);
}

#[test]
fn test_inline_and_table_primary_key_are_equivalent() {
    let inline = CreateTableStmt {
        name: "t".to_string(),
        columns: vec![column("id", "INT", vec![ColumnOption::PrimaryKey])],
        ..Default::default()
    };
    let table_level = CreateTableStmt {
        name: "t".to_string(),
        columns: vec![column("id", "INT", vec![])],
        constraints: vec![index_constraint(
            ConstraintKind::PrimaryKey,
            "",
            vec![key("id")],
        )],
        ..Default::default()
    };

    let a = build_create_table(&inline);
    let b = build_create_table(&table_level);
    assert!(a.columns[0].primary_key);
    assert_eq!(a.columns, b.columns);
    assert_eq!(a.indices, b.indices);
    assert_eq!(a.indices.len(), 1);
    assert!(a.indices[0].primary);
}

#[test]
fn test_primary_key_matches_column_ignoring_case_and_quotes() {
    let stmt = CreateTableStmt {
        name: "t".to_string(),
        columns: vec![column("id", "INT", vec![]), column("name", "TEXT", vec![])],
        constraints: vec![index_constraint(
            ConstraintKind::PrimaryKey,
            "",
            vec![key("`ID`")],
        )],
        ..Default::default()
    };

    let table = build_create_table(&stmt);
    assert!(table.columns[0].primary_key);
    assert!(!table.columns[1].primary_key);
}

#[test]
fn test_inline_primary_keys_merge_into_one_index() {
    let stmt = CreateTableStmt {
        name: "t".to_string(),
        columns: vec![
            column("a", "INT", vec![ColumnOption::PrimaryKey]),
            column("b", "INT", vec![]),
            column("c", "INT", vec![ColumnOption::PrimaryKey]),
        ],
        ..Default::default()
    };

    let table = build_create_table(&stmt);
    assert_eq!(table.indices.len(), 1);
    let names: Vec<&str> = table.indices[0]
        .columns
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["a", "c"]);
}

#[test]
fn test_index_order() {
    let stmt = CreateTableStmt {
        name: "t".to_string(),
        columns: vec![
            column("id", "INT", vec![ColumnOption::PrimaryKey]),
            column("email", "VARCHAR(255)", vec![ColumnOption::Unique]),
            column("phone", "VARCHAR(20)", vec![ColumnOption::UniqueKey]),
            column("body", "TEXT", vec![]),
        ],
        constraints: vec![
            index_constraint(ConstraintKind::Key, "idx_body", vec![key("body")]),
            index_constraint(ConstraintKind::NoConstraint, "", vec![]),
            index_constraint(ConstraintKind::Fulltext, "ft_body", vec![key("body")]),
        ],
        ..Default::default()
    };

    let table = build_create_table(&stmt);
    assert_eq!(table.indices.len(), 5);
    assert!(table.indices[0].primary);
    assert!(table.indices[1].unique && table.indices[1].columns[0].name == "email");
    assert!(table.indices[2].unique && table.indices[2].columns[0].name == "phone");
    assert_eq!(table.indices[3].name, "idx_body");
    assert!(!table.indices[3].unique && !table.indices[3].fulltext);
    assert!(table.indices[4].fulltext);
}

#[test]
fn test_column_options_last_write_wins() {
    let stmt = CreateTableStmt {
        name: "t".to_string(),
        columns: vec![column(
            "status",
            "INT",
            vec![
                ColumnOption::Null,
                ColumnOption::DefaultValue(OptionExpr::Literal("0".to_string())),
                ColumnOption::NotNull,
                ColumnOption::DefaultValue(OptionExpr::Literal("1".to_string())),
                // 无法识别的取值不覆盖已有的默认值
                ColumnOption::DefaultValue(OptionExpr::Other),
                ColumnOption::Comment("first".to_string()),
                ColumnOption::Comment("second".to_string()),
            ],
        )],
        ..Default::default()
    };

    let table = build_create_table(&stmt);
    let status = &table.columns[0];
    assert_eq!(status.nullable, Nullability::NotNull);
    assert_eq!(status.default_value.as_deref(), Some("1"));
    assert_eq!(status.comment.as_deref(), Some("second"));
}

#[test]
fn test_on_update_function_call() {
    let stmt = CreateTableStmt {
        name: "t".to_string(),
        columns: vec![column(
            "updated_at",
            "TIMESTAMP",
            vec![
                ColumnOption::DefaultValue(OptionExpr::FunctionCall(
                    "CURRENT_TIMESTAMP".to_string(),
                )),
                ColumnOption::OnUpdate(OptionExpr::FunctionCall("current_timestamp".to_string())),
            ],
        )],
        ..Default::default()
    };

    let table = build_create_table(&stmt);
    let segments = render(&table, &RenderHelpers::default());
    assert_eq!(
        segments.column_defs,
        "updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,"
    );
}

#[test]
fn test_type_attribute_order() {
    let mut node = column("n", "INT(10)", vec![]);
    node.flags = TypeFlags {
        unsigned: true,
        zerofill: true,
        binary: false,
    };
    let stmt = CreateTableStmt {
        name: "t".to_string(),
        columns: vec![node],
        ..Default::default()
    };

    let table = build_create_table(&stmt);
    assert_eq!(table.columns[0].attribute, "UNSIGNED ZEROFILL");
}

#[test]
fn test_foreign_key_actions() {
    let stmt = CreateTableStmt {
        name: "orders".to_string(),
        columns: vec![column("user_id", "INT", vec![])],
        constraints: vec![Constraint {
            kind: ConstraintKind::ForeignKey,
            name: "fk_user".to_string(),
            keys: vec![key("user_id")],
            refer: Some(Reference {
                schema: Some("app".to_string()),
                table: "users".to_string(),
                columns: vec!["id".to_string()],
                on_update: Some(ReferOption::SetDefault),
                on_delete: Some(ReferOption::Cascade),
            }),
        }],
        ..Default::default()
    };

    let table = build_create_table(&stmt);
    assert!(table.indices.is_empty());
    let fk = &table.foreign_keys[0];
    assert_eq!(fk.on_delete, Some(ReferentialAction::Cascade));
    // SET DEFAULT 不被支持，视为未设置
    assert_eq!(fk.on_update, None);

    let segments = render(&table, &RenderHelpers::default());
    assert_eq!(
        segments.foreign_key_defs,
        "FOREIGN KEY fk_user (user_id) REFERENCES app.users (id) ON DELETE CASCADE,"
    );
}

#[test]
fn test_table_options_last_write_wins() {
    let stmt = CreateTableStmt {
        name: "t".to_string(),
        columns: vec![column("id", "INT", vec![])],
        options: vec![
            TableOption::Engine("MyISAM".to_string()),
            TableOption::Engine("InnoDB".to_string()),
            TableOption::RowFormat("dynamic".to_string()),
            TableOption::RowFormat("bogus".to_string()),
            TableOption::CheckSum(1),
            TableOption::AutoIncrement(100),
            TableOption::Comment("it's".to_string()),
        ],
        ..Default::default()
    };

    let table = build_create_table(&stmt);
    assert_eq!(table.options.engine.as_deref(), Some("InnoDB"));
    assert_eq!(table.options.row_format, Some(RowFormat::Dynamic));
    assert_eq!(table.options.auto_increment, Some(100));

    let segments = render(&table, &RenderHelpers::default());
    assert_eq!(
        segments.end,
        ") ENGINE=InnoDB ROW_FORMAT=DYNAMIC AUTO_INCREMENT=100 COMMENT='it''s';"
    );
}

#[test]
fn test_build_table_rejects_other_statement() {
    let err = build_table(&Statement::Other("SELECT 1".to_string())).unwrap_err();
    assert!(matches!(err, SqlFmtError::UnsupportedStatement(_)));
}

#[test]
fn test_pretty_without_keys() {
    let segments = Segments {
        begin: "CREATE TABLE t (".to_string(),
        column_defs: "a INT,\nlong_name VARCHAR(10) NOT NULL,".to_string(),
        end: ");".to_string(),
        ..Default::default()
    };

    let output = pretty(&segments, &FormatOptions::default());
    assert_eq!(
        output,
        "CREATE TABLE t (\n    a          INT,\n    long_name  VARCHAR(10) NOT NULL\n);"
    );
}

#[test]
fn test_pretty_foreign_keys_without_indexes() {
    let segments = Segments {
        begin: "CREATE TABLE t (".to_string(),
        column_defs: "a INT,".to_string(),
        foreign_key_defs: "FOREIGN KEY (a) REFERENCES p (id),".to_string(),
        end: ");".to_string(),
        ..Default::default()
    };

    let output = pretty(&segments, &FormatOptions::default());
    assert_eq!(
        output,
        "CREATE TABLE t (\n    a  INT,\n    FOREIGN KEY (a) REFERENCES p (id)\n);"
    );
}

#[test]
fn test_pretty_custom_layout() {
    let segments = Segments {
        begin: "CREATE TABLE t (".to_string(),
        column_defs: "a INT,".to_string(),
        index_defs: "PRIMARY KEY (a),".to_string(),
        end: ");".to_string(),
        ..Default::default()
    };
    let options = FormatOptions {
        indent: 2,
        column_gap: 1,
        ..Default::default()
    };

    let output = pretty(&segments, &options);
    assert_eq!(output, "CREATE TABLE t (\n  a INT,\n  PRIMARY KEY (a)\n);");
}

#[test]
fn test_format_users_table() {
    let sql = "CREATE TABLE users (id INT PRIMARY KEY AUTO_INCREMENT, name VARCHAR(255) NOT NULL, email VARCHAR(255) UNIQUE)";

    let output = format(sql).unwrap();
    println!("{output}");

    let expected = [
        "CREATE TABLE users (",
        "    id     INT AUTO_INCREMENT,",
        "    name   VARCHAR(255) NOT NULL,",
        "    email  VARCHAR(255),",
        "    PRIMARY KEY (id),",
        "    UNIQUE KEY  (email)",
        ");",
    ]
    .join("\n");
    assert_eq!(output, expected);
}

#[test]
fn test_format_keeps_engine_and_skips_column_auto_increment() {
    let sql = "CREATE TABLE users (id INT NOT NULL AUTO_INCREMENT, PRIMARY KEY (id)) ENGINE=InnoDB";

    let output = format(sql).unwrap();
    println!("{output}");

    let last = output.lines().last().unwrap();
    assert!(last.starts_with(')'));
    assert!(last.contains("ENGINE=InnoDB"));
    assert!(!last.contains("AUTO_INCREMENT"));
    assert!(last.ends_with(';'));
}

#[test]
fn test_format_foreign_key_after_indexes() {
    let sql = r#"
CREATE TABLE orders (
    id INT NOT NULL,
    user_id INT,
    PRIMARY KEY (id),
    KEY idx_user (user_id),
    FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE
)"#;

    let output = format(sql).unwrap();
    println!("{output}");

    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[1], "    id       INT NOT NULL,");
    assert_eq!(lines[2], "    user_id  INT,");
    assert_eq!(lines[3], "    PRIMARY KEY (id),");
    assert_eq!(lines[4], "    KEY         idx_user (user_id),");
    assert_eq!(
        lines[5],
        "    FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE"
    );
    assert_eq!(lines[6], ");");
}

#[test]
fn test_format_prefix_length_index() {
    let sql = "CREATE TABLE posts (title VARCHAR(255), KEY idx_title (title(10)))";

    let table = parse_table(sql).unwrap();
    assert_eq!(table.indices[0].columns[0].name, "title");
    assert_eq!(table.indices[0].columns[0].prefix_length, Some(10));

    let output = format(sql).unwrap();
    assert!(output.contains("KEY idx_title (title(10))"));
}

#[test]
fn test_format_aligns_column_types() {
    let sql = "CREATE TABLE t (a INT, bbbbbb DECIMAL(10,2), cc TEXT)";

    let output = format(sql).unwrap();
    println!("{output}");

    let starts: Vec<usize> = output
        .lines()
        .skip(1)
        .take(3)
        .map(|line| {
            let line = line.trim_start();
            let name_end = line.find(' ').unwrap();
            let type_start = line[name_end..].find(|c: char| c != ' ').unwrap();
            name_end + type_start
        })
        .collect();
    assert_eq!(starts, vec![8, 8, 8]);
    assert!(output.contains("DECIMAL(10, 2)"));
}

#[test]
fn test_format_is_idempotent() {
    let cases = [
        "CREATE TABLE users (id INT PRIMARY KEY AUTO_INCREMENT, name VARCHAR(255) NOT NULL DEFAULT 'x', email VARCHAR(255) UNIQUE)",
        "CREATE TABLE t (a INT, CONSTRAINT fk1 FOREIGN KEY (a) REFERENCES t2(b) ON DELETE CASCADE)",
        "CREATE TABLE posts (id INT NOT NULL, title VARCHAR(255) COMMENT 'it''s', UNIQUE KEY uk (id, title(5)), KEY ix (title(10) DESC)) COMMENT='posts'",
        "CREATE TABLE t (a INT, c VARCHAR(10) CHARACTER SET utf8 COLLATE utf8_bin NOT NULL, b INT AS (a + 1) STORED)",
    ];

    for sql in cases {
        let once = format(sql).unwrap();
        println!("{once}");
        let twice = format(&once).unwrap();
        assert_eq!(once, twice);
    }
}

#[test]
fn test_format_named_foreign_key_survives_reformat() {
    let sql = "CREATE TABLE t (a INT, CONSTRAINT fk1 FOREIGN KEY (a) REFERENCES t2(b) ON DELETE CASCADE)";

    let once = format(sql).unwrap();
    let table = parse_table(&once).unwrap();
    assert_eq!(table.foreign_keys[0].name, "fk1");
}

#[test]
fn test_format_composite_unique_with_prefix() {
    let sql = "CREATE TABLE t (a VARCHAR(20), b INT, UNIQUE KEY uk (b, a(5)))";

    let table = parse_table(sql).unwrap();
    let columns = &table.indices[0].columns;
    assert_eq!(columns[0], IndexColumn::new("b"));
    assert_eq!(columns[1].name, "a");
    assert_eq!(columns[1].prefix_length, Some(5));

    let output = format(sql).unwrap();
    assert_eq!(output.lines().nth(3), Some("    UNIQUE KEY uk (b, a(5))"));
}

#[test]
fn test_format_drops_sort_order() {
    let sql = "CREATE TABLE t (d INT, INDEX ix (d DESC))";

    let table = parse_table(sql).unwrap();
    assert_eq!(table.indices[0].name, "ix");
    assert_eq!(table.indices[0].columns, vec![IndexColumn::new("d")]);
    assert!(format(sql).unwrap().contains("KEY ix (d)"));
}

#[test]
fn test_format_column_unique_key() {
    let table = parse_table("CREATE TABLE t (a INT UNIQUE KEY)").unwrap();
    assert!(table.columns[0].unique);
    assert_eq!(table.indices.len(), 1);
    assert!(table.indices[0].unique);
}

#[test]
fn test_format_keeps_column_charset() {
    let sql = "CREATE TABLE t (c VARCHAR(10) CHARACTER SET utf8 COLLATE utf8_bin NOT NULL)";

    let output = format(sql).unwrap();
    assert_eq!(
        output.lines().nth(1),
        Some("    c  VARCHAR(10) CHARACTER SET utf8 COLLATE utf8_bin NOT NULL")
    );
}

#[test]
fn test_format_keeps_generated_column_and_drops_check() {
    let sql = "CREATE TABLE t (a INT, b INT AS (a + 1) STORED, CHECK (a > 0))";

    let output = format(sql).unwrap();
    println!("{output}");
    assert_eq!(
        output,
        "CREATE TABLE t (\n    a  INT,\n    b  INT AS (a + 1) STORED\n);"
    );
}

#[test]
fn test_parse_table_keeps_source_and_schema() {
    let sql = "CREATE TABLE app.users (id INT)";

    let table = parse_table(sql).unwrap();
    assert_eq!(table.schema.as_deref(), Some("app"));
    assert_eq!(table.name, "users");
    assert_eq!(table.sql, sql);
    assert_eq!(table.columns[0].name, "id");
}

#[test]
fn test_format_rejects_select() {
    let err = format("SELECT 1").unwrap_err();
    println!("{err}");
    assert!(matches!(err, SqlFmtError::UnsupportedStatement(_)));
}

#[test]
fn test_format_rejects_malformed_sql() {
    let err = format("CREATE TABLE (").unwrap_err();
    assert!(matches!(err, SqlFmtError::Parse(_)));

    let err = format("").unwrap_err();
    assert!(matches!(err, SqlFmtError::Parse(_)));
}

#[test]
fn test_format_rejects_multiple_statements() {
    let err = format("CREATE TABLE a (id INT); CREATE TABLE b (id INT);").unwrap_err();
    assert!(matches!(err, SqlFmtError::Parse(_)));
}

#[test]
fn test_format_named_foreign_key_is_last() {
    let sql = "CREATE TABLE t1 (a INT, KEY idx_a (a), CONSTRAINT fk1 FOREIGN KEY (a) REFERENCES t2(b) ON DELETE CASCADE)";

    let table = parse_table(sql).unwrap();
    let fk = &table.foreign_keys[0];
    assert_eq!(fk.name, "fk1");
    assert_eq!(fk.ref_table, "t2");
    assert_eq!(fk.ref_columns, vec!["b"]);
    assert_eq!(fk.on_delete, Some(ReferentialAction::Cascade));
    assert_eq!(fk.on_update, None);

    let output = format(sql).unwrap();
    println!("{output}");

    let lines: Vec<&str> = output.lines().collect();
    let n = lines.len();
    assert_eq!(lines[n - 3], "    KEY         idx_a (a),");
    assert_eq!(
        lines[n - 2],
        "    FOREIGN KEY fk1 (a) REFERENCES t2 (b) ON DELETE CASCADE"
    );
    assert_eq!(lines[n - 1], ");");
}
