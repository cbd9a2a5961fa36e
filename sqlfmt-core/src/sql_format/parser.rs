use super::rewrite::{Rewritten, rewrite};
use super::tree::{
    ColumnNode, ColumnOption, Constraint, ConstraintKind, CreateTableStmt, KeyPart, OptionExpr,
    ReferOption, Reference, Statement, TableOption, TypeFlags,
};
use crate::error::{Result, SqlFmtError};
use sqlparser::ast::{
    self, ColumnDef, CommentDef, CreateTable, CreateTableOptions, Expr, GeneratedExpressionMode,
    KeyOrIndexDisplay, ObjectName, ReferentialAction, SqlOption, TableConstraint, Value,
};
use sqlparser::dialect::MySqlDialect;
use sqlparser::parser::Parser;
use std::fmt::Display;
use tracing::{debug, warn};

/// 解析一条 SQL 语句，语句数量不为 1 时返回解析错误
pub fn parse_one_statement(sql: &str) -> Result<Statement> {
    let rewritten = rewrite(sql)?;
    let dialect = MySqlDialect {};
    let mut statements = Parser::parse_sql(&dialect, &rewritten.sql)?;

    if statements.len() != 1 {
        return Err(SqlFmtError::parse(format!(
            "期望一条 SQL 语句，实际为 {} 条",
            statements.len()
        )));
    }

    match statements.remove(0) {
        ast::Statement::CreateTable(create_table) => {
            debug!("解析 CREATE TABLE 语句: {}", create_table.name);
            Ok(Statement::CreateTable(lower_create_table(
                &create_table,
                &rewritten,
            )))
        }
        other => Ok(Statement::Other(statement_keyword(&other))),
    }
}

fn lower_create_table(create_table: &CreateTable, rewritten: &Rewritten) -> CreateTableStmt {
    let (schema, name) = split_object_name(&create_table.name);

    let columns = create_table
        .columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let mut node = lower_column(column);
            if let Some(markers) = rewritten.column_markers.get(i) {
                node.options.extend(markers.iter().cloned());
            }
            node
        })
        .collect();

    let constraints = create_table
        .constraints
        .iter()
        .enumerate()
        .filter_map(|(i, constraint)| {
            let keys = rewritten.constraint_keys.get(i).and_then(|k| k.as_deref());
            lower_constraint(constraint, keys)
        })
        .collect();

    CreateTableStmt {
        schema,
        name,
        columns,
        constraints,
        options: table_sql_options(&create_table.table_options)
            .iter()
            .map(lower_table_option)
            .collect(),
    }
}

/// 语句的前两个关键字，例如 "DROP TABLE"
fn statement_keyword(statement: &ast::Statement) -> String {
    statement
        .to_string()
        .split_whitespace()
        .take(2)
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// 拆分 schema 限定的名称，最后一段为对象名
fn split_object_name(name: &ObjectName) -> (Option<String>, String) {
    let mut parts: Vec<String> = name.0.iter().map(|part| part.to_string()).collect();
    let object = parts.pop().unwrap_or_default();
    let schema = if parts.is_empty() {
        None
    } else {
        Some(parts.join("."))
    };
    (schema, object)
}

fn display_all<T: Display>(items: &[T]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

fn lower_column(column: &ColumnDef) -> ColumnNode {
    let (type_spec, flags) = split_type_flags(&column.data_type.to_string());

    ColumnNode {
        name: column.name.to_string(),
        type_spec,
        flags,
        options: column
            .options
            .iter()
            .map(|def| lower_column_option(&column.name.value, &def.option))
            .collect(),
    }
}

fn lower_column_option(column: &str, option: &ast::ColumnOption) -> ColumnOption {
    match option {
        ast::ColumnOption::Null => ColumnOption::Null,
        ast::ColumnOption::NotNull => ColumnOption::NotNull,
        ast::ColumnOption::Default(expr) => ColumnOption::DefaultValue(lower_option_expr(expr)),
        ast::ColumnOption::OnUpdate(expr) => ColumnOption::OnUpdate(lower_option_expr(expr)),
        ast::ColumnOption::Unique { is_primary, .. } => {
            if *is_primary {
                ColumnOption::PrimaryKey
            } else {
                ColumnOption::Unique
            }
        }
        ast::ColumnOption::Comment(comment) => ColumnOption::Comment(comment.clone()),
        ast::ColumnOption::CharacterSet(charset) => ColumnOption::Charset(charset.to_string()),
        ast::ColumnOption::Collation(collate) => ColumnOption::Collate(collate.to_string()),
        ast::ColumnOption::Generated {
            generation_expr: Some(expr),
            generation_expr_mode,
            generated_keyword,
            ..
        } => {
            let prefix = if *generated_keyword {
                "GENERATED ALWAYS AS"
            } else {
                "AS"
            };
            let mode = match generation_expr_mode {
                Some(GeneratedExpressionMode::Virtual) => " VIRTUAL",
                Some(GeneratedExpressionMode::Stored) => " STORED",
                None => "",
            };
            ColumnOption::Generated(format!("{prefix} ({expr}){mode}"))
        }
        ast::ColumnOption::DialectSpecific(tokens) => {
            // MySQL 的 AUTO_INCREMENT 以方言 token 的形式出现
            let token_str = tokens
                .iter()
                .map(|t| t.to_string())
                .collect::<Vec<_>>()
                .join(" ")
                .to_uppercase();
            if token_str.contains("AUTO_INCREMENT") {
                ColumnOption::AutoIncrement
            } else {
                warn!("列 {} 的选项 {} 不会出现在格式化结果中", column, token_str);
                ColumnOption::NoOption
            }
        }
        other => {
            warn!("列 {} 的选项 {} 不会出现在格式化结果中", column, other);
            ColumnOption::NoOption
        }
    }
}

fn lower_option_expr(expr: &Expr) -> OptionExpr {
    match expr {
        Expr::Function(function) => OptionExpr::FunctionCall(function.name.to_string()),
        other => OptionExpr::Literal(other.to_string()),
    }
}

fn lower_constraint(constraint: &TableConstraint, keys: Option<&[KeyPart]>) -> Option<Constraint> {
    let lowered = match constraint {
        TableConstraint::PrimaryKey {
            name,
            index_name,
            columns,
            ..
        } => index_constraint(
            ConstraintKind::PrimaryKey,
            index_name.as_ref().or(name.as_ref()),
            &display_all(columns),
            keys,
        ),
        TableConstraint::Unique {
            name,
            index_name,
            index_type_display,
            columns,
            ..
        } => {
            let kind = match index_type_display {
                KeyOrIndexDisplay::Key => ConstraintKind::UniqueKey,
                KeyOrIndexDisplay::Index => ConstraintKind::UniqueIndex,
                KeyOrIndexDisplay::None => ConstraintKind::Unique,
            };
            index_constraint(
                kind,
                index_name.as_ref().or(name.as_ref()),
                &display_all(columns),
                keys,
            )
        }
        TableConstraint::Index {
            display_as_key,
            name,
            columns,
            ..
        } => {
            let kind = if *display_as_key {
                ConstraintKind::Key
            } else {
                ConstraintKind::Index
            };
            index_constraint(kind, name.as_ref(), &display_all(columns), keys)
        }
        TableConstraint::FulltextOrSpatial {
            fulltext: true,
            opt_index_name,
            columns,
            ..
        } => index_constraint(
            ConstraintKind::Fulltext,
            opt_index_name.as_ref(),
            &display_all(columns),
            keys,
        ),
        TableConstraint::ForeignKey {
            name,
            index_name,
            columns,
            foreign_table,
            referred_columns,
            on_delete,
            on_update,
            ..
        } => {
            let (schema, table) = split_object_name(foreign_table);
            Constraint {
                kind: ConstraintKind::ForeignKey,
                name: name
                    .as_ref()
                    .or(index_name.as_ref())
                    .map(|n| n.to_string())
                    .unwrap_or_default(),
                keys: display_all(columns)
                    .into_iter()
                    .map(|column| KeyPart {
                        column,
                        length: None,
                    })
                    .collect(),
                refer: Some(Reference {
                    schema,
                    table,
                    columns: display_all(referred_columns),
                    on_update: on_update.as_ref().map(refer_option),
                    on_delete: on_delete.as_ref().map(refer_option),
                }),
            }
        }
        other => {
            warn!("表约束 {} 不会出现在格式化结果中", other);
            return None;
        }
    };
    Some(lowered)
}

/// 索引列优先使用改写阶段记录的前缀长度
fn index_constraint<N: Display>(
    kind: ConstraintKind,
    name: Option<&N>,
    columns: &[String],
    keys: Option<&[KeyPart]>,
) -> Constraint {
    let keys = match keys {
        Some(keys) if keys.len() == columns.len() => keys.to_vec(),
        _ => columns.iter().map(|c| key_part(c)).collect(),
    };

    Constraint {
        kind,
        name: name.map(|n| n.to_string()).unwrap_or_default(),
        keys,
        refer: None,
    }
}

fn refer_option(action: &ReferentialAction) -> ReferOption {
    match action {
        ReferentialAction::Restrict => ReferOption::Restrict,
        ReferentialAction::Cascade => ReferOption::Cascade,
        ReferentialAction::SetNull => ReferOption::SetNull,
        ReferentialAction::NoAction => ReferOption::NoAction,
        ReferentialAction::SetDefault => ReferOption::SetDefault,
    }
}

/// 把列类型末尾的 UNSIGNED / ZEROFILL / BINARY 提取为标志位
pub(crate) fn split_type_flags(type_text: &str) -> (String, TypeFlags) {
    let mut flags = TypeFlags::default();
    let mut type_spec = type_text.trim();

    while let Some((head, last)) = type_spec.rsplit_once(char::is_whitespace) {
        match last.to_ascii_uppercase().as_str() {
            "UNSIGNED" => flags.unsigned = true,
            "ZEROFILL" => flags.zerofill = true,
            "BINARY" => flags.binary = true,
            _ => break,
        }
        type_spec = head.trim_end();
    }

    (type_spec.to_string(), flags)
}

/// 解析索引列文本，`name(10)` 中的 10 为前缀长度
pub(crate) fn key_part(text: &str) -> KeyPart {
    let mut column = text.trim();
    for suffix in [" ASC", " DESC"] {
        if let Some(tail) = column.get(column.len().saturating_sub(suffix.len())..) {
            if tail.eq_ignore_ascii_case(suffix) {
                column = column[..column.len() - suffix.len()].trim_end();
            }
        }
    }

    if let Some((name, rest)) = column.strip_suffix(')').and_then(|s| s.rsplit_once('(')) {
        if let Ok(length) = rest.trim().parse::<u32>() {
            return KeyPart {
                column: name.trim_end().to_string(),
                length: Some(length),
            };
        }
    }

    KeyPart {
        column: column.to_string(),
        length: None,
    }
}

fn table_sql_options(options: &CreateTableOptions) -> &[SqlOption] {
    match options {
        CreateTableOptions::None => &[],
        CreateTableOptions::With(options)
        | CreateTableOptions::Options(options)
        | CreateTableOptions::Plain(options)
        | CreateTableOptions::TableProperties(options) => options,
    }
}

fn lower_table_option(option: &SqlOption) -> TableOption {
    match option {
        SqlOption::NamedParenthesizedList(list) => match &list.name {
            Some(name) => table_option(&list.key.value, name.value.clone()),
            None => {
                debug!("忽略表选项: {}", option);
                TableOption::None
            }
        },
        SqlOption::KeyValue { key, value } => table_option(&key.value, option_text(value)),
        SqlOption::Comment(CommentDef::WithEq(comment) | CommentDef::WithoutEq(comment)) => {
            TableOption::Comment(comment.clone())
        }
        other => {
            debug!("忽略表选项: {}", other);
            TableOption::None
        }
    }
}

/// 表选项的取值文本，字符串去掉引号
fn option_text(value: &Expr) -> String {
    match value {
        Expr::Value(value) => match &value.value {
            Value::SingleQuotedString(s) | Value::DoubleQuotedString(s) => s.clone(),
            other => other.to_string(),
        },
        Expr::Identifier(ident) => ident.value.clone(),
        other => other.to_string(),
    }
}

/// 按选项名转换表选项
pub(crate) fn table_option(key: &str, value: String) -> TableOption {
    let key = key
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_uppercase();

    match key.as_str() {
        "ENGINE" => TableOption::Engine(value),
        "CHARSET" | "CHARACTER SET" | "DEFAULT CHARSET" | "DEFAULT CHARACTER SET" => {
            TableOption::Charset(value)
        }
        "COLLATE" | "DEFAULT COLLATE" => TableOption::Collate(value),
        "AUTO_INCREMENT" => numeric_option(&key, &value, TableOption::AutoIncrement),
        "COMMENT" => TableOption::Comment(value),
        "AVG_ROW_LENGTH" => numeric_option(&key, &value, TableOption::AvgRowLength),
        "CHECKSUM" => numeric_option(&key, &value, TableOption::CheckSum),
        "COMPRESSION" => TableOption::Compression(value),
        "CONNECTION" => TableOption::Connection(value),
        "PASSWORD" => TableOption::Password(value),
        "KEY_BLOCK_SIZE" => numeric_option(&key, &value, TableOption::KeyBlockSize),
        "MAX_ROWS" => numeric_option(&key, &value, TableOption::MaxRows),
        "MIN_ROWS" => numeric_option(&key, &value, TableOption::MinRows),
        "DELAY_KEY_WRITE" => numeric_option(&key, &value, TableOption::DelayKeyWrite),
        "ROW_FORMAT" => TableOption::RowFormat(value),
        "STATS_PERSISTENT" => TableOption::StatsPersistent,
        _ => {
            debug!("忽略表选项: {} = {}", key, value);
            TableOption::None
        }
    }
}

fn numeric_option(key: &str, value: &str, build: fn(u64) -> TableOption) -> TableOption {
    match value.parse::<u64>() {
        Ok(n) => build(n),
        Err(_) => {
            debug!("表选项 {} 的值不是数字: {}", key, value);
            TableOption::None
        }
    }
}
