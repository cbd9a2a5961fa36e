use super::types::{Column, ForeignKey, Index, IndexColumn, Nullability, Table};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::fmt;

/// 括号内的数字列表或单引号字符串列表，例如 `(10,2)`、`('a','b')`
static LIST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\(\s*(\d+(?:\s*,\s*\d+)*|'[^']*'(?:\s*,\s*'[^']*')*)\s*\)")
        .expect("类型参数列表正则表达式无效")
});

static LIST_ITEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+|'[^']*'").expect("列表元素正则表达式无效"));

/// 模板渲染时使用的辅助函数集合，作为只读选项显式传入
#[derive(Clone, Copy)]
pub struct RenderHelpers {
    pub fmt_type: fn(&str) -> String,
    pub nullable: fn(Nullability) -> &'static str,
    pub upper: fn(&str) -> String,
}

impl Default for RenderHelpers {
    fn default() -> Self {
        Self {
            fmt_type,
            nullable,
            upper,
        }
    }
}

impl fmt::Debug for RenderHelpers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderHelpers").finish_non_exhaustive()
    }
}

/// 规范化类型参数列表的间距：`DECIMAL(10,2)` -> `DECIMAL(10, 2)`
pub fn fmt_type(s: &str) -> String {
    LIST_RE
        .replace_all(s, |caps: &Captures| {
            let items: Vec<&str> = LIST_ITEM_RE
                .find_iter(&caps[1])
                .map(|m| m.as_str())
                .collect();
            format!("({})", items.join(", "))
        })
        .into_owned()
}

pub fn nullable(n: Nullability) -> &'static str {
    match n {
        Nullability::Unspecified => "",
        Nullability::NotNull => "NOT NULL",
        Nullability::Null => "NULL",
    }
}

pub fn upper(s: &str) -> String {
    s.to_uppercase()
}

/// 模板输出的原始片段，每个定义片段按行分隔，尚未对齐
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Segments {
    pub begin: String,
    pub column_defs: String,
    pub index_defs: String,
    pub foreign_key_defs: String,
    pub end: String,
}

/// 把表定义渲染为原始片段
pub fn render(table: &Table, helpers: &RenderHelpers) -> Segments {
    Segments {
        begin: format!("CREATE TABLE {} (", table.qualified_name()),
        column_defs: table
            .columns
            .iter()
            .map(|c| column_def(c, helpers))
            .collect::<Vec<_>>()
            .join("\n"),
        index_defs: table
            .indices
            .iter()
            .map(index_def)
            .collect::<Vec<_>>()
            .join("\n"),
        foreign_key_defs: table
            .foreign_keys
            .iter()
            .map(foreign_key_def)
            .collect::<Vec<_>>()
            .join("\n"),
        end: end_clause(table),
    }
}

fn column_def(column: &Column, helpers: &RenderHelpers) -> String {
    let mut sql = format!("{} {}", column.name, (helpers.fmt_type)(&column.type_spec));

    if !column.attribute.is_empty() {
        sql.push_str(&format!(" {}", column.attribute));
    }
    if let Some(charset) = &column.charset {
        sql.push_str(&format!(" CHARACTER SET {charset}"));
    }
    if let Some(collate) = &column.collate {
        sql.push_str(&format!(" COLLATE {collate}"));
    }
    if let Some(generated) = &column.generated {
        sql.push_str(&format!(" {generated}"));
    }

    let nullable = (helpers.nullable)(column.nullable);
    if !nullable.is_empty() {
        sql.push_str(&format!(" {nullable}"));
    }

    if let Some(default) = &column.default_value {
        sql.push_str(&format!(" DEFAULT {default}"));
    }

    if column.auto_increment {
        sql.push_str(" AUTO_INCREMENT");
    }

    if let Some(on_update) = &column.on_update {
        sql.push_str(&format!(" ON UPDATE {}", (helpers.upper)(on_update)));
    }

    if let Some(comment) = &column.comment {
        sql.push_str(&format!(" COMMENT {}", quote_string(comment)));
    }

    sql.push(',');
    sql
}

fn index_def(index: &Index) -> String {
    let columns = index_columns(&index.columns);
    if index.primary {
        return format!("PRIMARY KEY ({columns}),");
    }

    let keyword = if index.unique {
        "UNIQUE KEY"
    } else if index.fulltext {
        "FULLTEXT KEY"
    } else {
        "KEY"
    };

    if index.name.is_empty() {
        format!("{keyword} ({columns}),")
    } else {
        format!("{keyword} {} ({columns}),", index.name)
    }
}

fn index_columns(columns: &[IndexColumn]) -> String {
    columns
        .iter()
        .map(|c| match c.prefix_length {
            Some(length) => format!("{}({length})", c.name),
            None => c.name.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn foreign_key_def(fk: &ForeignKey) -> String {
    let mut sql = String::from("FOREIGN KEY ");
    if !fk.name.is_empty() {
        sql.push_str(&format!("{} ", fk.name));
    }

    sql.push_str(&format!("({}) REFERENCES ", fk.columns.join(", ")));
    if let Some(schema) = &fk.ref_schema {
        sql.push_str(&format!("{schema}."));
    }
    sql.push_str(&format!("{} ({})", fk.ref_table, fk.ref_columns.join(", ")));

    if let Some(action) = fk.on_delete {
        sql.push_str(&format!(" ON DELETE {}", action.as_str()));
    }
    if let Some(action) = fk.on_update {
        sql.push_str(&format!(" ON UPDATE {}", action.as_str()));
    }

    sql.push(',');
    sql
}

fn end_clause(table: &Table) -> String {
    let options = &table.options;
    let mut sql = String::from(")");

    if let Some(engine) = &options.engine {
        sql.push_str(&format!(" ENGINE={engine}"));
    }
    if let Some(charset) = &options.charset {
        sql.push_str(&format!(" CHARACTER SET={charset}"));
    }
    if let Some(collate) = &options.collate {
        sql.push_str(&format!(" COLLATE={collate}"));
    }
    if let Some(row_format) = options.row_format {
        sql.push_str(&format!(" ROW_FORMAT={}", row_format.as_str()));
    }
    if let Some(n) = options.avg_row_length {
        sql.push_str(&format!(" AVG_ROW_LENGTH={n}"));
    }
    if let Some(n) = options.key_block_size {
        sql.push_str(&format!(" KEY_BLOCK_SIZE={n}"));
    }
    if let Some(n) = options.min_rows {
        sql.push_str(&format!(" MIN_ROWS={n}"));
    }
    if let Some(n) = options.max_rows {
        sql.push_str(&format!(" MAX_ROWS={n}"));
    }
    if let Some(n) = options.auto_increment {
        sql.push_str(&format!(" AUTO_INCREMENT={n}"));
    }
    if let Some(comment) = &options.comment {
        sql.push_str(&format!(" COMMENT={}", quote_string(comment)));
    }

    sql.push(';');
    sql
}

fn quote_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}
