use super::tree::{
    ColumnNode, ColumnOption, Constraint, ConstraintKind, CreateTableStmt, OptionExpr,
    ReferOption, Statement, TableOption, TypeFlags,
};
use super::types::{
    Column, ForeignKey, Index, IndexColumn, Nullability, ReferentialAction, RowFormat, Table,
    TableOptions,
};
use crate::constants::keywords::TYPE_ATTRIBUTES;
use crate::error::{Result, SqlFmtError};
use tracing::debug;

/// 把语句树转换为表定义，非 CREATE TABLE 语句返回 UnsupportedStatement
pub fn build_table(statement: &Statement) -> Result<Table> {
    match statement {
        Statement::CreateTable(stmt) => Ok(build_create_table(stmt)),
        Statement::Other(kind) => Err(SqlFmtError::unsupported(kind.clone())),
    }
}

/// 构建表定义
pub fn build_create_table(stmt: &CreateTableStmt) -> Table {
    let mut table = Table {
        schema: stmt.schema.clone(),
        name: stmt.name.clone(),
        columns: stmt.columns.iter().map(build_column).collect(),
        ..Default::default()
    };

    // 列级别的主键合并为一个复合主键索引
    let primary_columns: Vec<IndexColumn> = table
        .columns
        .iter()
        .filter(|c| c.primary_key)
        .map(|c| IndexColumn::new(c.name.clone()))
        .collect();
    if !primary_columns.is_empty() {
        table.indices.push(Index {
            primary: true,
            columns: primary_columns,
            ..Default::default()
        });
    }

    // 列级别的唯一约束各自成为一个索引
    for column in table.columns.iter().filter(|c| c.unique) {
        table.indices.push(Index {
            unique: true,
            columns: vec![IndexColumn::new(column.name.clone())],
            ..Default::default()
        });
    }

    for constraint in &stmt.constraints {
        match constraint.kind {
            ConstraintKind::NoConstraint => {}
            ConstraintKind::ForeignKey => table.foreign_keys.push(build_foreign_key(constraint)),
            _ => table.indices.push(build_index(constraint)),
        }
    }

    // 标记主键约束涉及的列（覆盖只在表级别声明主键的情况）
    let primary_names: Vec<String> = table
        .indices
        .iter()
        .filter(|idx| idx.primary)
        .flat_map(|idx| idx.columns.iter().map(|c| c.name.clone()))
        .collect();
    for name in &primary_names {
        if let Some(column) = table.column_mut(name) {
            column.primary_key = true;
        }
    }

    for (i, column) in table.columns.iter_mut().enumerate() {
        column.ordinal = i + 1;
    }

    table.options = stmt.options.iter().fold(TableOptions::default(), apply_table_option);

    debug!(
        "构建表 {}: {} 列, {} 个索引, {} 个外键",
        table.qualified_name(),
        table.columns.len(),
        table.indices.len(),
        table.foreign_keys.len()
    );
    table
}

fn build_column(node: &ColumnNode) -> Column {
    let column = Column {
        name: node.name.clone(),
        type_spec: node.type_spec.clone(),
        attribute: type_attribute(node.flags),
        ..Default::default()
    };

    node.options.iter().fold(column, apply_column_option)
}

/// 按出现顺序应用列选项，同一字段后出现的选项覆盖先出现的
fn apply_column_option(mut column: Column, option: &ColumnOption) -> Column {
    match option {
        ColumnOption::PrimaryKey => column.primary_key = true,
        ColumnOption::NotNull => column.nullable = Nullability::NotNull,
        ColumnOption::Null => column.nullable = Nullability::Null,
        ColumnOption::AutoIncrement => column.auto_increment = true,
        ColumnOption::DefaultValue(expr) => {
            if let Some(value) = option_value(expr) {
                column.default_value = Some(value);
            }
        }
        ColumnOption::Unique | ColumnOption::UniqueKey | ColumnOption::UniqueIndex => {
            column.unique = true
        }
        ColumnOption::Comment(comment) => column.comment = Some(comment.clone()),
        ColumnOption::Charset(charset) => column.charset = Some(charset.clone()),
        ColumnOption::Collate(collate) => column.collate = Some(collate.clone()),
        ColumnOption::Generated(expr) => column.generated = Some(expr.clone()),
        // 只对 TIMESTAMP / DATETIME 有意义，这里不做类型检查
        ColumnOption::OnUpdate(expr) => {
            if let Some(value) = option_value(expr) {
                column.on_update = Some(value);
            }
        }
        ColumnOption::NoOption
        | ColumnOption::Index
        | ColumnOption::Key
        | ColumnOption::Fulltext => {}
    }
    column
}

fn option_value(expr: &OptionExpr) -> Option<String> {
    match expr {
        OptionExpr::Literal(value) => Some(value.clone()),
        OptionExpr::FunctionCall(name) => Some(name.clone()),
        OptionExpr::Other => None,
    }
}

fn type_attribute(flags: TypeFlags) -> String {
    let present = [flags.unsigned, flags.zerofill, flags.binary];
    TYPE_ATTRIBUTES
        .iter()
        .zip(present)
        .filter(|(_, set)| *set)
        .map(|(attr, _)| *attr)
        .collect::<Vec<_>>()
        .join(" ")
}

fn build_index(constraint: &Constraint) -> Index {
    Index {
        name: constraint.name.clone(),
        primary: constraint.kind == ConstraintKind::PrimaryKey,
        unique: matches!(
            constraint.kind,
            ConstraintKind::Unique | ConstraintKind::UniqueKey | ConstraintKind::UniqueIndex
        ),
        fulltext: constraint.kind == ConstraintKind::Fulltext,
        columns: constraint
            .keys
            .iter()
            .map(|key| IndexColumn {
                name: key.column.clone(),
                prefix_length: key.length,
            })
            .collect(),
    }
}

fn build_foreign_key(constraint: &Constraint) -> ForeignKey {
    let mut fk = ForeignKey {
        name: constraint.name.clone(),
        columns: constraint.keys.iter().map(|k| k.column.clone()).collect(),
        ..Default::default()
    };

    if let Some(refer) = &constraint.refer {
        fk.ref_schema = refer.schema.clone();
        fk.ref_table = refer.table.clone();
        fk.ref_columns = refer.columns.clone();
        fk.on_update = refer.on_update.and_then(referential_action);
        fk.on_delete = refer.on_delete.and_then(referential_action);
    }
    fk
}

fn referential_action(option: ReferOption) -> Option<ReferentialAction> {
    match option {
        ReferOption::NoAction => Some(ReferentialAction::NoAction),
        ReferOption::SetNull => Some(ReferentialAction::SetNull),
        ReferOption::Restrict => Some(ReferentialAction::Restrict),
        ReferOption::Cascade => Some(ReferentialAction::Cascade),
        ReferOption::SetDefault => {
            debug!("忽略不支持的外键动作 SET DEFAULT");
            None
        }
    }
}

/// 按出现顺序应用表选项，同类选项以最后一次为准
fn apply_table_option(mut options: TableOptions, option: &TableOption) -> TableOptions {
    match option {
        TableOption::Engine(engine) => options.engine = Some(engine.clone()),
        TableOption::Charset(charset) => options.charset = Some(charset.clone()),
        TableOption::Collate(collate) => options.collate = Some(collate.clone()),
        TableOption::AutoIncrement(start) => options.auto_increment = Some(*start),
        TableOption::Comment(comment) => options.comment = Some(comment.clone()),
        TableOption::AvgRowLength(n) => options.avg_row_length = Some(*n),
        TableOption::KeyBlockSize(n) => options.key_block_size = Some(*n),
        TableOption::MinRows(n) => options.min_rows = Some(*n),
        TableOption::MaxRows(n) => options.max_rows = Some(*n),
        TableOption::RowFormat(keyword) => match RowFormat::from_keyword(keyword) {
            Some(format) => options.row_format = Some(format),
            None => debug!("忽略未知的 ROW_FORMAT: {}", keyword),
        },
        TableOption::None
        | TableOption::CheckSum(_)
        | TableOption::Compression(_)
        | TableOption::Connection(_)
        | TableOption::Password(_)
        | TableOption::DelayKeyWrite(_)
        | TableOption::StatsPersistent => {}
    }
    options
}
