use super::template::Segments;
use crate::config::FormatOptions;
use crate::constants::keywords::{FOREIGN_KEY, KEY_PREFIXES};

/// 把原始片段组合为对齐后的 CREATE TABLE 语句
///
/// 列定义按列名对齐类型，索引和外键定义合并为一张表按关键字对齐，
/// 最后一个定义行末尾的逗号会被去掉。
pub fn pretty(segments: &Segments, options: &FormatOptions) -> String {
    let mut column_lines = definition_lines(&segments.column_defs);
    let mut index_lines = definition_lines(&segments.index_defs);
    let mut foreign_key_lines = definition_lines(&segments.foreign_key_defs);

    // 输出顺序为 列 -> 索引 -> 外键，最后一个非空片段的最后一行才是真正的末行
    trim_trailing_comma([
        &mut foreign_key_lines,
        &mut index_lines,
        &mut column_lines,
    ]);

    let mut column_table = ElasticTable::new(options.column_gap);
    for line in &column_lines {
        let (name, rest) = split_column_def(line);
        column_table.push(name, rest);
    }

    let mut key_table = ElasticTable::new(options.key_gap);
    for line in &index_lines {
        let (keyword, rest) = split_key_def(line);
        key_table.push(keyword, rest);
    }
    for line in &foreign_key_lines {
        key_table.push(FOREIGN_KEY, strip_keyword(line, FOREIGN_KEY).unwrap_or(line.as_str()));
    }

    let indent = " ".repeat(options.indent);
    let mut out = vec![segments.begin.clone()];
    for line in column_table.render().into_iter().chain(key_table.render()) {
        out.push(format!("{indent}{line}"));
    }
    out.push(segments.end.clone());

    out.join("\n")
}

fn definition_lines(segment: &str) -> Vec<String> {
    segment
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// 去掉第一个非空分组最后一行末尾的一个逗号
fn trim_trailing_comma(groups: [&mut Vec<String>; 3]) {
    for group in groups {
        if let Some(last) = group.last_mut() {
            if let Some(stripped) = last.trim_end().strip_suffix(',') {
                *last = stripped.trim_end().to_string();
            }
            return;
        }
    }
}

/// 列定义拆分为列名和其余部分，列名可以带反引号或双引号
fn split_column_def(line: &str) -> (&str, &str) {
    let name_end = match line.chars().next() {
        Some(quote @ ('`' | '"')) => line[1..].find(quote).map(|i| i + 2),
        _ => None,
    }
    .or_else(|| line.find(char::is_whitespace))
    .unwrap_or(line.len());

    (&line[..name_end], line[name_end..].trim_start())
}

/// 索引定义拆分为关键字前缀和其余部分
fn split_key_def(line: &str) -> (&str, &str) {
    for prefix in KEY_PREFIXES {
        if let Some(rest) = strip_keyword(line, prefix) {
            return (*prefix, rest);
        }
    }

    match line.split_once(char::is_whitespace) {
        Some((first, rest)) => (first, rest.trim_start()),
        None => (line, ""),
    }
}

/// 不区分大小写地去掉关键字前缀，关键字后必须是空白、左括号或行尾
fn strip_keyword<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let head = line.get(..keyword.len())?;
    if !head.eq_ignore_ascii_case(keyword) {
        return None;
    }

    let rest = &line[keyword.len()..];
    match rest.chars().next() {
        None => Some(rest),
        Some(c) if c.is_whitespace() || c == '(' => Some(rest.trim_start()),
        Some(_) => None,
    }
}

/// 两列弹性表格：第一列按最大宽度加间距补齐，第二列原样输出
struct ElasticTable<'a> {
    gap: usize,
    rows: Vec<(&'a str, &'a str)>,
}

impl<'a> ElasticTable<'a> {
    fn new(gap: usize) -> Self {
        Self {
            gap,
            rows: Vec::new(),
        }
    }

    fn push(&mut self, first: &'a str, second: &'a str) {
        self.rows.push((first, second));
    }

    fn render(&self) -> Vec<String> {
        let width = self
            .rows
            .iter()
            .map(|(first, _)| first.chars().count())
            .max()
            .unwrap_or(0);

        self.rows
            .iter()
            .map(|(first, second)| {
                if second.is_empty() {
                    return first.to_string();
                }
                let padding = width - first.chars().count() + self.gap;
                format!("{first}{}{second}", " ".repeat(padding))
            })
            .collect()
    }
}
