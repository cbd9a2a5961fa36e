//! CREATE TABLE 的词法级改写
//!
//! sqlparser 的索引列只接受裸标识符，MySQL 常见的 `a(10)` 前缀长度、`DESC` 排序
//! 以及列级的 `UNIQUE KEY` / `KEY` 标记都会导致解析失败。这里在解析前把这些
//! 写法去掉，并按声明顺序记录被去掉的信息，供 parser 模块回填。

use super::tree::{ColumnOption, KeyPart};
use crate::error::Result;
use sqlparser::dialect::MySqlDialect;
use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::{Token, Tokenizer};
use std::ops::RangeInclusive;

#[derive(Debug, Default, PartialEq)]
pub(crate) struct Rewritten {
    /// 交给 sqlparser 的 SQL 文本
    pub sql: String,
    /// 每个表级约束一项；只有索引类约束且列表可识别时有值
    pub constraint_keys: Vec<Option<Vec<KeyPart>>>,
    /// 每个列定义一项，记录被去掉的列级索引标记
    pub column_markers: Vec<Vec<ColumnOption>>,
}

pub(crate) fn rewrite(sql: &str) -> Result<Rewritten> {
    let dialect = MySqlDialect {};
    // 保留字符串的原始转义，重新拼接时才能得到同样的文本
    let tokens = Tokenizer::new(&dialect, sql)
        .with_unescape(false)
        .tokenize()?;

    let mut result = Rewritten::default();
    let mut dropped = vec![false; tokens.len()];

    if let Some((open, close)) = create_table_body(&tokens) {
        for (start, end) in split_items(&tokens, open + 1, close) {
            rewrite_item(&tokens, start, end, &mut dropped, &mut result);
        }
    }

    result.sql = if dropped.contains(&true) {
        tokens
            .iter()
            .zip(&dropped)
            .filter(|(_, drop)| !**drop)
            .map(|(token, _)| token.to_string())
            .collect()
    } else {
        sql.to_string()
    };
    Ok(result)
}

fn keyword(token: &Token) -> Option<Keyword> {
    match token {
        Token::Word(word) if word.quote_style.is_none() => Some(word.keyword),
        _ => None,
    }
}

fn significant(tokens: &[Token], start: usize, end: usize) -> Vec<usize> {
    (start..end)
        .filter(|&i| !matches!(tokens[i], Token::Whitespace(_)))
        .collect()
}

/// CREATE ... TABLE 语句的列定义括号位置
fn create_table_body(tokens: &[Token]) -> Option<(usize, usize)> {
    let sig = significant(tokens, 0, tokens.len());
    if keyword(&tokens[*sig.first()?]) != Some(Keyword::CREATE) {
        return None;
    }

    let open = *sig.iter().find(|&&i| tokens[i] == Token::LParen)?;
    let is_table = sig
        .iter()
        .take_while(|&&i| i < open)
        .any(|&i| keyword(&tokens[i]) == Some(Keyword::TABLE));
    if !is_table {
        return None;
    }

    matching_paren(tokens, open).map(|close| (open, close))
}

fn matching_paren(tokens: &[Token], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        match token {
            Token::LParen => depth += 1,
            Token::RParen => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// 按最外层逗号切分 [start, end) 区间
fn split_items(tokens: &[Token], start: usize, end: usize) -> Vec<(usize, usize)> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut item_start = start;

    for i in start..end {
        match tokens[i] {
            Token::LParen => depth += 1,
            Token::RParen => depth = depth.saturating_sub(1),
            Token::Comma if depth == 0 => {
                items.push((item_start, i));
                item_start = i + 1;
            }
            _ => {}
        }
    }
    items.push((item_start, end));
    items
}

fn rewrite_item(
    tokens: &[Token],
    start: usize,
    end: usize,
    dropped: &mut [bool],
    result: &mut Rewritten,
) {
    let sig = significant(tokens, start, end);
    let Some(&first) = sig.first() else {
        return;
    };

    let kind = match keyword(&tokens[first]) {
        Some(Keyword::CONSTRAINT) => sig.get(2).and_then(|&i| keyword(&tokens[i])),
        Some(
            kw @ (Keyword::PRIMARY
            | Keyword::UNIQUE
            | Keyword::INDEX
            | Keyword::KEY
            | Keyword::FULLTEXT
            | Keyword::SPATIAL
            | Keyword::FOREIGN
            | Keyword::CHECK),
        ) => Some(kw),
        _ => {
            result
                .column_markers
                .push(column_markers(tokens, &sig, dropped));
            return;
        }
    };

    let keys = match kind {
        Some(Keyword::FOREIGN | Keyword::CHECK) => None,
        _ => sig
            .iter()
            .find(|&&i| tokens[i] == Token::LParen)
            .and_then(|&open| key_list(tokens, open, dropped)),
    };
    result.constraint_keys.push(keys);
}

/// 去掉索引列上的前缀长度与排序方向，列表中有无法识别的部分时不做任何改动
fn key_list(tokens: &[Token], open: usize, dropped: &mut [bool]) -> Option<Vec<KeyPart>> {
    let close = matching_paren(tokens, open)?;
    let mut parts = Vec::new();
    let mut ranges: Vec<RangeInclusive<usize>> = Vec::new();

    for (start, end) in split_items(tokens, open + 1, close) {
        let sig = significant(tokens, start, end);
        let (&name, rest) = sig.split_first()?;
        if !matches!(tokens[name], Token::Word(_)) {
            return None;
        }

        let mut length = None;
        let mut rest = rest;
        let mut kept_end = name;
        if let [l, n, r, tail @ ..] = rest {
            if tokens[*l] == Token::LParen && tokens[*r] == Token::RParen {
                let Token::Number(number, _) = &tokens[*n] else {
                    return None;
                };
                length = Some(number.parse::<u32>().ok()?);
                ranges.push(name + 1..=*r);
                kept_end = *r;
                rest = tail;
            }
        }

        if let [order, tail @ ..] = rest {
            if matches!(keyword(&tokens[*order]), Some(Keyword::ASC | Keyword::DESC)) {
                ranges.push(kept_end + 1..=*order);
                rest = tail;
            }
        }

        if !rest.is_empty() {
            return None;
        }
        parts.push(KeyPart {
            column: tokens[name].to_string(),
            length,
        });
    }

    for range in ranges {
        drop_range(dropped, range);
    }
    Some(parts)
}

/// 去掉列定义中 sqlparser 不接受的索引标记，返回对应的列选项
fn column_markers(tokens: &[Token], sig: &[usize], dropped: &mut [bool]) -> Vec<ColumnOption> {
    let mut markers = Vec::new();
    let mut depth = 0usize;
    // 第一个记号是列名
    let mut j = 1;

    while j < sig.len() {
        let token = &tokens[sig[j]];
        match token {
            Token::LParen => depth += 1,
            Token::RParen => depth = depth.saturating_sub(1),
            _ => {}
        }
        if depth > 0 {
            j += 1;
            continue;
        }

        let next = sig.get(j + 1).and_then(|&i| keyword(&tokens[i]));
        match keyword(token) {
            Some(Keyword::PRIMARY) => j += 1,
            Some(Keyword::UNIQUE) => match next {
                Some(Keyword::KEY) | Some(Keyword::INDEX) => {
                    markers.push(if next == Some(Keyword::KEY) {
                        ColumnOption::UniqueKey
                    } else {
                        ColumnOption::UniqueIndex
                    });
                    drop_range(dropped, sig[j] + 1..=sig[j + 1]);
                    j += 1;
                }
                _ => {}
            },
            Some(kw @ (Keyword::KEY | Keyword::INDEX | Keyword::FULLTEXT)) => {
                markers.push(match kw {
                    Keyword::KEY => ColumnOption::Key,
                    Keyword::INDEX => ColumnOption::Index,
                    _ => ColumnOption::Fulltext,
                });
                drop_range(dropped, sig[j - 1] + 1..=sig[j]);
            }
            _ => {}
        }
        j += 1;
    }
    markers
}

fn drop_range(dropped: &mut [bool], range: RangeInclusive<usize>) {
    for i in range {
        dropped[i] = true;
    }
}
