//! 列表查询参数模块 - 领域模型
//!
//! 纯粹的业务逻辑层，不依赖浏览器 API。
//! 定义分页/搜索/排序参数及其到 URL 查询串的编码。

use serde::{Deserialize, Serialize};

use crate::DEFAULT_PAGE_SIZE;

/// 排序方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// 排序键 + 方向
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub key: String,
    pub direction: SortDirection,
}

impl Sort {
    pub fn ascending(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Asc,
        }
    }
}

/// 列表视图的查询参数
///
/// 初始状态：第 1 页、空搜索、未设置排序（由服务端默认排序）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub page_size: u32,
    pub search: String,
    pub sort: Option<Sort>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            search: String::new(),
            sort: None,
        }
    }
}

impl ListQuery {
    /// **核心排序逻辑**：同一键再次点击翻转方向，不同键重置为升序
    pub fn toggle_sort(&mut self, key: &str) {
        self.sort = match self.sort.take() {
            Some(mut sort) if sort.key == key => {
                sort.direction = sort.direction.toggled();
                Some(sort)
            }
            _ => Some(Sort::ascending(key)),
        };
        // 排序变化回到第一页
        self.page = 1;
    }

    /// 搜索文本变化时重置页码
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
        self.page = 1;
    }

    /// 编码为 URL 查询串（含前导 `?`）
    pub fn to_query_string(&self) -> String {
        let mut out = format!("?page={}&pageSize={}", self.page, self.page_size);
        if !self.search.is_empty() {
            out.push_str("&search=");
            out.push_str(&percent_encode(&self.search));
        }
        if let Some(sort) = &self.sort {
            out.push_str("&sortKey=");
            out.push_str(&percent_encode(&sort.key));
            out.push_str("&sortDirection=");
            out.push_str(sort.direction.as_str());
        }
        out
    }
}

/// 最小化的百分号编码：保留 RFC 3986 的 unreserved 字符
fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_query_has_no_sort() {
        let q = ListQuery::default();
        assert_eq!(q.page, 1);
        assert!(q.search.is_empty());
        assert!(q.sort.is_none());
        assert_eq!(q.to_query_string(), "?page=1&pageSize=10");
    }

    #[test]
    fn toggle_same_key_reverses_direction() {
        let mut q = ListQuery::default();
        q.toggle_sort("name");
        assert_eq!(q.sort, Some(Sort::ascending("name")));
        q.toggle_sort("name");
        assert_eq!(q.sort.as_ref().unwrap().direction, SortDirection::Desc);
        // 再次点击回到升序（双重翻转幂等）
        q.toggle_sort("name");
        assert_eq!(q.sort.as_ref().unwrap().direction, SortDirection::Asc);
    }

    #[test]
    fn toggle_other_key_resets_to_ascending() {
        let mut q = ListQuery::default();
        q.toggle_sort("name");
        q.toggle_sort("name");
        q.toggle_sort("date");
        let sort = q.sort.unwrap();
        assert_eq!(sort.key, "date");
        assert_eq!(sort.direction, SortDirection::Asc);
    }

    #[test]
    fn sort_and_search_reset_page() {
        let mut q = ListQuery {
            page: 4,
            ..Default::default()
        };
        q.toggle_sort("name");
        assert_eq!(q.page, 1);
        q.page = 3;
        q.set_search("foo");
        assert_eq!(q.page, 1);
    }

    #[test]
    fn query_string_encodes_search() {
        let mut q = ListQuery::default();
        q.set_search("crème brûlée & co");
        q.toggle_sort("customerName");
        let qs = q.to_query_string();
        assert!(qs.starts_with("?page=1&pageSize=10&search="));
        assert!(qs.contains("cr%C3%A8me"));
        assert!(qs.contains("%20%26%20"));
        assert!(qs.ends_with("&sortKey=customerName&sortDirection=asc"));
    }
}
