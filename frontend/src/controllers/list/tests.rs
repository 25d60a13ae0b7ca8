use super::*;
use crate::api::test_support::TestItem;
use crate::error::ApiError;

fn item(id: &str) -> TestItem {
    TestItem {
        id: id.into(),
        name: format!("item-{id}"),
        description: "d".into(),
    }
}

fn page(ids: &[&str], current_page: u32, total_pages: u32) -> Page<TestItem> {
    Page {
        items: ids.iter().map(|id| item(id)).collect(),
        current_page,
        total_pages,
    }
}

/// 已有第 2 页（共 3 页）数据的核心
fn loaded_core() -> ListCore<TestItem> {
    let mut core = ListCore::default();
    let seq = core.begin_fetch();
    assert!(core.apply_success(seq, page(&["a", "b"], 2, 3)));
    core
}

#[test]
fn middle_page_has_both_directions() {
    let core = loaded_core();
    assert!(core.has_prev());
    assert!(core.has_next());
    assert_eq!(core.query.page, 2);
}

#[test]
fn boundary_pages_disable_one_direction() {
    let mut core = ListCore::<TestItem>::default();
    let seq = core.begin_fetch();
    core.apply_success(seq, page(&["a"], 1, 3));
    assert!(!core.has_prev());
    assert!(core.has_next());

    let seq = core.begin_fetch();
    core.apply_success(seq, page(&["z"], 3, 3));
    assert!(core.has_prev());
    assert!(!core.has_next());
}

#[test]
fn out_of_range_page_request_is_clamped_without_fetch() {
    let mut core = loaded_core();
    let before = core.query.clone();

    // 0 页与越过末页都不产生请求，页码不变
    assert!(!core.request_page(0));
    assert!(!core.request_page(4));
    assert_eq!(core.query, before);

    // 原地页也不重复取数
    assert!(!core.request_page(2));
    assert_eq!(core.query, before);

    // 合法翻页才需要取数
    assert!(core.request_page(3));
    assert_eq!(core.query.page, 3);
}

#[test]
fn stale_response_is_dropped() {
    let mut core = ListCore::<TestItem>::default();

    // 先后发出两个请求，旧响应后到
    let first = core.begin_fetch();
    let second = core.begin_fetch();

    assert!(core.apply_success(second, page(&["new"], 1, 1)));
    assert!(!core.apply_success(first, page(&["old"], 1, 9)));

    assert_eq!(core.items, vec![item("new")]);
    assert_eq!(core.total_pages, 1);

    // 过期失败同样被丢弃，不覆盖成功状态
    assert!(!core.apply_error(first, ApiError::network("超时")));
    assert!(core.error.is_none());
    assert!(!core.loading);
}

#[test]
fn in_flight_fetch_keeps_items_on_screen() {
    let mut core = loaded_core();
    core.begin_fetch();

    assert!(core.loading);
    assert_eq!(core.items.len(), 2);
    assert!(!core.is_empty());
}

#[test]
fn failed_fetch_keeps_items_and_surfaces_error() {
    let mut core = loaded_core();
    let seq = core.begin_fetch();
    assert!(core.apply_error(seq, ApiError::network("连接失败")));

    assert!(!core.loading);
    assert_eq!(core.items.len(), 2);
    assert!(core.error.as_ref().unwrap().message.contains("连接失败"));
    assert!(!core.is_empty());
}

#[test]
fn retry_after_failure_reissues_identical_query() {
    let mut core = loaded_core();
    core.toggle_sort("name");
    let seq = core.begin_fetch();
    core.apply_error(seq, ApiError::network("超时"));
    let failed_query = core.query.clone();

    // 重试：同参数重发，错误清除，数据保留
    core.begin_fetch();
    assert_eq!(core.query, failed_query);
    assert!(core.error.is_none());
    assert!(core.loading);
    assert_eq!(core.items.len(), 2);
}

#[test]
fn sort_toggle_resets_page_and_indicator_tracks_key() {
    let mut core = loaded_core();
    core.toggle_sort("date");
    assert_eq!(core.query.page, 1);
    assert_eq!(core.sort_indicator("date"), Some(SortDirection::Asc));
    assert_eq!(core.sort_indicator("name"), None);

    core.toggle_sort("date");
    assert_eq!(core.sort_indicator("date"), Some(SortDirection::Desc));
}

#[test]
fn empty_state_only_after_successful_empty_fetch() {
    let mut core = ListCore::<TestItem>::default();

    // 取数在途不算空态
    let seq = core.begin_fetch();
    assert!(!core.is_empty());
    core.apply_success(seq, page(&[], 1, 0));
    assert!(core.is_empty());
}

#[test]
fn client_sort_is_stable_in_both_directions() {
    // 等键元素（金额相同）必须保持原有相对顺序
    let mut rows = vec![("b", 2), ("a", 1), ("c", 2), ("d", 0)];

    sort_items_by(&mut rows, SortDirection::Asc, |r| r.1);
    assert_eq!(rows, vec![("d", 0), ("a", 1), ("b", 2), ("c", 2)]);

    sort_items_by(&mut rows, SortDirection::Desc, |r| r.1);
    assert_eq!(rows, vec![("b", 2), ("c", 2), ("a", 1), ("d", 0)]);
}
