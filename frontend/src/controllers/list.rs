//! 列表视图控制器
//!
//! 管理一个分页 CRUD 列表的完整取数生命周期：查询参数、在途标记、
//! 过期响应丢弃与错误展示。两条硬性规则贯穿始终：
//!
//! 1. 只有最后发出的请求才允许落盘（序号守卫），乱序到达的旧响应直接丢弃；
//! 2. 已有数据绝不因为新请求在途或失败而清空，失败时在数据之上叠加错误条。

use leptos::prelude::*;
use leptos::task::spawn_local;

use mesa_shared::protocol::Entity;
use mesa_shared::{ListQuery, Page, SortDirection};

use crate::auth::AuthContext;
use crate::error::ApiError;

#[cfg(test)]
mod tests;

// =========================================================
// 纯核心
// =========================================================

/// 列表状态机（无副作用，取数由外层驱动）
#[derive(Debug, Clone, PartialEq)]
pub struct ListCore<T> {
    pub query: ListQuery,
    pub items: Vec<T>,
    pub total_pages: u32,
    pub loading: bool,
    pub error: Option<ApiError>,
    /// 最后一次发出的请求序号，响应凭序号落盘
    seq: u64,
}

impl<T> Default for ListCore<T> {
    fn default() -> Self {
        Self {
            query: ListQuery::default(),
            items: Vec::new(),
            total_pages: 0,
            loading: false,
            error: None,
            seq: 0,
        }
    }
}

impl<T> ListCore<T> {
    /// 请求翻页；目标页越界时夹紧为不动作，返回是否需要取数
    pub fn request_page(&mut self, page: u32) -> bool {
        if page < 1 {
            return false;
        }
        if self.total_pages > 0 && page > self.total_pages {
            return false;
        }
        if page == self.query.page {
            return false;
        }
        self.query.page = page;
        true
    }

    /// 切换排序（同键反向，异键重置升序），页码回到 1
    pub fn toggle_sort(&mut self, key: &str) {
        self.query.toggle_sort(key);
    }

    /// 更新搜索词，页码回到 1
    pub fn set_search(&mut self, term: &str) {
        self.query.set_search(term);
    }

    /// 登记一次新请求：返回其序号，旧数据保留在屏上
    pub fn begin_fetch(&mut self) -> u64 {
        self.seq += 1;
        self.loading = true;
        self.error = None;
        self.seq
    }

    /// 按序号落盘成功响应；过期响应返回 false 并被丢弃
    pub fn apply_success(&mut self, seq: u64, page: Page<T>) -> bool {
        if seq != self.seq {
            return false;
        }
        self.loading = false;
        self.error = None;
        self.items = page.items;
        self.total_pages = page.total_pages;
        // 以服务端信封为准回写页码
        self.query.page = page.current_page;
        true
    }

    /// 按序号落盘失败；已有数据保留，错误叠加展示
    pub fn apply_error(&mut self, seq: u64, error: ApiError) -> bool {
        if seq != self.seq {
            return false;
        }
        self.loading = false;
        self.error = Some(error);
        true
    }

    pub fn has_prev(&self) -> bool {
        self.query.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.query.page < self.total_pages
    }

    /// 空态：取数完成、无错误且确实没有数据
    pub fn is_empty(&self) -> bool {
        !self.loading && self.error.is_none() && self.items.is_empty()
    }

    pub fn sort_indicator(&self, key: &str) -> Option<SortDirection> {
        self.query
            .sort
            .as_ref()
            .filter(|s| s.key == key)
            .map(|s| s.direction)
    }
}

/// 客户端排序：稳定排序，降序通过反转比较器实现（保持等键原序）
pub fn sort_items_by<T, K: Ord>(
    items: &mut [T],
    direction: SortDirection,
    key: impl Fn(&T) -> K,
) {
    match direction {
        SortDirection::Asc => items.sort_by(|a, b| key(a).cmp(&key(b))),
        SortDirection::Desc => items.sort_by(|a, b| key(b).cmp(&key(a))),
    }
}

// =========================================================
// Leptos 封装
// =========================================================

/// 列表视图状态（Copy 信号封装，供组件持有）
pub struct ListViewState<T>
where
    T: Entity + Send + Sync + 'static,
{
    core: RwSignal<ListCore<T>>,
}

impl<T> Clone for ListViewState<T>
where
    T: Entity + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ListViewState<T> where T: Entity + Send + Sync + 'static {}

impl<T> ListViewState<T>
where
    T: Entity + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            core: RwSignal::new(ListCore::default()),
        }
    }

    pub fn core(&self) -> RwSignal<ListCore<T>> {
        self.core
    }

    /// 以当前查询参数发起取数
    pub fn load(&self, auth: AuthContext) {
        let core = self.core;
        // 先登记序号与快照查询，再进入异步
        let (seq, query) = match core.try_update(|c| (c.begin_fetch(), c.query.clone())) {
            Some(pair) => pair,
            None => return,
        };
        let api = auth.api();

        spawn_local(async move {
            match api.list::<T>(&query).await {
                Ok(page) => {
                    core.try_update(|c| c.apply_success(seq, page));
                }
                Err(err) => {
                    if err.is_unauthorized() {
                        auth.expire_session();
                        return;
                    }
                    web_sys::console::log_1(&format!("[List] 取数失败: {}", err).into());
                    core.try_update(|c| c.apply_error(seq, err));
                }
            }
        });
    }

    /// 翻页；越界请求被夹紧为不动作
    pub fn goto_page(&self, auth: AuthContext, page: u32) {
        let changed = self
            .core
            .try_update(|c| c.request_page(page))
            .unwrap_or(false);
        if changed {
            self.load(auth);
        }
    }

    pub fn toggle_sort(&self, auth: AuthContext, key: &str) {
        self.core.try_update(|c| c.toggle_sort(key));
        self.load(auth);
    }

    pub fn set_search(&self, auth: AuthContext, term: &str) {
        self.core.try_update(|c| c.set_search(term));
        self.load(auth);
    }

    /// 错误条上的重试：按当前参数原样重发
    pub fn retry(&self, auth: AuthContext) {
        self.load(auth);
    }

    /// 删除一条记录后刷新当前页
    pub fn delete(&self, auth: AuthContext, id: String) {
        let this = *self;
        let api = auth.api();
        spawn_local(async move {
            match api.delete::<T>(&id).await {
                Ok(()) => this.load(auth),
                Err(err) => {
                    if err.is_unauthorized() {
                        auth.expire_session();
                        return;
                    }
                    this.core.try_update(|c| {
                        let seq = c.seq;
                        c.apply_error(seq, err)
                    });
                }
            }
        });
    }
}

impl<T> Default for ListViewState<T>
where
    T: Entity + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
