//! 测试辅助：内存传输层 mock 与最小 CRUD 资源

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use mesa_shared::protocol::Entity;

use super::{ApiClient, ApiTransport, RawResponse, RequestDescriptor};
use crate::error::ApiResult;

/// 记录请求并按脚本回放响应的传输层实现
#[derive(Clone, Default)]
pub(crate) struct MockTransport {
    /// 客户端构建过的全部请求，按发出顺序
    log: Rc<RefCell<Vec<RequestDescriptor>>>,
    /// 预置响应队列，从队首开始消费
    responses: Rc<RefCell<VecDeque<ApiResult<RawResponse>>>>,
}

impl PartialEq for MockTransport {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.log, &other.log)
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MockTransport")
    }
}

impl MockTransport {
    pub(crate) fn respond_with(status: u16, body: &str) -> Self {
        let t = Self::default();
        t.push_ok(status, body);
        t
    }

    pub(crate) fn push_ok(&self, status: u16, body: &str) {
        self.responses.borrow_mut().push_back(Ok(RawResponse {
            status,
            body: body.to_string(),
        }));
    }

    pub(crate) fn push_err(&self, err: crate::error::ApiError) {
        self.responses.borrow_mut().push_back(Err(err));
    }

    pub(crate) fn requests(&self) -> Vec<RequestDescriptor> {
        self.log.borrow().clone()
    }
}

#[async_trait(?Send)]
impl ApiTransport for MockTransport {
    async fn send(&self, request: RequestDescriptor) -> ApiResult<RawResponse> {
        self.log.borrow_mut().push(request);
        self.responses.borrow_mut().pop_front().unwrap_or_else(|| {
            Ok(RawResponse {
                status: 404,
                body: String::new(),
            })
        })
    }
}

/// 测试用的最小 CRUD 资源
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub(crate) struct TestItem {
    pub id: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct TestItemDraft {
    pub name: String,
    pub description: String,
}

impl Entity for TestItem {
    type Draft = TestItemDraft;
    const BASE_PATH: &'static str = "/items";

    fn id(&self) -> &str {
        &self.id
    }
}

pub(crate) fn client(token: Option<&str>, transport: MockTransport) -> ApiClient<MockTransport> {
    ApiClient::with_transport(
        "https://api.example.com",
        token.map(str::to_string),
        transport,
    )
}

/// 构造一页 TestItem 的标准信封 JSON
pub(crate) fn page_body(ids: &[&str], current_page: u32, total_pages: u32) -> String {
    let items: Vec<String> = ids
        .iter()
        .map(|id| format!(r#"{{"id":"{id}","name":"item-{id}","description":"d"}}"#))
        .collect();
    format!(
        r#"{{"items":[{}],"currentPage":{},"totalPages":{}}}"#,
        items.join(","),
        current_page,
        total_pages
    )
}
