//! API 客户端模块
//!
//! 在固定基地址上暴露类型化的端点调用：认证端点走 [`ApiRequest`] 协议，
//! 实体 CRUD 走 [`Entity`] 协议，响应在本层解码为具体类型。
//!
//! 请求侧统一附加 `Content-Type: application/json`，持有令牌时附加
//! `Authorization: Bearer <token>`；响应侧所有失败统一规范化为
//! [`ApiError`]（见 `error` 模块）。
//!
//! HTTP 实现通过 [`ApiTransport`] trait 解耦：生产环境为基于
//! `web_sys::fetch` 的 [`FetchTransport`]，测试中注入内存 mock。

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use mesa_shared::protocol::{ApiRequest, Entity, HttpMethod};
use mesa_shared::{
    CONTENT_TYPE_JSON, HEADER_AUTHORIZATION, HEADER_CONTENT_TYPE, ListQuery, Page,
};

use crate::config::{API_BASE_URL, REQUEST_TIMEOUT_MS};
use crate::error::{ApiError, ApiResult};
use crate::web::{FetchRequest, HttpError};

#[cfg(test)]
pub(crate) mod test_support;
#[cfg(test)]
mod tests;

// =========================================================
// 传输层抽象 (Transport Abstraction)
// =========================================================

/// 构建完成、即将发出的请求描述（每次调用临时构造，不持久化）
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl RequestDescriptor {
    /// 查找请求头（大小写敏感，本 crate 内统一用常量键）
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// 传输层收到的原始响应
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// 传输层接口
///
/// 任何实现了该 trait 的客户端都可驱动 [`ApiClient`]，
/// 从而把业务调用与具体 HTTP 实现解耦。
#[async_trait(?Send)]
pub trait ApiTransport {
    /// 发送请求；仅在"未收到响应"时返回 Err，非 2xx 属于正常返回
    async fn send(&self, request: RequestDescriptor) -> ApiResult<RawResponse>;
}

/// 生产实现：浏览器 fetch + 统一超时
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FetchTransport;

#[async_trait(?Send)]
impl ApiTransport for FetchTransport {
    async fn send(&self, request: RequestDescriptor) -> ApiResult<RawResponse> {
        let mut fetch = FetchRequest::new(request.url, request.method)
            .timeout_ms(REQUEST_TIMEOUT_MS);
        for (key, value) in &request.headers {
            fetch = fetch.header(key, value);
        }
        if let Some(body) = request.body {
            fetch = fetch.body(body);
        }

        let response = fetch.send().await.map_err(|e| match e {
            HttpError::Timeout => ApiError::network("请求超时，请检查网络后重试"),
            other => ApiError::network(other.to_string()),
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::network(e.to_string()))?;

        Ok(RawResponse { status, body })
    }
}

// =========================================================
// API 客户端
// =========================================================

/// 类型化 API 客户端
///
/// 令牌在构造时捕获，调用过程中只读；登录/登出通过构造新实例换发。
#[derive(Debug, Clone, PartialEq)]
pub struct ApiClient<C: ApiTransport = FetchTransport> {
    base_url: String,
    token: Option<String>,
    transport: C,
}

/// 生产环境使用的具体客户端类型
pub type Api = ApiClient<FetchTransport>;

impl ApiClient<FetchTransport> {
    /// 以编译期配置的基地址构造客户端
    pub fn new(token: Option<String>) -> Self {
        Self::with_transport(API_BASE_URL, token, FetchTransport)
    }
}

impl<C: ApiTransport> ApiClient<C> {
    pub fn with_transport(base_url: impl Into<String>, token: Option<String>, transport: C) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            token,
            transport,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// 换发令牌，返回新客户端（旧实例保持不变）
    pub fn with_token(&self, token: Option<String>) -> Self
    where
        C: Clone,
    {
        Self {
            base_url: self.base_url.clone(),
            token,
            transport: self.transport.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// 构造请求描述：默认 JSON 头 + 可选 Bearer 令牌
    fn descriptor(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<String>,
    ) -> RequestDescriptor {
        let mut headers = vec![(
            HEADER_CONTENT_TYPE.to_string(),
            CONTENT_TYPE_JSON.to_string(),
        )];
        if let Some(token) = &self.token {
            headers.push((
                HEADER_AUTHORIZATION.to_string(),
                format!("Bearer {}", token),
            ));
        }
        RequestDescriptor {
            method,
            url: self.url(path),
            headers,
            body,
        }
    }

    /// 解码响应：非 2xx 与坏 JSON 都收敛为 ApiError
    fn decode<T: DeserializeOwned>(response: RawResponse) -> ApiResult<T> {
        if !(200..300).contains(&response.status) {
            return Err(ApiError::from_response(response.status, &response.body));
        }
        // 空响应体（204 等）按 JSON null 解码，配合 Response = ()
        let body = if response.body.trim().is_empty() {
            "null"
        } else {
            response.body.as_str()
        };
        serde_json::from_str(body).map_err(ApiError::malformed)
    }

    async fn dispatch<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<String>,
    ) -> ApiResult<T> {
        let request = self.descriptor(method, path, body);
        let response = self.transport.send(request).await?;
        Self::decode(response)
    }

    /// 发送一个协议定义的请求（认证、报表等固定端点）
    pub async fn send<R: ApiRequest>(&self, request: &R) -> ApiResult<R::Response> {
        let body = if R::METHOD.has_body() {
            Some(serde_json::to_string(request).map_err(ApiError::malformed)?)
        } else {
            None
        };
        self.dispatch(R::METHOD, &request.path(), body).await
    }

    // ----- 实体 CRUD -----

    /// 分页列表查询，返回标准信封
    pub async fn list<T: Entity>(&self, query: &ListQuery) -> ApiResult<Page<T>> {
        let path = format!("{}{}", T::BASE_PATH, query.to_query_string());
        self.dispatch(HttpMethod::Get, &path, None).await
    }

    pub async fn get_by_id<T: Entity>(&self, id: &str) -> ApiResult<T> {
        let path = format!("{}/{}", T::BASE_PATH, id);
        self.dispatch(HttpMethod::Get, &path, None).await
    }

    pub async fn create<T: Entity>(&self, draft: &T::Draft) -> ApiResult<T> {
        let body = serde_json::to_string(draft).map_err(ApiError::malformed)?;
        self.dispatch(HttpMethod::Post, T::BASE_PATH, Some(body))
            .await
    }

    pub async fn update<T: Entity>(&self, id: &str, draft: &T::Draft) -> ApiResult<T> {
        let body = serde_json::to_string(draft).map_err(ApiError::malformed)?;
        let path = format!("{}/{}", T::BASE_PATH, id);
        self.dispatch(HttpMethod::Put, &path, Some(body)).await
    }

    pub async fn delete<T: Entity>(&self, id: &str) -> ApiResult<()> {
        let path = format!("{}/{}", T::BASE_PATH, id);
        let request = self.descriptor(HttpMethod::Delete, &path, None);
        let response = self.transport.send(request).await?;
        if !(200..300).contains(&response.status) {
            return Err(ApiError::from_response(response.status, &response.body));
        }
        Ok(())
    }
}
