//! HTTP 请求封装模块
//!
//! 基于 `web_sys::fetch` 的精简客户端，支持统一超时（AbortController）。
//! 不做任何业务处理，错误规范化在 `api` 层完成。

use mesa_shared::protocol::HttpMethod;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortController, Headers, Request, RequestInit, Response};

/// HTTP 层错误
#[derive(Debug)]
pub enum HttpError {
    /// 请求构建失败
    RequestBuildFailed(String),
    /// 网络请求失败（未收到响应）
    NetworkError(String),
    /// 超时（AbortController 触发）
    Timeout,
    /// 响应体读取失败
    ResponseParseFailed(String),
}

impl core::fmt::Display for HttpError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HttpError::RequestBuildFailed(msg) => write!(f, "请求构建失败: {}", msg),
            HttpError::NetworkError(msg) => write!(f, "网络错误: {}", msg),
            HttpError::Timeout => write!(f, "请求超时"),
            HttpError::ResponseParseFailed(msg) => write!(f, "响应读取失败: {}", msg),
        }
    }
}

/// HTTP 响应封装
pub struct FetchResponse {
    inner: Response,
}

impl FetchResponse {
    pub fn status(&self) -> u16 {
        self.inner.status()
    }

    /// 读取响应体文本（空响应体返回空字符串）
    pub async fn text(self) -> Result<String, HttpError> {
        let promise = self
            .inner
            .text()
            .map_err(|e| HttpError::ResponseParseFailed(format!("{:?}", e)))?;

        let text = JsFuture::from(promise)
            .await
            .map_err(|e| HttpError::ResponseParseFailed(format!("{:?}", e)))?;

        Ok(text.as_string().unwrap_or_default())
    }
}

/// HTTP 请求构建器
pub struct FetchRequest {
    url: String,
    method: HttpMethod,
    headers: Vec<(String, String)>,
    body: Option<String>,
    timeout_ms: Option<u32>,
}

impl FetchRequest {
    pub fn new(url: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            url: url.into(),
            method,
            headers: Vec::new(),
            body: None,
            timeout_ms: None,
        }
    }

    pub fn header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    pub fn body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }

    /// 设置超时；到期后通过 AbortController 取消请求
    pub fn timeout_ms(mut self, millis: u32) -> Self {
        self.timeout_ms = Some(millis);
        self
    }

    /// 发送请求
    pub async fn send(self) -> Result<FetchResponse, HttpError> {
        let headers = Headers::new()
            .map_err(|e| HttpError::RequestBuildFailed(format!("创建 Headers 失败: {:?}", e)))?;

        for (key, value) in &self.headers {
            headers
                .set(key, value)
                .map_err(|e| HttpError::RequestBuildFailed(format!("设置 Header 失败: {:?}", e)))?;
        }

        let opts = RequestInit::new();
        opts.set_method(self.method.as_str());
        opts.set_headers(&headers.into());

        if let Some(body) = &self.body {
            opts.set_body(&JsValue::from_str(body));
        }

        let window = web_sys::window()
            .ok_or_else(|| HttpError::NetworkError("无法获取 window 对象".to_string()))?;

        // 超时控制：到期 abort，正常返回后清除定时器
        let mut timeout_handle: Option<(i32, Closure<dyn FnMut()>)> = None;
        if let Some(millis) = self.timeout_ms {
            let controller = AbortController::new()
                .map_err(|e| HttpError::RequestBuildFailed(format!("{:?}", e)))?;
            opts.set_signal(Some(&controller.signal()));

            let closure = Closure::<dyn FnMut()>::new(move || controller.abort());
            let handle = window
                .set_timeout_with_callback_and_timeout_and_arguments_0(
                    closure.as_ref().unchecked_ref(),
                    millis as i32,
                )
                .map_err(|e| HttpError::RequestBuildFailed(format!("{:?}", e)))?;
            timeout_handle = Some((handle, closure));
        }

        let request = Request::new_with_str_and_init(&self.url, &opts)
            .map_err(|e| HttpError::RequestBuildFailed(format!("{:?}", e)))?;

        let fetch_result = JsFuture::from(window.fetch_with_request(&request)).await;

        if let Some((handle, _closure)) = timeout_handle {
            window.clear_timeout_with_handle(handle);
        }

        let resp_value = fetch_result.map_err(|e| {
            if is_abort_error(&e) {
                HttpError::Timeout
            } else {
                HttpError::NetworkError(format!("{:?}", e))
            }
        })?;

        let response: Response = resp_value
            .dyn_into()
            .map_err(|e| HttpError::ResponseParseFailed(format!("Response 类型转换失败: {:?}", e)))?;

        Ok(FetchResponse { inner: response })
    }
}

/// fetch 被 AbortController 取消时，拒绝值是 name 为 "AbortError" 的 DOMException
fn is_abort_error(value: &JsValue) -> bool {
    js_sys::Reflect::get(value, &JsValue::from_str("name"))
        .ok()
        .and_then(|name| name.as_string())
        .is_some_and(|name| name == "AbortError")
}
