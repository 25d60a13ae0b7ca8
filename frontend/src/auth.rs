//! 会话与认证状态管理
//!
//! 令牌只有一条路径：构造时从 LocalStorage 读出、登录/注册成功时写回、
//! 登出或会话失效时删除，全部经由本模块，其他模块一律通过 [`AuthContext`]
//! 取用已配置好令牌的 API 客户端。
//!
//! 会话阶段是一个小状态机（[`SessionStage`]）：应用以 `Checking` 冷启动
//! （无令牌时直接短路为 `Unauthenticated`），检查失败按未认证处理，
//! 绝不进入 `Error`——`Error` 仅承载登录/注册表单需要展示的失败。

use leptos::prelude::*;
use leptos::task::spawn_local;

use mesa_shared::UserInfo;
use mesa_shared::protocol::{
    ApiRequest, LoginRequest, LogoutRequest, RegisterRequest, StatusRequest,
};

use crate::api::{Api, ApiClient, ApiTransport};
use crate::error::ApiError;
use crate::web::storage;

/// LocalStorage 中会话令牌的唯一键
pub const STORAGE_TOKEN_KEY: &str = "mesa_token";

// =========================================================
// 会话阶段状态机
// =========================================================

/// 会话所处的阶段
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionStage {
    /// 无有效会话
    Unauthenticated,
    /// 冷启动的初始阶段：持有令牌但尚未向服务端确认
    #[default]
    Checking,
    /// 已确认的会话，携带当前用户
    Authenticated(UserInfo),
    /// 登录/注册失败，供表单展示
    Error(String),
}

impl SessionStage {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn is_checking(&self) -> bool {
        matches!(self, Self::Checking)
    }

    pub fn user(&self) -> Option<&UserInfo> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    /// 会话检查结果到阶段的映射
    ///
    /// 失败一律按未认证处理（令牌过期与网络故障同样对待），
    /// 不进入 `Error`，避免冷启动卡在错误页。
    pub fn after_check(result: Result<UserInfo, ApiError>) -> Self {
        match result {
            Ok(user) => Self::Authenticated(user),
            Err(_) => Self::Unauthenticated,
        }
    }
}

// =========================================================
// 纯认证流程（与传输层解耦，可在宿主机测试）
// =========================================================

/// 登录/注册共用的认证流程结果
pub(crate) struct AuthOutcome<C: ApiTransport> {
    /// 成功时换发了新令牌的客户端；失败时为原客户端
    pub api: ApiClient<C>,
    pub stage: SessionStage,
    /// 成功时需要持久化的令牌
    pub token: Option<String>,
}

/// 执行登录/注册请求并推导下一个阶段
pub(crate) async fn run_auth_request<C, R>(api: ApiClient<C>, request: &R) -> AuthOutcome<C>
where
    C: ApiTransport + Clone,
    R: ApiRequest<Response = mesa_shared::AuthResponse>,
{
    match api.send(request).await {
        Ok(auth) => {
            let api = api.with_token(Some(auth.token.clone()));
            AuthOutcome {
                api,
                stage: SessionStage::Authenticated(auth.user),
                token: Some(auth.token),
            }
        }
        Err(err) => AuthOutcome {
            api,
            stage: SessionStage::Error(err.message),
            token: None,
        },
    }
}

/// 向服务端确认当前令牌对应的会话
pub(crate) async fn run_session_check<C: ApiTransport>(api: &ApiClient<C>) -> SessionStage {
    SessionStage::after_check(api.send(&StatusRequest).await)
}

// =========================================================
// Leptos 集成
// =========================================================

/// 认证状态：会话阶段 + 持有当前令牌的 API 客户端
#[derive(Clone, PartialEq)]
pub struct AuthState {
    pub stage: SessionStage,
    pub api: Api,
}

/// 认证上下文（信号对，Copy，可在任意组件中取用）
#[derive(Clone, Copy)]
pub struct AuthContext(pub ReadSignal<AuthState>, pub WriteSignal<AuthState>);

impl AuthContext {
    /// 从 LocalStorage 恢复会话并构造上下文
    ///
    /// 无令牌时直接短路为未认证，不发出状态请求。
    pub fn new() -> Self {
        let token = storage::get(STORAGE_TOKEN_KEY);
        let stage = if token.is_some() {
            SessionStage::Checking
        } else {
            SessionStage::Unauthenticated
        };
        let (state, set_state) = signal(AuthState {
            stage,
            api: Api::new(token),
        });
        Self(state, set_state)
    }

    /// 当前阶段的派生只读信号（供路由守卫注入）
    pub fn stage_signal(&self) -> Signal<SessionStage> {
        let state = self.0;
        Signal::derive(move || state.get().stage)
    }

    /// 当前 API 客户端（非跟踪读取；令牌已配置好）
    pub fn api(&self) -> Api {
        self.0.get_untracked().api
    }

    /// 冷启动：持有令牌时向服务端确认会话
    pub fn init(&self) {
        if !self.0.get_untracked().stage.is_checking() {
            return;
        }
        let this = *self;
        spawn_local(async move {
            let api = this.api();
            let stage = run_session_check(&api).await;
            if !stage.is_authenticated() {
                web_sys::console::log_1(&"[Auth] 会话检查未通过，按未认证处理".into());
                storage::remove(STORAGE_TOKEN_KEY);
                this.update(|state| state.api = state.api.with_token(None));
            }
            this.update(move |state| state.stage = stage);
        });
    }

    pub fn login(&self, email: String, password: String) {
        self.authenticate(LoginRequest { email, password });
    }

    pub fn register(&self, name: String, email: String, password: String) {
        self.authenticate(RegisterRequest {
            name,
            email,
            password,
        });
    }

    fn authenticate<R>(&self, request: R)
    where
        R: ApiRequest<Response = mesa_shared::AuthResponse> + 'static,
    {
        let this = *self;
        spawn_local(async move {
            let outcome = run_auth_request(this.api(), &request).await;
            if let Some(token) = &outcome.token {
                storage::set(STORAGE_TOKEN_KEY, token);
            }
            this.update(move |state| {
                state.stage = outcome.stage;
                state.api = outcome.api;
            });
        });
    }

    /// 登出：本地状态无条件清理，服务端失效尽力而为
    pub fn logout(&self) {
        let api = self.api();
        storage::remove(STORAGE_TOKEN_KEY);
        self.update(|state| {
            state.stage = SessionStage::Unauthenticated;
            state.api = state.api.with_token(None);
        });

        // 用旧令牌通知服务端，结果忽略
        spawn_local(async move {
            if api.token().is_some() {
                let _ = api.send(&LogoutRequest).await;
            }
        });
    }

    /// 请求过程中发现令牌失效（401）时调用
    pub fn expire_session(&self) {
        web_sys::console::log_1(&"[Auth] 令牌已失效，清理会话".into());
        storage::remove(STORAGE_TOKEN_KEY);
        self.update(|state| {
            state.stage = SessionStage::Unauthenticated;
            state.api = state.api.with_token(None);
        });
    }

    /// 清除表单错误阶段（离开登录/注册页时）
    pub fn clear_error(&self) {
        self.update(|state| {
            if matches!(state.stage, SessionStage::Error(_)) {
                state.stage = SessionStage::Unauthenticated;
            }
        });
    }

    fn update(&self, f: impl FnOnce(&mut AuthState)) {
        // try_update：组件卸载后的迟到回调直接丢弃
        self.1.try_update(f);
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>()
        .expect("AuthContext not found in context. Ensure App provides it.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{MockTransport, client};

    fn user_body() -> &'static str {
        r#"{"id":"1","name":"John","email":"john@example.com"}"#
    }

    #[tokio::test]
    async fn session_check_success_yields_authenticated() {
        let transport = MockTransport::respond_with(200, user_body());
        let api = client(Some("tok-1"), transport.clone());

        let stage = run_session_check(&api).await;
        assert!(stage.is_authenticated());
        assert_eq!(stage.user().unwrap().name, "John");

        let req = &transport.requests()[0];
        assert_eq!(req.url, "https://api.example.com/auth/status");
        assert_eq!(req.header("Authorization"), Some("Bearer tok-1"));
    }

    #[tokio::test]
    async fn session_check_failure_is_unauthenticated_never_error() {
        // 401、500、网络故障一律落到未认证
        for status in [401u16, 500] {
            let transport = MockTransport::respond_with(status, "");
            let api = client(Some("stale"), transport);
            assert_eq!(
                run_session_check(&api).await,
                SessionStage::Unauthenticated
            );
        }

        let transport = MockTransport::default();
        transport.push_err(ApiError::network("连接失败"));
        let api = client(Some("stale"), transport);
        assert_eq!(run_session_check(&api).await, SessionStage::Unauthenticated);
    }

    #[tokio::test]
    async fn login_success_swaps_token_into_client() {
        let transport = MockTransport::respond_with(
            200,
            r#"{"token":"tok-1","user":{"id":"1","name":"John","email":"john@example.com"}}"#,
        );
        let api = client(None, transport.clone());

        let outcome = run_auth_request(
            api,
            &LoginRequest {
                email: "john@example.com".into(),
                password: "secret".into(),
            },
        )
        .await;

        assert!(outcome.stage.is_authenticated());
        assert_eq!(outcome.token.as_deref(), Some("tok-1"));
        assert_eq!(outcome.api.token(), Some("tok-1"));

        // 换发后的客户端携带 Bearer
        transport.push_ok(200, user_body());
        let _ = outcome.api.send(&StatusRequest).await.unwrap();
        assert_eq!(
            transport.requests()[1].header("Authorization"),
            Some("Bearer tok-1")
        );
    }

    #[tokio::test]
    async fn login_failure_surfaces_server_message() {
        let transport = MockTransport::respond_with(401, r#"{"message":"邮箱或密码错误"}"#);
        let api = client(None, transport);

        let outcome = run_auth_request(
            api,
            &LoginRequest {
                email: "john@example.com".into(),
                password: "wrong".into(),
            },
        )
        .await;

        assert_eq!(outcome.stage, SessionStage::Error("邮箱或密码错误".into()));
        assert!(outcome.token.is_none());
        assert!(outcome.api.token().is_none());
    }

    #[tokio::test]
    async fn register_hits_register_endpoint() {
        let transport = MockTransport::respond_with(
            201,
            r#"{"token":"tok-2","user":{"id":"2","name":"Jane","email":"jane@example.com"}}"#,
        );
        let api = client(None, transport.clone());

        let outcome = run_auth_request(
            api,
            &RegisterRequest {
                name: "Jane".into(),
                email: "jane@example.com".into(),
                password: "secret".into(),
            },
        )
        .await;

        assert!(outcome.stage.is_authenticated());
        assert_eq!(
            transport.requests()[0].url,
            "https://api.example.com/auth/register"
        );
    }

    #[test]
    fn default_stage_is_checking() {
        assert_eq!(SessionStage::default(), SessionStage::Checking);
    }
}
