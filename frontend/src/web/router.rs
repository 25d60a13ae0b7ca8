//! 路由服务模块 - 核心引擎
//!
//! 封装 web_sys 的 History API，所有对 window.history 的操作都集中在此。
//! 导航流程："请求 -> 守卫裁决 -> History 更新 -> 渲染"。
//! 守卫决策本身是纯函数（见 `route::gate`），这里只负责执行。

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::{AppRoute, GateDecision, gate};
use crate::auth::SessionStage;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（用于重定向，不产生后退记录）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 路由器服务
///
/// 通过注入的会话阶段信号实现与认证系统的解耦；
/// 被守卫拦下的目标路由记录在 `return_to`，登录成功后返回。
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<AppRoute>,
    set_route: WriteSignal<AppRoute>,
    /// 会话阶段（注入的只读信号）
    stage: Signal<SessionStage>,
    /// 登录后要返回的原始目标
    return_to: RwSignal<Option<AppRoute>>,
}

impl RouterService {
    fn new(stage: Signal<SessionStage>) -> Self {
        let initial_route = AppRoute::from_path(&current_path());
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
            stage,
            return_to: RwSignal::new(None),
        }
    }

    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// **核心方法：导航与守卫**
    pub fn navigate(&self, route: AppRoute) {
        self.navigate_to_route(route, true);
    }

    pub fn navigate_path(&self, path: &str) {
        self.navigate(AppRoute::from_path(path));
    }

    fn navigate_to_route(&self, target: AppRoute, use_push: bool) {
        let stage = self.stage.get_untracked();

        // 已认证用户访问登录/注册页：直接去落地页
        if target.should_redirect_when_authenticated() && stage.is_authenticated() {
            let redirect = AppRoute::auth_success_redirect();
            self.apply(redirect, use_push);
            return;
        }

        match gate(&target, &stage) {
            GateDecision::Allow | GateDecision::Loading => {
                // Loading：会话检查未完成也先落到目标路由，
                // 由 RouterOutlet 渲染加载态，检查结束后守卫 Effect 再裁决
                self.apply(target, use_push);
            }
            GateDecision::RedirectToLogin => {
                web_sys::console::log_1(
                    &format!("[Router] 拒绝访问 {}，重定向到登录页", target).into(),
                );
                self.return_to.set(Some(target));
                self.apply(AppRoute::auth_failure_redirect(), use_push);
            }
        }
    }

    fn apply(&self, route: AppRoute, use_push: bool) {
        let path = route.to_path();
        if use_push {
            push_history_state(&path);
        } else {
            replace_history_state(&path);
        }
        self.set_route.set(route);
    }

    /// 取出（并清空）登录后要返回的目标
    pub fn take_return_to(&self) -> Option<AppRoute> {
        self.return_to.try_update(|r| r.take()).flatten()
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;
        let stage = self.stage;
        let return_to = self.return_to;

        let closure = Closure::<dyn Fn()>::new(move || {
            let target = AppRoute::from_path(&current_path());
            // popstate 时执行同样的守卫裁决
            match gate(&target, &stage.get_untracked()) {
                GateDecision::RedirectToLogin => {
                    return_to.set(Some(target));
                    let redirect = AppRoute::auth_failure_redirect();
                    replace_history_state(&redirect.to_path());
                    set_route.set(redirect);
                }
                GateDecision::Allow | GateDecision::Loading => {
                    set_route.set(target);
                }
            }
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 会话阶段变化时的自动重定向
    fn setup_auth_redirect(&self) {
        let this = *self;

        Effect::new(move |_| {
            let stage = this.stage.get();
            let route = this.current_route.get_untracked();

            match stage {
                SessionStage::Authenticated(_) => {
                    // 刚登录：离开登录/注册页，优先返回被拦截的目标
                    if route.should_redirect_when_authenticated() {
                        let target = this
                            .take_return_to()
                            .unwrap_or_else(AppRoute::auth_success_redirect);
                        web_sys::console::log_1(
                            &format!("[Router] 登录成功，跳转 {}", target).into(),
                        );
                        this.apply(target, true);
                    }
                }
                SessionStage::Unauthenticated | SessionStage::Error(_) => {
                    // 会话结束：受保护页面弹回登录页，记录原始目标
                    if route.requires_auth() {
                        web_sys::console::log_1(
                            &"[Router] 会话结束，重定向到登录页".into(),
                        );
                        this.return_to.set(Some(route));
                        this.apply(AppRoute::auth_failure_redirect(), true);
                    }
                }
                // 检查中不做任何跳转，等待结果
                SessionStage::Checking => {}
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(stage: Signal<SessionStage>) -> RouterService {
    let router = RouterService::new(stage);
    router.init_popstate_listener();
    router.setup_auth_redirect();
    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件，应在 App 根部使用
#[component]
pub fn Router(
    /// 会话阶段信号
    stage: Signal<SessionStage>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router(stage);
    children()
}

/// 路由出口组件
///
/// 按守卫裁决渲染：Allow 渲染匹配视图；Loading 渲染加载指示
/// （冷启动时绝不闪现重定向）；RedirectToLogin 由守卫 Effect 处理跳转，
/// 过渡期间同样渲染加载指示。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();
    let stage = router.stage;

    move || {
        let current = router.current_route().get();
        match gate(&current, &stage.get()) {
            GateDecision::Allow => matcher(current),
            GateDecision::Loading | GateDecision::RedirectToLogin => view! {
                <div class="flex items-center justify-center min-h-screen bg-base-200">
                    <span class="loading loading-spinner loading-lg text-primary"></span>
                </div>
            }
            .into_any(),
        }
    }
}
