//! 路由定义模块 - 领域模型
//!
//! 纯粹的业务逻辑层，不依赖 DOM 或 web_sys。
//! 定义应用的所有路由、其认证要求，以及路由守卫的纯决策函数。

use std::fmt::Display;

use crate::auth::SessionStage;

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 登录页面（默认路由）
    #[default]
    Login,
    /// 注册页面
    Register,
    /// 仪表盘 / 报表
    Dashboard,
    Reservations,
    ReservationNew,
    ReservationEdit(String),
    Inventory,
    InventoryNew,
    InventoryEdit(String),
    Services,
    ServiceNew,
    ServiceEdit(String),
    Integrations,
    IntegrationNew,
    IntegrationEdit(String),
    Deployments,
    DeploymentNew,
    Payments,
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        match segments.as_slice() {
            [""] | ["login"] => Self::Login,
            ["register"] => Self::Register,
            ["dashboard"] => Self::Dashboard,
            ["reservations"] => Self::Reservations,
            ["reservations", "new"] => Self::ReservationNew,
            ["reservations", id, "edit"] => Self::ReservationEdit((*id).to_string()),
            ["inventory"] => Self::Inventory,
            ["inventory", "new"] => Self::InventoryNew,
            ["inventory", id, "edit"] => Self::InventoryEdit((*id).to_string()),
            ["services"] => Self::Services,
            ["services", "new"] => Self::ServiceNew,
            ["services", id, "edit"] => Self::ServiceEdit((*id).to_string()),
            ["integrations"] => Self::Integrations,
            ["integrations", "new"] => Self::IntegrationNew,
            ["integrations", id, "edit"] => Self::IntegrationEdit((*id).to_string()),
            ["deployments"] => Self::Deployments,
            ["deployments", "new"] => Self::DeploymentNew,
            ["payments"] => Self::Payments,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Login => "/".to_string(),
            Self::Register => "/register".to_string(),
            Self::Dashboard => "/dashboard".to_string(),
            Self::Reservations => "/reservations".to_string(),
            Self::ReservationNew => "/reservations/new".to_string(),
            Self::ReservationEdit(id) => format!("/reservations/{}/edit", id),
            Self::Inventory => "/inventory".to_string(),
            Self::InventoryNew => "/inventory/new".to_string(),
            Self::InventoryEdit(id) => format!("/inventory/{}/edit", id),
            Self::Services => "/services".to_string(),
            Self::ServiceNew => "/services/new".to_string(),
            Self::ServiceEdit(id) => format!("/services/{}/edit", id),
            Self::Integrations => "/integrations".to_string(),
            Self::IntegrationNew => "/integrations/new".to_string(),
            Self::IntegrationEdit(id) => format!("/integrations/{}/edit", id),
            Self::Deployments => "/deployments".to_string(),
            Self::DeploymentNew => "/deployments/new".to_string(),
            Self::Payments => "/payments".to_string(),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// **核心守卫逻辑：定义该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Self::Login | Self::Register | Self::NotFound)
    }

    /// 已认证用户是否应该离开此路由（登录/注册页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }

    /// 认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 认证成功时的默认落地页
    pub fn auth_success_redirect() -> Self {
        Self::Dashboard
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

// =========================================================
// 路由守卫决策
// =========================================================

/// 守卫对"当前会话能否看到该路由"的裁决
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// 渲染目标内容
    Allow,
    /// 初始会话检查未完成：渲染加载指示，不得闪现重定向
    Loading,
    /// 重定向到登录页（携带原始目标，登录后返回）
    RedirectToLogin,
}

/// 纯决策函数：给定路由与会话阶段，裁决渲染行为
pub fn gate(route: &AppRoute, stage: &SessionStage) -> GateDecision {
    if !route.requires_auth() {
        return GateDecision::Allow;
    }
    match stage {
        SessionStage::Authenticated(_) => GateDecision::Allow,
        SessionStage::Checking => GateDecision::Loading,
        SessionStage::Unauthenticated | SessionStage::Error(_) => GateDecision::RedirectToLogin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesa_shared::UserInfo;

    fn user() -> UserInfo {
        UserInfo {
            id: "1".into(),
            name: "John".into(),
            email: "john@example.com".into(),
        }
    }

    #[test]
    fn path_round_trip() {
        for route in [
            AppRoute::Login,
            AppRoute::Register,
            AppRoute::Dashboard,
            AppRoute::Reservations,
            AppRoute::ReservationNew,
            AppRoute::ReservationEdit("42".into()),
            AppRoute::Inventory,
            AppRoute::InventoryEdit("abc".into()),
            AppRoute::Services,
            AppRoute::ServiceNew,
            AppRoute::Integrations,
            AppRoute::IntegrationEdit("x-1".into()),
            AppRoute::Deployments,
            AppRoute::DeploymentNew,
            AppRoute::Payments,
        ] {
            assert_eq!(AppRoute::from_path(&route.to_path()), route);
        }
    }

    #[test]
    fn unknown_path_is_not_found() {
        assert_eq!(AppRoute::from_path("/nope"), AppRoute::NotFound);
        assert_eq!(
            AppRoute::from_path("/reservations/42/unknown"),
            AppRoute::NotFound
        );
    }

    #[test]
    fn auth_requirements() {
        assert!(!AppRoute::Login.requires_auth());
        assert!(!AppRoute::Register.requires_auth());
        assert!(AppRoute::Dashboard.requires_auth());
        assert!(AppRoute::ReservationEdit("42".into()).requires_auth());
        assert!(AppRoute::Payments.requires_auth());
    }

    #[test]
    fn gate_renders_loading_during_initial_check() {
        // 冷启动时受保护页先渲染加载态，绝不闪现重定向
        assert_eq!(
            gate(&AppRoute::Dashboard, &SessionStage::Checking),
            GateDecision::Loading
        );
    }

    #[test]
    fn gate_redirects_unauthenticated_and_error() {
        assert_eq!(
            gate(&AppRoute::Reservations, &SessionStage::Unauthenticated),
            GateDecision::RedirectToLogin
        );
        assert_eq!(
            gate(&AppRoute::Reservations, &SessionStage::Error("x".into())),
            GateDecision::RedirectToLogin
        );
    }

    #[test]
    fn gate_allows_public_routes_regardless_of_stage() {
        assert_eq!(
            gate(&AppRoute::Login, &SessionStage::Checking),
            GateDecision::Allow
        );
        assert_eq!(
            gate(&AppRoute::Register, &SessionStage::Unauthenticated),
            GateDecision::Allow
        );
    }

    #[test]
    fn gate_allows_authenticated() {
        assert_eq!(
            gate(&AppRoute::Payments, &SessionStage::Authenticated(user())),
            GateDecision::Allow
        );
    }
}
