//! Mesa 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由定义与守卫决策（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `auth`: 会话与认证状态管理
//! - `controllers`: 列表/表单控制器（纯状态机 + 信号封装）
//! - `components`: UI 组件层

mod api;
mod auth;
mod components {
    pub mod dashboard;
    pub mod deployments;
    mod icons;
    pub mod integrations;
    pub mod inventory;
    pub mod layout;
    pub mod login;
    pub mod payments;
    pub mod register;
    pub mod reservations;
    pub mod services;
}
mod config;
mod controllers;
mod error;

use leptos::prelude::*;

use crate::auth::AuthContext;
use crate::components::dashboard::DashboardPage;
use crate::components::deployments::{DeploymentFormPage, DeploymentsPage};
use crate::components::integrations::{IntegrationFormPage, IntegrationsPage};
use crate::components::inventory::{InventoryFormPage, InventoryPage};
use crate::components::layout::ToastContext;
use crate::components::login::LoginPage;
use crate::components::payments::PaymentsPage;
use crate::components::register::RegisterPage;
use crate::components::reservations::{ReservationFormPage, ReservationsPage};
use crate::components::services::{ServiceFormPage, ServicesPage};

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate，
// 以减小 WASM 二进制体积。
pub(crate) mod web;

use web::route::AppRoute;
use web::router::{Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::Dashboard => view! { <DashboardPage /> }.into_any(),
        AppRoute::Reservations => view! { <ReservationsPage /> }.into_any(),
        AppRoute::ReservationNew => view! { <ReservationFormPage /> }.into_any(),
        AppRoute::ReservationEdit(id) => view! { <ReservationFormPage id=id /> }.into_any(),
        AppRoute::Inventory => view! { <InventoryPage /> }.into_any(),
        AppRoute::InventoryNew => view! { <InventoryFormPage /> }.into_any(),
        AppRoute::InventoryEdit(id) => view! { <InventoryFormPage id=id /> }.into_any(),
        AppRoute::Services => view! { <ServicesPage /> }.into_any(),
        AppRoute::ServiceNew => view! { <ServiceFormPage /> }.into_any(),
        AppRoute::ServiceEdit(id) => view! { <ServiceFormPage id=id /> }.into_any(),
        AppRoute::Integrations => view! { <IntegrationsPage /> }.into_any(),
        AppRoute::IntegrationNew => view! { <IntegrationFormPage /> }.into_any(),
        AppRoute::IntegrationEdit(id) => view! { <IntegrationFormPage id=id /> }.into_any(),
        AppRoute::Deployments => view! { <DeploymentsPage /> }.into_any(),
        AppRoute::DeploymentNew => view! { <DeploymentFormPage /> }.into_any(),
        AppRoute::Payments => view! { <PaymentsPage /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"页面未找到"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建认证上下文（从 LocalStorage 恢复令牌）
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);
    provide_context(ToastContext::new());

    // 2. 冷启动会话检查（无令牌时已短路为未认证）
    auth_ctx.init();

    // 3. 会话阶段信号注入路由服务（解耦！）
    let stage = auth_ctx.stage_signal();

    view! {
        // 4. 路由器组件：注入会话阶段实现守卫
        <Router stage=stage>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
