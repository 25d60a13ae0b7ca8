//! 页面骨架与列表页共用控件
//!
//! `Shell` 提供导航栏 + 侧边菜单 + 全局通知；其余是各列表页
//! 拼装表格时复用的小件（搜索框、可排序表头、分页条、错误条）。

use leptos::prelude::*;

use mesa_shared::SortDirection;

use crate::auth::use_auth;
use crate::components::icons::*;
use crate::web::route::AppRoute;
use crate::web::router::use_router;

// =========================================================
// 全局通知 (Toast)
// =========================================================

/// 全局通知上下文：消息内容 + 是否出错
#[derive(Clone, Copy)]
pub struct ToastContext(RwSignal<Option<(String, bool)>>);

impl ToastContext {
    pub fn new() -> Self {
        Self(RwSignal::new(None))
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(message.into(), false);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(message.into(), true);
    }

    fn show(&self, message: String, is_error: bool) {
        let slot = self.0;
        slot.set(Some((message, is_error)));
        // 3 秒后自动消失
        set_timeout(
            move || {
                let _ = slot.try_update(|s| *s = None);
            },
            std::time::Duration::from_secs(3),
        );
    }
}

impl Default for ToastContext {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_toast() -> ToastContext {
    use_context::<ToastContext>()
        .expect("ToastContext not found in context. Ensure App provides it.")
}

#[component]
fn Toast() -> impl IntoView {
    let toast = use_toast();
    let notification = toast.0;

    view! {
        <Show when=move || notification.get().is_some()>
            <div class="toast toast-top toast-end z-50">
                <div class=move || {
                    if notification.get().map(|(_, e)| e).unwrap_or(false) {
                        "alert alert-error shadow-lg"
                    } else {
                        "alert alert-success shadow-lg"
                    }
                }>
                    <span>{move || notification.get().map(|(m, _)| m).unwrap_or_default()}</span>
                </div>
            </div>
        </Show>
    }
}

// =========================================================
// 页面骨架 (Shell)
// =========================================================

/// 导航菜单项：目标路由 + 标签
const NAV_ITEMS: &[(&str, &str)] = &[
    ("/dashboard", "仪表盘"),
    ("/reservations", "预订"),
    ("/inventory", "库存"),
    ("/services", "服务"),
    ("/integrations", "集成"),
    ("/deployments", "部署"),
    ("/payments", "支付"),
];

/// 路由归属的菜单段（新建/编辑页高亮所属列表项）
fn nav_section(route: &AppRoute) -> &'static str {
    match route {
        AppRoute::Dashboard => "/dashboard",
        AppRoute::Reservations | AppRoute::ReservationNew | AppRoute::ReservationEdit(_) => {
            "/reservations"
        }
        AppRoute::Inventory | AppRoute::InventoryNew | AppRoute::InventoryEdit(_) => "/inventory",
        AppRoute::Services | AppRoute::ServiceNew | AppRoute::ServiceEdit(_) => "/services",
        AppRoute::Integrations | AppRoute::IntegrationNew | AppRoute::IntegrationEdit(_) => {
            "/integrations"
        }
        AppRoute::Deployments | AppRoute::DeploymentNew => "/deployments",
        AppRoute::Payments => "/payments",
        _ => "",
    }
}

/// 受保护页面的统一骨架
#[component]
pub fn Shell(children: Children) -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let current = router.current_route();

    let user_name = move || {
        auth.0
            .get()
            .stage
            .user()
            .map(|u| u.name.clone())
            .unwrap_or_default()
    };

    let on_logout = move |_| {
        // 路由守卫 Effect 负责跳回登录页
        auth.logout();
    };

    view! {
        <div class="min-h-screen bg-base-200 font-sans">
            <Toast />
            <div class="navbar bg-base-100 shadow-md px-4">
                <div class="flex-1 gap-2">
                    <Utensils attr:class="h-6 w-6 text-primary" />
                    <span class="text-xl font-bold">"Mesa 餐厅管理"</span>
                </div>
                <div class="flex-none gap-3">
                    <span class="text-base-content/70 hidden md:inline">{user_name}</span>
                    <button on:click=on_logout class="btn btn-outline btn-error btn-sm gap-2">
                        <LogOut attr:class="h-4 w-4" />
                        "退出登录"
                    </button>
                </div>
            </div>

            <div class="flex">
                <aside class="w-48 min-h-[calc(100vh-4rem)] bg-base-100 shadow-md hidden lg:block">
                    <ul class="menu p-2 gap-1">
                        {NAV_ITEMS
                            .iter()
                            .map(|(path, label)| {
                                let path = *path;
                                let label = *label;
                                let active = move || {
                                    nav_section(&current.get()) == path
                                };
                                view! {
                                    <li>
                                        <button
                                            class=move || {
                                                if active() { "active" } else { "" }
                                            }
                                            on:click=move |_| router.navigate_path(path)
                                        >
                                            {label}
                                        </button>
                                    </li>
                                }
                            })
                            .collect_view()}
                    </ul>
                </aside>

                <main class="flex-1 p-4 md:p-8">{children()}</main>
            </div>
        </div>
    }
}

// =========================================================
// 列表页控件
// =========================================================

/// 搜索框：提交时触发回调（回车或点击按钮）
#[component]
pub fn SearchBox(
    on_search: Callback<String>,
    #[prop(optional)] placeholder: &'static str,
) -> impl IntoView {
    let (term, set_term) = signal(String::new());

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        on_search.run(term.get_untracked());
    };

    view! {
        <form class="join" on:submit=on_submit>
            <input
                type="text"
                class="input input-bordered join-item w-56"
                placeholder=placeholder
                prop:value=term
                on:input=move |ev| set_term.set(event_target_value(&ev))
            />
            <button type="submit" class="btn join-item">
                <Search attr:class="h-4 w-4" />
            </button>
        </form>
    }
}

/// 可排序表头：点击切换排序，箭头指示当前方向
#[component]
pub fn SortableTh(
    label: &'static str,
    direction: Signal<Option<SortDirection>>,
    on_toggle: Callback<()>,
) -> impl IntoView {
    view! {
        <th
            class="cursor-pointer select-none hover:bg-base-200"
            on:click=move |_| on_toggle.run(())
        >
            <span class="inline-flex items-center gap-1">
                {label}
                {move || match direction.get() {
                    Some(SortDirection::Asc) => {
                        view! { <ChevronUp attr:class="h-3 w-3" /> }.into_any()
                    }
                    Some(SortDirection::Desc) => {
                        view! { <ChevronDown attr:class="h-3 w-3" /> }.into_any()
                    }
                    None => ().into_any(),
                }}
            </span>
        </th>
    }
}

/// 分页条：上一页/下一页 + 当前页指示
#[component]
pub fn Pagination(
    page: Signal<u32>,
    total_pages: Signal<u32>,
    on_page: Callback<u32>,
) -> impl IntoView {
    let has_prev = move || page.get() > 1;
    let has_next = move || page.get() < total_pages.get();

    view! {
        <div class="join">
            <button
                class="join-item btn btn-sm"
                disabled=move || !has_prev()
                on:click=move |_| on_page.run(page.get_untracked().saturating_sub(1))
            >
                <ChevronLeft attr:class="h-4 w-4" />
            </button>
            <span class="join-item btn btn-sm btn-disabled">
                {move || format!("第 {} / {} 页", page.get(), total_pages.get().max(1))}
            </span>
            <button
                class="join-item btn btn-sm"
                disabled=move || !has_next()
                on:click=move |_| on_page.run(page.get_untracked() + 1)
            >
                <ChevronRight attr:class="h-4 w-4" />
            </button>
        </div>
    }
}

/// 错误条：取数失败时叠加在已有数据之上，带重试按钮
#[component]
pub fn ErrorBanner(message: Signal<Option<String>>, on_retry: Callback<()>) -> impl IntoView {
    view! {
        <Show when=move || message.get().is_some()>
            <div role="alert" class="alert alert-error mb-4">
                <AlertTriangle attr:class="h-5 w-5" />
                <span>{move || message.get().unwrap_or_default()}</span>
                <button class="btn btn-sm btn-ghost gap-1" on:click=move |_| on_retry.run(())>
                    <RefreshCw attr:class="h-4 w-4" />
                    "重试"
                </button>
            </div>
        </Show>
    }
}

/// 表格占位行：加载中
#[component]
pub fn LoadingRow(colspan: u32) -> impl IntoView {
    view! {
        <tr>
            <td colspan=colspan class="text-center py-8">
                <span class="loading loading-spinner loading-md text-primary"></span>
            </td>
        </tr>
    }
}

/// 表格占位行：空结果
#[component]
pub fn EmptyRow(colspan: u32, #[prop(optional)] hint: &'static str) -> impl IntoView {
    view! {
        <tr>
            <td colspan=colspan class="text-center py-8 text-base-content/60">
                {if hint.is_empty() { "暂无数据" } else { hint }}
            </td>
        </tr>
    }
}
