//! 后端服务配置：列表页 + 新建/编辑表单

use leptos::prelude::*;

use mesa_shared::{ServiceConfig, ServiceConfigDraft};

use crate::auth::use_auth;
use crate::components::icons::{Pencil, Plus, Trash2};
use crate::components::layout::{
    EmptyRow, ErrorBanner, LoadingRow, Pagination, SearchBox, Shell, SortableTh, use_toast,
};
use crate::controllers::form::{FormMode, FormView, validate_required};
use crate::controllers::list::ListViewState;
use crate::web::route::AppRoute;
use crate::web::router::use_router;

fn environment_badge(environment: &str) -> &'static str {
    match environment {
        "production" => "badge badge-error",
        "staging" => "badge badge-warning",
        _ => "badge badge-info",
    }
}

#[component]
pub fn ServicesPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let toast = use_toast();

    let list = ListViewState::<ServiceConfig>::new();
    list.load(auth);
    let core = list.core();

    let page = Signal::derive(move || core.get().query.page);
    let total_pages = Signal::derive(move || core.get().total_pages);
    let error_msg = Signal::derive(move || core.get().error.as_ref().map(|e| e.message.clone()));

    let on_search = Callback::new(move |term: String| list.set_search(auth, &term));
    let on_page = Callback::new(move |p: u32| list.goto_page(auth, p));
    let on_retry = Callback::new(move |_| list.retry(auth));
    let sort_of = move |key: &'static str| Signal::derive(move || core.get().sort_indicator(key));
    let toggle = move |key: &'static str| Callback::new(move |_| list.toggle_sort(auth, key));

    let on_delete = move |id: String, name: String| {
        let confirmed = web_sys::window()
            .map(|w| {
                w.confirm_with_message(&format!("确定删除服务 {}？", name))
                    .unwrap_or(false)
            })
            .unwrap_or(false);
        if confirmed {
            list.delete(auth, id);
            toast.success("服务已删除");
        }
    };

    view! {
        <Shell>
            <div class="flex items-center justify-between mb-6">
                <h1 class="text-2xl font-bold">"后端服务"</h1>
                <div class="flex gap-3">
                    <SearchBox on_search=on_search placeholder="搜索服务名称" />
                    <button
                        class="btn btn-primary gap-2"
                        on:click=move |_| router.navigate(AppRoute::ServiceNew)
                    >
                        <Plus attr:class="h-4 w-4" />
                        "新建服务"
                    </button>
                </div>
            </div>

            <ErrorBanner message=error_msg on_retry=on_retry />

            <div class="card bg-base-100 shadow-md">
                <div class="card-body p-0 overflow-x-auto">
                    <table class="table">
                        <thead>
                            <tr>
                                <SortableTh
                                    label="名称"
                                    direction=sort_of("name")
                                    on_toggle=toggle("name")
                                />
                                <th>"端点"</th>
                                <SortableTh
                                    label="环境"
                                    direction=sort_of("environment")
                                    on_toggle=toggle("environment")
                                />
                                <th>"状态"</th>
                                <th>"描述"</th>
                                <th class="text-right">"操作"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <Show when=move || core.with(|c| c.loading && c.items.is_empty())>
                                <LoadingRow colspan=6 />
                            </Show>
                            <Show when=move || core.with(|c| c.is_empty())>
                                <EmptyRow colspan=6 hint="没有符合条件的服务" />
                            </Show>
                            <For
                                each=move || core.get().items
                                key=|s| s.id.clone()
                                children=move |service: ServiceConfig| {
                                    let edit_id = service.id.clone();
                                    let del_id = service.id.clone();
                                    let del_name = service.name.clone();
                                    view! {
                                        <tr>
                                            <td class="font-medium">{service.name.clone()}</td>
                                            <td class="font-mono text-sm">
                                                {service.endpoint_url.clone()}
                                            </td>
                                            <td>
                                                <span class=environment_badge(
                                                    &service.environment,
                                                )>{service.environment.clone()}</span>
                                            </td>
                                            <td>
                                                {if service.enabled {
                                                    view! {
                                                        <span class="badge badge-success">"启用"</span>
                                                    }
                                                        .into_any()
                                                } else {
                                                    view! { <span class="badge badge-ghost">"停用"</span> }
                                                        .into_any()
                                                }}
                                            </td>
                                            <td class="max-w-xs truncate">
                                                {service.description.clone()}
                                            </td>
                                            <td class="text-right">
                                                <button
                                                    class="btn btn-ghost btn-xs"
                                                    on:click=move |_| {
                                                        router.navigate(AppRoute::ServiceEdit(edit_id.clone()))
                                                    }
                                                >
                                                    <Pencil attr:class="h-4 w-4" />
                                                </button>
                                                <button
                                                    class="btn btn-ghost btn-xs text-error"
                                                    on:click=move |_| on_delete(
                                                        del_id.clone(),
                                                        del_name.clone(),
                                                    )
                                                >
                                                    <Trash2 attr:class="h-4 w-4" />
                                                </button>
                                            </td>
                                        </tr>
                                    }
                                }
                            />
                        </tbody>
                    </table>
                </div>
            </div>

            <div class="flex justify-end mt-4">
                <Pagination page=page total_pages=total_pages on_page=on_page />
            </div>
        </Shell>
    }
}

// =========================================================
// 表单页
// =========================================================

#[derive(Debug, Clone, PartialEq)]
struct ServiceFormModel {
    name: String,
    endpoint_url: String,
    environment: String,
    enabled: bool,
    description: String,
}

impl Default for ServiceFormModel {
    fn default() -> Self {
        Self {
            name: String::new(),
            endpoint_url: String::new(),
            environment: "development".into(),
            enabled: true,
            description: String::new(),
        }
    }
}

impl ServiceFormModel {
    fn from_entity(s: &ServiceConfig) -> Self {
        Self {
            name: s.name.clone(),
            endpoint_url: s.endpoint_url.clone(),
            environment: s.environment.clone(),
            enabled: s.enabled,
            description: s.description.clone(),
        }
    }

    fn to_draft(&self) -> Result<ServiceConfigDraft, String> {
        validate_required(&[("服务名称", &self.name), ("端点地址", &self.endpoint_url)])?;

        let endpoint = self.endpoint_url.trim();
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err("端点地址必须以 http:// 或 https:// 开头".to_string());
        }

        Ok(ServiceConfigDraft {
            name: self.name.trim().to_string(),
            endpoint_url: endpoint.to_string(),
            environment: self.environment.clone(),
            enabled: self.enabled,
            description: self.description.trim().to_string(),
        })
    }
}

#[component]
pub fn ServiceFormPage(#[prop(optional)] id: Option<String>) -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let toast = use_toast();

    let mode = match &id {
        Some(id) => FormMode::Edit(id.clone()),
        None => FormMode::Create,
    };
    let is_edit = mode.is_edit();
    let form = FormView::<ServiceConfig>::new(mode);
    let lifecycle = form.lifecycle();
    let model = RwSignal::new(ServiceFormModel::default());

    if let Some(id) = id {
        form.load(auth, id, move |s| {
            model.set(ServiceFormModel::from_entity(&s));
        });
    }

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        match model.get_untracked().to_draft() {
            Err(msg) => form.reject(msg),
            Ok(draft) => {
                form.submit(auth, draft, move |_| {
                    toast.success(if is_edit { "服务已更新" } else { "服务已创建" });
                    router.navigate(AppRoute::Services);
                });
            }
        }
    };

    let set_field = move |f: fn(&mut ServiceFormModel, String)| {
        move |ev: leptos::web_sys::Event| {
            model.update(|m| f(m, event_target_value(&ev)));
        }
    };

    let error = move || lifecycle.get().error;
    let load_failed = move || lifecycle.get().load_failed;
    let disabled = move || !lifecycle.get().can_submit();
    let submitting = move || lifecycle.get().submitting;

    view! {
        <Shell>
            <h1 class="text-2xl font-bold mb-6">
                {if is_edit { "编辑服务" } else { "新建服务" }}
            </h1>

            <Show when=move || load_failed().is_some()>
                <div role="alert" class="alert alert-error mb-4">
                    <span>
                        {move || format!("加载服务失败：{}", load_failed().unwrap_or_default())}
                    </span>
                    <button
                        class="btn btn-sm"
                        on:click=move |_| router.navigate(AppRoute::Services)
                    >
                        "返回列表"
                    </button>
                </div>
            </Show>

            <div class="card bg-base-100 shadow-md max-w-2xl">
                <form class="card-body" on:submit=on_submit>
                    <Show when=move || error().is_some()>
                        <div role="alert" class="alert alert-error text-sm py-2">
                            <span>{move || error().unwrap_or_default()}</span>
                        </div>
                    </Show>

                    <Show when=move || lifecycle.get().loading>
                        <div class="flex justify-center py-4">
                            <span class="loading loading-spinner text-primary"></span>
                        </div>
                    </Show>

                    <div class="form-control">
                        <label class="label">
                            <span class="label-text">"服务名称"</span>
                        </label>
                        <input
                            type="text"
                            class="input input-bordered"
                            prop:value=move || model.get().name
                            on:input=set_field(|m, v| m.name = v)
                        />
                    </div>
                    <div class="form-control">
                        <label class="label">
                            <span class="label-text">"端点地址"</span>
                        </label>
                        <input
                            type="url"
                            placeholder="https://api.internal.example.com"
                            class="input input-bordered font-mono"
                            prop:value=move || model.get().endpoint_url
                            on:input=set_field(|m, v| m.endpoint_url = v)
                        />
                    </div>
                    <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                        <div class="form-control">
                            <label class="label">
                                <span class="label-text">"环境"</span>
                            </label>
                            <select
                                class="select select-bordered"
                                prop:value=move || model.get().environment
                                on:change=set_field(|m, v| m.environment = v)
                            >
                                <option value="development">"development"</option>
                                <option value="staging">"staging"</option>
                                <option value="production">"production"</option>
                            </select>
                        </div>
                        <div class="form-control justify-end">
                            <label class="label cursor-pointer justify-start gap-3">
                                <input
                                    type="checkbox"
                                    class="toggle toggle-primary"
                                    prop:checked=move || model.get().enabled
                                    on:change=move |ev| {
                                        model.update(|m| m.enabled = event_target_checked(&ev))
                                    }
                                />
                                <span class="label-text">"启用该服务"</span>
                            </label>
                        </div>
                    </div>
                    <div class="form-control">
                        <label class="label">
                            <span class="label-text">"描述"</span>
                        </label>
                        <textarea
                            class="textarea textarea-bordered"
                            prop:value=move || model.get().description
                            on:input=set_field(|m, v| m.description = v)
                        ></textarea>
                    </div>

                    <div class="flex justify-end gap-2 mt-4">
                        <button
                            type="button"
                            class="btn btn-ghost"
                            on:click=move |_| router.navigate(AppRoute::Services)
                        >
                            "取消"
                        </button>
                        <button type="submit" class="btn btn-primary" disabled=disabled>
                            {move || {
                                if submitting() {
                                    view! {
                                        <span class="loading loading-spinner"></span>
                                        "保存中..."
                                    }
                                        .into_any()
                                } else {
                                    "保存".into_any()
                                }
                            }}
                        </button>
                    </div>
                </form>
            </div>
        </Shell>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_must_be_http() {
        let mut m = ServiceFormModel {
            name: "订单服务".into(),
            endpoint_url: "ftp://example.com".into(),
            ..Default::default()
        };
        assert!(m.to_draft().unwrap_err().contains("http"));

        m.endpoint_url = "https://orders.internal".into();
        assert!(m.to_draft().is_ok());
    }

    #[test]
    fn default_model_is_enabled_development() {
        let m = ServiceFormModel::default();
        assert!(m.enabled);
        assert_eq!(m.environment, "development");
    }
}
