//! 部署记录：列表页 + 发起部署表单
//!
//! 部署记录不可编辑，列表只读，新记录由"发起部署"创建。

use leptos::prelude::*;

use mesa_shared::{Deployment, DeploymentDraft, DeploymentStatus};

use crate::auth::use_auth;
use crate::components::icons::Plus;
use crate::components::layout::{
    EmptyRow, ErrorBanner, LoadingRow, Pagination, SearchBox, Shell, SortableTh, use_toast,
};
use crate::controllers::form::{FormMode, FormView, validate_required};
use crate::controllers::list::ListViewState;
use crate::web::route::AppRoute;
use crate::web::router::use_router;

fn status_badge(status: DeploymentStatus) -> &'static str {
    match status {
        DeploymentStatus::Queued => "badge badge-ghost",
        DeploymentStatus::Running => "badge badge-info",
        DeploymentStatus::Succeeded => "badge badge-success",
        DeploymentStatus::Failed => "badge badge-error",
    }
}

#[component]
pub fn DeploymentsPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    let list = ListViewState::<Deployment>::new();
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

    view! {
        <Shell>
            <div class="flex items-center justify-between mb-6">
                <h1 class="text-2xl font-bold">"部署"</h1>
                <div class="flex gap-3">
                    <SearchBox on_search=on_search placeholder="搜索应用名" />
                    <button
                        class="btn btn-primary gap-2"
                        on:click=move |_| router.navigate(AppRoute::DeploymentNew)
                    >
                        <Plus attr:class="h-4 w-4" />
                        "发起部署"
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
                                    label="应用"
                                    direction=sort_of("application")
                                    on_toggle=toggle("application")
                                />
                                <th>"版本"</th>
                                <SortableTh
                                    label="环境"
                                    direction=sort_of("environment")
                                    on_toggle=toggle("environment")
                                />
                                <th>"状态"</th>
                                <SortableTh
                                    label="部署时间"
                                    direction=sort_of("deployedAt")
                                    on_toggle=toggle("deployedAt")
                                />
                            </tr>
                        </thead>
                        <tbody>
                            <Show when=move || core.with(|c| c.loading && c.items.is_empty())>
                                <LoadingRow colspan=5 />
                            </Show>
                            <Show when=move || core.with(|c| c.is_empty())>
                                <EmptyRow colspan=5 hint="还没有部署记录" />
                            </Show>
                            <For
                                each=move || core.get().items
                                key=|d| d.id.clone()
                                children=move |d: Deployment| {
                                    view! {
                                        <tr>
                                            <td class="font-medium">{d.application.clone()}</td>
                                            <td class="font-mono text-sm">{d.version.clone()}</td>
                                            <td>{d.environment.clone()}</td>
                                            <td>
                                                <span class=status_badge(
                                                    d.status,
                                                )>{d.status.label()}</span>
                                            </td>
                                            <td>
                                                {d.deployed_at.format("%Y-%m-%d %H:%M").to_string()}
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
// 发起部署
// =========================================================

#[derive(Debug, Clone, PartialEq)]
struct DeploymentFormModel {
    application: String,
    version: String,
    environment: String,
}

impl Default for DeploymentFormModel {
    fn default() -> Self {
        Self {
            application: String::new(),
            version: String::new(),
            environment: "staging".into(),
        }
    }
}

impl DeploymentFormModel {
    fn to_draft(&self) -> Result<DeploymentDraft, String> {
        validate_required(&[("应用名", &self.application), ("版本号", &self.version)])?;

        Ok(DeploymentDraft {
            application: self.application.trim().to_string(),
            version: self.version.trim().to_string(),
            environment: self.environment.clone(),
        })
    }
}

#[component]
pub fn DeploymentFormPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let toast = use_toast();

    let form = FormView::<Deployment>::new(FormMode::Create);
    let lifecycle = form.lifecycle();
    let model = RwSignal::new(DeploymentFormModel::default());

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        match model.get_untracked().to_draft() {
            Err(msg) => form.reject(msg),
            Ok(draft) => {
                form.submit(auth, draft, move |_| {
                    toast.success("部署已发起");
                    router.navigate(AppRoute::Deployments);
                });
            }
        }
    };

    let set_field = move |f: fn(&mut DeploymentFormModel, String)| {
        move |ev: leptos::web_sys::Event| {
            model.update(|m| f(m, event_target_value(&ev)));
        }
    };

    let error = move || lifecycle.get().error;
    let disabled = move || !lifecycle.get().can_submit();
    let submitting = move || lifecycle.get().submitting;

    view! {
        <Shell>
            <h1 class="text-2xl font-bold mb-6">"发起部署"</h1>

            <div class="card bg-base-100 shadow-md max-w-2xl">
                <form class="card-body" on:submit=on_submit>
                    <Show when=move || error().is_some()>
                        <div role="alert" class="alert alert-error text-sm py-2">
                            <span>{move || error().unwrap_or_default()}</span>
                        </div>
                    </Show>

                    <div class="form-control">
                        <label class="label">
                            <span class="label-text">"应用名"</span>
                        </label>
                        <input
                            type="text"
                            placeholder="mesa-api"
                            class="input input-bordered font-mono"
                            prop:value=move || model.get().application
                            on:input=set_field(|m, v| m.application = v)
                        />
                    </div>
                    <div class="form-control">
                        <label class="label">
                            <span class="label-text">"版本号"</span>
                        </label>
                        <input
                            type="text"
                            placeholder="v2.4.1"
                            class="input input-bordered font-mono"
                            prop:value=move || model.get().version
                            on:input=set_field(|m, v| m.version = v)
                        />
                    </div>
                    <div class="form-control">
                        <label class="label">
                            <span class="label-text">"环境"</span>
                        </label>
                        <select
                            class="select select-bordered"
                            prop:value=move || model.get().environment
                            on:change=set_field(|m, v| m.environment = v)
                        >
                            <option value="staging">"staging"</option>
                            <option value="production">"production"</option>
                        </select>
                    </div>

                    <div class="flex justify-end gap-2 mt-4">
                        <button
                            type="button"
                            class="btn btn-ghost"
                            on:click=move |_| router.navigate(AppRoute::Deployments)
                        >
                            "取消"
                        </button>
                        <button type="submit" class="btn btn-primary" disabled=disabled>
                            {move || {
                                if submitting() {
                                    view! {
                                        <span class="loading loading-spinner"></span>
                                        "提交中..."
                                    }
                                        .into_any()
                                } else {
                                    "发起部署".into_any()
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
    fn deployment_draft_requires_application_and_version() {
        let mut m = DeploymentFormModel::default();
        assert_eq!(m.to_draft(), Err("请填写应用名".to_string()));

        m.application = "mesa-api".into();
        assert_eq!(m.to_draft(), Err("请填写版本号".to_string()));

        m.version = "v2.4.1".into();
        let draft = m.to_draft().unwrap();
        assert_eq!(draft.environment, "staging");
    }
}
