//! 第三方集成：列表页 + 新建/编辑表单
//!
//! 密钥只在创建/轮换时提交完整值，服务端回传掩码后的尾部；
//! 编辑时留空表示保持原密钥不变。

use leptos::prelude::*;

use mesa_shared::{Integration, IntegrationDraft};

use crate::auth::use_auth;
use crate::components::icons::{Pencil, Plus, Trash2};
use crate::components::layout::{
    EmptyRow, ErrorBanner, LoadingRow, Pagination, SearchBox, Shell, SortableTh, use_toast,
};
use crate::config::STRIPE_PUBLIC_KEY;
use crate::controllers::form::{FormMode, FormView, validate_required};
use crate::controllers::list::ListViewState;
use crate::web::route::AppRoute;
use crate::web::router::use_router;

fn masked_key(suffix: Option<&str>) -> String {
    match suffix {
        Some(s) => format!("••••{}", s),
        None => "—".to_string(),
    }
}

#[component]
pub fn IntegrationsPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let toast = use_toast();

    let list = ListViewState::<Integration>::new();
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
                w.confirm_with_message(&format!("确定删除集成 {}？", name))
                    .unwrap_or(false)
            })
            .unwrap_or(false);
        if confirmed {
            list.delete(auth, id);
            toast.success("集成已删除");
        }
    };

    view! {
        <Shell>
            <div class="flex items-center justify-between mb-6">
                <h1 class="text-2xl font-bold">"集成"</h1>
                <div class="flex gap-3">
                    <SearchBox on_search=on_search placeholder="搜索集成名称" />
                    <button
                        class="btn btn-primary gap-2"
                        on:click=move |_| router.navigate(AppRoute::IntegrationNew)
                    >
                        <Plus attr:class="h-4 w-4" />
                        "新建集成"
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
                                    direction=sort_of("displayName")
                                    on_toggle=toggle("displayName")
                                />
                                <SortableTh
                                    label="供应商"
                                    direction=sort_of("provider")
                                    on_toggle=toggle("provider")
                                />
                                <th>"Webhook"</th>
                                <th>"密钥"</th>
                                <th>"状态"</th>
                                <th class="text-right">"操作"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <Show when=move || core.with(|c| c.loading && c.items.is_empty())>
                                <LoadingRow colspan=6 />
                            </Show>
                            <Show when=move || core.with(|c| c.is_empty())>
                                <EmptyRow colspan=6 hint="没有符合条件的集成" />
                            </Show>
                            <For
                                each=move || core.get().items
                                key=|i| i.id.clone()
                                children=move |integration: Integration| {
                                    let edit_id = integration.id.clone();
                                    let del_id = integration.id.clone();
                                    let del_name = integration.display_name.clone();
                                    view! {
                                        <tr>
                                            <td class="font-medium">
                                                {integration.display_name.clone()}
                                            </td>
                                            <td>
                                                <span class="badge badge-outline">
                                                    {integration.provider.clone()}
                                                </span>
                                            </td>
                                            <td class="font-mono text-sm max-w-xs truncate">
                                                {integration
                                                    .webhook_url
                                                    .clone()
                                                    .unwrap_or_else(|| "—".into())}
                                            </td>
                                            <td class="font-mono text-sm">
                                                {masked_key(integration.api_key_suffix.as_deref())}
                                            </td>
                                            <td>
                                                {if integration.enabled {
                                                    view! {
                                                        <span class="badge badge-success">"启用"</span>
                                                    }
                                                        .into_any()
                                                } else {
                                                    view! { <span class="badge badge-ghost">"停用"</span> }
                                                        .into_any()
                                                }}
                                            </td>
                                            <td class="text-right">
                                                <button
                                                    class="btn btn-ghost btn-xs"
                                                    on:click=move |_| {
                                                        router
                                                            .navigate(AppRoute::IntegrationEdit(edit_id.clone()))
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
struct IntegrationFormModel {
    provider: String,
    display_name: String,
    enabled: bool,
    webhook_url: String,
    /// 新密钥；编辑时留空表示不轮换
    api_key: String,
    is_edit: bool,
}

impl Default for IntegrationFormModel {
    fn default() -> Self {
        Self {
            provider: "stripe".into(),
            display_name: String::new(),
            enabled: true,
            webhook_url: String::new(),
            api_key: String::new(),
            is_edit: false,
        }
    }
}

impl IntegrationFormModel {
    fn from_entity(i: &Integration) -> Self {
        Self {
            provider: i.provider.clone(),
            display_name: i.display_name.clone(),
            enabled: i.enabled,
            webhook_url: i.webhook_url.clone().unwrap_or_default(),
            api_key: String::new(),
            is_edit: true,
        }
    }

    fn to_draft(&self) -> Result<IntegrationDraft, String> {
        validate_required(&[("显示名称", &self.display_name)])?;

        // 新建必须提供密钥，编辑留空则保持不变
        let api_key = {
            let k = self.api_key.trim();
            if k.is_empty() {
                if !self.is_edit {
                    return Err("请填写 API 密钥".to_string());
                }
                None
            } else {
                Some(k.to_string())
            }
        };

        let webhook_url = {
            let w = self.webhook_url.trim();
            if w.is_empty() {
                None
            } else if !w.starts_with("https://") {
                return Err("Webhook 地址必须以 https:// 开头".to_string());
            } else {
                Some(w.to_string())
            }
        };

        Ok(IntegrationDraft {
            provider: self.provider.clone(),
            display_name: self.display_name.trim().to_string(),
            enabled: self.enabled,
            webhook_url,
            api_key,
        })
    }
}

#[component]
pub fn IntegrationFormPage(#[prop(optional)] id: Option<String>) -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let toast = use_toast();

    let mode = match &id {
        Some(id) => FormMode::Edit(id.clone()),
        None => FormMode::Create,
    };
    let is_edit = mode.is_edit();
    let form = FormView::<Integration>::new(mode);
    let lifecycle = form.lifecycle();
    let model = RwSignal::new(IntegrationFormModel::default());

    if let Some(id) = id {
        form.load(auth, id, move |i| {
            model.set(IntegrationFormModel::from_entity(&i));
        });
    }

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        match model.get_untracked().to_draft() {
            Err(msg) => form.reject(msg),
            Ok(draft) => {
                form.submit(auth, draft, move |_| {
                    toast.success(if is_edit { "集成已更新" } else { "集成已创建" });
                    router.navigate(AppRoute::Integrations);
                });
            }
        }
    };

    let set_field = move |f: fn(&mut IntegrationFormModel, String)| {
        move |ev: leptos::web_sys::Event| {
            model.update(|m| f(m, event_target_value(&ev)));
        }
    };

    let error = move || lifecycle.get().error;
    let load_failed = move || lifecycle.get().load_failed;
    let disabled = move || !lifecycle.get().can_submit();
    let submitting = move || lifecycle.get().submitting;
    let is_stripe = move || model.get().provider == "stripe";

    view! {
        <Shell>
            <h1 class="text-2xl font-bold mb-6">
                {if is_edit { "编辑集成" } else { "新建集成" }}
            </h1>

            <Show when=move || load_failed().is_some()>
                <div role="alert" class="alert alert-error mb-4">
                    <span>
                        {move || format!("加载集成失败：{}", load_failed().unwrap_or_default())}
                    </span>
                    <button
                        class="btn btn-sm"
                        on:click=move |_| router.navigate(AppRoute::Integrations)
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

                    <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                        <div class="form-control">
                            <label class="label">
                                <span class="label-text">"供应商"</span>
                            </label>
                            <select
                                class="select select-bordered"
                                prop:value=move || model.get().provider
                                on:change=set_field(|m, v| m.provider = v)
                            >
                                <option value="stripe">"Stripe"</option>
                                <option value="s3">"S3 存储"</option>
                                <option value="mailgun">"Mailgun"</option>
                                <option value="custom">"自定义"</option>
                            </select>
                        </div>
                        <div class="form-control">
                            <label class="label">
                                <span class="label-text">"显示名称"</span>
                            </label>
                            <input
                                type="text"
                                class="input input-bordered"
                                prop:value=move || model.get().display_name
                                on:input=set_field(|m, v| m.display_name = v)
                            />
                        </div>
                    </div>

                    <Show when=is_stripe>
                        <div class="text-sm text-base-content/60">
                            {format!("当前前端公钥：{}", STRIPE_PUBLIC_KEY)}
                        </div>
                    </Show>

                    <div class="form-control">
                        <label class="label">
                            <span class="label-text">"Webhook 地址（可选）"</span>
                        </label>
                        <input
                            type="url"
                            placeholder="https://hooks.example.com/mesa"
                            class="input input-bordered font-mono"
                            prop:value=move || model.get().webhook_url
                            on:input=set_field(|m, v| m.webhook_url = v)
                        />
                    </div>
                    <div class="form-control">
                        <label class="label">
                            <span class="label-text">
                                {if is_edit { "API 密钥（留空保持不变）" } else { "API 密钥" }}
                            </span>
                        </label>
                        <input
                            type="password"
                            class="input input-bordered font-mono"
                            prop:value=move || model.get().api_key
                            on:input=set_field(|m, v| m.api_key = v)
                        />
                    </div>
                    <div class="form-control">
                        <label class="label cursor-pointer justify-start gap-3">
                            <input
                                type="checkbox"
                                class="toggle toggle-primary"
                                prop:checked=move || model.get().enabled
                                on:change=move |ev| {
                                    model.update(|m| m.enabled = event_target_checked(&ev))
                                }
                            />
                            <span class="label-text">"启用该集成"</span>
                        </label>
                    </div>

                    <div class="flex justify-end gap-2 mt-4">
                        <button
                            type="button"
                            class="btn btn-ghost"
                            on:click=move |_| router.navigate(AppRoute::Integrations)
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
    fn create_requires_api_key_but_edit_does_not() {
        let mut m = IntegrationFormModel {
            display_name: "主 Stripe 账户".into(),
            ..Default::default()
        };
        assert_eq!(m.to_draft(), Err("请填写 API 密钥".to_string()));

        m.is_edit = true;
        let draft = m.to_draft().unwrap();
        assert!(draft.api_key.is_none());

        m.api_key = "sk_live_xxx".into();
        assert_eq!(m.to_draft().unwrap().api_key.as_deref(), Some("sk_live_xxx"));
    }

    #[test]
    fn webhook_must_be_https() {
        let m = IntegrationFormModel {
            display_name: "S3 备份".into(),
            provider: "s3".into(),
            api_key: "AKIA...".into(),
            webhook_url: "http://insecure.example.com".into(),
            ..Default::default()
        };
        assert!(m.to_draft().unwrap_err().contains("https"));
    }

    #[test]
    fn masked_key_renders_suffix() {
        assert_eq!(masked_key(Some("4f2a")), "••••4f2a");
        assert_eq!(masked_key(None), "—");
    }
}
