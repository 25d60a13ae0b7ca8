//! 库存管理：列表页 + 新建/编辑表单

use leptos::prelude::*;

use mesa_shared::{InventoryItem, InventoryItemDraft};

use crate::auth::use_auth;
use crate::components::icons::{Pencil, Plus, Trash2};
use crate::components::layout::{
    EmptyRow, ErrorBanner, LoadingRow, Pagination, SearchBox, Shell, SortableTh, use_toast,
};
use crate::controllers::form::{FormMode, FormView, validate_required};
use crate::controllers::list::ListViewState;
use crate::web::route::AppRoute;
use crate::web::router::use_router;

#[component]
pub fn InventoryPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let toast = use_toast();

    let list = ListViewState::<InventoryItem>::new();
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
                w.confirm_with_message(&format!("确定删除库存项 {}？", name))
                    .unwrap_or(false)
            })
            .unwrap_or(false);
        if confirmed {
            list.delete(auth, id);
            toast.success("库存项已删除");
        }
    };

    view! {
        <Shell>
            <div class="flex items-center justify-between mb-6">
                <h1 class="text-2xl font-bold">"库存"</h1>
                <div class="flex gap-3">
                    <SearchBox on_search=on_search placeholder="搜索名称或分类" />
                    <button
                        class="btn btn-primary gap-2"
                        on:click=move |_| router.navigate(AppRoute::InventoryNew)
                    >
                        <Plus attr:class="h-4 w-4" />
                        "新增库存"
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
                                <SortableTh
                                    label="分类"
                                    direction=sort_of("category")
                                    on_toggle=toggle("category")
                                />
                                <SortableTh
                                    label="数量"
                                    direction=sort_of("quantity")
                                    on_toggle=toggle("quantity")
                                />
                                <th>"补货阈值"</th>
                                <th>"供应商"</th>
                                <th>"库存状态"</th>
                                <th class="text-right">"操作"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <Show when=move || core.with(|c| c.loading && c.items.is_empty())>
                                <LoadingRow colspan=7 />
                            </Show>
                            <Show when=move || core.with(|c| c.is_empty())>
                                <EmptyRow colspan=7 hint="没有符合条件的库存项" />
                            </Show>
                            <For
                                each=move || core.get().items
                                key=|i| i.id.clone()
                                children=move |item: InventoryItem| {
                                    let edit_id = item.id.clone();
                                    let del_id = item.id.clone();
                                    let del_name = item.name.clone();
                                    let low = item.is_low_stock();
                                    view! {
                                        <tr>
                                            <td class="font-medium">{item.name.clone()}</td>
                                            <td>{item.category.clone()}</td>
                                            <td>{format!("{} {}", item.quantity, item.unit)}</td>
                                            <td>{format!("{} {}", item.reorder_level, item.unit)}</td>
                                            <td>
                                                {item.supplier.clone().unwrap_or_else(|| "—".into())}
                                            </td>
                                            <td>
                                                {if low {
                                                    view! {
                                                        <span class="badge badge-error">"需补货"</span>
                                                    }
                                                        .into_any()
                                                } else {
                                                    view! {
                                                        <span class="badge badge-success">"充足"</span>
                                                    }
                                                        .into_any()
                                                }}
                                            </td>
                                            <td class="text-right">
                                                <button
                                                    class="btn btn-ghost btn-xs"
                                                    on:click=move |_| {
                                                        router.navigate(AppRoute::InventoryEdit(edit_id.clone()))
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

#[derive(Debug, Clone, Default, PartialEq)]
struct InventoryFormModel {
    name: String,
    category: String,
    quantity: String,
    unit: String,
    reorder_level: String,
    supplier: String,
}

impl InventoryFormModel {
    fn from_entity(i: &InventoryItem) -> Self {
        Self {
            name: i.name.clone(),
            category: i.category.clone(),
            quantity: i.quantity.to_string(),
            unit: i.unit.clone(),
            reorder_level: i.reorder_level.to_string(),
            supplier: i.supplier.clone().unwrap_or_default(),
        }
    }

    fn to_draft(&self) -> Result<InventoryItemDraft, String> {
        validate_required(&[
            ("名称", &self.name),
            ("分类", &self.category),
            ("数量", &self.quantity),
            ("单位", &self.unit),
            ("补货阈值", &self.reorder_level),
        ])?;

        let quantity: f64 = self
            .quantity
            .trim()
            .parse()
            .map_err(|_| "数量必须是数字".to_string())?;
        let reorder_level: f64 = self
            .reorder_level
            .trim()
            .parse()
            .map_err(|_| "补货阈值必须是数字".to_string())?;
        if quantity < 0.0 || reorder_level < 0.0 {
            return Err("数量与阈值不能为负".to_string());
        }

        let supplier = {
            let s = self.supplier.trim();
            if s.is_empty() { None } else { Some(s.to_string()) }
        };

        Ok(InventoryItemDraft {
            name: self.name.trim().to_string(),
            category: self.category.trim().to_string(),
            quantity,
            unit: self.unit.trim().to_string(),
            reorder_level,
            supplier,
        })
    }
}

#[component]
pub fn InventoryFormPage(#[prop(optional)] id: Option<String>) -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let toast = use_toast();

    let mode = match &id {
        Some(id) => FormMode::Edit(id.clone()),
        None => FormMode::Create,
    };
    let is_edit = mode.is_edit();
    let form = FormView::<InventoryItem>::new(mode);
    let lifecycle = form.lifecycle();
    let model = RwSignal::new(InventoryFormModel::default());

    if let Some(id) = id {
        form.load(auth, id, move |i| {
            model.set(InventoryFormModel::from_entity(&i));
        });
    }

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        match model.get_untracked().to_draft() {
            Err(msg) => form.reject(msg),
            Ok(draft) => {
                form.submit(auth, draft, move |_| {
                    toast.success(if is_edit { "库存项已更新" } else { "库存项已创建" });
                    router.navigate(AppRoute::Inventory);
                });
            }
        }
    };

    let set_field = move |f: fn(&mut InventoryFormModel, String)| {
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
                {if is_edit { "编辑库存项" } else { "新增库存项" }}
            </h1>

            <Show when=move || load_failed().is_some()>
                <div role="alert" class="alert alert-error mb-4">
                    <span>
                        {move || format!("加载库存项失败：{}", load_failed().unwrap_or_default())}
                    </span>
                    <button
                        class="btn btn-sm"
                        on:click=move |_| router.navigate(AppRoute::Inventory)
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
                                <span class="label-text">"名称"</span>
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
                                <span class="label-text">"分类"</span>
                            </label>
                            <input
                                type="text"
                                class="input input-bordered"
                                prop:value=move || model.get().category
                                on:input=set_field(|m, v| m.category = v)
                            />
                        </div>
                        <div class="form-control">
                            <label class="label">
                                <span class="label-text">"数量"</span>
                            </label>
                            <input
                                type="number"
                                step="0.01"
                                min="0"
                                class="input input-bordered"
                                prop:value=move || model.get().quantity
                                on:input=set_field(|m, v| m.quantity = v)
                            />
                        </div>
                        <div class="form-control">
                            <label class="label">
                                <span class="label-text">"单位"</span>
                            </label>
                            <input
                                type="text"
                                placeholder="kg / 瓶 / 箱"
                                class="input input-bordered"
                                prop:value=move || model.get().unit
                                on:input=set_field(|m, v| m.unit = v)
                            />
                        </div>
                        <div class="form-control">
                            <label class="label">
                                <span class="label-text">"补货阈值"</span>
                            </label>
                            <input
                                type="number"
                                step="0.01"
                                min="0"
                                class="input input-bordered"
                                prop:value=move || model.get().reorder_level
                                on:input=set_field(|m, v| m.reorder_level = v)
                            />
                        </div>
                        <div class="form-control">
                            <label class="label">
                                <span class="label-text">"供应商（可选）"</span>
                            </label>
                            <input
                                type="text"
                                class="input input-bordered"
                                prop:value=move || model.get().supplier
                                on:input=set_field(|m, v| m.supplier = v)
                            />
                        </div>
                    </div>

                    <div class="flex justify-end gap-2 mt-4">
                        <button
                            type="button"
                            class="btn btn-ghost"
                            on:click=move |_| router.navigate(AppRoute::Inventory)
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

    fn valid_model() -> InventoryFormModel {
        InventoryFormModel {
            name: "橄榄油".into(),
            category: "干货".into(),
            quantity: "12.5".into(),
            unit: "L".into(),
            reorder_level: "5".into(),
            supplier: String::new(),
        }
    }

    #[test]
    fn valid_model_converts_to_draft() {
        let draft = valid_model().to_draft().unwrap();
        assert_eq!(draft.quantity, 12.5);
        assert_eq!(draft.reorder_level, 5.0);
        assert!(draft.supplier.is_none());
    }

    #[test]
    fn non_numeric_quantity_is_rejected() {
        let mut m = valid_model();
        m.quantity = "十二".into();
        assert_eq!(m.to_draft(), Err("数量必须是数字".to_string()));
    }

    #[test]
    fn negative_values_are_rejected() {
        let mut m = valid_model();
        m.reorder_level = "-1".into();
        assert_eq!(m.to_draft(), Err("数量与阈值不能为负".to_string()));
    }
}
