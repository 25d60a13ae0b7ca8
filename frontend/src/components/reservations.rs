//! 预订管理：列表页 + 新建/编辑表单

use chrono::NaiveDate;
use leptos::prelude::*;

use mesa_shared::{Reservation, ReservationDraft, ReservationStatus};

use crate::auth::use_auth;
use crate::components::icons::{Pencil, Plus, Trash2};
use crate::components::layout::{
    EmptyRow, ErrorBanner, LoadingRow, Pagination, SearchBox, Shell, SortableTh, use_toast,
};
use crate::controllers::form::{FormMode, FormView, validate_required};
use crate::controllers::list::ListViewState;
use crate::web::route::AppRoute;
use crate::web::router::use_router;

fn status_badge(status: ReservationStatus) -> &'static str {
    match status {
        ReservationStatus::Pending => "badge badge-warning",
        ReservationStatus::Confirmed => "badge badge-info",
        ReservationStatus::Seated => "badge badge-primary",
        ReservationStatus::Completed => "badge badge-success",
        ReservationStatus::Cancelled => "badge badge-ghost",
    }
}

fn status_from_value(value: &str) -> ReservationStatus {
    match value {
        "confirmed" => ReservationStatus::Confirmed,
        "seated" => ReservationStatus::Seated,
        "completed" => ReservationStatus::Completed,
        "cancelled" => ReservationStatus::Cancelled,
        _ => ReservationStatus::Pending,
    }
}

fn status_value(status: ReservationStatus) -> &'static str {
    match status {
        ReservationStatus::Pending => "pending",
        ReservationStatus::Confirmed => "confirmed",
        ReservationStatus::Seated => "seated",
        ReservationStatus::Completed => "completed",
        ReservationStatus::Cancelled => "cancelled",
    }
}

// =========================================================
// 列表页
// =========================================================

#[component]
pub fn ReservationsPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let toast = use_toast();

    let list = ListViewState::<Reservation>::new();
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
                w.confirm_with_message(&format!("确定删除 {} 的预订？", name))
                    .unwrap_or(false)
            })
            .unwrap_or(false);
        if confirmed {
            list.delete(auth, id);
            toast.success("预订已删除");
        }
    };

    view! {
        <Shell>
            <div class="flex items-center justify-between mb-6">
                <h1 class="text-2xl font-bold">"预订"</h1>
                <div class="flex gap-3">
                    <SearchBox on_search=on_search placeholder="搜索客户或电话" />
                    <button
                        class="btn btn-primary gap-2"
                        on:click=move |_| router.navigate(AppRoute::ReservationNew)
                    >
                        <Plus attr:class="h-4 w-4" />
                        "新建预订"
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
                                    label="客户"
                                    direction=sort_of("customerName")
                                    on_toggle=toggle("customerName")
                                />
                                <th>"电话"</th>
                                <SortableTh
                                    label="人数"
                                    direction=sort_of("partySize")
                                    on_toggle=toggle("partySize")
                                />
                                <SortableTh
                                    label="日期"
                                    direction=sort_of("date")
                                    on_toggle=toggle("date")
                                />
                                <th>"时间"</th>
                                <th>"桌位"</th>
                                <th>"状态"</th>
                                <th class="text-right">"操作"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <Show when=move || {
                                core.with(|c| c.loading && c.items.is_empty())
                            }>
                                <LoadingRow colspan=8 />
                            </Show>
                            <Show when=move || core.with(|c| c.is_empty())>
                                <EmptyRow colspan=8 hint="没有符合条件的预订" />
                            </Show>
                            <For
                                each=move || core.get().items
                                key=|r| r.id.clone()
                                children=move |r: Reservation| {
                                    let edit_id = r.id.clone();
                                    let del_id = r.id.clone();
                                    let del_name = r.customer_name.clone();
                                    view! {
                                        <tr>
                                            <td class="font-medium">{r.customer_name.clone()}</td>
                                            <td>{r.phone.clone()}</td>
                                            <td>{r.party_size}</td>
                                            <td>{r.date.format("%Y-%m-%d").to_string()}</td>
                                            <td>{r.time.clone()}</td>
                                            <td>{r.table.clone().unwrap_or_else(|| "—".into())}</td>
                                            <td>
                                                <span class=status_badge(
                                                    r.status,
                                                )>{r.status.label()}</span>
                                            </td>
                                            <td class="text-right">
                                                <button
                                                    class="btn btn-ghost btn-xs"
                                                    on:click=move |_| {
                                                        router
                                                            .navigate(AppRoute::ReservationEdit(edit_id.clone()))
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

/// 表单模型：全部以字符串承载输入，提交时统一解析校验
#[derive(Debug, Clone, Default, PartialEq)]
struct ReservationFormModel {
    customer_name: String,
    phone: String,
    party_size: String,
    date: String,
    time: String,
    table: String,
    status: ReservationStatus,
    notes: String,
}

impl ReservationFormModel {
    fn from_entity(r: &Reservation) -> Self {
        Self {
            customer_name: r.customer_name.clone(),
            phone: r.phone.clone(),
            party_size: r.party_size.to_string(),
            date: r.date.format("%Y-%m-%d").to_string(),
            time: r.time.clone(),
            table: r.table.clone().unwrap_or_default(),
            status: r.status,
            notes: r.notes.clone(),
        }
    }

    /// 校验并转为请求体；任何一步失败都不发请求
    fn to_draft(&self) -> Result<ReservationDraft, String> {
        validate_required(&[
            ("客户姓名", &self.customer_name),
            ("电话", &self.phone),
            ("人数", &self.party_size),
            ("日期", &self.date),
            ("时间", &self.time),
        ])?;

        let party_size: u32 = self
            .party_size
            .trim()
            .parse()
            .map_err(|_| "人数必须是正整数".to_string())?;
        if party_size == 0 {
            return Err("人数必须大于 0".to_string());
        }

        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d")
            .map_err(|_| "日期格式应为 YYYY-MM-DD".to_string())?;

        let table = {
            let t = self.table.trim();
            if t.is_empty() { None } else { Some(t.to_string()) }
        };

        Ok(ReservationDraft {
            customer_name: self.customer_name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            party_size,
            date,
            time: self.time.trim().to_string(),
            table,
            status: self.status,
            notes: self.notes.trim().to_string(),
        })
    }
}

#[component]
pub fn ReservationFormPage(#[prop(optional)] id: Option<String>) -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let toast = use_toast();

    let mode = match &id {
        Some(id) => FormMode::Edit(id.clone()),
        None => FormMode::Create,
    };
    let is_edit = mode.is_edit();
    let form = FormView::<Reservation>::new(mode);
    let lifecycle = form.lifecycle();
    let model = RwSignal::new(ReservationFormModel::default());

    if let Some(id) = id {
        form.load(auth, id, move |r| {
            model.set(ReservationFormModel::from_entity(&r));
        });
    }

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        match model.get_untracked().to_draft() {
            Err(msg) => form.reject(msg),
            Ok(draft) => {
                form.submit(auth, draft, move |_| {
                    toast.success(if is_edit { "预订已更新" } else { "预订已创建" });
                    router.navigate(AppRoute::Reservations);
                });
            }
        }
    };

    let set_field = move |f: fn(&mut ReservationFormModel, String)| {
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
                {if is_edit { "编辑预订" } else { "新建预订" }}
            </h1>

            <Show when=move || load_failed().is_some()>
                <div role="alert" class="alert alert-error mb-4">
                    <span>{move || format!("加载预订失败：{}", load_failed().unwrap_or_default())}</span>
                    <button
                        class="btn btn-sm"
                        on:click=move |_| router.navigate(AppRoute::Reservations)
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
                                <span class="label-text">"客户姓名"</span>
                            </label>
                            <input
                                type="text"
                                class="input input-bordered"
                                prop:value=move || model.get().customer_name
                                on:input=set_field(|m, v| m.customer_name = v)
                            />
                        </div>
                        <div class="form-control">
                            <label class="label">
                                <span class="label-text">"电话"</span>
                            </label>
                            <input
                                type="tel"
                                class="input input-bordered"
                                prop:value=move || model.get().phone
                                on:input=set_field(|m, v| m.phone = v)
                            />
                        </div>
                        <div class="form-control">
                            <label class="label">
                                <span class="label-text">"人数"</span>
                            </label>
                            <input
                                type="number"
                                min="1"
                                class="input input-bordered"
                                prop:value=move || model.get().party_size
                                on:input=set_field(|m, v| m.party_size = v)
                            />
                        </div>
                        <div class="form-control">
                            <label class="label">
                                <span class="label-text">"日期"</span>
                            </label>
                            <input
                                type="date"
                                class="input input-bordered"
                                prop:value=move || model.get().date
                                on:input=set_field(|m, v| m.date = v)
                            />
                        </div>
                        <div class="form-control">
                            <label class="label">
                                <span class="label-text">"时间"</span>
                            </label>
                            <input
                                type="time"
                                class="input input-bordered"
                                prop:value=move || model.get().time
                                on:input=set_field(|m, v| m.time = v)
                            />
                        </div>
                        <div class="form-control">
                            <label class="label">
                                <span class="label-text">"桌位（可选）"</span>
                            </label>
                            <input
                                type="text"
                                class="input input-bordered"
                                prop:value=move || model.get().table
                                on:input=set_field(|m, v| m.table = v)
                            />
                        </div>
                        <div class="form-control">
                            <label class="label">
                                <span class="label-text">"状态"</span>
                            </label>
                            <select
                                class="select select-bordered"
                                prop:value=move || status_value(model.get().status)
                                on:change=move |ev| {
                                    model
                                        .update(|m| {
                                            m.status = status_from_value(&event_target_value(&ev))
                                        })
                                }
                            >
                                <option value="pending">"待确认"</option>
                                <option value="confirmed">"已确认"</option>
                                <option value="seated">"已入座"</option>
                                <option value="completed">"已完成"</option>
                                <option value="cancelled">"已取消"</option>
                            </select>
                        </div>
                    </div>

                    <div class="form-control">
                        <label class="label">
                            <span class="label-text">"备注"</span>
                        </label>
                        <textarea
                            class="textarea textarea-bordered"
                            prop:value=move || model.get().notes
                            on:input=set_field(|m, v| m.notes = v)
                        ></textarea>
                    </div>

                    <div class="flex justify-end gap-2 mt-4">
                        <button
                            type="button"
                            class="btn btn-ghost"
                            on:click=move |_| router.navigate(AppRoute::Reservations)
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

    fn valid_model() -> ReservationFormModel {
        ReservationFormModel {
            customer_name: "张三".into(),
            phone: "13800000000".into(),
            party_size: "4".into(),
            date: "2026-09-01".into(),
            time: "19:30".into(),
            table: " A3 ".into(),
            status: ReservationStatus::Confirmed,
            notes: "靠窗".into(),
        }
    }

    #[test]
    fn valid_model_converts_to_draft() {
        let draft = valid_model().to_draft().unwrap();
        assert_eq!(draft.customer_name, "张三");
        assert_eq!(draft.party_size, 4);
        assert_eq!(draft.date, NaiveDate::from_ymd_opt(2026, 9, 1).unwrap());
        assert_eq!(draft.table.as_deref(), Some("A3"));
    }

    #[test]
    fn missing_required_field_blocks_conversion() {
        let mut m = valid_model();
        m.customer_name = "  ".into();
        assert_eq!(m.to_draft(), Err("请填写客户姓名".to_string()));
    }

    #[test]
    fn invalid_party_size_is_rejected() {
        let mut m = valid_model();
        m.party_size = "abc".into();
        assert_eq!(m.to_draft(), Err("人数必须是正整数".to_string()));
        m.party_size = "0".into();
        assert_eq!(m.to_draft(), Err("人数必须大于 0".to_string()));
    }

    #[test]
    fn invalid_date_is_rejected() {
        let mut m = valid_model();
        m.date = "2026/09/01".into();
        assert!(m.to_draft().unwrap_err().contains("YYYY-MM-DD"));
    }

    #[test]
    fn empty_table_becomes_none() {
        let mut m = valid_model();
        m.table = "   ".into();
        assert!(m.to_draft().unwrap().table.is_none());
    }

    #[test]
    fn entity_round_trips_through_model() {
        let entity = Reservation {
            id: "r1".into(),
            customer_name: "李四".into(),
            phone: "021-1234".into(),
            party_size: 2,
            date: NaiveDate::from_ymd_opt(2026, 10, 5).unwrap(),
            time: "12:00".into(),
            table: None,
            status: ReservationStatus::Pending,
            notes: String::new(),
        };
        let draft = ReservationFormModel::from_entity(&entity).to_draft().unwrap();
        assert_eq!(draft.customer_name, entity.customer_name);
        assert_eq!(draft.date, entity.date);
        assert!(draft.table.is_none());
    }
}
