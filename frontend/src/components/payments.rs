//! 支付记录：只读列表
//!
//! 支付由支付渠道产生，本端只读。金额与时间列在客户端排序
//! （稳定排序，等键保持服务端返回的相对顺序），翻页与搜索仍走服务端。

use leptos::prelude::*;

use mesa_shared::{Payment, PaymentStatus, Sort};

use crate::auth::use_auth;
use crate::components::layout::{
    EmptyRow, ErrorBanner, LoadingRow, Pagination, SearchBox, Shell, SortableTh,
};
use crate::controllers::list::{ListViewState, sort_items_by};

fn status_badge(status: PaymentStatus) -> &'static str {
    match status {
        PaymentStatus::Pending => "badge badge-warning",
        PaymentStatus::Succeeded => "badge badge-success",
        PaymentStatus::Refunded => "badge badge-info",
        PaymentStatus::Failed => "badge badge-error",
    }
}

#[component]
pub fn PaymentsPage() -> impl IntoView {
    let auth = use_auth();

    let list = ListViewState::<Payment>::new();
    list.load(auth);
    let core = list.core();

    // 客户端排序状态，与服务端查询参数无关
    let sort = RwSignal::new(Option::<Sort>::None);
    let toggle = move |key: &'static str| {
        Callback::new(move |_| {
            sort.update(|s| {
                *s = match s.take() {
                    Some(mut cur) if cur.key == key => {
                        cur.direction = cur.direction.toggled();
                        Some(cur)
                    }
                    _ => Some(Sort::ascending(key)),
                }
            });
        })
    };
    let sort_of = move |key: &'static str| {
        Signal::derive(move || {
            sort.get()
                .filter(|s| s.key == key)
                .map(|s| s.direction)
        })
    };

    let rows = move || {
        let mut items = core.get().items;
        if let Some(s) = sort.get() {
            match s.key.as_str() {
                "amountCents" => sort_items_by(&mut items, s.direction, |p| p.amount_cents),
                "createdAt" => sort_items_by(&mut items, s.direction, |p| p.created_at),
                _ => {}
            }
        }
        items
    };

    let page = Signal::derive(move || core.get().query.page);
    let total_pages = Signal::derive(move || core.get().total_pages);
    let error_msg = Signal::derive(move || core.get().error.as_ref().map(|e| e.message.clone()));

    let on_search = Callback::new(move |term: String| list.set_search(auth, &term));
    let on_page = Callback::new(move |p: u32| list.goto_page(auth, p));
    let on_retry = Callback::new(move |_| list.retry(auth));

    view! {
        <Shell>
            <div class="flex items-center justify-between mb-6">
                <h1 class="text-2xl font-bold">"支付"</h1>
                <SearchBox on_search=on_search placeholder="搜索预订号" />
            </div>

            <ErrorBanner message=error_msg on_retry=on_retry />

            <div class="card bg-base-100 shadow-md">
                <div class="card-body p-0 overflow-x-auto">
                    <table class="table">
                        <thead>
                            <tr>
                                <th>"关联预订"</th>
                                <SortableTh
                                    label="金额"
                                    direction=sort_of("amountCents")
                                    on_toggle=toggle("amountCents")
                                />
                                <th>"货币"</th>
                                <th>"方式"</th>
                                <th>"状态"</th>
                                <SortableTh
                                    label="时间"
                                    direction=sort_of("createdAt")
                                    on_toggle=toggle("createdAt")
                                />
                            </tr>
                        </thead>
                        <tbody>
                            <Show when=move || core.with(|c| c.loading && c.items.is_empty())>
                                <LoadingRow colspan=6 />
                            </Show>
                            <Show when=move || core.with(|c| c.is_empty())>
                                <EmptyRow colspan=6 hint="没有符合条件的支付记录" />
                            </Show>
                            <For
                                each=rows
                                key=|p| p.id.clone()
                                children=move |p: Payment| {
                                    view! {
                                        <tr>
                                            <td class="font-mono text-sm">
                                                {p.reservation_id.clone().unwrap_or_else(|| "—".into())}
                                            </td>
                                            <td class="font-medium">{p.amount_display()}</td>
                                            <td>{p.currency.clone()}</td>
                                            <td>{p.method.clone()}</td>
                                            <td>
                                                <span class=status_badge(
                                                    p.status,
                                                )>{p.status.label()}</span>
                                            </td>
                                            <td>
                                                {p.created_at.format("%Y-%m-%d %H:%M").to_string()}
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
