use leptos::prelude::*;
use leptos::task::spawn_local;

use mesa_shared::ReportSummary;
use mesa_shared::protocol::ReportSummaryRequest;

use crate::auth::use_auth;
use crate::components::layout::{ErrorBanner, Shell};

/// 仪表盘：报表汇总卡片
#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = use_auth();

    let (summary, set_summary) = signal(Option::<ReportSummary>::None);
    let (loading, set_loading) = signal(true);
    let (error, set_error) = signal(Option::<String>::None);

    let load = move || {
        let api = auth.api();
        set_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api.send(&ReportSummaryRequest).await {
                Ok(data) => {
                    let _ = set_summary.try_update(|s| *s = Some(data));
                }
                Err(err) => {
                    if err.is_unauthorized() {
                        auth.expire_session();
                        return;
                    }
                    let _ = set_error.try_update(|e| *e = Some(err.message));
                }
            }
            let _ = set_loading.try_update(|l| *l = false);
        });
    };
    load();

    let error_msg = Signal::derive(move || error.get());
    let on_retry = Callback::new(move |_| load());

    // 营收以分计，展示为元
    let revenue = move || {
        summary
            .get()
            .map(|s| format!("{}.{:02}", s.revenue_cents / 100, s.revenue_cents % 100))
            .unwrap_or_default()
    };
    let stat = move |f: fn(&ReportSummary) -> u64| {
        summary.get().map(|s| f(&s).to_string()).unwrap_or_default()
    };

    view! {
        <Shell>
            <h1 class="text-2xl font-bold mb-6">"仪表盘"</h1>

            <ErrorBanner message=error_msg on_retry=on_retry />

            <Show
                when=move || !loading.get()
                fallback=|| {
                    view! {
                        <div class="flex justify-center py-16">
                            <span class="loading loading-spinner loading-lg text-primary"></span>
                        </div>
                    }
                }
            >
                <div class="stats shadow w-full stats-vertical lg:stats-horizontal bg-base-100">
                    <div class="stat">
                        <div class="stat-title">"预订总数"</div>
                        <div class="stat-value text-primary">
                            {move || stat(|s| s.total_reservations)}
                        </div>
                    </div>
                    <div class="stat">
                        <div class="stat-title">"未来预订"</div>
                        <div class="stat-value">{move || stat(|s| s.upcoming_reservations)}</div>
                    </div>
                    <div class="stat">
                        <div class="stat-title">"低库存商品"</div>
                        <div class="stat-value text-warning">
                            {move || stat(|s| s.low_stock_items)}
                        </div>
                    </div>
                    <div class="stat">
                        <div class="stat-title">"营收"</div>
                        <div class="stat-value text-success">{revenue}</div>
                    </div>
                    <div class="stat">
                        <div class="stat-title">"失败部署"</div>
                        <div class="stat-value text-error">
                            {move || stat(|s| s.failed_deployments)}
                        </div>
                    </div>
                </div>
            </Show>
        </Shell>
    }
}
