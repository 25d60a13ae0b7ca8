use leptos::prelude::*;

use crate::auth::{SessionStage, use_auth};
use crate::components::icons::Utensils;
use crate::web::route::AppRoute;
use crate::web::router::use_router;

/// 登录页
///
/// 提交后由认证状态机驱动：成功时路由守卫 Effect 自动跳转
/// （优先返回被拦截的原始目标），失败时阶段变为 `Error` 在此展示。
#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    // 清掉上次离开时残留的失败阶段
    auth.clear_error();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (local_error, set_local_error) = signal(Option::<String>::None);

    // 认证失败时解除提交锁并展示服务端消息
    Effect::new(move |_| {
        if let SessionStage::Error(msg) = auth.0.get().stage {
            set_is_submitting.set(false);
            set_local_error.set(Some(msg));
        }
    });

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if is_submitting.get_untracked() {
            return;
        }
        let email = email.get_untracked();
        let password = password.get_untracked();
        if email.trim().is_empty() || password.is_empty() {
            set_local_error.set(Some("请填写邮箱和密码".to_string()));
            return;
        }

        set_local_error.set(None);
        set_is_submitting.set(true);
        auth.login(email, password);
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <div class="flex flex-col items-center gap-2">
                        <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                            <Utensils attr:class="h-8 w-8" />
                        </div>
                        <h1 class="text-3xl font-bold">"Mesa"</h1>
                        <p class="text-base-content/70">"登录以管理您的餐厅"</p>
                    </div>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || local_error.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || local_error.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"邮箱"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                placeholder="you@example.com"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"密码"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                placeholder="••••••••"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || {
                                    if is_submitting.get() {
                                        view! {
                                            <span class="loading loading-spinner"></span>
                                            "登录中..."
                                        }
                                            .into_any()
                                    } else {
                                        "登录".into_any()
                                    }
                                }}
                            </button>
                        </div>
                        <p class="text-sm text-center mt-2">
                            "还没有账号？"
                            <a
                                class="link link-primary ml-1"
                                on:click=move |_| router.navigate(AppRoute::Register)
                            >
                                "注册"
                            </a>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
