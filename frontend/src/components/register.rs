use leptos::prelude::*;

use crate::auth::{SessionStage, use_auth};
use crate::components::icons::Utensils;
use crate::web::route::AppRoute;
use crate::web::router::use_router;

/// 注册页：成功后与登录同样进入已认证阶段，由守卫跳转
#[component]
pub fn RegisterPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    auth.clear_error();

    let (name, set_name) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (confirm, set_confirm) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (local_error, set_local_error) = signal(Option::<String>::None);

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
        let name = name.get_untracked();
        let email = email.get_untracked();
        let password = password.get_untracked();

        if name.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
            set_local_error.set(Some("请填写全部字段".to_string()));
            return;
        }
        if password != confirm.get_untracked() {
            set_local_error.set(Some("两次输入的密码不一致".to_string()));
            return;
        }

        set_local_error.set(None);
        set_is_submitting.set(true);
        auth.register(name, email, password);
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <div class="flex flex-col items-center gap-2">
                        <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                            <Utensils attr:class="h-8 w-8" />
                        </div>
                        <h1 class="text-3xl font-bold">"创建账号"</h1>
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
                            <label class="label" for="name">
                                <span class="label-text">"姓名"</span>
                            </label>
                            <input
                                id="name"
                                type="text"
                                on:input=move |ev| set_name.set(event_target_value(&ev))
                                prop:value=name
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"邮箱"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
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
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="confirm">
                                <span class="label-text">"确认密码"</span>
                            </label>
                            <input
                                id="confirm"
                                type="password"
                                on:input=move |ev| set_confirm.set(event_target_value(&ev))
                                prop:value=confirm
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
                                            "注册中..."
                                        }
                                            .into_any()
                                    } else {
                                        "注册".into_any()
                                    }
                                }}
                            </button>
                        </div>
                        <p class="text-sm text-center mt-2">
                            "已有账号？"
                            <a
                                class="link link-primary ml-1"
                                on:click=move |_| router.navigate(AppRoute::Login)
                            >
                                "登录"
                            </a>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
