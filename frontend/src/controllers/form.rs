//! 表单控制器
//!
//! 新建/编辑共用一套生命周期：编辑模式先预加载实体回填，预加载失败则
//! 整个表单不可提交；提交在途期间拒绝重复提交；提交失败保留用户输入，
//! 只展示错误。校验在本地完成，未通过不发请求。

use leptos::prelude::*;
use leptos::task::spawn_local;

use mesa_shared::protocol::Entity;

use crate::auth::AuthContext;

// =========================================================
// 纯核心
// =========================================================

/// 表单工作模式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    /// 编辑既有记录（携带实体 id）
    Edit(String),
}

impl FormMode {
    pub fn is_edit(&self) -> bool {
        matches!(self, Self::Edit(_))
    }
}

/// 表单生命周期状态机
#[derive(Debug, Clone, PartialEq)]
pub struct FormLifecycle {
    pub mode: FormMode,
    /// 编辑模式的预加载在途标记
    pub loading: bool,
    /// 预加载失败信息；存在时表单整体禁用
    pub load_failed: Option<String>,
    pub submitting: bool,
    /// 校验或提交错误，展示在表单顶部
    pub error: Option<String>,
}

impl FormLifecycle {
    pub fn new(mode: FormMode) -> Self {
        let loading = mode.is_edit();
        Self {
            mode,
            loading,
            load_failed: None,
            submitting: false,
            error: None,
        }
    }

    /// 预加载成功，表单可编辑
    pub fn load_succeeded(&mut self) {
        self.loading = false;
        self.load_failed = None;
    }

    /// 预加载失败：表单锁死，只能离开或重试
    pub fn fail_load(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.load_failed = Some(message.into());
    }

    /// 当前是否允许提交
    pub fn can_submit(&self) -> bool {
        !self.submitting && !self.loading && self.load_failed.is_none()
    }

    /// 登记一次提交；重复提交与不可提交状态返回 false
    pub fn begin_submit(&mut self) -> bool {
        if !self.can_submit() {
            return false;
        }
        self.submitting = true;
        self.error = None;
        true
    }

    /// 提交失败：输入保留，错误展示
    pub fn submit_failed(&mut self, message: impl Into<String>) {
        self.submitting = false;
        self.error = Some(message.into());
    }

    pub fn submit_succeeded(&mut self) {
        self.submitting = false;
        self.error = None;
    }

    /// 本地校验未通过（不发请求）
    pub fn set_validation_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }
}

/// 必填校验：返回第一个为空的字段提示
pub fn validate_required(fields: &[(&str, &str)]) -> Result<(), String> {
    for (label, value) in fields {
        if value.trim().is_empty() {
            return Err(format!("请填写{}", label));
        }
    }
    Ok(())
}

// =========================================================
// Leptos 封装
// =========================================================

/// 表单视图状态：生命周期信号 + 实体类型绑定
pub struct FormView<T>
where
    T: Entity + Send + Sync + 'static,
{
    lifecycle: RwSignal<FormLifecycle>,
    _marker: std::marker::PhantomData<fn() -> T>,
}

impl<T> Clone for FormView<T>
where
    T: Entity + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for FormView<T> where T: Entity + Send + Sync + 'static {}

impl<T> FormView<T>
where
    T: Entity + Send + Sync + 'static,
{
    pub fn new(mode: FormMode) -> Self {
        Self {
            lifecycle: RwSignal::new(FormLifecycle::new(mode)),
            _marker: std::marker::PhantomData,
        }
    }

    pub fn lifecycle(&self) -> RwSignal<FormLifecycle> {
        self.lifecycle
    }

    /// 编辑模式预加载：成功回填模型，失败锁死表单
    pub fn load(&self, auth: AuthContext, id: String, on_loaded: impl FnOnce(T) + 'static) {
        let lifecycle = self.lifecycle;
        let api = auth.api();
        spawn_local(async move {
            match api.get_by_id::<T>(&id).await {
                Ok(entity) => {
                    on_loaded(entity);
                    lifecycle.try_update(|l| l.load_succeeded());
                }
                Err(err) => {
                    if err.is_unauthorized() {
                        auth.expire_session();
                        return;
                    }
                    lifecycle.try_update(|l| l.fail_load(err.message));
                }
            }
        });
    }

    /// 提交：新建走 POST，编辑走 PUT；成功后回调（通常是导航离开）
    pub fn submit(&self, auth: AuthContext, draft: T::Draft, on_success: impl FnOnce(T) + 'static)
    where
        T::Draft: 'static,
    {
        let lifecycle = self.lifecycle;
        let accepted = lifecycle.try_update(|l| l.begin_submit()).unwrap_or(false);
        if !accepted {
            return;
        }

        let mode = lifecycle.get_untracked().mode;
        let api = auth.api();
        spawn_local(async move {
            let result = match &mode {
                FormMode::Create => api.create::<T>(&draft).await,
                FormMode::Edit(id) => api.update::<T>(id, &draft).await,
            };
            match result {
                Ok(entity) => {
                    lifecycle.try_update(|l| l.submit_succeeded());
                    on_success(entity);
                }
                Err(err) => {
                    if err.is_unauthorized() {
                        auth.expire_session();
                        return;
                    }
                    lifecycle.try_update(|l| l.submit_failed(err.message));
                }
            }
        });
    }

    /// 本地校验未通过时调用
    pub fn reject(&self, message: String) {
        self.lifecycle.try_update(|l| l.set_validation_error(message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_mode_is_immediately_submittable() {
        let form = FormLifecycle::new(FormMode::Create);
        assert!(!form.loading);
        assert!(form.can_submit());
    }

    #[test]
    fn edit_mode_blocks_submission_until_loaded() {
        let mut form = FormLifecycle::new(FormMode::Edit("42".into()));
        assert!(form.loading);
        assert!(!form.can_submit());
        assert!(!form.begin_submit());

        form.load_succeeded();
        assert!(form.can_submit());
    }

    #[test]
    fn failed_preload_locks_the_form() {
        let mut form = FormLifecycle::new(FormMode::Edit("42".into()));
        form.fail_load("记录不存在");

        assert!(!form.loading);
        assert!(!form.can_submit());
        assert!(!form.begin_submit());
        assert_eq!(form.load_failed.as_deref(), Some("记录不存在"));
    }

    #[test]
    fn double_submit_is_rejected_while_in_flight() {
        let mut form = FormLifecycle::new(FormMode::Create);
        assert!(form.begin_submit());
        // 在途期间重复点击不产生第二次请求
        assert!(!form.begin_submit());

        form.submit_failed("服务器错误");
        // 失败后可以再次提交
        assert!(form.begin_submit());
    }

    #[test]
    fn submit_failure_keeps_error_until_next_attempt() {
        let mut form = FormLifecycle::new(FormMode::Create);
        form.begin_submit();
        form.submit_failed("名称重复");
        assert_eq!(form.error.as_deref(), Some("名称重复"));

        // 下一次提交清除旧错误
        form.begin_submit();
        assert!(form.error.is_none());
    }

    #[test]
    fn required_validation_names_first_missing_field() {
        assert!(validate_required(&[("名称", "x"), ("日期", "2026-01-01")]).is_ok());
        assert_eq!(
            validate_required(&[("名称", "x"), ("日期", "  ")]),
            Err("请填写日期".to_string())
        );
        assert_eq!(
            validate_required(&[("名称", ""), ("日期", "")]),
            Err("请填写名称".to_string())
        );
    }
}
