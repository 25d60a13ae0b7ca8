//! LocalStorage 封装模块
//!
//! 会话令牌的持久化槽位。任何浏览器/存储异常都降级为"不存在"，
//! 调用方按未认证处理即可。

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

/// 读取存储值；键不存在或存储不可用时返回 None
pub fn get(key: &str) -> Option<String> {
    local_storage()?.get_item(key).ok()?
}

/// 写入存储值，返回是否成功
pub fn set(key: &str, value: &str) -> bool {
    local_storage()
        .and_then(|s| s.set_item(key, value).ok())
        .is_some()
}

/// 删除键值对，返回是否成功
pub fn remove(key: &str) -> bool {
    local_storage()
        .and_then(|s| s.remove_item(key).ok())
        .is_some()
}
