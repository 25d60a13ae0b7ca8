use std::env;
use std::fs;
use std::path::Path;

/// 从 .env 加载编译期配置（API 地址、第三方公钥等）。
/// 未定义的变量走 `src/config.rs` 中的默认值。
fn main() {
    let env_file = Path::new(".env");

    if env_file.exists() {
        println!("cargo:rerun-if-changed=.env");

        if let Ok(contents) = fs::read_to_string(env_file) {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    let key = key.trim();
                    let value = value.trim();
                    // 环境里已定义的优先
                    if env::var(key).is_err() {
                        println!("cargo:rustc-env={}={}", key, value);
                    }
                }
            }
        }
    }

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=MESA_API_BASE_URL");
    println!("cargo:rerun-if-env-changed=MESA_STRIPE_PUBLIC_KEY");
}
