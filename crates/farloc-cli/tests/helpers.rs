use std::path::Path;

pub fn run_cli(args: &[&str]) -> (i32, String, String) {
    let bin = env!("CARGO_BIN_EXE_farloc");
    let output = std::process::Command::new(bin)
        .args(args)
        .output()
        .expect("failed to spawn farloc");
    let code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (code, stdout, stderr)
}

pub fn write_locale(dir: &Path, locale: &str, json: &str) {
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(dir.join(format!("{locale}.json")), json).unwrap();
}

pub fn read_locale(dir: &Path, locale: &str) -> serde_json::Value {
    let content = std::fs::read_to_string(dir.join(format!("{locale}.json"))).unwrap();
    serde_json::from_str(&content).unwrap()
}
