use plate_ledger::config::{ConfigError, ConfigLoader};
use std::{
    env, fs,
    sync::{Mutex, MutexGuard, OnceLock},
};
use tempfile::TempDir;

fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

fn env_guard() -> MutexGuard<'static, ()> {
    env_lock()
        .lock()
        .unwrap_or_else(|poison| poison.into_inner())
}

fn clear_env() {
    unsafe {
        env::remove_var("PLATE_LEDGER_PROFILE");
        env::remove_var("PLATE_LEDGER_API_BIND_ADDR");
        env::remove_var("PLATE_LEDGER_LOG_LEVEL");
        env::remove_var("PLATE_LEDGER_LOG_FORMAT");
        env::remove_var("PLATE_LEDGER_DB_MAX_CONNECTIONS");
        env::remove_var("PLATE_LEDGER_CHART_DEFAULT_DAYS");
        env::remove_var("PLATE_LEDGER_RUN_MIGRATIONS");
    }
}

fn write_env_file(dir: &TempDir, name: &str, contents: &str) {
    let path = dir.path().join(name);
    fs::write(path, contents).unwrap();
}

#[test]
fn loads_defaults_when_no_env_present() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    let loader = ConfigLoader::with_base_dir(temp_dir.path().to_path_buf());
    let cfg = loader.load().expect("config loads with defaults");

    assert_eq!(cfg.profile, "local");
    assert_eq!(cfg.api_bind_addr, "0.0.0.0:3000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.log_format, "json");
    assert_eq!(cfg.db_max_connections, 10);
    assert_eq!(cfg.chart_default_days, 7);
    assert!(cfg.run_migrations);
    cfg.bind_addr().expect("default bind addr parses");
    clear_env();
}

#[test]
fn layered_env_files_apply_in_order() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    write_env_file(&temp_dir, ".env", "PLATE_LEDGER_API_BIND_ADDR=127.0.0.1:3000\n");
    write_env_file(
        &temp_dir,
        ".env.test",
        "PLATE_LEDGER_API_BIND_ADDR=192.168.0.10:5000\n",
    );
    write_env_file(
        &temp_dir,
        ".env.test.local",
        "PLATE_LEDGER_API_BIND_ADDR=10.0.0.5:6000\n",
    );

    // Profile selected in .env.local before the profile files load
    write_env_file(
        &temp_dir,
        ".env.local",
        "PLATE_LEDGER_PROFILE=test\nPLATE_LEDGER_API_BIND_ADDR=127.0.0.1:4000\n",
    );

    let loader = ConfigLoader::with_base_dir(temp_dir.path().to_path_buf());
    let cfg = loader.load().expect("layered config loads");

    assert_eq!(cfg.profile, "test");
    assert_eq!(cfg.api_bind_addr, "10.0.0.5:6000");
    clear_env();
}

#[test]
fn process_env_overrides_files() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    write_env_file(
        &temp_dir,
        ".env",
        "PLATE_LEDGER_LOG_LEVEL=warn\nPLATE_LEDGER_CHART_DEFAULT_DAYS=14\n",
    );

    unsafe {
        env::set_var("PLATE_LEDGER_LOG_LEVEL", "debug");
    }

    let loader = ConfigLoader::with_base_dir(temp_dir.path().to_path_buf());
    let cfg = loader.load().expect("config loads");

    assert_eq!(cfg.log_level, "debug");
    assert_eq!(cfg.chart_default_days, 14);
    clear_env();
}

#[test]
fn rejects_unknown_log_format() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    write_env_file(&temp_dir, ".env", "PLATE_LEDGER_LOG_FORMAT=xml\n");

    let loader = ConfigLoader::with_base_dir(temp_dir.path().to_path_buf());
    let err = loader.load().unwrap_err();

    assert!(matches!(err, ConfigError::InvalidLogFormat { .. }));
    clear_env();
}

#[test]
fn rejects_zero_pool_size_and_unparsable_numbers() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    write_env_file(&temp_dir, ".env", "PLATE_LEDGER_DB_MAX_CONNECTIONS=0\n");
    let loader = ConfigLoader::with_base_dir(temp_dir.path().to_path_buf());
    assert!(matches!(
        loader.load().unwrap_err(),
        ConfigError::InvalidPoolSize { value: 0 }
    ));

    write_env_file(&temp_dir, ".env", "PLATE_LEDGER_DB_MAX_CONNECTIONS=lots\n");
    assert!(matches!(
        loader.load().unwrap_err(),
        ConfigError::InvalidValue { .. }
    ));
    clear_env();
}

#[test]
fn rejects_chart_window_outside_bounds() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    write_env_file(&temp_dir, ".env", "PLATE_LEDGER_CHART_DEFAULT_DAYS=5000\n");

    let loader = ConfigLoader::with_base_dir(temp_dir.path().to_path_buf());
    assert!(matches!(
        loader.load().unwrap_err(),
        ConfigError::InvalidChartDays { value: 5000 }
    ));
    clear_env();
}
