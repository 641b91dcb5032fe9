use super::*;

// =============================================================================
// env_parse
// =============================================================================

#[test]
fn env_parse_missing_returns_default() {
    let val: usize = env_parse("__TEST_STUDIO_MISSING_KEY__", 42);
    assert_eq!(val, 42);
}

#[test]
fn env_parse_present_valid() {
    unsafe { std::env::set_var("__TEST_STUDIO_EP_VALID__", "99") };
    let val: u64 = env_parse("__TEST_STUDIO_EP_VALID__", 0);
    assert_eq!(val, 99);
    unsafe { std::env::remove_var("__TEST_STUDIO_EP_VALID__") };
}

#[test]
fn env_parse_present_invalid_returns_default() {
    unsafe { std::env::set_var("__TEST_STUDIO_EP_INVALID__", "lots") };
    let val: usize = env_parse("__TEST_STUDIO_EP_INVALID__", 7);
    assert_eq!(val, 7);
    unsafe { std::env::remove_var("__TEST_STUDIO_EP_INVALID__") };
}

// =============================================================================
// StudioConfig
// =============================================================================

#[test]
fn default_matches_constants() {
    let config = StudioConfig::default();
    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.store_backend, StoreBackend::File);
    assert_eq!(config.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
    assert_eq!(config.autosave_steps, DEFAULT_AUTOSAVE_STEPS);
    assert_eq!(config.flush_interval_ms, DEFAULT_FLUSH_INTERVAL_MS);
    assert_eq!(config.default_project, DEFAULT_PROJECT);
}

#[test]
fn backend_parsing() {
    assert_eq!(parse_backend(None), StoreBackend::File);
    assert_eq!(parse_backend(Some("file")), StoreBackend::File);
    assert_eq!(parse_backend(Some(" Memory ")), StoreBackend::Memory);
    assert_eq!(parse_backend(Some("redis")), StoreBackend::File);
}
