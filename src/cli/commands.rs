//! CLI command implementations

use std::fs;
use std::path::Path;

use serde_json::json;
use tracing::info;

use crate::http_server::HttpServer;
use crate::observability::init_tracing;
use crate::storage::{storage_file, StorageReader};
use crate::store::{open_store, USERS_COLLECTION};
use crate::users::UserService;

use super::args::{Command, ServeOverrides};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::write_response;

/// Parses arguments and dispatches. This is all `main` calls.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Serve { config, overrides } => serve(&config, overrides),
        Command::Verify { config } => verify(&config),
    }
}

/// Writes a default config to `config_path` and creates its data directory.
///
/// Refuses to overwrite an existing config file.
pub fn init(config_path: &Path) -> CliResult<()> {
    if config_path.exists() {
        return Err(CliError::already_initialized(config_path));
    }

    let config = Config::default();

    if let Some(parent) = config_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(config_path, serde_json::to_string_pretty(&config)?)?;

    let data_dir = config.data_path();
    fs::create_dir_all(data_dir.join("data")).map_err(|e| {
        CliError::config_error(format!("Failed to create directory {:?}: {}", data_dir, e))
    })?;

    write_response(json!({
        "initialized": true,
        "config": config_path.display().to_string(),
        "data_dir": config.data_dir,
    }))
}

/// Boots the store and runs the HTTP server until Ctrl-C.
pub fn serve(config_path: &Path, overrides: ServeOverrides) -> CliResult<()> {
    let mut config = Config::load_or_default(config_path)?;
    config.apply_overrides(overrides);
    config.validate()?;

    init_tracing(&config.log_filter);
    info!(
        config = %config_path.display(),
        store = ?config.store,
        data_dir = %config.data_dir,
        "starting users API"
    );

    let store = open_store(config.store, &config.data_path())
        .map_err(|e| CliError::boot_failed(format!("Failed to open store: {}", e)))?;
    let server = HttpServer::new(config.server.clone(), UserService::new(store));

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Scans the document file, verifying every checksum, and reports counts.
pub fn verify(config_path: &Path) -> CliResult<()> {
    let config = Config::load_or_default(config_path)?;
    let path = storage_file(&config.data_path());

    if !path.exists() {
        return Err(CliError::not_initialized(&path));
    }

    let index = StorageReader::open(&path)
        .and_then(|mut reader| reader.build_live_index())
        .map_err(|e| CliError::verify_failed(e.to_string()))?;

    let prefix = format!("{}:", USERS_COLLECTION);
    let users = index
        .offsets
        .keys()
        .filter(|id| id.starts_with(&prefix))
        .count();

    write_response(json!({
        "records": index.total_records,
        "live_documents": index.offsets.len(),
        "users": users,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::errors::CliErrorCode;
    use crate::storage::{DocumentRecord, StorageWriter};
    use tempfile::TempDir;

    fn write_config(dir: &Path) -> std::path::PathBuf {
        let config_path = dir.join("users-api.json");
        let config = Config {
            data_dir: dir.join("store").to_string_lossy().into_owned(),
            ..Default::default()
        };
        fs::write(&config_path, serde_json::to_string(&config).unwrap()).unwrap();
        config_path
    }

    #[test]
    fn test_init_refuses_existing_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = write_config(temp_dir.path());

        let err = init(&config_path).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::AlreadyInitialized);
    }

    #[test]
    fn test_verify_requires_document_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = write_config(temp_dir.path());

        let err = verify(&config_path).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::NotInitialized);
    }

    #[test]
    fn test_verify_accepts_clean_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = write_config(temp_dir.path());
        {
            let mut writer = StorageWriter::open(&temp_dir.path().join("store")).unwrap();
            writer
                .append(&DocumentRecord::live(USERS_COLLECTION, "u1", b"{}".to_vec()))
                .unwrap();
        }

        verify(&config_path).unwrap();
    }

    #[test]
    fn test_verify_reports_corruption() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = write_config(temp_dir.path());
        let data_dir = temp_dir.path().join("store");
        {
            let mut writer = StorageWriter::open(&data_dir).unwrap();
            writer
                .append(&DocumentRecord::live(USERS_COLLECTION, "u1", b"{}".to_vec()))
                .unwrap();
        }
        let path = storage_file(&data_dir);
        let mut bytes = fs::read(&path).unwrap();
        let mid = bytes.len() / 2;
        bytes[mid] ^= 0xFF;
        fs::write(&path, bytes).unwrap();

        let err = verify(&config_path).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::VerifyFailed);
        assert!(err.message().contains("USERS_DATA_CORRUPTION"));
    }
}
