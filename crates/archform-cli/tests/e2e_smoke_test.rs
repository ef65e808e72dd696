use std::fs;

use tempfile::tempdir;

use archform_cli::{run_with_output, Args, Command};
use archform_core::storage::read_workspace_in;
use archform_core::Workspace;

fn args(command: Command) -> Args {
    Args {
        command,
        log_level: "off".to_string(),
    }
}

async fn output_of(command: Command) -> String {
    let mut out = Vec::new();
    run_with_output(&args(command), &mut out)
        .await
        .expect("command should succeed");
    String::from_utf8(out).expect("output is UTF-8")
}

#[tokio::test]
async fn outline_lists_demo_elements() {
    let text = output_of(Command::Outline).await;
    assert!(text.contains("InPlacer System"));
    assert!(text.contains("Message Bus"));
    assert!(text.contains("SystemContext"));
}

#[tokio::test]
async fn demo_model_passes_review() {
    let text = output_of(Command::Review).await;
    assert_eq!(text.trim(), "no hints");
}

#[tokio::test]
async fn export_writes_loadable_document() {
    let dir = tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("out").join("inplacer.json");

    output_of(Command::Export {
        output: Some(path.clone()),
    })
    .await;

    let raw = fs::read_to_string(&path).unwrap();
    let workspace = Workspace::from_json(&raw).unwrap();
    assert_eq!(workspace.name(), "Context");
    assert_eq!(workspace.views().len(), 3);
}

#[tokio::test]
async fn export_without_file_prints_json() {
    let text = output_of(Command::Export { output: None }).await;
    assert!(Workspace::from_json(&text).is_ok());
}

#[tokio::test]
async fn schema_is_json() {
    let text = output_of(Command::Schema).await;
    let schema: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert!(schema.get("properties").is_some());
}

#[tokio::test]
async fn save_stores_into_directory() {
    let dir = tempdir().expect("Failed to create temp directory");
    let text = output_of(Command::Save {
        name: "demo".to_string(),
        dir: Some(dir.path().to_path_buf()),
    })
    .await;
    assert_eq!(text.trim(), "saved demo");

    let workspace = read_workspace_in(dir.path(), "demo").unwrap();
    assert_eq!(workspace.documentation().len(), 1);
}

#[tokio::test]
async fn upload_to_directory_uses_file_sink() {
    let dir = tempdir().expect("Failed to create temp directory");
    let text = output_of(Command::Upload {
        workspace_id: Some(37816),
        api_key: None,
        api_secret: None,
        url: None,
        dir: Some(dir.path().to_path_buf()),
    })
    .await;
    assert_eq!(text.trim(), "uploaded workspace 37816");
    assert!(dir.path().join("workspace-37816.json").exists());
}

#[tokio::test]
async fn http_upload_without_credentials_fails_before_sending() {
    let mut out = Vec::new();
    let result = run_with_output(
        &args(Command::Upload {
            workspace_id: Some(37816),
            api_key: Some(String::new()),
            api_secret: Some(String::new()),
            url: Some("http://127.0.0.1:9".to_string()),
            dir: None,
        }),
        &mut out,
    )
    .await;
    assert!(matches!(
        result,
        Err(archform_cli::CliError::Upload(
            archform_upload::UploadError::NotConfigured(_)
        ))
    ));
    assert!(out.is_empty());
}

#[tokio::test]
async fn upload_to_directory_requires_workspace_id() {
    let dir = tempdir().expect("Failed to create temp directory");
    let mut out = Vec::new();
    let result = run_with_output(
        &args(Command::Upload {
            workspace_id: Some(0),
            api_key: None,
            api_secret: None,
            url: None,
            dir: Some(dir.path().to_path_buf()),
        }),
        &mut out,
    )
    .await;
    assert!(matches!(
        result,
        Err(archform_cli::CliError::Upload(
            archform_upload::UploadError::NotConfigured(_)
        ))
    ));
    assert!(!dir.path().join("workspace-0.json").exists());
}
