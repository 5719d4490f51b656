//! Tests for TransferCoordinator and DeliveryStream

use std::path::PathBuf;
use std::sync::Arc;

use assert_matches::assert_matches;
use futures_util::StreamExt;
use shared::RequestId;
use tempfile::TempDir;

use super::common::allocate_in;
use crate::error::OrchestratorError;
use crate::services::{TransferCoordinator, WorkspaceGuard};
use crate::types::ResolvedArtifact;

fn artifact(path: PathBuf) -> ResolvedArtifact {
    ResolvedArtifact {
        absolute_path: path,
        display_name: "clip.mp4".to_string(),
        title: Some("clip".to_string()),
    }
}

#[tokio::test]
async fn test_full_stream_delivers_bytes_then_releases() {
    let root = TempDir::new().unwrap();
    let (manager, workspace) = allocate_in(root.path()).await;
    let content: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
    let file = workspace.path.join("clip.mp4");
    std::fs::write(&file, &content).unwrap();
    let ws_path = workspace.path.clone();

    let guard = WorkspaceGuard::new(RequestId::new(), workspace, Arc::new(manager));
    let mut delivery = TransferCoordinator::new().deliver(artifact(file), guard).await.unwrap();
    assert_eq!(delivery.content_length, content.len() as u64);

    let mut received = Vec::new();
    while let Some(chunk) = delivery.stream.next().await {
        received.extend_from_slice(&chunk.unwrap());
        if !delivery.stream.is_finished() {
            assert!(ws_path.exists(), "workspace must outlive the transfer");
        }
    }

    assert_eq!(received, content);
    assert_eq!(delivery.stream.bytes_sent(), content.len() as u64);
    assert!(delivery.stream.is_finished());
    assert!(!ws_path.exists());
}

#[tokio::test]
async fn test_dropped_stream_releases_workspace() {
    let root = TempDir::new().unwrap();
    let (manager, workspace) = allocate_in(root.path()).await;
    let file = workspace.path.join("clip.mp4");
    std::fs::write(&file, vec![7u8; 300_000]).unwrap();
    let ws_path = workspace.path.clone();

    let guard = WorkspaceGuard::new(RequestId::new(), workspace, Arc::new(manager));
    let mut delivery = TransferCoordinator::new().deliver(artifact(file), guard).await.unwrap();

    // Client reads one chunk and disconnects
    let first = delivery.stream.next().await.unwrap().unwrap();
    assert!(!first.is_empty());
    assert!(ws_path.exists());
    drop(delivery);

    assert!(!ws_path.exists());
}

#[tokio::test]
async fn test_empty_file_streams_nothing_and_releases() {
    let root = TempDir::new().unwrap();
    let (manager, workspace) = allocate_in(root.path()).await;
    let file = workspace.path.join("empty.mp4");
    std::fs::write(&file, b"").unwrap();
    let ws_path = workspace.path.clone();

    let guard = WorkspaceGuard::new(RequestId::new(), workspace, Arc::new(manager));
    let mut delivery = TransferCoordinator::new().deliver(artifact(file), guard).await.unwrap();

    assert_eq!(delivery.content_length, 0);
    assert!(delivery.stream.next().await.is_none());
    assert!(!ws_path.exists());
}

#[tokio::test]
async fn test_open_failure_releases_workspace() {
    let root = TempDir::new().unwrap();
    let (manager, workspace) = allocate_in(root.path()).await;
    let missing = workspace.path.join("vanished.mp4");
    let ws_path = workspace.path.clone();

    let guard = WorkspaceGuard::new(RequestId::new(), workspace, Arc::new(manager));
    let err = TransferCoordinator::new().deliver(artifact(missing), guard).await.unwrap_err();

    assert_matches!(err, OrchestratorError::Storage { operation: "open artifact", .. });
    assert!(!ws_path.exists());
}

#[tokio::test]
async fn test_last_byte_completes_without_trailing_poll() {
    let root = TempDir::new().unwrap();
    let (manager, workspace) = allocate_in(root.path()).await;
    let content = vec![3u8; 150_000];
    let file = workspace.path.join("clip.mp4");
    std::fs::write(&file, &content).unwrap();
    let ws_path = workspace.path.clone();

    let guard = WorkspaceGuard::new(RequestId::new(), workspace, Arc::new(manager));
    let mut delivery = TransferCoordinator::new().deliver(artifact(file), guard).await.unwrap();

    // Read exactly the advertised length, the way a length-delimited body is consumed
    let mut received = 0u64;
    while received < delivery.content_length {
        received += delivery.stream.next().await.unwrap().unwrap().len() as u64;
    }

    assert_eq!(received, content.len() as u64);
    assert!(delivery.stream.is_finished());
    assert!(!ws_path.exists());

    // Dropping a completed stream is not an abort and releases nothing twice
    drop(delivery);
    assert!(!ws_path.exists());
}
