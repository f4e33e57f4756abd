#![deny(missing_docs)]
//! Filesystem-backed implementation of chatform's SessionStore trait.
//!
//! Each chat maps to a subdirectory under the root; each user in that
//! chat to a `.json` file inside it. Ids are percent-encoded so any
//! platform id is a safe path component. Sessions survive process
//! restarts.

use async_trait::async_trait;
use chatform_proto::error::StateError;
use chatform_proto::id::{ChatId, UserId};
use chatform_proto::session::{SessionKey, SessionState};
use chatform_proto::store::SessionStore;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::AsyncWriteExt;

/// Filesystem-backed session store.
///
/// Directory layout:
/// ```text
/// root/
///   <encoded-chat-id>/
///     <encoded-user-id>.json
/// ```
///
/// Writes go to a temporary file in the same directory and are renamed
/// into place, so a reader never sees a half-written session.
pub struct FsStore {
    root: PathBuf,
    tmp_counter: AtomicU64,
}

impl FsStore {
    /// Create a new filesystem store rooted at the given directory.
    ///
    /// The directory is created lazily on first write.
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            tmp_counter: AtomicU64::new(0),
        }
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn chat_dir(&self, chat: &ChatId) -> Result<PathBuf, StateError> {
        Ok(self.root.join(encode_component(chat.as_str())?))
    }

    fn session_path(&self, key: &SessionKey) -> Result<PathBuf, StateError> {
        let file = format!("{}.json", encode_component(key.user.as_str())?);
        Ok(self.chat_dir(&key.chat)?.join(file))
    }

    async fn write_atomic(&self, path: &Path, contents: &[u8]) -> std::io::Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| std::io::Error::other("session path has no parent"))?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("session");
        let tmp_path = parent.join(format!(
            ".{file_name}.tmp-{}-{}",
            std::process::id(),
            self.tmp_counter.fetch_add(1, Ordering::Relaxed)
        ));

        let result = async {
            let mut file = tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&tmp_path)
                .await?;
            file.write_all(contents).await?;
            file.sync_all().await?;
            drop(file);
            tokio::fs::rename(&tmp_path, path).await
        }
        .await;

        if result.is_err() {
            let _ = tokio::fs::remove_file(&tmp_path).await;
        }
        result
    }
}

/// Percent-encode an id into a path component. Only ASCII letters,
/// digits, `-` and `_` pass through, so `.` and `..` can never appear.
fn encode_component(id: &str) -> Result<String, StateError> {
    if id.is_empty() {
        return Err(StateError::Other("empty chat or user id".into()));
    }
    let mut encoded = String::with_capacity(id.len());
    for byte in id.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' => encoded.push(byte as char),
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    Ok(encoded)
}

/// Decode a path component back to an id.
fn decode_component(name: &str) -> Option<String> {
    let bytes = name.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let hex = std::str::from_utf8(bytes.get(i + 1..i + 3)?).ok()?;
                result.push(u8::from_str_radix(hex, 16).ok()?);
                i += 3;
            }
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' => {
                result.push(bytes[i]);
                i += 1;
            }
            _ => return None,
        }
    }
    if result.is_empty() {
        return None;
    }
    String::from_utf8(result).ok()
}

/// Decode a session filename back to a user id.
fn filename_to_user(filename: &str) -> Option<String> {
    decode_component(filename.strip_suffix(".json")?)
}

fn io_error(e: std::io::Error) -> StateError {
    StateError::Other(Box::new(e))
}

#[async_trait]
impl SessionStore for FsStore {
    async fn read(&self, key: &SessionKey) -> Result<Option<SessionState>, StateError> {
        let path = self.session_path(key)?;
        match tokio::fs::read(&path).await {
            Ok(contents) => {
                let state = serde_json::from_slice(&contents)
                    .map_err(|e| StateError::Serialization(e.to_string()))?;
                Ok(Some(state))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(e)),
        }
    }

    async fn write(&self, key: &SessionKey, state: SessionState) -> Result<(), StateError> {
        let dir = self.chat_dir(&key.chat)?;
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| StateError::WriteFailed(e.to_string()))?;

        let path = self.session_path(key)?;
        let contents = serde_json::to_vec_pretty(&state)
            .map_err(|e| StateError::Serialization(e.to_string()))?;
        self.write_atomic(&path, &contents)
            .await
            .map_err(|e| StateError::WriteFailed(e.to_string()))?;
        tracing::debug!(chat = %key.chat, user = %key.user, path = %path.display(), "session written");
        Ok(())
    }

    async fn delete(&self, key: &SessionKey) -> Result<(), StateError> {
        let path = self.session_path(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StateError::WriteFailed(e.to_string())),
        }
    }

    async fn list(&self) -> Result<Vec<SessionKey>, StateError> {
        let mut chats = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(io_error(e)),
        };

        let mut keys = Vec::new();
        while let Some(chat_entry) = chats.next_entry().await.map_err(io_error)? {
            if !chat_entry.file_type().await.map_err(io_error)?.is_dir() {
                continue;
            }
            let Some(chat) = chat_entry.file_name().to_str().and_then(decode_component) else {
                continue;
            };

            let mut users = match tokio::fs::read_dir(chat_entry.path()).await {
                Ok(entries) => entries,
                // Removed between the two reads.
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(io_error(e)),
            };
            while let Some(user_entry) = users.next_entry().await.map_err(io_error)? {
                if let Some(user) = user_entry.file_name().to_str().and_then(filename_to_user) {
                    keys.push(SessionKey::new(
                        ChatId::new(chat.clone()),
                        UserId::new(user),
                    ));
                }
            }
        }
        Ok(keys)
    }
}
