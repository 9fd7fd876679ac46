//! SSH/SFTP endpoint implementation.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use russh::client::{self, AuthResult, KeyboardInteractiveAuthResponse};
use russh::keys::{self, PrivateKeyWithHashAlg, ssh_key};
use russh::{Disconnect, MethodKind};
use russh_sftp::client::SftpSession;
use tracing::{debug, error, warn};

use super::{EntryKind, FileEntry, FileSystemStore, FileSystemView, slash_parent, sort_entries};
use crate::config::manager::{AuthMethod, Connection};
use crate::error::{AppError, Result};

struct SshHandler {}

impl client::Handler for SshHandler {
    type Error = AppError;

    async fn check_server_key(
        &mut self,
        _server_public_key: &ssh_key::PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        Ok(true)
    }
}

/// A stored SSH connection as a browsable endpoint.
pub struct SshStore {
    connection: Connection,
    connect_timeout: Duration,
}

impl SshStore {
    pub fn new(connection: Connection, connect_timeout: Duration) -> Self {
        Self {
            connection,
            connect_timeout,
        }
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }
}

impl FileSystemStore for SshStore {
    fn id(&self) -> &str {
        &self.connection.id
    }

    fn display_name(&self) -> &str {
        &self.connection.display_name
    }

    fn is_usable(&self) -> bool {
        self.connection.validate().is_ok()
    }

    fn open(&self) -> BoxFuture<'_, Result<Box<dyn FileSystemView>>> {
        Box::pin(async move {
            let view = SftpView::connect(&self.connection, self.connect_timeout).await?;
            Ok(Box::new(view) as Box<dyn FileSystemView>)
        })
    }
}

/// File-system view over an SFTP subsystem channel.
pub struct SftpView {
    handle: Option<client::Handle<SshHandler>>,
    sftp: SftpSession,
}

impl SftpView {
    /// Establish an authenticated SSH session and start the SFTP subsystem.
    async fn connect(connection: &Connection, connect_timeout: Duration) -> Result<Self> {
        let handle = tokio::time::timeout(connect_timeout, Self::authenticate(connection))
            .await
            .map_err(|_| {
                AppError::ConnectionError(format!(
                    "Timed out connecting to {}",
                    connection.host_port()
                ))
            })??;

        let channel = handle.channel_open_session().await?;
        channel.request_subsystem(true, "sftp").await?;

        let sftp = SftpSession::new(channel.into_stream())
            .await
            .map_err(|e| AppError::SftpError(format!("SFTP session creation failed: {e}")))?;

        Ok(Self {
            handle: Some(handle),
            sftp,
        })
    }

    async fn authenticate(connection: &Connection) -> Result<client::Handle<SshHandler>> {
        let config = client::Config {
            inactivity_timeout: Some(Duration::from_secs(5)),
            ..Default::default()
        };

        let config = Arc::new(config);
        let mut session =
            client::connect(config, connection.host_port(), SshHandler {}).await?;

        let auth_result = session.authenticate_none(&connection.username).await?;
        let mut interactive = false;
        if let AuthResult::Failure {
            remaining_methods, ..
        } = auth_result
            && remaining_methods.contains(&MethodKind::KeyboardInteractive)
        {
            interactive = true;
        }

        match &connection.auth_method {
            AuthMethod::Password(password) => {
                if interactive {
                    let mut step = session
                        .authenticate_keyboard_interactive_start(&connection.username, None)
                        .await?;

                    loop {
                        match step {
                            KeyboardInteractiveAuthResponse::Success => {
                                debug!("keyboard-interactive authentication successful");
                                break;
                            }
                            KeyboardInteractiveAuthResponse::Failure { .. } => {
                                return Err(AppError::AuthenticationError(
                                    "Authentication failed".to_string(),
                                ));
                            }
                            KeyboardInteractiveAuthResponse::InfoRequest {
                                ref prompts, ..
                            } => {
                                if prompts.is_empty() {
                                    step = session
                                        .authenticate_keyboard_interactive_respond(vec![])
                                        .await?;
                                } else {
                                    step = session
                                        .authenticate_keyboard_interactive_respond(vec![
                                            password.clone(),
                                        ])
                                        .await?;
                                }
                            }
                        }
                    }
                } else {
                    let auth_result = session
                        .authenticate_password(&connection.username, password)
                        .await?;
                    if !auth_result.success() {
                        return Err(AppError::AuthenticationError(
                            "Authentication failed".to_string(),
                        ));
                    }
                }
            }
            AuthMethod::PublicKey {
                private_key_path,
                passphrase,
            } => {
                let algo = session.best_supported_rsa_hash().await?.flatten();

                let key_path = if private_key_path.starts_with("~/") {
                    let home = env::var_os("HOME").ok_or_else(|| {
                        AppError::ConnectionError(
                            "HOME environment variable is not set".to_string(),
                        )
                    })?;
                    PathBuf::from(home).join(&private_key_path[2..])
                } else {
                    PathBuf::from(private_key_path)
                };

                let private_key = keys::load_secret_key(key_path, passphrase.as_deref())
                    .map_err(|e| AppError::AuthenticationError(e.to_string()))?;
                let private_key_with_hash_alg =
                    PrivateKeyWithHashAlg::new(Arc::new(private_key), algo);

                let auth_result = session
                    .authenticate_publickey(&connection.username, private_key_with_hash_alg)
                    .await?;
                if !auth_result.success() {
                    return Err(AppError::AuthenticationError(
                        "Authentication failed".to_string(),
                    ));
                }
            }
        }

        Ok(session)
    }
}

impl FileSystemView for SftpView {
    fn read_dir<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<Vec<FileEntry>>> {
        Box::pin(async move {
            debug!("SFTP read_dir: {}", path);
            let mut entries = Vec::new();

            // Normalize the path using PathBuf for safer path manipulation
            let path_buf = PathBuf::from(path);
            let normalized_path = if path.is_empty() || path == "." {
                PathBuf::from(".")
            } else if path == "/" {
                PathBuf::from("/")
            } else {
                // PathBuf automatically handles trailing slashes
                let mut normalized = PathBuf::new();
                for component in path_buf.components() {
                    normalized.push(component);
                }
                // Ensure we don't end up with empty path
                if normalized.as_os_str().is_empty() {
                    PathBuf::from("/")
                } else {
                    normalized
                }
            };

            let normalized_str = normalized_path.to_string_lossy();

            let read_dir = self
                .sftp
                .read_dir(normalized_str.as_ref())
                .await
                .map_err(|e| {
                    error!("SFTP read_dir failed for '{}': {}", normalized_str, e);
                    AppError::SftpError(format!("SFTP read_dir failed for '{normalized_str}': {e}"))
                })?;

            for entry in read_dir {
                let filename = entry.file_name();
                let is_hidden = filename.starts_with('.');

                let full_path = normalized_path.join(&filename);
                let full_path_str = full_path.to_string_lossy();

                // For symlinks, follow them to check whether they point to
                // directories; an unresolvable link counts as a file.
                let is_dir = if entry.file_type().is_symlink() {
                    match self.sftp.metadata(full_path_str.as_ref()).await {
                        Ok(target_metadata) => target_metadata.is_dir(),
                        Err(_) => false,
                    }
                } else {
                    entry.file_type().is_dir()
                };

                let size = if !is_dir { entry.metadata().size } else { None };
                let modified = entry.metadata().modified().ok();

                entries.push(FileEntry {
                    name: if is_dir {
                        format!("{filename}/")
                    } else {
                        filename
                    },
                    path: full_path_str.to_string(),
                    kind: if is_dir {
                        EntryKind::Directory
                    } else {
                        EntryKind::File
                    },
                    is_hidden,
                    size,
                    modified,
                });
            }

            sort_entries(&mut entries);

            debug!(
                "SFTP read_dir completed for '{}': {} entries",
                normalized_path.display(),
                entries.len()
            );
            Ok(entries)
        })
    }

    fn canonicalize<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<String>> {
        Box::pin(async move {
            self.sftp
                .canonicalize(path)
                .await
                .map_err(|e| AppError::SftpError(format!("SFTP canonicalize failed: {e}")))
        })
    }

    fn parent(&self, path: &str) -> Option<String> {
        slash_parent(path)
    }

    fn close<'a>(&'a mut self) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            if let Err(e) = self.sftp.close().await {
                warn!("SFTP session close failed: {}", e);
            }
            if let Some(handle) = self.handle.take() {
                handle
                    .disconnect(Disconnect::ByApplication, "", "")
                    .await?;
            }
            Ok(())
        })
    }
}
