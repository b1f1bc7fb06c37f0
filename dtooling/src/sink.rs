//! Image persistence.
//!
//! Files are named `generated_<unix-millis>.png`; a numeric suffix is added
//! when two saves land on the same millisecond.

use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use dcommon::BoxFuture;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

const MAX_NAME_ATTEMPTS: u32 = 64;

pub trait ImageSink: Send + Sync {
    fn save<'a>(&'a self, bytes: &'a [u8]) -> BoxFuture<'a, io::Result<PathBuf>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsImageSink {
    directory: PathBuf,
}

impl FsImageSink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn file_name(millis: u128, attempt: u32) -> String {
        if attempt == 0 {
            format!("generated_{millis}.png")
        } else {
            format!("generated_{millis}_{attempt}.png")
        }
    }
}

impl ImageSink for FsImageSink {
    fn save<'a>(&'a self, bytes: &'a [u8]) -> BoxFuture<'a, io::Result<PathBuf>> {
        Box::pin(async move {
            fs::create_dir_all(&self.directory).await?;

            let millis = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|elapsed| elapsed.as_millis())
                .unwrap_or_default();

            for attempt in 0..MAX_NAME_ATTEMPTS {
                let path = self.directory.join(Self::file_name(millis, attempt));
                let mut file = match OpenOptions::new()
                    .write(true)
                    .create_new(true)
                    .open(&path)
                    .await
                {
                    Ok(file) => file,
                    Err(err) if err.kind() == io::ErrorKind::AlreadyExists => continue,
                    Err(err) => return Err(err),
                };

                file.write_all(bytes).await?;
                file.flush().await?;
                return Ok(path);
            }

            Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!(
                    "no free image file name in {}",
                    self.directory.display()
                ),
            ))
        })
    }
}
