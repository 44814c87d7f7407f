// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{error::Result, metadata};

use super::{IsPersistent, Storage};

/// Stores the record as a JSON document on disk.
pub(crate) struct File {
    path: PathBuf,
}

impl File {
    /// Places `file` in the platform data directory, if there is one.
    pub(crate) fn new<P: AsRef<Path>>(file: P) -> Option<Self> {
        metadata::PROJECT_DIRS
            .as_ref()
            .map(|dirs| Self::with_path(dirs.data_dir().join(file)))
    }

    pub(crate) fn with_path<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

impl IsPersistent for File {
    fn is_persistent(&self) -> bool {
        true
    }
}

#[async_trait]
impl<T: Send + Serialize + Sync + for<'de> Deserialize<'de>> Storage<T> for File {
    async fn get(&mut self) -> Result<Option<T>> {
        match fs::File::open(&self.path) {
            Ok(fp) => Ok(Some(serde_json::from_reader::<fs::File, T>(fp)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn update(&mut self, data: &T) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = fs::File::create(&self.path)?;
        serde_json::to_writer(file, data)?;
        debug!("Wrote {}", self.path.display());
        Ok(())
    }

    async fn clear(&mut self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Removed {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::error::{Error, Result};

    use super::*;

    #[tokio::test]
    async fn missing_file_reads_as_empty() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut storage = File::with_path(dir.path().join("session.json"));

        assert_eq!(Storage::<u32>::get(&mut storage).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn update_creates_parent_directories() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut storage = File::with_path(dir.path().join("nested").join("session.json"));

        storage.update(&vec![1_u32, 2, 3]).await?;

        assert_eq!(
            Storage::<Vec<u32>>::get(&mut storage).await?,
            Some(vec![1, 2, 3])
        );
        Ok(())
    }

    #[tokio::test]
    async fn clear_is_idempotent() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut storage = File::with_path(dir.path().join("session.json"));

        storage.update(&"hello".to_owned()).await?;
        Storage::<String>::clear(&mut storage).await?;
        Storage::<String>::clear(&mut storage).await?;

        assert!(!storage.path().exists());
        Ok(())
    }

    #[tokio::test]
    async fn garbage_is_a_json_error() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json")?;
        let mut storage = File::with_path(path);

        let result = Storage::<String>::get(&mut storage).await;

        assert!(matches!(result, Err(Error::Json(_))));
        Ok(())
    }
}
