use std::{
    ffi::OsString,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use fs4::tokio::AsyncFileExt;
use tokio::{
    fs::File,
    io::{self, AsyncReadExt, AsyncWriteExt},
};

/// Reads a whole file under a shared lock. A missing file is not an error.
pub async fn read_locked(path: &Path) -> Result<Option<Vec<u8>>, io::Error> {
    let mut file = match File::open(path).await {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };
    file.lock_shared()?;
    let mut buffer = Vec::new();
    let result = file.read_to_end(&mut buffer).await;
    file.unlock_async().await?;
    result?;
    Ok(Some(buffer))
}

/// Replaces contents of a file, creating it and its parent directories when needed. The new
/// contents are written next to the target and renamed over it, so the file is never observed
/// half written, even if the process dies mid write.
pub async fn write_locked(path: &Path, contents: &[u8]) -> Result<(), io::Error> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let staging = staging_path(path);
    let mut file = File::create(&staging).await?;
    file.lock_exclusive()?;
    let result = write_synced(&mut file, contents).await;
    file.unlock_async().await?;
    drop(file);
    if let Err(e) = result {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(e);
    }
    tokio::fs::rename(&staging, path).await
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

async fn write_synced(file: &mut File, contents: &[u8]) -> Result<(), io::Error> {
    file.write_all(contents).await?;
    file.flush().await?;
    file.sync_data().await
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use tempfile::tempdir;

    use super::{read_locked, staging_path, write_locked};

    #[tokio::test]
    async fn test_missing_file_reads_as_none() -> Result<()> {
        let dir = tempdir()?;
        assert_eq!(read_locked(&dir.path().join("absent")).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_write_creates_parents() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested/deeper/value.json");
        write_locked(&path, b"{}").await?;
        assert_eq!(read_locked(&path).await?, Some(b"{}".to_vec()));
        Ok(())
    }

    #[tokio::test]
    async fn test_shorter_write_replaces_whole_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("value.json");
        write_locked(&path, b"a much longer first value").await?;
        write_locked(&path, b"short").await?;
        assert_eq!(read_locked(&path).await?, Some(b"short".to_vec()));
        Ok(())
    }

    #[tokio::test]
    async fn test_write_leaves_no_staging_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("2018-07-04.json");
        write_locked(&path, b"{\"github.com\":5}").await?;
        write_locked(&path, b"{\"github.com\":10}").await?;
        let names = std::fs::read_dir(dir.path())?
            .map(|entry| entry.map(|entry| entry.file_name()))
            .collect::<Result<Vec<_>, _>>()?;
        assert_eq!(names, vec!["2018-07-04.json"]);
        assert_eq!(staging_path(&path), dir.path().join("2018-07-04.json.tmp"));
        Ok(())
    }
}
