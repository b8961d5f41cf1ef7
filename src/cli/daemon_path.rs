use std::path::PathBuf;

/// Daemon binary is expected to live next to the cli binary.
pub fn to_daemon_path(mut path: PathBuf) -> PathBuf {
    path.set_file_name("tabtally-daemon");
    #[cfg(windows)]
    {
        path.set_extension("exe");
    }
    path
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::to_daemon_path;

    #[test]
    #[cfg(unix)]
    fn test_daemon_is_a_sibling() {
        assert_eq!(
            to_daemon_path(PathBuf::from("/usr/local/bin/tabtally")),
            PathBuf::from("/usr/local/bin/tabtally-daemon")
        );
    }
}
