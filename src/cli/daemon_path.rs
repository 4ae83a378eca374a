use std::path::PathBuf;

/// The daemon binary ships next to the cli binary.
pub fn to_daemon_path(mut path: PathBuf) -> PathBuf {
    path.set_file_name("focusmon-daemon");
    #[cfg(windows)]
    {
        path.set_extension("exe");
    }
    path
}
