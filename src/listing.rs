use std::ffi::{OsStr, OsString};
use std::io;
use std::path::Path;

#[cfg(not(unix))]
const LAUNCHABLE_EXTENSIONS: &[&str] = &["exe", "bat", "cmd", "com", "lnk", "rdp", "ps1"];

pub fn is_hidden(name: &OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

/// True for regular files (symlinks followed) with any execute bit set.
#[cfg(unix)]
pub fn is_launchable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
pub fn is_launchable(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| {
                LAUNCHABLE_EXTENSIONS
                    .iter()
                    .any(|a| a.eq_ignore_ascii_case(e))
            })
            .unwrap_or(false)
}

/// Orders by the lowercased display text, then by the raw name.
pub fn sort_case_insensitive(names: &mut [OsString]) {
    names.sort_by(|a, b| {
        a.to_string_lossy()
            .to_lowercase()
            .cmp(&b.to_string_lossy().to_lowercase())
            .then_with(|| a.cmp(b))
    });
}

/// Names of the non-hidden launchable files directly inside `dir`, ordered
/// case-insensitively. Names are kept as the OS returned them so they can
/// be joined back onto `dir`.
pub fn list_launchable(dir: &Path) -> io::Result<Vec<OsString>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)?.flatten() {
        let name = entry.file_name();
        if is_hidden(&name) {
            continue;
        }
        if is_launchable(&entry.path()) {
            names.push(name);
        }
    }
    sort_case_insensitive(&mut names);
    Ok(names)
}


#[cfg(test)]
mod tests {
    use super::test_support::write_file;
    use super::*;
    use tempfile::TempDir;

    #[cfg(unix)]
    #[test]
    fn lists_executables_case_insensitively_without_hidden_files() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "b.sh", true);
        write_file(dir.path(), "A.sh", true);
        write_file(dir.path(), ".hidden", true);
        write_file(dir.path(), "c.txt", false);

        let names = list_launchable(dir.path()).unwrap();

        assert_eq!(names, vec![OsString::from("A.sh"), OsString::from("b.sh")]);
    }

    #[cfg(unix)]
    #[test]
    fn directories_are_not_listed_even_when_searchable() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("bin")).unwrap();
        write_file(dir.path(), "run", true);

        assert_eq!(list_launchable(dir.path()).unwrap(), vec![OsString::from("run")]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_to_executables_are_listed() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "real", true);
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("alias")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("dangling")).unwrap();

        let names = list_launchable(dir.path()).unwrap();

        assert_eq!(names, vec![OsString::from("alias"), OsString::from("real")]);
    }

    #[test]
    fn empty_directory_lists_nothing() {
        let dir = TempDir::new().unwrap();
        assert!(list_launchable(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(list_launchable(&dir.path().join("nope")).is_err());
    }

    #[test]
    fn sort_breaks_case_ties_deterministically() {
        let mut names = vec![
            OsString::from("run"),
            OsString::from("Run"),
            OsString::from("apple"),
        ];
        sort_case_insensitive(&mut names);
        assert_eq!(names, vec!["apple", "Run", "run"]);
    }

    #[cfg(unix)]
    #[test]
    fn files_without_execute_bits_are_skipped() {
        use std::os::unix::fs::PermissionsExt;
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "owner-only", true);
        std::fs::set_permissions(
            dir.path().join("owner-only"),
            std::fs::Permissions::from_mode(0o700),
        )
        .unwrap();
        write_file(dir.path(), "plain", false);

        assert_eq!(
            list_launchable(dir.path()).unwrap(),
            vec![OsString::from("owner-only")]
        );
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn non_utf8_names_keep_their_raw_bytes() {
        use std::os::unix::ffi::OsStrExt;
        let dir = TempDir::new().unwrap();
        let raw = OsStr::from_bytes(b"caf\xe9.sh");
        std::fs::write(dir.path().join(raw), "#!/bin/sh\n").unwrap();
        write_file(dir.path(), "Bar.sh", true);
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(dir.path().join(raw), std::fs::Permissions::from_mode(0o755))
                .unwrap();
        }

        let names = list_launchable(dir.path()).unwrap();

        assert_eq!(names, vec![OsString::from("Bar.sh"), raw.to_os_string()]);
        assert!(dir.path().join(&names[1]).is_file());
    }
}
