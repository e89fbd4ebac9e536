//! Drive-path translation rule

use std::path::{Path, PathBuf};

use contracts::PathStyle;

/// Split `X:\a\b` / `X:/a/b` / `X:` into drive letter and components
fn split_drive_path(raw: &str) -> Option<(char, Vec<&str>)> {
    let mut chars = raw.chars();
    let drive = chars.next().filter(char::is_ascii_alphabetic)?;
    if chars.next() != Some(':') {
        return None;
    }

    let rest = &raw[2..];
    // `C:foo` is relative to the drive's current directory; leave it alone
    if !rest.is_empty() && !rest.starts_with(['\\', '/']) {
        return None;
    }

    let components = rest
        .split(['\\', '/'])
        .filter(|c| !c.is_empty() && *c != ".")
        .collect();

    Some((drive.to_ascii_lowercase(), components))
}

/// Whether `raw` is an absolute Windows drive path
pub fn is_drive_path(raw: &str) -> bool {
    split_drive_path(raw).is_some()
}

/// Rewrite `raw` into `style` notation
///
/// Only absolute drive paths are rewritten; anything else (POSIX, relative,
/// UNC, drive-relative) is returned as written. `Native` and `Auto` never
/// rewrite.
pub fn translate(raw: &str, style: PathStyle, wsl_mount_root: &Path) -> PathBuf {
    let prefix = match style {
        PathStyle::Native | PathStyle::Auto => return PathBuf::from(raw),
        PathStyle::Wsl => wsl_mount_root
            .to_string_lossy()
            .trim_end_matches('/')
            .to_string(),
        PathStyle::Msys => String::new(),
        PathStyle::Cygwin => "/cygdrive".to_string(),
    };

    let Some((drive, components)) = split_drive_path(raw) else {
        return PathBuf::from(raw);
    };

    let mut out = format!("{prefix}/{drive}");
    for component in components {
        out.push('/');
        out.push_str(component);
    }
    PathBuf::from(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGINAL: &str = r"C:\Users\ASUS\Desktop\LuminaLM\Data";

    fn mnt() -> &'static Path {
        Path::new("/mnt")
    }

    #[test]
    fn test_wsl_translation() {
        assert_eq!(
            translate(ORIGINAL, PathStyle::Wsl, mnt()),
            PathBuf::from("/mnt/c/Users/ASUS/Desktop/LuminaLM/Data")
        );
    }

    #[test]
    fn test_msys_and_cygwin_translation() {
        assert_eq!(
            translate(ORIGINAL, PathStyle::Msys, mnt()),
            PathBuf::from("/c/Users/ASUS/Desktop/LuminaLM/Data")
        );
        assert_eq!(
            translate(ORIGINAL, PathStyle::Cygwin, mnt()),
            PathBuf::from("/cygdrive/c/Users/ASUS/Desktop/LuminaLM/Data")
        );
    }

    #[test]
    fn test_separators_are_normalized() {
        assert_eq!(
            translate(r"d:/corpus\\medical//texts\", PathStyle::Wsl, mnt()),
            PathBuf::from("/mnt/d/corpus/medical/texts")
        );
        assert_eq!(
            translate(r"E:\.\data", PathStyle::Msys, mnt()),
            PathBuf::from("/e/data")
        );
    }

    #[test]
    fn test_bare_drive() {
        assert_eq!(translate("C:", PathStyle::Wsl, mnt()), PathBuf::from("/mnt/c"));
        assert_eq!(translate(r"C:\", PathStyle::Msys, mnt()), PathBuf::from("/c"));
    }

    #[test]
    fn test_custom_mount_root() {
        assert_eq!(
            translate(r"C:\data", PathStyle::Wsl, Path::new("/win/")),
            PathBuf::from("/win/c/data")
        );
        assert_eq!(
            translate(r"C:\data", PathStyle::Wsl, Path::new("/")),
            PathBuf::from("/c/data")
        );
    }

    #[test]
    fn test_non_drive_paths_pass_through() {
        for raw in [
            "/home/user/data",
            "data/medical",
            r"\\server\share\data",
            "C:relative",
            "1:/not-a-drive",
        ] {
            assert_eq!(translate(raw, PathStyle::Wsl, mnt()), PathBuf::from(raw));
            assert!(!is_drive_path(raw), "{raw}");
        }
    }

    #[test]
    fn test_native_never_translates() {
        assert_eq!(
            translate(ORIGINAL, PathStyle::Native, mnt()),
            PathBuf::from(ORIGINAL)
        );
        assert_eq!(translate(ORIGINAL, PathStyle::Auto, mnt()), PathBuf::from(ORIGINAL));
    }
}
