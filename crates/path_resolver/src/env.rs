//! Execution environment detection

use contracts::PathStyle;

const KERNEL_RELEASE: &str = "/proc/sys/kernel/osrelease";

/// Snapshot of the facts that decide the path style
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionEnv {
    /// Driver built for Windows: children are native Windows processes
    pub windows_host: bool,
    /// Running inside WSL
    pub wsl: bool,
    /// `MSYSTEM` (MSYS2 / Git Bash)
    pub msystem: Option<String>,
    /// `OSTYPE`, when exported by the shell
    pub ostype: Option<String>,
}

impl ExecutionEnv {
    /// Inspect the current process environment
    pub fn detect() -> Self {
        let release = std::fs::read_to_string(KERNEL_RELEASE).ok();
        Self::from_lookup(|key| std::env::var(key).ok(), release.as_deref())
            .with_windows_host(cfg!(windows))
    }

    /// Build from an arbitrary variable lookup (tests, replay)
    pub fn from_lookup<F>(lookup: F, kernel_release: Option<&str>) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let wsl = lookup("WSL_DISTRO_NAME").is_some()
            || lookup("WSL_INTEROP").is_some()
            || kernel_release
                .map(|r| r.to_ascii_lowercase().contains("microsoft"))
                .unwrap_or(false);

        Self {
            windows_host: false,
            wsl,
            msystem: lookup("MSYSTEM").filter(|v| !v.is_empty()),
            ostype: lookup("OSTYPE").filter(|v| !v.is_empty()),
        }
    }

    pub fn with_windows_host(mut self, windows_host: bool) -> Self {
        self.windows_host = windows_host;
        self
    }

    /// Concrete style for this environment
    ///
    /// A Windows build spawns native processes that take Windows paths, so
    /// it never translates.
    pub fn path_style(&self) -> PathStyle {
        if self.windows_host {
            PathStyle::Native
        } else if self.wsl {
            PathStyle::Wsl
        } else if self.msystem.is_some() {
            PathStyle::Msys
        } else if self
            .ostype
            .as_deref()
            .map(|t| t.starts_with("cygwin"))
            .unwrap_or(false)
        {
            PathStyle::Cygwin
        } else {
            PathStyle::Native
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(vars: &[(&str, &str)], release: Option<&str>) -> ExecutionEnv {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ExecutionEnv::from_lookup(|k| map.get(k).cloned(), release)
    }

    #[test]
    fn test_wsl_from_distro_variable() {
        let env = env_of(&[("WSL_DISTRO_NAME", "Ubuntu")], None);
        assert!(env.wsl);
        assert_eq!(env.path_style(), PathStyle::Wsl);
    }

    #[test]
    fn test_wsl_from_kernel_release() {
        let env = env_of(&[], Some("5.15.153.1-microsoft-standard-WSL2\n"));
        assert_eq!(env.path_style(), PathStyle::Wsl);
    }

    #[test]
    fn test_msys_and_cygwin() {
        assert_eq!(
            env_of(&[("MSYSTEM", "MINGW64")], None).path_style(),
            PathStyle::Msys
        );
        assert_eq!(
            env_of(&[("OSTYPE", "cygwin")], None).path_style(),
            PathStyle::Cygwin
        );
        assert_eq!(
            env_of(&[("MSYSTEM", "")], Some("6.8.0-generic")).path_style(),
            PathStyle::Native
        );
    }

    #[test]
    fn test_windows_host_is_native() {
        let env = env_of(&[("MSYSTEM", "MINGW64")], None).with_windows_host(true);
        assert_eq!(env.path_style(), PathStyle::Native);
    }

    #[test]
    fn test_detect_does_not_panic() {
        let _ = ExecutionEnv::detect().path_style();
    }
}
