//! Operating system family and platform description.

use std::fmt;

/// Known operating system families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    Linux,
    Mac,
    Bsd,
    Windows,
    Other,
}

impl OsFamily {
    /// Family of the running host.
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Parse a family from a `std::env::consts::OS` value.
    pub fn from_os(os: &str) -> Self {
        match os {
            "linux" | "android" => OsFamily::Linux,
            "macos" => OsFamily::Mac,
            "windows" => OsFamily::Windows,
            other if other.contains("bsd") || other == "dragonfly" => OsFamily::Bsd,
            _ => OsFamily::Other,
        }
    }

    /// Whether this is Windows.
    pub fn is_windows(&self) -> bool {
        matches!(self, OsFamily::Windows)
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OsFamily::Linux => "Linux",
            OsFamily::Mac => "Darwin",
            OsFamily::Bsd => "BSD",
            OsFamily::Windows => "Windows",
            OsFamily::Other => "Unknown",
        };
        f.write_str(name)
    }
}

/// Describe the host as `<OS>-<release>-<arch>`.
///
/// On Linux the release is the distribution name from `/etc/os-release`.
pub fn platform_description() -> String {
    let os = OsFamily::current();
    let release = if os == OsFamily::Linux {
        std::fs::read_to_string("/etc/os-release")
            .ok()
            .and_then(|content| parse_os_release(&content))
    } else {
        None
    };

    match release {
        Some(release) => format!("{}-{}-{}", os, release, std::env::consts::ARCH),
        None => format!("{}-{}", os, std::env::consts::ARCH),
    }
}

/// Extract the distribution name from os-release content.
///
/// Prefers `PRETTY_NAME`, falling back to `NAME`.
pub fn parse_os_release(content: &str) -> Option<String> {
    let value = |key: &str| {
        content.lines().find_map(|line| {
            let (k, v) = line.split_once('=')?;
            (k.trim() == key).then(|| v.trim().trim_matches('"').to_string())
        })
    };

    value("PRETTY_NAME")
        .or_else(|| value("NAME"))
        .filter(|v| !v.is_empty())
}

/// Check if running as root/admin.
pub fn is_elevated() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: geteuid() is a simple syscall that returns the effective user ID
        unsafe { libc::geteuid() == 0 }
    }

    #[cfg(not(unix))]
    {
        false
    }
}
