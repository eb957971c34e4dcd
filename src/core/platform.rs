//! Purpose: Host OS-family probe used to pick the right bundled artifact.
//! Exports: `OsFamily`, `running_on_mac`, `running_on_linux`, `library_file_name`.
//! Role: Pure queries over the host OS identification facility.
//! Invariants: The family is resolved once per process and cached.
//! Invariants: Probes have no side effects and no failure modes.

use std::sync::OnceLock;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OsFamily {
    MacOs,
    Linux,
    Windows,
    Other,
}

impl OsFamily {
    /// The host's OS family, resolved on first use and cached for the process.
    pub fn current() -> OsFamily {
        static FAMILY: OnceLock<OsFamily> = OnceLock::new();
        *FAMILY.get_or_init(|| OsFamily::from_os_name(std::env::consts::OS))
    }

    fn from_os_name(name: &str) -> OsFamily {
        match name {
            "macos" => OsFamily::MacOs,
            "linux" => OsFamily::Linux,
            "windows" => OsFamily::Windows,
            _ => OsFamily::Other,
        }
    }

    /// Dynamic-library file extension the host loader expects for this family.
    pub fn library_extension(self) -> &'static str {
        match self {
            OsFamily::MacOs => "dylib",
            OsFamily::Windows => "dll",
            OsFamily::Linux | OsFamily::Other => "so",
        }
    }
}

pub fn running_on_mac() -> bool {
    OsFamily::current() == OsFamily::MacOs
}

pub fn running_on_linux() -> bool {
    OsFamily::current() == OsFamily::Linux
}

/// File name the current host expects for a native library stem, e.g.
/// `libfoo.so` on Linux, `libfoo.dylib` on macOS, `foo.dll` on Windows.
pub fn library_file_name(stem: &str) -> String {
    let family = OsFamily::current();
    match family {
        OsFamily::Windows => format!("{stem}.{}", family.library_extension()),
        _ => format!("lib{stem}.{}", family.library_extension()),
    }
}
