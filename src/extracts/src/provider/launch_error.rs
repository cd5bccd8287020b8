use std::error::Error;
use std::fmt;
use std::io;

/// Classified failure of a process launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchError {
    /// The OS wants elevated privileges for this program.
    PermissionDenied,
    /// A network path could not be reached. `host` is the server of a UNC
    /// program path, when there is one.
    PathUnreachable { host: Option<String> },
    NotFound,
    Other { code: Option<i32>, message: String },
}

impl LaunchError {
    /// Classifies an error returned while spawning `program`.
    pub fn from_io(error: &io::Error, program: &str) -> Self {
        #[cfg(windows)]
        if let Some(class) = error.raw_os_error().and_then(windows_class) {
            return class.into_error(program);
        }

        match error.kind() {
            io::ErrorKind::PermissionDenied => LaunchError::PermissionDenied,
            io::ErrorKind::NotFound => LaunchError::NotFound,
            io::ErrorKind::NetworkUnreachable | io::ErrorKind::HostUnreachable => {
                LaunchError::PathUnreachable {
                    host: unc_host(program),
                }
            }
            _ => LaunchError::Other {
                code: error.raw_os_error(),
                message: error.to_string(),
            },
        }
    }

    /// Classifies a raw Win32 error code (also used for `ShellExecuteW` results,
    /// whose small codes share the same numbering).
    pub fn from_code(code: i32, program: &str) -> Self {
        match windows_class(code) {
            Some(class) => class.into_error(program),
            None => LaunchError::Other {
                code: Some(code),
                message: format!("OS error {}", code),
            },
        }
    }
}

impl fmt::Display for LaunchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LaunchError::PermissionDenied => write!(f, "elevation required"),
            LaunchError::PathUnreachable { host: Some(host) } => {
                write!(f, "network path on {} is unreachable", host)
            }
            LaunchError::PathUnreachable { host: None } => write!(f, "network path is unreachable"),
            LaunchError::NotFound => write!(f, "program not found"),
            LaunchError::Other {
                code: Some(code),
                message,
            } => write!(f, "{} (code {})", message, code),
            LaunchError::Other { code: None, message } => write!(f, "{}", message),
        }
    }
}

impl Error for LaunchError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WindowsClass {
    Privilege,
    NetworkPath,
    Missing,
}

impl WindowsClass {
    fn into_error(self, program: &str) -> LaunchError {
        match self {
            WindowsClass::Privilege => LaunchError::PermissionDenied,
            WindowsClass::NetworkPath => LaunchError::PathUnreachable {
                host: unc_host(program),
            },
            WindowsClass::Missing => LaunchError::NotFound,
        }
    }
}

const ERROR_FILE_NOT_FOUND: i32 = 2;
const ERROR_PATH_NOT_FOUND: i32 = 3;
const ERROR_ACCESS_DENIED: i32 = 5;
const ERROR_BAD_NETPATH: i32 = 53;
const ERROR_BAD_NET_NAME: i32 = 67;
const ERROR_ELEVATION_REQUIRED: i32 = 740;
const ERROR_NETWORK_UNREACHABLE: i32 = 1231;
const ERROR_HOST_UNREACHABLE: i32 = 1232;

fn windows_class(code: i32) -> Option<WindowsClass> {
    match code {
        ERROR_ACCESS_DENIED | ERROR_ELEVATION_REQUIRED => Some(WindowsClass::Privilege),
        ERROR_BAD_NETPATH | ERROR_BAD_NET_NAME | ERROR_NETWORK_UNREACHABLE
        | ERROR_HOST_UNREACHABLE => Some(WindowsClass::NetworkPath),
        ERROR_FILE_NOT_FOUND | ERROR_PATH_NOT_FOUND => Some(WindowsClass::Missing),
        _ => None,
    }
}

/// Server component of a UNC path (`\\server\share\...` or `//server/share/...`).
///
/// Device and long-path prefixes (`\\?\C:\`, `\\.\pipe\`) are not network paths;
/// the long UNC form `\\?\UNC\server\share` is.
pub fn unc_host(path: &str) -> Option<String> {
    let rest = path.strip_prefix(r"\\").or_else(|| path.strip_prefix("//"))?;
    let rest = match rest.strip_prefix(r"?\UNC\") {
        Some(rest) => rest,
        None if rest.starts_with('?') || rest.starts_with('.') => return None,
        None => rest,
    };

    let host = rest.split(['\\', '/']).next()?;
    (!host.is_empty()).then(|| host.to_string())
}
