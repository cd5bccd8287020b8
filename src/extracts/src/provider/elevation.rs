use super::{ElevatedLauncher, LaunchError};
use tracing::info;

/// Elevated launches through the `runas` shell verb on Windows and
/// non-interactive `sudo` elsewhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemElevation;

impl SystemElevation {
    pub fn new() -> Self {
        Self
    }
}

/// Joins arguments into a single Windows parameter string, quoting the ones
/// that contain whitespace or are empty.
#[cfg_attr(not(windows), allow(dead_code))]
fn join_parameters(args: &[String]) -> String {
    args.iter()
        .map(|arg| {
            if arg.is_empty() || arg.contains([' ', '\t']) {
                format!("\"{}\"", arg.replace('"', "\\\""))
            } else {
                arg.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(windows)]
impl ElevatedLauncher for SystemElevation {
    fn run_elevated(&self, command: &[String]) -> Result<(), LaunchError> {
        use windows::core::{HSTRING, PCWSTR};
        use windows::Win32::Foundation::HWND;
        use windows::Win32::UI::Shell::ShellExecuteW;
        use windows::Win32::UI::WindowsAndMessaging::SW_SHOWNORMAL;

        let Some((program, args)) = command.split_first() else {
            return Err(LaunchError::Other {
                code: None,
                message: "empty command line".to_string(),
            });
        };

        let verb = HSTRING::from("runas");
        let file = HSTRING::from(program.as_str());
        let parameters = HSTRING::from(join_parameters(args));

        info!("Requesting elevation for {}", program);
        let result = unsafe {
            ShellExecuteW(
                HWND::default(),
                &verb,
                &file,
                &parameters,
                PCWSTR::null(),
                SW_SHOWNORMAL,
            )
        };

        // values above 32 mean the shell accepted the request
        let code = result.0 as isize;
        if code > 32 {
            Ok(())
        } else {
            Err(LaunchError::from_code(code as i32, program))
        }
    }
}

#[cfg(not(windows))]
impl ElevatedLauncher for SystemElevation {
    fn run_elevated(&self, command: &[String]) -> Result<(), LaunchError> {
        use std::process::{Command, Stdio};

        if command.is_empty() {
            return Err(LaunchError::Other {
                code: None,
                message: "empty command line".to_string(),
            });
        }

        let sudo = which::which("sudo").map_err(|e| LaunchError::Other {
            code: None,
            message: format!("sudo is not available: {}", e),
        })?;

        info!("Requesting elevation for {} via sudo", command[0]);
        Command::new(sudo)
            .arg("-n")
            .arg("--")
            .args(command)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_| ())
            .map_err(|e| LaunchError::from_io(&e, &command[0]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameters_with_spaces_are_quoted() {
        let args = vec![
            "/open".to_string(),
            r"C:\My Files\a.txt".to_string(),
            String::new(),
        ];
        assert_eq!(join_parameters(&args), r#"/open "C:\My Files\a.txt" """#);
    }

    #[test]
    fn empty_command_is_rejected() {
        let err = SystemElevation::new().run_elevated(&[]).unwrap_err();
        assert!(matches!(err, LaunchError::Other { .. }));
    }
}
