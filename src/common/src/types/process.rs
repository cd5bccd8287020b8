use super::null_as_default;
use serde::{Deserialize, Serialize};

/// A single process as seen in a snapshot.
///
/// The `pid` is informational only: operating systems reuse PIDs, so identity is
/// carried by [`ProcessRecord::uid`] instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub pid: u32,
    #[serde(rename = "exe", default, deserialize_with = "null_as_default")]
    pub exe_path: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cmdline: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub create_time: f64,
}

impl ProcessRecord {
    /// Identity key distinguishing process instances across snapshots:
    /// executable, joined command line and whole-second creation time.
    pub fn uid(&self) -> String {
        format!(
            "{}|{}|{}",
            self.exe_path,
            self.command_line(),
            self.create_time as i64
        )
    }

    /// The command line joined with single spaces, for display and identity.
    pub fn command_line(&self) -> String {
        self.cmdline.join(" ")
    }

    /// True when `other` runs the same executable with the same arguments,
    /// regardless of when either was started.
    pub fn same_invocation(&self, other: &ProcessRecord) -> bool {
        self.exe_path == other.exe_path && self.cmdline == other.cmdline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notepad(file: &str, create_time: f64) -> ProcessRecord {
        ProcessRecord {
            name: "notepad.exe".into(),
            pid: 42,
            exe_path: r"C:\Windows\notepad.exe".into(),
            cmdline: vec!["notepad.exe".into(), file.into()],
            create_time,
        }
    }

    #[test]
    fn uid_ignores_pid_and_fractional_seconds() {
        let a = notepad("a.txt", 1000.25);
        let mut b = notepad("a.txt", 1000.75);
        b.pid = 7;

        assert_eq!(a.uid(), r"C:\Windows\notepad.exe|notepad.exe a.txt|1000");
        assert_eq!(a.uid(), b.uid());
    }

    #[test]
    fn uid_distinguishes_invocations_and_launch_times() {
        assert_ne!(notepad("a.txt", 1000.0).uid(), notepad("b.txt", 1000.0).uid());
        assert_ne!(notepad("a.txt", 1000.0).uid(), notepad("a.txt", 2000.0).uid());
    }

    #[test]
    fn same_invocation_ignores_create_time() {
        assert!(notepad("a.txt", 1.0).same_invocation(&notepad("a.txt", 99.0)));
        assert!(!notepad("a.txt", 1.0).same_invocation(&notepad("b.txt", 1.0)));
    }

    #[test]
    fn null_fields_load_as_empty() {
        let json = r#"{"name": "Registry", "pid": 120, "exe": null, "cmdline": null, "create_time": 1700000000.5}"#;
        let record: ProcessRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.name, "Registry");
        assert_eq!(record.exe_path, "");
        assert!(record.cmdline.is_empty());
        assert_eq!(record.uid(), "||1700000000");
    }
}
