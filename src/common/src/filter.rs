use crate::constants::DEFAULT_EXCLUDES;
use crate::types::Delta;
use glob::Pattern;
use tracing::warn;

#[derive(Debug, Clone)]
enum NamePattern {
    Glob(Pattern),
    /// Kept verbatim when the text is not a valid glob (e.g. an unclosed `[`).
    Literal(String),
}

impl NamePattern {
    fn new(text: &str) -> Self {
        match Pattern::new(text) {
            Ok(pattern) => NamePattern::Glob(pattern),
            Err(e) => {
                warn!("Pattern {:?} is not a valid glob ({}), matching it literally", text, e);
                NamePattern::Literal(text.to_string())
            }
        }
    }

    fn matches(&self, name: &str) -> bool {
        match self {
            NamePattern::Glob(pattern) => pattern.matches(name),
            NamePattern::Literal(text) => text == name,
        }
    }
}

/// Include/exclude rules applied to process and service names.
///
/// The critical-process list in [`DEFAULT_EXCLUDES`] is always merged into the
/// exclude side, so those names can never be selected, not even by an explicit
/// include pattern.
#[derive(Debug, Clone)]
pub struct NameFilter {
    include: Vec<NamePattern>,
    exclude: Vec<NamePattern>,
}

impl NameFilter {
    pub fn new<S: AsRef<str>>(include: &[S], exclude: &[S]) -> Self {
        let include = include.iter().map(|p| NamePattern::new(p.as_ref())).collect();
        let exclude = exclude
            .iter()
            .map(|p| p.as_ref())
            .chain(DEFAULT_EXCLUDES)
            .map(NamePattern::new)
            .collect();

        Self { include, exclude }
    }

    pub fn passes(&self, name: &str) -> bool {
        if !self.include.is_empty() && !self.include.iter().any(|p| p.matches(name)) {
            return false;
        }
        !self.exclude.iter().any(|p| p.matches(name))
    }

    /// Returns a filtered working copy of `delta`: processes are matched on their
    /// name, services on their service name.
    pub fn apply_to_delta(&self, delta: &Delta) -> Delta {
        Delta {
            processes_terminated: delta
                .processes_terminated
                .iter()
                .filter(|proc| self.passes(&proc.name))
                .cloned()
                .collect(),
            processes_started: delta
                .processes_started
                .iter()
                .filter(|proc| self.passes(&proc.name))
                .cloned()
                .collect(),
            services: delta
                .services
                .iter()
                .filter(|svc| self.passes(&svc.service_name))
                .cloned()
                .collect(),
        }
    }
}

impl Default for NameFilter {
    fn default() -> Self {
        Self::new::<&str>(&[], &[])
    }
}

/// One-shot form of [`NameFilter::passes`].
pub fn passes<S: AsRef<str>>(name: &str, include: &[S], exclude: &[S]) -> bool {
    NameFilter::new(include, exclude).passes(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ProcessRecord, ServiceDelta, ServiceStatus};
    use rstest::rstest;

    const NONE: &[&str] = &[];

    #[rstest]
    #[case("notepad.exe", NONE, NONE, true)]
    #[case("notepad.exe", &["note*"], NONE, true)]
    #[case("chrome.exe", &["note*"], NONE, false)]
    #[case("notepad.exe", NONE, &["*.exe"], false)]
    #[case("notepad.exe", &["note*"], &["notepad.?xe"], false)]
    #[case("ExpressVPN Service", &["ExpressVPN*"], NONE, true)]
    #[case("expressvpn service", &["ExpressVPN*"], NONE, false)]
    #[case("code.exe", &["[bc]ode.exe"], NONE, true)]
    fn include_then_exclude(
        #[case] name: &str,
        #[case] include: &[&str],
        #[case] exclude: &[&str],
        #[case] expected: bool,
    ) {
        assert_eq!(passes(name, include, exclude), expected);
    }

    #[rstest]
    #[case("svchost.exe")]
    #[case("System")]
    #[case("System Idle Process")]
    #[case("lsass.exe")]
    fn default_excludes_beat_includes(#[case] name: &str) {
        assert!(!passes(name, &["*"], NONE));
        assert!(!passes(name, &[name], NONE));
        assert!(!NameFilter::default().passes(name));
    }

    #[test]
    fn default_excludes_are_exact_names() {
        assert!(passes("System32Helper.exe", NONE, NONE));
        assert!(passes("svchost.exe.bak", NONE, NONE));
    }

    #[test]
    fn invalid_glob_matches_literally() {
        let filter = NameFilter::new(&["[oops"], NONE);
        assert!(filter.passes("[oops"));
        assert!(!filter.passes("oops"));
    }

    #[test]
    fn apply_to_delta_leaves_input_untouched() {
        let proc = |name: &str| ProcessRecord {
            name: name.into(),
            pid: 1,
            exe_path: format!(r"C:\{}", name),
            cmdline: vec![name.into()],
            create_time: 1.0,
        };
        let delta = Delta {
            processes_terminated: vec![proc("svchost.exe"), proc("slack.exe")],
            processes_started: vec![proc("teams.exe")],
            services: vec![ServiceDelta {
                service_name: "Spooler".into(),
                display_name: "Print Spooler".into(),
                status_before: ServiceStatus::Running,
                status_after: ServiceStatus::Stopped,
            }],
        };

        let filtered = NameFilter::new(&["s*"], NONE).apply_to_delta(&delta);

        assert_eq!(filtered.processes_terminated, vec![proc("slack.exe")]);
        assert!(filtered.processes_started.is_empty());
        assert!(filtered.services.is_empty());
        assert_eq!(delta.processes_terminated.len(), 2);
        assert_eq!(delta.services.len(), 1);
    }
}
