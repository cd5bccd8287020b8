use crate::config::Config;

impl Default for Config {
    fn default() -> Self {
        Self {
            delay_ms: 0,
            fallback_exe: true,
            once_only: false,
            skip_cmdline: false,
            include: Vec::new(),
            exclude: Vec::new(),
            log_file: None,
        }
    }
}
