use console::Emoji;
use dialoguer::console::Style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;
use psdelta_executor::Confirmer;
use std::sync::LazyLock;

/// Every prompt announces a process or service about to be changed, so the
/// prefix marks it as a pending change and the answer is echoed in colour.
static CONFIRM_THEME: LazyLock<ColorfulTheme> = LazyLock::new(|| ColorfulTheme {
    prompt_prefix: Style::new()
        .yellow()
        .bold()
        .apply_to(Emoji("⚠ ", "! ").to_string()),
    prompt_style: Style::new().bold(),
    prompt_suffix: Style::new().dim().apply_to("?".to_string()),
    success_prefix: Style::new()
        .green()
        .apply_to(Emoji("✔ ", "+ ").to_string()),
    error_prefix: Style::new().red().apply_to(Emoji("✘ ", "x ").to_string()),
    defaults_style: Style::new().dim(),
    values_style: Style::new().cyan(),
    ..ColorfulTheme::default()
});

/// Interactive yes/no prompt on the terminal. Anything but an explicit yes,
/// including a closed stdin, counts as no.
#[derive(Debug, Default, Clone, Copy)]
pub struct DialoguerConfirmer;

impl Confirmer for DialoguerConfirmer {
    fn confirm(&self, prompt: &str) -> bool {
        Confirm::with_theme(&*CONFIRM_THEME)
            .with_prompt(prompt.trim_end_matches('?'))
            .default(false)
            .show_default(true)
            .interact()
            .unwrap_or(false)
    }
}
