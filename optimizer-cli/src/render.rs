//! Plain-text rendering of wizard state for the terminal.

use std::fmt::Write;

use optimizer_core::calculations::{format_currency, format_percent, tax_bracket};
use optimizer_core::wizard::{FieldKind, STEP_COUNT};
use optimizer_core::{Notification, NotificationLevel, ResultRecord, WizardState};

/// Renders the active step, or the summary when results are showing.
pub fn render_state(state: &WizardState) -> String {
    match &state.result {
        Some(result) if state.is_showing_results() => render_summary(result),
        _ => render_step(state),
    }
}

pub fn render_step(state: &WizardState) -> String {
    let mut out = String::new();
    let Some(step) = state.current_step() else {
        return out;
    };

    let _ = writeln!(out, "Step {} of {}", state.step + 1, STEP_COUNT);
    let _ = writeln!(out, "== {} ==", step.title);
    let _ = writeln!(out, "{}", step.description);

    if let Some(error) = &state.error {
        let _ = writeln!(out, "! {error}");
    }

    if step.accepts_upload {
        match (&state.uploaded_document, state.document_processed) {
            (Some(name), true) => {
                let _ = writeln!(out, "  Uploaded: {name} (processed)");
            }
            (Some(name), false) => {
                let _ = writeln!(out, "  Uploaded: {name}");
            }
            (None, _) => {
                let _ = writeln!(out, "  No document uploaded. Use `upload <path>` or `next` to skip.");
            }
        }
    }

    for field in step.fields {
        let marker = if field.required { "*" } else { " " };
        let value = state.input.display_value(field.name);
        let _ = writeln!(out, " {marker} {:<32} {:<24} [{}]", field.label, field.name.as_str(), value);

        if field.kind == FieldKind::Select {
            let choices: Vec<String> = field
                .options
                .iter()
                .map(|option| format!("{} = {}", option.value, option.label))
                .collect();
            let _ = writeln!(out, "      options: {}", choices.join(", "));
        }
    }

    if state.busy {
        let _ = writeln!(out, "  Working...");
    } else {
        let forward = if state.is_last_input_step() { "submit" } else { "next" };
        let moves = if state.can_go_back() {
            format!("back | {forward}")
        } else {
            forward.to_string()
        };
        let _ = writeln!(out, "  ({moves})");
    }

    out
}

pub fn render_summary(result: &ResultRecord) -> String {
    let mut out = String::new();

    let bracket = tax_bracket(result.estimated_tax)
        .map(|label| label.to_string())
        .unwrap_or_else(|_| "n/a".to_string());

    let _ = writeln!(out, "== Your Tax Summary ==");
    let _ = writeln!(out, "Estimated Tax:     {}", format_currency(result.estimated_tax));
    let _ = writeln!(out, "  Tax Bracket: {bracket}");
    let _ = writeln!(out, "Potential Savings: {}", format_currency(result.potential_savings));
    let _ = writeln!(out, "  Optimized Deductions");
    let _ = writeln!(out, "Local Tax Rate:    {}", format_percent(result.local_tax_rate));
    let _ = writeln!(out, "  Based on your ZIP code");

    if let Some(insights) = &result.insights {
        let _ = writeln!(out);
        let _ = writeln!(out, "AI Tax Insights");
        let _ = writeln!(out, "  {insights}");
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Recommendations");
    for recommendation in &result.recommendations {
        let _ = writeln!(out, "  - {recommendation}");
    }

    out
}

pub fn render_notification(notification: &Notification) -> String {
    match notification.level {
        NotificationLevel::Success => format!("[ok] {}", notification.message),
        NotificationLevel::Error => format!("[error] {}", notification.message),
    }
}
