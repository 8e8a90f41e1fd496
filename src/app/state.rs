//! Application state types: focus, dialogs and text forms

use crate::commands::immutable;
use crate::commands::CommandInvocation;
use crate::constants::{COMMON_EXEC_COMMANDS, MAX_INPUT_LENGTH};
use crate::i18n::{Language, Text};
use crate::panels::Action;

/// Where keyboard input goes when no dialog is open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Nav,
    Panel,
}

/// Modal popups drawn above the panels
#[derive(Debug, Clone)]
pub enum Dialog {
    /// Yes/No before running a command; No is preselected
    Confirm {
        message: String,
        invocation: CommandInvocation,
        yes_selected: bool,
    },
    Form(FormState),
    /// Informational message with a single close key
    Notice(String),
    ExitConfirm,
}

impl Dialog {
    pub fn confirm(message: String, invocation: CommandInvocation) -> Self {
        Dialog::Confirm {
            message,
            invocation,
            yes_selected: false,
        }
    }
}

/// What a form submits to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormKind {
    CreateSnapshot,
    ModifySnapshot { id: String },
    Exec,
    FileOp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub label: Text,
    pub value: String,
}

impl FormField {
    fn new(label: Text) -> Self {
        Self {
            label,
            value: String::new(),
        }
    }
}

/// Multi-field text input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub kind: FormKind,
    pub fields: Vec<FormField>,
    pub active: usize,
    /// Selected preset for the exec form
    pub preset: Option<usize>,
    pub error: Option<String>,
}

impl FormState {
    fn with_fields(kind: FormKind, labels: &[Text]) -> Self {
        Self {
            kind,
            fields: labels.iter().copied().map(FormField::new).collect(),
            active: 0,
            preset: None,
            error: None,
        }
    }

    pub fn create_snapshot() -> Self {
        Self::with_fields(
            FormKind::CreateSnapshot,
            &[Text::FieldName, Text::FieldDescription],
        )
    }

    pub fn modify_snapshot(id: impl Into<String>) -> Self {
        Self::with_fields(
            FormKind::ModifySnapshot { id: id.into() },
            &[Text::FieldNewName, Text::FieldNewDescription],
        )
    }

    pub fn exec() -> Self {
        Self::with_fields(FormKind::Exec, &[Text::FieldCommand])
    }

    pub fn file_op() -> Self {
        Self::with_fields(FormKind::FileOp, &[Text::FieldOperation])
    }

    pub fn title(&self) -> Text {
        match self.kind {
            FormKind::CreateSnapshot => Text::FormCreateSnapshot,
            FormKind::ModifySnapshot { .. } => Text::FormModifySnapshot,
            FormKind::Exec => Text::FormExec,
            FormKind::FileOp => Text::FormFileOp,
        }
    }

    pub fn has_presets(&self) -> bool {
        self.kind == FormKind::Exec
    }

    pub fn insert_char(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.active) {
            if field.value.len() < MAX_INPUT_LENGTH {
                field.value.push(c);
                self.error = None;
            }
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.active) {
            field.value.pop();
        }
    }

    pub fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.active = (self.active + 1) % self.fields.len();
        }
    }

    pub fn prev_field(&mut self) {
        if !self.fields.is_empty() {
            self.active = (self.active + self.fields.len() - 1) % self.fields.len();
        }
    }

    /// Step through the common commands, replacing the command field
    pub fn cycle_preset(&mut self, forward: bool) {
        if !self.has_presets() || COMMON_EXEC_COMMANDS.is_empty() {
            return;
        }
        let count = COMMON_EXEC_COMMANDS.len();
        let next = match (self.preset, forward) {
            (None, true) => 0,
            (None, false) => count - 1,
            (Some(i), true) => (i + 1) % count,
            (Some(i), false) => (i + count - 1) % count,
        };
        self.preset = Some(next);
        if let Some(field) = self.fields.first_mut() {
            field.value = COMMON_EXEC_COMMANDS[next].1.to_string();
        }
        self.error = None;
    }

    fn value(&self, index: usize) -> &str {
        self.fields.get(index).map(|f| f.value.trim()).unwrap_or("")
    }

    /// Turn the form into the next step, or an error to show in the form
    pub fn submit(&self, lang: Language) -> Result<Action, String> {
        match &self.kind {
            FormKind::CreateSnapshot => {
                let name = self.value(0);
                let invocation = immutable::snapshot_create(name, self.value(1));
                Ok(Action::Confirm {
                    message: lang.fmt(Text::ConfirmCreateSnapshot, name),
                    invocation,
                })
            }
            FormKind::ModifySnapshot { id } => {
                match immutable::snapshot_modify(id, self.value(0), self.value(1)) {
                    Some(invocation) => Ok(Action::Confirm {
                        message: lang.fmt(Text::ConfirmModifySnapshot, id),
                        invocation,
                    }),
                    None => Ok(Action::Notice(lang.tr(Text::FormNoChanges).to_string())),
                }
            }
            FormKind::Exec => {
                let command = self.value(0);
                if command.is_empty() {
                    return Err(lang.tr(Text::FormEmptyInput).to_string());
                }
                Ok(Action::Confirm {
                    message: lang.fmt(Text::ConfirmExec, command),
                    invocation: immutable::admin_exec(command),
                })
            }
            FormKind::FileOp => {
                let operation = self.value(0);
                if operation.is_empty() {
                    return Err(lang.tr(Text::FormEmptyInput).to_string());
                }
                Ok(Action::Confirm {
                    message: format!(
                        "{}\n\n{}",
                        lang.fmt(Text::ConfirmFileOp, operation),
                        lang.tr(Text::RequiresRoot)
                    ),
                    invocation: immutable::file_op(operation),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_text(form: &mut FormState, text: &str) {
        for c in text.chars() {
            form.insert_char(c);
        }
    }

    #[test]
    fn test_confirm_defaults_to_no() {
        let dialog = Dialog::confirm("sure?".into(), immutable::rollback());
        assert!(matches!(dialog, Dialog::Confirm { yes_selected: false, .. }));
    }

    #[test]
    fn test_field_navigation_wraps() {
        let mut form = FormState::create_snapshot();
        form.next_field();
        assert_eq!(form.active, 1);
        form.next_field();
        assert_eq!(form.active, 0);
        form.prev_field();
        assert_eq!(form.active, 1);
    }

    #[test]
    fn test_input_length_is_capped() {
        let mut form = FormState::file_op();
        type_text(&mut form, &"x".repeat(MAX_INPUT_LENGTH + 10));
        assert_eq!(form.fields[0].value.len(), MAX_INPUT_LENGTH);
        form.backspace();
        assert_eq!(form.fields[0].value.len(), MAX_INPUT_LENGTH - 1);
    }

    #[test]
    fn test_create_snapshot_submit() {
        let mut form = FormState::create_snapshot();
        type_text(&mut form, "pre-upgrade");
        match form.submit(Language::English) {
            Ok(Action::Confirm { message, invocation }) => {
                assert_eq!(message, "Create snapshot 'pre-upgrade'?");
                assert!(invocation.command.ends_with(r#"--name="pre-upgrade""#));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_modify_without_changes_is_a_notice() {
        let form = FormState::modify_snapshot("4");
        assert_eq!(
            form.submit(Language::English),
            Ok(Action::Notice("No changes were specified for the snapshot.".into()))
        );
    }

    #[test]
    fn test_exec_requires_a_command() {
        let form = FormState::exec();
        assert!(form.submit(Language::English).is_err());
    }

    #[test]
    fn test_exec_presets_fill_command() {
        let mut form = FormState::exec();
        form.cycle_preset(true);
        assert_eq!(form.fields[0].value, "apt update");
        form.cycle_preset(false);
        assert_eq!(form.fields[0].value, "apt clean");

        match form.submit(Language::English) {
            Ok(Action::Confirm { invocation, .. }) => {
                assert_eq!(
                    invocation.command,
                    r#"deepin-immutable-ctl admin exec -- bash -c "apt clean""#
                );
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_presets_only_on_exec_form() {
        let mut form = FormState::file_op();
        form.cycle_preset(true);
        assert!(form.fields[0].value.is_empty());
    }
}
