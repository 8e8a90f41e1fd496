//! User-facing strings in the supported languages

use serde::{Deserialize, Serialize};

/// Interface language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum Language {
    #[default]
    #[serde(rename = "es")]
    #[value(name = "es")]
    Spanish,
    #[serde(rename = "en")]
    #[value(name = "en")]
    English,
}

/// Keys for every translated string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Text {
    // Navigation
    PanelStatus,
    PanelAdmin,
    PanelSnapshots,
    PanelAbout,

    // Console
    ConsoleTitle,
    ConsoleRunning,
    OutcomeSuccess,
    OutcomeCancelled,
    OutcomeFailed,
    OutcomePermissionDenied,
    PermissionHint,
    RebootRequired,
    RebootStarting,
    LaunchError,
    QueryError,

    // Status panel
    StatusGroup,
    StatusLoading,
    StatusImmutable,
    StatusBootedImmutable,
    StatusNotBootedWritable,
    StatusWritable,
    ParamsGroup,
    ParamWhitelist,
    ParamClearAfterReboot,
    ParamCleanData,
    ParamOverlayDirs,
    ParamOverlayAllDirs,
    Yes,
    No,
    ActionDisableImmutable,
    ActionEnableImmutable,
    ActionRefresh,
    StatusInfo,

    // Admin panel
    AdminDeploy,
    AdminFinalize,
    AdminRollback,
    AdminExec,
    AdminFileOp,
    DeployOptions,
    DeployOptBackup,
    DeployOptRefresh,
    DeployOptAppend,

    // Snapshots panel
    SnapshotsGroup,
    SnapshotsEmpty,
    SnapCreate,
    SnapShow,
    SnapModify,
    SnapDelete,
    SnapRevert,
    SnapRevertInfo,

    // Confirmations
    ConfirmTitle,
    ConfirmDisableImmutable,
    ConfirmEnableImmutable,
    ConfirmDeploy,
    ConfirmFinalize,
    ConfirmRollback,
    ConfirmExec,
    ConfirmFileOp,
    ConfirmCreateSnapshot,
    ConfirmModifySnapshot,
    ConfirmDeleteSnapshot,
    ConfirmRevertSnapshot,
    RequiresRoot,

    // Forms
    FormCreateSnapshot,
    FormModifySnapshot,
    FormExec,
    FormFileOp,
    FieldName,
    FieldDescription,
    FieldNewName,
    FieldNewDescription,
    FieldCommand,
    FieldOperation,
    FormNoChanges,
    FormEmptyInput,
    FormPresets,

    // About panel
    AboutSubtitle,
    AboutVersion,
    AboutMaintainers,
    AboutCommunity,
    AboutRepository,

    // Key hints
    KeyNavigate,
    KeySelect,
    KeyPanels,
    KeyQuit,
    KeyTheme,
    KeyLanguage,
    KeyYes,
    KeyNo,
    KeyClose,
    KeyRebootNow,
    KeyRebootLater,
    KeyCancel,
    KeySubmit,
    KeyNextField,
    ExitConfirm,
}

impl Language {
    /// Translate a string key
    pub fn tr(self, text: Text) -> &'static str {
        match self {
            Language::Spanish => spanish(text),
            Language::English => english(text),
        }
    }

    /// Translate and substitute the first `{}` placeholder
    pub fn fmt(self, text: Text, arg: impl std::fmt::Display) -> String {
        self.tr(text).replacen("{}", &arg.to_string(), 1)
    }

    pub fn toggled(self) -> Self {
        match self {
            Language::Spanish => Language::English,
            Language::English => Language::Spanish,
        }
    }
}

fn spanish(text: Text) -> &'static str {
    use Text::*;
    match text {
        PanelStatus => "Estado",
        PanelAdmin => "Administración",
        PanelSnapshots => "Snapshots",
        PanelAbout => "Acerca de",

        ConsoleTitle => "Salida de Comandos",
        ConsoleRunning => "Ejecutando...",
        OutcomeSuccess => "✅ Comando ejecutado con éxito",
        OutcomeCancelled => "⛔ Comando cancelado por el usuario",
        OutcomeFailed => "❌ Comando terminado con código de error: {}",
        OutcomePermissionDenied => "🔒 Autorización fallida (código {})",
        PermissionHint => "Vuelva a intentarlo e introduzca su contraseña cuando se le solicite.",
        RebootRequired => "⚠️ Se requiere reinicio del sistema para aplicar los cambios",
        RebootStarting => "🔄 Iniciando reinicio del sistema...",
        LaunchError => "Error ejecutando comando: {}",
        QueryError => "No se pudo consultar: {}",

        StatusGroup => "Estado Actual del Sistema Inmutable",
        StatusLoading => "Cargando estado...",
        StatusImmutable => "✔ Sistema en modo inmutable",
        StatusBootedImmutable => " (Arrancado en modo inmutable)",
        StatusNotBootedWritable => " (Configurado pero no arrancado en modo escritura)",
        StatusWritable => "✖ El sistema NO está en modo inmutable (Modo Escritura Habilitado)",
        ParamsGroup => "Parámetros de Configuración",
        ParamWhitelist => "Lista Blanca",
        ParamClearAfterReboot => "Limpiar tras Reinicio",
        ParamCleanData => "Limpiar Datos",
        ParamOverlayDirs => "Directorios en Overlay",
        ParamOverlayAllDirs => "Overlay en Todos los Directorios",
        Yes => "Sí",
        No => "No",
        ActionDisableImmutable => "Desactivar Inmutabilidad",
        ActionEnableImmutable => "Activar Inmutabilidad",
        ActionRefresh => "Actualizar Estado",
        StatusInfo => "Al desactivar la inmutabilidad, /usr se vuelve escribible y permite modificar el sistema base. Al activarla, /usr vuelve a ser de solo lectura.",

        AdminDeploy => "Desplegar cambios",
        AdminFinalize => "Finalizar despliegue",
        AdminRollback => "Revertir sistema",
        AdminExec => "Ejecutar comando (admin exec)",
        AdminFileOp => "Operación de archivos",
        DeployOptions => "Opciones de despliegue",
        DeployOptBackup => "Crear backup del sistema actual (--backup)",
        DeployOptRefresh => "Refrescar capa de modificación (--refresh)",
        DeployOptAppend => "Añadir como nuevo despliegue (--append)",

        SnapshotsGroup => "Gestión de Snapshots",
        SnapshotsEmpty => "No hay snapshots",
        SnapCreate => "Crear",
        SnapShow => "Mostrar",
        SnapModify => "Modificar",
        SnapDelete => "Eliminar",
        SnapRevert => "Revertir",
        SnapRevertInfo => "Revertir a un snapshot restaura el sistema al momento de su creación. Los cambios posteriores se pierden y se requiere reinicio.",

        ConfirmTitle => "Confirmar",
        ConfirmDisableImmutable => "¿Desactivar el modo inmutable? /usr será escribible. Requiere reinicio.",
        ConfirmEnableImmutable => "¿Activar el modo inmutable de nuevo? /usr volverá a ser de solo lectura. Requiere reinicio.",
        ConfirmDeploy => "¿Ejecutar el despliegue?\n\nComando: {}",
        ConfirmFinalize => "¿Finalizar el despliegue? Se consolidan los cambios y no se podrá revertir. Requiere reinicio.",
        ConfirmRollback => "¿Revertir el sistema al estado anterior? Los cambios no consolidados se perderán. Requiere reinicio.",
        ConfirmExec => "¿Ejecutar el comando?\n\n{}",
        ConfirmFileOp => "¿Ejecutar la operación de archivos?\n\n{}",
        ConfirmCreateSnapshot => "¿Crear el snapshot '{}'?",
        ConfirmModifySnapshot => "¿Modificar el snapshot {}?",
        ConfirmDeleteSnapshot => "¿Eliminar el snapshot {}?",
        ConfirmRevertSnapshot => "¡ADVERTENCIA! Revertir a {} es irreversible y requiere reinicio.",
        RequiresRoot => "Esta acción requiere privilegios de root.",

        FormCreateSnapshot => "Crear Snapshot",
        FormModifySnapshot => "Modificar Snapshot",
        FormExec => "Ejecutar Comando (admin)",
        FormFileOp => "Operación de Archivos",
        FieldName => "Nombre (opcional)",
        FieldDescription => "Descripción (opcional)",
        FieldNewName => "Nuevo nombre (en blanco para no cambiar)",
        FieldNewDescription => "Nueva descripción (en blanco para no cambiar)",
        FieldCommand => "Comando",
        FieldOperation => "Operación",
        FormNoChanges => "No se especificaron cambios para el snapshot.",
        FormEmptyInput => "Por favor ingrese un valor válido",
        FormPresets => "Comandos comunes",

        AboutSubtitle => "Herramienta no oficial del equipo de deepin, desarrollada por la comunidad.",
        AboutVersion => "Versión: {}",
        AboutMaintainers => "Mantenedores",
        AboutCommunity => "Comunidad deepin en español",
        AboutRepository => "Repositorio",

        KeyNavigate => "Navegar",
        KeySelect => "Seleccionar",
        KeyPanels => "Paneles",
        KeyQuit => "Salir",
        KeyTheme => "Tema",
        KeyLanguage => "Idioma",
        KeyYes => "Sí",
        KeyNo => "No",
        KeyClose => "Cerrar",
        KeyRebootNow => "Reiniciar Ahora",
        KeyRebootLater => "Más Tarde",
        KeyCancel => "Cancelar",
        KeySubmit => "Aceptar",
        KeyNextField => "Siguiente campo",
        ExitConfirm => "¿Seguro que desea salir?",
    }
}

fn english(text: Text) -> &'static str {
    use Text::*;
    match text {
        PanelStatus => "Status",
        PanelAdmin => "Administration",
        PanelSnapshots => "Snapshots",
        PanelAbout => "About",

        ConsoleTitle => "Command Output",
        ConsoleRunning => "Running...",
        OutcomeSuccess => "✅ Command completed successfully",
        OutcomeCancelled => "⛔ Command cancelled by user",
        OutcomeFailed => "❌ Command finished with error code: {}",
        OutcomePermissionDenied => "🔒 Authorization failed (code {})",
        PermissionHint => "Try again and enter your password when prompted.",
        RebootRequired => "⚠️ A system reboot is required to apply the changes",
        RebootStarting => "🔄 Rebooting the system...",
        LaunchError => "Error running command: {}",
        QueryError => "Query failed: {}",

        StatusGroup => "Current Immutable System Status",
        StatusLoading => "Loading status...",
        StatusImmutable => "✔ System is in immutable mode",
        StatusBootedImmutable => " (Booted in immutable mode)",
        StatusNotBootedWritable => " (Configured but not booted in writable mode)",
        StatusWritable => "✖ System is NOT in immutable mode (Writable Mode Enabled)",
        ParamsGroup => "Configuration Parameters",
        ParamWhitelist => "Whitelist",
        ParamClearAfterReboot => "Clear After Reboot",
        ParamCleanData => "Clean Data",
        ParamOverlayDirs => "Overlay Directories",
        ParamOverlayAllDirs => "Overlay All Directories",
        Yes => "Yes",
        No => "No",
        ActionDisableImmutable => "Disable Immutability",
        ActionEnableImmutable => "Enable Immutability",
        ActionRefresh => "Refresh Status",
        StatusInfo => "Disabling immutability makes /usr writable so the base system can be modified. Enabling it makes /usr read-only again.",

        AdminDeploy => "Deploy changes",
        AdminFinalize => "Finalize deployment",
        AdminRollback => "Roll back system",
        AdminExec => "Run command (admin exec)",
        AdminFileOp => "File operation",
        DeployOptions => "Deploy options",
        DeployOptBackup => "Back up the current system (--backup)",
        DeployOptRefresh => "Refresh the modification layer (--refresh)",
        DeployOptAppend => "Append as a new deployment (--append)",

        SnapshotsGroup => "Snapshot Management",
        SnapshotsEmpty => "No snapshots",
        SnapCreate => "Create",
        SnapShow => "Show",
        SnapModify => "Modify",
        SnapDelete => "Delete",
        SnapRevert => "Revert",
        SnapRevertInfo => "Reverting to a snapshot restores the system to the moment it was taken. Later changes are lost and a reboot is required.",

        ConfirmTitle => "Confirm",
        ConfirmDisableImmutable => "Disable immutable mode? /usr will become writable. Requires a reboot.",
        ConfirmEnableImmutable => "Enable immutable mode again? /usr will be read-only. Requires a reboot.",
        ConfirmDeploy => "Run the deployment?\n\nCommand: {}",
        ConfirmFinalize => "Finalize the deployment? Changes are consolidated and cannot be reverted. Requires a reboot.",
        ConfirmRollback => "Roll the system back to the previous state? Unconsolidated changes are lost. Requires a reboot.",
        ConfirmExec => "Run the command?\n\n{}",
        ConfirmFileOp => "Run the file operation?\n\n{}",
        ConfirmCreateSnapshot => "Create snapshot '{}'?",
        ConfirmModifySnapshot => "Modify snapshot {}?",
        ConfirmDeleteSnapshot => "Delete snapshot {}?",
        ConfirmRevertSnapshot => "WARNING! Reverting to {} cannot be undone and requires a reboot.",
        RequiresRoot => "This action requires root privileges.",

        FormCreateSnapshot => "Create Snapshot",
        FormModifySnapshot => "Modify Snapshot",
        FormExec => "Run Command (admin)",
        FormFileOp => "File Operation",
        FieldName => "Name (optional)",
        FieldDescription => "Description (optional)",
        FieldNewName => "New name (blank to keep)",
        FieldNewDescription => "New description (blank to keep)",
        FieldCommand => "Command",
        FieldOperation => "Operation",
        FormNoChanges => "No changes were specified for the snapshot.",
        FormEmptyInput => "Please enter a valid value",
        FormPresets => "Common commands",

        AboutSubtitle => "Unofficial deepin tool, developed by the community.",
        AboutVersion => "Version: {}",
        AboutMaintainers => "Maintainers",
        AboutCommunity => "deepin community in Spanish",
        AboutRepository => "Repository",

        KeyNavigate => "Navigate",
        KeySelect => "Select",
        KeyPanels => "Panels",
        KeyQuit => "Quit",
        KeyTheme => "Theme",
        KeyLanguage => "Language",
        KeyYes => "Yes",
        KeyNo => "No",
        KeyClose => "Close",
        KeyRebootNow => "Reboot Now",
        KeyRebootLater => "Later",
        KeyCancel => "Cancel",
        KeySubmit => "Submit",
        KeyNextField => "Next field",
        ExitConfirm => "Are you sure you want to exit?",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_substitutes_placeholder() {
        assert_eq!(
            Language::English.fmt(Text::OutcomeFailed, 3),
            "❌ Command finished with error code: 3"
        );
        assert_eq!(
            Language::Spanish.fmt(Text::OutcomeFailed, 126),
            "❌ Comando terminado con código de error: 126"
        );
    }

    #[test]
    fn test_language_serde_codes() {
        assert_eq!(serde_json::to_string(&Language::Spanish).unwrap(), "\"es\"");
        let lang: Language = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(lang, Language::English);
    }

    #[test]
    fn test_toggle() {
        assert_eq!(Language::Spanish.toggled(), Language::English);
        assert_eq!(Language::English.toggled(), Language::Spanish);
    }
}
