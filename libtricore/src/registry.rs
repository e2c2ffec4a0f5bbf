//! Process-wide target registration.
//!
//! Registration happens exactly once, explicitly, during process startup;
//! after that the table is immutable and lock-free to read. The table is
//! keyed by target name so a driver can find the backend for a triple it
//! parsed elsewhere.

use crate::asm_backend::TriCoreAsmBackend;
use crate::elf_writer::TargetOs;
use crate::elf_writer::osabi_for_os;
use crate::error::AlreadyInitialised;
use std::sync::OnceLock;

/// Static facts about a registered target.
#[derive(Debug, Clone, Copy)]
pub struct TargetInfo {
    pub name: &'static str,
    /// Preprocessor symbol the frontend defines when compiling for this
    /// target. Name only, no value.
    pub frontend_define: &'static str,
}

const TRICORE_TARGET: TargetInfo = TargetInfo {
    name: "tricore",
    frontend_define: "__tricore__",
};

static REGISTERED_TARGETS: OnceLock<&'static [TargetInfo]> = OnceLock::new();

/// Registers all targets this backend library provides. Call once at
/// startup, before any lookup.
pub fn register_targets() -> Result<(), AlreadyInitialised> {
    REGISTERED_TARGETS
        .set(&[TRICORE_TARGET])
        .map_err(|_| AlreadyInitialised)
}

/// Looks up a registered target by name. Returns `None` when the name is
/// unknown or registration has not run.
#[must_use]
pub fn target_by_name(name: &str) -> Option<&'static TargetInfo> {
    REGISTERED_TARGETS
        .get()?
        .iter()
        .find(|target| target.name == name)
}

/// Creates the assembler backend for the given OS, the factory a driver
/// reaches after a successful lookup.
#[must_use]
pub fn create_asm_backend(os: TargetOs) -> TriCoreAsmBackend {
    TriCoreAsmBackend::new(osabi_for_os(os))
}
