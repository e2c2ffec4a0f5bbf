//! Machine-code emission backend for the TriCore target.
//!
//! Takes finalised instructions whose operands may still be symbolic,
//! decides how each symbolic operand is encoded (the fixup kind), resolves
//! values once layout is known, and bit-packs them into little-endian
//! 4-byte instruction words, deferring to ELF relocation records whenever
//! a value can only be known at link time.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

pub mod asm_backend;
pub mod elf_writer;
pub mod emit;
pub mod error;
pub mod expr;
pub mod fragment;
pub mod lowering;
pub mod registry;

pub use asm_backend::TriCoreAsmBackend;
pub use elf_writer::ElfTargetWriter;
pub use elf_writer::TargetOs;

/// Installs the default tracing subscriber, filtered by `RUST_LOG`.
/// Intended for the enclosing toolchain driver; call at most once.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();
}
