//! The embedded C runtime prelude.
//!
//! Rather than emit a second translation unit that the driver has to
//! remember to compile and link, every generated program is
//! self-contained: [`prelude`] renders the word-model macros (parameterized
//! by the resolved [`CompileOptions`](crate::context::CompileOptions)) and
//! the runtime function bodies as one string, pushed onto the output ahead
//! of any user code — the same shape as the teacher's own embedded runtime
//! constant, just built from a contract (`libb.h`) instead of from scratch.

use crate::context::CompileOptions;

const RUNTIME_BODY: &str = include_str!("runtime_body.c");

/// Renders the full prelude: defines, word-model macros, ABI declarations
/// and implementations, ready to prepend to generated output.
pub(crate) fn prelude(options: &CompileOptions) -> String {
    format!(
        "#define B_BYTEPTR {}\n#define WORD_BITS {}\n\n{}\n",
        options.byteptr_define(),
        options.word_bits_define(),
        RUNTIME_BODY
    )
}
