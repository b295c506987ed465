//! Three-step C identifier mangling.
//!
//! 1. Encode every byte that isn't valid in a C identifier: `.` becomes
//!    `_`, anything else becomes `_XX` (uppercase hex), and a name that
//!    would otherwise start with a digit gets a leading `_`.
//! 2. If the result collides with a C keyword or a runtime/library name,
//!    prepend `b_`.
//! 3. If the result is still already taken (by an earlier mangled name),
//!    append a numeric suffix until it's unique.
//!
//! The map in step 3 is owned by the [`Mangler`] and is naturally cleared
//! by starting a new one per compilation unit — no global to reset.

use rustc_hash::{FxHashMap, FxHashSet};

const C_KEYWORDS: &[&str] = &[
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
    "enum", "extern", "float", "for", "goto", "if", "inline", "int", "long", "register",
    "restrict", "return", "short", "signed", "sizeof", "static", "struct", "switch", "typedef",
    "union", "unsigned", "void", "volatile", "while", "_Bool", "_Complex", "_Imaginary",
];

/// Runtime-library and emitted-scaffolding names a mangled user identifier
/// must never shadow.
const RUNTIME_NAMES: &[&str] = &[
    "word", "uword", "main", "sx64", "WVAL", "WORD_MASK", "WORD_BITS", "B_BYTEPTR", "B_PTR",
    "B_CPTR", "B_ADDR", "B_DEREF", "B_INDEX", "B_STR", "WADD", "WSUB", "WMUL", "WDIV", "WMOD",
    "WSHL", "WSHR", "WAND", "WOR", "WXOR", "WNEG", "__b_user_main", "__b_init", "__b_setargs",
    "__b_cstr", "__b_dup_bstr", "__b_bstr_to_cstr", "__b_pack_cstr", "__b_argvb",
    "b_rd_fd", "b_wr_fd", "b_rd_unit", "b_wr_unit",
    "b_rel_eq_assign", "b_rel_ne_assign", "b_rel_lt_assign", "b_rel_le_assign",
    "b_rel_gt_assign", "b_rel_ge_assign",
];

pub struct Mangler {
    used: FxHashSet<String>,
    resolved: FxHashMap<u32, String>,
}

impl Mangler {
    pub fn new() -> Self {
        let mut used = FxHashSet::default();
        for kw in C_KEYWORDS {
            used.insert((*kw).to_string());
        }
        for name in RUNTIME_NAMES {
            used.insert((*name).to_string());
        }
        for name in bcc_sema::builtins::BUILTIN_NAMES {
            used.insert(format!("b_{name}"));
        }
        Mangler {
            used,
            resolved: FxHashMap::default(),
        }
    }

    /// Mangles `raw` into a unique C identifier, keyed by an opaque id
    /// (a `Symbol`'s index) so repeated calls for the same source name
    /// return the same mangled spelling.
    pub fn mangle(&mut self, id: u32, raw: &str) -> String {
        if let Some(existing) = self.resolved.get(&id) {
            return existing.clone();
        }

        let encoded = encode_invalid_chars(raw);
        let mut candidate = if self.collides_with_runtime(&encoded) {
            format!("b_{encoded}")
        } else {
            encoded
        };

        if self.used.contains(&candidate) {
            let base = candidate.clone();
            let mut n = 2u32;
            loop {
                candidate = format!("{base}_{n}");
                if !self.used.contains(&candidate) {
                    break;
                }
                n += 1;
            }
        }

        self.used.insert(candidate.clone());
        self.resolved.insert(id, candidate.clone());
        candidate
    }

    /// Forces `id` to resolve to exactly `name`, bypassing the usual
    /// encode/collision steps — used for `main`, which the emitter renames
    /// to a fixed spelling rather than running through the general mangler.
    pub fn force(&mut self, id: u32, name: &str) {
        self.used.insert(name.to_string());
        self.resolved.insert(id, name.to_string());
    }

    fn collides_with_runtime(&self, encoded: &str) -> bool {
        C_KEYWORDS.contains(&encoded) || RUNTIME_NAMES.contains(&encoded)
    }
}

fn encode_invalid_chars(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for (i, b) in raw.bytes().enumerate() {
        let valid = b == b'_' || b.is_ascii_alphanumeric();
        if b == b'.' {
            out.push('_');
        } else if valid {
            if i == 0 && b.is_ascii_digit() {
                out.push('_');
            }
            out.push(b as char);
        } else {
            out.push_str(&format!("_{:02X}", b));
        }
    }
    if out.is_empty() {
        out.push('_');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_identifier_passes_through() {
        let mut m = Mangler::new();
        assert_eq!(m.mangle(1, "counter"), "counter");
    }

    #[test]
    fn dot_becomes_underscore() {
        let mut m = Mangler::new();
        assert_eq!(m.mangle(1, "mod.init"), "mod_init");
    }

    #[test]
    fn invalid_byte_is_hex_encoded() {
        let mut m = Mangler::new();
        assert_eq!(m.mangle(1, "a$b"), "a_24b");
    }

    #[test]
    fn keyword_gets_b_prefix() {
        let mut m = Mangler::new();
        assert_eq!(m.mangle(1, "for"), "b_for");
    }

    #[test]
    fn runtime_collision_gets_b_prefix() {
        let mut m = Mangler::new();
        assert_eq!(m.mangle(1, "word"), "b_word");
    }

    #[test]
    fn name_colliding_with_a_builtins_call_target_is_suffixed() {
        let mut m = Mangler::new();
        // "b_alloc" is pre-claimed because the builtin call `alloc(...)`
        // always lowers to `b_alloc(...)`, independent of any mangling.
        assert_eq!(m.mangle(1, "b_alloc"), "b_alloc_2");
    }

    #[test]
    fn same_id_is_stable_across_calls() {
        let mut m = Mangler::new();
        let a = m.mangle(7, "x");
        let b = m.mangle(7, "x");
        assert_eq!(a, b);
    }

    #[test]
    fn leading_digit_gets_underscore_prefix() {
        let mut m = Mangler::new();
        assert_eq!(m.mangle(1, "2fast"), "_2fast");
    }
}
