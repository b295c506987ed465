//! String literal interning.
//!
//! Every distinct string literal in a compilation unit is emitted exactly
//! once, as a byte-packed C array terminated by B's EOT sentinel (`\004`)
//! rather than C's NUL. A string expression never duplicates its bytes at
//! the use site — it lowers to `B_STR(__bstr<id>)`, a pointer (scaled per
//! the active pointer model) into the one array.
//!
//! `B_STR` does the actual word-granularity packing for free: a `word` is
//! `sizeof(word)` bytes wide, and `B_DEREF`/`B_INDEX` always read a whole
//! word at a time, so a plain `char[]` already *is* "byte 0 at the LSB of
//! word 0, extending into higher words" — there's no separate integer-word
//! array to build by hand. `b_char`/`b_lchar` in the runtime prelude do the
//! byte-within-word extraction.

use rustc_hash::FxHashMap;

use bcc_base::Symbol;

pub struct StringPool {
    order: Vec<Symbol>,
    ids: FxHashMap<Symbol, u32>,
}

impl StringPool {
    pub fn new() -> Self {
        StringPool {
            order: Vec::new(),
            ids: FxHashMap::default(),
        }
    }

    /// Interns `sym` (the already-interned text of a string literal) and
    /// returns its pool id, reusing the id from an earlier occurrence.
    pub fn intern(&mut self, sym: Symbol) -> u32 {
        if let Some(&id) = self.ids.get(&sym) {
            return id;
        }
        let id = self.order.len() as u32;
        self.order.push(sym);
        self.ids.insert(sym, id);
        id
    }

    pub fn c_name(id: u32) -> String {
        format!("__bstr{id}")
    }

    /// Emits one `static const char[]` per interned literal, in order of
    /// first use, each zero-and-EOT-terminated and padded to a whole number
    /// of words: `B_INDEX`/`B_DEREF` always read `sizeof(word)` bytes at a
    /// time, so an array sized to exactly the string's text would let a
    /// word-granularity read through a pointer into the last few bytes walk
    /// off the end. The bound is a `sizeof(word)`-based constant expression
    /// rather than a literal Rust-computed number, so it rounds up to
    /// whatever `sizeof(word)` the downstream compiler's target actually
    /// has, the same way the runtime prelude's own `B_INDEX` does.
    pub fn emit_decls(&self, interner: &bcc_base::Interner, out: &mut String) {
        use std::fmt::Write;
        for (id, sym) in self.order.iter().enumerate() {
            let text = interner.resolve(*sym);
            let content_len = text.len() + 2; // text bytes + EOT + implicit NUL
            writeln!(
                out,
                "static const char {}[(({content_len} + sizeof(word) - 1) / sizeof(word)) * sizeof(word)] = \"{}\\004\";",
                Self::c_name(id as u32),
                escape_c_string(text)
            )
            .unwrap();
        }
    }
}

fn escape_c_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'\\' => out.push_str("\\\\"),
            b'"' => out.push_str("\\\""),
            b'\n' => out.push_str("\\n"),
            b'\t' => out.push_str("\\t"),
            b'\r' => out.push_str("\\r"),
            0x20..=0x7e => out.push(b as char),
            _ => out.push_str(&format!("\\{:03o}", b)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use bcc_base::Interner;

    #[test]
    fn repeated_literal_reuses_the_same_id() {
        let mut interner = Interner::new();
        let hi = interner.intern("hi");
        let mut pool = StringPool::new();
        assert_eq!(pool.intern(hi), 0);
        assert_eq!(pool.intern(hi), 0);
    }

    #[test]
    fn distinct_literals_get_distinct_ids() {
        let mut interner = Interner::new();
        let a = interner.intern("a");
        let b = interner.intern("b");
        let mut pool = StringPool::new();
        assert_eq!(pool.intern(a), 0);
        assert_eq!(pool.intern(b), 1);
    }

    #[test]
    fn emitted_array_is_eot_terminated() {
        let mut interner = Interner::new();
        let hi = interner.intern("hi");
        let mut pool = StringPool::new();
        pool.intern(hi);
        let mut out = String::new();
        pool.emit_decls(&interner, &mut out);
        assert!(out.contains("\"hi\\004\";"));
    }

    #[test]
    fn emitted_array_length_is_a_sizeof_word_multiple() {
        let mut interner = Interner::new();
        let hi = interner.intern("hi");
        let mut pool = StringPool::new();
        pool.intern(hi);
        let mut out = String::new();
        pool.emit_decls(&interner, &mut out);
        // "hi" + EOT + NUL = 4 bytes; the bound must be a sizeof(word)-based
        // expression, not a bare literal array length.
        assert!(out.contains("__bstr0[((4 + sizeof(word) - 1) / sizeof(word)) * sizeof(word)]"));
    }
}
