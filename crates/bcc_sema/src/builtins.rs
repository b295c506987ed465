//! The seed table of runtime-library names pre-installed in global scope so
//! they resolve without a source declaration.

pub const BUILTIN_NAMES: &[&str] = &[
    "print", "putchar", "getchar", "printf", "open", "close", "read", "write", "fork", "wait",
    "execl", "execv", "stat", "fstat", "chmod", "chown", "link", "unlink", "time", "ctime",
    "getuid", "setuid", "makdir", "intr", "chdir", "char", "lchar", "getchr", "putchr", "getstr",
    "putstr", "flush", "reread", "printn", "putnum", "exit", "abort", "free", "alloc", "system",
    "callf", "argc", "argv", "gtty", "stty", "usleep",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_has_no_duplicates() {
        let mut sorted = BUILTIN_NAMES.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), BUILTIN_NAMES.len());
    }

    #[test]
    fn builtin_table_matches_spec_count() {
        assert_eq!(BUILTIN_NAMES.len(), 46);
    }
}
