use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};

use crate::source::Program;

/// `0x` followed by eight uppercase hex digits.
pub fn hex_word(word: u32) -> String {
    format!("0x{word:08X}")
}

/// One hex word per line, each newline-terminated.
pub fn render_hex<I: IntoIterator<Item = u32>>(words: I) -> String {
    let mut out = String::new();
    for w in words {
        let _ = writeln!(out, "{}", hex_word(w));
    }
    out
}

/// Source text next to its encoding, one instruction per line.
pub fn render_listing(program: &Program) -> String {
    let mut out = String::new();
    for a in &program.items {
        let _ = writeln!(out, "{:<40} -> {}", a.source, hex_word(a.word));
    }
    out
}

pub fn render_json(program: &Program) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&program.items)
}

pub fn write_hex(path: &Path, program: &Program) -> Result<()> {
    std::fs::write(path, render_hex(program.words()))
        .with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Assembled;

    fn sample() -> Program {
        Program {
            items: vec![
                Assembled { line: 1, source: "ADD R1, R2, R3".into(), word: 0x0048_C000 },
                Assembled { line: 2, source: "MOV R0, #10".into(), word: 0x4C00_000A },
            ],
        }
    }

    #[test]
    fn hex_is_padded_uppercase() {
        assert_eq!(hex_word(0), "0x00000000");
        assert_eq!(hex_word(0x2C4B_FFFF), "0x2C4BFFFF");
        assert_eq!(render_hex([1, 0xABCDEF]), "0x00000001\n0x00ABCDEF\n");
        assert_eq!(render_hex(Vec::new()), "");
    }

    #[test]
    fn listing_columns() {
        let text = render_listing(&sample());
        let first = text.lines().next().unwrap();
        assert_eq!(first, format!("{:<40} -> 0x0048C000", "ADD R1, R2, R3"));
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn json_listing() {
        let v: serde_json::Value = serde_json::from_str(&render_json(&sample()).unwrap()).unwrap();
        assert_eq!(v[1]["line"], 2);
        assert_eq!(v[1]["word"], 0x4C00_000A);
        assert_eq!(v[0]["source"], "ADD R1, R2, R3");
    }

    #[test]
    fn write_hex_file() {
        let path = std::env::temp_dir().join("_cpu32_asm_out.hex");
        write_hex(&path, &sample()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "0x0048C000\n0x4C00000A\n");
        let _ = std::fs::remove_file(&path);
    }
}
