use std::env;
use std::fs;
use std::path::{Path, PathBuf};

fn workspace_root(crate_dir: &Path) -> PathBuf {
    crate_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("crate directory should be <root>/crates/<name>")
        .to_path_buf()
}

fn take_until_paren_close(s: &str) -> Option<&str> {
    let s = s.trim();
    let j = s.find(')')?;
    Some(s[..j].trim())
}

fn parse_byte(s: &str) -> u8 {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16).expect("token value (hex)"),
        None => s.parse().expect("token value"),
    }
}

fn main() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let root = workspace_root(&manifest_dir);

    let tokens_path = root.join("kismet").join("expr-tokens.def");

    println!("cargo:rerun-if-changed={}", tokens_path.display());

    let tokens_src = fs::read_to_string(&tokens_path).expect("read expr-tokens.def");

    let mut tokens: Vec<(String, u8)> = Vec::new();

    for line in tokens_src.lines() {
        let l = line.trim();
        let rest = match l.strip_prefix("DEF(") {
            Some(v) => v,
            None => continue,
        };
        let inner = match take_until_paren_close(rest) {
            Some(v) => v,
            None => continue,
        };
        let parts: Vec<&str> = inner.split(',').map(|p| p.trim()).collect();
        if parts.len() != 2 {
            continue;
        }
        let id = parts[0].to_string();
        let value = parse_byte(parts[1]);
        if tokens.iter().any(|(other, v)| *other == id || *v == value) {
            panic!("duplicate expression token {id} (0x{value:02X})");
        }
        tokens.push((id, value));
    }

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let out_path = out_dir.join("kismet_tables.rs");

    let mut out = String::new();

    out.push_str("#[allow(non_camel_case_types)]\n");
    out.push_str("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]\n");
    out.push_str("#[repr(u8)]\n");
    out.push_str("pub enum ExprToken {\n");
    for (id, value) in &tokens {
        out.push_str(&format!("    {} = 0x{:02X},\n", id, value));
    }
    out.push_str("}\n\n");

    out.push_str(&format!("pub const EXPR_TOKEN_COUNT: usize = {};\n\n", tokens.len()));

    out.push_str("pub const EXPR_TOKENS: &[ExprToken] = &[\n");
    for (id, _) in &tokens {
        out.push_str(&format!("    ExprToken::{},\n", id));
    }
    out.push_str("];\n\n");

    out.push_str("impl ExprToken {\n");
    out.push_str("    pub const fn name(self) -> &'static str {\n");
    out.push_str("        match self {\n");
    for (id, _) in &tokens {
        out.push_str(&format!("            ExprToken::{} => \"{}\",\n", id, id));
    }
    out.push_str("        }\n");
    out.push_str("    }\n\n");
    out.push_str("    pub const fn value(self) -> u8 {\n");
    out.push_str("        self as u8\n");
    out.push_str("    }\n\n");
    out.push_str("    pub const fn from_u8(value: u8) -> Option<ExprToken> {\n");
    out.push_str("        match value {\n");
    for (id, value) in &tokens {
        out.push_str(&format!("            0x{:02X} => Some(ExprToken::{}),\n", value, id));
    }
    out.push_str("            _ => None,\n");
    out.push_str("        }\n");
    out.push_str("    }\n");
    out.push_str("}\n");

    fs::write(out_path, out).expect("write generated kismet tables");
}
