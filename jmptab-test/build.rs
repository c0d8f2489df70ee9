use jmptab::codegen::CodeGenerator;
use jmptab::Builder;
use std::path::{Path, PathBuf};

include!("fixtures.rs");

fn emit(out_dir: &Path, name: &str, keys: &[&str]) {
    let entries: Vec<(&str, usize)> = keys.iter().copied().zip(0..).collect();
    let table = Builder::new()
        .build_table(entries)
        .unwrap_or_else(|err| panic!("failed to build {name}: {err}"));
    let code = CodeGenerator::new().generate(&table);
    std::fs::write(out_dir.join(format!("{name}.rs")), code.to_string()).unwrap();
}

fn main() {
    println!("cargo::rerun-if-changed=build.rs");
    println!("cargo::rerun-if-changed=fixtures.rs");

    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());

    emit(&out_dir, "goos", GOOS);
    emit(&out_dir, "goarch", GOARCH);
    emit(&out_dir, "http_methods", HTTP_METHODS);

    let identifiers: Vec<String> = (0..IDENTIFIERS).map(|i| format!("ident_{i}")).collect();
    let identifiers: Vec<&str> = identifiers.iter().map(String::as_str).collect();
    emit(&out_dir, "identifiers", &identifiers);
}
