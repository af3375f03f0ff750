fn main() {
    let out_dir = std::env::var("OUT_DIR").unwrap();
    for (grammar, name) in [
        ("grammars/sum.rdg", "sum"),
        ("grammars/calc.rdg", "calc"),
        ("grammars/tree.rdg", "tree"),
    ] {
        println!("cargo:rerun-if-changed={}", grammar);
        rdparse_gen::generate(grammar, &out_dir, name, false).unwrap();
    }
}
