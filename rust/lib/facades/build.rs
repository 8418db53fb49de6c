//! Generates the resource facades from `manifests/erp.toml` into `OUT_DIR`.

use std::path::PathBuf;

use erp_codegen::{to_snake_case, Codegen, Manifest, RustFacadeGenerator};

const MANIFEST: &str = "../codegen/manifests/erp.toml";

fn main() -> anyhow::Result<()> {
    println!("cargo:rerun-if-changed={}", MANIFEST);

    let out_dir = PathBuf::from(std::env::var("OUT_DIR")?);
    let manifest = Manifest::from_toml(&std::fs::read_to_string(MANIFEST)?)?;
    let code = RustFacadeGenerator.generate(&manifest)?;

    for file in &code.files {
        std::fs::write(out_dir.join(&file.path), &file.content)?;
    }

    // The generated mod.rs declares `pub mod x;`, which cannot resolve into
    // OUT_DIR, so each module is wrapped around an include! instead.
    let mut facades = String::new();
    for resource in &manifest.resources {
        let module = to_snake_case(&resource.name);
        facades.push_str(&format!(
            "pub mod {module} {{\n    include!(concat!(env!(\"OUT_DIR\"), \"/{module}.rs\"));\n}}\n"
        ));
        facades.push_str(&format!("pub use {}::{}Client;\n", module, resource.name));
    }
    std::fs::write(out_dir.join("facades.rs"), facades)?;
    Ok(())
}
