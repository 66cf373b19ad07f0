use anyhow::Result;
use tracing::debug;
use wasm_imports::{binary::module::parse_imports, get_args, load_wasm};

fn main() -> Result<()> {
    let config = get_args()?;

    tracing_subscriber::fmt()
        .with_ansi(!config.disable_ansi_color)
        .init();

    let wasm = load_wasm(&config.file)?;
    debug!("loaded {} bytes from {}", wasm.len(), config.file);

    let imports = parse_imports(&wasm)?;

    if imports.is_empty() {
        println!("(no imports)");
        return Ok(());
    }
    for import in &imports {
        println!("{import}");
    }

    Ok(())
}
