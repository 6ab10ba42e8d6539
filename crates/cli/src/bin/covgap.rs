use anyhow::Result;

fn main() -> Result<()> {
    covgap_cli::main_entry()
}
